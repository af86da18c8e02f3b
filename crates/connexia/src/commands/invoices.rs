//! Invoice command handlers.

use std::sync::Arc;

use tabled::Tabled;

use connexia_core::aggregate::{self, AmountTotal, BillingTotals};
use connexia_core::{Invoice, InvoiceCriteria, Snapshot};

use crate::cli::{GlobalOpts, InvoiceFilter, InvoicesArgs, InvoicesCommand, WhereArg};
use crate::error::CliError;
use crate::output::{self, Palette};

use super::Context;
use super::util::{self, FilterFlags};

impl FilterFlags for InvoiceFilter {
    type Criteria = InvoiceCriteria;

    fn pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        util::pair(&mut pairs, "site", self.site.as_ref());
        util::scope_pairs(&mut pairs, &self.scope);
        util::pair(&mut pairs, "status", self.status.as_ref());
        util::pair(&mut pairs, "period", self.period.as_ref());
        pairs
    }

    fn where_clause(&self) -> &WhereArg {
        &self.where_clause
    }
}

// ── Table rows ──────────────────────────────────────────────────────

#[derive(Tabled)]
struct InvoiceRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Site")]
    site: String,
    #[tabled(rename = "Period")]
    period: String,
    #[tabled(rename = "Amount")]
    amount: String,
    #[tabled(rename = "Status")]
    status: String,
}

impl InvoiceRow {
    fn new(snapshot: &Snapshot, i: &Arc<Invoice>) -> Self {
        Self {
            id: i.id.to_string(),
            site: snapshot.site_name(&i.site_id).to_owned(),
            period: i.period.to_string(),
            amount: output::money(i.amount),
            status: i.status.to_string(),
        }
    }
}

#[derive(Tabled)]
struct TotalRow {
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Invoices")]
    count: usize,
    #[tabled(rename = "Amount")]
    amount: String,
}

impl From<&AmountTotal> for TotalRow {
    fn from(t: &AmountTotal) -> Self {
        Self {
            status: t.status.to_string(),
            count: t.count,
            amount: output::money(t.amount),
        }
    }
}

fn totals_view(totals: &BillingTotals, palette: Palette) -> String {
    let rows: Vec<TotalRow> = totals.by_status.iter().map(TotalRow::from).collect();
    let outstanding = output::money(totals.outstanding);
    let outstanding = if totals.outstanding > 0.0 {
        palette.warn(&outstanding)
    } else {
        outstanding
    };
    format!(
        "{}\nOutstanding: {outstanding}\nTotal:       {}",
        output::render_table(&rows),
        output::money(totals.total)
    )
}

// ── Handler ─────────────────────────────────────────────────────────

pub fn handle(ctx: &Context, args: InvoicesArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let out = match args.command {
        InvoicesCommand::List(flags) => {
            let criteria = util::criteria(&flags)?;
            let invoices = ctx.scope().invoices(&criteria);
            output::render_list(
                ctx.output(),
                &invoices,
                |i| InvoiceRow::new(&ctx.snapshot, i),
                |i| i.id.to_string(),
            )?
        }

        InvoicesCommand::Totals(flags) => {
            let criteria = util::criteria(&flags)?;
            let totals = aggregate::billing_totals(&ctx.scope().invoices(&criteria));
            let palette = ctx.palette();
            output::render_single(
                ctx.output(),
                &totals,
                |t| totals_view(t, palette),
                |t| output::money(t.outstanding),
            )?
        }
    };
    output::print_output(&out, global.quiet);
    Ok(())
}
