//! Site command handlers.

use std::sync::Arc;

use tabled::Tabled;

use connexia_core::metrics::{self, SiteOverview};
use connexia_core::{Site, SiteCriteria, Snapshot};

use crate::cli::{GlobalOpts, SiteFilter, SitesArgs, SitesCommand, WhereArg};
use crate::error::CliError;
use crate::output::{self, Palette};

use super::Context;
use super::util::{self, FilterFlags};

// ── Filter flags ────────────────────────────────────────────────────

impl FilterFlags for SiteFilter {
    type Criteria = SiteCriteria;

    fn pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        util::scope_pairs(&mut pairs, &self.scope);
        util::pair(&mut pairs, "criticality", self.criticality.as_ref());
        pairs
    }

    fn where_clause(&self) -> &WhereArg {
        &self.where_clause
    }
}

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct SiteRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Customer")]
    customer: String,
    #[tabled(rename = "Country")]
    country: String,
    #[tabled(rename = "Region")]
    region: String,
    #[tabled(rename = "Provider")]
    provider: String,
    #[tabled(rename = "Criticality")]
    criticality: String,
}

impl SiteRow {
    fn new(snapshot: &Snapshot, s: &Arc<Site>) -> Self {
        Self {
            id: s.id.to_string(),
            name: s.name.clone(),
            customer: s.customer.clone(),
            country: s.country.clone(),
            region: s.region.to_string(),
            provider: snapshot.provider_name(&s.provider_id).to_owned(),
            criticality: s.criticality.to_string(),
        }
    }
}

fn detail(o: &SiteOverview, palette: Palette) -> String {
    let s = &o.site;
    let mut lines = vec![
        palette.heading(&format!("{} ({})", s.name, s.id)),
        format!("Customer:    {}", s.customer),
        format!("Country:     {}", s.country),
        format!("Region:      {}", s.region),
        format!("Provider:    {}", o.provider),
        format!("Criticality: {}", s.criticality),
        format!("Open cases:  {}", o.open_cases),
    ];
    let outstanding = output::money(o.outstanding);
    lines.push(if o.outstanding > 0.0 {
        format!("Outstanding: {}", palette.warn(&outstanding))
    } else {
        format!("Outstanding: {outstanding}")
    });

    lines.push(String::new());
    lines.push(palette.heading("Orders"));
    for t in &o.order_status {
        let line = format!("  {:<12} {}", t.label, t.count);
        lines.push(if t.label == "blocked" && t.count > 0 {
            palette.alert(&line)
        } else {
            line
        });
    }

    if !o.recent_activity.is_empty() {
        lines.push(String::new());
        lines.push(palette.heading("Recent activity"));
        for e in &o.recent_activity {
            lines.push(format!(
                "  {}  {}",
                palette.dim(&util::timestamp(e.timestamp)),
                e.summary
            ));
        }
    }
    lines.join("\n")
}

// ── Handler ─────────────────────────────────────────────────────────

pub fn handle(ctx: &Context, args: SitesArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        SitesCommand::List(filter) => {
            let criteria = util::criteria(&filter)?;
            let sites = ctx.scope().sites(&criteria);
            let out = output::render_list(
                ctx.output(),
                &sites,
                |s| SiteRow::new(&ctx.snapshot, s),
                |s| s.id.to_string(),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        SitesCommand::Get { site } => {
            let overview = metrics::site_overview(
                &ctx.snapshot,
                &site,
                ctx.now,
                ctx.settings.policy,
                ctx.settings.activity_limit,
            )?;
            let palette = ctx.palette();
            let out = output::render_single(
                ctx.output(),
                &overview,
                |o| detail(o, palette),
                |o| o.site.id.to_string(),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }
    }
}
