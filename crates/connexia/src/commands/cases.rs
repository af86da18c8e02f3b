//! Case command handlers.

use std::sync::Arc;

use serde::Serialize;
use tabled::Tabled;

use connexia_core::aggregate::{self, count_fixed};
use connexia_core::convert::parse_value;
use connexia_core::risk::{self, SlaRiskCase};
use connexia_core::{Case, CaseCriteria, CaseDimension, Snapshot};

use crate::cli::{CaseFilter, CasesArgs, CasesCommand, GlobalOpts, WhereArg};
use crate::error::CliError;
use crate::output::{self, Palette};

use super::Context;
use super::util::{self, CountRow, FilterFlags};

const PATH: &str = "cases";

// ── Filter flags ────────────────────────────────────────────────────

impl FilterFlags for CaseFilter {
    type Criteria = CaseCriteria;

    fn pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        util::pair(&mut pairs, "site", self.site.as_ref());
        util::scope_pairs(&mut pairs, &self.scope);
        util::pair(&mut pairs, "severity", self.severity.as_ref());
        util::pair(&mut pairs, "status", self.status.as_ref());
        util::pair(&mut pairs, "owner_team", self.owner_team.as_ref());
        util::flag(&mut pairs, "open", self.open);
        util::flag(&mut pairs, "sla_risk", self.sla_risk);
        pairs
    }

    fn where_clause(&self) -> &WhereArg {
        &self.where_clause
    }
}

// ── Table rows ──────────────────────────────────────────────────────

#[derive(Tabled)]
struct CaseRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Site")]
    site: String,
    #[tabled(rename = "Title")]
    title: String,
    #[tabled(rename = "Severity")]
    severity: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Owner")]
    owner: String,
    #[tabled(rename = "SLA Due")]
    due: String,
}

impl CaseRow {
    fn new(snapshot: &Snapshot, c: &Arc<Case>) -> Self {
        Self {
            id: c.id.to_string(),
            site: snapshot.site_name(&c.site_id).to_owned(),
            title: c.title.clone(),
            severity: c.severity.to_string(),
            status: c.status.to_string(),
            owner: c.owner_team.to_string(),
            due: util::timestamp(c.sla_due_at),
        }
    }
}

#[derive(Tabled)]
struct SlaRiskRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Site")]
    site: String,
    #[tabled(rename = "Severity")]
    severity: String,
    #[tabled(rename = "Title")]
    title: String,
    #[tabled(rename = "Due In")]
    due_in: String,
}

impl SlaRiskRow {
    fn new(snapshot: &Snapshot, r: &SlaRiskCase) -> Self {
        Self {
            id: r.case.id.to_string(),
            site: snapshot.site_name(&r.case.site_id).to_owned(),
            severity: r.case.severity.to_string(),
            title: r.case.title.clone(),
            due_in: due_in(r.due_in_hours),
        }
    }
}

/// `5h`, or `breached 2h ago` once the deadline has passed.
fn due_in(hours: i64) -> String {
    if hours < 0 {
        format!("breached {}h ago", -hours)
    } else {
        format!("{hours}h")
    }
}

// ── Detail view ─────────────────────────────────────────────────────

#[derive(Serialize)]
struct CaseDetail {
    #[serde(flatten)]
    case: Arc<Case>,
    site_name: String,
    provider: String,
    hours_left: i64,
    sla_at_risk: bool,
}

fn detail(d: &CaseDetail, palette: Palette) -> String {
    let c = &d.case;
    let remaining = if c.is_open() {
        let text = due_in(d.hours_left);
        if d.sla_at_risk {
            palette.alert(&text)
        } else {
            text
        }
    } else {
        palette.dim("resolved")
    };
    [
        palette.heading(&format!("Case {}: {}", c.id, c.title)),
        format!("Site:     {} ({})", d.site_name, c.site_id),
        format!("Provider: {}", d.provider),
        format!("Severity: {}", c.severity),
        format!("Status:   {}", c.status),
        format!("Owner:    {}", c.owner_team),
        format!("Opened:   {}", util::timestamp(c.opened_at)),
        format!("SLA due:  {}", util::timestamp(c.sla_due_at)),
        format!("Left:     {remaining}"),
    ]
    .join("\n")
}

// ── Handler ─────────────────────────────────────────────────────────

pub fn handle(ctx: &Context, args: CasesArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let out = match args.command {
        CasesCommand::List(flags) => {
            let criteria = util::criteria(&flags)?;
            let cases = ctx.scope().cases(&criteria);
            output::render_list(
                ctx.output(),
                &cases,
                |c| CaseRow::new(&ctx.snapshot, c),
                |c| c.id.to_string(),
            )?
        }

        CasesCommand::Get { case } => {
            let case = Arc::clone(ctx.snapshot.require_case(&case)?);
            let data = CaseDetail {
                site_name: ctx.snapshot.site_name(&case.site_id).to_owned(),
                provider: ctx.snapshot.site_provider_name(&case.site_id).to_owned(),
                hours_left: risk::hours_left(&case, ctx.now),
                sla_at_risk: risk::is_sla_at_risk(&case, ctx.now, &ctx.settings.policy),
                case,
            };
            let palette = ctx.palette();
            output::render_single(
                ctx.output(),
                &data,
                |d| detail(d, palette),
                |d| d.case.id.to_string(),
            )?
        }

        CasesCommand::SlaRisk(flags) => {
            let criteria = util::criteria(&flags)?;
            let cases = ctx.scope().cases(&criteria);
            let flagged = risk::sla_risk_cases(&cases, ctx.now, &ctx.settings.policy);
            output::render_list(
                ctx.output(),
                &flagged,
                |r| SlaRiskRow::new(&ctx.snapshot, r),
                |r| r.case.id.to_string(),
            )?
        }

        CasesCommand::Counts { by, filter } => {
            let dimension: CaseDimension = parse_value("by", &by)?;
            let criteria = util::criteria(&filter)?;
            let cases = ctx.scope().cases(&criteria);
            let entries = match dimension {
                CaseDimension::Severity => util::chip_entries(
                    count_fixed(&cases, |c| c.severity),
                    PATH,
                    &criteria,
                    |c, severity| c.severity = Some(severity),
                ),
                CaseDimension::Status => util::chip_entries(
                    count_fixed(&cases, |c| c.status),
                    PATH,
                    &criteria,
                    |c, status| c.status = Some(status),
                ),
                CaseDimension::OwnerTeam => util::chip_entries(
                    count_fixed(&cases, |c| c.owner_team),
                    PATH,
                    &criteria,
                    |c, team| c.owner_team = Some(team),
                ),
                other => {
                    let key = matches!(other, CaseDimension::Region).then_some("region");
                    util::tally_entries(
                        aggregate::tally_cases(&ctx.snapshot, &cases, other),
                        PATH,
                        &criteria,
                        key,
                    )
                }
            };
            output::render_list(ctx.output(), &entries, |e| CountRow::from(e), |e| e.label.clone())?
        }
    };
    output::print_output(&out, global.quiet);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn breached_deadlines_read_as_past() {
        assert_eq!(due_in(5), "5h");
        assert_eq!(due_in(0), "0h");
        assert_eq!(due_in(-2), "breached 2h ago");
    }
}
