//! Dashboard handler: the landing summary as a sectioned text view.

use std::fmt::Write;

use connexia_core::metrics::{self, DashboardSummary};
use connexia_core::{Chip, Snapshot, Tally};

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output::{self, Palette};

use super::Context;
use super::util;

fn chip_lines(out: &mut String, chips: &[Chip], palette: Palette) {
    for chip in chips {
        let _ = writeln!(
            out,
            "  {:<18} {:>4}  {}",
            chip.label,
            chip.count,
            palette.dim(&chip.href)
        );
    }
}

fn tally_line(tallies: &[Tally]) -> String {
    if tallies.is_empty() {
        return "none".into();
    }
    tallies
        .iter()
        .map(|t| format!("{} {}", t.label, t.count))
        .collect::<Vec<_>>()
        .join(", ")
}

#[allow(clippy::too_many_lines)]
fn render(d: &DashboardSummary, snapshot: &Snapshot, palette: Palette) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{}",
        palette.heading(&format!("Dashboard as of {}", util::timestamp(d.generated_at)))
    );

    // ── Sites ──
    let _ = writeln!(out, "\n{}", palette.heading("Sites"));
    let _ = writeln!(
        out,
        "  {} total, {} critical ({})",
        d.sites.total,
        d.sites.critical,
        tally_line(&d.sites.by_region)
    );

    // ── Orders ──
    let _ = writeln!(out, "\n{}", palette.heading("Orders"));
    let _ = writeln!(out, "  {} total, {} active", d.orders.total, d.orders.active);
    chip_lines(&mut out, &d.orders.by_status, palette);
    let _ = writeln!(
        out,
        "  Blocked reasons: {}",
        tally_line(&d.orders.blocked_reasons)
    );
    if d.orders.at_risk.is_empty() {
        let _ = writeln!(out, "  No orders at risk");
    } else {
        let _ = writeln!(out, "  At risk:");
        for r in &d.orders.at_risk {
            let line = format!(
                "    {:<10} {:<28} {}",
                r.order.id,
                snapshot.site_name(&r.order.site_id),
                r.reason
            );
            let _ = writeln!(
                out,
                "{}",
                if r.order.status().is_blocked() {
                    palette.alert(&line)
                } else {
                    palette.warn(&line)
                }
            );
        }
    }

    // ── Cases ──
    let _ = writeln!(out, "\n{}", palette.heading("Cases"));
    let _ = writeln!(out, "  {} total, {} open", d.cases.total, d.cases.open);
    chip_lines(&mut out, &d.cases.by_severity, palette);
    let _ = writeln!(out, "  By status: {}", tally_line(&d.cases.by_status));
    if d.cases.sla_risk.is_empty() {
        let _ = writeln!(out, "  No cases near their SLA");
    } else {
        let _ = writeln!(out, "  SLA risk:");
        for r in &d.cases.sla_risk {
            let line = format!(
                "    {:<10} {:<5} {:>4}h  {}",
                r.case.id,
                r.case.severity.to_string(),
                r.due_in_hours,
                r.case.title
            );
            let _ = writeln!(
                out,
                "{}",
                if r.due_in_hours < 0 {
                    palette.alert(&line)
                } else {
                    palette.warn(&line)
                }
            );
        }
    }

    // ── Billing ──
    let _ = writeln!(out, "\n{}", palette.heading("Billing"));
    let _ = writeln!(
        out,
        "  Outstanding {} of {}",
        output::money(d.billing.outstanding),
        output::money(d.billing.total)
    );

    // ── Activity ──
    if !d.recent_activity.is_empty() {
        let _ = writeln!(out, "\n{}", palette.heading("Recent activity"));
        for e in &d.recent_activity {
            let _ = writeln!(
                out,
                "  {}  {}",
                palette.dim(&util::timestamp(e.timestamp)),
                e.summary
            );
        }
    }

    out.trim_end().to_owned()
}

pub fn handle(ctx: &Context, global: &GlobalOpts) -> Result<(), CliError> {
    let summary = metrics::dashboard(
        &ctx.snapshot,
        ctx.now,
        ctx.settings.policy,
        ctx.settings.activity_limit,
    );
    let palette = ctx.palette();
    let out = output::render_single(
        ctx.output(),
        &summary,
        |d| render(d, &ctx.snapshot, palette),
        |d| util::timestamp(d.generated_at),
    )?;
    output::print_output(&out, global.quiet);
    Ok(())
}
