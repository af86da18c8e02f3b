//! Order command handlers.

use std::sync::Arc;

use serde::Serialize;
use tabled::Tabled;

use connexia_core::aggregate::{self, count_fixed};
use connexia_core::convert::parse_value;
use connexia_core::filter;
use connexia_core::risk::{self, AtRiskOrder};
use connexia_core::{Order, OrderCriteria, OrderDimension, OrderStatus, Snapshot};

use crate::cli::{GlobalOpts, OrderFilter, OrdersArgs, OrdersCommand, WhereArg};
use crate::error::CliError;
use crate::output::{self, Palette};

use super::Context;
use super::util::{self, CountRow, FilterFlags};

const PATH: &str = "orders";

// ── Filter flags ────────────────────────────────────────────────────

impl FilterFlags for OrderFilter {
    type Criteria = OrderCriteria;

    fn pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        util::pair(&mut pairs, "site", self.site.as_ref());
        util::scope_pairs(&mut pairs, &self.scope);
        util::pair(&mut pairs, "service_type", self.service_type.as_ref());
        util::pair(&mut pairs, "status", self.status.as_ref());
        util::pair(&mut pairs, "blocked_reason", self.blocked_reason.as_ref());
        util::pair(&mut pairs, "owner_team", self.owner_team.as_ref());
        util::flag(&mut pairs, "at_risk", self.at_risk);
        pairs
    }

    fn where_clause(&self) -> &WhereArg {
        &self.where_clause
    }
}

// ── Table rows ──────────────────────────────────────────────────────

#[derive(Tabled)]
struct OrderRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Site")]
    site: String,
    #[tabled(rename = "Service")]
    service: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Blocked Reason")]
    reason: String,
    #[tabled(rename = "Target")]
    target: String,
}

impl OrderRow {
    fn new(snapshot: &Snapshot, o: &Arc<Order>) -> Self {
        let status = o.status();
        Self {
            id: o.id.to_string(),
            site: snapshot.site_name(&o.site_id).to_owned(),
            service: o.service_type.to_string(),
            status: status.state.to_string(),
            reason: if status.is_blocked() {
                status.reason_label().to_owned()
            } else {
                String::new()
            },
            target: util::date(o.target_date),
        }
    }
}

#[derive(Tabled)]
struct AtRiskRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Site")]
    site: String,
    #[tabled(rename = "Target")]
    target: String,
    #[tabled(rename = "Reason")]
    reason: String,
}

impl AtRiskRow {
    fn new(snapshot: &Snapshot, r: &AtRiskOrder) -> Self {
        Self {
            id: r.order.id.to_string(),
            site: snapshot.site_name(&r.order.site_id).to_owned(),
            target: util::date(r.order.target_date),
            reason: r.reason.clone(),
        }
    }
}

// ── Detail view ─────────────────────────────────────────────────────

/// One order with everything derived from it.
#[derive(Serialize)]
struct OrderDetail {
    #[serde(flatten)]
    order: Arc<Order>,
    site_name: String,
    provider: String,
    derived: OrderStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    risk: Option<String>,
}

fn detail(d: &OrderDetail, palette: Palette) -> String {
    let o = &d.order;
    let status = if d.derived.is_blocked() {
        palette.alert(&format!("blocked ({})", d.derived.reason_label()))
    } else {
        d.derived.state.to_string()
    };
    let mut lines = vec![
        palette.heading(&format!("Order {}", o.id)),
        format!("Site:     {} ({})", d.site_name, o.site_id),
        format!("Provider: {}", d.provider),
        format!("Service:  {}", o.service_type),
        format!("Status:   {status}"),
        format!("Created:  {}", util::date(o.created_at)),
        format!("Target:   {}", util::date(o.target_date)),
    ];
    if let Some(risk) = &d.risk {
        lines.push(format!("Risk:     {}", palette.warn(risk)));
    }

    lines.push(String::new());
    lines.push(palette.heading("Milestones"));
    for m in &o.milestones {
        let mut line = format!("  {:<24} {:<12} {}", m.name, m.state.to_string(), m.owner_team);
        if let Some(reason) = m.blocked_reason {
            line.push_str(&format!("  [{}]", reason.label()));
        }
        lines.push(if m.is_blocked() {
            palette.alert(&line)
        } else {
            line
        });
    }
    lines.join("\n")
}

// ── Handler ─────────────────────────────────────────────────────────

pub fn handle(ctx: &Context, args: OrdersArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let out = match args.command {
        OrdersCommand::List(filter) => {
            let criteria = util::criteria(&filter)?;
            let orders = ctx.scope().orders(&criteria);
            output::render_list(
                ctx.output(),
                &orders,
                |o| OrderRow::new(&ctx.snapshot, o),
                |o| o.id.to_string(),
            )?
        }

        OrdersCommand::Get { order } => {
            let order = Arc::clone(ctx.snapshot.require_order(&order)?);
            let data = OrderDetail {
                site_name: ctx.snapshot.site_name(&order.site_id).to_owned(),
                provider: ctx.snapshot.site_provider_name(&order.site_id).to_owned(),
                derived: order.status(),
                risk: risk::order_risk_reason(&order, ctx.now, &ctx.settings.policy),
                order,
            };
            let palette = ctx.palette();
            output::render_single(
                ctx.output(),
                &data,
                |d| detail(d, palette),
                |d| d.order.id.to_string(),
            )?
        }

        OrdersCommand::AtRisk(flags) => {
            let criteria = util::criteria(&flags)?;
            let scope = ctx.scope();
            let orders = filter::apply(&criteria, ctx.snapshot.orders(), &scope);
            let flagged = risk::at_risk_orders(&orders, ctx.now, &ctx.settings.policy);
            output::render_list(
                ctx.output(),
                &flagged,
                |r| AtRiskRow::new(&ctx.snapshot, r),
                |r| r.order.id.to_string(),
            )?
        }

        OrdersCommand::Counts { by, filter } => {
            let dimension: OrderDimension = parse_value("by", &by)?;
            let criteria = util::criteria(&filter)?;
            let orders = ctx.scope().orders(&criteria);
            let entries = match dimension {
                OrderDimension::Status => util::chip_entries(
                    count_fixed(&orders, |o| o.status().state),
                    PATH,
                    &criteria,
                    |c, state| c.status = Some(state),
                ),
                OrderDimension::ServiceType => util::chip_entries(
                    count_fixed(&orders, |o| o.service_type),
                    PATH,
                    &criteria,
                    |c, service| c.service_type = Some(service),
                ),
                other => {
                    let key = match other {
                        OrderDimension::BlockedReason => Some("blocked_reason"),
                        OrderDimension::BlockedOwner => Some("owner_team"),
                        OrderDimension::Region => Some("region"),
                        _ => None,
                    };
                    util::tally_entries(
                        aggregate::tally_orders(&ctx.snapshot, &orders, other),
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
