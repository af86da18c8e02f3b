// ── Dashboard and overview metrics ──
//
// Composite views built from one snapshot. Each builder is a pure
// function of the snapshot, `now` and the risk policy; counts inside one
// view always come from the same capture.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::aggregate::{self, BillingTotals, Tally, count_fixed};
use crate::error::CoreError;
use crate::filter::{
    CaseCriteria, EventCriteria, InvoiceCriteria, OrderCriteria, Scope, SiteCriteria,
};
use crate::links::{Chip, chips};
use crate::model::{Event, Provider, Site};
use crate::risk::{self, AtRiskOrder, RiskPolicy, SlaRiskCase};
use crate::snapshot::Snapshot;

/// Number of recent events shown when the caller does not say otherwise.
pub const DEFAULT_ACTIVITY_LIMIT: usize = 10;

// ── Dashboard ────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize)]
pub struct SiteMetrics {
    pub total: usize,
    pub critical: usize,
    pub by_region: Vec<Tally>,
}

#[derive(Debug, Clone, Serialize)]
pub struct OrderMetrics {
    pub total: usize,
    /// Orders not yet done.
    pub active: usize,
    pub by_status: Vec<Chip>,
    pub blocked_reasons: Vec<Tally>,
    pub at_risk: Vec<AtRiskOrder>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CaseMetrics {
    pub total: usize,
    /// Cases not yet resolved.
    pub open: usize,
    /// Severity chips over open cases.
    pub by_severity: Vec<Chip>,
    pub by_status: Vec<Tally>,
    pub sla_risk: Vec<SlaRiskCase>,
}

/// Everything the landing dashboard shows.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardSummary {
    pub generated_at: DateTime<Utc>,
    pub sites: SiteMetrics,
    pub orders: OrderMetrics,
    pub cases: CaseMetrics,
    pub billing: BillingTotals,
    pub recent_activity: Vec<Arc<Event>>,
}

/// Build the dashboard from one snapshot.
pub fn dashboard(
    snapshot: &Snapshot,
    now: DateTime<Utc>,
    policy: RiskPolicy,
    activity_limit: usize,
) -> DashboardSummary {
    let scope = Scope::new(snapshot, now, policy);

    let sites = snapshot.sites();
    let site_metrics = SiteMetrics {
        total: sites.len(),
        critical: sites.iter().filter(|s| s.is_critical()).count(),
        by_region: aggregate::sites_by_region(sites)
            .into_iter()
            .map(Tally::from)
            .collect(),
    };

    let orders = snapshot.orders();
    let order_metrics = OrderMetrics {
        total: orders.len(),
        active: orders.iter().filter(|o| o.status().state.is_active()).count(),
        by_status: chips(
            count_fixed(orders, |o| o.status().state),
            "orders",
            &OrderCriteria::default(),
            |c, state| c.status = Some(state),
        ),
        blocked_reasons: aggregate::tally_orders(
            snapshot,
            orders,
            aggregate::OrderDimension::BlockedReason,
        ),
        at_risk: risk::at_risk_orders(orders, now, &policy),
    };

    let cases = snapshot.cases();
    let open_criteria = CaseCriteria {
        open: true,
        ..CaseCriteria::default()
    };
    let open_cases = scope.cases(&open_criteria);
    let case_metrics = CaseMetrics {
        total: cases.len(),
        open: open_cases.len(),
        by_severity: chips(
            count_fixed(&open_cases, |c| c.severity),
            "cases",
            &open_criteria,
            |c, severity| c.severity = Some(severity),
        ),
        by_status: aggregate::tally_cases(snapshot, cases, aggregate::CaseDimension::Status),
        sla_risk: risk::sla_risk_cases(cases, now, &policy),
    };

    let mut recent_activity = scope.events(&EventCriteria::default());
    recent_activity.truncate(activity_limit);

    tracing::debug!(
        sites = site_metrics.total,
        orders = order_metrics.total,
        at_risk_orders = order_metrics.at_risk.len(),
        sla_risk_cases = case_metrics.sla_risk.len(),
        "built dashboard summary"
    );

    DashboardSummary {
        generated_at: now,
        sites: site_metrics,
        orders: order_metrics,
        cases: case_metrics,
        billing: aggregate::billing_totals(snapshot.invoices()),
        recent_activity,
    }
}

// ── Site overview ────────────────────────────────────────────────────

/// One site with the state of everything attached to it.
#[derive(Debug, Clone, Serialize)]
pub struct SiteOverview {
    pub site: Arc<Site>,
    pub provider: String,
    pub order_status: Vec<Tally>,
    pub open_cases: usize,
    /// Due plus disputed invoice amount.
    pub outstanding: f64,
    pub recent_activity: Vec<Arc<Event>>,
}

pub fn site_overview(
    snapshot: &Snapshot,
    site_id: &str,
    now: DateTime<Utc>,
    policy: RiskPolicy,
    activity_limit: usize,
) -> Result<SiteOverview, CoreError> {
    let site = Arc::clone(snapshot.require_site(site_id)?);
    let scope = Scope::new(snapshot, now, policy);

    let orders = scope.orders(&OrderCriteria {
        site_id: Some(site.id.clone()),
        ..OrderCriteria::default()
    });
    let open_cases = scope
        .cases(&CaseCriteria {
            site_id: Some(site.id.clone()),
            open: true,
            ..CaseCriteria::default()
        })
        .len();
    let invoices = scope.invoices(&InvoiceCriteria {
        site_id: Some(site.id.clone()),
        ..InvoiceCriteria::default()
    });
    let mut recent_activity = scope.events(&EventCriteria {
        site_id: Some(site.id.clone()),
        ..EventCriteria::default()
    });
    recent_activity.truncate(activity_limit);

    Ok(SiteOverview {
        provider: snapshot.provider_name(&site.provider_id).to_owned(),
        order_status: aggregate::tally_orders(
            snapshot,
            &orders,
            aggregate::OrderDimension::Status,
        ),
        open_cases,
        outstanding: aggregate::billing_totals(&invoices).outstanding,
        recent_activity,
        site,
    })
}

// ── Provider overview ────────────────────────────────────────────────

/// Delivery footprint of one provider.
#[derive(Debug, Clone, Serialize)]
pub struct ProviderOverview {
    pub provider: Arc<Provider>,
    pub sites: usize,
    pub orders: usize,
    pub blocked_orders: usize,
}

fn overview_for(scope: &Scope<'_>, provider: &Arc<Provider>) -> ProviderOverview {
    let sites = scope
        .sites(&SiteCriteria {
            provider_id: Some(provider.id.clone()),
            ..SiteCriteria::default()
        })
        .len();
    let orders = scope.orders(&OrderCriteria {
        provider_id: Some(provider.id.clone()),
        ..OrderCriteria::default()
    });
    ProviderOverview {
        provider: Arc::clone(provider),
        sites,
        orders: orders.len(),
        blocked_orders: orders.iter().filter(|o| o.status().is_blocked()).count(),
    }
}

/// One overview per provider, in source order.
pub fn provider_overviews(scope: &Scope<'_>) -> Vec<ProviderOverview> {
    scope
        .snapshot
        .providers()
        .iter()
        .map(|p| overview_for(scope, p))
        .collect()
}

pub fn provider_overview(scope: &Scope<'_>, provider_id: &str) -> Result<ProviderOverview, CoreError> {
    let provider = scope.snapshot.require_provider(provider_id)?;
    Ok(overview_for(scope, provider))
}
