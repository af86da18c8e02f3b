// ── Filter composer ──
//
// Every criterion is an independent AND predicate and an unset criterion
// never constrains, so empty criteria return the input unchanged.
// Region and provider criteria go through the record's site: a record
// whose site cannot be resolved is excluded whenever either is set.

mod criteria;
mod search;

pub use criteria::{
    CaseCriteria, Criteria, EventCriteria, InvoiceCriteria, OrderCriteria, SiteCriteria,
};

use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::lookup::SiteScoped;
use crate::model::{Case, EntityId, Event, Invoice, Order, Region, Site};
use crate::risk::{self, RiskPolicy};
use crate::snapshot::Snapshot;
use search::matches_query;

/// Everything a predicate may consult besides the record itself.
#[derive(Debug, Clone, Copy)]
pub struct Scope<'a> {
    pub snapshot: &'a Snapshot,
    pub now: DateTime<Utc>,
    pub policy: RiskPolicy,
}

/// A criteria record that can test one kind of record.
pub trait RecordFilter {
    type Record;

    /// Entity name used in log lines.
    const ENTITY: &'static str;

    fn matches(&self, record: &Self::Record, scope: &Scope<'_>) -> bool;
}

/// Keep the records `filter` accepts, in source order.
pub fn apply<F: RecordFilter>(
    filter: &F,
    records: &[Arc<F::Record>],
    scope: &Scope<'_>,
) -> Vec<Arc<F::Record>> {
    let kept: Vec<Arc<F::Record>> = records
        .iter()
        .filter(|r| filter.matches(r, scope))
        .map(Arc::clone)
        .collect();
    tracing::debug!(
        entity = F::ENTITY,
        total = records.len(),
        kept = kept.len(),
        "applied filter"
    );
    kept
}

/// Provider and region constraints, resolved through the record's site.
fn site_matches<R: SiteScoped>(
    scope: &Scope<'_>,
    record: &R,
    provider_id: Option<&EntityId>,
    region: Option<Region>,
) -> bool {
    if provider_id.is_none() && region.is_none() {
        return true;
    }
    let Some(site) = scope.snapshot.site_of(record) else {
        return false;
    };
    provider_id.is_none_or(|p| &site.provider_id == p) && region.is_none_or(|r| site.region == r)
}

fn same_id(wanted: Option<&EntityId>, actual: &EntityId) -> bool {
    wanted.is_none_or(|w| w == actual)
}

fn same_optional_id(wanted: Option<&EntityId>, actual: Option<&EntityId>) -> bool {
    wanted.is_none_or(|w| actual == Some(w))
}

fn same<T: PartialEq>(wanted: Option<T>, actual: T) -> bool {
    wanted.is_none_or(|w| w == actual)
}

// ── Per-entity predicates ────────────────────────────────────────────

impl RecordFilter for SiteCriteria {
    type Record = Site;
    const ENTITY: &'static str = "site";

    fn matches(&self, site: &Site, scope: &Scope<'_>) -> bool {
        same_id(self.provider_id.as_ref(), &site.provider_id)
            && same(self.region, site.region)
            && same(self.criticality, site.criticality)
            && matches_query(self.query.as_deref(), || {
                search::site_haystack(scope.snapshot, site)
            })
    }
}

impl RecordFilter for OrderCriteria {
    type Record = Order;
    const ENTITY: &'static str = "order";

    fn matches(&self, order: &Order, scope: &Scope<'_>) -> bool {
        let status = order.status();
        same_id(self.site_id.as_ref(), &order.site_id)
            && same(self.service_type, order.service_type)
            && same(self.status, status.state)
            && self
                .blocked_reason
                .is_none_or(|r| status.is_blocked() && status.blocked_reason == Some(r))
            && self
                .blocked_owner_team
                .is_none_or(|team| order.is_blocked_on(team))
            && (!self.at_risk || risk::order_risk_reason(order, scope.now, &scope.policy).is_some())
            && site_matches(scope, order, self.provider_id.as_ref(), self.region)
            && matches_query(self.query.as_deref(), || {
                search::order_haystack(scope.snapshot, order)
            })
    }
}

impl RecordFilter for CaseCriteria {
    type Record = Case;
    const ENTITY: &'static str = "case";

    fn matches(&self, case: &Case, scope: &Scope<'_>) -> bool {
        same_id(self.site_id.as_ref(), &case.site_id)
            && same(self.severity, case.severity)
            && same(self.status, case.status)
            && same(self.owner_team, case.owner_team)
            && (!self.open || case.is_open())
            && (!self.sla_risk || risk::is_sla_at_risk(case, scope.now, &scope.policy))
            && site_matches(scope, case, self.provider_id.as_ref(), self.region)
            && matches_query(self.query.as_deref(), || {
                search::case_haystack(scope.snapshot, case)
            })
    }
}

impl RecordFilter for InvoiceCriteria {
    type Record = Invoice;
    const ENTITY: &'static str = "invoice";

    fn matches(&self, invoice: &Invoice, scope: &Scope<'_>) -> bool {
        same_id(self.site_id.as_ref(), &invoice.site_id)
            && same(self.status, invoice.status)
            && self.period.as_ref().is_none_or(|p| *p == invoice.period)
            && site_matches(scope, invoice, self.provider_id.as_ref(), self.region)
            && matches_query(self.query.as_deref(), || {
                search::invoice_haystack(scope.snapshot, invoice)
            })
    }
}

impl RecordFilter for EventCriteria {
    type Record = Event;
    const ENTITY: &'static str = "event";

    fn matches(&self, event: &Event, scope: &Scope<'_>) -> bool {
        same_optional_id(self.site_id.as_ref(), event.site_id.as_ref())
            && same_optional_id(self.order_id.as_ref(), event.order_id.as_ref())
            && same_optional_id(self.case_id.as_ref(), event.case_id.as_ref())
            && same(self.kind, event.kind)
            && self.since.is_none_or(|since| event.timestamp >= since)
            && site_matches(scope, event, self.provider_id.as_ref(), self.region)
            && matches_query(self.query.as_deref(), || {
                search::event_haystack(scope.snapshot, event)
            })
    }
}

// ── Filtered, sorted views ───────────────────────────────────────────

impl<'a> Scope<'a> {
    pub fn new(snapshot: &'a Snapshot, now: DateTime<Utc>, policy: RiskPolicy) -> Self {
        Self {
            snapshot,
            now,
            policy,
        }
    }

    /// Sites in source order.
    pub fn sites(&self, criteria: &SiteCriteria) -> Vec<Arc<Site>> {
        apply(criteria, self.snapshot.sites(), self)
    }

    /// Orders, earliest target date first.
    pub fn orders(&self, criteria: &OrderCriteria) -> Vec<Arc<Order>> {
        let mut orders = apply(criteria, self.snapshot.orders(), self);
        orders.sort_by_key(|o| o.target_date);
        orders
    }

    /// Cases, most urgent SLA first.
    pub fn cases(&self, criteria: &CaseCriteria) -> Vec<Arc<Case>> {
        let mut cases = apply(criteria, self.snapshot.cases(), self);
        cases.sort_by_key(|c| c.sla_due_at);
        cases
    }

    /// Invoices, latest billing period first.
    pub fn invoices(&self, criteria: &InvoiceCriteria) -> Vec<Arc<Invoice>> {
        let mut invoices = apply(criteria, self.snapshot.invoices(), self);
        invoices.sort_by(|a, b| b.period.cmp(&a.period));
        invoices
    }

    /// Activity, newest first.
    pub fn events(&self, criteria: &EventCriteria) -> Vec<Arc<Event>> {
        let mut events = apply(criteria, self.snapshot.events(), self);
        events.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        events
    }
}
