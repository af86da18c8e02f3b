// ── Free-text search ──
//
// Each record gets a haystack assembled fresh on every call: its id, the
// display names reachable through its site, and its enum labels. Matching
// is a case-insensitive substring test.

use crate::aggregate::Category;
use crate::model::{Case, Event, Invoice, Order, Site};
use crate::snapshot::Snapshot;

/// Does `haystack` satisfy `query`? A blank query matches everything, and
/// the haystack is only built when there is something to match.
pub(crate) fn matches_query(query: Option<&str>, haystack: impl FnOnce() -> String) -> bool {
    let Some(needle) = query.map(str::trim).filter(|q| !q.is_empty()) else {
        return true;
    };
    haystack()
        .to_lowercase()
        .contains(&needle.to_lowercase())
}

/// Site name, customer, region and provider name of a record's site.
fn site_terms<'a>(snapshot: &'a Snapshot, site_id: &str, terms: &mut Vec<&'a str>) {
    if let Some(site) = snapshot.site(site_id) {
        terms.push(&site.name);
        terms.push(&site.customer);
        terms.push(site.region.label());
        terms.push(snapshot.provider_name(&site.provider_id));
    }
}

pub(crate) fn site_haystack(snapshot: &Snapshot, site: &Site) -> String {
    [
        site.id.as_str(),
        site.name.as_str(),
        site.customer.as_str(),
        site.country.as_str(),
        site.region.label(),
        site.criticality.label(),
        snapshot.provider_name(&site.provider_id),
    ]
    .join(" ")
}

pub(crate) fn order_haystack(snapshot: &Snapshot, order: &Order) -> String {
    let status = order.status();
    let mut terms = vec![
        order.id.as_str(),
        order.site_id.as_str(),
        order.service_type.label(),
        status.state.label(),
    ];
    if status.is_blocked() {
        terms.push(status.reason_label());
    }
    site_terms(snapshot, order.site_id.as_str(), &mut terms);
    for m in &order.milestones {
        terms.push(&m.name);
        terms.push(m.owner_team.label());
    }
    terms.join(" ")
}

pub(crate) fn case_haystack(snapshot: &Snapshot, case: &Case) -> String {
    let mut terms = vec![
        case.id.as_str(),
        case.site_id.as_str(),
        case.title.as_str(),
        case.severity.label(),
        case.status.label(),
        case.owner_team.label(),
    ];
    site_terms(snapshot, case.site_id.as_str(), &mut terms);
    terms.join(" ")
}

pub(crate) fn invoice_haystack(snapshot: &Snapshot, invoice: &Invoice) -> String {
    let mut terms = vec![
        invoice.id.as_str(),
        invoice.site_id.as_str(),
        invoice.period.as_str(),
        invoice.status.label(),
    ];
    site_terms(snapshot, invoice.site_id.as_str(), &mut terms);
    terms.join(" ")
}

pub(crate) fn event_haystack(snapshot: &Snapshot, event: &Event) -> String {
    let mut terms = vec![event.id.as_str(), event.kind.label(), event.summary.as_str()];
    for linked in [&event.site_id, &event.order_id, &event.case_id]
        .into_iter()
        .flatten()
    {
        terms.push(linked.as_str());
    }
    if let Some(site_id) = &event.site_id {
        site_terms(snapshot, site_id.as_str(), &mut terms);
    }
    terms.join(" ")
}
