//! End-to-end derivations over the built-in sample dataset.
//!
//! Everything runs against a fixed anchor so relative fixture dates and
//! the `now` used by the rankers line up exactly.
#![allow(clippy::unwrap_used)]

use std::sync::Arc;

use chrono::{DateTime, Duration, TimeZone, Utc};
use pretty_assertions::assert_eq;

use connexia_core::aggregate::{count_fixed, tally_cases, tally_orders};
use connexia_core::filter::apply;
use connexia_core::fixtures::sample_dataset;
use connexia_core::risk::{at_risk_orders, sla_risk_cases};
use connexia_core::{
    Case, CaseCriteria, CaseDimension, CaseStatus, CaseTeam, Category, Criteria, DataStore,
    DeliveryState, EventCriteria, InvoiceCriteria, Order, OrderCriteria, OrderDimension,
    RiskPolicy, Scope, ServiceType, Severity, SiteCriteria, Snapshot,
};

// ── Helpers ─────────────────────────────────────────────────────────

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 2, 9, 0, 0).unwrap()
}

fn snapshot() -> Snapshot {
    let store = DataStore::from_dataset(sample_dataset(now())).unwrap();
    Snapshot::capture(&store).unwrap()
}

fn ids<T>(records: &[Arc<T>], id: impl Fn(&T) -> String) -> Vec<String> {
    records.iter().map(|r| id(&**r)).collect()
}

// ── Empty criteria ──────────────────────────────────────────────────

#[test]
fn empty_criteria_are_the_identity() {
    let snap = snapshot();
    let scope = Scope::new(&snap, now(), RiskPolicy::default());

    assert_eq!(
        ids(&apply(&SiteCriteria::default(), snap.sites(), &scope), |s| s.id.to_string()),
        ids(snap.sites(), |s| s.id.to_string())
    );
    assert_eq!(
        ids(&apply(&OrderCriteria::default(), snap.orders(), &scope), |o| o.id.to_string()),
        ids(snap.orders(), |o| o.id.to_string())
    );
    assert_eq!(
        apply(&CaseCriteria::default(), snap.cases(), &scope).len(),
        snap.cases().len()
    );
    assert_eq!(
        apply(&InvoiceCriteria::default(), snap.invoices(), &scope).len(),
        snap.invoices().len()
    );
    assert_eq!(
        apply(&EventCriteria::default(), snap.events(), &scope).len(),
        snap.events().len()
    );
}

// ── Counting ────────────────────────────────────────────────────────

#[test]
fn fixed_dimensions_are_complete_and_sum_to_length() {
    let snap = snapshot();

    let status = tally_orders(&snap, snap.orders(), OrderDimension::Status);
    let labels: Vec<&str> = status.iter().map(|t| t.label.as_str()).collect();
    assert_eq!(labels, vec!["blocked", "in_progress", "planned", "done"]);
    assert_eq!(status.iter().map(|t| t.count).sum::<usize>(), snap.orders().len());

    let service = tally_orders(&snap, snap.orders(), OrderDimension::ServiceType);
    assert_eq!(service.len(), ServiceType::ORDERED.len());
    assert_eq!(service.iter().map(|t| t.count).sum::<usize>(), snap.orders().len());

    for by in [CaseDimension::Severity, CaseDimension::Status, CaseDimension::OwnerTeam] {
        let counts = tally_cases(&snap, snap.cases(), by);
        assert_eq!(counts.iter().map(|t| t.count).sum::<usize>(), snap.cases().len());
    }
    let teams = tally_cases(&snap, snap.cases(), CaseDimension::OwnerTeam);
    let labels: Vec<&str> = teams.iter().map(|t| t.label.as_str()).collect();
    assert_eq!(labels, vec!["NOC", "Service Delivery", "Provider"]);
}

#[test]
fn zero_filled_when_nothing_matches() {
    let snap = snapshot();
    let scope = Scope::new(&snap, now(), RiskPolicy::default());
    let none = scope.cases(&CaseCriteria {
        query: Some("no such case anywhere".into()),
        ..CaseCriteria::default()
    });
    let counts = count_fixed(&none, |c| c.severity);
    assert_eq!(counts.len(), Severity::ORDERED.len());
    assert!(counts.iter().all(|c| c.count == 0));
}

#[test]
fn ranked_dimensions_sort_by_count() {
    let snap = snapshot();
    let regions = tally_orders(&snap, snap.orders(), OrderDimension::Region);
    assert!(regions.windows(2).all(|w| w[0].count >= w[1].count));
    // Sites resolve for every sample order.
    assert_eq!(regions.iter().map(|t| t.count).sum::<usize>(), snap.orders().len());

    let reasons = tally_orders(&snap, snap.orders(), OrderDimension::BlockedReason);
    let blocked = snap
        .orders()
        .iter()
        .filter(|o| o.status().state == DeliveryState::Blocked)
        .count();
    assert_eq!(reasons.iter().map(|t| t.count).sum::<usize>(), blocked);
}

// ── At-risk cases ───────────────────────────────────────────────────

fn case(id: &str, status: CaseStatus) -> Arc<Case> {
    Arc::new(Case {
        id: id.into(),
        site_id: "site-fra-01".into(),
        title: "Latency spike".into(),
        severity: Severity::Sev2,
        status,
        owner_team: CaseTeam::Noc,
        opened_at: now() - Duration::hours(1),
        sla_due_at: now() + Duration::hours(5),
    })
}

#[test]
fn waiting_case_due_in_five_hours_is_flagged_but_resolved_twin_is_not() {
    let cases = vec![
        case("case-waiting", CaseStatus::Waiting),
        case("case-resolved", CaseStatus::Resolved),
    ];
    let flagged = sla_risk_cases(&cases, now(), &RiskPolicy::default());
    assert_eq!(flagged.len(), 1);
    assert_eq!(flagged[0].case.id.as_str(), "case-waiting");
    assert_eq!(flagged[0].due_in_hours, 5);
}

#[test]
fn sample_sla_risk_is_sorted_most_urgent_first() {
    let snap = snapshot();
    let flagged = sla_risk_cases(snap.cases(), now(), &RiskPolicy::default());
    let hours: Vec<i64> = flagged.iter().map(|r| r.due_in_hours).collect();
    assert_eq!(hours, vec![-2, 5, 8]);
    assert!(flagged.iter().all(|r| r.case.is_open()));
}

// ── At-risk orders ──────────────────────────────────────────────────

#[test]
fn planned_order_due_in_three_days_is_flagged_but_ten_day_twin_is_not() {
    let snap = snapshot();
    let template = snap.require_order("ord-1003").unwrap();
    assert_eq!(template.status().state, DeliveryState::Planned);

    let near = Arc::new(Order {
        id: "ord-near".into(),
        target_date: now() + Duration::days(3),
        ..Order::clone(template)
    });
    let far = Arc::new(Order {
        id: "ord-far".into(),
        target_date: now() + Duration::days(10),
        ..Order::clone(template)
    });

    let flagged = at_risk_orders(&[near, far], now(), &RiskPolicy::default());
    assert_eq!(flagged.len(), 1);
    assert_eq!(flagged[0].order.id.as_str(), "ord-near");
    assert_eq!(flagged[0].reason, "Target date approaching (6d window)");
}

#[test]
fn sample_at_risk_orders_keep_source_order() {
    let snap = snapshot();
    let flagged = at_risk_orders(snap.orders(), now(), &RiskPolicy::default());
    let summary: Vec<(String, String)> = flagged
        .iter()
        .map(|r| (r.order.id.to_string(), r.reason.clone()))
        .collect();
    assert_eq!(
        summary,
        vec![
            ("ord-1002".into(), "Blocked: awaiting_provider".into()),
            ("ord-1003".into(), "Target date approaching (6d window)".into()),
            ("ord-1005".into(), "Blocked: awaiting_customer".into()),
            ("ord-1007".into(), "Blocked: unspecified".into()),
            ("ord-1009".into(), "Target date approaching (6d window)".into()),
        ]
    );
}

// ── Free-text search ────────────────────────────────────────────────

#[test]
fn frankfurt_search_matches_only_records_of_that_site() {
    let snap = snapshot();
    let scope = Scope::new(&snap, now(), RiskPolicy::default());

    let sites = scope.sites(&SiteCriteria {
        query: Some("frankfurt".into()),
        ..SiteCriteria::default()
    });
    assert_eq!(ids(&sites, |s| s.id.to_string()), vec!["site-fra-01"]);

    let orders = scope.orders(&OrderCriteria {
        query: Some("FrankFurt".into()),
        ..OrderCriteria::default()
    });
    assert!(!orders.is_empty());
    assert!(orders.iter().all(|o| o.site_id.as_str() == "site-fra-01"));
    let expected = snap
        .orders()
        .iter()
        .filter(|o| o.site_id.as_str() == "site-fra-01")
        .count();
    assert_eq!(orders.len(), expected);

    let cases = scope.cases(&CaseCriteria {
        query: Some("frankfurt".into()),
        ..CaseCriteria::default()
    });
    assert!(cases.iter().all(|c| c.site_id.as_str() == "site-fra-01"));
}

#[test]
fn drill_through_query_reproduces_the_filter() {
    let snap = snapshot();
    let scope = Scope::new(&snap, now(), RiskPolicy::default());
    let criteria = OrderCriteria {
        status: Some(DeliveryState::Blocked),
        ..OrderCriteria::default()
    };
    let link = connexia_core::href("orders", &criteria);
    let parsed = OrderCriteria::from_query(&link).unwrap();
    assert_eq!(
        ids(&scope.orders(&parsed), |o| o.id.to_string()),
        ids(&scope.orders(&criteria), |o| o.id.to_string())
    );
}
