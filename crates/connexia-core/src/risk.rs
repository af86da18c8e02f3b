//! At-risk ranking for orders and SLA cases.
//!
//! Both rankers take `now` explicitly; nothing in here reads the clock.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::model::{Case, Order};

/// Thresholds that decide what counts as "at risk".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskPolicy {
    /// Orders whose target date is closer than this many days are flagged.
    pub order_window_days: i64,
    /// Open cases due within this many hours (rounded) are flagged.
    pub sla_threshold_hours: i64,
}

impl RiskPolicy {
    pub const DEFAULT_ORDER_WINDOW_DAYS: i64 = 6;
    pub const DEFAULT_SLA_THRESHOLD_HOURS: i64 = 8;
    /// Longest window accepted from configuration (about a century).
    pub const MAX_ORDER_WINDOW_DAYS: i64 = 36_500;

    /// Out-of-range windows saturate instead of overflowing.
    fn order_window(&self) -> Duration {
        Duration::try_days(self.order_window_days).unwrap_or(if self.order_window_days < 0 {
            Duration::MIN
        } else {
            Duration::MAX
        })
    }
}

impl Default for RiskPolicy {
    fn default() -> Self {
        Self {
            order_window_days: Self::DEFAULT_ORDER_WINDOW_DAYS,
            sla_threshold_hours: Self::DEFAULT_SLA_THRESHOLD_HOURS,
        }
    }
}

// ── Orders ───────────────────────────────────────────────────────────

/// An order that needs attention, with the reason it was flagged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AtRiskOrder {
    pub order: Arc<Order>,
    pub reason: String,
}

/// Why `order` is at risk, if it is.
///
/// A blocked order is reported as blocked even when its target date is
/// also close; the date rule is only consulted for unblocked orders.
pub fn order_risk_reason(order: &Order, now: DateTime<Utc>, policy: &RiskPolicy) -> Option<String> {
    let status = order.status();
    if status.is_blocked() {
        return Some(format!("Blocked: {}", status.reason_label()));
    }
    if order.target_date - now < policy.order_window() {
        return Some(format!(
            "Target date approaching ({}d window)",
            policy.order_window_days
        ));
    }
    None
}

/// Orders that are blocked or due inside the risk window, in source order.
pub fn at_risk_orders(
    orders: &[Arc<Order>],
    now: DateTime<Utc>,
    policy: &RiskPolicy,
) -> Vec<AtRiskOrder> {
    let flagged: Vec<AtRiskOrder> = orders
        .iter()
        .filter_map(|order| {
            order_risk_reason(order, now, policy).map(|reason| AtRiskOrder {
                order: Arc::clone(order),
                reason,
            })
        })
        .collect();
    tracing::debug!(
        orders = orders.len(),
        at_risk = flagged.len(),
        "ranked at-risk orders"
    );
    flagged
}

// ── Cases ────────────────────────────────────────────────────────────

/// An open case close to (or past) its SLA deadline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SlaRiskCase {
    pub case: Arc<Case>,
    /// Whole hours until the SLA is due; negative once breached.
    pub due_in_hours: i64,
}

/// Hours until `case` is due, rounded half away from zero.
#[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation, clippy::as_conversions)]
pub fn hours_left(case: &Case, now: DateTime<Utc>) -> i64 {
    let millis = (case.sla_due_at - now).num_milliseconds();
    (millis as f64 / 3_600_000.0).round() as i64
}

/// Is `case` open and due within the policy threshold?
pub fn is_sla_at_risk(case: &Case, now: DateTime<Utc>, policy: &RiskPolicy) -> bool {
    case.is_open() && hours_left(case, now) <= policy.sla_threshold_hours
}

/// Open cases due within the threshold, most urgent first.
pub fn sla_risk_cases(
    cases: &[Arc<Case>],
    now: DateTime<Utc>,
    policy: &RiskPolicy,
) -> Vec<SlaRiskCase> {
    let mut flagged: Vec<SlaRiskCase> = cases
        .iter()
        .filter(|c| c.is_open())
        .map(|c| SlaRiskCase {
            case: Arc::clone(c),
            due_in_hours: hours_left(c, now),
        })
        .filter(|r| r.due_in_hours <= policy.sla_threshold_hours)
        .collect();
    flagged.sort_by_key(|r| r.due_in_hours);
    tracing::debug!(
        cases = cases.len(),
        at_risk = flagged.len(),
        "ranked SLA-risk cases"
    );
    flagged
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::model::{
        BlockedReason, CaseStatus, CaseTeam, DeliveryState, Milestone, OwnerTeam, ServiceType,
        Severity,
    };
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 2, 9, 0, 0).unwrap()
    }

    fn order(id: &str, target_in: Duration, states: &[DeliveryState]) -> Arc<Order> {
        Arc::new(Order {
            id: id.into(),
            site_id: "site-1".into(),
            service_type: ServiceType::Internet,
            target_date: now() + target_in,
            created_at: now() - Duration::days(30),
            milestones: states
                .iter()
                .enumerate()
                .map(|(i, &state)| Milestone {
                    id: format!("{id}-m{i}").into(),
                    name: format!("step {i}"),
                    state,
                    blocked_reason: (state == DeliveryState::Blocked)
                        .then_some(BlockedReason::AwaitingCustomer),
                    owner_team: OwnerTeam::Customer,
                    updated_at: now(),
                })
                .collect(),
        })
    }

    fn case(id: &str, due_in: Duration, status: CaseStatus) -> Arc<Case> {
        Arc::new(Case {
            id: id.into(),
            site_id: "site-1".into(),
            title: format!("case {id}"),
            severity: Severity::Sev2,
            status,
            owner_team: CaseTeam::Noc,
            opened_at: now() - Duration::hours(2),
            sla_due_at: now() + due_in,
        })
    }

    #[test]
    fn blocked_reason_takes_priority_over_date_window() {
        let o = order("o1", Duration::days(1), &[DeliveryState::Blocked]);
        assert_eq!(
            order_risk_reason(&o, now(), &RiskPolicy::default()).unwrap(),
            "Blocked: awaiting_customer"
        );
    }

    #[test]
    fn blocked_without_reason_reports_unspecified() {
        let mut o = (*order("o1", Duration::days(30), &[DeliveryState::Blocked])).clone();
        o.milestones[0].blocked_reason = None;
        assert_eq!(
            order_risk_reason(&o, now(), &RiskPolicy::default()).unwrap(),
            "Blocked: unspecified"
        );
    }

    #[test]
    fn target_inside_window_is_flagged_and_outside_is_not() {
        let near = order("near", Duration::days(3), &[DeliveryState::Planned]);
        let far = order("far", Duration::days(10), &[DeliveryState::Planned]);
        let flagged = at_risk_orders(&[near, far], now(), &RiskPolicy::default());

        assert_eq!(flagged.len(), 1);
        assert_eq!(flagged[0].order.id.as_str(), "near");
        assert_eq!(flagged[0].reason, "Target date approaching (6d window)");
    }

    #[test]
    fn window_boundary_is_exclusive() {
        let edge = order("edge", Duration::days(6), &[DeliveryState::InProgress]);
        assert!(order_risk_reason(&edge, now(), &RiskPolicy::default()).is_none());
    }

    #[test]
    fn window_length_comes_from_policy() {
        let policy = RiskPolicy {
            order_window_days: 14,
            ..RiskPolicy::default()
        };
        let o = order("o1", Duration::days(10), &[DeliveryState::Planned]);
        assert_eq!(
            order_risk_reason(&o, now(), &policy).unwrap(),
            "Target date approaching (14d window)"
        );
    }

    #[test]
    fn oversized_window_saturates_instead_of_panicking() {
        let policy = RiskPolicy {
            order_window_days: i64::MAX,
            ..RiskPolicy::default()
        };
        let o = order("o1", Duration::days(400), &[DeliveryState::Planned]);
        assert!(order_risk_reason(&o, now(), &policy).is_some());
    }

    #[test]
    fn at_risk_orders_keep_source_order() {
        let orders = vec![
            order("b", Duration::days(2), &[DeliveryState::Planned]),
            order("a", Duration::days(1), &[DeliveryState::Blocked]),
        ];
        let ids: Vec<String> = at_risk_orders(&orders, now(), &RiskPolicy::default())
            .iter()
            .map(|r| r.order.id.to_string())
            .collect();
        assert_eq!(ids, vec!["b", "a"]);
    }

    #[test]
    fn waiting_case_due_in_five_hours_is_at_risk_and_resolved_is_not() {
        let cases = vec![
            case("waiting", Duration::hours(5), CaseStatus::Waiting),
            case("resolved", Duration::hours(5), CaseStatus::Resolved),
        ];
        let flagged = sla_risk_cases(&cases, now(), &RiskPolicy::default());
        assert_eq!(flagged.len(), 1);
        assert_eq!(flagged[0].case.id.as_str(), "waiting");
        assert_eq!(flagged[0].due_in_hours, 5);
    }

    #[test]
    fn hours_round_half_away_from_zero() {
        let c = case("c", Duration::minutes(8 * 60 + 30), CaseStatus::Open);
        assert_eq!(hours_left(&c, now()), 9);
        assert!(!is_sla_at_risk(&c, now(), &RiskPolicy::default()));

        let breached = case("b", -Duration::minutes(90), CaseStatus::Open);
        assert_eq!(hours_left(&breached, now()), -2);
    }

    #[test]
    fn sla_risk_sorts_breached_first_and_is_stable() {
        let cases = vec![
            case("later", Duration::hours(7), CaseStatus::Open),
            case("breached", -Duration::hours(3), CaseStatus::Investigating),
            case("tie-a", Duration::hours(2), CaseStatus::Open),
            case("tie-b", Duration::hours(2), CaseStatus::Waiting),
        ];
        let ids: Vec<String> = sla_risk_cases(&cases, now(), &RiskPolicy::default())
            .iter()
            .map(|r| r.case.id.to_string())
            .collect();
        assert_eq!(ids, vec!["breached", "tie-a", "tie-b", "later"]);
    }
}
