//! Order status derivation.
//!
//! An order has no stored state of its own: it is reduced from its
//! milestone list every time it is needed. The reducer is a pure,
//! total function, so repeated calls over an unchanged order always
//! agree.

use serde::Serialize;

use crate::model::{BlockedReason, DeliveryState, Milestone, Order};
use crate::snapshot::Snapshot;

/// Aggregate lifecycle state of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct OrderStatus {
    pub state: DeliveryState,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub blocked_reason: Option<BlockedReason>,
}

impl OrderStatus {
    const fn of(state: DeliveryState) -> Self {
        Self {
            state,
            blocked_reason: None,
        }
    }

    pub fn is_blocked(&self) -> bool {
        matches!(self.state, DeliveryState::Blocked)
    }

    /// Reason label for display, `"unspecified"` when none was recorded.
    pub fn reason_label(&self) -> &'static str {
        self.blocked_reason.map_or("unspecified", BlockedReason::label)
    }
}

/// Reduce a milestone list to an order status.
///
/// First match wins:
/// 1. any milestone blocked → `blocked`, reason of the *first* blocked milestone
/// 2. every milestone done → `done`
/// 3. any milestone in progress or done → `in_progress`
/// 4. otherwise (all planned, or no milestones) → `planned`
pub fn derive_from_milestones(milestones: &[Milestone]) -> OrderStatus {
    if let Some(first_blocked) = milestones.iter().find(|m| m.is_blocked()) {
        return OrderStatus {
            state: DeliveryState::Blocked,
            blocked_reason: first_blocked.blocked_reason,
        };
    }

    if !milestones.is_empty()
        && milestones
            .iter()
            .all(|m| matches!(m.state, DeliveryState::Done))
    {
        return OrderStatus::of(DeliveryState::Done);
    }

    if milestones
        .iter()
        .any(|m| matches!(m.state, DeliveryState::InProgress | DeliveryState::Done))
    {
        return OrderStatus::of(DeliveryState::InProgress);
    }

    OrderStatus::of(DeliveryState::Planned)
}

/// Derive the status of an order.
pub fn derive_status(order: &Order) -> OrderStatus {
    derive_from_milestones(&order.milestones)
}

impl Order {
    pub fn status(&self) -> OrderStatus {
        derive_status(self)
    }
}

impl Snapshot {
    /// Derive the status of an order by id. Unknown ids have no status.
    pub fn order_status(&self, order_id: &str) -> Option<OrderStatus> {
        self.order(order_id).map(|o| o.status())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::model::OwnerTeam;
    use chrono::{TimeZone, Utc};
    use pretty_assertions::assert_eq;

    fn milestone(id: &str, state: DeliveryState, reason: Option<BlockedReason>) -> Milestone {
        Milestone {
            id: id.into(),
            name: format!("step {id}"),
            state,
            blocked_reason: reason,
            owner_team: OwnerTeam::ServiceDelivery,
            updated_at: Utc.with_ymd_and_hms(2025, 3, 1, 9, 0, 0).unwrap(),
        }
    }

    #[test]
    fn empty_milestone_list_is_planned() {
        assert_eq!(
            derive_from_milestones(&[]),
            OrderStatus {
                state: DeliveryState::Planned,
                blocked_reason: None
            }
        );
    }

    #[test]
    fn blocked_wins_and_reports_first_blocked_reason() {
        let ms = [
            milestone("a", DeliveryState::Done, None),
            milestone("b", DeliveryState::Blocked, Some(BlockedReason::AwaitingProvider)),
            milestone("c", DeliveryState::Planned, None),
        ];
        let status = derive_from_milestones(&ms);
        assert_eq!(status.state, DeliveryState::Blocked);
        assert_eq!(status.blocked_reason, Some(BlockedReason::AwaitingProvider));
    }

    #[test]
    fn first_blocked_milestone_decides_reason_even_if_later_ones_differ() {
        let ms = [
            milestone("a", DeliveryState::Blocked, Some(BlockedReason::AwaitingCustomer)),
            milestone("b", DeliveryState::Blocked, Some(BlockedReason::AwaitingProvider)),
        ];
        assert_eq!(
            derive_from_milestones(&ms).blocked_reason,
            Some(BlockedReason::AwaitingCustomer)
        );
    }

    #[test]
    fn blocked_without_reason_is_unspecified() {
        let ms = [milestone("a", DeliveryState::Blocked, None)];
        let status = derive_from_milestones(&ms);
        assert!(status.is_blocked());
        assert_eq!(status.reason_label(), "unspecified");
    }

    #[test]
    fn all_done_is_done() {
        let ms = [
            milestone("a", DeliveryState::Done, None),
            milestone("b", DeliveryState::Done, None),
        ];
        assert_eq!(derive_from_milestones(&ms).state, DeliveryState::Done);
    }

    #[test]
    fn partial_progress_is_in_progress() {
        let ms = [
            milestone("a", DeliveryState::InProgress, None),
            milestone("b", DeliveryState::Planned, None),
        ];
        assert_eq!(derive_from_milestones(&ms).state, DeliveryState::InProgress);

        let ms = [
            milestone("a", DeliveryState::Done, None),
            milestone("b", DeliveryState::Planned, None),
        ];
        assert_eq!(derive_from_milestones(&ms).state, DeliveryState::InProgress);
    }

    #[test]
    fn all_planned_is_planned() {
        let ms = [
            milestone("a", DeliveryState::Planned, None),
            milestone("b", DeliveryState::Planned, None),
        ];
        assert_eq!(derive_from_milestones(&ms).state, DeliveryState::Planned);
    }

    #[test]
    fn derivation_is_idempotent() {
        let ms = [
            milestone("a", DeliveryState::Done, None),
            milestone("b", DeliveryState::Blocked, Some(BlockedReason::Unknown)),
        ];
        assert_eq!(derive_from_milestones(&ms), derive_from_milestones(&ms));
    }

    #[test]
    fn blocked_reason_is_omitted_from_json_when_absent() {
        let json = serde_json::to_string(&OrderStatus::of(DeliveryState::Done)).unwrap();
        assert_eq!(json, r#"{"state":"done"}"#);
    }
}
