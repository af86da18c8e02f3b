// ── Order and milestone domain types ──

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString, IntoStaticStr, VariantNames};

use super::entity_id::EntityId;
use crate::aggregate::Category;

/// Product line an order delivers.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    IntoStaticStr,
    VariantNames,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum ServiceType {
    Internet,
    #[serde(rename = "sd-wan")]
    #[strum(serialize = "sd-wan")]
    SdWan,
    Security,
}

impl Category for ServiceType {
    const ORDERED: &'static [Self] = &[Self::Internet, Self::SdWan, Self::Security];

    fn label(self) -> &'static str {
        self.into()
    }
}

/// Lifecycle state shared by milestones and (derived) orders.
///
/// Milestones move forward through this machine; the engine only ever
/// reads the state, it never transitions it.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    IntoStaticStr,
    VariantNames,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum DeliveryState {
    Planned,
    InProgress,
    Blocked,
    Done,
}

impl DeliveryState {
    /// Anything not yet delivered counts as active work.
    pub fn is_active(self) -> bool {
        !matches!(self, Self::Done)
    }
}

impl Category for DeliveryState {
    // Operationally urgent states first.
    const ORDERED: &'static [Self] = &[Self::Blocked, Self::InProgress, Self::Planned, Self::Done];

    fn label(self) -> &'static str {
        self.into()
    }
}

/// Why a milestone cannot progress.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    IntoStaticStr,
    VariantNames,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum BlockedReason {
    AwaitingProvider,
    AwaitingCustomer,
    AwaitingChangeWindow,
    Unknown,
}

impl BlockedReason {
    pub fn label(self) -> &'static str {
        self.into()
    }
}

/// Team accountable for moving a milestone forward.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    IntoStaticStr,
    VariantNames,
)]
#[strum(ascii_case_insensitive)]
pub enum OwnerTeam {
    #[serde(rename = "Service Delivery")]
    #[strum(to_string = "Service Delivery", serialize = "service-delivery", serialize = "service_delivery")]
    ServiceDelivery,
    #[serde(rename = "Provider")]
    #[strum(to_string = "Provider")]
    Provider,
    #[serde(rename = "Customer")]
    #[strum(to_string = "Customer")]
    Customer,
    #[serde(rename = "NOC")]
    #[strum(to_string = "NOC")]
    Noc,
}

impl OwnerTeam {
    pub fn label(self) -> &'static str {
        self.into()
    }
}

/// A single delivery step inside an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Milestone {
    pub id: EntityId,
    pub name: String,
    pub state: DeliveryState,
    /// Only meaningful while `state == Blocked`.
    pub blocked_reason: Option<BlockedReason>,
    pub owner_team: OwnerTeam,
    pub updated_at: DateTime<Utc>,
}

impl Milestone {
    pub fn is_blocked(&self) -> bool {
        matches!(self.state, DeliveryState::Blocked)
    }
}

/// A service order for one site, tracked through its milestones.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub id: EntityId,
    pub site_id: EntityId,
    pub service_type: ServiceType,
    pub target_date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    /// In delivery order. May be empty for freshly created orders.
    pub milestones: Vec<Milestone>,
}

impl Order {
    /// Blocked milestones in list order.
    pub fn blocked_milestones(&self) -> impl Iterator<Item = &Milestone> {
        self.milestones.iter().filter(|m| m.is_blocked())
    }

    /// Does any blocked milestone belong to `team`?
    pub fn is_blocked_on(&self, team: OwnerTeam) -> bool {
        self.blocked_milestones().any(|m| m.owner_team == team)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn service_type_uses_hyphenated_sd_wan() {
        assert_eq!(ServiceType::SdWan.label(), "sd-wan");
        assert_eq!("SD-WAN".parse::<ServiceType>().unwrap(), ServiceType::SdWan);
        assert_eq!(
            serde_json::to_string(&ServiceType::SdWan).unwrap(),
            "\"sd-wan\""
        );
    }

    #[test]
    fn owner_team_accepts_display_and_slug_forms() {
        assert_eq!(
            "Service Delivery".parse::<OwnerTeam>().unwrap(),
            OwnerTeam::ServiceDelivery
        );
        assert_eq!(
            "service-delivery".parse::<OwnerTeam>().unwrap(),
            OwnerTeam::ServiceDelivery
        );
        assert_eq!("noc".parse::<OwnerTeam>().unwrap(), OwnerTeam::Noc);
        assert_eq!(OwnerTeam::Noc.label(), "NOC");
    }

    #[test]
    fn delivery_state_chip_order_is_urgent_first() {
        assert_eq!(
            DeliveryState::ORDERED,
            &[
                DeliveryState::Blocked,
                DeliveryState::InProgress,
                DeliveryState::Planned,
                DeliveryState::Done,
            ]
        );
    }

    #[test]
    fn blocked_reason_label_is_snake_case() {
        assert_eq!(
            BlockedReason::AwaitingChangeWindow.label(),
            "awaiting_change_window"
        );
    }
}
