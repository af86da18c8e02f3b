// ── Activity event domain types ──

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString, IntoStaticStr, VariantNames};

use super::entity_id::EntityId;

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
pub enum EventKind {
    OrderCreated,
    OrderUpdated,
    MilestoneStarted,
    MilestoneBlocked,
    MilestoneCompleted,
    CaseOpened,
    CaseUpdated,
    CaseResolved,
    InvoiceIssued,
    InvoicePaid,
    InvoiceDisputed,
}

impl EventKind {
    pub fn label(self) -> &'static str {
        self.into()
    }
}

/// Entry in the append-only activity trail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub id: EntityId,
    pub timestamp: DateTime<Utc>,
    pub kind: EventKind,

    // Related records
    pub site_id: Option<EntityId>,
    pub order_id: Option<EntityId>,
    pub case_id: Option<EntityId>,

    pub summary: String,
}
