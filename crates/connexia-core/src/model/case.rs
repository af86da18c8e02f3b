// ── Support case domain types ──

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString, IntoStaticStr, VariantNames};

use super::entity_id::EntityId;
use crate::aggregate::Category;

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    IntoStaticStr,
    VariantNames,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Severity {
    Sev1,
    Sev2,
    Sev3,
}

impl Category for Severity {
    const ORDERED: &'static [Self] = &[Self::Sev1, Self::Sev2, Self::Sev3];

    fn label(self) -> &'static str {
        self.into()
    }
}

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
pub enum CaseStatus {
    Open,
    Investigating,
    Waiting,
    Resolved,
}

impl CaseStatus {
    pub fn is_resolved(self) -> bool {
        matches!(self, Self::Resolved)
    }
}

impl Category for CaseStatus {
    const ORDERED: &'static [Self] = &[Self::Open, Self::Investigating, Self::Waiting, Self::Resolved];

    fn label(self) -> &'static str {
        self.into()
    }
}

/// Team currently holding a case.
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
pub enum CaseTeam {
    #[serde(rename = "NOC")]
    #[strum(to_string = "NOC")]
    Noc,
    #[serde(rename = "Service Delivery")]
    #[strum(to_string = "Service Delivery", serialize = "service-delivery", serialize = "service_delivery")]
    ServiceDelivery,
    #[serde(rename = "Provider")]
    #[strum(to_string = "Provider")]
    Provider,
}

impl Category for CaseTeam {
    const ORDERED: &'static [Self] = &[Self::Noc, Self::ServiceDelivery, Self::Provider];

    fn label(self) -> &'static str {
        self.into()
    }
}

/// An incident or service request raised against a site.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Case {
    pub id: EntityId,
    pub site_id: EntityId,
    pub title: String,
    pub severity: Severity,
    pub status: CaseStatus,
    pub owner_team: CaseTeam,
    pub opened_at: DateTime<Utc>,
    pub sla_due_at: DateTime<Utc>,
}

impl Case {
    pub fn is_open(&self) -> bool {
        !self.status.is_resolved()
    }
}
