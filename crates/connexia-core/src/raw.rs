//! Raw dataset record types.
//!
//! These mirror the fixture documents the dashboard ships with: camelCase
//! field names, string timestamps, string enum values. Nothing here is
//! validated; `crate::convert` turns them into domain types.

use serde::{Deserialize, Serialize};

/// A whole dataset document. Missing collections default to empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawDataset {
    #[serde(default)]
    pub providers: Vec<RawProvider>,
    #[serde(default)]
    pub sites: Vec<RawSite>,
    #[serde(default)]
    pub orders: Vec<RawOrder>,
    #[serde(default)]
    pub cases: Vec<RawCase>,
    #[serde(default)]
    pub invoices: Vec<RawInvoice>,
    #[serde(default)]
    pub events: Vec<RawEvent>,
}

// ── Sites & providers ────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawProvider {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawSite {
    pub id: String,
    pub name: String,
    pub customer: String,
    pub country: String,
    /// `UK`, `EMEA`, `APAC` or `AMER`.
    pub region: String,
    pub provider_id: String,
    /// `standard` or `critical`; absent means standard.
    #[serde(default)]
    pub criticality: Option<String>,
}

// ── Orders ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawMilestone {
    pub id: String,
    pub name: String,
    pub state: String,
    #[serde(default)]
    pub blocked_reason: Option<String>,
    pub owner_team: String,
    /// ISO 8601 date-time.
    pub updated_at: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawOrder {
    pub id: String,
    pub site_id: String,
    pub service_type: String,
    /// ISO 8601 date or date-time.
    pub target_date: String,
    pub created_at: String,
    #[serde(default)]
    pub milestones: Vec<RawMilestone>,
}

// ── Cases ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawCase {
    pub id: String,
    pub site_id: String,
    pub title: String,
    pub severity: String,
    pub status: String,
    pub owner_team: String,
    pub opened_at: String,
    pub sla_due_at: String,
}

// ── Billing ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawInvoice {
    pub id: String,
    pub site_id: String,
    /// `YYYY-MM`.
    pub period: String,
    pub amount: f64,
    pub status: String,
}

// ── Activity ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawEvent {
    pub id: String,
    pub timestamp: String,
    #[serde(rename = "type", alias = "kind")]
    pub kind: String,
    #[serde(default)]
    pub site_id: Option<String>,
    #[serde(default)]
    pub order_id: Option<String>,
    #[serde(default)]
    pub case_id: Option<String>,
    pub summary: String,
}
