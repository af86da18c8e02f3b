//! Derived-metrics engine for the Connexia service delivery dashboard.
//!
//! This crate turns flat record collections (providers, sites, orders with
//! milestones, cases, invoices, events) into the numbers a delivery team
//! looks at: order status, chip counts, at-risk lists and drill-through
//! links. Everything is synchronous and pure over an explicit `now`.
//!
//! - **[`DataStore`]**: In-memory [`Repository`] over insertion-ordered
//!   collections. Load a [`Dataset`] (parsed from JSON / YAML / TOML, or the
//!   built-in [`fixtures::sample_dataset`]) and capture a [`Snapshot`].
//!
//! - **[`Snapshot`]**: One consistent read of all six collections. Every
//!   derivation works on a snapshot, so sibling views of one render agree.
//!
//! - **Derivations**: [`status`] reduces milestones to an order status,
//!   [`lookup`] resolves foreign keys to display names, [`filter`] composes
//!   criteria, [`aggregate`] counts by dimension, [`risk`] ranks at-risk
//!   orders and SLA cases, [`metrics`] assembles the dashboard and
//!   site / provider overviews, [`links`] renders chip links.

pub mod aggregate;
pub mod convert;
pub mod dataset;
pub mod error;
pub mod filter;
pub mod fixtures;
pub mod links;
pub mod lookup;
pub mod metrics;
pub mod model;
pub mod raw;
pub mod risk;
pub mod snapshot;
pub mod status;
pub mod store;

// ── Primary re-exports ──────────────────────────────────────────────
pub use aggregate::{BillingTotals, CaseDimension, Category, CategoryCount, OrderDimension, Tally};
pub use dataset::{Dataset, DatasetFormat};
pub use error::CoreError;
pub use filter::{
    CaseCriteria, Criteria, EventCriteria, InvoiceCriteria, OrderCriteria, Scope, SiteCriteria,
};
pub use links::{Chip, href};
pub use metrics::{DashboardSummary, ProviderOverview, SiteOverview};
pub use risk::{AtRiskOrder, RiskPolicy, SlaRiskCase};
pub use snapshot::Snapshot;
pub use status::OrderStatus;
pub use store::{DataStore, Repository};

// Re-export model types at the crate root for ergonomics.
pub use model::{
    BillingPeriod, BlockedReason, Case, CaseStatus, CaseTeam, Criticality, DeliveryState, EntityId,
    Event, EventKind, Invoice, InvoiceStatus, Milestone, Order, OwnerTeam, Provider, Region,
    ServiceType, Severity, Site,
};
