// ── Unified domain model ──
//
// Every type in this module is the canonical, read-only representation of
// a Connexia record. Raw fixture documents are converted into these types
// by `crate::convert`; derivations never see the raw form.

pub mod entity_id;

pub mod case;
pub mod event;
pub mod invoice;
pub mod order;
pub mod site;

// ── Re-exports ──────────────────────────────────────────────────────
// Flat access: `use connexia_core::model::*` gives you everything.

// Core identity
pub use entity_id::EntityId;

// Sites & providers
pub use site::{Criticality, Provider, Region, Site};

// Orders
pub use order::{BlockedReason, DeliveryState, Milestone, Order, OwnerTeam, ServiceType};

// Cases
pub use case::{Case, CaseStatus, CaseTeam, Severity};

// Billing
pub use invoice::{BillingPeriod, Invoice, InvoiceStatus};

// Activity
pub use event::{Event, EventKind};
