// ── Data access ──
//
// Derivations never read fixtures or databases directly. They take a
// `Snapshot`, which is captured once per pass through the `Repository`
// capability below. `DataStore` is the in-memory implementation.

pub(crate) mod collection;
mod data_store;

pub use collection::Records;
pub use data_store::DataStore;

use crate::error::CoreError;
use crate::model::{Case, Event, Invoice, Order, Provider, Site};

/// Read access to the six source collections.
///
/// Each call returns the collection in source order. Implementations
/// backed by mutable storage should hand out immutable copies so that a
/// snapshot captured from them stays consistent.
pub trait Repository {
    fn providers(&self) -> Result<Records<Provider>, CoreError>;
    fn sites(&self) -> Result<Records<Site>, CoreError>;
    fn orders(&self) -> Result<Records<Order>, CoreError>;
    fn cases(&self) -> Result<Records<Case>, CoreError>;
    fn invoices(&self) -> Result<Records<Invoice>, CoreError>;
    fn events(&self) -> Result<Records<Event>, CoreError>;
}
