// ── Consistent read snapshot ──
//
// One derivation pass works on one `Snapshot`. Capturing all six
// collections up front means an order counted as blocked in one view
// cannot show up as done in a sibling view of the same render.

use std::collections::HashMap;
use std::sync::Arc;

use crate::dataset::Dataset;
use crate::error::CoreError;
use crate::model::{Case, EntityId, Event, Invoice, Order, Provider, Site};
use crate::store::{Records, Repository};

/// Read-only capture of every source collection plus id indexes for
/// the foreign keys derivations resolve most often.
#[derive(Debug, Clone)]
pub struct Snapshot {
    providers: Records<Provider>,
    sites: Records<Site>,
    orders: Records<Order>,
    cases: Records<Case>,
    invoices: Records<Invoice>,
    events: Records<Event>,

    provider_index: HashMap<EntityId, usize>,
    site_index: HashMap<EntityId, usize>,
}

impl Snapshot {
    /// Read every collection from `repo` once.
    pub fn capture(repo: &dyn Repository) -> Result<Self, CoreError> {
        let snapshot = Self::from_records(
            repo.providers()?,
            repo.sites()?,
            repo.orders()?,
            repo.cases()?,
            repo.invoices()?,
            repo.events()?,
        );
        tracing::debug!(
            sites = snapshot.sites.len(),
            orders = snapshot.orders.len(),
            cases = snapshot.cases.len(),
            invoices = snapshot.invoices.len(),
            events = snapshot.events.len(),
            "captured snapshot"
        );
        Ok(snapshot)
    }

    /// Wrap an owned dataset without going through a store.
    pub fn from_dataset(dataset: Dataset) -> Self {
        fn wrap<T>(items: Vec<T>) -> Records<T> {
            Arc::new(items.into_iter().map(Arc::new).collect())
        }

        Self::from_records(
            wrap(dataset.providers),
            wrap(dataset.sites),
            wrap(dataset.orders),
            wrap(dataset.cases),
            wrap(dataset.invoices),
            wrap(dataset.events),
        )
    }

    fn from_records(
        providers: Records<Provider>,
        sites: Records<Site>,
        orders: Records<Order>,
        cases: Records<Case>,
        invoices: Records<Invoice>,
        events: Records<Event>,
    ) -> Self {
        // First occurrence wins if a repository ever hands out duplicates.
        let mut provider_index = HashMap::with_capacity(providers.len());
        for (idx, p) in providers.iter().enumerate() {
            provider_index.entry(p.id.clone()).or_insert(idx);
        }
        let mut site_index = HashMap::with_capacity(sites.len());
        for (idx, s) in sites.iter().enumerate() {
            site_index.entry(s.id.clone()).or_insert(idx);
        }

        Self {
            providers,
            sites,
            orders,
            cases,
            invoices,
            events,
            provider_index,
            site_index,
        }
    }

    // ── Collections ──────────────────────────────────────────────────

    pub fn providers(&self) -> &[Arc<Provider>] {
        &self.providers
    }

    pub fn sites(&self) -> &[Arc<Site>] {
        &self.sites
    }

    pub fn orders(&self) -> &[Arc<Order>] {
        &self.orders
    }

    pub fn cases(&self) -> &[Arc<Case>] {
        &self.cases
    }

    pub fn invoices(&self) -> &[Arc<Invoice>] {
        &self.invoices
    }

    pub fn events(&self) -> &[Arc<Event>] {
        &self.events
    }

    // ── Single-record lookups ────────────────────────────────────────

    pub fn provider(&self, id: &str) -> Option<&Arc<Provider>> {
        self.provider_index
            .get(id)
            .and_then(|&idx| self.providers.get(idx))
    }

    pub fn site(&self, id: &str) -> Option<&Arc<Site>> {
        self.site_index.get(id).and_then(|&idx| self.sites.get(idx))
    }

    pub fn order(&self, id: &str) -> Option<&Arc<Order>> {
        self.orders.iter().find(|o| o.id.as_str() == id)
    }

    pub fn case(&self, id: &str) -> Option<&Arc<Case>> {
        self.cases.iter().find(|c| c.id.as_str() == id)
    }

    /// Like [`Snapshot::site`], but a miss is an error for detail views.
    pub fn require_site(&self, id: &str) -> Result<&Arc<Site>, CoreError> {
        self.site(id).ok_or_else(|| CoreError::not_found("site", id))
    }

    pub fn require_order(&self, id: &str) -> Result<&Arc<Order>, CoreError> {
        self.order(id).ok_or_else(|| CoreError::not_found("order", id))
    }

    pub fn require_case(&self, id: &str) -> Result<&Arc<Case>, CoreError> {
        self.case(id).ok_or_else(|| CoreError::not_found("case", id))
    }

    pub fn require_provider(&self, id: &str) -> Result<&Arc<Provider>, CoreError> {
        self.provider(id)
            .ok_or_else(|| CoreError::not_found("provider", id))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::fixtures::sample_dataset;
    use crate::store::DataStore;
    use chrono::{TimeZone, Utc};

    #[test]
    fn capture_matches_store_contents() {
        let anchor = Utc.with_ymd_and_hms(2025, 6, 2, 9, 0, 0).unwrap();
        let store = DataStore::from_dataset(sample_dataset(anchor)).unwrap();
        let snap = Snapshot::capture(&store).unwrap();

        assert_eq!(snap.sites().len(), store.sites().unwrap().len());
        assert_eq!(snap.orders().len(), store.orders().unwrap().len());
        assert!(snap.site("site-fra-01").is_some());
    }

    #[test]
    fn require_lookups_report_not_found() {
        let snap = Snapshot::from_dataset(Dataset::default());
        let err = snap.require_order("ord-missing").unwrap_err();
        assert!(matches!(
            err,
            CoreError::NotFound { ref entity_type, ref identifier }
                if entity_type == "order" && identifier == "ord-missing"
        ));
    }
}
