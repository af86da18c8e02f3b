// ── In-memory data store ──
//
// Holds the six collections for the lifetime of a process. Loading a
// dataset replaces every collection at once; readers that already hold
// a snapshot keep seeing the old data.

use super::Repository;
use super::collection::{EntityCollection, Records};
use crate::dataset::Dataset;
use crate::error::CoreError;
use crate::model::{Case, Event, Invoice, Order, Provider, Site};

/// In-memory repository over insertion-ordered collections.
pub struct DataStore {
    providers: EntityCollection<Provider>,
    sites: EntityCollection<Site>,
    orders: EntityCollection<Order>,
    cases: EntityCollection<Case>,
    invoices: EntityCollection<Invoice>,
    events: EntityCollection<Event>,
}

impl DataStore {
    pub fn new() -> Self {
        Self {
            providers: EntityCollection::new(),
            sites: EntityCollection::new(),
            orders: EntityCollection::new(),
            cases: EntityCollection::new(),
            invoices: EntityCollection::new(),
            events: EntityCollection::new(),
        }
    }

    /// Build a store from a dataset, rejecting duplicate ids per collection.
    pub fn from_dataset(dataset: Dataset) -> Result<Self, CoreError> {
        let mut store = Self::new();
        store.load(dataset)?;
        Ok(store)
    }

    /// Replace every collection with the contents of `dataset`.
    ///
    /// All six collections are validated before any of them is swapped in,
    /// so a failed load leaves the store untouched.
    pub fn load(&mut self, dataset: Dataset) -> Result<(), CoreError> {
        let Dataset {
            providers,
            sites,
            orders,
            cases,
            invoices,
            events,
        } = dataset;

        let providers = EntityCollection::try_from_records(
            "provider",
            providers.into_iter().map(|p| (p.id.clone(), p)),
        )?;
        let sites = EntityCollection::try_from_records(
            "site",
            sites.into_iter().map(|s| (s.id.clone(), s)),
        )?;
        let orders = EntityCollection::try_from_records(
            "order",
            orders.into_iter().map(|o| (o.id.clone(), o)),
        )?;
        let cases = EntityCollection::try_from_records(
            "case",
            cases.into_iter().map(|c| (c.id.clone(), c)),
        )?;
        let invoices = EntityCollection::try_from_records(
            "invoice",
            invoices.into_iter().map(|i| (i.id.clone(), i)),
        )?;
        let events = EntityCollection::try_from_records(
            "event",
            events.into_iter().map(|e| (e.id.clone(), e)),
        )?;

        self.providers.replace_with(providers);
        self.sites.replace_with(sites);
        self.orders.replace_with(orders);
        self.cases.replace_with(cases);
        self.invoices.replace_with(invoices);
        self.events.replace_with(events);

        tracing::debug!(
            providers = self.providers.len(),
            sites = self.sites.len(),
            orders = self.orders.len(),
            cases = self.cases.len(),
            invoices = self.invoices.len(),
            events = self.events.len(),
            generation = self.generation(),
            "dataset loaded into store"
        );
        Ok(())
    }

    /// Sum of collection versions; changes whenever any collection changes.
    fn generation(&self) -> u64 {
        self.providers.version()
            + self.sites.version()
            + self.orders.version()
            + self.cases.version()
            + self.invoices.version()
            + self.events.version()
    }
}

impl Default for DataStore {
    fn default() -> Self {
        Self::new()
    }
}

impl Repository for DataStore {
    fn providers(&self) -> Result<Records<Provider>, CoreError> {
        Ok(self.providers.snapshot())
    }

    fn sites(&self) -> Result<Records<Site>, CoreError> {
        Ok(self.sites.snapshot())
    }

    fn orders(&self) -> Result<Records<Order>, CoreError> {
        Ok(self.orders.snapshot())
    }

    fn cases(&self) -> Result<Records<Case>, CoreError> {
        Ok(self.cases.snapshot())
    }

    fn invoices(&self) -> Result<Records<Invoice>, CoreError> {
        Ok(self.invoices.snapshot())
    }

    fn events(&self) -> Result<Records<Event>, CoreError> {
        Ok(self.events.snapshot())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::dataset::Dataset;
    use crate::fixtures::sample_dataset;
    use chrono::{TimeZone, Utc};

    fn anchor() -> chrono::DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 2, 9, 0, 0).unwrap()
    }

    #[test]
    fn from_dataset_exposes_every_collection() {
        let ds = sample_dataset(anchor());
        let (sites, orders, cases) = (ds.sites.len(), ds.orders.len(), ds.cases.len());
        let store = DataStore::from_dataset(ds).unwrap();

        assert_eq!(store.sites().unwrap().len(), sites);
        assert_eq!(store.orders().unwrap().len(), orders);
        assert_eq!(store.cases().unwrap().len(), cases);
    }

    #[test]
    fn failed_load_leaves_store_untouched() {
        let mut store = DataStore::from_dataset(sample_dataset(anchor())).unwrap();
        let before = store.sites().unwrap();
        let generation = store.generation();

        let mut bad = sample_dataset(anchor());
        let dup = bad.orders[0].clone();
        bad.orders.push(dup);

        let err = store.load(bad).unwrap_err();
        assert!(matches!(err, CoreError::DuplicateId { ref entity_type, .. } if entity_type == "order"));
        assert_eq!(store.sites().unwrap().len(), before.len());
        assert_eq!(store.generation(), generation);
    }

    #[test]
    fn reload_bumps_generation() {
        let mut store = DataStore::from_dataset(Dataset::default()).unwrap();
        let generation = store.generation();
        store.load(sample_dataset(anchor())).unwrap();
        assert!(store.generation() > generation);
    }

    #[test]
    fn snapshots_handed_out_before_reload_keep_old_data() {
        let mut store = DataStore::from_dataset(sample_dataset(anchor())).unwrap();
        let held = store.sites().unwrap();
        store.load(Dataset::default()).unwrap();

        assert!(!held.is_empty());
        assert!(store.sites().unwrap().is_empty());
        assert_eq!(held[0].id.as_str(), "site-lon-01");
    }
}
