//! Foreign-key resolvers.
//!
//! All resolvers are total: a dangling reference degrades to a fallback
//! display value instead of failing the whole view.

use std::sync::Arc;

use crate::model::{Case, EntityId, Event, Invoice, Order, Site};
use crate::snapshot::Snapshot;

/// Display name used when a provider reference cannot be resolved.
pub const UNKNOWN_PROVIDER: &str = "Unknown";

/// Records that belong to (at most) one site.
pub trait SiteScoped {
    fn site_id(&self) -> Option<&EntityId>;
}

impl SiteScoped for Site {
    fn site_id(&self) -> Option<&EntityId> {
        Some(&self.id)
    }
}

impl SiteScoped for Order {
    fn site_id(&self) -> Option<&EntityId> {
        Some(&self.site_id)
    }
}

impl SiteScoped for Case {
    fn site_id(&self) -> Option<&EntityId> {
        Some(&self.site_id)
    }
}

impl SiteScoped for Invoice {
    fn site_id(&self) -> Option<&EntityId> {
        Some(&self.site_id)
    }
}

impl SiteScoped for Event {
    fn site_id(&self) -> Option<&EntityId> {
        self.site_id.as_ref()
    }
}

impl<T: SiteScoped> SiteScoped for Arc<T> {
    fn site_id(&self) -> Option<&EntityId> {
        (**self).site_id()
    }
}

impl Snapshot {
    /// Provider display name, or `"Unknown"`.
    pub fn provider_name(&self, provider_id: &EntityId) -> &str {
        self.provider(provider_id.as_str())
            .map_or(UNKNOWN_PROVIDER, |p| p.name.as_str())
    }

    /// Site display name, or the id itself when the site is unknown.
    pub fn site_name<'a>(&'a self, site_id: &'a EntityId) -> &'a str {
        self.site(site_id.as_str())
            .map_or(site_id.as_str(), |s| s.name.as_str())
    }

    /// Provider name of the provider serving a site, or `"Unknown"`.
    pub fn site_provider_name(&self, site_id: &EntityId) -> &str {
        self.site(site_id.as_str())
            .map_or(UNKNOWN_PROVIDER, |s| self.provider_name(&s.provider_id))
    }

    /// Resolve the site a record belongs to.
    pub fn site_of<R: SiteScoped + ?Sized>(&self, record: &R) -> Option<&Arc<Site>> {
        let site = record.site_id().and_then(|id| self.site(id.as_str()));
        if site.is_none() {
            if let Some(id) = record.site_id() {
                tracing::warn!(site_id = %id, "record references unknown site");
            }
        }
        site
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::dataset::Dataset;
    use crate::model::{Criticality, Provider, Region};

    fn snapshot() -> Snapshot {
        Snapshot::from_dataset(Dataset {
            providers: vec![Provider {
                id: "prov-1".into(),
                name: "Northwave Fibre".into(),
            }],
            sites: vec![
                Site {
                    id: "site-1".into(),
                    name: "Frankfurt DC".into(),
                    customer: "Harbor Bank".into(),
                    country: "DE".into(),
                    region: Region::Emea,
                    provider_id: "prov-1".into(),
                    criticality: Criticality::Critical,
                },
                Site {
                    id: "site-2".into(),
                    name: "Orphan Office".into(),
                    customer: "Harbor Bank".into(),
                    country: "GB".into(),
                    region: Region::Uk,
                    provider_id: "prov-gone".into(),
                    criticality: Criticality::Standard,
                },
            ],
            ..Dataset::default()
        })
    }

    #[test]
    fn provider_name_resolves_or_falls_back() {
        let snap = snapshot();
        assert_eq!(snap.provider_name(&"prov-1".into()), "Northwave Fibre");
        assert_eq!(snap.provider_name(&"prov-gone".into()), "Unknown");
    }

    #[test]
    fn site_name_resolves_or_echoes_id() {
        let snap = snapshot();
        let known = EntityId::from("site-1");
        let unknown = EntityId::from("site-404");
        assert_eq!(snap.site_name(&known), "Frankfurt DC");
        assert_eq!(snap.site_name(&unknown), "site-404");
    }

    #[test]
    fn site_provider_name_chains_both_lookups() {
        let snap = snapshot();
        assert_eq!(snap.site_provider_name(&"site-1".into()), "Northwave Fibre");
        assert_eq!(snap.site_provider_name(&"site-2".into()), "Unknown");
        assert_eq!(snap.site_provider_name(&"site-404".into()), "Unknown");
    }

    #[test]
    fn site_of_is_none_for_events_without_site() {
        let snap = snapshot();
        let event = Event {
            id: "evt-1".into(),
            timestamp: chrono::Utc::now(),
            kind: crate::model::EventKind::InvoiceIssued,
            site_id: None,
            order_id: None,
            case_id: None,
            summary: "issued".into(),
        };
        assert!(snap.site_of(&event).is_none());
    }
}
