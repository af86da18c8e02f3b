//! Dataset documents.
//!
//! A [`Dataset`] bundles the six source collections. It is what a
//! [`DataStore`](crate::DataStore) loads and what the built-in sample
//! fixtures produce.

use std::path::Path;

use strum::{Display, EnumString, IntoStaticStr, VariantNames};

use crate::error::CoreError;
use crate::model::{Case, Event, Invoice, Order, Provider, Site};
use crate::raw::RawDataset;

/// All source collections, in source order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    pub providers: Vec<Provider>,
    pub sites: Vec<Site>,
    pub orders: Vec<Order>,
    pub cases: Vec<Case>,
    pub invoices: Vec<Invoice>,
    pub events: Vec<Event>,
}

/// Document formats a dataset can be read from.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, IntoStaticStr, VariantNames,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum DatasetFormat {
    Json,
    Yaml,
    Toml,
}

impl DatasetFormat {
    /// Pick a format from a file extension (`.json`, `.yaml`/`.yml`, `.toml`).
    pub fn from_path(path: &Path) -> Result<Self, CoreError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or_default()
            .to_ascii_lowercase();
        match ext.as_str() {
            "json" => Ok(Self::Json),
            "yaml" | "yml" => Ok(Self::Yaml),
            "toml" => Ok(Self::Toml),
            _ => Err(CoreError::invalid_value(
                "dataset extension",
                &ext,
                &["json", "yaml", "yml", "toml"],
            )),
        }
    }
}

impl Dataset {
    /// Parse and validate a dataset document.
    pub fn parse(text: &str, format: DatasetFormat) -> Result<Self, CoreError> {
        let raw: RawDataset = match format {
            DatasetFormat::Json => serde_json::from_str(text)?,
            DatasetFormat::Yaml => serde_yaml::from_str(text)?,
            DatasetFormat::Toml => toml::from_str(text)?,
        };
        let dataset = Self::try_from(raw)?;
        tracing::debug!(
            %format,
            sites = dataset.sites.len(),
            orders = dataset.orders.len(),
            cases = dataset.cases.len(),
            "parsed dataset document"
        );
        Ok(dataset)
    }

    /// Total number of records across every collection.
    pub fn len(&self) -> usize {
        self.providers.len()
            + self.sites.len()
            + self.orders.len()
            + self.cases.len()
            + self.invoices.len()
            + self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::model::{DeliveryState, Region};

    const JSON: &str = r#"{
        "providers": [{ "id": "prov-1", "name": "Northwave Fibre" }],
        "sites": [{
            "id": "site-1", "name": "Frankfurt DC", "customer": "Harbor Bank",
            "country": "DE", "region": "EMEA", "providerId": "prov-1",
            "criticality": "critical"
        }],
        "orders": [{
            "id": "ord-1", "siteId": "site-1", "serviceType": "internet",
            "targetDate": "2025-06-10", "createdAt": "2025-05-01T08:00:00Z",
            "milestones": [{
                "id": "m1", "name": "Survey", "state": "done",
                "ownerTeam": "Service Delivery", "updatedAt": "2025-05-02T08:00:00Z"
            }]
        }],
        "events": [{
            "id": "evt-1", "timestamp": "2025-05-02T08:00:00Z",
            "type": "milestone_completed", "orderId": "ord-1", "siteId": "site-1",
            "summary": "Survey completed"
        }]
    }"#;

    #[test]
    fn parses_json_with_missing_collections() {
        let ds = Dataset::parse(JSON, DatasetFormat::Json).unwrap();
        assert_eq!(ds.sites[0].region, Region::Emea);
        assert_eq!(ds.orders[0].milestones[0].state, DeliveryState::Done);
        assert!(ds.cases.is_empty());
        assert_eq!(ds.len(), 4);
    }

    #[test]
    fn parses_yaml() {
        let yaml = "
providers:
  - id: prov-1
    name: Meridian Carrier
sites:
  - id: site-1
    name: London HQ
    customer: Harbor Bank
    country: GB
    region: UK
    providerId: prov-1
";
        let ds = Dataset::parse(yaml, DatasetFormat::Yaml).unwrap();
        assert_eq!(ds.sites[0].name, "London HQ");
    }

    #[test]
    fn parses_toml() {
        let toml = r#"
[[providers]]
id = "prov-1"
name = "Atlas Networks"

[[invoices]]
id = "inv-1"
siteId = "site-1"
period = "2025-04"
amount = 1200.5
status = "disputed"
"#;
        let ds = Dataset::parse(toml, DatasetFormat::Toml).unwrap();
        assert_eq!(ds.invoices[0].period.as_str(), "2025-04");
    }

    #[test]
    fn malformed_document_is_a_dataset_error() {
        let err = Dataset::parse("{ not json", DatasetFormat::Json).unwrap_err();
        assert!(matches!(err, CoreError::Dataset { ref format, .. } if format == "JSON"));
    }

    #[test]
    fn format_follows_extension() {
        assert_eq!(
            DatasetFormat::from_path(Path::new("data/demo.YML")).unwrap(),
            DatasetFormat::Yaml
        );
        assert!(DatasetFormat::from_path(Path::new("data/demo.csv")).is_err());
    }
}
