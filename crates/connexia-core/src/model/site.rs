// ── Site and provider domain types ──

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString, IntoStaticStr, VariantNames};

use super::entity_id::EntityId;
use crate::aggregate::Category;

/// Commercial region a site is billed and supported from.
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
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE", ascii_case_insensitive)]
pub enum Region {
    Uk,
    Emea,
    Apac,
    Amer,
}

impl Category for Region {
    const ORDERED: &'static [Self] = &[Self::Uk, Self::Emea, Self::Apac, Self::Amer];

    fn label(self) -> &'static str {
        self.into()
    }
}

/// Operational criticality of a site.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    IntoStaticStr,
    VariantNames,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum Criticality {
    #[default]
    Standard,
    Critical,
}

impl Category for Criticality {
    const ORDERED: &'static [Self] = &[Self::Critical, Self::Standard];

    fn label(self) -> &'static str {
        self.into()
    }
}

/// Access / transit provider delivering circuits to sites.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Provider {
    pub id: EntityId,
    pub name: String,
}

/// A customer location served by exactly one provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Site {
    pub id: EntityId,
    /// Human-friendly display name (e.g., "Frankfurt DC").
    pub name: String,
    pub customer: String,
    /// ISO 3166 alpha-2 country code.
    pub country: String,
    pub region: Region,
    pub provider_id: EntityId,
    pub criticality: Criticality,
}

impl Site {
    pub fn is_critical(&self) -> bool {
        matches!(self.criticality, Criticality::Critical)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn region_parses_case_insensitively() {
        assert_eq!("emea".parse::<Region>().unwrap(), Region::Emea);
        assert_eq!("UK".parse::<Region>().unwrap(), Region::Uk);
    }

    #[test]
    fn region_label_is_uppercase() {
        assert_eq!(Region::Apac.label(), "APAC");
        assert_eq!(Region::Amer.to_string(), "AMER");
    }

    #[test]
    fn criticality_lists_critical_first() {
        assert_eq!(
            Criticality::ORDERED,
            &[Criticality::Critical, Criticality::Standard]
        );
    }
}
