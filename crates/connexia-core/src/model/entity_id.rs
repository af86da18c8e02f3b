// ── Core identity type ──
//
// Every record in every collection is keyed by an `EntityId`. Foreign
// keys (order → site, site → provider) are plain `EntityId` values that
// are resolved through the snapshot, never through object references.

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;
use std::str::FromStr;

/// Canonical identifier for any Connexia record.
///
/// Opaque string as issued by the source system (`"site-fra-01"`,
/// `"ord-1042"`). Comparison is exact and case-sensitive.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(String);

impl EntityId {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for EntityId {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::new(s.trim()))
    }
}

impl From<String> for EntityId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for EntityId {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

impl AsRef<str> for EntityId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for EntityId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn entity_id_display_is_raw_value() {
        let id = EntityId::from("site-fra-01");
        assert_eq!(id.to_string(), "site-fra-01");
    }

    #[test]
    fn entity_id_from_str_trims_whitespace() {
        let id: EntityId = "  ord-1001 ".parse().unwrap();
        assert_eq!(id.as_str(), "ord-1001");
    }

    #[test]
    fn entity_id_is_case_sensitive() {
        assert_ne!(EntityId::from("Site-1"), EntityId::from("site-1"));
    }

    #[test]
    fn entity_id_borrows_as_str_for_map_lookups() {
        let mut map = HashMap::new();
        map.insert(EntityId::from("prov-1"), 7);
        assert_eq!(map.get("prov-1"), Some(&7));
    }

    #[test]
    fn entity_id_serializes_transparently() {
        let json = serde_json::to_string(&EntityId::from("cs-9")).unwrap();
        assert_eq!(json, "\"cs-9\"");
    }
}
