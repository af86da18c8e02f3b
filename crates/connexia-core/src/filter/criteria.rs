// ── Filter criteria records ──
//
// One record per filterable collection. Every field is optional and an
// unset field never constrains. Criteria serialize to and from URL query
// strings so chips and drill-through links can carry them.

use chrono::{DateTime, SecondsFormat, Utc};

use crate::convert::{parse_timestamp, parse_value};
use crate::error::CoreError;
use crate::model::{
    BillingPeriod, BlockedReason, CaseStatus, CaseTeam, Criticality, DeliveryState, EntityId,
    EventKind, InvoiceStatus, OwnerTeam, Region, ServiceType, Severity,
};

fn parse_flag(field: &str, value: &str) -> Result<bool, CoreError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(CoreError::invalid_value(field, value, &["true", "false"])),
    }
}

fn non_blank(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_owned())
}

/// Common behaviour of every criteria record.
pub trait Criteria: Default + Sized {
    /// `(key, value)` for every field that is set, in a stable order.
    fn to_pairs(&self) -> Vec<(&'static str, String)>;

    /// Set one field from a query-string pair. Unknown keys are ignored.
    fn set_pair(&mut self, key: &str, value: &str) -> Result<(), CoreError>;

    fn is_empty(&self) -> bool {
        self.to_pairs().is_empty()
    }

    /// Form-urlencoded query string (without the leading `?`).
    fn to_query(&self) -> String {
        let mut serializer = url::form_urlencoded::Serializer::new(String::new());
        for (key, value) in self.to_pairs() {
            serializer.append_pair(key, &value);
        }
        serializer.finish()
    }

    /// Parse a query string. Accepts a bare query, `?query`, or a full
    /// `/path?query` link. Blank values are treated as unset.
    fn from_query(query: &str) -> Result<Self, CoreError> {
        let query = query.split_once('?').map_or(query, |(_, q)| q);
        let mut criteria = Self::default();
        for (key, value) in url::form_urlencoded::parse(query.as_bytes()) {
            if value.trim().is_empty() {
                continue;
            }
            criteria.set_pair(&key, &value)?;
        }
        Ok(criteria)
    }

    /// Layer `self` over `base`: fields set here win, the rest come from `base`.
    fn over(self, mut base: Self) -> Result<Self, CoreError> {
        for (key, value) in self.to_pairs() {
            base.set_pair(key, &value)?;
        }
        Ok(base)
    }
}

fn push<T: ToString>(pairs: &mut Vec<(&'static str, String)>, key: &'static str, value: Option<&T>) {
    if let Some(v) = value {
        pairs.push((key, v.to_string()));
    }
}

fn push_query(pairs: &mut Vec<(&'static str, String)>, query: Option<&String>) {
    if let Some(q) = query.and_then(|q| non_blank(q)) {
        pairs.push(("q", q));
    }
}

fn push_flag(pairs: &mut Vec<(&'static str, String)>, key: &'static str, flag: bool) {
    if flag {
        pairs.push((key, "true".to_owned()));
    }
}

// ── Sites ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SiteCriteria {
    pub provider_id: Option<EntityId>,
    pub region: Option<Region>,
    pub criticality: Option<Criticality>,
    pub query: Option<String>,
}

impl Criteria for SiteCriteria {
    fn to_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        push(&mut pairs, "provider", self.provider_id.as_ref());
        push(&mut pairs, "region", self.region.as_ref());
        push(&mut pairs, "criticality", self.criticality.as_ref());
        push_query(&mut pairs, self.query.as_ref());
        pairs
    }

    fn set_pair(&mut self, key: &str, value: &str) -> Result<(), CoreError> {
        match key {
            "provider" => self.provider_id = Some(EntityId::new(value.trim())),
            "region" => self.region = Some(parse_value(key, value)?),
            "criticality" => self.criticality = Some(parse_value(key, value)?),
            "q" => self.query = non_blank(value),
            _ => {}
        }
        Ok(())
    }
}

// ── Orders ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderCriteria {
    pub site_id: Option<EntityId>,
    pub provider_id: Option<EntityId>,
    pub region: Option<Region>,
    pub service_type: Option<ServiceType>,
    /// Derived order state.
    pub status: Option<DeliveryState>,
    /// Derived blocked reason (first blocked milestone).
    pub blocked_reason: Option<BlockedReason>,
    /// Any blocked milestone owned by this team.
    pub blocked_owner_team: Option<OwnerTeam>,
    pub query: Option<String>,
    pub at_risk: bool,
}

impl Criteria for OrderCriteria {
    fn to_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        push(&mut pairs, "site", self.site_id.as_ref());
        push(&mut pairs, "provider", self.provider_id.as_ref());
        push(&mut pairs, "region", self.region.as_ref());
        push(&mut pairs, "service_type", self.service_type.as_ref());
        push(&mut pairs, "status", self.status.as_ref());
        push(&mut pairs, "blocked_reason", self.blocked_reason.as_ref());
        push(&mut pairs, "owner_team", self.blocked_owner_team.as_ref());
        push_query(&mut pairs, self.query.as_ref());
        push_flag(&mut pairs, "at_risk", self.at_risk);
        pairs
    }

    fn set_pair(&mut self, key: &str, value: &str) -> Result<(), CoreError> {
        match key {
            "site" => self.site_id = Some(EntityId::new(value.trim())),
            "provider" => self.provider_id = Some(EntityId::new(value.trim())),
            "region" => self.region = Some(parse_value(key, value)?),
            "service_type" => self.service_type = Some(parse_value(key, value)?),
            "status" => self.status = Some(parse_value(key, value)?),
            "blocked_reason" => self.blocked_reason = Some(parse_value(key, value)?),
            "owner_team" => self.blocked_owner_team = Some(parse_value(key, value)?),
            "q" => self.query = non_blank(value),
            "at_risk" => self.at_risk = parse_flag(key, value)?,
            _ => {}
        }
        Ok(())
    }
}

// ── Cases ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CaseCriteria {
    pub site_id: Option<EntityId>,
    pub provider_id: Option<EntityId>,
    pub region: Option<Region>,
    pub severity: Option<Severity>,
    pub status: Option<CaseStatus>,
    pub owner_team: Option<CaseTeam>,
    pub query: Option<String>,
    /// Only cases that are not resolved.
    pub open: bool,
    pub sla_risk: bool,
}

impl Criteria for CaseCriteria {
    fn to_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        push(&mut pairs, "site", self.site_id.as_ref());
        push(&mut pairs, "provider", self.provider_id.as_ref());
        push(&mut pairs, "region", self.region.as_ref());
        push(&mut pairs, "severity", self.severity.as_ref());
        push(&mut pairs, "status", self.status.as_ref());
        push(&mut pairs, "owner_team", self.owner_team.as_ref());
        push_query(&mut pairs, self.query.as_ref());
        push_flag(&mut pairs, "open", self.open);
        push_flag(&mut pairs, "sla_risk", self.sla_risk);
        pairs
    }

    fn set_pair(&mut self, key: &str, value: &str) -> Result<(), CoreError> {
        match key {
            "site" => self.site_id = Some(EntityId::new(value.trim())),
            "provider" => self.provider_id = Some(EntityId::new(value.trim())),
            "region" => self.region = Some(parse_value(key, value)?),
            "severity" => self.severity = Some(parse_value(key, value)?),
            "status" => self.status = Some(parse_value(key, value)?),
            "owner_team" => self.owner_team = Some(parse_value(key, value)?),
            "q" => self.query = non_blank(value),
            "open" => self.open = parse_flag(key, value)?,
            "sla_risk" => self.sla_risk = parse_flag(key, value)?,
            _ => {}
        }
        Ok(())
    }
}

// ── Invoices ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InvoiceCriteria {
    pub site_id: Option<EntityId>,
    pub provider_id: Option<EntityId>,
    pub region: Option<Region>,
    pub status: Option<InvoiceStatus>,
    pub period: Option<BillingPeriod>,
    pub query: Option<String>,
}

impl Criteria for InvoiceCriteria {
    fn to_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        push(&mut pairs, "site", self.site_id.as_ref());
        push(&mut pairs, "provider", self.provider_id.as_ref());
        push(&mut pairs, "region", self.region.as_ref());
        push(&mut pairs, "status", self.status.as_ref());
        push(&mut pairs, "period", self.period.as_ref());
        push_query(&mut pairs, self.query.as_ref());
        pairs
    }

    fn set_pair(&mut self, key: &str, value: &str) -> Result<(), CoreError> {
        match key {
            "site" => self.site_id = Some(EntityId::new(value.trim())),
            "provider" => self.provider_id = Some(EntityId::new(value.trim())),
            "region" => self.region = Some(parse_value(key, value)?),
            "status" => self.status = Some(parse_value(key, value)?),
            "period" => self.period = Some(value.parse()?),
            "q" => self.query = non_blank(value),
            _ => {}
        }
        Ok(())
    }
}

// ── Events ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventCriteria {
    pub site_id: Option<EntityId>,
    pub provider_id: Option<EntityId>,
    pub region: Option<Region>,
    pub order_id: Option<EntityId>,
    pub case_id: Option<EntityId>,
    pub kind: Option<EventKind>,
    /// Inclusive lower bound on the event timestamp.
    pub since: Option<DateTime<Utc>>,
    pub query: Option<String>,
}

impl Criteria for EventCriteria {
    fn to_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        push(&mut pairs, "site", self.site_id.as_ref());
        push(&mut pairs, "provider", self.provider_id.as_ref());
        push(&mut pairs, "region", self.region.as_ref());
        push(&mut pairs, "order", self.order_id.as_ref());
        push(&mut pairs, "case", self.case_id.as_ref());
        push(&mut pairs, "kind", self.kind.as_ref());
        if let Some(since) = self.since {
            pairs.push(("since", since.to_rfc3339_opts(SecondsFormat::AutoSi, true)));
        }
        push_query(&mut pairs, self.query.as_ref());
        pairs
    }

    fn set_pair(&mut self, key: &str, value: &str) -> Result<(), CoreError> {
        match key {
            "site" => self.site_id = Some(EntityId::new(value.trim())),
            "provider" => self.provider_id = Some(EntityId::new(value.trim())),
            "region" => self.region = Some(parse_value(key, value)?),
            "order" => self.order_id = Some(EntityId::new(value.trim())),
            "case" => self.case_id = Some(EntityId::new(value.trim())),
            "kind" => self.kind = Some(parse_value(key, value)?),
            "since" => self.since = Some(parse_timestamp(key, value)?),
            "q" => self.query = non_blank(value),
            _ => {}
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    #[test]
    fn order_criteria_round_trip_through_query_string() {
        let criteria = OrderCriteria {
            region: Some(Region::Emea),
            status: Some(DeliveryState::Blocked),
            blocked_owner_team: Some(OwnerTeam::ServiceDelivery),
            query: Some("frankfurt dc".into()),
            at_risk: true,
            ..OrderCriteria::default()
        };
        let query = criteria.to_query();
        assert_eq!(
            query,
            "region=EMEA&status=blocked&owner_team=Service+Delivery&q=frankfurt+dc&at_risk=true"
        );
        assert_eq!(OrderCriteria::from_query(&query).unwrap(), criteria);
    }

    #[test]
    fn from_query_accepts_full_links_and_ignores_unknown_keys() {
        let criteria = CaseCriteria::from_query("/cases?severity=sev1&page=2&status=").unwrap();
        assert_eq!(
            criteria,
            CaseCriteria {
                severity: Some(Severity::Sev1),
                ..CaseCriteria::default()
            }
        );
    }

    #[test]
    fn invalid_enum_value_is_a_validation_error() {
        let err = OrderCriteria::from_query("status=stuck").unwrap_err();
        match err {
            CoreError::InvalidValue {
                field,
                value,
                expected,
            } => {
                assert_eq!(field, "status");
                assert_eq!(value, "stuck");
                assert!(expected.contains("in_progress"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn invalid_since_is_an_invalid_date() {
        let err = EventCriteria::from_query("since=yesterday").unwrap_err();
        assert!(matches!(err, CoreError::InvalidDate { ref field, .. } if field == "since"));
    }

    #[test]
    fn event_since_round_trips() {
        let criteria = EventCriteria {
            since: Some(Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap()),
            ..EventCriteria::default()
        };
        assert_eq!(criteria.to_query(), "since=2025-06-01T00%3A00%3A00Z");
        assert_eq!(EventCriteria::from_query(&criteria.to_query()).unwrap(), criteria);

        let precise = EventCriteria {
            since: Some(
                Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap()
                    + chrono::Duration::milliseconds(500),
            ),
            ..EventCriteria::default()
        };
        assert_eq!(precise.to_query(), "since=2025-06-01T00%3A00%3A00.500Z");
        assert_eq!(EventCriteria::from_query(&precise.to_query()).unwrap(), precise);
        assert_eq!(
            precise.clone().over(EventCriteria::default()).unwrap(),
            precise
        );
    }

    #[test]
    fn blank_query_is_unset() {
        let criteria = SiteCriteria {
            query: Some("   ".into()),
            ..SiteCriteria::default()
        };
        assert!(criteria.is_empty());
    }

    #[test]
    fn explicit_fields_win_over_base() {
        let explicit = InvoiceCriteria {
            status: Some(InvoiceStatus::Due),
            ..InvoiceCriteria::default()
        };
        let base = InvoiceCriteria::from_query("status=paid&region=APAC").unwrap();
        let merged = explicit.over(base).unwrap();
        assert_eq!(merged.status, Some(InvoiceStatus::Due));
        assert_eq!(merged.region, Some(Region::Apac));
    }
}
