// ── Raw-to-domain conversions ──
//
// Bridges the raw dataset records in `crate::raw` into canonical
// `crate::model` types. Each `TryFrom` impl parses strings into strong
// types and fills defaults for optional fields. Unlike the derivations,
// conversion is strict: a date or enum that does not parse is an error
// naming the record and field, never a silent default.

use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use strum::VariantNames;

use crate::dataset::Dataset;
use crate::error::CoreError;
use crate::model::{
    BillingPeriod, Case, Criticality, EntityId, Event, Invoice, Milestone, Order, Provider, Site,
};
use crate::raw::{
    RawCase, RawDataset, RawEvent, RawInvoice, RawMilestone, RawOrder, RawProvider, RawSite,
};

// ── Helpers ────────────────────────────────────────────────────────

/// Parse an RFC 3339 timestamp, or a bare `YYYY-MM-DD` date as midnight UTC.
pub fn parse_timestamp(field: &str, value: &str) -> Result<DateTime<Utc>, CoreError> {
    let raw = value.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(dt.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
        .ok_or_else(|| CoreError::InvalidDate {
            field: field.to_owned(),
            value: value.to_owned(),
            reason: "expected an RFC 3339 timestamp or YYYY-MM-DD".into(),
        })
}

/// Parse an enum value, listing the accepted spellings on failure.
pub fn parse_value<E>(field: &str, value: &str) -> Result<E, CoreError>
where
    E: FromStr + VariantNames,
{
    value
        .trim()
        .parse()
        .map_err(|_| CoreError::invalid_value(field, value, E::VARIANTS))
}

/// `"{kind} {id}.{field}"`, so errors point at the offending record.
fn at(kind: &str, id: &str, field: &str) -> String {
    format!("{kind} {id}.{field}")
}

fn optional_id(raw: Option<String>) -> Option<EntityId> {
    raw.map(|s| s.trim().to_owned())
        .filter(|s| !s.is_empty())
        .map(EntityId::from)
}

// ── Sites & providers ──────────────────────────────────────────────

impl From<RawProvider> for Provider {
    fn from(raw: RawProvider) -> Self {
        Self {
            id: raw.id.into(),
            name: raw.name,
        }
    }
}

impl TryFrom<RawSite> for Site {
    type Error = CoreError;

    fn try_from(raw: RawSite) -> Result<Self, Self::Error> {
        let region = parse_value(&at("site", &raw.id, "region"), &raw.region)?;
        let criticality = match raw.criticality.as_deref() {
            Some(c) if !c.trim().is_empty() => {
                parse_value(&at("site", &raw.id, "criticality"), c)?
            }
            _ => Criticality::default(),
        };
        Ok(Self {
            id: raw.id.into(),
            name: raw.name,
            customer: raw.customer,
            country: raw.country,
            region,
            provider_id: raw.provider_id.into(),
            criticality,
        })
    }
}

// ── Orders ─────────────────────────────────────────────────────────

fn milestone(order_id: &str, raw: RawMilestone) -> Result<Milestone, CoreError> {
    let kind = format!("order {order_id} milestone");
    let blocked_reason = match raw.blocked_reason.as_deref() {
        Some(r) if !r.trim().is_empty() => {
            Some(parse_value(&at(&kind, &raw.id, "blockedReason"), r)?)
        }
        _ => None,
    };
    Ok(Milestone {
        state: parse_value(&at(&kind, &raw.id, "state"), &raw.state)?,
        blocked_reason,
        owner_team: parse_value(&at(&kind, &raw.id, "ownerTeam"), &raw.owner_team)?,
        updated_at: parse_timestamp(&at(&kind, &raw.id, "updatedAt"), &raw.updated_at)?,
        id: raw.id.into(),
        name: raw.name,
    })
}

impl TryFrom<RawOrder> for Order {
    type Error = CoreError;

    fn try_from(raw: RawOrder) -> Result<Self, Self::Error> {
        let id = raw.id;
        let milestones = raw
            .milestones
            .into_iter()
            .map(|m| milestone(&id, m))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            service_type: parse_value(&at("order", &id, "serviceType"), &raw.service_type)?,
            target_date: parse_timestamp(&at("order", &id, "targetDate"), &raw.target_date)?,
            created_at: parse_timestamp(&at("order", &id, "createdAt"), &raw.created_at)?,
            site_id: raw.site_id.into(),
            milestones,
            id: id.into(),
        })
    }
}

// ── Cases ──────────────────────────────────────────────────────────

impl TryFrom<RawCase> for Case {
    type Error = CoreError;

    fn try_from(raw: RawCase) -> Result<Self, Self::Error> {
        let id = raw.id;
        Ok(Self {
            severity: parse_value(&at("case", &id, "severity"), &raw.severity)?,
            status: parse_value(&at("case", &id, "status"), &raw.status)?,
            owner_team: parse_value(&at("case", &id, "ownerTeam"), &raw.owner_team)?,
            opened_at: parse_timestamp(&at("case", &id, "openedAt"), &raw.opened_at)?,
            sla_due_at: parse_timestamp(&at("case", &id, "slaDueAt"), &raw.sla_due_at)?,
            site_id: raw.site_id.into(),
            title: raw.title,
            id: id.into(),
        })
    }
}

// ── Billing ────────────────────────────────────────────────────────

impl TryFrom<RawInvoice> for Invoice {
    type Error = CoreError;

    fn try_from(raw: RawInvoice) -> Result<Self, Self::Error> {
        let period: BillingPeriod = raw.period.parse().map_err(|_| CoreError::InvalidDate {
            field: at("invoice", &raw.id, "period"),
            value: raw.period.clone(),
            reason: "expected a zero-padded YYYY-MM billing month".into(),
        })?;
        Ok(Self {
            status: parse_value(&at("invoice", &raw.id, "status"), &raw.status)?,
            id: raw.id.into(),
            site_id: raw.site_id.into(),
            period,
            amount: raw.amount,
        })
    }
}

// ── Activity ───────────────────────────────────────────────────────

impl TryFrom<RawEvent> for Event {
    type Error = CoreError;

    fn try_from(raw: RawEvent) -> Result<Self, Self::Error> {
        Ok(Self {
            timestamp: parse_timestamp(&at("event", &raw.id, "timestamp"), &raw.timestamp)?,
            kind: parse_value(&at("event", &raw.id, "type"), &raw.kind)?,
            site_id: optional_id(raw.site_id),
            order_id: optional_id(raw.order_id),
            case_id: optional_id(raw.case_id),
            summary: raw.summary,
            id: raw.id.into(),
        })
    }
}

// ── Whole documents ────────────────────────────────────────────────

impl TryFrom<RawDataset> for Dataset {
    type Error = CoreError;

    fn try_from(raw: RawDataset) -> Result<Self, Self::Error> {
        Ok(Self {
            providers: raw.providers.into_iter().map(Provider::from).collect(),
            sites: raw
                .sites
                .into_iter()
                .map(Site::try_from)
                .collect::<Result<_, _>>()?,
            orders: raw
                .orders
                .into_iter()
                .map(Order::try_from)
                .collect::<Result<_, _>>()?,
            cases: raw
                .cases
                .into_iter()
                .map(Case::try_from)
                .collect::<Result<_, _>>()?,
            invoices: raw
                .invoices
                .into_iter()
                .map(Invoice::try_from)
                .collect::<Result<_, _>>()?,
            events: raw
                .events
                .into_iter()
                .map(Event::try_from)
                .collect::<Result<_, _>>()?,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::model::{BlockedReason, DeliveryState, OwnerTeam, Region};
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    fn raw_order(target_date: &str) -> RawOrder {
        RawOrder {
            id: "ord-1".into(),
            site_id: "site-1".into(),
            service_type: "sd-wan".into(),
            target_date: target_date.into(),
            created_at: "2025-05-01T08:00:00Z".into(),
            milestones: vec![RawMilestone {
                id: "m1".into(),
                name: "Circuit install".into(),
                state: "blocked".into(),
                blocked_reason: Some("awaiting_provider".into()),
                owner_team: "Provider".into(),
                updated_at: "2025-05-20T10:30:00+02:00".into(),
            }],
        }
    }

    #[test]
    fn timestamps_accept_rfc3339_and_bare_dates() {
        assert_eq!(
            parse_timestamp("t", "2025-06-01T12:00:00+02:00").unwrap(),
            Utc.with_ymd_and_hms(2025, 6, 1, 10, 0, 0).unwrap()
        );
        assert_eq!(
            parse_timestamp("t", "2025-06-01").unwrap(),
            Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap()
        );
    }

    #[test]
    fn order_converts_with_milestones() {
        let order = Order::try_from(raw_order("2025-06-10")).unwrap();
        assert_eq!(order.id.as_str(), "ord-1");
        assert_eq!(order.milestones.len(), 1);
        let m = &order.milestones[0];
        assert_eq!(m.state, DeliveryState::Blocked);
        assert_eq!(m.blocked_reason, Some(BlockedReason::AwaitingProvider));
        assert_eq!(m.owner_team, OwnerTeam::Provider);
        assert_eq!(m.updated_at, Utc.with_ymd_and_hms(2025, 5, 20, 8, 30, 0).unwrap());
    }

    #[test]
    fn bad_target_date_names_record_and_field() {
        let err = Order::try_from(raw_order("next tuesday")).unwrap_err();
        match err {
            CoreError::InvalidDate { field, value, .. } => {
                assert_eq!(field, "order ord-1.targetDate");
                assert_eq!(value, "next tuesday");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn bad_region_is_invalid_value() {
        let raw = RawSite {
            id: "site-1".into(),
            name: "Frankfurt DC".into(),
            customer: "Harbor Bank".into(),
            country: "DE".into(),
            region: "EUROPE".into(),
            provider_id: "prov-1".into(),
            criticality: None,
        };
        let err = Site::try_from(raw).unwrap_err();
        assert!(matches!(err, CoreError::InvalidValue { ref field, .. } if field == "site site-1.region"));
    }

    #[test]
    fn missing_criticality_defaults_to_standard() {
        let raw = RawSite {
            id: "site-1".into(),
            name: "Leeds Office".into(),
            customer: "Harbor Bank".into(),
            country: "GB".into(),
            region: "uk".into(),
            provider_id: "prov-1".into(),
            criticality: None,
        };
        let site = Site::try_from(raw).unwrap();
        assert_eq!(site.region, Region::Uk);
        assert_eq!(site.criticality, Criticality::Standard);
    }

    #[test]
    fn bad_invoice_period_is_invalid_date() {
        let raw = RawInvoice {
            id: "inv-1".into(),
            site_id: "site-1".into(),
            period: "2025-13".into(),
            amount: 10.0,
            status: "due".into(),
        };
        let err = Invoice::try_from(raw).unwrap_err();
        assert!(matches!(err, CoreError::InvalidDate { ref field, .. } if field == "invoice inv-1.period"));
    }

    #[test]
    fn blank_event_references_become_none() {
        let raw = RawEvent {
            id: "evt-1".into(),
            timestamp: "2025-06-01T09:00:00Z".into(),
            kind: "case_opened".into(),
            site_id: Some("site-1".into()),
            order_id: Some(String::new()),
            case_id: None,
            summary: "Case opened".into(),
        };
        let event = Event::try_from(raw).unwrap();
        assert_eq!(event.site_id, Some(EntityId::from("site-1")));
        assert!(event.order_id.is_none());
    }

    #[test]
    fn parse_value_lists_variants() {
        let err = parse_value::<Region>("region", "mars").unwrap_err();
        assert!(err.to_string().contains("UK, EMEA, APAC, AMER"));
    }
}
