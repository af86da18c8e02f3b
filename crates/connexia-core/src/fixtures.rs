// ── Built-in sample dataset ──
//
// A small, self-consistent dataset for demos and tests. Every date is an
// offset from a caller-supplied anchor, so "target in 3 days" stays true
// whenever the sample is generated.

use chrono::{DateTime, Datelike, Duration, Utc};

use crate::dataset::Dataset;
use crate::model::{
    BillingPeriod, BlockedReason, Case, CaseStatus, CaseTeam, Criticality, DeliveryState, Event,
    EventKind, Invoice, InvoiceStatus, Milestone, Order, OwnerTeam, Provider, Region, ServiceType,
    Severity, Site,
};

/// The sample dataset anchored on `anchor` (usually "now").
pub fn sample_dataset(anchor: DateTime<Utc>) -> Dataset {
    Dataset {
        providers: providers(),
        sites: sites(),
        orders: orders(anchor),
        cases: cases(anchor),
        invoices: invoices(anchor),
        events: events(anchor),
    }
}

// ── Sites & providers ────────────────────────────────────────────────

fn providers() -> Vec<Provider> {
    [
        ("prov-northwave", "Northwave Fibre"),
        ("prov-meridian", "Meridian Carrier"),
        ("prov-pacifica", "Pacifica Telecom"),
        ("prov-atlas", "Atlas Networks"),
    ]
    .into_iter()
    .map(|(id, name)| Provider {
        id: id.into(),
        name: name.into(),
    })
    .collect()
}

fn sites() -> Vec<Site> {
    use Criticality::{Critical, Standard};

    [
        ("site-lon-01", "London HQ", "Harbor Bank", "GB", Region::Uk, "prov-northwave", Critical),
        ("site-man-01", "Manchester Office", "Lumen Retail", "GB", Region::Uk, "prov-northwave", Standard),
        ("site-fra-01", "Frankfurt DC", "Harbor Bank", "DE", Region::Emea, "prov-meridian", Critical),
        ("site-par-01", "Paris Office", "Lumen Retail", "FR", Region::Emea, "prov-meridian", Standard),
        ("site-sgp-01", "Singapore Hub", "Harbor Bank", "SG", Region::Apac, "prov-pacifica", Critical),
        ("site-syd-01", "Sydney Office", "Orbit Logistics", "AU", Region::Apac, "prov-pacifica", Standard),
        ("site-nyc-01", "New York Office", "Orbit Logistics", "US", Region::Amer, "prov-atlas", Critical),
        ("site-chi-01", "Chicago Warehouse", "Orbit Logistics", "US", Region::Amer, "prov-atlas", Standard),
    ]
    .into_iter()
    .map(|(id, name, customer, country, region, provider, criticality)| Site {
        id: id.into(),
        name: name.into(),
        customer: customer.into(),
        country: country.into(),
        region,
        provider_id: provider.into(),
        criticality,
    })
    .collect()
}

// ── Orders ───────────────────────────────────────────────────────────

struct Step {
    name: &'static str,
    state: DeliveryState,
    reason: Option<BlockedReason>,
    team: OwnerTeam,
}

const fn step(name: &'static str, state: DeliveryState, team: OwnerTeam) -> Step {
    Step {
        name,
        state,
        reason: None,
        team,
    }
}

const fn blocked(name: &'static str, reason: Option<BlockedReason>, team: OwnerTeam) -> Step {
    Step {
        name,
        state: DeliveryState::Blocked,
        reason,
        team,
    }
}

struct OrderSeed {
    id: &'static str,
    site: &'static str,
    service: ServiceType,
    target_in_days: i64,
    age_days: i64,
    steps: Vec<Step>,
}

impl OrderSeed {
    fn build(self, anchor: DateTime<Utc>) -> Order {
        let count = i64::try_from(self.steps.len()).unwrap_or(0);
        let milestones = self
            .steps
            .into_iter()
            .zip(1_i64..)
            .map(|(s, n)| Milestone {
                id: format!("{}-m{n}", self.id).into(),
                name: s.name.into(),
                state: s.state,
                blocked_reason: s.reason,
                owner_team: s.team,
                updated_at: anchor - Duration::hours(12 * (count - n + 1)),
            })
            .collect();
        Order {
            id: self.id.into(),
            site_id: self.site.into(),
            service_type: self.service,
            target_date: anchor + Duration::days(self.target_in_days),
            created_at: anchor - Duration::days(self.age_days),
            milestones,
        }
    }
}

fn orders(anchor: DateTime<Utc>) -> Vec<Order> {
    use DeliveryState::{Done, InProgress, Planned};
    use OwnerTeam::{Customer, Noc, Provider, ServiceDelivery};

    vec![
        OrderSeed {
            id: "ord-1001",
            site: "site-lon-01",
            service: ServiceType::Internet,
            target_in_days: 12,
            age_days: 40,
            steps: vec![
                step("Site survey", Done, ServiceDelivery),
                step("Circuit order", Done, Provider),
                step("Circuit install", InProgress, Provider),
            ],
        },
        OrderSeed {
            id: "ord-1002",
            site: "site-fra-01",
            service: ServiceType::SdWan,
            target_in_days: 20,
            age_days: 35,
            steps: vec![
                step("Site survey", Done, ServiceDelivery),
                blocked("Circuit install", Some(BlockedReason::AwaitingProvider), Provider),
                step("Handover", Planned, ServiceDelivery),
            ],
        },
        OrderSeed {
            id: "ord-1003",
            site: "site-fra-01",
            service: ServiceType::Security,
            target_in_days: 3,
            age_days: 10,
            steps: vec![
                step("Policy design", Planned, ServiceDelivery),
                step("Firewall deployment", Planned, Noc),
            ],
        },
        OrderSeed {
            id: "ord-1004",
            site: "site-man-01",
            service: ServiceType::Internet,
            target_in_days: 15,
            age_days: 50,
            steps: vec![
                step("Circuit install", Done, Provider),
                step("Handover", Done, ServiceDelivery),
            ],
        },
        OrderSeed {
            id: "ord-1005",
            site: "site-par-01",
            service: ServiceType::SdWan,
            target_in_days: 30,
            age_days: 21,
            steps: vec![
                step("Site survey", InProgress, ServiceDelivery),
                blocked("Site access", Some(BlockedReason::AwaitingCustomer), Customer),
                blocked(
                    "Cutover",
                    Some(BlockedReason::AwaitingChangeWindow),
                    ServiceDelivery,
                ),
            ],
        },
        OrderSeed {
            id: "ord-1006",
            site: "site-sgp-01",
            service: ServiceType::Internet,
            target_in_days: 8,
            age_days: 28,
            steps: vec![
                step("Circuit order", Done, Provider),
                step("Circuit install", InProgress, Provider),
                step("Handover", Planned, ServiceDelivery),
            ],
        },
        OrderSeed {
            id: "ord-1007",
            site: "site-syd-01",
            service: ServiceType::Security,
            target_in_days: 5,
            age_days: 14,
            steps: vec![blocked("Monitoring onboarding", None, Noc)],
        },
        OrderSeed {
            id: "ord-1008",
            site: "site-nyc-01",
            service: ServiceType::SdWan,
            target_in_days: 45,
            age_days: 1,
            steps: vec![],
        },
        OrderSeed {
            id: "ord-1009",
            site: "site-chi-01",
            service: ServiceType::Internet,
            target_in_days: 2,
            age_days: 30,
            steps: vec![
                step("Circuit install", Done, Provider),
                step("CPE install", InProgress, ServiceDelivery),
            ],
        },
        OrderSeed {
            id: "ord-1010",
            site: "site-lon-01",
            service: ServiceType::SdWan,
            target_in_days: 25,
            age_days: 60,
            steps: vec![
                step("Site survey", Done, ServiceDelivery),
                step("Edge install", Done, ServiceDelivery),
                step("Handover", Done, ServiceDelivery),
            ],
        },
    ]
    .into_iter()
    .map(|spec| spec.build(anchor))
    .collect()
}

// ── Cases ────────────────────────────────────────────────────────────

fn cases(anchor: DateTime<Utc>) -> Vec<Case> {
    use CaseStatus::{Investigating, Open, Resolved, Waiting};
    use Severity::{Sev1, Sev2, Sev3};

    [
        ("case-2001", "site-fra-01", "Packet loss on primary circuit", Sev1, Investigating, CaseTeam::Noc, -3, 5),
        ("case-2002", "site-lon-01", "Intermittent VPN drops", Sev2, Waiting, CaseTeam::Provider, -20, 30),
        ("case-2003", "site-sgp-01", "BGP session flapping", Sev1, Open, CaseTeam::Noc, -6, -2),
        ("case-2004", "site-man-01", "Firewall rule change request", Sev3, Open, CaseTeam::ServiceDelivery, -24, 72),
        ("case-2005", "site-par-01", "Slow throughput after migration", Sev2, Resolved, CaseTeam::Provider, -72, -24),
        ("case-2006", "site-nyc-01", "Circuit down", Sev1, Resolved, CaseTeam::Noc, -30, -26),
        ("case-2007", "site-chi-01", "DNS resolution failures", Sev2, Investigating, CaseTeam::Noc, -2, 8),
        ("case-2008", "site-syd-01", "Wi-Fi coverage survey", Sev3, Waiting, CaseTeam::ServiceDelivery, -48, 120),
    ]
    .into_iter()
    .map(|(id, site, title, severity, status, owner_team, opened_h, due_h)| Case {
        id: id.into(),
        site_id: site.into(),
        title: title.into(),
        severity,
        status,
        owner_team,
        opened_at: anchor + Duration::hours(opened_h),
        sla_due_at: anchor + Duration::hours(due_h),
    })
    .collect()
}

// ── Billing ──────────────────────────────────────────────────────────

/// The billing month `months_back` months before the anchor's month.
fn period(anchor: DateTime<Utc>, months_back: i32) -> BillingPeriod {
    let month0 = i32::try_from(anchor.month0()).unwrap_or(0);
    let index = anchor.year() * 12 + month0 - months_back;
    let (year, month0) = (index.div_euclid(12), index.rem_euclid(12));
    BillingPeriod::from_parts(year, month0 + 1)
}

fn invoices(anchor: DateTime<Utc>) -> Vec<Invoice> {
    use InvoiceStatus::{Disputed, Due, Paid};

    [
        ("inv-3001", "site-lon-01", 2, 4_250.00, Paid),
        ("inv-3002", "site-lon-01", 1, 4_250.00, Due),
        ("inv-3003", "site-man-01", 1, 1_180.50, Paid),
        ("inv-3004", "site-fra-01", 2, 6_900.00, Paid),
        ("inv-3005", "site-fra-01", 1, 7_315.25, Disputed),
        ("inv-3006", "site-par-01", 1, 2_040.00, Due),
        ("inv-3007", "site-sgp-01", 1, 5_600.00, Due),
        ("inv-3008", "site-syd-01", 3, 1_475.00, Paid),
        ("inv-3009", "site-syd-01", 1, 1_475.00, Paid),
        ("inv-3010", "site-nyc-01", 1, 3_980.00, Disputed),
        ("inv-3011", "site-chi-01", 2, 2_210.75, Paid),
        ("inv-3012", "site-chi-01", 1, 2_210.75, Due),
    ]
    .into_iter()
    .map(|(id, site, months_back, amount, status)| Invoice {
        id: id.into(),
        site_id: site.into(),
        period: period(anchor, months_back),
        amount,
        status,
    })
    .collect()
}

// ── Activity ─────────────────────────────────────────────────────────

fn events(anchor: DateTime<Utc>) -> Vec<Event> {
    use EventKind::{
        CaseOpened, CaseResolved, CaseUpdated, InvoiceDisputed, InvoiceIssued, InvoicePaid,
        MilestoneBlocked, MilestoneCompleted, MilestoneStarted, OrderCreated, OrderUpdated,
    };

    [
        ("evt-4001", -1, CaseOpened, Some("site-fra-01"), None, Some("case-2001"), "Sev1 opened: packet loss on primary circuit at Frankfurt DC"),
        ("evt-4002", -2, CaseUpdated, Some("site-chi-01"), None, Some("case-2007"), "NOC investigating DNS resolution failures"),
        ("evt-4003", -4, MilestoneBlocked, Some("site-syd-01"), Some("ord-1007"), None, "Monitoring onboarding blocked"),
        ("evt-4004", -5, CaseOpened, Some("site-sgp-01"), None, Some("case-2003"), "BGP session flapping reported"),
        ("evt-4005", -8, MilestoneStarted, Some("site-chi-01"), Some("ord-1009"), None, "CPE install started"),
        ("evt-4006", -12, MilestoneBlocked, Some("site-fra-01"), Some("ord-1002"), None, "Circuit install waiting on Meridian Carrier"),
        ("evt-4007", -18, InvoiceDisputed, Some("site-fra-01"), None, None, "Invoice inv-3005 disputed"),
        ("evt-4008", -20, MilestoneCompleted, Some("site-lon-01"), Some("ord-1010"), None, "Handover completed"),
        ("evt-4009", -24, OrderCreated, Some("site-nyc-01"), Some("ord-1008"), None, "SD-WAN order created"),
        ("evt-4010", -26, CaseResolved, Some("site-nyc-01"), None, Some("case-2006"), "Circuit restored"),
        ("evt-4011", -30, MilestoneBlocked, Some("site-par-01"), Some("ord-1005"), None, "Site access pending customer approval"),
        ("evt-4012", -36, InvoiceIssued, None, None, None, "Monthly invoices issued"),
        ("evt-4013", -40, InvoicePaid, Some("site-man-01"), None, None, "Invoice inv-3003 paid"),
        ("evt-4014", -48, OrderUpdated, Some("site-sgp-01"), Some("ord-1006"), None, "Target date confirmed"),
        ("evt-4015", -60, CaseResolved, Some("site-par-01"), None, Some("case-2005"), "Throughput back to contracted rate"),
        ("evt-4016", -72, MilestoneCompleted, Some("site-man-01"), Some("ord-1004"), None, "Circuit install completed"),
    ]
    .into_iter()
    .map(|(id, hours, kind, site, order, case, summary)| Event {
        id: id.into(),
        timestamp: anchor + Duration::hours(hours),
        kind,
        site_id: site.map(Into::into),
        order_id: order.map(Into::into),
        case_id: case.map(Into::into),
        summary: summary.into(),
    })
    .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::collections::HashSet;

    fn sample() -> Dataset {
        sample_dataset(Utc.with_ymd_and_hms(2025, 1, 15, 9, 0, 0).unwrap())
    }

    #[test]
    fn sample_has_documented_shape() {
        let ds = sample();
        assert_eq!(ds.providers.len(), 4);
        assert_eq!(ds.sites.len(), 8);
        assert_eq!(ds.orders.len(), 10);
        assert_eq!(ds.cases.len(), 8);
        assert_eq!(ds.invoices.len(), 12);
        assert_eq!(ds.events.len(), 16);
    }

    #[test]
    fn foreign_keys_resolve() {
        let ds = sample();
        let providers: HashSet<_> = ds.providers.iter().map(|p| &p.id).collect();
        let sites: HashSet<_> = ds.sites.iter().map(|s| &s.id).collect();
        assert!(ds.sites.iter().all(|s| providers.contains(&s.provider_id)));
        assert!(ds.orders.iter().all(|o| sites.contains(&o.site_id)));
        assert!(ds.cases.iter().all(|c| sites.contains(&c.site_id)));
        assert!(ds.invoices.iter().all(|i| sites.contains(&i.site_id)));
    }

    #[test]
    fn every_region_is_represented() {
        let ds = sample();
        let regions: HashSet<_> = ds.sites.iter().map(|s| s.region).collect();
        assert_eq!(regions.len(), 4);
    }

    #[test]
    fn periods_roll_back_across_year_boundary() {
        let anchor = Utc.with_ymd_and_hms(2025, 1, 15, 9, 0, 0).unwrap();
        assert_eq!(period(anchor, 1).as_str(), "2024-12");
        assert_eq!(period(anchor, 0).as_str(), "2025-01");
    }
}
