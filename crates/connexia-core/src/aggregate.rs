// ── Category counting ──
//
// Two counting modes share one output shape:
//
// - fixed: every variant of a closed enum, zero-filled, in the enum's
//   hand-picked priority order. Counts sum to the input length.
// - ranked: categories discovered from the data, sorted by count
//   descending. Ties keep the order in which categories were first seen.

use std::fmt;
use std::hash::Hash;
use std::sync::Arc;

use indexmap::IndexMap;
use serde::Serialize;
use strum::{Display, EnumString, IntoStaticStr, VariantNames};

use crate::model::{Case, EntityId, Invoice, InvoiceStatus, Order, Region, Site};
use crate::snapshot::Snapshot;

/// A closed enum with a fixed display priority.
pub trait Category: Copy + Eq + Hash + 'static {
    /// Every variant, in the order chips are rendered.
    const ORDERED: &'static [Self];

    fn label(self) -> &'static str;
}

/// One bucket of a count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryCount<K> {
    pub key: K,
    pub count: usize,
}

/// Label-only form of a count, used where categories are heterogeneous.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Tally {
    pub label: String,
    pub count: usize,
}

impl<K: fmt::Display> From<CategoryCount<K>> for Tally {
    fn from(c: CategoryCount<K>) -> Self {
        Self {
            label: c.key.to_string(),
            count: c.count,
        }
    }
}

/// Count `items` into every variant of `K`, zero-filled, in `K::ORDERED`.
pub fn count_fixed<T, K, F>(items: &[T], key: F) -> Vec<CategoryCount<K>>
where
    K: Category,
    F: Fn(&T) -> K,
{
    let mut buckets: IndexMap<K, usize> = K::ORDERED.iter().map(|&k| (k, 0)).collect();
    for item in items {
        *buckets.entry(key(item)).or_insert(0) += 1;
    }
    buckets
        .into_iter()
        .map(|(key, count)| CategoryCount { key, count })
        .collect()
}

/// Count categories discovered from the data, most frequent first.
///
/// `keys` may yield zero or more categories per item, so records that
/// do not belong to the dimension are skipped and a record may land in
/// several buckets.
pub fn count_ranked<T, K, I, F>(items: &[T], keys: F) -> Vec<CategoryCount<K>>
where
    K: Eq + Hash,
    I: IntoIterator<Item = K>,
    F: Fn(&T) -> I,
{
    let mut buckets: IndexMap<K, usize> = IndexMap::new();
    for item in items {
        for k in keys(item) {
            *buckets.entry(k).or_insert(0) += 1;
        }
    }
    let mut counts: Vec<CategoryCount<K>> = buckets
        .into_iter()
        .map(|(key, count)| CategoryCount { key, count })
        .collect();
    // sort_by is stable: equal counts stay in first-seen order.
    counts.sort_by(|a, b| b.count.cmp(&a.count));
    counts
}

fn tallies<K: fmt::Display>(counts: Vec<CategoryCount<K>>) -> Vec<Tally> {
    counts.into_iter().map(Tally::from).collect()
}

/// Buckets are keyed by provider id; names are only resolved for labels,
/// so providers sharing a name or missing from the snapshot stay apart.
fn provider_tallies(snapshot: &Snapshot, counts: Vec<CategoryCount<EntityId>>) -> Vec<Tally> {
    counts
        .into_iter()
        .map(|c| Tally {
            label: snapshot.provider_name(&c.key).to_owned(),
            count: c.count,
        })
        .collect()
}

// ── Order dimensions ─────────────────────────────────────────────────

/// Grouping keys available for orders.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, IntoStaticStr, VariantNames,
)]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
pub enum OrderDimension {
    Status,
    ServiceType,
    BlockedReason,
    BlockedOwner,
    Region,
    Provider,
}

/// Count orders along one dimension.
pub fn tally_orders(snapshot: &Snapshot, orders: &[Arc<Order>], by: OrderDimension) -> Vec<Tally> {
    match by {
        OrderDimension::Status => tallies(count_fixed(orders, |o| o.status().state)),
        OrderDimension::ServiceType => tallies(count_fixed(orders, |o| o.service_type)),
        OrderDimension::BlockedReason => tallies(count_ranked(orders, |o| {
            let status = o.status();
            status.is_blocked().then(|| status.reason_label())
        })),
        OrderDimension::BlockedOwner => tallies(count_ranked(orders, |o| {
            let mut teams = Vec::new();
            for m in o.blocked_milestones() {
                if !teams.contains(&m.owner_team) {
                    teams.push(m.owner_team);
                }
            }
            teams
        })),
        OrderDimension::Region => tallies(count_ranked(orders, |o| {
            snapshot.site_of(o).map(|s| s.region)
        })),
        OrderDimension::Provider => provider_tallies(
            snapshot,
            count_ranked(orders, |o| snapshot.site_of(o).map(|s| s.provider_id.clone())),
        ),
    }
}

// ── Case dimensions ──────────────────────────────────────────────────

/// Grouping keys available for cases.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, IntoStaticStr, VariantNames,
)]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
pub enum CaseDimension {
    Severity,
    Status,
    OwnerTeam,
    Region,
    Provider,
}

/// Count cases along one dimension.
pub fn tally_cases(snapshot: &Snapshot, cases: &[Arc<Case>], by: CaseDimension) -> Vec<Tally> {
    match by {
        CaseDimension::Severity => tallies(count_fixed(cases, |c| c.severity)),
        CaseDimension::Status => tallies(count_fixed(cases, |c| c.status)),
        CaseDimension::OwnerTeam => tallies(count_fixed(cases, |c| c.owner_team)),
        CaseDimension::Region => tallies(count_ranked(cases, |c| {
            snapshot.site_of(c).map(|s| s.region)
        })),
        CaseDimension::Provider => provider_tallies(
            snapshot,
            count_ranked(cases, |c| snapshot.site_of(c).map(|s| s.provider_id.clone())),
        ),
    }
}

// ── Sites ────────────────────────────────────────────────────────────

/// Sites per region, most populated first.
pub fn sites_by_region(sites: &[Arc<Site>]) -> Vec<CategoryCount<Region>> {
    count_ranked(sites, |s| Some(s.region))
}

// ── Billing ──────────────────────────────────────────────────────────

/// Invoice count and amount for one status.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AmountTotal {
    pub status: InvoiceStatus,
    pub count: usize,
    pub amount: f64,
}

/// Invoice amounts per status plus what is still owed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BillingTotals {
    pub by_status: Vec<AmountTotal>,
    /// Due plus disputed.
    pub outstanding: f64,
    pub total: f64,
}

pub fn billing_totals(invoices: &[Arc<Invoice>]) -> BillingTotals {
    let mut by_status: Vec<AmountTotal> = InvoiceStatus::ORDERED
        .iter()
        .map(|&status| AmountTotal {
            status,
            count: 0,
            amount: 0.0,
        })
        .collect();

    for invoice in invoices {
        if let Some(bucket) = by_status.iter_mut().find(|b| b.status == invoice.status) {
            bucket.count += 1;
            bucket.amount += invoice.amount;
        }
    }

    let outstanding = by_status
        .iter()
        .filter(|b| b.status.is_outstanding())
        .map(|b| b.amount)
        .sum();
    let total = by_status.iter().map(|b| b.amount).sum();

    BillingTotals {
        by_status,
        outstanding,
        total,
    }
}
