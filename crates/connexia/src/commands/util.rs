//! Shared helpers for command handlers.

use serde::Serialize;
use tabled::Tabled;

use connexia_core::{CategoryCount, Category, Chip, Criteria, Tally, href};

use crate::cli::{ScopeFilter, WhereArg};
use crate::error::CliError;

// ── Filter flags → criteria ─────────────────────────────────────────

/// A clap filter struct that maps onto one core criteria record.
pub trait FilterFlags {
    type Criteria: Criteria;

    /// Query-string pairs for every flag the user set.
    fn pairs(&self) -> Vec<(&'static str, String)>;

    fn where_clause(&self) -> &WhereArg;
}

/// Build criteria from flags layered over the `--where` query.
pub fn criteria<F: FilterFlags>(flags: &F) -> Result<F::Criteria, CliError> {
    let mut explicit = F::Criteria::default();
    for (key, value) in flags.pairs() {
        explicit.set_pair(key, &value)?;
    }
    let base = match flags.where_clause().query.as_deref() {
        Some(query) => F::Criteria::from_query(query)?,
        None => F::Criteria::default(),
    };
    Ok(explicit.over(base)?)
}

/// Append `key=value` when the option is set.
pub fn pair(pairs: &mut Vec<(&'static str, String)>, key: &'static str, value: Option<&String>) {
    if let Some(v) = value {
        pairs.push((key, v.clone()));
    }
}

pub fn flag(pairs: &mut Vec<(&'static str, String)>, key: &'static str, set: bool) {
    if set {
        pairs.push((key, "true".into()));
    }
}

/// Provider, region and search flags.
pub fn scope_pairs(pairs: &mut Vec<(&'static str, String)>, scope: &ScopeFilter) {
    pair(pairs, "provider", scope.provider.as_ref());
    pair(pairs, "region", scope.region.as_ref());
    pair(pairs, "q", scope.search.as_ref());
}

// ── Counts ──────────────────────────────────────────────────────────

/// One counted category, with a drill-through link when the category
/// can be expressed as a filter.
#[derive(Debug, Serialize)]
pub struct CountEntry {
    pub label: String,
    pub count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub href: Option<String>,
}

#[derive(Tabled)]
pub struct CountRow {
    #[tabled(rename = "Category")]
    label: String,
    #[tabled(rename = "Count")]
    count: usize,
    #[tabled(rename = "Link")]
    href: String,
}

impl From<&CountEntry> for CountRow {
    fn from(e: &CountEntry) -> Self {
        Self {
            label: e.label.clone(),
            count: e.count,
            href: e.href.clone().unwrap_or_default(),
        }
    }
}

impl From<Chip> for CountEntry {
    fn from(chip: Chip) -> Self {
        Self {
            label: chip.label,
            count: chip.count,
            href: Some(chip.href),
        }
    }
}

/// Fixed-category counts as linked chips.
pub fn chip_entries<K, C>(
    counts: Vec<CategoryCount<K>>,
    path: &str,
    base: &C,
    narrow: impl Fn(&mut C, K),
) -> Vec<CountEntry>
where
    K: Category,
    C: Criteria + Clone,
{
    connexia_core::links::chips(counts, path, base, narrow)
        .into_iter()
        .map(CountEntry::from)
        .collect()
}

/// Open-ended counts. Each label is tried as the value of `key`; labels
/// the criteria reject (or a missing key) leave the entry unlinked.
pub fn tally_entries<C>(
    tallies: Vec<Tally>,
    path: &str,
    base: &C,
    key: Option<&str>,
) -> Vec<CountEntry>
where
    C: Criteria + Clone,
{
    tallies
        .into_iter()
        .map(|t| {
            let link = key.and_then(|key| {
                let mut criteria = base.clone();
                criteria
                    .set_pair(key, &t.label)
                    .ok()
                    .map(|()| href(path, &criteria))
            });
            CountEntry {
                label: t.label,
                count: t.count,
                href: link,
            }
        })
        .collect()
}

// ── Formatting ──────────────────────────────────────────────────────

/// Short UTC timestamp for tables.
pub fn timestamp(at: chrono::DateTime<chrono::Utc>) -> String {
    at.format("%Y-%m-%d %H:%M").to_string()
}

pub fn date(at: chrono::DateTime<chrono::Utc>) -> String {
    at.format("%Y-%m-%d").to_string()
}

/// Prompt for confirmation, auto-approving if `--yes` was passed.
pub fn confirm(message: &str, yes_flag: bool) -> Result<bool, CliError> {
    if yes_flag {
        return Ok(true);
    }
    let confirmed = dialoguer::Confirm::new()
        .with_prompt(message)
        .default(false)
        .interact()
        .map_err(|e| CliError::Io(std::io::Error::other(e)))?;
    Ok(confirmed)
}
