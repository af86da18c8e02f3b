//! Drill-through links and filter chips.

use serde::Serialize;

use crate::aggregate::{Category, CategoryCount};
use crate::filter::Criteria;

/// `/{path}?{query}`, or just `/{path}` when no criterion is set.
pub fn href<C: Criteria>(path: &str, criteria: &C) -> String {
    let path = path.trim_matches('/');
    let query = criteria.to_query();
    if query.is_empty() {
        format!("/{path}")
    } else {
        format!("/{path}?{query}")
    }
}

/// A category label with its count and the list view it drills into.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Chip {
    pub label: String,
    pub count: usize,
    pub href: String,
}

/// Turn fixed counts into chips. Each chip links to `path` filtered by
/// `base` plus the chip's own category, applied through `narrow`.
pub fn chips<K, C, F>(counts: Vec<CategoryCount<K>>, path: &str, base: &C, narrow: F) -> Vec<Chip>
where
    K: Category,
    C: Criteria + Clone,
    F: Fn(&mut C, K),
{
    counts
        .into_iter()
        .map(|c| {
            let mut criteria = base.clone();
            narrow(&mut criteria, c.key);
            Chip {
                label: c.key.label().to_owned(),
                count: c.count,
                href: href(path, &criteria),
            }
        })
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::aggregate::count_fixed;
    use crate::filter::{CaseCriteria, OrderCriteria};
    use crate::model::{DeliveryState, Region, Severity};
    use pretty_assertions::assert_eq;

    #[test]
    fn href_without_criteria_is_bare_path() {
        assert_eq!(href("/orders/", &OrderCriteria::default()), "/orders");
    }

    #[test]
    fn href_encodes_criteria() {
        let criteria = OrderCriteria {
            status: Some(DeliveryState::Blocked),
            region: Some(Region::Emea),
            ..OrderCriteria::default()
        };
        assert_eq!(href("orders", &criteria), "/orders?region=EMEA&status=blocked");
    }

    #[test]
    fn chips_keep_base_criteria_and_add_category() {
        let base = CaseCriteria {
            open: true,
            ..CaseCriteria::default()
        };
        let counts = count_fixed(&[Severity::Sev2], |s| *s);
        let chips = chips(counts, "cases", &base, |c, sev| c.severity = Some(sev));

        assert_eq!(chips.len(), 3);
        assert_eq!(
            chips[1],
            Chip {
                label: "sev2".into(),
                count: 1,
                href: "/cases?severity=sev2&open=true".into(),
            }
        );
    }
}
