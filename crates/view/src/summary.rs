//! Counts-by-value rollups for dashboards.

use std::collections::BTreeMap;

use serde::Serialize;
use tracing::warn;

use crate::field::Record;

/// Bucket that collects null/absent values.
///
/// Also the select-box key for [`ExactFilter::Unset`](crate::ExactFilter::Unset),
/// so a bucket key fed back as a filter selects exactly that bucket. A real
/// value spelled `"unset"` is reserved: it is counted with the nulls, and only
/// an explicit `ExactFilter::Value` selects it.
pub const UNSET_BUCKET: &str = "unset";

/// Occurrences of each distinct value of one field.
pub type Counts = BTreeMap<String, usize>;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Summary {
    /// Number of records summarised.
    pub total: usize,
    pub groups: BTreeMap<&'static str, Counts>,
}

impl Summary {
    pub fn counts(&self, field: &str) -> Option<&Counts> {
        self.groups.get(field)
    }

    /// Zero when the field was not grouped or the value never occurred.
    pub fn count(&self, field: &str, value: &str) -> usize {
        self.counts(field)
            .and_then(|counts| counts.get(value))
            .copied()
            .unwrap_or(0)
    }
}

/// Count distinct values of each of `group_fields` across all of `items`.
///
/// Unknown field names are skipped.
pub fn summarize<R: Record>(items: &[R], group_fields: &[&str]) -> Summary {
    let mut groups = BTreeMap::new();

    for name in group_fields {
        let Some(descriptor) = R::field(name) else {
            warn!(field = %name, "ignoring summary on unknown field");
            continue;
        };

        let mut counts = Counts::new();
        for record in items {
            let key = descriptor
                .value(record)
                .filter_key()
                .unwrap_or_else(|| UNSET_BUCKET.to_string());
            *counts.entry(key).or_insert(0) += 1;
        }
        groups.insert(descriptor.name, counts);
    }

    Summary {
        total: items.len(),
        groups,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compose::compose;
    use crate::state::{ExactFilter, FilterState};
    use crate::testing::{ids, roster};

    #[test]
    fn counts_each_value_per_field() {
        let summary = summarize(&roster(), &["team", "active"]);
        assert_eq!(summary.total, 5);
        assert_eq!(summary.count("team", "ops"), 2);
        assert_eq!(summary.count("team", "dev"), 2);
        assert_eq!(summary.count("team", UNSET_BUCKET), 1);
        assert_eq!(summary.count("active", "true"), 3);
        assert_eq!(summary.count("active", "false"), 2);
    }

    #[test]
    fn unknown_fields_are_skipped() {
        let summary = summarize(&roster(), &["team", "planet"]);
        assert!(summary.counts("planet").is_none());
        assert_eq!(summary.count("planet", "earth"), 0);
        assert_eq!(summary.groups.len(), 1);
    }

    #[test]
    fn every_bucket_key_drills_down_to_its_count() {
        let people = roster();
        let summary = summarize(&people, &["team", "active"]);

        for (field, counts) in &summary.groups {
            for (key, expected) in counts {
                let view = compose(&people, &FilterState::new().with_exact(*field, key.as_str()));
                assert_eq!(view.filtered_count, *expected, "{field}={key}");
            }
        }
    }

    #[test]
    fn literal_unset_value_shares_the_null_bucket() {
        let mut people = roster();
        people[0].team = Some(UNSET_BUCKET.to_string());
        let summary = summarize(&people, &["team"]);
        assert_eq!(summary.count("team", UNSET_BUCKET), 2);

        let nulls = compose(&people, &FilterState::new().with_exact("team", UNSET_BUCKET));
        assert_eq!(ids(&nulls.items), vec![3]);

        let literal = FilterState::new().with_exact("team", ExactFilter::Value(UNSET_BUCKET.into()));
        assert_eq!(ids(&compose(&people, &literal).items), vec![1]);
    }

    #[test]
    fn bucket_totals_match_population() {
        let people = roster();
        let summary = summarize(&people, &["team"]);
        let sum: usize = summary.counts("team").unwrap().values().sum();
        assert_eq!(sum, people.len());
    }
}
