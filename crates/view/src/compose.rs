//! Derived view composition: filter, then sort, then count.

use serde::Serialize;
use tracing::debug;

use crate::field::Record;
use crate::filter::Predicate;
use crate::paginate::{Page, paginate};
use crate::sort::sorted;
use crate::state::FilterState;
use crate::summary::{Summary, summarize};

/// The filtered-and-sorted subset of a collection plus its counts.
///
/// `filtered_count == items.len() <= total_count`, and `total_count` is the
/// length of the collection the view was composed from.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DerivedView<R> {
    pub items: Vec<R>,
    pub filtered_count: usize,
    pub total_count: usize,
}

impl<R> DerivedView<R> {
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn page(&self, page: usize, page_size: usize) -> Page<'_, R> {
        paginate(&self.items, page, page_size)
    }
}

impl<R: Record> DerivedView<R> {
    /// Counts over the whole filtered population, not just one page.
    pub fn summarize(&self, group_fields: &[&str]) -> Summary {
        summarize(&self.items, group_fields)
    }
}

/// Compose the view of `collection` under `state`.
///
/// Pure: the input is never mutated and the same arguments always produce the
/// same output.
pub fn compose<R: Record>(collection: &[R], state: &FilterState) -> DerivedView<R> {
    let predicate = Predicate::<R>::compile(state);
    let filtered: Vec<R> = collection
        .iter()
        .filter(|record| predicate.matches(*record))
        .cloned()
        .collect();

    let items = match &state.sort {
        Some(sort) => sorted(filtered, sort),
        None => filtered,
    };

    debug!(
        total = collection.len(),
        filtered = items.len(),
        sort = ?state.sort.as_ref().map(ToString::to_string),
        "composed view"
    );

    DerivedView {
        filtered_count: items.len(),
        total_count: collection.len(),
        items,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{ExactFilter, SortSpec};
    use crate::testing::{Person, ids, person, roster};
    use proptest::prelude::*;

    #[test]
    fn filters_then_sorts_then_counts() {
        let people = roster();
        let state = FilterState::new()
            .with_exact("team", "ops")
            .with_sort(SortSpec::desc("joined_at"));

        let view = compose(&people, &state);
        assert_eq!(ids(&view.items), vec![5, 1]);
        assert_eq!(view.filtered_count, 2);
        assert_eq!(view.total_count, 5);
    }

    #[test]
    fn does_not_mutate_input() {
        let people = roster();
        let before = people.clone();
        let _ = compose(&people, &FilterState::new().with_sort(SortSpec::desc("name")));
        assert_eq!(people, before);
    }

    #[test]
    fn empty_collection_yields_empty_view() {
        let view = compose::<Person>(&[], &FilterState::new().with_search("x"));
        assert!(view.is_empty());
        assert_eq!(view.total_count, 0);
        assert_eq!(view.page(1, 10).total_pages, 1);
    }

    #[test]
    fn malformed_records_are_kept_not_dropped() {
        let people = vec![
            person(1, "a", None, Some("garbage")),
            person(2, "b", Some("ops"), None),
        ];
        let view = compose(&people, &FilterState::new().with_sort(SortSpec::asc("joined_at")));
        assert_eq!(view.filtered_count, 2);

        let view = compose(&people, &FilterState::new().with_exact("team", ExactFilter::Unset));
        assert_eq!(ids(&view.items), vec![1]);
    }

    #[test]
    fn summary_covers_whole_filtered_set() {
        let view = compose(&roster(), &FilterState::new().with_exact("active", true));
        let summary = view.summarize(&["team"]);
        assert_eq!(summary.total, 3);
        assert_eq!(summary.count("team", "ops"), 2);
        assert_eq!(summary.count("team", "unset"), 1);
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 128,
            ..ProptestConfig::default()
        })]

        /// Property: composition is idempotent and respects the count invariant.
        #[test]
        fn compose_is_deterministic(
            search in "[a-z]{0,2}",
            desc in any::<bool>(),
        ) {
            let people = roster();
            let sort = if desc { SortSpec::desc("joined_at") } else { SortSpec::asc("name") };
            let state = FilterState::new().with_search(search).with_sort(sort);

            let first = compose(&people, &state);
            let second = compose(&people, &state);
            prop_assert_eq!(&first, &second);
            prop_assert_eq!(first.filtered_count, first.items.len());
            prop_assert!(first.filtered_count <= first.total_count);
            prop_assert_eq!(first.total_count, people.len());
        }

        /// Property: the default state keeps every record.
        #[test]
        fn default_state_is_identity(n in 0usize..30) {
            let people: Vec<Person> = (0..n as u32).map(|i| person(i, "p", None, None)).collect();
            let view = compose(&people, &FilterState::new());
            prop_assert_eq!(view.items, people);
        }
    }
}
