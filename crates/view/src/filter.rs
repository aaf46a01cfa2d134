//! Per-record filter predicate.
//!
//! A [`FilterState`] is compiled once per composition into a [`Predicate`]:
//! field names are resolved against the record's descriptor table, the search
//! text is lower-cased and date bounds are parsed. Selections that cannot be
//! resolved (unknown field, unparsable date) drop out of the predicate so they
//! never exclude anything.

use chrono::{DateTime, Utc};
use tracing::warn;

use crate::field::{FieldDescriptor, FieldValue, Record};
use crate::state::{ExactFilter, FilterState};

/// Compiled form of a [`FilterState`] for record type `R`.
#[derive(Debug)]
pub struct Predicate<'s, R: 'static> {
    exact: Vec<(&'static FieldDescriptor<R>, &'s ExactFilter)>,
    search: Option<String>,
    search_fields: Vec<&'static FieldDescriptor<R>>,
    timestamp: Option<&'static FieldDescriptor<R>>,
    lower: Option<DateTime<Utc>>,
    upper: Option<DateTime<Utc>>,
}

impl<'s, R: Record> Predicate<'s, R> {
    pub fn compile(state: &'s FilterState) -> Self {
        let mut exact = Vec::new();
        for (name, filter) in &state.exact {
            if filter.is_all() {
                continue;
            }
            match R::field(name) {
                Some(descriptor) => exact.push((descriptor, filter)),
                None => warn!(field = %name, "ignoring filter on unknown field"),
            }
        }

        let search = (!state.search.is_empty()).then(|| state.search.to_lowercase());
        let search_fields = R::search_fields()
            .iter()
            .filter_map(|name| R::field(name))
            .collect();

        let range = &state.date_range;
        let lower = range.lower();
        let upper = range.upper();
        if range.from.is_some() && lower.is_none() {
            warn!(bound = ?range.from, "ignoring unparsable lower date bound");
        }
        if range.to.is_some() && upper.is_none() {
            warn!(bound = ?range.to, "ignoring unparsable upper date bound");
        }

        Self {
            exact,
            search,
            search_fields,
            timestamp: R::timestamp_field().and_then(R::field),
            lower,
            upper,
        }
    }

    /// True when every active selection accepts `record`.
    pub fn matches(&self, record: &R) -> bool {
        self.matches_exact(record) && self.matches_search(record) && self.matches_range(record)
    }

    fn matches_exact(&self, record: &R) -> bool {
        self.exact.iter().all(|(descriptor, filter)| {
            let value = descriptor.value(record);
            match filter {
                ExactFilter::All => true,
                ExactFilter::Unset => value.is_null(),
                ExactFilter::Value(wanted) => value.filter_key().as_deref() == Some(wanted.as_str()),
            }
        })
    }

    // Any searchable field may match.
    fn matches_search(&self, record: &R) -> bool {
        let Some(needle) = &self.search else {
            return true;
        };
        self.search_fields.iter().any(|descriptor| {
            match descriptor.value(record) {
                FieldValue::Text(text) => text.to_lowercase().contains(needle.as_str()),
                _ => false,
            }
        })
    }

    fn matches_range(&self, record: &R) -> bool {
        if self.lower.is_none() && self.upper.is_none() {
            return true;
        }
        let Some(descriptor) = self.timestamp else {
            return true;
        };
        match descriptor.value(record) {
            FieldValue::Timestamp(at) => {
                self.lower.is_none_or(|lower| at >= lower)
                    && self.upper.is_none_or(|upper| at <= upper)
            }
            _ => false,
        }
    }
}

/// One-shot form of [`Predicate::matches`].
pub fn passes<R: Record>(record: &R, state: &FilterState) -> bool {
    Predicate::<R>::compile(state).matches(record)
}
