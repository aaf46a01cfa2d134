//! Stable multi-kind comparator with direction-invariant nulls-last.

use core::cmp::Ordering;

use tracing::warn;
use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

use crate::field::{FieldValue, Record};
use crate::state::{Direction, SortSpec};

/// Order two non-null values of (normally) the same kind.
///
/// Mismatched kinds can only come from malformed records; they are ordered by
/// kind so the comparison stays total.
pub fn compare_values(a: &FieldValue, b: &FieldValue) -> Ordering {
    match (a, b) {
        (FieldValue::Text(a), FieldValue::Text(b)) => collate(a, b),
        (FieldValue::Integer(a), FieldValue::Integer(b)) => a.cmp(b),
        (FieldValue::Bool(a), FieldValue::Bool(b)) => a.cmp(b),
        (FieldValue::Timestamp(a), FieldValue::Timestamp(b)) => a.cmp(b),
        _ => rank(a).cmp(&rank(b)),
    }
}

/// Compare sort keys under `direction`.
///
/// Null sorts after every non-null value in both directions; only the
/// non-null comparison is reversed for `Desc`.
pub fn compare_keys(a: &FieldValue, b: &FieldValue, direction: Direction) -> Ordering {
    match (a.is_null(), b.is_null()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => {
            let ord = compare_values(a, b);
            match direction {
                Direction::Asc => ord,
                Direction::Desc => ord.reverse(),
            }
        }
    }
}

/// Return `records` ordered by `sort`. Equal keys keep their input order.
///
/// An unknown sort field leaves the input order untouched.
pub fn sorted<R: Record>(records: Vec<R>, sort: &SortSpec) -> Vec<R> {
    let Some(descriptor) = R::field(&sort.field) else {
        warn!(field = %sort.field, "ignoring sort on unknown field");
        return records;
    };

    let mut keyed: Vec<(FieldValue, R)> = records
        .into_iter()
        .map(|record| (descriptor.value(&record), record))
        .collect();
    // `sort_by` is stable.
    keyed.sort_by(|(a, _), (b, _)| compare_keys(a, b, sort.direction));
    keyed.into_iter().map(|(_, record)| record).collect()
}

/// Three-level text collation:
///
/// 1. base letters, ignoring accents and case (`Émile` sorts with `Eve`);
/// 2. accents, unaccented first;
/// 3. case, lowercase first.
fn collate(a: &str, b: &str) -> Ordering {
    base_letters(a)
        .cmp(base_letters(b))
        .then_with(|| lowered(a).cmp(lowered(b)))
        .then_with(|| b.cmp(a))
}

fn base_letters(s: &str) -> impl Iterator<Item = char> + '_ {
    s.nfd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
}

fn lowered(s: &str) -> impl Iterator<Item = char> + '_ {
    s.nfd().flat_map(char::to_lowercase)
}

fn rank(value: &FieldValue) -> u8 {
    match value {
        FieldValue::Bool(_) => 0,
        FieldValue::Integer(_) => 1,
        FieldValue::Timestamp(_) => 2,
        FieldValue::Text(_) => 3,
        FieldValue::Null => 4,
    }
}
