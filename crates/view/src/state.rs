//! Client-held filter/sort/search state and its lifecycle.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use userdesk_core::{DomainError, DomainResult};

use crate::field::{parse_date, parse_instant};
use crate::summary::UNSET_BUCKET;

// ─────────────────────────────────────────────────────────────────────────────
// Exact-match filters
// ─────────────────────────────────────────────────────────────────────────────

/// Selection for an exact-match field (a select box in the UI).
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExactFilter {
    /// No constraint.
    #[default]
    All,
    /// Only records whose value is null/absent.
    Unset,
    /// Only records whose value equals this one.
    Value(String),
}

impl ExactFilter {
    pub fn is_all(&self) -> bool {
        matches!(self, Self::All)
    }
}

impl From<&str> for ExactFilter {
    /// `"all"` and `""` mean "no constraint", as the select boxes send them.
    /// `"unset"` is the null sentinel, the same key summaries count nulls under,
    /// so a summary bucket key always selects exactly that bucket.
    fn from(value: &str) -> Self {
        match value {
            "" | "all" => Self::All,
            UNSET_BUCKET => Self::Unset,
            other => Self::Value(other.to_string()),
        }
    }
}

impl From<String> for ExactFilter {
    fn from(value: String) -> Self {
        Self::from(value.as_str())
    }
}

impl From<bool> for ExactFilter {
    fn from(value: bool) -> Self {
        Self::Value(value.to_string())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Date range
// ─────────────────────────────────────────────────────────────────────────────

/// Inclusive date range; either end optional.
///
/// Bounds are kept as the raw strings the user typed. A bound that does not
/// parse is ignored rather than rejected.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DateRange {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to: Option<String>,
}

impl DateRange {
    pub fn new(from: Option<&str>, to: Option<&str>) -> Self {
        Self {
            from: from.map(str::to_string),
            to: to.map(str::to_string),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.from.is_none() && self.to.is_none()
    }

    pub fn lower(&self) -> Option<DateTime<Utc>> {
        self.from.as_deref().and_then(parse_instant)
    }

    /// A bare date as upper bound covers that whole day.
    pub fn upper(&self) -> Option<DateTime<Utc>> {
        let raw = self.to.as_deref()?;
        match parse_date(raw) {
            Some(date) => date
                .and_hms_nano_opt(23, 59, 59, 999_999_999)
                .map(|naive| naive.and_utc()),
            None => parse_instant(raw),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Sorting
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    #[default]
    Asc,
    Desc,
}

impl Direction {
    pub fn flip(self) -> Self {
        match self {
            Self::Asc => Self::Desc,
            Self::Desc => Self::Asc,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SortSpec {
    pub field: String,
    #[serde(rename = "order", default)]
    pub direction: Direction,
}

impl SortSpec {
    pub fn new(field: impl Into<String>, direction: Direction) -> Self {
        Self {
            field: field.into(),
            direction,
        }
    }

    pub fn asc(field: impl Into<String>) -> Self {
        Self::new(field, Direction::Asc)
    }

    pub fn desc(field: impl Into<String>) -> Self {
        Self::new(field, Direction::Desc)
    }

    /// Parse `field` or `field:asc|desc` (the query-string form).
    pub fn parse(raw: &str) -> DomainResult<Self> {
        let (field, direction) = match raw.split_once(':') {
            Some((field, "asc")) => (field, Direction::Asc),
            Some((field, "desc")) => (field, Direction::Desc),
            Some((_, other)) => {
                return Err(DomainError::validation(format!(
                    "sort direction must be asc or desc, got `{other}`"
                )));
            }
            None => (raw, Direction::Asc),
        };

        let field = field.trim();
        if field.is_empty() {
            return Err(DomainError::validation("sort field is empty"));
        }
        Ok(Self::new(field, direction))
    }
}

impl core::fmt::Display for SortSpec {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}:{}", self.field, self.direction.as_str())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Filter state
// ─────────────────────────────────────────────────────────────────────────────

/// The full set of active selections for one list.
///
/// This is a plain value: two states with the same selections are equal and
/// hash the same, which is what the view memo keys on.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FilterState {
    #[serde(default)]
    pub exact: BTreeMap<String, ExactFilter>,
    #[serde(default)]
    pub search: String,
    #[serde(default)]
    pub date_range: DateRange,
    #[serde(default)]
    pub sort: Option<SortSpec>,
}

impl FilterState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_exact(mut self, field: impl Into<String>, value: impl Into<ExactFilter>) -> Self {
        self.exact.insert(field.into(), value.into());
        self
    }

    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = search.into();
        self
    }

    pub fn with_date_range(mut self, from: Option<&str>, to: Option<&str>) -> Self {
        self.date_range = DateRange::new(from, to);
        self
    }

    pub fn with_sort(mut self, sort: SortSpec) -> Self {
        self.sort = Some(sort);
        self
    }

    /// The selection for `field`; absent means [`ExactFilter::All`].
    pub fn exact(&self, field: &str) -> &ExactFilter {
        static ALL: ExactFilter = ExactFilter::All;
        self.exact.get(field).unwrap_or(&ALL)
    }

    /// True when no selection can exclude a record (sort is ignored).
    pub fn is_unconstrained(&self) -> bool {
        self.exact.values().all(ExactFilter::is_all)
            && self.search.is_empty()
            && self.date_range.is_empty()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Lifecycle
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterStatus {
    Default,
    Modified,
}

/// Filter state as owned by one mounted list: `Default -> Modified -> Default`.
///
/// Every setter moves to `Modified` (and stays there); only [`clear`] returns
/// to `Default`, restoring the defaults the list was created with.
///
/// [`clear`]: FilterLifecycle::clear
#[derive(Debug, Clone)]
pub struct FilterLifecycle {
    defaults: FilterState,
    current: FilterState,
    status: FilterStatus,
}

impl FilterLifecycle {
    pub fn new(defaults: FilterState) -> Self {
        Self {
            current: defaults.clone(),
            defaults,
            status: FilterStatus::Default,
        }
    }

    pub fn state(&self) -> &FilterState {
        &self.current
    }

    pub fn defaults(&self) -> &FilterState {
        &self.defaults
    }

    pub fn status(&self) -> FilterStatus {
        self.status
    }

    pub fn set_exact(&mut self, field: impl Into<String>, value: impl Into<ExactFilter>) {
        self.current.exact.insert(field.into(), value.into());
        self.touch();
    }

    pub fn set_search(&mut self, search: impl Into<String>) {
        self.current.search = search.into();
        self.touch();
    }

    pub fn set_date_range(&mut self, from: Option<&str>, to: Option<&str>) {
        self.current.date_range = DateRange::new(from, to);
        self.touch();
    }

    pub fn set_sort(&mut self, sort: SortSpec) {
        self.current.sort = Some(sort);
        self.touch();
    }

    /// Column-header click: same field flips direction, a new field starts
    /// ascending.
    pub fn toggle_sort(&mut self, field: &str) {
        let next = match &self.current.sort {
            Some(sort) if sort.field == field => SortSpec::new(field, sort.direction.flip()),
            _ => SortSpec::asc(field),
        };
        self.set_sort(next);
    }

    pub fn clear(&mut self) {
        self.current = self.defaults.clone();
        self.status = FilterStatus::Default;
    }

    fn touch(&mut self) {
        self.status = FilterStatus::Modified;
    }
}
