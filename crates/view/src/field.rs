//! Typed field-descriptor tables.
//!
//! Each record type publishes a static table of [`FieldDescriptor`]s. Filter
//! and sort selections arrive from the UI as field *names*; they are resolved
//! against that table once, and from then on every access goes through a
//! typed accessor instead of a string lookup into the record.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use userdesk_core::Entity;

// ─────────────────────────────────────────────────────────────────────────────
// Field values
// ─────────────────────────────────────────────────────────────────────────────

/// A scalar read from a record through its accessor.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FieldValue {
    /// Absent, `null`, or unparsable.
    Null,
    Text(String),
    Bool(bool),
    Integer(i64),
    Timestamp(DateTime<Utc>),
}

impl FieldValue {
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    /// `None` becomes [`FieldValue::Null`].
    pub fn opt_text(value: Option<&str>) -> Self {
        value.map_or(Self::Null, Self::text)
    }

    /// Parse a backend timestamp string; anything unparsable is `Null`.
    pub fn timestamp(raw: Option<&str>) -> Self {
        raw.and_then(parse_instant)
            .map_or(Self::Null, Self::Timestamp)
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    /// The string an exact-match filter value is compared against.
    pub fn filter_key(&self) -> Option<String> {
        match self {
            Self::Null => None,
            Self::Text(s) => Some(s.clone()),
            Self::Bool(b) => Some(b.to_string()),
            Self::Integer(n) => Some(n.to_string()),
            Self::Timestamp(t) => Some(t.to_rfc3339()),
        }
    }
}

/// How values of a field are ordered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Integer,
    Boolean,
    Timestamp,
}

// ─────────────────────────────────────────────────────────────────────────────
// Descriptors
// ─────────────────────────────────────────────────────────────────────────────

/// One row of a record's field table.
pub struct FieldDescriptor<R> {
    /// Backend key (also the name used by filter/sort state).
    pub name: &'static str,
    /// Human-readable column label.
    pub label: &'static str,
    pub kind: FieldKind,
    pub accessor: fn(&R) -> FieldValue,
}

impl<R> FieldDescriptor<R> {
    pub fn value(&self, record: &R) -> FieldValue {
        (self.accessor)(record)
    }
}

impl<R> Clone for FieldDescriptor<R> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<R> Copy for FieldDescriptor<R> {}

impl<R> core::fmt::Debug for FieldDescriptor<R> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("FieldDescriptor")
            .field("name", &self.name)
            .field("label", &self.label)
            .field("kind", &self.kind)
            .finish()
    }
}

/// A record that can flow through the view engine.
pub trait Record: Entity + Clone + Sized + 'static {
    /// Every filterable/sortable field of this record type.
    fn fields() -> &'static [FieldDescriptor<Self>];

    /// Fields matched by free-text search (any of them may match).
    fn search_fields() -> &'static [&'static str] {
        &[]
    }

    /// Field used for date-range filtering.
    fn timestamp_field() -> Option<&'static str> {
        None
    }

    /// Resolve a field name against [`Record::fields`].
    fn field(name: &str) -> Option<&'static FieldDescriptor<Self>> {
        Self::fields().iter().find(|f| f.name == name)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Timestamp parsing
// ─────────────────────────────────────────────────────────────────────────────

/// Parse an ISO-8601 instant as the backend emits it.
///
/// Accepts RFC 3339, naive date-times (taken as UTC) and bare dates
/// (midnight UTC). Returns `None` for anything else, including empty input.
pub fn parse_instant(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }

    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(naive.and_utc());
        }
    }

    parse_date(raw)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// `Some` only for a bare `YYYY-MM-DD` date.
pub(crate) fn parse_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").ok()
}
