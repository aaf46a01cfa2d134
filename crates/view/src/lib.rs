//! `userdesk-view` — the derived-view engine behind every admin list.
//!
//! A fetched collection plus a client-held [`FilterState`] goes in; a filtered,
//! ordered, countable [`DerivedView`] comes out. Everything here is pure and
//! synchronous: no I/O except the explicit [`DownloadSink`] used by exports.
//!
//! Pipeline:
//!
//! ```text
//! collection ──▶ Predicate (per record) ──▶ sort (stable, nulls last)
//!            ──▶ DerivedView { items, filtered_count, total_count }
//!            ──▶ paginate / summarize / export
//! ```

pub mod cache;
pub mod compose;
pub mod config;
pub mod envelope;
pub mod export;
pub mod field;
pub mod filter;
pub mod paginate;
pub mod sort;
pub mod state;
pub mod summary;

#[cfg(test)]
pub(crate) mod testing;

pub use cache::{CachedEntry, MemoStats, QueryCache, QueryKey, ViewMemo};
pub use compose::{DerivedView, compose};
pub use config::ViewConfig;
pub use envelope::{CollectionPayload, Paginated};
pub use export::{
    DirectorySink, DownloadSink, ExportColumn, ExportError, ExportFormat, ExportSpec,
    export, export_filename, parse_csv, to_csv, to_json,
};
pub use field::{FieldDescriptor, FieldKind, FieldValue, Record, parse_instant};
pub use filter::{Predicate, passes};
pub use paginate::{Page, paginate};
pub use sort::{compare_keys, compare_values, sorted};
pub use state::{
    DateRange, Direction, ExactFilter, FilterLifecycle, FilterState, FilterStatus, SortSpec,
};
pub use summary::{Counts, Summary, UNSET_BUCKET, summarize};
