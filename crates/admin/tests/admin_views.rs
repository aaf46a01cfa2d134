use std::cell::RefCell;
use std::sync::Arc;

use chrono::{Duration, NaiveDate, TimeZone, Utc};
use serde_json::json;
use userdesk_admin::{
    AdminMutation, OptimisticUpdate, UserRecord, UserStats, audit, keys, roles, user,
};
use userdesk_core::UserId;
use userdesk_view::{
    CollectionPayload, DownloadSink, ExportColumn, ExportError, ExportFormat, FilterLifecycle,
    FilterState, FilterStatus, QueryCache, SortSpec, ViewConfig, ViewMemo, compose, export,
    parse_csv, to_csv,
};

fn id(n: u128) -> String {
    UserId::from_u128(n).to_string()
}

/// The three-user set the admin table is specified against.
fn three_users() -> Vec<UserRecord> {
    serde_json::from_value(json!([
        { "user_id": id(1), "email": "a@x.com", "role": "admin", "created_at": "2025-01-01", "is_active": true },
        { "user_id": id(2), "email": "b@x.com", "role": "user", "created_at": "2025-02-01", "is_active": true },
        { "user_id": id(3), "email": "c@x.com", "role": "user", "created_at": null }
    ]))
    .unwrap()
}

fn ids(items: &[UserRecord]) -> Vec<UserId> {
    items.iter().map(|u| u.user_id).collect()
}

#[derive(Default)]
struct CapturingSink {
    files: RefCell<Vec<(String, String, Vec<u8>)>>,
}

impl DownloadSink for CapturingSink {
    fn download(&self, bytes: &[u8], filename: &str, mime_type: &str) -> Result<(), ExportError> {
        self.files
            .borrow_mut()
            .push((filename.to_string(), mime_type.to_string(), bytes.to_vec()));
        Ok(())
    }
}

#[test]
fn role_filter_with_descending_date_keeps_null_last() {
    userdesk_observability::init();

    let state = FilterState::new()
        .with_exact("role", "user")
        .with_sort(SortSpec::desc("created_at"));
    let view = compose(&three_users(), &state);

    assert_eq!(ids(&view.items), vec![UserId::from_u128(2), UserId::from_u128(3)]);
    assert_eq!(view.filtered_count, 2);
    assert_eq!(view.total_count, 3);
}

#[test]
fn search_is_case_insensitive_on_email() {
    let view = compose(&three_users(), &FilterState::new().with_search("A@X"));
    assert_eq!(ids(&view.items), vec![UserId::from_u128(1)]);
}

#[test]
fn csv_export_of_filtered_rows() {
    let view = compose(&three_users(), &FilterState::new().with_search("A@X"));
    let columns = vec![
        ExportColumn::new("ID", |u: &UserRecord| Some(u.user_id.as_uuid().as_u128().to_string())),
        ExportColumn::new("Email", |u: &UserRecord| Some(u.email.clone())),
    ];
    assert_eq!(to_csv(&view.items, &columns), "\"ID\",\"Email\"\n\"1\",\"a@x.com\"");
}

#[test]
fn default_user_export_downloads_dated_csv() {
    let sink = CapturingSink::default();
    let view = compose(&three_users(), &user::default_filters());
    let date = NaiveDate::from_ymd_opt(2025, 10, 19).unwrap();

    let filename = export(&view.items, &user::export_spec(ExportFormat::Csv), &sink, date).unwrap();
    assert_eq!(filename, "users-export-2025-10-19.csv");

    let files = sink.files.borrow();
    let (_, mime, bytes) = &files[0];
    assert_eq!(mime, "text/csv;charset=utf-8");

    let rows = parse_csv(std::str::from_utf8(bytes).unwrap()).unwrap();
    assert_eq!(rows.len(), 4);
    assert_eq!(rows[0][1], "Email");
    let emails: Vec<&str> = rows[1..].iter().map(|r| r[1].as_str()).collect();
    assert_eq!(emails, vec!["b@x.com", "a@x.com", "c@x.com"]);
}

#[test]
fn paginated_envelope_and_bare_array_decode_alike() {
    let bare: CollectionPayload<UserRecord> =
        serde_json::from_value(serde_json::to_value(three_users()).unwrap()).unwrap();
    let paged: CollectionPayload<UserRecord> = serde_json::from_value(json!({
        "items": serde_json::to_value(three_users()).unwrap(),
        "total": 42,
        "page_size": 3,
        "has_next": true
    }))
    .unwrap();

    assert_eq!(bare.items(), paged.items());
    assert_eq!(bare.total(), 3);
    assert_eq!(paged.total(), 42);
}

#[test]
fn filter_edits_reuse_memo_until_collection_changes() {
    let collection = Arc::new(three_users());
    let mut lifecycle = FilterLifecycle::new(user::default_filters());
    let mut memo = ViewMemo::new();

    let first = memo.view(&collection, lifecycle.state());
    let again = memo.view(&collection, lifecycle.state());
    assert!(Arc::ptr_eq(&first, &again));

    lifecycle.set_exact("role", "admin");
    assert_eq!(lifecycle.status(), FilterStatus::Modified);
    let admins = memo.view(&collection, lifecycle.state());
    assert_eq!(admins.filtered_count, 1);

    lifecycle.clear();
    assert_eq!(lifecycle.status(), FilterStatus::Default);

    let refetched = Arc::new(three_users());
    let fresh = memo.view(&refetched, lifecycle.state());
    assert!(!Arc::ptr_eq(&first, &fresh));
    assert_eq!(memo.stats().hits, 1);
    assert_eq!(memo.stats().misses, 3);
}

#[test]
fn approving_a_user_rolls_back_and_invalidates() {
    let cache: QueryCache<Arc<Vec<UserRecord>>> = QueryCache::new();
    let config = ViewConfig::default();
    let page_key = keys::users_page(1, config.default_page_size);
    let fetched_at = Utc.with_ymd_and_hms(2025, 10, 19, 9, 0, 0).unwrap();

    let current = Arc::new(three_users());
    cache.insert_at(page_key.clone(), Arc::clone(&current), fetched_at);
    cache.insert_at(keys::roles(), Arc::new(Vec::new()), fetched_at);

    let target = UserId::from_u128(2);
    let (mut update, optimistic) =
        OptimisticUpdate::begin_edit(&current, &target, |u| u.is_approved = true).unwrap();
    cache.insert_at(page_key.clone(), Arc::clone(&optimistic), fetched_at);

    let stats = UserStats::from_view(&compose(&optimistic, &FilterState::new()));
    assert_eq!(stats.approved, 1);

    // Backend rejected the approval.
    let restored = update.rollback().unwrap();
    cache.insert_at(page_key.clone(), restored, fetched_at);
    let cached = cache
        .get_fresh(&page_key, Duration::minutes(5), fetched_at + Duration::minutes(1))
        .unwrap();
    assert!(cached.iter().all(|u| !u.is_approved));

    let removed = AdminMutation::ApproveUser(target).invalidate(&cache);
    assert_eq!(removed, 1);
    assert!(cache.get(&page_key).is_none());
    assert!(cache.get(&keys::roles()).is_some());
}

#[test]
fn audit_and_role_exports_use_their_prefixes() {
    let date = NaiveDate::from_ymd_opt(2025, 1, 2).unwrap();
    assert_eq!(
        audit::export_spec(ExportFormat::Json).filename(date),
        "audit-logs-export-2025-01-02.json"
    );
    assert_eq!(
        roles::export_spec(ExportFormat::Csv).filename(date),
        "roles-export-2025-01-02.csv"
    );
    assert!(matches!(
        roles::export_spec(ExportFormat::Xlsx).render(&[]),
        Err(ExportError::UnsupportedFormat(ExportFormat::Xlsx))
    ));
}
