//! Query keys for cached backend collections.
//!
//! Keys nest so a prefix invalidates everything below it: `users()` covers
//! every page and every single-user entry.

use userdesk_core::UserId;
use userdesk_view::QueryKey;

pub fn users() -> QueryKey {
    QueryKey::new(["admin", "users"])
}

pub fn users_page(page: usize, page_size: usize) -> QueryKey {
    users()
        .child(format!("page={page}"))
        .child(format!("size={page_size}"))
}

pub fn user(user_id: UserId) -> QueryKey {
    users().child(user_id.to_string())
}

pub fn user_stats() -> QueryKey {
    QueryKey::new(["admin", "stats"])
}

pub fn roles() -> QueryKey {
    QueryKey::new(["admin", "roles"])
}

pub fn audit_logs() -> QueryKey {
    QueryKey::new(["audit", "logs"])
}

pub fn audit_logs_page(page: usize, page_size: usize) -> QueryKey {
    audit_logs()
        .child(format!("page={page}"))
        .child(format!("size={page_size}"))
}

/// The signed-in user's own profile.
pub fn profile() -> QueryKey {
    QueryKey::new(["auth", "me"])
}
