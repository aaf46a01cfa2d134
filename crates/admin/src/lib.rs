//! `userdesk-admin` — the admin list domains (users, audit logs, roles).
//!
//! Each domain supplies its record shape (exact backend keys), a typed field
//! table for the view engine, the default filter state its list mounts with,
//! and its export columns. Query keys, mutation invalidation, optimistic
//! updates and dashboard rollups sit on top.

pub mod audit;
pub mod dashboard;
pub mod keys;
pub mod mutation;
pub mod optimistic;
pub mod permissions;
pub mod roles;
pub mod user;

pub use audit::{AuditLogEntry, Outcome, Severity};
pub use dashboard::{AuditSummary, UserStats};
pub use mutation::AdminMutation;
pub use optimistic::{OptimisticStatus, OptimisticUpdate};
pub use permissions::Permission;
pub use roles::{Role, RoleRecord};
pub use user::UserRecord;
