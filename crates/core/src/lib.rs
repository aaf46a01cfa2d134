//! `userdesk-core` — identity and error building blocks shared by every crate.
//!
//! Nothing in here knows about filtering or HTTP; it only names things.

pub mod entity;
pub mod error;
pub mod id;

pub use entity::Entity;
pub use error::{DomainError, DomainResult};
pub use id::{AuditLogId, RoleId, UserId};
