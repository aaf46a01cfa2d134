//! User records as listed by `GET /admin/users`.

use serde::{Deserialize, Serialize};
use userdesk_core::{Entity, UserId};
use userdesk_view::{
    ExportColumn, ExportFormat, ExportSpec, FieldDescriptor, FieldKind, FieldValue, FilterState,
    Record, SortSpec,
};

use crate::Role;

// ─────────────────────────────────────────────────────────────────────────────
// Record
// ─────────────────────────────────────────────────────────────────────────────

/// A user account row.
///
/// Field names are the backend's keys. Everything but the id and email may be
/// missing; a missing value behaves as null in filters and sorts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserRecord {
    pub user_id: UserId,
    pub email: String,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub role: Option<Role>,
    #[serde(default)]
    pub is_active: bool,
    #[serde(default)]
    pub is_verified: bool,
    #[serde(default)]
    pub is_approved: bool,
    #[serde(default)]
    pub created_at: Option<String>,
    /// `None` for accounts that never logged in.
    #[serde(default)]
    pub last_login_at: Option<String>,
}

impl UserRecord {
    /// `"First Last"`, or whichever half exists.
    pub fn full_name(&self) -> Option<String> {
        let parts: Vec<&str> = [self.first_name.as_deref(), self.last_name.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect();
        (!parts.is_empty()).then(|| parts.join(" "))
    }

    /// Display status as the admin table shows it.
    pub fn status_label(&self) -> &'static str {
        match (self.is_active, self.is_approved) {
            (false, _) => "inactive",
            (true, false) => "pending approval",
            (true, true) => "active",
        }
    }
}

impl Entity for UserRecord {
    type Id = UserId;

    fn id(&self) -> &UserId {
        &self.user_id
    }
}

const USER_FIELDS: &[FieldDescriptor<UserRecord>] = &[
    FieldDescriptor {
        name: "user_id",
        label: "ID",
        kind: FieldKind::Text,
        accessor: |u: &UserRecord| FieldValue::text(u.user_id.to_string()),
    },
    FieldDescriptor {
        name: "email",
        label: "Email",
        kind: FieldKind::Text,
        accessor: |u: &UserRecord| FieldValue::text(&u.email),
    },
    FieldDescriptor {
        name: "first_name",
        label: "First Name",
        kind: FieldKind::Text,
        accessor: |u: &UserRecord| FieldValue::opt_text(u.first_name.as_deref()),
    },
    FieldDescriptor {
        name: "last_name",
        label: "Last Name",
        kind: FieldKind::Text,
        accessor: |u: &UserRecord| FieldValue::opt_text(u.last_name.as_deref()),
    },
    FieldDescriptor {
        name: "full_name",
        label: "Name",
        kind: FieldKind::Text,
        accessor: |u: &UserRecord| u.full_name().map_or(FieldValue::Null, FieldValue::Text),
    },
    FieldDescriptor {
        name: "role",
        label: "Role",
        kind: FieldKind::Text,
        accessor: |u: &UserRecord| FieldValue::opt_text(u.role.as_ref().map(Role::as_str)),
    },
    FieldDescriptor {
        name: "is_active",
        label: "Active",
        kind: FieldKind::Boolean,
        accessor: |u: &UserRecord| FieldValue::Bool(u.is_active),
    },
    FieldDescriptor {
        name: "is_verified",
        label: "Verified",
        kind: FieldKind::Boolean,
        accessor: |u: &UserRecord| FieldValue::Bool(u.is_verified),
    },
    FieldDescriptor {
        name: "is_approved",
        label: "Approved",
        kind: FieldKind::Boolean,
        accessor: |u: &UserRecord| FieldValue::Bool(u.is_approved),
    },
    FieldDescriptor {
        name: "created_at",
        label: "Created",
        kind: FieldKind::Timestamp,
        accessor: |u: &UserRecord| FieldValue::timestamp(u.created_at.as_deref()),
    },
    FieldDescriptor {
        name: "last_login_at",
        label: "Last Login",
        kind: FieldKind::Timestamp,
        accessor: |u: &UserRecord| FieldValue::timestamp(u.last_login_at.as_deref()),
    },
];

impl Record for UserRecord {
    fn fields() -> &'static [FieldDescriptor<Self>] {
        USER_FIELDS
    }

    fn search_fields() -> &'static [&'static str] {
        &["email", "first_name", "last_name", "full_name"]
    }

    fn timestamp_field() -> Option<&'static str> {
        Some("created_at")
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// List defaults and export
// ─────────────────────────────────────────────────────────────────────────────

pub const EXPORT_PREFIX: &str = "users-export";

/// Newest accounts first, every select box on "all".
pub fn default_filters() -> FilterState {
    FilterState::new()
        .with_exact("role", "all")
        .with_exact("is_active", "all")
        .with_exact("is_verified", "all")
        .with_exact("is_approved", "all")
        .with_sort(SortSpec::desc("created_at"))
}

pub fn export_columns() -> Vec<ExportColumn<UserRecord>> {
    vec![
        ExportColumn::new("ID", |u: &UserRecord| Some(u.user_id.to_string())),
        ExportColumn::new("Email", |u: &UserRecord| Some(u.email.clone())),
        ExportColumn::new("First Name", |u: &UserRecord| u.first_name.clone()),
        ExportColumn::new("Last Name", |u: &UserRecord| u.last_name.clone()),
        ExportColumn::new("Role", |u: &UserRecord| u.role.as_ref().map(Role::to_string)),
        ExportColumn::new("Status", |u: &UserRecord| Some(u.status_label().to_string())),
        ExportColumn::new("Verified", |u: &UserRecord| Some(u.is_verified.to_string())),
        ExportColumn::new("Created", |u: &UserRecord| u.created_at.clone()),
        ExportColumn::new("Last Login", |u: &UserRecord| u.last_login_at.clone()),
    ]
}

pub fn export_spec(format: ExportFormat) -> ExportSpec<UserRecord> {
    ExportSpec::new(format, EXPORT_PREFIX, export_columns())
}

#[cfg(test)]
mod tests {
    use super::*;
    use userdesk_view::{ExactFilter, compose};

    fn user(n: u128, email: &str, first: Option<&str>, last: Option<&str>) -> UserRecord {
        UserRecord {
            user_id: UserId::from_u128(n),
            email: email.to_string(),
            first_name: first.map(str::to_string),
            last_name: last.map(str::to_string),
            role: Some(Role::new("user")),
            is_active: true,
            is_verified: true,
            is_approved: true,
            created_at: None,
            last_login_at: None,
        }
    }

    #[test]
    fn full_name_joins_present_halves() {
        assert_eq!(
            user(1, "a@x.com", Some("Ada"), Some("Lovelace")).full_name().as_deref(),
            Some("Ada Lovelace")
        );
        assert_eq!(user(2, "b@x.com", None, Some("Hopper")).full_name().as_deref(), Some("Hopper"));
        assert_eq!(user(3, "c@x.com", Some("  "), None).full_name(), None);
    }

    #[test]
    fn search_matches_across_name_boundary() {
        let users = vec![
            user(1, "ada@x.com", Some("Ada"), Some("Lovelace")),
            user(2, "grace@x.com", Some("Grace"), Some("Hopper")),
        ];
        let view = compose(&users, &FilterState::new().with_search("ada love"));
        assert_eq!(view.items.len(), 1);
        assert_eq!(view.items[0].user_id, UserId::from_u128(1));
    }

    #[test]
    fn deserializes_backend_shape_with_missing_fields() {
        let json = serde_json::json!({
            "user_id": UserId::from_u128(9).to_string(),
            "email": "new@x.com",
            "role": null,
            "is_active": true,
            "created_at": "2025-10-01T12:00:00Z"
        });
        let u: UserRecord = serde_json::from_value(json).unwrap();
        assert_eq!(u.role, None);
        assert!(!u.is_approved);
        assert_eq!(u.last_login_at, None);
        assert_eq!(u.status_label(), "pending approval");
    }

    #[test]
    fn role_unset_filter_finds_users_without_role() {
        let mut users = vec![
            user(1, "a@x.com", None, None),
            user(2, "b@x.com", None, None),
        ];
        users[1].role = None;
        let view = compose(&users, &FilterState::new().with_exact("role", ExactFilter::Unset));
        assert_eq!(view.items.len(), 1);
        assert_eq!(view.items[0].email, "b@x.com");
    }
}
