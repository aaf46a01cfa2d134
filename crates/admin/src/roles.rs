//! Roles: the role name carried on users and the role records listed by admins.

use std::borrow::Cow;

use serde::{Deserialize, Serialize};
use userdesk_core::{Entity, RoleId};
use userdesk_view::{
    ExportColumn, ExportFormat, ExportSpec, FieldDescriptor, FieldKind, FieldValue, FilterState,
    Record, SortSpec,
};

use crate::Permission;

/// Role name used for RBAC (`"admin"`, `"user"`, ...).
///
/// Opaque at this layer; what a role grants lives on its [`RoleRecord`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Role(Cow<'static, str>);

impl Role {
    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for Role {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Role record
// ─────────────────────────────────────────────────────────────────────────────

/// One row of `GET /admin/roles`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoleRecord {
    pub role_id: RoleId,
    pub name: Role,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub permissions: Vec<Permission>,
    #[serde(default)]
    pub user_count: Option<i64>,
    /// Built-in roles cannot be deleted.
    #[serde(default)]
    pub is_system: bool,
    #[serde(default)]
    pub created_at: Option<String>,
}

impl RoleRecord {
    pub fn grants(&self, required: &Permission) -> bool {
        self.permissions.iter().any(|p| p.grants(required))
    }
}

impl Entity for RoleRecord {
    type Id = RoleId;

    fn id(&self) -> &RoleId {
        &self.role_id
    }
}

const ROLE_FIELDS: &[FieldDescriptor<RoleRecord>] = &[
    FieldDescriptor {
        name: "role_id",
        label: "ID",
        kind: FieldKind::Text,
        accessor: |r: &RoleRecord| FieldValue::text(r.role_id.to_string()),
    },
    FieldDescriptor {
        name: "name",
        label: "Name",
        kind: FieldKind::Text,
        accessor: |r: &RoleRecord| FieldValue::text(r.name.as_str()),
    },
    FieldDescriptor {
        name: "description",
        label: "Description",
        kind: FieldKind::Text,
        accessor: |r: &RoleRecord| FieldValue::opt_text(r.description.as_deref()),
    },
    FieldDescriptor {
        name: "user_count",
        label: "Users",
        kind: FieldKind::Integer,
        accessor: |r: &RoleRecord| r.user_count.map_or(FieldValue::Null, FieldValue::Integer),
    },
    FieldDescriptor {
        name: "permission_count",
        label: "Permissions",
        kind: FieldKind::Integer,
        accessor: |r: &RoleRecord| {
            FieldValue::Integer(i64::try_from(r.permissions.len()).unwrap_or(i64::MAX))
        },
    },
    FieldDescriptor {
        name: "is_system",
        label: "System",
        kind: FieldKind::Boolean,
        accessor: |r: &RoleRecord| FieldValue::Bool(r.is_system),
    },
    FieldDescriptor {
        name: "created_at",
        label: "Created",
        kind: FieldKind::Timestamp,
        accessor: |r: &RoleRecord| FieldValue::timestamp(r.created_at.as_deref()),
    },
];

impl Record for RoleRecord {
    fn fields() -> &'static [FieldDescriptor<Self>] {
        ROLE_FIELDS
    }

    fn search_fields() -> &'static [&'static str] {
        &["name", "description"]
    }

    fn timestamp_field() -> Option<&'static str> {
        Some("created_at")
    }
}

pub const EXPORT_PREFIX: &str = "roles-export";

/// The roles table mounts sorted by name.
pub fn default_filters() -> FilterState {
    FilterState::new()
        .with_exact("is_system", "all")
        .with_sort(SortSpec::asc("name"))
}

pub fn export_columns() -> Vec<ExportColumn<RoleRecord>> {
    vec![
        ExportColumn::new("ID", |r: &RoleRecord| Some(r.role_id.to_string())),
        ExportColumn::new("Name", |r: &RoleRecord| Some(r.name.to_string())),
        ExportColumn::new("Description", |r: &RoleRecord| r.description.clone()),
        ExportColumn::new("Permissions", |r: &RoleRecord| {
            let names: Vec<&str> = r.permissions.iter().map(Permission::as_str).collect();
            Some(names.join("; "))
        }),
        ExportColumn::new("Users", |r: &RoleRecord| r.user_count.map(|n| n.to_string())),
        ExportColumn::new("System", |r: &RoleRecord| Some(r.is_system.to_string())),
        ExportColumn::new("Created", |r: &RoleRecord| r.created_at.clone()),
    ]
}

pub fn export_spec(format: ExportFormat) -> ExportSpec<RoleRecord> {
    ExportSpec::new(format, EXPORT_PREFIX, export_columns())
}
