//! Audit log entries as listed by `GET /audit/logs`.

use serde::{Deserialize, Serialize};
use userdesk_core::{AuditLogId, Entity, UserId};
use userdesk_view::{
    ExportColumn, ExportFormat, ExportSpec, FieldDescriptor, FieldKind, FieldValue, FilterState,
    Record, SortSpec,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
    Error,
    Critical,
    /// Any level this client does not know yet.
    #[serde(other)]
    Unknown,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Warning => "warning",
            Self::Error => "error",
            Self::Critical => "critical",
            Self::Unknown => "unknown",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Success,
    Failure,
    #[serde(other)]
    Unknown,
}

impl Outcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Failure => "failure",
            Self::Unknown => "unknown",
        }
    }
}

/// One audit trail row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditLogEntry {
    pub id: AuditLogId,
    #[serde(default)]
    pub user_id: Option<UserId>,
    #[serde(default)]
    pub user_email: Option<String>,
    pub action: String,
    #[serde(default)]
    pub resource_type: Option<String>,
    #[serde(default)]
    pub resource_id: Option<String>,
    #[serde(default)]
    pub severity: Option<Severity>,
    #[serde(default)]
    pub outcome: Option<Outcome>,
    #[serde(default)]
    pub ip_address: Option<String>,
    #[serde(default)]
    pub user_agent: Option<String>,
    #[serde(default)]
    pub details: Option<serde_json::Value>,
    #[serde(default)]
    pub created_at: Option<String>,
}

impl AuditLogEntry {
    pub fn is_failed_login(&self) -> bool {
        self.outcome == Some(Outcome::Failure) && self.action.contains("login")
    }
}

impl Entity for AuditLogEntry {
    type Id = AuditLogId;

    fn id(&self) -> &AuditLogId {
        &self.id
    }
}

const AUDIT_FIELDS: &[FieldDescriptor<AuditLogEntry>] = &[
    FieldDescriptor {
        name: "id",
        label: "ID",
        kind: FieldKind::Text,
        accessor: |e: &AuditLogEntry| FieldValue::text(e.id.to_string()),
    },
    FieldDescriptor {
        name: "user_id",
        label: "User ID",
        kind: FieldKind::Text,
        accessor: |e: &AuditLogEntry| {
            e.user_id.map_or(FieldValue::Null, |id| FieldValue::text(id.to_string()))
        },
    },
    FieldDescriptor {
        name: "user_email",
        label: "User",
        kind: FieldKind::Text,
        accessor: |e: &AuditLogEntry| FieldValue::opt_text(e.user_email.as_deref()),
    },
    FieldDescriptor {
        name: "action",
        label: "Action",
        kind: FieldKind::Text,
        accessor: |e: &AuditLogEntry| FieldValue::text(&e.action),
    },
    FieldDescriptor {
        name: "resource_type",
        label: "Resource Type",
        kind: FieldKind::Text,
        accessor: |e: &AuditLogEntry| FieldValue::opt_text(e.resource_type.as_deref()),
    },
    FieldDescriptor {
        name: "resource_id",
        label: "Resource ID",
        kind: FieldKind::Text,
        accessor: |e: &AuditLogEntry| FieldValue::opt_text(e.resource_id.as_deref()),
    },
    FieldDescriptor {
        name: "severity",
        label: "Severity",
        kind: FieldKind::Text,
        accessor: |e: &AuditLogEntry| FieldValue::opt_text(e.severity.as_ref().map(Severity::as_str)),
    },
    FieldDescriptor {
        name: "outcome",
        label: "Outcome",
        kind: FieldKind::Text,
        accessor: |e: &AuditLogEntry| FieldValue::opt_text(e.outcome.as_ref().map(Outcome::as_str)),
    },
    FieldDescriptor {
        name: "ip_address",
        label: "IP Address",
        kind: FieldKind::Text,
        accessor: |e: &AuditLogEntry| FieldValue::opt_text(e.ip_address.as_deref()),
    },
    FieldDescriptor {
        name: "created_at",
        label: "Timestamp",
        kind: FieldKind::Timestamp,
        accessor: |e: &AuditLogEntry| FieldValue::timestamp(e.created_at.as_deref()),
    },
];

impl Record for AuditLogEntry {
    fn fields() -> &'static [FieldDescriptor<Self>] {
        AUDIT_FIELDS
    }

    fn search_fields() -> &'static [&'static str] {
        &["action", "user_email", "resource_type", "ip_address"]
    }

    fn timestamp_field() -> Option<&'static str> {
        Some("created_at")
    }
}

pub const EXPORT_PREFIX: &str = "audit-logs-export";

/// Fields the audit dashboard groups by.
pub const SUMMARY_FIELDS: &[&str] = &["severity", "outcome"];

/// Most recent first, no selection.
pub fn default_filters() -> FilterState {
    FilterState::new()
        .with_exact("action", "all")
        .with_exact("resource_type", "all")
        .with_exact("severity", "all")
        .with_exact("outcome", "all")
        .with_sort(SortSpec::desc("created_at"))
}

pub fn export_columns() -> Vec<ExportColumn<AuditLogEntry>> {
    vec![
        ExportColumn::new("Timestamp", |e: &AuditLogEntry| e.created_at.clone()),
        ExportColumn::new("User", |e: &AuditLogEntry| e.user_email.clone()),
        ExportColumn::new("Action", |e: &AuditLogEntry| Some(e.action.clone())),
        ExportColumn::new("Resource Type", |e: &AuditLogEntry| e.resource_type.clone()),
        ExportColumn::new("Resource ID", |e: &AuditLogEntry| e.resource_id.clone()),
        ExportColumn::new("Severity", |e: &AuditLogEntry| {
            e.severity.map(|s| s.as_str().to_string())
        }),
        ExportColumn::new("Outcome", |e: &AuditLogEntry| {
            e.outcome.map(|o| o.as_str().to_string())
        }),
        ExportColumn::new("IP Address", |e: &AuditLogEntry| e.ip_address.clone()),
        ExportColumn::new("Details", |e: &AuditLogEntry| e.details.as_ref().map(|d| d.to_string())),
    ]
}

pub fn export_spec(format: ExportFormat) -> ExportSpec<AuditLogEntry> {
    ExportSpec::new(format, EXPORT_PREFIX, export_columns())
}
