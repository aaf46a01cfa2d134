//! Dashboard rollups computed from derived views.

use serde::Serialize;
use userdesk_view::{Counts, DerivedView, UNSET_BUCKET};

use crate::{AuditLogEntry, UserRecord, audit};

/// Headline numbers for the users dashboard.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct UserStats {
    pub total: usize,
    pub active: usize,
    pub inactive: usize,
    pub verified: usize,
    pub approved: usize,
    /// Active accounts still waiting for an admin.
    pub pending_approval: usize,
    pub by_role: Counts,
}

impl UserStats {
    /// Stats over the rows currently in view (filters applied).
    pub fn from_view(view: &DerivedView<UserRecord>) -> Self {
        let summary = view.summarize(&["is_active", "is_verified", "is_approved", "role"]);
        let pending_approval = view
            .items
            .iter()
            .filter(|u| u.is_active && !u.is_approved)
            .count();

        Self {
            total: summary.total,
            active: summary.count("is_active", "true"),
            inactive: summary.count("is_active", "false"),
            verified: summary.count("is_verified", "true"),
            approved: summary.count("is_approved", "true"),
            pending_approval,
            by_role: summary.counts("role").cloned().unwrap_or_default(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AuditSummary {
    pub total: usize,
    pub by_severity: Counts,
    pub by_outcome: Counts,
    pub failed_logins: usize,
}

impl AuditSummary {
    pub fn from_view(view: &DerivedView<AuditLogEntry>) -> Self {
        let summary = view.summarize(audit::SUMMARY_FIELDS);
        Self {
            total: summary.total,
            by_severity: summary.counts("severity").cloned().unwrap_or_default(),
            by_outcome: summary.counts("outcome").cloned().unwrap_or_default(),
            failed_logins: view.items.iter().filter(|e| e.is_failed_login()).count(),
        }
    }

    /// Entries with no recorded severity.
    pub fn unclassified(&self) -> usize {
        self.by_severity.get(UNSET_BUCKET).copied().unwrap_or(0)
    }
}
