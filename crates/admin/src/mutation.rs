//! Admin mutations and the cached queries each one makes stale.

use tracing::debug;
use userdesk_core::{RoleId, UserId};
use userdesk_view::{QueryCache, QueryKey};

use crate::{Role, keys};

/// A write sent to the backend from the admin screens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdminMutation {
    UpdateUser(UserId),
    ApproveUser(UserId),
    DeleteUser(UserId),
    AssignRole { user_id: UserId, role: Role },
    CreateRole,
    UpdateRole(RoleId),
    DeleteRole(RoleId),
    /// The signed-in user edits their own profile.
    UpdateProfile,
    /// GDPR erasure of an account.
    DeleteAccount(UserId),
}

impl AdminMutation {
    /// Query prefixes to invalidate once the mutation succeeds.
    ///
    /// Every admin write is audited server-side, so audit logs are always
    /// stale afterwards.
    pub fn invalidates(&self) -> Vec<QueryKey> {
        let mut stale = match self {
            Self::UpdateUser(_) | Self::ApproveUser(_) => vec![keys::users(), keys::user_stats()],
            Self::DeleteUser(_) | Self::DeleteAccount(_) => {
                vec![keys::users(), keys::user_stats(), keys::roles(), keys::profile()]
            }
            Self::AssignRole { .. } => vec![keys::users(), keys::user_stats(), keys::roles()],
            Self::CreateRole | Self::UpdateRole(_) => vec![keys::roles()],
            Self::DeleteRole(_) => vec![keys::roles(), keys::users()],
            Self::UpdateProfile => vec![keys::profile(), keys::users()],
        };
        stale.push(keys::audit_logs());
        stale
    }

    /// Drop every stale entry from `cache`; returns how many were removed.
    pub fn invalidate<V: Clone>(&self, cache: &QueryCache<V>) -> usize {
        let removed: usize = self
            .invalidates()
            .iter()
            .map(|prefix| cache.invalidate(prefix))
            .sum();
        debug!(mutation = ?self, removed, "invalidated cached queries");
        removed
    }
}
