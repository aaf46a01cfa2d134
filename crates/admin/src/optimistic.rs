//! Optimistic updates over a cached collection.
//!
//! `begin_*` snapshots the current collection (an `Arc`, so the snapshot is
//! free), returns a new collection with the change applied, and hands back an
//! [`OptimisticUpdate`] that either commits or rolls back to the snapshot.
//!
//! ```text
//! Pending ──commit──▶ Committed
//!    └─────rollback──▶ RolledBack
//! ```

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use userdesk_core::{DomainError, DomainResult};
use userdesk_view::Record;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OptimisticStatus {
    Pending,
    Committed,
    RolledBack,
}

#[derive(Debug)]
pub struct OptimisticUpdate<R> {
    snapshot: Arc<Vec<R>>,
    status: OptimisticStatus,
}

impl<R: Record> OptimisticUpdate<R> {
    /// Apply `mutate` to the record with `id`.
    pub fn begin_edit<F>(
        current: &Arc<Vec<R>>,
        id: &R::Id,
        mutate: F,
    ) -> DomainResult<(Self, Arc<Vec<R>>)>
    where
        F: FnOnce(&mut R),
    {
        let position = find(current, id)?;
        let mut next = current.as_ref().clone();
        mutate(&mut next[position]);
        Ok((Self::pending(current), Arc::new(next)))
    }

    /// Remove the record with `id`.
    pub fn begin_remove(current: &Arc<Vec<R>>, id: &R::Id) -> DomainResult<(Self, Arc<Vec<R>>)> {
        let position = find(current, id)?;
        let mut next = current.as_ref().clone();
        next.remove(position);
        Ok((Self::pending(current), Arc::new(next)))
    }

    /// Insert `record` at the front (where a newly created row shows up).
    pub fn begin_insert(current: &Arc<Vec<R>>, record: R) -> (Self, Arc<Vec<R>>) {
        let mut next = Vec::with_capacity(current.len() + 1);
        next.push(record);
        next.extend(current.iter().cloned());
        (Self::pending(current), Arc::new(next))
    }

    fn pending(current: &Arc<Vec<R>>) -> Self {
        Self {
            snapshot: Arc::clone(current),
            status: OptimisticStatus::Pending,
        }
    }

    pub fn status(&self) -> OptimisticStatus {
        self.status
    }

    /// The server accepted the change; the optimistic collection stands.
    pub fn commit(&mut self) -> DomainResult<()> {
        self.ensure_pending("commit")?;
        self.status = OptimisticStatus::Committed;
        Ok(())
    }

    /// The server rejected the change; returns the pre-change collection.
    pub fn rollback(&mut self) -> DomainResult<Arc<Vec<R>>> {
        self.ensure_pending("rollback")?;
        self.status = OptimisticStatus::RolledBack;
        debug!(rows = self.snapshot.len(), "optimistic update rolled back");
        Ok(Arc::clone(&self.snapshot))
    }

    fn ensure_pending(&self, transition: &str) -> DomainResult<()> {
        if self.status != OptimisticStatus::Pending {
            warn!(status = ?self.status, transition, "optimistic update already settled");
            return Err(DomainError::conflict(format!(
                "cannot {transition} an update that is {:?}",
                self.status
            )));
        }
        Ok(())
    }
}

fn find<R: Record>(collection: &[R], id: &R::Id) -> DomainResult<usize> {
    collection
        .iter()
        .position(|record| record.id() == id)
        .ok_or_else(DomainError::not_found)
}
