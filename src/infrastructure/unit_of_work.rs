use std::collections::HashMap;

use sqlx::sqlite::SqliteConnection;
use sqlx::{Sqlite, SqlitePool, Transaction};

use crate::domain::errors::RepositoryResult;
use crate::domain::member::Member;

/// A caller-owned transaction scope with an identity arena
///
/// Wraps one database transaction together with a transaction-scoped
/// arena of members keyed by identifier. Repositories and the query
/// layer execute against the unit of work; committing, rolling back, or
/// dropping it (an implicit rollback) is the caller's responsibility.
///
/// The arena gives each unit of work repeatable reads: once a member
/// has been saved or loaded, `find_by_id` serves it from the arena
/// without touching the store. A member tracked by the arena is
/// "managed"; delete requires a managed member.
///
/// Bulk update/delete statements write straight through to the store
/// and leave the arena untouched. Before depending on their effects
/// within the same unit of work, discard the arena with [`clear`] and
/// reload.
///
/// [`clear`]: UnitOfWork::clear
pub struct UnitOfWork {
    tx: Transaction<'static, Sqlite>,
    members: HashMap<i64, Member>,
}

impl UnitOfWork {
    /// Begins a new unit of work on the given pool
    pub async fn begin(pool: &SqlitePool) -> RepositoryResult<Self> {
        let tx = pool.begin().await?;
        tracing::debug!("unit of work started");

        Ok(Self {
            tx,
            members: HashMap::new(),
        })
    }

    /// Commits the transaction, consuming the unit of work
    pub async fn commit(self) -> RepositoryResult<()> {
        self.tx.commit().await?;
        tracing::debug!("unit of work committed");
        Ok(())
    }

    /// Rolls the transaction back, consuming the unit of work
    pub async fn rollback(self) -> RepositoryResult<()> {
        self.tx.rollback().await?;
        tracing::debug!("unit of work rolled back");
        Ok(())
    }

    /// Discards every tracked member
    ///
    /// The explicit invalidation step required after bulk operations.
    /// Previously loaded members become unmanaged: reading them again
    /// goes back to the store, and deleting them first requires a
    /// re-read.
    pub fn clear(&mut self) {
        tracing::debug!(discarded = self.members.len(), "identity arena cleared");
        self.members.clear();
    }

    /// The transaction's connection, for repositories and queries
    pub(crate) fn connection(&mut self) -> &mut SqliteConnection {
        &mut *self.tx
    }

    /// Tracks a saved or loaded member in the arena
    pub(crate) fn track(&mut self, member: &Member) {
        if let Some(id) = member.id() {
            self.members.insert(id, member.clone());
        }
    }

    /// Returns the tracked member with the given id, if any
    pub(crate) fn tracked(&self, id: i64) -> Option<Member> {
        self.members.get(&id).cloned()
    }

    /// Whether the arena tracks the given id
    pub(crate) fn is_tracked(&self, id: i64) -> bool {
        self.members.contains_key(&id)
    }

    /// Drops one member from the arena
    pub(crate) fn evict(&mut self, id: i64) {
        self.members.remove(&id);
    }
}
