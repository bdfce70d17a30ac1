use async_trait::async_trait;

use crate::domain::errors::RepositoryResult;
use crate::domain::member::Member;
use crate::infrastructure::unit_of_work::UnitOfWork;

/// Repository trait for the Member entity
///
/// Defines the persistence gateway surface. Every operation executes
/// inside a unit of work owned by the caller; the repository itself
/// never begins or commits transactions.
#[async_trait]
pub trait MemberRepository: Send + Sync {
    /// Save a member
    ///
    /// A member without an identifier is inserted and returned carrying
    /// the store-assigned identifier. A member with an identifier is
    /// updated. Either way the returned value is the instance tracked
    /// by the unit of work; callers must use it, not the input, for
    /// subsequent operations.
    ///
    /// # Errors
    /// `StaleState` if an update matched no rows; `ConstraintViolation`
    /// on store-level constraint failure.
    async fn save(&self, uow: &mut UnitOfWork, member: Member) -> RepositoryResult<Member>;

    /// Delete a member
    ///
    /// # Errors
    /// `NotManaged` if the current unit of work does not track the
    /// member (never saved or loaded in this unit of work, or discarded
    /// by `clear`).
    async fn delete(&self, uow: &mut UnitOfWork, member: &Member) -> RepositoryResult<()>;

    /// Find a member by its identifier
    ///
    /// An absent row is `Ok(None)`, not an error. A member already
    /// tracked by the unit of work is returned as tracked, without
    /// touching the store (repeatable read within one unit of work).
    async fn find_by_id(&self, uow: &mut UnitOfWork, id: i64) -> RepositoryResult<Option<Member>>;

    /// Find all members, in unspecified order
    async fn find_all(&self, uow: &mut UnitOfWork) -> RepositoryResult<Vec<Member>>;
}
