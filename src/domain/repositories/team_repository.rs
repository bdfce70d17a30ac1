use async_trait::async_trait;

use crate::domain::errors::RepositoryResult;
use crate::domain::member::Member;
use crate::domain::team::Team;
use crate::infrastructure::unit_of_work::UnitOfWork;

/// Repository trait for the Team entity
///
/// Like the member gateway, every operation executes inside a unit of
/// work owned by the caller.
#[async_trait]
pub trait TeamRepository: Send + Sync {
    /// Save a team (insert or update)
    async fn save(&self, uow: &mut UnitOfWork, team: Team) -> RepositoryResult<Team>;

    /// Find a team by its identifier
    async fn find_by_id(&self, uow: &mut UnitOfWork, id: i64) -> RepositoryResult<Option<Team>>;

    /// Find the first team with the given name
    async fn find_by_name(&self, uow: &mut UnitOfWork, name: &str)
        -> RepositoryResult<Option<Team>>;

    /// The team's member collection, recomputed on read
    ///
    /// Returns exactly the set of persisted members whose team
    /// reference points at this team, ordered by member identifier.
    /// This derived view is the only member collection a team has;
    /// no back-references are stored.
    async fn members(&self, uow: &mut UnitOfWork, team_id: i64) -> RepositoryResult<Vec<Member>>;
}
