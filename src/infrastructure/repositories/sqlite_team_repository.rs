use async_trait::async_trait;

use crate::domain::errors::{RepositoryError, RepositoryResult};
use crate::domain::member::Member;
use crate::domain::repositories::TeamRepository;
use crate::domain::team::Team;
use crate::infrastructure::repositories::sqlite_member_repository::MemberRow;
use crate::infrastructure::unit_of_work::UnitOfWork;

#[derive(Debug, sqlx::FromRow)]
struct TeamRow {
    id: i64,
    name: String,
}

impl From<TeamRow> for Team {
    fn from(row: TeamRow) -> Self {
        Team::from_persistence(row.id, row.name)
    }
}

/// SQLite implementation of TeamRepository
#[derive(Debug, Default)]
pub struct SqliteTeamRepository;

impl SqliteTeamRepository {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl TeamRepository for SqliteTeamRepository {
    async fn save(&self, uow: &mut UnitOfWork, team: Team) -> RepositoryResult<Team> {
        match team.id() {
            None => {
                let result = sqlx::query("INSERT INTO teams (name) VALUES (?)")
                    .bind(team.name())
                    .execute(uow.connection())
                    .await?;

                Ok(Team::from_persistence(
                    result.last_insert_rowid(),
                    team.name().to_string(),
                ))
            }
            Some(id) => {
                let result = sqlx::query("UPDATE teams SET name = ? WHERE id = ?")
                    .bind(team.name())
                    .bind(id)
                    .execute(uow.connection())
                    .await?;

                if result.rows_affected() == 0 {
                    return Err(RepositoryError::StaleState(format!(
                        "team {id} no longer exists"
                    )));
                }

                Ok(team)
            }
        }
    }

    async fn find_by_id(&self, uow: &mut UnitOfWork, id: i64) -> RepositoryResult<Option<Team>> {
        let row: Option<TeamRow> = sqlx::query_as("SELECT id, name FROM teams WHERE id = ?")
            .bind(id)
            .fetch_optional(uow.connection())
            .await?;

        Ok(row.map(Team::from))
    }

    async fn find_by_name(
        &self,
        uow: &mut UnitOfWork,
        name: &str,
    ) -> RepositoryResult<Option<Team>> {
        let row: Option<TeamRow> =
            sqlx::query_as("SELECT id, name FROM teams WHERE name = ? ORDER BY id LIMIT 1")
                .bind(name)
                .fetch_optional(uow.connection())
                .await?;

        Ok(row.map(Team::from))
    }

    async fn members(&self, uow: &mut UnitOfWork, team_id: i64) -> RepositoryResult<Vec<Member>> {
        let rows: Vec<MemberRow> =
            sqlx::query_as("SELECT id, username, age, team_id FROM members WHERE team_id = ? ORDER BY id")
                .bind(team_id)
                .fetch_all(uow.connection())
                .await?;

        Ok(rows
            .into_iter()
            .map(|row| {
                let member = Member::from(row);
                uow.track(&member);
                member
            })
            .collect())
    }
}
