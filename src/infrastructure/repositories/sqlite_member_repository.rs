use async_trait::async_trait;

use crate::domain::errors::{RepositoryError, RepositoryResult};
use crate::domain::member::Member;
use crate::domain::repositories::MemberRepository;
use crate::infrastructure::unit_of_work::UnitOfWork;

/// Raw members row, as selected from the store
#[derive(Debug, sqlx::FromRow)]
pub(crate) struct MemberRow {
    pub(crate) id: i64,
    pub(crate) username: String,
    pub(crate) age: i32,
    pub(crate) team_id: Option<i64>,
}

impl From<MemberRow> for Member {
    fn from(row: MemberRow) -> Self {
        Member::from_persistence(row.id, row.username, row.age, row.team_id)
    }
}

/// SQLite implementation of MemberRepository
///
/// Executes against the caller's unit of work and keeps its identity
/// arena in step with every save, load, and delete.
#[derive(Debug, Default)]
pub struct SqliteMemberRepository;

impl SqliteMemberRepository {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl MemberRepository for SqliteMemberRepository {
    async fn save(&self, uow: &mut UnitOfWork, member: Member) -> RepositoryResult<Member> {
        match member.id() {
            None => {
                let result =
                    sqlx::query("INSERT INTO members (username, age, team_id) VALUES (?, ?, ?)")
                        .bind(member.username())
                        .bind(member.age())
                        .bind(member.team_id())
                        .execute(uow.connection())
                        .await?;

                let member = Member::from_persistence(
                    result.last_insert_rowid(),
                    member.username().to_string(),
                    member.age(),
                    member.team_id(),
                );
                uow.track(&member);
                Ok(member)
            }
            Some(id) => {
                let result =
                    sqlx::query("UPDATE members SET username = ?, age = ?, team_id = ? WHERE id = ?")
                        .bind(member.username())
                        .bind(member.age())
                        .bind(member.team_id())
                        .bind(id)
                        .execute(uow.connection())
                        .await?;

                if result.rows_affected() == 0 {
                    return Err(RepositoryError::StaleState(format!(
                        "member {id} no longer exists"
                    )));
                }

                uow.track(&member);
                Ok(member)
            }
        }
    }

    async fn delete(&self, uow: &mut UnitOfWork, member: &Member) -> RepositoryResult<()> {
        let id = member.id().ok_or(RepositoryError::NotManaged)?;
        if !uow.is_tracked(id) {
            return Err(RepositoryError::NotManaged);
        }

        sqlx::query("DELETE FROM members WHERE id = ?")
            .bind(id)
            .execute(uow.connection())
            .await?;

        uow.evict(id);
        Ok(())
    }

    async fn find_by_id(&self, uow: &mut UnitOfWork, id: i64) -> RepositoryResult<Option<Member>> {
        if let Some(member) = uow.tracked(id) {
            return Ok(Some(member));
        }

        let row: Option<MemberRow> =
            sqlx::query_as("SELECT id, username, age, team_id FROM members WHERE id = ?")
                .bind(id)
                .fetch_optional(uow.connection())
                .await?;

        Ok(row.map(|row| {
            let member = Member::from(row);
            uow.track(&member);
            member
        }))
    }

    async fn find_all(&self, uow: &mut UnitOfWork) -> RepositoryResult<Vec<Member>> {
        let rows: Vec<MemberRow> =
            sqlx::query_as("SELECT id, username, age, team_id FROM members")
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
