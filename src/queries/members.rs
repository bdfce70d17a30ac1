//! Ad hoc member queries
//!
//! Typed entry points for everything beyond the gateway's CRUD surface:
//! dynamic filtering, sorting, paging, aggregation, grouping, joins,
//! expression projections, DTO projections, and bulk statements. All of
//! them execute on the caller's unit of work, so results observe the
//! uncommitted writes of the current transaction.
//!
//! Reads here go straight to the store and do not consult the unit of
//! work's identity arena. Bulk statements also bypass it on the write
//! side: call [`UnitOfWork::clear`] before reading anything a bulk
//! statement touched.

use sqlx::{QueryBuilder, Sqlite};

use crate::domain::errors::RepositoryResult;
use crate::domain::member::{AccountDto, Member, MemberDto, UserDto};
use crate::domain::team::Team;
use crate::infrastructure::repositories::sqlite_member_repository::MemberRow;
use crate::infrastructure::unit_of_work::UnitOfWork;

/// Sort keys accepted by [`MemberQuery::order_by`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemberOrder {
    AgeAsc,
    AgeDesc,
    UsernameAsc,
    UsernameDesc,
}

impl MemberOrder {
    fn sql(self) -> &'static str {
        match self {
            MemberOrder::AgeAsc => "m.age ASC",
            MemberOrder::AgeDesc => "m.age DESC",
            MemberOrder::UsernameAsc => "m.username ASC",
            MemberOrder::UsernameDesc => "m.username DESC",
        }
    }
}

/// A composable member search
///
/// Filters are optional: passing `None` leaves the corresponding
/// predicate out of the statement entirely, so a query can be assembled
/// from optional request parameters without branching at the call site.
///
/// # Example
/// ```no_run
/// # async fn demo(uow: &mut roster::infrastructure::unit_of_work::UnitOfWork)
/// # -> roster::domain::errors::RepositoryResult<()> {
/// use roster::queries::members::{MemberOrder, MemberQuery};
///
/// let members = MemberQuery::new()
///     .age_below(Some(100))
///     .order_by(MemberOrder::AgeDesc)
///     .order_by(MemberOrder::UsernameAsc)
///     .fetch(uow)
///     .await?;
/// # Ok(()) }
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemberQuery {
    username: Option<String>,
    age: Option<i32>,
    age_below: Option<i32>,
    age_between: Option<(i32, i32)>,
    team_name: Option<String>,
    order: Vec<MemberOrder>,
    page: Option<(i64, i64)>,
}

impl MemberQuery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep members whose name equals the given value
    pub fn username_eq(mut self, username: Option<&str>) -> Self {
        self.username = username.map(str::to_string);
        self
    }

    /// Keep members of exactly the given age
    pub fn age_eq(mut self, age: Option<i32>) -> Self {
        self.age = age;
        self
    }

    /// Keep members younger than the given age
    pub fn age_below(mut self, limit: Option<i32>) -> Self {
        self.age_below = limit;
        self
    }

    /// Keep members whose age lies in the inclusive range
    pub fn age_between(mut self, range: Option<(i32, i32)>) -> Self {
        self.age_between = range;
        self
    }

    /// Keep members belonging to a team with the given name
    pub fn in_team_named(mut self, name: Option<&str>) -> Self {
        self.team_name = name.map(str::to_string);
        self
    }

    /// Append a sort key; earlier keys win, later keys break ties
    pub fn order_by(mut self, order: MemberOrder) -> Self {
        self.order.push(order);
        self
    }

    /// Return one page of results (offset starts at 0)
    pub fn page(mut self, offset: i64, limit: i64) -> Self {
        self.page = Some((offset, limit));
        self
    }

    fn build(&self) -> QueryBuilder<'static, Sqlite> {
        let mut qb: QueryBuilder<'static, Sqlite> =
            QueryBuilder::new("SELECT m.id, m.username, m.age, m.team_id FROM members m");

        if self.team_name.is_some() {
            qb.push(" LEFT JOIN teams t ON t.id = m.team_id");
        }

        qb.push(" WHERE 1 = 1");
        if let Some(username) = &self.username {
            qb.push(" AND m.username = ").push_bind(username.clone());
        }
        if let Some(age) = self.age {
            qb.push(" AND m.age = ").push_bind(age);
        }
        if let Some(limit) = self.age_below {
            qb.push(" AND m.age < ").push_bind(limit);
        }
        if let Some((low, high)) = self.age_between {
            qb.push(" AND m.age BETWEEN ")
                .push_bind(low)
                .push(" AND ")
                .push_bind(high);
        }
        if let Some(team_name) = &self.team_name {
            qb.push(" AND t.name = ").push_bind(team_name.clone());
        }

        for (i, order) in self.order.iter().enumerate() {
            qb.push(if i == 0 { " ORDER BY " } else { ", " });
            qb.push(order.sql());
        }

        if let Some((offset, limit)) = self.page {
            qb.push(" LIMIT ").push_bind(limit);
            qb.push(" OFFSET ").push_bind(offset);
        }

        qb
    }

    /// Run the search and return every matching member
    pub async fn fetch(&self, uow: &mut UnitOfWork) -> RepositoryResult<Vec<Member>> {
        let mut qb = self.build();
        let rows: Vec<MemberRow> = qb.build_query_as().fetch_all(uow.connection()).await?;

        Ok(rows.into_iter().map(Member::from).collect())
    }

    /// Run the search and return the first matching member, if any
    pub async fn fetch_optional(&self, uow: &mut UnitOfWork) -> RepositoryResult<Option<Member>> {
        let mut qb = self.build();
        let row: Option<MemberRow> = qb.build_query_as().fetch_optional(uow.connection()).await?;

        Ok(row.map(Member::from))
    }
}

/// Aggregate figures over all members
#[derive(Debug, Clone, PartialEq)]
pub struct MemberStats {
    pub count: i64,
    pub total_age: Option<i64>,
    pub average_age: Option<f64>,
    pub oldest: Option<i32>,
    pub youngest: Option<i32>,
}

/// COUNT/SUM/AVG/MAX/MIN over the members table
///
/// Everything but `count` is `None` when the table is empty.
pub async fn stats(uow: &mut UnitOfWork) -> RepositoryResult<MemberStats> {
    let (count, total_age, average_age, oldest, youngest): (
        i64,
        Option<i64>,
        Option<f64>,
        Option<i32>,
        Option<i32>,
    ) = sqlx::query_as("SELECT COUNT(*), SUM(age), AVG(age), MAX(age), MIN(age) FROM members")
        .fetch_one(uow.connection())
        .await?;

    Ok(MemberStats {
        count,
        total_age,
        average_age,
        oldest,
        youngest,
    })
}

/// Average member age of one team
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct TeamAgeSummary {
    pub team_name: String,
    pub average_age: f64,
}

/// Average age per team, ordered by team name
///
/// Teams without members do not appear.
pub async fn average_age_by_team(uow: &mut UnitOfWork) -> RepositoryResult<Vec<TeamAgeSummary>> {
    let summaries = sqlx::query_as(
        "SELECT t.name AS team_name, AVG(m.age) AS average_age \
         FROM members m JOIN teams t ON t.id = m.team_id \
         GROUP BY t.name ORDER BY t.name",
    )
    .fetch_all(uow.connection())
    .await?;

    Ok(summaries)
}

#[derive(Debug, sqlx::FromRow)]
struct MemberWithTeamRow {
    id: i64,
    username: String,
    age: i32,
    team_id: Option<i64>,
    t_id: i64,
    t_name: String,
}

/// Every teamed member together with its team, ordered by member id
pub async fn members_with_teams(uow: &mut UnitOfWork) -> RepositoryResult<Vec<(Member, Team)>> {
    let rows: Vec<MemberWithTeamRow> = sqlx::query_as(
        "SELECT m.id, m.username, m.age, m.team_id, t.id AS t_id, t.name AS t_name \
         FROM members m JOIN teams t ON t.id = m.team_id ORDER BY m.id",
    )
    .fetch_all(uow.connection())
    .await?;

    Ok(rows
        .into_iter()
        .map(|row| {
            let member = Member::from_persistence(row.id, row.username, row.age, row.team_id);
            let team = Team::from_persistence(row.t_id, row.t_name);
            (member, team)
        })
        .collect())
}

/// Members whose age equals the overall maximum, ordered by id
pub async fn oldest_members(uow: &mut UnitOfWork) -> RepositoryResult<Vec<Member>> {
    let rows: Vec<MemberRow> = sqlx::query_as(
        "SELECT id, username, age, team_id FROM members \
         WHERE age = (SELECT MAX(age) FROM members) ORDER BY id",
    )
    .fetch_all(uow.connection())
    .await?;

    Ok(rows.into_iter().map(Member::from).collect())
}

/// Every member name, ordered by id
pub async fn usernames(uow: &mut UnitOfWork) -> RepositoryResult<Vec<String>> {
    let names = sqlx::query_scalar("SELECT username FROM members ORDER BY id")
        .fetch_all(uow.connection())
        .await?;

    Ok(names)
}

/// Name/age pairs, ordered by id
pub async fn name_age_pairs(uow: &mut UnitOfWork) -> RepositoryResult<Vec<(String, i32)>> {
    let pairs = sqlx::query_as("SELECT username, age FROM members ORDER BY id")
        .fetch_all(uow.connection())
        .await?;

    Ok(pairs)
}

/// Coarse age band per member, ordered by id
pub async fn age_bands(uow: &mut UnitOfWork) -> RepositoryResult<Vec<String>> {
    let bands = sqlx::query_scalar(
        "SELECT CASE WHEN age < 20 THEN 'minor' \
                     WHEN age < 50 THEN 'adult' \
                     ELSE 'senior' END \
         FROM members ORDER BY id",
    )
    .fetch_all(uow.connection())
    .await?;

    Ok(bands)
}

/// `username_age` display strings, ordered by id
pub async fn display_names(uow: &mut UnitOfWork) -> RepositoryResult<Vec<String>> {
    let names =
        sqlx::query_scalar("SELECT username || '_' || CAST(age AS TEXT) FROM members ORDER BY id")
            .fetch_all(uow.connection())
            .await?;

    Ok(names)
}

/// Project every member into an [`AccountDto`], ordered by id
pub async fn accounts(uow: &mut UnitOfWork) -> RepositoryResult<Vec<AccountDto>> {
    let dtos = sqlx::query_as("SELECT username, age FROM members ORDER BY id")
        .fetch_all(uow.connection())
        .await?;

    Ok(dtos)
}

/// Project every member into a [`MemberDto`], ordered by id
pub async fn member_dtos(uow: &mut UnitOfWork) -> RepositoryResult<Vec<MemberDto>> {
    let dtos = sqlx::query_as("SELECT username, age FROM members ORDER BY id")
        .fetch_all(uow.connection())
        .await?;

    Ok(dtos)
}

/// Project every member into a [`UserDto`], aliasing the name column
pub async fn users(uow: &mut UnitOfWork) -> RepositoryResult<Vec<UserDto>> {
    let dtos = sqlx::query_as("SELECT username AS name, age FROM members ORDER BY id")
        .fetch_all(uow.connection())
        .await?;

    Ok(dtos)
}

/// Bulk rename of every member older than `min_age`
///
/// Bypasses the identity arena; returns the affected-row count.
pub async fn rename_where_age_above(
    uow: &mut UnitOfWork,
    new_name: &str,
    min_age: i32,
) -> RepositoryResult<u64> {
    let result = sqlx::query("UPDATE members SET username = ? WHERE age > ?")
        .bind(new_name)
        .bind(min_age)
        .execute(uow.connection())
        .await?;

    tracing::debug!(rows = result.rows_affected(), "bulk rename");
    Ok(result.rows_affected())
}

/// Bulk age shift for every member
///
/// Bypasses the identity arena; returns the affected-row count.
pub async fn increment_ages(uow: &mut UnitOfWork, step: i32) -> RepositoryResult<u64> {
    let result = sqlx::query("UPDATE members SET age = age + ?")
        .bind(step)
        .execute(uow.connection())
        .await?;

    tracing::debug!(rows = result.rows_affected(), "bulk age increment");
    Ok(result.rows_affected())
}

/// Bulk delete of every member older than `min_age`
///
/// Bypasses the identity arena; returns the affected-row count.
pub async fn delete_where_age_above(uow: &mut UnitOfWork, min_age: i32) -> RepositoryResult<u64> {
    let result = sqlx::query("DELETE FROM members WHERE age > ?")
        .bind(min_age)
        .execute(uow.connection())
        .await?;

    tracing::debug!(rows = result.rows_affected(), "bulk delete");
    Ok(result.rows_affected())
}
