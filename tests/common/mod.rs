//! Shared test fixtures
//!
//! Every test gets its own in-memory database, so suites are fully
//! isolated from each other and need no cleanup.

use roster::domain::errors::RepositoryResult;
use roster::domain::member::Member;
use roster::domain::repositories::{MemberRepository, TeamRepository};
use roster::domain::team::Team;
use roster::infrastructure::db;
use roster::infrastructure::repositories::{SqliteMemberRepository, SqliteTeamRepository};
use roster::infrastructure::unit_of_work::UnitOfWork;
use sqlx::SqlitePool;

/// Set up an isolated in-memory database
pub async fn setup_db() -> SqlitePool {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();

    db::connect("sqlite::memory:")
        .await
        .expect("failed to open in-memory database")
}

/// The standard fixture: two teams, four members
#[allow(dead_code)]
pub struct Seeded {
    pub new_team: Team,
    pub yes_team: Team,
    pub park: Member,
    pub son: Member,
    pub cha: Member,
    pub aba: Member,
}

/// Seed PARK(29)/CHA(51)/ABA(51) into NEW TEAM and SON(29) into YES TEAM
#[allow(dead_code)]
pub async fn seed_members(uow: &mut UnitOfWork) -> RepositoryResult<Seeded> {
    let teams = SqliteTeamRepository::new();
    let members = SqliteMemberRepository::new();

    let new_team = teams.save(uow, Team::new("NEW TEAM")).await?;
    let yes_team = teams.save(uow, Team::new("YES TEAM")).await?;

    let park = members
        .save(uow, Member::in_team("PARK", 29, &new_team)?)
        .await?;
    let son = members
        .save(uow, Member::in_team("SON", 29, &yes_team)?)
        .await?;
    let cha = members
        .save(uow, Member::in_team("CHA", 51, &new_team)?)
        .await?;
    let aba = members
        .save(uow, Member::in_team("ABA", 51, &new_team)?)
        .await?;

    Ok(Seeded {
        new_team,
        yes_team,
        park,
        son,
        cha,
        aba,
    })
}
