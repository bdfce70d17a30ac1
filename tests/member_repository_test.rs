//! Integration tests for the persistence gateway
//!
//! Exercise the member/team repositories against an in-memory database:
//! identifier assignment, the association invariant through the derived
//! member view, update/delete semantics, managed-state rules, and
//! transaction boundaries owned by the caller.

mod common;

use common::{seed_members, setup_db};
use roster::domain::errors::RepositoryError;
use roster::domain::member::Member;
use roster::domain::repositories::{MemberRepository, TeamRepository};
use roster::domain::team::Team;
use roster::infrastructure::repositories::{SqliteMemberRepository, SqliteTeamRepository};
use roster::infrastructure::unit_of_work::UnitOfWork;
use roster::queries::members::{MemberOrder, MemberQuery};

#[tokio::test]
async fn save_assigns_identifier_and_round_trips() {
    let pool = setup_db().await;
    let mut uow = UnitOfWork::begin(&pool).await.unwrap();
    let members = SqliteMemberRepository::new();

    let saved = members
        .save(&mut uow, Member::new("PARK SUNG DONG", 29))
        .await
        .unwrap();

    let id = saved.id().expect("identifier assigned on insert");

    let found = members.find_by_id(&mut uow, id).await.unwrap().unwrap();
    assert_eq!(found.username(), "PARK SUNG DONG");
    assert_eq!(found.age(), 29);
    assert!(found.team_id().is_none());
}

#[tokio::test]
async fn member_constructed_with_team_appears_in_derived_view_exactly_once() {
    let pool = setup_db().await;
    let mut uow = UnitOfWork::begin(&pool).await.unwrap();
    let teams = SqliteTeamRepository::new();
    let members = SqliteMemberRepository::new();

    let team = teams.save(&mut uow, Team::new("NEW TEAM")).await.unwrap();
    let member = members
        .save(&mut uow, Member::in_team("PARK", 29, &team).unwrap())
        .await
        .unwrap();

    assert_eq!(member.team_id(), team.id());

    let roster = teams
        .members(&mut uow, team.id().unwrap())
        .await
        .unwrap();
    let hits = roster
        .iter()
        .filter(|m| m.id() == member.id())
        .count();
    assert_eq!(hits, 1);
}

#[tokio::test]
async fn update_persists_modified_fields() {
    let pool = setup_db().await;
    let mut uow = UnitOfWork::begin(&pool).await.unwrap();
    let members = SqliteMemberRepository::new();

    let mut saved = members
        .save(&mut uow, Member::new("SON", 29))
        .await
        .unwrap();
    let id = saved.id().unwrap();

    saved.rename("SON H M");
    saved.set_age(30);
    members.save(&mut uow, saved).await.unwrap();

    // discard the arena so the read below provably comes from the store
    uow.clear();

    let found = members.find_by_id(&mut uow, id).await.unwrap().unwrap();
    assert_eq!(found.username(), "SON H M");
    assert_eq!(found.age(), 30);
}

#[tokio::test]
async fn delete_then_find_is_absent() {
    let pool = setup_db().await;
    let mut uow = UnitOfWork::begin(&pool).await.unwrap();
    let members = SqliteMemberRepository::new();

    let saved = members
        .save(&mut uow, Member::new("CHA", 51))
        .await
        .unwrap();
    let id = saved.id().unwrap();

    members.delete(&mut uow, &saved).await.unwrap();

    let found = members.find_by_id(&mut uow, id).await.unwrap();
    assert!(found.is_none());
}

#[tokio::test]
async fn delete_of_unsaved_member_is_not_managed() {
    let pool = setup_db().await;
    let mut uow = UnitOfWork::begin(&pool).await.unwrap();
    let members = SqliteMemberRepository::new();

    let member = Member::new("PARK", 29);

    let result = members.delete(&mut uow, &member).await;
    assert!(matches!(result, Err(RepositoryError::NotManaged)));
}

#[tokio::test]
async fn delete_after_clear_is_not_managed_until_reloaded() {
    let pool = setup_db().await;
    let mut uow = UnitOfWork::begin(&pool).await.unwrap();
    let members = SqliteMemberRepository::new();

    let saved = members
        .save(&mut uow, Member::new("PARK", 29))
        .await
        .unwrap();
    let id = saved.id().unwrap();

    uow.clear();

    let result = members.delete(&mut uow, &saved).await;
    assert!(matches!(result, Err(RepositoryError::NotManaged)));

    // a re-read makes the member managed again
    let reloaded = members.find_by_id(&mut uow, id).await.unwrap().unwrap();
    members.delete(&mut uow, &reloaded).await.unwrap();
}

#[tokio::test]
async fn find_all_returns_every_inserted_member() {
    let pool = setup_db().await;
    let mut uow = UnitOfWork::begin(&pool).await.unwrap();
    let teams = SqliteTeamRepository::new();
    let members = SqliteMemberRepository::new();

    let new_team = teams.save(&mut uow, Team::new("NEW TEAM")).await.unwrap();
    let yes_team = teams.save(&mut uow, Team::new("YES TEAM")).await.unwrap();

    for member in [
        Member::in_team("PARK", 29, &new_team).unwrap(),
        Member::in_team("SON", 29, &yes_team).unwrap(),
        Member::in_team("CHA", 51, &new_team).unwrap(),
    ] {
        members.save(&mut uow, member).await.unwrap();
    }

    let all = members.find_all(&mut uow).await.unwrap();
    assert_eq!(all.len(), 3);

    // age descending with name-ascending tie-break
    let ordered = MemberQuery::new()
        .age_below(Some(100))
        .order_by(MemberOrder::AgeDesc)
        .order_by(MemberOrder::UsernameAsc)
        .fetch(&mut uow)
        .await
        .unwrap();
    let names: Vec<&str> = ordered.iter().map(|m| m.username()).collect();
    assert_eq!(names, ["CHA", "PARK", "SON"]);
}

#[tokio::test]
async fn update_of_vanished_row_is_stale() {
    let pool = setup_db().await;
    let mut uow = UnitOfWork::begin(&pool).await.unwrap();
    let members = SqliteMemberRepository::new();

    let ghost = Member::from_persistence(9999, "GHOST".to_string(), 40, None);

    let result = members.save(&mut uow, ghost).await;
    assert!(matches!(result, Err(RepositoryError::StaleState(_))));
}

#[tokio::test]
async fn foreign_key_violation_is_a_constraint_violation() {
    let pool = setup_db().await;
    let mut uow = UnitOfWork::begin(&pool).await.unwrap();
    let members = SqliteMemberRepository::new();

    let phantom_team = Team::from_persistence(9999, "PHANTOM".to_string());
    let member = Member::in_team("PARK", 29, &phantom_team).unwrap();

    let result = members.save(&mut uow, member).await;
    assert!(matches!(
        result,
        Err(RepositoryError::ConstraintViolation(_))
    ));
}

#[tokio::test]
async fn reassignment_moves_member_between_derived_views() {
    let pool = setup_db().await;
    let mut uow = UnitOfWork::begin(&pool).await.unwrap();
    let seeded = seed_members(&mut uow).await.unwrap();
    let teams = SqliteTeamRepository::new();
    let members = SqliteMemberRepository::new();

    let mut park = seeded.park;
    park.assign_team(&seeded.yes_team).unwrap();
    members.save(&mut uow, park).await.unwrap();
    uow.clear();

    let new_team_members = teams
        .members(&mut uow, seeded.new_team.id().unwrap())
        .await
        .unwrap();
    assert!(new_team_members.iter().all(|m| m.username() != "PARK"));

    let yes_team_members = teams
        .members(&mut uow, seeded.yes_team.id().unwrap())
        .await
        .unwrap();
    let hits = yes_team_members
        .iter()
        .filter(|m| m.username() == "PARK")
        .count();
    assert_eq!(hits, 1);
}

#[tokio::test]
async fn detachment_clears_team_and_derived_view() {
    let pool = setup_db().await;
    let mut uow = UnitOfWork::begin(&pool).await.unwrap();
    let teams = SqliteTeamRepository::new();
    let members = SqliteMemberRepository::new();

    let team = teams.save(&mut uow, Team::new("NEW TEAM")).await.unwrap();
    let mut member = members
        .save(&mut uow, Member::in_team("PARK", 29, &team).unwrap())
        .await
        .unwrap();
    let id = member.id().unwrap();

    member.leave_team();
    members.save(&mut uow, member).await.unwrap();
    uow.clear();

    let roster = teams
        .members(&mut uow, team.id().unwrap())
        .await
        .unwrap();
    assert!(roster.is_empty());

    let found = members.find_by_id(&mut uow, id).await.unwrap().unwrap();
    assert!(found.team_id().is_none());
}

#[tokio::test]
async fn deleting_member_leaves_team_in_place() {
    let pool = setup_db().await;
    let mut uow = UnitOfWork::begin(&pool).await.unwrap();
    let teams = SqliteTeamRepository::new();
    let members = SqliteMemberRepository::new();

    let team = teams.save(&mut uow, Team::new("NEW TEAM")).await.unwrap();
    let member = members
        .save(&mut uow, Member::in_team("PARK", 29, &team).unwrap())
        .await
        .unwrap();

    members.delete(&mut uow, &member).await.unwrap();

    let found = teams
        .find_by_id(&mut uow, team.id().unwrap())
        .await
        .unwrap();
    assert!(found.is_some());
}

#[tokio::test]
async fn commit_persists_across_units_of_work() {
    let pool = setup_db().await;
    let members = SqliteMemberRepository::new();

    let mut uow = UnitOfWork::begin(&pool).await.unwrap();
    let saved = members
        .save(&mut uow, Member::new("PARK", 29))
        .await
        .unwrap();
    let id = saved.id().unwrap();
    uow.commit().await.unwrap();

    let mut next = UnitOfWork::begin(&pool).await.unwrap();
    let found = members.find_by_id(&mut next, id).await.unwrap();
    assert!(found.is_some());
}

#[tokio::test]
async fn dropped_unit_of_work_rolls_back() {
    let pool = setup_db().await;
    let members = SqliteMemberRepository::new();

    let id = {
        let mut uow = UnitOfWork::begin(&pool).await.unwrap();
        let saved = members
            .save(&mut uow, Member::new("SON", 29))
            .await
            .unwrap();
        saved.id().unwrap()
        // uow dropped without commit
    };

    let mut next = UnitOfWork::begin(&pool).await.unwrap();
    let found = members.find_by_id(&mut next, id).await.unwrap();
    assert!(found.is_none());
}

#[tokio::test]
async fn find_by_name_resolves_a_saved_team() {
    let pool = setup_db().await;
    let mut uow = UnitOfWork::begin(&pool).await.unwrap();
    let teams = SqliteTeamRepository::new();

    teams.save(&mut uow, Team::new("YES TEAM")).await.unwrap();

    let found = teams
        .find_by_name(&mut uow, "YES TEAM")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(found.name(), "YES TEAM");
    assert!(found.id().is_some());

    let missing = teams.find_by_name(&mut uow, "NO TEAM").await.unwrap();
    assert!(missing.is_none());
}
