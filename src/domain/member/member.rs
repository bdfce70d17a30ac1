use crate::domain::errors::{RepositoryError, RepositoryResult};
use crate::domain::team::Team;

/// Member entity
///
/// A person with a name and an age, optionally belonging to exactly one
/// team. The member holds the owning side of the member/team
/// relationship as a plain foreign key; the team's member collection is
/// a derived view served by the repository layer. Resolving the actual
/// `Team` from a member is always an explicit repository call, never a
/// side effect of field access.
///
/// # Invariants
/// - The identifier is assigned by the store on first save and never
///   changes afterwards.
/// - A member assigned to a team references a team that already has an
///   identifier; after the member is saved, that team's derived member
///   view contains it exactly once.
///
/// # Example
/// ```
/// use roster::domain::member::Member;
/// use roster::domain::team::Team;
///
/// let team = Team::from_persistence(1, "NEW TEAM".to_string());
/// let member = Member::in_team("PARK", 29, &team).expect("saved team");
///
/// assert_eq!(member.username(), "PARK");
/// assert_eq!(member.team_id(), team.id());
/// ```
#[derive(Debug, Clone)]
pub struct Member {
    id: Option<i64>,
    username: String,
    age: i32,
    team_id: Option<i64>,
}

impl Member {
    /// Creates a new, not-yet-persisted member without a team
    pub fn new(username: impl Into<String>, age: i32) -> Self {
        Self {
            id: None,
            username: username.into(),
            age,
            team_id: None,
        }
    }

    /// Creates a new member already assigned to a team
    ///
    /// # Errors
    /// `UnsavedTeam` if the team has not been saved yet.
    pub fn in_team(username: impl Into<String>, age: i32, team: &Team) -> RepositoryResult<Self> {
        let mut member = Self::new(username, age);
        member.assign_team(team)?;
        Ok(member)
    }

    /// Assigns the member to a team
    ///
    /// Sets the owning foreign key. If the member already belongs to a
    /// different team, the key simply moves: both the old and the new
    /// team's derived member views reflect the change on next read,
    /// because both are computed from this single key.
    ///
    /// # Errors
    /// `UnsavedTeam` if the team has not been saved yet.
    pub fn assign_team(&mut self, team: &Team) -> RepositoryResult<()> {
        let team_id = team.id().ok_or(RepositoryError::UnsavedTeam)?;
        self.team_id = Some(team_id);
        Ok(())
    }

    /// Detaches the member from its team
    ///
    /// Clears the owning foreign key. A no-op for a teamless member.
    pub fn leave_team(&mut self) {
        self.team_id = None;
    }

    /// Changes the member's name
    pub fn rename(&mut self, username: impl Into<String>) {
        self.username = username.into();
    }

    /// Changes the member's age
    pub fn set_age(&mut self, age: i32) {
        self.age = age;
    }

    // ===== Getters =====

    /// Returns the store-assigned identifier, if the member has been saved
    pub fn id(&self) -> Option<i64> {
        self.id
    }

    /// Returns the member's name
    pub fn username(&self) -> &str {
        &self.username
    }

    /// Returns the member's age
    pub fn age(&self) -> i32 {
        self.age
    }

    /// Returns the identifier of the member's team, if any
    pub fn team_id(&self) -> Option<i64> {
        self.team_id
    }

    /// Reconstructs a Member from persistence layer data
    ///
    /// # Note
    /// Only to be used by repository implementations for data
    /// reconstruction.
    pub fn from_persistence(id: i64, username: String, age: i32, team_id: Option<i64>) -> Self {
        Self {
            id: Some(id),
            username,
            age,
            team_id,
        }
    }
}
