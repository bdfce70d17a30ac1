/// Team entity
///
/// A named group of members. The team does not own the relationship to
/// its members: each member carries the owning foreign key, and the
/// member collection is a derived view recomputed on read through
/// `TeamRepository::members`. There is no back-reference stored here.
///
/// # Invariants
/// - The identifier is assigned by the store on first save and never
///   changes afterwards.
///
/// # Example
/// ```
/// use roster::domain::team::Team;
///
/// let team = Team::new("NEW TEAM");
/// assert_eq!(team.name(), "NEW TEAM");
/// assert!(team.id().is_none());
/// ```
#[derive(Debug, Clone)]
pub struct Team {
    id: Option<i64>,
    name: String,
}

impl Team {
    /// Creates a new, not-yet-persisted team
    ///
    /// The team has no identifier until it is saved. A team may exist
    /// with zero members.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
        }
    }

    /// Returns the store-assigned identifier, if the team has been saved
    pub fn id(&self) -> Option<i64> {
        self.id
    }

    /// Returns the team's name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Reconstructs a Team from persistence layer data
    ///
    /// # Note
    /// Only to be used by repository implementations for data
    /// reconstruction.
    pub fn from_persistence(id: i64, name: String) -> Self {
        Self { id: Some(id), name }
    }
}
