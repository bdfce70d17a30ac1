use serde::{Deserialize, Serialize};

/// Read-only projection of a member's name and age
///
/// A pure value carrier for query results crossing the boundary from
/// the persistence layer to callers. Has no identity and no
/// relationships.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct AccountDto {
    username: String,
    age: i32,
}

impl AccountDto {
    pub fn new(username: impl Into<String>, age: i32) -> Self {
        Self {
            username: username.into(),
            age,
        }
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn age(&self) -> i32 {
        self.age
    }
}

/// Read-write projection of a member's name and age
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct MemberDto {
    pub username: String,
    pub age: i32,
}

impl MemberDto {
    pub fn new(username: impl Into<String>, age: i32) -> Self {
        Self {
            username: username.into(),
            age,
        }
    }
}

/// Read-only projection carrying the member's name under a different
/// field name
///
/// Populated by an aliased projection (`username AS name`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct UserDto {
    name: String,
    age: i32,
}

impl UserDto {
    pub fn new(name: impl Into<String>, age: i32) -> Self {
        Self {
            name: name.into(),
            age,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn age(&self) -> i32 {
        self.age
    }
}
