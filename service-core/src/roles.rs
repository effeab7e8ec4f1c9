//! Platform-wide role vocabulary.
//!
//! Roles are a closed set. Tags that do not name a known [`Role`] are dropped
//! when a [`RoleSet`] is read, so a misspelled tag never grants anything.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeSet;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Role {
    Member,
    Admin,
    Federation,
    Partnership,
    Tournament,
}

impl Role {
    pub const ALL: [Role; 5] = [
        Role::Member,
        Role::Admin,
        Role::Federation,
        Role::Partnership,
        Role::Tournament,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Role::Member => "member",
            Role::Admin => "admin",
            Role::Federation => "federation",
            Role::Partnership => "partnership",
            Role::Tournament => "tournament",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Role::ALL
            .into_iter()
            .find(|role| role.as_str() == s)
            .ok_or_else(|| format!("Unknown role: {}", s))
    }
}

impl Serialize for Role {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Role {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Set of platform roles held by one user.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoleSet(BTreeSet<Role>);

impl RoleSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, role: Role) -> bool {
        self.0.contains(&role)
    }

    pub fn insert(&mut self, role: Role) -> bool {
        self.0.insert(role)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = Role> + '_ {
        self.0.iter().copied()
    }

    pub fn is_admin(&self) -> bool {
        self.contains(Role::Admin)
    }

    pub fn is_member(&self) -> bool {
        self.is_admin() || self.contains(Role::Member)
    }

    pub fn has_federation_right(&self) -> bool {
        self.member_with(Role::Federation)
    }

    pub fn has_partners_right(&self) -> bool {
        self.member_with(Role::Partnership)
    }

    pub fn has_tournament_right(&self) -> bool {
        self.member_with(Role::Tournament)
    }

    // Delegated rights need the platform member role next to the delegation tag.
    // Admins hold every right.
    fn member_with(&self, delegation: Role) -> bool {
        self.is_admin() || (self.contains(Role::Member) && self.contains(delegation))
    }

    /// Parse raw tags, keeping only the known roles.
    pub fn from_tags<I, S>(tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut set = RoleSet::new();
        for tag in tags {
            let tag = tag.as_ref();
            match tag.parse::<Role>() {
                Ok(role) => {
                    set.insert(role);
                }
                Err(_) => tracing::warn!(tag = %tag, "Ignoring unknown role tag"),
            }
        }
        set
    }
}

impl FromIterator<Role> for RoleSet {
    fn from_iter<T: IntoIterator<Item = Role>>(iter: T) -> Self {
        RoleSet(iter.into_iter().collect())
    }
}

impl Serialize for RoleSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.0.iter())
    }
}

impl<'de> Deserialize<'de> for RoleSet {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let tags = Vec::<String>::deserialize(deserializer)?;
        Ok(RoleSet::from_tags(tags))
    }
}
