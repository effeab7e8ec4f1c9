use serde::{Deserialize, Serialize};

/// Association document as stored in the `associations` collection.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Association {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub school: School,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub federation: Option<Federation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub networks: Option<Networks>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub settings: Option<AssociationSettings>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
    pub mail: String,
    pub users: MembershipRoster,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct School {
    pub name: String,
    pub address: String,
    pub students_number: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Federation {
    pub is_validated: bool,
    pub region: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Networks {
    pub facebook: String,
    pub instagram: String,
    pub twitch: String,
    pub twitter: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AssociationSettings {
    pub slug: String,
}

/// Bare user ids per membership role. The lists may overlap.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct MembershipRoster {
    pub owner: String,
    #[serde(default)]
    pub moderators: Vec<String>,
    #[serde(default)]
    pub members: Vec<String>,
}

impl MembershipRoster {
    pub fn includes(&self, user_id: &str) -> bool {
        self.owner == user_id
            || self.moderators.iter().any(|id| id == user_id)
            || self.members.iter().any(|id| id == user_id)
    }

    /// Every referenced id once, owner first, in first-seen order.
    pub fn distinct_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = Vec::with_capacity(1 + self.moderators.len() + self.members.len());
        for id in std::iter::once(&self.owner)
            .chain(self.moderators.iter())
            .chain(self.members.iter())
        {
            if !ids.contains(id) {
                ids.push(id.clone());
            }
        }
        ids
    }
}

impl Association {
    pub fn slug(&self) -> Option<&str> {
        self.settings.as_ref().map(|s| s.slug.as_str())
    }
}
