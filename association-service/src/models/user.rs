use serde::{Deserialize, Serialize};
use service_core::roles::RoleSet;

/// User document as stored in the `users` collection.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct User {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    pub mail: String,
    #[serde(default)]
    pub platforms: Platforms,
    #[serde(default)]
    pub roles: RoleSet,
    pub username: String,
    #[serde(default)]
    pub student: Student,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Platforms {
    pub discord: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    pub name: String,
    pub school_name: String,
}
