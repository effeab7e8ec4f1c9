use serde::{Deserialize, Serialize};
use service_core::roles::RoleSet;

/// Body of `GET /api/user/ping`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Profile {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub avatar: Option<String>,
    pub mail: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub platforms: Platforms,
    #[serde(default)]
    pub roles: RoleSet,
    #[serde(default)]
    pub student: Student,
    pub username: String,
    #[serde(default)]
    pub association: Option<AssociationSummary>,
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

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AssociationSummary {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub slug: Option<String>,
}

/// Body of `POST /api/user/update`.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ProfileUpdate {
    pub username: String,
    pub student: StudentNameUpdate,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct StudentNameUpdate {
    pub name: String,
}

impl ProfileUpdate {
    pub fn new(username: impl Into<String>, student_name: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            student: StudentNameUpdate {
                name: student_name.into(),
            },
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct ActionResponse {
    pub success: bool,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct AvatarResponse {
    pub success: bool,
    #[serde(default)]
    pub avatar: Option<String>,
}

/// Image picked by the user, sent as the multipart field `file`.
#[derive(Debug, Clone)]
pub struct AvatarFile {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}
