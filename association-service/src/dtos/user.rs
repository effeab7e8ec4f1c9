use serde::{Deserialize, Serialize};
use service_core::roles::RoleSet;
use validator::Validate;

use crate::models::{Association, Platforms, Student, User};

/// Body of `GET /api/user/ping`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProfileResponse {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    pub mail: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub platforms: Platforms,
    pub roles: RoleSet,
    pub student: Student,
    pub username: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub association: Option<AssociationSummary>,
}

impl ProfileResponse {
    pub fn new(user: User, association: Option<&Association>) -> Self {
        Self {
            id: user.id,
            avatar: user.avatar,
            mail: user.mail,
            name: user.name,
            platforms: user.platforms,
            roles: user.roles,
            student: user.student,
            username: user.username,
            association: association.map(AssociationSummary::from),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AssociationSummary {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
}

impl From<&Association> for AssociationSummary {
    fn from(association: &Association) -> Self {
        Self {
            id: association.id.clone(),
            name: association.name.clone(),
            slug: association.slug().map(str::to_string),
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateProfileRequest {
    #[validate(length(min = 1, max = 32, message = "Username must be 1 to 32 characters"))]
    pub username: String,
    #[validate(nested)]
    pub student: StudentNameUpdate,
}

#[derive(Debug, Deserialize, Validate)]
pub struct StudentNameUpdate {
    #[validate(length(min = 1, max = 64, message = "Student name must be 1 to 64 characters"))]
    pub name: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdatePlatformsRequest {
    #[validate(length(max = 64, message = "Discord handle must be at most 64 characters"))]
    pub discord: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ActionResponse {
    pub success: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AvatarResponse {
    pub success: bool,
    pub avatar: String,
}
