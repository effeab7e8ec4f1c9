use serde::{Deserialize, Serialize};
use service_core::roles::RoleSet;
use validator::{Validate, ValidationError};

use crate::models::{AssociationSettings, Federation, Networks, Platforms, School, User};

#[derive(Debug, Deserialize, Validate)]
pub struct GetAssociationParams {
    #[validate(length(min = 1), custom(function = "not_blank"))]
    pub slug: String,
}

fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank"));
    }
    Ok(())
}

/// Fields anyone may read.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PublicAssociation {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub federation: Option<Federation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub networks: Option<Networks>,
    pub school: School,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
}

/// Public fields plus private mail, settings and the expanded membership.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FullAssociation {
    #[serde(flatten)]
    pub public: PublicAssociation,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub settings: Option<AssociationSettings>,
    pub mail: String,
    pub users: ExpandedRoster,
}

/// Membership with ids replaced by user summaries. Ids that did not resolve are
/// left out, so `owner` may be absent.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ExpandedRoster {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<AssociationUser>,
    pub moderators: Vec<AssociationUser>,
    pub members: Vec<AssociationUser>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AssociationUser {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    pub mail: String,
    pub platforms: Platforms,
    pub roles: RoleSet,
    pub username: String,
}

impl From<&User> for AssociationUser {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.clone(),
            name: user.name.clone(),
            avatar: user.avatar.clone(),
            mail: user.mail.clone(),
            platforms: user.platforms.clone(),
            roles: user.roles.clone(),
            username: user.username.clone(),
        }
    }
}

/// Response body of `GET /api/association/get/:slug`: one projection, never both.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum AssociationView {
    Full(FullAssociation),
    Public(PublicAssociation),
}

impl AssociationView {
    pub fn is_full(&self) -> bool {
        matches!(self, AssociationView::Full(_))
    }
}
