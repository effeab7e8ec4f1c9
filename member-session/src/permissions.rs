use serde::Serialize;
use service_core::roles::RoleSet;

/// Snapshot of the role-derived rights, used to gate UI.
///
/// Recomputed from the role set on every call; nothing here is cached.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PermissionFlags {
    pub is_admin: bool,
    pub is_member: bool,
    pub has_federation_right: bool,
    pub has_partners_right: bool,
    pub has_tournament_right: bool,
}

impl From<&RoleSet> for PermissionFlags {
    fn from(roles: &RoleSet) -> Self {
        Self {
            is_admin: roles.is_admin(),
            is_member: roles.is_member(),
            has_federation_right: roles.has_federation_right(),
            has_partners_right: roles.has_partners_right(),
            has_tournament_right: roles.has_tournament_right(),
        }
    }
}
