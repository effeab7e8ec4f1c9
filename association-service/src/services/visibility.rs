//! Field visibility for association records.
//!
//! A caller sees the full record (private mail, settings and expanded
//! membership) when it belongs to the association in any role or holds the
//! platform `member` role. Everyone else, anonymous callers included, sees the
//! public projection.

use service_core::roles::Role;
use std::collections::HashMap;

use super::repository::UserRepository;
use crate::dtos::{AssociationUser, AssociationView, ExpandedRoster, FullAssociation, PublicAssociation};
use crate::models::{Association, User};

/// Platform role that unlocks every association's full record.
pub const PRIVILEGED_ROLE: Role = Role::Member;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VisibilityTier {
    Anonymous,
    /// Identified, but neither in the association nor platform privileged.
    Basic,
    Privileged,
}

impl VisibilityTier {
    pub fn sees_full_record(self) -> bool {
        self == VisibilityTier::Privileged
    }
}

pub fn is_association_member(identity: &User, association: &Association) -> bool {
    association.users.includes(&identity.id)
}

pub fn is_privileged_identity(identity: &User) -> bool {
    identity.roles.contains(PRIVILEGED_ROLE)
}

pub fn resolve_tier(identity: Option<&User>, association: &Association) -> VisibilityTier {
    match identity {
        None => VisibilityTier::Anonymous,
        Some(user) if is_association_member(user, association) || is_privileged_identity(user) => {
            VisibilityTier::Privileged
        }
        Some(_) => VisibilityTier::Basic,
    }
}

pub fn public_projection(association: &Association) -> PublicAssociation {
    PublicAssociation {
        id: association.id.clone(),
        name: association.name.clone(),
        federation: association.federation.clone(),
        logo: association.logo.clone(),
        networks: association.networks.clone(),
        school: association.school.clone(),
        tag: association.tag.clone(),
    }
}

/// Full projection with membership ids expanded through one batched lookup.
///
/// Unresolvable ids are omitted. A failed lookup leaves every list empty
/// rather than failing the request.
pub async fn full_projection(
    association: &Association,
    users: &dyn UserRepository,
) -> FullAssociation {
    let ids = association.users.distinct_ids();

    let resolved = match users.find_by_ids(&ids).await {
        Ok(found) => found,
        Err(e) => {
            tracing::warn!(
                association_id = %association.id,
                error = %e,
                "Membership expansion failed, returning record without members"
            );
            HashMap::new()
        }
    };

    let users = expand_roster(association, &resolved);

    if resolved.len() < ids.len() {
        tracing::debug!(
            association_id = %association.id,
            requested = ids.len(),
            resolved = resolved.len(),
            "Omitting unresolvable membership entries"
        );
    }

    FullAssociation {
        public: public_projection(association),
        settings: association.settings.clone(),
        mail: association.mail.clone(),
        users,
    }
}

fn expand_roster(association: &Association, resolved: &HashMap<String, User>) -> ExpandedRoster {
    let summarize = |ids: &[String]| -> Vec<AssociationUser> {
        ids.iter()
            .filter_map(|id| resolved.get(id))
            .map(AssociationUser::from)
            .collect()
    };

    ExpandedRoster {
        owner: resolved
            .get(&association.users.owner)
            .map(AssociationUser::from),
        moderators: summarize(&association.users.moderators),
        members: summarize(&association.users.members),
    }
}

/// Resolve the caller's tier and build the single projection it is allowed to see.
pub async fn project(
    association: &Association,
    identity: Option<&User>,
    users: &dyn UserRepository,
) -> (VisibilityTier, AssociationView) {
    let tier = resolve_tier(identity, association);

    let view = if tier.sees_full_record() {
        AssociationView::Full(full_projection(association, users).await)
    } else {
        AssociationView::Public(public_projection(association))
    };

    (tier, view)
}
