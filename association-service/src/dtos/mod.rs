pub mod association;
pub mod user;

pub use association::{
    AssociationUser, AssociationView, ExpandedRoster, FullAssociation, GetAssociationParams,
    PublicAssociation,
};
pub use user::{
    ActionResponse, AssociationSummary, AvatarResponse, ProfileResponse, StudentNameUpdate,
    UpdatePlatformsRequest, UpdateProfileRequest,
};
