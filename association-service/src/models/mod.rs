pub mod association;
pub mod user;

pub use association::{
    Association, AssociationSettings, Federation, MembershipRoster, Networks, School,
};
pub use user::{Platforms, Student, User};
