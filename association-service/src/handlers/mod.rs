pub mod association;
pub mod health;
pub mod user;

pub use association::get_association;
pub use health::{health_check, metrics_endpoint, readiness_check};
pub use user::{disconnect, ping, update_platforms, update_profile, upload_avatar};
