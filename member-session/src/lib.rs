//! Session state for a signed-in association member.
//!
//! [`SessionState`] mirrors the caller's profile and role set and exposes the
//! permission flags derived from it. Remote calls go through a [`UserService`],
//! and failures are reported to a [`Notifier`] instead of mutating state.

pub mod config;
pub mod error;
pub mod models;
pub mod notifier;
pub mod permissions;
pub mod services;
pub mod session;

pub use config::ClientConfig;
pub use error::ClientError;
pub use notifier::{Notifier, TracingNotifier};
pub use permissions::PermissionFlags;
pub use services::{HttpUserService, UserService};
pub use session::SessionState;
