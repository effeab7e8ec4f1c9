pub mod database;
pub mod identity;
pub mod metrics;
pub mod repository;
pub mod storage;
pub mod visibility;

pub use database::MongoDb;
pub use identity::{JwtService, SessionClaims};
pub use metrics::{get_metrics, init_metrics};
pub use repository::{AssociationRepository, InMemoryStore, UserRepository};
pub use storage::{AvatarStorage, LocalStorage};
pub use visibility::VisibilityTier;
