use async_trait::async_trait;
use service_core::error::AppError;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::RwLock;

use crate::models::{Association, Platforms, User};

#[async_trait]
pub trait AssociationRepository: Send + Sync {
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Association>, AppError>;

    /// First association where the user is owner, moderator or member.
    async fn find_for_member(&self, user_id: &str) -> Result<Option<Association>, AppError>;

    async fn health_check(&self) -> Result<(), AppError>;
}

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_by_id(&self, id: &str) -> Result<Option<User>, AppError>;

    /// Batched lookup. Ids without a user are simply missing from the map.
    async fn find_by_ids(&self, ids: &[String]) -> Result<HashMap<String, User>, AppError>;

    /// Returns false when no user has this id.
    async fn update_profile(
        &self,
        id: &str,
        username: &str,
        student_name: &str,
    ) -> Result<bool, AppError>;

    async fn update_platforms(&self, id: &str, platforms: &Platforms) -> Result<bool, AppError>;

    async fn update_avatar(&self, id: &str, avatar: &str) -> Result<bool, AppError>;
}

/// Process-local store for tests and running without MongoDB.
#[derive(Default)]
pub struct InMemoryStore {
    associations: RwLock<Vec<Association>>,
    users: RwLock<HashMap<String, User>>,
    fail_batch_lookups: AtomicBool,
}

fn poisoned<T>(e: std::sync::PoisonError<T>) -> AppError {
    AppError::InternalError(anyhow::anyhow!("In-memory store lock poisoned: {}", e))
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_association(&self, association: Association) -> Result<(), AppError> {
        let mut associations = self.associations.write().map_err(poisoned)?;
        associations.retain(|a| a.id != association.id);
        associations.push(association);
        Ok(())
    }

    pub fn insert_user(&self, user: User) -> Result<(), AppError> {
        self.users
            .write()
            .map_err(poisoned)?
            .insert(user.id.clone(), user);
        Ok(())
    }

    pub fn user(&self, id: &str) -> Option<User> {
        self.users.read().ok()?.get(id).cloned()
    }

    /// Make `find_by_ids` fail, as an unreachable database would.
    pub fn fail_batch_lookups(&self, fail: bool) {
        self.fail_batch_lookups.store(fail, Ordering::SeqCst);
    }

    fn modify_user(&self, id: &str, apply: impl FnOnce(&mut User)) -> Result<bool, AppError> {
        let mut users = self.users.write().map_err(poisoned)?;
        match users.get_mut(id) {
            Some(user) => {
                apply(user);
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

#[async_trait]
impl AssociationRepository for InMemoryStore {
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Association>, AppError> {
        let associations = self.associations.read().map_err(poisoned)?;
        Ok(associations
            .iter()
            .find(|a| a.slug() == Some(slug))
            .cloned())
    }

    async fn find_for_member(&self, user_id: &str) -> Result<Option<Association>, AppError> {
        let associations = self.associations.read().map_err(poisoned)?;
        Ok(associations
            .iter()
            .find(|a| a.users.includes(user_id))
            .cloned())
    }

    async fn health_check(&self) -> Result<(), AppError> {
        Ok(())
    }
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn find_by_id(&self, id: &str) -> Result<Option<User>, AppError> {
        Ok(self.users.read().map_err(poisoned)?.get(id).cloned())
    }

    async fn find_by_ids(&self, ids: &[String]) -> Result<HashMap<String, User>, AppError> {
        if self.fail_batch_lookups.load(Ordering::SeqCst) {
            return Err(AppError::DatabaseError(anyhow::anyhow!(
                "batched user lookup unavailable"
            )));
        }

        let users = self.users.read().map_err(poisoned)?;
        Ok(ids
            .iter()
            .filter_map(|id| users.get(id).map(|u| (id.clone(), u.clone())))
            .collect())
    }

    async fn update_profile(
        &self,
        id: &str,
        username: &str,
        student_name: &str,
    ) -> Result<bool, AppError> {
        self.modify_user(id, |user| {
            user.username = username.to_string();
            user.student.name = student_name.to_string();
        })
    }

    async fn update_platforms(&self, id: &str, platforms: &Platforms) -> Result<bool, AppError> {
        self.modify_user(id, |user| user.platforms = platforms.clone())
    }

    async fn update_avatar(&self, id: &str, avatar: &str) -> Result<bool, AppError> {
        self.modify_user(id, |user| user.avatar = Some(avatar.to_string()))
    }
}
