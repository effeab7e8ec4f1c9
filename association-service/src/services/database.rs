use async_trait::async_trait;
use futures::stream::TryStreamExt;
use mongodb::{
    bson::{doc, Document}, options::IndexOptions, Client as MongoClient, Collection, Database, IndexModel,
};
use service_core::error::AppError;
use std::collections::HashMap;

use super::repository::{AssociationRepository, UserRepository};
use crate::models::{Association, Platforms, User};

#[derive(Clone)]
pub struct MongoDb {
    client: MongoClient,
    db: Database,
}

impl MongoDb {
    pub async fn connect(uri: &str, database: &str) -> Result<Self, AppError> {
        tracing::info!("Connecting to MongoDB");
        let client = MongoClient::with_uri_str(uri).await.map_err(|e| {
            tracing::error!("Failed to connect to MongoDB: {}", e);
            AppError::from(e)
        })?;
        let db = client.database(database);
        tracing::info!(database = %database, "Successfully connected to MongoDB database");
        Ok(Self { client, db })
    }

    pub async fn initialize_indexes(&self) -> Result<(), AppError> {
        tracing::info!("Creating MongoDB indexes for association-service");

        // Slugs are optional, so the unique index must skip documents without one
        let slug_index = IndexModel::builder()
            .keys(doc! { "settings.slug": 1 })
            .options(
                IndexOptions::builder()
                    .name("slug_lookup".to_string())
                    .unique(true)
                    .sparse(true)
                    .build(),
            )
            .build();

        self.associations()
            .create_index(slug_index, None)
            .await
            .map_err(|e| {
                tracing::error!("Failed to create slug index on associations: {}", e);
                AppError::from(e)
            })?;
        tracing::info!("Created index on associations.settings.slug");

        for field in ["users.owner", "users.moderators", "users.members"] {
            let mut keys = Document::new();
            keys.insert(field, 1);

            let membership_index = IndexModel::builder()
                .keys(keys)
                .options(
                    IndexOptions::builder()
                        .name(format!("{}_lookup", field.replace('.', "_")))
                        .build(),
                )
                .build();

            self.associations()
                .create_index(membership_index, None)
                .await
                .map_err(|e| {
                    tracing::error!("Failed to create {} index on associations: {}", field, e);
                    AppError::from(e)
                })?;
            tracing::info!("Created index on associations.{}", field);
        }

        Ok(())
    }

    pub fn associations(&self) -> Collection<Association> {
        self.db.collection("associations")
    }

    pub fn users(&self) -> Collection<User> {
        self.db.collection("users")
    }

    pub fn client(&self) -> &MongoClient {
        &self.client
    }

    pub fn database(&self) -> &Database {
        &self.db
    }
}

#[async_trait]
impl AssociationRepository for MongoDb {
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Association>, AppError> {
        self.associations()
            .find_one(doc! { "settings.slug": slug }, None)
            .await
            .map_err(AppError::from)
    }

    async fn find_for_member(&self, user_id: &str) -> Result<Option<Association>, AppError> {
        let filter = doc! {
            "$or": [
                { "users.owner": user_id },
                { "users.moderators": user_id },
                { "users.members": user_id },
            ]
        };

        self.associations()
            .find_one(filter, None)
            .await
            .map_err(AppError::from)
    }

    async fn health_check(&self) -> Result<(), AppError> {
        self.client
            .database("admin")
            .run_command(doc! { "ping": 1 }, None)
            .await
            .map_err(|e| {
                tracing::error!("MongoDB health check failed: {}", e);
                AppError::from(e)
            })?;
        Ok(())
    }
}

#[async_trait]
impl UserRepository for MongoDb {
    async fn find_by_id(&self, id: &str) -> Result<Option<User>, AppError> {
        self.users()
            .find_one(doc! { "_id": id }, None)
            .await
            .map_err(AppError::from)
    }

    async fn find_by_ids(&self, ids: &[String]) -> Result<HashMap<String, User>, AppError> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }

        let mut cursor = self
            .users()
            .find(doc! { "_id": { "$in": ids.to_vec() } }, None)
            .await
            .map_err(AppError::from)?;

        let mut users = HashMap::with_capacity(ids.len());
        while let Some(user) = cursor.try_next().await.map_err(AppError::from)? {
            users.insert(user.id.clone(), user);
        }

        Ok(users)
    }

    async fn update_profile(
        &self,
        id: &str,
        username: &str,
        student_name: &str,
    ) -> Result<bool, AppError> {
        let result = self
            .users()
            .update_one(
                doc! { "_id": id },
                doc! { "$set": { "username": username, "student.name": student_name } },
                None,
            )
            .await
            .map_err(AppError::from)?;

        Ok(result.matched_count > 0)
    }

    async fn update_platforms(&self, id: &str, platforms: &Platforms) -> Result<bool, AppError> {
        let result = self
            .users()
            .update_one(
                doc! { "_id": id },
                doc! { "$set": { "platforms.discord": platforms.discord.as_str() } },
                None,
            )
            .await
            .map_err(AppError::from)?;

        Ok(result.matched_count > 0)
    }

    async fn update_avatar(&self, id: &str, avatar: &str) -> Result<bool, AppError> {
        let result = self
            .users()
            .update_one(doc! { "_id": id }, doc! { "$set": { "avatar": avatar } }, None)
            .await
            .map_err(AppError::from)?;

        Ok(result.matched_count > 0)
    }
}
