use async_trait::async_trait;
use service_core::error::AppError;
use std::path::{Path, PathBuf};
use tokio::fs;

#[async_trait]
pub trait AvatarStorage: Send + Sync {
    async fn store(&self, key: &str, data: Vec<u8>) -> Result<(), AppError>;
    async fn delete(&self, key: &str) -> Result<(), AppError>;
}

pub struct LocalStorage {
    base_path: PathBuf,
}

impl LocalStorage {
    pub async fn new(base_path: impl Into<PathBuf>) -> Result<Self, AppError> {
        let base_path = base_path.into();
        if !base_path.exists() {
            fs::create_dir_all(&base_path).await?;
        }
        Ok(Self { base_path })
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    fn resolve(&self, key: &str) -> Result<PathBuf, AppError> {
        // Keys are built server-side, but never let one climb out of the base directory
        if Path::new(key)
            .components()
            .any(|c| !matches!(c, std::path::Component::Normal(_)))
        {
            return Err(AppError::BadRequest(anyhow::anyhow!(
                "Invalid storage key: {}",
                key
            )));
        }
        Ok(self.base_path.join(key))
    }
}

#[async_trait]
impl AvatarStorage for LocalStorage {
    async fn store(&self, key: &str, data: Vec<u8>) -> Result<(), AppError> {
        let path = self.resolve(key)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }
        fs::write(path, data).await?;
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), AppError> {
        let path = self.resolve(key)?;
        if path.exists() {
            fs::remove_file(path).await?;
        }
        Ok(())
    }
}
