use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, Secret};
use serde::de::DeserializeOwned;
use service_core::observability::{TracedClientExt, TracedRequest};

use crate::config::ClientConfig;
use crate::error::ClientError;
use crate::models::{ActionResponse, AvatarFile, AvatarResponse, Platforms, Profile, ProfileUpdate};

/// Remote user actions consumed by [`crate::SessionState`].
#[async_trait]
pub trait UserService: Send + Sync {
    async fn ping(&self) -> Result<Profile, ClientError>;
    async fn disconnect(&self) -> Result<ActionResponse, ClientError>;
    async fn update(&self, delta: &ProfileUpdate) -> Result<ActionResponse, ClientError>;
    async fn update_platforms(&self, platforms: &Platforms)
        -> Result<ActionResponse, ClientError>;
    async fn upload_avatar(&self, file: AvatarFile) -> Result<AvatarResponse, ClientError>;
}

/// [`UserService`] over HTTP against association-service.
///
/// The cookie store keeps whatever session cookie the server sets, so a
/// disconnect clears it for later calls.
pub struct HttpUserService {
    client: Client,
    base_url: String,
    access_token: Option<Secret<String>>,
}

impl HttpUserService {
    pub fn new(config: &ClientConfig) -> Result<Self, ClientError> {
        let client = Client::builder()
            .cookie_store(true)
            .timeout(config.timeout())
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            access_token: config.access_token.clone(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api/user{}", self.base_url, path)
    }

    fn authorize(&self, request: TracedRequest) -> TracedRequest {
        match &self.access_token {
            Some(token) => request.bearer_auth(token.expose_secret()),
            None => request,
        }
    }

    async fn send<T: DeserializeOwned>(&self, request: TracedRequest) -> Result<T, ClientError> {
        let response = self.authorize(request).send().await.map_err(|e| {
            tracing::error!(error = %e, "User service request failed");
            e
        })?;
        decode(response).await
    }
}

async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ClientError> {
    let status = response.status();
    let body = response.bytes().await?;

    if !status.is_success() {
        let message = serde_json::from_slice::<serde_json::Value>(&body)
            .ok()
            .and_then(|v| v.get("error").and_then(|e| e.as_str()).map(str::to_string))
            .unwrap_or_else(|| status.to_string());
        return Err(ClientError::Status {
            status: status.as_u16(),
            message,
        });
    }

    serde_json::from_slice(&body).map_err(|e| ClientError::Decode(e.to_string()))
}

#[async_trait]
impl UserService for HttpUserService {
    async fn ping(&self) -> Result<Profile, ClientError> {
        self.send(self.client.traced_get(&self.url("/ping"))).await
    }

    async fn disconnect(&self) -> Result<ActionResponse, ClientError> {
        self.send(self.client.traced_post(&self.url("/disconnect")))
            .await
    }

    async fn update(&self, delta: &ProfileUpdate) -> Result<ActionResponse, ClientError> {
        self.send(self.client.traced_post(&self.url("/update")).json(delta))
            .await
    }

    async fn update_platforms(
        &self,
        platforms: &Platforms,
    ) -> Result<ActionResponse, ClientError> {
        self.send(
            self.client
                .traced_post(&self.url("/update-platforms"))
                .json(platforms),
        )
        .await
    }

    async fn upload_avatar(&self, file: AvatarFile) -> Result<AvatarResponse, ClientError> {
        let part = reqwest::multipart::Part::bytes(file.bytes)
            .file_name(file.file_name)
            .mime_str(&file.content_type)?;
        let form = reqwest::multipart::Form::new().part("file", part);

        self.send(
            self.client
                .traced_post(&self.url("/upload-avatar"))
                .multipart(form),
        )
        .await
    }
}
