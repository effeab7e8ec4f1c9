#![allow(dead_code)]

use association_service::config::{
    AssociationConfig, AuthConfig, CorsConfig, MongoConfig, StorageConfig,
};
use association_service::models::{
    Association, AssociationSettings, Federation, MembershipRoster, Networks, Platforms, School,
    Student, User,
};
use association_service::services::{InMemoryStore, JwtService, LocalStorage};
use association_service::{build_router, AppState};
use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use secrecy::Secret;
use service_core::config::{Config as CoreConfig, Environment};
use service_core::roles::RoleSet;
use std::sync::Arc;
use tower::util::ServiceExt;
use uuid::Uuid;

pub const SLUG: &str = "esport-club";
pub const OWNER_ID: &str = "u-owner";
pub const MODERATOR_ID: &str = "u-mod";
pub const MEMBER_ID: &str = "u-member";
pub const GHOST_ID: &str = "u-ghost";
pub const OUTSIDER_ID: &str = "u-outsider";
pub const PLATFORM_MEMBER_ID: &str = "u-platform";

pub struct TestApp {
    pub router: Router,
    pub store: Arc<InMemoryStore>,
    pub jwt: JwtService,
    pub avatar_path: String,
}

pub fn test_config(avatar_path: &str) -> AssociationConfig {
    AssociationConfig {
        common: CoreConfig {
            port: 0,
            environment: Environment::Development,
        },
        mongodb: MongoConfig {
            uri: "mongodb://localhost:27017".to_string(),
            database: format!("association_test_{}", Uuid::new_v4()),
        },
        auth: AuthConfig {
            jwt_secret: Secret::new("integration-test-secret".to_string()),
            session_cookie: "token".to_string(),
        },
        cors: CorsConfig {
            origin: "http://localhost:8080".to_string(),
        },
        storage: StorageConfig {
            avatar_path: avatar_path.to_string(),
        },
        log_level: "error".to_string(),
        otlp_endpoint: None,
    }
}

pub fn user(id: &str, roles: &[&str]) -> User {
    User {
        id: id.to_string(),
        name: Some(format!("Name of {}", id)),
        avatar: None,
        mail: format!("{}@example.org", id),
        platforms: Platforms {
            discord: format!("{}#1234", id),
        },
        roles: RoleSet::from_tags(roles),
        username: format!("{}-username", id),
        student: Student {
            name: format!("Student {}", id),
            school_name: "IUT Lannion".to_string(),
        },
    }
}

pub fn association() -> Association {
    Association {
        id: "assoc-1".to_string(),
        name: "Esport Club".to_string(),
        school: School {
            name: "IUT Lannion".to_string(),
            address: "Rue Edouard Branly".to_string(),
            students_number: 1500,
        },
        federation: Some(Federation {
            is_validated: true,
            region: "Bretagne".to_string(),
        }),
        logo: Some("logo.png".to_string()),
        networks: Some(Networks {
            facebook: "esportclub".to_string(),
            instagram: "esportclub".to_string(),
            twitch: "esportclub".to_string(),
            twitter: "esportclub".to_string(),
        }),
        settings: Some(AssociationSettings {
            slug: SLUG.to_string(),
        }),
        tag: Some("ESC".to_string()),
        mail: "board@esport-club.org".to_string(),
        users: MembershipRoster {
            owner: OWNER_ID.to_string(),
            moderators: vec![MODERATOR_ID.to_string()],
            members: vec![MEMBER_ID.to_string(), GHOST_ID.to_string()],
        },
    }
}

impl TestApp {
    pub async fn spawn() -> Self {
        let avatar_path = format!("target/test-avatars-{}", Uuid::new_v4());
        let config = test_config(&avatar_path);

        let store = Arc::new(InMemoryStore::new());
        store.insert_association(association()).unwrap();
        for u in [
            user(OWNER_ID, &[]),
            user(MODERATOR_ID, &[]),
            user(MEMBER_ID, &["member", "tournament"]),
            user(OUTSIDER_ID, &[]),
            user(PLATFORM_MEMBER_ID, &["member"]),
        ] {
            store.insert_user(u).unwrap();
        }

        let avatars = LocalStorage::new(&avatar_path)
            .await
            .expect("Failed to create avatar storage");
        let jwt = JwtService::new(&config.auth.jwt_secret);

        let state = AppState {
            config,
            associations: store.clone(),
            users: store.clone(),
            avatars: Arc::new(avatars),
            jwt: jwt.clone(),
        };

        let router = build_router(state).expect("Failed to build router");

        TestApp {
            router,
            store,
            jwt,
            avatar_path,
        }
    }

    pub fn token_for(&self, user_id: &str) -> String {
        self.jwt
            .issue(user_id, chrono::Duration::minutes(15))
            .expect("Failed to issue token")
    }

    pub async fn send(&self, request: Request<Body>) -> (StatusCode, axum::http::HeaderMap, Vec<u8>) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, headers, body.to_vec())
    }

    pub async fn get_json(&self, uri: &str, token: Option<&str>) -> (StatusCode, serde_json::Value) {
        let mut builder = Request::builder().uri(uri);
        if let Some(token) = token {
            builder = builder.header("Authorization", format!("Bearer {}", token));
        }
        let (status, _, body) = self.send(builder.body(Body::empty()).unwrap()).await;
        (status, parse(&body))
    }

    pub async fn post_json(
        &self,
        uri: &str,
        token: Option<&str>,
        body: serde_json::Value,
    ) -> (StatusCode, serde_json::Value) {
        let mut builder = Request::builder()
            .method("POST")
            .uri(uri)
            .header("Content-Type", "application/json");
        if let Some(token) = token {
            builder = builder.header("Authorization", format!("Bearer {}", token));
        }
        let (status, _, body) = self
            .send(builder.body(Body::from(body.to_string())).unwrap())
            .await;
        (status, parse(&body))
    }

    pub async fn cleanup(&self) {
        let _ = tokio::fs::remove_dir_all(&self.avatar_path).await;
    }
}

fn parse(body: &[u8]) -> serde_json::Value {
    if body.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(body).expect("Response body is not JSON")
    }
}
