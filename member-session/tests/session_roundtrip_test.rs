use association_service::config::{
    AssociationConfig, AuthConfig, CorsConfig, MongoConfig, StorageConfig,
};
use association_service::models::{
    Association, MembershipRoster, Platforms as StoredPlatforms, School, Student as StoredStudent,
    User,
};
use association_service::services::{InMemoryStore, JwtService, LocalStorage};
use association_service::{build_router, AppState};
use member_session::models::{AvatarFile, Platforms, ProfileUpdate};
use member_session::{ClientConfig, HttpUserService, SessionState, TracingNotifier};
use secrecy::Secret;
use service_core::config::{Config as CoreConfig, Environment};
use service_core::roles::RoleSet;
use std::sync::Arc;

const USER_ID: &str = "u-camille";

struct TestServer {
    base_url: String,
    store: Arc<InMemoryStore>,
    jwt: JwtService,
    avatar_path: String,
}

impl TestServer {
    async fn spawn() -> Self {
        let avatar_path = format!("target/session-avatars-{}", uuid::Uuid::new_v4());
        let config = AssociationConfig {
            common: CoreConfig {
                port: 0,
                environment: Environment::Development,
            },
            mongodb: MongoConfig {
                uri: "mongodb://localhost:27017".to_string(),
                database: "unused".to_string(),
            },
            auth: AuthConfig {
                jwt_secret: Secret::new("session-test-secret".to_string()),
                session_cookie: "token".to_string(),
            },
            cors: CorsConfig {
                origin: "http://localhost:8080".to_string(),
            },
            storage: StorageConfig {
                avatar_path: avatar_path.clone(),
            },
            log_level: "error".to_string(),
            otlp_endpoint: None,
        };

        let store = Arc::new(InMemoryStore::new());
        store
            .insert_user(User {
                id: USER_ID.to_string(),
                name: Some("Camille".to_string()),
                avatar: None,
                mail: "camille@example.org".to_string(),
                platforms: StoredPlatforms {
                    discord: "camille#0001".to_string(),
                },
                roles: RoleSet::from_tags(["member", "federation"]),
                username: "camille".to_string(),
                student: StoredStudent {
                    name: "Camille".to_string(),
                    school_name: "IUT Lannion".to_string(),
                },
            })
            .unwrap();
        store
            .insert_association(Association {
                id: "assoc-1".to_string(),
                name: "Esport Club".to_string(),
                school: School {
                    name: "IUT Lannion".to_string(),
                    address: "Rue Edouard Branly".to_string(),
                    students_number: 1500,
                },
                federation: None,
                logo: None,
                networks: None,
                settings: None,
                tag: None,
                mail: "board@esport-club.org".to_string(),
                users: MembershipRoster {
                    owner: USER_ID.to_string(),
                    moderators: vec![],
                    members: vec![],
                },
            })
            .unwrap();

        let jwt = JwtService::new(&config.auth.jwt_secret);
        let avatars = LocalStorage::new(&avatar_path).await.unwrap();
        let state = AppState {
            config,
            associations: store.clone(),
            users: store.clone(),
            avatars: Arc::new(avatars),
            jwt: jwt.clone(),
        };
        let router = build_router(state).unwrap();

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });

        TestServer {
            base_url: format!("http://127.0.0.1:{}", port),
            store,
            jwt,
            avatar_path,
        }
    }

    fn client(&self) -> HttpUserService {
        let token = self
            .jwt
            .issue(USER_ID, chrono::Duration::minutes(15))
            .unwrap();
        HttpUserService::new(&ClientConfig::new(&self.base_url).with_access_token(token)).unwrap()
    }

    async fn cleanup(&self) {
        let _ = tokio::fs::remove_dir_all(&self.avatar_path).await;
    }
}

#[tokio::test]
async fn session_follows_server_state() {
    let server = TestServer::spawn().await;
    let service = server.client();
    let notifier = TracingNotifier;
    let mut session = SessionState::new();

    session.init(&service).await.unwrap();
    assert_eq!(session.id, USER_ID);
    assert_eq!(session.student.school_name, "IUT Lannion");
    assert_eq!(
        session.association.as_ref().map(|a| a.name.as_str()),
        Some("Esport Club")
    );
    assert!(session.flags().has_federation_right);
    assert!(!session.flags().has_tournament_right);

    assert!(
        session
            .update(&service, &notifier, ProfileUpdate::new("cam", "Camille D."))
            .await
    );
    assert_eq!(session.username, "cam");
    assert_eq!(server.store.user(USER_ID).unwrap().username, "cam");

    // Rejected by validation: nothing changes on either side
    assert!(
        !session
            .update(&service, &notifier, ProfileUpdate::new("", "Camille"))
            .await
    );
    assert_eq!(session.username, "cam");
    assert_eq!(session.student.name, "Camille D.");

    let platforms = Platforms {
        discord: "cam#4242".to_string(),
    };
    assert!(session.update_platforms(&service, &notifier, platforms).await);
    assert_eq!(
        server.store.user(USER_ID).unwrap().platforms.discord,
        "cam#4242"
    );

    let file = AvatarFile {
        file_name: "me.png".to_string(),
        content_type: "image/png".to_string(),
        bytes: vec![0x89, b'P', b'N', b'G'],
    };
    assert!(session.upload_avatar(&service, &notifier, file).await);
    assert!(session.avatar.is_some());
    assert_eq!(server.store.user(USER_ID).unwrap().avatar, session.avatar);

    session.disconnect(&service, &notifier).await;
    assert!(!session.is_signed_in());

    server.cleanup().await;
}

#[tokio::test]
async fn init_without_credentials_stays_signed_out() {
    let server = TestServer::spawn().await;
    let service = HttpUserService::new(&ClientConfig::new(&server.base_url)).unwrap();
    let mut session = SessionState::new();

    session.init(&service).await.unwrap();

    assert!(!session.is_signed_in());
    server.cleanup().await;
}

#[tokio::test]
async fn init_with_unreachable_server_stays_signed_out() {
    let service = HttpUserService::new(&ClientConfig::new("http://127.0.0.1:9")).unwrap();
    let mut session = SessionState::new();

    session.init(&service).await.unwrap();

    assert_eq!(session, SessionState::default());
}
