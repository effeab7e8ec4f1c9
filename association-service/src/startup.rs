use crate::config::AssociationConfig;
use crate::handlers;
use crate::services::{
    AssociationRepository, AvatarStorage, JwtService, LocalStorage, MongoDb, UserRepository,
};
use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderValue, Method},
    middleware::from_fn,
    routing::{get, post},
    Router,
};
use service_core::error::AppError;
use service_core::middleware::{
    metrics::metrics_middleware, security_headers::security_headers_middleware,
    tracing::request_id_middleware,
};
use std::future::IntoFuture;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

#[derive(Clone)]
pub struct AppState {
    pub config: AssociationConfig,
    pub associations: Arc<dyn AssociationRepository>,
    pub users: Arc<dyn UserRepository>,
    pub avatars: Arc<dyn AvatarStorage>,
    pub jwt: JwtService,
}

pub fn build_router(state: AppState) -> Result<Router, AppError> {
    let origin = state.config.cors.origin.parse::<HeaderValue>().map_err(|e| {
        AppError::ConfigError(anyhow::anyhow!(
            "Invalid CORS origin {}: {}",
            state.config.cors.origin,
            e
        ))
    })?;

    // Credentials are allowed, so origin, methods and headers must all be explicit
    let cors = CorsLayer::new()
        .allow_origin(origin)
        .allow_credentials(true)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

    let api = Router::new()
        .route("/association/get/:slug", get(handlers::get_association))
        .route("/user/ping", get(handlers::ping))
        .route("/user/disconnect", post(handlers::disconnect))
        .route("/user/update", post(handlers::update_profile))
        .route("/user/update-platforms", post(handlers::update_platforms))
        .route(
            "/user/upload-avatar",
            post(handlers::upload_avatar).layer(DefaultBodyLimit::max(
                handlers::user::AVATAR_MAX_BYTES + 64 * 1024,
            )),
        );

    Ok(Router::new()
        .route("/health", get(handlers::health_check))
        .route("/ready", get(handlers::readiness_check))
        .route("/metrics", get(handlers::metrics_endpoint))
        .nest("/api", api)
        .layer(from_fn(metrics_middleware))
        .layer(from_fn(security_headers_middleware))
        .layer(cors)
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &axum::http::Request<_>| {
                let request_id = request
                    .headers()
                    .get("x-request-id")
                    .and_then(|value| value.to_str().ok())
                    .unwrap_or("-");

                tracing::info_span!(
                    "http_request",
                    request_id = %request_id,
                    method = %request.method(),
                    uri = %request.uri(),
                    user_id = tracing::field::Empty,
                )
            }),
        )
        .layer(from_fn(request_id_middleware))
        .with_state(state))
}

pub struct Application {
    port: u16,
    server: Box<dyn std::future::Future<Output = std::io::Result<()>> + Send + Unpin>,
    db: MongoDb,
}

impl Application {
    pub async fn build(config: AssociationConfig) -> Result<Self, AppError> {
        let db = MongoDb::connect(&config.mongodb.uri, &config.mongodb.database)
            .await
            .map_err(|e| {
                tracing::error!("Failed to connect to MongoDB: {}", e);
                e
            })?;
        db.initialize_indexes().await.map_err(|e| {
            tracing::error!("Failed to initialize database indexes: {}", e);
            e
        })?;

        let avatars: Arc<dyn AvatarStorage> = Arc::new(
            LocalStorage::new(&config.storage.avatar_path)
                .await
                .map_err(|e| {
                    tracing::error!(
                        "Failed to initialize avatar storage at {}: {}",
                        config.storage.avatar_path,
                        e
                    );
                    e
                })?,
        );

        let state = AppState {
            jwt: JwtService::new(&config.auth.jwt_secret),
            associations: Arc::new(db.clone()),
            users: Arc::new(db.clone()),
            avatars,
            config: config.clone(),
        };

        let app = build_router(state)?;

        let addr = SocketAddr::from(([0, 0, 0, 0], config.common.port));
        let listener = TcpListener::bind(addr).await.map_err(|e| {
            tracing::error!("Failed to bind TCP listener to {}: {}", addr, e);
            AppError::from(e)
        })?;
        let port = listener.local_addr()?.port();

        tracing::info!("Listening on {}", port);

        let server = axum::serve(listener, app).with_graceful_shutdown(shutdown_signal());

        Ok(Self {
            port,
            server: Box::new(server.into_future()),
            db,
        })
    }

    pub fn db(&self) -> &MongoDb {
        &self.db
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub async fn run_until_stopped(self) -> std::io::Result<()> {
        self.server.await
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
