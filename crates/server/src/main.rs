//! EchoCity server entry point.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{Router, extract::DefaultBodyLimit, middleware};
use echocity_api::{middleware::AppState, router as api_router};
use echocity_common::{Config, LocalStorage};
use echocity_core::{
    AccountService, AdvisoryService, CategoryService, ComplaintService, DepartmentService,
    GeminiClient, RoleResolver, UploadService,
};
use echocity_db::repositories::{
    CategoryRepository, ComplaintRepository, DepartmentRepository, ProfileRepository,
    UserRepository,
};
use tokio::signal;
use tower_http::{
    cors::{Any, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Waits for a shutdown signal (SIGINT or SIGTERM).
///
/// On Unix systems, this listens for both SIGINT (Ctrl+C) and SIGTERM.
/// On Windows, this only listens for Ctrl+C.
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            info!("Received SIGINT, initiating graceful shutdown...");
        },
        () = terminate => {
            info!("Received SIGTERM, initiating graceful shutdown...");
        },
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "echocity=debug,tower_http=debug".into()),
        )
        .init();

    info!("Starting echocity server...");

    // Load configuration
    let config = Config::load()?;

    // Connect to database
    let db = echocity_db::init(&config).await?;
    info!("Connected to database");

    // Run migrations
    info!("Running database migrations...");
    echocity_db::migrate(&db).await?;
    info!("Migrations completed");

    // Initialize repositories
    let db = Arc::new(db);
    let user_repo = UserRepository::new(Arc::clone(&db));
    let profile_repo = ProfileRepository::new(Arc::clone(&db));
    let complaint_repo = ComplaintRepository::new(Arc::clone(&db));
    let category_repo = CategoryRepository::new(Arc::clone(&db));
    let department_repo = DepartmentRepository::new(Arc::clone(&db));

    // Initialize services
    let account_service = AccountService::new(user_repo, profile_repo.clone());
    let role_resolver = RoleResolver::new(profile_repo, &config);
    let complaint_service = ComplaintService::new(complaint_repo, category_repo.clone());
    let category_service = CategoryService::new(category_repo);
    let department_service = DepartmentService::new(department_repo);

    let advisory_service =
        AdvisoryService::new(Arc::new(GeminiClient::new(config.advisory.clone())));
    if config.advisory.api_key.is_none() {
        info!("No advisory API key configured; AI suggestions will degrade gracefully");
    }

    let storage = Arc::new(LocalStorage::new(
        config.storage.base_path.clone(),
        config.storage.base_url.clone(),
    ));
    let upload_service = UploadService::new(storage);

    // Create app state
    let state = AppState {
        account_service,
        role_resolver,
        complaint_service,
        category_service,
        department_service,
        advisory_service,
        upload_service,
    };

    // Build router
    let app = Router::new()
        .nest("/api", api_router())
        .nest_service("/files", ServeDir::new(&config.storage.base_path))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            echocity_api::middleware::auth_middleware,
        ))
        // Room for the 10 MiB upload cap plus multipart framing.
        .layer(DefaultBodyLimit::max(12 * 1024 * 1024))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state);

    // Start server with graceful shutdown
    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}
