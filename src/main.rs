mod core;
mod features;
mod modules;
mod shared;

use crate::core::config::Config;
use crate::core::openapi::{ApiDoc, SwaggerInfoModifier};
use crate::core::{database, middleware};
use crate::features::activity::{ActivityRepository, PgActivityRepository};
use crate::features::auth::JwtValidator;
use crate::features::dashboard::{
    routes as dashboard_routes, DashboardService, PgDashboardRepository,
};
use crate::features::essays::{routes as essays_routes, EssayService};
use crate::features::files::{
    routes as files_routes, FileRepository, FileService, PgFileRepository,
};
use crate::features::generation::{
    routes as generation_routes, MaterialGenerator, PipelineService, PipelineSettings,
};
use crate::features::materials::{
    routes as materials_routes, ArtifactRepository, MaterialsService, PgArtifactRepository,
};
use crate::features::quotas::{routes as quotas_routes, PgQuotaRepository, QuotaService};
use crate::features::study_sessions::{
    routes as study_sessions_routes, PgStudySessionRepository, StudySessionService,
};
use crate::modules::llm::{AnthropicClient, TextCompletion};
use crate::modules::storage::{BlobStore, MinIOClient};
use axum::extract::DefaultBodyLimit;
use axum::{middleware::from_fn, Router};
use std::sync::Arc;
use tower_http::request_id::{PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::{DefaultOnRequest, DefaultOnResponse, TraceLayer};
use tracing::Level;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::Modify;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

fn main() -> anyhow::Result<()> {
    // Build Tokio runtime with configurable worker threads
    let worker_threads = std::env::var("TOKIO_WORKER_THREADS")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or_else(|| {
            std::thread::available_parallelism()
                .map(|p| p.get())
                .unwrap_or(4)
        });

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(worker_threads)
        .max_blocking_threads(worker_threads * 4)
        .enable_all()
        .build()?;

    runtime.block_on(async_main(worker_threads))
}

async fn async_main(worker_threads: usize) -> anyhow::Result<()> {
    // Load .env file BEFORE initializing logger so RUST_LOG is available
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env().map_err(|e| anyhow::anyhow!(e))?;

    let available_cpus = std::thread::available_parallelism()
        .map(|p| p.get())
        .unwrap_or(1);
    tracing::info!(
        "System info: available_cpus={}, tokio_worker_threads={}, pid={}",
        available_cpus,
        worker_threads,
        std::process::id()
    );

    tracing::info!("Configuration loaded successfully");

    let pool = database::create_pool(&config.database).await?;
    tracing::info!("Database connection pool created");

    tracing::info!("Running database migrations...");
    database::run_migrations(&pool)
        .await
        .map_err(|e| anyhow::anyhow!("Migration failed: {}", e))?;
    tracing::info!("Database migrations completed successfully");

    let jwt_validator = Arc::new(JwtValidator::new(&config.auth));
    tracing::info!("Auth configuration initialized");

    let minio_client = Arc::new(
        MinIOClient::new(config.minio.clone())
            .map_err(|e| anyhow::anyhow!("Failed to initialize MinIO client: {}", e))?,
    );
    minio_client
        .ensure_bucket_exists()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to ensure MinIO bucket exists: {}", e))?;
    tracing::info!(
        "MinIO client initialized for bucket: {}",
        minio_client.bucket_name()
    );
    let blob_store: Arc<dyn BlobStore> = minio_client;

    let anthropic_client = AnthropicClient::new(&config.llm)
        .map_err(|e| anyhow::anyhow!("Failed to initialize model client: {}", e))?;
    tracing::info!("Model client initialized (model: {})", anthropic_client.model());
    let llm: Arc<dyn TextCompletion> = Arc::new(anthropic_client);

    // Repositories
    let file_repository: Arc<dyn FileRepository> = Arc::new(PgFileRepository::new(pool.clone()));
    let artifact_repository: Arc<dyn ArtifactRepository> =
        Arc::new(PgArtifactRepository::new(pool.clone()));
    let activity_repository: Arc<dyn ActivityRepository> =
        Arc::new(PgActivityRepository::new(pool.clone()));

    let quota_service = Arc::new(QuotaService::new(Arc::new(PgQuotaRepository::new(
        pool.clone(),
    ))));
    tracing::info!("Quota service initialized");

    let file_service = Arc::new(FileService::new(
        Arc::clone(&file_repository),
        Arc::clone(&blob_store),
        Arc::clone(&quota_service),
    ));
    tracing::info!("File service initialized");

    let pipeline_service = Arc::new(PipelineService::new(
        Arc::clone(&file_repository),
        Arc::clone(&artifact_repository),
        Arc::clone(&activity_repository),
        Arc::clone(&quota_service),
        Arc::clone(&blob_store),
        MaterialGenerator::new(Arc::clone(&llm), config.pipeline.generation_max_tokens),
        PipelineSettings {
            max_input_chars: config.pipeline.max_input_chars,
            extraction_timeout: config.pipeline.extraction_timeout,
            generation_timeout: config.llm.timeout,
        },
    ));
    tracing::info!(
        "Generation pipeline initialized (max input: {} chars)",
        config.pipeline.max_input_chars
    );

    let materials_service = Arc::new(MaterialsService::new(
        Arc::clone(&file_repository),
        Arc::clone(&artifact_repository),
    ));

    let study_session_service = Arc::new(StudySessionService::new(
        Arc::new(PgStudySessionRepository::new(pool.clone())),
        Arc::clone(&activity_repository),
    ));

    let essay_service = Arc::new(EssayService::new(
        Arc::clone(&artifact_repository),
        Arc::clone(&activity_repository),
        Arc::clone(&llm),
        config.pipeline.essay_feedback_max_tokens,
        config.llm.timeout,
    ));
    let dashboard_service = Arc::new(DashboardService::new(
        Arc::new(PgDashboardRepository::new(pool.clone())),
        Arc::clone(&activity_repository),
    ));
    tracing::info!("Study services initialized");

    // Build application router with dynamic swagger config
    let swagger_modifier = SwaggerInfoModifier {
        title: config.swagger.title.clone(),
        version: config.swagger.version.clone(),
        description: config.swagger.description.clone(),
    };

    let mut openapi = ApiDoc::openapi();
    swagger_modifier.modify(&mut openapi);

    let swagger = if let Some(credentials) = config.swagger.credentials() {
        tracing::info!("Swagger UI basic auth enabled");
        Router::new()
            .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", openapi))
            .layer(from_fn(middleware::basic_auth_middleware(Arc::new(
                credentials,
            ))))
    } else {
        tracing::info!("Swagger UI basic auth disabled (no credentials configured)");
        Router::new().merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", openapi))
    };

    // Protected routes (require JWT authentication)
    let protected_routes = Router::new()
        .merge(files_routes::routes(file_service))
        .merge(generation_routes::routes(pipeline_service))
        .merge(materials_routes::routes(materials_service))
        .merge(quotas_routes::routes(quota_service))
        .merge(study_sessions_routes::routes(study_session_service))
        .merge(essays_routes::routes(essay_service))
        .merge(dashboard_routes::routes(dashboard_service))
        .route_layer(axum::middleware::from_fn_with_state(
            jwt_validator,
            middleware::auth_middleware,
        ));

    // Simple health check endpoint (no auth required)
    async fn health_check() -> axum::http::StatusCode {
        axum::http::StatusCode::OK
    }
    let health_route = Router::new().route("/health", axum::routing::get(health_check));

    let app = Router::new()
        .merge(swagger)
        .merge(protected_routes)
        .merge(health_route)
        .layer(DefaultBodyLimit::max(config.app.max_request_body_size))
        .layer(middleware::cors_layer(
            config.app.cors_allowed_origins.clone(),
        ))
        // Propagate X-Request-Id to response headers
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(middleware::MakeSpanWithRequestId)
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        // Generate X-Request-Id using UUID v7 (or use client-provided one)
        .layer(SetRequestIdLayer::x_request_id(middleware::MakeRequestUuid));

    // Start server
    let addr = config.app.server_address();
    let socket_addr: std::net::SocketAddr = addr
        .parse()
        .map_err(|e| anyhow::anyhow!("Invalid address: {}", e))?;

    // Use socket2 for TCP listener configuration
    let socket = socket2::Socket::new(
        socket2::Domain::for_address(socket_addr),
        socket2::Type::STREAM,
        Some(socket2::Protocol::TCP),
    )?;

    socket.set_reuse_address(true)?;
    #[cfg(unix)]
    socket.set_reuse_port(true)?;
    socket.set_nodelay(true)?;

    socket.set_recv_buffer_size(256 * 1024)?;
    socket.set_send_buffer_size(256 * 1024)?;

    #[cfg(target_os = "linux")]
    {
        let keepalive = socket2::TcpKeepalive::new()
            .with_time(std::time::Duration::from_secs(60))
            .with_interval(std::time::Duration::from_secs(10))
            .with_retries(3);
        socket.set_tcp_keepalive(&keepalive)?;
    }
    #[cfg(not(target_os = "linux"))]
    {
        let keepalive = socket2::TcpKeepalive::new().with_time(std::time::Duration::from_secs(60));
        socket.set_tcp_keepalive(&keepalive)?;
    }

    socket.set_nonblocking(true)?;
    socket.bind(&socket_addr.into())?;
    socket.listen(65535)?;

    let listener = tokio::net::TcpListener::from_std(socket.into())?;
    tracing::info!("Server listening on {}", format!("http://{}", addr));
    tracing::info!(
        "Swagger UI available at {}",
        format!("http://{}/swagger-ui/", addr)
    );

    axum::serve(listener, app).await?;

    Ok(())
}
