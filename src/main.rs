mod core;
mod features;
mod modules;
mod shared;

use crate::core::config::Config;
use crate::core::openapi::{ApiDoc, SwaggerInfoModifier};
use crate::core::{database, middleware};
use crate::features::advertisements::{
    routes as ads_routes, AdMetricService, AdvertisementService,
};
use crate::features::auth::clients::GoogleClient;
use crate::features::auth::routes as auth_routes;
use crate::features::auth::{AuthService, OtpService, SessionTokenService};
use crate::features::categories::{routes as categories_routes, CategoryService};
use crate::features::comments::{routes as comments_routes, CommentService};
use crate::features::dashboard::{routes as dashboard_routes, DashboardService};
use crate::features::posts::{routes as posts_routes, PostService};
use crate::features::reports::{routes as reports_routes, ReportService};
use crate::features::saved_posts::{routes as saved_posts_routes, SavedPostService};
use crate::features::users::{routes as users_routes, UserService};
use crate::modules::mailer::{Mailer, SmtpMailer};
use axum::{extract::State, http::StatusCode, middleware::from_fn, Router};
use sqlx::PgPool;
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

    // Load configuration
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

    // Create database connection pool
    let pool = database::create_pool(&config.database).await?;
    tracing::info!("Database connection pool created");

    // Run migrations automatically
    tracing::info!("Running database migrations...");
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .map_err(|e| anyhow::anyhow!("Migration failed: {}", e))?;
    tracing::info!("Database migrations completed successfully");

    // Session tokens
    let session_tokens = Arc::new(SessionTokenService::new(&config.auth));
    tracing::info!(
        "Session tokens initialized (ttl: {}s)",
        session_tokens.ttl_secs()
    );

    // Outgoing mail
    let mailer: Arc<dyn Mailer> = Arc::new(
        SmtpMailer::new(&config.smtp)
            .map_err(|e| anyhow::anyhow!("Failed to initialize SMTP mailer: {}", e))?,
    );
    tracing::info!(
        "SMTP mailer initialized ({}:{})",
        config.smtp.host,
        config.smtp.port
    );

    // Users and auth
    let user_service = Arc::new(UserService::new(pool.clone(), config.auth.bcrypt_cost));
    let otp_service = Arc::new(OtpService::new(
        pool.clone(),
        Arc::clone(&mailer),
        config.auth.otp_ttl,
    ));
    if config.google.client_id.is_none() {
        tracing::warn!("GOOGLE_CLIENT_ID not set; Google sign-in will be rejected");
    }
    let google_client = Arc::new(GoogleClient::new(config.google.clone()));
    let auth_service = Arc::new(AuthService::new(
        Arc::clone(&user_service),
        otp_service,
        Arc::clone(&session_tokens),
        google_client,
        config.auth.bcrypt_cost,
    ));
    tracing::info!("Auth and user services initialized");

    // Content
    let category_service = Arc::new(CategoryService::new(pool.clone()));
    let post_service = Arc::new(PostService::new(pool.clone()));
    let comment_service = Arc::new(CommentService::new(pool.clone()));
    let saved_post_service = Arc::new(SavedPostService::new(pool.clone()));
    tracing::info!("Content services initialized");

    // Moderation
    let report_service = Arc::new(ReportService::new(pool.clone()));
    tracing::info!("Report service initialized");

    // Advertising
    let ad_service = Arc::new(AdvertisementService::new(pool.clone()));
    let ad_metric_service = Arc::new(AdMetricService::new(pool.clone()));
    tracing::info!("Advertisement services initialized");

    // Initialize Dashboard Service
    let dashboard_service = Arc::new(DashboardService::new(pool.clone()));
    tracing::info!("Dashboard service initialized");

    // Build application router with dynamic swagger config
    let swagger_modifier = SwaggerInfoModifier {
        title: config.swagger.title.clone(),
        version: config.swagger.version.clone(),
        description: config.swagger.description.clone(),
    };

    let mut openapi = ApiDoc::openapi();
    swagger_modifier.modify(&mut openapi);

    // Build swagger router
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

    // Protected routes (require a session token)
    let protected_routes = Router::new()
        .merge(auth_routes::protected_routes())
        .merge(users_routes::routes(Arc::clone(&user_service)))
        .merge(posts_routes::protected_routes(
            Arc::clone(&post_service),
            Arc::clone(&category_service),
        ))
        .merge(comments_routes::protected_routes(Arc::clone(&comment_service)))
        .merge(saved_posts_routes::routes(saved_post_service))
        .merge(reports_routes::routes(report_service))
        .merge(ads_routes::protected_routes(
            Arc::clone(&ad_service),
            Arc::clone(&ad_metric_service),
        ))
        .merge(dashboard_routes::routes(dashboard_service))
        .route_layer(axum::middleware::from_fn_with_state(
            Arc::clone(&session_tokens),
            middleware::auth_middleware,
        ));

    // Health check: the process is up and the database answers
    async fn health_check(State(pool): State<PgPool>) -> StatusCode {
        match database::ping(&pool).await {
            Ok(()) => StatusCode::OK,
            Err(e) => {
                tracing::error!("Health check failed: {:?}", e);
                StatusCode::SERVICE_UNAVAILABLE
            }
        }
    }
    let health_route = Router::new()
        .route("/health", axum::routing::get(health_check))
        .with_state(pool.clone());

    // Public routes (a session is attached when present, never required)
    let public_routes = Router::new()
        .merge(auth_routes::public_routes(auth_service))
        .merge(categories_routes::routes(Arc::clone(&category_service)))
        .merge(posts_routes::public_routes(post_service, category_service))
        .merge(comments_routes::public_routes(comment_service))
        .merge(ads_routes::public_routes(ad_service, ad_metric_service))
        .route_layer(axum::middleware::from_fn_with_state(
            Arc::clone(&session_tokens),
            middleware::optional_auth_middleware,
        ));

    let app = Router::new()
        .merge(swagger)
        .merge(protected_routes)
        .merge(public_routes)
        .merge(health_route)
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
