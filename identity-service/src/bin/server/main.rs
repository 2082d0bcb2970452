use std::sync::Arc;

use auth::Authenticator;
use chrono::Duration;
use identity_service::config::Config;
use identity_service::domain::user::service::CredentialService;
use identity_service::inbound::http::router::create_router;
use identity_service::outbound::events::BroadcastEventBus;
use identity_service::outbound::repositories::PostgresLoginAttemptRepository;
use identity_service::outbound::repositories::PostgresUserRepository;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "identity_service=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        service = "identity-service",
        version = env!("CARGO_PKG_VERSION"),
        "Service starting"
    );

    let config = Config::load()?;

    tracing::info!(
        http_port = config.server.http_port,
        access_ttl_minutes = config.auth.access_ttl_minutes,
        refresh_ttl_hours = config.auth.refresh_ttl_hours,
        "Configuration loaded"
    );

    let pg_pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&config.database.url)
        .await?;
    tracing::info!(
        max_connections = 5,
        database = "postgresql",
        "Database connection pool created"
    );

    sqlx::migrate!("./migrations").run(&pg_pool).await?;
    tracing::info!(database = "postgresql", "Database migrations completed");

    let authenticator = Arc::new(Authenticator::with_ttls(
        config.auth.secret.as_bytes(),
        Duration::minutes(config.auth.access_ttl_minutes),
        Duration::hours(config.auth.refresh_ttl_hours),
    ));
    let user_repository = Arc::new(PostgresUserRepository::new(pg_pool.clone()));
    let login_attempt_repository = Arc::new(PostgresLoginAttemptRepository::new(pg_pool));
    let event_bus = Arc::new(BroadcastEventBus::new());

    let credential_service = Arc::new(CredentialService::new(
        user_repository,
        login_attempt_repository,
        event_bus,
    ));

    let http_address = format!("0.0.0.0:{}", config.server.http_port);
    let http_listener = tokio::net::TcpListener::bind(&http_address).await?;
    tracing::info!(
        address = %http_address,
        port = config.server.http_port,
        protocol = "http",
        "Http server listening"
    );

    let http_application = create_router(credential_service, authenticator);
    axum::serve(http_listener, http_application).await?;

    Ok(())
}
