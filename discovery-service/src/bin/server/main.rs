use std::sync::Arc;

use auth::Authenticator;
use chrono::Duration;
use discovery_service::config::Config;
use discovery_service::contact::ports::ContactNotifier;
use discovery_service::contact::service::ContactService;
use discovery_service::discovery::service::DiscoveryService;
use discovery_service::inbound::http::router::create_router;
use discovery_service::inbound::http::router::AppState;
use discovery_service::outbound::notifier::DisabledContactNotifier;
use discovery_service::outbound::notifier::SmtpContactNotifier;
use discovery_service::outbound::repositories::PostgresContactRepository;
use discovery_service::outbound::repositories::PostgresDiscoveryRepository;
use discovery_service::outbound::repositories::PostgresUserRepository;
use discovery_service::user::service::UserService;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "discovery_service=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        service = "discovery-service",
        version = env!("CARGO_PKG_VERSION"),
        "Service starting"
    );

    let config = Config::load()?;

    tracing::info!(
        http_port = config.server.http_port,
        token_ttl_hours = config.auth.token_ttl_hours,
        hash_cost = config.auth.hash_cost,
        smtp_configured = config.smtp.is_some(),
        "Configuration loaded"
    );

    // an empty signing secret aborts here; the server never serves requests
    // in an unsigned configuration
    let authenticator = Arc::new(Authenticator::new(
        config.auth.secret.as_bytes(),
        config.auth.hash_cost,
        Duration::hours(config.auth.token_ttl_hours),
    )?);

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

    let user_repository = Arc::new(PostgresUserRepository::new(pg_pool.clone()));
    let discovery_repository = Arc::new(PostgresDiscoveryRepository::new(pg_pool.clone()));
    let contact_repository = Arc::new(PostgresContactRepository::new(pg_pool));

    let notifier: Arc<dyn ContactNotifier> = match &config.smtp {
        Some(smtp) => Arc::new(SmtpContactNotifier::new(smtp)?),
        None => Arc::new(DisabledContactNotifier),
    };

    let state = AppState {
        user_service: Arc::new(UserService::new(
            Arc::clone(&user_repository),
            Arc::clone(&authenticator),
        )),
        discovery_service: Arc::new(DiscoveryService::new(
            discovery_repository,
            user_repository,
        )),
        contact_service: Arc::new(ContactService::new(contact_repository, notifier)),
        authenticator,
    };

    let http_address = format!("0.0.0.0:{}", config.server.http_port);
    let http_listener = tokio::net::TcpListener::bind(&http_address).await?;
    tracing::info!(
        address = %http_address,
        port = config.server.http_port,
        protocol = "http",
        "Http server listening"
    );

    axum::serve(http_listener, create_router(state)).await?;

    Ok(())
}
