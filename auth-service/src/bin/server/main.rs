use std::sync::Arc;

use auth::Authenticator;
use auth::PasswordHasher;
use auth_service::config::Config;
use auth_service::identity::service::IdentityService;
use auth_service::inbound::http::router::create_router;
use auth_service::repositories::PostgresCredentialStore;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "auth_service=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        service = "auth-service",
        version = env!("CARGO_PKG_VERSION"),
        "Service starting"
    );

    let config = Config::load().map_err(|e| {
        tracing::error!(error = %e, "Configuration rejected");
        e
    })?;

    let token_policy = config.jwt.token_policy();
    let hash_scheme = config.password.hash_scheme();

    tracing::info!(
        http_port = config.server.http_port,
        max_connections = config.database.max_connections,
        issuer = %token_policy.issuer,
        audience = %token_policy.audience,
        expiration_minutes = config.jwt.expiration_minutes,
        password_scheme = ?hash_scheme,
        "Configuration loaded"
    );

    let pg_pool = PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .connect(&config.database.url)
        .await?;
    tracing::info!(
        max_connections = config.database.max_connections,
        database = "postgresql",
        "Database connection pool created"
    );

    sqlx::migrate!("./migrations").run(&pg_pool).await?;
    tracing::info!(database = "postgresql", "Database migrations completed");

    let authenticator = Arc::new(Authenticator::new(
        &config.jwt.secret,
        token_policy,
        PasswordHasher::with_scheme(hash_scheme),
    )?);
    let credential_store = Arc::new(PostgresCredentialStore::new(pg_pool));

    let identity_service = Arc::new(IdentityService::new(credential_store, authenticator));

    let http_address = format!("0.0.0.0:{}", config.server.http_port);
    let http_listener = tokio::net::TcpListener::bind(&http_address).await?;
    tracing::info!(
        address = %http_address,
        port = config.server.http_port,
        protocol = "http",
        "Http server listening"
    );

    let http_application = create_router(identity_service);

    if let Err(e) = axum::serve(http_listener, http_application).await {
        tracing::error!(error = %e, "Server error");
        return Err(e.into());
    }

    tracing::info!("Server exited successfully");

    Ok(())
}
