mod config;
mod db;
mod routes;
mod services;
mod state;

use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    // .env is optional; real environment variables win.
    if let Err(e) = dotenvy::dotenv() {
        if !e.not_found() {
            eprintln!("failed to read .env: {e}");
        }
    }

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("server=info,tower_http=info")),
        )
        .init();

    let config = config::ServerConfig::from_env().expect("invalid configuration");

    let state = match config.database_url.as_deref() {
        Some(url) => {
            let pool = db::init_pool(url, config.db_max_connections)
                .await
                .expect("database init failed");
            tracing::info!(max_connections = config.db_max_connections, "using postgres store");
            state::AppState::postgres(pool)
        }
        None => {
            tracing::warn!("DATABASE_URL not set; notes and users are kept in memory only");
            state::AppState::in_memory()
        }
    };

    let app = routes::app(state, config.body_limit_bytes);
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", config.port))
        .await
        .expect("failed to bind");

    tracing::info!(port = config.port, body_limit = config.body_limit_bytes, "notebook server listening");
    axum::serve(listener, app).await.expect("server failed");
}
