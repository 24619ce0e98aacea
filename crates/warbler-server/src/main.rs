use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use axum_extra::extract::cookie::Key;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use warbler_api::{AppState, AppStateInner};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    // Init logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warbler=debug,tower_http=debug".into()),
        )
        .init();

    // Config
    let db_path = std::env::var("WARBLER_DB_PATH").unwrap_or_else(|_| "warbler.db".into());
    let host = std::env::var("WARBLER_HOST").unwrap_or_else(|_| "0.0.0.0".into());
    let port: u16 = std::env::var("WARBLER_PORT")
        .unwrap_or_else(|_| "3000".into())
        .parse()?;

    // Session signing key; Key::from wants at least 64 bytes of material.
    let key = match std::env::var("WARBLER_SECRET_KEY") {
        Ok(secret) if secret.len() >= 64 => Key::from(secret.as_bytes()),
        Ok(_) => anyhow::bail!("WARBLER_SECRET_KEY must be at least 64 bytes"),
        Err(_) => {
            warn!("WARBLER_SECRET_KEY not set; sessions will not survive a restart");
            Key::generate()
        }
    };

    // Init database
    let db = warbler_db::Database::open(&PathBuf::from(&db_path))?;

    let state = AppState(Arc::new(AppStateInner { db, key }));

    let app = warbler_api::router(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http());

    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;
    info!("Warbler listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
