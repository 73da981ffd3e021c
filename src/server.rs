//! HTTP server startup.
//!
//! [`serve`] opens the database, prepares the media folders, and runs the axum router
//! until ctrl-c.

use crate::api::{self, AppState};
use crate::config::LaneConfig;
use crate::db;
use anyhow::{Context, Result};

/// Open the database and media store described by `config` and build handler state.
pub fn setup_state(config: LaneConfig) -> Result<AppState> {
    let db_path = config.resolved_db_path();
    let conn = db::open_database(&db_path)?;
    tracing::info!(db = %db_path.display(), "database ready");

    let state = AppState::new(conn, config, Some(db_path));
    state
        .media()
        .ensure_dirs()
        .with_context(|| format!("failed to create media folders under {}", state.media().root().display()))?;
    tracing::info!(media = %state.media().root().display(), "media store ready");

    Ok(state)
}

/// Start the HTTP server.
pub async fn serve(config: LaneConfig) -> Result<()> {
    let bind_addr = config.bind_addr();
    let state = setup_state(config)?;
    let router = api::router(state);

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {bind_addr}"))?;
    tracing::info!(addr = %bind_addr, "Memory Lane listening at http://{bind_addr}{}", api::API_PREFIX);

    axum::serve(listener, router)
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "failed to listen for ctrl-c");
                std::future::pending::<()>().await;
            }
            tracing::info!("shutting down server");
        })
        .await?;

    Ok(())
}
