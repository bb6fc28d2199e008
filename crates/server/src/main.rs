use std::sync::Arc;

use anyhow::Context;
use metamoviex_metadata::tmdb::{Credential, TmdbClient};
use metamoviex_server::config::Config;
use metamoviex_server::state::AppState;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = Config::from_env().context("failed to load configuration")?;
    info!(
        bind = %config.bind,
        production = config.production,
        "configuration loaded"
    );

    let mut tmdb = TmdbClient::new(Credential::Bearer(config.access_token.clone()));
    if let Some(base) = &config.api_base {
        info!(api_base = %base, "using custom TMDB API root");
        tmdb = tmdb.with_base_url(base.clone());
    }

    let bind_addr = config.bind.clone();
    let app = metamoviex_server::routes::build_router(AppState::new(Arc::new(tmdb), config));

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .context("failed to bind")?;
    info!(addr = %bind_addr, "server listening");

    axum::serve(listener, app).await?;
    Ok(())
}
