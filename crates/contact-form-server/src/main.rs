mod app;

use anyhow::Context;
use contact_form::config::DEFAULT_CONFIG_PATH;
use contact_form::{Config, DelayedSubmit, RestCountriesLookup};
use std::sync::Arc;
use tracing::{info, warn};

use crate::app::{router, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    if let Err(e) = dotenvy::dotenv() {
        if !e.not_found() {
            warn!("Failed to load .env: {}", e);
        }
    }

    let config_path =
        std::env::var("CONTACT_FORM_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
    let config = Config::load(&config_path).unwrap_or_else(|e| {
        warn!("Failed to load config: {:#}, using defaults", e);
        Config::default()
    });

    info!(
        "Country lookup: {} (timeout {}s), country required: {}",
        config.lookup.base_url, config.lookup.timeout_secs, config.form.require_country
    );

    let lookup = RestCountriesLookup::new(&config.lookup.base_url, config.lookup.timeout())?;
    let submit = DelayedSubmit::new(config.form.submit_delay());

    let state = AppState::new(
        config.form.schema(),
        Arc::new(lookup),
        config.lookup.max_suggestions,
        Arc::new(submit),
    );
    let app = router(state);

    let addr = config.server.addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("Server running at http://{}", addr);
    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
