use crate::config::AppConfig;
use crate::db::{init_db, Database};
use crate::narrative::OpenAiNarrator;
use crate::report::{Collaborators, HtmlReportAssembler};
use crate::router::{handle, AppState};
use crate::sources::ZillowClient;
use astra::Server;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

mod config;
mod db;
mod domain;
mod errors;
mod narrative;
mod report;
mod responses;
mod router;
mod sources;
mod spreadsheets;
mod templates;
mod tokens;
mod valuation;

#[cfg(test)]
mod tests;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("comp_appraiser=info")),
        )
        .init();

    let config = AppConfig::from_env();

    let db = Database::new(config.database_path.clone());
    if let Err(e) = init_db(&db) {
        tracing::error!("Database initialization failed: {e}");
        std::process::exit(1);
    }

    if let Err(e) = std::fs::create_dir_all(&config.reports_dir) {
        tracing::error!(dir = %config.reports_dir.display(), "Cannot create reports directory: {e}");
        std::process::exit(1);
    }

    let zillow = match ZillowClient::new(config.zillow_api_key.clone()) {
        Ok(client) => Arc::new(client),
        Err(e) => {
            tracing::error!("Listing client setup failed: {e}");
            std::process::exit(1);
        }
    };
    let narrator = match OpenAiNarrator::new(
        config.openai_api_key.clone(),
        config.openai_model.clone(),
        config.openai_reasoning_model.clone(),
    ) {
        Ok(n) => Arc::new(n),
        Err(e) => {
            tracing::error!("Narrative client setup failed: {e}");
            std::process::exit(1);
        }
    };

    if config.zillow_api_key.is_none() {
        tracing::warn!("ZILLOW_KEY is not set; lookups and searches will fail");
    }
    if config.openai_api_key.is_none() {
        tracing::warn!("OPENAI_API_KEY is not set; narrative text will use placeholders");
    }

    let state = AppState {
        db,
        collab: Collaborators {
            lookup: zillow.clone(),
            search: zillow.clone(),
            tax: zillow,
            narrative: narrator,
        },
        assembler: Arc::new(HtmlReportAssembler),
        reports_dir: config.reports_dir.clone(),
        base_url: config.base_url.clone(),
        radius_miles: config.search_radius_miles,
    };

    tracing::info!("Starting server at http://{}", config.bind_addr);

    let server = Server::bind(&config.bind_addr).max_workers(config.max_workers);
    let result = server.serve(move |req, _info| handle(req, &state));

    if let Err(e) = result {
        tracing::error!("Server ended with error: {e}");
    }

    tracing::info!("Server shut down cleanly.");
}
