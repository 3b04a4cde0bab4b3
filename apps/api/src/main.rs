mod analysis;
mod catalog;
mod config;
mod errors;
mod models;
mod routes;
mod state;
mod text_source;

use anyhow::Result;
use std::net::SocketAddr;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use std::sync::Arc;

use crate::analysis::nlp::NlpServices;
use crate::catalog::{Catalog, RoleTaxonomyProvider};
use crate::config::Config;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on malformed or out-of-range values)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting SkillMap API v{}", env!("CARGO_PKG_VERSION"));

    // Load ontology, role taxonomy and course catalog
    let catalog = Catalog::load(
        &config.ontology_path(),
        &config.roles_path(),
        &config.courses_path(),
    )?;
    if catalog.taxonomy().is_empty() {
        anyhow::bail!("Role taxonomy '{}' has no usable records", config.roles_path().display());
    }

    // NLP collaborators are built lazily on first extraction
    let nlp = if config.enable_nlp {
        NlpServices::new(true, config.keyword_top_n)
    } else {
        NlpServices::disabled()
    };
    info!(
        "NLP collaborators {} (keyword top-n: {})",
        if config.enable_nlp { "enabled" } else { "disabled" },
        config.keyword_top_n
    );
    info!(
        "Thresholds: roadmap known={} mastered={}, gap adequate={}",
        config.roadmap_thresholds.known,
        config.roadmap_thresholds.mastered,
        config.gap_thresholds.adequate
    );

    // Build app state
    let state = AppState {
        config: config.clone(),
        catalog: Arc::new(catalog),
        nlp: Arc::new(nlp),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict origins once the frontend host is fixed

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
