use std::sync::Arc;

use crate::analysis::nlp::NlpServices;
use crate::catalog::Catalog;
use crate::config::Config;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Ontology, role taxonomy and course catalog; read-only after startup.
    pub catalog: Arc<Catalog>,
    /// Phrase/keyword extractors, built on first use and then reused.
    pub nlp: Arc<NlpServices>,
}
