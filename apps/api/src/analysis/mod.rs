// Résumé analysis core
// Implements: skill extraction, confidence scoring, role matching, roadmap, gap/readiness.
// Everything except handlers is synchronous and free of I/O.

pub mod extractor;
pub mod gap;
pub mod handlers;
pub mod lookup;
pub mod nlp;
pub mod pathway;
pub mod recommendations;
pub mod roadmap;
pub mod role_matcher;
pub mod scorer;
