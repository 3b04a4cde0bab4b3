//! Skill Extractor: finds ontology skills mentioned in résumé text.
//!
//! Exact substring and word-fallback matching always run. Phrase and keyword
//! collaborators, when present, widen the result with a bidirectional
//! substring rule. A failing collaborator is logged and skipped; extraction
//! itself never fails.

use std::collections::HashSet;

use tracing::{debug, warn};

use crate::analysis::lookup::contains_either;
use crate::analysis::nlp::Collaborators;
use crate::models::skill::SkillName;
use crate::text_source::TextSource;

/// Phrases shorter or longer than this (in characters, exclusive) are not skill-like.
const MIN_PHRASE_LEN: usize = 2;
const MAX_PHRASE_LEN: usize = 50;

/// Returns the ontology skills found in `source`, deduplicated, in ontology order.
pub fn extract_skills(
    source: &TextSource,
    ontology: &[SkillName],
    collaborators: Collaborators<'_>,
) -> Vec<SkillName> {
    let keys: Vec<String> = ontology.iter().map(SkillName::key).collect();
    let mut found: HashSet<usize> = HashSet::new();

    for (idx, key) in keys.iter().enumerate() {
        if matches_text(key, &source.normalized_text) {
            found.insert(idx);
        }
    }
    let direct = found.len();

    if let Some(extractor) = collaborators.phrases {
        match extractor.phrases(&source.raw_text) {
            Ok(phrases) => {
                for phrase in phrases {
                    let phrase = phrase.trim().to_lowercase();
                    let len = phrase.chars().count();
                    if len > MIN_PHRASE_LEN && len < MAX_PHRASE_LEN {
                        add_overlapping(&keys, &phrase, &mut found);
                    }
                }
            }
            Err(e) => warn!("Phrase extractor failed, continuing without it: {e}"),
        }
    }

    if let Some(extractor) = collaborators.keywords {
        match extractor.keywords(&source.raw_text, &collaborators.keyword_options) {
            Ok(keywords) => {
                for (keyword, _) in keywords {
                    let keyword = keyword.trim().to_lowercase();
                    if !keyword.is_empty() {
                        add_overlapping(&keys, &keyword, &mut found);
                    }
                }
            }
            Err(e) => warn!("Keyword extractor failed, continuing without it: {e}"),
        }
    }

    debug!(
        "Extracted {} skills ({} direct, {} via collaborators)",
        found.len(),
        direct,
        found.len() - direct
    );

    let mut indices: Vec<usize> = found.into_iter().collect();
    indices.sort_unstable();
    indices.into_iter().map(|i| ontology[i].clone()).collect()
}

/// Contiguous substring, or for multi-word skills every word present anywhere.
fn matches_text(skill_key: &str, normalized_text: &str) -> bool {
    if normalized_text.contains(skill_key) {
        return true;
    }
    let words: Vec<&str> = skill_key.split_whitespace().collect();
    words.len() > 1 && words.iter().all(|w| normalized_text.contains(w))
}

fn add_overlapping(keys: &[String], candidate: &str, found: &mut HashSet<usize>) {
    for (idx, key) in keys.iter().enumerate() {
        if contains_either(key, candidate) {
            found.insert(idx);
        }
    }
}
