//! Confidence Scorer: turns extracted skills into normalized strength scores.
//!
//! Algorithm, per skill:
//! 1. Find every case-insensitive occurrence in the raw text (overlapping).
//!    Zero occurrences → the skill is dropped.
//! 2. Per occurrence: `count × 0.1 × section_weight + action_bonus`, where the
//!    section weight comes from a ±200-char window (experience/work 3.0,
//!    project 2.0, otherwise 1.0) and the bonus is 0.2 when an action verb
//!    sits within ±50 chars.
//! 3. Raw score = sum over occurrences; every score is divided by the run's
//!    maximum and clamped to 1.0.
//!
//! Output is sorted by confidence descending; ties keep input order.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::models::skill::{Confidence, SkillMention, SkillName};

/// Tunables for the scorer. Defaults reproduce the documented algorithm.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoringWeights {
    pub per_occurrence: f64,
    pub experience_weight: f64,
    pub project_weight: f64,
    pub default_weight: f64,
    pub action_bonus: f64,
    pub section_window: usize,
    pub verb_window: usize,
    pub max_evidence: usize,
    pub evidence_window: usize,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            per_occurrence: 0.1,
            experience_weight: 3.0,
            project_weight: 2.0,
            default_weight: 1.0,
            action_bonus: 0.2,
            section_window: 200,
            verb_window: 50,
            max_evidence: 3,
            evidence_window: 40,
        }
    }
}

pub const ACTION_VERBS: &[&str] = &[
    "built",
    "developed",
    "implemented",
    "designed",
    "created",
    "architected",
];

static EXPERIENCE_MARKER: Lazy<Regex> =
    Lazy::new(|| section_marker(&["experience", "work"]));
static PROJECT_MARKER: Lazy<Regex> = Lazy::new(|| section_marker(&["project"]));

/// `\bmarker\b` or `marker\s*:` for each marker, case-insensitive.
fn section_marker(markers: &[&str]) -> Regex {
    let alternatives: Vec<String> = markers
        .iter()
        .map(|m| format!(r"\b{m}\b|{m}\s*:"))
        .collect();
    Regex::new(&format!("(?i){}", alternatives.join("|"))).expect("section marker pattern is valid")
}

/// Scores `skills` against `raw_text`. Deterministic for identical input.
pub fn score_skills(
    skills: &[SkillName],
    raw_text: &str,
    weights: &ScoringWeights,
) -> Vec<SkillMention> {
    let text_lower = raw_text.to_lowercase();
    // Evidence is cut from the original text only when lowercasing kept byte offsets.
    let evidence_text = if text_lower.len() == raw_text.len() {
        raw_text
    } else {
        text_lower.as_str()
    };

    let mut raw_scores: Vec<(&SkillName, f64, Vec<String>)> = Vec::new();
    for skill in skills {
        let key = skill.key();
        let positions = find_all(&text_lower, &key);
        if positions.is_empty() {
            continue;
        }

        let base = positions.len() as f64 * weights.per_occurrence;
        let score: f64 = positions
            .iter()
            .map(|&pos| {
                let section = section_weight(&text_lower, pos, weights);
                let bonus = if has_action_verb_nearby(&text_lower, pos, weights) {
                    weights.action_bonus
                } else {
                    0.0
                };
                base * section + bonus
            })
            .sum();

        let evidence = positions
            .iter()
            .take(weights.max_evidence)
            .map(|&pos| snippet(evidence_text, pos, key.len(), weights.evidence_window))
            .collect();

        raw_scores.push((skill, score, evidence));
    }

    let max_score = raw_scores.iter().map(|(_, s, _)| *s).fold(0.0_f64, f64::max);
    let denominator = if max_score > 0.0 { max_score } else { 1.0 };

    let mut mentions: Vec<SkillMention> = raw_scores
        .into_iter()
        .map(|(skill, score, evidence)| {
            SkillMention::new(skill.clone(), Confidence::clamped((score / denominator).min(1.0)))
                .with_evidence(evidence)
        })
        .collect();

    // sort_by is stable: equal confidences keep input order
    mentions.sort_by(|a, b| {
        b.confidence
            .partial_cmp(&a.confidence)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    mentions
}

/// Byte offsets of every (possibly overlapping) occurrence of `needle`.
fn find_all(haystack: &str, needle: &str) -> Vec<usize> {
    let mut positions = Vec::new();
    if needle.is_empty() {
        return positions;
    }
    let mut start = 0;
    while let Some(found) = haystack[start..].find(needle) {
        let pos = start + found;
        positions.push(pos);
        start = pos + next_char_len(haystack, pos);
    }
    positions
}

fn next_char_len(s: &str, pos: usize) -> usize {
    s[pos..].chars().next().map_or(1, char::len_utf8)
}

/// `text[pos - before .. pos + after]`, widened outward to char boundaries.
fn window(text: &str, pos: usize, before: usize, after: usize) -> &str {
    let mut start = pos.saturating_sub(before);
    while !text.is_char_boundary(start) {
        start -= 1;
    }
    let mut end = (pos + after).min(text.len());
    while !text.is_char_boundary(end) {
        end += 1;
    }
    &text[start..end]
}

fn section_weight(text: &str, pos: usize, weights: &ScoringWeights) -> f64 {
    let context = window(text, pos, weights.section_window, weights.section_window);
    if EXPERIENCE_MARKER.is_match(context) {
        weights.experience_weight
    } else if PROJECT_MARKER.is_match(context) {
        weights.project_weight
    } else {
        weights.default_weight
    }
}

fn has_action_verb_nearby(text: &str, pos: usize, weights: &ScoringWeights) -> bool {
    let context = window(text, pos, weights.verb_window, weights.verb_window);
    ACTION_VERBS.iter().any(|verb| context.contains(verb))
}

fn snippet(text: &str, pos: usize, len: usize, radius: usize) -> String {
    window(text, pos, radius, len + radius)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}
