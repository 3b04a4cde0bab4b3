//! Shared case-insensitive skill lookup.
//!
//! The role matcher, gap analyzer, roadmap builder, pathway tree and course
//! catalog all resolve skill names through this one table so that "exact" and
//! "contains" mean the same thing everywhere.

use crate::models::skill::{Confidence, SkillMention};

/// How a lookup key is compared against stored keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchMode {
    /// Case-insensitive equality only.
    Exact,
    /// Equality first, then the first stored key (insertion order) that
    /// contains the lookup key or is contained in it.
    Contains,
}

/// True when either lowercase string contains the other.
pub fn contains_either(a: &str, b: &str) -> bool {
    a.contains(b) || b.contains(a)
}

/// Insertion-ordered table keyed by lowercased skill name.
#[derive(Debug, Clone)]
pub struct SkillLookup<V> {
    entries: Vec<(String, V)>,
}

impl<V> Default for SkillLookup<V> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<V> SkillLookup<V> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts `value` under the lowercased `key`; if the key already exists
    /// `merge` decides what the stored value becomes.
    pub fn insert_with(&mut self, key: &str, value: V, merge: impl FnOnce(&mut V, V)) {
        let key = key.trim().to_lowercase();
        if key.is_empty() {
            return;
        }
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, existing)) => merge(existing, value),
            None => self.entries.push((key, value)),
        }
    }

    pub fn find(&self, key: &str, mode: MatchMode) -> Option<&V> {
        let key = key.trim().to_lowercase();
        if key.is_empty() {
            return None;
        }
        if let Some((_, v)) = self.entries.iter().find(|(k, _)| *k == key) {
            return Some(v);
        }
        match mode {
            MatchMode::Exact => None,
            MatchMode::Contains => self
                .entries
                .iter()
                .find(|(k, _)| contains_either(k, &key))
                .map(|(_, v)| v),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl SkillLookup<Confidence> {
    /// Builds a confidence table from mentions; duplicate names keep the maximum.
    pub fn from_mentions(mentions: &[SkillMention]) -> Self {
        let mut lookup = Self::new();
        for mention in mentions {
            lookup.insert_with(mention.name.as_str(), mention.confidence, |stored, new| {
                if new > *stored {
                    *stored = new;
                }
            });
        }
        lookup
    }

    pub fn confidence(&self, key: &str, mode: MatchMode) -> Option<Confidence> {
        self.find(key, mode).copied()
    }

    /// Present under `mode` with confidence at or above `threshold`.
    pub fn meets(&self, key: &str, mode: MatchMode, threshold: f64) -> bool {
        self.confidence(key, mode)
            .is_some_and(|c| c.value() >= threshold)
    }
}

impl<'m> SkillLookup<&'m SkillMention> {
    /// Indexes mentions by name; duplicate names keep the most confident mention.
    pub fn best_mentions(mentions: &'m [SkillMention]) -> Self {
        let mut lookup = Self::new();
        for mention in mentions {
            lookup.insert_with(mention.name.as_str(), mention, |stored, new| {
                if new.confidence > stored.confidence {
                    *stored = new;
                }
            });
        }
        lookup
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::skill::SkillName;

    fn mention(name: &str, confidence: f64) -> SkillMention {
        SkillMention::new(
            SkillName::new(name).unwrap(),
            Confidence::new(confidence).unwrap(),
        )
    }

    #[test]
    fn test_exact_is_case_insensitive() {
        let lookup = SkillLookup::from_mentions(&[mention("Python", 0.8)]);
        assert_eq!(lookup.confidence("PYTHON", MatchMode::Exact).unwrap().value(), 0.8);
    }

    #[test]
    fn test_exact_does_not_fall_back_to_contains() {
        let lookup = SkillLookup::from_mentions(&[mention("python programming", 0.8)]);
        assert!(lookup.confidence("python", MatchMode::Exact).is_none());
        assert!(lookup.confidence("python", MatchMode::Contains).is_some());
    }

    #[test]
    fn test_contains_matches_either_direction() {
        let lookup = SkillLookup::from_mentions(&[mention("sql", 0.7)]);
        assert_eq!(
            lookup.confidence("PostgreSQL", MatchMode::Contains).unwrap().value(),
            0.7,
            "stored key contained in lookup key"
        );

        let lookup = SkillLookup::from_mentions(&[mention("machine learning", 0.9)]);
        assert!(lookup.confidence("learning", MatchMode::Contains).is_some());
    }

    #[test]
    fn test_exact_hit_beats_earlier_contains_hit() {
        let lookup =
            SkillLookup::from_mentions(&[mention("javascript", 0.2), mention("java", 0.9)]);
        assert_eq!(lookup.confidence("java", MatchMode::Contains).unwrap().value(), 0.9);
    }

    #[test]
    fn test_duplicates_keep_max_confidence() {
        let lookup = SkillLookup::from_mentions(&[
            mention("sql", 0.4),
            mention("SQL", 0.9),
            mention("sql", 0.1),
        ]);
        assert_eq!(lookup.len(), 1);
        assert_eq!(lookup.confidence("sql", MatchMode::Exact).unwrap().value(), 0.9);
    }

    #[test]
    fn test_meets_threshold() {
        let lookup = SkillLookup::from_mentions(&[mention("rust", 0.5)]);
        assert!(lookup.meets("rust", MatchMode::Exact, 0.5));
        assert!(!lookup.meets("rust", MatchMode::Exact, 0.51));
        assert!(!lookup.meets("go", MatchMode::Exact, 0.0));
    }

    #[test]
    fn test_blank_key_never_matches() {
        let lookup = SkillLookup::from_mentions(&[mention("rust", 0.5)]);
        assert!(lookup.find("  ", MatchMode::Contains).is_none());
    }
}
