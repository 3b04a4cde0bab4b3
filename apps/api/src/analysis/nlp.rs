//! Optional phrase/keyword collaborators that widen skill extraction.
//!
//! Both are plain traits so a heavier backend can be swapped in. The built-in
//! implementations are pure Rust: a stop-word chunker for noun-phrase-like
//! spans and a RAKE-style n-gram keyword ranker.
//!
//! `NlpServices` owns the instances. Each is constructed at most once per
//! process on first use (`OnceCell`); concurrent first use blocks on the one
//! initializer rather than double-constructing.

use std::collections::{HashMap, HashSet};

use anyhow::Result;
use once_cell::sync::{Lazy, OnceCell};
use tracing::info;

/// Yields noun-phrase-like strings from raw text.
pub trait PhraseExtractor: Send + Sync {
    fn phrases(&self, raw_text: &str) -> Result<Vec<String>>;
}

/// Yields `(phrase, weight)` pairs, strongest first, bounded by `options`.
pub trait KeywordExtractor: Send + Sync {
    fn keywords(&self, raw_text: &str, options: &KeywordOptions) -> Result<Vec<(String, f64)>>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeywordOptions {
    pub top_n: usize,
    /// Longest n-gram considered; spans are 1..=max_ngram words.
    pub max_ngram: usize,
}

impl Default for KeywordOptions {
    fn default() -> Self {
        Self {
            top_n: 30,
            max_ngram: 2,
        }
    }
}

/// Borrowed view of whichever collaborators are available for one extraction.
#[derive(Clone, Copy, Default)]
pub struct Collaborators<'a> {
    pub phrases: Option<&'a dyn PhraseExtractor>,
    pub keywords: Option<&'a dyn KeywordExtractor>,
    pub keyword_options: KeywordOptions,
}

impl Collaborators<'_> {
    pub fn none() -> Self {
        Self::default()
    }
}

/// Process-wide owner of the NLP collaborators.
pub struct NlpServices {
    enabled: bool,
    keyword_options: KeywordOptions,
    phrase: OnceCell<Box<dyn PhraseExtractor>>,
    keyword: OnceCell<Box<dyn KeywordExtractor>>,
}

impl NlpServices {
    pub fn new(enabled: bool, keyword_top_n: usize) -> Self {
        Self {
            enabled,
            keyword_options: KeywordOptions {
                top_n: keyword_top_n,
                ..KeywordOptions::default()
            },
            phrase: OnceCell::new(),
            keyword: OnceCell::new(),
        }
    }

    pub fn disabled() -> Self {
        Self::new(false, KeywordOptions::default().top_n)
    }

    pub fn collaborators(&self) -> Collaborators<'_> {
        if !self.enabled {
            return Collaborators::none();
        }
        let phrases = self.phrase.get_or_init(|| {
            info!("Initializing phrase extractor");
            Box::new(ChunkPhraseExtractor) as Box<dyn PhraseExtractor>
        });
        let keywords = self.keyword.get_or_init(|| {
            info!("Initializing keyword extractor");
            Box::new(RakeKeywordExtractor) as Box<dyn KeywordExtractor>
        });
        Collaborators {
            phrases: Some(phrases.as_ref()),
            keywords: Some(keywords.as_ref()),
            keyword_options: self.keyword_options,
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Built-in collaborators
// ────────────────────────────────────────────────────────────────────────────

static STOP_WORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "a", "about", "after", "all", "also", "an", "and", "any", "are", "as", "at", "be",
        "been", "being", "both", "but", "by", "can", "could", "did", "do", "does", "during",
        "each", "etc", "for", "from", "had", "has", "have", "he", "her", "his", "i", "in",
        "into", "is", "it", "its", "me", "more", "most", "my", "of", "on", "or", "other",
        "our", "over", "she", "so", "such", "than", "that", "the", "their", "them", "then",
        "there", "these", "they", "this", "those", "through", "to", "under", "up", "using",
        "used", "very", "via", "was", "we", "were", "what", "when", "where", "which", "while",
        "who", "will", "with", "within", "would", "you", "your",
        // résumé verbs and fillers break phrases too
        "built", "developed", "implemented", "designed", "created", "architected", "led",
        "managed", "worked", "working", "responsible", "experience", "experienced",
        "skilled", "proficient", "knowledge", "years", "including", "various",
    ]
    .into_iter()
    .collect()
});

/// Characters that terminate a phrase when they trail a token.
const BREAK_CHARS: &[char] = &[',', ';', ':', '.', '!', '?', ')', ']', '}', '|'];

/// Splits text into word runs delimited by punctuation and stop words.
fn candidate_runs(raw_text: &str) -> Vec<Vec<String>> {
    let mut runs = Vec::new();
    let mut current: Vec<String> = Vec::new();

    let mut flush = |current: &mut Vec<String>| {
        if !current.is_empty() {
            runs.push(std::mem::take(current));
        }
    };

    for token in raw_text.split_whitespace() {
        if token.starts_with(['(', '[', '{', '•', '-', '*']) {
            flush(&mut current);
        }
        let ends_phrase = token.ends_with(BREAK_CHARS);
        let word = token
            .trim_matches(|c: char| !c.is_alphanumeric() && !"+#.".contains(c))
            .trim_end_matches('.')
            .to_lowercase();

        if word.is_empty() || STOP_WORDS.contains(word.as_str()) {
            flush(&mut current);
        } else {
            current.push(word);
        }
        if ends_phrase {
            flush(&mut current);
        }
    }
    flush(&mut current);
    runs
}

/// Stop-word chunker: each maximal run of content words is one phrase.
pub struct ChunkPhraseExtractor;

impl PhraseExtractor for ChunkPhraseExtractor {
    fn phrases(&self, raw_text: &str) -> Result<Vec<String>> {
        Ok(candidate_runs(raw_text)
            .into_iter()
            .map(|run| run.join(" "))
            .collect())
    }
}

/// Tokens shorter than this never form keywords ("c", "r", stray initials).
const MIN_KEYWORD_TOKEN_CHARS: usize = 2;

/// RAKE-style ranker: every 1..=max_ngram window inside a content-word run is a
/// candidate, weighted by frequency × word count.
pub struct RakeKeywordExtractor;

impl KeywordExtractor for RakeKeywordExtractor {
    fn keywords(&self, raw_text: &str, options: &KeywordOptions) -> Result<Vec<(String, f64)>> {
        let max_ngram = options.max_ngram.max(1);
        let mut order: Vec<String> = Vec::new();
        let mut counts: HashMap<String, (usize, usize)> = HashMap::new();

        for run in candidate_runs(raw_text) {
            for n in 1..=max_ngram.min(run.len()) {
                for window in run.windows(n) {
                    if window.iter().any(|w| w.chars().count() < MIN_KEYWORD_TOKEN_CHARS) {
                        continue;
                    }
                    let phrase = window.join(" ");
                    let entry = counts.entry(phrase.clone()).or_insert_with(|| {
                        order.push(phrase);
                        (0, n)
                    });
                    entry.0 += 1;
                }
            }
        }

        let mut ranked: Vec<(String, f64)> = order
            .into_iter()
            .map(|phrase| {
                let (freq, n) = counts[&phrase];
                (phrase, (freq * n) as f64)
            })
            .collect();
        // stable: ties keep first appearance
        ranked.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        ranked.truncate(options.top_n);
        Ok(ranked)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phrases_split_on_stop_words_and_punctuation() {
        let phrases = ChunkPhraseExtractor
            .phrases("Built data pipelines with Apache Spark, and deployed on AWS.")
            .unwrap();
        assert_eq!(
            phrases,
            vec!["data pipelines", "apache spark", "deployed", "aws"]
        );
    }

    #[test]
    fn test_phrases_keep_dotted_and_symbol_tokens() {
        let phrases = ChunkPhraseExtractor.phrases("Node.js and C++ (embedded)").unwrap();
        assert_eq!(phrases, vec!["node.js", "c++", "embedded"]);
    }

    #[test]
    fn test_keywords_respect_top_n_and_ngram_span() {
        let options = KeywordOptions {
            top_n: 3,
            max_ngram: 2,
        };
        let keywords = RakeKeywordExtractor
            .keywords(
                "machine learning pipelines; machine learning models; statistics",
                &options,
            )
            .unwrap();
        assert_eq!(keywords.len(), 3);
        assert_eq!(keywords[0].0, "machine learning", "bigram seen twice ranks first");
        assert!(keywords.iter().all(|(k, _)| k.split(' ').count() <= 2));
    }

    #[test]
    fn test_keywords_skip_single_character_tokens() {
        let keywords = RakeKeywordExtractor
            .keywords("Languages: C, R; c sharp", &KeywordOptions::default())
            .unwrap();
        let phrases: Vec<&str> = keywords.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(phrases, vec!["languages", "sharp"]);
    }

    #[test]
    fn test_disabled_services_expose_nothing() {
        let services = NlpServices::disabled();
        let collab = services.collaborators();
        assert!(collab.phrases.is_none());
        assert!(collab.keywords.is_none());
    }

    #[test]
    fn test_enabled_services_initialize_once() {
        let services = NlpServices::new(true, 10);
        let first = services.collaborators().phrases.unwrap() as *const dyn PhraseExtractor;
        let second = services.collaborators().phrases.unwrap() as *const dyn PhraseExtractor;
        assert!(std::ptr::addr_eq(first, second), "same instance reused");
        assert_eq!(services.collaborators().keyword_options.top_n, 10);
    }

    #[test]
    fn test_concurrent_first_use_shares_one_instance() {
        let services = NlpServices::new(true, 10);
        let addresses: Vec<(usize, usize)> = std::thread::scope(|scope| {
            let handles: Vec<_> = (0..8)
                .map(|_| {
                    scope.spawn(|| {
                        let collab = services.collaborators();
                        let phrases = collab.phrases.unwrap() as *const dyn PhraseExtractor;
                        let keywords = collab.keywords.unwrap() as *const dyn KeywordExtractor;
                        (phrases as *const () as usize, keywords as *const () as usize)
                    })
                })
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });

        assert!(
            addresses.windows(2).all(|pair| pair[0] == pair[1]),
            "every thread sees the same extractors: {addresses:?}"
        );
    }
}
