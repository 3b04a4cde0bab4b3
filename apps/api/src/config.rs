use std::path::PathBuf;

use anyhow::{bail, Context, Result};

use crate::analysis::gap::GapThresholds;
use crate::analysis::roadmap::RoadmapThresholds;

/// Application configuration loaded from environment variables.
/// Every variable has a default; malformed values fail startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    pub data_dir: PathBuf,
    pub ontology_file: String,
    pub roles_file: String,
    pub courses_file: String,
    pub default_role: String,
    pub roadmap_thresholds: RoadmapThresholds,
    pub gap_thresholds: GapThresholds,
    pub enable_nlp: bool,
    pub keyword_top_n: usize,
    pub courses_per_skill: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 8080,
            rust_log: "info".to_string(),
            data_dir: PathBuf::from("data"),
            ontology_file: "ontology.json".to_string(),
            roles_file: "roles.json".to_string(),
            courses_file: "courses.json".to_string(),
            default_role: "software engineer".to_string(),
            roadmap_thresholds: RoadmapThresholds::default(),
            gap_thresholds: GapThresholds::default(),
            enable_nlp: true,
            keyword_top_n: 30,
            courses_per_skill: 2,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary variable source.
    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = Config::default();

        let config = Config {
            port: parse_or(&lookup, "PORT", defaults.port)?,
            rust_log: lookup("RUST_LOG").unwrap_or(defaults.rust_log),
            data_dir: lookup("DATA_DIR").map(PathBuf::from).unwrap_or(defaults.data_dir),
            ontology_file: lookup("ONTOLOGY_FILE").unwrap_or(defaults.ontology_file),
            roles_file: lookup("ROLES_FILE").unwrap_or(defaults.roles_file),
            courses_file: lookup("COURSES_FILE").unwrap_or(defaults.courses_file),
            default_role: lookup("DEFAULT_ROLE").unwrap_or(defaults.default_role),
            roadmap_thresholds: RoadmapThresholds {
                known: parse_or(&lookup, "KNOWN_THRESHOLD", defaults.roadmap_thresholds.known)?,
                mastered: parse_or(
                    &lookup,
                    "MASTERED_THRESHOLD",
                    defaults.roadmap_thresholds.mastered,
                )?,
            },
            gap_thresholds: GapThresholds {
                adequate: parse_or(&lookup, "GAP_THRESHOLD", defaults.gap_thresholds.adequate)?,
            },
            enable_nlp: parse_or(&lookup, "ENABLE_NLP", defaults.enable_nlp)?,
            keyword_top_n: parse_or(&lookup, "KEYWORD_TOP_N", defaults.keyword_top_n)?,
            courses_per_skill: parse_or(&lookup, "COURSES_PER_SKILL", defaults.courses_per_skill)?,
        };

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        let RoadmapThresholds { known, mastered } = self.roadmap_thresholds;
        for (name, value) in [
            ("KNOWN_THRESHOLD", known),
            ("MASTERED_THRESHOLD", mastered),
            ("GAP_THRESHOLD", self.gap_thresholds.adequate),
        ] {
            if !(0.0..=1.0).contains(&value) {
                bail!("{name} must be within [0, 1], got {value}");
            }
        }
        if known > mastered {
            bail!("KNOWN_THRESHOLD ({known}) must not exceed MASTERED_THRESHOLD ({mastered})");
        }
        Ok(())
    }

    pub fn ontology_path(&self) -> PathBuf {
        self.data_dir.join(&self.ontology_file)
    }

    pub fn roles_path(&self) -> PathBuf {
        self.data_dir.join(&self.roles_file)
    }

    pub fn courses_path(&self) -> PathBuf {
        self.data_dir.join(&self.courses_file)
    }
}

fn parse_or<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("{key} has an invalid value '{raw}'")),
        None => Ok(default),
    }
}
