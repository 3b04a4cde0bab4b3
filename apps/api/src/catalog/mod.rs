//! External data the analysis core consumes: the skill ontology, the role
//! taxonomy and the course catalog.
//!
//! The core only sees the provider traits. `Catalog` is the JSON-file-backed
//! implementation loaded once at startup and shared read-only via `AppState`.

pub mod loader;

use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

use crate::analysis::lookup::{MatchMode, SkillLookup};
use crate::models::course::Course;
use crate::models::role::RoleTaxonomy;
use crate::models::skill::SkillName;

/// Canonical skill vocabulary, case-insensitively unique, in provider order.
pub trait OntologyProvider: Send + Sync {
    fn skills(&self) -> &[SkillName];
}

/// Per-role, per-phase required-skill lists.
pub trait RoleTaxonomyProvider: Send + Sync {
    fn taxonomy(&self) -> &RoleTaxonomy;
}

/// Course records for a skill (case-insensitive, fuzzy substring match allowed).
pub trait CourseCatalog: Send + Sync {
    fn courses_for(&self, skill: &str, limit: usize) -> Vec<Course>;
}

#[derive(Debug)]
pub struct Catalog {
    ontology: Vec<SkillName>,
    taxonomy: RoleTaxonomy,
    courses: SkillLookup<Vec<Course>>,
}

impl Catalog {
    pub fn new(
        ontology: Vec<SkillName>,
        taxonomy: RoleTaxonomy,
        courses: SkillLookup<Vec<Course>>,
    ) -> Self {
        Self {
            ontology,
            taxonomy,
            courses,
        }
    }

    /// Loads all three catalogs from JSON files.
    pub fn load(ontology_path: &Path, roles_path: &Path, courses_path: &Path) -> Result<Self> {
        let ontology = read_json(ontology_path)?;
        let roles = read_json(roles_path)?;
        let courses = read_json(courses_path)?;

        let catalog = Self::from_values(&ontology, &roles, &courses)?;
        info!(
            "Catalog loaded: {} skills, {} roles, {} course keys",
            catalog.ontology.len(),
            catalog.taxonomy.roles().len(),
            catalog.courses.len()
        );
        Ok(catalog)
    }

    pub fn from_values(
        ontology: &serde_json::Value,
        roles: &serde_json::Value,
        courses: &serde_json::Value,
    ) -> Result<Self> {
        Ok(Self::new(
            loader::parse_ontology(ontology)?,
            RoleTaxonomy::from_requirements(loader::parse_requirements(roles)?),
            loader::parse_courses(courses)?,
        ))
    }
}

impl OntologyProvider for Catalog {
    fn skills(&self) -> &[SkillName] {
        &self.ontology
    }
}

impl RoleTaxonomyProvider for Catalog {
    fn taxonomy(&self) -> &RoleTaxonomy {
        &self.taxonomy
    }
}

impl CourseCatalog for Catalog {
    fn courses_for(&self, skill: &str, limit: usize) -> Vec<Course> {
        self.courses
            .find(skill, MatchMode::Contains)
            .map(|list| list.iter().take(limit).cloned().collect())
            .unwrap_or_default()
    }
}

fn read_json(path: &Path) -> Result<serde_json::Value> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read catalog file '{}'", path.display()))?;
    serde_json::from_str(&raw)
        .with_context(|| format!("Catalog file '{}' is not valid JSON", path.display()))
}

#[cfg(test)]
pub(crate) mod test_support {
    use serde_json::json;

    use super::Catalog;

    /// Small catalog shared by analysis and handler tests.
    pub fn sample_catalog() -> Catalog {
        let ontology = json!({
            "skills": [
                "Python", "SQL", "Java", "JavaScript", "React", "Docker",
                "Kubernetes", "Machine Learning", "Data Structures", "Git",
                "Statistics", "Node.js", "AWS"
            ]
        });
        let roles = json!([
            {"role": "software developer", "phase": "foundation", "skill": "Python"},
            {"role": "software developer", "phase": "foundation", "skill": "Data Structures"},
            {"role": "software developer", "phase": "core", "skill": "Git"},
            {"role": "software developer", "phase": "core", "skill": "SQL"},
            {"role": "software developer", "phase": "advanced", "skill": "Docker"},
            {"role": "software developer", "phase": "projects", "skill": "REST API project"},
            {"role": "data scientist", "phase": "foundation", "skill": "Python"},
            {"role": "data scientist", "phase": "foundation", "skill": "Statistics"},
            {"role": "data scientist", "phase": "core", "skill": "Machine Learning"},
            {"role": "data scientist", "phase": "advanced", "skill": "Deep Learning"},
            {"role": "frontend engineer", "phase": "foundation", "skill": "JavaScript"},
            {"role": "frontend engineer", "phase": "core", "skill": "React"},
            {"role": "frontend engineer", "phase": "advanced", "skill": "TypeScript"}
        ]);
        let courses = json!({
            "python": [
                {"platform": "Coursera", "title": "Python for Everybody", "url": "https://coursera.org/python"},
                {"platform": "edX", "title": "Intro to Python", "url": "https://edx.org/python"},
                {"platform": "Udemy", "title": "Python Bootcamp", "url": "https://udemy.com/python"}
            ],
            "sql": [
                {"platform": "Khan Academy", "title": "Intro to SQL", "url": "https://khanacademy.org/sql"}
            ],
            "machine learning": [
                {"platform": "Coursera", "title": "Machine Learning", "url": "https://coursera.org/ml"}
            ],
            "docker": [
                {"platform": "Udemy", "title": "Docker Mastery", "url": "https://udemy.com/docker"}
            ],
            "statistics": [
                {"platform": "Khan Academy", "title": "Statistics", "url": "https://khanacademy.org/stats"}
            ]
        });
        Catalog::from_values(&ontology, &roles, &courses).expect("sample catalog is well-formed")
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::sample_catalog;
    use super::*;
    use std::io::Write;

    #[test]
    fn test_courses_for_exact_key() {
        let catalog = sample_catalog();
        let courses = catalog.courses_for("Python", 2);
        assert_eq!(courses.len(), 2, "limit respected");
        assert_eq!(courses[0].title, "Python for Everybody");
    }

    #[test]
    fn test_courses_for_fuzzy_key() {
        let catalog = sample_catalog();
        let courses = catalog.courses_for("PostgreSQL", 2);
        assert_eq!(courses.len(), 1);
        assert_eq!(courses[0].title, "Intro to SQL");
    }

    #[test]
    fn test_courses_for_unknown_skill_is_empty() {
        assert!(sample_catalog().courses_for("Haskell", 2).is_empty());
    }

    #[test]
    fn test_load_from_files() {
        let dir = tempfile::tempdir().unwrap();
        let write = |name: &str, body: &str| {
            let path = dir.path().join(name);
            let mut f = std::fs::File::create(&path).unwrap();
            f.write_all(body.as_bytes()).unwrap();
            path
        };
        let ontology = write("ontology.json", r#"{"skills": ["Rust", "rust", "Go"]}"#);
        let roles = write(
            "roles.json",
            r#"[{"role": "systems engineer", "phase": "core", "skill": "Rust"}]"#,
        );
        let courses = write("courses.json", r#"{}"#);

        let catalog = Catalog::load(&ontology, &roles, &courses).unwrap();
        assert_eq!(catalog.skills().len(), 2, "case-insensitive duplicate dropped");
        assert_eq!(catalog.taxonomy().role_names(), vec!["systems engineer"]);
    }

    #[test]
    fn test_bundled_catalog_loads() {
        let data = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("data");
        let catalog = Catalog::load(
            &data.join("ontology.json"),
            &data.join("roles.json"),
            &data.join("courses.json"),
        )
        .unwrap();

        assert!(catalog.skills().len() > 100);
        assert!(catalog.taxonomy().get("software engineer").is_some(), "default role is bundled");
        assert!(!catalog.courses_for("python", 2).is_empty());
    }

    #[test]
    fn test_load_missing_file_names_path() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.json");
        let err = Catalog::load(&missing, &missing, &missing).unwrap_err();
        assert!(err.to_string().contains("nope.json"));
    }
}
