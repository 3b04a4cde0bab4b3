//! Boundary parsing for catalog JSON. Malformed records are skipped with a
//! warning; only a wrong top-level shape is an error.

use std::collections::HashSet;

use anyhow::{bail, Result};
use serde_json::Value;
use tracing::warn;

use crate::analysis::lookup::SkillLookup;
use crate::models::course::Course;
use crate::models::role::{Phase, RoleRequirement};
use crate::models::skill::SkillName;

/// `{"skills": [..]}` → canonical names, deduplicated case-insensitively
/// (first spelling wins).
pub fn parse_ontology(value: &Value) -> Result<Vec<SkillName>> {
    let Some(items) = value.get("skills").and_then(Value::as_array) else {
        bail!("ontology must be an object with a 'skills' array");
    };

    let mut seen = HashSet::new();
    let mut skills = Vec::with_capacity(items.len());
    for item in items {
        let Some(name) = item.as_str().and_then(|s| SkillName::new(s).ok()) else {
            warn!("Skipping malformed ontology entry: {item}");
            continue;
        };
        if seen.insert(name.key()) {
            skills.push(name);
        }
    }
    Ok(skills)
}

/// `[{role, phase, skill}, ..]` → validated requirement rows.
pub fn parse_requirements(value: &Value) -> Result<Vec<RoleRequirement>> {
    let Some(rows) = value.as_array() else {
        bail!("role taxonomy must be an array of {{role, phase, skill}} records");
    };

    let mut requirements = Vec::with_capacity(rows.len());
    for row in rows {
        match parse_requirement(row) {
            Some(req) => requirements.push(req),
            None => warn!("Skipping malformed role requirement: {row}"),
        }
    }
    Ok(requirements)
}

fn parse_requirement(row: &Value) -> Option<RoleRequirement> {
    let role = row.get("role")?.as_str()?.trim();
    if role.is_empty() {
        return None;
    }
    let phase: Phase = row.get("phase")?.as_str()?.parse().ok()?;
    let skill = SkillName::new(row.get("skill")?.as_str()?).ok()?;
    Some(RoleRequirement {
        role: role.to_string(),
        phase,
        skill,
    })
}

/// `{skill: [{platform, title, url}, ..]}` → course table keyed by skill.
pub fn parse_courses(value: &Value) -> Result<SkillLookup<Vec<Course>>> {
    let Some(map) = value.as_object() else {
        bail!("course catalog must be an object keyed by skill name");
    };

    let mut lookup = SkillLookup::new();
    for (skill, list) in map {
        let Some(list) = list.as_array() else {
            warn!("Skipping course list for '{skill}': not an array");
            continue;
        };
        let courses: Vec<Course> = list
            .iter()
            .filter_map(|c| {
                let course = serde_json::from_value::<Course>(c.clone()).ok();
                if course.is_none() {
                    warn!("Skipping malformed course record for '{skill}': {c}");
                }
                course
            })
            .collect();
        lookup.insert_with(skill, courses, |stored, more| stored.extend(more));
    }
    Ok(lookup)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::lookup::MatchMode;
    use serde_json::json;

    #[test]
    fn test_ontology_skips_blank_and_non_string() {
        let skills = parse_ontology(&json!({"skills": ["Python", "", 42, "  SQL "]})).unwrap();
        let names: Vec<_> = skills.iter().map(SkillName::as_str).collect();
        assert_eq!(names, vec!["Python", "SQL"]);
    }

    #[test]
    fn test_ontology_dedup_keeps_first_spelling() {
        let skills = parse_ontology(&json!({"skills": ["Node.js", "node.js", "NODE.JS"]})).unwrap();
        assert_eq!(skills.len(), 1);
        assert_eq!(skills[0].as_str(), "Node.js");
    }

    #[test]
    fn test_ontology_wrong_shape_errors() {
        assert!(parse_ontology(&json!(["Python"])).is_err());
    }

    #[test]
    fn test_requirements_skip_malformed_rows() {
        let rows = parse_requirements(&json!([
            {"role": "dev", "phase": "core", "skill": "Git"},
            {"role": "dev", "phase": "electives", "skill": "Chess"},
            {"role": "dev", "skill": "No Phase"},
            {"role": "", "phase": "core", "skill": "Nameless"},
            {"role": "dev", "phase": "core", "skill": "   "},
            "not an object"
        ]))
        .unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].skill.as_str(), "Git");
        assert_eq!(rows[0].phase, Phase::Core);
    }

    #[test]
    fn test_courses_skip_malformed_records() {
        let courses = parse_courses(&json!({
            "Python": [
                {"platform": "edX", "title": "Python", "url": "https://edx.org"},
                {"platform": "edX", "title": "missing url"}
            ],
            "sql": "not a list"
        }))
        .unwrap();
        let python = courses.find("python", MatchMode::Exact).unwrap();
        assert_eq!(python.len(), 1);
        assert!(courses.find("sql", MatchMode::Exact).is_none());
    }
}
