//! Role Matcher: resolves a free-text target role to a taxonomy role name.
//!
//! Resolution order, first hit wins: exact (case-insensitive), substring
//! containment either way, then the same containment check after expanding
//! whole-word abbreviations (`dev`, `ml`, `fe`, `be`).

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use crate::analysis::lookup::contains_either;

/// Short forms expanded on word boundaries, applied in this order.
static ABBREVIATIONS: Lazy<Vec<(Regex, &'static str)>> = Lazy::new(|| {
    [
        ("dev", "developer"),
        ("ml", "machine learning"),
        ("fe", "frontend"),
        ("be", "backend"),
    ]
    .into_iter()
    .map(|(short, long)| {
        let pattern = Regex::new(&format!(r"\b{short}\b")).expect("abbreviation pattern is valid");
        (pattern, long)
    })
    .collect()
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchKind {
    Exact,
    Contains,
    Abbreviation,
}

/// Outcome of role resolution. `Unresolved` is a normal result; the caller
/// picks a fallback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoleMatch<'a> {
    Matched { role: &'a str, kind: MatchKind },
    Unresolved,
}

impl<'a> RoleMatch<'a> {
    pub fn role(&self) -> Option<&'a str> {
        match self {
            RoleMatch::Matched { role, .. } => Some(*role),
            RoleMatch::Unresolved => None,
        }
    }
}

pub fn match_role<'a>(target: &str, roles: &[&'a str]) -> RoleMatch<'a> {
    let target = target.trim().to_lowercase();
    if target.is_empty() {
        return RoleMatch::Unresolved;
    }

    if let Some(&role) = roles.iter().find(|r| r.to_lowercase() == target) {
        return RoleMatch::Matched {
            role,
            kind: MatchKind::Exact,
        };
    }

    if let Some(role) = find_containing(&target, roles) {
        return RoleMatch::Matched {
            role,
            kind: MatchKind::Contains,
        };
    }

    let expanded = expand_abbreviations(&target);
    if expanded != target {
        if let Some(role) = find_containing(&expanded, roles) {
            return RoleMatch::Matched {
                role,
                kind: MatchKind::Abbreviation,
            };
        }
    }

    RoleMatch::Unresolved
}

fn find_containing<'a>(target: &str, roles: &[&'a str]) -> Option<&'a str> {
    roles
        .iter()
        .find(|r| contains_either(&r.to_lowercase(), target))
        .copied()
}

fn expand_abbreviations(target: &str) -> String {
    ABBREVIATIONS
        .iter()
        .fold(target.to_string(), |acc, (pattern, long)| {
            pattern.replace_all(&acc, *long).into_owned()
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    const ROLES: &[&str] = &[
        "Software Developer",
        "Machine Learning Engineer",
        "Frontend Engineer",
        "Data Scientist",
    ];

    #[test]
    fn test_exact_match_is_case_insensitive() {
        assert_eq!(
            match_role("data scientist", ROLES),
            RoleMatch::Matched {
                role: "Data Scientist",
                kind: MatchKind::Exact
            }
        );
    }

    #[test]
    fn test_contains_either_direction() {
        assert_eq!(match_role("scientist", ROLES).role(), Some("Data Scientist"));
        assert_eq!(
            match_role("senior frontend engineer", ROLES).role(),
            Some("Frontend Engineer")
        );
    }

    #[test]
    fn test_dev_expands_to_developer() {
        let roles = ["software developer"];
        assert_eq!(match_role("dev", &roles).role(), Some("software developer"));
    }

    #[test]
    fn test_ml_expansion() {
        assert_eq!(
            match_role("ml engineer", ROLES),
            RoleMatch::Matched {
                role: "Machine Learning Engineer",
                kind: MatchKind::Abbreviation
            }
        );
    }

    #[test]
    fn test_abbreviation_only_on_word_boundaries() {
        // "devops" must not become "developerops"
        assert_eq!(expand_abbreviations("devops be"), "devops backend");
        assert_eq!(expand_abbreviations("html fe"), "html frontend");
    }

    #[test]
    fn test_no_overlap_is_unresolved() {
        assert_eq!(match_role("quantum", ROLES), RoleMatch::Unresolved);
        assert_eq!(match_role("quantum", ROLES).role(), None);
    }

    #[test]
    fn test_blank_input_is_unresolved() {
        assert_eq!(match_role("   ", ROLES), RoleMatch::Unresolved);
    }

    #[test]
    fn test_first_taxonomy_role_wins_on_contains() {
        let roles = ["backend engineer", "frontend engineer"];
        assert_eq!(match_role("engineer", &roles).role(), Some("backend engineer"));
    }
}
