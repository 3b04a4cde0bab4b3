//! Gap/Readiness Analyzer.
//!
//! Required skills are foundation ∪ core, preferred are advanced ∪ projects.
//! A required skill counts toward readiness when present (contains-lookup)
//! with confidence at or above `GapThresholds::adequate`.

use serde::{Deserialize, Serialize};

use crate::analysis::lookup::{MatchMode, SkillLookup};
use crate::models::role::{RoleProfile, RoleTaxonomy};
use crate::models::skill::{round2, serialize_round2, Confidence, SkillName};

/// Roles returned by [`rank_role_fits`].
pub const MAX_SUGGESTED_ROLES: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GapThresholds {
    pub adequate: f64,
}

impl Default for GapThresholds {
    fn default() -> Self {
        Self { adequate: 0.5 }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    High,
    Medium,
    Low,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MissingSkill {
    pub skill: SkillName,
    pub priority: Priority,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeakSkill {
    pub skill: SkillName,
    pub current_confidence: Confidence,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GapReport {
    pub missing_required: Vec<MissingSkill>,
    pub missing_preferred: Vec<MissingSkill>,
    pub weak_skills: Vec<WeakSkill>,
    #[serde(serialize_with = "serialize_round2")]
    pub readiness_score: f64,
}

/// Readiness of the user against a role other than (or including) the target.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoleFit {
    pub role: String,
    #[serde(serialize_with = "serialize_round2")]
    pub fit_score: f64,
    pub matched_required: usize,
    pub total_required: usize,
}

pub fn analyze_gaps(
    user: &SkillLookup<Confidence>,
    role: &RoleProfile,
    thresholds: &GapThresholds,
) -> GapReport {
    let mut missing_required = Vec::new();
    let mut weak_skills = Vec::new();

    for skill in role.required_skills() {
        match user.confidence(skill.as_str(), MatchMode::Contains) {
            None => missing_required.push(MissingSkill {
                skill: skill.clone(),
                priority: Priority::High,
                reason: "Required for role".to_string(),
            }),
            Some(confidence) if confidence.value() < thresholds.adequate => {
                weak_skills.push(WeakSkill {
                    skill: skill.clone(),
                    current_confidence: confidence,
                    reason: "Needs improvement".to_string(),
                })
            }
            Some(_) => {}
        }
    }

    let missing_preferred = role
        .preferred_skills()
        .into_iter()
        .filter(|skill| user.confidence(skill.as_str(), MatchMode::Contains).is_none())
        .map(|skill| MissingSkill {
            skill: skill.clone(),
            priority: Priority::Medium,
            reason: "Preferred for competitive advantage".to_string(),
        })
        .collect();

    GapReport {
        missing_required,
        missing_preferred,
        weak_skills,
        readiness_score: role_fit(user, role, thresholds).fit_score,
    }
}

/// Coverage of `role`'s required skills, as a percentage.
pub fn role_fit(
    user: &SkillLookup<Confidence>,
    role: &RoleProfile,
    thresholds: &GapThresholds,
) -> RoleFit {
    let required = role.required_skills();
    let matched = required
        .iter()
        .filter(|skill| user.meets(skill.as_str(), MatchMode::Contains, thresholds.adequate))
        .count();
    let fit_score = if required.is_empty() {
        0.0
    } else {
        matched as f64 / required.len() as f64 * 100.0
    };

    RoleFit {
        role: role.name.clone(),
        fit_score,
        matched_required: matched,
        total_required: required.len(),
    }
}

/// Scores every role with required skills and returns the best few,
/// highest fit first; equal fits keep taxonomy order.
pub fn rank_role_fits(
    user: &SkillLookup<Confidence>,
    taxonomy: &RoleTaxonomy,
    thresholds: &GapThresholds,
) -> Vec<RoleFit> {
    let mut fits: Vec<RoleFit> = taxonomy
        .roles()
        .iter()
        .filter(|role| !role.required_skills().is_empty())
        .map(|role| role_fit(user, role, thresholds))
        .collect();

    fits.sort_by(|a, b| {
        round2(b.fit_score)
            .partial_cmp(&round2(a.fit_score))
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    fits.truncate(MAX_SUGGESTED_ROLES);
    fits
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::role::Phase;
    use crate::models::skill::SkillMention;

    fn user(skills: &[(&str, f64)]) -> SkillLookup<Confidence> {
        let mentions: Vec<SkillMention> = skills
            .iter()
            .map(|(n, c)| SkillMention::new(SkillName::new(n).unwrap(), Confidence::new(*c).unwrap()))
            .collect();
        SkillLookup::from_mentions(&mentions)
    }

    fn skill_names<'a>(items: impl IntoIterator<Item = &'a SkillName>) -> Vec<&'a str> {
        items.into_iter().map(SkillName::as_str).collect()
    }

    #[test]
    fn test_readiness_half_covered() {
        let role = RoleProfile::new("dev").with_phase(Phase::Foundation, &["python", "sql"]);
        let report = analyze_gaps(&user(&[("python", 0.9)]), &role, &Default::default());

        assert_eq!(report.readiness_score, 50.0);
        assert_eq!(skill_names(report.missing_required.iter().map(|m| &m.skill)), vec!["sql"]);
        assert_eq!(report.missing_required[0].priority, Priority::High);
    }

    #[test]
    fn test_low_confidence_is_weak_not_missing() {
        let role = RoleProfile::new("dev").with_phase(Phase::Core, &["git"]);
        let report = analyze_gaps(&user(&[("git", 0.4)]), &role, &Default::default());

        assert!(report.missing_required.is_empty());
        assert_eq!(report.weak_skills.len(), 1);
        assert_eq!(report.weak_skills[0].current_confidence.value(), 0.4);
        assert_eq!(report.readiness_score, 0.0, "weak skills do not count toward readiness");
    }

    #[test]
    fn test_adequate_threshold_is_inclusive() {
        let role = RoleProfile::new("dev").with_phase(Phase::Core, &["git"]);
        let report = analyze_gaps(&user(&[("git", 0.5)]), &role, &Default::default());
        assert!(report.weak_skills.is_empty());
        assert_eq!(report.readiness_score, 100.0);
    }

    #[test]
    fn test_preferred_skills_only_report_missing() {
        let role = RoleProfile::new("dev")
            .with_phase(Phase::Advanced, &["docker", "kubernetes"])
            .with_phase(Phase::Projects, &["capstone"]);
        let report = analyze_gaps(&user(&[("docker", 0.1)]), &role, &Default::default());

        assert_eq!(
            skill_names(report.missing_preferred.iter().map(|m| &m.skill)),
            vec!["kubernetes", "capstone"]
        );
        assert_eq!(report.missing_preferred[0].priority, Priority::Medium);
        assert!(report.weak_skills.is_empty(), "weak is only reported for required skills");
    }

    #[test]
    fn test_no_required_skills_means_zero_readiness() {
        let role = RoleProfile::new("dev").with_phase(Phase::Advanced, &["docker"]);
        let report = analyze_gaps(&user(&[("docker", 1.0)]), &role, &Default::default());
        assert_eq!(report.readiness_score, 0.0);
    }

    #[test]
    fn test_gap_lookup_uses_containment() {
        let role = RoleProfile::new("dev").with_phase(Phase::Core, &["SQL"]);
        let report = analyze_gaps(&user(&[("PostgreSQL", 0.8)]), &role, &Default::default());
        assert_eq!(report.readiness_score, 100.0);
    }

    #[test]
    fn test_custom_threshold() {
        let role = RoleProfile::new("dev").with_phase(Phase::Core, &["git"]);
        let report = analyze_gaps(&user(&[("git", 0.6)]), &role, &GapThresholds { adequate: 0.7 });
        assert_eq!(report.weak_skills.len(), 1);
    }

    #[test]
    fn test_readiness_serializes_rounded() {
        let role = RoleProfile::new("dev").with_phase(Phase::Core, &["a", "b", "c"]);
        let report = analyze_gaps(&user(&[("a", 0.9)]), &role, &Default::default());
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["readiness_score"], 33.33);
        assert_eq!(json["missing_required"][0]["priority"], "high");
    }

    #[test]
    fn test_rank_role_fits_orders_and_skips_empty_roles() {
        let taxonomy = RoleTaxonomy::new(vec![
            RoleProfile::new("frontend").with_phase(Phase::Core, &["react", "css"]),
            RoleProfile::new("research").with_phase(Phase::Advanced, &["papers"]),
            RoleProfile::new("backend").with_phase(Phase::Core, &["sql", "rust"]),
            RoleProfile::new("data").with_phase(Phase::Core, &["sql", "python"]),
        ]);
        let fits = rank_role_fits(
            &user(&[("sql", 0.9), ("rust", 0.7), ("python", 0.2)]),
            &taxonomy,
            &Default::default(),
        );

        let roles: Vec<&str> = fits.iter().map(|f| f.role.as_str()).collect();
        assert_eq!(roles, vec!["backend", "data", "frontend"]);
        assert_eq!(fits[0].fit_score, 100.0);
        assert_eq!(fits[1].matched_required, 1);
        assert_eq!(fits[1].total_required, 2);
    }

    #[test]
    fn test_rank_role_fits_caps_at_five() {
        let roles = (0..8)
            .map(|i| RoleProfile::new(&format!("role {i}")).with_phase(Phase::Core, &["git"]))
            .collect();
        let fits = rank_role_fits(&user(&[]), &RoleTaxonomy::new(roles), &Default::default());
        assert_eq!(fits.len(), MAX_SUGGESTED_ROLES);
        assert_eq!(fits[0].role, "role 0", "ties keep taxonomy order");
    }
}
