//! Pathway tree: every requirement of the matched role, phase by phase, with
//! a completion status, plus overall stats and the best-fitting roles.
//!
//! Unlike the roadmap, nothing is omitted and every phase is present even
//! when empty. Statuses use the gap analyzer's threshold.

use serde::Serialize;

use crate::analysis::gap::{rank_role_fits, GapThresholds, RoleFit};
use crate::analysis::lookup::{MatchMode, SkillLookup};
use crate::catalog::CourseCatalog;
use crate::models::course::Course;
use crate::models::role::{Phase, RoleProfile, RoleTaxonomy};
use crate::models::skill::{serialize_round2, Confidence, SkillMention, SkillName};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PathwayStatus {
    Complete,
    Weak,
    Missing,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PathwaySkill {
    pub name: SkillName,
    pub status: PathwayStatus,
    pub confidence: Option<Confidence>,
    pub evidence: Vec<String>,
    pub courses: Vec<Course>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PathwayPhase {
    pub phase: Phase,
    pub skills: Vec<PathwaySkill>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PathwayStats {
    pub skills_total: usize,
    pub skills_complete: usize,
    pub skills_weak: usize,
    pub skills_missing: usize,
    #[serde(serialize_with = "serialize_round2")]
    pub readiness_score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PathwayTree {
    pub target_role: String,
    pub phases: Vec<PathwayPhase>,
    pub stats: PathwayStats,
    pub suggested_roles: Vec<RoleFit>,
}

/// Inputs shared by every pathway computation.
pub struct PathwayContext<'a> {
    pub taxonomy: &'a RoleTaxonomy,
    pub courses: &'a dyn CourseCatalog,
    pub thresholds: GapThresholds,
    pub courses_per_skill: usize,
}

pub fn build_pathway(skills: &[SkillMention], role: &RoleProfile, ctx: &PathwayContext<'_>) -> PathwayTree {
    let confidences = SkillLookup::from_mentions(skills);
    let mentions = SkillLookup::best_mentions(skills);
    let mut stats = PathwayStats::default();

    let phases = Phase::ALL
        .iter()
        .map(|&phase| {
            let skills = role
                .skills(phase)
                .iter()
                .map(|required| {
                    let confidence = confidences.confidence(required.as_str(), MatchMode::Contains);
                    let status = match confidence {
                        None => PathwayStatus::Missing,
                        Some(c) if c.value() < ctx.thresholds.adequate => PathwayStatus::Weak,
                        Some(_) => PathwayStatus::Complete,
                    };
                    match status {
                        PathwayStatus::Complete => stats.skills_complete += 1,
                        PathwayStatus::Weak => stats.skills_weak += 1,
                        PathwayStatus::Missing => stats.skills_missing += 1,
                    }

                    let evidence = mentions
                        .find(required.as_str(), MatchMode::Exact)
                        .map(|m| m.evidence.clone())
                        .unwrap_or_default();
                    let courses = if status == PathwayStatus::Complete {
                        Vec::new()
                    } else {
                        ctx.courses.courses_for(required.as_str(), ctx.courses_per_skill)
                    };

                    PathwaySkill {
                        name: required.clone(),
                        status,
                        confidence,
                        evidence,
                        courses,
                    }
                })
                .collect();
            PathwayPhase { phase, skills }
        })
        .collect();

    stats.skills_total = stats.skills_complete + stats.skills_weak + stats.skills_missing;
    if stats.skills_total > 0 {
        stats.readiness_score = stats.skills_complete as f64 / stats.skills_total as f64 * 100.0;
    }

    PathwayTree {
        target_role: role.name.clone(),
        phases,
        stats,
        suggested_roles: rank_role_fits(&confidences, ctx.taxonomy, &ctx.thresholds),
    }
}
