//! Turns a `GapReport` into a short, prioritized action list, and a course
//! roadmap into per-skill recommendations prioritized by phase.

use serde::Serialize;

use crate::analysis::gap::{GapReport, Priority};
use crate::analysis::roadmap::RoadmapPhase;
use crate::catalog::CourseCatalog;
use crate::models::course::Course;
use crate::models::role::Phase;
use crate::models::skill::SkillName;

const MAX_REQUIRED: usize = 3;
const MAX_WEAK: usize = 2;
const MAX_PREFERRED: usize = 2;
const PROJECT_ESTIMATE: &str = "2-4 weeks";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommendationKind {
    Course,
    Project,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recommendation {
    #[serde(rename = "type")]
    pub kind: RecommendationKind,
    pub priority: Priority,
    pub skill: SkillName,
    pub action: String,
    pub courses: Vec<Course>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estimated_time: Option<String>,
    pub reason: String,
}

/// High-priority courses for missing required skills, then medium-priority
/// projects for weak skills, then low-priority courses for missing preferred
/// skills. Course recommendations are dropped when the catalog has nothing.
pub fn recommend(report: &GapReport, role: &str, catalog: &dyn CourseCatalog) -> Vec<Recommendation> {
    let mut recommendations = Vec::new();

    for missing in report.missing_required.iter().take(MAX_REQUIRED) {
        let Some(course) = first_course(catalog, &missing.skill) else {
            continue;
        };
        recommendations.push(Recommendation {
            kind: RecommendationKind::Course,
            priority: Priority::High,
            skill: missing.skill.clone(),
            action: format!("Complete course: {}", course.title),
            courses: vec![course],
            estimated_time: None,
            reason: format!(
                "Critical skill gap - {} is required for {role}",
                missing.skill
            ),
        });
    }

    for weak in report.weak_skills.iter().take(MAX_WEAK) {
        recommendations.push(Recommendation {
            kind: RecommendationKind::Project,
            priority: Priority::Medium,
            skill: weak.skill.clone(),
            action: format!("Build a project using {}", weak.skill),
            courses: Vec::new(),
            estimated_time: Some(PROJECT_ESTIMATE.to_string()),
            reason: format!(
                "Strengthen existing knowledge (current: {:.0}%)",
                weak.current_confidence.value() * 100.0
            ),
        });
    }

    for missing in report.missing_preferred.iter().take(MAX_PREFERRED) {
        let Some(course) = first_course(catalog, &missing.skill) else {
            continue;
        };
        recommendations.push(Recommendation {
            kind: RecommendationKind::Course,
            priority: Priority::Low,
            skill: missing.skill.clone(),
            action: format!("Learn {} to increase competitiveness", missing.skill),
            courses: vec![course],
            estimated_time: None,
            reason: "Preferred skill for role advancement".to_string(),
        });
    }

    recommendations
}

fn first_course(catalog: &dyn CourseCatalog, skill: &SkillName) -> Option<Course> {
    catalog.courses_for(skill.as_str(), 1).into_iter().next()
}

// ────────────────────────────────────────────────────────────────────────────
// Roadmap-driven recommendations
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoadmapRecommendation {
    pub skill_name: SkillName,
    pub phase: Phase,
    pub priority: Priority,
    pub courses: Vec<Course>,
    pub reason: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RecommendationSummary {
    pub total_skills_needed: usize,
    pub current_skills: usize,
    pub courses_available: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoadmapRecommendations {
    /// Whole percent, `current / (current + needed)`, capped at 100.
    pub readiness_score: u32,
    pub target_role: String,
    pub recommendations: Vec<RoadmapRecommendation>,
    pub summary: RecommendationSummary,
}

/// Foundation gaps come first; projects rank with core work.
pub fn phase_priority(phase: Phase) -> Priority {
    match phase {
        Phase::Foundation => Priority::High,
        Phase::Core | Phase::Projects => Priority::Medium,
        Phase::Advanced => Priority::Low,
    }
}

/// One recommendation per roadmap entry, in roadmap order, carrying the
/// courses already attached to it.
pub fn recommend_from_roadmap(
    roadmap: &[RoadmapPhase],
    role: &str,
    current_skills: usize,
) -> RoadmapRecommendations {
    let recommendations: Vec<RoadmapRecommendation> = roadmap
        .iter()
        .flat_map(|phase| {
            phase.skills.iter().map(move |skill| RoadmapRecommendation {
                skill_name: skill.name.clone(),
                phase: phase.phase,
                priority: phase_priority(phase.phase),
                courses: skill.courses.clone(),
                reason: format!("Required for {role} role in {} phase", phase.phase),
            })
        })
        .collect();

    let total_skills_needed = recommendations.len();
    let denominator = (current_skills + total_skills_needed).max(1);
    let readiness_score = ((current_skills as f64 / denominator as f64) * 100.0) as u32;

    RoadmapRecommendations {
        readiness_score: readiness_score.min(100),
        target_role: role.to_string(),
        summary: RecommendationSummary {
            total_skills_needed,
            current_skills,
            courses_available: recommendations.iter().map(|r| r.courses.len()).sum(),
        },
        recommendations,
    }
}
