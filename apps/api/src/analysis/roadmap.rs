//! Roadmap Builder: diffs a scored skill list against a role's phase
//! requirements and lists what is left to learn, phase by phase.
//!
//! Uses its own known/mastered thresholds (0.3/0.6 by default), separate
//! from the gap analyzer's single threshold.

use serde::{Deserialize, Serialize};

use crate::analysis::lookup::{MatchMode, SkillLookup};
use crate::catalog::CourseCatalog;
use crate::models::course::Course;
use crate::models::role::{Phase, RoleProfile};
use crate::models::skill::{Confidence, SkillMention, SkillName};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RoadmapThresholds {
    /// At or above: the user knows the skill.
    pub known: f64,
    /// At or above: the skill is omitted from the roadmap.
    pub mastered: f64,
}

impl Default for RoadmapThresholds {
    fn default() -> Self {
        Self {
            known: 0.3,
            mastered: 0.6,
        }
    }
}

/// Status shown to callers; both learning needs surface as `to_learn`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RoadmapStatus {
    ToLearn,
}

/// Why a skill is on the roadmap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LearningNeed {
    /// Unseen, or below the known threshold.
    NeedsLearning,
    /// Known but not yet mastered.
    NeedsStrengthening,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoadmapSkill {
    pub name: SkillName,
    pub status: RoadmapStatus,
    #[serde(skip)]
    pub need: LearningNeed,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence: Option<Confidence>,
    pub evidence: Vec<String>,
    pub courses: Vec<Course>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoadmapPhase {
    pub phase: Phase,
    pub skills: Vec<RoadmapSkill>,
}

/// Builds the roadmap for `role`. Phases come out in precedence order and
/// only when they have at least one entry; skills keep taxonomy order.
pub fn build_roadmap(
    skills: &[SkillMention],
    role: &RoleProfile,
    thresholds: &RoadmapThresholds,
) -> Vec<RoadmapPhase> {
    let user = SkillLookup::best_mentions(skills);

    Phase::ALL
        .iter()
        .filter_map(|&phase| {
            let entries: Vec<RoadmapSkill> = role
                .skills(phase)
                .iter()
                .filter_map(|required| {
                    let mention = user.find(required.as_str(), MatchMode::Exact).copied();
                    let confidence = mention.map(|m| m.confidence);
                    let need = classify(confidence, thresholds)?;
                    Some(RoadmapSkill {
                        name: required.clone(),
                        status: RoadmapStatus::ToLearn,
                        need,
                        confidence,
                        evidence: mention.map(|m| m.evidence.clone()).unwrap_or_default(),
                        courses: Vec::new(),
                    })
                })
                .collect();
            (!entries.is_empty()).then_some(RoadmapPhase {
                phase,
                skills: entries,
            })
        })
        .collect()
}

/// `None` means mastered: the skill is left off the roadmap.
fn classify(confidence: Option<Confidence>, thresholds: &RoadmapThresholds) -> Option<LearningNeed> {
    let value = confidence.map_or(0.0, Confidence::value);
    if confidence.is_none() || value < thresholds.known {
        Some(LearningNeed::NeedsLearning)
    } else if value < thresholds.mastered {
        Some(LearningNeed::NeedsStrengthening)
    } else {
        None
    }
}

/// Fills each roadmap entry with up to `limit` courses from the catalog.
pub fn attach_courses(phases: &mut [RoadmapPhase], catalog: &dyn CourseCatalog, limit: usize) {
    for skill in phases.iter_mut().flat_map(|p| p.skills.iter_mut()) {
        skill.courses = catalog.courses_for(skill.name.as_str(), limit);
    }
}
