use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::models::skill::SkillName;

/// Learning stage within a role's requirements.
///
/// Declaration order is the precedence order and the roadmap presentation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Foundation,
    Core,
    Advanced,
    Projects,
}

impl Phase {
    pub const ALL: [Phase; 4] = [Phase::Foundation, Phase::Core, Phase::Advanced, Phase::Projects];

    pub fn as_str(self) -> &'static str {
        match self {
            Phase::Foundation => "foundation",
            Phase::Core => "core",
            Phase::Advanced => "advanced",
            Phase::Projects => "projects",
        }
    }

    /// Foundation and core skills are required; advanced and projects are preferred.
    pub fn is_required(self) -> bool {
        matches!(self, Phase::Foundation | Phase::Core)
    }
}

impl FromStr for Phase {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "foundation" => Ok(Phase::Foundation),
            "core" => Ok(Phase::Core),
            "advanced" => Ok(Phase::Advanced),
            "projects" => Ok(Phase::Projects),
            other => Err(AppError::Validation(format!("unknown phase '{other}'"))),
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One `(role, phase, skill)` row of the taxonomy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoleRequirement {
    pub role: String,
    pub phase: Phase,
    pub skill: SkillName,
}

/// A role and its per-phase skill lists.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RoleProfile {
    pub name: String,
    pub phases: BTreeMap<Phase, Vec<SkillName>>,
}

impl RoleProfile {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            phases: BTreeMap::new(),
        }
    }

    pub fn with_phase(mut self, phase: Phase, skills: &[&str]) -> Self {
        let list = self.phases.entry(phase).or_default();
        list.extend(skills.iter().filter_map(|s| SkillName::new(s).ok()));
        self
    }

    pub fn skills(&self, phase: Phase) -> &[SkillName] {
        self.phases.get(&phase).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Foundation ∪ core, in phase then record order.
    pub fn required_skills(&self) -> Vec<&SkillName> {
        self.collect_where(Phase::is_required)
    }

    /// Advanced ∪ projects, in phase then record order.
    pub fn preferred_skills(&self) -> Vec<&SkillName> {
        self.collect_where(|p| !p.is_required())
    }

    fn collect_where(&self, keep: impl Fn(Phase) -> bool) -> Vec<&SkillName> {
        self.phases
            .iter()
            .filter(|(phase, _)| keep(**phase))
            .flat_map(|(_, skills)| skills.iter())
            .collect()
    }
}

/// Role taxonomy, in first-appearance order of role names.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RoleTaxonomy {
    roles: Vec<RoleProfile>,
}

impl RoleTaxonomy {
    pub fn new(roles: Vec<RoleProfile>) -> Self {
        Self { roles }
    }

    /// Groups requirement rows by role, preserving first appearance of each role.
    pub fn from_requirements(rows: impl IntoIterator<Item = RoleRequirement>) -> Self {
        let mut roles: Vec<RoleProfile> = Vec::new();
        for row in rows {
            let idx = match roles.iter().position(|r| r.name == row.role) {
                Some(idx) => idx,
                None => {
                    roles.push(RoleProfile::new(row.role.clone()));
                    roles.len() - 1
                }
            };
            roles[idx].phases.entry(row.phase).or_default().push(row.skill);
        }
        Self { roles }
    }

    pub fn roles(&self) -> &[RoleProfile] {
        &self.roles
    }

    pub fn role_names(&self) -> Vec<&str> {
        self.roles.iter().map(|r| r.name.as_str()).collect()
    }

    /// Looks up a role by its exact canonical name.
    pub fn get(&self, name: &str) -> Option<&RoleProfile> {
        self.roles.iter().find(|r| r.name == name)
    }

    pub fn is_empty(&self) -> bool {
        self.roles.is_empty()
    }
}
