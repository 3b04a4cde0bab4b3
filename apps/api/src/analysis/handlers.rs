//! Axum route handlers for the résumé analysis API.

use anyhow::anyhow;
use axum::{
    extract::{rejection::JsonRejection, Multipart, State},
    Json,
};
use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::analysis::extractor::extract_skills;
use crate::analysis::gap::{analyze_gaps, rank_role_fits, GapReport, RoleFit};
use crate::analysis::lookup::SkillLookup;
use crate::analysis::pathway::{build_pathway, PathwayContext, PathwayTree};
use crate::analysis::recommendations::{
    recommend, recommend_from_roadmap, Recommendation, RoadmapRecommendations,
};
use crate::analysis::roadmap::{attach_courses, build_roadmap, LearningNeed, RoadmapPhase};
use crate::analysis::role_matcher::{match_role, RoleMatch};
use crate::analysis::scorer::{score_skills, ScoringWeights};
use crate::catalog::{OntologyProvider, RoleTaxonomyProvider};
use crate::errors::AppError;
use crate::models::role::{RoleProfile, RoleTaxonomy};
use crate::models::skill::{SkillMention, SkillName};
use crate::state::AppState;
use crate::text_source::TextSource;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct TextRequest {
    pub raw_text: String,
}

/// Body shared by the analyze, gap-analysis and pathway endpoints.
#[derive(Debug, Deserialize)]
pub struct SkillsRequest {
    #[serde(default)]
    pub target_role: Option<String>,
    #[serde(default)]
    pub skills: Vec<SkillMention>,
}

#[derive(Debug, Serialize)]
pub struct RolesResponse {
    pub roles: Vec<String>,
    pub count: usize,
}

#[derive(Debug, Serialize)]
pub struct ExtractResponse {
    pub skills: Vec<SkillName>,
    pub count: usize,
}

#[derive(Debug, Serialize)]
pub struct ScoreResponse {
    pub skills: Vec<SkillMention>,
    pub count: usize,
}

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub filename: String,
    pub skills: Vec<SkillMention>,
    pub count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_role: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub roadmap: Option<Vec<RoadmapPhase>>,
}

#[derive(Debug, Serialize)]
pub struct AnalyzeResponse {
    pub target_role_input: String,
    pub target_role: String,
    pub skills: Vec<SkillMention>,
    pub roadmap: Vec<RoadmapPhase>,
}

#[derive(Debug, Serialize)]
pub struct GapAnalysisResponse {
    pub analysis_id: Uuid,
    pub generated_at: DateTime<Utc>,
    pub target_role: String,
    pub analysis: GapReport,
    pub recommendations: Vec<Recommendation>,
    pub suggested_roles: Vec<RoleFit>,
}

#[derive(Debug, Serialize)]
pub struct RoadmapRecommendationsResponse {
    pub target_role_input: String,
    #[serde(flatten)]
    pub report: RoadmapRecommendations,
}

#[derive(Debug, Serialize)]
pub struct PathwayResponse {
    pub target_role_input: String,
    pub available_roles: Vec<String>,
    #[serde(flatten)]
    pub tree: PathwayTree,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/v1/roles
pub async fn handle_list_roles(State(state): State<AppState>) -> Json<RolesResponse> {
    let roles = sorted_role_names(state.catalog.taxonomy());
    Json(RolesResponse {
        count: roles.len(),
        roles,
    })
}

/// POST /api/v1/resume/extract
///
/// Candidate ontology skills found in pasted résumé text, unscored.
pub async fn handle_extract(
    State(state): State<AppState>,
    payload: Result<Json<TextRequest>, JsonRejection>,
) -> Result<Json<ExtractResponse>, AppError> {
    let Json(request) = payload?;
    let source = text_from_request(&request)?;

    let skills = extract_skills(&source, state.catalog.skills(), state.nlp.collaborators());
    Ok(Json(ExtractResponse {
        count: skills.len(),
        skills,
    }))
}

/// POST /api/v1/resume/score
///
/// Extracts and scores skills from pasted résumé text.
pub async fn handle_score(
    State(state): State<AppState>,
    payload: Result<Json<TextRequest>, JsonRejection>,
) -> Result<Json<ScoreResponse>, AppError> {
    let Json(request) = payload?;
    let source = text_from_request(&request)?;

    let skills = score_source(&state, &source);
    Ok(Json(ScoreResponse {
        count: skills.len(),
        skills,
    }))
}

/// POST /api/v1/resume/upload
///
/// Multipart `file` (.pdf, .docx or .txt) plus an optional `target_role`. Returns the
/// scored skills and, when a role was given, the learning roadmap for it.
pub async fn handle_upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, AppError> {
    let mut file: Option<(String, Bytes)> = None;
    let mut target_role: Option<String> = None;

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("file") => {
                let filename = field.file_name().unwrap_or_default().to_string();
                let bytes = field.bytes().await?;
                file = Some((filename, bytes));
            }
            Some("target_role") => {
                let text = field.text().await?;
                let text = text.trim();
                if !text.is_empty() {
                    target_role = Some(text.to_string());
                }
            }
            _ => {}
        }
    }

    let (filename, bytes) = file
        .ok_or_else(|| AppError::Validation("multipart field 'file' is required".to_string()))?;
    if filename.trim().is_empty() {
        return Err(AppError::Validation("uploaded file has no filename".to_string()));
    }

    // PDF/DOCX parsing and scoring are CPU-bound.
    let worker_state = state.clone();
    let worker_filename = filename.clone();
    let skills = tokio::task::spawn_blocking(move || -> Result<Vec<SkillMention>, AppError> {
        let source = TextSource::from_upload(&worker_filename, &bytes)?;
        Ok(score_source(&worker_state, &source))
    })
    .await
    .map_err(|e| {
        if e.is_panic() {
            AppError::UnprocessableEntity(format!("Could not read '{filename}'"))
        } else {
            AppError::Internal(anyhow!("spawn_blocking failed in upload: {e}"))
        }
    })??;

    info!("Scored {} skills from upload '{}'", skills.len(), filename);

    let (target_role, roadmap) = match target_role {
        Some(target) => {
            let role = resolve_role_or_default(&state, &target)?;
            (Some(role.name.clone()), Some(roadmap_for(&state, &skills, role)))
        }
        None => (None, None),
    };

    Ok(Json(UploadResponse {
        filename,
        count: skills.len(),
        skills,
        target_role,
        roadmap,
    }))
}

/// POST /api/v1/resume/analyze
///
/// Roadmap for an already-scored skill list against the requested role.
pub async fn handle_analyze(
    State(state): State<AppState>,
    payload: Result<Json<SkillsRequest>, JsonRejection>,
) -> Result<Json<AnalyzeResponse>, AppError> {
    let Json(request) = payload?;
    if request.skills.is_empty() {
        return Err(AppError::Validation("skills cannot be empty".to_string()));
    }
    let target = required_target_role(&request)?;

    let role = resolve_role_or_default(&state, target)?;
    let roadmap = roadmap_for(&state, &request.skills, role);

    Ok(Json(AnalyzeResponse {
        target_role_input: target.to_string(),
        target_role: role.name.clone(),
        roadmap,
        skills: request.skills,
    }))
}

/// POST /api/v1/gap-analysis
///
/// Gap report, recommendations and alternative role fits. An unresolvable
/// role is a 404 listing the available roles.
pub async fn handle_gap_analysis(
    State(state): State<AppState>,
    payload: Result<Json<SkillsRequest>, JsonRejection>,
) -> Result<Json<GapAnalysisResponse>, AppError> {
    let Json(request) = payload?;
    let target = required_target_role(&request)?;

    let taxonomy = state.catalog.taxonomy();
    let role = resolve_role(taxonomy, target).ok_or_else(|| {
        AppError::NotFound(format!(
            "Role '{target}' not found. Available roles: {}",
            sorted_role_names(taxonomy).join(", ")
        ))
    })?;

    let thresholds = state.config.gap_thresholds;
    let user = SkillLookup::from_mentions(&request.skills);
    let analysis = analyze_gaps(&user, role, &thresholds);
    let recommendations = recommend(&analysis, &role.name, &*state.catalog);
    let suggested_roles = rank_role_fits(&user, taxonomy, &thresholds);

    let analysis_id = Uuid::new_v4();
    info!(
        "Gap analysis {analysis_id} for '{}': readiness {:.2}",
        role.name, analysis.readiness_score
    );

    Ok(Json(GapAnalysisResponse {
        analysis_id,
        generated_at: Utc::now(),
        target_role: role.name.clone(),
        analysis,
        recommendations,
        suggested_roles,
    }))
}

/// POST /api/v1/recommendations
///
/// Every roadmap entry for the role with its courses, prioritized by phase.
/// Without a `target_role` the configured default role is used.
pub async fn handle_recommendations(
    State(state): State<AppState>,
    payload: Result<Json<SkillsRequest>, JsonRejection>,
) -> Result<Json<RoadmapRecommendationsResponse>, AppError> {
    let Json(request) = payload?;
    let target = optional_target_role(&state, &request);

    let role = resolve_role_or_default(&state, target)?;
    let roadmap = roadmap_for(&state, &request.skills, role);
    let report = recommend_from_roadmap(&roadmap, &role.name, request.skills.len());

    Ok(Json(RoadmapRecommendationsResponse {
        target_role_input: target.to_string(),
        report,
    }))
}

/// POST /api/v1/pathways/tree
///
/// Full requirement tree for a role with per-skill status. Without a
/// `target_role` the configured default role is used.
pub async fn handle_pathway_tree(
    State(state): State<AppState>,
    payload: Result<Json<SkillsRequest>, JsonRejection>,
) -> Result<Json<PathwayResponse>, AppError> {
    let Json(request) = payload?;
    let target = optional_target_role(&state, &request);

    let role = resolve_role_or_default(&state, target)?;
    let taxonomy = state.catalog.taxonomy();
    let ctx = PathwayContext {
        taxonomy,
        courses: &*state.catalog,
        thresholds: state.config.gap_thresholds,
        courses_per_skill: state.config.courses_per_skill,
    };
    let tree = build_pathway(&request.skills, role, &ctx);

    Ok(Json(PathwayResponse {
        target_role_input: target.to_string(),
        available_roles: sorted_role_names(taxonomy),
        tree,
    }))
}

// ────────────────────────────────────────────────────────────────────────────
// Helpers
// ────────────────────────────────────────────────────────────────────────────

fn text_from_request(request: &TextRequest) -> Result<TextSource, AppError> {
    if request.raw_text.trim().is_empty() {
        return Err(AppError::Validation("raw_text cannot be empty".to_string()));
    }
    Ok(TextSource::from_raw(request.raw_text.as_str()))
}

fn required_target_role(request: &SkillsRequest) -> Result<&str, AppError> {
    request
        .target_role
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| AppError::Validation("target_role is required".to_string()))
}

/// The requested role, or the configured default when none was given.
fn optional_target_role<'a>(state: &'a AppState, request: &'a SkillsRequest) -> &'a str {
    request
        .target_role
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .unwrap_or(&state.config.default_role)
}

fn score_source(state: &AppState, source: &TextSource) -> Vec<SkillMention> {
    let skills = extract_skills(source, state.catalog.skills(), state.nlp.collaborators());
    score_skills(&skills, &source.raw_text, &ScoringWeights::default())
}

fn roadmap_for(state: &AppState, skills: &[SkillMention], role: &RoleProfile) -> Vec<RoadmapPhase> {
    let mut roadmap = build_roadmap(skills, role, &state.config.roadmap_thresholds);
    attach_courses(&mut roadmap, &*state.catalog, state.config.courses_per_skill);

    let (to_learn, to_strengthen) = roadmap
        .iter()
        .flat_map(|phase| phase.skills.iter())
        .fold((0, 0), |(learn, strengthen), skill| match skill.need {
            LearningNeed::NeedsLearning => (learn + 1, strengthen),
            LearningNeed::NeedsStrengthening => (learn, strengthen + 1),
        });
    debug!(
        "Roadmap for '{}': {to_learn} to learn, {to_strengthen} to strengthen",
        role.name
    );
    roadmap
}

fn sorted_role_names(taxonomy: &RoleTaxonomy) -> Vec<String> {
    let mut names: Vec<String> = taxonomy.role_names().into_iter().map(str::to_string).collect();
    names.sort();
    names
}

fn resolve_role<'a>(taxonomy: &'a RoleTaxonomy, target: &str) -> Option<&'a RoleProfile> {
    let names = taxonomy.role_names();
    let matched = match_role(target, &names);
    if let RoleMatch::Matched { role, kind } = matched {
        debug!("Role '{target}' matched '{role}' ({kind:?})");
    }
    matched.role().and_then(|name| taxonomy.get(name))
}

/// Matcher, then the configured default role, then the first taxonomy role.
fn resolve_role_or_default<'a>(state: &'a AppState, target: &str) -> Result<&'a RoleProfile, AppError> {
    let taxonomy = state.catalog.taxonomy();
    if let Some(role) = resolve_role(taxonomy, target) {
        return Ok(role);
    }

    let fallback = taxonomy
        .get(&state.config.default_role)
        .or_else(|| taxonomy.roles().first())
        .ok_or_else(|| AppError::Internal(anyhow!("Role taxonomy is empty")))?;
    warn!("Role '{target}' not matched; falling back to '{}'", fallback.name);
    Ok(fallback)
}
