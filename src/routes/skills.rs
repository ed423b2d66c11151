/**
 * Skill Routes
 * Public skill list and admin CRUD, levels are percentages in 1..=100
 */
use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    Extension, Json,
};
use serde::{Deserialize, Serialize};

use crate::auth::Claims;
use crate::db::{
    models::{NewSkill, Skill, SkillUpdate},
    skills::{self, MAX_LEVEL, MIN_LEVEL},
};
use crate::error::{AppError, AppResult};
use crate::pagination::{PageQuery, Pagination};
use crate::routes::{present_or_absent, required, ApiResponse, CreatedId};
use crate::AppState;

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct CreateSkillRequest {
    pub name: Option<String>,
    pub level: Option<i64>,
    pub category: Option<String>,
    #[serde(default)]
    pub display_order: i64,
}

fn check_level(level: i64) -> AppResult<()> {
    if skills::is_valid_level(level) {
        Ok(())
    } else {
        Err(AppError::validation(format!(
            "Skill level must be between {} and {}",
            MIN_LEVEL, MAX_LEVEL
        )))
    }
}

impl CreateSkillRequest {
    fn validate(self) -> AppResult<NewSkill> {
        let (Some(name), Some(level), Some(category)) =
            (required(&self.name), self.level, required(&self.category))
        else {
            return Err(AppError::validation("Name, level and category are required"));
        };
        check_level(level)?;

        Ok(NewSkill {
            name,
            level,
            category,
            display_order: self.display_order,
        })
    }
}

fn skill_not_found() -> AppError {
    AppError::not_found("Skill not found")
}

/// GET /api/portfolio/skills
pub async fn list_skills(
    State(state): State<AppState>,
    query: Result<Query<PageQuery>, QueryRejection>,
) -> AppResult<Json<ApiResponse<Vec<Skill>>>> {
    let Query(query) = query?;
    let page = query.is_requested().then(|| query.resolve());

    let (items, total) = skills::list_active(&state.pool, page).await?;
    let pagination = page.map(|p| Pagination::new(p, total));

    Ok(Json(ApiResponse::data(items).with_pagination(pagination)))
}

/// POST /api/portfolio/skills
pub async fn create_skill(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    payload: Result<Json<CreateSkillRequest>, JsonRejection>,
) -> AppResult<(StatusCode, Json<ApiResponse<CreatedId>>)> {
    claims.require_admin()?;
    let Json(payload) = payload?;
    let new = payload.validate()?;

    let id = skills::create(&state.pool, &new).await?;
    tracing::info!(skill_id = id, "skill created");

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::data(CreatedId { id }).with_message("Skill created successfully")),
    ))
}

/// PUT /api/portfolio/skills/{id}
pub async fn update_skill(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    id: Result<Path<i64>, PathRejection>,
    payload: Result<Json<SkillUpdate>, JsonRejection>,
) -> AppResult<Json<ApiResponse<()>>> {
    claims.require_admin()?;
    let Path(id) = id?;
    let Json(patch) = payload?;

    if let Some(level) = patch.level {
        check_level(level)?;
    }
    if !present_or_absent(&patch.name) || !present_or_absent(&patch.category) {
        return Err(AppError::validation("Name and category cannot be empty"));
    }

    if skills::update(&state.pool, id, &patch).await? == 0 {
        return Err(skill_not_found());
    }

    Ok(Json(ApiResponse::message("Skill updated successfully")))
}

/// DELETE /api/portfolio/skills/{id}
pub async fn delete_skill(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    id: Result<Path<i64>, PathRejection>,
) -> AppResult<Json<ApiResponse<()>>> {
    claims.require_admin()?;
    let Path(id) = id?;

    if skills::delete(&state.pool, id).await? == 0 {
        return Err(skill_not_found());
    }

    tracing::info!(skill_id = id, "skill deleted");
    Ok(Json(ApiResponse::message("Skill deleted successfully")))
}
