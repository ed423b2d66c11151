/**
 * Project Routes
 * Public project showcase and admin CRUD
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
    models::{NewProject, Project, ProjectUpdate},
    projects,
};
use crate::error::{AppError, AppResult};
use crate::pagination::{PageQuery, Pagination};
use crate::routes::{present_or_absent, required, ApiResponse, CreatedId};
use crate::AppState;

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct CreateProjectRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub live_url: Option<String>,
    pub github_url: Option<String>,
    #[serde(default)]
    pub technologies: Vec<String>,
    #[serde(default)]
    pub display_order: i64,
}

impl CreateProjectRequest {
    fn validate(self) -> AppResult<NewProject> {
        let (Some(title), Some(description)) = (required(&self.title), required(&self.description))
        else {
            return Err(AppError::validation("Title and description are required"));
        };

        Ok(NewProject {
            title,
            description,
            image_url: self.image_url,
            live_url: self.live_url,
            github_url: self.github_url,
            technologies: self.technologies,
            display_order: self.display_order,
        })
    }
}

fn project_not_found() -> AppError {
    AppError::not_found("Project not found")
}

/// GET /api/portfolio/projects
pub async fn list_projects(
    State(state): State<AppState>,
    query: Result<Query<PageQuery>, QueryRejection>,
) -> AppResult<Json<ApiResponse<Vec<Project>>>> {
    let Query(query) = query?;
    let page = query.is_requested().then(|| query.resolve());

    let (items, total) = projects::list_active(&state.pool, page).await?;
    let pagination = page.map(|p| Pagination::new(p, total));

    Ok(Json(ApiResponse::data(items).with_pagination(pagination)))
}

/// POST /api/portfolio/projects
pub async fn create_project(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    payload: Result<Json<CreateProjectRequest>, JsonRejection>,
) -> AppResult<(StatusCode, Json<ApiResponse<CreatedId>>)> {
    claims.require_admin()?;
    let Json(payload) = payload?;
    let new = payload.validate()?;

    let id = projects::create(&state.pool, &new).await?;
    tracing::info!(project_id = id, "project created");

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::data(CreatedId { id }).with_message("Project created successfully")),
    ))
}

/// PUT /api/portfolio/projects/{id}
pub async fn update_project(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    id: Result<Path<i64>, PathRejection>,
    payload: Result<Json<ProjectUpdate>, JsonRejection>,
) -> AppResult<Json<ApiResponse<()>>> {
    claims.require_admin()?;
    let Path(id) = id?;
    let Json(patch) = payload?;

    if !present_or_absent(&patch.title) || !present_or_absent(&patch.description) {
        return Err(AppError::validation("Title and description cannot be empty"));
    }

    if projects::update(&state.pool, id, &patch).await? == 0 {
        return Err(project_not_found());
    }

    Ok(Json(ApiResponse::message("Project updated successfully")))
}

/// DELETE /api/portfolio/projects/{id}
pub async fn delete_project(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    id: Result<Path<i64>, PathRejection>,
) -> AppResult<Json<ApiResponse<()>>> {
    claims.require_admin()?;
    let Path(id) = id?;

    if projects::delete(&state.pool, id).await? == 0 {
        return Err(project_not_found());
    }

    tracing::info!(project_id = id, "project deleted");
    Ok(Json(ApiResponse::message("Project deleted successfully")))
}
