//! REST API endpoints for persisted analysis runs

use actix_web::{HttpResponse, get, web};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::api::error::ApiError;
use crate::db::models::{AnalysisRun, ListRunsQuery, RunKind};
use crate::db::repository::RunRepository;

/// Query parameters for listing runs
#[derive(Debug, Deserialize, IntoParams)]
pub struct ListRunsParams {
    /// Page number (1-indexed, default: 1)
    pub page: Option<u32>,
    /// Page size (default: 20, max: 100)
    pub page_size: Option<u32>,
    /// Filter by run kind (competitor_discovery, keyword_aggregation)
    pub kind: Option<String>,
}

/// Paginated response for runs
#[derive(Debug, Serialize, ToSchema)]
pub struct RunListResponse {
    pub runs: Vec<RunSummary>,
    pub page: u32,
    pub page_size: u32,
    pub total_count: i64,
    pub total_pages: u32,
}

/// Summary of a run for list response
#[derive(Debug, Serialize, ToSchema)]
pub struct RunSummary {
    pub id: Uuid,
    pub kind: RunKind,
    pub subject: String,
    pub created_at: String,
}

/// Persist a snapshot, logging instead of failing the request on error
pub async fn save_snapshot<T: Serialize>(
    repository: &RunRepository,
    kind: RunKind,
    subject: &str,
    payload: &T,
) -> Option<Uuid> {
    match repository.save(kind, subject, payload).await {
        Ok(id) => {
            tracing::info!(id = %id, kind = %kind, subject = %subject, "Analysis run persisted");
            Some(id)
        }
        Err(e) => {
            tracing::error!(error = %e, kind = %kind, subject = %subject, "Failed to persist analysis run");
            None
        }
    }
}

/// List analysis runs with pagination and an optional kind filter
#[utoipa::path(
    get,
    path = "/v1/runs",
    params(ListRunsParams),
    responses(
        (status = 200, description = "Runs retrieved successfully", body = RunListResponse),
        (status = 400, description = "Unknown run kind", body = crate::api::error::ErrorResponse),
        (status = 500, description = "Internal server error", body = crate::api::error::ErrorResponse)
    ),
    tag = "runs"
)]
#[get("/v1/runs")]
pub async fn list_runs(
    repository: web::Data<RunRepository>,
    query: web::Query<ListRunsParams>,
) -> Result<HttpResponse, ApiError> {
    let kind = query
        .kind
        .as_deref()
        .map(str::parse::<RunKind>)
        .transpose()
        .map_err(ApiError::BadRequest)?;

    let paginated = repository
        .list(ListRunsQuery {
            page: query.page,
            page_size: query.page_size,
            kind,
        })
        .await?;

    let runs = paginated
        .runs
        .into_iter()
        .map(|run| RunSummary {
            id: run.id,
            kind: run.kind,
            subject: run.subject,
            created_at: run.created_at.to_rfc3339(),
        })
        .collect();

    Ok(HttpResponse::Ok().json(RunListResponse {
        runs,
        page: paginated.page,
        page_size: paginated.page_size,
        total_count: paginated.total_count,
        total_pages: paginated.total_pages,
    }))
}

/// Get an analysis run by ID
#[utoipa::path(
    get,
    path = "/v1/runs/{id}",
    params(
        ("id" = String, Path, description = "Run ID (UUID)")
    ),
    responses(
        (status = 200, description = "Run retrieved successfully", body = AnalysisRun),
        (status = 400, description = "Malformed run ID", body = crate::api::error::ErrorResponse),
        (status = 404, description = "Run not found", body = crate::api::error::ErrorResponse),
        (status = 500, description = "Internal server error", body = crate::api::error::ErrorResponse)
    ),
    tag = "runs"
)]
#[get("/v1/runs/{id}")]
pub async fn get_run(
    repository: web::Data<RunRepository>,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let raw = path.into_inner();
    let id = Uuid::parse_str(&raw)
        .map_err(|_| ApiError::BadRequest(format!("Invalid run ID: {}", raw)))?;

    let run = repository.get_by_id(id).await?;
    Ok(HttpResponse::Ok().json(run))
}

/// Configure run routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(list_runs).service(get_run);
}
