//! REST API endpoint for keyword aggregation

use actix_web::{HttpResponse, post, web};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::api::error::ApiError;
use crate::api::runs::save_snapshot;
use crate::db::models::RunKind;
use crate::db::repository::RunRepository;
use crate::model::{KeywordRecord, KeywordRequest, SourceStatusReport};
use crate::service::KeywordAggregationService;

/// Keyword aggregation response
#[derive(Debug, Serialize, ToSchema)]
pub struct KeywordResponse {
    /// Snapshot ID, absent when persistence failed
    pub run_id: Option<Uuid>,
    pub keywords: Vec<KeywordRecord>,
    pub sources: SourceStatusReport,
    pub competitor_brands: Vec<String>,
}

/// Aggregate keywords from SERP, gap report and AI generation
#[utoipa::path(
    post,
    path = "/v1/keywords/aggregate",
    request_body = KeywordRequest,
    responses(
        (status = 200, description = "Keywords aggregated", body = KeywordResponse),
        (status = 400, description = "Blank niche", body = crate::api::error::ErrorResponse)
    ),
    tag = "keywords"
)]
#[post("/v1/keywords/aggregate")]
pub async fn aggregate_keywords(
    service: web::Data<KeywordAggregationService>,
    repository: web::Data<RunRepository>,
    body: web::Json<KeywordRequest>,
) -> Result<HttpResponse, ApiError> {
    let request = body.into_inner();
    if request.niche.trim().is_empty() {
        return Err(ApiError::BadRequest("niche must not be empty".to_string()));
    }

    let aggregation = service.aggregate_keywords(&request).await;

    let run_id = save_snapshot(
        repository.get_ref(),
        RunKind::KeywordAggregation,
        request.niche.trim(),
        &aggregation,
    )
    .await;

    Ok(HttpResponse::Ok().json(KeywordResponse {
        run_id,
        keywords: aggregation.keywords,
        sources: aggregation.sources,
        competitor_brands: aggregation.competitor_brands,
    }))
}

/// Configure keyword routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(aggregate_keywords);
}
