//! REST API endpoint for competitor discovery

use actix_web::{HttpResponse, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::api::error::ApiError;
use crate::api::runs::save_snapshot;
use crate::db::models::RunKind;
use crate::db::repository::RunRepository;
use crate::model::{Candidate, SelfBrand};
use crate::service::CompetitorDiscoveryService;

/// Competitor discovery request
#[derive(Debug, Deserialize, ToSchema)]
pub struct DiscoverRequest {
    /// Market niche or brand name
    pub niche: String,
    /// Requesting brand, placed first in the result
    #[serde(default)]
    pub self_brand: Option<SelfBrand>,
}

/// Competitor discovery response
#[derive(Debug, Serialize, ToSchema)]
pub struct DiscoverResponse {
    /// Snapshot ID, absent when persistence failed
    pub run_id: Option<Uuid>,
    pub niche: String,
    pub candidates: Vec<Candidate>,
    pub discovery_source: String,
    pub validation_queries: u32,
}

/// Discover, validate and rank competitors for a niche
#[utoipa::path(
    post,
    path = "/v1/competitors/discover",
    request_body = DiscoverRequest,
    responses(
        (status = 200, description = "Competitors discovered", body = DiscoverResponse),
        (status = 400, description = "Blank niche", body = crate::api::error::ErrorResponse)
    ),
    tag = "competitors"
)]
#[post("/v1/competitors/discover")]
pub async fn discover_competitors(
    service: web::Data<CompetitorDiscoveryService>,
    repository: web::Data<RunRepository>,
    body: web::Json<DiscoverRequest>,
) -> Result<HttpResponse, ApiError> {
    let request = body.into_inner();

    let report = service
        .discover_and_validate(&request.niche, request.self_brand.as_ref())
        .await?;

    let run_id = save_snapshot(
        repository.get_ref(),
        RunKind::CompetitorDiscovery,
        &report.niche,
        &report,
    )
    .await;

    Ok(HttpResponse::Ok().json(DiscoverResponse {
        run_id,
        niche: report.niche,
        candidates: report.candidates,
        discovery_source: report.discovery_source,
        validation_queries: report.validation_queries,
    }))
}

/// Configure competitor routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(discover_competitors);
}
