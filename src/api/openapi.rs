//! OpenAPI specification endpoints

use actix_web::{HttpResponse, Responder, get};
use utoipa::OpenApi;

use crate::api::{competitors, error, health, keywords, runs};
use crate::db::models::{AnalysisRun, RunKind};
use crate::model::{
    Candidate, CitationEvidence, CompanyProfile, GapCompetitor, GapReport, KeywordRecord,
    KeywordRequest, KeywordSource, MissingKeywordCluster, Provenance, SelfBrand, SourceStatus,
    SourceStatusReport,
};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "GEO Market Intelligence API",
        description = "Competitor discovery with citation-validated ranking, and keyword aggregation"
    ),
    paths(
        competitors::discover_competitors,
        keywords::aggregate_keywords,
        runs::list_runs,
        runs::get_run,
        health::liveness,
        health::readiness,
    ),
    components(schemas(
        competitors::DiscoverRequest,
        competitors::DiscoverResponse,
        keywords::KeywordResponse,
        runs::RunListResponse,
        runs::RunSummary,
        error::ErrorResponse,
        health::HealthStatus,
        health::ReadinessStatus,
        health::DependencyHealth,
        AnalysisRun,
        RunKind,
        Candidate,
        CitationEvidence,
        Provenance,
        SelfBrand,
        KeywordRequest,
        KeywordRecord,
        KeywordSource,
        SourceStatus,
        SourceStatusReport,
        CompanyProfile,
        GapReport,
        GapCompetitor,
        MissingKeywordCluster,
    )),
    tags(
        (name = "competitors", description = "Competitor discovery and ranking"),
        (name = "keywords", description = "Keyword aggregation"),
        (name = "runs", description = "Persisted analysis snapshots"),
        (name = "health", description = "Liveness and readiness probes")
    )
)]
pub struct ApiDoc;

/// Serve OpenAPI JSON specification
#[get("/openapi.json")]
pub async fn openapi_json() -> impl Responder {
    HttpResponse::Ok().json(ApiDoc::openapi())
}

/// Serve OpenAPI YAML specification
#[get("/openapi.yaml")]
pub async fn openapi_yaml() -> impl Responder {
    match ApiDoc::openapi().to_yaml() {
        Ok(yaml) => HttpResponse::Ok().content_type("text/yaml").body(yaml),
        Err(e) => {
            tracing::error!(error = %e, "Failed to render OpenAPI YAML");
            HttpResponse::InternalServerError().finish()
        }
    }
}

/// Configure OpenAPI routes
pub fn configure(cfg: &mut actix_web::web::ServiceConfig) {
    cfg.service(openapi_json).service(openapi_yaml);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_lists_every_route() {
        let doc = ApiDoc::openapi();
        for path in [
            "/v1/competitors/discover",
            "/v1/keywords/aggregate",
            "/v1/runs",
            "/v1/runs/{id}",
            "/health/live",
            "/health/ready",
        ] {
            assert!(doc.paths.paths.contains_key(path), "missing {}", path);
        }
    }
}
