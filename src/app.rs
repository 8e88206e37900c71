//! Application state and service initialization
//!
//! This module centralizes all service initialization and dependency injection,
//! making it easier to manage the application lifecycle and test services.

use std::sync::Arc;

use sqlx::PgPool;

use crate::db::repository::RunRepository;
use crate::model::Config;
use crate::service::{
    CompetitorDiscoveryService, IntelCache, KeywordAggregationService, KnowledgeOracle,
    LlmClient, LlmTextGenerator, PerplexityClient, SerpApiClient, SerpSearch, TextGenerator,
};

/// Application state containing all services and shared resources
pub struct AppState {
    /// Database connection pool
    pub db_pool: PgPool,
    /// Redis cache (optional)
    pub cache: Option<IntelCache>,
    /// Snapshot persistence
    pub run_repository: RunRepository,
    /// Competitor discovery and ranking
    pub discovery_service: Arc<CompetitorDiscoveryService>,
    /// Keyword aggregation
    pub keyword_service: Arc<KeywordAggregationService>,
}

impl AppState {
    /// Initialize all services and build application state
    ///
    /// This performs:
    /// 1. Database connection and schema initialization
    /// 2. Redis cache initialization (optional)
    /// 3. LLM client initialization (requires OPENAI_API_KEY)
    /// 4. Service dependency graph construction
    pub async fn new(config: Config) -> Result<Self, AppError> {
        let db_pool = crate::db::create_pool()
            .await
            .map_err(|e| AppError::DatabaseInit(e.to_string()))?;

        crate::db::init_schema(&db_pool)
            .await
            .map_err(|e| AppError::DatabaseInit(e.to_string()))?;

        // Optional: a missing Redis only disables caching
        let cache = match IntelCache::new().await {
            Ok(cache) => {
                tracing::info!("Redis cache enabled");
                Some(cache)
            }
            Err(e) => {
                tracing::warn!(error = %e, "Redis cache unavailable, running without cache");
                None
            }
        };

        let api_key = std::env::var("OPENAI_API_KEY")
            .map_err(|_| AppError::MissingConfig("OPENAI_API_KEY"))?;

        let llm_client = LlmClient::new(&api_key)
            .map_err(|_| AppError::InvalidConfig("Invalid OPENAI_API_KEY"))?;

        let text_generator = LlmTextGenerator::new(llm_client);
        let discovery_model = text_generator.discovery_model().to_string();
        let generator: Arc<dyn TextGenerator> = Arc::new(text_generator);

        let oracle: Arc<dyn KnowledgeOracle> = Arc::new(PerplexityClient::new(&config.oracle));
        let serp: Arc<dyn SerpSearch> = Arc::new(SerpApiClient::new(&config.serp, cache.clone()));

        let discovery_service = Arc::new(CompetitorDiscoveryService::new(
            oracle,
            Arc::clone(&generator),
            cache.clone(),
            &discovery_model,
        ));

        let keyword_service = Arc::new(KeywordAggregationService::new(
            serp,
            generator,
            &config.serp.location,
            config.serp.max_keywords,
        ));

        Ok(Self {
            run_repository: RunRepository::new(db_pool.clone()),
            db_pool,
            cache,
            discovery_service,
            keyword_service,
        })
    }
}

/// Application-level errors
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum AppError {
    /// Database initialization failed
    #[error("Database initialization failed: {0}")]
    DatabaseInit(String),

    /// Missing required configuration
    #[error("Missing required configuration: {0}")]
    MissingConfig(&'static str),

    /// Invalid configuration value
    #[error("Invalid configuration: {0}")]
    InvalidConfig(&'static str),
}
