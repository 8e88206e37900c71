//! Repository for analysis run database operations

use serde::Serialize;
use sqlx::PgPool;
use uuid::Uuid;

use super::DbError;
use super::models::{AnalysisRun, AnalysisRunRow, ListRunsQuery, PaginatedRuns, RunKind};

const DEFAULT_PAGE_SIZE: u32 = 20;
const MAX_PAGE_SIZE: u32 = 100;

/// Repository for analysis run snapshots
#[derive(Clone)]
pub struct RunRepository {
    pool: PgPool,
}

impl RunRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Persist a pipeline result and return the new run ID
    pub async fn save<T: Serialize>(
        &self,
        kind: RunKind,
        subject: &str,
        payload: &T,
    ) -> Result<Uuid, DbError> {
        let id = Uuid::new_v4();
        let payload =
            serde_json::to_value(payload).map_err(|e| DbError::Serialization(e.to_string()))?;

        sqlx::query(
            r#"
            INSERT INTO analysis_runs (id, kind, subject, payload)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(id)
        .bind(kind.as_str())
        .bind(subject)
        .bind(&payload)
        .execute(&self.pool)
        .await?;

        tracing::debug!(id = %id, kind = %kind, "Saved analysis run");
        Ok(id)
    }

    /// Get an analysis run by ID
    pub async fn get_by_id(&self, id: Uuid) -> Result<AnalysisRun, DbError> {
        let row: AnalysisRunRow = sqlx::query_as(
            r#"
            SELECT id, kind, subject, payload, created_at FROM analysis_runs WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| DbError::NotFound(id.to_string()))?;

        row.into_domain().map_err(DbError::Serialization)
    }

    /// List analysis runs, newest first, with an optional kind filter
    pub async fn list(&self, query: ListRunsQuery) -> Result<PaginatedRuns, DbError> {
        let (page, page_size) = page_bounds(query.page, query.page_size);
        let offset = page_offset(page, page_size);

        let where_clause = if query.kind.is_some() {
            "WHERE kind = $1"
        } else {
            ""
        };

        let count_query = format!(
            "SELECT COUNT(*) as count FROM analysis_runs {}",
            where_clause
        );

        let total_count: i64 = {
            let mut q = sqlx::query_scalar(&count_query);
            if let Some(kind) = query.kind {
                q = q.bind(kind.as_str());
            }
            q.fetch_one(&self.pool).await?
        };

        let select_query = format!(
            r#"
            SELECT id, kind, subject, payload, created_at FROM analysis_runs
            {}
            ORDER BY created_at DESC
            LIMIT {} OFFSET {}
            "#,
            where_clause, page_size, offset
        );

        let rows: Vec<AnalysisRunRow> = {
            let mut q = sqlx::query_as(&select_query);
            if let Some(kind) = query.kind {
                q = q.bind(kind.as_str());
            }
            q.fetch_all(&self.pool).await?
        };

        let runs: Vec<AnalysisRun> = rows
            .into_iter()
            .filter_map(|row| match row.into_domain() {
                Ok(run) => Some(run),
                Err(e) => {
                    tracing::warn!(error = %e, "Skipping unreadable analysis run");
                    None
                }
            })
            .collect();

        let total_pages = ((total_count as f64) / (page_size as f64)).ceil() as u32;

        Ok(PaginatedRuns {
            runs,
            page,
            page_size,
            total_count,
            total_pages,
        })
    }
}

/// Normalize 1-based paging parameters
fn page_bounds(page: Option<u32>, page_size: Option<u32>) -> (u32, u32) {
    let page = page.unwrap_or(1).max(1);
    let page_size = page_size.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE);
    (page, page_size)
}

/// Row offset of a 1-based page, widened so large page numbers cannot overflow
fn page_offset(page: u32, page_size: u32) -> u64 {
    (u64::from(page.max(1)) - 1) * u64::from(page_size)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_bounds() {
        assert_eq!(page_bounds(None, None), (1, 20));
        assert_eq!(page_bounds(Some(0), Some(0)), (1, 1));
        assert_eq!(page_bounds(Some(3), Some(500)), (3, 100));
    }

    #[test]
    fn test_page_offset() {
        assert_eq!(page_offset(1, 20), 0);
        assert_eq!(page_offset(3, 100), 200);

        let (page, page_size) = page_bounds(Some(u32::MAX), Some(100));
        assert_eq!(page_offset(page, page_size), (u64::from(u32::MAX) - 1) * 100);
    }
}
