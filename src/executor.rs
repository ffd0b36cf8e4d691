//! Statement execution engine.
//!
//! Executes one SQL statement with positionally bound parameters and a
//! caller-supplied result extractor, using transaction-aware connection
//! acquisition and release. Driver failures are logged at the point of
//! detection and wrapped in a single uniform [`DbError::DataAccess`] kind;
//! the connection is released on every exit path, with the primary error
//! always taking precedence over a release failure.

use crate::context::TransactionContext;
use crate::datasource::DataSource;
use crate::error::{DbError, DbResult};
use crate::params::{SqlParam, bind_param};
use crate::row::{ResultSetExtractor, RowCursor};
use sqlx::Executor;
use sqlx::AnyConnection;
use tracing::{debug, error, warn};

/// Executes statements against one data source.
pub struct StatementExecutor {
    data_source: DataSource,
}

impl StatementExecutor {
    /// Create an executor for the given data source.
    pub fn new(data_source: DataSource) -> Self {
        Self { data_source }
    }

    /// The data source this executor acquires connections from.
    pub fn data_source(&self) -> &DataSource {
        &self.data_source
    }

    /// Execute a row-returning statement and hand the result cursor to
    /// `extractor`.
    pub async fn read<R>(
        &self,
        ctx: &mut TransactionContext,
        sql: &str,
        params: &[SqlParam],
        extractor: impl ResultSetExtractor<R>,
    ) -> DbResult<R> {
        debug!(
            target_id = %self.data_source.target(),
            sql = %sql,
            params = params.len(),
            "executing query"
        );
        let mut lease = ctx.acquire_supports(&self.data_source).await?;
        let outcome = fetch_result(lease.connection(), sql, params, &extractor).await;
        let outcome = outcome.map_err(|source| {
            error!(sql = %sql, error = %source, "statement execution failed");
            DbError::data_access(sql, source)
        });
        settle(outcome, lease.release().await)
    }

    /// Execute a non-row-returning statement and return the affected-row
    /// count.
    pub async fn update(
        &self,
        ctx: &mut TransactionContext,
        sql: &str,
        params: &[SqlParam],
    ) -> DbResult<u64> {
        debug!(
            target_id = %self.data_source.target(),
            sql = %sql,
            params = params.len(),
            "executing update"
        );
        let mut lease = ctx.acquire_supports(&self.data_source).await?;
        let outcome = run_update(lease.connection(), sql, params).await;
        let outcome = outcome.map_err(|source| {
            error!(sql = %sql, error = %source, "statement execution failed");
            DbError::data_access(sql, source)
        });
        settle(outcome, lease.release().await)
    }
}

/// Combine a statement outcome with the connection-release outcome.
/// A release failure is surfaced after success but never replaces the
/// primary error.
fn settle<R>(outcome: DbResult<R>, released: DbResult<()>) -> DbResult<R> {
    match (outcome, released) {
        (Ok(value), Ok(())) => Ok(value),
        (Ok(_), Err(release_err)) => Err(release_err),
        (Err(primary), Ok(())) => Err(primary),
        (Err(primary), Err(release_err)) => {
            warn!(error = %release_err, "connection release failed after statement error");
            Err(primary)
        }
    }
}

async fn fetch_result<R>(
    conn: &mut AnyConnection,
    sql: &str,
    params: &[SqlParam],
    extractor: &impl ResultSetExtractor<R>,
) -> Result<R, sqlx::Error> {
    // Zero parameters executes the raw SQL text; some statements cannot be
    // prepared and there is nothing to bind.
    let mut cursor = if params.is_empty() {
        RowCursor::new(conn.fetch(sql))
    } else {
        let mut query = sqlx::query(sql);
        for param in params {
            query = bind_param(query, param);
        }
        RowCursor::new(query.fetch(conn))
    };
    extractor.extract(&mut cursor).await
}

async fn run_update(
    conn: &mut AnyConnection,
    sql: &str,
    params: &[SqlParam],
) -> Result<u64, sqlx::Error> {
    let result = if params.is_empty() {
        conn.execute(sql).await?
    } else {
        let mut query = sqlx::query(sql);
        for param in params {
            query = bind_param(query, param);
        }
        query.execute(&mut *conn).await?
    };
    Ok(result.rows_affected())
}
