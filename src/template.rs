//! Convenience facade over the statement executor.

use crate::context::TransactionContext;
use crate::datasource::DataSource;
use crate::error::DbResult;
use crate::executor::StatementExecutor;
use crate::params::SqlParam;
use crate::row::{CollectRows, FirstRow, RowMapper};

/// High-level query/update interface for one data source.
///
/// Calls are independent; each awaits driver I/O with no internal timeout
/// or retry. The passed [`TransactionContext`] decides whether a call runs
/// on a bound transactional connection or a short-lived dedicated one.
///
/// # Example
///
/// ```ignore
/// let ds = DataSource::new("main", "sqlite:app.db")?;
/// let template = SqlTemplate::new(ds);
/// let mut ctx = TransactionContext::new();
///
/// let names: Vec<String> = template
///     .query(&mut ctx, "SELECT name FROM users WHERE age > ?", |row| row.try_get(0), &params![18])
///     .await?;
/// ```
pub struct SqlTemplate {
    executor: StatementExecutor,
}

impl SqlTemplate {
    /// Create a template over the given data source.
    pub fn new(data_source: DataSource) -> Self {
        Self {
            executor: StatementExecutor::new(data_source),
        }
    }

    /// The data source this template executes against.
    pub fn data_source(&self) -> &DataSource {
        self.executor.data_source()
    }

    /// Execute a query and map every result row, in fetch order.
    pub async fn query<T>(
        &self,
        ctx: &mut TransactionContext,
        sql: &str,
        mapper: impl RowMapper<T>,
        params: &[SqlParam],
    ) -> DbResult<Vec<T>> {
        self.executor
            .read(ctx, sql, params, CollectRows::new(mapper))
            .await
    }

    /// Execute a query and map at most the first result row.
    ///
    /// Returns `None` when the result set is empty.
    pub async fn query_single_row<T>(
        &self,
        ctx: &mut TransactionContext,
        sql: &str,
        mapper: impl RowMapper<T>,
        params: &[SqlParam],
    ) -> DbResult<Option<T>> {
        self.executor
            .read(ctx, sql, params, FirstRow::new(mapper))
            .await
    }

    /// Execute a non-row-returning statement and return the number of
    /// affected rows.
    pub async fn update(
        &self,
        ctx: &mut TransactionContext,
        sql: &str,
        params: &[SqlParam],
    ) -> DbResult<u64> {
        self.executor.update(ctx, sql, params).await
    }
}
