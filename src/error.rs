//! Error types for the SQL template.
//!
//! This module defines all error types using `thiserror`. Every driver-level
//! failure is translated into a single uniform kind so callers never depend
//! on vendor-specific error types; the underlying `sqlx::Error` is preserved
//! as the source for diagnostics.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DbError {
    /// Acquiring a connection from the data source failed.
    #[error("failed to acquire connection for target '{target}'")]
    ConnectionAcquisition {
        target: String,
        #[source]
        source: sqlx::Error,
    },

    /// A statement failed during preparation, binding, execution, or fetch.
    ///
    /// This is deliberately a single kind: callers cannot distinguish a
    /// syntax error from a connectivity error through this layer.
    #[error("statement execution failed: {context}")]
    DataAccess {
        /// The SQL text that was being executed.
        context: String,
        #[source]
        source: sqlx::Error,
    },

    /// Closing a connection or unbinding a transactional resource failed.
    #[error("failed to release connection for target '{target}'")]
    ResourceRelease {
        target: String,
        #[source]
        source: sqlx::Error,
    },

    /// The connection URL could not be parsed.
    #[error("invalid data source configuration: {message}")]
    Configuration {
        message: String,
        #[source]
        source: sqlx::Error,
    },
}

impl DbError {
    /// Create a connection acquisition error.
    pub fn acquisition(target: impl Into<String>, source: sqlx::Error) -> Self {
        Self::ConnectionAcquisition {
            target: target.into(),
            source,
        }
    }

    /// Create a data access error wrapping a driver failure.
    pub fn data_access(context: impl Into<String>, source: sqlx::Error) -> Self {
        Self::DataAccess {
            context: context.into(),
            source,
        }
    }

    /// Create a resource release error.
    pub fn release(target: impl Into<String>, source: sqlx::Error) -> Self {
        Self::ResourceRelease {
            target: target.into(),
            source,
        }
    }

    /// Create a configuration error.
    pub fn configuration(message: impl Into<String>, source: sqlx::Error) -> Self {
        Self::Configuration {
            message: message.into(),
            source,
        }
    }

    /// Get the vendor SQLSTATE code of the wrapped database error, if any.
    ///
    /// For logging and diagnostics only; control flow should never branch
    /// on vendor codes through this layer.
    pub fn sql_state(&self) -> Option<String> {
        let source = match self {
            Self::ConnectionAcquisition { source, .. } => source,
            Self::DataAccess { source, .. } => source,
            Self::ResourceRelease { source, .. } => source,
            Self::Configuration { source, .. } => source,
        };
        match source {
            sqlx::Error::Database(db_err) => db_err.code().map(|c| c.to_string()),
            _ => None,
        }
    }
}

/// Result type alias for template operations.
pub type DbResult<T> = Result<T, DbError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = DbError::acquisition("main", sqlx::Error::PoolClosed);
        assert!(err.to_string().contains("main"));
        assert!(err.to_string().contains("acquire"));
    }

    #[test]
    fn test_data_access_carries_sql_context() {
        let err = DbError::data_access("SELECT 1", sqlx::Error::RowNotFound);
        assert!(err.to_string().contains("SELECT 1"));
    }

    #[test]
    fn test_source_is_preserved() {
        use std::error::Error as _;
        let err = DbError::data_access("SELECT 1", sqlx::Error::RowNotFound);
        assert!(err.source().is_some());
    }

    #[test]
    fn test_sql_state_absent_for_non_database_errors() {
        let err = DbError::release("main", sqlx::Error::WorkerCrashed);
        assert_eq!(err.sql_state(), None);
    }
}
