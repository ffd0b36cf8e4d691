//! Data source identity and connection acquisition.
//!
//! A [`DataSource`] is the external collaborator the template acquires
//! connections from: a target identity plus parsed connection options.
//! Every connection it hands out is either single-use (closed after one
//! statement) or transaction-scoped (owned by the [`TransactionContext`]
//! that bound it).
//!
//! [`TransactionContext`]: crate::context::TransactionContext

use crate::error::{DbError, DbResult};
use sqlx::ConnectOptions;
use sqlx::any::AnyConnectOptions;
use sqlx::AnyConnection;
use std::fmt;
use std::sync::Once;
use tracing::debug;

static DRIVERS: Once = Once::new();

/// Identity of a database/connection source, used as a lookup key for
/// transaction bindings.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TargetId(String);

impl TargetId {
    /// Create a new target identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TargetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TargetId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for TargetId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// A source of database connections identified by a [`TargetId`].
#[derive(Debug, Clone)]
pub struct DataSource {
    target: TargetId,
    options: AnyConnectOptions,
}

impl DataSource {
    /// Create a data source from a connection URL.
    ///
    /// Supported URL schemes are `sqlite:`, `postgres:`, and `mysql:`.
    pub fn new(target: impl Into<TargetId>, url: &str) -> DbResult<Self> {
        DRIVERS.call_once(sqlx::any::install_default_drivers);
        let options = url
            .parse::<AnyConnectOptions>()
            .map_err(|e| DbError::configuration(format!("cannot parse URL '{url}'"), e))?;
        Ok(Self {
            target: target.into(),
            options,
        })
    }

    /// The identity of this data source.
    pub fn target(&self) -> &TargetId {
        &self.target
    }

    /// Open a fresh connection.
    ///
    /// The caller is responsible for closing it, directly or by handing it
    /// to a transaction context.
    pub async fn acquire(&self) -> DbResult<AnyConnection> {
        debug!(target_id = %self.target, "acquiring connection");
        self.options
            .connect()
            .await
            .map_err(|e| DbError::acquisition(self.target.as_str(), e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_target_id_display() {
        let target = TargetId::new("main");
        assert_eq!(target.to_string(), "main");
        assert_eq!(target.as_str(), "main");
    }

    #[test]
    fn test_target_id_equality() {
        assert_eq!(TargetId::from("a"), TargetId::new("a"));
        assert_ne!(TargetId::from("a"), TargetId::from("b"));
    }

    #[test]
    fn test_invalid_url_is_configuration_error() {
        let result = DataSource::new("bad", "not a url");
        assert!(matches!(result, Err(DbError::Configuration { .. })));
    }

    #[test]
    fn test_valid_sqlite_url() {
        let ds = DataSource::new("mem", "sqlite::memory:").unwrap();
        assert_eq!(ds.target().as_str(), "mem");
    }

    #[tokio::test]
    async fn test_acquire_opens_a_connection() {
        use sqlx::Connection;
        let ds = DataSource::new("mem", "sqlite::memory:").unwrap();
        let conn = ds.acquire().await.unwrap();
        conn.close().await.unwrap();
    }
}
