//! Transaction-aware SQL statement template.
//!
//! This library executes parameterized SQL against a relational database
//! (SQLite, PostgreSQL, MySQL via the `sqlx` Any driver), maps result rows
//! into typed values, and manages connection lifetime transparently to
//! whether a transaction is active: a statement joins the connection bound
//! to an active transaction, or runs on a short-lived dedicated connection
//! that is always closed before the call returns.

pub mod context;
pub mod datasource;
pub mod error;
pub mod executor;
#[macro_use]
pub mod params;
pub mod row;
pub mod template;

pub use context::{ConnectionLease, TransactionContext};
pub use datasource::{DataSource, TargetId};
pub use error::{DbError, DbResult};
pub use executor::StatementExecutor;
pub use params::SqlParam;
pub use row::{CollectRows, FirstRow, ResultSetExtractor, RowCursor, RowMapper};
pub use template::SqlTemplate;
