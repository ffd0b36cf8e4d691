//! Transaction context: per-unit-of-work registry of bound connections.
//!
//! A [`TransactionContext`] maps a [`TargetId`] to the connection backing
//! the currently active transaction for that target. It is an explicit
//! object owned by one logical unit of work (one task, one request) and
//! passed `&mut` into every template call, so no locking is needed and a
//! bound connection can never be used from two units of work at once.
//!
//! Connection ownership is split between two paths that must never overlap:
//! a connection is either bound here (the transaction owner closes it at
//! commit/rollback via [`TransactionContext::unbind_required`]) or held
//! exclusively by one statement execution as a [`ConnectionLease::Dedicated`].

use crate::datasource::{DataSource, TargetId};
use crate::error::{DbError, DbResult};
use sqlx::Connection;
use sqlx::AnyConnection;
use std::collections::HashMap;
use std::collections::hash_map::Entry;
use tracing::{debug, info, warn};

/// Registry of transaction-scoped connections for one unit of work.
#[derive(Default)]
pub struct TransactionContext {
    bindings: HashMap<TargetId, AnyConnection>,
}

impl TransactionContext {
    /// Create an empty context.
    pub fn new() -> Self {
        Self::default()
    }

    /// True iff a transaction binding exists for `target`.
    pub fn is_active(&self, target: &TargetId) -> bool {
        self.bindings.contains_key(target)
    }

    /// The connection bound to `target`, if a transaction is active for it.
    pub fn lookup(&mut self, target: &TargetId) -> Option<&mut AnyConnection> {
        self.bindings.get_mut(target)
    }

    /// Number of live bindings.
    pub fn bound_count(&self) -> usize {
        self.bindings.len()
    }

    /// Return the bound connection for the data source's target, acquiring
    /// and binding a new one if no transaction is active yet.
    ///
    /// After this call the target's connection is owned by the context;
    /// statement executions join it and never close it. The binding ends
    /// with [`TransactionContext::unbind_required`].
    pub async fn bind_required(&mut self, data_source: &DataSource) -> DbResult<&mut AnyConnection> {
        match self.bindings.entry(data_source.target().clone()) {
            Entry::Occupied(entry) => {
                debug!(target_id = %data_source.target(), "reusing bound connection");
                Ok(entry.into_mut())
            }
            Entry::Vacant(entry) => {
                let conn = data_source.acquire().await?;
                info!(target_id = %data_source.target(), "bound transactional connection");
                Ok(entry.insert(conn))
            }
        }
    }

    /// Close the connection bound to `target` and remove the binding.
    ///
    /// The binding is removed even when closing fails: a stuck binding
    /// would silently hijack every later statement against the target.
    /// Unbinding a target with no active transaction is a logged no-op.
    pub async fn unbind_required(&mut self, target: &TargetId) -> DbResult<()> {
        let Some(conn) = self.bindings.remove(target) else {
            warn!(target_id = %target, "unbind requested but no transaction is active");
            return Ok(());
        };
        conn.close()
            .await
            .map_err(|e| DbError::release(target.as_str(), e))?;
        info!(target_id = %target, "unbound transactional connection");
        Ok(())
    }

    /// Obtain a connection for one statement execution.
    ///
    /// Joins the bound connection if a transaction is active for the
    /// data source's target; otherwise acquires a dedicated connection
    /// without binding it. This call never starts a transaction.
    pub async fn acquire_supports<'tx>(
        &'tx mut self,
        data_source: &DataSource,
    ) -> DbResult<ConnectionLease<'tx>> {
        match self.bindings.get_mut(data_source.target()) {
            Some(conn) => {
                debug!(target_id = %data_source.target(), "joining active transaction");
                Ok(ConnectionLease::Transactional(conn))
            }
            None => {
                let conn = data_source.acquire().await?;
                Ok(ConnectionLease::Dedicated {
                    conn,
                    target: data_source.target().clone(),
                })
            }
        }
    }

    /// Close every bound connection and clear the registry.
    ///
    /// Teardown for the end of a unit of work. The first close failure is
    /// returned; remaining bindings are still closed best-effort.
    pub async fn close_all(&mut self) -> DbResult<()> {
        let mut first_failure = None;
        for (target, conn) in self.bindings.drain() {
            if let Err(e) = conn.close().await {
                warn!(target_id = %target, error = %e, "failed to close bound connection");
                if first_failure.is_none() {
                    first_failure = Some(DbError::release(target.as_str(), e));
                }
            }
        }
        match first_failure {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

impl Drop for TransactionContext {
    fn drop(&mut self) {
        if !self.bindings.is_empty() {
            warn!(
                bound = self.bindings.len(),
                "transaction context dropped with live bindings"
            );
        }
    }
}

/// A connection held for the duration of one statement execution.
///
/// The variant records who is responsible for closing the handle, so the
/// two acquisition paths can never both believe they own it.
pub enum ConnectionLease<'tx> {
    /// Borrowed from an active transaction; the transaction owner closes it.
    Transactional(&'tx mut AnyConnection),
    /// Owned exclusively by the current statement; closed on release.
    Dedicated {
        conn: AnyConnection,
        target: TargetId,
    },
}

impl ConnectionLease<'_> {
    /// The live connection behind this lease.
    pub fn connection(&mut self) -> &mut AnyConnection {
        match self {
            Self::Transactional(conn) => conn,
            Self::Dedicated { conn, .. } => conn,
        }
    }

    /// True iff this lease joined an active transaction.
    pub fn is_transactional(&self) -> bool {
        matches!(self, Self::Transactional(_))
    }

    /// Release the connection according to the policy it was acquired with:
    /// no-op for a transactional lease, close for a dedicated one.
    pub async fn release(self) -> DbResult<()> {
        match self {
            Self::Transactional(_) => Ok(()),
            Self::Dedicated { conn, target } => {
                debug!(target_id = %target, "closing dedicated connection");
                conn.close()
                    .await
                    .map_err(|e| DbError::release(target.as_str(), e))
            }
        }
    }
}
