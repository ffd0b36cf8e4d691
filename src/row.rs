//! Row mapping and result-set consumption.
//!
//! The executor hands a [`RowCursor`] to a [`ResultSetExtractor`], which
//! drives it and produces the call's return value. Extractors come in two
//! flavors mirroring the facade's query methods: [`CollectRows`] maps every
//! row in fetch order, [`FirstRow`] consumes at most one row.

use futures_util::StreamExt;
use futures_util::stream::BoxStream;
use sqlx::any::AnyRow;

/// Maps one fetched row to a domain value.
///
/// Implemented for any `Fn(&AnyRow) -> Result<T, sqlx::Error>` closure, so
/// callers typically write `|row| row.try_get(0)`. A mapper must not
/// advance the cursor; only the extractor does, between invocations.
pub trait RowMapper<T> {
    fn map_row(&self, row: &AnyRow) -> Result<T, sqlx::Error>;
}

impl<T, F> RowMapper<T> for F
where
    F: Fn(&AnyRow) -> Result<T, sqlx::Error>,
{
    fn map_row(&self, row: &AnyRow) -> Result<T, sqlx::Error> {
        self(row)
    }
}

/// A forward-only cursor over a statement's result rows, delivered in the
/// driver's native fetch order.
pub struct RowCursor<'c> {
    stream: BoxStream<'c, Result<AnyRow, sqlx::Error>>,
}

impl<'c> RowCursor<'c> {
    pub(crate) fn new(stream: BoxStream<'c, Result<AnyRow, sqlx::Error>>) -> Self {
        Self { stream }
    }

    /// Fetch the next row, or `None` when the result set is exhausted.
    pub async fn next_row(&mut self) -> Result<Option<AnyRow>, sqlx::Error> {
        self.stream.next().await.transpose()
    }
}

/// Consumes a statement's result cursor and produces the call's value.
pub trait ResultSetExtractor<R> {
    fn extract(
        &self,
        cursor: &mut RowCursor<'_>,
    ) -> impl Future<Output = Result<R, sqlx::Error>>;
}

/// Extractor that maps every row, in fetch order, into a `Vec`.
///
/// Never yields a partial list: the first row or mapper failure aborts
/// the whole call.
pub struct CollectRows<M> {
    mapper: M,
}

impl<M> CollectRows<M> {
    pub fn new(mapper: M) -> Self {
        Self { mapper }
    }
}

impl<T, M: RowMapper<T>> ResultSetExtractor<Vec<T>> for CollectRows<M> {
    async fn extract(&self, cursor: &mut RowCursor<'_>) -> Result<Vec<T>, sqlx::Error> {
        let mut values = Vec::new();
        while let Some(row) = cursor.next_row().await? {
            values.push(self.mapper.map_row(&row)?);
        }
        Ok(values)
    }
}

/// Extractor that maps at most the first row; zero rows is `None`, not an
/// error. No further rows are fetched from the cursor.
pub struct FirstRow<M> {
    mapper: M,
}

impl<M> FirstRow<M> {
    pub fn new(mapper: M) -> Self {
        Self { mapper }
    }
}

impl<T, M: RowMapper<T>> ResultSetExtractor<Option<T>> for FirstRow<M> {
    async fn extract(&self, cursor: &mut RowCursor<'_>) -> Result<Option<T>, sqlx::Error> {
        match cursor.next_row().await? {
            Some(row) => Ok(Some(self.mapper.map_row(&row)?)),
            None => Ok(None),
        }
    }
}
