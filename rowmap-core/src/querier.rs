use crate::{Result, Row, RowsAffected, Value, future, stream::TryStreamExt};
use futures::Stream;
use std::{collections::VecDeque, future::Future};

/// Capability to run parameterized statements, implemented by connections and transactions.
///
/// Placeholders in `sql` are numbered from 1 and bound to `args` in order.
pub trait Querier: Send {
    type Cursor<'c>: Cursor
    where
        Self: 'c;

    /// Execute a statement that returns no rows.
    fn execute(
        &mut self,
        sql: &str,
        args: &[Value],
    ) -> impl Future<Output = Result<RowsAffected>> + Send;

    /// Execute a statement and iterate over the returned rows.
    fn query(
        &mut self,
        sql: &str,
        args: &[Value],
    ) -> impl Future<Output = Result<Self::Cursor<'_>>> + Send;

    /// Execute a statement and return its first row, if any.
    fn query_row(
        &mut self,
        sql: &str,
        args: &[Value],
    ) -> impl Future<Output = Result<Option<Row>>> + Send {
        async move {
            let mut cursor = self.query(sql, args).await?;
            cursor.next().await
        }
    }
}

/// Forward-only iteration over the rows returned by a query.
pub trait Cursor: Send {
    /// Result column names, in order.
    fn columns(&self) -> &[String];
    /// Next row, `None` when exhausted.
    fn next(&mut self) -> impl Future<Output = Result<Option<Row>>> + Send;
}

/// Rows already materialized in memory.
#[derive(Default, Debug, Clone)]
pub struct RowSet {
    pub columns: Vec<String>,
    pub rows: VecDeque<Row>,
}

impl RowSet {
    pub fn new<S: Into<String>>(
        columns: impl IntoIterator<Item = S>,
        rows: impl IntoIterator<Item = Row>,
    ) -> Self {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
            rows: rows.into_iter().collect(),
        }
    }
}

impl Cursor for RowSet {
    fn columns(&self) -> &[String] {
        &self.columns
    }
    fn next(&mut self) -> impl Future<Output = Result<Option<Row>>> + Send {
        future::ready(Ok(self.rows.pop_front()))
    }
}

/// Adapts a stream of rows produced by a driver.
pub struct StreamCursor<S> {
    columns: Vec<String>,
    stream: S,
}

impl<S> StreamCursor<S>
where
    S: Stream<Item = Result<Row>> + Send + Unpin,
{
    pub fn new(columns: Vec<String>, stream: S) -> Self {
        Self { columns, stream }
    }
}

impl<S> Cursor for StreamCursor<S>
where
    S: Stream<Item = Result<Row>> + Send + Unpin,
{
    fn columns(&self) -> &[String] {
        &self.columns
    }
    fn next(&mut self) -> impl Future<Output = Result<Option<Row>>> + Send {
        self.stream.try_next()
    }
}
