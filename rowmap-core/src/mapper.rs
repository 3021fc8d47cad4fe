use crate::{
    AsValue, Connection, Criteria, DEFAULT_PARAMETER_PREFIX, GenericSqlWriter, Hook, MappingError,
    Querier, QueryLogger, Record, Result, Row, RowsAffected, SqlWriter, Statement, Transaction,
    Value, describe, dispatch_hook, scan_rows, truncate_long,
};
use anyhow::Context as _;
use std::{
    fmt::{self, Debug, Formatter},
    sync::Arc,
    time::Instant,
};

/// Entry point of every mapping operation, carrying the configuration they share: the SQL
/// dialect, the placeholder prefix and the optional query logger.
///
/// Cheap to clone. Changing the configuration only affects the statements synthesized afterwards.
#[derive(Clone)]
pub struct Mapper {
    writer: Arc<dyn SqlWriter>,
    parameter_prefix: String,
    logger: Option<Arc<dyn QueryLogger>>,
}

impl Default for Mapper {
    fn default() -> Self {
        Self::new(GenericSqlWriter)
    }
}

impl Debug for Mapper {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("Mapper")
            .field("parameter_prefix", &self.parameter_prefix)
            .field("logger", &self.logger.is_some())
            .finish()
    }
}

impl Mapper {
    pub fn new(writer: impl SqlWriter + 'static) -> Self {
        Self {
            writer: Arc::new(writer),
            parameter_prefix: DEFAULT_PARAMETER_PREFIX.into(),
            logger: None,
        }
    }
    pub fn with_parameter_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.set_parameter_prefix(prefix);
        self
    }
    pub fn with_query_logger(mut self, logger: impl QueryLogger + 'static) -> Self {
        self.set_query_logger(logger);
        self
    }
    pub fn set_parameter_prefix(&mut self, prefix: impl Into<String>) {
        self.parameter_prefix = prefix.into();
    }
    /// Replace the current query logger, if any.
    pub fn set_query_logger(&mut self, logger: impl QueryLogger + 'static) {
        self.logger = Some(Arc::new(logger));
    }
    pub fn clear_query_logger(&mut self) {
        self.logger = None;
    }
    pub fn writer(&self) -> &dyn SqlWriter {
        self.writer.as_dyn()
    }
    pub fn parameter_prefix(&self) -> &str {
        &self.parameter_prefix
    }

    fn log_before(&self, statement: &Statement) {
        log::debug!("{}", truncate_long!(statement.sql));
        if let Some(logger) = &self.logger {
            logger.log_query(&statement.sql, &statement.args);
        }
    }

    fn log_after<T>(&self, statement: &Statement, start: Instant, result: &Result<T>) {
        if let Some(logger) = &self.logger {
            logger.log_query_after(
                &statement.sql,
                &statement.args,
                start.elapsed(),
                result.as_ref().err(),
            );
        }
    }

    async fn execute<Q: Querier>(
        &self,
        querier: &mut Q,
        operation: &'static str,
        statement: &Statement,
    ) -> Result<RowsAffected> {
        self.log_before(statement);
        let start = Instant::now();
        let result = querier.execute(&statement.sql, &statement.args).await;
        self.log_after(statement, start, &result);
        result.map_err(|e| MappingError::execution(operation, e).into())
    }

    async fn query_row<Q: Querier>(
        &self,
        querier: &mut Q,
        operation: &'static str,
        statement: &Statement,
    ) -> Result<Option<Row>> {
        self.log_before(statement);
        let start = Instant::now();
        let result = querier.query_row(&statement.sql, &statement.args).await;
        self.log_after(statement, start, &result);
        result.map_err(|e| MappingError::execution(operation, e).into())
    }

    async fn fetch_into<R: Record, Q: Querier>(
        &self,
        querier: &mut Q,
        operation: &'static str,
        statement: &Statement,
        out: &mut Vec<R>,
    ) -> Result<()> {
        self.log_before(statement);
        let start = Instant::now();
        let result = match querier.query(&statement.sql, &statement.args).await {
            Ok(mut cursor) => scan_rows(&mut cursor, out).await,
            Err(e) => Err(MappingError::execution(operation, e).into()),
        };
        // Decoding failures are part of the outcome seen by the logger.
        self.log_after(statement, start, &result);
        result
    }

    /// Decode every row of `select * from <table> <condition>` into `out`.
    ///
    /// Records decoded before a failure stay in `out`.
    pub async fn find_where_into<R: Record, Q: Querier>(
        &self,
        querier: &mut Q,
        out: &mut Vec<R>,
        condition: &str,
        args: &[Value],
    ) -> Result<()> {
        let statement = self.select_statement::<R>(condition, args)?;
        self.fetch_into(querier, "find", &statement, out)
            .await
            .with_context(|| format!("While finding `{}` rows", R::NAME))
    }

    /// Every record matching `condition`, for example `where name = $1`.
    pub async fn find_where<R: Record, Q: Querier>(
        &self,
        querier: &mut Q,
        condition: &str,
        args: &[Value],
    ) -> Result<Vec<R>> {
        let mut result = Vec::new();
        self.find_where_into(querier, &mut result, condition, args)
            .await?;
        Ok(result)
    }

    pub async fn find_all<R: Record, Q: Querier>(&self, querier: &mut Q) -> Result<Vec<R>> {
        self.find_where(querier, "", &[]).await
    }

    /// First record matching `condition`, [`MappingError::NoRows`] when none does.
    pub async fn find_first_where<R: Record, Q: Querier>(
        &self,
        querier: &mut Q,
        condition: &str,
        args: &[Value],
    ) -> Result<R> {
        let statement = self.select_first_statement::<R>(condition, args)?;
        let mut result = Vec::with_capacity(1);
        self.fetch_into(querier, "find first", &statement, &mut result)
            .await
            .with_context(|| format!("While finding the first `{}` row", R::NAME))?;
        match result.into_iter().next() {
            Some(record) => Ok(record),
            None => Err(MappingError::NoRows {
                table: describe::<R>()?.table.clone(),
            }
            .into()),
        }
    }

    pub async fn find_first<R: Record, Q: Querier>(&self, querier: &mut Q) -> Result<R> {
        self.find_first_where(querier, "", &[]).await
    }

    /// Number of rows matching `condition`.
    pub async fn count_where<R: Record, Q: Querier>(
        &self,
        querier: &mut Q,
        condition: &str,
        args: &[Value],
    ) -> Result<u64> {
        let statement = self.count_statement::<R>(condition, args)?;
        let row = self
            .query_row(querier, "count", &statement)
            .await
            .with_context(|| format!("While counting `{}` rows", R::NAME))?;
        let Some(value) = row.and_then(|v| v.into_vec().into_iter().next()) else {
            return Err(MappingError::NoRows {
                table: describe::<R>()?.table.clone(),
            }
            .into());
        };
        u64::try_from_value(value).context("Unexpected count result")
    }

    pub async fn count_all<R: Record, Q: Querier>(&self, querier: &mut Q) -> Result<u64> {
        self.count_where::<R, Q>(querier, "", &[]).await
    }

    /// Records matching `criteria`, in its order and window.
    pub async fn find_matching<R: Record, Q: Querier>(
        &self,
        querier: &mut Q,
        criteria: &Criteria,
    ) -> Result<Vec<R>> {
        let condition = criteria.render(self);
        self.find_where(querier, &condition.sql, &condition.args)
            .await
    }

    /// First record matching `criteria`, its offset and limit are ignored.
    pub async fn find_first_matching<R: Record, Q: Querier>(
        &self,
        querier: &mut Q,
        criteria: &Criteria,
    ) -> Result<R> {
        let condition = criteria.render_filter_and_order(self);
        self.find_first_where(querier, &condition.sql, &condition.args)
            .await
    }

    /// Number of rows matching the filter of `criteria`.
    pub async fn count_matching<R: Record, Q: Querier>(
        &self,
        querier: &mut Q,
        criteria: &Criteria,
    ) -> Result<u64> {
        let condition = criteria.render_filter(self);
        self.count_where::<R, Q>(querier, &condition.sql, &condition.args)
            .await
    }

    /// Insert `record`.
    ///
    /// When the identity is the implicit `id` field and it is zero, the store generates it and
    /// the generated value is assigned back to `record`.
    pub async fn create<R: Record, Q: Querier>(
        &self,
        querier: &mut Q,
        record: &mut R,
    ) -> Result<()> {
        dispatch_hook(Hook::BeforeCreate, record, querier).await?;
        let insert = self.insert_statement(record)?;
        self.execute(querier, "create", &insert.statement)
            .await
            .with_context(|| format!("While creating a `{}` record", R::NAME))?;
        if let Some(field) = insert.generated_identity {
            let statement = self.generated_identity_statement();
            let row = self
                .query_row(querier, "generated identity", &statement)
                .await?;
            let Some(value) = row.and_then(|v| v.into_vec().into_iter().next()) else {
                return Err(MappingError::NoRows {
                    table: describe::<R>()?.table.clone(),
                })
                .context("The store did not return the generated identity");
            };
            record.set(&field.path, value).with_context(|| {
                format!("Cannot assign the generated identity to `{}`", field.name)
            })?;
        }
        dispatch_hook(Hook::AfterCreate, record, querier).await
    }

    /// Update the fields of `record` that differ from the stored row with the same identity.
    ///
    /// Nothing is executed when no field changed.
    pub async fn save<R: Record, Q: Querier>(
        &self,
        querier: &mut Q,
        record: &mut R,
    ) -> Result<()> {
        dispatch_hook(Hook::BeforeSave, record, querier).await?;
        let filter = self.identity_where(record)?;
        let snapshot: R = self
            .find_first_where(querier, &filter.sql, &filter.args)
            .await
            .with_context(|| format!("Couldn't find the stored `{}` record", R::NAME))?;
        let Some(statement) = self.update_statement(record, &snapshot)? else {
            log::debug!("`{}` record unchanged, nothing to save", R::NAME);
            return Ok(());
        };
        self.execute(querier, "save", &statement)
            .await
            .with_context(|| format!("While saving a `{}` record", R::NAME))?;
        dispatch_hook(Hook::AfterSave, record, querier).await
    }

    /// [`Mapper::save`] inside its own transaction, rolled back on any failure.
    pub async fn save_with_transaction<R: Record, C: Connection>(
        &self,
        connection: &mut C,
        record: &mut R,
    ) -> Result<()> {
        let mut transaction = connection
            .begin()
            .await
            .map_err(|e| MappingError::execution("begin", e))?;
        let mut result = self.save(&mut transaction, record).await;
        if result.is_ok() {
            result = transaction
                .commit()
                .await
                .map_err(|e| MappingError::execution("commit", e).into());
        }
        if result.is_err() {
            if let Err(e) = transaction.rollback().await {
                log::error!("Rollback after a failed save of `{}` failed: {e:#}", R::NAME);
            }
        }
        result
    }

    /// Insert `record` with its identity, overwriting the stored row having the same identity.
    pub async fn replace<R: Record, Q: Querier>(
        &self,
        querier: &mut Q,
        record: &mut R,
    ) -> Result<()> {
        dispatch_hook(Hook::BeforeReplace, record, querier).await?;
        let statement = self.replace_statement(record)?;
        self.execute(querier, "replace", &statement)
            .await
            .with_context(|| format!("While replacing a `{}` record", R::NAME))?;
        dispatch_hook(Hook::AfterReplace, record, querier).await
    }

    /// Delete the stored row having the identity of `record`.
    pub async fn delete<R: Record, Q: Querier>(
        &self,
        querier: &mut Q,
        record: &mut R,
    ) -> Result<()> {
        dispatch_hook(Hook::BeforeDelete, record, querier).await?;
        let statement = self.delete_statement(record)?;
        self.execute(querier, "delete", &statement)
            .await
            .with_context(|| format!("While deleting a `{}` record", R::NAME))?;
        dispatch_hook(Hook::AfterDelete, record, querier).await
    }
}
