use crate::{
    FieldDescriptor, Mapper, Record, Result, Statement, TypeDescriptor, Value, describe,
    writer::{Context, Fragment},
};
use anyhow::Context as _;

/// Values of `fields` read from `record`, paired with their column.
fn column_values<'d, R: Record>(
    record: &R,
    fields: impl IntoIterator<Item = &'d FieldDescriptor>,
) -> Result<Vec<(&'d str, Value)>> {
    fields
        .into_iter()
        .map(|f| {
            record
                .get(&f.path)
                .map(|v| (f.column.as_str(), v))
                .with_context(|| format!("Cannot read the field `{}` of `{}`", f.name, R::NAME))
        })
        .collect()
}

/// Insert synthesized by [`Mapper::insert_statement`].
#[derive(Debug, Clone, PartialEq)]
pub struct InsertStatement {
    pub statement: Statement,
    /// Field receiving the identity generated by the store, when it was left out of the insert.
    pub generated_identity: Option<&'static FieldDescriptor>,
}

/// Pure statement synthesis: nothing here talks to a querier.
impl Mapper {
    fn context(&self, fragment: Fragment) -> Context {
        Context::new(fragment, self.parameter_prefix())
    }

    /// `select * from <table> <condition>`, placeholders in `condition` are numbered by the caller.
    pub fn select_statement<R: Record>(
        &self,
        condition: &str,
        args: &[Value],
    ) -> Result<Statement> {
        let descriptor = describe::<R>()?;
        let mut context = self.context(Fragment::None);
        let mut sql = String::with_capacity(64 + condition.len());
        self.writer()
            .write_select(&mut context, &mut sql, &descriptor.table, condition);
        Ok(Statement::new(sql, args.to_vec()))
    }

    /// Like [`Mapper::select_statement`], limited to the first row.
    pub fn select_first_statement<R: Record>(
        &self,
        condition: &str,
        args: &[Value],
    ) -> Result<Statement> {
        let mut limit = String::new();
        self.writer()
            .write_limit(&mut self.context(Fragment::None), &mut limit, Some(1), None);
        let condition = if condition.is_empty() {
            limit
        } else {
            format!("{condition} {limit}")
        };
        self.select_statement::<R>(&condition, args)
    }

    /// `select count(*) from <table> <condition>`.
    pub fn count_statement<R: Record>(
        &self,
        condition: &str,
        args: &[Value],
    ) -> Result<Statement> {
        let descriptor = describe::<R>()?;
        let mut context = self.context(Fragment::None);
        let mut sql = String::with_capacity(64 + condition.len());
        self.writer()
            .write_count(&mut context, &mut sql, &descriptor.table, condition);
        Ok(Statement::new(sql, args.to_vec()))
    }

    /// `where a = $1 and b = $2` over the identity fields of `record`, with its arguments.
    pub fn identity_where<R: Record>(&self, record: &R) -> Result<Statement> {
        let descriptor = describe::<R>()?;
        let identity = column_values(record, descriptor.require_identity()?)?;
        let mut context = self.context(Fragment::None);
        let mut sql = String::new();
        self.writer()
            .write_identity_where(&mut context, &mut sql, identity);
        Ok(Statement::new(sql, context.args))
    }

    /// Insert of every included field, except a zero valued default identity which is left to
    /// the store to generate.
    pub fn insert_statement<R: Record>(&self, record: &R) -> Result<InsertStatement> {
        let descriptor = describe::<R>()?;
        descriptor.require_identity()?;
        let generated_identity = match descriptor.default_identity() {
            Some(field) if record.get(&field.path)?.is_zero() => Some(field),
            _ => None,
        };
        let row = column_values(
            record,
            descriptor
                .included_fields()
                .filter(|f| Some(*f) != generated_identity),
        )?;
        let mut context = self.context(Fragment::None);
        let mut sql = String::with_capacity(128);
        self.writer()
            .write_insert(&mut context, &mut sql, &descriptor.table, row, None);
        Ok(InsertStatement {
            statement: Statement::new(sql, context.args),
            generated_identity,
        })
    }

    /// Insert of every included field, identity included, overwriting the stored row with the
    /// same identity.
    pub fn replace_statement<R: Record>(&self, record: &R) -> Result<Statement> {
        let descriptor = describe::<R>()?;
        let identity: Vec<&str> = descriptor
            .require_identity()?
            .into_iter()
            .map(|f| f.column.as_str())
            .collect();
        let row = column_values(record, descriptor.included_fields())?;
        let mut context = self.context(Fragment::None);
        let mut sql = String::with_capacity(128);
        self.writer().write_insert(
            &mut context,
            &mut sql,
            &descriptor.table,
            row,
            Some(identity.as_slice()),
        );
        Ok(Statement::new(sql, context.args))
    }

    /// Update of the fields whose value differs from `snapshot`, `None` when nothing changed.
    ///
    /// Identity arguments come first, the assignments continue the numbering after them.
    pub fn update_statement<R: Record>(
        &self,
        record: &R,
        snapshot: &R,
    ) -> Result<Option<Statement>> {
        let descriptor = describe::<R>()?;
        let identity = column_values(record, descriptor.require_identity()?)?;
        let assignments = changed_values(descriptor, record, snapshot)?;
        if assignments.is_empty() {
            return Ok(None);
        }
        let mut context = self.context(Fragment::None);
        let mut sql = String::with_capacity(128);
        self.writer().write_update(
            &mut context,
            &mut sql,
            &descriptor.table,
            assignments,
            identity,
        );
        Ok(Some(Statement::new(sql, context.args)))
    }

    /// `delete from <table> where <identity>`.
    pub fn delete_statement<R: Record>(&self, record: &R) -> Result<Statement> {
        let descriptor = describe::<R>()?;
        let identity = column_values(record, descriptor.require_identity()?)?;
        let mut context = self.context(Fragment::None);
        let mut sql = String::with_capacity(64);
        self.writer()
            .write_delete(&mut context, &mut sql, &descriptor.table, identity);
        Ok(Statement::new(sql, context.args))
    }

    /// Query reading back the identity generated by the last insert.
    pub fn generated_identity_statement(&self) -> Statement {
        let mut sql = String::new();
        self.writer().write_generated_identity(&mut sql);
        Statement::new(sql, Vec::new())
    }
}

/// Updatable, non identity fields of `record` whose value differs from `snapshot`.
fn changed_values<'d, R: Record>(
    descriptor: &'d TypeDescriptor,
    record: &R,
    snapshot: &R,
) -> Result<Vec<(&'d str, Value)>> {
    let mut result = Vec::new();
    for field in descriptor.updatable_fields().filter(|f| !f.identity) {
        let current = record.get(&field.path)?;
        if current != snapshot.get(&field.path)? {
            result.push((field.column.as_str(), current));
        }
    }
    Ok(result)
}
