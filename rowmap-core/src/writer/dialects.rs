use crate::{
    Value, separated_by,
    writer::{Context, SqlWriter},
};

/// Numbered placeholders using the configured prefix, generated identities read through
/// `last_insert_rowid()`.
#[derive(Default, Debug, Clone, Copy)]
pub struct GenericSqlWriter;

impl GenericSqlWriter {
    pub fn new() -> Self {
        Self {}
    }
}

impl SqlWriter for GenericSqlWriter {
    fn as_dyn(&self) -> &dyn SqlWriter {
        self
    }
}

/// PostgreSQL: `$n` placeholders whatever the configured prefix, upserts through
/// `on conflict do update`.
#[derive(Default, Debug, Clone, Copy)]
pub struct PostgresSqlWriter;

impl SqlWriter for PostgresSqlWriter {
    fn as_dyn(&self) -> &dyn SqlWriter {
        self
    }

    fn write_placeholder(&self, context: &mut Context, out: &mut String, value: Value) {
        let index = context.push_arg(value);
        out.push('$');
        out.push_str(itoa::Buffer::new().format(index));
    }

    fn write_insert_keyword(&self, _context: &mut Context, out: &mut String, _replace: bool) {
        out.push_str("insert into ");
    }

    fn write_insert_update_fragment(
        &self,
        context: &mut Context,
        out: &mut String,
        columns: &[&str],
        identity: &[&str],
    ) {
        out.push_str(" on conflict (");
        separated_by(
            out,
            identity,
            |out, v| self.write_identifier(context, out, v),
            ", ",
        );
        out.push(')');
        let updated: Vec<_> = columns.iter().filter(|c| !identity.contains(*c)).collect();
        if updated.is_empty() {
            out.push_str(" do nothing");
            return;
        }
        out.push_str(" do update set ");
        separated_by(
            out,
            updated,
            |out, v| {
                self.write_identifier(context, out, v);
                out.push_str(" = excluded.");
                self.write_identifier(context, out, v);
            },
            ", ",
        );
    }

    fn write_limit(
        &self,
        _context: &mut Context,
        out: &mut String,
        limit: Option<u64>,
        offset: Option<u64>,
    ) {
        let mut buffer = itoa::Buffer::new();
        if let Some(limit) = limit {
            out.push_str("limit ");
            out.push_str(buffer.format(limit));
        }
        if let Some(offset) = offset {
            if limit.is_some() {
                out.push(' ');
            }
            out.push_str("offset ");
            out.push_str(buffer.format(offset));
        }
    }

    fn write_generated_identity(&self, out: &mut String) {
        out.push_str("select lastval()");
    }
}

/// MySQL: anonymous `?` placeholders, `replace into` for replacements.
#[derive(Default, Debug, Clone, Copy)]
pub struct MySqlSqlWriter;

impl SqlWriter for MySqlSqlWriter {
    fn as_dyn(&self) -> &dyn SqlWriter {
        self
    }

    fn write_placeholder(&self, context: &mut Context, out: &mut String, value: Value) {
        context.push_arg(value);
        out.push('?');
    }

    fn numbered_placeholders(&self) -> bool {
        false
    }

    fn write_insert_keyword(&self, _context: &mut Context, out: &mut String, replace: bool) {
        out.push_str(if replace {
            "replace into "
        } else {
            "insert into "
        });
    }

    fn write_limit(
        &self,
        _context: &mut Context,
        out: &mut String,
        limit: Option<u64>,
        offset: Option<u64>,
    ) {
        if limit.is_none() && offset.is_none() {
            return;
        }
        let mut buffer = itoa::Buffer::new();
        out.push_str("limit ");
        // Largest row count accepted, MySQL has no offset without a limit.
        out.push_str(buffer.format(limit.unwrap_or(u64::MAX)));
        if let Some(offset) = offset {
            out.push_str(" offset ");
            out.push_str(buffer.format(offset));
        }
    }

    fn write_generated_identity(&self, out: &mut String) {
        out.push_str("select last_insert_id()");
    }
}
