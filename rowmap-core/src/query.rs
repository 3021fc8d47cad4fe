use crate::{Value, truncate_long};
use std::fmt::{self, Display};

/// Owned row values, aligned by index with the cursor columns.
pub type Row = Box<[Value]>;

/// Metadata about modify operations (INSERT/UPDATE/DELETE).
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowsAffected {
    /// Total number of rows impacted.
    pub rows_affected: u64,
    /// Backend-specific last inserted identifier when available.
    pub last_affected_id: Option<i64>,
}

impl RowsAffected {
    pub fn new(rows_affected: u64) -> Self {
        Self {
            rows_affected,
            last_affected_id: None,
        }
    }
}

impl Extend<RowsAffected> for RowsAffected {
    fn extend<T: IntoIterator<Item = RowsAffected>>(&mut self, iter: T) {
        for elem in iter {
            self.rows_affected += elem.rows_affected;
            if elem.last_affected_id.is_some() {
                self.last_affected_id = elem.last_affected_id;
            }
        }
    }
}

/// Parameterized SQL text with its positional arguments.
///
/// Built once and immutable afterwards, later configuration changes never alter it.
#[derive(Default, Debug, Clone, PartialEq)]
pub struct Statement {
    pub sql: String,
    pub args: Vec<Value>,
}

impl Statement {
    pub fn new(sql: impl Into<String>, args: Vec<Value>) -> Self {
        Self {
            sql: sql.into(),
            args,
        }
    }
}

impl Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", truncate_long!(self.sql))
    }
}
