use crate::{Value, writer::SqlWriter};

/// Provides numeric precedence for expressions allowing sql writers to insert parentheses.
pub trait OpPrecedence {
    /// Lower numbers bind weaker, children binding weaker than their operator get parenthesized.
    fn precedence(&self, writer: &dyn SqlWriter) -> i32;
}

impl<T: OpPrecedence + ?Sized> OpPrecedence for &T {
    fn precedence(&self, writer: &dyn SqlWriter) -> i32 {
        (**self).precedence(writer)
    }
}

impl<T: OpPrecedence + ?Sized> OpPrecedence for Box<T> {
    fn precedence(&self, writer: &dyn SqlWriter) -> i32 {
        (**self).precedence(writer)
    }
}

impl OpPrecedence for Value {
    fn precedence(&self, _writer: &dyn SqlWriter) -> i32 {
        1_000_000_000
    }
}
