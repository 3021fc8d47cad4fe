use crate::{Expression, OpPrecedence, SqlWriter, Value, writer::Context};
use std::borrow::Cow;

/// Leaf of an expression tree.
#[derive(Debug, Clone)]
pub enum Operand {
    /// Column name, written as is.
    Column(Cow<'static, str>),
    /// Value bound through a placeholder.
    Param(Value),
    LitBool(bool),
    LitInt(i64),
    LitFloat(f64),
    LitStr(Cow<'static, str>),
    Null,
    Asterisk,
}

/// Column operand.
pub fn col(name: impl Into<Cow<'static, str>>) -> Operand {
    Operand::Column(name.into())
}

/// Parameter operand, the value is never inlined in the SQL text.
pub fn param(value: impl Into<Value>) -> Operand {
    Operand::Param(value.into())
}

impl OpPrecedence for Operand {
    fn precedence(&self, _writer: &dyn SqlWriter) -> i32 {
        1_000_000_000
    }
}

impl Expression for Operand {
    fn write_query(&self, writer: &dyn SqlWriter, context: &mut Context, out: &mut String) {
        writer.write_expression_operand(context, out, self)
    }
}
