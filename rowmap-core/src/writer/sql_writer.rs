use crate::{
    BinaryOp, BinaryOpType, Expression, Operand, Order, Ordered, UnaryOp, UnaryOpType, Value,
    possibly_parenthesized, separated_by,
    writer::{Context, Fragment},
};
use std::fmt::Write;

macro_rules! write_integer {
    ($out:ident, $value:expr) => {{
        let mut buffer = itoa::Buffer::new();
        $out.push_str(buffer.format($value));
    }};
}

/// Dialect printer converting statements and expression trees into concrete SQL strings.
///
/// Identifiers are written unquoted, keywords in lowercase. Values never appear inline: every
/// value goes through [`SqlWriter::write_placeholder`] and lands in [`Context::args`].
pub trait SqlWriter: Send + Sync {
    fn as_dyn(&self) -> &dyn SqlWriter;

    /// Write a table or column name.
    fn write_identifier(&self, _context: &mut Context, out: &mut String, value: &str) {
        out.push_str(value);
    }

    /// Register `value` as the next argument and write its placeholder.
    fn write_placeholder(&self, context: &mut Context, out: &mut String, value: Value) {
        let index = context.push_arg(value);
        out.push_str(&context.prefix);
        write_integer!(out, index);
    }

    /// Render NULL literal.
    fn write_value_none(&self, _context: &mut Context, out: &mut String) {
        out.push_str("null");
    }

    /// Render boolean literal.
    fn write_value_bool(&self, _context: &mut Context, out: &mut String, value: bool) {
        out.push_str(["false", "true"][value as usize]);
    }

    /// Render and escape a string literal using single quotes.
    fn write_value_string(&self, _context: &mut Context, out: &mut String, value: &str) {
        out.push('\'');
        let mut position = 0;
        for (i, c) in value.char_indices() {
            if c == '\'' {
                out.push_str(&value[position..i]);
                out.push_str("''");
                position = i + 1;
            }
        }
        out.push_str(&value[position..]);
        out.push('\'');
    }

    /// Precedence table for unary operators.
    fn expression_unary_op_precedence(&self, value: &UnaryOpType) -> i32 {
        match value {
            UnaryOpType::Negative => 1250,
            UnaryOpType::Not => 250,
        }
    }

    /// Precedence table for binary operators.
    fn expression_binary_op_precedence(&self, value: &BinaryOpType) -> i32 {
        match value {
            BinaryOpType::Or => 100,
            BinaryOpType::And => 200,
            BinaryOpType::Equal => 300,
            BinaryOpType::NotEqual => 300,
            BinaryOpType::Less => 300,
            BinaryOpType::Greater => 300,
            BinaryOpType::LessEqual => 300,
            BinaryOpType::GreaterEqual => 300,
            BinaryOpType::Is => 400,
            BinaryOpType::IsNot => 400,
            BinaryOpType::Like => 400,
            BinaryOpType::NotLike => 400,
            BinaryOpType::Subtraction => 800,
            BinaryOpType::Addition => 800,
            BinaryOpType::Multiplication => 900,
            BinaryOpType::Division => 900,
            BinaryOpType::Remainder => 900,
        }
    }

    fn write_expression_operand(&self, context: &mut Context, out: &mut String, value: &Operand) {
        match value {
            Operand::Column(v) => self.write_identifier(context, out, v),
            Operand::Param(v) => self.write_placeholder(context, out, v.clone()),
            Operand::LitBool(v) => self.write_value_bool(context, out, *v),
            Operand::LitInt(v) => write_integer!(out, *v),
            Operand::LitFloat(v) => {
                let mut buffer = ryu::Buffer::new();
                out.push_str(buffer.format(*v));
            }
            Operand::LitStr(v) => self.write_value_string(context, out, v),
            Operand::Null => self.write_value_none(context, out),
            Operand::Asterisk => out.push('*'),
        }
    }

    fn write_expression_unary_op(
        &self,
        context: &mut Context,
        out: &mut String,
        value: &UnaryOp<&dyn Expression>,
    ) {
        match value.op {
            UnaryOpType::Negative => out.push('-'),
            UnaryOpType::Not => out.push_str("not "),
        };
        possibly_parenthesized!(
            out,
            value.arg.precedence(self.as_dyn()) <= self.expression_unary_op_precedence(&value.op),
            value.arg.write_query(self.as_dyn(), context, out)
        );
    }

    /// Render binary operator expression handling precedence / parenthesis.
    fn write_expression_binary_op(
        &self,
        context: &mut Context,
        out: &mut String,
        value: &BinaryOp<&dyn Expression, &dyn Expression>,
    ) {
        let infix = match value.op {
            BinaryOpType::Multiplication => " * ",
            BinaryOpType::Division => " / ",
            BinaryOpType::Remainder => " % ",
            BinaryOpType::Addition => " + ",
            BinaryOpType::Subtraction => " - ",
            BinaryOpType::Is => " is ",
            BinaryOpType::IsNot => " is not ",
            BinaryOpType::Like => " like ",
            BinaryOpType::NotLike => " not like ",
            BinaryOpType::Equal => " = ",
            BinaryOpType::NotEqual => " != ",
            BinaryOpType::Less => " < ",
            BinaryOpType::LessEqual => " <= ",
            BinaryOpType::Greater => " > ",
            BinaryOpType::GreaterEqual => " >= ",
            BinaryOpType::And => " and ",
            BinaryOpType::Or => " or ",
        };
        let precedence = self.expression_binary_op_precedence(&value.op);
        possibly_parenthesized!(
            out,
            value.lhs.precedence(self.as_dyn()) < precedence,
            value.lhs.write_query(self.as_dyn(), context, out)
        );
        out.push_str(infix);
        possibly_parenthesized!(
            out,
            value.rhs.precedence(self.as_dyn()) <= precedence,
            value.rhs.write_query(self.as_dyn(), context, out)
        );
    }

    /// Render ordered expression, the direction only appears inside ORDER BY.
    fn write_expression_ordered(
        &self,
        context: &mut Context,
        out: &mut String,
        value: &Ordered<&dyn Expression>,
    ) {
        value.expression.write_query(self.as_dyn(), context, out);
        if context.fragment == Fragment::SqlSelectOrderBy {
            let _ = write!(
                out,
                " {}",
                match value.order {
                    Order::ASC => "asc",
                    Order::DESC => "desc",
                }
            );
        }
    }

    /// `where <condition>`, nothing when the condition renders empty.
    fn write_where(&self, context: &mut Context, out: &mut String, condition: &dyn Expression) {
        let mut context = context.switch_fragment(Fragment::SqlSelectWhere);
        let mut fragment = String::new();
        condition.write_query(self.as_dyn(), &mut context, &mut fragment);
        if !fragment.is_empty() {
            out.push_str("where ");
            out.push_str(&fragment);
        }
    }

    /// `order by <terms>`, nothing when there are no terms.
    fn write_order_by(
        &self,
        context: &mut Context,
        out: &mut String,
        terms: &[Box<dyn Expression>],
    ) {
        if terms.is_empty() {
            return;
        }
        let mut context = context.switch_fragment(Fragment::SqlSelectOrderBy);
        out.push_str("order by ");
        separated_by(
            out,
            terms,
            |out, v| v.write_query(self.as_dyn(), &mut context, out),
            ", ",
        );
    }

    /// `limit <n> offset <m>`, each part only when present.
    fn write_limit(
        &self,
        context: &mut Context,
        out: &mut String,
        limit: Option<u64>,
        offset: Option<u64>,
    ) {
        let _context = context.switch_fragment(Fragment::SqlSelectLimit);
        match (limit, offset) {
            (Some(limit), offset) => {
                out.push_str("limit ");
                write_integer!(out, limit);
                if let Some(offset) = offset {
                    out.push_str(" offset ");
                    write_integer!(out, offset);
                }
            }
            (None, Some(offset)) => {
                // A negative limit means no limit.
                out.push_str("limit -1 offset ");
                write_integer!(out, offset);
            }
            (None, None) => {}
        }
    }

    /// `where a = $1 and b = $2` over the identity columns.
    fn write_identity_where(
        &self,
        context: &mut Context,
        out: &mut String,
        identity: Vec<(&str, Value)>,
    ) {
        out.push_str("where ");
        separated_by(
            out,
            identity,
            |out, (column, value)| {
                self.write_identifier(context, out, column);
                out.push_str(" = ");
                self.write_placeholder(context, out, value);
            },
            " and ",
        );
    }

    /// `select * from <table> <condition>`, the condition is caller provided text.
    fn write_select(&self, context: &mut Context, out: &mut String, table: &str, condition: &str) {
        let mut context = context.switch_fragment(Fragment::SqlSelect);
        out.push_str("select * from ");
        self.write_identifier(&mut context, out, table);
        if !condition.is_empty() {
            out.push(' ');
            out.push_str(condition);
        }
    }

    /// `select count(*) from <table> <condition>`.
    fn write_count(&self, context: &mut Context, out: &mut String, table: &str, condition: &str) {
        let mut context = context.switch_fragment(Fragment::SqlCount);
        out.push_str("select count(*) from ");
        self.write_identifier(&mut context, out, table);
        if !condition.is_empty() {
            out.push(' ');
            out.push_str(condition);
        }
    }

    /// Insert keyword, `replace` asks to overwrite the row having the same identity.
    fn write_insert_keyword(&self, _context: &mut Context, out: &mut String, replace: bool) {
        out.push_str(if replace {
            "insert or replace into "
        } else {
            "insert into "
        });
    }

    /// Insert a single row, or replace the row having the same identity when `identity` is given.
    fn write_insert(
        &self,
        context: &mut Context,
        out: &mut String,
        table: &str,
        row: Vec<(&str, Value)>,
        identity: Option<&[&str]>,
    ) {
        let mut context = context.switch_fragment(Fragment::SqlInsertInto);
        self.write_insert_keyword(&mut context, out, identity.is_some());
        self.write_identifier(&mut context, out, table);
        if row.is_empty() {
            out.push_str(" default values");
            return;
        }
        out.push_str(" (");
        separated_by(
            out,
            row.iter(),
            |out, (column, _)| self.write_identifier(&mut context, out, column),
            ", ",
        );
        out.push_str(") values (");
        let columns: Vec<&str> = row.iter().map(|(column, _)| *column).collect();
        {
            let mut context = context.switch_fragment(Fragment::SqlInsertIntoValues);
            separated_by(
                out,
                row,
                |out, (_, value)| self.write_placeholder(&mut context, out, value),
                ", ",
            );
        }
        out.push(')');
        if let Some(identity) = identity {
            let mut context = context.switch_fragment(Fragment::SqlInsertIntoOnConflict);
            self.write_insert_update_fragment(&mut context, out, &columns, identity);
        }
    }

    /// Upsert clause following the values, for dialects without a replace keyword.
    fn write_insert_update_fragment(
        &self,
        _context: &mut Context,
        _out: &mut String,
        _columns: &[&str],
        _identity: &[&str],
    ) {
    }

    /// Whether placeholders carry the number of their argument. Anonymous placeholders bind in
    /// the order they appear in the text.
    fn numbered_placeholders(&self) -> bool {
        true
    }

    /// `update <table> set a = $k+1 ... where <identity>`, identity arguments come first.
    ///
    /// With anonymous placeholders the arguments follow the text instead: assignments, then identity.
    fn write_update(
        &self,
        context: &mut Context,
        out: &mut String,
        table: &str,
        assignments: Vec<(&str, Value)>,
        identity: Vec<(&str, Value)>,
    ) {
        let mut filter = String::new();
        let (before, after) = if self.numbered_placeholders() {
            (Some(identity), None)
        } else {
            (None, Some(identity))
        };
        if let Some(identity) = before {
            let mut context = context.switch_fragment(Fragment::SqlUpdateWhere);
            self.write_identity_where(&mut context, &mut filter, identity);
        }
        {
            let mut context = context.switch_fragment(Fragment::SqlUpdateSet);
            out.push_str("update ");
            self.write_identifier(&mut context, out, table);
            out.push_str(" set ");
            separated_by(
                out,
                assignments,
                |out, (column, value)| {
                    self.write_identifier(&mut context, out, column);
                    out.push_str(" = ");
                    self.write_placeholder(&mut context, out, value);
                },
                ", ",
            );
        }
        if let Some(identity) = after {
            let mut context = context.switch_fragment(Fragment::SqlUpdateWhere);
            self.write_identity_where(&mut context, &mut filter, identity);
        }
        out.push(' ');
        out.push_str(&filter);
    }

    /// `delete from <table> where <identity>`.
    fn write_delete(
        &self,
        context: &mut Context,
        out: &mut String,
        table: &str,
        identity: Vec<(&str, Value)>,
    ) {
        let mut context = context.switch_fragment(Fragment::SqlDeleteFrom);
        out.push_str("delete from ");
        self.write_identifier(&mut context, out, table);
        out.push(' ');
        let mut context = context.switch_fragment(Fragment::SqlDeleteFromWhere);
        self.write_identity_where(&mut context, out, identity);
    }

    /// Query returning the identity generated by the last insert, as a single row.
    fn write_generated_identity(&self, out: &mut String) {
        out.push_str("select last_insert_rowid()");
    }
}
