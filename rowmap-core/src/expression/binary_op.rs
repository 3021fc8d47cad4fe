use crate::{
    Expression, OpPrecedence,
    writer::{Context, SqlWriter},
};
use std::fmt::{self, Display, Formatter};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOpType {
    Multiplication,
    Division,
    Remainder,
    Addition,
    Subtraction,
    Is,
    IsNot,
    Like,
    NotLike,
    Equal,
    NotEqual,
    Less,
    Greater,
    LessEqual,
    GreaterEqual,
    And,
    Or,
}

impl OpPrecedence for BinaryOpType {
    fn precedence(&self, writer: &dyn SqlWriter) -> i32 {
        writer.expression_binary_op_precedence(self)
    }
}

#[derive(Debug)]
pub struct BinaryOp<L: Expression, R: Expression> {
    pub op: BinaryOpType,
    pub lhs: L,
    pub rhs: R,
}

impl<L: Expression, R: Expression> BinaryOp<L, R> {
    pub fn new(op: BinaryOpType, lhs: L, rhs: R) -> Self {
        Self { op, lhs, rhs }
    }
}

impl<L: Expression, R: Expression> OpPrecedence for BinaryOp<L, R> {
    fn precedence(&self, writer: &dyn SqlWriter) -> i32 {
        writer.expression_binary_op_precedence(&self.op)
    }
}

impl<L: Expression, R: Expression> Expression for BinaryOp<L, R> {
    fn write_query(&self, writer: &dyn SqlWriter, context: &mut Context, out: &mut String) {
        writer.write_expression_binary_op(
            context,
            out,
            &BinaryOp {
                op: self.op,
                lhs: &self.lhs,
                rhs: &self.rhs,
            },
        )
    }
}

impl Display for BinaryOpType {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            BinaryOpType::Multiplication => "Multiplication",
            BinaryOpType::Division => "Division",
            BinaryOpType::Remainder => "Remainder",
            BinaryOpType::Addition => "Addition",
            BinaryOpType::Subtraction => "Subtraction",
            BinaryOpType::Is => "Is",
            BinaryOpType::IsNot => "IsNot",
            BinaryOpType::Like => "Like",
            BinaryOpType::NotLike => "NotLike",
            BinaryOpType::Equal => "Equal",
            BinaryOpType::NotEqual => "NotEqual",
            BinaryOpType::Less => "Less",
            BinaryOpType::Greater => "Greater",
            BinaryOpType::LessEqual => "LessEqual",
            BinaryOpType::GreaterEqual => "GreaterEqual",
            BinaryOpType::And => "And",
            BinaryOpType::Or => "Or",
        })
    }
}
