use crate::{
    BinaryOp, BinaryOpType, OpPrecedence, Operand, Order, Ordered, UnaryOp, UnaryOpType, Value,
    writer::{Context, SqlWriter},
};
use std::fmt::Debug;

/// A renderable SQL expression node.
pub trait Expression: OpPrecedence + Send + Sync + Debug {
    /// Serialize the expression into the output string using the sql writer.
    fn write_query(&self, writer: &dyn SqlWriter, context: &mut Context, out: &mut String);
    /// Whether this expression carries ordering information.
    fn is_ordered(&self) -> bool {
        false
    }
}

impl<T: Expression + ?Sized> Expression for &T {
    fn write_query(&self, writer: &dyn SqlWriter, context: &mut Context, out: &mut String) {
        (**self).write_query(writer, context, out);
    }
    fn is_ordered(&self) -> bool {
        (**self).is_ordered()
    }
}

impl<T: Expression + ?Sized> Expression for Box<T> {
    fn write_query(&self, writer: &dyn SqlWriter, context: &mut Context, out: &mut String) {
        (**self).write_query(writer, context, out);
    }
    fn is_ordered(&self) -> bool {
        (**self).is_ordered()
    }
}

/// A value used directly as an expression is bound as a parameter.
impl Expression for Value {
    fn write_query(&self, writer: &dyn SqlWriter, context: &mut Context, out: &mut String) {
        writer.write_placeholder(context, out, self.clone());
    }
}

/// Combinators building expression trees.
///
/// ```rust
/// use rowmap_core::{ExpressionExt, col, param};
/// let filter = col("age").ge(param(18)).and(col("name").like(param("A%")));
/// ```
pub trait ExpressionExt: Expression + Sized {
    fn eq<R: Expression>(self, rhs: R) -> BinaryOp<Self, R> {
        BinaryOp::new(BinaryOpType::Equal, self, rhs)
    }
    fn ne<R: Expression>(self, rhs: R) -> BinaryOp<Self, R> {
        BinaryOp::new(BinaryOpType::NotEqual, self, rhs)
    }
    fn lt<R: Expression>(self, rhs: R) -> BinaryOp<Self, R> {
        BinaryOp::new(BinaryOpType::Less, self, rhs)
    }
    fn le<R: Expression>(self, rhs: R) -> BinaryOp<Self, R> {
        BinaryOp::new(BinaryOpType::LessEqual, self, rhs)
    }
    fn gt<R: Expression>(self, rhs: R) -> BinaryOp<Self, R> {
        BinaryOp::new(BinaryOpType::Greater, self, rhs)
    }
    fn ge<R: Expression>(self, rhs: R) -> BinaryOp<Self, R> {
        BinaryOp::new(BinaryOpType::GreaterEqual, self, rhs)
    }
    fn like<R: Expression>(self, rhs: R) -> BinaryOp<Self, R> {
        BinaryOp::new(BinaryOpType::Like, self, rhs)
    }
    fn not_like<R: Expression>(self, rhs: R) -> BinaryOp<Self, R> {
        BinaryOp::new(BinaryOpType::NotLike, self, rhs)
    }
    fn and<R: Expression>(self, rhs: R) -> BinaryOp<Self, R> {
        BinaryOp::new(BinaryOpType::And, self, rhs)
    }
    fn or<R: Expression>(self, rhs: R) -> BinaryOp<Self, R> {
        BinaryOp::new(BinaryOpType::Or, self, rhs)
    }
    fn add<R: Expression>(self, rhs: R) -> BinaryOp<Self, R> {
        BinaryOp::new(BinaryOpType::Addition, self, rhs)
    }
    fn sub<R: Expression>(self, rhs: R) -> BinaryOp<Self, R> {
        BinaryOp::new(BinaryOpType::Subtraction, self, rhs)
    }
    fn mul<R: Expression>(self, rhs: R) -> BinaryOp<Self, R> {
        BinaryOp::new(BinaryOpType::Multiplication, self, rhs)
    }
    fn div<R: Expression>(self, rhs: R) -> BinaryOp<Self, R> {
        BinaryOp::new(BinaryOpType::Division, self, rhs)
    }
    fn is_null(self) -> BinaryOp<Self, Operand> {
        BinaryOp::new(BinaryOpType::Is, self, Operand::Null)
    }
    fn is_not_null(self) -> BinaryOp<Self, Operand> {
        BinaryOp::new(BinaryOpType::IsNot, self, Operand::Null)
    }
    fn not(self) -> UnaryOp<Self> {
        UnaryOp {
            op: UnaryOpType::Not,
            arg: self,
        }
    }
    fn neg(self) -> UnaryOp<Self> {
        UnaryOp {
            op: UnaryOpType::Negative,
            arg: self,
        }
    }
    fn asc(self) -> Ordered<Self> {
        Ordered {
            order: Order::ASC,
            expression: self,
        }
    }
    fn desc(self) -> Ordered<Self> {
        Ordered {
            order: Order::DESC,
            expression: self,
        }
    }
    fn boxed(self) -> Box<dyn Expression>
    where
        Self: 'static,
    {
        Box::new(self)
    }
}

impl<E: Expression> ExpressionExt for E {}
