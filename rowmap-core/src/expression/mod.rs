mod binary_op;
mod expression;
mod op_precedence;
mod operand;
mod ordered;
mod unary_op;

pub use binary_op::*;
pub use expression::*;
pub use op_precedence::*;
pub use operand::*;
pub use ordered::*;
pub use unary_op::*;
