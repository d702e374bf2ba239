//! Static shape inference over formula syntax trees.

use crate::ast::{Callee, Expr, Function};

/// Whether an expression yields one number or one number per angle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Shape {
    /// A single number.
    Scalar,
    /// One number per angle of attack.
    Series,
    /// Not determinable without evaluating.
    Unknown,
}

impl Shape {
    /// Shape of arithmetic between two operands.
    #[must_use]
    pub const fn combine(self, other: Self) -> Self {
        match (self, other) {
            (Self::Unknown, _) | (_, Self::Unknown) => Self::Unknown,
            (Self::Series, _) | (_, Self::Series) => Self::Series,
            (Self::Scalar, Self::Scalar) => Self::Scalar,
        }
    }
}

/// Infer the shape `expr` evaluates to.
///
/// Element-wise results are reported as [`Shape::Series`] even though a
/// single-sample series collapses to a number at run time.
///
/// # Examples
/// ```
/// use foilrank_scorer::{Shape, infer_shape, parse};
///
/// # fn main() -> Result<(), foilrank_scorer::SyntaxError> {
/// assert_eq!(infer_shape(&parse("cl/cd")?), Shape::Series);
/// assert_eq!(infer_shape(&parse("average(cl)*2")?), Shape::Scalar);
/// assert_eq!(infer_shape(&parse("lift+1")?), Shape::Unknown);
/// # Ok(())
/// # }
/// ```
#[must_use]
pub fn infer_shape(expr: &Expr) -> Shape {
    match expr {
        Expr::Literal(_) | Expr::Scalar(_) => Shape::Scalar,
        Expr::Field(_) => Shape::Series,
        Expr::Binary { left, right, .. } => infer_shape(left).combine(infer_shape(right)),
        Expr::Negate(operand) | Expr::Normalize { operand, .. } => infer_shape(operand),
        Expr::Call {
            callee: Callee::Builtin(function),
            args,
        } => call_shape(*function, args),
        Expr::Call {
            callee: Callee::Unknown(_),
            ..
        }
        | Expr::Operator(_)
        | Expr::Text(_)
        | Expr::Unknown(_) => Shape::Unknown,
    }
}

fn call_shape(function: Function, args: &[Expr]) -> Shape {
    match function {
        Function::Average | Function::Max | Function::Min | Function::Sum => Shape::Scalar,
        Function::Abs => args.first().map_or(Shape::Unknown, infer_shape),
        Function::ElementWise => match args {
            [left, right, _] => infer_shape(left).combine(infer_shape(right)),
            _ => Shape::Unknown,
        },
        Function::ListValue => match args.first().map(infer_shape) {
            Some(Shape::Series) => Shape::Series,
            _ => Shape::Unknown,
        },
    }
}
