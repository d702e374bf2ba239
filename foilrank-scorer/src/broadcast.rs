//! Runtime values and broadcasting arithmetic.

use crate::EvaluationError;
use crate::ast::BinaryOperator;

/// Result of evaluating a formula node.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// A single number.
    Scalar(f64),
    /// One number per angle of attack.
    Series(Vec<f64>),
}

impl Value {
    /// Collapse a single-element series to a scalar.
    #[must_use]
    pub fn collapse(self) -> Self {
        match self {
            Self::Series(values) if values.len() == 1 => {
                values.first().copied().map_or(Self::Series(values), Self::Scalar)
            }
            other => other,
        }
    }

    /// Return the scalar, or fail with [`EvaluationError::NonScalarResult`].
    ///
    /// # Errors
    /// Fails for series of any length other than one.
    pub fn into_scalar(self) -> Result<f64, EvaluationError> {
        match self.collapse() {
            Self::Scalar(value) => Ok(value),
            Self::Series(values) => Err(EvaluationError::NonScalarResult { len: values.len() }),
        }
    }

    /// Apply `transform` to the scalar or to every element.
    #[must_use]
    pub fn map(self, transform: impl Fn(f64) -> f64) -> Self {
        match self {
            Self::Scalar(value) => Self::Scalar(transform(value)),
            Self::Series(values) => Self::Series(values.into_iter().map(transform).collect()),
        }
    }
}

/// Combine two values element-wise, broadcasting scalars over series.
///
/// A single-element result collapses to a scalar.
///
/// # Errors
/// Returns [`EvaluationError::LengthMismatch`] for series of different
/// lengths and [`EvaluationError::DivisionByZero`] when any divisor is zero.
///
/// # Examples
/// ```
/// use foilrank_scorer::{BinaryOperator, EvaluationError, Value, series_combine};
///
/// let lift = Value::Series(vec![0.2, 0.4, 0.6]);
/// let doubled = series_combine(lift.clone(), Value::Scalar(2.0), BinaryOperator::Mul);
/// assert_eq!(doubled, Ok(Value::Series(vec![0.4, 0.8, 1.2])));
///
/// let short = Value::Series(vec![1.0, 2.0, 3.0, 4.0]);
/// assert_eq!(
///     series_combine(lift, short, BinaryOperator::Add),
///     Err(EvaluationError::LengthMismatch { left: 3, right: 4 })
/// );
/// ```
pub fn series_combine(
    left: Value,
    right: Value,
    op: BinaryOperator,
) -> Result<Value, EvaluationError> {
    if let (Value::Series(l), Value::Series(r)) = (&left, &right)
        && l.len() != r.len()
    {
        return Err(EvaluationError::LengthMismatch {
            left: l.len(),
            right: r.len(),
        });
    }
    if op == BinaryOperator::Div && has_zero(&right) {
        return Err(EvaluationError::DivisionByZero);
    }
    let combined = match (left, right) {
        (Value::Scalar(l), Value::Scalar(r)) => Value::Scalar(apply(op, l, r)),
        (Value::Scalar(l), Value::Series(r)) => {
            Value::Series(r.into_iter().map(|value| apply(op, l, value)).collect())
        }
        (Value::Series(l), Value::Scalar(r)) => {
            Value::Series(l.into_iter().map(|value| apply(op, value, r)).collect())
        }
        (Value::Series(l), Value::Series(r)) => Value::Series(
            l.into_iter()
                .zip(r)
                .map(|(a, b)| apply(op, a, b))
                .collect(),
        ),
    };
    Ok(combined.collapse())
}

/// Apply `op` between every element of `series` and `constant`.
///
/// # Errors
/// Returns [`EvaluationError::InvalidOperands`] unless `series` is a series
/// and `constant` a scalar, and [`EvaluationError::DivisionByZero`] for a
/// zero divisor.
///
/// # Examples
/// ```
/// use foilrank_scorer::{BinaryOperator, Value, scalar_combine};
///
/// let drag = Value::Series(vec![0.01, 0.02]);
/// let scaled = scalar_combine(drag, Value::Scalar(100.0), BinaryOperator::Mul);
/// assert_eq!(scaled, Ok(Value::Series(vec![1.0, 2.0])));
/// ```
pub fn scalar_combine(
    series: Value,
    constant: Value,
    op: BinaryOperator,
) -> Result<Value, EvaluationError> {
    let Value::Series(values) = series else {
        return Err(EvaluationError::InvalidOperands {
            operation: "list_value_operation",
            detail: "first operand must be a series".to_owned(),
        });
    };
    let Value::Scalar(constant_value) = constant else {
        return Err(EvaluationError::InvalidOperands {
            operation: "list_value_operation",
            detail: "second operand must be a number".to_owned(),
        });
    };
    if op == BinaryOperator::Div && is_zero(constant_value) {
        return Err(EvaluationError::DivisionByZero);
    }
    Ok(Value::Series(
        values
            .into_iter()
            .map(|value| apply(op, value, constant_value))
            .collect(),
    ))
}

#[expect(
    clippy::float_arithmetic,
    reason = "formula arithmetic is floating point by definition"
)]
fn apply(op: BinaryOperator, left: f64, right: f64) -> f64 {
    match op {
        BinaryOperator::Add => left + right,
        BinaryOperator::Sub => left - right,
        BinaryOperator::Mul => left * right,
        BinaryOperator::Div => left / right,
        BinaryOperator::Pow => left.powf(right),
    }
}

fn has_zero(value: &Value) -> bool {
    match value {
        Value::Scalar(divisor) => is_zero(*divisor),
        Value::Series(divisors) => divisors.iter().copied().any(is_zero),
    }
}

#[expect(
    clippy::float_cmp,
    reason = "division is only undefined for an exact zero"
)]
const fn is_zero(value: f64) -> bool {
    value == 0.0
}
