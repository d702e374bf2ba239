//! Evaluation of a formula tree for one candidate against the reference.
//!
//! Every node is evaluated within a [`Frame`]: the airfoil whose data fields
//! read from, and the angles they are sampled at. Normalisation evaluates its
//! operand twice, once for the current subject and once for the reference,
//! and divides the two.

use foilrank_core::{PolarDataset, PolarField};

use crate::EvaluationError;
use crate::ast::{BinaryOperator, Callee, Expr, Function, NormScope, PolarScalar};
use crate::broadcast::{Value, scalar_combine, series_combine};

/// Airfoil whose data a node reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Subject {
    Candidate,
    Reference,
}

/// Angles at which fields are sampled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum AngleScope {
    /// Every angle of the subject, in its own order.
    Own,
    /// Angles shared by candidate and reference, in reference order.
    Intersection,
}

impl AngleScope {
    /// Scope used inside a normalisation annotated with `norm`.
    pub(crate) const fn within(self, norm: NormScope) -> Self {
        match norm {
            NormScope::Intersection => Self::Intersection,
            NormScope::Inherited => self,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Frame {
    pub(crate) subject: Subject,
    pub(crate) scope: AngleScope,
}

impl Frame {
    /// Frame of the top-level formula.
    pub(crate) const ROOT: Self = Self {
        subject: Subject::Candidate,
        scope: AngleScope::Own,
    };
}

pub(crate) struct Evaluator<'a> {
    candidate: &'a PolarDataset,
    reference: &'a PolarDataset,
    intersection: Vec<f64>,
}

impl<'a> Evaluator<'a> {
    pub(crate) fn new(candidate: &'a PolarDataset, reference: &'a PolarDataset) -> Self {
        Self {
            candidate,
            reference,
            intersection: candidate.intersect_angles_with(reference),
        }
    }

    pub(crate) fn evaluate(&self, expr: &Expr, frame: Frame) -> Result<Value, EvaluationError> {
        match expr {
            Expr::Literal(value) => Ok(Value::Scalar(*value)),
            Expr::Field(field) => self.field(*field, frame),
            Expr::Scalar(scalar) => self.polar_scalar(*scalar, frame.subject).map(Value::Scalar),
            Expr::Binary { op, left, right } => series_combine(
                self.evaluate(left, frame)?,
                self.evaluate(right, frame)?,
                *op,
            ),
            Expr::Negate(operand) => Ok(self.evaluate(operand, frame)?.map(negate)),
            Expr::Normalize { operand, scope } => self.normalize(operand, *scope, frame),
            Expr::Call { callee, args } => self.call(callee, args, frame),
            Expr::Operator(op) => Err(EvaluationError::InvalidOperands {
                operation: "arithmetic",
                detail: format!("operator '{op}' used as a value"),
            }),
            Expr::Text(text) => Err(EvaluationError::InvalidOperands {
                operation: "arithmetic",
                detail: format!("string \"{text}\" used as a value"),
            }),
            Expr::Unknown(name) => Err(EvaluationError::UnknownIdentifier { name: name.clone() }),
        }
    }

    const fn dataset(&self, subject: Subject) -> &'a PolarDataset {
        match subject {
            Subject::Candidate => self.candidate,
            Subject::Reference => self.reference,
        }
    }

    fn angles(&self, frame: Frame) -> &[f64] {
        match frame.scope {
            AngleScope::Own => self.dataset(frame.subject).angles(),
            AngleScope::Intersection => &self.intersection,
        }
    }

    fn field(&self, field: PolarField, frame: Frame) -> Result<Value, EvaluationError> {
        let dataset = self.dataset(frame.subject);
        self.angles(frame)
            .iter()
            .map(|&angle| {
                dataset
                    .record(angle)
                    .map(|record| record.get(field))
                    .ok_or(EvaluationError::MissingAngle { field, angle })
            })
            .collect::<Result<Vec<_>, _>>()
            .map(Value::Series)
    }

    fn polar_scalar(&self, scalar: PolarScalar, subject: Subject) -> Result<f64, EvaluationError> {
        let dataset = self.dataset(subject);
        match scalar {
            PolarScalar::MaxLiftDragRatio => Ok(dataset.max_lift_drag_ratio()),
            PolarScalar::AngleAtMaxLiftDragRatio => Ok(dataset.angle_at_max_lift_drag_ratio()),
            PolarScalar::StallAngle => dataset
                .find_stall_angle()
                .ok_or(EvaluationError::EmptyDataset),
        }
    }

    fn normalize(
        &self,
        operand: &Expr,
        norm: NormScope,
        frame: Frame,
    ) -> Result<Value, EvaluationError> {
        let scope = frame.scope.within(norm);
        let numerator = self.evaluate(
            operand,
            Frame {
                subject: frame.subject,
                scope,
            },
        )?;
        let denominator = self.evaluate(
            operand,
            Frame {
                subject: Subject::Reference,
                scope,
            },
        )?;
        series_combine(numerator, denominator, BinaryOperator::Div)
    }

    fn call(&self, callee: &Callee, args: &[Expr], frame: Frame) -> Result<Value, EvaluationError> {
        let function = match callee {
            Callee::Builtin(function) => *function,
            Callee::Unknown(name) => {
                return Err(EvaluationError::UnknownFunction { name: name.clone() });
            }
        };
        match function {
            Function::Average => {
                let value = self.evaluate(single_arg(function, args)?, frame)?;
                reduce(function, value, mean)
            }
            Function::Sum => {
                let value = self.evaluate(single_arg(function, args)?, frame)?;
                reduce(function, value, total)
            }
            Function::Max | Function::Min => self.extreme(function, args, frame),
            Function::Abs => Ok(self.evaluate(single_arg(function, args)?, frame)?.map(f64::abs)),
            Function::ElementWise => {
                let [left, right, op] = three_args(function, args)?;
                series_combine(
                    self.evaluate(left, frame)?,
                    self.evaluate(right, frame)?,
                    operator_arg(function, op)?,
                )
            }
            Function::ListValue => {
                let [series, constant, op] = three_args(function, args)?;
                scalar_combine(
                    self.evaluate(series, frame)?,
                    self.constant_arg(function, constant, frame)?,
                    operator_arg(function, op)?,
                )
            }
        }
    }

    fn extreme(
        &self,
        function: Function,
        args: &[Expr],
        frame: Frame,
    ) -> Result<Value, EvaluationError> {
        if args.is_empty() {
            return Err(EvaluationError::Arity {
                function: function.name(),
                expected: "at least 1",
                found: 0,
            });
        }
        let mut values = Vec::new();
        for arg in args {
            match self.evaluate(arg, frame)? {
                Value::Scalar(value) => values.push(value),
                Value::Series(series) => values.extend(series),
            }
        }
        let pick = if function == Function::Max {
            f64::max
        } else {
            f64::min
        };
        values
            .into_iter()
            .reduce(pick)
            .map(Value::Scalar)
            .ok_or(EvaluationError::EmptySeries {
                function: function.name(),
            })
    }

    fn constant_arg(
        &self,
        function: Function,
        arg: &Expr,
        frame: Frame,
    ) -> Result<Value, EvaluationError> {
        match arg {
            Expr::Text(text) => text.parse::<f64>().map(Value::Scalar).map_err(|_| {
                EvaluationError::InvalidOperands {
                    operation: function.name(),
                    detail: format!("\"{text}\" is not a number"),
                }
            }),
            other => self.evaluate(other, frame),
        }
    }
}

fn single_arg(function: Function, args: &[Expr]) -> Result<&Expr, EvaluationError> {
    match args {
        [only] => Ok(only),
        _ => Err(EvaluationError::Arity {
            function: function.name(),
            expected: "1",
            found: args.len(),
        }),
    }
}

fn three_args(function: Function, args: &[Expr]) -> Result<[&Expr; 3], EvaluationError> {
    match args {
        [first, second, third] => Ok([first, second, third]),
        _ => Err(EvaluationError::Arity {
            function: function.name(),
            expected: "3",
            found: args.len(),
        }),
    }
}

fn operator_arg(function: Function, arg: &Expr) -> Result<BinaryOperator, EvaluationError> {
    let op = match arg {
        Expr::Operator(op) => Some(*op),
        Expr::Text(symbol) => BinaryOperator::from_symbol(symbol),
        _ => None,
    };
    op.ok_or_else(|| EvaluationError::InvalidOperands {
        operation: function.name(),
        detail: format!("expected an operator, found {arg}"),
    })
}

fn reduce(
    function: Function,
    value: Value,
    reducer: fn(&[f64]) -> f64,
) -> Result<Value, EvaluationError> {
    match value {
        Value::Scalar(_) => Ok(value),
        Value::Series(values) if values.is_empty() => Err(EvaluationError::EmptySeries {
            function: function.name(),
        }),
        Value::Series(values) => Ok(Value::Scalar(reducer(&values))),
    }
}

#[expect(clippy::float_arithmetic, reason = "mean of a series")]
fn mean(values: &[f64]) -> f64 {
    let (sum, count) = values
        .iter()
        .fold((0.0, 0.0), |(sum, count), value| (sum + value, count + 1.0));
    sum / count
}

fn total(values: &[f64]) -> f64 {
    values.iter().sum()
}

#[expect(clippy::float_arithmetic, reason = "unary minus on a formula value")]
const fn negate(value: f64) -> f64 {
    -value
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse;
    use foilrank_core::test_support::PolarFixture;
    use rstest::{fixture, rstest};

    #[fixture]
    fn candidate() -> PolarDataset {
        PolarFixture::new("candidate")
            .with_lift_drag(&[(0.0, 0.2, 0.01), (2.0, 0.4, 0.02), (4.0, 0.8, 0.04)])
            .dataset()
    }

    #[fixture]
    fn reference() -> PolarDataset {
        PolarFixture::new("reference")
            .with_lift_drag(&[(4.0, 0.4, 0.02), (0.0, 0.1, 0.01), (6.0, 0.5, 0.05)])
            .dataset()
    }

    fn run(text: &str, candidate: &PolarDataset, reference: &PolarDataset) -> Result<Value, EvaluationError> {
        let expr = parse(text).expect("formula parses");
        Evaluator::new(candidate, reference).evaluate(&expr, Frame::ROOT)
    }

    #[rstest]
    fn fields_read_every_candidate_angle(candidate: PolarDataset, reference: PolarDataset) {
        assert_eq!(
            run("cl", &candidate, &reference),
            Ok(Value::Series(vec![0.2, 0.4, 0.8]))
        );
    }

    #[rstest]
    fn mismatched_lengths_fail(candidate: PolarDataset) {
        let longer = PolarFixture::new("longer")
            .with_lift(&[(0.0, 0.1), (1.0, 0.2), (2.0, 0.3), (3.0, 0.4)])
            .dataset();
        let evaluator = Evaluator::new(&candidate, &longer);
        let expr = parse("cl").expect("parses");
        let left = evaluator.evaluate(&expr, Frame::ROOT).expect("candidate series");
        let right = evaluator
            .evaluate(
                &expr,
                Frame {
                    subject: Subject::Reference,
                    scope: AngleScope::Own,
                },
            )
            .expect("reference series");
        assert_eq!(
            series_combine(left, right, BinaryOperator::Add),
            Err(EvaluationError::LengthMismatch { left: 3, right: 4 })
        );
    }

    #[rstest]
    fn intersection_scope_uses_reference_order(candidate: PolarDataset, reference: PolarDataset) {
        let evaluator = Evaluator::new(&candidate, &reference);
        let expr = Expr::Field(PolarField::Cl);
        let frame = Frame {
            subject: Subject::Candidate,
            scope: AngleScope::Intersection,
        };
        assert_eq!(
            evaluator.evaluate(&expr, frame),
            Ok(Value::Series(vec![0.8, 0.2]))
        );
    }

    #[rstest]
    #[case("average(cl)", (0.2 + 0.4 + 0.8) / 3.0)]
    #[case("sum(cl)", 0.2 + 0.4 + 0.8)]
    #[expect(clippy::float_arithmetic, reason = "test compares within a tolerance")]
    fn reductions_produce_scalars(
        candidate: PolarDataset,
        reference: PolarDataset,
        #[case] text: &str,
        #[case] expected: f64,
    ) {
        let Ok(Value::Scalar(result)) = run(text, &candidate, &reference) else {
            panic!("expected a scalar");
        };
        assert!((result - expected).abs() < 1e-12);
    }

    #[rstest]
    #[case("max(cl)", 0.8)]
    #[case("min(cl)", 0.2)]
    #[case("max(1,3,2)", 3.0)]
    #[case("min(cd,0.001)", 0.001)]
    #[case("max(element_wise_operation(cl,cd,/))", 20.0)]
    #[case("stall_angle", 4.0)]
    #[case("average(abs(-cl))*0", 0.0)]
    fn scalar_formulas(
        candidate: PolarDataset,
        reference: PolarDataset,
        #[case] text: &str,
        #[case] expected: f64,
    ) {
        assert_eq!(run(text, &candidate, &reference), Ok(Value::Scalar(expected)));
    }

    #[rstest]
    fn list_value_operation_accepts_quoted_constants(
        candidate: PolarDataset,
        reference: PolarDataset,
    ) {
        assert_eq!(
            run("list_value_operation(cl,\"2\",\"*\")", &candidate, &reference),
            Ok(Value::Series(vec![0.4, 0.8, 1.6]))
        );
    }

    #[rstest]
    #[case("cl+foo", EvaluationError::UnknownIdentifier { name: "foo".into() })]
    #[case("lift(cl)", EvaluationError::UnknownFunction { name: "lift".into() })]
    #[case("average(cl,cd)", EvaluationError::Arity { function: "average", expected: "1", found: 2 })]
    #[case("max()", EvaluationError::Arity { function: "max", expected: "at least 1", found: 0 })]
    #[case("element_wise_operation(cl,cd)", EvaluationError::Arity { function: "element_wise_operation", expected: "3", found: 2 })]
    #[case("cl/0", EvaluationError::DivisionByZero)]
    fn evaluation_failures(
        candidate: PolarDataset,
        reference: PolarDataset,
        #[case] text: &str,
        #[case] expected: EvaluationError,
    ) {
        assert_eq!(run(text, &candidate, &reference), Err(expected));
    }

    #[rstest]
    #[case("element_wise_operation(cl,cd,cm)")]
    #[case("list_value_operation(cl,\"two\",+)")]
    #[case("list_value_operation(2,2,+)")]
    #[case("\"2\"*cl")]
    fn invalid_operands(candidate: PolarDataset, reference: PolarDataset, #[case] text: &str) {
        assert!(matches!(
            run(text, &candidate, &reference),
            Err(EvaluationError::InvalidOperands { .. })
        ));
    }

    #[rstest]
    fn reductions_reject_empty_series(reference: PolarDataset) {
        let empty = PolarFixture::new("empty").dataset();
        assert_eq!(
            run("average(cl)", &empty, &reference),
            Err(EvaluationError::EmptySeries { function: "average" })
        );
        assert_eq!(
            run("stall_angle", &empty, &reference),
            Err(EvaluationError::EmptyDataset)
        );
    }
}
