//! Compile formula text into a reusable [`CompiledExpression`].

use foilrank_core::{PolarDataset, PolarField, Scorer};
use log::debug;

use crate::ast::{BinaryOperator, Callee, Expr, Function, NormScope, PolarScalar};
use crate::broadcast::Value;
use crate::evaluator::{AngleScope, Evaluator, Frame, Subject};
use crate::lexer::normalise;
use crate::parser::parse;
use crate::shape::{Shape, infer_shape};
use crate::{CompileError, EvaluationError};

const ALPHA_CALL: &str = "alpha";
const MAX_LIFT_DRAG_NAME: &str = "maxclcd";

/// A scoring formula bound to its reference airfoil.
///
/// Compilation happens once per run; the expression is then evaluated once
/// per candidate.
///
/// # Examples
///
/// ```
/// use foilrank_core::test_support::PolarFixture;
/// use foilrank_scorer::{CompiledExpression, Value};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let reference = PolarFixture::new("ref").with_lift(&[(0.0, 1.0), (4.0, 2.0)]).dataset();
/// let candidate = PolarFixture::new("cand").with_lift(&[(0.0, 1.5), (4.0, 3.0)]).dataset();
///
/// let compiled = CompiledExpression::compile("average(norm(cl))", reference)?;
/// assert_eq!(compiled.score_candidate(&candidate)?, 1.5);
///
/// let per_angle = CompiledExpression::compile("norm(cl)", compiled.reference().clone())?;
/// assert_eq!(per_angle.evaluate(&candidate)?, Value::Series(vec![1.5, 1.5]));
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledExpression {
    formula: String,
    expr: Expr,
    reference: PolarDataset,
}

impl CompiledExpression {
    /// Compile `formula` against `reference`.
    ///
    /// The text is normalised, its parentheses matched, and the parsed tree
    /// has the max lift/drag idioms resolved and every `norm` annotated with
    /// the angles it compares. Each normalised operand is then evaluated once
    /// for the reference to catch formulas the reference cannot support.
    ///
    /// # Errors
    /// Returns [`CompileError`] for malformed text, normalisations of
    /// undeterminable shape, and operands the reference cannot evaluate.
    pub fn compile(formula: &str, reference: PolarDataset) -> Result<Self, CompileError> {
        let text = normalise(formula);
        let mut expr = resolve_idioms(parse(&text)?);
        annotate_normalizations(&mut expr)?;
        probe_reference(&expr, &reference)?;
        debug!("Compiled formula {formula:?} to {expr}");
        Ok(Self {
            formula: formula.to_owned(),
            expr,
            reference,
        })
    }

    /// Formula text as supplied.
    #[must_use]
    pub fn formula(&self) -> &str {
        &self.formula
    }

    /// Compiled syntax tree.
    #[must_use]
    pub const fn expression(&self) -> &Expr {
        &self.expr
    }

    /// Reference airfoil the formula normalises against.
    #[must_use]
    pub const fn reference(&self) -> &PolarDataset {
        &self.reference
    }

    /// Evaluate the formula for `candidate`.
    ///
    /// # Errors
    /// Returns [`EvaluationError`] when the candidate's data cannot support
    /// the formula.
    pub fn evaluate(&self, candidate: &PolarDataset) -> Result<Value, EvaluationError> {
        Evaluator::new(candidate, &self.reference).evaluate(&self.expr, Frame::ROOT)
    }

    /// Evaluate the formula for `candidate` and require a finite number.
    ///
    /// # Errors
    /// Returns [`EvaluationError::NonScalarResult`] when the formula yields a
    /// series, [`EvaluationError::NonFiniteResult`] for NaN or infinities, and
    /// any error raised by [`Self::evaluate`].
    pub fn score_candidate(&self, candidate: &PolarDataset) -> Result<f64, EvaluationError> {
        let value = self.evaluate(candidate)?.into_scalar()?;
        if value.is_finite() {
            Ok(value)
        } else {
            Err(EvaluationError::NonFiniteResult { value })
        }
    }
}

impl Scorer for CompiledExpression {
    type Error = EvaluationError;

    fn score(&self, candidate: &PolarDataset) -> Result<f64, Self::Error> {
        self.score_candidate(candidate)
    }
}

/// Compile `formula` against `reference`.
///
/// # Errors
/// See [`CompiledExpression::compile`].
pub fn compile(formula: &str, reference: PolarDataset) -> Result<CompiledExpression, CompileError> {
    CompiledExpression::compile(formula, reference)
}

/// Replace the header-value idioms with direct references.
///
/// `max(element_wise_operation(cl,cd,/))` reads `Max Cl/Cd` and
/// `alpha(maxclcd)` reads `Max Cl/Cd alpha`.
fn resolve_idioms(expr: Expr) -> Expr {
    match expr {
        Expr::Call { callee, args } => match idiom(&callee, &args) {
            Some(scalar) => Expr::Scalar(scalar),
            None => Expr::Call {
                callee,
                args: args.into_iter().map(resolve_idioms).collect(),
            },
        },
        Expr::Binary { op, left, right } => Expr::binary(op, resolve_idioms(*left), resolve_idioms(*right)),
        Expr::Negate(operand) => Expr::Negate(Box::new(resolve_idioms(*operand))),
        Expr::Normalize { operand, scope } => Expr::Normalize {
            operand: Box::new(resolve_idioms(*operand)),
            scope,
        },
        leaf => leaf,
    }
}

fn idiom(callee: &Callee, args: &[Expr]) -> Option<PolarScalar> {
    match (callee, args) {
        (
            Callee::Builtin(Function::Max),
            [
                Expr::Call {
                    callee: Callee::Builtin(Function::ElementWise),
                    args: inner,
                },
            ],
        ) if is_lift_over_drag(inner) => Some(PolarScalar::MaxLiftDragRatio),
        (Callee::Unknown(name), [Expr::Unknown(arg)])
            if name == ALPHA_CALL && arg == MAX_LIFT_DRAG_NAME =>
        {
            Some(PolarScalar::AngleAtMaxLiftDragRatio)
        }
        _ => None,
    }
}

fn is_lift_over_drag(args: &[Expr]) -> bool {
    match args {
        [
            Expr::Field(PolarField::Cl),
            Expr::Field(PolarField::Cd),
            Expr::Operator(BinaryOperator::Div),
        ] => true,
        [
            Expr::Field(PolarField::Cl),
            Expr::Field(PolarField::Cd),
            Expr::Text(symbol),
        ] => BinaryOperator::from_symbol(symbol) == Some(BinaryOperator::Div),
        _ => false,
    }
}

/// Decide the angle scope of every `norm`, innermost first.
///
/// A series operand is compared over the angles both airfoils share; a
/// scalar operand keeps whatever angles its surroundings use.
fn annotate_normalizations(expr: &mut Expr) -> Result<(), CompileError> {
    match expr {
        Expr::Normalize { operand, scope } => {
            annotate_normalizations(operand)?;
            *scope = match infer_shape(operand) {
                Shape::Series => NormScope::Intersection,
                Shape::Scalar => NormScope::Inherited,
                Shape::Unknown => {
                    return Err(CompileError::UnresolvedNormalization {
                        operand: operand.to_string(),
                    });
                }
            };
            Ok(())
        }
        Expr::Binary { left, right, .. } => {
            annotate_normalizations(left)?;
            annotate_normalizations(right)
        }
        Expr::Negate(operand) => annotate_normalizations(operand),
        Expr::Call { args, .. } => args.iter_mut().try_for_each(annotate_normalizations),
        Expr::Literal(_)
        | Expr::Field(_)
        | Expr::Scalar(_)
        | Expr::Operator(_)
        | Expr::Text(_)
        | Expr::Unknown(_) => Ok(()),
    }
}

/// Evaluate every normalised operand with the reference as the candidate.
fn probe_reference(expr: &Expr, reference: &PolarDataset) -> Result<(), CompileError> {
    let mut operands = Vec::new();
    collect_normalizations(expr, AngleScope::Own, &mut operands);
    let evaluator = Evaluator::new(reference, reference);
    for (operand, scope) in operands {
        let frame = Frame {
            subject: Subject::Candidate,
            scope,
        };
        evaluator
            .evaluate(operand, frame)
            .map_err(|source| CompileError::ReferenceProbe {
                operand: operand.to_string(),
                source,
            })?;
    }
    Ok(())
}

fn collect_normalizations<'e>(
    expr: &'e Expr,
    enclosing: AngleScope,
    out: &mut Vec<(&'e Expr, AngleScope)>,
) {
    match expr {
        Expr::Normalize { operand, scope } => {
            let inner = enclosing.within(*scope);
            out.push((operand, inner));
            collect_normalizations(operand, inner, out);
        }
        Expr::Binary { left, right, .. } => {
            collect_normalizations(left, enclosing, out);
            collect_normalizations(right, enclosing, out);
        }
        Expr::Negate(operand) => collect_normalizations(operand, enclosing, out),
        Expr::Call { args, .. } => {
            for arg in args {
                collect_normalizations(arg, enclosing, out);
            }
        }
        Expr::Literal(_)
        | Expr::Field(_)
        | Expr::Scalar(_)
        | Expr::Operator(_)
        | Expr::Text(_)
        | Expr::Unknown(_) => {}
    }
}
