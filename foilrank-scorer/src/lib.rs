//! Scoring formula compiler and evaluator for airfoil polars.
//!
//! A formula is free text such as `average(norm(cl/cd)) * 2`. Compilation
//! normalises the text, matches its parentheses, parses it into an [`Expr`],
//! resolves the max lift/drag idioms and decides, from the static
//! [`Shape`] of each operand, which angles every `norm(...)` compares. The
//! resulting [`CompiledExpression`] is bound to one reference polar and
//! evaluated once per candidate.
//!
//! Values are numbers or per-angle series. Arithmetic broadcasts a number
//! over a series; two series must have equal lengths; a single-element
//! series collapses to a number. A candidate's score must be a finite
//! number.
//!
//! [`rank_polar_files`] drives the whole run over polar files on disk,
//! isolating per-candidate failures.
//!
//! # Examples
//!
//! ```
//! use foilrank_core::test_support::PolarFixture;
//! use foilrank_scorer::CompiledExpression;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let reference = PolarFixture::new("reference")
//!     .with_lift(&[(0.0, 0.5), (2.0, 1.0)])
//!     .dataset();
//! let candidate = PolarFixture::new("candidate")
//!     .with_lift(&[(0.0, 1.0), (2.0, 2.0)])
//!     .dataset();
//!
//! let compiled = CompiledExpression::compile("max(norm(cl)) + stall_angle", reference)?;
//! assert_eq!(compiled.score_candidate(&candidate)?, 4.0);
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

mod ast;
mod broadcast;
mod compiler;
mod error;
mod evaluator;
mod lexer;
mod parser;
mod pipeline;
mod shape;

pub use ast::{BinaryOperator, Callee, Expr, Function, NormScope, PolarScalar};
pub use broadcast::{Value, scalar_combine, series_combine};
pub use compiler::{CompiledExpression, compile};
pub use error::{CandidateError, CompileError, EvaluationError, PipelineError, SyntaxError};
pub use lexer::{ParenIndex, Spanned, Token, match_parentheses, normalise, tokenize};
pub use parser::parse;
pub use pipeline::{
    RankingReport, RejectedCandidate, error_chain, load_airfoil, rank_polar_files,
};
pub use shape::{Shape, infer_shape};
