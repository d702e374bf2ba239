//! Error types raised while compiling and evaluating scoring formulas.

use camino::Utf8PathBuf;
use foilrank_core::{FormatError, PolarField};
use thiserror::Error;

/// Structural problems in formula text.
///
/// Positions are character offsets into the formula after whitespace has been
/// removed.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SyntaxError {
    /// The formula contains nothing but whitespace.
    #[error("formula is empty")]
    Empty,
    /// An opening parenthesis is never closed.
    #[error("unmatched '(' at position {position}")]
    UnmatchedOpen {
        /// Offset of the opening parenthesis.
        position: usize,
    },
    /// A closing parenthesis has no opening partner.
    #[error("unmatched ')' at position {position}")]
    UnmatchedClose {
        /// Offset of the closing parenthesis.
        position: usize,
    },
    /// A quoted string runs to the end of the formula.
    #[error("unterminated string starting at position {position}")]
    UnterminatedString {
        /// Offset of the opening quote.
        position: usize,
    },
    /// A character that starts no token.
    #[error("unexpected character {character:?} at position {position}")]
    UnexpectedCharacter {
        /// Offending character.
        character: char,
        /// Offset of the character.
        position: usize,
    },
    /// A run of digits and dots that is not a number.
    #[error("invalid number {raw:?} at position {position}")]
    InvalidNumber {
        /// Text of the malformed literal.
        raw: String,
        /// Offset of the literal.
        position: usize,
    },
    /// A token that cannot appear where it was found.
    #[error("unexpected {found} at position {position}")]
    UnexpectedToken {
        /// Rendering of the token.
        found: String,
        /// Offset of the token.
        position: usize,
    },
    /// A group or call ended before its closing parenthesis.
    #[error("expected ')' at position {close} to close '(' at position {open}")]
    UnclosedGroup {
        /// Offset of the opening parenthesis.
        open: usize,
        /// Offset of its closing partner.
        close: usize,
    },
    /// The formula ended in the middle of an expression.
    #[error("formula ends unexpectedly")]
    UnexpectedEnd,
    /// `norm` was called with other than one argument.
    #[error("norm takes exactly one argument, found {found} at position {position}")]
    NormArguments {
        /// Number of arguments supplied.
        found: usize,
        /// Offset of the `norm` identifier.
        position: usize,
    },
}

/// Errors that stop a formula from compiling.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum CompileError {
    /// The formula text is malformed.
    #[error("invalid formula syntax")]
    Syntax(#[from] SyntaxError),
    /// The shape of a normalised operand cannot be determined statically.
    #[error("cannot normalise {operand}: its value is neither a number nor a series")]
    UnresolvedNormalization {
        /// Rendering of the operand.
        operand: String,
    },
    /// A normalised operand cannot be evaluated for the reference airfoil.
    #[error("cannot normalise {operand} against the reference airfoil")]
    ReferenceProbe {
        /// Rendering of the operand.
        operand: String,
        /// Why the reference evaluation failed.
        #[source]
        source: EvaluationError,
    },
}

/// Errors raised while evaluating a compiled formula for one candidate.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum EvaluationError {
    /// Element-wise arithmetic between series of different lengths.
    #[error("series lengths differ: {left} and {right}")]
    LengthMismatch {
        /// Length of the left operand.
        left: usize,
        /// Length of the right operand.
        right: usize,
    },
    /// A divisor was exactly zero.
    #[error("division by zero")]
    DivisionByZero,
    /// Operands of the wrong kind for an operation.
    #[error("invalid operands for {operation}: {detail}")]
    InvalidOperands {
        /// Operation that rejected its operands.
        operation: &'static str,
        /// What was wrong.
        detail: String,
    },
    /// The formula produced a series rather than a single number.
    #[error("formula produced a series of {len} values instead of a number")]
    NonScalarResult {
        /// Length of the produced series.
        len: usize,
    },
    /// The formula produced NaN or an infinity.
    #[error("formula produced the non-finite value {value}")]
    NonFiniteResult {
        /// Value produced.
        value: f64,
    },
    /// A reduction was applied to an empty series.
    #[error("{function} of an empty series")]
    EmptySeries {
        /// Reducing function.
        function: &'static str,
    },
    /// `stall_angle` was requested for a polar without samples.
    #[error("polar has no samples")]
    EmptyDataset,
    /// A field was requested at an angle the polar does not hold.
    #[error("no {field} sample at angle {angle}")]
    MissingAngle {
        /// Requested field.
        field: PolarField,
        /// Missing angle of attack.
        angle: f64,
    },
    /// An identifier that names no field or value.
    #[error("unknown identifier '{name}'")]
    UnknownIdentifier {
        /// Identifier as written.
        name: String,
    },
    /// A call to a function that does not exist.
    #[error("unknown function '{name}'")]
    UnknownFunction {
        /// Function name as written.
        name: String,
    },
    /// A function called with the wrong number of arguments.
    #[error("{function} expects {expected} argument(s), found {found}")]
    Arity {
        /// Function name.
        function: &'static str,
        /// Accepted argument count.
        expected: &'static str,
        /// Supplied argument count.
        found: usize,
    },
}

/// Errors that abort a ranking run.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Reading the reference polar file failed.
    #[error("failed to read reference polar {path}")]
    ReadReference {
        /// Path of the reference file.
        path: Utf8PathBuf,
        /// Source error from std I/O.
        #[source]
        source: std::io::Error,
    },
    /// The reference polar file is malformed.
    #[error("reference polar {path} is malformed")]
    Reference {
        /// Path of the reference file.
        path: Utf8PathBuf,
        /// Source error from polar parsing.
        #[source]
        source: FormatError,
    },
    /// The formula does not compile.
    #[error("failed to compile scoring formula")]
    Compile(#[from] CompileError),
}

/// Reasons a candidate file is rejected before scoring.
#[derive(Debug, Error)]
pub enum CandidateError {
    /// The candidate file could not be read.
    #[error("failed to read polar file")]
    Read(#[source] std::io::Error),
    /// The candidate file is malformed.
    #[error("malformed polar file")]
    Format(#[source] FormatError),
}
