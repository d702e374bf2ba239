//! Syntax tree of a scoring formula.

use std::fmt;

use foilrank_core::PolarField;

/// Arithmetic operators available in formulas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOperator {
    /// `+`
    Add,
    /// `-`
    Sub,
    /// `*`
    Mul,
    /// `/`
    Div,
    /// `^`, right associative.
    Pow,
}

impl BinaryOperator {
    /// Binding power for precedence climbing; higher binds tighter.
    #[must_use]
    pub const fn precedence(self) -> u8 {
        match self {
            Self::Add | Self::Sub => 1,
            Self::Mul | Self::Div => 2,
            Self::Pow => 4,
        }
    }

    /// Report whether `a op b op c` groups as `a op (b op c)`.
    #[must_use]
    pub const fn is_right_associative(self) -> bool {
        matches!(self, Self::Pow)
    }

    /// Written form of the operator.
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mul => "*",
            Self::Div => "/",
            Self::Pow => "^",
        }
    }

    /// Parse the written form of an operator.
    ///
    /// # Examples
    /// ```
    /// use foilrank_scorer::BinaryOperator;
    ///
    /// assert_eq!(BinaryOperator::from_symbol("^"), Some(BinaryOperator::Pow));
    /// assert_eq!(BinaryOperator::from_symbol("%"), None);
    /// ```
    #[must_use]
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        match symbol {
            "+" => Some(Self::Add),
            "-" => Some(Self::Sub),
            "*" => Some(Self::Mul),
            "/" => Some(Self::Div),
            "^" => Some(Self::Pow),
            _ => None,
        }
    }
}

impl fmt::Display for BinaryOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Single numbers taken from a polar rather than from its rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PolarScalar {
    /// Header value `Max Cl/Cd`.
    MaxLiftDragRatio,
    /// Header value `Max Cl/Cd alpha`.
    AngleAtMaxLiftDragRatio,
    /// Heuristic stall angle.
    StallAngle,
}

/// Built-in formula functions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Function {
    /// Arithmetic mean.
    Average,
    /// Largest value.
    Max,
    /// Smallest value.
    Min,
    /// Sum of values.
    Sum,
    /// Element-wise absolute value.
    Abs,
    /// Broadcasting arithmetic between two operands.
    ElementWise,
    /// Arithmetic between a series and a constant.
    ListValue,
}

impl Function {
    /// Look up a function by its formula name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "average" => Some(Self::Average),
            "max" => Some(Self::Max),
            "min" => Some(Self::Min),
            "sum" => Some(Self::Sum),
            "abs" => Some(Self::Abs),
            "element_wise_operation" => Some(Self::ElementWise),
            "list_value_operation" => Some(Self::ListValue),
            _ => None,
        }
    }

    /// Formula name of the function.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Average => "average",
            Self::Max => "max",
            Self::Min => "min",
            Self::Sum => "sum",
            Self::Abs => "abs",
            Self::ElementWise => "element_wise_operation",
            Self::ListValue => "list_value_operation",
        }
    }
}

/// Target of a call expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Callee {
    /// A built-in function.
    Builtin(Function),
    /// A name that is not a known function; fails on evaluation.
    Unknown(String),
}

impl Callee {
    /// Name of the callee as written in formulas.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Builtin(function) => function.name(),
            Self::Unknown(name) => name,
        }
    }
}

/// Angles over which a normalisation evaluates its operand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NormScope {
    /// Angles shared by candidate and reference, in reference order.
    Intersection,
    /// Whatever angles the enclosing expression uses.
    Inherited,
}

/// A node of the formula syntax tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Numeric literal.
    Literal(f64),
    /// A polar column, evaluated as a series.
    Field(PolarField),
    /// A single number derived from the polar.
    Scalar(PolarScalar),
    /// Infix arithmetic.
    Binary {
        /// Operator.
        op: BinaryOperator,
        /// Left operand.
        left: Box<Expr>,
        /// Right operand.
        right: Box<Expr>,
    },
    /// Unary minus.
    Negate(Box<Expr>),
    /// Candidate value divided by the reference value.
    Normalize {
        /// Normalised expression.
        operand: Box<Expr>,
        /// Angles used for both sides.
        scope: NormScope,
    },
    /// Function call.
    Call {
        /// Called function.
        callee: Callee,
        /// Arguments in order.
        args: Vec<Expr>,
    },
    /// Bare operator passed as a function argument.
    Operator(BinaryOperator),
    /// Quoted string.
    Text(String),
    /// Identifier that names nothing known.
    Unknown(String),
}

impl Expr {
    /// Build a binary node.
    #[must_use]
    pub fn binary(op: BinaryOperator, left: Self, right: Self) -> Self {
        Self::Binary {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    /// Build a normalisation whose scope is yet to be decided.
    #[must_use]
    pub fn normalize(operand: Self) -> Self {
        Self::Normalize {
            operand: Box::new(operand),
            scope: NormScope::Inherited,
        }
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Literal(value) => write!(f, "{value}"),
            Self::Field(field) => write!(f, "{field}"),
            Self::Scalar(PolarScalar::MaxLiftDragRatio) => {
                f.write_str("max(element_wise_operation(cl,cd,/))")
            }
            Self::Scalar(PolarScalar::AngleAtMaxLiftDragRatio) => f.write_str("alpha(maxclcd)"),
            Self::Scalar(PolarScalar::StallAngle) => f.write_str("stall_angle"),
            Self::Binary { op, left, right } => write!(f, "({left}{op}{right})"),
            Self::Negate(operand) => write!(f, "-{operand}"),
            Self::Normalize { operand, .. } => write!(f, "norm({operand})"),
            Self::Call { callee, args } => {
                write!(f, "{}(", callee.name())?;
                for (index, arg) in args.iter().enumerate() {
                    if index > 0 {
                        f.write_str(",")?;
                    }
                    write!(f, "{arg}")?;
                }
                f.write_str(")")
            }
            Self::Operator(op) => write!(f, "{op}"),
            Self::Text(text) => write!(f, "\"{text}\""),
            Self::Unknown(name) => f.write_str(name),
        }
    }
}
