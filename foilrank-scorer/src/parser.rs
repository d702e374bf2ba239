//! Precedence-climbing parser from tokens to [`Expr`].
//!
//! Grammar, loosest binding first:
//!
//! ```text
//! expr    = prefix (('+' | '-' | '*' | '/' | '^') prefix)*
//! prefix  = '-' prefix | atom
//! atom    = NUMBER | STRING | IDENT | IDENT '(' args ')' | '(' expr ')'
//! args    = arg (',' arg)*
//! arg     = OPERATOR | expr
//! ```
//!
//! `^` binds tighter than unary minus, which binds tighter than `*` and `/`.

use std::str::FromStr;

use foilrank_core::PolarField;

use crate::SyntaxError;
use crate::ast::{BinaryOperator, Callee, Expr, Function, PolarScalar};
use crate::lexer::{ParenIndex, Spanned, Token, match_parentheses, tokenize};

const UNARY_PRECEDENCE: u8 = 3;
const NORMALIZE: &str = "norm";
const STALL_ANGLE: &str = "stall_angle";

/// Parse normalised formula text into a syntax tree.
///
/// Field names and `stall_angle` are resolved here, on whole identifiers;
/// other identifiers become [`Expr::Unknown`] and fail only when evaluated.
///
/// # Errors
/// Returns [`SyntaxError`] when the text is empty, unbalanced, or not a
/// well-formed expression.
///
/// # Examples
/// ```
/// use foilrank_core::PolarField;
/// use foilrank_scorer::{BinaryOperator, Expr, parse};
///
/// # fn main() -> Result<(), foilrank_scorer::SyntaxError> {
/// let expr = parse("cl/cd")?;
/// assert_eq!(
///     expr,
///     Expr::binary(BinaryOperator::Div, Expr::Field(PolarField::Cl), Expr::Field(PolarField::Cd))
/// );
/// # Ok(())
/// # }
/// ```
pub fn parse(text: &str) -> Result<Expr, SyntaxError> {
    let parens = match_parentheses(text)?;
    let tokens = tokenize(text)?;
    if tokens.is_empty() {
        return Err(SyntaxError::Empty);
    }
    let mut parser = Parser {
        tokens,
        cursor: 0,
        parens,
    };
    let expr = parser.parse_expr(0)?;
    match parser.peek() {
        Some(spanned) => Err(unexpected(spanned)),
        None => Ok(expr),
    }
}

struct Parser {
    tokens: Vec<Spanned>,
    cursor: usize,
    parens: ParenIndex,
}

impl Parser {
    fn parse_expr(&mut self, min_precedence: u8) -> Result<Expr, SyntaxError> {
        let mut left = self.parse_prefix()?;
        while let Some(op) = self.peek_operator() {
            let precedence = op.precedence();
            if precedence < min_precedence {
                break;
            }
            self.advance();
            let next = if op.is_right_associative() {
                precedence
            } else {
                precedence + 1
            };
            let right = self.parse_expr(next)?;
            left = Expr::binary(op, left, right);
        }
        Ok(left)
    }

    fn parse_prefix(&mut self) -> Result<Expr, SyntaxError> {
        if self.peek_operator() == Some(BinaryOperator::Sub) {
            self.advance();
            let operand = self.parse_expr(UNARY_PRECEDENCE)?;
            return Ok(Expr::Negate(Box::new(operand)));
        }
        self.parse_atom()
    }

    fn parse_atom(&mut self) -> Result<Expr, SyntaxError> {
        let Some(Spanned { token, position }) = self.next() else {
            return Err(SyntaxError::UnexpectedEnd);
        };
        match token {
            Token::Number(value) => Ok(Expr::Literal(value)),
            Token::Text(text) => Ok(Expr::Text(text)),
            Token::Ident(name) if self.peek_token() == Some(&Token::LParen) => {
                self.parse_call(name, position)
            }
            Token::Ident(name) => Ok(resolve_identifier(name)),
            Token::LParen => {
                let inner = self.parse_expr(0)?;
                self.expect_close(position)?;
                Ok(inner)
            }
            other => Err(unexpected(&Spanned {
                token: other,
                position,
            })),
        }
    }

    fn parse_call(&mut self, name: String, position: usize) -> Result<Expr, SyntaxError> {
        let open = self.next().map_or(position, |spanned| spanned.position);
        let mut args = self.parse_args()?;
        self.expect_close(open)?;
        if name == NORMALIZE {
            return match (args.pop(), args.is_empty()) {
                (Some(operand), true) => Ok(Expr::normalize(operand)),
                (last, _) => Err(SyntaxError::NormArguments {
                    found: args.len() + usize::from(last.is_some()),
                    position,
                }),
            };
        }
        let callee = Function::from_name(&name).map_or(Callee::Unknown(name), Callee::Builtin);
        Ok(Expr::Call { callee, args })
    }

    fn parse_args(&mut self) -> Result<Vec<Expr>, SyntaxError> {
        let mut args = Vec::new();
        if self.peek_token() == Some(&Token::RParen) {
            return Ok(args);
        }
        loop {
            args.push(self.parse_arg()?);
            if self.peek_token() != Some(&Token::Comma) {
                return Ok(args);
            }
            self.advance();
        }
    }

    fn parse_arg(&mut self) -> Result<Expr, SyntaxError> {
        if let Some(op) = self.peek_operator() {
            let ends_argument = matches!(
                self.tokens.get(self.cursor + 1).map(|spanned| &spanned.token),
                Some(Token::Comma | Token::RParen) | None
            );
            if ends_argument {
                self.advance();
                return Ok(Expr::Operator(op));
            }
        }
        self.parse_expr(0)
    }

    fn expect_close(&mut self, open: usize) -> Result<(), SyntaxError> {
        let close = self
            .parens
            .closing(open)
            .ok_or(SyntaxError::UnmatchedOpen { position: open })?;
        match self.next() {
            Some(Spanned {
                token: Token::RParen,
                position,
            }) if position == close => Ok(()),
            Some(_) | None => Err(SyntaxError::UnclosedGroup { open, close }),
        }
    }

    fn peek(&self) -> Option<&Spanned> {
        self.tokens.get(self.cursor)
    }

    fn peek_token(&self) -> Option<&Token> {
        self.peek().map(|spanned| &spanned.token)
    }

    fn peek_operator(&self) -> Option<BinaryOperator> {
        match self.peek_token() {
            Some(Token::Operator(op)) => Some(*op),
            _ => None,
        }
    }

    fn next(&mut self) -> Option<Spanned> {
        let spanned = self.tokens.get(self.cursor).cloned();
        self.advance();
        spanned
    }

    const fn advance(&mut self) {
        self.cursor += 1;
    }
}

fn resolve_identifier(name: String) -> Expr {
    if name == STALL_ANGLE {
        return Expr::Scalar(PolarScalar::StallAngle);
    }
    PolarField::from_str(&name).map_or(Expr::Unknown(name), Expr::Field)
}

fn unexpected(spanned: &Spanned) -> SyntaxError {
    SyntaxError::UnexpectedToken {
        found: spanned.token.to_string(),
        position: spanned.position,
    }
}
