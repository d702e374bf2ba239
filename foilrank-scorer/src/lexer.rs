//! Formula text normalisation, parenthesis matching, and tokenisation.
//!
//! Every position reported here is a character offset into the normalised
//! text, which has no whitespace and is entirely lowercase.

use std::collections::BTreeMap;
use std::fmt;
use std::iter::Peekable;
use std::str::Chars;

use crate::SyntaxError;
use crate::ast::BinaryOperator;

/// Strip every whitespace character and lowercase the rest.
///
/// # Examples
/// ```
/// use foilrank_scorer::normalise;
///
/// assert_eq!(normalise(" Norm( CL ) /\tCd\n"), "norm(cl)/cd");
/// ```
#[must_use]
pub fn normalise(formula: &str) -> String {
    formula
        .chars()
        .filter(|character| !character.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}

/// Opening parenthesis offsets mapped to their closing partners.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParenIndex {
    pairs: BTreeMap<usize, usize>,
}

impl ParenIndex {
    /// Offset of the parenthesis closing the one opened at `open`.
    #[must_use]
    pub fn closing(&self, open: usize) -> Option<usize> {
        self.pairs.get(&open).copied()
    }

    /// Iterate over `(open, close)` pairs in order of the opening offset.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.pairs.iter().map(|(&open, &close)| (open, close))
    }

    /// Number of matched pairs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    /// Report whether the text has no parentheses.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

/// Pair every parenthesis in `text` in a single left-to-right scan.
///
/// Parentheses inside quoted strings are ignored.
///
/// # Errors
/// Returns [`SyntaxError::UnmatchedClose`] for a `)` with nothing open and
/// [`SyntaxError::UnmatchedOpen`] for the innermost `(` left open at the end.
///
/// # Examples
/// ```
/// use foilrank_scorer::{SyntaxError, match_parentheses};
///
/// # fn main() -> Result<(), SyntaxError> {
/// let index = match_parentheses("norm(norm(cl))")?;
/// assert_eq!(index.closing(4), Some(13));
/// assert_eq!(index.closing(9), Some(12));
/// assert_eq!(
///     match_parentheses("norm(cl"),
///     Err(SyntaxError::UnmatchedOpen { position: 4 })
/// );
/// # Ok(())
/// # }
/// ```
pub fn match_parentheses(text: &str) -> Result<ParenIndex, SyntaxError> {
    let mut pairs = BTreeMap::new();
    let mut open = Vec::new();
    let mut quote: Option<char> = None;
    for (position, character) in text.chars().enumerate() {
        match (quote, character) {
            (Some(delimiter), _) if character == delimiter => quote = None,
            (Some(_), _) => {}
            (None, '"' | '\'') => quote = Some(character),
            (None, '(') => open.push(position),
            (None, ')') => {
                let start = open.pop().ok_or(SyntaxError::UnmatchedClose { position })?;
                pairs.insert(start, position);
            }
            (None, _) => {}
        }
    }
    match open.pop() {
        Some(position) => Err(SyntaxError::UnmatchedOpen { position }),
        None => Ok(ParenIndex { pairs }),
    }
}

/// A lexical unit of a formula.
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    /// Numeric literal.
    Number(f64),
    /// Identifier: letters, digits, and underscores, not starting with a digit.
    Ident(String),
    /// Quoted string, without its quotes.
    Text(String),
    /// Arithmetic operator.
    Operator(BinaryOperator),
    /// `(`
    LParen,
    /// `)`
    RParen,
    /// `,`
    Comma,
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(value) => write!(f, "number {value}"),
            Self::Ident(name) => write!(f, "identifier '{name}'"),
            Self::Text(text) => write!(f, "string \"{text}\""),
            Self::Operator(op) => write!(f, "operator '{op}'"),
            Self::LParen => f.write_str("'('"),
            Self::RParen => f.write_str("')'"),
            Self::Comma => f.write_str("','"),
        }
    }
}

/// A token together with the offset of its first character.
#[derive(Debug, Clone, PartialEq)]
pub struct Spanned {
    /// The token.
    pub token: Token,
    /// Offset of the token's first character.
    pub position: usize,
}

/// Split normalised formula text into tokens.
///
/// # Errors
/// Returns [`SyntaxError`] for characters that start no token, malformed
/// numbers, and unterminated strings.
pub fn tokenize(text: &str) -> Result<Vec<Spanned>, SyntaxError> {
    Lexer {
        chars: text.chars().peekable(),
        position: 0,
    }
    .run()
}

struct Lexer<'a> {
    chars: Peekable<Chars<'a>>,
    position: usize,
}

impl Lexer<'_> {
    fn run(mut self) -> Result<Vec<Spanned>, SyntaxError> {
        let mut tokens = Vec::new();
        while let Some(&character) = self.chars.peek() {
            let position = self.position;
            if character.is_whitespace() {
                self.bump();
                continue;
            }
            let token = match character {
                '(' => self.single(Token::LParen),
                ')' => self.single(Token::RParen),
                ',' => self.single(Token::Comma),
                '"' | '\'' => self.read_text(character)?,
                c if c.is_ascii_digit() || c == '.' => self.read_number()?,
                c if c.is_alphabetic() || c == '_' => Token::Ident(self.take_while(is_ident_char)),
                c => {
                    let op = BinaryOperator::from_symbol(c.encode_utf8(&mut [0; 4])).ok_or(
                        SyntaxError::UnexpectedCharacter {
                            character: c,
                            position,
                        },
                    )?;
                    self.single(Token::Operator(op))
                }
            };
            tokens.push(Spanned { token, position });
        }
        Ok(tokens)
    }

    fn bump(&mut self) -> Option<char> {
        let next = self.chars.next();
        if next.is_some() {
            self.position += 1;
        }
        next
    }

    fn single(&mut self, token: Token) -> Token {
        self.bump();
        token
    }

    fn take_while(&mut self, accept: impl Fn(char) -> bool) -> String {
        let mut taken = String::new();
        while let Some(&character) = self.chars.peek() {
            if !accept(character) {
                break;
            }
            taken.push(character);
            self.bump();
        }
        taken
    }

    fn read_number(&mut self) -> Result<Token, SyntaxError> {
        let position = self.position;
        let mut raw = self.take_while(|c| c.is_ascii_digit() || c == '.');
        self.read_exponent(&mut raw);
        raw.parse::<f64>()
            .map(Token::Number)
            .map_err(|_| SyntaxError::InvalidNumber { raw, position })
    }

    /// Append an `e[+-]digits` suffix to `raw`. An `e` not followed by
    /// digits is left for the identifier reader.
    fn read_exponent(&mut self, raw: &mut String) {
        let mut ahead = self.chars.clone();
        let Some(marker @ ('e' | 'E')) = ahead.next() else {
            return;
        };
        let mut prefix = String::from(marker);
        if let Some(&sign @ ('+' | '-')) = ahead.peek() {
            prefix.push(sign);
            ahead.next();
        }
        if !ahead.peek().is_some_and(char::is_ascii_digit) {
            return;
        }
        for _ in prefix.chars() {
            self.bump();
        }
        raw.push_str(&prefix);
        raw.push_str(&self.take_while(|c| c.is_ascii_digit()));
    }

    fn read_text(&mut self, delimiter: char) -> Result<Token, SyntaxError> {
        let position = self.position;
        self.bump();
        let text = self.take_while(|c| c != delimiter);
        match self.bump() {
            Some(_) => Ok(Token::Text(text)),
            None => Err(SyntaxError::UnterminatedString { position }),
        }
    }
}

fn is_ident_char(character: char) -> bool {
    character.is_alphanumeric() || character == '_'
}
