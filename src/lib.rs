#[macro_use]
mod macros;
mod api;
mod engine;
mod error;
mod keys;

pub use api::{
    Calculator, Options, RunDetails, RunResult, RunResultVerbose, Step, run, run_verbose_with, run_with, transition,
    transition_with,
};
pub use engine::{EvalexprEvaluator, Evaluator, Mode, Session, format_with_commas};
pub use error::{CalcError, Result};
pub use keys::{KEYPAD, Key, parse_keys};

use std::fmt;

// --- Expression tokens ------------------------------------------------------

/// One of the four arithmetic operators on the keypad.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    Add,
    Subtract,
    Multiply,
    Divide,
}

impl Operator {
    /// Symbol used in the raw expression and handed to the evaluator.
    pub fn symbol(self) -> char {
        match self {
            Operator::Add => '+',
            Operator::Subtract => '-',
            Operator::Multiply => '*',
            Operator::Divide => '/',
        }
    }

    /// Glyph shown on the keypad and in the display expression.
    pub fn glyph(self) -> char {
        match self {
            Operator::Add => '+',
            Operator::Subtract => '-',
            Operator::Multiply => '×',
            Operator::Divide => '÷',
        }
    }

    /// Accepts both raw symbols and display glyphs.
    pub(crate) fn from_char(c: char) -> Option<Self> {
        match c {
            '+' => Some(Operator::Add),
            '-' => Some(Operator::Subtract),
            '*' | '×' => Some(Operator::Multiply),
            '/' | '÷' => Some(Operator::Divide),
            _ => None,
        }
    }

    /// `+` and `-` scale a following percent by the preceding operand.
    pub(crate) fn is_additive(self) -> bool {
        matches!(self, Operator::Add | Operator::Subtract)
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.glyph())
    }
}

/// How an operand is prefixed in the expression text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum Sign {
    /// `12`
    Positive,
    /// `-12`: only produced when a negative result seeds a new expression.
    Negative,
    /// `(-12)`: the negation marker written by the sign toggle.
    Wrapped,
    /// `(12`: a bare parenthesis left behind by backspace.
    Open,
}

/// A numeric segment of the expression.
///
/// The text of an operand is always `prefix digits [")"] ["%"]`, so every
/// prefix of a rendered expression can be tokenized back into operands.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Operand {
    pub(crate) sign: Sign,
    /// Digits and at most one decimal point, as typed.
    pub(crate) digits: String,
    pub(crate) percent: bool,
    /// Whether the closing `)` of a parenthesized operand is present.
    pub(crate) closed: bool,
}

impl Operand {
    pub(crate) fn new(sign: Sign, digits: impl Into<String>) -> Self {
        let closed = matches!(sign, Sign::Wrapped);
        Operand { sign, digits: digits.into(), percent: false, closed }
    }

    pub(crate) fn positive(digits: impl Into<String>) -> Self {
        Operand::new(Sign::Positive, digits)
    }

    /// Digits of the operand without sign, parentheses or `%`.
    pub fn digits(&self) -> &str {
        &self.digits
    }

    pub fn is_negative(&self) -> bool {
        matches!(self.sign, Sign::Negative | Sign::Wrapped)
    }

    pub fn is_percent(&self) -> bool {
        self.percent
    }

    pub(crate) fn has_digits(&self) -> bool {
        self.digits.bytes().any(|b| b.is_ascii_digit())
    }

    /// True when the operand can be handed to the evaluator. A trailing
    /// decimal point still counts as complete (`5.` evaluates as `5.0`).
    pub(crate) fn is_complete(&self) -> bool {
        self.has_digits()
            && match self.sign {
                Sign::Positive | Sign::Negative => true,
                Sign::Wrapped | Sign::Open => self.closed,
            }
    }

    /// `n` becomes `(-n)`; `(-n)`, `-n` and leftovers like `(n` become `n`.
    pub(crate) fn toggled(&self) -> Operand {
        let sign = match self.sign {
            Sign::Positive => Sign::Wrapped,
            Sign::Negative | Sign::Wrapped | Sign::Open => Sign::Positive,
        };
        Operand { sign, digits: self.digits.clone(), percent: self.percent, closed: sign == Sign::Wrapped }
    }

    pub(crate) fn write_to(&self, out: &mut String) {
        match self.sign {
            Sign::Positive => {}
            Sign::Negative => out.push('-'),
            Sign::Wrapped => out.push_str("(-"),
            Sign::Open => out.push('('),
        }
        out.push_str(&self.digits);
        if self.closed && matches!(self.sign, Sign::Wrapped | Sign::Open) {
            out.push(')');
        }
        if self.percent {
            out.push('%');
        }
    }
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = String::new();
        self.write_to(&mut out);
        f.write_str(&out)
    }
}

/// An element of the expression: operands and operators alternate, starting
/// with an operand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Token {
    Operand(Operand),
    Operator(Operator),
}
