use super::evaluate::equals;
use super::evaluator::Evaluator;
use super::input;
use super::render::{Notation, render};
use super::tokenize::{parse_operand, tokenize};
use crate::{Key, Operand, Operator, Options, Token};

/// What the calculator shows when the expression is empty.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Mode {
    /// Building an expression; an empty one shows `0`.
    #[default]
    Composing,
    /// Just evaluated; holds the formatted result.
    Result(String),
    /// The last evaluation failed. The next key starts over.
    Error,
}

/// Shown as the current value after a failed evaluation.
pub(crate) const ERROR_MARKER: &str = "Error";

/// The complete state of one calculator.
///
/// Sessions are plain values: every key produces a new session from the old
/// one, see [`crate::transition`]. The expression is stored as tokens; the
/// raw and display strings are rendered on demand.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Session {
    pub(crate) tokens: Vec<Token>,
    pub(crate) mode: Mode,
    pub(crate) last_operator: Option<Operator>,
    pub(crate) last_operand: Option<Operand>,
    pub(crate) last_result: Option<String>,
}

/// Collaborators needed by a transition.
pub(crate) struct Env<'a> {
    pub options: &'a Options,
    pub evaluator: &'a dyn Evaluator,
}

impl Session {
    /// Identity session: current value `0`, nothing cached.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(&self) -> &Mode {
        &self.mode
    }

    pub fn is_result_shown(&self) -> bool {
        matches!(self.mode, Mode::Result(_))
    }

    pub fn is_error(&self) -> bool {
        self.mode == Mode::Error
    }

    /// Expression with evaluator operators (`*`, `/`); empty after `=`.
    pub fn raw_expression(&self) -> String {
        render(&self.tokens, Notation::Raw)
    }

    /// Expression with keypad glyphs, or the result right after `=`.
    pub fn display_expression(&self) -> String {
        match &self.mode {
            Mode::Result(value) => value.clone(),
            Mode::Error => String::new(),
            Mode::Composing => render(&self.tokens, Notation::Display),
        }
    }

    /// The main readout.
    pub fn current_value(&self) -> String {
        match &self.mode {
            Mode::Error => ERROR_MARKER.to_string(),
            Mode::Result(value) => value.clone(),
            Mode::Composing if self.tokens.is_empty() => "0".to_string(),
            Mode::Composing => render(&self.tokens, Notation::Display),
        }
    }

    pub fn last_operator(&self) -> Option<Operator> {
        self.last_operator
    }

    pub fn last_operand(&self) -> Option<&Operand> {
        self.last_operand.as_ref()
    }

    pub fn last_result(&self) -> Option<&str> {
        self.last_result.as_deref()
    }

    /// Apply one key.
    pub(crate) fn step(self, key: Key, env: &Env<'_>) -> Session {
        let session = if self.is_error() { Session::new() } else { self };

        let next = match key {
            Key::Clear => Session::new(),
            Key::Backspace => session.backspace(),
            Key::Equals => equals(session, env),
            Key::Digit(d) => input::digit(session, d),
            Key::Operator(op) => input::operator(session, op),
            Key::Decimal => input::decimal(session),
            Key::ToggleSign => input::toggle_sign(session),
            Key::Percent => input::percent(session),
        };

        tracing::debug!(
            target: "keycalc",
            key = %key,
            mode = ?next.mode,
            raw = %next.raw_expression(),
            "key handled"
        );
        next
    }

    /// Drop one trailing character of the rendered expression.
    ///
    /// A shown result is first turned back into an editable operand.
    fn backspace(mut self) -> Session {
        if let Mode::Result(value) = &self.mode {
            self.tokens = parse_operand(value).map(Token::Operand).into_iter().collect();
            self.mode = Mode::Composing;
        }

        let mut text = render(&self.tokens, Notation::Raw);
        text.pop();
        // Every prefix of a rendered expression tokenizes.
        self.tokens = match tokenize(&text) {
            Ok(tokens) => tokens,
            Err(err) => {
                tracing::debug!(target: "keycalc", error = %err, "backspace left an untokenizable expression");
                Vec::new()
            }
        };
        self
    }

    /// Trailing token, when it is an operand.
    pub(crate) fn trailing_operand(&mut self) -> Option<&mut Operand> {
        match self.tokens.last_mut() {
            Some(Token::Operand(operand)) => Some(operand),
            _ => None,
        }
    }

    /// Replace the expression with a single operand and resume composing.
    pub(crate) fn restart_with(&mut self, operand: Operand) {
        self.tokens = vec![Token::Operand(operand)];
        self.mode = Mode::Composing;
    }
}
