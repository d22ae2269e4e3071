use crate::engine::{EvalexprEvaluator, Env, Evaluator, Mode, Session};
use crate::error::Result;
use crate::{Key, Operand, Operator, parse_keys};
use std::cell::Cell;
use std::fmt;
use std::time::{Duration, Instant};

/// Options that affect evaluation and formatting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Options {
    /// Decimal places kept when rounding a result. Ten is enough to hide
    /// binary floating-point noise such as `0.1 + 0.2`.
    pub precision: u32,
}

impl Default for Options {
    fn default() -> Self {
        Self { precision: 10 }
    }
}

/// Apply one key to `session` and return the next session.
///
/// This is the pure form of [`Calculator::handle_click`]: the input session is
/// left untouched.
///
/// ```
/// use keycalc::{Key, Options, Session, transition};
///
/// let s = transition(&Session::new(), Key::Digit(7), &Options::default());
/// assert_eq!(s.current_value(), "7");
/// ```
pub fn transition(session: &Session, key: Key, options: &Options) -> Session {
    transition_with(session, key, options, &EvalexprEvaluator)
}

/// Like [`transition`], with a caller-supplied [`Evaluator`].
pub fn transition_with(session: &Session, key: Key, options: &Options, evaluator: &dyn Evaluator) -> Session {
    session.clone().step(key, &Env { options, evaluator })
}

/// A keypad calculator: one [`Session`] plus the collaborators that drive it.
///
/// # Example
/// ```
/// use keycalc::{Calculator, Key, Operator};
///
/// let mut calc = Calculator::new();
/// for key in [Key::Digit(2), Key::Operator(Operator::Add), Key::Digit(3), Key::Equals] {
///     calc.handle_click(key);
/// }
/// assert_eq!(calc.current_value(), "5");
///
/// calc.handle_click(Key::Equals);
/// assert_eq!(calc.current_value(), "8");
/// ```
pub struct Calculator {
    session: Session,
    options: Options,
    evaluator: Box<dyn Evaluator + Send + Sync>,
}

impl fmt::Debug for Calculator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Calculator")
            .field("session", &self.session)
            .field("options", &self.options)
            .field("evaluator", &"<evaluator>")
            .finish()
    }
}

impl Default for Calculator {
    fn default() -> Self {
        Self::new()
    }
}

impl Calculator {
    pub fn new() -> Self {
        Self::with_options(Options::default())
    }

    pub fn with_options(options: Options) -> Self {
        Self::with_evaluator(options, EvalexprEvaluator)
    }

    pub fn with_evaluator(options: Options, evaluator: impl Evaluator + Send + Sync + 'static) -> Self {
        Self { session: Session::new(), options, evaluator: Box::new(evaluator) }
    }

    /// Handle one key press (digits, operators and function keys alike).
    pub fn handle_click(&mut self, key: Key) {
        let env = Env { options: &self.options, evaluator: &*self.evaluator };
        self.session = std::mem::take(&mut self.session).step(key, &env);
    }

    pub fn handle_backspace(&mut self) {
        self.handle_click(Key::Backspace);
    }

    pub fn press_all(&mut self, keys: &[Key]) {
        for &key in keys {
            self.handle_click(key);
        }
    }

    /// Back to the identity session (same as pressing `AC`).
    pub fn reset(&mut self) {
        self.session = Session::new();
    }

    pub fn current_value(&self) -> String {
        self.session.current_value()
    }

    /// Raw expression (`*`, `/`); empty after `=`.
    pub fn expression(&self) -> String {
        self.session.raw_expression()
    }

    pub fn display_expression(&self) -> String {
        self.session.display_expression()
    }

    pub fn is_result_shown(&self) -> bool {
        self.session.is_result_shown()
    }

    pub fn last_result(&self) -> Option<&str> {
        self.session.last_result()
    }

    pub fn last_operator(&self) -> Option<Operator> {
        self.session.last_operator()
    }

    pub fn last_operand(&self) -> Option<&Operand> {
        self.session.last_operand()
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn options(&self) -> &Options {
        &self.options
    }
}

/// Result from [`run`] and [`run_with`].
#[derive(Debug, Clone)]
pub struct RunResult {
    /// The keys that were pressed.
    pub keys: Vec<Key>,
    /// Current value after the last key.
    pub value: String,
    /// Display expression after the last key.
    pub display: String,
    pub elapsed: Duration,
}

/// Snapshot taken after one key in [`run_verbose_with`].
#[derive(Debug, Clone)]
pub struct Step {
    pub key: Key,
    pub value: String,
    /// Raw expression after the key.
    pub expression: String,
    pub mode: Mode,
}

/// Additional details returned by [`run_verbose_with`].
#[derive(Debug, Clone)]
pub struct RunDetails {
    pub steps: Vec<Step>,
    /// Number of times the evaluator was called.
    pub evaluations: usize,
    /// Time spent inside the evaluator.
    pub evaluation_time: Duration,
    pub total: Duration,
}

/// Result from [`run_verbose_with`].
#[derive(Debug, Clone)]
pub struct RunResultVerbose {
    pub keys: Vec<Key>,
    pub value: String,
    pub display: String,
    pub elapsed: Duration,
    pub details: RunDetails,
}

/// Replay a key script (see [`parse_keys`]) on a fresh calculator.
///
/// ```
/// let out = keycalc::run("2+3===").unwrap();
/// assert_eq!(out.value, "11");
/// ```
pub fn run(script: &str) -> Result<RunResult> {
    run_with(script, &Options::default())
}

pub fn run_with(script: &str, options: &Options) -> Result<RunResult> {
    let start = Instant::now();
    let keys = parse_keys(script)?;

    let mut calc = Calculator::with_options(options.clone());
    calc.press_all(&keys);

    Ok(RunResult { value: calc.current_value(), display: calc.display_expression(), keys, elapsed: start.elapsed() })
}

/// Replay `script` and record a [`Step`] per key plus evaluator statistics.
///
/// The default [`run_with`] path does not allocate the per-key trace.
pub fn run_verbose_with(script: &str, options: &Options) -> Result<RunResultVerbose> {
    let start = Instant::now();
    let keys = parse_keys(script)?;

    let evaluator = Metered::new(&EvalexprEvaluator);
    let env = Env { options, evaluator: &evaluator };

    let mut session = Session::new();
    let mut steps = Vec::with_capacity(keys.len());
    for &key in &keys {
        session = session.step(key, &env);
        steps.push(Step {
            key,
            value: session.current_value(),
            expression: session.raw_expression(),
            mode: session.mode().clone(),
        });
    }

    let total = start.elapsed();
    let details =
        RunDetails { steps, evaluations: evaluator.calls.get(), evaluation_time: evaluator.elapsed.get(), total };

    Ok(RunResultVerbose {
        keys,
        value: session.current_value(),
        display: session.display_expression(),
        elapsed: total,
        details,
    })
}

/// Counts and times calls to the wrapped evaluator.
struct Metered<'a> {
    inner: &'a dyn Evaluator,
    calls: Cell<usize>,
    elapsed: Cell<Duration>,
}

impl<'a> Metered<'a> {
    fn new(inner: &'a dyn Evaluator) -> Self {
        Self { inner, calls: Cell::new(0), elapsed: Cell::new(Duration::ZERO) }
    }
}

impl Evaluator for Metered<'_> {
    fn evaluate(&self, expression: &str) -> Result<f64> {
        let start = Instant::now();
        let out = self.inner.evaluate(expression);
        self.calls.set(self.calls.get() + 1);
        self.elapsed.set(self.elapsed.get() + start.elapsed());
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::CalcError;

    #[test]
    fn calculator_starts_at_zero() {
        let calc = Calculator::new();
        assert_eq!(calc.current_value(), "0");
        assert_eq!(calc.expression(), "");
        assert_eq!(calc.display_expression(), "");
        assert!(!calc.is_result_shown());
    }

    #[test]
    fn handle_backspace_matches_backspace_key() {
        let mut calc = Calculator::new();
        calc.press_all(&[Key::Digit(1), Key::Digit(2)]);
        calc.handle_backspace();
        assert_eq!(calc.current_value(), "1");
        calc.handle_backspace();
        assert_eq!(calc.current_value(), "0");
    }

    #[test]
    fn transition_does_not_mutate_input() {
        let options = Options::default();
        let start = transition(&Session::new(), Key::Digit(4), &options);
        let next = transition(&start, Key::Digit(2), &options);
        assert_eq!(start.current_value(), "4");
        assert_eq!(next.current_value(), "42");
    }

    #[test]
    fn precision_option_controls_rounding() {
        let out = run_with("2÷3=", &Options { precision: 3 }).unwrap();
        assert_eq!(out.value, "0.667");
        assert_eq!(run("2÷3=").unwrap().value, "0.6666666667");
    }

    #[test]
    fn run_reports_keys_and_display() {
        let out = run("12+3").unwrap();
        assert_eq!(out.keys.len(), 4);
        assert_eq!(out.value, "12+3");
        assert_eq!(out.display, "12+3");
    }

    #[test]
    fn run_rejects_unknown_keys() {
        assert!(matches!(run("1+q"), Err(CalcError::UnknownKey(_))));
    }

    #[test]
    fn verbose_run_records_every_step_and_evaluation() {
        let out = run_verbose_with("2+3==", &Options::default()).unwrap();
        let values: Vec<&str> = out.details.steps.iter().map(|s| s.value.as_str()).collect();
        assert_eq!(values, ["2", "2+", "2+3", "5", "8"]);
        assert_eq!(out.details.evaluations, 2);
        assert_eq!(out.details.steps[3].mode, Mode::Result("5".to_string()));
        assert_eq!(out.elapsed, out.details.total);
        assert!(out.details.evaluation_time <= out.details.total);
    }
}
