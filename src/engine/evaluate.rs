//! The `=` key.
//!
//! ```text
//! tokens ─┬─ empty?  ──▶ [last_result] [last_operator] [last_operand]
//!         ├─ dangling operator? ──▶ append last_operand (or give up)
//!         ├─ trailing_pair(typed tokens) ──▶ cached for the next `=`
//!         ├─ normalize ──▶ "50.0 + (50.0 * 10.0 / 100.0)"
//!         └─ Evaluator::evaluate ──▶ round(precision) ──▶ "55"
//! ```
//!
//! Percent literals are resolved here, never while typing:
//!
//! - after `+`/`-` they scale the preceding operand: `50+10%` is `50 + 5`;
//! - anywhere else they are divided by 100: `50×10%` is `50 × 0.1`, and a
//!   lone `5%` evaluates to `0.05`.

use super::render::{Notation, render};
use super::session::{Env, Mode, Session};
use super::tokenize::parse_operand;
use crate::error::{CalcError, Result};
use crate::{Operand, Operator, Sign, Token};

pub(crate) fn equals(session: Session, env: &Env<'_>) -> Session {
    let Some(tokens) = working_tokens(&session) else {
        return session;
    };

    let (last_operator, last_operand) = match trailing_pair(&session.tokens) {
        Some((op, operand)) => (Some(op), Some(operand)),
        None => (session.last_operator, session.last_operand.clone()),
    };

    let outcome = normalize(&tokens).and_then(|expression| compute(&expression, env));

    match outcome {
        Ok(value) => Session {
            tokens: Vec::new(),
            mode: Mode::Result(value.clone()),
            last_operator,
            last_operand,
            last_result: Some(value),
        },
        Err(err) => {
            tracing::debug!(target: "keycalc", error = %err, "evaluation failed");
            Session { tokens: Vec::new(), mode: Mode::Error, last_operator, last_operand, ..session }
        }
    }
}

/// The tokens `=` actually evaluates, or `None` when there is nothing to do.
fn working_tokens(session: &Session) -> Option<Vec<Token>> {
    let mut tokens = if session.tokens.is_empty() {
        // Repeated `=`: re-apply the cached pair to the last result.
        let base = parse_operand(session.last_result.as_deref()?)?;
        let op = session.last_operator?;
        let operand = session.last_operand.clone()?;
        vec![Token::Operand(base), Token::Operator(op), Token::Operand(operand)]
    } else {
        session.tokens.clone()
    };

    if matches!(tokens.last(), Some(Token::Operator(_))) {
        tokens.push(Token::Operand(session.last_operand.clone()?));
    }
    Some(tokens)
}

/// Rightmost `operator operand` pair present in the typed expression.
fn trailing_pair(tokens: &[Token]) -> Option<(Operator, Operand)> {
    tokens.windows(2).rev().find_map(|pair| match pair {
        [Token::Operator(op), Token::Operand(operand)] if operand.is_complete() => Some((*op, operand.clone())),
        _ => None,
    })
}

/// Render tokens as a float-only infix expression for the evaluator.
pub(crate) fn normalize(tokens: &[Token]) -> Result<String> {
    let mut out = String::new();

    for (idx, token) in tokens.iter().enumerate() {
        let operand = match token {
            Token::Operator(op) => {
                out.push(' ');
                out.push(op.symbol());
                out.push(' ');
                continue;
            }
            Token::Operand(operand) => operand,
        };

        if !operand.is_complete() {
            return Err(CalcError::incomplete(render(tokens, Notation::Raw)));
        }

        let literal = signed_literal(operand);
        if !operand.percent {
            out.push_str(&literal);
            continue;
        }

        match percent_base(tokens, idx) {
            Some(base) => out.push_str(&format!("({} * {} / 100.0)", signed_literal(base), literal)),
            None => out.push_str(&format!("({} / 100.0)", literal)),
        }
    }

    Ok(out)
}

/// The operand a percent at `idx` is taken of, if it follows `+` or `-`.
fn percent_base(tokens: &[Token], idx: usize) -> Option<&Operand> {
    let [Token::Operand(base), Token::Operator(op)] = tokens.get(idx.checked_sub(2)?..idx)? else {
        return None;
    };
    (op.is_additive() && !base.percent).then_some(base)
}

fn signed_literal(operand: &Operand) -> String {
    let literal = float_literal(&operand.digits);
    match operand.sign {
        Sign::Positive | Sign::Open => literal,
        Sign::Negative | Sign::Wrapped => format!("(-{literal})"),
    }
}

/// `007` -> `7.0`, `5.` -> `5.0`, `0.25` -> `0.25`.
fn float_literal(digits: &str) -> String {
    let (int_part, fraction) = digits.split_once('.').unwrap_or((digits, ""));
    let int_part = int_part.trim_start_matches('0');
    let int_part = if int_part.is_empty() { "0" } else { int_part };
    let fraction = if fraction.is_empty() { "0" } else { fraction };
    format!("{int_part}.{fraction}")
}

/// Evaluate and format one normalized expression.
///
/// Infinite and NaN results (`1÷0`, `0÷0`) are reported as
/// [`CalcError::NonFinite`] and shown as `Error`, not as `Infinity`: a
/// non-finite value cannot seed the next expression as an operand.
fn compute(expression: &str, env: &Env<'_>) -> Result<String> {
    tracing::debug!(target: "keycalc", expression, "evaluating");

    let value = env.evaluator.evaluate(expression)?;
    if !value.is_finite() {
        return Err(CalcError::NonFinite(expression.to_string()));
    }
    Ok(format_number(round_to(value, env.options.precision)))
}

/// Fractional digits needed to print any `f64` exactly.
const EXACT_DIGITS: usize = 1100;

/// Round to `precision` decimal places, ties away from zero.
///
/// Works on the exact decimal expansion, so `0.00048828125` at ten places
/// becomes `0.0004882813` (`{:.N}` alone would round the tie to even).
fn round_to(value: f64, precision: u32) -> f64 {
    let exact = format!("{:.*}", EXACT_DIGITS, value.abs());
    let Some((int_part, fraction)) = exact.split_once('.') else {
        return value;
    };
    let precision = (precision as usize).min(EXACT_DIGITS);

    let mut digits: Vec<u8> = int_part.bytes().chain(fraction.bytes().take(precision)).collect();
    if fraction.as_bytes().get(precision).is_some_and(|&d| d >= b'5') {
        carry(&mut digits);
    }

    let (int_digits, frac_digits) = digits.split_at(digits.len() - precision);
    let mut text = String::with_capacity(digits.len() + 2);
    if value.is_sign_negative() {
        text.push('-');
    }
    text.extend(int_digits.iter().map(|&d| char::from(d)));
    if !frac_digits.is_empty() {
        text.push('.');
        text.extend(frac_digits.iter().map(|&d| char::from(d)));
    }
    text.parse().unwrap_or(value)
}

/// Add one unit in the last place of an ASCII digit string.
fn carry(digits: &mut Vec<u8>) {
    for d in digits.iter_mut().rev() {
        if *d == b'9' {
            *d = b'0';
        } else {
            *d += 1;
            return;
        }
    }
    digits.insert(0, b'1');
}

/// Shortest text that reads back as `value`, without exponent or `-0`.
fn format_number(value: f64) -> String {
    if value == 0.0 { "0".to_string() } else { value.to_string() }
}
