//! The arithmetic collaborator.
//!
//! The engine never does arithmetic itself; it builds a normalized infix
//! string (`*`, `/`, parentheses, float literals) and asks an [`Evaluator`]
//! for its value.

use crate::error::{CalcError, Result};
use evalexpr::Value;

/// Evaluates a normalized infix expression with standard precedence.
///
/// Implementations must return an error for malformed input rather than a
/// partial value.
pub trait Evaluator {
    fn evaluate(&self, expression: &str) -> Result<f64>;
}

/// [`Evaluator`] backed by the `evalexpr` crate.
///
/// The engine writes every literal in float form (`4.0 / 2.0`), so `evalexpr`
/// never falls back to integer division.
#[derive(Debug, Default, Clone, Copy)]
pub struct EvalexprEvaluator;

impl Evaluator for EvalexprEvaluator {
    fn evaluate(&self, expression: &str) -> Result<f64> {
        let value = evalexpr::eval(expression).map_err(|e| CalcError::evaluation(expression, e))?;

        match value {
            Value::Float(f) => Ok(f),
            Value::Int(i) => Ok(i as f64),
            other => Err(CalcError::UnexpectedValue(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn evaluates_with_precedence() {
        let value = EvalexprEvaluator.evaluate("1.0 + 2.0 * 3.0").unwrap();
        assert_eq!(value, 7.0);
    }

    #[test]
    fn float_literals_keep_fractions() {
        assert_eq!(EvalexprEvaluator.evaluate("1.0 / 4.0").unwrap(), 0.25);
        assert_eq!(EvalexprEvaluator.evaluate("(-(5.0 / 100.0))").unwrap(), -0.05);
    }

    #[test]
    fn malformed_input_is_an_error() {
        let err = EvalexprEvaluator.evaluate("1.0 +").unwrap_err();
        assert!(matches!(err, CalcError::Evaluation { .. }));
    }

    #[test]
    fn non_numeric_results_are_rejected() {
        let err = EvalexprEvaluator.evaluate("1.0 < 2.0").unwrap_err();
        assert!(matches!(err, CalcError::UnexpectedValue(_)));
    }
}
