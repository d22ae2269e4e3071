//! Keys that edit the expression: digits, operators, `.`, `+/-` and `%`.
//!
//! Each handler edits the trailing token of the session. None of them can
//! fail; keys that make no sense in the current position are ignored.

use super::session::{Mode, Session};
use super::tokenize::parse_operand;
use crate::{Operand, Operator, Token};

pub(crate) fn digit(mut session: Session, d: u8) -> Session {
    let Some(c) = char::from_digit(u32::from(d), 10) else {
        return session;
    };

    if session.is_result_shown() {
        session.restart_with(Operand::positive(c));
        return session;
    }

    match session.trailing_operand() {
        // `5%3` is not a number.
        Some(operand) if operand.percent => {}
        // `0` -> `7`, `-0` -> `-7`, `(-0)` -> `(-7)`
        Some(operand) if operand.digits == "0" => operand.digits = c.to_string(),
        Some(operand) => operand.digits.push(c),
        None => session.tokens.push(Token::Operand(Operand::positive(c))),
    }
    session
}

pub(crate) fn operator(mut session: Session, op: Operator) -> Session {
    if session.is_result_shown() {
        session.mode = Mode::Composing;
        if let Some(base) = session.last_result.as_deref().and_then(parse_operand) {
            session.tokens = vec![Token::Operand(base), Token::Operator(op)];
            return session;
        }
    }

    match session.tokens.last_mut() {
        None => {
            session.tokens.push(Token::Operand(Operand::positive("0")));
            session.tokens.push(Token::Operator(op));
        }
        Some(Token::Operator(last)) => *last = op,
        Some(Token::Operand(_)) => session.tokens.push(Token::Operator(op)),
    }
    session
}

pub(crate) fn decimal(mut session: Session) -> Session {
    if session.is_result_shown() {
        session.restart_with(Operand::positive("0."));
        return session;
    }

    match session.trailing_operand() {
        Some(operand) if operand.percent || operand.digits.contains('.') => {}
        Some(operand) if operand.digits.is_empty() => operand.digits.push_str("0."),
        Some(operand) => operand.digits.push('.'),
        None => session.tokens.push(Token::Operand(Operand::positive("0."))),
    }
    session
}

pub(crate) fn toggle_sign(mut session: Session) -> Session {
    if let Mode::Result(value) = session.mode.clone() {
        if let Some(operand) = parse_operand(&value).filter(|_| value != "0") {
            session.restart_with(operand.toggled());
        }
        return session;
    }

    if let Some(operand) = session.trailing_operand() {
        if operand.has_digits() {
            *operand = operand.toggled();
        }
    }
    session
}

pub(crate) fn percent(mut session: Session) -> Session {
    if let Mode::Result(value) = session.mode.clone() {
        if let Some(operand) = parse_operand(&value) {
            session.restart_with(as_percent(operand));
        }
        return session;
    }

    if session.tokens.is_empty() {
        session.restart_with(as_percent(Operand::positive("0")));
        return session;
    }

    if let Some(operand) = session.trailing_operand() {
        if !operand.percent && operand.is_complete() {
            *operand = as_percent(operand.clone());
        }
    }
    session
}

fn as_percent(mut operand: Operand) -> Operand {
    if operand.digits.ends_with('.') {
        operand.digits.pop();
    }
    operand.percent = true;
    operand
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::tokenize::tokenize;

    fn composing(raw: &str) -> Session {
        Session { tokens: tokenize(raw).unwrap(), ..Session::new() }
    }

    fn shown(value: &str) -> Session {
        Session { mode: Mode::Result(value.to_string()), last_result: Some(value.to_string()), ..Session::new() }
    }

    #[test]
    fn digits_suppress_leading_zeros() {
        assert_eq!(digit(composing("0"), 7).display_expression(), "7");
        assert_eq!(digit(composing("-0"), 7).display_expression(), "-7");
        assert_eq!(digit(composing("3+0"), 0).display_expression(), "3+0");
        assert_eq!(digit(composing("10"), 0).display_expression(), "100");
        assert_eq!(digit(composing("0."), 0).display_expression(), "0.0");
    }

    #[test]
    fn digit_extends_the_negation_marker() {
        assert_eq!(digit(composing("(-5)"), 3).display_expression(), "(-53)");
        assert_eq!(digit(composing("(-0)"), 3).display_expression(), "(-3)");
    }

    #[test]
    fn digit_after_percent_is_ignored() {
        assert_eq!(digit(composing("5%"), 3).display_expression(), "5%");
    }

    #[test]
    fn digit_after_result_starts_fresh() {
        let next = digit(shown("42"), 1);
        assert_eq!(next.current_value(), "1");
        assert!(!next.is_result_shown());
        assert_eq!(next.last_result(), Some("42"));
    }

    #[test]
    fn operator_replaces_trailing_operator() {
        let next = operator(composing("2+"), Operator::Multiply);
        assert_eq!(next.display_expression(), "2×");
        assert_eq!(next.raw_expression(), "2*");
    }

    #[test]
    fn operator_on_empty_expression_seeds_zero() {
        assert_eq!(operator(Session::new(), Operator::Divide).display_expression(), "0÷");
    }

    #[test]
    fn operator_after_result_continues_from_it() {
        assert_eq!(operator(shown("-1"), Operator::Add).display_expression(), "-1+");
        assert_eq!(operator(shown("2.5"), Operator::Subtract).raw_expression(), "2.5-");
    }

    #[test]
    fn decimal_point_rules() {
        assert_eq!(decimal(Session::new()).display_expression(), "0.");
        assert_eq!(decimal(composing("3")).display_expression(), "3.");
        assert_eq!(decimal(composing("3.1")).display_expression(), "3.1");
        assert_eq!(decimal(composing("3+")).display_expression(), "3+0.");
        assert_eq!(decimal(composing("3+(-")).display_expression(), "3+(-0.");
        assert_eq!(decimal(composing("5%")).display_expression(), "5%");
        assert_eq!(decimal(shown("9")).display_expression(), "0.");
    }

    #[test]
    fn toggle_wraps_and_unwraps_trailing_operand() {
        assert_eq!(toggle_sign(composing("1+2")).display_expression(), "1+(-2)");
        assert_eq!(toggle_sign(composing("1+(-2)")).display_expression(), "1+2");
        assert_eq!(toggle_sign(composing("-2")).display_expression(), "2");
        assert_eq!(toggle_sign(composing("1+")).display_expression(), "1+");
        assert_eq!(toggle_sign(Session::new()).current_value(), "0");
    }

    #[test]
    fn toggle_on_result_edits_the_result() {
        assert_eq!(toggle_sign(shown("7")).display_expression(), "(-7)");
        assert_eq!(toggle_sign(shown("-7")).display_expression(), "7");
        assert!(toggle_sign(shown("0")).is_result_shown());
    }

    #[test]
    fn percent_marks_trailing_operand() {
        assert_eq!(percent(composing("100+20")).display_expression(), "100+20%");
        assert_eq!(percent(composing("3×(-4)")).display_expression(), "3×(-4)%");
        assert_eq!(percent(composing("5.")).display_expression(), "5%");
        assert_eq!(percent(composing("5+")).display_expression(), "5+");
        assert_eq!(percent(composing("5%")).display_expression(), "5%");
    }

    #[test]
    fn percent_without_expression_uses_current_value() {
        assert_eq!(percent(Session::new()).display_expression(), "0%");
        let next = percent(shown("50"));
        assert_eq!(next.display_expression(), "50%");
        assert!(!next.is_result_shown());
    }
}
