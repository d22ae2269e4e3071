//! Raw expression text to tokens.
//!
//! The tokenizer reads the same text the renderer writes, with operators in
//! either notation (`*` or `×`). It is total over every prefix of a rendered
//! expression, which is what backspace relies on:
//!
//! ```text
//! "12+(-3)%"  ->  [12] [+] [(-3)%]
//! "12+(-3"    ->  [12] [+] [(-3   closed=false]
//! "12+("      ->  [12] [+] [(     sign=Open, no digits]
//! "-4×"       ->  [-4] [×]
//! ```
//!
//! Operands and operators alternate. An operand may be empty (no digits); the
//! evaluator path rejects those as incomplete.

use crate::{CalcError, Operand, Operator, Result, Sign, Token};
use std::iter::Peekable;
use std::str::CharIndices;

type Chars<'a> = Peekable<CharIndices<'a>>;

pub(crate) fn tokenize(input: &str) -> Result<Vec<Token>> {
    let mut tokens = Vec::new();
    let mut chars = input.char_indices().peekable();

    while let Some(&(position, c)) = chars.peek() {
        if matches!(tokens.last(), None | Some(Token::Operator(_))) {
            tokens.push(Token::Operand(read_operand(&mut chars)));
            continue;
        }

        let op = Operator::from_char(c).ok_or_else(|| CalcError::tokenize(input, position))?;
        chars.next();
        tokens.push(Token::Operator(op));
    }

    Ok(tokens)
}

/// Parse text holding exactly one operand, e.g. a previous result (`-2.5`).
pub(crate) fn parse_operand(input: &str) -> Option<Operand> {
    let mut tokens = tokenize(input).ok()?;
    match (tokens.pop(), tokens.is_empty()) {
        (Some(Token::Operand(operand)), true) if operand.has_digits() => Some(operand),
        _ => None,
    }
}

fn read_operand(chars: &mut Chars<'_>) -> Operand {
    let sign = if chars.next_if(|&(_, c)| c == '(').is_some() {
        if chars.next_if(|&(_, c)| c == '-').is_some() { Sign::Wrapped } else { Sign::Open }
    } else if chars.next_if(|&(_, c)| c == '-').is_some() {
        Sign::Negative
    } else {
        Sign::Positive
    };

    let mut digits = String::new();
    while let Some((_, c)) = chars.next_if(|&(_, c)| c.is_ascii_digit() || c == '.') {
        digits.push(c);
    }

    let mut operand = Operand::new(sign, digits);
    operand.closed = matches!(sign, Sign::Wrapped | Sign::Open) && chars.next_if(|&(_, c)| c == ')').is_some();
    operand.percent = chars.next_if(|&(_, c)| c == '%').is_some();
    operand
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::render::{Notation, render};

    fn operand(tokens: &[Token], idx: usize) -> &Operand {
        match &tokens[idx] {
            Token::Operand(o) => o,
            other => panic!("expected operand at {idx}, got {other:?}"),
        }
    }

    #[test]
    fn splits_operands_and_operators() {
        let tokens = tokenize("12+3.5×4").unwrap();
        assert_eq!(tokens.len(), 5);
        assert_eq!(operand(&tokens, 0).digits(), "12");
        assert_eq!(tokens[1], Token::Operator(Operator::Add));
        assert_eq!(operand(&tokens, 2).digits(), "3.5");
        assert_eq!(tokens[3], Token::Operator(Operator::Multiply));
    }

    #[test]
    fn reads_negation_marker_and_percent() {
        let tokens = tokenize("7-(-3)%").unwrap();
        let last = operand(&tokens, 2);
        assert_eq!(last.sign, Sign::Wrapped);
        assert!(last.closed);
        assert!(last.percent);
        assert_eq!(tokens[1], Token::Operator(Operator::Subtract));
    }

    #[test]
    fn leading_minus_is_a_sign_not_an_operator() {
        let tokens = tokenize("-4*2").unwrap();
        assert_eq!(operand(&tokens, 0).sign, Sign::Negative);
        assert_eq!(tokens[1], Token::Operator(Operator::Multiply));
    }

    #[test]
    fn every_prefix_round_trips_through_render() {
        let full = "-12.5+(-3)%×40÷(-0.5)";
        let mut end = full.len();
        loop {
            let prefix = &full[..end];
            let tokens = tokenize(prefix).unwrap_or_else(|e| panic!("prefix {prefix:?}: {e}"));
            assert_eq!(render(&tokens, Notation::Display), prefix);
            match prefix.char_indices().last() {
                Some((idx, _)) => end = idx,
                None => break,
            }
        }
    }

    #[test]
    fn bare_parenthesis_is_an_open_operand() {
        let tokens = tokenize("5×(12").unwrap();
        let open = operand(&tokens, 2);
        assert_eq!(open.sign, Sign::Open);
        assert_eq!(open.digits(), "12");
        assert!(!open.is_complete());
        assert_eq!(render(&tokens, Notation::Raw), "5*(12");
    }

    #[test]
    fn rejects_characters_outside_the_grammar() {
        let err = tokenize("12+a").unwrap_err();
        assert!(matches!(err, CalcError::Tokenize { position: 3, .. }));
    }

    #[test]
    fn parse_operand_accepts_single_numbers_only() {
        assert_eq!(parse_operand("-2.5").map(|o| o.sign), Some(Sign::Negative));
        assert_eq!(parse_operand("42").map(|o| o.digits), Some("42".to_string()));
        assert!(parse_operand("1+2").is_none());
        assert!(parse_operand("Error").is_none());
        assert!(parse_operand("").is_none());
    }
}
