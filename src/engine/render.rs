//! Tokens to text.
//!
//! `render` is the only place expression text is produced; the raw and the
//! display expression differ only in the operator notation.

use crate::Token;

/// Operator spelling used when rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Notation {
    /// `+ - * /`
    Raw,
    /// `+ - × ÷`
    Display,
}

pub(crate) fn render(tokens: &[Token], notation: Notation) -> String {
    let mut out = String::new();
    for token in tokens {
        match token {
            Token::Operand(operand) => operand.write_to(&mut out),
            Token::Operator(op) => out.push(match notation {
                Notation::Raw => op.symbol(),
                Notation::Display => op.glyph(),
            }),
        }
    }
    out
}

/// Group the integer part of a plain number with commas.
///
/// Anything that is not a plain decimal number (`Error`, `(-5)`, `5%`, an
/// expression) is returned unchanged.
///
/// ```
/// use keycalc::format_with_commas;
///
/// assert_eq!(format_with_commas("1234567.89"), "1,234,567.89");
/// assert_eq!(format_with_commas("-1000"), "-1,000");
/// assert_eq!(format_with_commas("Error"), "Error");
/// ```
pub fn format_with_commas(value: &str) -> String {
    if !regex!(r"^-?\d+(\.\d*)?$").is_match(value) {
        return value.to_string();
    }

    let (sign, unsigned) = match value.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", value),
    };
    let (int_part, fraction) = match unsigned.split_once('.') {
        Some((int_part, fraction)) => (int_part, Some(fraction)),
        None => (unsigned, None),
    };

    let int_part = int_part.trim_start_matches('0');
    let int_part = if int_part.is_empty() { "0" } else { int_part };

    let mut grouped = String::with_capacity(value.len() + int_part.len() / 3);
    grouped.push_str(sign);
    for (idx, c) in int_part.chars().enumerate() {
        if idx > 0 && (int_part.len() - idx) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    if let Some(fraction) = fraction {
        grouped.push('.');
        grouped.push_str(fraction);
    }
    grouped
}
