//! Keypad keys and key scripts.

use crate::Operator;
use crate::error::{CalcError, Result};
use std::fmt;
use std::str::FromStr;

/// A single key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    /// `0`..=`9`. Values above 9 are ignored by the engine.
    Digit(u8),
    Operator(Operator),
    Decimal,
    Percent,
    ToggleSign,
    Equals,
    Clear,
    Backspace,
}

const DIGIT_LABELS: [&str; 10] = ["0", "1", "2", "3", "4", "5", "6", "7", "8", "9"];

impl Key {
    /// Text printed on the key.
    pub fn label(self) -> &'static str {
        match self {
            Key::Digit(d) => DIGIT_LABELS.get(usize::from(d)).copied().unwrap_or("?"),
            Key::Operator(Operator::Add) => "+",
            Key::Operator(Operator::Subtract) => "-",
            Key::Operator(Operator::Multiply) => "×",
            Key::Operator(Operator::Divide) => "÷",
            Key::Decimal => ".",
            Key::Percent => "%",
            Key::ToggleSign => "+/-",
            Key::Equals => "=",
            Key::Clear => "AC",
            Key::Backspace => "⌫",
        }
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Key {
    type Err = CalcError;

    /// Accepts key labels plus ASCII aliases (`*`, `x`, `/`, `±`, `C`, `<`, `BS`).
    fn from_str(s: &str) -> Result<Self> {
        let key = match s.to_ascii_uppercase().as_str() {
            "+" => Key::Operator(Operator::Add),
            "-" => Key::Operator(Operator::Subtract),
            "×" | "*" | "X" => Key::Operator(Operator::Multiply),
            "÷" | "/" => Key::Operator(Operator::Divide),
            "." => Key::Decimal,
            "%" => Key::Percent,
            "+/-" | "±" => Key::ToggleSign,
            "=" => Key::Equals,
            "AC" | "C" => Key::Clear,
            "⌫" | "<" | "BS" => Key::Backspace,
            other => match other.parse::<u8>() {
                Ok(d) if d <= 9 && other.len() == 1 => Key::Digit(d),
                _ => return Err(CalcError::unknown_key(s)),
            },
        };
        Ok(key)
    }
}

/// Split a key script such as `"12 + 3 = ="` or `"5±%="` into keys.
///
/// Whitespace separates nothing and is skipped; multi-character keys (`AC`,
/// `+/-`, `BS`) are matched before their single-character prefixes.
///
/// ```
/// use keycalc::{Key, parse_keys};
///
/// let keys = parse_keys("12+/-").unwrap();
/// assert_eq!(keys, vec![Key::Digit(1), Key::Digit(2), Key::ToggleSign]);
/// ```
pub fn parse_keys(text: &str) -> Result<Vec<Key>> {
    let re = regex!(r"(?i)\s+|AC|BS|\+/-|[0-9]|[-+*/x×÷.%=±c<⌫]");

    let mut keys = Vec::new();
    let mut position = 0;
    for m in re.find_iter(text) {
        if m.start() != position {
            return Err(CalcError::unknown_key(&text[position..m.start()]));
        }
        position = m.end();
        if !m.as_str().trim().is_empty() {
            keys.push(m.as_str().parse()?);
        }
    }

    if position != text.len() {
        return Err(CalcError::unknown_key(&text[position..]));
    }
    Ok(keys)
}

/// Button layout of the keypad, row by row. `None` is a blank cell.
pub const KEYPAD: [[Option<Key>; 4]; 5] = [
    [Some(Key::Clear), Some(Key::ToggleSign), Some(Key::Percent), Some(Key::Operator(Operator::Divide))],
    [Some(Key::Digit(7)), Some(Key::Digit(8)), Some(Key::Digit(9)), Some(Key::Operator(Operator::Multiply))],
    [Some(Key::Digit(4)), Some(Key::Digit(5)), Some(Key::Digit(6)), Some(Key::Operator(Operator::Subtract))],
    [Some(Key::Digit(1)), Some(Key::Digit(2)), Some(Key::Digit(3)), Some(Key::Operator(Operator::Add))],
    [None, Some(Key::Digit(0)), Some(Key::Decimal), Some(Key::Equals)],
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_parse_back_to_keys() {
        for key in KEYPAD.iter().flatten().flatten() {
            assert_eq!(key.label().parse::<Key>().unwrap(), *key);
        }
        assert_eq!("⌫".parse::<Key>().unwrap(), Key::Backspace);
    }

    #[test]
    fn aliases_are_accepted() {
        assert_eq!("*".parse::<Key>().unwrap(), Key::Operator(Operator::Multiply));
        assert_eq!("x".parse::<Key>().unwrap(), Key::Operator(Operator::Multiply));
        assert_eq!("/".parse::<Key>().unwrap(), Key::Operator(Operator::Divide));
        assert_eq!("±".parse::<Key>().unwrap(), Key::ToggleSign);
        assert_eq!("c".parse::<Key>().unwrap(), Key::Clear);
        assert_eq!("bs".parse::<Key>().unwrap(), Key::Backspace);
    }

    #[test]
    fn rejects_unknown_labels() {
        assert!("10".parse::<Key>().is_err());
        assert!("sin".parse::<Key>().is_err());
        assert!("".parse::<Key>().is_err());
    }

    #[test]
    fn parses_scripts_with_multi_char_keys() {
        let keys = parse_keys("AC 2 + 3 = =").unwrap();
        assert_eq!(
            keys,
            vec![
                Key::Clear,
                Key::Digit(2),
                Key::Operator(Operator::Add),
                Key::Digit(3),
                Key::Equals,
                Key::Equals,
            ]
        );

        let keys = parse_keys("5+/-%<").unwrap();
        assert_eq!(keys, vec![Key::Digit(5), Key::ToggleSign, Key::Percent, Key::Backspace]);
    }

    #[test]
    fn script_with_unknown_text_fails() {
        let err = parse_keys("2+abc").unwrap_err();
        assert!(matches!(err, CalcError::UnknownKey(ref k) if k == "ab"));
    }

    #[test]
    fn keypad_has_every_key_but_backspace_once() {
        let keys: Vec<Key> = KEYPAD.iter().flatten().flatten().copied().collect();
        assert_eq!(keys.len(), 19);
        assert!(!keys.contains(&Key::Backspace));
    }
}
