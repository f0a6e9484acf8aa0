//! Token accumulator.
//!
//! A [`Token`] holds the partial text of exactly one scalar while the
//! container machine feeds it characters. Where a token ends is decided by
//! [`Token::is_end`], but consuming the terminator is up to the caller.

use crate::error::{ParseError, Result};
use crate::value::Value;
use num_bigint::BigInt;

/// Keyword spellings accepted for literal tokens.
const LITERALS: [&str; 3] = ["true", "false", "null"];

/// Kind of scalar being accumulated, inferred from its first character.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// Quoted string. The quotes are not stored.
    String,
    /// Optionally negative run of decimal digits.
    Number,
    /// One of `true`, `false`, `null`.
    Literal,
}

/// Partial lexical state for one scalar.
#[derive(Debug, Clone)]
pub struct Token {
    kind: TokenKind,
    raw: String,
}

impl Default for Token {
    /// An empty string token, the placeholder between two scalars.
    fn default() -> Self {
        Self {
            kind: TokenKind::String,
            raw: String::new(),
        }
    }
}

impl Token {
    /// Start a token from its leading character.
    ///
    /// A literal's leading character is checked right away, so `x` is
    /// rejected before anything else of it is read.
    pub fn begin(lead: char) -> Result<Self> {
        match lead {
            '"' => Ok(Self {
                kind: TokenKind::String,
                raw: String::new(),
            }),
            '-' | '0'..='9' => Ok(Self {
                kind: TokenKind::Number,
                raw: lead.to_string(),
            }),
            _ => {
                let mut token = Self {
                    kind: TokenKind::Literal,
                    raw: String::new(),
                };
                token.validate_next(lead)?;
                token.append(lead);
                Ok(token)
            }
        }
    }

    /// Whether `c` terminates this token.
    pub fn is_end(&self, c: char) -> bool {
        match self.kind {
            TokenKind::String => c == '"',
            TokenKind::Number | TokenKind::Literal => {
                matches!(c, ' ' | '\n' | ',' | '}' | ']')
            }
        }
    }

    /// Check that `c` may extend this token.
    pub fn validate_next(&self, c: char) -> Result<()> {
        match self.kind {
            TokenKind::String => Ok(()),
            TokenKind::Number if c.is_ascii_digit() => Ok(()),
            TokenKind::Number => Err(ParseError::invalid_token(format!("{}{}", self.raw, c))),
            TokenKind::Literal => {
                let candidate = format!("{}{}", self.raw, c);
                if LITERALS.iter().any(|lit| lit.starts_with(&candidate)) {
                    Ok(())
                } else {
                    Err(ParseError::invalid_token(candidate))
                }
            }
        }
    }

    pub fn append(&mut self, c: char) {
        self.raw.push(c);
    }

    /// Consume the token and convert it to a typed scalar.
    pub fn finalize(self) -> Result<Value> {
        match self.kind {
            TokenKind::String => Ok(Value::String(self.raw)),
            TokenKind::Number => match self.raw.parse::<BigInt>() {
                Ok(n) => Ok(Value::Integer(n)),
                Err(_) => Err(ParseError::invalid_token(self.raw)),
            },
            TokenKind::Literal => match self.raw.as_str() {
                "true" => Ok(Value::Bool(true)),
                "false" => Ok(Value::Bool(false)),
                "null" => Ok(Value::Null),
                _ => Err(ParseError::invalid_token(self.raw)),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Feed `rest` into a token started with `lead`, then finalize it.
    fn lex(lead: char, rest: &str) -> Result<Value> {
        let mut token = Token::begin(lead)?;
        for c in rest.chars() {
            token.validate_next(c)?;
            token.append(c);
        }
        token.finalize()
    }

    fn invalid_text(result: Result<Value>) -> String {
        match result {
            Err(ParseError::InvalidToken(text, _)) => text,
            other => panic!("expected InvalidToken, got {:?}", other),
        }
    }

    #[test]
    fn test_begin_classifies() {
        assert_eq!(Token::begin('"').unwrap().kind, TokenKind::String);
        assert_eq!(Token::begin('"').unwrap().raw, "");
        assert_eq!(Token::begin('-').unwrap().kind, TokenKind::Number);
        assert_eq!(Token::begin('7').unwrap().raw, "7");
        assert_eq!(Token::begin('n').unwrap().kind, TokenKind::Literal);
    }

    #[test]
    fn test_numbers() {
        assert_eq!(lex('-', "344").unwrap(), Value::from(-344i64));
        assert_eq!(lex('5', "88").unwrap(), Value::from(588i64));
        assert_eq!(lex('0', "07").unwrap(), Value::from(7i64));
        let big = lex('9', "99999999999999999999999").unwrap();
        assert_eq!(big.as_i64(), None);
        assert_eq!(big.as_integer().unwrap().to_string(), "999999999999999999999999");
    }

    #[test]
    fn test_lone_minus_is_invalid() {
        assert_eq!(invalid_text(lex('-', "")), "-");
    }

    #[test]
    fn test_non_digit_in_number() {
        assert_eq!(invalid_text(lex('1', "2a")), "12a");
        assert_eq!(invalid_text(lex('-', "-")), "--");
        assert_eq!(invalid_text(lex('3', ".5")), "3.");
    }

    #[test]
    fn test_literals() {
        assert_eq!(lex('t', "rue").unwrap(), Value::Bool(true));
        assert_eq!(lex('f', "alse").unwrap(), Value::Bool(false));
        assert_eq!(lex('n', "ull").unwrap(), Value::Null);
    }

    #[test]
    fn test_literal_prefix_fails_fast() {
        assert_eq!(invalid_text(lex('t', "rux")), "trux");
        assert_eq!(invalid_text(lex('n', "o")), "no");
        assert_eq!(invalid_text(Token::begin('x').map(|_| Value::Null)), "x");
    }

    #[test]
    fn test_truncated_literal() {
        assert_eq!(invalid_text(lex('t', "ru")), "tru");
        assert_eq!(invalid_text(lex('f', "als")), "fals");
    }

    #[test]
    fn test_string_accepts_anything() {
        assert_eq!(
            lex('"', "a b\\n{}[],:").unwrap(),
            Value::from("a b\\n{}[],:")
        );
    }

    #[test]
    fn test_end_characters() {
        let string = Token::begin('"').unwrap();
        assert!(string.is_end('"'));
        assert!(!string.is_end(' '));
        assert!(!string.is_end(','));

        let number = Token::begin('1').unwrap();
        for c in [' ', '\n', ',', '}', ']'] {
            assert!(number.is_end(c));
        }
        assert!(!number.is_end('"'));
        assert!(!number.is_end(':'));
    }
}
