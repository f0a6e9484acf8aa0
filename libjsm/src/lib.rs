//! JSM parser implementation.
//!
//! JSM reads a small subset of JSON one character at a time: mappings,
//! sequences, strings without escapes, integers, `true`, `false` and `null`.
//!
//! # Parsing Pipeline
//!
//! 1. **Scanner**: Hands out characters from a string, a char iterator or a
//!    UTF-8 byte reader, tracking line and column for error messages.
//!
//! 2. **Container Machine**: An explicit state machine per mapping or
//!    sequence. It feeds scalars through a token accumulator and recurses
//!    into a child machine for each nested container.
//!
//! 3. **Document Check**: The first significant character must open a
//!    container, and nothing but whitespace may follow its closing bracket.

mod error;
mod machine;
mod scanner;
mod token;
mod value;

pub use error::{ParseContext, ParseError, Result};
pub use machine::State;
pub use scanner::ReaderChars;
pub use value::{Map, Value};

use machine::{Container, Machine};
use scanner::Scanner;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use tracing::debug;

/// Options for a single parse.
#[derive(Clone, Debug, Default)]
pub struct ParseOptions {
    filename: Option<String>,
    max_depth: Option<usize>,
}

impl ParseOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Name the source in error locations.
    pub fn filename(mut self, filename: impl Into<String>) -> Self {
        self.filename = Some(filename.into());
        self
    }

    /// Fail with [`ParseError::DepthExceeded`] when containers nest deeper
    /// than `depth` levels. The document root is level 1.
    pub fn max_depth(mut self, depth: usize) -> Self {
        self.max_depth = Some(depth);
        self
    }

    fn context(&self) -> ParseContext {
        ParseContext {
            filename: self.filename.clone(),
            max_depth: self.max_depth,
        }
    }
}

/// Parse a JSM document from a string.
///
/// # Example
///
/// ```
/// use libjsm::parse;
///
/// let value = parse(r#"{"answer": 42}"#).unwrap();
/// assert_eq!(value.get("answer").and_then(|v| v.as_i64()), Some(42));
/// ```
pub fn parse(input: &str) -> Result<Value> {
    parse_with_filename(input, None)
}

/// Parse a JSM document from a string with a filename for error messages.
pub fn parse_with_filename(input: &str, filename: Option<&str>) -> Result<Value> {
    let mut options = ParseOptions::new();
    if let Some(name) = filename {
        options = options.filename(name);
    }
    parse_with_options(input.chars().map(Ok), &options)
}

/// Parse a JSM document from any sequence of characters.
pub fn parse_chars<C>(chars: C) -> Result<Value>
where
    C: IntoIterator<Item = char>,
{
    parse_with_options(chars.into_iter().map(Ok), &ParseOptions::new())
}

/// Parse a JSM document from a UTF-8 byte reader.
///
/// The reader is buffered internally and read no further than needed to see
/// the end of input.
pub fn parse_reader<R: Read>(reader: R) -> Result<Value> {
    parse_with_options(
        ReaderChars::new(BufReader::new(reader)),
        &ParseOptions::new(),
    )
}

/// Parse the JSM document stored at `path`.
pub fn parse_file(path: impl AsRef<Path>) -> Result<Value> {
    parse_file_with_options(path, &ParseOptions::new())
}

/// Parse the JSM document stored at `path` with explicit options.
///
/// Unless the options already name the source, errors name the file.
pub fn parse_file_with_options(path: impl AsRef<Path>, options: &ParseOptions) -> Result<Value> {
    let path = path.as_ref();
    let file = File::open(path)?;
    let mut options = options.clone();
    if options.filename.is_none() {
        let filename = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| path.display().to_string());
        options.filename = Some(filename);
    }
    parse_with_options(ReaderChars::new(BufReader::new(file)), &options)
}

/// Parse a JSM document from a fallible character source.
///
/// Every other entry point ends up here.
pub fn parse_with_options<I>(chars: I, options: &ParseOptions) -> Result<Value>
where
    I: Iterator<Item = Result<char>>,
{
    let ctx = options.context();
    let mut scanner = Scanner::new(chars, &ctx);
    debug!(filename = ?ctx.filename, "parsing document");

    let open = match scanner.next_significant()? {
        Some(c) => c,
        None => return Err(scanner.end_error(ParseError::EmptyInput(String::new()))),
    };
    let root = match Container::open(open) {
        Some(root) => root,
        None => {
            return Err(scanner.error(ParseError::UnexpectedStart(open, String::new())));
        }
    };
    if ctx.max_depth == Some(0) {
        return Err(scanner.error(ParseError::DepthExceeded(0, String::new())));
    }

    let value = Machine::new(root, 1).run(&mut scanner)?;
    scanner.finish()?;

    debug!(kind = value.kind_name(), "parsed document");
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_input() {
        for input in ["", "   ", "\n \n"] {
            assert!(matches!(parse(input), Err(ParseError::EmptyInput(_))));
        }
    }

    #[test]
    fn test_unexpected_start() {
        assert!(matches!(
            parse("  \"key\""),
            Err(ParseError::UnexpectedStart('"', _))
        ));
        assert!(matches!(
            parse("}"),
            Err(ParseError::UnexpectedStart('}', _))
        ));
    }

    #[test]
    fn test_trailing_content() {
        assert!(matches!(
            parse("{} x"),
            Err(ParseError::TrailingContent('x', _))
        ));
        assert!(matches!(
            parse("[]]"),
            Err(ParseError::TrailingContent(']', _))
        ));
        assert!(parse("{}\n  \n").is_ok());
    }

    #[test]
    fn test_empty_containers() {
        assert_eq!(parse("{}").unwrap(), Value::Mapping(Map::new()));
        assert_eq!(parse("[]").unwrap(), Value::Sequence(Vec::new()));
        assert_eq!(parse(" [ \n ] ").unwrap(), Value::Sequence(Vec::new()));
    }

    #[test]
    fn test_parse_chars() {
        let value = parse_chars(r#"["a", "b", "c"]"#.chars()).unwrap();
        assert_eq!(format!("{:?}", value), r#"["a", "b", "c"]"#);
    }

    #[test]
    fn test_parse_reader() {
        let input = "{\"caf\u{e9}\": [\"\u{1f600}\", -1]}".as_bytes();
        let value = parse_reader(input).unwrap();
        let items = value.get("caf\u{e9}").and_then(Value::as_sequence).unwrap();
        assert_eq!(items[0], Value::from("\u{1f600}"));
        assert_eq!(items[1].as_i64(), Some(-1));
    }

    #[test]
    fn test_parse_reader_invalid_utf8() {
        let input: &[u8] = b"[\"a\xff\"]";
        match parse_reader(input) {
            Err(ParseError::InvalidUtf8(loc)) => assert_eq!(loc, " at 1:4"),
            other => panic!("expected InvalidUtf8, got {:?}", other),
        }
    }

    #[test]
    fn test_error_location_with_filename() {
        let err = parse_with_filename("{\n  \"a\" 1\n}", Some("doc.json")).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Unexpected \"1\" in END_KEY: expected separator at 2:7 of <doc.json>"
        );
    }

    #[test]
    fn test_unexpected_end_location() {
        let err = parse("[1, 2").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Unexpected end of input in COLLECTING_VALUE at 1:6"
        );
    }

    #[test]
    fn test_max_depth_option() {
        let options = ParseOptions::new().max_depth(3);
        let ok = parse_with_options("[[[1]]]".chars().map(Ok), &options);
        assert!(ok.is_ok());
        let deep = parse_with_options("[[[[1]]]]".chars().map(Ok), &options);
        assert!(matches!(deep, Err(ParseError::DepthExceeded(3, _))));
        let none = parse_with_options("[]".chars().map(Ok), &ParseOptions::new().max_depth(0));
        assert!(matches!(none, Err(ParseError::DepthExceeded(0, _))));
    }

    #[test]
    fn test_parse_file_missing() {
        assert!(matches!(
            parse_file("/nonexistent/jsm/input.json"),
            Err(ParseError::Io(_))
        ));
    }
}
