//! Error types for JSM parsing.

use crate::machine::State;
use thiserror::Error;

/// Result type for JSM parsing operations.
pub type Result<T> = std::result::Result<T, ParseError>;

/// Parse context carrying the caller's options for the duration of one parse.
#[derive(Clone, Debug, Default)]
pub struct ParseContext {
    pub filename: Option<String>,
    pub max_depth: Option<usize>,
}

impl ParseContext {
    /// Create a new parse context.
    pub fn new(filename: Option<&str>) -> Self {
        Self {
            filename: filename.map(String::from),
            max_depth: None,
        }
    }

    /// Format a location suffix for error messages.
    pub fn loc_suffix(&self, line: usize, col: usize) -> String {
        match &self.filename {
            Some(name) => format!(" at {}:{} of <{}>", line + 1, col + 1, name),
            None => format!(" at {}:{}", line + 1, col + 1),
        }
    }
}

/// Error type for JSM parsing.
///
/// The trailing `String` of most variants is a location suffix, empty until
/// [`ParseError::with_location`] fills it in.
#[derive(Error, Debug)]
pub enum ParseError {
    /// The source held nothing but whitespace.
    #[error("Empty input{0}")]
    EmptyInput(String),

    /// The document does not open with `{` or `[`.
    #[error("Invalid character \"{0}\" before start{1}")]
    UnexpectedStart(char, String),

    /// A structural character the current state does not accept.
    #[error("Unexpected \"{0}\" in {1}: {2}{3}")]
    UnexpectedToken(char, State, &'static str, String),

    /// A scalar that is not a string, an integer, `true`, `false` or `null`.
    #[error("Invalid token value, expecting string, number, null, true, false. Found \"{0}\"{1}")]
    InvalidToken(String, String),

    /// Content after the closing bracket of the document.
    #[error("Expecting no characters after closing bracket, found \"{0}\"{1}")]
    TrailingContent(char, String),

    /// The source ran dry before the document was closed.
    #[error("Unexpected end of input in {0}{1}")]
    UnexpectedEnd(State, String),

    /// Containers nested deeper than the configured limit.
    #[error("Nesting deeper than {0} levels{1}")]
    DepthExceeded(usize, String),

    /// A byte sequence from a reader that is not UTF-8.
    #[error("Invalid UTF-8 in input{0}")]
    InvalidUtf8(String),

    /// Reading from the underlying source failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ParseError {
    /// Create an error with location information.
    pub fn with_location(self, ctx: &ParseContext, line: usize, col: usize) -> Self {
        let suffix = ctx.loc_suffix(line, col);
        match self {
            ParseError::EmptyInput(_) => ParseError::EmptyInput(suffix),
            ParseError::UnexpectedStart(c, _) => ParseError::UnexpectedStart(c, suffix),
            ParseError::UnexpectedToken(c, state, reason, _) => {
                ParseError::UnexpectedToken(c, state, reason, suffix)
            }
            ParseError::InvalidToken(token, _) => ParseError::InvalidToken(token, suffix),
            ParseError::TrailingContent(c, _) => ParseError::TrailingContent(c, suffix),
            ParseError::UnexpectedEnd(state, _) => ParseError::UnexpectedEnd(state, suffix),
            ParseError::DepthExceeded(limit, _) => ParseError::DepthExceeded(limit, suffix),
            ParseError::InvalidUtf8(_) => ParseError::InvalidUtf8(suffix),
            ParseError::Io(e) => ParseError::Io(e),
        }
    }

    /// Shorthand for an [`ParseError::UnexpectedToken`] without location.
    pub(crate) fn unexpected(found: char, state: State, reason: &'static str) -> Self {
        ParseError::UnexpectedToken(found, state, reason, String::new())
    }

    /// Shorthand for an [`ParseError::InvalidToken`] without location.
    pub(crate) fn invalid_token(token: impl Into<String>) -> Self {
        ParseError::InvalidToken(token.into(), String::new())
    }
}
