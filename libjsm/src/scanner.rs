//! Character source.
//!
//! The scanner hands out one character at a time to whichever container
//! machine currently owns the stream. It performs:
//! - Position tracking (line and column of the last character read)
//! - Whitespace skipping between structural characters
//! - The trailing-content check after the document closes
//!
//! [`ReaderChars`] turns a byte reader into characters for the scanner,
//! decoding UTF-8 one character at a time.

use crate::error::{ParseContext, ParseError, Result};
use std::io::{self, Read};

/// Whether `c` separates tokens.
pub fn is_whitespace(c: char) -> bool {
    c == ' ' || c == '\n'
}

/// Forward-only character stream with position tracking.
pub struct Scanner<'c, I> {
    chars: I,
    ctx: &'c ParseContext,
    /// Zero-based position of the next character.
    line: usize,
    col: usize,
    /// Zero-based position of the last character handed out.
    last: (usize, usize),
}

impl<'c, I> Scanner<'c, I>
where
    I: Iterator<Item = Result<char>>,
{
    pub fn new(chars: I, ctx: &'c ParseContext) -> Self {
        Self {
            chars,
            ctx,
            line: 0,
            col: 0,
            last: (0, 0),
        }
    }

    pub fn context(&self) -> &'c ParseContext {
        self.ctx
    }

    /// Read the next character, or `None` once the source is exhausted.
    pub fn next_char(&mut self) -> Result<Option<char>> {
        match self.chars.next() {
            None => Ok(None),
            Some(Err(e)) => Err(e.with_location(self.ctx, self.line, self.col)),
            Some(Ok(c)) => {
                self.last = (self.line, self.col);
                if c == '\n' {
                    self.line += 1;
                    self.col = 0;
                } else {
                    self.col += 1;
                }
                Ok(Some(c))
            }
        }
    }

    /// Read the next non-whitespace character.
    pub fn next_significant(&mut self) -> Result<Option<char>> {
        loop {
            match self.next_char()? {
                Some(c) if is_whitespace(c) => continue,
                other => return Ok(other),
            }
        }
    }

    /// Attach the position of the last character read to `err`.
    pub fn error(&self, err: ParseError) -> ParseError {
        err.with_location(self.ctx, self.last.0, self.last.1)
    }

    /// Attach the position just past the end of input to `err`.
    pub fn end_error(&self, err: ParseError) -> ParseError {
        err.with_location(self.ctx, self.line, self.col)
    }

    /// Drain the source, failing on anything but whitespace.
    pub fn finish(&mut self) -> Result<()> {
        match self.next_significant()? {
            Some(c) => Err(self.error(ParseError::TrailingContent(c, String::new()))),
            None => Ok(()),
        }
    }
}

/// Characters decoded from a UTF-8 byte reader.
///
/// Wrap unbuffered readers in a [`io::BufReader`] first; each character costs
/// one to four single-byte reads.
pub struct ReaderChars<R> {
    bytes: io::Bytes<R>,
}

impl<R: Read> ReaderChars<R> {
    pub fn new(reader: R) -> Self {
        Self {
            bytes: reader.bytes(),
        }
    }
}

/// Length of the UTF-8 sequence introduced by `lead`, or 0 if `lead` cannot
/// start one.
fn utf8_width(lead: u8) -> usize {
    match lead {
        0x00..=0x7F => 1,
        0xC2..=0xDF => 2,
        0xE0..=0xEF => 3,
        0xF0..=0xF4 => 4,
        _ => 0,
    }
}

fn invalid_utf8() -> ParseError {
    ParseError::InvalidUtf8(String::new())
}

impl<R: Read> Iterator for ReaderChars<R> {
    type Item = Result<char>;

    fn next(&mut self) -> Option<Self::Item> {
        let lead = match self.bytes.next()? {
            Ok(b) => b,
            Err(e) => return Some(Err(e.into())),
        };
        let width = utf8_width(lead);
        if width == 0 {
            return Some(Err(invalid_utf8()));
        }

        let mut buf = [lead, 0, 0, 0];
        for slot in buf.iter_mut().take(width).skip(1) {
            match self.bytes.next() {
                Some(Ok(b)) => *slot = b,
                Some(Err(e)) => return Some(Err(e.into())),
                None => return Some(Err(invalid_utf8())),
            }
        }

        // from_utf8 rejects overlong forms and surrogates for us.
        let decoded = std::str::from_utf8(&buf[..width])
            .ok()
            .and_then(|s| s.chars().next());
        Some(decoded.ok_or_else(invalid_utf8))
    }
}
