//! Container state machine.
//!
//! One [`Machine`] parses one container, from the character after its
//! opening bracket up to and including its closing bracket. Scalars are
//! accumulated in a [`Token`]; nested containers get a fresh machine that
//! borrows the same scanner until it finishes, then the parent resumes.
//!
//! A mapping moves through
//! `WAIT_KEY -> COLLECTING_KEY -> END_KEY -> WAIT_VALUE -> COLLECTING_VALUE -> END_VALUE`
//! for each entry, a sequence only through the value half. Both end in
//! `FINISHED`.

use crate::error::{ParseError, Result};
use crate::scanner::{is_whitespace, Scanner};
use crate::token::Token;
use crate::value::{Map, Value};
use std::fmt;
use tracing::trace;

/// Parser state of one container.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    WaitKey,
    CollectingKey,
    EndKey,
    WaitValue,
    CollectingValue,
    EndValue,
    Finished,
}

impl State {
    /// States in which whitespace belongs to the current token.
    pub fn is_collecting(self) -> bool {
        matches!(self, State::CollectingKey | State::CollectingValue)
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            State::WaitKey => "WAIT_KEY",
            State::CollectingKey => "COLLECTING_KEY",
            State::EndKey => "END_KEY",
            State::WaitValue => "WAIT_VALUE",
            State::CollectingValue => "COLLECTING_VALUE",
            State::EndValue => "END_VALUE",
            State::Finished => "FINISHED",
        };
        f.write_str(name)
    }
}

/// The container being built.
#[derive(Debug, Clone)]
pub enum Container {
    Mapping(Map),
    Sequence(Vec<Value>),
}

impl Container {
    /// Empty container for an opening bracket.
    pub fn open(c: char) -> Option<Self> {
        match c {
            '{' => Some(Container::Mapping(Map::new())),
            '[' => Some(Container::Sequence(Vec::new())),
            _ => None,
        }
    }

    fn close(&self) -> char {
        match self {
            Container::Mapping(_) => '}',
            Container::Sequence(_) => ']',
        }
    }

    fn initial_state(&self) -> State {
        match self {
            Container::Mapping(_) => State::WaitKey,
            Container::Sequence(_) => State::WaitValue,
        }
    }

    /// Where to go after a `,`.
    fn after_separator(&self) -> State {
        self.initial_state()
    }

    fn len(&self) -> usize {
        match self {
            Container::Mapping(map) => map.len(),
            Container::Sequence(items) => items.len(),
        }
    }

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn kind_name(&self) -> &'static str {
        match self {
            Container::Mapping(_) => "mapping",
            Container::Sequence(_) => "sequence",
        }
    }

    fn into_value(self) -> Value {
        match self {
            Container::Mapping(map) => Value::Mapping(map),
            Container::Sequence(items) => Value::Sequence(items),
        }
    }
}

/// State machine for one container.
#[derive(Debug, Clone)]
pub struct Machine {
    state: State,
    /// Completed scalars and child containers not yet folded into `result`.
    pending: Vec<Value>,
    result: Container,
    token: Token,
    /// Nesting level, 1 for the document root.
    depth: usize,
}

impl Machine {
    pub fn new(result: Container, depth: usize) -> Self {
        Self {
            state: result.initial_state(),
            pending: Vec::with_capacity(2),
            result,
            token: Token::default(),
            depth,
        }
    }

    /// Consume characters from `scanner` until this container closes.
    pub fn run<I>(mut self, scanner: &mut Scanner<'_, I>) -> Result<Value>
    where
        I: Iterator<Item = Result<char>>,
    {
        trace!(depth = self.depth, kind = self.result.kind_name(), "container opened");

        while self.state != State::Finished {
            let c = match scanner.next_char()? {
                Some(c) => c,
                None => {
                    return Err(scanner.end_error(ParseError::UnexpectedEnd(
                        self.state,
                        String::new(),
                    )))
                }
            };
            if is_whitespace(c) && !self.state.is_collecting() {
                continue;
            }

            if let Some(child) = self.feed(c).map_err(|e| scanner.error(e))? {
                let value = self.descend(child, scanner)?;
                self.pending.push(value);
                self.state = State::EndValue;
            }
            self.fold_pending();
        }

        trace!(
            depth = self.depth,
            entries = self.result.len(),
            "container finished"
        );
        Ok(self.result.into_value())
    }

    /// Run a child machine for a nested container.
    fn descend<I>(&self, child: Container, scanner: &mut Scanner<'_, I>) -> Result<Value>
    where
        I: Iterator<Item = Result<char>>,
    {
        let depth = self.depth + 1;
        if let Some(limit) = scanner.context().max_depth {
            if depth > limit {
                return Err(scanner.error(ParseError::DepthExceeded(limit, String::new())));
            }
        }
        Machine::new(child, depth).run(scanner)
    }

    /// Apply one character to the current state.
    ///
    /// Returns the container to descend into when `c` opens one. Whitespace
    /// outside of tokens never reaches this point.
    pub fn feed(&mut self, c: char) -> Result<Option<Container>> {
        let state = self.state;
        match state {
            State::WaitKey => match c {
                '}' if self.result.is_empty() => self.state = State::Finished,
                '"' => {
                    self.token = Token::begin(c)?;
                    self.state = State::CollectingKey;
                }
                '}' => return Err(ParseError::unexpected(c, state, "waiting for new key")),
                _ => return Err(ParseError::unexpected(c, state, "expecting quotes")),
            },
            State::CollectingKey => {
                if c == '"' {
                    self.finish_token()?;
                    self.state = State::EndKey;
                } else {
                    self.token.append(c);
                }
            }
            State::EndKey => match c {
                ':' => self.state = State::WaitValue,
                _ => return Err(ParseError::unexpected(c, state, "expected separator")),
            },
            State::WaitValue => match c {
                '{' | '[' => return Ok(Container::open(c)),
                ']' if matches!(self.result, Container::Sequence(_)) && self.result.is_empty() => {
                    self.state = State::Finished
                }
                '}' | ']' | ',' | ':' => {
                    return Err(ParseError::unexpected(c, state, "expecting value"))
                }
                _ => {
                    self.token = Token::begin(c)?;
                    self.state = State::CollectingValue;
                }
            },
            State::CollectingValue => {
                if self.token.is_end(c) {
                    self.finish_token()?;
                    self.state = match c {
                        ',' => self.result.after_separator(),
                        _ if c == self.result.close() => State::Finished,
                        '}' | ']' => {
                            return Err(ParseError::unexpected(
                                c,
                                state,
                                "mismatched closing bracket",
                            ))
                        }
                        _ => State::EndValue,
                    };
                } else {
                    self.token.validate_next(c)?;
                    self.token.append(c);
                }
            }
            State::EndValue => match c {
                ',' => self.state = self.result.after_separator(),
                _ if c == self.result.close() => self.state = State::Finished,
                _ => return Err(ParseError::unexpected(c, state, "expected separator")),
            },
            State::Finished => {
                return Err(ParseError::unexpected(c, state, "container already closed"))
            }
        }
        Ok(None)
    }

    /// Finalize the active token into `pending` and start over with a fresh one.
    fn finish_token(&mut self) -> Result<()> {
        let value = std::mem::take(&mut self.token).finalize()?;
        self.pending.push(value);
        Ok(())
    }

    /// Move completed entries from `pending` into `result`.
    fn fold_pending(&mut self) {
        match &mut self.result {
            Container::Sequence(items) => items.append(&mut self.pending),
            Container::Mapping(map) => {
                if self.pending.len() < 2 {
                    return;
                }
                let value = self.pending.pop();
                let key = self.pending.pop();
                // Keys only ever come out of COLLECTING_KEY, so they are strings.
                if let (Some(Value::String(key)), Some(value)) = (key, value) {
                    // Last write wins on duplicate keys.
                    map.insert(key, value);
                }
            }
        }
    }
}
