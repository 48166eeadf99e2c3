//! Incremental, chunk-driven JSON parser.
//!
//! Overview
//! - Input arrives through [`Parser::feed`] in chunks of any size. Every byte
//!   is consumed immediately; nothing from a chunk is retained except decoded
//!   string content (in the [`Chain`]) and, for
//!   [`NumberPrecision::Exact`](crate::NumberPrecision::Exact), the text of the
//!   number in flight.
//! - Tokens are validated by a predecessor table plus context checks against
//!   the assembly stack. Nested containers are assembled on that stack
//!   without recursion.
//! - Completion is signalled explicitly with [`Parser::finish`]: running out
//!   of bytes in a chunk never ends a value, since the next chunk may extend
//!   it (`12` followed by `3`).
//!
//! Errors
//! - Every error carries the absolute offset of the offending byte, or of the
//!   end of input for [`ErrorKind::UnexpectedEndOfInput`].
//! - On error all partial values are dropped and the parser stays failed,
//!   returning the same error, until [`Parser::reset`].

mod grammar;
mod literal;
mod number;
mod stack;

use bstr::BString;
use memchr::memchr2;

use grammar::{TokenKind, is_whitespace};
use literal::{LiteralMatcher, Step};
use number::{NumberAccumulator, NumberStep};
use stack::{AssemblyStack, ContainerKind};

use crate::{
    Chain, OrderedMap, ParserOptions, Sequence, Value,
    error::{ErrorKind, ParserError},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Idle,
    String,
    StringEscape,
    Number,
    Literal,
    Finished,
    Failed,
}

/// A resumable JSON parser that builds a [`Value`] tree from byte chunks.
///
/// ```
/// use jsonstack::{Parser, Value};
///
/// let mut parser = Parser::default();
/// for chunk in [&b"[1, 2."][..], b"5, \"a\\", b"nb\", tr", b"ue]"] {
///     parser.feed(chunk)?;
/// }
/// parser.finish()?;
/// let value = parser.take_result().unwrap();
/// assert_eq!(value.to_string(), "[1,2.5,\"a\\nb\",true]");
/// # Ok::<(), jsonstack::ParserError>(())
/// ```
#[derive(Debug)]
pub struct Parser {
    options: ParserOptions,
    mode: Mode,
    prev: TokenKind,
    /// Absolute offset of the next byte to be consumed.
    offset: usize,
    stack: AssemblyStack,
    chain: Chain,
    /// Chain offset where the string in flight begins.
    string_start: usize,
    number: NumberAccumulator,
    literal: LiteralMatcher,
    failure: Option<ParserError>,
}

impl Default for Parser {
    fn default() -> Self {
        Self::new(ParserOptions::default())
    }
}

impl Parser {
    #[must_use]
    pub fn new(options: ParserOptions) -> Self {
        Self {
            options,
            mode: Mode::Idle,
            prev: TokenKind::Begin,
            offset: 0,
            stack: AssemblyStack::new(),
            chain: Chain::new(),
            string_start: 0,
            number: NumberAccumulator::new(options.number_precision),
            literal: LiteralMatcher::default(),
            failure: None,
        }
    }

    /// Discards all state, including a stored error, so the parser can start
    /// a new document.
    pub fn reset(&mut self) {
        log::trace!("parser reset at offset {}", self.offset);
        self.mode = Mode::Idle;
        self.prev = TokenKind::Begin;
        self.offset = 0;
        self.stack.clear();
        self.chain.clear();
        self.string_start = 0;
        self.number = NumberAccumulator::new(self.options.number_precision);
        self.literal = LiteralMatcher::default();
        self.failure = None;
    }

    /// Total number of bytes consumed since creation or the last reset.
    #[must_use]
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Whether [`finish`](Self::finish) succeeded and a result is waiting.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.mode == Mode::Finished
    }

    #[must_use]
    pub fn options(&self) -> &ParserOptions {
        &self.options
    }

    /// Consumes the next chunk of input.
    ///
    /// # Errors
    ///
    /// Returns a [`ParserError`] located at the first illegal byte, or an
    /// allocation failure. Once an error has been returned, every further
    /// call returns it again until [`reset`](Self::reset).
    pub fn feed(&mut self, chunk: impl AsRef<[u8]>) -> Result<(), ParserError> {
        if let Some(err) = &self.failure {
            return Err(err.clone());
        }
        let bytes = chunk.as_ref();
        let mut pos = 0;
        while pos < bytes.len() {
            match self.step(&bytes[pos..]) {
                Ok(consumed) => {
                    pos += consumed;
                    self.offset += consumed;
                }
                Err(kind) => return Err(self.fail(kind)),
            }
        }
        Ok(())
    }

    /// Signals the end of input.
    ///
    /// Completes a number still in flight and checks that exactly one
    /// complete value was parsed. Calling it again after success is a no-op.
    ///
    /// # Errors
    ///
    /// [`ErrorKind::UnexpectedEndOfInput`] if the document is incomplete, or
    /// the stored error of a failed parser.
    pub fn finish(&mut self) -> Result<(), ParserError> {
        if let Some(err) = &self.failure {
            return Err(err.clone());
        }
        match self.mode {
            Mode::Finished => return Ok(()),
            Mode::Number if self.number.is_complete() => {
                if let Err(kind) = self.end_number(b' ') {
                    return Err(self.fail(kind));
                }
            }
            Mode::Idle => {}
            _ => return Err(self.fail(ErrorKind::UnexpectedEndOfInput)),
        }
        if !TokenKind::End.may_follow(self.prev) || !self.stack.is_single_ready() {
            return Err(self.fail(ErrorKind::UnexpectedEndOfInput));
        }
        self.prev = TokenKind::End;
        self.mode = Mode::Finished;
        Ok(())
    }

    /// Hands over the parsed value and resets the parser for reuse.
    ///
    /// Returns `None`, leaving the parser untouched, unless
    /// [`finish`](Self::finish) has succeeded.
    pub fn take_result(&mut self) -> Option<Value> {
        if self.mode != Mode::Finished {
            return None;
        }
        let value = self.stack.take_single_ready();
        self.reset();
        value
    }

    fn fail(&mut self, kind: ErrorKind) -> ParserError {
        let err = ParserError::new(kind, self.offset);
        log::debug!("parse failed: {err}; dropping {} partial values", self.stack.len());
        self.stack.clear();
        self.chain.clear();
        self.mode = Mode::Failed;
        self.failure = Some(err.clone());
        err
    }

    /// Processes the head of `input` and returns how many bytes were consumed.
    /// Zero means the first byte must be processed again in the new mode.
    fn step(&mut self, input: &[u8]) -> Result<usize, ErrorKind> {
        let byte = input[0];
        match self.mode {
            Mode::Idle => self.idle(byte).map(|()| 1),
            Mode::String => self.string(input),
            Mode::StringEscape => {
                let decoded = match byte {
                    b'"' | b'\\' | b'/' => byte,
                    b'b' => 0x08,
                    b'f' => 0x0C,
                    b'n' => b'\n',
                    b'r' => b'\r',
                    b't' => b'\t',
                    _ => return Err(ErrorKind::Grammar(byte)),
                };
                self.chain.push(decoded)?;
                self.mode = Mode::String;
                Ok(1)
            }
            Mode::Number => match self.number.step(byte)? {
                NumberStep::Continue => Ok(1),
                NumberStep::End => {
                    self.end_number(byte)?;
                    Ok(0)
                }
                NumberStep::Reject => Err(ErrorKind::Grammar(byte)),
            },
            Mode::Literal => match self.literal.step(byte) {
                Step::NeedMore => Ok(1),
                Step::Done(value) => {
                    self.stack.push_ready(value)?;
                    self.mode = Mode::Idle;
                    Ok(1)
                }
                Step::Reject => Err(ErrorKind::Grammar(byte)),
            },
            Mode::Finished if is_whitespace(byte) => Ok(1),
            Mode::Finished | Mode::Failed => Err(ErrorKind::Grammar(byte)),
        }
    }

    fn string(&mut self, input: &[u8]) -> Result<usize, ErrorKind> {
        match memchr2(b'"', b'\\', input) {
            Some(0) if input[0] == b'\\' => {
                self.mode = Mode::StringEscape;
                Ok(1)
            }
            Some(0) => {
                let text: BString = self.chain.take_since(self.string_start)?;
                self.stack.push_ready(Value::String(text))?;
                self.mode = Mode::Idle;
                Ok(1)
            }
            Some(run) => {
                self.chain.append(&input[..run])?;
                Ok(run)
            }
            None => {
                self.chain.append(input)?;
                Ok(input.len())
            }
        }
    }

    fn end_number(&mut self, terminator: u8) -> Result<(), ErrorKind> {
        let n = self
            .number
            .finish()
            .ok_or(ErrorKind::Grammar(terminator))?;
        self.stack.push_ready(Value::Number(n))?;
        self.mode = Mode::Idle;
        Ok(())
    }

    fn idle(&mut self, byte: u8) -> Result<(), ErrorKind> {
        if is_whitespace(byte) {
            return Ok(());
        }
        let Some(kind) = TokenKind::from_lead_byte(byte) else {
            return Err(ErrorKind::Grammar(byte));
        };
        if !kind.may_follow(self.prev) {
            return Err(ErrorKind::Grammar(byte));
        }
        if kind.starts_value() && kind != TokenKind::String && self.stack.in_key_position() {
            return Err(ErrorKind::Grammar(byte));
        }

        match kind {
            TokenKind::ArrayOpen => {
                let seq = Sequence::with_options(self.options.sequence);
                self.stack.push(Value::Array(seq))?;
            }
            TokenKind::ObjectOpen => {
                let map = OrderedMap::with_options(self.options.map);
                self.stack.push(Value::Object(map))?;
            }
            TokenKind::ArrayClose => self.close(ContainerKind::Array, byte)?,
            TokenKind::ObjectClose => self.close(ContainerKind::Object, byte)?,
            TokenKind::ValueSeparator => {
                if !(self.stack.close_array()? || self.stack.close_object()?) {
                    return Err(ErrorKind::Grammar(byte));
                }
                if let Some(frame) = self.stack.top_mut() {
                    frame.ready = false;
                }
            }
            TokenKind::NameSeparator => {
                if !self.stack.awaits_name_separator() {
                    return Err(ErrorKind::Grammar(byte));
                }
            }
            TokenKind::String => {
                self.string_start = self.chain.len();
                self.mode = Mode::String;
            }
            TokenKind::Number => {
                self.number.start(byte)?;
                self.mode = Mode::Number;
            }
            TokenKind::True | TokenKind::False | TokenKind::Null => {
                self.literal = LiteralMatcher::start(byte);
                self.mode = Mode::Literal;
            }
            TokenKind::Begin | TokenKind::End => return Err(ErrorKind::Grammar(byte)),
        }
        self.prev = kind;
        Ok(())
    }

    /// Handles `]` or `}`: attaches a pending member, or closes an empty
    /// container straight after its opener, then marks the container complete.
    fn close(&mut self, container: ContainerKind, byte: u8) -> Result<(), ErrorKind> {
        let (fired, opener) = match container {
            ContainerKind::Array => (self.stack.close_array()?, TokenKind::ArrayOpen),
            ContainerKind::Object => (self.stack.close_object()?, TokenKind::ObjectOpen),
        };
        if !fired && self.prev != opener {
            return Err(ErrorKind::Grammar(byte));
        }
        if self.stack.peek_container_kind(0) != Some(container) {
            return Err(ErrorKind::Grammar(byte));
        }
        if let Some(frame) = self.stack.top_mut() {
            frame.ready = true;
        }
        Ok(())
    }
}

/// Parses a complete document held in memory.
///
/// ```
/// let v = jsonstack::parse(br#"{"a": [true, null]}"#).unwrap();
/// assert_eq!(v["a"][0], jsonstack::Value::from(true));
///
/// let err = jsonstack::parse(b"[1,]").unwrap_err();
/// assert_eq!(err.offset(), 3);
/// ```
///
/// # Errors
///
/// See [`Parser::feed`] and [`Parser::finish`].
pub fn parse(input: impl AsRef<[u8]>) -> Result<Value, ParserError> {
    let input = input.as_ref();
    let mut parser = Parser::default();
    parser.feed(input)?;
    parser.finish()?;
    parser
        .take_result()
        .ok_or_else(|| ParserError::new(ErrorKind::UnexpectedEndOfInput, input.len()))
}
