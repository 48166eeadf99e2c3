use alloc::collections::TryReserveError;

use thiserror::Error;

/// A parse failure, located at an absolute byte offset in the input stream.
///
/// For [`ErrorKind::Grammar`] the offset points at the offending byte. For
/// [`ErrorKind::UnexpectedEndOfInput`] it is the total number of bytes fed
/// before the end-of-input signal.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{kind} at offset {offset}")]
pub struct ParserError {
    pub(crate) kind: ErrorKind,
    pub(crate) offset: usize,
}

impl ParserError {
    pub(crate) fn new(kind: ErrorKind, offset: usize) -> Self {
        Self { kind, offset }
    }

    /// What went wrong.
    #[must_use]
    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }

    /// Absolute byte offset of the failure.
    #[must_use]
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Returns `true` for grammar errors.
    #[must_use]
    pub fn is_grammar(&self) -> bool {
        matches!(self.kind, ErrorKind::Grammar(_))
    }

    /// Returns `true` when the input ended before a complete value.
    #[must_use]
    pub fn is_unexpected_end_of_input(&self) -> bool {
        matches!(self.kind, ErrorKind::UnexpectedEndOfInput)
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// The byte is not legal given the current token and context.
    #[error("unexpected byte '{}'", .0.escape_ascii())]
    Grammar(u8),
    /// End of input was signalled while the document was incomplete.
    #[error("unexpected end of input")]
    UnexpectedEndOfInput,
    #[error(transparent)]
    AllocationFailure(#[from] AllocError),
}

/// A container could not obtain memory for growth.
///
/// The container that reported it is left in its previous valid state.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("memory allocation failed")]
pub struct AllocError;

impl From<TryReserveError> for AllocError {
    fn from(_: TryReserveError) -> Self {
        AllocError
    }
}

/// Extraction from a [`Chain`](crate::Chain) outside of its retained bytes.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChainError {
    #[error("range {offset}..{end} is outside the retained window {start}..{len}")]
    OutOfRange {
        offset: usize,
        end: usize,
        start: usize,
        len: usize,
    },
    #[error(transparent)]
    AllocationFailure(#[from] AllocError),
}

#[cfg(test)]
mod tests {
    use alloc::string::ToString;

    use super::*;

    #[test]
    fn grammar_error_renders_escaped_byte() {
        let err = ParserError::new(ErrorKind::Grammar(b'\n'), 7);
        assert_eq!(err.to_string(), "unexpected byte '\\n' at offset 7");
        assert!(err.is_grammar());
        assert_eq!(err.offset(), 7);
    }

    #[test]
    fn allocation_failure_is_transparent() {
        let err = ParserError::new(AllocError.into(), 0);
        assert_eq!(err.to_string(), "memory allocation failed at offset 0");
        assert!(!err.is_unexpected_end_of_input());
    }
}
