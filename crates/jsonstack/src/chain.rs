//! Append-only byte buffer addressed by absolute offsets.
//!
//! Bytes are only ever added at the end. Offsets count every byte appended
//! since creation (or the last [`Chain::clear`]), so they stay valid across
//! [`Chain::release`], which drops a consumed prefix to keep memory bounded.
use alloc::vec::Vec;

use bstr::BString;

use crate::error::{AllocError, ChainError};

#[derive(Debug, Clone, Default)]
pub struct Chain {
    data: Vec<u8>,
    /// Absolute offset of `data[0]`.
    start: usize,
}

impl Chain {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Absolute offset one past the last appended byte.
    #[must_use]
    pub fn len(&self) -> usize {
        self.start + self.data.len()
    }

    /// Returns `true` if nothing is retained.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Absolute offset of the oldest retained byte.
    #[must_use]
    pub fn retained_start(&self) -> usize {
        self.start
    }

    /// # Errors
    ///
    /// Returns [`AllocError`] if the buffer cannot grow; nothing is appended.
    pub fn append(&mut self, bytes: &[u8]) -> Result<(), AllocError> {
        self.data.try_reserve(bytes.len())?;
        self.data.extend_from_slice(bytes);
        Ok(())
    }

    /// # Errors
    ///
    /// Returns [`AllocError`] if the buffer cannot grow.
    pub fn push(&mut self, byte: u8) -> Result<(), AllocError> {
        self.data.try_reserve(1)?;
        self.data.push(byte);
        Ok(())
    }

    /// Copies `len` bytes starting at absolute `offset` into a new string.
    ///
    /// # Errors
    ///
    /// [`ChainError::OutOfRange`] if any part of the range was released or
    /// not yet appended, [`ChainError::AllocationFailure`] if the copy cannot
    /// be allocated.
    pub fn extract(&self, offset: usize, len: usize) -> Result<BString, ChainError> {
        let out_of_range = || ChainError::OutOfRange {
            offset,
            end: offset.saturating_add(len),
            start: self.start,
            len: self.len(),
        };
        let end = offset.checked_add(len).ok_or_else(out_of_range)?;
        if offset < self.start || end > self.len() {
            return Err(out_of_range());
        }
        let bytes = &self.data[offset - self.start..end - self.start];
        let mut out = Vec::new();
        out.try_reserve_exact(bytes.len()).map_err(AllocError::from)?;
        out.extend_from_slice(bytes);
        Ok(BString::from(out))
    }

    /// Moves the bytes from absolute `offset` to the end out of the chain and
    /// releases everything retained. Offsets keep counting from [`len`](Self::len).
    ///
    /// # Errors
    ///
    /// Returns [`AllocError`] if the bytes cannot be copied; the chain is left
    /// unchanged.
    pub fn take_since(&mut self, offset: usize) -> Result<BString, AllocError> {
        let end = self.len();
        let from = offset.saturating_sub(self.start).min(self.data.len());
        let out = if from == 0 {
            core::mem::take(&mut self.data)
        } else {
            let mut out = Vec::new();
            out.try_reserve_exact(self.data.len() - from)?;
            out.extend_from_slice(&self.data[from..]);
            self.data.clear();
            out
        };
        self.start = end;
        Ok(BString::from(out))
    }

    /// Drops retained bytes before absolute offset `up_to`.
    ///
    /// Offsets at or before the retained start are a no-op; offsets past the
    /// end release everything.
    pub fn release(&mut self, up_to: usize) {
        if up_to <= self.start {
            return;
        }
        let n = (up_to - self.start).min(self.data.len());
        self.data.drain(..n);
        self.start += n;
    }

    /// Drops everything and resets offsets to zero.
    pub fn clear(&mut self) {
        self.data.clear();
        self.start = 0;
    }
}
