//! Helpers for splitting a document into chunks, shared by tests, benches
//! and the fuzz target.
use alloc::vec::Vec;

/// Split `payload` into `parts` chunks of roughly equal size.
///
/// Byte-oriented: chunk boundaries may fall inside multi-byte characters,
/// escape sequences or numbers.
///
/// # Panics
///
/// Panics if `parts` is zero.
#[must_use]
pub fn produce_chunks(payload: &[u8], parts: usize) -> Vec<&[u8]> {
    assert!(parts > 0);
    let chunk_size = payload.len().div_ceil(parts).max(1);
    payload.chunks(chunk_size).collect()
}

/// Split `payload` at the given cut points, taken modulo the remaining
/// length. Every returned chunk is non-empty and together they cover the
/// whole payload in order.
#[must_use]
pub fn split_at_points<'a>(payload: &'a [u8], points: &[usize]) -> Vec<&'a [u8]> {
    let mut chunks = Vec::new();
    let mut rest = payload;
    for &point in points {
        if rest.is_empty() {
            break;
        }
        let size = 1 + point % rest.len();
        let (head, tail) = rest.split_at(size);
        chunks.push(head);
        rest = tail;
    }
    if !rest.is_empty() {
        chunks.push(rest);
    }
    chunks
}
