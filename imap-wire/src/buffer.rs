//! Component A: accumulates inbound bytes and hands the parser a view it may retry against.
//!
//! This is deliberately thin. `nom`'s `streaming` combinators already raise
//! [`nom::Err::Incomplete`] when a production reads past the end of its input — exactly the
//! `needMoreData` signal spec.md §4.1 asks for — so [`Buffer`] does not reimplement cursor
//! snapshot/restore itself. Its job is narrower: own the growable byte region the parser borrows
//! spans from, let the driver feed network reads into it, advance past whatever the parser
//! actually consumed, and enforce the high-water-mark on non-literal accumulation from spec.md
//! §5.

use log::trace;

/// Default cap (1 MiB) on bytes held in the buffer that are not part of a literal currently being
/// streamed out to the caller. Protects against a misbehaving peer sending an unbounded line with
/// no CRLF.
pub const DEFAULT_HIGH_WATER_MARK: usize = 1024 * 1024;

/// A growable accumulator of inbound bytes with a read cursor.
///
/// The parser calls [`Buffer::bytes`] to get the currently available slice, attempts a parse, and
/// then calls [`Buffer::consume`] with however many bytes it actually used. On
/// `nom::Err::Incomplete` the parser consumes nothing; the caller reads more bytes via
/// [`Buffer::fill`] and retries from the same position.
#[derive(Debug, Clone)]
pub struct Buffer {
    data: Vec<u8>,
    /// Index into `data` of the first unconsumed byte.
    start: usize,
    high_water_mark: usize,
}

impl Default for Buffer {
    fn default() -> Self {
        Self::new(DEFAULT_HIGH_WATER_MARK)
    }
}

impl Buffer {
    pub fn new(high_water_mark: usize) -> Self {
        Self {
            data: Vec::new(),
            start: 0,
            high_water_mark,
        }
    }

    /// Appends freshly-read network bytes.
    pub fn fill(&mut self, bytes: &[u8]) {
        self.data.extend_from_slice(bytes);
        trace!(
            "buffer: filled {} bytes, {} now pending",
            bytes.len(),
            self.bytes().len()
        );
    }

    /// The currently unconsumed bytes.
    pub fn bytes(&self) -> &[u8] {
        &self.data[self.start..]
    }

    /// Marks `n` bytes (from the front of [`Buffer::bytes`]) as consumed.
    pub fn consume(&mut self, n: usize) {
        assert!(
            self.start + n <= self.data.len(),
            "consumed more bytes than were available"
        );
        self.start += n;
        self.compact();
    }

    /// Drops the consumed prefix once it grows large enough to be worth a `memmove`.
    fn compact(&mut self) {
        if self.start == 0 {
            return;
        }
        if self.start < 4096 && self.start * 4 < self.data.len() {
            return;
        }
        self.data.drain(0..self.start);
        self.start = 0;
    }

    /// `true` if the unconsumed bytes exceed the configured high-water-mark.
    ///
    /// Callers in the middle of streaming a literal should not consult this: the mark only bounds
    /// bytes held *because the parser has nowhere to put them yet*, not the size of a literal
    /// being forwarded to the caller chunk by chunk.
    pub fn over_high_water_mark(&self) -> bool {
        self.bytes().len() > self.high_water_mark
    }

    pub fn high_water_mark(&self) -> usize {
        self.high_water_mark
    }

    pub fn is_empty(&self) -> bool {
        self.bytes().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fill_and_consume() {
        let mut buffer = Buffer::default();
        buffer.fill(b"hello ");
        buffer.fill(b"world");
        assert_eq!(buffer.bytes(), b"hello world");

        buffer.consume(6);
        assert_eq!(buffer.bytes(), b"world");
    }

    #[test]
    fn test_compact_reclaims_space() {
        let mut buffer = Buffer::default();
        buffer.fill(&vec![b'a'; 10_000]);
        buffer.consume(9_000);
        assert_eq!(buffer.bytes().len(), 1_000);
    }

    #[test]
    fn test_high_water_mark() {
        let mut buffer = Buffer::new(4);
        buffer.fill(b"abcd");
        assert!(!buffer.over_high_water_mark());
        buffer.fill(b"e");
        assert!(buffer.over_high_water_mark());
    }
}
