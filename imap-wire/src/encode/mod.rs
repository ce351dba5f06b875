//! Component C: turns typed commands into wire bytes.
//!
//! The entry point is [`encode_all`], which drives any [`Encode`] value through an
//! [`EncodeContext`] and collects the result into [`Chunk`]s. Per spec.md §4.3.1, a chunk
//! boundary only ever occurs right after a synchronizing literal's `{N}\r\n` header: the caller
//! must transmit that chunk, wait for a continuation request, and only then send the rest. A
//! non-synchronizing literal's `{N+}\r\n` header never breaks a chunk. The encoder is total: it
//! never fails, so [`Encode::encode_ctx`] returns nothing to check.
//!
//! String-form selection (atom vs quoted vs literal) mostly isn't this module's job: the grammar
//! constructors in `imap-wire-types` (`AString::try_from`, `IString::try_from`, ...) already chose
//! the representation at construction time, so encoding a value is mostly rendering whichever
//! variant is already there. The one choice left to the encoder is whether to honor a literal's
//! `non_sync` bit, which [`Options::non_synchronizing_literal_plus`] gates on a negotiated
//! server capability.

mod command;
mod fetch;
mod search;
mod sequence;

use std::fmt::Display;

use imap_wire_types::{
    auth::{AuthMechanism, AuthenticateData},
    core::{AString, Atom, AtomExt, Charset, IString, Literal, NString, Quoted, Tag, Text},
    datetime::{Date, InternalDate},
    extensions::binary::{Literal8, LiteralOrLiteral8, NString8},
    flag::Flag,
    mailbox::{ListCharString, ListMailbox, Mailbox},
    secret::Secret,
    status::StatusDataItemName,
};
use imap_wire_types::utils::escape_quoted;

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};

pub use command::CommandStreamPart;

/// Options steering choices the grammar itself leaves open.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Options {
    /// Honor a [`Literal`]'s `non_sync` bit and emit `{N+}` instead of `{N}`.
    ///
    /// Defaults to `false`: a literal built with [`Literal::new_non_sync`] still renders
    /// synchronizing unless the caller has confirmed (by setting this) that the peer advertised
    /// `LITERAL+`/`LITERAL-`. This keeps a freshly-constructed command safe to send to a server
    /// of unknown capability.
    pub non_synchronizing_literal_plus: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            non_synchronizing_literal_plus: false,
        }
    }
}

/// One piece of a command ready to hand to the transport.
///
/// `wait_for_continuation_after` is `true` exactly when `bytes` ends in a synchronizing literal's
/// `{N}\r\n` header; the caller must not send anything further until the server's `+` arrives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    pub bytes: Vec<u8>,
    pub wait_for_continuation_after: bool,
}

/// Accumulates bytes for one [`Encode::encode_ctx`] call and splits them into [`Chunk`]s.
#[derive(Debug)]
pub struct EncodeContext {
    current: Vec<u8>,
    chunks: Vec<Chunk>,
    options: Options,
}

impl EncodeContext {
    fn new(options: Options) -> Self {
        Self {
            current: Vec::new(),
            chunks: Vec::new(),
            options,
        }
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    pub fn write(&mut self, bytes: &[u8]) {
        self.current.extend_from_slice(bytes);
    }

    pub fn write_str(&mut self, s: &str) {
        self.write(s.as_bytes());
    }

    pub fn write_display(&mut self, value: &impl Display) {
        self.write_str(&value.to_string());
    }

    pub fn sp(&mut self) {
        self.write(b" ");
    }

    /// Writes a plain (non-literal8) literal header and body, flushing a chunk boundary after a
    /// synchronizing header.
    pub fn write_literal(&mut self, data: &[u8], non_sync: bool) {
        self.write_literal_with_prefix(b"", data, non_sync);
    }

    /// Writes an RFC 3516 `literal8` (`~{N}`/`~{N+}`), otherwise identical to [`Self::write_literal`].
    pub fn write_literal8(&mut self, data: &[u8], non_sync: bool) {
        self.write_literal_with_prefix(b"~", data, non_sync);
    }

    fn write_literal_with_prefix(&mut self, prefix: &[u8], data: &[u8], non_sync: bool) {
        self.begin_literal_with_prefix(prefix, data.len() as u64, non_sync);
        self.write(data);
    }

    /// Writes a literal's `{N}`/`{N+}` header without its body, for a body supplied later as a
    /// stream of [`Self::write`] calls (e.g. an `APPEND` message read off a caller-provided
    /// source). Mirrors [`Self::write_literal`]'s chunk-boundary behavior.
    pub fn begin_literal(&mut self, byte_count: u64, non_sync: bool) {
        self.begin_literal_with_prefix(b"", byte_count, non_sync);
    }

    /// `literal8` (RFC 3516) counterpart to [`Self::begin_literal`].
    pub fn begin_literal8(&mut self, byte_count: u64, non_sync: bool) {
        self.begin_literal_with_prefix(b"~", byte_count, non_sync);
    }

    fn begin_literal_with_prefix(&mut self, prefix: &[u8], byte_count: u64, non_sync: bool) {
        self.write(prefix);
        if non_sync && self.options.non_synchronizing_literal_plus {
            self.write_str(&format!("{{{}+}}\r\n", byte_count));
        } else {
            self.write_str(&format!("{{{}}}\r\n", byte_count));
            self.flush_chunk(true);
        }
    }

    fn flush_chunk(&mut self, wait_for_continuation_after: bool) {
        let bytes = std::mem::take(&mut self.current);
        self.chunks.push(Chunk {
            bytes,
            wait_for_continuation_after,
        });
    }

    fn finish(mut self) -> Vec<Chunk> {
        if !self.current.is_empty() {
            self.flush_chunk(false);
        }
        self.chunks
    }
}

/// A value that knows how to render itself onto an [`EncodeContext`].
///
/// Encoding is infallible: every grammar value that reaches this trait has already been validated
/// at construction time by `imap-wire-types`.
pub trait Encode {
    fn encode_ctx(&self, ctx: &mut EncodeContext);
}

/// Encodes `value` with `options` and collects the result into [`Chunk`]s.
pub fn encode_all<T: Encode + ?Sized>(value: &T, options: &Options) -> Vec<Chunk> {
    let mut ctx = EncodeContext::new(*options);
    value.encode_ctx(&mut ctx);
    ctx.finish()
}

fn write_list<T: Encode>(items: &[T], ctx: &mut EncodeContext) {
    ctx.write(b"(");
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            ctx.sp();
        }
        item.encode_ctx(ctx);
    }
    ctx.write(b")");
}

fn write_joined<T: Encode>(items: &[T], ctx: &mut EncodeContext) {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            ctx.sp();
        }
        item.encode_ctx(ctx);
    }
}

// ----- Core string types ---------------------------------------------------------------------

impl Encode for Atom {
    fn encode_ctx(&self, ctx: &mut EncodeContext) {
        ctx.write_str(self.inner());
    }
}

impl Encode for AtomExt {
    fn encode_ctx(&self, ctx: &mut EncodeContext) {
        ctx.write_str(self.inner());
    }
}

impl Encode for Quoted {
    fn encode_ctx(&self, ctx: &mut EncodeContext) {
        ctx.write(b"\"");
        ctx.write_str(&escape_quoted(self.inner()));
        ctx.write(b"\"");
    }
}

impl Encode for Literal {
    fn encode_ctx(&self, ctx: &mut EncodeContext) {
        ctx.write_literal(self.as_bytes(), self.is_non_sync());
    }
}

impl Encode for IString {
    fn encode_ctx(&self, ctx: &mut EncodeContext) {
        match self {
            IString::Literal(l) => l.encode_ctx(ctx),
            IString::Quoted(q) => q.encode_ctx(ctx),
        }
    }
}

impl Encode for NString {
    fn encode_ctx(&self, ctx: &mut EncodeContext) {
        match &self.0 {
            Some(s) => s.encode_ctx(ctx),
            None => ctx.write(b"NIL"),
        }
    }
}

impl Encode for AString {
    fn encode_ctx(&self, ctx: &mut EncodeContext) {
        match self {
            AString::Atom(atom) => atom.encode_ctx(ctx),
            AString::String(s) => s.encode_ctx(ctx),
        }
    }
}

impl Encode for Tag {
    fn encode_ctx(&self, ctx: &mut EncodeContext) {
        ctx.write_str(self.inner());
    }
}

impl Encode for Text {
    fn encode_ctx(&self, ctx: &mut EncodeContext) {
        ctx.write_str(self.inner());
    }
}

impl Encode for Charset {
    fn encode_ctx(&self, ctx: &mut EncodeContext) {
        ctx.write_display(self);
    }
}

impl Encode for Literal8 {
    fn encode_ctx(&self, ctx: &mut EncodeContext) {
        ctx.write_literal8(self.as_bytes(), self.is_non_sync());
    }
}

impl Encode for NString8 {
    fn encode_ctx(&self, ctx: &mut EncodeContext) {
        match &self.0 {
            Some(l) => l.encode_ctx(ctx),
            None => ctx.write(b"NIL"),
        }
    }
}

impl Encode for LiteralOrLiteral8 {
    fn encode_ctx(&self, ctx: &mut EncodeContext) {
        match self {
            LiteralOrLiteral8::Literal(l) => l.encode_ctx(ctx),
            LiteralOrLiteral8::Literal8(l) => l.encode_ctx(ctx),
        }
    }
}

impl Encode for Secret<Vec<u8>> {
    fn encode_ctx(&self, ctx: &mut EncodeContext) {
        ctx.write_str(&BASE64.encode(self.declassify()));
    }
}

impl Encode for Secret<AString> {
    fn encode_ctx(&self, ctx: &mut EncodeContext) {
        self.declassify().encode_ctx(ctx);
    }
}

// ----- Dates -----------------------------------------------------------------------------------

impl Encode for Date {
    fn encode_ctx(&self, ctx: &mut EncodeContext) {
        ctx.write_display(self);
    }
}

impl Encode for InternalDate {
    fn encode_ctx(&self, ctx: &mut EncodeContext) {
        ctx.write_display(self);
    }
}

// ----- Mailbox -----------------------------------------------------------------------------------

impl Encode for Mailbox {
    fn encode_ctx(&self, ctx: &mut EncodeContext) {
        match self {
            Mailbox::Inbox => ctx.write(b"INBOX"),
            Mailbox::Other(other) => other.inner().encode_ctx(ctx),
        }
    }
}

impl Encode for ListCharString {
    fn encode_ctx(&self, ctx: &mut EncodeContext) {
        ctx.write(self.as_ref());
    }
}

impl Encode for ListMailbox {
    fn encode_ctx(&self, ctx: &mut EncodeContext) {
        match self {
            ListMailbox::Token(t) => t.encode_ctx(ctx),
            ListMailbox::String(s) => s.encode_ctx(ctx),
        }
    }
}

// ----- Flags -----------------------------------------------------------------------------------

impl Encode for Flag {
    fn encode_ctx(&self, ctx: &mut EncodeContext) {
        ctx.write_display(self);
    }
}

// ----- Auth -----------------------------------------------------------------------------------

impl Encode for AuthMechanism {
    fn encode_ctx(&self, ctx: &mut EncodeContext) {
        ctx.write_display(self);
    }
}

impl Encode for AuthenticateData {
    fn encode_ctx(&self, ctx: &mut EncodeContext) {
        match self {
            AuthenticateData::Continue(data) => {
                if data.declassify().is_empty() {
                    // RFC 4959: a zero-length response is sent as a bare pad character.
                    ctx.write(b"=");
                } else {
                    data.encode_ctx(ctx);
                }
                ctx.write(b"\r\n");
            }
            AuthenticateData::Cancel => ctx.write(b"*\r\n"),
        }
    }
}

// ----- STATUS data item names --------------------------------------------------------------------

impl Encode for StatusDataItemName {
    fn encode_ctx(&self, ctx: &mut EncodeContext) {
        ctx.write(match self {
            StatusDataItemName::Messages => b"MESSAGES".as_slice(),
            StatusDataItemName::Recent => b"RECENT",
            StatusDataItemName::UidNext => b"UIDNEXT",
            StatusDataItemName::UidValidity => b"UIDVALIDITY",
            StatusDataItemName::Unseen => b"UNSEEN",
            StatusDataItemName::Deleted => b"DELETED",
            StatusDataItemName::DeletedStorage => b"DELETED-STORAGE",
            StatusDataItemName::HighestModSeq => b"HIGHESTMODSEQ",
        });
    }
}

#[cfg(test)]
mod tests {
    use std::convert::TryInto;

    use imap_wire_types::core::Literal;

    use super::*;
    use crate::testing::known_answer_test_encode;

    #[test]
    fn test_atom_encodes_bare() {
        let atom: AString = "alice".try_into().unwrap();
        known_answer_test_encode(&atom, b"alice");
    }

    #[test]
    fn test_quoted_escapes_backslash_and_quote() {
        let s: IString = "a\\b\"c".try_into().unwrap();
        known_answer_test_encode(&s, b"\"a\\\\b\\\"c\"");
    }

    #[test]
    fn test_nstring_nil() {
        let n = NString(None);
        known_answer_test_encode(&n, b"NIL");
    }

    #[test]
    fn test_literal_produces_synchronizing_chunk_boundary() {
        let literal = Literal::new(b"abc".to_vec()).unwrap();
        let chunks = encode_all(&literal, &Options::default());
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0].bytes, b"{3}\r\n");
        assert!(chunks[0].wait_for_continuation_after);
        assert_eq!(chunks[1].bytes, b"abc");
        assert!(!chunks[1].wait_for_continuation_after);
    }

    #[test]
    fn test_non_sync_literal_stays_without_capability() {
        let literal = Literal::new_non_sync(b"abc".to_vec()).unwrap();
        let chunks = encode_all(&literal, &Options::default());
        assert_eq!(chunks.len(), 2);
        assert!(chunks[0].wait_for_continuation_after);
    }

    #[test]
    fn test_non_sync_literal_merges_with_capability() {
        let literal = Literal::new_non_sync(b"abc".to_vec()).unwrap();
        let options = Options {
            non_synchronizing_literal_plus: true,
        };
        let chunks = encode_all(&literal, &options);
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].bytes, b"{3+}\r\nabc");
        assert!(!chunks[0].wait_for_continuation_after);
    }
}
