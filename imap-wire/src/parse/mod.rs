//! Component D: turns buffered bytes into [`ResponseEvent`]s, streaming large FETCH bodies
//! instead of materializing them whole (spec.md §4).
//!
//! Every submodule keeps nom's own `IResult<&[u8], O>` error type; this module is the "driver"
//! [`super::core`] promises will convert a raw nom failure into [`crate::error::ParseError`], since
//! only here do we still have the original buffer slice and therefore a byte offset to report.

mod body;
mod core;
mod datetime;
mod envelope;
mod fetch;
mod flag;
mod mailbox;
mod response;
mod sequence;
mod status;
mod thread;

use std::num::NonZeroU32;

#[cfg(feature = "quirk_crlf_relaxed")]
use abnf_core::streaming::crlf_relaxed as crlf;
#[cfg(not(feature = "quirk_crlf_relaxed"))]
use abnf_core::streaming::crlf;
use nom::{
    branch::alt,
    bytes::streaming::{tag, tag_no_case},
    combinator::{map, opt, value},
    sequence::{delimited, tuple},
    Err as NomErr, IResult,
};

use imap_wire_types::{
    fetch::{MessageDataItem, Section},
    response::{Greeting, Response},
};

use crate::{buffer::Buffer, error::ParseError};

/// Tunable knobs for the incremental parser (spec.md §4.4.2; ambient config per SPEC_FULL.md §1).
#[derive(Debug, Clone, PartialEq)]
pub struct ParserConfig {
    /// Any `BODY[...]`/`RFC822*`/`BINARY` FETCH attribute whose declared literal size exceeds this
    /// many bytes is streamed via `FetchStreamingBegin`/`FetchStreamingBytes`/`FetchStreamingEnd`
    /// events instead of being decoded into one [`MessageDataItem`].
    pub streaming_threshold: u64,
    /// Literals larger than this are rejected with [`ParseError::LiteralTooLarge`].
    pub max_literal_size: u64,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            streaming_threshold: 8 * 1024,
            max_literal_size: 64 * 1024 * 1024,
        }
    }
}

/// Which literal-bearing FETCH attribute a `FetchStreamingBegin`/`Bytes`/`End` sub-sequence
/// belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamingAttributeKey {
    Body { section: Option<Section>, origin: Option<u32> },
    Rfc822,
    Rfc822Header,
    Rfc822Text,
    Binary { section: Vec<NonZeroU32> },
}

/// One unit of progress from [`ResponseParser::poll`].
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseEvent {
    Greeting(Greeting),
    /// Any complete, non-FETCH response, or a FETCH response small enough that none of its
    /// attributes crossed the streaming threshold.
    Response(Response),
    FetchStart { seq: NonZeroU32 },
    FetchSimpleAttribute { seq: NonZeroU32, item: MessageDataItem },
    FetchStreamingBegin {
        seq: NonZeroU32,
        key: StreamingAttributeKey,
        expected_len: u64,
    },
    FetchStreamingBytes { seq: NonZeroU32, bytes: Vec<u8> },
    FetchStreamingEnd { seq: NonZeroU32 },
    FetchEnd { seq: NonZeroU32 },
}

/// The result of one [`ResponseParser::poll`] call.
#[derive(Debug, Clone, PartialEq)]
pub enum ParseOutcome {
    Event(ResponseEvent),
    /// The buffer was exhausted before a full event could be produced; fill it and poll again.
    NeedMoreData,
}

#[derive(Debug, Clone, PartialEq)]
enum DriverState {
    Idle,
    InFetch { seq: NonZeroU32, first: bool },
    StreamingBody {
        seq: NonZeroU32,
        key: StreamingAttributeKey,
        remaining: u64,
    },
}

/// Drives [`Buffer`] through the `greeting` / `response` / streaming-FETCH grammar one event at a
/// time.
#[derive(Debug)]
pub struct ResponseParser {
    config: ParserConfig,
    state: DriverState,
    greeted: bool,
}

impl ResponseParser {
    pub fn new(config: ParserConfig) -> Self {
        Self {
            config,
            state: DriverState::Idle,
            greeted: false,
        }
    }

    /// Attempts to produce the next [`ResponseEvent`] from whatever `buffer` currently holds.
    ///
    /// Never consumes bytes it reports as unparsed: on [`ParseOutcome::NeedMoreData`] the caller
    /// should [`Buffer::fill`] and poll again; on `Err`, spec.md §4.4.3 applies — the connection
    /// must be closed, since IMAP has no in-band resynchronisation.
    pub fn poll(&mut self, buffer: &mut Buffer) -> Result<ParseOutcome, ParseError> {
        match std::mem::replace(&mut self.state, DriverState::Idle) {
            DriverState::Idle => self.poll_idle(buffer),
            DriverState::InFetch { seq, first } => self.poll_in_fetch(buffer, seq, first),
            DriverState::StreamingBody { seq, key, remaining } => self.poll_streaming(buffer, seq, key, remaining),
        }
    }

    fn poll_idle(&mut self, buffer: &mut Buffer) -> Result<ParseOutcome, ParseError> {
        let input = buffer.bytes();
        if input.is_empty() {
            return Ok(ParseOutcome::NeedMoreData);
        }

        if !self.greeted {
            return match response::greeting(input) {
                Ok((rest, greeting)) => {
                    buffer.consume(input.len() - rest.len());
                    self.greeted = true;
                    Ok(ParseOutcome::Event(ResponseEvent::Greeting(greeting)))
                }
                Err(NomErr::Incomplete(_)) => Ok(ParseOutcome::NeedMoreData),
                Err(e) => Err(classify(input, e)),
            };
        }

        if let Ok((rest, seq)) = fetch_header(input) {
            buffer.consume(input.len() - rest.len());
            self.state = DriverState::InFetch { seq, first: true };
            return Ok(ParseOutcome::Event(ResponseEvent::FetchStart { seq }));
        }

        match response::response(input) {
            Ok((rest, resp)) => {
                buffer.consume(input.len() - rest.len());
                Ok(ParseOutcome::Event(ResponseEvent::Response(resp)))
            }
            Err(NomErr::Incomplete(_)) => Ok(ParseOutcome::NeedMoreData),
            Err(e) => Err(classify(input, e)),
        }
    }

    fn poll_in_fetch(&mut self, buffer: &mut Buffer, seq: NonZeroU32, first: bool) -> Result<ParseOutcome, ParseError> {
        let input = buffer.bytes();
        if input.is_empty() {
            self.state = DriverState::InFetch { seq, first };
            return Ok(ParseOutcome::NeedMoreData);
        }

        if !first {
            if let Ok((rest, _)) = end_of_msg_att(input) {
                buffer.consume(input.len() - rest.len());
                self.state = DriverState::Idle;
                return Ok(ParseOutcome::Event(ResponseEvent::FetchEnd { seq }));
            }
        }

        let attr_input = if first {
            input
        } else {
            match core::sp(input) {
                Ok((rest, _)) => rest,
                Err(NomErr::Incomplete(_)) => {
                    self.state = DriverState::InFetch { seq, first };
                    return Ok(ParseOutcome::NeedMoreData);
                }
                Err(e) => return Err(classify(input, e)),
            }
        };

        match fetch_attr(attr_input, self.config.streaming_threshold) {
            Ok((rest, FetchAttr::Simple(item))) => {
                buffer.consume(input.len() - rest.len());
                self.state = DriverState::InFetch { seq, first: false };
                Ok(ParseOutcome::Event(ResponseEvent::FetchSimpleAttribute { seq, item }))
            }
            Ok((rest, FetchAttr::Streaming { key, declared_len })) => {
                if declared_len > self.config.max_literal_size {
                    return Err(ParseError::LiteralTooLarge {
                        declared: declared_len,
                        maximum: self.config.max_literal_size,
                    });
                }
                buffer.consume(input.len() - rest.len());
                self.state = DriverState::StreamingBody { seq, key: key.clone(), remaining: declared_len };
                Ok(ParseOutcome::Event(ResponseEvent::FetchStreamingBegin { seq, key, expected_len: declared_len }))
            }
            Err(NomErr::Incomplete(_)) => {
                self.state = DriverState::InFetch { seq, first };
                Ok(ParseOutcome::NeedMoreData)
            }
            Err(e) => Err(classify(attr_input, e)),
        }
    }

    fn poll_streaming(
        &mut self,
        buffer: &mut Buffer,
        seq: NonZeroU32,
        key: StreamingAttributeKey,
        remaining: u64,
    ) -> Result<ParseOutcome, ParseError> {
        if remaining == 0 {
            self.state = DriverState::InFetch { seq, first: false };
            return Ok(ParseOutcome::Event(ResponseEvent::FetchStreamingEnd { seq }));
        }

        let available = buffer.bytes();
        if available.is_empty() {
            self.state = DriverState::StreamingBody { seq, key, remaining };
            return Ok(ParseOutcome::NeedMoreData);
        }

        let take = std::cmp::min(available.len() as u64, remaining) as usize;
        let bytes = available[..take].to_vec();
        buffer.consume(take);
        self.state = DriverState::StreamingBody {
            seq,
            key,
            remaining: remaining - take as u64,
        };
        Ok(ParseOutcome::Event(ResponseEvent::FetchStreamingBytes { seq, bytes }))
    }
}

/// `"* " nz-number " FETCH ("`, the header of a FETCH response, checked before committing to the
/// attribute-by-attribute streaming loop.
fn fetch_header(input: &[u8]) -> IResult<&[u8], NonZeroU32> {
    map(
        tuple((tag("* "), core::nz_number, tag_no_case(" FETCH ("))),
        |(_, seq, _)| seq,
    )(input)
}

/// `")" CRLF`, the end of a `msg-att` list and its enclosing response line.
fn end_of_msg_att(input: &[u8]) -> IResult<&[u8], ()> {
    value((), tuple((tag(")"), crlf)))(input)
}

enum FetchAttr {
    Simple(MessageDataItem),
    Streaming { key: StreamingAttributeKey, declared_len: u64 },
}

/// Parses one `msg-att` element. Literal-bearing attributes (`BODY[...]`, `RFC822*`, `BINARY`)
/// whose declared length exceeds `threshold` are left with their body unconsumed so the caller can
/// stream it directly out of [`Buffer`] instead of materializing it.
fn fetch_attr(input: &[u8], threshold: u64) -> IResult<&[u8], FetchAttr> {
    if let Ok((rest, (key, declared_len))) = peek_streaming_attr(input) {
        if declared_len > threshold {
            return Ok((rest, FetchAttr::Streaming { key, declared_len }));
        }
    }

    map(alt((fetch::msg_att_dynamic, fetch::msg_att_static)), FetchAttr::Simple)(input)
}

/// Recognizes a literal-bearing attribute's name and modifiers, then peeks at `literal_header`
/// without consuming the literal body. Fails (without side effects) for `NIL`/quoted values, which
/// are small enough to let [`fetch_attr`] fall back to the ordinary whole-attribute parsers.
fn peek_streaming_attr(input: &[u8]) -> IResult<&[u8], (StreamingAttributeKey, u64)> {
    alt((
        map(
            tuple((
                tag_no_case("BODY"),
                fetch::section,
                opt(delimited(tag("<"), core::number, tag(">"))),
                core::sp,
                core::literal_header,
            )),
            |(_, section, origin, _, (len, _))| (StreamingAttributeKey::Body { section, origin }, len as u64),
        ),
        map(
            tuple((tag_no_case("RFC822.HEADER"), core::sp, core::literal_header)),
            |(_, _, (len, _))| (StreamingAttributeKey::Rfc822Header, len as u64),
        ),
        map(
            tuple((tag_no_case("RFC822.TEXT"), core::sp, core::literal_header)),
            |(_, _, (len, _))| (StreamingAttributeKey::Rfc822Text, len as u64),
        ),
        map(
            tuple((tag_no_case("RFC822"), core::sp, core::literal_header)),
            |(_, _, (len, _))| (StreamingAttributeKey::Rfc822, len as u64),
        ),
        map(
            tuple((tag_no_case("BINARY"), fetch::section_binary, core::sp, tag("~"), core::literal_header)),
            |(_, section, _, _, (len, _))| (StreamingAttributeKey::Binary { section }, len as u64),
        ),
    ))(input)
}

/// Converts a bare nom failure into our own [`ParseError`], using `outer_input` (the buffer slice
/// the failing parser was originally called with) to compute a byte offset.
///
/// Our tokenizers funnel most validation through `map_res`/`verify`, so nom's own `ErrorKind` is
/// the only signal available here beyond "some byte wasn't expected"; this is coarser than the
/// full `IntegerOverflow`/`InvalidBase64`/`InvalidUtf7`/`InvalidDate` taxonomy spec.md describes,
/// a known simplification recorded in DESIGN.md.
fn classify(outer_input: &[u8], err: NomErr<nom::error::Error<&[u8]>>) -> ParseError {
    match err {
        NomErr::Error(e) | NomErr::Failure(e) => {
            let position = outer_input.len() - e.input.len();
            match e.code {
                nom::error::ErrorKind::Digit | nom::error::ErrorKind::MapRes => ParseError::IntegerOverflow { position },
                nom::error::ErrorKind::Verify => ParseError::GrammarViolation {
                    position,
                    detail: "value failed grammar validation".to_owned(),
                },
                _ => ParseError::UnexpectedByte {
                    byte: e.input.first().copied().unwrap_or(0),
                    position,
                },
            }
        }
        NomErr::Incomplete(_) => unreachable!("callers handle Incomplete before calling classify"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_greeting_then_tagged_response() {
        let mut parser = ResponseParser::new(ParserConfig::default());
        let mut buffer = Buffer::default();
        buffer.fill(b"* OK [CAPABILITY IMAP4REV1] ready\r\n");

        match parser.poll(&mut buffer).unwrap() {
            ParseOutcome::Event(ResponseEvent::Greeting(greeting)) => {
                assert_eq!(greeting.kind, imap_wire_types::response::GreetingKind::Ok);
            }
            other => panic!("expected greeting, got {other:?}"),
        }

        buffer.fill(b"A1 OK done\r\n");
        match parser.poll(&mut buffer).unwrap() {
            ParseOutcome::Event(ResponseEvent::Response(_)) => {}
            other => panic!("expected tagged response, got {other:?}"),
        }
    }

    #[test]
    fn test_needs_more_data_mid_greeting() {
        let mut parser = ResponseParser::new(ParserConfig::default());
        let mut buffer = Buffer::default();
        buffer.fill(b"* OK hel");
        assert_eq!(parser.poll(&mut buffer).unwrap(), ParseOutcome::NeedMoreData);
    }

    #[test]
    fn test_small_fetch_body_is_not_streamed() {
        let mut parser = ResponseParser::new(ParserConfig::default());
        let mut buffer = Buffer::default();
        buffer.fill(b"* OK ready\r\n");
        parser.poll(&mut buffer).unwrap();

        buffer.fill(b"* 1 FETCH (UID 99)\r\n");
        match parser.poll(&mut buffer).unwrap() {
            ParseOutcome::Event(ResponseEvent::FetchStart { seq }) => assert_eq!(seq.get(), 1),
            other => panic!("expected FetchStart, got {other:?}"),
        }
        match parser.poll(&mut buffer).unwrap() {
            ParseOutcome::Event(ResponseEvent::FetchSimpleAttribute { item: MessageDataItem::Uid(uid), .. }) => {
                assert_eq!(uid.get(), 99);
            }
            other => panic!("expected UID attribute, got {other:?}"),
        }
        match parser.poll(&mut buffer).unwrap() {
            ParseOutcome::Event(ResponseEvent::FetchEnd { .. }) => {}
            other => panic!("expected FetchEnd, got {other:?}"),
        }
    }

    #[test]
    fn test_large_fetch_body_is_streamed() {
        let mut parser = ResponseParser::new(ParserConfig {
            streaming_threshold: 4,
            max_literal_size: 1024,
        });
        let mut buffer = Buffer::default();
        buffer.fill(b"* OK ready\r\n");
        parser.poll(&mut buffer).unwrap();

        buffer.fill(b"* 7 FETCH (BODY[TEXT] {10}\r\n0123456789)\r\n");
        assert!(matches!(parser.poll(&mut buffer).unwrap(), ParseOutcome::Event(ResponseEvent::FetchStart { .. })));

        match parser.poll(&mut buffer).unwrap() {
            ParseOutcome::Event(ResponseEvent::FetchStreamingBegin { expected_len, .. }) => assert_eq!(expected_len, 10),
            other => panic!("expected FetchStreamingBegin, got {other:?}"),
        }

        let mut collected = Vec::new();
        loop {
            match parser.poll(&mut buffer).unwrap() {
                ParseOutcome::Event(ResponseEvent::FetchStreamingBytes { bytes, .. }) => collected.extend(bytes),
                ParseOutcome::Event(ResponseEvent::FetchStreamingEnd { .. }) => break,
                other => panic!("unexpected event {other:?}"),
            }
        }
        assert_eq!(collected, b"0123456789");

        assert!(matches!(parser.poll(&mut buffer).unwrap(), ParseOutcome::Event(ResponseEvent::FetchEnd { .. })));
    }
}
