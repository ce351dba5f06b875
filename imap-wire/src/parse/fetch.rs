//! `fetch-att`/`msg-att` grammar, including the `BINARY`/`BINARY.SIZE` extension (RFC 3516) and
//! the `section`/`section-text` body-part addressing grammar.

use std::num::NonZeroU32;

use nom::{
    branch::alt,
    bytes::streaming::{tag, tag_no_case},
    combinator::{map, map_res, opt, value},
    multi::separated_list1,
    sequence::{delimited, preceded, tuple},
    IResult,
};

use imap_wire_types::{
    core::{AString, NonEmptyVec},
    extensions::binary::{Literal8, NString8},
    fetch::{MessageDataItem, MessageDataItemName, Part, Section},
};

use super::{
    body::body,
    core::{astring, literal_header, nstring, number, nz_number, sp},
    datetime::date_time,
    flag::flag_fetch_list,
};

/// `literal8 = "~{" number ["+"] "}" CRLF *OCTET` (RFC 3516/4466)
fn literal8(input: &[u8]) -> IResult<&[u8], Literal8> {
    let (remaining, (length, non_sync)) = preceded(tag("~"), literal_header)(input)?;
    let (remaining, data) = nom::bytes::streaming::take(length)(remaining)?;
    let literal8 = if non_sync {
        Literal8::new_non_sync(data.to_vec())
    } else {
        Literal8::new(data.to_vec())
    };
    Ok((remaining, literal8))
}

fn byte_range(input: &[u8]) -> IResult<&[u8], (u32, NonZeroU32)> {
    delimited(tag("<"), tuple((number, preceded(tag("."), nz_number))), tag(">"))(input)
}

/// `fetch-att`, the FETCH request's data-item *names* — needed here only because responses to a
/// macro-expanded `FETCH (FAST)`/etc. request still enumerate concrete item names in `msg-att`.
pub(crate) fn fetch_att(input: &[u8]) -> IResult<&[u8], MessageDataItemName> {
    alt((
        value(MessageDataItemName::Envelope, tag_no_case("ENVELOPE")),
        value(MessageDataItemName::Flags, tag_no_case("FLAGS")),
        value(MessageDataItemName::InternalDate, tag_no_case("INTERNALDATE")),
        value(MessageDataItemName::BodyStructure, tag_no_case("BODYSTRUCTURE")),
        map(
            tuple((tag_no_case("BODY.PEEK"), section, opt(byte_range))),
            |(_, section, partial)| MessageDataItemName::BodyExt { section, partial, peek: true },
        ),
        map(
            tuple((tag_no_case("BODY"), section, opt(byte_range))),
            |(_, section, partial)| MessageDataItemName::BodyExt { section, partial, peek: false },
        ),
        map(
            tuple((tag_no_case("BINARY.PEEK"), section_binary, opt(byte_range))),
            |(_, section, partial)| MessageDataItemName::Binary { section, partial, peek: true },
        ),
        map(
            tuple((tag_no_case("BINARY"), section_binary, opt(byte_range))),
            |(_, section, partial)| MessageDataItemName::Binary { section, partial, peek: false },
        ),
        map(preceded(tag_no_case("BINARY.SIZE"), section_binary), |section| {
            MessageDataItemName::BinarySize { section }
        }),
        value(MessageDataItemName::Body, tag_no_case("BODY")),
        value(MessageDataItemName::Uid, tag_no_case("UID")),
        value(MessageDataItemName::Rfc822Header, tag_no_case("RFC822.HEADER")),
        value(MessageDataItemName::Rfc822Size, tag_no_case("RFC822.SIZE")),
        value(MessageDataItemName::Rfc822Text, tag_no_case("RFC822.TEXT")),
        value(MessageDataItemName::Rfc822, tag_no_case("RFC822")),
    ))(input)
}

/// `msg-att = "(" (msg-att-dynamic / msg-att-static) *(SP ...) ")"`
pub(crate) fn msg_att(input: &[u8]) -> IResult<&[u8], NonEmptyVec<MessageDataItem>> {
    map_res(
        delimited(tag("("), separated_list1(sp, alt((msg_att_dynamic, msg_att_static))), tag(")")),
        NonEmptyVec::try_from,
    )(input)
}

/// `msg-att-dynamic = "FLAGS" SP "(" [flag-fetch *(SP flag-fetch)] ")"`
pub(crate) fn msg_att_dynamic(input: &[u8]) -> IResult<&[u8], MessageDataItem> {
    map(preceded(tuple((tag_no_case("FLAGS"), sp)), flag_fetch_list), MessageDataItem::Flags)(input)
}

/// `msg-att-static`, everything in a `FETCH` response except the mutable `FLAGS`.
pub(crate) fn msg_att_static(input: &[u8]) -> IResult<&[u8], MessageDataItem> {
    alt((
        map(preceded(tuple((tag_no_case("ENVELOPE"), sp)), super::envelope::envelope), MessageDataItem::Envelope),
        map(preceded(tuple((tag_no_case("INTERNALDATE"), sp)), date_time), MessageDataItem::InternalDate),
        map(preceded(tuple((tag_no_case("RFC822.HEADER"), sp)), nstring), MessageDataItem::Rfc822Header),
        map(preceded(tuple((tag_no_case("RFC822.TEXT"), sp)), nstring), MessageDataItem::Rfc822Text),
        map(preceded(tuple((tag_no_case("RFC822.SIZE"), sp)), number), MessageDataItem::Rfc822Size),
        map(preceded(tuple((tag_no_case("RFC822"), sp)), nstring), MessageDataItem::Rfc822),
        map(preceded(tuple((tag_no_case("BODYSTRUCTURE"), sp)), body), MessageDataItem::BodyStructure),
        map(
            tuple((tag_no_case("BODY"), section, opt(preceded(tag("<"), number)), preceded(tag(">"), preceded(sp, nstring)))),
            |(_, section, origin, data)| MessageDataItem::BodyExt { section, origin, data },
        ),
        map(preceded(tuple((tag_no_case("BODY"), sp)), body), MessageDataItem::Body),
        map(preceded(tuple((tag_no_case("UID"), sp)), nz_number), MessageDataItem::Uid),
        map(
            tuple((tag_no_case("BINARY"), section_binary, preceded(sp, binary_value))),
            |(_, section, value)| MessageDataItem::Binary { section, value },
        ),
        map(
            tuple((tag_no_case("BINARY.SIZE"), section_binary, preceded(sp, number))),
            |(_, section, size)| MessageDataItem::BinarySize { section, size },
        ),
    ))(input)
}

/// `nstring / literal8`, as used by `BINARY` FETCH responses. A plain quoted/literal `nstring`
/// body (rather than `NIL` or a `literal8`) is not expected in practice for binary content and is
/// not accepted here.
fn binary_value(input: &[u8]) -> IResult<&[u8], NString8> {
    alt((map(literal8, |l| NString8(Some(l))), map(super::core::nil, |_| NString8(None))))(input)
}

/// `section = "[" [section-spec] "]"`
pub(crate) fn section(input: &[u8]) -> IResult<&[u8], Option<Section>> {
    delimited(tag("["), opt(section_spec), tag("]"))(input)
}

fn section_spec(input: &[u8]) -> IResult<&[u8], Section> {
    if let Ok((rest, part)) = section_part(input) {
        if let Ok((rest, _)) = tag(".")(rest) {
            return section_text(Some(Part(part)))(rest);
        }
        return Ok((rest, Section::Part(Part(part))));
    }
    section_text(None)(input)
}

fn section_text(part: Option<Part>) -> impl FnMut(&[u8]) -> IResult<&[u8], Section> {
    move |input| {
        if let Some(part) = &part {
            if let Ok((rest, _)) = tag_no_case("MIME")(input) {
                return Ok((rest, Section::Mime(part.clone())));
            }
        }
        alt((
            map(preceded(tuple((tag_no_case("HEADER.FIELDS.NOT"), sp)), header_list), {
                let part = part.clone();
                move |names| Section::HeaderFieldsNot(part.clone(), names)
            }),
            map(preceded(tuple((tag_no_case("HEADER.FIELDS"), sp)), header_list), {
                let part = part.clone();
                move |names| Section::HeaderFields(part.clone(), names)
            }),
            value(Section::Header(part.clone()), tag_no_case("HEADER")),
            value(Section::Text(part.clone()), tag_no_case("TEXT")),
        ))(input)
    }
}

/// `section-part = nz-number *("." nz-number)`
fn section_part(input: &[u8]) -> IResult<&[u8], NonEmptyVec<NonZeroU32>> {
    map_res(separated_list1(tag("."), nz_number), NonEmptyVec::try_from)(input)
}

/// `header-list = "(" header-fld-name *(SP header-fld-name) ")"`
fn header_list(input: &[u8]) -> IResult<&[u8], NonEmptyVec<AString>> {
    map_res(delimited(tag("("), separated_list1(sp, astring), tag(")")), NonEmptyVec::try_from)(input)
}

/// `section-binary = "[" [section-part] "]"` (RFC 3516's numeric-only addressing)
pub(crate) fn section_binary(input: &[u8]) -> IResult<&[u8], Vec<NonZeroU32>> {
    delimited(
        tag("["),
        map(opt(separated_list1(tag("."), nz_number)), Option::unwrap_or_default),
        tag("]"),
    )(input)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::known_answer_test_parse;

    #[test]
    fn test_section_header() {
        known_answer_test_parse((b"[HEADER]xxx", b"xxx".as_slice(), Some(Section::Header(None))), section);
    }

    #[test]
    fn test_section_part_dot_mime() {
        let (rem, got) = section(b"[1.2.MIME]xxx").unwrap();
        assert_eq!(rem, b"xxx");
        assert!(matches!(got, Some(Section::Mime(_))));
    }

    #[test]
    fn test_section_empty() {
        known_answer_test_parse((b"[]xxx", b"xxx".as_slice(), None), section);
    }

    #[test]
    fn test_msg_att_flags() {
        let (rem, items) = msg_att(b"(FLAGS (\\Seen \\Deleted))xxx").unwrap();
        assert_eq!(rem, b"xxx");
        assert_eq!(items.as_slice().len(), 1);
    }

    #[test]
    fn test_section_binary() {
        known_answer_test_parse((b"[1.2]xxx", b"xxx".as_slice(), vec![NonZeroU32::new(1).unwrap(), NonZeroU32::new(2).unwrap()]), section_binary);
    }
}
