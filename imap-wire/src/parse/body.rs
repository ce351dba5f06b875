//! `body`/`body-structure` grammar.
//!
//! Recursive like the teacher's, with the same stack-depth guard, but the extension-data tail
//! (`body-ext-1part`/`body-ext-mpart`'s nested `[SP x [SP y [SP z ...]]]` chain) is flattened
//! directly into [`SinglePartExtensionData`]/[`MultiPartExtensionData`]'s plain `Option` fields
//! instead of building up the teacher's nested `Disposition`/`Language`/`Location` wrapper types.

use nom::{
    branch::alt,
    bytes::streaming::{tag, tag_no_case},
    combinator::{map, map_res, opt},
    multi::{many0, many1, separated_list0, separated_list1},
    sequence::{delimited, preceded, tuple},
    IResult,
};

use imap_wire_types::{
    body::{BasicFields, Body, BodyExtension, BodyStructure, MultiPartExtensionData, SinglePartExtensionData, SpecificFields},
    core::{IString, NString, NonEmptyVec},
};

use super::{
    core::{nil, nstring, number, sp, string},
    envelope::envelope,
};

const MAX_RECURSION: usize = 8;

/// `body = "(" (body-type-1part / body-type-mpart) ")"`
pub(crate) fn body(input: &[u8]) -> IResult<&[u8], BodyStructure> {
    body_limited(input, MAX_RECURSION)
}

fn body_limited<'a>(input: &'a [u8], remaining: usize) -> IResult<&'a [u8], BodyStructure> {
    if remaining == 0 {
        return Err(nom::Err::Error(nom::error::Error::new(input, nom::error::ErrorKind::TooLarge)));
    }

    delimited(
        tag("("),
        alt((
            move |i| body_type_1part_limited(i, remaining - 1),
            move |i| body_type_mpart_limited(i, remaining - 1),
        )),
        tag(")"),
    )(input)
}

fn body_type_1part_limited<'a>(input: &'a [u8], remaining: usize) -> IResult<&'a [u8], BodyStructure> {
    map(
        tuple((
            alt((body_type_msg_limited_fn(remaining), body_type_text, body_type_basic)),
            opt(preceded(sp, body_ext_1part)),
        )),
        |((basic, specific), extension)| BodyStructure::Single {
            body: Body { basic, specific },
            extension,
        },
    )(input)
}

fn body_type_msg_limited_fn<'a>(remaining: usize) -> impl Fn(&'a [u8]) -> IResult<&'a [u8], (BasicFields, SpecificFields)> {
    move |input| body_type_msg_limited(input, remaining)
}

fn body_type_msg_limited<'a>(input: &'a [u8], remaining: usize) -> IResult<&'a [u8], (BasicFields, SpecificFields)> {
    map(
        tuple((
            media_message,
            preceded(sp, body_fields),
            preceded(sp, envelope),
            preceded(sp, move |i| body_limited(i, remaining)),
            preceded(sp, body_fld_lines),
        )),
        |(_, basic, envelope, body_structure, number_of_lines)| {
            (
                basic,
                SpecificFields::Message {
                    envelope,
                    body_structure: Box::new(body_structure),
                    number_of_lines,
                },
            )
        },
    )(input)
}

/// `body-type-basic = media-basic SP body-fields`
pub(crate) fn body_type_basic(input: &[u8]) -> IResult<&[u8], (BasicFields, SpecificFields)> {
    map(tuple((media_basic, preceded(sp, body_fields))), |((type_, subtype), basic)| {
        (basic, SpecificFields::Basic { type_, subtype })
    })(input)
}

/// `body-type-text = media-text SP body-fields SP body-fld-lines`
pub(crate) fn body_type_text(input: &[u8]) -> IResult<&[u8], (BasicFields, SpecificFields)> {
    map(
        tuple((media_text, preceded(sp, body_fields), preceded(sp, body_fld_lines))),
        |(subtype, basic, number_of_lines)| (basic, SpecificFields::Text { subtype, number_of_lines }),
    )(input)
}

/// `body-fields = body-fld-param SP body-fld-id SP body-fld-desc SP body-fld-enc SP body-fld-octets`
pub(crate) fn body_fields(input: &[u8]) -> IResult<&[u8], BasicFields> {
    map(
        tuple((
            body_fld_param,
            preceded(sp, nstring),
            preceded(sp, nstring),
            preceded(sp, string),
            preceded(sp, body_fld_octets),
        )),
        |(parameter_list, id, description, content_transfer_encoding, size)| BasicFields {
            parameter_list,
            id,
            description,
            content_transfer_encoding,
            size,
        },
    )(input)
}

/// `body-fld-param = "(" string SP string *(SP string SP string) ")" / nil`
pub(crate) fn body_fld_param(input: &[u8]) -> IResult<&[u8], Vec<(IString, IString)>> {
    alt((
        delimited(
            tag("("),
            separated_list0(sp, map(tuple((string, preceded(sp, string))), |(key, value)| (key, value))),
            tag(")"),
        ),
        map(nil, |_| vec![]),
    ))(input)
}

/// `body-fld-octets = number`, with the same negative-number rectification quirk the teacher has
/// for Dovecot's known-broken output.
pub(crate) fn body_fld_octets(input: &[u8]) -> IResult<&[u8], u32> {
    #[cfg(not(feature = "quirk_rectify_numbers"))]
    {
        number(input)
    }
    #[cfg(feature = "quirk_rectify_numbers")]
    {
        alt((number, map(preceded(tag("-"), number), |_| {
            log::warn!("rectified a negative body-fld-octets to 0");
            0
        })))(input)
    }
}

/// `body-fld-lines = number`
pub(crate) fn body_fld_lines(input: &[u8]) -> IResult<&[u8], u32> {
    number(input)
}

/// ```text
/// body-ext-1part = body-fld-md5 [SP body-fld-dsp [SP body-fld-lang [SP body-fld-loc
///                    *(SP body-extension)]]]
/// ```
pub(crate) fn body_ext_1part(input: &[u8]) -> IResult<&[u8], SinglePartExtensionData> {
    let (input, md5) = nstring(input)?;
    let (input, disposition) = opt(preceded(sp, body_fld_dsp))(input)?;
    let (input, language) = opt(preceded(sp, body_fld_lang))(input)?;
    let (input, (location, extension)) = match opt(preceded(sp, body_fld_loc))(input)? {
        (input, Some(location)) => {
            let (input, extension) = many0(preceded(sp, |i| body_extension_limited(i, MAX_RECURSION)))(input)?;
            (input, (Some(location), extension))
        }
        (input, None) => (input, (None, vec![])),
    };

    Ok((
        input,
        SinglePartExtensionData {
            md5,
            disposition,
            language,
            location,
            extension,
        },
    ))
}

/// `body-fld-dsp = "(" string SP body-fld-param ")" / nil`
pub(crate) fn body_fld_dsp(input: &[u8]) -> IResult<&[u8], Option<(IString, Vec<(IString, IString)>)>> {
    alt((
        delimited(
            tag("("),
            map(tuple((string, preceded(sp, body_fld_param))), |(kind, params)| Some((kind, params))),
            tag(")"),
        ),
        map(nil, |_| None),
    ))(input)
}

/// `body-fld-lang = nstring / "(" string *(SP string) ")"`
pub(crate) fn body_fld_lang(input: &[u8]) -> IResult<&[u8], Vec<IString>> {
    alt((
        map(nstring, |n| n.0.into_iter().collect()),
        delimited(tag("("), separated_list1(sp, string), tag(")")),
    ))(input)
}

/// `body-fld-loc = nstring`
pub(crate) fn body_fld_loc(input: &[u8]) -> IResult<&[u8], NString> {
    nstring(input)
}

/// `body-extension = nstring / number / "(" body-extension *(SP body-extension) ")"`
fn body_extension_limited<'a>(input: &'a [u8], remaining: usize) -> IResult<&'a [u8], BodyExtension> {
    if remaining == 0 {
        return Err(nom::Err::Error(nom::error::Error::new(input, nom::error::ErrorKind::TooLarge)));
    }

    alt((
        map(nstring, BodyExtension::NString),
        map(number, BodyExtension::Number),
        map_res(
            delimited(
                tag("("),
                separated_list1(sp, move |i| body_extension_limited(i, remaining - 1)),
                tag(")"),
            ),
            |items| NonEmptyVec::try_from(items).map(BodyExtension::List),
        ),
    ))(input)
}

fn body_type_mpart_limited<'a>(input: &'a [u8], remaining: usize) -> IResult<&'a [u8], BodyStructure> {
    map_res(
        tuple((
            many1(move |i| body_limited(i, remaining)),
            preceded(sp, media_subtype),
            opt(preceded(sp, body_ext_mpart)),
        )),
        |(bodies, subtype, extension_data)| {
            NonEmptyVec::try_from(bodies).map(|bodies| BodyStructure::Multi {
                bodies,
                subtype,
                extension_data,
            })
        },
    )(input)
}

/// ```text
/// body-ext-mpart = body-fld-param [SP body-fld-dsp [SP body-fld-lang [SP body-fld-loc
///                    *(SP body-extension)]]]
/// ```
pub(crate) fn body_ext_mpart(input: &[u8]) -> IResult<&[u8], MultiPartExtensionData> {
    let (input, parameter_list) = body_fld_param(input)?;
    let (input, disposition) = opt(preceded(sp, body_fld_dsp))(input)?;
    let (input, language) = opt(preceded(sp, body_fld_lang))(input)?;
    let (input, (location, extension)) = match opt(preceded(sp, body_fld_loc))(input)? {
        (input, Some(location)) => {
            let (input, extension) = many0(preceded(sp, |i| body_extension_limited(i, MAX_RECURSION)))(input)?;
            (input, (Some(location), extension))
        }
        (input, None) => (input, (None, vec![])),
    };

    Ok((
        input,
        MultiPartExtensionData {
            parameter_list,
            disposition,
            language,
            location,
            extension,
        },
    ))
}

/// `media-basic = string SP media-subtype`
pub(crate) fn media_basic(input: &[u8]) -> IResult<&[u8], (IString, IString)> {
    tuple((string, preceded(sp, media_subtype)))(input)
}

/// `media-subtype = string`
pub(crate) fn media_subtype(input: &[u8]) -> IResult<&[u8], IString> {
    string(input)
}

/// `media-message = DQUOTE "MESSAGE" DQUOTE SP DQUOTE "RFC822" DQUOTE`
pub(crate) fn media_message(input: &[u8]) -> IResult<&[u8], &[u8]> {
    tag_no_case(b"\"MESSAGE\" \"RFC822\"")(input)
}

/// `media-text = DQUOTE "TEXT" DQUOTE SP media-subtype`
pub(crate) fn media_text(input: &[u8]) -> IResult<&[u8], IString> {
    preceded(tag_no_case(b"\"TEXT\" "), media_subtype)(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_media_basic_and_text() {
        assert!(media_basic(b"\"application\" \"xxx\"").is_ok());
        assert!(media_text(b"\"text\" \"html\"").is_ok());
        assert!(media_message(b"\"message\" \"rfc822\"").is_ok());
    }

    #[test]
    fn test_body_ext_1part_variants() {
        for test in [
            b"nil|xxx".as_ref(),
            b"\"md5\"|xxx".as_ref(),
            b"\"md5\" nil|xxx".as_ref(),
            b"\"md5\" (\"dsp\" nil)|xxx".as_ref(),
            b"\"md5\" (\"dsp\" (\"key\" \"value\")) nil|xxx".as_ref(),
            b"\"md5\" (\"dsp\" (\"key\" \"value\")) (\"german\" \"russian\") \"loc\" (1 \"2\" (nil 4))|xxx".as_ref(),
        ] {
            let (rem, _) = body_ext_1part(test).unwrap();
            assert_eq!(rem, b"|xxx");
        }
    }

    #[test]
    fn test_body_fld_octets_rectifies_negative() {
        assert_eq!(body_fld_octets(b"0)").unwrap().1, 0);
        #[cfg(feature = "quirk_rectify_numbers")]
        assert_eq!(body_fld_octets(b"-1)").unwrap().1, 0);
    }

    #[test]
    fn test_deeply_nested_multipart_body() {
        let input = b"((\"text\" \"plain\" nil nil nil \"7bit\" 0 0) \"mixed\")|xxx";
        let (rem, structure) = body(input).unwrap();
        assert_eq!(rem, b"|xxx");
        assert!(matches!(structure, BodyStructure::Multi { .. }));
    }
}
