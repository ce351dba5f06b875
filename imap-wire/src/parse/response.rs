//! `response`/`response-data`/`resp-text`/`resp-text-code` grammar: everything the server can
//! send except the streamed FETCH body literals (those are handled by [`super::mod@super`]'s
//! driver, which intercepts `literal_header` before the body arrives).

#[cfg(not(feature = "quirk_crlf_relaxed"))]
use abnf_core::streaming::crlf;
#[cfg(feature = "quirk_crlf_relaxed")]
use abnf_core::streaming::crlf_relaxed as crlf;
use nom::{
    branch::alt,
    bytes::streaming::{tag, tag_no_case, take_till, take_while},
    combinator::{map, map_res, opt, value},
    multi::{many0, many1, separated_list1},
    sequence::{delimited, preceded, terminated, tuple},
    IResult,
};

use imap_wire_types::{
    core::{AString, NonEmptyVec, Text},
    extensions::{
        enable::CapabilityEnable,
        metadata::MetadataCode,
        quota::{QuotaGet, Resource},
    },
    response::{
        Capability, Code, CodeOther, Continue, ContinueBasic, Data, ESearchItem, Greeting,
        GreetingKind, NamespaceDescriptor, Response, Status,
    },
};

use super::{
    core::{astring, atom, charset, nil, number, number64, nz_number, quoted, quoted_char, sp, string, tag_imap, text},
    fetch::msg_att,
    flag::flag_perm_list,
    mailbox::mailbox_data,
    sequence::sequence_set,
    thread::thread_list,
};

/// `greeting = "*" SP (resp-cond-auth / resp-cond-bye) CRLF`
pub(crate) fn greeting(input: &[u8]) -> IResult<&[u8], Greeting> {
    let (input, _) = tag("* ")(input)?;
    let (input, (kind, code, text)) = alt((
        map(
            tuple((
                alt((value(GreetingKind::Ok, tag_no_case("OK ")), value(GreetingKind::PreAuth, tag_no_case("PREAUTH ")))),
                resp_text,
            )),
            |(kind, (code, text))| (kind, code, text),
        ),
        map(resp_cond_bye, |(code, text)| (GreetingKind::Bye, code, text)),
    ))(input)?;
    let (input, _) = crlf(input)?;

    Ok((input, Greeting { kind, code, text }))
}

/// `resp-cond-bye = "BYE" SP resp-text`
fn resp_cond_bye(input: &[u8]) -> IResult<&[u8], (Option<Code>, Text)> {
    preceded(tag_no_case("BYE "), resp_text)(input)
}

/// `resp-cond-state = ("OK" / "NO" / "BAD") SP resp-text`
fn resp_cond_state(input: &[u8]) -> IResult<&[u8], (bool, bool, Option<Code>, Text)> {
    alt((
        map(preceded(tag_no_case("OK "), resp_text), |(code, text)| (true, false, code, text)),
        map(preceded(tag_no_case("NO "), resp_text), |(code, text)| (false, false, code, text)),
        map(preceded(tag_no_case("BAD "), resp_text), |(code, text)| (false, true, code, text)),
    ))(input)
}

/// `resp-text = ["[" resp-text-code "]" SP] text`
fn resp_text(input: &[u8]) -> IResult<&[u8], (Option<Code>, Text)> {
    let (_, has_code) = opt(tag("["))(input)?;

    if has_code.is_some() {
        let (input, code) = delimited(
            tag("["),
            alt((
                terminated(resp_text_code, tag("]")),
                map(terminated(take_till(|b| b == b']' || b == b'\r' || b == b'\n'), tag("]")), |bytes: &[u8]| {
                    Code::Other(CodeOther::unvalidated(bytes.to_vec()))
                }),
            )),
            tag(" "),
        )(input)?;
        let (input, text) = text(input)?;
        Ok((input, (Some(code), text)))
    } else {
        map(text, |text| (None, text))(input)
    }
}

/// `resp-text-code`, everything that can appear inside `resp-text`'s `[...]`.
fn resp_text_code(input: &[u8]) -> IResult<&[u8], Code> {
    alt((
        alt((
            value(Code::Alert, tag_no_case("ALERT")),
            map(
                preceded(tag_no_case("BADCHARSET"), opt(delimited(tag(" ("), separated_list1(sp, charset), tag(")")))),
                |allowed| Code::BadCharset { allowed: allowed.unwrap_or_default() },
            ),
            map(capability_data, Code::Capability),
            value(Code::Parse, tag_no_case("PARSE")),
            map(preceded(tag_no_case("PERMANENTFLAGS "), flag_perm_list), Code::PermanentFlags),
            value(Code::ReadOnly, tag_no_case("READ-ONLY")),
            value(Code::ReadWrite, tag_no_case("READ-WRITE")),
            value(Code::TryCreate, tag_no_case("TRYCREATE")),
            map(preceded(tag_no_case("UIDNEXT "), nz_number), Code::UidNext),
            map(preceded(tag_no_case("UIDVALIDITY "), nz_number), Code::UidValidity),
            map(preceded(tag_no_case("UNSEEN "), nz_number), Code::Unseen),
        )),
        alt((
            map(referral, Code::Referral),
            value(Code::CompressionActive, tag_no_case("COMPRESSIONACTIVE")),
            value(Code::OverQuota, tag_no_case("OVERQUOTA")),
            value(Code::TooBig, tag_no_case("TOOBIG")),
            resp_code_apnd,
            resp_code_copy,
            value(Code::UidNotSticky, tag_no_case("UIDNOTSTICKY")),
            map(preceded(tag_no_case("HIGHESTMODSEQ "), number64), Code::HighestModSeq),
            map(preceded(tag_no_case("MODIFIED "), sequence_set), Code::Modified),
            value(Code::NoModSeq, tag_no_case("NOMODSEQ")),
            map(preceded(tag_no_case("METADATA "), metadata_code), Code::Metadata),
            value(Code::UseAttr, tag_no_case("USEATTR")),
        )),
    ))(input)
}

/// `"REFERRAL" SP 1*<any TEXT-CHAR except "]">` (RFC 2221), authored from the RFC grammar: the
/// teacher does not implement login/mailbox referrals.
fn referral(input: &[u8]) -> IResult<&[u8], String> {
    map_res(preceded(tag_no_case("REFERRAL "), take_while(|b: u8| b != b']' && b != b'\r' && b != b'\n')), |bytes: &[u8]| {
        std::str::from_utf8(bytes).map(str::to_owned)
    })(input)
}

/// RFC 5464 `METADATA` response code.
fn metadata_code(input: &[u8]) -> IResult<&[u8], MetadataCode> {
    alt((
        map(preceded(tag_no_case("LONGENTRIES "), number), MetadataCode::LongEntries),
        map(preceded(tag_no_case("MAXSIZE "), number), MetadataCode::MaxSize),
        value(MetadataCode::TooMany, tag_no_case("TOOMANY")),
        value(MetadataCode::NoPrivate, tag_no_case("NOPRIVATE")),
    ))(input)
}

/// RFC 4315 UIDPLUS: `"APPENDUID" SP nz-number SP uid-set` (we fold `uid-set` into `sequence-set`).
fn resp_code_apnd(input: &[u8]) -> IResult<&[u8], Code> {
    map(tuple((tag_no_case("APPENDUID "), nz_number, sp, sequence_set)), |(_, uid_validity, _, uids)| Code::AppendUid {
        uid_validity,
        uids,
    })(input)
}

/// RFC 4315 UIDPLUS: `"COPYUID" SP nz-number SP uid-set SP uid-set`.
fn resp_code_copy(input: &[u8]) -> IResult<&[u8], Code> {
    map(tuple((tag_no_case("COPYUID "), nz_number, sp, sequence_set, sp, sequence_set)), |(_, uid_validity, _, source, _, destination)| {
        Code::CopyUid { uid_validity, source, destination }
    })(input)
}

/// `capability-data = "CAPABILITY" *(SP capability) SP "IMAP4rev1" *(SP capability)`
fn capability_data(input: &[u8]) -> IResult<&[u8], NonEmptyVec<Capability>> {
    map_res(preceded(tag_no_case("CAPABILITY "), separated_list1(sp, capability)), NonEmptyVec::try_from)(input)
}

/// `capability = ("AUTH=" auth-type) / "COMPRESS=" algorithm / atom`
fn capability(input: &[u8]) -> IResult<&[u8], Capability> {
    map(atom, Capability::from)(input)
}

/// `response = *(continue-req / response-data) response-done`
///
/// Diverges from the formal grammar like the teacher does: `response-data` already covers BYE,
/// and `response-done` could equally be `response-tagged`, so a single top-level `alt` suffices.
pub(crate) fn response(input: &[u8]) -> IResult<&[u8], Response> {
    alt((
        map(continue_req, Response::Continue),
        response_data,
        map(response_done, Response::Status),
    ))(input)
}

/// `continue-req = "+" SP (resp-text / base64) CRLF`
fn continue_req(input: &[u8]) -> IResult<&[u8], Continue> {
    let (input, _) = tag("+ ")(input)?;

    enum Either {
        Base64(Vec<u8>),
        Basic((Option<Code>, Text)),
    }

    let (input, either) = alt((
        map(
            map_res(take_while(|b: u8| b != b'\r' && b != b'\n'), |bytes: &[u8]| {
                use base64::{engine::general_purpose::STANDARD, Engine};
                STANDARD.decode(bytes)
            }),
            Either::Base64,
        ),
        map(resp_text, Either::Basic),
    ))(input)?;
    let (input, _) = crlf(input)?;

    let cont = match either {
        Either::Base64(data) => Continue::base64(data),
        Either::Basic((code, text)) => match ContinueBasic::new(code, text) {
            Ok(basic) => Continue::Basic(basic),
            Err(_) => return Err(nom::Err::Error(nom::error::Error::new(input, nom::error::ErrorKind::Verify))),
        },
    };

    Ok((input, cont))
}

/// ```text
/// response-data = "*" SP (
///                    resp-cond-state / resp-cond-bye / mailbox-data / message-data /
///                    capability-data / enable-data / esearch-response / namespace-response /
///                    id-response / sort-data / thread-data
///                  ) CRLF
/// ```
fn response_data(input: &[u8]) -> IResult<&[u8], Response> {
    delimited(
        tag("* "),
        alt((
            map(resp_cond_state, |(ok, bad, code, text)| {
                Response::Status(if ok {
                    Status::Ok { tag: None, code, text }
                } else if bad {
                    Status::Bad { tag: None, code, text }
                } else {
                    Status::No { tag: None, code, text }
                })
            }),
            map(resp_cond_bye, |(code, text)| Response::Status(Status::Bye { code, text })),
            map(mailbox_data, Response::Data),
            map(message_data, Response::Data),
            map(capability_data, |caps| Response::Data(Data::Capability(caps))),
            map(enable_data, Response::Data),
            esearch_response,
            namespace_response,
            map(id_response, Response::Data),
            quota_response,
            quotaroot_response,
            sort_response,
            thread_response,
        )),
        crlf,
    )(input)
}

/// RFC 5256 `sort-data = "SORT" *(SP nz-number)`
fn sort_response(input: &[u8]) -> IResult<&[u8], Response> {
    map(preceded(tag_no_case("SORT"), many0(preceded(sp, nz_number))), |nums| Response::Data(Data::Sort(nums)))(input)
}

/// RFC 5256 `thread-data = "THREAD" [SP 1*thread-list]`
fn thread_response(input: &[u8]) -> IResult<&[u8], Response> {
    map(preceded(tag_no_case("THREAD"), opt(preceded(sp, many1(thread_list)))), |threads| {
        Response::Data(Data::Thread(threads.unwrap_or_default()))
    })(input)
}

/// `message-data = nz-number SP ("EXPUNGE" / ("FETCH" SP msg-att))`
fn message_data(input: &[u8]) -> IResult<&[u8], Data> {
    let (input, seq) = terminated(nz_number, sp)(input)?;

    alt((value(Data::Expunge(seq), tag_no_case("EXPUNGE")), map(preceded(tag_no_case("FETCH "), msg_att), move |items| Data::Fetch { seq, items })))(
        input,
    )
}

/// `enable-data = "ENABLED" *(SP capability)`
///
/// Unlike the teacher, which reuses its `capability` (i.e. `Capability`) parser here, this parses
/// straight into [`imap_wire_types::extensions::enable::CapabilityEnable`] via its own
/// `From<Atom>`, since `Data::Enabled` is typed against that capability set, not `Capability`.
fn enable_data(input: &[u8]) -> IResult<&[u8], Data> {
    map(preceded(tag_no_case("ENABLED"), many0(preceded(sp, map(atom, CapabilityEnable::from)))), |capabilities| {
        Data::Enabled { capabilities }
    })(input)
}

/// RFC 4731/5267 `esearch-response = "ESEARCH" [search-correlator] [SP "UID"] *(SP search-return-data)`.
///
/// Authored from the RFC grammar directly: neither the teacher nor the rest of the pack
/// implements ESEARCH.
fn esearch_response(input: &[u8]) -> IResult<&[u8], Response> {
    let (input, _) = tag_no_case("ESEARCH")(input)?;
    let (input, correlator) = opt(delimited(tag(" (TAG "), quoted, tag(")")))(input)?;
    let (input, uid) = map(opt(preceded(tag(" "), tag_no_case("UID"))), |m| m.is_some())(input)?;
    let (input, items) = many0(preceded(sp, search_return_data))(input)?;

    let tag = correlator.and_then(|quoted| imap_wire_types::core::Tag::try_from(quoted.inner()).ok());

    Ok((input, Response::Data(Data::ESearch { tag, uid, items })))
}

fn search_return_data(input: &[u8]) -> IResult<&[u8], ESearchItem> {
    alt((
        map(preceded(tag_no_case("MIN "), nz_number), ESearchItem::Min),
        map(preceded(tag_no_case("MAX "), nz_number), ESearchItem::Max),
        map(preceded(tag_no_case("ALL "), sequence_set), ESearchItem::All),
        map(preceded(tag_no_case("COUNT "), number), ESearchItem::Count),
        map(preceded(tag_no_case("MODSEQ "), number64), ESearchItem::ModSeq),
    ))(input)
}

/// RFC 2342 `Namespace-Response = "NAMESPACE" SP Namespace SP Namespace SP Namespace`.
fn namespace_response(input: &[u8]) -> IResult<&[u8], Response> {
    let (input, (_, personal, _, other_users, _, shared)) =
        tuple((tag_no_case("NAMESPACE "), namespaces, tag(" "), namespaces, tag(" "), namespaces))(input)?;

    Ok((input, Response::Data(Data::Namespace { personal, other_users, shared })))
}

fn namespaces(input: &[u8]) -> IResult<&[u8], Vec<NamespaceDescriptor>> {
    alt((delimited(tag("("), nom::multi::many1(namespace_descriptor), tag(")")), map(nil, |_| Vec::new())))(input)
}

/// `Namespace = "(" string SP (DQUOTE QUOTED-CHAR DQUOTE / nil) *(Namespace-Response-Extension) ")"`
///
/// Namespace-response-extension parameters are consumed but not kept: [`NamespaceDescriptor`]
/// only models prefix and delimiter.
fn namespace_descriptor(input: &[u8]) -> IResult<&[u8], NamespaceDescriptor> {
    let (input, _) = tag("(")(input)?;
    let (input, prefix) = string(input)?;
    let (input, _) = sp(input)?;
    let (input, delimiter) = alt((map(delimited(tag("\""), quoted_char, tag("\"")), Some), value(None, nil)))(input)?;
    let (input, _) = many0(namespace_response_extension)(input)?;
    let (input, _) = tag(")")(input)?;

    Ok((input, NamespaceDescriptor { prefix, delimiter }))
}

fn namespace_response_extension(input: &[u8]) -> IResult<&[u8], (AString, Vec<AString>)> {
    preceded(tag(" "), tuple((astring, preceded(tag(" "), delimited(tag("("), separated_list1(sp, astring), tag(")"))))))(input)
}

/// RFC 2971 `id-response = "ID" SP id-params-list`.
fn id_response(input: &[u8]) -> IResult<&[u8], Data> {
    preceded(tag_no_case("ID "), map(id_params_list, Data::Id))(input)
}

#[allow(clippy::type_complexity)]
fn id_params_list(input: &[u8]) -> IResult<&[u8], Option<Vec<(imap_wire_types::core::IString, imap_wire_types::core::NString)>>> {
    alt((
        map(delimited(tag("("), nom::multi::separated_list0(sp, nom::sequence::separated_pair(string, sp, super::core::nstring)), tag(")")), Some),
        value(None, nil),
    ))(input)
}

/// RFC 9208 `quota-response = "QUOTA" SP quota-root-name SP "(" 1*quota-resource ")"`.
fn quota_response(input: &[u8]) -> IResult<&[u8], Response> {
    map_res(
        tuple((tag_no_case("QUOTA "), astring, delimited(tag(" ("), separated_list1(sp, quota_resource), tag(")")))),
        |(_, root, quotas)| -> Result<Response, imap_wire_types::core::NonEmptyVecError> {
            Ok(Response::Data(Data::Quota { root, quotas: NonEmptyVec::try_from(quotas)? }))
        },
    )(input)
}

fn quota_resource(input: &[u8]) -> IResult<&[u8], QuotaGet> {
    map(tuple((resource_name, sp, number64, sp, number64)), |(resource, _, usage, _, limit)| QuotaGet { resource, usage, limit })(input)
}

fn resource_name(input: &[u8]) -> IResult<&[u8], Resource> {
    map(atom, Resource::from)(input)
}

/// RFC 9208 `quotaroot-response = "QUOTAROOT" SP mailbox *(SP quota-root-name)`.
fn quotaroot_response(input: &[u8]) -> IResult<&[u8], Response> {
    map(tuple((tag_no_case("QUOTAROOT "), super::mailbox::mailbox, many0(preceded(sp, astring)))), |(_, mailbox, roots)| {
        Response::Data(Data::QuotaRoot { mailbox, roots })
    })(input)
}

/// `response-done = response-tagged / response-fatal`
fn response_done(input: &[u8]) -> IResult<&[u8], Status> {
    alt((response_tagged, response_fatal))(input)
}

/// `response-tagged = tag SP resp-cond-state CRLF`
fn response_tagged(input: &[u8]) -> IResult<&[u8], Status> {
    let (input, (tag, _, (ok, bad, code, text), _)) = tuple((tag_imap, sp, resp_cond_state, crlf))(input)?;

    Ok((
        input,
        if ok {
            Status::Ok { tag: Some(tag), code, text }
        } else if bad {
            Status::Bad { tag: Some(tag), code, text }
        } else {
            Status::No { tag: Some(tag), code, text }
        },
    ))
}

/// `response-fatal = "*" SP resp-cond-bye CRLF`
fn response_fatal(input: &[u8]) -> IResult<&[u8], Status> {
    map(delimited(tag("* "), resp_cond_bye, crlf), |(code, text)| Status::Bye { code, text })(input)
}

#[cfg(test)]
mod tests {
    use std::num::NonZeroU32;

    use imap_wire_types::core::Tag;

    use super::*;
    use crate::testing::known_answer_test_parse;

    #[test]
    fn test_greeting_ok_with_code() {
        let (rem, got) = greeting(b"* OK [ALERT] hello\r\n").unwrap();
        assert_eq!(rem, b"");
        assert_eq!(got.kind, GreetingKind::Ok);
        assert_eq!(got.code, Some(Code::Alert));
    }

    #[test]
    fn test_greeting_preauth() {
        let (rem, got) = greeting(b"* PREAUTH [ALERT] hello\r\n").unwrap();
        assert_eq!(rem, b"");
        assert_eq!(got.kind, GreetingKind::PreAuth);
    }

    #[test]
    fn test_response_tagged_ok() {
        let (rem, got) = response(b"A1 OK [ALERT] hello\r\n").unwrap();
        assert_eq!(rem, b"");
        match got {
            Response::Status(Status::Ok { tag, code, .. }) => {
                assert_eq!(tag, Some(Tag::try_from("A1").unwrap()));
                assert_eq!(code, Some(Code::Alert));
            }
            _ => panic!("expected tagged OK"),
        }
    }

    #[test]
    fn test_response_data_capability() {
        known_answer_test_parse(
            (
                b"* CAPABILITY IMAP4REV1\r\n".as_slice(),
                b"".as_slice(),
                Response::Data(Data::Capability(NonEmptyVec::try_from(vec![Capability::Imap4Rev1]).unwrap())),
            ),
            response,
        );
    }

    #[test]
    fn test_response_data_exists() {
        known_answer_test_parse((b"* 42 EXISTS\r\n".as_slice(), b"".as_slice(), Response::Data(Data::Exists(42))), response);
    }

    #[test]
    fn test_response_data_expunge() {
        known_answer_test_parse(
            (b"* 123 EXPUNGE\r\n".as_slice(), b"".as_slice(), Response::Data(Data::Expunge(NonZeroU32::new(123).unwrap()))),
            response,
        );
    }

    #[test]
    fn test_response_bye() {
        let (rem, got) = response(b"* BYE [ALERT] hello\r\n").unwrap();
        assert_eq!(rem, b"");
        assert!(matches!(got, Response::Status(Status::Bye { .. })));
    }

    #[test]
    fn test_continue_req_basic() {
        let (rem, got) = response(b"+ [READ-WRITE] hello\r\n").unwrap();
        assert_eq!(rem, b"");
        assert!(matches!(got, Response::Continue(Continue::Basic(_))));
    }

    #[test]
    fn test_response_data_status() {
        let (rem, got) = response(b"* STATUS INBOX (MESSAGES 100 UNSEEN 0)\r\n").unwrap();
        assert_eq!(rem, b"");
        assert!(matches!(got, Response::Data(Data::Status { .. })));
    }

    #[test]
    fn test_response_data_sort() {
        let (rem, got) = response(b"* SORT 2 3 4\r\n").unwrap();
        assert_eq!(rem, b"");
        assert_eq!(
            got,
            Response::Data(Data::Sort(vec![NonZeroU32::new(2).unwrap(), NonZeroU32::new(3).unwrap(), NonZeroU32::new(4).unwrap()]))
        );
    }

    #[test]
    fn test_response_data_thread() {
        let (rem, got) = response(b"* THREAD (1)(2 3)\r\n").unwrap();
        assert_eq!(rem, b"");
        assert!(matches!(got, Response::Data(Data::Thread(threads)) if threads.len() == 2));
    }

    #[test]
    fn test_response_data_thread_empty() {
        let (rem, got) = response(b"* THREAD\r\n").unwrap();
        assert_eq!(rem, b"");
        assert_eq!(got, Response::Data(Data::Thread(Vec::new())));
    }

    #[test]
    fn test_append_uid_code() {
        let (rem, code) = resp_text_code(b"APPENDUID 42 7xxx").unwrap();
        assert_eq!(rem, b"xxx");
        match code {
            Code::AppendUid { uid_validity, .. } => assert_eq!(uid_validity, NonZeroU32::new(42).unwrap()),
            _ => panic!("expected AppendUid"),
        }
    }
}
