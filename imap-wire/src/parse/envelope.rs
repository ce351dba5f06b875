//! `envelope`/`address` grammar.

use nom::{
    branch::alt,
    bytes::streaming::tag,
    combinator::map,
    multi::many1,
    sequence::{delimited, preceded, tuple},
    IResult,
};

use imap_wire_types::envelope::{Address, Envelope};

use super::core::{nil, nstring, sp};

/// `"(" 1*address ")" / nil`
fn address_list(input: &[u8]) -> IResult<&[u8], Vec<Address>> {
    alt((
        delimited(tag("("), many1(address), tag(")")),
        map(nil, |_| Vec::new()),
    ))(input)
}

/// `address = "(" addr-name SP addr-adl SP addr-mailbox SP addr-host ")"`
fn address(input: &[u8]) -> IResult<&[u8], Address> {
    map(
        delimited(
            tag("("),
            tuple((nstring, preceded(sp, nstring), preceded(sp, nstring), preceded(sp, nstring))),
            tag(")"),
        ),
        |(name, adl, mailbox, host)| Address { name, adl, mailbox, host },
    )(input)
}

/// ```text
/// envelope = "(" env-date SP env-subject SP env-from SP env-sender SP env-reply-to SP env-to SP
///                env-cc SP env-bcc SP env-in-reply-to SP env-message-id ")"
/// ```
pub(crate) fn envelope(input: &[u8]) -> IResult<&[u8], Envelope> {
    map(
        delimited(
            tag("("),
            tuple((
                nstring,
                preceded(sp, nstring),
                preceded(sp, address_list),
                preceded(sp, address_list),
                preceded(sp, address_list),
                preceded(sp, address_list),
                preceded(sp, address_list),
                preceded(sp, address_list),
                preceded(sp, nstring),
                preceded(sp, nstring),
            )),
            tag(")"),
        ),
        |(date, subject, from, sender, reply_to, to, cc, bcc, in_reply_to, message_id)| Envelope {
            date,
            subject,
            from,
            sender,
            reply_to,
            to,
            cc,
            bcc,
            in_reply_to,
            message_id,
        },
    )(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_address() {
        let (rem, val) = address(b"(nil {3}\r\nxxx \"xxx\" nil)").unwrap();
        assert_eq!(rem, b"");
        assert_eq!(val.name, imap_wire_types::core::NString(None));
        assert_eq!(val.host, imap_wire_types::core::NString(None));
    }

    #[test]
    fn test_envelope_with_nil_fields() {
        let input = b"(nil nil nil nil nil nil nil nil nil nil)xxx";
        let (rem, env) = envelope(input).unwrap();
        assert_eq!(rem, b"xxx");
        assert_eq!(env.date, imap_wire_types::core::NString(None));
        assert!(env.from.is_empty());
    }
}
