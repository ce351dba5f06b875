//! `mailbox`/`mailbox-data` grammar (list/lsub/status responses only — mailbox *naming*, i.e.
//! modified UTF-7 decoding of [`imap_wire_types::mailbox::MailboxName`], is a higher-level concern
//! this module does not need: responses hand back an [`AString`]-backed [`Mailbox`] as-is).

use abnf_core::streaming::dquote;
use nom::{
    branch::alt,
    bytes::streaming::{tag, tag_no_case},
    combinator::{map, opt, value},
    multi::many0,
    sequence::{delimited, preceded, terminated, tuple},
    IResult,
};

use imap_wire_types::{core::QuotedChar, response::Data};

use super::{
    core::{astring, nil, number, nz_number, quoted_char, sp},
    flag::{flag_list, mbx_list_flags},
    status::status_att_list,
};
use imap_wire_types::mailbox::Mailbox;

/// `mailbox = "INBOX" / astring`
pub(crate) fn mailbox(input: &[u8]) -> IResult<&[u8], Mailbox> {
    map(astring, Mailbox::from)(input)
}

/// `mailbox-list = "(" [mbx-list-flags] ")" SP (DQUOTE QUOTED-CHAR DQUOTE / nil) SP mailbox`
#[allow(clippy::type_complexity)]
fn mailbox_list(input: &[u8]) -> IResult<&[u8], (Vec<imap_wire_types::flag::FlagNameAttribute>, Option<QuotedChar>, Mailbox)> {
    let (input, flags) = delimited(tag("("), map(opt(mbx_list_flags), Option::unwrap_or_default), tag(")"))(input)?;
    let (input, _) = sp(input)?;
    let (input, delimiter) = alt((map(delimited(dquote, quoted_char, dquote), Some), value(None, nil)))(input)?;
    let (input, _) = sp(input)?;
    let (input, mailbox) = mailbox(input)?;
    Ok((input, (flags, delimiter, mailbox)))
}

/// ```text
/// mailbox-data = "FLAGS" SP flag-list /
///                "LIST" SP mailbox-list /
///                "LSUB" SP mailbox-list /
///                "SEARCH" *(SP nz-number) /
///                "STATUS" SP mailbox SP "(" [status-att-list] ")" /
///                number SP "EXISTS" /
///                number SP "RECENT"
/// ```
pub(crate) fn mailbox_data(input: &[u8]) -> IResult<&[u8], Data> {
    alt((
        map(tuple((tag_no_case("FLAGS"), sp, flag_list)), |(_, _, flags)| Data::Flags(flags)),
        map(tuple((tag_no_case("LIST"), sp, mailbox_list)), |(_, _, (items, delimiter, mailbox))| Data::List {
            items,
            delimiter,
            mailbox,
        }),
        map(tuple((tag_no_case("LSUB"), sp, mailbox_list)), |(_, _, (items, delimiter, mailbox))| Data::Lsub {
            items,
            delimiter,
            mailbox,
        }),
        map(tuple((tag_no_case("SEARCH"), many0(preceded(sp, nz_number)))), |(_, nums)| Data::Search(nums)),
        map(
            tuple((tag_no_case("STATUS"), sp, mailbox, sp, status_att_list)),
            |(_, _, mailbox, _, items)| Data::Status { mailbox, items },
        ),
        map(terminated(number, tag_no_case(" EXISTS")), Data::Exists),
        map(terminated(number, tag_no_case(" RECENT")), Data::Recent),
    ))(input)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::known_answer_test_parse;

    #[test]
    fn test_mailbox_inbox_is_case_insensitive() {
        known_answer_test_parse((b"inbox ", b" ".as_slice(), Mailbox::Inbox), mailbox);
    }

    #[test]
    fn test_mailbox_other() {
        let (rem, got) = mailbox(b"Archive ").unwrap();
        assert_eq!(rem, b" ");
        assert_ne!(got, Mailbox::Inbox);
    }

    #[test]
    fn test_mailbox_data_exists() {
        known_answer_test_parse((b"42 EXISTS\r\n", b"\r\n".as_slice(), Data::Exists(42)), mailbox_data);
    }

    #[test]
    fn test_mailbox_data_list() {
        let (rem, data) = mailbox_data(b"LIST (\\Noselect) \"/\" bbb\r\n").unwrap();
        assert_eq!(rem, b"\r\n");
        assert!(matches!(data, Data::List { .. }));
    }

    #[test]
    fn test_mailbox_data_search() {
        known_answer_test_parse(
            (
                b"SEARCH 1 2 3 42\r\n",
                b"\r\n".as_slice(),
                Data::Search(vec![
                    std::num::NonZeroU32::new(1).unwrap(),
                    std::num::NonZeroU32::new(2).unwrap(),
                    std::num::NonZeroU32::new(3).unwrap(),
                    std::num::NonZeroU32::new(42).unwrap(),
                ]),
            ),
            mailbox_data,
        );
    }
}
