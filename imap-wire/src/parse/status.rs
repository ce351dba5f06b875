//! `status-att-list` grammar (the untagged `STATUS` response's body).

use nom::{
    branch::alt,
    bytes::streaming::{tag, tag_no_case},
    combinator::map,
    multi::separated_list0,
    sequence::{delimited, preceded},
    IResult,
};

use imap_wire_types::status::StatusDataItem;

use super::core::{number, number64, nz_number, sp};

fn status_att(input: &[u8]) -> IResult<&[u8], StatusDataItem> {
    alt((
        map(preceded(tag_no_case("MESSAGES"), preceded(sp, number)), StatusDataItem::Messages),
        map(preceded(tag_no_case("UIDNEXT"), preceded(sp, nz_number)), StatusDataItem::UidNext),
        map(preceded(tag_no_case("UIDVALIDITY"), preceded(sp, nz_number)), StatusDataItem::UidValidity),
        map(preceded(tag_no_case("UNSEEN"), preceded(sp, number)), StatusDataItem::Unseen),
        map(preceded(tag_no_case("DELETED-STORAGE"), preceded(sp, number64)), StatusDataItem::DeletedStorage),
        map(preceded(tag_no_case("DELETED"), preceded(sp, number)), StatusDataItem::Deleted),
        map(preceded(tag_no_case("HIGHESTMODSEQ"), preceded(sp, number64)), StatusDataItem::HighestModSeq),
        map(preceded(tag_no_case("RECENT"), preceded(sp, number)), StatusDataItem::Recent),
    ))(input)
}

/// `"(" [status-att-list] ")"`
pub(crate) fn status_att_list(input: &[u8]) -> IResult<&[u8], Vec<StatusDataItem>> {
    delimited(tag("("), separated_list0(sp, status_att), tag(")"))(input)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::known_answer_test_parse;

    #[test]
    fn test_status_att_list() {
        known_answer_test_parse(
            (
                b"(MESSAGES 231 UIDNEXT 44292)xxx",
                b"xxx".as_slice(),
                vec![
                    StatusDataItem::Messages(231),
                    StatusDataItem::UidNext(std::num::NonZeroU32::new(44292).unwrap()),
                ],
            ),
            status_att_list,
        );
    }

    #[test]
    fn test_deleted_storage_before_deleted_prefix_match() {
        known_answer_test_parse((b"DELETED-STORAGE 9xxx", b"xxx".as_slice(), StatusDataItem::DeletedStorage(9)), status_att);
    }
}
