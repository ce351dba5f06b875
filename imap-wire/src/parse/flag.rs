//! `flag`/`flag-fetch`/`flag-perm`/`flag-list` grammar.

use nom::{
    branch::alt,
    bytes::streaming::tag,
    combinator::{map, value},
    multi::{separated_list0, separated_list1},
    sequence::{delimited, preceded},
    IResult,
};

use imap_wire_types::flag::{Flag, FlagFetch, FlagNameAttribute, FlagPerm};

use super::core::{atom, sp};

/// `flag = "\Answered" / "\Flagged" / "\Deleted" / "\Seen" / "\Draft" / flag-keyword / flag-extension`
pub(crate) fn flag(input: &[u8]) -> IResult<&[u8], Flag> {
    alt((
        map(preceded(tag("\\"), atom), Flag::system),
        map(atom, Flag::keyword),
    ))(input)
}

/// `flag-fetch = flag / "\Recent"`
pub(crate) fn flag_fetch(input: &[u8]) -> IResult<&[u8], FlagFetch> {
    alt((
        value(FlagFetch::Recent, tag("\\Recent")),
        map(flag, FlagFetch::from),
    ))(input)
}

/// `flag-perm = flag / "\*"`
pub(crate) fn flag_perm(input: &[u8]) -> IResult<&[u8], FlagPerm> {
    alt((value(FlagPerm::Asterisk, tag("\\*")), map(flag, FlagPerm::from)))(input)
}

/// `flag-list = "(" [flag *(SP flag)] ")"`
pub(crate) fn flag_list(input: &[u8]) -> IResult<&[u8], Vec<Flag>> {
    delimited(tag("("), separated_list0(tag(" "), flag), tag(")"))(input)
}

/// `"(" [flag-fetch *(SP flag-fetch)] ")"`, as seen in `FETCH (FLAGS (...))`.
pub(crate) fn flag_fetch_list(input: &[u8]) -> IResult<&[u8], Vec<FlagFetch>> {
    delimited(tag("("), separated_list0(tag(" "), flag_fetch), tag(")"))(input)
}

/// `"(" [flag-perm *(SP flag-perm)] ")"`, as seen in the `PERMANENTFLAGS` response code.
pub(crate) fn flag_perm_list(input: &[u8]) -> IResult<&[u8], Vec<FlagPerm>> {
    delimited(tag("("), separated_list0(tag(" "), flag_perm), tag(")"))(input)
}

/// `mbx-list-flags`, the `\Noinferiors`/`\Noselect`/`\Marked`/`\Unmarked`/extension flags inside a
/// LIST/LSUB response's `"(" ... ")"` prefix.
pub(crate) fn mbx_list_flags(input: &[u8]) -> IResult<&[u8], Vec<FlagNameAttribute>> {
    separated_list1(sp, map(preceded(tag("\\"), atom), FlagNameAttribute::from))(input)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::known_answer_test_parse;

    #[test]
    fn test_flag_system() {
        known_answer_test_parse((b"\\Seen ", b" ".as_slice(), Flag::Seen), flag);
    }

    #[test]
    fn test_flag_keyword() {
        known_answer_test_parse((b"$Forwarded ", b" ".as_slice(), Flag::keyword("$Forwarded".try_into().unwrap())), flag);
    }

    #[test]
    fn test_flag_list() {
        let (rem, got) = flag_list(b"(\\Seen \\Deleted)xxx").unwrap();
        assert_eq!(rem, b"xxx");
        assert_eq!(got, vec![Flag::Seen, Flag::Deleted]);
    }

    #[test]
    fn test_flag_perm_asterisk() {
        known_answer_test_parse((b"\\*xxx", b"xxx".as_slice(), FlagPerm::Asterisk), flag_perm);
    }
}
