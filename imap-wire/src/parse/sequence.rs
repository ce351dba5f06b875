//! `sequence-set` grammar.
//!
//! [`imap_wire_types::sequence::SequenceSet`] already implements `FromStr` against its own
//! grammar (splitting on `,` then `:`), so this module's only job is to find the extent of a
//! `sequence-set` token in the byte stream and hand the substring to that `FromStr` impl.

use std::str::from_utf8;

use nom::{bytes::streaming::take_while1, combinator::map_res, IResult};

use imap_wire_types::sequence::SequenceSet;

fn is_sequence_set_char(b: u8) -> bool {
    b.is_ascii_digit() || b == b'*' || b == b':' || b == b','
}

/// `sequence-set = (seq-number / seq-range) *("," (seq-number / seq-range))`
pub(crate) fn sequence_set(input: &[u8]) -> IResult<&[u8], SequenceSet> {
    map_res(take_while1(is_sequence_set_char), |bytes: &[u8]| {
        from_utf8(bytes).map_err(|_| ()).and_then(|s| s.parse::<SequenceSet>().map_err(|_| ()))
    })(input)
}

#[cfg(test)]
mod tests {
    use std::convert::TryInto;

    use super::*;
    use crate::testing::known_answer_test_parse;

    #[test]
    fn test_single_number() {
        known_answer_test_parse((b"42 ", b" ".as_slice(), "42".try_into().unwrap()), sequence_set);
    }

    #[test]
    fn test_range_and_list() {
        known_answer_test_parse((b"1:3,7,9:* ", b" ".as_slice(), "1:3,7,9:*".try_into().unwrap()), sequence_set);
    }
}
