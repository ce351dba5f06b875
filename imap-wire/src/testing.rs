//! Small helpers shared by the `#[cfg(test)]` modules scattered across this crate.

use std::fmt::Debug;

use nom::IResult;

use crate::encode::{Chunk, Encode, Options};

/// Runs a single-value `nom` parser over `test` and asserts both the decoded value and the
/// leftover remainder.
pub fn known_answer_test_parse<'a, O, P>(
    (test, expected_remainder, expected_object): (&'a [u8], &'a [u8], O),
    parser: P,
) where
    O: Debug + Eq + 'a,
    P: Fn(&'a [u8]) -> IResult<&'a [u8], O>,
{
    let (got_remainder, got_object) = parser(test).unwrap();
    assert_eq!(expected_remainder, got_remainder);
    assert_eq!(expected_object, got_object);
}

/// Encodes `value` with default options and asserts the concatenated chunk bytes equal `expected`.
pub fn known_answer_test_encode<T: Encode>(value: &T, expected: &[u8]) {
    let chunks = crate::encode::encode_all(value, &Options::default());
    let got: Vec<u8> = chunks.into_iter().flat_map(|Chunk { bytes, .. }| bytes).collect();
    assert_eq!(got, expected);
}
