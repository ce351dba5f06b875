//! RFC 5256 `THREAD` response grammar.

use nom::{
    branch::alt,
    bytes::streaming::tag,
    combinator::{map, opt},
    multi::{many_m_n, separated_list1},
    sequence::{delimited, preceded, tuple},
    IResult,
};

use imap_wire_types::{core::NonEmptyVec, extensions::thread::Thread};

use super::core::{nz_number, sp};

/// Caps how deeply nested a `THREAD` tree may be, guarding against a maliciously deep input
/// driving the recursive-descent parser into a stack overflow.
const MAX_THREAD_NESTING: usize = 8;

pub(crate) fn thread_list(input: &[u8]) -> IResult<&[u8], Thread> {
    thread_list_limited(input, MAX_THREAD_NESTING)
}

fn thread_list_limited<'a>(input: &'a [u8], remaining_recursion: usize) -> IResult<&'a [u8], Thread> {
    if remaining_recursion == 0 {
        return Err(nom::Err::Failure(nom::error::Error::new(input, nom::error::ErrorKind::TooLarge)));
    }

    let nested = move |input: &'a [u8]| thread_list_limited(input, remaining_recursion - 1);

    delimited(
        tag("("),
        alt((
            map(
                tuple((separated_list1(sp, nz_number), opt(preceded(sp, many_m_n(2, usize::MAX, nested))))),
                |(prefix, answers)| Thread::Members {
                    prefix: NonEmptyVec::try_from(prefix).expect("separated_list1 never returns empty"),
                    answers: answers.map(|v| NonEmptyVec::try_from(v).expect("many_m_n(2, ..) never returns empty")),
                },
            ),
            map(many_m_n(2, usize::MAX, nested), |answers| Thread::Nested {
                answers: NonEmptyVec::try_from(answers).expect("many_m_n(2, ..) never returns empty"),
            }),
        )),
        tag(")"),
    )(input)
}

#[cfg(test)]
mod tests {
    use std::num::NonZeroU32;

    use super::*;

    fn n(v: u32) -> NonZeroU32 {
        NonZeroU32::new(v).unwrap()
    }

    #[test]
    fn test_single_message_thread() {
        let (rem, thread) = thread_list(b"(1)").unwrap();
        assert!(rem.is_empty());
        assert_eq!(
            thread,
            Thread::Members {
                prefix: NonEmptyVec::from(n(1)),
                answers: None,
            }
        );
    }

    #[test]
    fn test_branching_thread() {
        let (rem, thread) = thread_list(b"(1 (2)(3))").unwrap();
        assert!(rem.is_empty());
        assert_eq!(
            thread,
            Thread::Members {
                prefix: NonEmptyVec::from(n(1)),
                answers: Some(
                    NonEmptyVec::try_from(vec![
                        Thread::Members { prefix: NonEmptyVec::from(n(2)), answers: None },
                        Thread::Members { prefix: NonEmptyVec::from(n(3)), answers: None },
                    ])
                    .unwrap()
                ),
            }
        );
    }
}
