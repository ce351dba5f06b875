//! THREAD extension (RFC 5256): threading algorithms and the `Thread` response tree.

use std::{
    fmt::{Display, Formatter},
    num::NonZeroU32,
};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::core::{Atom, NonEmptyVec};

/// One thread, as returned in a `THREAD` response: a numeric prefix (the ancestor chain) followed
/// by either a single flat continuation or a branch into multiple sub-threads.
///
/// The teacher's `Vec2<Thread>` (a `>= 2` element invariant) is folded into [`NonEmptyVec`] here:
/// a thread with exactly one child is representable and simply renders as a single nested list.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Thread {
    Members {
        prefix: NonEmptyVec<NonZeroU32>,
        answers: Option<NonEmptyVec<Thread>>,
    },
    Nested {
        answers: NonEmptyVec<Thread>,
    },
}

impl Display for Thread {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        let empty_answers: Vec<Thread> = vec![];

        write!(f, "(")?;
        let mut stack = match self {
            Self::Members { prefix, answers } => {
                write_prefix(f, prefix)?;
                match answers {
                    Some(answers) => {
                        write!(f, " ")?;
                        vec![answers.as_slice().iter()]
                    }
                    None => vec![empty_answers.iter()],
                }
            }
            Self::Nested { answers } => {
                vec![answers.as_slice().iter()]
            }
        };

        while let Some(answers) = stack.last_mut() {
            if let Some(thread) = answers.next() {
                let next = match thread {
                    Self::Members { prefix, answers } => {
                        write!(f, "(")?;
                        write_prefix(f, prefix)?;
                        match answers {
                            Some(answers) => {
                                write!(f, " ")?;
                                answers.as_slice().iter()
                            }
                            None => empty_answers.iter(),
                        }
                    }
                    Self::Nested { answers } => {
                        write!(f, "(")?;
                        answers.as_slice().iter()
                    }
                };

                stack.push(next);
            } else {
                stack.pop();
                write!(f, ")")?;
            }
        }

        Ok(())
    }
}

fn write_prefix(f: &mut Formatter, prefix: &NonEmptyVec<NonZeroU32>) -> std::fmt::Result {
    let (head, tail) = prefix.as_slice().split_first().unwrap();

    write!(f, "{}", head)?;
    for element in tail {
        write!(f, " {}", element)?;
    }

    Ok(())
}

/// The `THREAD` algorithm requested by a client, as named in `search-program`.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ThreadingAlgorithm {
    OrderedSubject,
    References,
    Other(ThreadingAlgorithmOther),
}

impl From<Atom> for ThreadingAlgorithm {
    fn from(value: Atom) -> Self {
        match value.as_ref().to_lowercase().as_str() {
            "orderedsubject" => Self::OrderedSubject,
            "references" => Self::References,
            _ => Self::Other(ThreadingAlgorithmOther(value)),
        }
    }
}

impl Display for ThreadingAlgorithm {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        f.write_str(match self {
            ThreadingAlgorithm::OrderedSubject => "ORDEREDSUBJECT",
            ThreadingAlgorithm::References => "REFERENCES",
            ThreadingAlgorithm::Other(other) => other.as_ref(),
        })
    }
}

/// A threading algorithm name not recognized as one of [`ThreadingAlgorithm`]'s named variants.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ThreadingAlgorithmOther(Atom);

impl AsRef<str> for ThreadingAlgorithmOther {
    fn as_ref(&self) -> &str {
        self.0.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_threading_algorithm_from_atom() {
        assert_eq!(
            ThreadingAlgorithm::from(Atom::try_from("references").unwrap()),
            ThreadingAlgorithm::References
        );
        assert!(matches!(
            ThreadingAlgorithm::from(Atom::try_from("x-custom").unwrap()),
            ThreadingAlgorithm::Other(_)
        ));
    }

    #[test]
    fn test_thread_display_single_member_no_answers() {
        let thread = Thread::Members {
            prefix: NonEmptyVec::single(NonZeroU32::new(1).unwrap()),
            answers: None,
        };
        assert_eq!(thread.to_string(), "(1)");
    }

    #[test]
    fn test_thread_display_nested() {
        let child = Thread::Members {
            prefix: NonEmptyVec::single(NonZeroU32::new(2).unwrap()),
            answers: None,
        };
        let thread = Thread::Members {
            prefix: NonEmptyVec::single(NonZeroU32::new(1).unwrap()),
            answers: Some(NonEmptyVec::single(child)),
        };
        assert_eq!(thread.to_string(), "(1 (2))");
    }
}
