//! Search-related types.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{
    core::{AString, Atom, NonEmptyVec},
    datetime::Date,
    sequence::SequenceSet,
};

/// The defined search keys.
///
/// IMAP's `search-key` grammar has no dedicated conjunction token: a sequence of keys inside a
/// single set of parentheses is implicitly ANDed. [`SearchKey::And`] models that directly, rather
/// than adding a separate "list of keys" variant: a single top-level key is `And(vec![key])` and
/// encodes without the wrapping parentheses being redundant.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SearchKey {
    And(NonEmptyVec<SearchKey>),

    /// Messages with message sequence numbers in the specified set.
    SequenceSet(SequenceSet),

    /// All messages in the mailbox; the default initial key for ANDing.
    All,

    /// Messages with the `\Answered` flag set.
    Answered,

    /// Messages that contain the specified string in the envelope's BCC field.
    Bcc(AString),

    /// Messages whose internal date (disregarding time and timezone) is before the given date.
    Before(Date),

    /// Messages that contain the specified string in the body of the message.
    Body(AString),

    /// Messages that contain the specified string in the envelope's CC field.
    Cc(AString),

    /// Messages with the `\Deleted` flag set.
    Deleted,

    /// Messages with the `\Draft` flag set.
    Draft,

    /// Messages with the `\Flagged` flag set.
    Flagged,

    /// Messages that contain the specified string in the envelope's FROM field.
    From(AString),

    /// Messages with a header matching `field-name` whose value contains the given string.
    ///
    /// A zero-length string matches any message with a header line of that name.
    Header(AString, AString),

    /// Messages with the specified keyword flag set.
    Keyword(Atom),

    /// Messages with an RFC 2822 size larger than the specified number of octets.
    Larger(u32),

    /// Messages with `\Recent` set but not `\Seen`. Equivalent to `(RECENT UNSEEN)`.
    New,

    /// Messages that do not match the given search key.
    Not(Box<SearchKey>),

    /// Messages without the `\Recent` flag set. Equivalent to `NOT RECENT`.
    Old,

    /// Messages whose internal date (disregarding time and timezone) is the given date.
    On(Date),

    /// Messages that match either search key.
    Or(Box<SearchKey>, Box<SearchKey>),

    /// Messages with the `\Recent` flag set.
    Recent,

    /// Messages with the `\Seen` flag set.
    Seen,

    /// Messages whose RFC 2822 `Date:` header is before the given date.
    SentBefore(Date),

    /// Messages whose RFC 2822 `Date:` header is the given date.
    SentOn(Date),

    /// Messages whose RFC 2822 `Date:` header is the given date or later.
    SentSince(Date),

    /// Messages whose internal date (disregarding time and timezone) is the given date or later.
    Since(Date),

    /// Messages with an RFC 2822 size smaller than the specified number of octets.
    Smaller(u32),

    /// Messages that contain the specified string in the envelope's SUBJECT field.
    Subject(AString),

    /// Messages that contain the specified string in the header or body of the message.
    Text(AString),

    /// Messages that contain the specified string in the envelope's TO field.
    To(AString),

    /// Messages with unique identifiers in the specified set.
    Uid(SequenceSet),

    /// Messages without the `\Answered` flag set.
    Unanswered,

    /// Messages without the `\Deleted` flag set.
    Undeleted,

    /// Messages without the `\Draft` flag set.
    Undraft,

    /// Messages without the `\Flagged` flag set.
    Unflagged,

    /// Messages without the specified keyword flag set.
    Unkeyword(Atom),

    /// Messages without the `\Seen` flag set.
    Unseen,

    /// RFC 5032: messages whose internal date is older than the given number of seconds.
    Older(u32),

    /// RFC 5032: messages whose internal date is younger than the given number of seconds.
    Younger(u32),

    /// RFC 5466: messages matching a server-side saved search filter by name.
    Filter(AString),

    /// RFC 7162: messages whose per-message modification sequence meets or exceeds `value`,
    /// optionally scoped to one metadata entry's shared/private/either annotation.
    ModSeq {
        entry: Option<(Atom, EntryTypeRequest)>,
        value: u64,
    },
}

impl SearchKey {
    pub fn uid<S>(sequence_set: S) -> Self
    where
        S: Into<SequenceSet>,
    {
        Self::Uid(sequence_set.into())
    }
}

/// RFC 7162 `entry-type-req`, scoping a MODSEQ search key to one kind of metadata annotation.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryTypeRequest {
    Priv,
    Shared,
    All,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sequence::SequenceSet;

    #[test]
    fn test_and_single_key() {
        let key = SearchKey::And(NonEmptyVec::try_from(vec![SearchKey::Seen]).unwrap());
        assert!(matches!(key, SearchKey::And(_)));
    }

    #[test]
    fn test_uid_helper() {
        let set: SequenceSet = 1u32.try_into().unwrap();
        let key = SearchKey::uid(set.clone());
        assert_eq!(key, SearchKey::Uid(set));
    }

    #[test]
    fn test_modseq_with_entry() {
        let key = SearchKey::ModSeq {
            entry: Some((Atom::try_from("shared").unwrap(), EntryTypeRequest::Shared)),
            value: 12345,
        };
        match key {
            SearchKey::ModSeq { value, .. } => assert_eq!(value, 12345),
            _ => panic!("expected ModSeq"),
        }
    }
}
