//! Fetch-related types.

use std::{
    fmt::{Display, Formatter},
    num::NonZeroU32,
};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{
    body::BodyStructure,
    core::{AString, NString, NonEmptyVec},
    datetime::InternalDate,
    envelope::Envelope,
    extensions::binary::NString8,
    flag::FlagFetch,
};

/// Shorthands for commonly used sets of message data items.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Macro {
    /// `(FLAGS INTERNALDATE RFC822.SIZE)`
    Fast,
    /// `(FLAGS INTERNALDATE RFC822.SIZE ENVELOPE)`
    All,
    /// `(FLAGS INTERNALDATE RFC822.SIZE ENVELOPE BODY)`
    Full,
}

impl Macro {
    pub fn expand(&self) -> Vec<MessageDataItemName> {
        use MessageDataItemName::*;

        match self {
            Self::All => vec![Flags, InternalDate, Rfc822Size, Envelope],
            Self::Fast => vec![Flags, InternalDate, Rfc822Size],
            Self::Full => vec![Flags, InternalDate, Rfc822Size, Envelope, Body],
        }
    }
}

impl Display for Macro {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Macro::All => "ALL",
            Macro::Fast => "FAST",
            Macro::Full => "FULL",
        })
    }
}

/// Either a macro or an explicit list of message data items.
///
/// A macro must be used by itself, never mixed with other macros or data items.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum MacroOrMessageDataItemNames {
    Macro(Macro),
    MessageDataItemNames(Vec<MessageDataItemName>),
}

impl From<Macro> for MacroOrMessageDataItemNames {
    fn from(m: Macro) -> Self {
        MacroOrMessageDataItemNames::Macro(m)
    }
}

impl From<Vec<MessageDataItemName>> for MacroOrMessageDataItemNames {
    fn from(item_names: Vec<MessageDataItemName>) -> Self {
        MacroOrMessageDataItemNames::MessageDataItemNames(item_names)
    }
}

/// Message data item name used to request a message data item in a `FETCH` command.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[doc(alias = "FetchAttribute")]
pub enum MessageDataItemName {
    /// Non-extensible form of `BODYSTRUCTURE`.
    Body,

    /// The text of a particular body section: `BODY[<section>]<<partial>>`.
    BodyExt {
        /// `None` refers to the entire message, including the header.
        section: Option<Section>,
        /// `(first octet, number of octets)`.
        partial: Option<(u32, NonZeroU32)>,
        /// `BODY[...]` sets `\Seen`; `BODY.PEEK[...]` does not.
        peek: bool,
    },

    /// The full MIME body structure of a message.
    BodyStructure,

    /// The envelope structure of a message.
    Envelope,

    /// The flags currently set for a message.
    Flags,

    /// The internal date of a message.
    InternalDate,

    /// Equivalent to `BODY[]`, but returned as `RFC822` in the response.
    Rfc822,

    /// Equivalent to `BODY.PEEK[HEADER]`, but returned as `RFC822.HEADER`.
    Rfc822Header,

    /// The RFC 2822 size of a message.
    Rfc822Size,

    /// Equivalent to `BODY[TEXT]`, but returned as `RFC822.TEXT`.
    Rfc822Text,

    /// The unique identifier of a message.
    Uid,

    /// RFC 3516 `BINARY[<section>]<<partial>>`: a MIME part decoded from its transfer encoding.
    Binary {
        section: Vec<NonZeroU32>,
        partial: Option<(u32, NonZeroU32)>,
        peek: bool,
    },

    /// RFC 3516 `BINARY.SIZE[<section>]`.
    BinarySize { section: Vec<NonZeroU32> },
}

/// Message data item, as returned in a `FETCH` response.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[doc(alias = "FetchAttributeValue")]
pub enum MessageDataItem {
    /// A `BODYSTRUCTURE` without extension data.
    Body(BodyStructure),

    /// The body contents of the specified section.
    BodyExt {
        section: Option<Section>,
        /// The origin octet, if this is the result of a partial fetch.
        origin: Option<u32>,
        data: NString,
    },

    /// The full MIME body structure of a message.
    BodyStructure(BodyStructure),

    /// The envelope structure of a message.
    Envelope(Envelope),

    /// The flags currently set for a message.
    Flags(Vec<FlagFetch>),

    /// The internal date of a message.
    InternalDate(InternalDate),

    /// Equivalent to `BODY[]`.
    Rfc822(NString),

    /// Equivalent to `BODY[HEADER]`, but does not implicitly set `\Seen`.
    Rfc822Header(NString),

    /// The RFC 2822 size of a message.
    Rfc822Size(u32),

    /// Equivalent to `BODY[TEXT]`.
    Rfc822Text(NString),

    /// The unique identifier of a message.
    Uid(NonZeroU32),

    /// RFC 3516 decoded part contents.
    Binary {
        section: Vec<NonZeroU32>,
        value: NString8,
    },

    /// RFC 3516 decoded part size.
    BinarySize { section: Vec<NonZeroU32>, size: u32 },
}

/// Identifies a MIME part within a message, and optionally a sub-part specifier
/// (`HEADER`, `HEADER.FIELDS`, `HEADER.FIELDS.NOT`, `MIME`, `TEXT`).
///
/// Every message has at least part `1`. Multipart messages number their parts in document
/// order; a part of type `MESSAGE/RFC822` or `MULTIPART/*` nests further part numbers under it
/// by appending `.N`.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Section {
    Part(Part),
    Header(Option<Part>),
    /// Only header fields whose name matches one in the list (case-insensitive).
    HeaderFields(Option<Part>, NonEmptyVec<AString>),
    /// Only header fields whose name does not match any in the list.
    HeaderFieldsNot(Option<Part>, NonEmptyVec<AString>),
    /// The body text of the message, omitting the RFC 2822 header.
    Text(Option<Part>),
    /// The MIME header of a part; must be prefixed by at least one numeric part specifier.
    Mime(Part),
}

/// A dot-separated chain of part numbers, e.g. `4.2.1`.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Part(pub NonEmptyVec<NonZeroU32>);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_macro_expand() {
        assert_eq!(
            Macro::Fast.expand(),
            vec![
                MessageDataItemName::Flags,
                MessageDataItemName::InternalDate,
                MessageDataItemName::Rfc822Size,
            ]
        );
    }

    #[test]
    fn test_macro_display() {
        assert_eq!(Macro::All.to_string(), "ALL");
        assert_eq!(Macro::Full.to_string(), "FULL");
    }

    #[test]
    fn test_section_part_chain() {
        let part = Part(NonEmptyVec::try_from(vec![
            NonZeroU32::new(4).unwrap(),
            NonZeroU32::new(2).unwrap(),
            NonZeroU32::new(1).unwrap(),
        ])
        .unwrap());
        let section = Section::Mime(part);
        assert!(matches!(section, Section::Mime(_)));
    }
}
