//! The IMAP `METADATA` extension (RFC 5464).
//!
//! Extends [`CommandBody`] with `GetMetadata`/`SetMetadata`.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{
    command::CommandBody,
    core::{AString, NonEmptyVec},
    error::ValidationError,
    extensions::binary::NString8,
    mailbox::Mailbox,
};

impl CommandBody {
    pub fn get_metadata<M>(
        options: Vec<GetMetadataOption>,
        mailbox: M,
        entries: NonEmptyVec<Entry>,
    ) -> Result<Self, M::Error>
    where
        M: TryInto<Mailbox>,
    {
        Ok(CommandBody::GetMetadata {
            options,
            mailbox: mailbox.try_into()?,
            entries,
        })
    }

    pub fn set_metadata<M>(
        mailbox: M,
        entry_values: NonEmptyVec<EntryValue>,
    ) -> Result<Self, M::Error>
    where
        M: TryInto<Mailbox>,
    {
        Ok(CommandBody::SetMetadata {
            mailbox: mailbox.try_into()?,
            entry_values,
        })
    }
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct EntryValue {
    pub entry: Entry,
    pub value: NString8,
}

/// Slash-separated path to an annotation entry.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct Entry(AString);

impl Entry {
    pub fn inner(&self) -> &AString {
        &self.0
    }
}

impl TryFrom<AString> for Entry {
    type Error = ValidationError;

    fn try_from(value: AString) -> Result<Self, Self::Error> {
        Ok(Self(value))
    }
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub enum GetMetadataOption {
    /// Only return values no larger, in octets, than the given limit.
    ///
    /// If any entry's value exceeds `MaxSize`, the server includes the METADATA LONGENTRIES
    /// response code in the tagged OK response.
    MaxSize(u32),
    /// Also return entries below the specified entry name, down to the given depth.
    Depth(Depth),
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Depth {
    /// No entries below the specified entry are returned.
    Null,
    /// Only entries immediately below the specified entry are returned.
    One,
    /// All entries below the specified entry are returned.
    Infinity,
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub enum MetadataCode {
    LongEntries(u32),
    MaxSize(u32),
    TooMany,
    NoPrivate,
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub enum MetadataResponse {
    WithValues(NonEmptyVec<EntryValue>),
    WithoutValues(NonEmptyVec<Entry>),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_metadata_command() {
        let entries = NonEmptyVec::single(Entry::try_from(AString::try_from("/shared/comment").unwrap()).unwrap());
        let cmd = CommandBody::get_metadata(vec![GetMetadataOption::Depth(Depth::Infinity)], "INBOX", entries).unwrap();
        assert!(matches!(cmd, CommandBody::GetMetadata { .. }));
    }
}
