//! The IMAP `ENABLE` extension (RFC 5161).
//!
//! Extends [`crate::command::CommandBody`] with [`CommandBody::Enable`](crate::command::CommandBody::Enable).

use std::fmt::{Display, Formatter};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{
    command::CommandBody,
    core::{Atom, AtomError, NonEmptyVec},
};

impl CommandBody {
    pub fn enable<C>(capabilities: C) -> Self
    where
        C: Into<NonEmptyVec<CapabilityEnable>>,
    {
        CommandBody::Enable {
            capabilities: capabilities.into(),
        }
    }
}

/// A capability name as it appears in an `ENABLE` command.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum CapabilityEnable {
    Utf8(Utf8Kind),
    /// RFC 7162 CONDSTORE/QRESYNC.
    CondStore,
    /// Client can handle unsolicited server annotations and mailbox annotations (RFC 5464).
    Metadata,
    /// Client can handle server annotations only (RFC 5464).
    MetadataServer,
    Other(CapabilityEnableOther),
}

impl TryFrom<&str> for CapabilityEnable {
    type Error = AtomError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Ok(Self::from(Atom::try_from(value)?))
    }
}

impl From<Atom> for CapabilityEnable {
    fn from(atom: Atom) -> Self {
        match atom.as_ref().to_ascii_lowercase().as_str() {
            "utf8=accept" => Self::Utf8(Utf8Kind::Accept),
            "utf8=only" => Self::Utf8(Utf8Kind::Only),
            "condstore" => Self::CondStore,
            "metadata" => Self::Metadata,
            "metadata-server" => Self::MetadataServer,
            _ => Self::Other(CapabilityEnableOther(atom)),
        }
    }
}

impl Display for CapabilityEnable {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        match self {
            Self::Utf8(kind) => write!(f, "UTF8={}", kind),
            Self::CondStore => write!(f, "CONDSTORE"),
            Self::Metadata => write!(f, "METADATA"),
            Self::MetadataServer => write!(f, "METADATA-SERVER"),
            Self::Other(other) => write!(f, "{}", other.0),
        }
    }
}

/// A capability name not recognized as one of [`CapabilityEnable`]'s named variants.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CapabilityEnableOther(Atom);

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum Utf8Kind {
    Accept,
    Only,
}

impl Display for Utf8Kind {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        f.write_str(match self {
            Self::Accept => "ACCEPT",
            Self::Only => "ONLY",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conversion_capability_enable() {
        assert_eq!(
            CapabilityEnable::from(Atom::try_from("utf8=only").unwrap()),
            CapabilityEnable::Utf8(Utf8Kind::Only)
        );
        assert_eq!(
            CapabilityEnable::from(Atom::try_from("utf8=accept").unwrap()),
            CapabilityEnable::Utf8(Utf8Kind::Accept)
        );
        assert_eq!(
            CapabilityEnable::try_from("utf").unwrap(),
            CapabilityEnable::Other(CapabilityEnableOther(Atom::try_from("utf").unwrap()))
        );
        assert_eq!(
            CapabilityEnable::try_from("xxxxx").unwrap(),
            CapabilityEnable::Other(CapabilityEnableOther(Atom::try_from("xxxxx").unwrap()))
        );
    }
}
