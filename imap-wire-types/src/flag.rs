//! Flag-related types.

use std::fmt::{Display, Formatter};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::{Atom, AtomError};

/// There are two types of flags in IMAP4rev1: system and keyword flags.
///
/// A system flag is a flag name that is pre-defined in RFC 3501. All system flags begin with `\`
/// and certain system flags (`\Deleted` and `\Seen`) have special semantics. Flags that begin
/// with `\` but are not pre-defined system flags are extension flags; clients must accept them
/// and servers must not send them except when defined by a future standard.
///
/// A keyword is defined by the server implementation. Keywords do not begin with `\` and servers
/// may permit the client to define new ones in the mailbox by sending the `\*` flag
/// ([`FlagPerm::Asterisk`]) in the PERMANENTFLAGS response.
///
/// Flag comparison is case-insensitive, per RFC 3501 §2.3.2; [`Flag::system`] normalizes on
/// construction so `Eq`/`Hash` behave correctly without a custom impl.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Flag {
    /// Message has been answered (`\Answered`).
    Answered,
    /// Message is "deleted" for removal by later EXPUNGE (`\Deleted`).
    Deleted,
    /// Message has not completed composition (marked as a draft) (`\Draft`).
    Draft,
    /// Message is "flagged" for urgent/special attention (`\Flagged`).
    Flagged,
    /// Message has been read (`\Seen`).
    Seen,
    /// A future expansion of a system flag.
    Extension(FlagExtension),
    /// A keyword.
    Keyword(Atom),
}

/// An (extension) flag.
///
/// It's guaranteed that this type can't represent any flag from [`Flag`].
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FlagExtension(Atom);

impl Flag {
    pub fn system(atom: Atom) -> Self {
        match atom.as_ref().to_ascii_lowercase().as_ref() {
            "answered" => Self::Answered,
            "deleted" => Self::Deleted,
            "draft" => Self::Draft,
            "flagged" => Self::Flagged,
            "seen" => Self::Seen,
            _ => Self::Extension(FlagExtension(atom)),
        }
    }

    pub fn keyword(atom: Atom) -> Self {
        Self::Keyword(atom)
    }
}

impl TryFrom<&str> for Flag {
    type Error = AtomError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Ok(if let Some(value) = value.strip_prefix('\\') {
            Self::system(Atom::try_from(value)?)
        } else {
            Self::keyword(Atom::try_from(value)?)
        })
    }
}

impl Display for Flag {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        match self {
            Flag::Answered => f.write_str("\\Answered"),
            Flag::Deleted => f.write_str("\\Deleted"),
            Flag::Draft => f.write_str("\\Draft"),
            Flag::Flagged => f.write_str("\\Flagged"),
            Flag::Seen => f.write_str("\\Seen"),
            Flag::Extension(other) => write!(f, "\\{}", other.0),
            Flag::Keyword(atom) => write!(f, "{atom}"),
        }
    }
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FlagFetch {
    Flag(Flag),

    /// Message is "recently" arrived in this mailbox (`\Recent`).
    ///
    /// This session is the first session to have been notified about this message; if the
    /// session is read-write, subsequent sessions will not see `\Recent` set for this message.
    /// This flag can not be altered by the client.
    Recent,
}

impl From<Flag> for FlagFetch {
    fn from(flag: Flag) -> Self {
        Self::Flag(flag)
    }
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FlagPerm {
    Flag(Flag),

    /// Indicates that it is possible to create new keywords by attempting to store those flags
    /// in the mailbox (`\*`).
    Asterisk,
}

impl From<Flag> for FlagPerm {
    fn from(flag: Flag) -> Self {
        Self::Flag(flag)
    }
}

/// Four name attributes are defined.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FlagNameAttribute {
    /// It is not possible for any child levels of hierarchy to exist under this name; no child
    /// levels exist now and none can be created in the future (`\Noinferiors`).
    Noinferiors,

    /// It is not possible to use this name as a selectable mailbox (`\Noselect`).
    Noselect,

    /// The mailbox has been marked "interesting" by the server; the mailbox probably contains
    /// messages that have been added since the last time the mailbox was selected (`\Marked`).
    Marked,

    /// The mailbox does not contain any additional messages since the last time the mailbox was
    /// selected (`\Unmarked`).
    Unmarked,

    /// An extension flag.
    Extension(FlagNameAttributeExtension),
}

impl From<FlagNameAttributeExtension> for FlagNameAttribute {
    fn from(extension: FlagNameAttributeExtension) -> Self {
        Self::Extension(extension)
    }
}

/// An extension flag.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FlagNameAttributeExtension(Atom);

impl FlagNameAttribute {
    pub fn is_selectability(&self) -> bool {
        matches!(
            self,
            FlagNameAttribute::Noselect | FlagNameAttribute::Marked | FlagNameAttribute::Unmarked
        )
    }
}

impl From<Atom> for FlagNameAttribute {
    fn from(atom: Atom) -> Self {
        match atom.as_ref().to_ascii_lowercase().as_ref() {
            "noinferiors" => Self::Noinferiors,
            "noselect" => Self::Noselect,
            "marked" => Self::Marked,
            "unmarked" => Self::Unmarked,
            _ => Self::Extension(FlagNameAttributeExtension(atom)),
        }
    }
}

impl Display for FlagNameAttribute {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        match self {
            Self::Noinferiors => f.write_str("\\Noinferiors"),
            Self::Noselect => f.write_str("\\Noselect"),
            Self::Marked => f.write_str("\\Marked"),
            Self::Unmarked => f.write_str("\\Unmarked"),
            Self::Extension(extension) => write!(f, "\\{}", extension.0),
        }
    }
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreType {
    Replace,
    Add,
    Remove,
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreResponse {
    Answer,
    Silent,
}

#[derive(Clone, Debug, Eq, Error, Hash, PartialEq)]
pub enum FlagError {
    #[error(transparent)]
    Atom(#[from] AtomError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flagfetch() {
        let flag = Flag::Seen;
        let flag_fetch: FlagFetch = flag.into();
        assert_eq!(flag_fetch, FlagFetch::Flag(Flag::Seen));
    }

    #[test]
    fn test_flagperm() {
        let flag = Flag::Seen;
        let flag_perm: FlagPerm = flag.into();
        assert_eq!(flag_perm, FlagPerm::Flag(Flag::Seen));
    }

    #[test]
    fn test_flagnameattribute() {
        let atom = FlagNameAttributeExtension(Atom::try_from("Custom").unwrap());
        let flag_name_attribute = FlagNameAttribute::from(atom.clone());
        assert_eq!(flag_name_attribute, FlagNameAttribute::Extension(atom));
    }

    #[test]
    fn test_flag_case_insensitive_system_match() {
        assert_eq!(Flag::try_from("\\SEEN").unwrap(), Flag::Seen);
        assert_eq!(Flag::try_from("\\seen").unwrap(), Flag::Seen);
        assert_eq!(Flag::try_from("\\Deleted").unwrap(), Flag::Deleted);
    }

    #[test]
    fn test_flag_keyword() {
        assert_eq!(
            Flag::try_from("$Forwarded").unwrap(),
            Flag::Keyword(Atom::try_from("$Forwarded").unwrap())
        );
    }
}
