//! Mailbox-related types.

use std::str::from_utf8;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    core::{impl_try_from, AString, IString},
    error::{ValidationError, ValidationErrorKind},
    mailbox::error::MailboxOtherError,
    utf7,
    utils::indicators::is_list_char,
};

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ListCharString(pub(crate) String);

impl ListCharString {
    pub fn validate(value: impl AsRef<[u8]>) -> Result<(), ValidationError> {
        let value = value.as_ref();

        if value.is_empty() {
            return Err(ValidationError::new(ValidationErrorKind::Empty));
        }

        if let Some(at) = value.iter().position(|b| !is_list_char(*b)) {
            return Err(ValidationError::new(ValidationErrorKind::InvalidByteAt {
                byte: value[at],
                at,
            }));
        }

        Ok(())
    }
}

impl TryFrom<&str> for ListCharString {
    type Error = ValidationError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::validate(value)?;
        Ok(Self(value.to_string()))
    }
}

impl TryFrom<String> for ListCharString {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::validate(&value)?;
        Ok(Self(value))
    }
}

impl AsRef<[u8]> for ListCharString {
    fn as_ref(&self) -> &[u8] {
        self.0.as_bytes()
    }
}

/// `list-mailbox = 1*list-char / string`, the argument of LIST/LSUB.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ListMailbox {
    Token(ListCharString),
    String(IString),
}

impl TryFrom<&str> for ListMailbox {
    type Error = ValidationError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        if s.is_empty() {
            return Ok(ListMailbox::String(IString::Quoted(s.try_into().unwrap())));
        }

        if let Ok(lcs) = ListCharString::try_from(s) {
            return Ok(ListMailbox::Token(lcs));
        }

        Ok(ListMailbox::String(
            IString::try_from(s).map_err(|_| ValidationError::new(ValidationErrorKind::Invalid))?,
        ))
    }
}

/// A mailbox name as it appears in the formal syntax: either the reserved `INBOX` (matched
/// case-insensitively) or any other astring-representable name.
///
/// `INBOX` is a special name reserved to mean "the primary mailbox for this user on this
/// server" (RFC 3501 §5.1); the interpretation of all other names is server-dependent and is
/// treated here as an opaque, byte-preserving value.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Mailbox {
    Inbox,
    Other(MailboxOther),
}

impl_try_from!(AString, &str, Mailbox);
impl_try_from!(AString, String, Mailbox);

impl From<AString> for Mailbox {
    fn from(value: AString) -> Self {
        let bytes = match &value {
            AString::Atom(atom) => atom.inner().as_bytes().to_vec(),
            AString::String(IString::Quoted(q)) => q.inner().as_bytes().to_vec(),
            AString::String(IString::Literal(l)) => l.as_bytes().to_vec(),
        };

        match from_utf8(&bytes) {
            Ok(s) if s.eq_ignore_ascii_case("inbox") => Self::Inbox,
            _ => Self::Other(MailboxOther::unvalidated(value)),
        }
    }
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MailboxOther(pub(crate) AString);

impl MailboxOther {
    pub fn validate(value: &AString) -> Result<(), MailboxOtherError> {
        let bytes = match value {
            AString::Atom(atom) => atom.inner().as_bytes().to_vec(),
            AString::String(IString::Quoted(q)) => q.inner().as_bytes().to_vec(),
            AString::String(IString::Literal(l)) => l.as_bytes().to_vec(),
        };

        if bytes.eq_ignore_ascii_case(b"inbox") {
            return Err(MailboxOtherError::Reserved);
        }

        Ok(())
    }

    pub fn inner(&self) -> &AString {
        &self.0
    }

    fn unvalidated(value: AString) -> Self {
        Self(value)
    }
}

macro_rules! impl_try_from_mailbox_other {
    ($from:ty) => {
        impl TryFrom<$from> for MailboxOther {
            type Error = MailboxOtherError;

            fn try_from(value: $from) -> Result<Self, Self::Error> {
                let astring =
                    AString::try_from(value).map_err(|_| MailboxOtherError::InvalidAstring)?;

                Self::validate(&astring)?;

                Ok(Self(astring))
            }
        }
    };
}

impl_try_from_mailbox_other!(&str);
impl_try_from_mailbox_other!(String);

impl TryFrom<AString> for MailboxOther {
    type Error = MailboxOtherError;

    fn try_from(value: AString) -> Result<Self, Self::Error> {
        Self::validate(&value)?;
        Ok(Self(value))
    }
}

pub mod error {
    use thiserror::Error;

    #[derive(Clone, Debug, Eq, Error, Hash, PartialEq)]
    pub enum MailboxOtherError {
        #[error("value is not representable as an astring")]
        InvalidAstring,
        #[error("reserved: please use Mailbox::Inbox")]
        Reserved,
    }
}

/// Maximum length, in encoded bytes, of a [`MailboxName`] (inherited implementation limit, not
/// protocol-mandated).
pub const MAILBOX_NAME_MAX_LEN: usize = 1000;

/// A mailbox name carried on the wire: modified UTF-7 ("IMAP UTF-7") bytes, with `INBOX`
/// case-folded for comparison purposes.
///
/// Equality and hashing honour the `INBOX` case-folding rule: `Mailbox::Inbox` constructed from
/// any case of `"inbox"` compares equal. All other names are compared byte-exact.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Eq)]
pub struct MailboxName(Vec<u8>);

impl MailboxName {
    pub fn validate(bytes: &[u8]) -> Result<(), MailboxNameError> {
        if bytes.len() > MAILBOX_NAME_MAX_LEN {
            return Err(MailboxNameError::TooBig(MailboxTooBigError {
                maximum_size: MAILBOX_NAME_MAX_LEN,
                actual_size: bytes.len(),
            }));
        }

        Ok(())
    }

    /// Constructs a `MailboxName` from already modified-UTF-7-encoded wire bytes.
    pub fn from_encoded(bytes: impl Into<Vec<u8>>) -> Result<Self, MailboxNameError> {
        let bytes = bytes.into();
        Self::validate(&bytes)?;
        Ok(Self(bytes))
    }

    /// Encodes `display_name` to modified UTF-7 and constructs a `MailboxName` from it.
    pub fn from_display(display_name: &str) -> Result<Self, MailboxNameError> {
        Self::from_encoded(utf7::encode(display_name))
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    fn is_inbox(&self) -> bool {
        self.0.eq_ignore_ascii_case(b"inbox")
    }

    /// Decodes the modified UTF-7 wire bytes to a human-readable string.
    pub fn display_string(&self) -> Result<String, utf7::Utf7Error> {
        utf7::decode(&self.0)
    }
}

impl PartialEq for MailboxName {
    fn eq(&self, other: &Self) -> bool {
        if self.is_inbox() || other.is_inbox() {
            self.is_inbox() == other.is_inbox()
        } else {
            self.0 == other.0
        }
    }
}

impl std::hash::Hash for MailboxName {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        if self.is_inbox() {
            b"INBOX".hash(state);
        } else {
            self.0.hash(state);
        }
    }
}

#[derive(Clone, Debug, Eq, Error, Hash, PartialEq)]
pub enum MailboxNameError {
    #[error(transparent)]
    TooBig(#[from] MailboxTooBigError),
}

#[derive(Clone, Copy, Debug, Eq, Error, Hash, PartialEq)]
#[error("mailbox name too big (maximum {maximum_size} bytes, got {actual_size})")]
pub struct MailboxTooBigError {
    pub maximum_size: usize,
    pub actual_size: usize,
}

#[derive(Clone, Copy, Debug, Eq, Error, Hash, PartialEq)]
#[error("mailbox has no path separator set")]
pub struct InvalidPathSeparatorError;

/// A [`MailboxName`] paired with its hierarchy separator, as returned by LIST.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MailboxPath {
    name: MailboxName,
    separator: Option<char>,
}

impl MailboxPath {
    pub fn new(name: MailboxName, separator: Option<char>) -> Self {
        Self { name, separator }
    }

    pub fn name(&self) -> &MailboxName {
        &self.name
    }

    pub fn separator(&self) -> Option<char> {
        self.separator
    }

    /// Builds a root-level mailbox path by encoding `display_name` as modified UTF-7.
    pub fn make_root_mailbox(
        display_name: &str,
        separator: Option<char>,
    ) -> Result<Self, MailboxNameError> {
        Ok(Self {
            name: MailboxName::from_display(display_name)?,
            separator,
        })
    }

    /// Derives a child of `self` named `display_name`, joined with `self`'s separator.
    ///
    /// Fails with [`InvalidPathSeparatorError`] if `self` has no separator set, and with
    /// [`MailboxTooBigError`] if the concatenated encoded name would exceed
    /// [`MAILBOX_NAME_MAX_LEN`] bytes.
    pub fn make_sub_mailbox(&self, display_name: &str) -> Result<Self, MakeSubMailboxError> {
        let separator = self.separator.ok_or(MakeSubMailboxError::NoSeparator(
            InvalidPathSeparatorError,
        ))?;

        let mut child_encoded = self.name.as_bytes().to_vec();
        child_encoded.push(separator as u8);
        child_encoded.extend_from_slice(&utf7::encode(display_name));

        if child_encoded.len() > MAILBOX_NAME_MAX_LEN {
            return Err(MakeSubMailboxError::TooBig(MailboxTooBigError {
                maximum_size: MAILBOX_NAME_MAX_LEN,
                actual_size: child_encoded.len(),
            }));
        }

        Ok(Self {
            name: MailboxName(child_encoded),
            separator: self.separator,
        })
    }

    /// Decodes the mailbox's path into its hierarchy components, dropping empty components when
    /// `omitting_empty_subsequences` is set.
    pub fn display_string_components(
        &self,
        omitting_empty_subsequences: bool,
    ) -> Result<Vec<String>, utf7::Utf7Error> {
        let decoded = self.name.display_string()?;

        let components = match self.separator {
            Some(sep) => decoded.split(sep).map(str::to_string).collect::<Vec<_>>(),
            None => vec![decoded],
        };

        Ok(if omitting_empty_subsequences {
            components.into_iter().filter(|s| !s.is_empty()).collect()
        } else {
            components
        })
    }
}

#[derive(Clone, Copy, Debug, Eq, Error, Hash, PartialEq)]
pub enum MakeSubMailboxError {
    #[error(transparent)]
    NoSeparator(#[from] InvalidPathSeparatorError),
    #[error(transparent)]
    TooBig(MailboxTooBigError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conversion_mailbox() {
        let tests = ["inbox", "inboX", "Inbox", "InboX", "INBOX"];

        for test in tests {
            assert_eq!(Mailbox::try_from(test).unwrap(), Mailbox::Inbox);
        }

        match Mailbox::try_from("Projects").unwrap() {
            Mailbox::Other(_) => {}
            Mailbox::Inbox => panic!("expected Other"),
        }
    }

    #[test]
    fn test_mailbox_name_case_insensitive_inbox() {
        let a = MailboxName::from_encoded(b"INBOX".to_vec()).unwrap();
        let b = MailboxName::from_encoded(b"inbox".to_vec()).unwrap();
        assert_eq!(a, b);

        let c = MailboxName::from_encoded(b"Other".to_vec()).unwrap();
        let d = MailboxName::from_encoded(b"other".to_vec()).unwrap();
        assert_ne!(c, d);
    }

    #[test]
    fn test_mailbox_name_too_big() {
        let bytes = vec![b'a'; MAILBOX_NAME_MAX_LEN + 1];
        assert!(MailboxName::from_encoded(bytes).is_err());
    }

    #[test]
    fn test_make_sub_mailbox_round_trip() {
        let root = MailboxPath::make_root_mailbox("INBOX", Some('/')).unwrap();
        let child = root.make_sub_mailbox("Projects").unwrap();

        let components = child.display_string_components(true).unwrap();
        assert_eq!(components.last().unwrap(), "Projects");
    }

    #[test]
    fn test_make_sub_mailbox_without_separator_fails() {
        let root = MailboxPath::make_root_mailbox("INBOX", None).unwrap();
        assert!(matches!(
            root.make_sub_mailbox("Projects"),
            Err(MakeSubMailboxError::NoSeparator(_))
        ));
    }

    #[test]
    fn test_make_sub_mailbox_too_big() {
        let root = MailboxPath::make_root_mailbox("INBOX", Some('/')).unwrap();
        let huge_name = "x".repeat(MAILBOX_NAME_MAX_LEN);
        assert!(matches!(
            root.make_sub_mailbox(&huge_name),
            Err(MakeSubMailboxError::TooBig(_))
        ));
    }
}
