//! Core data types ("string types").
//!
//! # Overview
//!
//! ```text
//!        ┌───────┐ ┌─────────────────┐
//!        │AString│ │     NString     │
//!        └──┬─┬──┘ │(Option<IString>)│
//!           │ │    └─────┬───────────┘
//!           │ └──────┐   │
//!           │        │   │
//! ┌────┐ ┌──▼────┐ ┌─▼───▼─┐
//! │Atom│ │AtomExt│ │IString│
//! └────┘ └───────┘ └┬─────┬┘
//!                   │     │
//!             ┌─────▼─┐ ┌─▼────┐
//!             │Literal│ │Quoted│
//!             └───────┘ └──────┘
//! ```
//!
//! Every type in this module owns its data (`String`/`Vec<u8>`, not `Cow<'a, _>`), trading the
//! zero-copy parse for a grammar that is simple to hold onto across an `await` point or store in
//! a long-lived `ClientStateMachine`.

use std::{fmt::Display, vec::IntoIter};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::utils::indicators::{is_astring_char, is_atom_char, is_char8, is_text_char};

/// Derives `TryFrom<$from> for $target` by routing through `$via`'s own `TryFrom<$from>`, then
/// `$target`'s `From<$via>`. Used where a type (e.g. `Mailbox`) wants the same constructor
/// surface as the `AString`/`IString` it wraps.
macro_rules! impl_try_from {
    ($via:ty, $from:ty, $target:ty) => {
        impl TryFrom<$from> for $target {
            type Error = <$via as TryFrom<$from>>::Error;

            fn try_from(value: $from) -> Result<Self, Self::Error> {
                let value = <$via>::try_from(value)?;

                Ok(Self::from(value))
            }
        }
    };
}

pub(crate) use impl_try_from;

/// An atom.
///
/// "An atom consists of one or more non-special characters." (RFC 3501)
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq, Ord, PartialOrd, Hash)]
pub struct Atom(pub(crate) String);

impl Atom {
    pub fn verify(value: impl AsRef<[u8]>) -> Result<(), AtomError> {
        let value = value.as_ref();

        if value.is_empty() {
            return Err(AtomError::Empty);
        }

        if let Some(position) = value.iter().position(|b| !is_atom_char(*b)) {
            return Err(AtomError::ByteNotAllowed {
                found: value[position],
                position,
            });
        }

        Ok(())
    }

    pub fn inner(&self) -> &str {
        self.0.as_str()
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl TryFrom<&str> for Atom {
    type Error = AtomError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::verify(value)?;
        Ok(Self(value.to_string()))
    }
}

impl TryFrom<String> for Atom {
    type Error = AtomError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::verify(&value)?;
        Ok(Self(value))
    }
}

impl AsRef<str> for Atom {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl Display for Atom {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Clone, Debug, Eq, Error, Hash, Ord, PartialEq, PartialOrd)]
pub enum AtomError {
    #[error("must not be empty")]
    Empty,
    #[error("invalid byte b'\\x{found:02x}' at index {position}")]
    ByteNotAllowed { found: u8, position: usize },
}

/// An (extended) atom: an atom with additional allowed characters, used where the formal syntax
/// is more permissive than plain `atom` (e.g. some response codes and flags).
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AtomExt(pub(crate) String);

impl AtomExt {
    pub fn verify(value: impl AsRef<[u8]>) -> Result<(), AtomExtError> {
        let value = value.as_ref();

        if value.is_empty() {
            return Err(AtomExtError::Empty);
        }

        if let Some(position) = value.iter().position(|b| !is_astring_char(*b)) {
            return Err(AtomExtError::ByteNotAllowed {
                found: value[position],
                position,
            });
        }

        Ok(())
    }

    pub fn inner(&self) -> &str {
        self.0.as_str()
    }
}

impl TryFrom<&str> for AtomExt {
    type Error = AtomExtError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::verify(value)?;
        Ok(Self(value.to_string()))
    }
}

impl TryFrom<String> for AtomExt {
    type Error = AtomExtError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::verify(&value)?;
        Ok(Self(value))
    }
}

#[derive(Clone, Debug, Eq, Error, Hash, PartialEq)]
pub enum AtomExtError {
    #[error("must not be empty")]
    Empty,
    #[error("invalid byte b'\\x{found:02x}' at index {position}")]
    ByteNotAllowed { found: u8, position: usize },
    #[error("value cannot be represented as an atom or a quoted string")]
    Invalid,
}

/// A quoted string's content, already unescaped.
///
/// `quoted = DQUOTE *QUOTED-CHAR DQUOTE`
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Quoted(pub(crate) String);

impl Quoted {
    pub fn verify(value: impl AsRef<[u8]>) -> Result<(), QuotedError> {
        let value = value.as_ref();

        if let Some(position) = value.iter().position(|b| !is_text_char(*b)) {
            return Err(QuotedError::ByteNotAllowed {
                found: value[position],
                position,
            });
        }

        Ok(())
    }

    pub fn inner(&self) -> &str {
        self.0.as_str()
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl TryFrom<&str> for Quoted {
    type Error = QuotedError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::verify(value)?;
        Ok(Self(value.to_string()))
    }
}

impl TryFrom<String> for Quoted {
    type Error = QuotedError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::verify(&value)?;
        Ok(Self(value))
    }
}

#[derive(Clone, Debug, Eq, Error, Hash, PartialEq)]
pub enum QuotedError {
    #[error("invalid byte b'\\x{found:02x}' at index {position}")]
    ByteNotAllowed { found: u8, position: usize },
}

/// A single `QUOTED-CHAR`.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct QuotedChar(char);

impl QuotedChar {
    pub fn verify(input: char) -> Result<(), QuotedCharError> {
        if input.is_ascii() && is_text_char(input as u8) {
            Ok(())
        } else {
            Err(QuotedCharError::NotAllowed { found: input })
        }
    }

    pub fn inner(&self) -> char {
        self.0
    }
}

impl TryFrom<char> for QuotedChar {
    type Error = QuotedCharError;

    fn try_from(input: char) -> Result<Self, Self::Error> {
        Self::verify(input)?;
        Ok(Self(input))
    }
}

#[derive(Clone, Debug, Eq, Error, Hash, PartialEq)]
pub enum QuotedCharError {
    #[error("char {found:?} not allowed")]
    NotAllowed { found: char },
}

/// A literal: `"{" number "}" CRLF *CHAR8`.
///
/// The number in the braces is implied by the length of the inner `Vec<u8>`.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Literal {
    data: Vec<u8>,
    /// Whether the literal should be sent with `LITERAL+`'s non-synchronizing form (`{n+}`).
    ///
    /// Set by the caller, not derived from `data`; the encoder consults this, the grammar does
    /// not care.
    pub(crate) non_sync: bool,
}

impl Literal {
    pub fn verify(value: impl AsRef<[u8]>) -> Result<(), LiteralError> {
        let value = value.as_ref();

        if let Some(position) = value.iter().position(|b| !is_char8(*b)) {
            return Err(LiteralError::ByteNotAllowed {
                found: value[position],
                position,
            });
        }

        Ok(())
    }

    pub fn new(data: impl Into<Vec<u8>>) -> Result<Self, LiteralError> {
        let data = data.into();
        Self::verify(&data)?;
        Ok(Self {
            data,
            non_sync: false,
        })
    }

    /// Like [`Literal::new`], but marks the literal as eligible for `LITERAL+` non-synchronizing
    /// encoding.
    pub fn new_non_sync(data: impl Into<Vec<u8>>) -> Result<Self, LiteralError> {
        let data = data.into();
        Self::verify(&data)?;
        Ok(Self {
            data,
            non_sync: true,
        })
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn into_inner(self) -> Vec<u8> {
        self.data
    }

    pub fn is_non_sync(&self) -> bool {
        self.non_sync
    }
}

impl TryFrom<Vec<u8>> for Literal {
    type Error = LiteralError;

    fn try_from(value: Vec<u8>) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<&[u8]> for Literal {
    type Error = LiteralError;

    fn try_from(value: &[u8]) -> Result<Self, Self::Error> {
        Self::new(value.to_vec())
    }
}

#[derive(Clone, Debug, Eq, Error, Hash, PartialEq)]
pub enum LiteralError {
    #[error("invalid byte b'\\x{found:02x}' at index {position}: NUL is not allowed in a literal")]
    ByteNotAllowed { found: u8, position: usize },
}

/// `string = quoted / literal`
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum IString {
    Literal(Literal),
    Quoted(Quoted),
}

impl From<Literal> for IString {
    fn from(value: Literal) -> Self {
        Self::Literal(value)
    }
}

impl From<Quoted> for IString {
    fn from(value: Quoted) -> Self {
        Self::Quoted(value)
    }
}

impl TryFrom<&str> for IString {
    type Error = QuotedError;

    /// Prefers `Quoted`; use [`Literal::new`] directly if the literal form is required (e.g. for
    /// bytes that are not valid UTF-8, which can't round-trip through `Quoted`).
    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Ok(Self::Quoted(Quoted::try_from(value)?))
    }
}

/// `nstring = string / nil`
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct NString(pub Option<IString>);

impl From<Option<IString>> for NString {
    fn from(value: Option<IString>) -> Self {
        Self(value)
    }
}

/// `astring = 1*ASTRING-CHAR / string`
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum AString {
    Atom(AtomExt),
    String(IString),
}

impl From<AtomExt> for AString {
    fn from(value: AtomExt) -> Self {
        Self::Atom(value)
    }
}

impl From<IString> for AString {
    fn from(value: IString) -> Self {
        Self::String(value)
    }
}

impl TryFrom<&str> for AString {
    type Error = AtomExtError;

    /// Prefers the bare-atom form when `value` is a valid extended atom, falling back to a
    /// quoted string otherwise.
    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match AtomExt::try_from(value) {
            Ok(atom) => Ok(Self::Atom(atom)),
            Err(_) => {
                // Quoting can still fail (e.g. embedded NUL); surface that as an AtomExtError
                // so callers only need to handle one error type here.
                let quoted = Quoted::try_from(value).map_err(|_| AtomExtError::Invalid)?;
                Ok(Self::String(IString::Quoted(quoted)))
            }
        }
    }
}

impl TryFrom<String> for AString {
    type Error = AtomExtError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::try_from(value.as_str())
    }
}

/// Tag identifying a command/response pair.
///
/// `tag = 1*<any ASTRING-CHAR except "+">`
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq, Hash, Ord, PartialOrd)]
pub struct Tag(pub(crate) String);

impl Tag {
    pub fn verify(value: impl AsRef<[u8]>) -> Result<(), TagError> {
        let value = value.as_ref();

        if value.is_empty() {
            return Err(TagError::Empty);
        }

        if let Some(position) = value
            .iter()
            .position(|b| !is_astring_char(*b) || *b == b'+')
        {
            return Err(TagError::ByteNotAllowed {
                found: value[position],
                position,
            });
        }

        Ok(())
    }

    pub fn inner(&self) -> &str {
        self.0.as_str()
    }
}

impl TryFrom<&str> for Tag {
    type Error = TagError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::verify(value)?;
        Ok(Self(value.to_string()))
    }
}

impl TryFrom<String> for Tag {
    type Error = TagError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::verify(&value)?;
        Ok(Self(value))
    }
}

impl Display for Tag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Clone, Debug, Eq, Error, Hash, Ord, PartialEq, PartialOrd)]
pub enum TagError {
    #[error("must not be empty")]
    Empty,
    #[error("invalid byte b'\\x{found:02x}' at index {position}")]
    ByteNotAllowed { found: u8, position: usize },
}

/// Free-form human-readable text, e.g. the trailing part of a tagged response line.
///
/// `text = 1*TEXT-CHAR`
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Text(pub(crate) String);

impl Text {
    pub fn verify(value: impl AsRef<[u8]>) -> Result<(), TextError> {
        let value = value.as_ref();

        if value.is_empty() {
            return Err(TextError::Empty);
        }

        if let Some(position) = value.iter().position(|b| !is_text_char(*b)) {
            return Err(TextError::ByteNotAllowed {
                found: value[position],
                position,
            });
        }

        Ok(())
    }

    pub fn inner(&self) -> &str {
        self.0.as_str()
    }
}

impl TryFrom<&str> for Text {
    type Error = TextError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::verify(value)?;
        Ok(Self(value.to_string()))
    }
}

#[derive(Clone, Debug, Eq, Error, Hash, PartialEq)]
pub enum TextError {
    #[error("must not be empty")]
    Empty,
    #[error("invalid byte b'\\x{found:02x}' at index {position}")]
    ByteNotAllowed { found: u8, position: usize },
}

/// `charset = atom / quoted`
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Charset(pub(crate) String);

impl TryFrom<&str> for Charset {
    type Error = AtomError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Atom::verify(value)?;
        Ok(Self(value.to_string()))
    }
}

impl Display for Charset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A `Vec<T>` that is guaranteed to hold at least one element.
///
/// Many IMAP productions are `1*(something)`; this type keeps that cardinality in the type
/// system instead of re-checking `.is_empty()` at every call site.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NonEmptyVec<T>(pub(crate) Vec<T>);

impl<T> NonEmptyVec<T> {
    pub fn try_from(inner: Vec<T>) -> Result<Self, NonEmptyVecError> {
        if inner.is_empty() {
            Err(NonEmptyVecError::Empty)
        } else {
            Ok(Self(inner))
        }
    }

    pub fn as_slice(&self) -> &[T] {
        &self.0
    }

    pub fn into_inner(self) -> Vec<T> {
        self.0
    }

    pub fn single(value: T) -> Self {
        Self(vec![value])
    }
}

impl<T> From<T> for NonEmptyVec<T> {
    fn from(value: T) -> Self {
        Self(vec![value])
    }
}

impl<T> IntoIterator for NonEmptyVec<T> {
    type Item = T;
    type IntoIter = IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

#[derive(Clone, Copy, Debug, Eq, Error, Hash, PartialEq)]
pub enum NonEmptyVecError {
    #[error("must not be empty")]
    Empty,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conversion_atom() {
        assert!(Atom::try_from("").is_err());
        assert!(Atom::try_from("a b").is_err());
        assert!(Atom::try_from("a(b)").is_err());
        assert_eq!(Atom::try_from("abc").unwrap().inner(), "abc");
    }

    #[test]
    fn test_conversion_tag() {
        assert!(Tag::try_from("").is_err());
        assert!(Tag::try_from("a+b").is_err());
        assert!(Tag::try_from("a b").is_err());
        assert_eq!(Tag::try_from("A001").unwrap().inner(), "A001");
    }

    #[test]
    fn test_conversion_quoted() {
        assert_eq!(Quoted::try_from("hello").unwrap().inner(), "hello");
        assert!(Quoted::try_from("a\0b").is_err());
    }

    #[test]
    fn test_literal_rejects_nul() {
        assert!(Literal::new(b"a\x00b".to_vec()).is_err());
        assert!(Literal::new(b"abc".to_vec()).is_ok());
    }

    #[test]
    fn test_literal_non_sync_marker() {
        let lit = Literal::new_non_sync(b"abc".to_vec()).unwrap();
        assert!(lit.is_non_sync());
        assert_eq!(lit.as_bytes(), b"abc");
    }

    #[test]
    fn test_conversion_astring_prefers_atom() {
        match AString::try_from("abc").unwrap() {
            AString::Atom(a) => assert_eq!(a.inner(), "abc"),
            AString::String(_) => panic!("expected Atom form"),
        }

        match AString::try_from("a b").unwrap() {
            AString::String(IString::Quoted(q)) => assert_eq!(q.inner(), "a b"),
            other => panic!("expected quoted form, got {other:?}"),
        }
    }

    #[test]
    fn test_non_empty_vec() {
        assert!(NonEmptyVec::<u8>::try_from(vec![]).is_err());
        assert!(NonEmptyVec::try_from(vec![1, 2, 3]).is_ok());
    }
}
