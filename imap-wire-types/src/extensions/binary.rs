//! IMAP4 Binary Content Extension (RFC 3516).

use std::fmt::{Debug, Formatter};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A `literal8`: a literal that may contain NUL and other octets forbidden in a plain `Literal`.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Literal8 {
    pub data: Vec<u8>,
    /// `false` for a non-synchronizing literal (`~{n+}`).
    pub non_sync: bool,
}

impl Literal8 {
    pub fn new(data: impl Into<Vec<u8>>) -> Self {
        Self {
            data: data.into(),
            non_sync: false,
        }
    }

    pub fn new_non_sync(data: impl Into<Vec<u8>>) -> Self {
        Self {
            data: data.into(),
            non_sync: true,
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn is_non_sync(&self) -> bool {
        self.non_sync
    }
}

impl Debug for Literal8 {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        f.debug_struct("Literal8")
            .field("data", &format_args!("b\"{}\"", crate::utils::escape_byte_string(&self.data)))
            .field("non_sync", &self.non_sync)
            .finish()
    }
}

/// The message data of an `APPEND`: a plain `Literal` unless the server advertised `BINARY`,
/// in which case a `Literal8` may carry octets a plain literal cannot (e.g. NUL).
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum LiteralOrLiteral8 {
    Literal(crate::core::Literal),
    Literal8(Literal8),
}

impl From<crate::core::Literal> for LiteralOrLiteral8 {
    fn from(value: crate::core::Literal) -> Self {
        Self::Literal(value)
    }
}

impl From<Literal8> for LiteralOrLiteral8 {
    fn from(value: Literal8) -> Self {
        Self::Literal8(value)
    }
}

/// `NIL` or a [`Literal8`], used by `FETCH BINARY` / `BINARY.PEEK`.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct NString8(pub Option<Literal8>);

impl NString8 {
    pub fn as_bytes(&self) -> Option<&[u8]> {
        self.0.as_ref().map(Literal8::as_bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nstring8_roundtrip_bytes() {
        let s = NString8(Some(Literal8::new(vec![0, 1, 2])));
        assert_eq!(s.as_bytes(), Some(&[0u8, 1, 2][..]));

        let nil = NString8(None);
        assert_eq!(nil.as_bytes(), None);
    }

    #[test]
    fn test_literal_or_literal8_from() {
        let lit: LiteralOrLiteral8 = crate::core::Literal::new(b"abc".to_vec()).unwrap().into();
        assert!(matches!(lit, LiteralOrLiteral8::Literal(_)));

        let lit8: LiteralOrLiteral8 = Literal8::new(vec![0, 1, 2]).into();
        assert!(matches!(lit8, LiteralOrLiteral8::Literal8(_)));
    }
}
