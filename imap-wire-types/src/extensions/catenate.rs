//! The IMAP `CATENATE` extension (RFC 4469): building an `APPEND`ed message from a sequence of
//! URL and literal fragments instead of a single literal.
//!
//! `catenate = "CATENATE" SP "(" cat-part *(SP cat-part) ")"`, `cat-part = text-part / url-part`.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::core::{AString, Literal};

/// One fragment of a `CATENATE`d `APPEND` message.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CatenatePart {
    /// `url-part = "URL" SP url-literal`: a fragment fetched by the server from an (authorized)
    /// IMAP URL, typically a previously `URLAUTH`-authorized `RUrl`.
    Url(AString),
    /// `text-part = "TEXT" SP literal`: a fragment supplied inline as a literal.
    Text(Literal),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catenate_part_variants() {
        let url = CatenatePart::Url(AString::try_from("/INBOX;UIDVALIDITY=1/;UID=1/;SECTION=1.2").unwrap());
        assert!(matches!(url, CatenatePart::Url(_)));

        let text = CatenatePart::Text(Literal::new(b"more text".to_vec()).unwrap());
        assert!(matches!(text, CatenatePart::Text(_)));
    }
}
