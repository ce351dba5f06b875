//! The IMAP `COMPRESS` extension (RFC 4978).
//!
//! This crate only models the capability check and the `COMPRESS` command itself; the DEFLATE
//! framing that wraps the connection afterwards is a transport concern, not a grammar one.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{command::CommandBody, core::Atom};

impl CommandBody {
    pub fn compress(algorithm: CompressionAlgorithm) -> Self {
        CommandBody::Compress { algorithm }
    }
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CompressionAlgorithm {
    Deflate,
}

impl TryFrom<&str> for CompressionAlgorithm {
    type Error = CompressionAlgorithmError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.to_ascii_lowercase().as_str() {
            "deflate" => Ok(Self::Deflate),
            _ => Err(CompressionAlgorithmError::Invalid),
        }
    }
}

impl TryFrom<Atom> for CompressionAlgorithm {
    type Error = CompressionAlgorithmError;

    fn try_from(atom: Atom) -> Result<Self, Self::Error> {
        Self::try_from(atom.as_ref())
    }
}

impl AsRef<str> for CompressionAlgorithm {
    fn as_ref(&self) -> &str {
        match self {
            CompressionAlgorithm::Deflate => "DEFLATE",
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, Error, Hash, Ord, PartialEq, PartialOrd)]
pub enum CompressionAlgorithmError {
    #[error("invalid compression algorithm, allowed value: DEFLATE")]
    Invalid,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conversion() {
        assert_eq!(
            CompressionAlgorithm::try_from("deflate").unwrap(),
            CompressionAlgorithm::Deflate
        );
        assert_eq!(
            CompressionAlgorithm::try_from("DEFLATE").unwrap(),
            CompressionAlgorithm::Deflate
        );
        assert_eq!(CompressionAlgorithm::Deflate.as_ref(), "DEFLATE");
    }

    #[test]
    fn test_conversion_failing() {
        for s in ["", "D", "DEFLATX", "XDEFLATE"] {
            assert!(CompressionAlgorithm::try_from(s).is_err());
        }
    }
}
