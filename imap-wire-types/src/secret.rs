//! Handling of secret values.
//!
//! `Secret<T>` ensures that sensitive values (passwords, SASL responses) are not `Debug`-printed
//! by accident, and that equality comparison runs in constant time.

use std::fmt::{Debug, Formatter};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use subtle::ConstantTimeEq;

/// A wrapper that redacts its contents on `Debug` and compares in constant time.
#[cfg_attr(feature = "serde", derive(Deserialize, Serialize))]
#[allow(clippy::derived_hash_with_manual_eq)]
#[derive(Clone, Hash)]
pub struct Secret<T>(T);

impl<T> Secret<T> {
    pub fn new(inner: T) -> Self {
        Self(inner)
    }

    /// Expose the inner secret.
    pub fn declassify(&self) -> &T {
        &self.0
    }
}

impl<T> From<T> for Secret<T> {
    fn from(value: T) -> Self {
        Self::new(value)
    }
}

impl<T> Debug for Secret<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "/* REDACTED */")
    }
}

impl<T> Eq for Secret<T> where T: AsRef<[u8]> {}

impl<T> PartialEq for Secret<T>
where
    T: AsRef<[u8]>,
{
    fn eq(&self, other: &Self) -> bool {
        self.0.as_ref().ct_eq(other.0.as_ref()).unwrap_u8() == 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_secret_is_redacted() {
        let secret = Secret::new("xyz123");
        let debugged = format!("{:?}", secret);
        assert_eq!(debugged, "/* REDACTED */");
        assert!(!debugged.contains("xyz123"));
    }

    #[test]
    fn test_secret_eq_compares_inner_value() {
        assert_eq!(Secret::new(b"same".to_vec()), Secret::new(b"same".to_vec()));
        assert_ne!(Secret::new(b"a".to_vec()), Secret::new(b"b".to_vec()));
    }

    #[test]
    fn test_secret_declassify() {
        let secret = Secret::new(vec![1u8, 2, 3]);
        assert_eq!(secret.declassify(), &vec![1u8, 2, 3]);
    }
}
