//! Authentication-related types.

use std::{
    fmt::{Display, Formatter},
    str::FromStr,
};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{
    core::{impl_try_from, Atom, AtomError},
    secret::Secret,
};

/// Authentication mechanism (RFC 4422 SASL, plus the extensions this crate knows the name of).
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum AuthMechanism {
    /// `AUTH=PLAIN` (RFC 4616).
    Plain,
    /// `AUTH=LOGIN` (non-standardized, but widely deployed).
    Login,
    /// `AUTH=OAUTHBEARER` (RFC 7628).
    OAuthBearer,
    /// `AUTH=XOAUTH2` (Google, undocumented by an RFC).
    XOAuth2,
    /// `SCRAM-SHA-1` (RFC 5802).
    ScramSha1,
    /// `SCRAM-SHA-1-PLUS` (RFC 5802).
    ScramSha1Plus,
    /// `SCRAM-SHA-256` (RFC 7677).
    ScramSha256,
    /// `SCRAM-SHA-256-PLUS` (RFC 7677).
    ScramSha256Plus,
    /// Some other, unrecognized mechanism name.
    Other(AuthMechanismOther),
}

impl_try_from!(Atom, &str, AuthMechanism);
impl_try_from!(Atom, String, AuthMechanism);

impl From<Atom> for AuthMechanism {
    fn from(atom: Atom) -> Self {
        match atom.as_ref().to_ascii_uppercase().as_str() {
            "PLAIN" => Self::Plain,
            "LOGIN" => Self::Login,
            "OAUTHBEARER" => Self::OAuthBearer,
            "XOAUTH2" => Self::XOAuth2,
            "SCRAM-SHA-1" => Self::ScramSha1,
            "SCRAM-SHA-1-PLUS" => Self::ScramSha1Plus,
            "SCRAM-SHA-256" => Self::ScramSha256,
            "SCRAM-SHA-256-PLUS" => Self::ScramSha256Plus,
            _ => Self::Other(AuthMechanismOther(atom)),
        }
    }
}

impl Display for AuthMechanism {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl AsRef<str> for AuthMechanism {
    fn as_ref(&self) -> &str {
        match self {
            Self::Plain => "PLAIN",
            Self::Login => "LOGIN",
            Self::OAuthBearer => "OAUTHBEARER",
            Self::XOAuth2 => "XOAUTH2",
            Self::ScramSha1 => "SCRAM-SHA-1",
            Self::ScramSha1Plus => "SCRAM-SHA-1-PLUS",
            Self::ScramSha256 => "SCRAM-SHA-256",
            Self::ScramSha256Plus => "SCRAM-SHA-256-PLUS",
            Self::Other(other) => other.0.as_ref(),
        }
    }
}

impl FromStr for AuthMechanism {
    type Err = AtomError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AuthMechanism::try_from(s)
    }
}

/// An authentication mechanism name not recognized as one of [`AuthMechanism`]'s named variants.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AuthMechanismOther(Atom);

impl AuthMechanismOther {
    pub fn inner(&self) -> &Atom {
        &self.0
    }
}

/// A client response line during a SASL challenge/response exchange (`AUTHENTICATE`).
///
/// Holds the raw decoded bytes, never the base64 wire form — encoding happens at the wire layer.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum AuthenticateData {
    /// Continue the SASL exchange with the given response bytes.
    Continue(Secret<Vec<u8>>),
    /// Cancel the exchange by sending a line consisting of a single `*` (RFC 3501).
    Cancel,
}

impl AuthenticateData {
    pub fn r#continue<D>(data: D) -> Self
    where
        D: Into<Vec<u8>>,
    {
        Self::Continue(Secret::new(data.into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conversion_known_mechanisms() {
        assert_eq!(AuthMechanism::try_from("plain").unwrap(), AuthMechanism::Plain);
        assert_eq!(AuthMechanism::try_from("LOGIN").unwrap(), AuthMechanism::Login);
        assert_eq!(
            AuthMechanism::try_from("oauthbearer").unwrap(),
            AuthMechanism::OAuthBearer
        );
        assert_eq!(AuthMechanism::try_from("xoauth2").unwrap(), AuthMechanism::XOAuth2);
    }

    #[test]
    fn test_conversion_unknown_mechanism() {
        let mechanism = AuthMechanism::try_from("xxxplain").unwrap();
        assert!(matches!(mechanism, AuthMechanism::Other(_)));
        assert_eq!(mechanism.as_ref(), "xxxplain");
    }

    #[test]
    fn test_authenticate_data_cancel_vs_continue() {
        let cancel = AuthenticateData::Cancel;
        let cont = AuthenticateData::r#continue(b"response".to_vec());
        assert_ne!(cancel, cont);
    }
}
