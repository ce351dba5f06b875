//! The IMAP `URLAUTH` extension (RFC 4467 URLAUTH, RFC 5092 IMAP URL scheme).
//!
//! Extends [`CommandBody`] with `ResetKey`, `GenUrlAuth`, and `UrlFetch`. An IMAP URL is carried
//! as an opaque [`RUrl`] rather than parsed into its `imapurl` grammar components: nothing in this
//! crate needs to inspect a URL's mailbox/UID/section beyond passing it back to the server.

use std::{
    convert::TryInto,
    fmt::{Display, Formatter},
};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{
    command::CommandBody,
    core::{AString, Atom, AtomError, NonEmptyVec},
    mailbox::Mailbox,
};

impl CommandBody {
    pub fn reset_key<M>(mailbox_and_mechanisms: Option<(M, NonEmptyVec<UrlAuthMechanism>)>) -> Result<Self, M::Error>
    where
        M: TryInto<Mailbox>,
    {
        let mailbox_and_mechanisms = match mailbox_and_mechanisms {
            Some((mailbox, mechanisms)) => Some((mailbox.try_into()?, mechanisms)),
            None => None,
        };

        Ok(CommandBody::ResetKey { mailbox_and_mechanisms })
    }

    pub fn gen_url_auth(requests: NonEmptyVec<UrlAuthRequest>) -> Self {
        CommandBody::GenUrlAuth { requests }
    }

    pub fn url_fetch(urls: NonEmptyVec<RUrl>) -> Self {
        CommandBody::UrlFetch { urls }
    }
}

/// An IMAP URL (RFC 5092), held as its wire-exact `astring` form.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RUrl(AString);

impl RUrl {
    pub fn inner(&self) -> &AString {
        &self.0
    }
}

impl From<AString> for RUrl {
    fn from(value: AString) -> Self {
        Self(value)
    }
}

/// A `GENURLAUTH` request: the URL to authorize, paired with the mechanism to authorize it with.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UrlAuthRequest {
    pub url: RUrl,
    pub mechanism: UrlAuthMechanism,
}

/// `access = ("submit" / "user") SP ...` in RFC 4467's `urlauth-mechanism` is a SASL mechanism
/// name; `INTERNAL` is the only one this crate has a name for, matching the extension's own
/// reserved keyword.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum UrlAuthMechanism {
    Internal,
    Other(UrlAuthMechanismOther),
}

impl From<Atom> for UrlAuthMechanism {
    fn from(atom: Atom) -> Self {
        match atom.as_ref().to_ascii_uppercase().as_str() {
            "INTERNAL" => Self::Internal,
            _ => Self::Other(UrlAuthMechanismOther(atom)),
        }
    }
}

impl TryFrom<&str> for UrlAuthMechanism {
    type Error = AtomError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Ok(Self::from(Atom::try_from(value)?))
    }
}

impl Display for UrlAuthMechanism {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        match self {
            Self::Internal => f.write_str("INTERNAL"),
            Self::Other(other) => write!(f, "{}", other.0),
        }
    }
}

/// A URLAUTH mechanism name not recognized as [`UrlAuthMechanism::Internal`].
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UrlAuthMechanismOther(Atom);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_auth_mechanism_conversion() {
        assert_eq!(UrlAuthMechanism::try_from("INTERNAL").unwrap(), UrlAuthMechanism::Internal);
        assert!(matches!(
            UrlAuthMechanism::try_from("x-other").unwrap(),
            UrlAuthMechanism::Other(_)
        ));
    }

    #[test]
    fn test_reset_key_command_without_mailbox() {
        let cmd = CommandBody::reset_key::<&str>(None).unwrap();
        assert_eq!(cmd, CommandBody::ResetKey { mailbox_and_mechanisms: None });
    }

    #[test]
    fn test_url_fetch_command() {
        let url: RUrl = AString::try_from("/INBOX;UID=17/;URLAUTH=1232;EXPIRE=2022-10-04T23:59:59Z:INTERNAL:abc").unwrap().into();
        let cmd = CommandBody::url_fetch(NonEmptyVec::single(url));
        assert!(matches!(cmd, CommandBody::UrlFetch { .. }));
    }
}
