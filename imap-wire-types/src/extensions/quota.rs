//! The IMAP `QUOTA` extension (RFC 9208).
//!
//! Extends [`CommandBody`] with `GetQuota`/`GetQuotaRoot`/`SetQuota`, and (on the response side,
//! not modeled here) `Data` with `Quota`/`QuotaRoot` and `Code` with `OverQuota`.

use std::{
    convert::TryInto,
    fmt::{Display, Formatter},
};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    command::CommandBody,
    core::{AString, Atom, AtomError},
    mailbox::Mailbox,
};

impl CommandBody {
    pub fn get_quota<A>(root: A) -> Result<Self, A::Error>
    where
        A: TryInto<AString>,
    {
        Ok(CommandBody::GetQuota {
            root: root.try_into()?,
        })
    }

    pub fn get_quota_root<M>(mailbox: M) -> Result<Self, M::Error>
    where
        M: TryInto<Mailbox>,
    {
        Ok(CommandBody::GetQuotaRoot {
            mailbox: mailbox.try_into()?,
        })
    }

    pub fn set_quota<R>(root: R, quotas: Vec<QuotaSet>) -> Result<Self, R::Error>
    where
        R: TryInto<AString>,
    {
        Ok(CommandBody::SetQuota {
            root: root.try_into()?,
            quotas,
        })
    }
}

/// A resource type for IMAP's QUOTA extension.
///
/// Supported resource names other than the ones listed here must be advertised as a capability by
/// prepending the resource name with `QUOTA=RES-`.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Resource {
    /// Physical space, in units of 1024 octets, used by the mailboxes governed by the quota root.
    Storage,
    /// The number of messages stored within the mailboxes governed by the quota root.
    Message,
    /// The number of mailboxes governed by the quota root.
    Mailbox,
    /// The maximum size, in units of 1024 octets, of all annotations (RFC 5257) on all messages.
    AnnotationStorage,
    Other(ResourceOther),
}

impl From<Atom> for Resource {
    fn from(value: Atom) -> Self {
        match value.inner().to_ascii_lowercase().as_str() {
            "storage" => Resource::Storage,
            "message" => Resource::Message,
            "mailbox" => Resource::Mailbox,
            "annotation-storage" => Resource::AnnotationStorage,
            _ => Resource::Other(ResourceOther(value)),
        }
    }
}

impl TryFrom<&str> for Resource {
    type Error = AtomError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Ok(Self::from(Atom::try_from(value)?))
    }
}

impl Display for Resource {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        match self {
            Resource::Storage => f.write_str("STORAGE"),
            Resource::Message => f.write_str("MESSAGE"),
            Resource::Mailbox => f.write_str("MAILBOX"),
            Resource::AnnotationStorage => f.write_str("ANNOTATION-STORAGE"),
            Resource::Other(other) => write!(f, "{}", other.0.inner()),
        }
    }
}

/// A resource name not recognized as one of [`Resource`]'s named variants.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResourceOther(Atom);

impl ResourceOther {
    pub fn verify(value: impl AsRef<[u8]>) -> Result<(), ResourceOtherError> {
        if matches!(
            value.as_ref().to_ascii_lowercase().as_slice(),
            b"storage" | b"message" | b"mailbox" | b"annotation-storage",
        ) {
            return Err(ResourceOtherError::Reserved);
        }

        Ok(())
    }
}

impl TryFrom<Atom> for ResourceOther {
    type Error = ResourceOtherError;

    fn try_from(atom: Atom) -> Result<Self, Self::Error> {
        Self::verify(atom.as_ref())?;
        Ok(Self(atom))
    }
}

impl TryFrom<&str> for ResourceOther {
    type Error = ResourceOtherError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::try_from(Atom::try_from(value)?)
    }
}

#[derive(Clone, Debug, Eq, Error, Hash, Ord, PartialEq, PartialOrd)]
pub enum ResourceOtherError {
    #[error(transparent)]
    Atom(#[from] AtomError),
    #[error("reserved, please use one of the named Resource variants")]
    Reserved,
}

/// A resource name, usage, and limit, as returned in a `QUOTA` response.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QuotaGet {
    pub resource: Resource,
    pub usage: u64,
    pub limit: u64,
}

impl QuotaGet {
    pub fn new(resource: Resource, usage: u64, limit: u64) -> Self {
        Self {
            resource,
            usage,
            limit,
        }
    }
}

/// A resource name and limit, as sent in `SETQUOTA`.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QuotaSet {
    pub resource: Resource,
    pub limit: u64,
}

impl QuotaSet {
    pub fn new(resource: Resource, limit: u64) -> Self {
        Self { resource, limit }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resource_conversion() {
        assert_eq!(Resource::try_from("storage").unwrap(), Resource::Storage);
        assert_eq!(Resource::try_from("MESSAGE").unwrap(), Resource::Message);
        assert!(matches!(Resource::try_from("x-custom").unwrap(), Resource::Other(_)));
    }

    #[test]
    fn test_resource_other_rejects_reserved_names() {
        assert!(matches!(
            ResourceOther::try_from("storage"),
            Err(ResourceOtherError::Reserved)
        ));
        assert!(ResourceOther::try_from("x-custom").is_ok());
    }

    #[test]
    fn test_get_quota_command() {
        let cmd = CommandBody::get_quota("INBOX").unwrap();
        assert_eq!(cmd, CommandBody::GetQuota { root: "INBOX".try_into().unwrap() });
    }

    #[test]
    fn test_set_quota_command() {
        let cmd = CommandBody::set_quota(
            "INBOX",
            vec![QuotaSet::new(Resource::Storage, 256)],
        )
        .unwrap();
        match cmd {
            CommandBody::SetQuota { quotas, .. } => assert_eq!(quotas.len(), 1),
            _ => panic!("expected SetQuota"),
        }
    }
}
