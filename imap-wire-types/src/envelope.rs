//! Envelope-related types.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::core::NString;

/// An envelope structure, as returned by `FETCH ENVELOPE`: `(date subject from sender reply-to
/// to cc bcc in-reply-to message-id)`.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Envelope {
    pub date: NString,
    pub subject: NString,
    pub from: Vec<Address>,
    pub sender: Vec<Address>,
    pub reply_to: Vec<Address>,
    pub to: Vec<Address>,
    pub cc: Vec<Address>,
    pub bcc: Vec<Address>,
    pub in_reply_to: NString,
    pub message_id: NString,
}

/// An address structure describes an electronic mail address.
///
/// `mailbox` NIL indicates end of an RFC 2822 group; if non-NIL and `host` is NIL, `mailbox`
/// holds the RFC 2822 group name instead of a local-part. `host` NIL indicates RFC 2822 group
/// syntax; otherwise it holds the domain name.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Address {
    /// Personal name.
    pub name: NString,
    /// At-domain-list (source route).
    pub adl: NString,
    /// Mailbox name.
    pub mailbox: NString,
    /// Host name.
    pub host: NString,
}
