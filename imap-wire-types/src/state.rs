//! # State and Flow Diagram
//!
//! "Once the connection between client and server is established, an IMAP4rev1 connection is in
//! one of four states. The initial state is identified in the server greeting. Most commands are
//! only valid in certain states. It is a protocol error for the client to attempt a command while
//! the connection is in an inappropriate state, and the server will respond with a BAD or NO
//! (depending upon server implementation) command completion result." (RFC 3501)
//!
//! ```text
//!           +----------------------+
//!           |connection established|
//!           +----------------------+
//!                      ||
//!                      \/
//!    +--------------------------------------+
//!    |          server greeting             |
//!    +--------------------------------------+
//!              || (1)       || (2)        || (3)
//!              \/           ||            ||
//!    +-----------------+    ||            ||
//!    |Not Authenticated|    ||            ||
//!    +-----------------+    ||            ||
//!     || (7)   || (4)       ||            ||
//!     ||       \/           \/            ||
//!     ||     +----------------+           ||
//!     ||     | Authenticated  |<=++       ||
//!     ||     +----------------+  ||       ||
//!     ||       || (7)   || (5)   || (6)   ||
//!     ||       ||       \/       ||       ||
//!     ||       ||    +--------+  ||       ||
//!     ||       ||    |Selected|==++       ||
//!     ||       ||    +--------+           ||
//!     ||       ||       || (7)            ||
//!     \/       \/       \/                \/
//!    +--------------------------------------+
//!    |               Logout                 |
//!    +--------------------------------------+
//!                      ||
//!                      \/
//!        +-------------------------------+
//!        |both sides close the connection|
//!        +-------------------------------+
//!
//! (1) connection without pre-authentication (OK greeting)
//! (2) pre-authenticated connection (PREAUTH greeting)
//! (3) rejected connection (BYE greeting)
//! (4) successful LOGIN or AUTHENTICATE command
//! (5) successful SELECT or EXAMINE command
//! (6) CLOSE command, or failed SELECT or EXAMINE command
//! (7) LOGOUT command, server shutdown, or connection closed
//! ```
//!
//! This is the protocol-level state of the connection — what commands are legal to send next.
//! It is distinct from the client driver's own state machine (idle, awaiting greeting, running,
//! mid-continuation), which layers on top of this and additionally tracks IDLE/AUTHENTICATE/
//! APPEND sub-exchanges.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::mailbox::Mailbox;

/// State of the IMAP4rev1 connection.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ConnectionState {
    /// Credentials must be supplied before most commands are permitted.
    ///
    /// Entered when a connection starts, unless pre-authenticated.
    NotAuthenticated,

    /// Authenticated, but no mailbox is selected yet.
    ///
    /// Entered when a pre-authenticated connection starts, after successful authentication,
    /// after a failed mailbox selection, or after a successful `CLOSE`.
    Authenticated,

    /// A mailbox has been selected and message-affecting commands are permitted.
    Selected(Mailbox),

    /// The connection is being terminated, by either side.
    ///
    /// A server MUST send an untagged `BYE` before closing; a client SHOULD send `LOGOUT`
    /// rather than closing unilaterally.
    Logout,
}

impl ConnectionState {
    pub fn is_authenticated(&self) -> bool {
        matches!(self, Self::Authenticated | Self::Selected(_))
    }

    pub fn selected_mailbox(&self) -> Option<&Mailbox> {
        match self {
            Self::Selected(mailbox) => Some(mailbox),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_authenticated() {
        assert!(!ConnectionState::NotAuthenticated.is_authenticated());
        assert!(ConnectionState::Authenticated.is_authenticated());
        assert!(ConnectionState::Selected(Mailbox::Inbox).is_authenticated());
        assert!(!ConnectionState::Logout.is_authenticated());
    }

    #[test]
    fn test_selected_mailbox() {
        assert_eq!(ConnectionState::Authenticated.selected_mailbox(), None);
        assert_eq!(
            ConnectionState::Selected(Mailbox::Inbox).selected_mailbox(),
            Some(&Mailbox::Inbox)
        );
    }
}
