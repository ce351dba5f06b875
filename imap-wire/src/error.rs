//! Error taxonomy shared by [`crate::parse`], [`crate::encode`], and [`crate::client`].
//!
//! Per spec.md §7: grammar-validation errors live in `imap-wire-types` and are surfaced at
//! construction time; the encoder is total and never fails; parse errors are fatal for the
//! session; state-machine errors split into a recoverable outbound kind and a fatal inbound kind.

use thiserror::Error;

use crate::types::core::Tag;

/// A fatal parse failure (spec.md §4.4.3). IMAP has no in-band resynchronisation, so once this is
/// returned the driver must close the connection; the parser does not consume further bytes.
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum ParseError {
    #[error("unexpected byte {byte:#04x} at offset {position}")]
    UnexpectedByte { byte: u8, position: usize },

    #[error("integer overflow parsing a number at offset {position}")]
    IntegerOverflow { position: usize },

    #[error("invalid base64 data at offset {position}")]
    InvalidBase64 { position: usize },

    #[error("invalid modified UTF-7 mailbox name at offset {position}")]
    InvalidUtf7 { position: usize },

    #[error("invalid date at offset {position}")]
    InvalidDate { position: usize },

    #[error("literal of {declared} bytes exceeds the configured maximum of {maximum}")]
    LiteralTooLarge { declared: u64, maximum: u64 },

    #[error("grammar violation at offset {position}: {detail}")]
    GrammarViolation { position: usize, detail: String },
}

/// Error returned by [`crate::client::ClientStateMachine::enqueue_command`] when a command part is
/// illegal in the machine's current state. Recoverable: the caller may retry once the state
/// allows it, or drop the command.
#[derive(Clone, Debug, Eq, Error, PartialEq)]
#[error("command not valid in current state ({state}): {reason}")]
pub struct InvalidCommandForState {
    pub state: &'static str,
    pub reason: &'static str,
}

/// Error returned by [`crate::client::ClientStateMachine::receive`] when the server sent
/// something the protocol does not allow in the current state. Fatal: the session must be torn
/// down.
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum UnexpectedResponse {
    #[error("tagged response for unknown tag {tag}")]
    UnknownTag { tag: Tag },

    #[error("response {kind} is not valid while {state}")]
    IllegalInState {
        kind: &'static str,
        state: &'static str,
    },

    #[error("server sent a command-continuation request with nothing outstanding to continue")]
    UnsolicitedContinuation,
}

/// Top-level error a caller driving [`crate::client::ClientStateMachine`] may observe.
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum ClientError {
    #[error(transparent)]
    InvalidCommand(#[from] InvalidCommandForState),

    #[error(transparent)]
    UnexpectedResponse(#[from] UnexpectedResponse),

    #[error(transparent)]
    Parse(#[from] ParseError),
}
