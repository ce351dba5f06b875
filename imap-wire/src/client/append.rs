//! APPEND sub-machine (spec.md §4.5.4).
//!
//! Tracks which piece of a multi-part `APPEND` command line the caller is allowed to write next,
//! mirroring the shape `crate::encode::command::CommandStreamPart`'s `Append*` variants already
//! encode: a single literal, or a `CATENATE` list of URL/data parts.

use crate::error::InvalidCommandForState;

#[derive(Debug, Clone, PartialEq, Eq)]
enum State {
    /// `tag APPEND mailbox` has been sent; no message form chosen yet.
    Started,
    /// The single-literal message's header (`{N}\r\n`) has been sent; awaiting the server's `+`.
    AwaitingLiteralContinuation { byte_count: u64 },
    /// The continuation arrived; `remaining` message bytes are still to be written.
    StreamingMessageBytes { remaining: u64 },
    /// The literal body has been fully written.
    MessageFinished,
    /// `CATENATE (` has been sent and we are between parts (or at the very start of the list).
    BetweenCatenateParts,
    /// A catenate `TEXT` part's literal header has been sent; awaiting the server's `+`.
    AwaitingCatenateLiteralContinuation { byte_count: u64 },
    /// The continuation arrived; `remaining` bytes of this catenate part are still to be written.
    StreamingCatenateBytes { remaining: u64 },
    /// All parts written, `)` sent.
    CatenateFinished,
}

/// Mid-flight state of one `APPEND` command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppendSubMachine {
    state: State,
}

impl AppendSubMachine {
    pub(crate) fn new() -> Self {
        Self { state: State::Started }
    }

    pub(crate) fn is_awaiting_continuation(&self) -> bool {
        matches!(
            self.state,
            State::AwaitingLiteralContinuation { .. } | State::AwaitingCatenateLiteralContinuation { .. }
        )
    }

    /// Call once the single-literal message's `{N}\r\n` header has been written.
    pub fn begin_message(&mut self, byte_count: u64) -> Result<(), InvalidCommandForState> {
        match self.state {
            State::Started => {
                self.state = State::AwaitingLiteralContinuation { byte_count };
                Ok(())
            }
            _ => Err(reject("beginMessage is only valid right after APPEND's mailbox argument")),
        }
    }

    /// Call once `len` bytes of the message literal have been written. Transitions to
    /// `messageFinished` once `remaining` reaches zero.
    pub fn message_bytes(&mut self, len: u64) -> Result<(), InvalidCommandForState> {
        match &mut self.state {
            State::StreamingMessageBytes { remaining } if *remaining >= len => {
                *remaining -= len;
                if *remaining == 0 {
                    self.state = State::MessageFinished;
                }
                Ok(())
            }
            _ => Err(reject("messageBytes sent before the literal continuation was acknowledged, or past the declared length")),
        }
    }

    /// Call once `CATENATE (` has been written in place of a single literal.
    pub fn begin_catenate(&mut self) -> Result<(), InvalidCommandForState> {
        match self.state {
            State::Started => {
                self.state = State::BetweenCatenateParts;
                Ok(())
            }
            _ => Err(reject("beginCatenate is only valid right after APPEND's mailbox argument")),
        }
    }

    /// Call once a `URL` catenate part has been written.
    pub fn catenate_url(&mut self) -> Result<(), InvalidCommandForState> {
        match self.state {
            State::BetweenCatenateParts => Ok(()),
            _ => Err(reject("catenateURL is not valid in the middle of a data literal")),
        }
    }

    /// Call once a catenate `TEXT` part's literal header has been written.
    pub fn begin_catenate_data(&mut self, byte_count: u64) -> Result<(), InvalidCommandForState> {
        match self.state {
            State::BetweenCatenateParts => {
                self.state = State::AwaitingCatenateLiteralContinuation { byte_count };
                Ok(())
            }
            _ => Err(reject("catenateData is not valid in the middle of another data literal")),
        }
    }

    /// Call once `len` bytes of a catenate data part's literal have been written.
    pub fn catenate_bytes(&mut self, len: u64) -> Result<(), InvalidCommandForState> {
        match &mut self.state {
            State::StreamingCatenateBytes { remaining } if *remaining >= len => {
                *remaining -= len;
                if *remaining == 0 {
                    self.state = State::BetweenCatenateParts;
                }
                Ok(())
            }
            _ => Err(reject("catenateBytes sent before the literal continuation was acknowledged, or past the declared length")),
        }
    }

    /// Call once the closing `)` of the `CATENATE` list has been written.
    pub fn end_catenate(&mut self) -> Result<(), InvalidCommandForState> {
        match self.state {
            State::BetweenCatenateParts => {
                self.state = State::CatenateFinished;
                Ok(())
            }
            _ => Err(reject("endCatenate is not valid in the middle of a data literal")),
        }
    }

    /// The server's continuation request for whichever literal is currently pending. Untagged
    /// responses arriving mid-APPEND (spec.md §4.5.4) never reach this method.
    pub(crate) fn on_continue(&mut self) {
        self.state = match self.state {
            State::AwaitingLiteralContinuation { byte_count } => State::StreamingMessageBytes { remaining: byte_count },
            State::AwaitingCatenateLiteralContinuation { byte_count } => State::StreamingCatenateBytes { remaining: byte_count },
            ref other => other.clone(),
        };
    }
}

fn reject(reason: &'static str) -> InvalidCommandForState {
    InvalidCommandForState { state: "append", reason }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_literal_happy_path() {
        let mut sub = AppendSubMachine::new();
        sub.begin_message(3).unwrap();
        assert!(sub.is_awaiting_continuation());
        sub.on_continue();
        assert!(!sub.is_awaiting_continuation());
        sub.message_bytes(2).unwrap();
        sub.message_bytes(1).unwrap();
        assert_eq!(sub.state, State::MessageFinished);
    }

    #[test]
    fn test_message_bytes_before_continuation_is_rejected() {
        let mut sub = AppendSubMachine::new();
        sub.begin_message(3).unwrap();
        assert!(sub.message_bytes(1).is_err());
    }

    #[test]
    fn test_catenate_url_rejected_mid_data_literal() {
        let mut sub = AppendSubMachine::new();
        sub.begin_catenate().unwrap();
        sub.begin_catenate_data(5).unwrap();
        sub.on_continue();
        assert!(sub.catenate_url().is_err());
        sub.catenate_bytes(5).unwrap();
        sub.catenate_url().unwrap();
    }
}
