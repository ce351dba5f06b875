//! IDLE sub-machine (spec.md §4.5.6, RFC 2177).

use crate::error::{InvalidCommandForState, UnexpectedResponse};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    /// `tag IDLE` has been sent; awaiting the continuation request that acknowledges it.
    Starting,
    /// The continuation arrived; the caller may send `idleDone`.
    Idling,
    /// `DONE\r\n` has been written; awaiting the tagged response to the original `IDLE`.
    DoneSent,
}

/// Mid-flight state of one `IDLE` command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IdleSubMachine {
    state: State,
}

impl IdleSubMachine {
    pub(crate) fn new() -> Self {
        Self { state: State::Starting }
    }

    pub(crate) fn is_awaiting_start_ack(&self) -> bool {
        matches!(self.state, State::Starting)
    }

    /// The server's continuation request acknowledging `IDLE`. Per spec.md §4.5.2 this is the
    /// synthetic idle-started event that is consumed rather than delivered to the caller.
    pub(crate) fn on_continue(&mut self) -> Result<(), UnexpectedResponse> {
        match self.state {
            State::Starting => {
                self.state = State::Idling;
                Ok(())
            }
            _ => Err(UnexpectedResponse::IllegalInState {
                kind: "continuation",
                state: "idling",
            }),
        }
    }

    /// Call once `DONE\r\n` has been written.
    pub fn idle_done(&mut self) -> Result<(), InvalidCommandForState> {
        match self.state {
            State::Idling => {
                self.state = State::DoneSent;
                Ok(())
            }
            _ => Err(InvalidCommandForState {
                state: "idling",
                reason: "idleDone sent before the IDLE continuation was acknowledged, or twice",
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_idle_happy_path() {
        let mut sub = IdleSubMachine::new();
        assert!(sub.is_awaiting_start_ack());
        sub.on_continue().unwrap();
        assert!(!sub.is_awaiting_start_ack());
        sub.idle_done().unwrap();
        assert!(sub.idle_done().is_err());
    }

    #[test]
    fn test_second_continuation_while_idling_is_rejected() {
        let mut sub = IdleSubMachine::new();
        sub.on_continue().unwrap();
        assert!(sub.on_continue().is_err());
    }
}
