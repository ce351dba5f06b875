//! AUTHENTICATE sub-machine (spec.md §4.5.5).
//!
//! This crate does not speak SASL itself — [`imap_wire_types::auth::AuthenticateData`] is a bare
//! byte wrapper the caller fills in. The sub-machine only tracks whose turn it is to talk, so
//! [`super::ClientStateMachine`] can reject a second `continuationResponse` sent before the next
//! challenge arrives.

use imap_wire_types::auth::AuthMechanism;

use crate::error::InvalidCommandForState;

#[derive(Debug, Clone, PartialEq, Eq)]
enum State {
    /// Command line sent; awaiting either the first challenge or an immediate tagged response.
    AwaitingFirstChallengeOrDone,
    /// A challenge arrived; the caller must answer with `continuationResponse` or `cancel`.
    AwaitingClientResponse,
    /// The caller answered; awaiting the server's next challenge (or the tagged response).
    AwaitingNextChallenge,
}

/// Mid-flight state of one `AUTHENTICATE` command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticateSubMachine {
    mechanism: AuthMechanism,
    state: State,
}

impl AuthenticateSubMachine {
    pub(crate) fn new(mechanism: AuthMechanism) -> Self {
        Self {
            mechanism,
            state: State::AwaitingFirstChallengeOrDone,
        }
    }

    pub fn mechanism(&self) -> &AuthMechanism {
        &self.mechanism
    }

    /// The server sent a continuation request carrying the next challenge.
    pub(crate) fn on_challenge(&mut self) {
        self.state = State::AwaitingClientResponse;
    }

    /// Call once a `continuationResponse`/`cancel` command part has been written.
    pub fn client_responded(&mut self) -> Result<(), InvalidCommandForState> {
        match self.state {
            State::AwaitingClientResponse => {
                self.state = State::AwaitingNextChallenge;
                Ok(())
            }
            _ => Err(InvalidCommandForState {
                state: "authenticate",
                reason: "no challenge is outstanding to respond to",
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_challenge_response_cycle() {
        let mut sub = AuthenticateSubMachine::new(AuthMechanism::Plain);
        assert!(sub.client_responded().is_err());
        sub.on_challenge();
        sub.client_responded().unwrap();
        assert!(sub.client_responded().is_err());
        sub.on_challenge();
        sub.client_responded().unwrap();
    }
}
