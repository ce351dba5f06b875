//! Component E: the client-side connection state machine (spec.md §4.5).
//!
//! [`ClientStateMachine`] is the single point tracking three things at once: the protocol-level
//! [`ConnectionState`] (what commands are legal to send), the set of tagged commands currently
//! in flight plus any deferred behind a barrier (spec.md §4.5.3, [`crate::pipeline`]), and at most
//! one active sub-machine for a command whose wire form spans multiple continuation round-trips
//! (APPEND/AUTHENTICATE/IDLE). It does no I/O itself — callers drive it with events already
//! decoded by [`crate::parse::ResponseParser`] and commands already built with
//! `imap-wire-types::command`.

pub mod append;
pub mod authenticate;
pub mod idle;

use std::collections::VecDeque;

pub use append::AppendSubMachine;
pub use authenticate::AuthenticateSubMachine;
pub use idle::IdleSubMachine;
use imap_wire_types::{
    command::{Command, CommandBody},
    core::Tag,
    response::{GreetingKind, Response, Status},
    state::ConnectionState,
};

use crate::{
    error::{InvalidCommandForState, UnexpectedResponse},
    parse::ResponseEvent,
    pipeline,
};

#[derive(Debug, Clone, PartialEq, Eq)]
enum SubMachine {
    Append(AppendSubMachine),
    Authenticate(AuthenticateSubMachine),
    Idle(IdleSubMachine),
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct InFlight {
    tag: Tag,
    body: CommandBody,
}

/// Outcome of [`ClientStateMachine::enqueue_command`] (spec.md §4.5.1). The `rejected` case of the
/// spec surfaces as `Err(InvalidCommandForState)` instead, matching this crate's error-handling
/// convention of using `Result` for the recoverable outbound error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SendOutcome {
    /// The command was accepted and is now in flight (check `ready_to_send` was not needed).
    Ok,
    /// The command is behind a barrier; it will be returned from [`ClientStateMachine::ready_to_send`]
    /// once it may be sent.
    Deferred,
}

/// Outcome of [`ClientStateMachine::receive`] (spec.md §4.5.2).
#[derive(Debug, Clone, PartialEq)]
pub enum ReceiveOutcome {
    /// The event should be surfaced to the caller. `completed_tag` is set when this was the
    /// tagged response completing an in-flight command.
    Deliver {
        event: ResponseEvent,
        completed_tag: Option<Tag>,
    },
    /// The event updated internal sub-machine state but carries nothing the caller needs to see
    /// (e.g. the continuation request that merely acknowledges `IDLE` has started).
    Consumed,
}

/// Tracks one IMAP connection's client-side state: protocol state, in-flight/deferred commands,
/// and any active APPEND/AUTHENTICATE/IDLE sub-machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientStateMachine {
    state: ConnectionState,
    in_flight: VecDeque<InFlight>,
    deferred: VecDeque<Command>,
    sub: Option<SubMachine>,
}

impl ClientStateMachine {
    /// `state` is usually [`ConnectionState::NotAuthenticated`]; pass the state implied by a
    /// PREAUTH greeting if the caller already knows it, or update it later via
    /// [`ClientStateMachine::receive`] with the decoded [`imap_wire_types::response::Greeting`].
    pub fn new(state: ConnectionState) -> Self {
        Self {
            state,
            in_flight: VecDeque::new(),
            deferred: VecDeque::new(),
            sub: None,
        }
    }

    pub fn state(&self) -> &ConnectionState {
        &self.state
    }

    /// `true` while the encoder must not write anything further: a sub-machine is waiting on a
    /// continuation request, or on the server's answer to an AUTHENTICATE challenge.
    pub fn is_waiting_for_continuation_request(&self) -> bool {
        match &self.sub {
            Some(SubMachine::Append(sub)) => sub.is_awaiting_continuation(),
            Some(SubMachine::Authenticate(_)) => true,
            Some(SubMachine::Idle(sub)) => sub.is_awaiting_start_ack(),
            None => false,
        }
    }

    /// The in-progress APPEND sub-machine, if one is active, so the caller can drive its
    /// `begin_message`/`message_bytes`/catenate methods.
    pub fn append(&mut self) -> Option<&mut AppendSubMachine> {
        match &mut self.sub {
            Some(SubMachine::Append(sub)) => Some(sub),
            _ => None,
        }
    }

    /// The in-progress AUTHENTICATE sub-machine, if one is active.
    pub fn authenticate(&mut self) -> Option<&mut AuthenticateSubMachine> {
        match &mut self.sub {
            Some(SubMachine::Authenticate(sub)) => Some(sub),
            _ => None,
        }
    }

    /// The in-progress IDLE sub-machine, if one is active.
    pub fn idle(&mut self) -> Option<&mut IdleSubMachine> {
        match &mut self.sub {
            Some(SubMachine::Idle(sub)) => Some(sub),
            _ => None,
        }
    }

    /// `sendCommand` (spec.md §4.5.1): accepts `command` into the pipeline, or queues it behind a
    /// barrier. Rejects outright only when the connection has begun logging out.
    pub fn enqueue_command(&mut self, command: Command) -> Result<SendOutcome, InvalidCommandForState> {
        if matches!(self.state, ConnectionState::Logout) {
            return Err(InvalidCommandForState {
                state: "logout",
                reason: "no command may be sent once LOGOUT has begun",
            });
        }

        let barrier = pipeline::is_barrier(&command.body);
        let must_defer = if barrier {
            !self.in_flight.is_empty()
        } else {
            self.in_flight.iter().any(|c| pipeline::is_barrier(&c.body))
        };

        if must_defer {
            self.deferred.push_back(command);
            return Ok(SendOutcome::Deferred);
        }

        self.start(command);
        Ok(SendOutcome::Ok)
    }

    /// Pops and starts the next deferred command that the pipelining policy now allows to be
    /// sent, if any. The caller is responsible for actually encoding and transmitting it; poll
    /// this after every [`ClientStateMachine::receive`] that completes a command.
    pub fn ready_to_send(&mut self) -> Option<Command> {
        let front_is_sendable = match self.deferred.front() {
            Some(command) if self.in_flight.is_empty() => {
                let _ = command;
                true
            }
            Some(command) if !pipeline::is_barrier(&command.body) => !self.in_flight.iter().any(|c| pipeline::is_barrier(&c.body)),
            _ => false,
        };

        if !front_is_sendable {
            return None;
        }

        let command = self.deferred.pop_front().expect("front_is_sendable implies non-empty");
        self.start(command.clone());
        Some(command)
    }

    fn start(&mut self, command: Command) {
        self.sub = match &command.body {
            CommandBody::Append { .. } => Some(SubMachine::Append(AppendSubMachine::new())),
            CommandBody::Authenticate { mechanism, .. } => Some(SubMachine::Authenticate(AuthenticateSubMachine::new(mechanism.clone()))),
            CommandBody::Idle => Some(SubMachine::Idle(IdleSubMachine::new())),
            _ => None,
        };
        self.in_flight.push_back(InFlight {
            tag: command.tag,
            body: command.body,
        });
    }

    /// `receiveResponse` (spec.md §4.5.2).
    pub fn receive(&mut self, event: ResponseEvent) -> Result<ReceiveOutcome, UnexpectedResponse> {
        if let ResponseEvent::Greeting(greeting) = &event {
            self.state = match greeting.kind {
                GreetingKind::Ok => ConnectionState::NotAuthenticated,
                GreetingKind::PreAuth => ConnectionState::Authenticated,
                GreetingKind::Bye => ConnectionState::Logout,
            };
            return Ok(ReceiveOutcome::Deliver { event, completed_tag: None });
        }

        if let ResponseEvent::Response(Response::Continue(_)) = &event {
            return Ok(if self.receive_continue()? {
                ReceiveOutcome::Consumed
            } else {
                ReceiveOutcome::Deliver { event, completed_tag: None }
            });
        }

        if let ResponseEvent::Response(Response::Status(status)) = &event {
            let completed_tag = self.receive_status(status)?;
            return Ok(ReceiveOutcome::Deliver { event, completed_tag });
        }

        Ok(ReceiveOutcome::Deliver { event, completed_tag: None })
    }

    /// Routes a continuation request to whichever sub-machine is waiting for it. Returns `true`
    /// when the event should be consumed rather than delivered (spec.md §4.5.2's idle-started
    /// example).
    fn receive_continue(&mut self) -> Result<bool, UnexpectedResponse> {
        match self.sub.as_mut() {
            Some(SubMachine::Append(sub)) => {
                sub.on_continue();
                Ok(false)
            }
            Some(SubMachine::Authenticate(sub)) => {
                sub.on_challenge();
                Ok(false)
            }
            Some(SubMachine::Idle(sub)) => {
                sub.on_continue()?;
                Ok(true)
            }
            None => Err(UnexpectedResponse::UnsolicitedContinuation),
        }
    }

    fn receive_status(&mut self, status: &Status) -> Result<Option<Tag>, UnexpectedResponse> {
        let tag = match status.tag() {
            Some(tag) => tag.clone(),
            None => {
                if status.is_bye() {
                    self.state = ConnectionState::Logout;
                }
                return Ok(None);
            }
        };

        let pos = self
            .in_flight
            .iter()
            .position(|c| c.tag == tag)
            .ok_or_else(|| UnexpectedResponse::UnknownTag { tag: tag.clone() })?;
        let entry = self.in_flight.remove(pos).expect("position was just found");

        if pipeline::is_barrier(&entry.body) {
            self.sub = None;
        }

        match status {
            Status::Ok { .. } => self.apply_command_success(&entry.body),
            Status::No { .. } | Status::Bad { .. } => self.apply_command_failure(&entry.body),
            Status::Bye { .. } => unreachable!("Status::Bye has no tag"),
        }

        Ok(Some(tag))
    }

    /// RFC 3501 §3's numbered connection-state transitions (4), (5), (6), (7), reproduced in
    /// [`imap_wire_types::state::ConnectionState`]'s own doc comments.
    fn apply_command_success(&mut self, body: &CommandBody) {
        match body {
            CommandBody::Login { .. } | CommandBody::Authenticate { .. } => {
                self.state = ConnectionState::Authenticated;
            }
            CommandBody::Select { mailbox } | CommandBody::Examine { mailbox } => {
                self.state = ConnectionState::Selected(mailbox.clone());
            }
            CommandBody::Close | CommandBody::Unselect => {
                self.state = ConnectionState::Authenticated;
            }
            CommandBody::Logout => {
                self.state = ConnectionState::Logout;
            }
            _ => {}
        }
    }

    fn apply_command_failure(&mut self, body: &CommandBody) {
        if matches!(body, CommandBody::Select { .. } | CommandBody::Examine { .. }) {
            self.state = ConnectionState::Authenticated;
        }
    }
}

#[cfg(test)]
mod tests {
    use imap_wire_types::{
        core::Tag,
        response::{Code, Continue, Greeting},
    };

    use super::*;

    fn tag(s: &str) -> Tag {
        Tag::try_from(s).unwrap()
    }

    #[test]
    fn test_greeting_sets_not_authenticated() {
        let mut client = ClientStateMachine::new(ConnectionState::NotAuthenticated);
        let greeting = Greeting::ok(None, "ready").unwrap();
        client.receive(ResponseEvent::Greeting(greeting)).unwrap();
        assert_eq!(client.state(), &ConnectionState::NotAuthenticated);
    }

    #[test]
    fn test_select_is_a_barrier_and_transitions_on_success() {
        let mut client = ClientStateMachine::new(ConnectionState::Authenticated);
        let command = Command::new("A1", CommandBody::select("INBOX").unwrap()).unwrap();
        assert_eq!(client.enqueue_command(command).unwrap(), SendOutcome::Ok);

        let second = Command::new("A2", CommandBody::Noop).unwrap();
        assert_eq!(client.enqueue_command(second).unwrap(), SendOutcome::Deferred);

        let status = Status::ok(Some(tag("A1")), None, "done").unwrap();
        let outcome = client.receive(ResponseEvent::Response(Response::Status(status))).unwrap();
        assert!(matches!(outcome, ReceiveOutcome::Deliver { completed_tag: Some(ref t), .. } if *t == tag("A1")));
        assert_eq!(client.state(), &ConnectionState::Selected(imap_wire_types::mailbox::Mailbox::Inbox));

        let ready = client.ready_to_send().unwrap();
        assert_eq!(ready.tag, tag("A2"));
    }

    #[test]
    fn test_unknown_tag_is_rejected() {
        let mut client = ClientStateMachine::new(ConnectionState::Authenticated);
        let status = Status::ok(Some(tag("ZZZ")), None, "done").unwrap();
        assert!(client.receive(ResponseEvent::Response(Response::Status(status))).is_err());
    }

    #[test]
    fn test_idle_continuation_is_consumed() {
        let mut client = ClientStateMachine::new(ConnectionState::Selected(imap_wire_types::mailbox::Mailbox::Inbox));
        let command = Command::new("A1", CommandBody::Idle).unwrap();
        client.enqueue_command(command).unwrap();

        let cont = ResponseEvent::Response(Response::Continue(Continue::base64(Vec::new())));
        let outcome = client.receive(cont).unwrap();
        assert_eq!(outcome, ReceiveOutcome::Consumed);
        assert!(!client.is_waiting_for_continuation_request());

        client.idle().unwrap().idle_done().unwrap();
        let status = Status::ok(Some(tag("A1")), None, "done").unwrap();
        client.receive(ResponseEvent::Response(Response::Status(status))).unwrap();
        assert!(client.append().is_none());
    }

    #[test]
    fn test_pipelinable_fetch_does_not_wait_behind_unrelated_command() {
        let mut client = ClientStateMachine::new(ConnectionState::Selected(imap_wire_types::mailbox::Mailbox::Inbox));
        let fetch_body = CommandBody::fetch(
            "1:*",
            imap_wire_types::fetch::MacroOrMessageDataItemNames::MessageDataItemNames(vec![
                imap_wire_types::fetch::MessageDataItemName::Uid,
            ]),
            false,
        )
        .unwrap();
        let c1 = Command::new("A1", fetch_body.clone()).unwrap();
        let c2 = Command::new("A2", fetch_body).unwrap();
        assert_eq!(client.enqueue_command(c1).unwrap(), SendOutcome::Ok);
        assert_eq!(client.enqueue_command(c2).unwrap(), SendOutcome::Ok);
    }

    #[test]
    fn test_code_import_is_reachable() {
        let _: Option<Code> = None;
    }
}
