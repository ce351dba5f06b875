//! The IMAP `MOVE` extension (RFC 6851).

use crate::{command::CommandBody, extensions::r#move::error::MoveError, mailbox::Mailbox, sequence::SequenceSet};

impl CommandBody {
    /// This extension must only be used when the server advertised support for it by sending the
    /// MOVE capability.
    pub fn r#move<S, M>(sequence_set: S, mailbox: M, uid: bool) -> Result<Self, MoveError<S::Error, M::Error>>
    where
        S: TryInto<SequenceSet>,
        M: TryInto<Mailbox>,
    {
        Ok(CommandBody::Move {
            sequence_set: sequence_set.try_into().map_err(MoveError::Sequence)?,
            mailbox: mailbox.try_into().map_err(MoveError::Mailbox)?,
            uid,
        })
    }
}

pub mod error {
    use thiserror::Error;

    #[derive(Clone, Debug, Eq, Error, Hash, Ord, PartialEq, PartialOrd)]
    pub enum MoveError<S, M> {
        #[error("invalid sequence: {0}")]
        Sequence(S),
        #[error("invalid mailbox: {0}")]
        Mailbox(M),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_move_command() {
        let cmd = CommandBody::r#move(1u32, "INBOX", true).unwrap();
        match cmd {
            CommandBody::Move { uid, .. } => assert!(uid),
            _ => panic!("expected Move"),
        }
    }
}
