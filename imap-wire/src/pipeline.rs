//! Component F: the command pipelining policy (spec.md §4.5.3).

use crate::types::command::CommandBody;

/// A command is a barrier when it may not be sent while any other command is outstanding, and no
/// other command may be sent while it is outstanding — it changes the parser mode, or its side
/// effects would race with a concurrently in-flight command.
///
/// Everything not listed here (SEARCH/FETCH/STORE/COPY/MOVE/UID-* and metadata reads) is
/// pipelinable.
pub fn is_barrier(body: &CommandBody) -> bool {
    matches!(
        body,
        CommandBody::Login { .. }
            | CommandBody::Logout
            | CommandBody::StartTls
            | CommandBody::Authenticate { .. }
            | CommandBody::Idle
            | CommandBody::Append { .. }
            | CommandBody::Select { .. }
            | CommandBody::Examine { .. }
            | CommandBody::Close
            | CommandBody::Unselect
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_select_is_a_barrier() {
        assert!(is_barrier(&CommandBody::select("INBOX").unwrap()));
    }

    #[test]
    fn test_fetch_is_pipelinable() {
        let body = CommandBody::fetch(
            "1:*",
            imap_wire_types::fetch::MacroOrMessageDataItemNames::MessageDataItemNames(vec![
                imap_wire_types::fetch::MessageDataItemName::Uid,
            ]),
            true,
        )
        .unwrap();
        assert!(!is_barrier(&body));
    }

    #[test]
    fn test_noop_is_pipelinable() {
        assert!(!is_barrier(&CommandBody::Noop));
    }
}
