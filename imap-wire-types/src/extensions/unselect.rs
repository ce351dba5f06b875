//! The IMAP `UNSELECT` extension (RFC 3691).

use crate::command::CommandBody;

impl CommandBody {
    /// This extension must only be used when the server advertised support for it by sending the
    /// UNSELECT capability.
    pub fn unselect() -> Self {
        CommandBody::Unselect
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unselect_command() {
        assert_eq!(CommandBody::unselect(), CommandBody::Unselect);
    }
}
