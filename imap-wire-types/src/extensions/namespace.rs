//! The IMAP `NAMESPACE` extension (RFC 2342).
//!
//! Extends [`CommandBody`] with [`CommandBody::Namespace`]; the response-side `Data::Namespace`
//! variant and its `Namespace`/`NamespaceResponseExtension` payload are defined alongside the
//! rest of the untagged response data.

use crate::command::CommandBody;

impl CommandBody {
    /// This extension must only be used when the server advertised support for it by sending the
    /// NAMESPACE capability.
    pub fn namespace() -> Self {
        CommandBody::Namespace
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_namespace_command() {
        assert_eq!(CommandBody::namespace(), CommandBody::Namespace);
    }
}
