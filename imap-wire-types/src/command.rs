//! The client command grammar.

use std::convert::TryInto;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{
    auth::AuthMechanism,
    command::error::{AppendError, CopyError, ListError, LoginError, RenameError},
    core::{AString, Charset, NonEmptyVec, Tag},
    datetime::InternalDate,
    extensions::{
        binary::LiteralOrLiteral8, catenate::CatenatePart, compress::CompressionAlgorithm,
        enable::CapabilityEnable, quota::QuotaSet, sort::SortCriterion,
        thread::ThreadingAlgorithm, urlauth::RUrl,
    },
    fetch::MacroOrMessageDataItemNames,
    flag::{Flag, StoreResponse, StoreType},
    mailbox::{ListMailbox, Mailbox},
    search::SearchKey,
    secret::Secret,
    sequence::SequenceSet,
    status::StatusDataItemName,
};

/// A tagged client command: a [`Tag`] paired with the command itself.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Command {
    pub tag: Tag,
    pub body: CommandBody,
}

impl Command {
    pub fn new<T>(tag: T, body: CommandBody) -> Result<Self, T::Error>
    where
        T: TryInto<Tag>,
    {
        Ok(Self {
            tag: tag.try_into()?,
            body,
        })
    }

    pub fn name(&self) -> &'static str {
        self.body.name()
    }
}

/// The body of a tagged command, as defined by the `command` grammar production (plus the
/// extensions this crate knows about).
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CommandBody {
    // # Client Commands - Any State

    /// `CAPABILITY` (RFC 3501 §6.1.1)
    Capability,

    /// `NOOP` (RFC 3501 §6.1.2)
    Noop,

    /// `LOGOUT` (RFC 3501 §6.1.3)
    Logout,

    /// `STARTTLS` (RFC 3501 §6.2.1)
    StartTls,

    /// `AUTHENTICATE` (RFC 3501 §6.2.2)
    Authenticate {
        mechanism: AuthMechanism,
        /// SASL-IR (RFC 4959): initial response piggybacked on the `AUTHENTICATE` command line
        /// itself, skipping the first server challenge round-trip.
        initial_response: Option<Secret<Vec<u8>>>,
    },

    /// `LOGIN` (RFC 3501 §6.2.3)
    Login {
        username: AString,
        password: Secret<AString>,
    },

    // # Client Commands - Authenticated State

    /// `SELECT` (RFC 3501 §6.3.1)
    Select { mailbox: Mailbox },

    /// `UNSELECT` (RFC 3691)
    Unselect,

    /// `EXAMINE` (RFC 3501 §6.3.2)
    Examine { mailbox: Mailbox },

    /// `CREATE` (RFC 3501 §6.3.3)
    Create { mailbox: Mailbox },

    /// `DELETE` (RFC 3501 §6.3.4)
    Delete { mailbox: Mailbox },

    /// `RENAME` (RFC 3501 §6.3.5)
    Rename { from: Mailbox, to: Mailbox },

    /// `SUBSCRIBE` (RFC 3501 §6.3.6)
    Subscribe { mailbox: Mailbox },

    /// `UNSUBSCRIBE` (RFC 3501 §6.3.7)
    Unsubscribe { mailbox: Mailbox },

    /// `LIST` (RFC 3501 §6.3.8)
    List {
        reference: Mailbox,
        mailbox_wildcard: ListMailbox,
    },

    /// `LSUB` (RFC 3501 §6.3.9)
    Lsub {
        reference: Mailbox,
        mailbox_wildcard: ListMailbox,
    },

    /// `STATUS` (RFC 3501 §6.3.10)
    Status {
        mailbox: Mailbox,
        item_names: Vec<StatusDataItemName>,
    },

    /// `APPEND` (RFC 3501 §6.3.11)
    Append {
        mailbox: Mailbox,
        flags: Vec<Flag>,
        date: Option<InternalDate>,
        message: AppendData,
    },

    // # Client Commands - Selected State

    /// `CHECK` (RFC 3501 §6.4.1)
    Check,

    /// `CLOSE` (RFC 3501 §6.4.2)
    Close,

    /// `EXPUNGE` (RFC 3501 §6.4.3)
    Expunge,

    /// `UID EXPUNGE` (RFC 4315 UIDPLUS): expunge only the messages named by `sequence_set`.
    ExpungeUid { sequence_set: SequenceSet },

    /// `SEARCH`, optionally `UID SEARCH` (RFC 3501 §6.4.4)
    Search {
        charset: Option<Charset>,
        criteria: SearchKey,
        uid: bool,
    },

    /// `SORT`, optionally `UID SORT` (RFC 5256)
    Sort {
        sort_criteria: NonEmptyVec<SortCriterion>,
        charset: Charset,
        search_criteria: SearchKey,
        uid: bool,
    },

    /// `THREAD`, optionally `UID THREAD` (RFC 5256)
    Thread {
        algorithm: ThreadingAlgorithm,
        charset: Charset,
        search_criteria: SearchKey,
        uid: bool,
    },

    /// `FETCH`, optionally `UID FETCH` (RFC 3501 §6.4.5)
    Fetch {
        sequence_set: SequenceSet,
        macro_or_item_names: MacroOrMessageDataItemNames,
        uid: bool,
        /// RFC 7162 CONDSTORE `CHANGEDSINCE` modifier.
        changed_since: Option<u64>,
    },

    /// `STORE`, optionally `UID STORE` (RFC 3501 §6.4.6)
    Store {
        sequence_set: SequenceSet,
        kind: StoreType,
        response: StoreResponse,
        flags: Vec<Flag>,
        uid: bool,
        /// RFC 7162 CONDSTORE `UNCHANGEDSINCE` modifier.
        unchanged_since: Option<u64>,
    },

    /// `COPY`, optionally `UID COPY` (RFC 3501 §6.4.7)
    Copy {
        sequence_set: SequenceSet,
        mailbox: Mailbox,
        uid: bool,
    },

    /// `MOVE`, optionally `UID MOVE` (RFC 6851)
    Move {
        sequence_set: SequenceSet,
        mailbox: Mailbox,
        uid: bool,
    },

    /// `IDLE` (RFC 2177)
    Idle,

    /// `ENABLE` (RFC 5161)
    Enable {
        capabilities: NonEmptyVec<CapabilityEnable>,
    },

    /// `COMPRESS` (RFC 4978)
    Compress { algorithm: CompressionAlgorithm },

    /// `GETQUOTA` (RFC 9208)
    GetQuota { root: AString },

    /// `GETQUOTAROOT` (RFC 9208)
    GetQuotaRoot { mailbox: Mailbox },

    /// `SETQUOTA` (RFC 9208)
    SetQuota { root: AString, quotas: Vec<QuotaSet> },

    /// `NAMESPACE` (RFC 2342)
    Namespace,

    /// `ID` (RFC 2971)
    Id {
        parameters: Option<Vec<(crate::core::IString, crate::core::NString)>>,
    },

    /// `SETMETADATA` (RFC 5464)
    SetMetadata {
        mailbox: Mailbox,
        entry_values: NonEmptyVec<crate::extensions::metadata::EntryValue>,
    },

    /// `GETMETADATA` (RFC 5464)
    GetMetadata {
        options: Vec<crate::extensions::metadata::GetMetadataOption>,
        mailbox: Mailbox,
        entries: NonEmptyVec<crate::extensions::metadata::Entry>,
    },

    /// `RESETKEY` (RFC 4467 URLAUTH)
    ResetKey {
        mailbox_and_mechanisms:
            Option<(Mailbox, NonEmptyVec<crate::extensions::urlauth::UrlAuthMechanism>)>,
    },

    /// `GENURLAUTH` (RFC 4467 URLAUTH)
    GenUrlAuth {
        requests: NonEmptyVec<crate::extensions::urlauth::UrlAuthRequest>,
    },

    /// `URLFETCH` (RFC 4467 URLAUTH)
    UrlFetch { urls: NonEmptyVec<RUrl> },
}

/// The message data of an `APPEND`, in one of the two shapes `append-data` allows.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum AppendData {
    /// A single literal (or `literal8`, under BINARY).
    Literal(LiteralOrLiteral8),
    /// `CATENATE` (RFC 4469): the message is assembled from a sequence of URL and text fragments.
    Catenate(NonEmptyVec<CatenatePart>),
}

impl From<LiteralOrLiteral8> for AppendData {
    fn from(value: LiteralOrLiteral8) -> Self {
        Self::Literal(value)
    }
}

impl CommandBody {
    pub fn authenticate(mechanism: AuthMechanism) -> Self {
        CommandBody::Authenticate {
            mechanism,
            initial_response: None,
        }
    }

    pub fn authenticate_with_ir<D>(mechanism: AuthMechanism, initial_response: D) -> Self
    where
        D: Into<Vec<u8>>,
    {
        CommandBody::Authenticate {
            mechanism,
            initial_response: Some(Secret::new(initial_response.into())),
        }
    }

    pub fn login<U, P>(username: U, password: P) -> Result<Self, LoginError<U::Error, P::Error>>
    where
        U: TryInto<AString>,
        P: TryInto<AString>,
    {
        Ok(CommandBody::Login {
            username: username.try_into().map_err(LoginError::Username)?,
            password: Secret::new(password.try_into().map_err(LoginError::Password)?),
        })
    }

    pub fn select<M>(mailbox: M) -> Result<Self, M::Error>
    where
        M: TryInto<Mailbox>,
    {
        Ok(CommandBody::Select {
            mailbox: mailbox.try_into()?,
        })
    }

    pub fn examine<M>(mailbox: M) -> Result<Self, M::Error>
    where
        M: TryInto<Mailbox>,
    {
        Ok(CommandBody::Examine {
            mailbox: mailbox.try_into()?,
        })
    }

    pub fn create<M>(mailbox: M) -> Result<Self, M::Error>
    where
        M: TryInto<Mailbox>,
    {
        Ok(CommandBody::Create {
            mailbox: mailbox.try_into()?,
        })
    }

    pub fn delete<M>(mailbox: M) -> Result<Self, M::Error>
    where
        M: TryInto<Mailbox>,
    {
        Ok(CommandBody::Delete {
            mailbox: mailbox.try_into()?,
        })
    }

    pub fn rename<F, T>(from: F, to: T) -> Result<Self, RenameError<F::Error, T::Error>>
    where
        F: TryInto<Mailbox>,
        T: TryInto<Mailbox>,
    {
        Ok(CommandBody::Rename {
            from: from.try_into().map_err(RenameError::From)?,
            to: to.try_into().map_err(RenameError::To)?,
        })
    }

    pub fn subscribe<M>(mailbox: M) -> Result<Self, M::Error>
    where
        M: TryInto<Mailbox>,
    {
        Ok(CommandBody::Subscribe {
            mailbox: mailbox.try_into()?,
        })
    }

    pub fn unsubscribe<M>(mailbox: M) -> Result<Self, M::Error>
    where
        M: TryInto<Mailbox>,
    {
        Ok(CommandBody::Unsubscribe {
            mailbox: mailbox.try_into()?,
        })
    }

    pub fn list<R, M>(
        reference: R,
        mailbox_wildcard: M,
    ) -> Result<Self, ListError<R::Error, M::Error>>
    where
        R: TryInto<Mailbox>,
        M: TryInto<ListMailbox>,
    {
        Ok(CommandBody::List {
            reference: reference.try_into().map_err(ListError::Reference)?,
            mailbox_wildcard: mailbox_wildcard.try_into().map_err(ListError::Wildcard)?,
        })
    }

    pub fn lsub<R, M>(
        reference: R,
        mailbox_wildcard: M,
    ) -> Result<Self, ListError<R::Error, M::Error>>
    where
        R: TryInto<Mailbox>,
        M: TryInto<ListMailbox>,
    {
        Ok(CommandBody::Lsub {
            reference: reference.try_into().map_err(ListError::Reference)?,
            mailbox_wildcard: mailbox_wildcard.try_into().map_err(ListError::Wildcard)?,
        })
    }

    pub fn status<M>(mailbox: M, item_names: Vec<StatusDataItemName>) -> Result<Self, M::Error>
    where
        M: TryInto<Mailbox>,
    {
        Ok(CommandBody::Status {
            mailbox: mailbox.try_into()?,
            item_names,
        })
    }

    pub fn append<M, D>(
        mailbox: M,
        flags: Vec<Flag>,
        date: Option<InternalDate>,
        message: D,
    ) -> Result<Self, AppendError<M::Error, D::Error>>
    where
        M: TryInto<Mailbox>,
        D: TryInto<AppendData>,
    {
        Ok(CommandBody::Append {
            mailbox: mailbox.try_into().map_err(AppendError::Mailbox)?,
            flags,
            date,
            message: message.try_into().map_err(AppendError::Message)?,
        })
    }

    pub fn search(criteria: NonEmptyVec<SearchKey>, uid: bool) -> Self {
        CommandBody::Search {
            charset: None,
            criteria: SearchKey::And(criteria),
            uid,
        }
    }

    pub fn sort(
        sort_criteria: NonEmptyVec<SortCriterion>,
        charset: Charset,
        search_criteria: NonEmptyVec<SearchKey>,
        uid: bool,
    ) -> Self {
        CommandBody::Sort {
            sort_criteria,
            charset,
            search_criteria: SearchKey::And(search_criteria),
            uid,
        }
    }

    pub fn thread(
        algorithm: ThreadingAlgorithm,
        charset: Charset,
        search_criteria: NonEmptyVec<SearchKey>,
        uid: bool,
    ) -> Self {
        CommandBody::Thread {
            algorithm,
            charset,
            search_criteria: SearchKey::And(search_criteria),
            uid,
        }
    }

    pub fn fetch<S>(
        sequence_set: S,
        macro_or_item_names: MacroOrMessageDataItemNames,
        uid: bool,
    ) -> Result<Self, S::Error>
    where
        S: TryInto<SequenceSet>,
    {
        Ok(CommandBody::Fetch {
            sequence_set: sequence_set.try_into()?,
            macro_or_item_names,
            uid,
            changed_since: None,
        })
    }

    pub fn store<S>(
        sequence_set: S,
        kind: StoreType,
        response: StoreResponse,
        flags: Vec<Flag>,
        uid: bool,
    ) -> Result<Self, S::Error>
    where
        S: TryInto<SequenceSet>,
    {
        Ok(CommandBody::Store {
            sequence_set: sequence_set.try_into()?,
            kind,
            response,
            flags,
            uid,
            unchanged_since: None,
        })
    }

    pub fn copy<S, M>(
        sequence_set: S,
        mailbox: M,
        uid: bool,
    ) -> Result<Self, CopyError<S::Error, M::Error>>
    where
        S: TryInto<SequenceSet>,
        M: TryInto<Mailbox>,
    {
        Ok(CommandBody::Copy {
            sequence_set: sequence_set.try_into().map_err(CopyError::Sequence)?,
            mailbox: mailbox.try_into().map_err(CopyError::Mailbox)?,
            uid,
        })
    }

    /// Returns the command's name as it appears on the wire, e.g. `"LOGIN"`.
    ///
    /// UID-wrapped commands (`FETCH`/`STORE`/`COPY`/`MOVE`/`SEARCH`/`SORT`/`THREAD` with `uid`
    /// set) report the bare command name; callers wanting the `UID` prefix check `uid` directly.
    pub fn name(&self) -> &'static str {
        match self {
            CommandBody::Capability => "CAPABILITY",
            CommandBody::Noop => "NOOP",
            CommandBody::Logout => "LOGOUT",
            CommandBody::StartTls => "STARTTLS",
            CommandBody::Authenticate { .. } => "AUTHENTICATE",
            CommandBody::Login { .. } => "LOGIN",
            CommandBody::Select { .. } => "SELECT",
            CommandBody::Unselect => "UNSELECT",
            CommandBody::Examine { .. } => "EXAMINE",
            CommandBody::Create { .. } => "CREATE",
            CommandBody::Delete { .. } => "DELETE",
            CommandBody::Rename { .. } => "RENAME",
            CommandBody::Subscribe { .. } => "SUBSCRIBE",
            CommandBody::Unsubscribe { .. } => "UNSUBSCRIBE",
            CommandBody::List { .. } => "LIST",
            CommandBody::Lsub { .. } => "LSUB",
            CommandBody::Status { .. } => "STATUS",
            CommandBody::Append { .. } => "APPEND",
            CommandBody::Check => "CHECK",
            CommandBody::Close => "CLOSE",
            CommandBody::Expunge => "EXPUNGE",
            CommandBody::ExpungeUid { .. } => "EXPUNGE",
            CommandBody::Search { .. } => "SEARCH",
            CommandBody::Sort { .. } => "SORT",
            CommandBody::Thread { .. } => "THREAD",
            CommandBody::Fetch { .. } => "FETCH",
            CommandBody::Store { .. } => "STORE",
            CommandBody::Copy { .. } => "COPY",
            CommandBody::Move { .. } => "MOVE",
            CommandBody::Idle => "IDLE",
            CommandBody::Enable { .. } => "ENABLE",
            CommandBody::Compress { .. } => "COMPRESS",
            CommandBody::GetQuota { .. } => "GETQUOTA",
            CommandBody::GetQuotaRoot { .. } => "GETQUOTAROOT",
            CommandBody::SetQuota { .. } => "SETQUOTA",
            CommandBody::Namespace => "NAMESPACE",
            CommandBody::Id { .. } => "ID",
            CommandBody::SetMetadata { .. } => "SETMETADATA",
            CommandBody::GetMetadata { .. } => "GETMETADATA",
            CommandBody::ResetKey { .. } => "RESETKEY",
            CommandBody::GenUrlAuth { .. } => "GENURLAUTH",
            CommandBody::UrlFetch { .. } => "URLFETCH",
        }
    }
}

pub mod error {
    use thiserror::Error;

    #[derive(Clone, Debug, Eq, Error, Hash, PartialEq)]
    pub enum LoginError<U, P> {
        #[error("invalid username: {0}")]
        Username(U),
        #[error("invalid password: {0}")]
        Password(P),
    }

    #[derive(Clone, Debug, Eq, Error, Hash, PartialEq)]
    pub enum RenameError<F, T> {
        #[error("invalid source mailbox: {0}")]
        From(F),
        #[error("invalid destination mailbox: {0}")]
        To(T),
    }

    #[derive(Clone, Debug, Eq, Error, Hash, PartialEq)]
    pub enum ListError<R, M> {
        #[error("invalid reference: {0}")]
        Reference(R),
        #[error("invalid mailbox wildcard: {0}")]
        Wildcard(M),
    }

    #[derive(Clone, Debug, Eq, Error, Hash, PartialEq)]
    pub enum AppendError<M, D> {
        #[error("invalid mailbox: {0}")]
        Mailbox(M),
        #[error("invalid message data: {0}")]
        Message(D),
    }

    #[derive(Clone, Debug, Eq, Error, Hash, PartialEq)]
    pub enum CopyError<S, M> {
        #[error("invalid sequence: {0}")]
        Sequence(S),
        #[error("invalid mailbox: {0}")]
        Mailbox(M),
    }
}

#[cfg(test)]
mod tests {
    use std::num::NonZeroU32;

    use super::*;
    use crate::core::NString;

    #[test]
    fn test_conversion_command_body() {
        let commands = vec![
            CommandBody::Capability,
            CommandBody::Noop,
            CommandBody::Logout,
            CommandBody::StartTls,
            CommandBody::authenticate(AuthMechanism::Plain),
            CommandBody::authenticate_with_ir(AuthMechanism::Plain, b"\0user\0pass".to_vec()),
            CommandBody::login("alice", "password").unwrap(),
            CommandBody::select("INBOX").unwrap(),
            CommandBody::unselect(),
            CommandBody::examine("INBOX").unwrap(),
            CommandBody::create("Archive").unwrap(),
            CommandBody::delete("Archive").unwrap(),
            CommandBody::rename("Old", "New").unwrap(),
            CommandBody::subscribe("INBOX").unwrap(),
            CommandBody::unsubscribe("INBOX").unwrap(),
            CommandBody::list("", "%").unwrap(),
            CommandBody::lsub("", "%").unwrap(),
            CommandBody::status("INBOX", vec![StatusDataItemName::Messages]).unwrap(),
            CommandBody::append(
                "INBOX",
                vec![],
                None,
                LiteralOrLiteral8::from(crate::core::Literal::new(b"a".to_vec()).unwrap()),
            )
            .unwrap(),
            CommandBody::Check,
            CommandBody::Close,
            CommandBody::Expunge,
            CommandBody::ExpungeUid {
                sequence_set: 1u32.try_into().unwrap(),
            },
            CommandBody::search(NonEmptyVec::single(SearchKey::Seen), false),
            CommandBody::fetch(
                1u32,
                MacroOrMessageDataItemNames::Macro(crate::fetch::Macro::All),
                false,
            )
            .unwrap(),
            CommandBody::store(
                1u32,
                StoreType::Add,
                StoreResponse::Answer,
                vec![Flag::Seen],
                false,
            )
            .unwrap(),
            CommandBody::copy(1u32, "INBOX", false).unwrap(),
            CommandBody::r#move(1u32, "INBOX", false).unwrap(),
            CommandBody::Idle,
            CommandBody::enable(NonEmptyVec::single(CapabilityEnable::CondStore)),
            CommandBody::compress(CompressionAlgorithm::Deflate),
            CommandBody::get_quota("INBOX").unwrap(),
            CommandBody::get_quota_root("INBOX").unwrap(),
            CommandBody::set_quota("INBOX", vec![]).unwrap(),
            CommandBody::namespace(),
            CommandBody::Id { parameters: None },
        ];

        for command in commands {
            Command::new("A1", command).unwrap();
        }
    }

    #[test]
    fn test_command_body_name() {
        let tests = [
            (CommandBody::Capability, "CAPABILITY"),
            (CommandBody::Logout, "LOGOUT"),
            (CommandBody::login("a", "b").unwrap(), "LOGIN"),
            (CommandBody::select("INBOX").unwrap(), "SELECT"),
            (CommandBody::Idle, "IDLE"),
            (CommandBody::copy(1u32, "INBOX", true).unwrap(), "COPY"),
            (
                CommandBody::compress(CompressionAlgorithm::Deflate),
                "COMPRESS",
            ),
        ];

        for (command, expected) in tests {
            assert_eq!(command.name(), expected);
        }
    }

    #[test]
    fn test_search_wraps_in_and() {
        let search = CommandBody::search(NonEmptyVec::single(SearchKey::Seen), true);
        match search {
            CommandBody::Search { criteria, uid, .. } => {
                assert!(uid);
                assert!(matches!(criteria, SearchKey::And(_)));
            }
            _ => panic!("expected Search"),
        }
    }

    #[test]
    fn test_append_with_catenate() {
        let parts = NonEmptyVec::single(CatenatePart::Text(
            crate::core::Literal::new(b"hi".to_vec()).unwrap(),
        ));
        let command = CommandBody::append("INBOX", vec![], None, AppendData::Catenate(parts)).unwrap();
        match command {
            CommandBody::Append { message, .. } => assert!(matches!(message, AppendData::Catenate(_))),
            _ => panic!("expected Append"),
        }
    }

    #[test]
    fn test_id_command_with_parameters() {
        let command = CommandBody::Id {
            parameters: Some(vec![(
                "name".try_into().unwrap(),
                NString(Some("imap-wire".try_into().unwrap())),
            )]),
        };
        assert_eq!(command.name(), "ID");
    }

    #[test]
    fn test_reset_key_and_url_fetch() {
        let reset = CommandBody::reset_key::<&str>(None).unwrap();
        assert_eq!(
            reset,
            CommandBody::ResetKey {
                mailbox_and_mechanisms: None
            }
        );

        let url: RUrl = AString::try_from("/INBOX;UID=1").unwrap().into();
        let fetch = CommandBody::url_fetch(NonEmptyVec::single(url));
        assert_eq!(fetch.name(), "URLFETCH");
    }

    #[test]
    fn test_sequence_number_from_nonzerou32() {
        let seq: SequenceSet = NonZeroU32::new(42).unwrap().try_into().unwrap();
        let command = CommandBody::fetch(
            seq,
            MacroOrMessageDataItemNames::Macro(crate::fetch::Macro::Fast),
            true,
        )
        .unwrap();
        assert!(matches!(command, CommandBody::Fetch { uid: true, .. }));
    }
}
