//! # 7. Server Responses

use std::{
    fmt::{Debug, Display, Formatter},
    num::{NonZeroU32, TryFromIntError},
};

use base64::{engine::general_purpose::STANDARD as _base64, Engine};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    auth::AuthMechanism,
    core::{impl_try_from, AString, Atom, Charset, NonEmptyVec, QuotedChar, Tag, Text, TextError},
    extensions::{compress::CompressionAlgorithm, enable::CapabilityEnable, quota::QuotaGet},
    fetch::MessageDataItem,
    flag::{Flag, FlagNameAttribute, FlagPerm},
    mailbox::Mailbox,
    status::StatusDataItem,
};

/// An IMAP greeting.
///
/// Note: Don't use `code: None` *and* a `text` that starts with "[", since that would be
/// ambiguous in IMAP.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Greeting {
    pub kind: GreetingKind,
    pub code: Option<Code>,
    pub text: Text,
}

impl Greeting {
    pub fn new<T>(kind: GreetingKind, code: Option<Code>, text: T) -> Result<Self, TextError>
    where
        T: TryInto<Text, Error = TextError>,
    {
        Ok(Greeting {
            kind,
            code,
            text: text.try_into()?,
        })
    }

    pub fn ok<T>(code: Option<Code>, text: T) -> Result<Self, TextError>
    where
        T: TryInto<Text, Error = TextError>,
    {
        Self::new(GreetingKind::Ok, code, text)
    }

    pub fn preauth<T>(code: Option<Code>, text: T) -> Result<Self, TextError>
    where
        T: TryInto<Text, Error = TextError>,
    {
        Self::new(GreetingKind::PreAuth, code, text)
    }

    pub fn bye<T>(code: Option<Code>, text: T) -> Result<Self, TextError>
    where
        T: TryInto<Text, Error = TextError>,
    {
        Self::new(GreetingKind::Bye, code, text)
    }
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GreetingKind {
    /// The connection is not yet authenticated; a LOGIN command is needed.
    Ok,
    /// The connection has already been authenticated by external means.
    PreAuth,
    /// The server is not willing to accept a connection from this client.
    Bye,
}

/// Every response the server can send after the greeting: status (tagged or untagged), data, or
/// a continuation request.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Response {
    Status(Status),
    Data(Data),
    Continue(Continue),
}

/// ## 7.1. Server Responses - Status Responses
///
/// OK, NO, and BAD can be tagged or untagged; PREAUTH and BYE are always untagged.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Status {
    Ok {
        tag: Option<Tag>,
        code: Option<Code>,
        text: Text,
    },
    No {
        tag: Option<Tag>,
        code: Option<Code>,
        text: Text,
    },
    Bad {
        tag: Option<Tag>,
        code: Option<Code>,
        text: Text,
    },
    Bye {
        code: Option<Code>,
        text: Text,
    },
}

impl Status {
    pub fn ok<T>(tag: Option<Tag>, code: Option<Code>, text: T) -> Result<Self, T::Error>
    where
        T: TryInto<Text>,
    {
        Ok(Status::Ok {
            tag,
            code,
            text: text.try_into()?,
        })
    }

    pub fn no<T>(tag: Option<Tag>, code: Option<Code>, text: T) -> Result<Self, T::Error>
    where
        T: TryInto<Text>,
    {
        Ok(Status::No {
            tag,
            code,
            text: text.try_into()?,
        })
    }

    pub fn bad<T>(tag: Option<Tag>, code: Option<Code>, text: T) -> Result<Self, T::Error>
    where
        T: TryInto<Text>,
    {
        Ok(Status::Bad {
            tag,
            code,
            text: text.try_into()?,
        })
    }

    pub fn bye<T>(code: Option<Code>, text: T) -> Result<Self, T::Error>
    where
        T: TryInto<Text>,
    {
        Ok(Status::Bye {
            code,
            text: text.try_into()?,
        })
    }

    pub fn tag(&self) -> Option<&Tag> {
        match self {
            Status::Ok { tag, .. } | Status::No { tag, .. } | Status::Bad { tag, .. } => {
                tag.as_ref()
            }
            Status::Bye { .. } => None,
        }
    }

    pub fn code(&self) -> Option<&Code> {
        match self {
            Status::Ok { code, .. }
            | Status::No { code, .. }
            | Status::Bad { code, .. }
            | Status::Bye { code, .. } => code.as_ref(),
        }
    }

    pub fn text(&self) -> &Text {
        match self {
            Status::Ok { text, .. }
            | Status::No { text, .. }
            | Status::Bad { text, .. }
            | Status::Bye { text, .. } => text,
        }
    }

    /// `true` for a tagged/untagged `BYE` — the session is over once this arrives.
    pub fn is_bye(&self) -> bool {
        matches!(self, Status::Bye { .. })
    }
}

/// ## 7.2 - 7.4: mailbox/message data, plus enable/quota extension data.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Data {
    /// ### 7.2.1. CAPABILITY Response
    Capability(NonEmptyVec<Capability>),

    /// ### 7.2.2. LIST Response
    List {
        items: Vec<FlagNameAttribute>,
        delimiter: Option<QuotedChar>,
        mailbox: Mailbox,
    },

    /// ### 7.2.3. LSUB Response
    Lsub {
        items: Vec<FlagNameAttribute>,
        delimiter: Option<QuotedChar>,
        mailbox: Mailbox,
    },

    /// ### 7.2.4. STATUS Response
    Status {
        mailbox: Mailbox,
        items: Vec<StatusDataItem>,
    },

    /// ### 7.2.5. SEARCH Response
    Search(Vec<NonZeroU32>),

    /// RFC 4731/5267 ESEARCH response: the same information as SEARCH, in a tagged,
    /// extensible form.
    ESearch {
        tag: Option<Tag>,
        uid: bool,
        items: Vec<ESearchItem>,
    },

    /// RFC 5256 SORT response: message numbers (or UIDs) in sorted order.
    Sort(Vec<NonZeroU32>),

    /// RFC 5256 THREAD response.
    Thread(Vec<crate::extensions::thread::Thread>),

    /// ### 7.2.6. FLAGS Response
    Flags(Vec<Flag>),

    /// ### 7.3.1. EXISTS Response
    Exists(u32),

    /// ### 7.3.2. RECENT Response
    Recent(u32),

    /// ### 7.4.1. EXPUNGE Response
    Expunge(NonZeroU32),

    /// ### 7.4.2. FETCH Response
    ///
    /// A full `FETCH` response decoded as one unit. The incremental parser (component D) emits
    /// this only for attribute lists small enough to have been buffered whole; large literal
    /// bodies are instead streamed as a `fetchStreamingBegin`/`fetchStreamingBytes`/
    /// `fetchStreamingEnd` event sub-sequence (see `imap_wire::parse::fetch`), never materialized
    /// into this type.
    Fetch {
        seq: NonZeroU32,
        items: NonEmptyVec<MessageDataItem>,
    },

    /// RFC 5161 ENABLE response: which capabilities the server actually enabled.
    Enabled { capabilities: Vec<CapabilityEnable> },

    /// RFC 9208 QUOTA response.
    Quota {
        root: AString,
        quotas: NonEmptyVec<QuotaGet>,
    },

    /// RFC 9208 QUOTAROOT response.
    QuotaRoot {
        mailbox: Mailbox,
        roots: Vec<AString>,
    },

    /// RFC 2342 NAMESPACE response.
    Namespace {
        personal: Vec<NamespaceDescriptor>,
        other_users: Vec<NamespaceDescriptor>,
        shared: Vec<NamespaceDescriptor>,
    },

    /// RFC 2971 ID response.
    Id(Option<Vec<(crate::core::IString, crate::core::NString)>>),
}

impl Data {
    pub fn capability<C>(caps: C) -> Result<Self, C::Error>
    where
        C: TryInto<NonEmptyVec<Capability>>,
    {
        Ok(Self::Capability(caps.try_into()?))
    }

    pub fn expunge(seq: u32) -> Result<Self, TryFromIntError> {
        Ok(Self::Expunge(NonZeroU32::try_from(seq)?))
    }

    pub fn fetch<S, I>(seq: S, items: I) -> Result<Self, FetchError<S::Error, I::Error>>
    where
        S: TryInto<NonZeroU32>,
        I: TryInto<NonEmptyVec<MessageDataItem>>,
    {
        let seq = seq.try_into().map_err(FetchError::SeqOrUid)?;
        let items = items.try_into().map_err(FetchError::InvalidItems)?;

        Ok(Self::Fetch { seq, items })
    }
}

/// One namespace descriptor within a NAMESPACE response category: a prefix, its hierarchy
/// delimiter, and any namespace-response-extension parameters.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NamespaceDescriptor {
    pub prefix: crate::core::IString,
    pub delimiter: Option<QuotedChar>,
}

/// One item of an ESEARCH response (RFC 4731/5267).
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ESearchItem {
    Min(NonZeroU32),
    Max(NonZeroU32),
    All(crate::sequence::SequenceSet),
    Count(u32),
    /// RFC 7162: highest per-message modification sequence among the matched messages.
    ModSeq(u64),
}

#[derive(Clone, Debug, Eq, Error, Hash, Ord, PartialEq, PartialOrd)]
pub enum FetchError<S, I> {
    #[error("invalid sequence or UID: {0:?}")]
    SeqOrUid(S),
    #[error("invalid items: {0:?}")]
    InvalidItems(I),
}

/// ## 7.5. Server Responses - Command Continuation Request
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[doc(alias = "ContinuationRequest")]
pub enum Continue {
    Basic(ContinueBasic),
    Base64(Vec<u8>),
}

impl Continue {
    pub fn basic<T>(code: Option<Code>, text: T) -> Result<Self, ContinueError<T::Error>>
    where
        T: TryInto<Text>,
    {
        Ok(Continue::Basic(ContinueBasic::new(code, text)?))
    }

    pub fn base64(data: impl Into<Vec<u8>>) -> Self {
        Continue::Base64(data.into())
    }
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ContinueBasic {
    code: Option<Code>,
    text: Text,
}

impl ContinueBasic {
    /// Ensures a basic continuation is never ambiguous with a base64 one: iff `code` is `None`,
    /// `text` must neither start with `[` nor decode as base64.
    pub fn new<T>(code: Option<Code>, text: T) -> Result<Self, ContinueError<T::Error>>
    where
        T: TryInto<Text>,
    {
        let text = text.try_into().map_err(ContinueError::Text)?;

        if code.is_none() && text.as_ref().starts_with('[') {
            return Err(ContinueError::Ambiguity);
        }

        if code.is_none() && _base64.decode(text.inner()).is_ok() {
            return Err(ContinueError::Ambiguity);
        }

        Ok(Self { code, text })
    }

    pub fn code(&self) -> Option<&Code> {
        self.code.as_ref()
    }

    pub fn text(&self) -> &Text {
        &self.text
    }
}

#[derive(Clone, Debug, Eq, Error, Hash, Ord, PartialEq, PartialOrd)]
pub enum ContinueError<T> {
    #[error("invalid text")]
    Text(T),
    #[error("ambiguity detected")]
    Ambiguity,
}

/// A response code: data inside `[...]` giving additional status beyond OK/NO/BAD.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Code {
    Alert,
    BadCharset { allowed: Vec<Charset> },
    Capability(NonEmptyVec<Capability>),
    Parse,
    PermanentFlags(Vec<FlagPerm>),
    ReadOnly,
    ReadWrite,
    TryCreate,
    UidNext(NonZeroU32),
    UidValidity(NonZeroU32),
    Unseen(NonZeroU32),
    /// RFC 2221 login/mailbox referral.
    Referral(String),
    /// RFC 4978: COMPRESS has already been negotiated on this connection.
    CompressionActive,
    /// RFC 9208: an APPEND/COPY/MOVE would put the target mailbox over a quota limit.
    OverQuota,
    /// RFC 7888: a non-synchronizing literal larger than 4096 bytes was rejected.
    TooBig,
    /// RFC 4315 UIDPLUS: tagged OK after APPEND, carrying the UIDs assigned to the new message(s).
    AppendUid {
        uid_validity: NonZeroU32,
        uids: crate::sequence::SequenceSet,
    },
    /// RFC 4315 UIDPLUS: tagged OK after COPY, carrying the UID mapping from source to
    /// destination.
    CopyUid {
        uid_validity: NonZeroU32,
        source: crate::sequence::SequenceSet,
        destination: crate::sequence::SequenceSet,
    },
    /// RFC 4315 UIDPLUS: the mailbox does not support persistent UIDs.
    UidNotSticky,
    /// RFC 7162 CONDSTORE: highest per-message modification sequence in a mailbox.
    HighestModSeq(u64),
    /// RFC 7162 CONDSTORE: a STORE/FETCH result omitted messages whose MODSEQ changed between
    /// command issuance and execution.
    Modified(crate::sequence::SequenceSet),
    /// RFC 7162: mailbox does not support the persistent storage of mod-sequences.
    NoModSeq,
    /// RFC 5464 METADATA response code (e.g. `TOOMANY`, `MAXSIZE`, `NOPRIVATE`).
    Metadata(crate::extensions::metadata::MetadataCode),
    /// RFC 5530 `USEATTR`: CREATE failed because the special-use attribute is not supported.
    UseAttr,
    /// A code this crate does not know the structured shape of, kept verbatim.
    Other(CodeOther),
}

impl Code {
    pub fn badcharset(allowed: Vec<Charset>) -> Self {
        Self::BadCharset { allowed }
    }

    pub fn capability<C>(caps: C) -> Result<Self, C::Error>
    where
        C: TryInto<NonEmptyVec<Capability>>,
    {
        Ok(Self::Capability(caps.try_into()?))
    }

    pub fn permanentflags(flags: Vec<FlagPerm>) -> Self {
        Self::PermanentFlags(flags)
    }

    pub fn uidnext(uidnext: u32) -> Result<Self, TryFromIntError> {
        Ok(Self::UidNext(NonZeroU32::try_from(uidnext)?))
    }

    pub fn uidvalidity(uidvalidity: u32) -> Result<Self, TryFromIntError> {
        Ok(Self::UidValidity(NonZeroU32::try_from(uidvalidity)?))
    }

    pub fn unseen(unseen: u32) -> Result<Self, TryFromIntError> {
        Ok(Self::Unseen(NonZeroU32::try_from(unseen)?))
    }
}

/// A response code this crate does not recognize, preserved verbatim: `atom [SP text]`.
///
/// It's guaranteed that this type can't represent any code from [`Code`].
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct CodeOther(Vec<u8>);

impl Debug for CodeOther {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "CodeOther(b\"{}\")",
            crate::utils::escape_byte_string(&self.0)
        )
    }
}

impl CodeOther {
    /// Constructs an unsupported code without validation.
    ///
    /// The caller must ensure `data` is valid; this exists for the parser (in the `imap-wire`
    /// crate), which has already validated the bytes against the `resp-text-code` grammar.
    pub fn unvalidated(data: impl Into<Vec<u8>>) -> Self {
        Self(data.into())
    }

    pub fn inner(&self) -> &[u8] {
        &self.0
    }
}

/// A capability name, as advertised in a CAPABILITY response or response code.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum Capability {
    Imap4Rev1,
    Auth(AuthMechanism),
    LoginDisabled,
    StartTls,
    /// RFC 2177.
    Idle,
    /// RFC 2193.
    MailboxReferrals,
    /// RFC 2221.
    LoginReferrals,
    /// RFC 4959.
    SaslIr,
    /// RFC 5161.
    Enable,
    /// RFC 4978.
    Compress { algorithm: CompressionAlgorithm },
    /// RFC 2087/9208.
    Quota,
    /// RFC 9208.
    QuotaRes(crate::extensions::quota::Resource),
    /// RFC 9208.
    QuotaSet,
    /// RFC 7888.
    LiteralPlus,
    LiteralMinus,
    /// RFC 6851.
    Move,
    /// RFC 7162.
    CondStore,
    QResync,
    /// RFC 6855.
    Utf8Accept,
    /// RFC 3516.
    Binary,
    /// RFC 4467/5092.
    UrlAuth,
    /// RFC 4469.
    Catenate,
    /// RFC 5464.
    Metadata,
    /// RFC 3691.
    Unselect,
    /// Other/unknown.
    Other(CapabilityOther),
}

impl Display for Capability {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        match self {
            Capability::Imap4Rev1 => write!(f, "IMAP4REV1"),
            Capability::Auth(mechanism) => write!(f, "AUTH={mechanism}"),
            Capability::LoginDisabled => write!(f, "LOGINDISABLED"),
            Capability::StartTls => write!(f, "STARTTLS"),
            Capability::Idle => write!(f, "IDLE"),
            Capability::MailboxReferrals => write!(f, "MAILBOX-REFERRALS"),
            Capability::LoginReferrals => write!(f, "LOGIN-REFERRALS"),
            Capability::SaslIr => write!(f, "SASL-IR"),
            Capability::Enable => write!(f, "ENABLE"),
            Capability::Compress { algorithm } => write!(f, "COMPRESS={}", algorithm.as_ref()),
            Capability::Quota => write!(f, "QUOTA"),
            Capability::QuotaRes(resource) => write!(f, "QUOTA=RES-{resource}"),

            Capability::QuotaSet => write!(f, "QUOTASET"),
            Capability::LiteralPlus => write!(f, "LITERAL+"),
            Capability::LiteralMinus => write!(f, "LITERAL-"),
            Capability::Move => write!(f, "MOVE"),
            Capability::CondStore => write!(f, "CONDSTORE"),
            Capability::QResync => write!(f, "QRESYNC"),
            Capability::Utf8Accept => write!(f, "UTF8=ACCEPT"),
            Capability::Binary => write!(f, "BINARY"),
            Capability::UrlAuth => write!(f, "URLAUTH"),
            Capability::Catenate => write!(f, "CATENATE"),
            Capability::Metadata => write!(f, "METADATA"),
            Capability::Unselect => write!(f, "UNSELECT"),
            Capability::Other(other) => write!(f, "{}", other.0.inner()),
        }
    }
}

impl_try_from!(Atom, &str, Capability);
impl_try_from!(Atom, String, Capability);

impl From<Atom> for Capability {
    fn from(atom: Atom) -> Self {
        let upper = atom.as_ref().to_ascii_uppercase();

        if let Some(mechanism) = upper.strip_prefix("AUTH=") {
            return match Atom::try_from(mechanism) {
                Ok(mechanism) => Capability::Auth(AuthMechanism::from(mechanism)),
                Err(_) => Capability::Other(CapabilityOther(atom)),
            };
        }

        match upper.as_str() {
            "IMAP4REV1" => Capability::Imap4Rev1,
            "LOGINDISABLED" => Capability::LoginDisabled,
            "STARTTLS" => Capability::StartTls,
            "IDLE" => Capability::Idle,
            "MAILBOX-REFERRALS" => Capability::MailboxReferrals,
            "LOGIN-REFERRALS" => Capability::LoginReferrals,
            "SASL-IR" => Capability::SaslIr,
            "ENABLE" => Capability::Enable,
            "QUOTA" => Capability::Quota,
            "QUOTASET" => Capability::QuotaSet,
            "LITERAL+" => Capability::LiteralPlus,
            "LITERAL-" => Capability::LiteralMinus,
            "MOVE" => Capability::Move,
            "CONDSTORE" => Capability::CondStore,
            "QRESYNC" => Capability::QResync,
            "UTF8=ACCEPT" => Capability::Utf8Accept,
            "BINARY" => Capability::Binary,
            "URLAUTH" => Capability::UrlAuth,
            "CATENATE" => Capability::Catenate,
            "METADATA" => Capability::Metadata,
            "UNSELECT" => Capability::Unselect,
            _ => Capability::Other(CapabilityOther(atom)),
        }
    }
}

/// A capability name this crate does not recognize.
///
/// It's guaranteed that this type can't represent any capability from [`Capability`].
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CapabilityOther(Atom);

impl CapabilityOther {
    pub fn inner(&self) -> &Atom {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sequence::SequenceSet;

    #[test]
    fn test_greeting_ok() {
        let greeting = Greeting::ok(None, "IMAP4rev1 Service Ready").unwrap();
        assert_eq!(greeting.kind, GreetingKind::Ok);
    }

    #[test]
    fn test_status_accessors() {
        let status = Status::ok(
            Some(Tag::try_from("A1").unwrap()),
            Some(Code::ReadWrite),
            "done",
        )
        .unwrap();

        assert_eq!(status.tag().unwrap().inner(), "A1");
        assert_eq!(status.code(), Some(&Code::ReadWrite));
        assert!(!status.is_bye());
    }

    #[test]
    fn test_bye_is_bye() {
        let status = Status::bye(None, "closing").unwrap();
        assert!(status.is_bye());
        assert!(status.tag().is_none());
    }

    #[test]
    fn test_continue_basic_rejects_ambiguous_bracket() {
        let err = ContinueBasic::new::<&str>(None, "[ALERT] hi");
        assert!(matches!(err, Err(ContinueError::Ambiguity)));
    }

    #[test]
    fn test_continue_base64() {
        let cont = Continue::base64(vec![1, 2, 3]);
        assert_eq!(cont, Continue::Base64(vec![1, 2, 3]));
    }

    #[test]
    fn test_capability_from_atom() {
        let cap = Capability::from(Atom::try_from("IDLE").unwrap());
        assert_eq!(cap, Capability::Idle);

        let other = Capability::from(Atom::try_from("X-FOO").unwrap());
        assert_eq!(
            other,
            Capability::Other(CapabilityOther(Atom::try_from("X-FOO").unwrap()))
        );
    }

    #[test]
    fn test_capability_auth_mechanism() {
        let cap = Capability::from(Atom::try_from("AUTH=PLAIN").unwrap());
        assert_eq!(cap, Capability::Auth(AuthMechanism::Plain));
    }

    #[test]
    fn test_capability_display_roundtrip() {
        assert_eq!(Capability::Imap4Rev1.to_string(), "IMAP4REV1");
        assert_eq!(Capability::Idle.to_string(), "IDLE");
    }

    #[test]
    fn test_code_other_debug() {
        let code = CodeOther::unvalidated(b"X-FOO bar".to_vec());
        assert_eq!(code.inner(), b"X-FOO bar");
    }

    #[test]
    fn test_append_uid_code() {
        let code = Code::AppendUid {
            uid_validity: NonZeroU32::new(42).unwrap(),
            uids: SequenceSet::try_from(7u32).unwrap(),
        };
        match code {
            Code::AppendUid { uid_validity, .. } => {
                assert_eq!(uid_validity, NonZeroU32::new(42).unwrap())
            }
            _ => panic!("expected AppendUid"),
        }
    }
}
