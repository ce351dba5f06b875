//! Encoding for [`Command`]/[`CommandBody`], and [`CommandStreamPart`] for the multi-step forms
//! (`APPEND`, `AUTHENTICATE`) that spec.md §4.3.3 calls out as needing more than one call to
//! produce: a message body arriving off a caller-provided byte source, or a SASL handshake that
//! continues across `+` continuation requests.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};

use imap_wire_types::{
    auth::{AuthMechanism, AuthenticateData},
    command::{AppendData, Command, CommandBody},
    core::{AString, Tag},
    datetime::InternalDate,
    extensions::{
        catenate::CatenatePart,
        compress::CompressionAlgorithm,
        enable::CapabilityEnable,
        metadata::{Depth, Entry, EntryValue, GetMetadataOption},
        quota::QuotaSet,
        sort::SortCriterion,
        thread::ThreadingAlgorithm,
        urlauth::{RUrl, UrlAuthMechanism, UrlAuthRequest},
    },
    flag::{Flag, StoreResponse, StoreType},
    mailbox::Mailbox,
    secret::Secret,
};

use super::search::encode_search_criteria_command;
use super::{write_joined, write_list, Encode, EncodeContext};

fn uid_prefix(ctx: &mut EncodeContext, uid: bool) {
    if uid {
        ctx.write(b"UID ");
    }
}

fn write_quoted_internal_date(ctx: &mut EncodeContext, date: &InternalDate) {
    ctx.write(b"\"");
    ctx.write_display(date);
    ctx.write(b"\"");
}

impl Encode for Command {
    fn encode_ctx(&self, ctx: &mut EncodeContext) {
        self.tag.encode_ctx(ctx);
        ctx.sp();
        self.body.encode_ctx(ctx);
        ctx.write(b"\r\n");
    }
}

impl Encode for CommandBody {
    fn encode_ctx(&self, ctx: &mut EncodeContext) {
        match self {
            CommandBody::Capability => ctx.write(b"CAPABILITY"),
            CommandBody::Noop => ctx.write(b"NOOP"),
            CommandBody::Logout => ctx.write(b"LOGOUT"),
            CommandBody::StartTls => ctx.write(b"STARTTLS"),
            CommandBody::Authenticate {
                mechanism,
                initial_response,
            } => {
                ctx.write(b"AUTHENTICATE ");
                mechanism.encode_ctx(ctx);
                if let Some(ir) = initial_response {
                    ctx.sp();
                    let data = ir.declassify();
                    if data.is_empty() {
                        ctx.write(b"=");
                    } else {
                        ctx.write_str(&BASE64.encode(data));
                    }
                }
            }
            CommandBody::Login { username, password } => {
                ctx.write(b"LOGIN ");
                username.encode_ctx(ctx);
                ctx.sp();
                password.encode_ctx(ctx);
            }
            CommandBody::Select { mailbox } => {
                ctx.write(b"SELECT ");
                mailbox.encode_ctx(ctx);
            }
            CommandBody::Unselect => ctx.write(b"UNSELECT"),
            CommandBody::Examine { mailbox } => {
                ctx.write(b"EXAMINE ");
                mailbox.encode_ctx(ctx);
            }
            CommandBody::Create { mailbox } => {
                ctx.write(b"CREATE ");
                mailbox.encode_ctx(ctx);
            }
            CommandBody::Delete { mailbox } => {
                ctx.write(b"DELETE ");
                mailbox.encode_ctx(ctx);
            }
            CommandBody::Rename { from, to } => {
                ctx.write(b"RENAME ");
                from.encode_ctx(ctx);
                ctx.sp();
                to.encode_ctx(ctx);
            }
            CommandBody::Subscribe { mailbox } => {
                ctx.write(b"SUBSCRIBE ");
                mailbox.encode_ctx(ctx);
            }
            CommandBody::Unsubscribe { mailbox } => {
                ctx.write(b"UNSUBSCRIBE ");
                mailbox.encode_ctx(ctx);
            }
            CommandBody::List {
                reference,
                mailbox_wildcard,
            } => {
                ctx.write(b"LIST ");
                reference.encode_ctx(ctx);
                ctx.sp();
                mailbox_wildcard.encode_ctx(ctx);
            }
            CommandBody::Lsub {
                reference,
                mailbox_wildcard,
            } => {
                ctx.write(b"LSUB ");
                reference.encode_ctx(ctx);
                ctx.sp();
                mailbox_wildcard.encode_ctx(ctx);
            }
            CommandBody::Status {
                mailbox,
                item_names,
            } => {
                ctx.write(b"STATUS ");
                mailbox.encode_ctx(ctx);
                ctx.sp();
                write_list(item_names, ctx);
            }
            CommandBody::Append {
                mailbox,
                flags,
                date,
                message,
            } => {
                ctx.write(b"APPEND ");
                mailbox.encode_ctx(ctx);
                if !flags.is_empty() {
                    ctx.sp();
                    write_list(flags, ctx);
                }
                if let Some(date) = date {
                    ctx.sp();
                    write_quoted_internal_date(ctx, date);
                }
                ctx.sp();
                message.encode_ctx(ctx);
            }
            CommandBody::Check => ctx.write(b"CHECK"),
            CommandBody::Close => ctx.write(b"CLOSE"),
            CommandBody::Expunge => ctx.write(b"EXPUNGE"),
            CommandBody::ExpungeUid { sequence_set } => {
                ctx.write(b"UID EXPUNGE ");
                sequence_set.encode_ctx(ctx);
            }
            CommandBody::Search {
                charset,
                criteria,
                uid,
            } => {
                uid_prefix(ctx, *uid);
                ctx.write(b"SEARCH");
                if let Some(charset) = charset {
                    ctx.write(b" CHARSET ");
                    charset.encode_ctx(ctx);
                }
                ctx.sp();
                encode_search_criteria_command(criteria, ctx);
            }
            CommandBody::Sort {
                sort_criteria,
                charset,
                search_criteria,
                uid,
            } => {
                uid_prefix(ctx, *uid);
                ctx.write(b"SORT (");
                write_joined(sort_criteria.as_slice(), ctx);
                ctx.write(b") ");
                charset.encode_ctx(ctx);
                ctx.sp();
                encode_search_criteria_command(search_criteria, ctx);
            }
            CommandBody::Thread {
                algorithm,
                charset,
                search_criteria,
                uid,
            } => {
                uid_prefix(ctx, *uid);
                ctx.write(b"THREAD ");
                ctx.write_display(algorithm);
                ctx.sp();
                charset.encode_ctx(ctx);
                ctx.sp();
                encode_search_criteria_command(search_criteria, ctx);
            }
            CommandBody::Fetch {
                sequence_set,
                macro_or_item_names,
                uid,
                changed_since,
            } => {
                uid_prefix(ctx, *uid);
                ctx.write(b"FETCH ");
                sequence_set.encode_ctx(ctx);
                ctx.sp();
                macro_or_item_names.encode_ctx(ctx);
                if let Some(modseq) = changed_since {
                    ctx.write(b" (CHANGEDSINCE ");
                    ctx.write_display(modseq);
                    ctx.write(b")");
                }
            }
            CommandBody::Store {
                sequence_set,
                kind,
                response,
                flags,
                uid,
                unchanged_since,
            } => {
                uid_prefix(ctx, *uid);
                ctx.write(b"STORE ");
                sequence_set.encode_ctx(ctx);
                if let Some(modseq) = unchanged_since {
                    ctx.write(b" (UNCHANGEDSINCE ");
                    ctx.write_display(modseq);
                    ctx.write(b")");
                }
                ctx.sp();
                ctx.write(match kind {
                    StoreType::Replace => b"FLAGS".as_slice(),
                    StoreType::Add => b"+FLAGS",
                    StoreType::Remove => b"-FLAGS",
                });
                if matches!(response, StoreResponse::Silent) {
                    ctx.write(b".SILENT");
                }
                ctx.sp();
                write_list(flags, ctx);
            }
            CommandBody::Copy {
                sequence_set,
                mailbox,
                uid,
            } => {
                uid_prefix(ctx, *uid);
                ctx.write(b"COPY ");
                sequence_set.encode_ctx(ctx);
                ctx.sp();
                mailbox.encode_ctx(ctx);
            }
            CommandBody::Move {
                sequence_set,
                mailbox,
                uid,
            } => {
                uid_prefix(ctx, *uid);
                ctx.write(b"MOVE ");
                sequence_set.encode_ctx(ctx);
                ctx.sp();
                mailbox.encode_ctx(ctx);
            }
            CommandBody::Idle => ctx.write(b"IDLE"),
            CommandBody::Enable { capabilities } => {
                ctx.write(b"ENABLE ");
                write_joined(capabilities.as_slice(), ctx);
            }
            CommandBody::Compress { algorithm } => {
                ctx.write(b"COMPRESS ");
                ctx.write_str(algorithm.as_ref());
            }
            CommandBody::GetQuota { root } => {
                ctx.write(b"GETQUOTA ");
                root.encode_ctx(ctx);
            }
            CommandBody::GetQuotaRoot { mailbox } => {
                ctx.write(b"GETQUOTAROOT ");
                mailbox.encode_ctx(ctx);
            }
            CommandBody::SetQuota { root, quotas } => {
                ctx.write(b"SETQUOTA ");
                root.encode_ctx(ctx);
                ctx.sp();
                write_list(quotas, ctx);
            }
            CommandBody::Namespace => ctx.write(b"NAMESPACE"),
            CommandBody::Id { parameters } => {
                ctx.write(b"ID ");
                match parameters {
                    None => ctx.write(b"NIL"),
                    Some(params) => {
                        ctx.write(b"(");
                        for (i, (key, value)) in params.iter().enumerate() {
                            if i > 0 {
                                ctx.sp();
                            }
                            key.encode_ctx(ctx);
                            ctx.sp();
                            value.encode_ctx(ctx);
                        }
                        ctx.write(b")");
                    }
                }
            }
            CommandBody::SetMetadata {
                mailbox,
                entry_values,
            } => {
                ctx.write(b"SETMETADATA ");
                mailbox.encode_ctx(ctx);
                ctx.sp();
                write_list(entry_values.as_slice(), ctx);
            }
            CommandBody::GetMetadata {
                options,
                mailbox,
                entries,
            } => {
                ctx.write(b"GETMETADATA");
                if !options.is_empty() {
                    ctx.sp();
                    write_list(options, ctx);
                }
                ctx.sp();
                mailbox.encode_ctx(ctx);
                ctx.sp();
                write_list(entries.as_slice(), ctx);
            }
            CommandBody::ResetKey {
                mailbox_and_mechanisms,
            } => {
                ctx.write(b"RESETKEY");
                if let Some((mailbox, mechanisms)) = mailbox_and_mechanisms {
                    ctx.sp();
                    mailbox.encode_ctx(ctx);
                    ctx.sp();
                    write_joined(mechanisms.as_slice(), ctx);
                }
            }
            CommandBody::GenUrlAuth { requests } => {
                ctx.write(b"GENURLAUTH ");
                write_joined(requests.as_slice(), ctx);
            }
            CommandBody::UrlFetch { urls } => {
                ctx.write(b"URLFETCH ");
                write_joined(urls.as_slice(), ctx);
            }
        }
    }
}

impl Encode for AppendData {
    fn encode_ctx(&self, ctx: &mut EncodeContext) {
        match self {
            AppendData::Literal(literal) => literal.encode_ctx(ctx),
            AppendData::Catenate(parts) => {
                ctx.write(b"CATENATE (");
                write_joined(parts.as_slice(), ctx);
                ctx.write(b")");
            }
        }
    }
}

impl Encode for CatenatePart {
    fn encode_ctx(&self, ctx: &mut EncodeContext) {
        match self {
            CatenatePart::Url(url) => {
                ctx.write(b"URL ");
                url.encode_ctx(ctx);
            }
            CatenatePart::Text(literal) => {
                ctx.write(b"TEXT ");
                literal.encode_ctx(ctx);
            }
        }
    }
}

impl Encode for SortCriterion {
    fn encode_ctx(&self, ctx: &mut EncodeContext) {
        if self.reverse {
            ctx.write(b"REVERSE ");
        }
        ctx.write_str(self.key.as_ref());
    }
}

impl Encode for ThreadingAlgorithm {
    fn encode_ctx(&self, ctx: &mut EncodeContext) {
        ctx.write_display(self);
    }
}

impl Encode for CapabilityEnable {
    fn encode_ctx(&self, ctx: &mut EncodeContext) {
        ctx.write_display(self);
    }
}

impl Encode for QuotaSet {
    fn encode_ctx(&self, ctx: &mut EncodeContext) {
        ctx.write_display(&self.resource);
        ctx.sp();
        ctx.write_display(&self.limit);
    }
}

impl Encode for GetMetadataOption {
    fn encode_ctx(&self, ctx: &mut EncodeContext) {
        match self {
            GetMetadataOption::MaxSize(size) => {
                ctx.write(b"MAXSIZE ");
                ctx.write_display(size);
            }
            GetMetadataOption::Depth(depth) => {
                ctx.write(b"DEPTH ");
                ctx.write_str(match depth {
                    Depth::Null => "0",
                    Depth::One => "1",
                    Depth::Infinity => "infinity",
                });
            }
        }
    }
}

impl Encode for Entry {
    fn encode_ctx(&self, ctx: &mut EncodeContext) {
        self.inner().encode_ctx(ctx);
    }
}

impl Encode for EntryValue {
    fn encode_ctx(&self, ctx: &mut EncodeContext) {
        self.entry.encode_ctx(ctx);
        ctx.sp();
        self.value.encode_ctx(ctx);
    }
}

impl Encode for UrlAuthMechanism {
    fn encode_ctx(&self, ctx: &mut EncodeContext) {
        ctx.write_display(self);
    }
}

impl Encode for RUrl {
    fn encode_ctx(&self, ctx: &mut EncodeContext) {
        self.inner().encode_ctx(ctx);
    }
}

impl Encode for UrlAuthRequest {
    fn encode_ctx(&self, ctx: &mut EncodeContext) {
        self.url.encode_ctx(ctx);
        ctx.sp();
        self.mechanism.encode_ctx(ctx);
    }
}

/// The multi-step command forms spec.md §4.3.3 singles out: an `APPEND` whose message bytes arrive
/// incrementally from a caller-provided source, and an `AUTHENTICATE` whose SASL handshake
/// continues across `+` continuation requests. Unlike [`Command`], which encodes in one call,
/// each variant here is fed to [`CommandStreamPart::encode_ctx`] one step at a time as the caller's
/// own state machine progresses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandStreamPart {
    /// `tag SP "APPEND" SP mailbox`, before any flags/date/message has been written.
    AppendStart { tag: Tag, mailbox: Mailbox },
    /// Optional `flags`/`date-time`, followed by a literal header for a single-literal message.
    AppendBeginMessage {
        flags: Vec<Flag>,
        date: Option<InternalDate>,
        byte_count: u64,
        non_sync: bool,
    },
    /// One chunk of the message literal's body.
    AppendMessageBytes(Vec<u8>),
    /// Terminates a single-literal message; nothing left to write but this marks the boundary for
    /// callers tracking state.
    AppendEndMessage,
    /// Optional `flags`/`date-time`, followed by `"CATENATE" SP "("`.
    AppendBeginCatenate {
        flags: Vec<Flag>,
        date: Option<InternalDate>,
    },
    /// A `URL` catenate part. `first` must be `true` only for the first part written after
    /// [`Self::AppendBeginCatenate`].
    AppendCatenateUrl { url: AString, first: bool },
    /// The `TEXT` literal header of a catenate part, ahead of its body.
    AppendCatenateDataBegin {
        byte_count: u64,
        non_sync: bool,
        first: bool,
    },
    /// One chunk of a `TEXT` catenate part's literal body.
    AppendCatenateDataBytes(Vec<u8>),
    /// No bytes of its own; marks the end of one `TEXT` part's body for the caller's bookkeeping.
    AppendCatenateDataEnd,
    /// The closing `)` of a `CATENATE` list.
    AppendEndCatenate,
    /// The trailing `\r\n` that ends the `APPEND` command line.
    AppendFinish,
    /// `tag SP "AUTHENTICATE" SP mechanism`, with an optional inline SASL-IR initial response.
    AuthenticateStart {
        tag: Tag,
        mechanism: AuthMechanism,
        initial_response: Option<Secret<Vec<u8>>>,
    },
    /// A client response to a server challenge, sent as its own continuation line.
    AuthenticateContinue(AuthenticateData),
}

impl CommandStreamPart {
    pub fn encode_ctx(&self, ctx: &mut EncodeContext) {
        match self {
            CommandStreamPart::AppendStart { tag, mailbox } => {
                tag.encode_ctx(ctx);
                ctx.write(b" APPEND ");
                mailbox.encode_ctx(ctx);
            }
            CommandStreamPart::AppendBeginMessage {
                flags,
                date,
                byte_count,
                non_sync,
            } => {
                write_append_flags_and_date(ctx, flags, date);
                ctx.sp();
                ctx.begin_literal(*byte_count, *non_sync);
            }
            CommandStreamPart::AppendMessageBytes(bytes) => ctx.write(bytes),
            CommandStreamPart::AppendEndMessage => {}
            CommandStreamPart::AppendBeginCatenate { flags, date } => {
                write_append_flags_and_date(ctx, flags, date);
                ctx.write(b" CATENATE (");
            }
            CommandStreamPart::AppendCatenateUrl { url, first } => {
                if !*first {
                    ctx.sp();
                }
                ctx.write(b"URL ");
                url.encode_ctx(ctx);
            }
            CommandStreamPart::AppendCatenateDataBegin {
                byte_count,
                non_sync,
                first,
            } => {
                if !*first {
                    ctx.sp();
                }
                ctx.write(b"TEXT ");
                ctx.begin_literal(*byte_count, *non_sync);
            }
            CommandStreamPart::AppendCatenateDataBytes(bytes) => ctx.write(bytes),
            CommandStreamPart::AppendCatenateDataEnd => {}
            CommandStreamPart::AppendEndCatenate => ctx.write(b")"),
            CommandStreamPart::AppendFinish => ctx.write(b"\r\n"),
            CommandStreamPart::AuthenticateStart {
                tag,
                mechanism,
                initial_response,
            } => {
                tag.encode_ctx(ctx);
                ctx.write(b" AUTHENTICATE ");
                mechanism.encode_ctx(ctx);
                if let Some(ir) = initial_response {
                    ctx.sp();
                    let data = ir.declassify();
                    if data.is_empty() {
                        ctx.write(b"=");
                    } else {
                        ctx.write_str(&BASE64.encode(data));
                    }
                }
                ctx.write(b"\r\n");
            }
            CommandStreamPart::AuthenticateContinue(data) => data.encode_ctx(ctx),
        }
    }
}

fn write_append_flags_and_date(ctx: &mut EncodeContext, flags: &[Flag], date: &Option<InternalDate>) {
    if !flags.is_empty() {
        ctx.sp();
        write_list(flags, ctx);
    }
    if let Some(date) = date {
        ctx.sp();
        write_quoted_internal_date(ctx, date);
    }
}

#[cfg(test)]
mod tests {
    use std::convert::TryInto;

    use imap_wire_types::{
        core::{Literal, NonEmptyVec},
        fetch::{MacroOrMessageDataItemNames, MessageDataItemName},
        search::SearchKey,
        sequence::SequenceSet,
    };

    use super::*;
    use crate::testing::known_answer_test_encode;

    #[test]
    fn test_login_command() {
        let body = CommandBody::login("alice", "s3cr3t").unwrap();
        let command = Command::new("A1", body).unwrap();
        known_answer_test_encode(&command, b"A1 LOGIN alice s3cr3t\r\n");
    }

    #[test]
    fn test_select_command() {
        let body = CommandBody::select("INBOX").unwrap();
        let command = Command::new("A2", body).unwrap();
        known_answer_test_encode(&command, b"A2 SELECT INBOX\r\n");
    }

    #[test]
    fn test_uid_fetch_command() {
        let sequence_set: SequenceSet = "1:*".try_into().unwrap();
        let body = CommandBody::fetch(
            sequence_set,
            MacroOrMessageDataItemNames::MessageDataItemNames(vec![MessageDataItemName::Uid]),
            true,
        )
        .unwrap();
        let command = Command::new("A3", body).unwrap();
        known_answer_test_encode(&command, b"A3 UID FETCH 1:* UID\r\n");
    }

    #[test]
    fn test_search_command_wraps_and_at_top_level() {
        let body = CommandBody::search(
            NonEmptyVec::try_from(vec![SearchKey::Seen, SearchKey::Deleted]).unwrap(),
            false,
        );
        let command = Command::new("A4", body).unwrap();
        known_answer_test_encode(&command, b"A4 SEARCH SEEN DELETED\r\n");
    }

    #[test]
    fn test_append_with_single_literal_is_total_and_chunked() {
        let body = CommandBody::append(
            "INBOX",
            vec![Flag::Seen],
            None,
            imap_wire_types::extensions::binary::LiteralOrLiteral8::from(
                Literal::new(b"abc".to_vec()).unwrap(),
            ),
        )
        .unwrap();
        let command = Command::new("A5", body).unwrap();
        let chunks = super::encode_all(&command, &super::Options::default());
        let joined: Vec<u8> = chunks.iter().flat_map(|c| c.bytes.clone()).collect();
        assert_eq!(joined, b"A5 APPEND INBOX (\\Seen) {3}\r\nabc\r\n");
        assert!(chunks[0].wait_for_continuation_after);
    }

    #[test]
    fn test_command_stream_part_append_catenate() {
        let mut ctx = EncodeContext::new(super::Options::default());
        CommandStreamPart::AppendStart {
            tag: "A6".try_into().unwrap(),
            mailbox: "INBOX".try_into().unwrap(),
        }
        .encode_ctx(&mut ctx);
        CommandStreamPart::AppendBeginCatenate {
            flags: vec![],
            date: None,
        }
        .encode_ctx(&mut ctx);
        CommandStreamPart::AppendCatenateUrl {
            url: "/INBOX;UID=1".try_into().unwrap(),
            first: true,
        }
        .encode_ctx(&mut ctx);
        CommandStreamPart::AppendEndCatenate.encode_ctx(&mut ctx);
        CommandStreamPart::AppendFinish.encode_ctx(&mut ctx);
        let chunks = ctx.finish();
        let joined: Vec<u8> = chunks.into_iter().flat_map(|c| c.bytes).collect();
        assert_eq!(joined, b"A6 APPEND INBOX CATENATE (URL /INBOX;UID=1)\r\n");
    }
}
