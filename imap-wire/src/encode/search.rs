//! Encoding for [`SearchKey`], implementing spec.md §4.3.3's parenthesization rules.
//!
//! `search-key` has no dedicated conjunction token: `SearchKey::And` models an implicit AND of its
//! children. At the top level (the `SEARCH`/`SORT`/`THREAD` command position) that list is simply
//! space-joined per the `1*(SP search-key)` grammar with no enclosing parens. As an operand nested
//! inside `NOT`/`OR`, or nested inside another `And`, it needs parentheses unless it collapses to
//! exactly one child (in which case the parens would be redundant and are elided).

use imap_wire_types::search::SearchKey;

use super::{Encode, EncodeContext};

/// Encodes `key` as it appears directly after `SEARCH`/`UID SEARCH`/`SORT`/`THREAD`'s criteria
/// position: a bare `And` is unwrapped into its space-joined children with no enclosing parens.
pub fn encode_search_criteria_command(key: &SearchKey, ctx: &mut EncodeContext) {
    match key {
        SearchKey::And(items) => {
            let items = items.as_slice();
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    ctx.sp();
                }
                encode_operand(item, ctx);
            }
        }
        other => encode_operand(other, ctx),
    }
}

/// Encodes `key` as it appears nested inside another key (an operand of `NOT`/`OR`, or a child of
/// a nested `And`).
fn encode_operand(key: &SearchKey, ctx: &mut EncodeContext) {
    match key {
        SearchKey::And(items) => {
            let items = items.as_slice();
            if items.len() == 1 {
                encode_operand(&items[0], ctx);
            } else {
                ctx.write(b"(");
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        ctx.sp();
                    }
                    encode_operand(item, ctx);
                }
                ctx.write(b")");
            }
        }
        SearchKey::Not(inner) => {
            ctx.write(b"NOT ");
            encode_possibly_parenthesized(inner, ctx);
        }
        SearchKey::Or(left, right) => {
            ctx.write(b"OR ");
            encode_possibly_parenthesized(left, ctx);
            ctx.sp();
            encode_possibly_parenthesized(right, ctx);
        }
        SearchKey::SequenceSet(set) => set.encode_ctx(ctx),
        SearchKey::All => ctx.write(b"ALL"),
        SearchKey::Answered => ctx.write(b"ANSWERED"),
        SearchKey::Bcc(s) => {
            ctx.write(b"BCC ");
            s.encode_ctx(ctx);
        }
        SearchKey::Before(date) => {
            ctx.write(b"BEFORE ");
            date.encode_ctx(ctx);
        }
        SearchKey::Body(s) => {
            ctx.write(b"BODY ");
            s.encode_ctx(ctx);
        }
        SearchKey::Cc(s) => {
            ctx.write(b"CC ");
            s.encode_ctx(ctx);
        }
        SearchKey::Deleted => ctx.write(b"DELETED"),
        SearchKey::Draft => ctx.write(b"DRAFT"),
        SearchKey::Flagged => ctx.write(b"FLAGGED"),
        SearchKey::From(s) => {
            ctx.write(b"FROM ");
            s.encode_ctx(ctx);
        }
        SearchKey::Header(name, value) => {
            ctx.write(b"HEADER ");
            name.encode_ctx(ctx);
            ctx.sp();
            value.encode_ctx(ctx);
        }
        SearchKey::Keyword(atom) => {
            ctx.write(b"KEYWORD ");
            atom.encode_ctx(ctx);
        }
        SearchKey::Larger(n) => {
            ctx.write(b"LARGER ");
            ctx.write_display(n);
        }
        SearchKey::New => ctx.write(b"NEW"),
        SearchKey::Old => ctx.write(b"OLD"),
        SearchKey::On(date) => {
            ctx.write(b"ON ");
            date.encode_ctx(ctx);
        }
        SearchKey::Recent => ctx.write(b"RECENT"),
        SearchKey::Seen => ctx.write(b"SEEN"),
        SearchKey::SentBefore(date) => {
            ctx.write(b"SENTBEFORE ");
            date.encode_ctx(ctx);
        }
        SearchKey::SentOn(date) => {
            ctx.write(b"SENTON ");
            date.encode_ctx(ctx);
        }
        SearchKey::SentSince(date) => {
            ctx.write(b"SENTSINCE ");
            date.encode_ctx(ctx);
        }
        SearchKey::Since(date) => {
            ctx.write(b"SINCE ");
            date.encode_ctx(ctx);
        }
        SearchKey::Smaller(n) => {
            ctx.write(b"SMALLER ");
            ctx.write_display(n);
        }
        SearchKey::Subject(s) => {
            ctx.write(b"SUBJECT ");
            s.encode_ctx(ctx);
        }
        SearchKey::Text(s) => {
            ctx.write(b"TEXT ");
            s.encode_ctx(ctx);
        }
        SearchKey::To(s) => {
            ctx.write(b"TO ");
            s.encode_ctx(ctx);
        }
        SearchKey::Uid(set) => {
            ctx.write(b"UID ");
            set.encode_ctx(ctx);
        }
        SearchKey::Unanswered => ctx.write(b"UNANSWERED"),
        SearchKey::Undeleted => ctx.write(b"UNDELETED"),
        SearchKey::Undraft => ctx.write(b"UNDRAFT"),
        SearchKey::Unflagged => ctx.write(b"UNFLAGGED"),
        SearchKey::Unkeyword(atom) => {
            ctx.write(b"UNKEYWORD ");
            atom.encode_ctx(ctx);
        }
        SearchKey::Unseen => ctx.write(b"UNSEEN"),
        SearchKey::Older(n) => {
            ctx.write(b"OLDER ");
            ctx.write_display(n);
        }
        SearchKey::Younger(n) => {
            ctx.write(b"YOUNGER ");
            ctx.write_display(n);
        }
        SearchKey::Filter(name) => {
            ctx.write(b"FILTER ");
            name.encode_ctx(ctx);
        }
        SearchKey::ModSeq { entry, value } => {
            ctx.write(b"MODSEQ ");
            if let Some((name, kind)) = entry {
                ctx.write(b"\"");
                ctx.write_str(name.inner());
                ctx.write(b"\" ");
                ctx.write(match kind {
                    imap_wire_types::search::EntryTypeRequest::Priv => b"priv".as_slice(),
                    imap_wire_types::search::EntryTypeRequest::Shared => b"shared",
                    imap_wire_types::search::EntryTypeRequest::All => b"all",
                });
                ctx.sp();
            }
            ctx.write_display(value);
        }
    }
}

/// `encode_operand` already parenthesizes a multi-child `And` and elides a single-child one, which
/// is exactly the rule NOT/OR need for their operands.
fn encode_possibly_parenthesized(key: &SearchKey, ctx: &mut EncodeContext) {
    encode_operand(key, ctx);
}

#[cfg(test)]
mod tests {
    use std::convert::TryInto;

    use imap_wire_types::core::{AString, NonEmptyVec};

    use super::*;
    use crate::encode::{encode_all, Options};

    fn encode(key: &SearchKey) -> String {
        let chunks = encode_all(&Wrapper(key), &Options::default());
        String::from_utf8(chunks.into_iter().flat_map(|c| c.bytes).collect()).unwrap()
    }

    struct Wrapper<'a>(&'a SearchKey);
    impl Encode for Wrapper<'_> {
        fn encode_ctx(&self, ctx: &mut EncodeContext) {
            encode_search_criteria_command(self.0, ctx);
        }
    }

    #[test]
    fn test_and_single_elides_parens() {
        let key = SearchKey::And(NonEmptyVec::single(SearchKey::Seen));
        assert_eq!(encode(&key), "SEEN");
    }

    #[test]
    fn test_and_multi_at_top_level_has_no_enclosing_parens() {
        let key = SearchKey::And(
            NonEmptyVec::try_from(vec![SearchKey::Seen, SearchKey::Deleted]).unwrap(),
        );
        assert_eq!(encode(&key), "SEEN DELETED");
    }

    #[test]
    fn test_nested_and_multi_gets_parens() {
        let nested = SearchKey::And(
            NonEmptyVec::try_from(vec![SearchKey::Seen, SearchKey::Deleted]).unwrap(),
        );
        let key = SearchKey::Not(Box::new(nested));
        assert_eq!(encode(&key), "NOT (SEEN DELETED)");
    }

    #[test]
    fn test_not_single_operand_has_no_parens() {
        let key = SearchKey::Not(Box::new(SearchKey::Seen));
        assert_eq!(encode(&key), "NOT SEEN");
    }

    #[test]
    fn test_or_with_astring_operand() {
        let from: AString = "alice".try_into().unwrap();
        let key = SearchKey::Or(
            Box::new(SearchKey::From(from.clone())),
            Box::new(SearchKey::To(from)),
        );
        assert_eq!(encode(&key), "OR FROM alice TO alice");
    }
}
