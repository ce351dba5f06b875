use imap_wire_types::fetch::{MacroOrMessageDataItemNames, MessageDataItemName, Part, Section};

use super::{write_list, Encode, EncodeContext};

impl Encode for Part {
    fn encode_ctx(&self, ctx: &mut EncodeContext) {
        let parts = self.0.as_slice();
        for (i, part) in parts.iter().enumerate() {
            if i > 0 {
                ctx.write(b".");
            }
            ctx.write_display(part);
        }
    }
}

fn encode_header_field_list(ctx: &mut EncodeContext, part: &Option<Part>, keyword: &str, names: &[imap_wire_types::core::AString]) {
    if let Some(part) = part {
        part.encode_ctx(ctx);
        ctx.write(b".");
    }
    ctx.write_str(keyword);
    ctx.sp();
    write_list(names, ctx);
}

impl Encode for Section {
    fn encode_ctx(&self, ctx: &mut EncodeContext) {
        match self {
            Section::Part(part) => part.encode_ctx(ctx),
            Section::Header(part) => {
                if let Some(part) = part {
                    part.encode_ctx(ctx);
                    ctx.write(b".");
                }
                ctx.write(b"HEADER");
            }
            Section::HeaderFields(part, names) => {
                encode_header_field_list(ctx, part, "HEADER.FIELDS", names.as_slice())
            }
            Section::HeaderFieldsNot(part, names) => {
                encode_header_field_list(ctx, part, "HEADER.FIELDS.NOT", names.as_slice())
            }
            Section::Text(part) => {
                if let Some(part) = part {
                    part.encode_ctx(ctx);
                    ctx.write(b".");
                }
                ctx.write(b"TEXT");
            }
            Section::Mime(part) => {
                part.encode_ctx(ctx);
                ctx.write(b".MIME");
            }
        }
    }
}

fn encode_partial(ctx: &mut EncodeContext, partial: &Option<(u32, std::num::NonZeroU32)>) {
    if let Some((start, len)) = partial {
        ctx.write(b"<");
        ctx.write_display(start);
        ctx.write(b".");
        ctx.write_display(len);
        ctx.write(b">");
    }
}

fn encode_numeric_section(ctx: &mut EncodeContext, section: &[std::num::NonZeroU32]) {
    ctx.write(b"[");
    for (i, n) in section.iter().enumerate() {
        if i > 0 {
            ctx.write(b".");
        }
        ctx.write_display(n);
    }
    ctx.write(b"]");
}

impl Encode for MessageDataItemName {
    fn encode_ctx(&self, ctx: &mut EncodeContext) {
        match self {
            MessageDataItemName::Body => ctx.write(b"BODY"),
            MessageDataItemName::BodyExt {
                section,
                partial,
                peek,
            } => {
                ctx.write(if *peek { b"BODY.PEEK[".as_slice() } else { b"BODY[" });
                if let Some(section) = section {
                    section.encode_ctx(ctx);
                }
                ctx.write(b"]");
                encode_partial(ctx, partial);
            }
            MessageDataItemName::BodyStructure => ctx.write(b"BODYSTRUCTURE"),
            MessageDataItemName::Envelope => ctx.write(b"ENVELOPE"),
            MessageDataItemName::Flags => ctx.write(b"FLAGS"),
            MessageDataItemName::InternalDate => ctx.write(b"INTERNALDATE"),
            MessageDataItemName::Rfc822 => ctx.write(b"RFC822"),
            MessageDataItemName::Rfc822Header => ctx.write(b"RFC822.HEADER"),
            MessageDataItemName::Rfc822Size => ctx.write(b"RFC822.SIZE"),
            MessageDataItemName::Rfc822Text => ctx.write(b"RFC822.TEXT"),
            MessageDataItemName::Uid => ctx.write(b"UID"),
            MessageDataItemName::Binary {
                section,
                partial,
                peek,
            } => {
                ctx.write(if *peek {
                    b"BINARY.PEEK".as_slice()
                } else {
                    b"BINARY"
                });
                encode_numeric_section(ctx, section);
                encode_partial(ctx, partial);
            }
            MessageDataItemName::BinarySize { section } => {
                ctx.write(b"BINARY.SIZE");
                encode_numeric_section(ctx, section);
            }
        }
    }
}

impl Encode for MacroOrMessageDataItemNames {
    fn encode_ctx(&self, ctx: &mut EncodeContext) {
        match self {
            MacroOrMessageDataItemNames::Macro(m) => ctx.write_display(m),
            MacroOrMessageDataItemNames::MessageDataItemNames(items) => {
                if items.len() == 1 {
                    items[0].encode_ctx(ctx);
                } else {
                    write_list(items, ctx);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::{convert::TryInto, num::NonZeroU32};

    use imap_wire_types::core::NonEmptyVec;

    use super::*;
    use crate::testing::known_answer_test_encode;

    #[test]
    fn test_body_ext_with_section_and_partial() {
        let part = Part(NonEmptyVec::single(NonZeroU32::new(1).unwrap()));
        let item = MessageDataItemName::BodyExt {
            section: Some(Section::Part(part)),
            partial: Some((0, NonZeroU32::new(512).unwrap())),
            peek: true,
        };
        known_answer_test_encode(&item, b"BODY.PEEK[1]<0.512>");
    }

    #[test]
    fn test_header_fields_section() {
        let name: imap_wire_types::core::AString = "TO".try_into().unwrap();
        let section = Section::HeaderFields(None, NonEmptyVec::single(name));
        known_answer_test_encode(&section, b"HEADER.FIELDS (TO)");
    }

    #[test]
    fn test_macro_or_items_single_item_has_no_parens() {
        let items = MacroOrMessageDataItemNames::MessageDataItemNames(vec![
            MessageDataItemName::Flags,
        ]);
        known_answer_test_encode(&items, b"FLAGS");
    }

    #[test]
    fn test_macro_or_items_multiple_items_parenthesized() {
        let items = MacroOrMessageDataItemNames::MessageDataItemNames(vec![
            MessageDataItemName::Flags,
            MessageDataItemName::Uid,
        ]);
        known_answer_test_encode(&items, b"(FLAGS UID)");
    }
}
