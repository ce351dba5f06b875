//! `BODY` / `BODYSTRUCTURE` data items (RFC 3501 §7.4.2).

use crate::{
    core::{IString, NString, NonEmptyVec},
    envelope::Envelope,
};

/// A non-multipart body part: basic fields plus type-specific fields.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Body {
    pub basic: BasicFields,
    pub specific: SpecificFields,
}

/// Fields common to every non-multipart body part.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BasicFields {
    /// Attribute/value pairs, e.g. `("charset" "us-ascii")`.
    pub parameter_list: Vec<(IString, IString)>,
    /// Content id.
    pub id: NString,
    /// Content description.
    pub description: NString,
    /// Content transfer encoding, e.g. `"7BIT"`, `"BASE64"`.
    pub content_transfer_encoding: IString,
    /// Size of the body in octets, in its transfer encoding.
    pub size: u32,
}

/// The part of a non-multipart body that depends on its media type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SpecificFields {
    /// Any media type other than `MESSAGE/RFC822` and `TEXT/*`.
    Basic { type_: IString, subtype: IString },
    /// `MESSAGE/RFC822`: basic fields are followed by an envelope, the encapsulated body
    /// structure, and a line count.
    Message {
        envelope: Envelope,
        body_structure: Box<BodyStructure>,
        number_of_lines: u32,
    },
    /// `TEXT/*`: basic fields are followed by a line count.
    Text { subtype: IString, number_of_lines: u32 },
}

/// The `BODYSTRUCTURE` of a message, recursively describing its MIME parts.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum BodyStructure {
    /// A single, non-multipart body.
    Single {
        body: Body,
        /// Present only in a `BODYSTRUCTURE` fetch, never in a plain `BODY` fetch.
        extension: Option<SinglePartExtensionData>,
    },
    /// A `multipart/*` body: one or more nested parts plus the multipart subtype.
    Multi {
        bodies: NonEmptyVec<BodyStructure>,
        subtype: IString,
        extension_data: Option<MultiPartExtensionData>,
    },
}

/// Extension data trailing a non-multipart `BODYSTRUCTURE` entry, in RFC 3501 order.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SinglePartExtensionData {
    pub md5: NString,
    pub disposition: Option<Option<(IString, Vec<(IString, IString)>)>>,
    pub language: Option<Vec<IString>>,
    pub location: Option<NString>,
    /// Extension data not yet defined by any IMAP revision; preserved so a client can still
    /// round-trip a server response that includes it.
    pub extension: Vec<BodyExtension>,
}

/// Extension data trailing a multipart `BODYSTRUCTURE` entry, in RFC 3501 order.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MultiPartExtensionData {
    pub parameter_list: Vec<(IString, IString)>,
    pub disposition: Option<Option<(IString, Vec<(IString, IString)>)>>,
    pub language: Option<Vec<IString>>,
    pub location: Option<NString>,
    pub extension: Vec<BodyExtension>,
}

/// `body-extension = nstring / number / "(" body-extension *(SP body-extension) ")"`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum BodyExtension {
    NString(NString),
    Number(u32),
    List(NonEmptyVec<BodyExtension>),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::IString;

    fn istr(s: &str) -> IString {
        IString::try_from(s).unwrap()
    }

    #[test]
    fn test_single_body_structure() {
        let body = BodyStructure::Single {
            body: Body {
                basic: BasicFields {
                    parameter_list: vec![(istr("charset"), istr("us-ascii"))],
                    id: NString(None),
                    description: NString(None),
                    content_transfer_encoding: istr("7BIT"),
                    size: 2279,
                },
                specific: SpecificFields::Text {
                    subtype: istr("plain"),
                    number_of_lines: 48,
                },
            },
            extension: None,
        };

        match body {
            BodyStructure::Single { body, extension } => {
                assert_eq!(body.basic.size, 2279);
                assert!(extension.is_none());
            }
            BodyStructure::Multi { .. } => panic!("expected Single"),
        }
    }

    #[test]
    fn test_nested_body_extension() {
        let ext = BodyExtension::List(
            NonEmptyVec::try_from(vec![
                BodyExtension::Number(1),
                BodyExtension::NString(NString(None)),
            ])
            .unwrap(),
        );

        match ext {
            BodyExtension::List(items) => assert_eq!(items.as_slice().len(), 2),
            _ => panic!("expected List"),
        }
    }
}
