//! `STATUS` command data items.

use std::num::NonZeroU32;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Status data item name used to request a status data item.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[doc(alias = "StatusAttribute")]
pub enum StatusDataItemName {
    /// The number of messages in the mailbox.
    Messages,
    /// The number of messages with the `\Recent` flag set.
    Recent,
    /// The next unique identifier value of the mailbox.
    UidNext,
    /// The unique identifier validity value of the mailbox.
    UidValidity,
    /// The number of messages which do not have the `\Seen` flag set.
    Unseen,
    /// The number of messages with the `\Deleted` flag set.
    Deleted,
    /// The amount of storage space that can be reclaimed by performing EXPUNGE.
    DeletedStorage,
    /// RFC 7162 CONDSTORE: the highest modification sequence of any message in the mailbox.
    HighestModSeq,
}

/// Status data item, as returned in a `STATUS` response.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[doc(alias = "StatusAttributeValue")]
pub enum StatusDataItem {
    Messages(u32),
    Recent(u32),
    UidNext(NonZeroU32),
    UidValidity(NonZeroU32),
    Unseen(u32),
    Deleted(u32),
    DeletedStorage(u64),
    /// Per spec.md, the 63-bit modification sequence counter used by CONDSTORE/QRESYNC.
    HighestModSeq(u64),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_data_item_variants() {
        let item = StatusDataItem::UidNext(NonZeroU32::new(42).unwrap());
        assert_eq!(item, StatusDataItem::UidNext(NonZeroU32::new(42).unwrap()));
        assert_ne!(item, StatusDataItem::Unseen(42));
    }
}
