use imap_wire_types::sequence::{LastCommandSet, SeqOrUid, Sequence, SequenceSet};

use super::{Encode, EncodeContext};

impl Encode for SeqOrUid {
    fn encode_ctx(&self, ctx: &mut EncodeContext) {
        match self {
            SeqOrUid::Value(value) => ctx.write_display(value),
            SeqOrUid::Asterisk => ctx.write(b"*"),
        }
    }
}

impl Encode for Sequence {
    fn encode_ctx(&self, ctx: &mut EncodeContext) {
        match self {
            Sequence::Single(value) => value.encode_ctx(ctx),
            Sequence::Range(start, end) => {
                start.encode_ctx(ctx);
                ctx.write(b":");
                end.encode_ctx(ctx);
            }
        }
    }
}

impl Encode for SequenceSet {
    fn encode_ctx(&self, ctx: &mut EncodeContext) {
        let sequences = self.0.as_slice();
        for (i, sequence) in sequences.iter().enumerate() {
            if i > 0 {
                ctx.write(b",");
            }
            sequence.encode_ctx(ctx);
        }
    }
}

impl Encode for LastCommandSet {
    fn encode_ctx(&self, ctx: &mut EncodeContext) {
        match self {
            LastCommandSet::Set(set) => set.encode_ctx(ctx),
            LastCommandSet::LastCommand => ctx.write(b"$"),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::convert::TryFrom;

    use super::*;
    use crate::testing::known_answer_test_encode;

    #[test]
    fn test_sequence_set_encodes_ranges_and_commas() {
        let set = SequenceSet::try_from("1,2:4,*").unwrap();
        known_answer_test_encode(&set, b"1,2:4,*");
    }
}
