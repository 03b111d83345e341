//! # Field-Table Entries
//!
//! The 2-byte tagged union at the heart of the sparse struct layout.
//!
//! Each encoded struct opens with a table of 16-bit entries, one per tag that
//! is present or skipped over. Processing any entry advances the running tag
//! cursor by one; the three entry kinds then mean:
//!
//! - `Skip(extra)` (odd word): advance the cursor by `extra` more tags
//!   without consuming data-segment bytes.
//! - `Inline(value)` (even word > 0): the field's value is `value` itself, a
//!   small non-negative integer or boolean, costing zero data-segment bytes.
//! - `Referenced` (word 0): the field's payload is the next unclaimed
//!   length-prefixed run of the data segment.
//!
//! Keeping the bit mapping in one place keeps encode and decode symmetric;
//! nothing outside this module touches the raw words.

use crate::config::MAX_INLINE;

/// One decoded field-table entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldEntry {
    /// Jump the tag cursor forward by `1 + extra` tags, consuming no data.
    Skip(u16),
    /// A small non-negative value stored directly in the entry.
    Inline(u16),
    /// The next length-prefixed run of the data segment belongs to this field.
    Referenced,
}

impl FieldEntry {
    /// Decode an entry from its wire word.
    pub fn from_word(word: u16) -> Self {
        if word & 1 != 0 {
            FieldEntry::Skip(word >> 1)
        } else if word == 0 {
            FieldEntry::Referenced
        } else {
            FieldEntry::Inline((word >> 1) - 1)
        }
    }

    /// Encode this entry to its wire word.
    ///
    /// `Inline` values above [`MAX_INLINE`] are not representable in 16 bits;
    /// the encoder routes them through the data segment before getting here.
    pub fn to_word(self) -> u16 {
        match self {
            FieldEntry::Skip(extra) => (extra << 1) | 1,
            FieldEntry::Inline(value) => {
                debug_assert!((value as i64) <= MAX_INLINE);
                (value + 1) << 1
            }
            FieldEntry::Referenced => 0,
        }
    }

    /// The entry covering a run of `absent` missing tags (`absent >= 1`).
    ///
    /// The entry's own cursor increment accounts for the first missing tag,
    /// so the stored extra count is one less than the run length.
    pub fn skip_run(absent: u32) -> Self {
        debug_assert!((1..=0x8000).contains(&absent));
        FieldEntry::Skip((absent - 1) as u16)
    }

    /// Total tag-cursor advance produced by processing this entry.
    pub fn advance(self) -> i64 {
        match self {
            FieldEntry::Skip(extra) => 1 + extra as i64,
            _ => 1,
        }
    }
}
