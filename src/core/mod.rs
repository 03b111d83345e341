//! # Core Wire Components
//!
//! Low-level building blocks for the tag-sparse wire format.
//!
//! ## Components
//! - **Wire**: little-endian primitive reads/writes and the bounds-checked
//!   [`wire::Reader`] cursor
//! - **Entry**: the 2-byte `Skip | Inline | Referenced` field-table entry
//!
//! ## Wire Format
//! ```text
//! [EntryCount(2)] [FieldTable(2 * n)] [DataSegment...]
//! ```
//!
//! ## Safety
//! - Every read is bounds-checked before it happens
//! - Length prefixes are validated against the remaining buffer
//! - 64-bit integers never pass through floating point

pub mod entry;
pub mod wire;
