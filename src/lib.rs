//! # ltrimzero
//!
//! `ltrimzero` implements a collation for identifiers that are stored as zero- or
//! space-padded text: leading `'0'` and `' '` bytes are ignored and the rest is
//! compared case-insensitively, so `"00000A"`, `"0A"`, `"A"`, `"    A"` and `"a"`
//! are all equal.
//!
//! ## Key Features
//!
//! - **Normalization**: A single trim-and-fold rule ([`crate::core::normalize`]) drives both
//!   comparison and key encoding, so the two never disagree.
//! - **Fixed-width sort keys**: [`encode_key`] writes a zero-padded key whose
//!   byte-wise order matches [`compare`], ready for an ordered index.
//! - **Locale independence**: Case folding is a pure ASCII range check.
//! - **Host registration**: [`texttype::lookup_texttype`] returns a capability record
//!   of plain function pointers with sentinel-style results.
//! - **Collated sorting**: [`collated_sort`] orders whole collections through a
//!   flat table of sort keys with a cached-prefix fast path.
//!
//! ## Usage
//!
//! ### Comparing values
//!
//! ```rust
//! use ltrimzero::compare;
//! use std::cmp::Ordering;
//!
//! assert_eq!(compare(b"00000A", b"0A").unwrap(), Ordering::Equal);
//! assert_eq!(compare(b"A", b"    a").unwrap(), Ordering::Equal);
//! assert_eq!(compare(b"0009", b"10").unwrap(), Ordering::Greater);
//! ```
//!
//! ### Building sort keys
//!
//! ```rust
//! use ltrimzero::{encode_key, max_key_length};
//!
//! let input = b"  00x7";
//! let mut key = vec![0u8; max_key_length(input.len())];
//! let len = encode_key(input, &mut key).unwrap();
//!
//! assert_eq!(&key[..len], b"X7");
//! assert!(key[len..].iter().all(|&b| b == 0));
//! ```
//!
//! ### Sorting a collection
//!
//! ```rust
//! use ltrimzero::collated_sort_mut;
//!
//! let mut data = vec!["000b", "A", "  c"];
//! collated_sort_mut(&mut data).unwrap();
//!
//! assert_eq!(data, vec!["A", "000b", "  c"]);
//! ```
//!
//! ## Trim set
//!
//! Only `'0'` and `' '` are trimmed. Tab and every other byte are significant.
//! A value made up entirely of trimmed bytes normalizes to its last byte, so
//! `"0000"` equals `"0"` and `"   "` equals `" "`.

pub mod algo;
pub mod core;
pub mod index;
pub mod texttype;

pub use crate::algo::{compare, encode_key, max_key_length, sort_key, str_to_lower, str_to_upper};
pub use crate::core::{CollationError, MAX_STRING_LENGTH};
pub use crate::index::{KeyAccessor, KeyTable, collated_sort, collated_sort_mut};
pub use crate::texttype::{LookupRequest, TextType, lookup_texttype};

pub mod prelude {
    pub use crate::algo::{compare, encode_key, max_key_length, sort_key};
    pub use crate::core::{CollationError, normalize};
    pub use crate::index::{KeyAccessor, collated_sort, collated_sort_mut};
    pub use crate::texttype::{KeyKind, LookupRequest, TextType, lookup_texttype};
}
