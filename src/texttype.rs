//! Registration layer: the capability record handed to a storage host.
//!
//! A host that loads collations asks for one by name through [`lookup_texttype`]
//! and receives a [`TextType`]: a record of plain function pointers plus a few
//! descriptive fields. The host only ever sees sentinel-style results here. Errors
//! from [`crate::algo`] are folded into return values and an out-of-band error
//! flag, and nothing panics across this boundary.
//!
//! ```
//! use ltrimzero::texttype::{KeyKind, LookupRequest, lookup_texttype};
//!
//! let mut tt = lookup_texttype(&LookupRequest::new("WIN1252_LTRIM_ZERO", "WIN1252")).unwrap();
//!
//! let mut error = false;
//! assert_eq!((tt.compare)(b"000a", b"  A", &mut error), 0);
//! assert!(!error);
//!
//! let mut key = [0u8; 4];
//! assert_eq!((tt.string_to_key)(b"0042", &mut key, KeyKind::Sort), 2);
//! assert_eq!(&key, b"42\0\0");
//!
//! tt.destroy();
//! assert!(tt.name().is_none());
//! ```

use crate::algo::{compare, encode_key, max_key_length, str_to_lower, str_to_upper};
use crate::core::CollationError;
use std::cmp::Ordering;
use std::ffi::{CStr, CString};
use std::fmt;
use tracing::{debug, warn};

/// Version of the capability record layout.
pub const TEXTTYPE_VERSION_1: u16 = 1;

/// Country code for collations not tied to a locale.
pub const CC_INTL: i16 = 255;

/// Returned by `string_to_key` when no key could be produced.
pub const BAD_KEY_LENGTH: u16 = u16::MAX;

/// Worst-case key length for a source length.
pub type KeyLengthFn = fn(u16) -> u16;
/// Writes a zero-padded key into the destination; returns its length or a sentinel.
pub type StringToKeyFn = fn(&[u8], &mut [u8], KeyKind) -> u16;
/// Three-way comparison returning `-1`, `0` or `1`; sets the flag on error.
pub type CompareFn = fn(&[u8], &[u8], &mut bool) -> i16;
/// Untrimmed case conversion; returns the number of bytes written.
pub type CaseFn = fn(&[u8], &mut [u8]) -> usize;
/// Canonical-form conversion; returns the number of bytes written.
pub type CanonicalFn = fn(&[u8], &mut [u8]) -> usize;

/// The kind of key the host requests from `string_to_key`.
///
/// This collation produces the same bytes for every kind.
#[repr(u16)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyKind {
    Sort = 0,
    Partial = 1,
    Unique = 2,
    MultiStarting = 3,
}

impl TryFrom<u16> for KeyKind {
    type Error = CollationError;

    fn try_from(raw: u16) -> Result<Self, Self::Error> {
        match raw {
            0 => Ok(KeyKind::Sort),
            1 => Ok(KeyKind::Partial),
            2 => Ok(KeyKind::Unique),
            3 => Ok(KeyKind::MultiStarting),
            _ => Err(CollationError::InvalidInput),
        }
    }
}

/// Registration inputs supplied by the host.
///
/// Only `name` is interpreted; everything else is opaque configuration that is
/// recorded in the logs and otherwise ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LookupRequest<'a> {
    /// Collation name, e.g. `WIN1252_LTRIM_ZERO`. Becomes the display name.
    pub name: &'a str,
    /// Character set the collation is declared for.
    pub charset_name: &'a str,
    /// Host attribute bits.
    pub attributes: u16,
    /// Collation-specific attribute bytes.
    pub specific_attributes: &'a [u8],
    /// Whether the host asked for attributes to be ignored.
    pub ignore_attributes: bool,
    /// Free-form configuration string from the host's collation config file.
    pub config_info: Option<&'a str>,
}

impl<'a> LookupRequest<'a> {
    pub fn new(name: &'a str, charset_name: &'a str) -> Self {
        Self {
            name,
            charset_name,
            attributes: 0,
            specific_attributes: &[],
            ignore_attributes: false,
            config_info: None,
        }
    }
}

/// Capability record for one registered collation.
///
/// Built once by [`lookup_texttype`]. The function pointers are fixed; the only
/// owned resource is the display name, released by [`TextType::destroy`] or when
/// the record is dropped.
pub struct TextType {
    pub version: u16,
    name: Option<CString>,
    pub country: i16,
    /// Bytes per character in the canonical form.
    pub canonical_width: u8,
    pub flags: u16,
    /// PAD SPACE semantics.
    pub pad_option: bool,

    pub key_length: KeyLengthFn,
    pub string_to_key: StringToKeyFn,
    pub compare: CompareFn,
    pub str_to_upper: CaseFn,
    pub str_to_lower: CaseFn,
    /// `None` means the host's default canonical conversion applies.
    pub canonical: Option<CanonicalFn>,
}

impl TextType {
    /// Null-terminated display name, until [`TextType::destroy`] is called.
    pub fn name(&self) -> Option<&CStr> {
        self.name.as_deref()
    }

    /// Display name as text, until [`TextType::destroy`] is called.
    pub fn display_name(&self) -> Option<&str> {
        self.name().and_then(|name| name.to_str().ok())
    }

    /// Returns `true` while the display name is still held.
    pub fn is_registered(&self) -> bool {
        self.name.is_some()
    }

    /// Releases the display name.
    ///
    /// Safe to call any number of times; only the first call releases anything.
    pub fn destroy(&mut self) {
        match self.name.take() {
            Some(name) => debug!(name = ?name, "released collation display name"),
            None => warn!("destroy called on a collation that was already released"),
        }
    }
}

impl fmt::Debug for TextType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TextType")
            .field("version", &self.version)
            .field("name", &self.name)
            .field("country", &self.country)
            .field("canonical_width", &self.canonical_width)
            .field("flags", &self.flags)
            .field("pad_option", &self.pad_option)
            .field("canonical", &self.canonical.is_some())
            .finish_non_exhaustive()
    }
}

/// Registers the LTRIM-zero collation under `request.name`.
///
/// Returns `None` when the name is empty or contains a NUL byte, since it must be
/// kept as a null-terminated display name.
pub fn lookup_texttype(request: &LookupRequest<'_>) -> Option<TextType> {
    if request.name.is_empty() {
        warn!(charset = request.charset_name, "refusing to register a collation without a name");
        return None;
    }
    let name = match CString::new(request.name) {
        Ok(name) => name,
        Err(err) => {
            warn!(
                name = request.name,
                nul_position = err.nul_position(),
                "refusing to register a collation whose name contains NUL"
            );
            return None;
        }
    };

    debug!(
        name = request.name,
        charset = request.charset_name,
        attributes = request.attributes,
        specific_attributes = request.specific_attributes.len(),
        ignore_attributes = request.ignore_attributes,
        config_info = ?request.config_info,
        "registered ltrim-zero collation"
    );

    Some(TextType {
        version: TEXTTYPE_VERSION_1,
        name: Some(name),
        country: CC_INTL,
        canonical_width: 1,
        flags: 0,
        pad_option: true,
        key_length: key_length_function,
        string_to_key: string_to_key_function,
        compare: compare_function,
        str_to_upper,
        str_to_lower,
        canonical: None,
    })
}

fn key_length_function(len: u16) -> u16 {
    u16::try_from(max_key_length(usize::from(len))).unwrap_or(BAD_KEY_LENGTH)
}

/// `0` when there is nothing to encode, [`BAD_KEY_LENGTH`] on every other failure.
fn string_to_key_function(src: &[u8], dst: &mut [u8], _kind: KeyKind) -> u16 {
    match encode_key(src, dst) {
        Ok(len) => u16::try_from(len).unwrap_or(BAD_KEY_LENGTH),
        Err(CollationError::InvalidInput) => 0,
        Err(_) => BAD_KEY_LENGTH,
    }
}

fn compare_function(a: &[u8], b: &[u8], error_flag: &mut bool) -> i16 {
    *error_flag = false;
    match compare(a, b) {
        Ok(Ordering::Less) => -1,
        Ok(Ordering::Equal) => 0,
        Ok(Ordering::Greater) => 1,
        Err(_) => {
            *error_flag = true;
            0
        }
    }
}
