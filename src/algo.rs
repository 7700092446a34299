//! Collation operations: comparison, sort-key encoding and case folding.
//!
//! Every function here is pure and reentrant. Inputs are only read, outputs are
//! caller-supplied, and any scratch storage lives for the duration of one call.
//!
//! The main entry points are [`compare`] and [`encode_key`].

use crate::core::{CollationError, Scratch, check_length, to_lower, to_upper};
use std::cmp::Ordering;

/// Compares two values under the LTRIM-zero collation.
///
/// Both inputs are normalized (see [`crate::core::normalize`]) and the normalized
/// forms are compared byte-wise as unsigned bytes. When one is a prefix of the
/// other, the shorter one sorts first. An empty input normalizes to an empty
/// value and therefore sorts before every non-empty one.
///
/// # Errors
///
/// * [`CollationError::LengthExceeded`] if either input is longer than
///   [`crate::core::MAX_STRING_LENGTH`].
/// * [`CollationError::AllocationFailure`] if scratch storage cannot be reserved.
///
/// # Examples
///
/// ```
/// use ltrimzero::compare;
/// use std::cmp::Ordering;
///
/// assert_eq!(compare(b"00000A", b"a").unwrap(), Ordering::Equal);
/// assert_eq!(compare(b"    A", b"0A").unwrap(), Ordering::Equal);
/// assert_eq!(compare(b"0AB", b"a").unwrap(), Ordering::Greater);
/// ```
pub fn compare(a: &[u8], b: &[u8]) -> Result<Ordering, CollationError> {
    check_length(a)?;
    check_length(b)?;

    let norm_a = Scratch::normalize(a)?;
    let norm_b = Scratch::normalize(b)?;

    Ok(compare_normalized(norm_a.as_bytes(), norm_b.as_bytes()))
}

/// Prefix comparison with a shorter-first tie-break.
#[inline]
fn compare_normalized(a: &[u8], b: &[u8]) -> Ordering {
    let common = a.len().min(b.len());
    match a[..common].cmp(&b[..common]) {
        Ordering::Equal => a.len().cmp(&b.len()),
        other => other,
    }
}

/// Encodes the sort key of `input` into `dst` and returns its logical length.
///
/// The normalized form is written to the front of `dst` and the remainder is
/// zero-filled, so keys of one fixed width order byte-wise the same way
/// [`compare`] orders their inputs. Size `dst` with [`max_key_length`].
///
/// # Errors
///
/// * [`CollationError::InvalidInput`] if `input` or `dst` is empty.
/// * [`CollationError::LengthExceeded`] if `input` is longer than
///   [`crate::core::MAX_STRING_LENGTH`].
/// * [`CollationError::KeyTooLong`] if the normalized form does not fit in `dst`.
/// * [`CollationError::AllocationFailure`] if scratch storage cannot be reserved.
///
/// `dst` is left untouched on every error path.
///
/// # Examples
///
/// ```
/// use ltrimzero::encode_key;
///
/// let mut key = [0xFFu8; 6];
/// let len = encode_key(b"000ab", &mut key).unwrap();
/// assert_eq!(len, 2);
/// assert_eq!(&key, b"AB\0\0\0\0");
/// ```
pub fn encode_key(input: &[u8], dst: &mut [u8]) -> Result<usize, CollationError> {
    if input.is_empty() || dst.is_empty() {
        return Err(CollationError::InvalidInput);
    }
    check_length(input)?;

    let normalized = Scratch::normalize(input)?;
    let key = normalized.as_bytes();

    if key.len() > dst.len() {
        return Err(CollationError::KeyTooLong {
            needed: key.len(),
            capacity: dst.len(),
        });
    }

    let (head, padding) = dst.split_at_mut(key.len());
    head.copy_from_slice(key);
    padding.fill(0);

    Ok(key.len())
}

/// Encodes the sort key of `input` into a new buffer of `capacity` bytes.
///
/// # Errors
///
/// Same as [`encode_key`].
pub fn sort_key(input: &[u8], capacity: usize) -> Result<Vec<u8>, CollationError> {
    let mut key = Vec::new();
    key.try_reserve_exact(capacity)?;
    key.resize(capacity, 0);
    encode_key(input, &mut key)?;
    Ok(key)
}

/// Worst-case key length for an input of `len` bytes.
///
/// Normalization never grows a value, so this is `len` itself.
#[inline(always)]
pub const fn max_key_length(len: usize) -> usize {
    len
}

/// Copies `src` into `dst` upper-cased, without trimming.
///
/// Writes `min(src.len(), dst.len())` bytes and returns that count.
pub fn str_to_upper(src: &[u8], dst: &mut [u8]) -> usize {
    fold_into(src, dst, to_upper)
}

/// Copies `src` into `dst` lower-cased, without trimming.
///
/// Writes `min(src.len(), dst.len())` bytes and returns that count.
pub fn str_to_lower(src: &[u8], dst: &mut [u8]) -> usize {
    fold_into(src, dst, to_lower)
}

#[inline(always)]
fn fold_into(src: &[u8], dst: &mut [u8], fold: fn(u8) -> u8) -> usize {
    let written = src.len().min(dst.len());
    dst.iter_mut()
        .zip(src)
        .for_each(|(out, &byte)| *out = fold(byte));
    written
}
