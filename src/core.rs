//! Core types and primitives for the LTRIM-zero collation.
//!
//! This module defines:
//! - [`CollationError`]: The error taxonomy shared by every operation.
//! - [`to_upper`] / [`to_lower`]: Locale-independent ASCII byte folding.
//! - [`normalize`]: The trim-and-fold transform that comparison and key encoding are built on.
//! - Scratch: Request-scoped storage holding one normalized value.

use std::collections::TryReserveError;
use thiserror::Error;

/// Longest input, in bytes, accepted by the comparator and the key encoder.
pub const MAX_STRING_LENGTH: usize = 32_000;

/// Bytes stripped from the front of a value before it is folded.
///
/// Only the ASCII zero digit and the space character. Tab is not trimmed.
pub const TRIM_SET: [u8; 2] = [b'0', b' '];

/// Errors reported by the collation operations.
///
/// Every operation is a leaf: errors are detected locally and returned, never
/// raised across the host boundary (see [`crate::texttype`] for the sentinel mapping).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CollationError {
    /// Empty input or a zero-capacity destination.
    #[error("invalid input: empty value or zero-capacity destination")]
    InvalidInput,

    /// Input longer than [`MAX_STRING_LENGTH`].
    #[error("input of {len} bytes exceeds the {max} byte limit")]
    LengthExceeded { len: usize, max: usize },

    /// The normalized form does not fit the requested key capacity.
    #[error("normalized key of {needed} bytes does not fit in {capacity} bytes")]
    KeyTooLong { needed: usize, capacity: usize },

    /// Scratch storage could not be reserved.
    #[error("failed to allocate scratch storage")]
    AllocationFailure,
}

impl From<TryReserveError> for CollationError {
    fn from(_: TryReserveError) -> Self {
        CollationError::AllocationFailure
    }
}

/// Maps `a..=z` to `A..=Z`; every other byte is returned unchanged.
///
/// Pure range check: the result never depends on the process locale.
///
/// ```
/// use ltrimzero::core::to_upper;
///
/// assert_eq!(to_upper(b'q'), b'Q');
/// assert_eq!(to_upper(b'0'), b'0');
/// assert_eq!(to_upper(0xE9), 0xE9);
/// ```
#[inline(always)]
pub const fn to_upper(byte: u8) -> u8 {
    if matches!(byte, b'a'..=b'z') {
        byte - (b'a' - b'A')
    } else {
        byte
    }
}

/// Maps `A..=Z` to `a..=z`; every other byte is returned unchanged.
#[inline(always)]
pub const fn to_lower(byte: u8) -> u8 {
    if matches!(byte, b'A'..=b'Z') {
        byte + (b'a' - b'A')
    } else {
        byte
    }
}

/// Returns `true` if `byte` belongs to the [`TRIM_SET`].
#[inline(always)]
pub const fn is_trimmed(byte: u8) -> bool {
    matches!(byte, b'0' | b' ')
}

/// Normalizes `input` into `output` and returns the number of bytes written.
///
/// 1. Leading bytes from the [`TRIM_SET`] are skipped.
/// 2. If nothing is left, the normalized form is the single upper-cased last byte
///    of `input`, so `"0000"`, `"0"` and `" "` never collapse to an empty value.
/// 3. Otherwise the remainder is copied upper-cased, silently truncated once
///    `output` is full.
///
/// The normalized form is never longer than `input`, so an `output` of
/// `input.len()` bytes always holds the complete result.
///
/// # Errors
///
/// [`CollationError::InvalidInput`] if `input` or `output` is empty.
///
/// # Examples
///
/// ```
/// use ltrimzero::core::normalize;
///
/// let mut out = [0u8; 8];
/// let len = normalize(b"  00a1b", &mut out).unwrap();
/// assert_eq!(&out[..len], b"A1B");
///
/// let len = normalize(b"0000", &mut out).unwrap();
/// assert_eq!(&out[..len], b"0");
/// ```
pub fn normalize(input: &[u8], output: &mut [u8]) -> Result<usize, CollationError> {
    let Some(&last) = input.last() else {
        return Err(CollationError::InvalidInput);
    };
    if output.is_empty() {
        return Err(CollationError::InvalidInput);
    }

    match input.iter().position(|&byte| !is_trimmed(byte)) {
        None => {
            output[0] = to_upper(last);
            Ok(1)
        }
        Some(start) => {
            let rest = &input[start..];
            let written = rest.len().min(output.len());
            output
                .iter_mut()
                .zip(rest)
                .for_each(|(dst, &src)| *dst = to_upper(src));
            Ok(written)
        }
    }
}

/// Length of the normalized form of `input`, without producing it.
///
/// Returns 0 only for empty input.
pub fn normalized_len(input: &[u8]) -> usize {
    if input.is_empty() {
        return 0;
    }
    match input.iter().position(|&byte| !is_trimmed(byte)) {
        None => 1,
        Some(start) => input.len() - start,
    }
}

/// Returns the normalized form of `input` as an owned buffer.
///
/// # Errors
///
/// [`CollationError::InvalidInput`] for empty input, [`CollationError::AllocationFailure`]
/// if the buffer cannot be reserved.
pub fn normalized(input: &[u8]) -> Result<Vec<u8>, CollationError> {
    if input.is_empty() {
        return Err(CollationError::InvalidInput);
    }
    let scratch = Scratch::normalize(input)?;
    Ok(scratch.into_vec())
}

/// Rejects inputs longer than [`MAX_STRING_LENGTH`].
#[inline]
pub(crate) fn check_length(input: &[u8]) -> Result<(), CollationError> {
    if input.len() > MAX_STRING_LENGTH {
        return Err(CollationError::LengthExceeded {
            len: input.len(),
            max: MAX_STRING_LENGTH,
        });
    }
    Ok(())
}

/// Request-scoped storage holding one normalized value.
///
/// Sized exactly to the input it was built from and dropped before the owning
/// operation returns.
pub(crate) struct Scratch {
    buf: Vec<u8>,
    len: usize,
}

impl Scratch {
    /// Normalizes `input` into freshly reserved storage.
    ///
    /// Empty input yields an empty normalized value.
    pub(crate) fn normalize(input: &[u8]) -> Result<Self, CollationError> {
        let mut buf = Vec::new();
        buf.try_reserve_exact(input.len())?;
        buf.resize(input.len(), 0);

        let len = if input.is_empty() {
            0
        } else {
            normalize(input, &mut buf)?
        };
        Ok(Self { buf, len })
    }

    #[inline]
    pub(crate) fn as_bytes(&self) -> &[u8] {
        &self.buf[..self.len]
    }

    fn into_vec(mut self) -> Vec<u8> {
        self.buf.truncate(self.len);
        self.buf
    }
}
