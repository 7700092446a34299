//! Collated ordering of whole collections through fixed-width sort keys.
//!
//! This is the ordered-storage side of [`crate::algo::encode_key`]: every element
//! of a collection is encoded into one flat [`KeyTable`] at a single width, and the
//! table is sorted byte-wise. The result matches [`crate::algo::compare`].
//!
//! Sorting follows a cache-friendly scheme:
//! - Each index is paired with an 8-byte big-endian prefix of its key, so most
//!   comparisons are resolved in registers.
//! - Large inputs are first distributed into 256 buckets on the leading key byte.
//! - Ties on key bytes fall back to the logical key length, then to the index,
//!   which makes the ordering stable.

use crate::algo::{encode_key, max_key_length};
use crate::core::{CollationError, MAX_STRING_LENGTH};
use cuneiform::cuneiform;
use std::cmp::Ordering;
use std::collections::VecDeque;
use tracing::trace_span;

/// Number of cached key bytes per sort pointer.
pub const PREFIX_SIZE: usize = 8;

const RADIX_SORT_THRESHOLD: usize = 1024;
const RADIX_BUCKETS: usize = 256;

/// A trait for accessing raw values of a collection without copying.
///
/// # Examples
///
/// ```
/// use ltrimzero::index::KeyAccessor;
///
/// struct Accounts {
///     numbers: Vec<String>,
/// }
///
/// impl KeyAccessor for Accounts {
///     fn get_key(&self, index: usize) -> &[u8] {
///         self.numbers[index].as_bytes()
///     }
///
///     fn len(&self) -> usize {
///         self.numbers.len()
///     }
/// }
/// ```
pub trait KeyAccessor {
    /// Returns the raw value at `index`.
    fn get_key(&self, index: usize) -> &[u8];

    /// Returns the number of values in the collection.
    fn len(&self) -> usize;

    /// Returns `true` if the collection is empty.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<T: AsRef<[u8]>> KeyAccessor for [T] {
    fn get_key(&self, index: usize) -> &[u8] {
        self[index].as_ref()
    }

    fn len(&self) -> usize {
        self.len()
    }
}

impl<T: AsRef<[u8]>> KeyAccessor for Vec<T> {
    fn get_key(&self, index: usize) -> &[u8] {
        self[index].as_ref()
    }

    fn len(&self) -> usize {
        self.len()
    }
}

impl<T: AsRef<[u8]>> KeyAccessor for VecDeque<T> {
    fn get_key(&self, index: usize) -> &[u8] {
        self[index].as_ref()
    }

    fn len(&self) -> usize {
        self.len()
    }
}

/// Sort keys for a whole collection, stored back to back at one width.
///
/// The width is [`max_key_length`] of the longest value. Empty values are stored
/// as an all-zero key with logical length 0.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyTable {
    width: usize,
    keys: Vec<u8>,
    lens: Vec<usize>,
}

impl KeyTable {
    /// Encodes every value of `provider`.
    ///
    /// # Errors
    ///
    /// * [`CollationError::LengthExceeded`] if any value is longer than
    ///   [`crate::core::MAX_STRING_LENGTH`].
    /// * [`CollationError::AllocationFailure`] if the table cannot be reserved.
    pub fn build<T: KeyAccessor + ?Sized>(provider: &T) -> Result<Self, CollationError> {
        let count = provider.len();
        let width = (0..count)
            .map(|index| max_key_length(provider.get_key(index).len()))
            .max()
            .unwrap_or(0);
        if width > MAX_STRING_LENGTH {
            return Err(CollationError::LengthExceeded {
                len: width,
                max: MAX_STRING_LENGTH,
            });
        }

        let total = width
            .checked_mul(count)
            .ok_or(CollationError::AllocationFailure)?;
        let mut keys = Vec::new();
        keys.try_reserve_exact(total)?;
        keys.resize(total, 0);

        let mut lens = Vec::new();
        lens.try_reserve_exact(count)?;

        for index in 0..count {
            let value = provider.get_key(index);
            let len = if value.is_empty() {
                0
            } else {
                let start = index * width;
                encode_key(value, &mut keys[start..start + width])?
            };
            lens.push(len);
        }

        Ok(Self { width, keys, lens })
    }

    /// Width of every key in bytes.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Number of keys.
    pub fn len(&self) -> usize {
        self.lens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lens.is_empty()
    }

    /// The full, zero-padded key of the value at `index`.
    pub fn key(&self, index: usize) -> &[u8] {
        let start = index * self.width;
        &self.keys[start..start + self.width]
    }

    /// Logical (pre-padding) length of the key at `index`.
    pub fn key_len(&self, index: usize) -> usize {
        self.lens[index]
    }

    /// Up to [`PREFIX_SIZE`] key bytes starting at `offset`, as a big-endian `u64`.
    ///
    /// Bytes past the end of the key read as zero.
    pub fn prefix(&self, index: usize, offset: usize) -> u64 {
        let key = self.key(index);
        if offset >= key.len() {
            return 0;
        }
        let tail = &key[offset..];
        let take = tail.len().min(PREFIX_SIZE);
        let mut buf = [0u8; PREFIX_SIZE];
        buf[..take].copy_from_slice(&tail[..take]);
        u64::from_be_bytes(buf)
    }

    /// Indices that order the encoded values by collation, ties by position.
    pub fn sorted_indices(&self) -> Vec<usize> {
        let _span = trace_span!("collated_sort", count = self.len(), width = self.width).entered();

        let mut ptrs: Vec<SortPtr> = (0..self.len())
            .map(|index| SortPtr {
                index,
                cache: self.prefix(index, 0),
            })
            .collect();

        if ptrs.len() > RADIX_SORT_THRESHOLD && self.width > 0 {
            self.radix_sort(&mut ptrs);
        } else {
            self.comparison_sort(&mut ptrs, 0);
        }

        ptrs.into_iter().map(|p| p.index).collect()
    }

    /// Sorts `ptrs`, all of which share their first `offset` key bytes.
    fn comparison_sort(&self, ptrs: &mut [SortPtr], offset: usize) {
        ptrs.sort_unstable_by(|a, b| self.compare_entries(a, b, offset));
    }

    /// Distributes `ptrs` into buckets on the leading key byte, then sorts each bucket.
    fn radix_sort(&self, ptrs: &mut [SortPtr]) {
        let mut counts = RadixCounts {
            data: [0; RADIX_BUCKETS],
        };
        let counts = &mut counts.data;

        ptrs.iter().for_each(|p| counts[p.leading_byte()] += 1);

        let mut offsets = [0usize; RADIX_BUCKETS];
        let mut sum = 0;
        offsets
            .iter_mut()
            .zip(counts.iter())
            .for_each(|(offset, &count)| {
                *offset = sum;
                sum += count;
            });

        // Scatter in input order so each bucket stays sorted by index.
        let buffer = ptrs.to_vec();
        buffer.iter().for_each(|p| {
            let bucket = p.leading_byte();
            ptrs[offsets[bucket]] = *p;
            offsets[bucket] += 1;
        });

        let mut start = 0;
        counts.iter().for_each(|&count| {
            let end = start + count;
            if end > start {
                let bucket = &mut ptrs[start..end];
                bucket
                    .iter_mut()
                    .for_each(|p| p.cache = self.prefix(p.index, 1));
                self.comparison_sort(bucket, 1);
            }
            start = end;
        });
    }

    /// 1. **Fast path**: cached prefixes differ.
    /// 2. **Slow path**: compare the key bytes past the cached window, then the
    ///    logical lengths, then the indices.
    #[inline(always)]
    fn compare_entries(&self, a: &SortPtr, b: &SortPtr, offset: usize) -> Ordering {
        if a.cache != b.cache {
            return a.cache.cmp(&b.cache);
        }

        let start = (offset + PREFIX_SIZE).min(self.width);
        self.key(a.index)[start..]
            .cmp(&self.key(b.index)[start..])
            .then_with(|| self.lens[a.index].cmp(&self.lens[b.index]))
            .then_with(|| a.index.cmp(&b.index))
    }
}

/// Index into a [`KeyTable`] with a cached key prefix.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct SortPtr {
    index: usize,
    cache: u64,
}

impl SortPtr {
    #[inline(always)]
    fn leading_byte(&self) -> usize {
        (self.cache >> 56) as usize
    }
}

#[cuneiform]
struct RadixCounts {
    data: [usize; RADIX_BUCKETS],
}

/// Returns the permutation that orders `provider` by [`crate::algo::compare`].
///
/// Equal values keep their relative order.
///
/// # Errors
///
/// Same as [`KeyTable::build`].
///
/// # Examples
///
/// ```
/// use ltrimzero::collated_sort;
///
/// let data = vec!["0042", "b", "  7", "A", "00b"];
/// let indices = collated_sort(&data).unwrap();
///
/// assert_eq!(indices, vec![0, 2, 3, 1, 4]); // 42, 7, A, B, B
/// ```
pub fn collated_sort<T: KeyAccessor + ?Sized>(provider: &T) -> Result<Vec<usize>, CollationError> {
    let table = KeyTable::build(provider)?;
    Ok(table.sorted_indices())
}

/// Sorts `data` in place by [`crate::algo::compare`].
///
/// `data` is left untouched if any value cannot be encoded.
///
/// ```
/// use ltrimzero::collated_sort_mut;
///
/// let mut data = vec!["00b", "a", "  C"];
/// collated_sort_mut(&mut data).unwrap();
///
/// assert_eq!(data, vec!["a", "00b", "  C"]);
/// ```
pub fn collated_sort_mut<T: AsRef<[u8]>>(data: &mut [T]) -> Result<(), CollationError> {
    let order = collated_sort(&*data)?;
    apply_permutation(data, order);
    Ok(())
}

/// Moves `data[order[i]]` to position `i` by following permutation cycles.
fn apply_permutation<T>(data: &mut [T], mut order: Vec<usize>) {
    for start in 0..data.len() {
        let mut current = start;
        while order[current] != start {
            let source = order[current];
            data.swap(current, source);
            order[current] = current;
            current = source;
        }
        order[current] = current;
    }
}
