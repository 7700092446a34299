use ltrimzero::prelude::*;
use ltrimzero::KeyTable;
use ltrimzero::core::normalized_len;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::cmp::Ordering;
use std::time::Instant;

/// Zero- or space-padded identifiers with mixed case, like account numbers.
fn padded_identifier<R: Rng>(rng: &mut R) -> Vec<u8> {
    const BODY: &[u8] = b"0123456789abcdefABCDEF";
    let pad = rng.random_range(0..6);
    let pad_byte = if rng.random_bool(0.5) { b'0' } else { b' ' };
    let body_len = rng.random_range(0..10);

    let mut value = vec![pad_byte; pad];
    value.extend((0..body_len).map(|_| BODY[rng.random_range(0..BODY.len())]));
    value
}

fn assert_sorted_by_compare(input: &[Vec<u8>], indices: &[usize]) {
    assert_eq!(indices.len(), input.len());
    for pair in indices.windows(2) {
        let (a, b) = (&input[pair[0]], &input[pair[1]]);
        match compare(a, b).unwrap() {
            Ordering::Less => {}
            Ordering::Equal => assert!(pair[0] < pair[1], "tie out of input order"),
            Ordering::Greater => panic!("Sort failed: {:?} before {:?}", a, b),
        }
    }
}

#[test]
fn test_radix_path_matches_compare() {
    let mut rng = StdRng::seed_from_u64(42);

    for _iter in 0..10 {
        let len = rng.random_range(2000..5000);
        let input: Vec<Vec<u8>> = (0..len).map(|_| padded_identifier(&mut rng)).collect();

        let indices = collated_sort(&input).unwrap();
        assert_sorted_by_compare(&input, &indices);
    }
}

#[test]
fn test_short_values_around_nul() {
    let mut rng = StdRng::seed_from_u64(7);

    for _iter in 0..10 {
        let len = rng.random_range(1500..3000);
        let input: Vec<Vec<u8>> = (0..len)
            .map(|_| {
                let row_len = rng.random_range(0..4); // Short, to mix [0], [] and padding
                let mut row = vec![0u8; row_len];
                rng.fill(&mut row[..]);
                row
            })
            .collect();

        let mut expected: Vec<usize> = (0..input.len()).collect();
        expected.sort_by(|&a, &b| compare(&input[a], &input[b]).unwrap());

        let actual = collated_sort(&input).unwrap();
        if actual != expected {
            for (i, (a, b)) in actual.iter().zip(expected.iter()).enumerate() {
                if a != b {
                    panic!(
                        "Mismatch at position {}: got {:?}, expected {:?}",
                        i, input[*a], input[*b]
                    );
                }
            }
        }
    }
}

#[test]
fn test_fuzz_random_mut() {
    let mut rng = rand::rng();

    for _ in 0..2_000 {
        let count = rng.random_range(0..40);
        let mut input: Vec<Vec<u8>> = (0..count).map(|_| padded_identifier(&mut rng)).collect();

        let mut expected = input.clone();
        expected.sort_by(|a, b| compare(a, b).unwrap());

        collated_sort_mut(&mut input).unwrap();
        assert_eq!(input, expected);
    }
}

#[test]
fn test_key_table_matches_encode_key() {
    let mut rng = StdRng::seed_from_u64(1234);
    let input: Vec<Vec<u8>> = (0..500).map(|_| padded_identifier(&mut rng)).collect();

    let table = KeyTable::build(&input).unwrap();
    assert_eq!(table.len(), input.len());

    for (index, value) in input.iter().enumerate() {
        let key = table.key(index);
        assert_eq!(key.len(), table.width());
        if value.is_empty() {
            assert_eq!(table.key_len(index), 0);
            assert!(key.iter().all(|&b| b == 0));
        } else {
            let expected = sort_key(value, table.width()).unwrap();
            assert_eq!(key, &expected[..]);
            assert_eq!(table.key_len(index), normalized_len(value));
        }
    }
}

#[test]
fn test_sort_100k() {
    let count = 100_000;
    let mut rng = rand::rng();
    let input: Vec<Vec<u8>> = (0..count).map(|_| padded_identifier(&mut rng)).collect();

    let start = Instant::now();
    let indices = collated_sort(&input).unwrap();
    println!("Sorted {} identifiers in {:?}", count, start.elapsed());

    assert_sorted_by_compare(&input, &indices);
}
