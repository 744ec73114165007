//! Seeded fixed-fraction sampling.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::models::RecordSet;

/// Number of rows kept for a given fraction, rounded to nearest.
pub fn sample_size(len: usize, fraction: f64) -> usize {
    let fraction = fraction.clamp(0.0, 1.0);
    ((len as f64) * fraction).round() as usize
}

/// Draw `round(fraction × n)` records without replacement.
///
/// Output is in draw order. The same input, fraction and seed always give
/// the same rows.
pub fn sample_fraction(records: RecordSet, fraction: f64, seed: u64) -> RecordSet {
    let amount = sample_size(records.len(), fraction);
    let mut rng = StdRng::seed_from_u64(seed);
    let indices: Vec<usize> = (0..records.len()).collect();
    let picked: Vec<usize> = indices
        .choose_multiple(&mut rng, amount)
        .copied()
        .collect();

    let mut slots: Vec<Option<_>> = records.into_iter().map(Some).collect();
    picked
        .into_iter()
        .filter_map(|idx| slots[idx].take())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn numbered(n: usize) -> RecordSet {
        (0..n)
            .map(|i| json!({ "id": i }).as_object().cloned().unwrap())
            .collect()
    }

    fn ids(records: &RecordSet) -> Vec<u64> {
        records.iter().map(|r| r["id"].as_u64().unwrap()).collect()
    }

    #[test]
    fn test_sample_size_rounds() {
        assert_eq!(sample_size(100, 0.1), 10);
        assert_eq!(sample_size(15, 0.1), 2);
        assert_eq!(sample_size(4, 0.1), 0);
        assert_eq!(sample_size(7, 1.5), 7);
    }

    #[test]
    fn test_same_seed_same_rows() {
        let a = sample_fraction(numbered(200), 0.1, 42);
        let b = sample_fraction(numbered(200), 0.1, 42);

        assert_eq!(a.len(), 20);
        assert_eq!(ids(&a), ids(&b));
    }

    #[test]
    fn test_full_fraction_is_permutation() {
        let out = sample_fraction(numbered(50), 1.0, 7);

        let mut sorted = ids(&out);
        sorted.sort_unstable();
        assert_eq!(sorted, (0..50).collect::<Vec<u64>>());
    }

    #[test]
    fn test_rows_are_distinct() {
        let out = sample_fraction(numbered(300), 0.5, 42);
        let mut seen = ids(&out);
        seen.sort_unstable();
        seen.dedup();
        assert_eq!(seen.len(), 150);
    }
}
