//! Rating distribution tally

use rateviet_core::{BatchResult, RatingDistribution};

/// Count occurrences of each star rating across a batch result.
///
/// Pure and O(n); the counts always sum to the batch length, and every
/// rating bucket is present even at zero.
pub fn tally(results: &BatchResult) -> RatingDistribution {
    let mut distribution = RatingDistribution::default();
    for result in results {
        distribution.record(result.rating);
    }
    distribution
}

#[cfg(test)]
mod tests {
    use super::*;
    use rateviet_core::PredictionResult;

    #[test]
    fn test_tally_counts_sum_to_batch_length() {
        let batch = BatchResult(vec![
            PredictionResult::new("a", 5, 0.9),
            PredictionResult::new("b", 5, 0.8),
            PredictionResult::new("c", 1, 0.7),
            PredictionResult::new("d", 3, 0.6),
        ]);

        let distribution = tally(&batch);

        assert_eq!(distribution.total(), 4);
        assert_eq!(distribution.count(5), 2);
        assert_eq!(distribution.count(1), 1);
        assert_eq!(distribution.count(3), 1);
        assert_eq!(distribution.count(2), 0);
        assert_eq!(distribution.count(4), 0);
    }

    #[test]
    fn test_tally_empty_batch_is_all_zero() {
        let distribution = tally(&BatchResult::default());
        assert_eq!(distribution.total(), 0);
        assert!(distribution.buckets().all(|(_, count)| count == 0));
    }
}
