//! Nearest-rank percentile estimation over a bounded sample buffer.
//!
//! This is a batch, non-interpolated estimator: samples are sorted
//! descending, `floor(len * fraction)` of the largest are skipped, and the
//! next one is the answer. `fraction` is counted from the top, so `0.05`
//! yields the 95th percentile.

use std::time::Duration;

/// Returns the sample at rank `floor(len * fraction)` of the descending order.
///
/// `None` when `samples` is empty, when the skip consumes every sample, or
/// when `fraction` is not within `[0, 1)`.
pub fn nearest_rank_from_top(samples: &[Duration], fraction: f64) -> Option<Duration> {
    if samples.is_empty() || !fraction.is_finite() || !(0.0..1.0).contains(&fraction) {
        return None;
    }

    let skip = (samples.len() as f64 * fraction).floor() as usize;
    if skip >= samples.len() {
        return None;
    }

    let mut sorted = samples.to_vec();
    sorted.sort_unstable_by(|a, b| b.cmp(a));
    sorted.get(skip).copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(v: &[u64]) -> Vec<Duration> {
        v.iter().map(|&x| Duration::from_millis(x)).collect()
    }

    #[test]
    fn unsorted_input_is_ranked() {
        let s = ms(&[30, 10, 50, 20, 40]);
        assert_eq!(nearest_rank_from_top(&s, 0.0), Some(Duration::from_millis(50)));
        assert_eq!(nearest_rank_from_top(&s, 0.2), Some(Duration::from_millis(40)));
        assert_eq!(nearest_rank_from_top(&s, 0.99), Some(Duration::from_millis(10)));
    }

    #[test]
    fn out_of_range_fraction_is_undefined() {
        let s = ms(&[1, 2, 3]);
        assert_eq!(nearest_rank_from_top(&s, 1.0), None);
        assert_eq!(nearest_rank_from_top(&s, -0.1), None);
        assert_eq!(nearest_rank_from_top(&s, f64::NAN), None);
    }

    #[test]
    fn zero_duration_sample_is_defined() {
        let s = ms(&[0]);
        assert_eq!(nearest_rank_from_top(&s, 0.05), Some(Duration::ZERO));
        assert_eq!(nearest_rank_from_top(&[], 0.05), None);
    }
}
