//! Equal-width histogram over integer ages.

use serde::{Deserialize, Serialize};

/// Default number of age buckets.
pub const DEFAULT_BINS: usize = 10;

/// Upper bound on the bucket count; larger requests are capped.
pub const MAX_BINS: usize = 1000;

/// One histogram bucket. `[lo, hi)` unless `closed`, which marks the final `[lo, hi]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AgeBucket {
    pub lo: f64,
    pub hi: f64,
    pub count: usize,
    pub closed: bool,
}

impl AgeBucket {
    pub fn contains(&self, value: f64) -> bool {
        value >= self.lo && (value < self.hi || (self.closed && value <= self.hi))
    }

    /// Range label in interval notation, e.g. `[20, 40)`.
    pub fn label(&self) -> String {
        let close = if self.closed { ']' } else { ')' };
        format!("[{}, {}{}", self.lo, self.hi, close)
    }
}

/// Partition `[min, max]` of `ages` into `bins` equal-width buckets.
///
/// Empty input yields no buckets. When every age is equal a single closed
/// bucket holds all values. `bins` is capped at [`MAX_BINS`].
pub fn age_histogram(ages: &[u32], bins: usize) -> Vec<AgeBucket> {
    let bins = bins.min(MAX_BINS);
    let (Some(&min), Some(&max)) = (ages.iter().min(), ages.iter().max()) else {
        return Vec::new();
    };
    if bins == 0 {
        return Vec::new();
    }

    let (min, max) = (f64::from(min), f64::from(max));
    if min == max {
        return vec![AgeBucket {
            lo: min,
            hi: max,
            count: ages.len(),
            closed: true,
        }];
    }

    let width = (max - min) / bins as f64;
    let mut edges: Vec<f64> = (0..bins).map(|i| min + width * i as f64).collect();
    edges.push(max);

    let mut counts = vec![0usize; bins];
    for &age in ages {
        let age = f64::from(age);
        // interior edges at or below `age` give the bucket index
        let idx = edges[1..bins].partition_point(|&edge| edge <= age);
        counts[idx] += 1;
    }

    counts
        .into_iter()
        .enumerate()
        .map(|(i, count)| AgeBucket {
            lo: edges[i],
            hi: edges[i + 1],
            count,
            closed: i + 1 == bins,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn two_bins_over_observed_range() {
        let buckets = age_histogram(&[20, 25, 29, 60], 2);
        assert_eq!(
            buckets,
            vec![
                AgeBucket { lo: 20.0, hi: 40.0, count: 3, closed: false },
                AgeBucket { lo: 40.0, hi: 60.0, count: 1, closed: true },
            ]
        );
        assert_eq!(buckets[0].label(), "[20, 40)");
        assert_eq!(buckets[1].label(), "[40, 60]");
    }

    #[test]
    fn boundary_value_goes_to_upper_bucket() {
        let buckets = age_histogram(&[20, 40, 60], 2);
        assert_eq!(buckets[0].count, 1);
        assert_eq!(buckets[1].count, 2);
    }

    #[test]
    fn default_bins_cover_every_age() {
        let ages: Vec<u32> = (18..=70).collect();
        let buckets = age_histogram(&ages, DEFAULT_BINS);
        assert_eq!(buckets.len(), DEFAULT_BINS);
        assert_eq!(buckets.iter().map(|b| b.count).sum::<usize>(), ages.len());
        for age in &ages {
            let hits = buckets.iter().filter(|b| b.contains(f64::from(*age))).count();
            assert_eq!(hits, 1, "age {age} should land in exactly one bucket");
        }
    }

    #[test]
    fn single_value_gets_one_closed_bucket() {
        let buckets = age_histogram(&[33, 33, 33], 10);
        assert_eq!(
            buckets,
            vec![AgeBucket { lo: 33.0, hi: 33.0, count: 3, closed: true }]
        );
    }

    #[test]
    fn huge_bin_request_is_capped() {
        let buckets = age_histogram(&[18, 70], usize::MAX);
        assert_eq!(buckets.len(), MAX_BINS);
        assert_eq!(buckets.iter().map(|b| b.count).sum::<usize>(), 2);
    }

    #[test]
    fn empty_input_has_no_buckets() {
        assert!(age_histogram(&[], 10).is_empty());
    }
}
