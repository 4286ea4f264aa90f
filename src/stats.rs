// Copyright 2025 N. Dornseif
//
// Dual-licensed under Apache 2.0 and MIT terms.

//! Collection of methods for checking the uniformity of converted output.

use statrs::distribution::{ChiSquared, ContinuousCDF};

use crate::rngs::BitSource;
use crate::word::{RangeInt, UniformWord};

/// Outcome of comparing a histogram against the uniform expectation.
#[derive(Debug, Clone, PartialEq)]
pub struct DistributionReport {
    pub bins: usize,
    pub expected: f64,
    pub chi_squared: f64,
    /// Upper tail probability of `chi_squared`. NaN for a single bin.
    pub p: f64,
    /// Largest absolute distance of a bin count from `expected`.
    pub max_deviation: f64,
    pub tolerance: f64,
    pub out_of_range: usize,
}

impl DistributionReport {
    pub fn passed(&self) -> bool {
        self.out_of_range == 0 && self.max_deviation <= self.tolerance
    }
}

/// Draw `bins * samples_per_bin` samples and sort them into bins.
/// `bin_of` returns `None` for a sample outside the tested interval;
/// those are counted separately and not binned.
/// Returns the bin counts and the number of out-of-range samples.
pub fn histogram<S: BitSource + ?Sized>(
    src: &mut S,
    bins: usize,
    samples_per_bin: usize,
    mut bin_of: impl FnMut(&mut S) -> Option<usize>,
) -> (Vec<usize>, usize) {
    let mut counts = vec![0usize; bins];
    let mut out_of_range = 0usize;
    for _ in 0..bins * samples_per_bin {
        match bin_of(src) {
            Some(i) if i < bins => counts[i] += 1,
            _ => out_of_range += 1,
        }
    }
    (counts, out_of_range)
}

/// Bin index of `v` when `[min, max]` is cut into `bins` equal slices.
/// Exact for any width: offsets are computed in the unsigned domain and
/// scaled in 128-bit arithmetic.
pub fn integer_bin<T: RangeInt>(v: T, min: T, max: T, bins: usize) -> Option<usize> {
    if v < min || v > max || bins == 0 {
        return None;
    }
    let base = min.to_unsigned();
    let offset = v.to_unsigned().wrapping_sub(base).widen() as u128;
    let width = max.to_unsigned().wrapping_sub(base).widen() as u128 + 1;
    Some((offset * bins as u128 / width) as usize)
}

/// Bin index of `x` when `[0, 1)` is cut into `bins` equal slices.
pub fn unit_bin(x: f64, bins: usize) -> Option<usize> {
    if !(0.0..1.0).contains(&x) || bins == 0 {
        return None;
    }
    Some(((x * bins as f64).floor() as usize).min(bins - 1))
}

/// Allowed distance of a bin count from its expectation:
/// `sigmas * sqrt(n * (1 - 1/k))`, the binomial standard deviation of a
/// single bin scaled by `sigmas`.
pub fn uniform_tolerance(expected_per_bin: f64, bins: usize, sigmas: f64) -> f64 {
    sigmas * (expected_per_bin * (1.0 - 1.0 / bins as f64)).sqrt()
}

/// Get the upper tail p value for given degrees of freedom and chi squared value.
fn chi_squared_p_value(df: usize, chi_squared: f64) -> f64 {
    match ChiSquared::new(df as f64) {
        Ok(dist) => 1.0 - dist.cdf(chi_squared),
        Err(_) => f64::NAN,
    }
}

/// Compare bin counts against an even split of the binned samples.
pub fn analyze(counts: &[usize], out_of_range: usize, sigmas: f64) -> DistributionReport {
    let bins = counts.len();
    let total: usize = counts.iter().sum();
    let expected = if bins == 0 {
        0.0
    } else {
        total as f64 / bins as f64
    };
    let mut chi_squared = 0.0;
    let mut max_deviation: f64 = 0.0;
    for &c in counts {
        let deviation = c as f64 - expected;
        if expected > 0.0 {
            chi_squared += deviation.powi(2) / expected;
        }
        max_deviation = max_deviation.max(deviation.abs());
    }
    let p = if bins > 1 {
        chi_squared_p_value(bins - 1, chi_squared)
    } else {
        f64::NAN
    };
    DistributionReport {
        bins,
        expected,
        chi_squared,
        p,
        max_deviation,
        tolerance: uniform_tolerance(expected, bins.max(1), sigmas),
        out_of_range,
    }
}
