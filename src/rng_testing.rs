// Copyright 2025 N. Dornseif
//
// Dual-licensed under Apache 2.0 and MIT terms.

//! Distribution testing of every conversion over a bit source.

use std::{hint::black_box, io, ops::Mul, time::Duration, time::Instant};

use tracing::{info, warn};

use crate::conditioning;
use crate::config::SuiteConfig;
use crate::rngs::{BitSource, ReferenceRand, SeedableSource};
use crate::stats::{self, DistributionReport};
use crate::strings;
use crate::utils::{self, write_and_print};
use crate::word::{RangeInt, UniformWord};

const P_LOG_STAT_LIMIT: f64 = 3.0;
const CHECK_COUNT: usize = 17;
/// Bound used by the throughput measurement; not of the form `2^k - 1`, so
/// the rejection loop is exercised.
const SPEED_BOUND: u64 = 999_999_999;

type Check<S> = fn(&mut S, &SuiteConfig) -> DistributionReport;

#[derive(Debug, Clone)]
struct TestResult {
    test_id: usize,
    report: DistributionReport,
    time_used: Duration,
}

impl TestResult {
    pub fn logstat(&self) -> f64 {
        p_log_stat(self.report.p)
    }
    pub fn passed(&self) -> bool {
        self.report.passed()
    }
    pub fn format(&self) -> String {
        format!(
            "{:<10}: Time: {}     p: {:.6}     pls: {:.4}   dev: {:>7.1} / {:<7.1} - {}{}",
            strings::TEST_NAMES[self.test_id],
            utils::format_elapsed_time(self.time_used),
            self.report.p,
            self.logstat(),
            self.report.max_deviation,
            self.report.tolerance,
            if self.passed() {
                strings::PASS_STR
            } else {
                strings::FAIL_STR
            },
            if self.report.out_of_range > 0 {
                format!(" ({} out of range)", self.report.out_of_range)
            } else {
                String::new()
            }
        )
    }
}

/// Histogram of a wide range quantised into `config.wide_bins` bins.
fn wide_check<S, T>(
    src: &mut S,
    config: &SuiteConfig,
    min: T,
    max: T,
    mut generate: impl FnMut(&mut S) -> T,
) -> DistributionReport
where
    S: BitSource,
    T: RangeInt,
{
    let bins = config.wide_bins;
    let (counts, out_of_range) = stats::histogram(src, bins, config.samples_per_bin, |g| {
        stats::integer_bin(generate(g), min, max, bins)
    });
    stats::analyze(&counts, out_of_range, config.tolerance_sigmas)
}

/// Histogram of a small range sampled through `between`, one bin per value.
fn narrow_check<S, T>(src: &mut S, config: &SuiteConfig, min: T, max: T) -> DistributionReport
where
    S: BitSource,
    T: RangeInt,
{
    let bins = max.to_unsigned().wrapping_sub(min.to_unsigned()).widen() as usize + 1;
    let (counts, out_of_range) = stats::histogram(src, bins, config.samples_per_bin, |g| {
        let v = conditioning::between(g, min, max).ok()?;
        stats::integer_bin(v, min, max, bins)
    });
    stats::analyze(&counts, out_of_range, config.tolerance_sigmas)
}

fn unit_check<S: BitSource>(
    src: &mut S,
    config: &SuiteConfig,
    mut generate: impl FnMut(&mut S) -> f64,
) -> DistributionReport {
    let bins = config.wide_bins;
    let (counts, out_of_range) = stats::histogram(src, bins, config.samples_per_bin, |g| {
        stats::unit_bin(generate(g), bins)
    });
    stats::analyze(&counts, out_of_range, config.tolerance_sigmas)
}

/// Checks in `strings::TEST_NAMES` order.
fn distribution_checks<S: BitSource>() -> [Check<S>; CHECK_COUNT] {
    [
        |s, c| wide_check(s, c, isize::MIN, isize::MAX, conditioning::int),
        |s, c| wide_check(s, c, i32::MIN, i32::MAX, conditioning::int32),
        |s, c| wide_check(s, c, i64::MIN, i64::MAX, conditioning::int64),
        |s, c| wide_check(s, c, 0, usize::MAX, conditioning::uint),
        |s, c| wide_check(s, c, 0, u32::MAX, conditioning::uint32),
        |s, c| wide_check(s, c, 0, u64::MAX, conditioning::uint64),
        |s, c| narrow_check(s, c, -2isize, 5),
        |s, c| narrow_check(s, c, -2i32, 5),
        |s, c| narrow_check(s, c, -2i64, 5),
        |s, c| narrow_check(s, c, 2usize, 9),
        |s, c| narrow_check(s, c, 2u32, 9),
        |s, c| narrow_check(s, c, 2u64, 9),
        |s, c| {
            let max = i64::MAX as u64;
            wide_check(s, c, 0, max, |g| {
                conditioning::uint64_between(g, 0, max).unwrap_or(u64::MAX)
            })
        },
        |s, c| unit_check(s, c, |g| conditioning::float32(g) as f64),
        |s, c| unit_check(s, c, conditioning::float64),
        |s, c| {
            let (counts, out_of_range) = stats::histogram(s, 2, c.samples_per_bin, |g| {
                Some(conditioning::bool(g) as usize)
            });
            stats::analyze(&counts, out_of_range, c.tolerance_sigmas)
        },
        |s, c| {
            let (min, max) = (-1_000_000_007i64, 1_000_000_007i64);
            wide_check(s, c, min, max, |g| {
                conditioning::int64_between(g, min, max).unwrap_or(i64::MIN)
            })
        },
    ]
}

/// Run check `test_id` and return the result and excution time.
fn run_single_test<S: BitSource>(
    test_src: &mut S,
    config: &SuiteConfig,
    test_id: usize,
) -> TestResult {
    let start: Instant = Instant::now();
    let report = distribution_checks::<S>()[test_id](test_src, config);
    let time_used: Duration = start.elapsed();
    TestResult {
        test_id,
        report,
        time_used,
    }
}

/// Bounded draws per second from `test_src`.
fn measure_bounded_speed<S: BitSource>(test_src: &mut S, sample_size: usize) -> f64 {
    let start = Instant::now();
    for _ in 0..sample_size {
        black_box(conditioning::uint64_between(test_src, 0, SPEED_BOUND).ok());
    }
    sample_size as f64 / start.elapsed().as_secs_f64().max(f64::MIN_POSITIVE)
}

/// Logarithmic quantity to specify how close to 1.0 or 0.0 a p-value is.
/// Has a range of 0-9.9999.
/// -0.2 * (log2(min(p, 1-p)) - 1) clamped to 9.9999
fn p_log_stat(p: f64) -> f64 {
    (p.min(1.0 - p).log2() - 1.0).mul(-0.2).min(9.9999)
}

/// Measure bounded-draw throughput and report it relative to the reference source.
fn speed_test<S: SeedableSource>(test_src: &mut S, config: &SuiteConfig) -> String {
    test_src.reseed(config.seeds[0]);
    let speed = measure_bounded_speed(test_src, config.speed_samples);
    let mut ref_src = ReferenceRand::new(config.seeds[0]);
    let ref_speed = measure_bounded_speed(&mut ref_src, config.speed_samples);
    format!(
        "Bounded draws: {}/s ({:.4}% of reference)",
        utils::format_rate(speed),
        (speed / ref_speed) * 100.0
    )
}

/// Perform all checks and add the results to `test_results`.
fn test_single_seed<S: SeedableSource>(
    test_src: &mut S,
    config: &SuiteConfig,
    seed: u64,
    test_results: &mut Vec<TestResult>,
) -> io::Result<()> {
    test_src.reseed(seed);
    write_and_print(
        format!("Testing for seed: {:#018x}", seed),
        &config.result_file,
    )?;
    for test_id in 0..CHECK_COUNT {
        let rslt = run_single_test(test_src, config, test_id);
        if !rslt.passed() {
            warn!(
                check = strings::TEST_NAMES[test_id],
                seed,
                deviation = rslt.report.max_deviation,
                tolerance = rslt.report.tolerance,
                "distribution check failed"
            );
        }
        write_and_print(rslt.format(), &config.result_file)?;
        test_results.push(rslt);
    }
    Ok(())
}

/// Format a slice of `TestResult`s and print a summary of the results.
fn format_test_results_summary(test_results: &[TestResult]) -> String {
    const P_LOG_STAT_BINS: usize = 10;
    let mut p_logstat_bins = [0u32; P_LOG_STAT_BINS];
    let mut passed_tests = 0usize;
    for rslt in test_results {
        let bin = (rslt.logstat().floor() as usize).min(P_LOG_STAT_BINS - 1);
        p_logstat_bins[bin] += 1;
        if rslt.passed() {
            passed_tests += 1;
        }
    }
    let flagged = p_logstat_bins[P_LOG_STAT_LIMIT as usize..].iter().sum::<u32>();
    let logstat_summary: String = p_logstat_bins
        .iter()
        .enumerate()
        .map(|(bin, &value)| {
            if bin == P_LOG_STAT_BINS - 1 {
                format!("{:>2}+ : {:04}", bin, value) // Handle last bin with '+'
            } else {
                format!("{:>2} : {:04}|", bin, value)
            }
        })
        .collect::<Vec<String>>()
        .join("");
    format!(
        "P log stats: \n{}\n({} results with pls >= {})\nOverall result: {}          ( {} / {} passed)",
        logstat_summary,
        flagged,
        P_LOG_STAT_LIMIT,
        if passed_tests == test_results.len() {
            strings::PASS_STR
        } else {
            strings::FAIL_STR
        },
        passed_tests,
        test_results.len()
    )
}

/// Run every distribution check over `test_src` for each configured seed.
/// Returns whether every check passed. A config failing
/// [`SuiteConfig::validate`] is an `InvalidInput` error and nothing is run.
pub fn test_suite<S: SeedableSource>(
    test_src: &mut S,
    config: &SuiteConfig,
    src_name: &str,
) -> io::Result<bool> {
    config
        .validate()
        .map_err(|err| io::Error::new(io::ErrorKind::InvalidInput, err))?;
    let full_start = Instant::now();
    info!(source = src_name, seeds = config.seeds.len(), "starting distribution suite");
    write_and_print(format!("\nTesting: {}", src_name), &config.result_file)?;
    write_and_print(speed_test(test_src, config), &config.result_file)?;
    let mut test_results: Vec<TestResult> = vec![];
    for &seed in config.seeds.iter() {
        test_single_seed(test_src, config, seed, &mut test_results)?;
    }
    write_and_print(format!("\nSummary for: {}", src_name), &config.result_file)?;
    write_and_print(
        format_test_results_summary(&test_results),
        &config.result_file,
    )?;
    write_and_print(
        format!("Total runtime: {:?}", full_start.elapsed()),
        &config.result_file,
    )?;
    Ok(test_results.iter().all(TestResult::passed))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rngs::ReferenceRand32;

    fn small_config(name: &str) -> SuiteConfig {
        SuiteConfig {
            samples_per_bin: 1024,
            tolerance_sigmas: 5.0,
            seeds: vec![0xc0ffee],
            speed_samples: 1 << 10,
            result_file: std::env::temp_dir()
                .join(format!("bitshape-{}-{}.txt", name, std::process::id())),
            ..SuiteConfig::default()
        }
    }

    #[test]
    fn test_check_table_matches_names() {
        assert_eq!(distribution_checks::<ReferenceRand>().len(), strings::TEST_NAMES.len());
    }

    #[test]
    fn test_p_log_stat_range() {
        assert!((p_log_stat(0.5) - 0.4).abs() < 1e-12);
        assert_eq!(p_log_stat(0.0), 9.9999);
        assert_eq!(p_log_stat(1.0), 9.9999);
    }

    #[test]
    fn test_summary_counts_passes() {
        let good = TestResult {
            test_id: 0,
            report: stats::analyze(&[100, 100], 0, 4.0),
            time_used: Duration::from_millis(1),
        };
        let bad = TestResult {
            test_id: 1,
            report: stats::analyze(&[190, 10], 0, 4.0),
            time_used: Duration::from_millis(1),
        };
        let summary = format_test_results_summary(&[good.clone(), bad]);
        assert!(summary.contains("( 1 / 2 passed)"));
        assert!(summary.contains(strings::FAIL_STR));
        assert!(good.format().contains(strings::PASS_STR));
    }

    #[test]
    fn test_suite_rejects_invalid_config() {
        let config = SuiteConfig {
            seeds: vec![],
            ..small_config("noseeds")
        };
        let err = test_suite(&mut ReferenceRand::new(0), &config, "ReferenceRand").unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidInput);

        let config = SuiteConfig {
            wide_bins: 1,
            ..small_config("onebin")
        };
        let err = test_suite(&mut ReferenceRand32::new(0), &config, "ReferenceRand32").unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidInput);
    }

    #[test]
    fn test_suite_passes_on_reference_sources() {
        let config = small_config("suite64");
        let mut wide = ReferenceRand::new(0);
        assert!(test_suite(&mut wide, &config, "ReferenceRand").unwrap());

        let config32 = small_config("suite32");
        let mut narrow = ReferenceRand32::new(0);
        assert!(test_suite(&mut narrow, &config32, "ReferenceRand32").unwrap());

        let _ = std::fs::remove_file(&config.result_file);
        let _ = std::fs::remove_file(&config32.result_file);
    }
}
