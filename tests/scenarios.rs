// Copyright 2025 N. Dornseif
//
// Dual-licensed under Apache 2.0 and MIT terms.

use bitshape::conditioning::{self, between};
use bitshape::config::SuiteConfig;
use bitshape::fallible::attempt;
use bitshape::rng_testing::test_suite;
use bitshape::rngs::testgens::{Counting, Exhaustible};
use bitshape::rngs::{BitSource, ReferenceRand, ReferenceRand32, SeedableSource};
use bitshape::stats;
use bitshape::Error;

const SAMPLES_PER_BIN: usize = 1024;

fn small_range_is_uniform<S: BitSource>(src: &mut S) {
    let (counts, out) = stats::histogram(src, 8, SAMPLES_PER_BIN, |g| {
        let v = conditioning::int_between(g, -2, 5).ok()?;
        stats::integer_bin(v, -2isize, 5, 8)
    });
    assert_eq!(out, 0);
    assert_eq!(counts.iter().sum::<usize>(), 8 * 1024);
    let report = stats::analyze(&counts, out, 4.0);
    assert!(report.passed(), "counts {:?}", counts);
}

#[test]
fn minus_two_to_five_over_both_widths() {
    small_range_is_uniform(&mut ReferenceRand::new(11));
    small_range_is_uniform(&mut ReferenceRand32::new(11));
}

#[test]
fn inverted_unsigned_range_consumes_nothing() {
    let mut src = Counting::new(ReferenceRand32::new(3));
    assert_eq!(
        between(&mut src, 128u32, 127),
        Err(Error::InvalidRange { min: 128, max: 127 })
    );
    assert_eq!(src.draws(), 0);
}

#[test]
fn same_seed_same_stream() {
    fn run<S: BitSource>(src: &mut S) -> Vec<String> {
        let mut out = Vec::new();
        for _ in 0..20 {
            out.push(format!(
                "{} {} {} {:?} {} {}",
                conditioning::int(src),
                conditioning::uint32(src),
                conditioning::int64(src),
                conditioning::uint64_between(src, 10, 1_000_003),
                conditioning::float32(src),
                conditioning::bool(src),
            ));
        }
        out
    }
    assert_eq!(run(&mut ReferenceRand::new(5)), run(&mut ReferenceRand::new(5)));
    assert_eq!(run(&mut ReferenceRand32::new(5)), run(&mut ReferenceRand32::new(5)));
    assert_ne!(run(&mut ReferenceRand::new(5)), run(&mut ReferenceRand::new(6)));
}

#[test]
fn floats_stay_below_one() {
    let mut src = ReferenceRand::new(9);
    for _ in 0..10_000 {
        let x = conditioning::float64(&mut src);
        assert!((0.0..1.0).contains(&x));
        let y = conditioning::float32(&mut src);
        assert!((0.0..1.0).contains(&y));
    }
}

#[test]
fn exhausted_source_is_its_own_error() {
    let mut src = Exhaustible::new(vec![0u32; 3]);
    let first = attempt(&mut src, |g| Ok(conditioning::uint64(g)));
    assert_eq!(first, Ok(0));
    let second = attempt(&mut src, |g| Ok(conditioning::uint64(g)));
    assert_eq!(second, Err(Error::SourceExhausted { draws: 3 }));
}

#[test]
fn full_suite_passes_over_both_widths() {
    let config = SuiteConfig {
        tolerance_sigmas: 5.0,
        seeds: vec![0x5eed],
        speed_samples: 1 << 10,
        result_file: std::env::temp_dir()
            .join(format!("bitshape-scenarios-{}.txt", std::process::id())),
        ..SuiteConfig::default()
    };
    assert!(test_suite(&mut ReferenceRand::new(0), &config, "Reference").unwrap());
    assert!(test_suite(&mut ReferenceRand32::new(0), &config, "Reference32").unwrap());
    let _ = std::fs::remove_file(&config.result_file);
}
