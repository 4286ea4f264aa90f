// Copyright 2025 N. Dornseif
//
// Dual-licensed under Apache 2.0 and MIT terms.

//! Distribution report for every conversion over a set of bit sources.

use anyhow::Context;

use bitshape::config::SuiteConfig;
use bitshape::rng_testing::test_suite;
use bitshape::rngs::{self, SeedableSource};
use bitshape::utils;

fn main() -> anyhow::Result<()> {
    let start = std::time::Instant::now();
    let config = SuiteConfig::from_env().context("loading suite configuration")?;
    utils::init_logging(&config.log_level);
    utils::write_and_print(
        format!(
            "\nReport started {}",
            chrono::Local::now().format("%Y-%m-%d %H:%M:%S %z")
        ),
        &config.result_file,
    )
    .with_context(|| format!("writing to {}", config.result_file.display()))?;

    let mut all_passed = true;
    let mut r = rngs::ReferenceRand::new(0);
    all_passed &= test_suite(&mut r, &config, "Reference")?;
    let mut r = rngs::ReferenceRand32::new(0);
    all_passed &= test_suite(&mut r, &config, "Reference32")?;
    let mut r = rngs::xorshift::XORShift128::new(0);
    all_passed &= test_suite(&mut r, &config, "XORShift128")?;
    let mut r = rngs::lcg::Mmix::new(0);
    all_passed &= test_suite(&mut r, &config, "MMIX")?;
    println!("Full program runtime: {:?}", start.elapsed());

    if !all_passed {
        anyhow::bail!(
            "distribution checks failed, see {}",
            config.result_file.display()
        );
    }
    Ok(())
}
