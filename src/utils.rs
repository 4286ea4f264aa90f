// Copyright 2025 N. Dornseif
//
// Dual-licensed under Apache 2.0 and MIT terms.

//! Misc utility functions.

use std::{fs::OpenOptions, io::Write, path::Path, time::Duration};

use tracing_subscriber::EnvFilter;

/// Print a report line and append it to the result file.
pub fn write_and_print(line: impl AsRef<str>, file_path: &Path) -> std::io::Result<()> {
    let line = line.as_ref();
    println!("{}", line);
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(file_path)?;
    writeln!(file, "{}", line)
}

/// Format a duration with a unit matched to its size.
pub fn format_elapsed_time(elapsed: Duration) -> String {
    let secs = elapsed.as_secs_f64();
    if secs >= 1.0 {
        format!("{:>8.3} s ", secs)
    } else if secs >= 1e-3 {
        format!("{:>8.3} ms", secs * 1e3)
    } else {
        format!("{:>8.3} us", secs * 1e6)
    }
}

/// Format a count per second into a pretty String.
/// e.g. 1500000.0 is 1.50 M
pub fn format_rate(per_second: f64) -> String {
    if per_second >= 1e9 {
        format!("{:.2} G", per_second / 1e9)
    } else if per_second >= 1e6 {
        format!("{:.2} M", per_second / 1e6)
    } else if per_second >= 1e3 {
        format!("{:.2} K", per_second / 1e3)
    } else {
        format!("{:.2} ", per_second)
    }
}

/// Install the global fmt subscriber.
/// `level` is the fallback filter; `RUST_LOG` overrides it.
pub fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_level(true)
        .init();
}
