// Copyright 2025 N. Dornseif
//
// Dual-licensed under Apache 2.0 and MIT terms.

//! Uniform conversions from raw bit sources.
//!
//! A [`rngs::BitSource`] emits uniform `u32` or `u64` words. The functions
//! in [`conditioning`] turn those words into uniform integers of 32, 64 or
//! native width, integers in an inclusive `[min, max]` range, floats in
//! `[0, 1)` and booleans, without modulo bias and with a fixed number of
//! draws per call wherever no rejection is involved.
//!
//! ```
//! use bitshape::conditioning;
//! use bitshape::rngs::{ReferenceRand32, SeedableSource};
//!
//! let mut src = ReferenceRand32::new(42);
//! let die = conditioning::int32_between(&mut src, 1, 6).unwrap();
//! assert!((1..=6).contains(&die));
//! let x = conditioning::float64(&mut src);
//! assert!((0.0..1.0).contains(&x));
//! ```
//!
//! Sources are borrowed mutably per call and never retained. One source
//! must not serve two operations concurrently; wrap a shared source in a
//! lock held for the whole operation.

pub mod conditioning;
pub mod config;
pub mod error;
pub mod fallible;
pub mod rng_testing;
pub mod rngs;
pub mod stats;
mod strings;
pub mod testdata;
pub mod utils;
pub mod word;

pub use error::{Error, Result};
