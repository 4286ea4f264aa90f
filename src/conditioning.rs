// Copyright 2025 N. Dornseif
//
// Dual-licensed under Apache 2.0 and MIT terms.

//! Methods to turn random bits into more constrained data types.
//!
//! Every function borrows the source for the duration of the call and keeps
//! nothing between calls, so a fixed source seed and a fixed sequence of
//! calls always reproduce the same outputs.

use tracing::{debug, trace};

use crate::error::{Error, Result};
use crate::rngs::BitSource;
use crate::word::{NativeWord, RangeInt, UniformWord};

/// Largest integer below 2^24, the f32 mantissa resolution.
const F32_MANTISSA_MAX: u32 = (1 << 24) - 1;
/// Largest integer below 2^53, the f64 mantissa resolution.
const F64_MANTISSA_MAX: u64 = (1 << 53) - 1;

/// Generate a uniform integer in `[0, max]`.
///
/// Masks full-width draws down to the smallest `2^k - 1` covering `max` and
/// rejects anything above `max`, so no value is favoured. Fewer than two
/// draws are needed on average. `W::MAX` and `2^k - 1` bounds never reject.
pub fn at_most<W, S>(src: &mut S, max: W) -> W
where
    W: UniformWord,
    S: BitSource + ?Sized,
{
    if max == W::MAX {
        return W::draw(src);
    }
    if max.wrapping_add(W::ONE) & max == W::ZERO {
        return W::draw(src) & max;
    }
    let mask = W::MAX >> max.leading_zeros();
    let mut rejected: u64 = 0;
    loop {
        let v = W::draw(src) & mask;
        if v <= max {
            if rejected > 0 {
                trace!(?max, rejected, "bounded draw accepted after rejections");
            }
            return v;
        }
        rejected = rejected.saturating_add(1);
    }
}

/// Generate a uniform integer in `[min, max]`, both inclusive.
///
/// Signed ranges are sampled through their unsigned counterpart of the
/// same width: the span `max - min` and the final shift both use
/// wraparound arithmetic, which is exact for any `min <= max`.
/// Fails with [`Error::InvalidRange`] when `min > max`; no words are drawn
/// in that case, nor when `min == max`.
pub fn between<T, S>(src: &mut S, min: T, max: T) -> Result<T>
where
    T: RangeInt,
    S: BitSource + ?Sized,
{
    if min > max {
        debug!(?min, ?max, "rejected inverted range");
        return Err(Error::InvalidRange {
            min: min.to_i128(),
            max: max.to_i128(),
        });
    }
    if min == max {
        return Ok(min);
    }
    let base = min.to_unsigned();
    let span = max.to_unsigned().wrapping_sub(base);
    Ok(T::from_unsigned(at_most(src, span).wrapping_add(base)))
}

/// Random `isize` over its whole range.
pub fn int<S: BitSource + ?Sized>(src: &mut S) -> isize {
    usize::draw(src) as isize
}

/// Random `i32` over its whole range.
pub fn int32<S: BitSource + ?Sized>(src: &mut S) -> i32 {
    src.next_u32() as i32
}

/// Random `i64` over its whole range.
pub fn int64<S: BitSource + ?Sized>(src: &mut S) -> i64 {
    src.next_u64() as i64
}

/// Random `usize` over its whole range.
pub fn uint<S: BitSource + ?Sized>(src: &mut S) -> usize {
    usize::draw(src)
}

pub fn uint32<S: BitSource + ?Sized>(src: &mut S) -> u32 {
    src.next_u32()
}

pub fn uint64<S: BitSource + ?Sized>(src: &mut S) -> u64 {
    src.next_u64()
}

pub fn int_between<S: BitSource + ?Sized>(src: &mut S, min: isize, max: isize) -> Result<isize> {
    between(src, min, max)
}

pub fn int32_between<S: BitSource + ?Sized>(src: &mut S, min: i32, max: i32) -> Result<i32> {
    between(src, min, max)
}

pub fn int64_between<S: BitSource + ?Sized>(src: &mut S, min: i64, max: i64) -> Result<i64> {
    between(src, min, max)
}

pub fn uint_between<S: BitSource + ?Sized>(src: &mut S, min: usize, max: usize) -> Result<usize> {
    between(src, min, max)
}

pub fn uint32_between<S: BitSource + ?Sized>(src: &mut S, min: u32, max: u32) -> Result<u32> {
    between(src, min, max)
}

pub fn uint64_between<S: BitSource + ?Sized>(src: &mut S, min: u64, max: u64) -> Result<u64> {
    between(src, min, max)
}

/// Random `f32` in `[0, 1)` with 24 bits of resolution.
pub fn float32<S: BitSource + ?Sized>(src: &mut S) -> f32 {
    at_most(src, F32_MANTISSA_MAX) as f32 / (1u32 << 24) as f32
}

/// Random `f64` in `[0, 1)` with 53 bits of resolution.
pub fn float64<S: BitSource + ?Sized>(src: &mut S) -> f64 {
    at_most(src, F64_MANTISSA_MAX) as f64 / (1u64 << 53) as f64
}

/// Random `bool` from the lowest bit of a single native draw.
pub fn bool<S: BitSource + ?Sized>(src: &mut S) -> bool {
    src.next_word().low_bit()
}
