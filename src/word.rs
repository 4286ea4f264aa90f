// Copyright 2025 N. Dornseif
//
// Dual-licensed under Apache 2.0 and MIT terms.

//! Integer widths the conversion layer works with.
//!
//! Three layers of traits:
//! - [`NativeWord`]: what a bit source emits (`u32` or `u64`).
//! - [`UniformWord`]: the unsigned widths bounded sampling runs over
//!   (`u32`, `u64`, `usize`).
//! - [`RangeInt`]: every integer type a range can be requested in, signed or
//!   not, mapped onto its unsigned counterpart by two's-complement
//!   reinterpretation.

use std::fmt::Debug;
use std::ops::{BitAnd, Shr};

use crate::rngs::BitSource;

mod sealed {
    pub trait Sealed {}
    impl Sealed for u32 {}
    impl Sealed for u64 {}
}

/// Word type produced natively by a [`BitSource`].
pub trait NativeWord: sealed::Sealed + Copy + Debug + Eq {
    const ZERO: Self;

    /// Keep the low 32 bits.
    fn truncate_u32(self) -> u32;

    /// Least significant bit.
    fn low_bit(self) -> bool;

    /// Build a uniform `u64` from a source of this width.
    ///
    /// A 32-bit source is drawn twice: `lo` first, `hi` second, composed as
    /// `(hi << 32) | lo`. Changing this order changes every 64-bit output
    /// stream built from a 32-bit source.
    fn compose_u64<S>(src: &mut S) -> u64
    where
        S: BitSource<Word = Self> + ?Sized;
}

impl NativeWord for u32 {
    const ZERO: Self = 0;

    #[inline]
    fn truncate_u32(self) -> u32 {
        self
    }

    #[inline]
    fn low_bit(self) -> bool {
        self & 1 == 1
    }

    #[inline]
    fn compose_u64<S>(src: &mut S) -> u64
    where
        S: BitSource<Word = Self> + ?Sized,
    {
        let lo = src.next_word() as u64;
        let hi = src.next_word() as u64;
        (hi << 32) | lo
    }
}

impl NativeWord for u64 {
    const ZERO: Self = 0;

    #[inline]
    fn truncate_u32(self) -> u32 {
        self as u32
    }

    #[inline]
    fn low_bit(self) -> bool {
        self & 1 == 1
    }

    #[inline]
    fn compose_u64<S>(src: &mut S) -> u64
    where
        S: BitSource<Word = Self> + ?Sized,
    {
        src.next_word()
    }
}

/// Unsigned width that bounded rejection sampling is instantiated for.
pub trait UniformWord:
    Copy + Debug + Ord + BitAnd<Output = Self> + Shr<u32, Output = Self>
{
    const ZERO: Self;
    const ONE: Self;
    const MAX: Self;

    /// Draw one full-width uniform value of this type.
    fn draw<S: BitSource + ?Sized>(src: &mut S) -> Self;

    fn leading_zeros(self) -> u32;

    fn wrapping_add(self, rhs: Self) -> Self;

    fn wrapping_sub(self, rhs: Self) -> Self;

    /// Lossless conversion to `u64`.
    fn widen(self) -> u64;
}

macro_rules! uniform_word_impl {
    ($ty:ty, $next:ident) => {
        impl UniformWord for $ty {
            const ZERO: Self = 0;
            const ONE: Self = 1;
            const MAX: Self = <$ty>::MAX;

            #[inline]
            fn draw<S: BitSource + ?Sized>(src: &mut S) -> Self {
                src.$next() as $ty
            }

            #[inline]
            fn leading_zeros(self) -> u32 {
                <$ty>::leading_zeros(self)
            }

            #[inline]
            fn wrapping_add(self, rhs: Self) -> Self {
                <$ty>::wrapping_add(self, rhs)
            }

            #[inline]
            fn wrapping_sub(self, rhs: Self) -> Self {
                <$ty>::wrapping_sub(self, rhs)
            }

            #[inline]
            fn widen(self) -> u64 {
                self as u64
            }
        }
    };
}

uniform_word_impl!(u32, next_u32);
uniform_word_impl!(u64, next_u64);
#[cfg(target_pointer_width = "64")]
uniform_word_impl!(usize, next_u64);
#[cfg(target_pointer_width = "32")]
uniform_word_impl!(usize, next_u32);

/// Integer type a `[min, max]` range can be requested in.
pub trait RangeInt: Copy + Debug + Ord {
    type Unsigned: UniformWord;

    /// Reinterpret the bits as the unsigned type of the same width.
    fn to_unsigned(self) -> Self::Unsigned;

    /// Inverse of [`RangeInt::to_unsigned`].
    fn from_unsigned(bits: Self::Unsigned) -> Self;

    fn to_i128(self) -> i128;
}

macro_rules! range_int_impl {
    ($($ty:ty => $uty:ty),* $(,)?) => {
        $(
            impl RangeInt for $ty {
                type Unsigned = $uty;

                #[inline]
                fn to_unsigned(self) -> $uty {
                    self as $uty
                }

                #[inline]
                fn from_unsigned(bits: $uty) -> Self {
                    bits as $ty
                }

                #[inline]
                fn to_i128(self) -> i128 {
                    self as i128
                }
            }
        )*
    };
}

range_int_impl!(
    u32 => u32,
    i32 => u32,
    u64 => u64,
    i64 => u64,
    usize => usize,
    isize => usize,
);
