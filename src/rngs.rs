// Copyright 2025 N. Dornseif
//
// Dual-licensed under Apache 2.0 and MIT terms.

//! Bit sources the conversion layer draws from.
//! All implement the [`BitSource`] interface; seedable ones also implement
//! [`SeedableSource`] so the report suite can reseed them between runs.
//!
//! A source is borrowed mutably for the length of one operation. Sharing a
//! single instance between threads requires external locking held across
//! the whole operation, since bounded draws may consume several words.

use rand::{RngCore, SeedableRng};

use crate::word::NativeWord;

/// Capability producing one uniform unsigned word per call.
pub trait BitSource {
    /// Native output width, `u32` or `u64`.
    type Word: NativeWord;

    /// Draw one uniform word and advance the state one step.
    fn next_word(&mut self) -> Self::Word;

    /// Uniform `u32`. A 64-bit source is truncated to its low half.
    #[inline]
    fn next_u32(&mut self) -> u32 {
        self.next_word().truncate_u32()
    }

    /// Uniform `u64`. A 32-bit source is drawn twice, low half first.
    #[inline]
    fn next_u64(&mut self) -> u64 {
        <Self::Word as NativeWord>::compose_u64(self)
    }
}

impl<S: BitSource + ?Sized> BitSource for &mut S {
    type Word = S::Word;

    #[inline]
    fn next_word(&mut self) -> Self::Word {
        (**self).next_word()
    }
}

/// Sources that can be constructed and reset from a 64-bit seed.
pub trait SeedableSource: BitSource + Sized {
    /// Initialize with specified seed.
    fn new(seed: u64) -> Self;
    /// Reset to inital state, equivalent to replacing with ::new(seed).
    fn reseed(&mut self, seed: u64);
}

/// Adapter exposing any `rand` generator as a 64-bit bit source.
#[derive(Debug, Clone)]
pub struct RandSource<R> {
    rng: R,
}

impl<R: RngCore> RandSource<R> {
    pub fn from_rng(rng: R) -> Self {
        RandSource { rng }
    }

    pub fn into_inner(self) -> R {
        self.rng
    }
}

impl<R: RngCore> BitSource for RandSource<R> {
    type Word = u64;

    #[inline]
    fn next_word(&mut self) -> u64 {
        self.rng.next_u64()
    }
}

impl<R: RngCore + SeedableRng> SeedableSource for RandSource<R> {
    fn new(seed: u64) -> Self {
        RandSource {
            rng: R::seed_from_u64(seed),
        }
    }

    fn reseed(&mut self, seed: u64) {
        self.rng = R::seed_from_u64(seed);
    }
}

/// Adapter exposing any `rand` generator as a 32-bit bit source.
#[derive(Debug, Clone)]
pub struct RandSource32<R> {
    rng: R,
}

impl<R: RngCore> RandSource32<R> {
    pub fn from_rng(rng: R) -> Self {
        RandSource32 { rng }
    }

    pub fn into_inner(self) -> R {
        self.rng
    }
}

impl<R: RngCore> BitSource for RandSource32<R> {
    type Word = u32;

    #[inline]
    fn next_word(&mut self) -> u32 {
        self.rng.next_u32()
    }
}

impl<R: RngCore + SeedableRng> SeedableSource for RandSource32<R> {
    fn new(seed: u64) -> Self {
        RandSource32 {
            rng: R::seed_from_u64(seed),
        }
    }

    fn reseed(&mut self, seed: u64) {
        self.rng = R::seed_from_u64(seed);
    }
}

/// The rand crate's default generator, 64 bits per draw.
pub type ReferenceRand = RandSource<rand::rngs::StdRng>;

/// The rand crate's default generator, 32 bits per draw.
pub type ReferenceRand32 = RandSource32<rand::rngs::StdRng>;

// Xorshift PRNGs
pub mod xorshift {
    use super::{BitSource, SeedableSource};

    /// Substituted for an all-zero seed state, which would only ever emit zeros.
    const NONZERO_STATE: [u32; 4] = [0x7b1d_cdaf, 0x8e20_d3a5, 0x2d4f_9b07, 0x6c03_1e59];

    /// Marsaglia's xorshift128, native 32-bit output.
    #[derive(Debug, Copy, Clone)]
    pub struct XORShift128 {
        state: [u32; 4],
    }

    fn initial_state(seed: u64) -> [u32; 4] {
        if seed == 0 {
            return NONZERO_STATE;
        }
        [
            seed as u32,
            (seed >> 32) as u32,
            seed as u32,
            (seed >> 32) as u32,
        ]
    }

    impl BitSource for XORShift128 {
        type Word = u32;

        fn next_word(&mut self) -> u32 {
            let mut t: u32 = self.state[3];
            let s: u32 = self.state[0];
            self.state[3] = self.state[2];
            self.state[2] = self.state[1];
            self.state[1] = s;
            t ^= t << 11;
            t ^= t >> 8;
            self.state[0] = t ^ s ^ (s >> 19);
            self.state[0]
        }
    }

    impl SeedableSource for XORShift128 {
        fn new(seed: u64) -> Self {
            XORShift128 {
                state: initial_state(seed),
            }
        }

        fn reseed(&mut self, seed: u64) {
            self.state = initial_state(seed);
        }
    }
}

// Linear congruential generators
pub mod lcg {
    use super::{BitSource, SeedableSource};

    /// Originaly designed by Donald Knuth.
    /// Low bits have short periods; fine for golden values, weak for statistics.
    #[derive(Debug, Copy, Clone)]
    pub struct Mmix {
        state: u64,
    }

    impl BitSource for Mmix {
        type Word = u64;

        fn next_word(&mut self) -> u64 {
            self.state = self.state.wrapping_mul(0x5851f42d4c957f2d);
            self.state = self.state.wrapping_add(0x14057b7ef767814f);
            self.state
        }
    }

    impl SeedableSource for Mmix {
        fn new(seed: u64) -> Self {
            Mmix { state: seed }
        }

        fn reseed(&mut self, seed: u64) {
            self.state = seed;
        }
    }
}

/// Scripted and instrumented sources, mostly for tests.
pub mod testgens {
    use super::BitSource;
    use crate::error::{Error, Result};
    use crate::fallible::TryBitSource;
    use crate::word::NativeWord;

    /// Cycles through a fixed list of words forever.
    /// An empty list yields zeros.
    ///
    /// A list of all-ones words never satisfies a non power-of-two bound, so
    /// bounded draws against it do not terminate.
    #[derive(Debug, Clone)]
    pub struct Sequence<W> {
        words: Vec<W>,
        pos: usize,
    }

    impl<W: NativeWord> Sequence<W> {
        pub fn new(words: Vec<W>) -> Self {
            Sequence { words, pos: 0 }
        }

        /// Always yields `word`.
        pub fn repeat(word: W) -> Self {
            Sequence::new(vec![word])
        }
    }

    impl<W: NativeWord> BitSource for Sequence<W> {
        type Word = W;

        fn next_word(&mut self) -> W {
            if self.words.is_empty() {
                return W::ZERO;
            }
            let word = self.words[self.pos];
            self.pos = (self.pos + 1) % self.words.len();
            word
        }
    }

    /// Counts the words drawn from the wrapped source.
    #[derive(Debug, Clone)]
    pub struct Counting<S> {
        inner: S,
        draws: usize,
    }

    impl<S: BitSource> Counting<S> {
        pub fn new(inner: S) -> Self {
            Counting { inner, draws: 0 }
        }

        pub fn draws(&self) -> usize {
            self.draws
        }

        pub fn reset(&mut self) {
            self.draws = 0;
        }

        pub fn into_inner(self) -> S {
            self.inner
        }
    }

    impl<S: BitSource> BitSource for Counting<S> {
        type Word = S::Word;

        fn next_word(&mut self) -> S::Word {
            self.draws += 1;
            self.inner.next_word()
        }
    }

    /// Yields a finite list of words, then fails on every further draw.
    #[derive(Debug, Clone)]
    pub struct Exhaustible<W> {
        words: Vec<W>,
        pos: usize,
    }

    impl<W: NativeWord> Exhaustible<W> {
        pub fn new(words: Vec<W>) -> Self {
            Exhaustible { words, pos: 0 }
        }

        pub fn remaining(&self) -> usize {
            self.words.len() - self.pos
        }
    }

    impl<W: NativeWord> TryBitSource for Exhaustible<W> {
        type Word = W;

        fn try_next_word(&mut self) -> Result<W> {
            match self.words.get(self.pos) {
                Some(&word) => {
                    self.pos += 1;
                    Ok(word)
                }
                None => Err(Error::SourceExhausted { draws: self.pos }),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::lcg::Mmix;
    use super::testgens::{Counting, Exhaustible, Sequence};
    use super::xorshift::XORShift128;
    use super::*;
    use crate::error::Error;
    use crate::fallible::TryBitSource;

    #[test]
    fn test_reference_determinism() {
        let mut a = ReferenceRand::new(0xc0ffee);
        let mut b = ReferenceRand::new(0xc0ffee);
        for _ in 0..100 {
            assert_eq!(a.next_word(), b.next_word());
        }
    }

    #[test]
    fn test_reseed_restarts_stream() {
        let mut r = ReferenceRand32::new(7);
        let first: Vec<u32> = (0..8).map(|_| r.next_word()).collect();
        r.reseed(7);
        let again: Vec<u32> = (0..8).map(|_| r.next_word()).collect();
        assert_eq!(first, again);
    }

    #[test]
    fn test_mmix_known_values() {
        let mut r = Mmix::new(0);
        assert_eq!(r.next_word(), 0x14057b7ef767814f);
        assert_eq!(
            r.next_word(),
            0x14057b7ef767814fu64
                .wrapping_mul(0x5851f42d4c957f2d)
                .wrapping_add(0x14057b7ef767814f)
        );
    }

    #[test]
    fn test_xorshift_zero_seed_is_not_stuck() {
        let mut r = XORShift128::new(0);
        let words: Vec<u32> = (0..4).map(|_| r.next_word()).collect();
        assert!(words.iter().any(|&w| w != 0));
    }

    #[test]
    fn test_mut_ref_is_a_source() {
        fn two_words<S: BitSource<Word = u64>>(mut src: S) -> (u64, u64) {
            (src.next_word(), src.next_u64())
        }
        let mut inner = Counting::new(Sequence::new(vec![1u64, 2]));
        assert_eq!(two_words(&mut inner), (1, 2));
        assert_eq!(inner.draws(), 2);
    }

    #[test]
    fn test_adapter_wraps_existing_rng() {
        let mut a = RandSource::from_rng(rand::rngs::StdRng::seed_from_u64(3));
        let mut b = ReferenceRand::new(3);
        assert_eq!(a.next_word(), b.next_word());
        let mut inner = a.into_inner();
        assert_eq!(inner.next_u64(), b.next_word());
    }

    #[test]
    fn test_counting_reset_and_unwrap() {
        let mut src = Counting::new(Sequence::new(vec![1u32, 2, 3]));
        src.next_u64();
        assert_eq!(src.draws(), 2);
        src.reset();
        assert_eq!(src.draws(), 0);
        let mut seq = src.into_inner();
        assert_eq!(seq.next_word(), 3);
    }

    #[test]
    fn test_sequence_cycles_and_empty_yields_zero() {
        let mut seq = Sequence::new(vec![3u32, 4]);
        assert_eq!(
            (0..5).map(|_| seq.next_word()).collect::<Vec<_>>(),
            vec![3, 4, 3, 4, 3]
        );
        let mut empty: Sequence<u64> = Sequence::new(vec![]);
        assert_eq!(empty.next_word(), 0);
    }

    #[test]
    fn test_exhaustible_reports_draw_count() {
        let mut src = Exhaustible::new(vec![9u32]);
        assert_eq!(src.try_next_word(), Ok(9));
        assert_eq!(src.remaining(), 0);
        assert_eq!(
            src.try_next_word(),
            Err(Error::SourceExhausted { draws: 1 })
        );
    }
}
