// Copyright 2025 N. Dornseif
//
// Dual-licensed under Apache 2.0 and MIT terms.

//! Running conversions against sources that can fail.
//!
//! Every accessor in [`crate::conditioning`] takes an infallible
//! [`BitSource`]. [`attempt`] lends a fallible source to one of them through
//! a [`Guarded`] wrapper and turns the first failed draw into
//! [`Error::SourceExhausted`].

use tracing::warn;

use crate::error::{Error, Result};
use crate::rngs::BitSource;
use crate::word::NativeWord;

/// Bit source whose draws may fail.
pub trait TryBitSource {
    type Word: NativeWord;

    fn try_next_word(&mut self) -> Result<Self::Word>;
}

impl<S: BitSource> TryBitSource for S {
    type Word = S::Word;

    #[inline]
    fn try_next_word(&mut self) -> Result<S::Word> {
        Ok(self.next_word())
    }
}

/// Infallible view over a [`TryBitSource`].
///
/// After the first failure every draw yields zero. A zero word always
/// passes the bounded sampler's acceptance test, so rejection loops still
/// terminate and the failure surfaces once the operation returns.
pub struct Guarded<'a, S: TryBitSource + ?Sized> {
    inner: &'a mut S,
    failure: Option<Error>,
    draws: usize,
}

impl<'a, S: TryBitSource + ?Sized> Guarded<'a, S> {
    fn new(inner: &'a mut S) -> Self {
        Guarded {
            inner,
            failure: None,
            draws: 0,
        }
    }

    /// Words successfully drawn so far.
    pub fn draws(&self) -> usize {
        self.draws
    }

    pub fn failed(&self) -> bool {
        self.failure.is_some()
    }
}

impl<S: TryBitSource + ?Sized> BitSource for Guarded<'_, S> {
    type Word = S::Word;

    fn next_word(&mut self) -> S::Word {
        if self.failure.is_some() {
            return <S::Word as NativeWord>::ZERO;
        }
        match self.inner.try_next_word() {
            Ok(word) => {
                self.draws += 1;
                word
            }
            Err(err) => {
                self.failure = Some(err);
                <S::Word as NativeWord>::ZERO
            }
        }
    }
}

/// Run `op` against a fallible source.
///
/// Returns the source's failure if any draw failed, otherwise whatever `op`
/// returned (including its own `InvalidRange`).
pub fn attempt<S, T, F>(src: &mut S, op: F) -> Result<T>
where
    S: TryBitSource + ?Sized,
    F: FnOnce(&mut Guarded<'_, S>) -> Result<T>,
{
    let mut guarded = Guarded::new(src);
    let outcome = op(&mut guarded);
    match guarded.failure {
        Some(err) => {
            warn!(draws = guarded.draws, error = %err, "bit source failed mid-operation");
            Err(err)
        }
        None => outcome,
    }
}
