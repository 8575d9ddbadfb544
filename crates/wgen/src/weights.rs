//! Per-constructor weight vectors.
//!
//! The storage of [`Weights<T>`] is the array type `T::Weights` emitted by
//! `#[derive(Generic)]`, so passing the wrong number of weights is a type
//! error:
//!
//! ```compile_fail
//! #[derive(wgen::Generic)]
//! enum Coin {
//!     Heads,
//!     Tails,
//! }
//!
//! let _ = wgen::Weights::<Coin>::new([1, 2, 3]);
//! ```

use std::{fmt, marker::PhantomData};

use rand::{seq::IndexedRandom, Rng};

use crate::{Error, Generic, Result};

/// Fixed-size weight storage. Implemented for `[u32; N]`.
pub trait WeightArray: Copy + Send + Sync + 'static {
    const LEN: usize;

    fn uniform() -> Self;
    fn as_slice(&self) -> &[u32];
    fn as_mut_slice(&mut self) -> &mut [u32];
    fn from_slice(weights: &[u32]) -> Option<Self>;
}

impl<const N: usize> WeightArray for [u32; N] {
    const LEN: usize = N;

    fn uniform() -> Self {
        [1; N]
    }
    fn as_slice(&self) -> &[u32] {
        self
    }
    fn as_mut_slice(&mut self) -> &mut [u32] {
        self
    }
    fn from_slice(weights: &[u32]) -> Option<Self> {
        weights.try_into().ok()
    }
}

/// Relative selection weights for the constructors of `T`, in declaration
/// order. At least one weight is positive.
pub struct Weights<T: Generic> {
    raw: T::Weights,
    _marker: PhantomData<fn() -> T>,
}

impl<T: Generic> Weights<T> {
    /// # Panics
    ///
    /// If every weight is zero.
    pub fn new(raw: T::Weights) -> Self {
        match Self::try_new(raw) {
            Ok(weights) => weights,
            Err(err) => panic!("{err}"),
        }
    }

    pub fn try_new(raw: T::Weights) -> Result<Self> {
        if raw.as_slice().iter().all(|&w| w == 0) {
            return Err(Error::ZeroWeights { ty: T::NAME });
        }
        Ok(Weights {
            raw,
            _marker: PhantomData,
        })
    }

    /// Every constructor with weight 1.
    pub fn uniform() -> Self {
        Weights {
            raw: T::Weights::uniform(),
            _marker: PhantomData,
        }
    }

    /// The weights declared on the type with `#[wgen(..)]`.
    pub fn declared() -> Self {
        Self::new(T::declared_weights())
    }

    /// Weights whose length is only known at runtime.
    pub fn from_slice(weights: &[u32]) -> Result<Self> {
        let raw = T::Weights::from_slice(weights).ok_or(Error::WeightCount {
            ty: T::NAME,
            expected: T::CONSTRUCTORS,
            found: weights.len(),
        })?;
        Self::try_new(raw)
    }

    /// Replace the weight of the constructor called `name` (ignoring case).
    pub fn with_named(self, name: &str, weight: u32) -> Result<Self> {
        self.with_names([(name, weight)])
    }

    /// Replace the weights of several constructors by name. The result is
    /// only checked once all of them are applied, so intermediate all-zero
    /// states are fine.
    pub fn with_names<'a>(mut self, entries: impl IntoIterator<Item = (&'a str, u32)>) -> Result<Self> {
        for (name, weight) in entries {
            let constructor =
                T::constructor_by_name(name).ok_or_else(|| Error::UnknownConstructor {
                    ty: T::NAME,
                    name: name.to_string(),
                })?;
            self.raw.as_mut_slice()[constructor] = weight;
        }
        Self::try_new(self.raw)
    }

    pub fn get(&self, constructor: usize) -> u32 {
        self.as_slice().get(constructor).copied().unwrap_or_default()
    }

    pub fn as_slice(&self) -> &[u32] {
        self.raw.as_slice()
    }

    pub fn total(&self) -> u64 {
        self.as_slice().iter().map(|&w| u64::from(w)).sum()
    }

    /// The probability of picking `constructor`.
    pub fn ratio(&self, constructor: usize) -> f64 {
        self.get(constructor) as f64 / self.total() as f64
    }

    /// Pick a constructor with probability proportional to its weight.
    pub fn choose<R: Rng + ?Sized>(&self, rng: &mut R) -> usize {
        let constructors: Vec<usize> = (0..T::CONSTRUCTORS).collect();
        match self.choose_among(&constructors, rng) {
            Some(constructor) => constructor,
            None => unreachable!("`{}` has no constructors", T::NAME),
        }
    }

    /// Pick one of `candidates` by weight, or uniformly if they all have
    /// weight zero. Returns `None` only if `candidates` is empty.
    pub fn choose_among<R: Rng + ?Sized>(&self, candidates: &[usize], rng: &mut R) -> Option<usize> {
        choose_weighted_or_uniform(candidates, |&c| self.get(c), rng).copied()
    }
}

/// Pick one of `items` by `weight`, falling back to a uniform choice when no
/// item has a positive weight.
pub(crate) fn choose_weighted_or_uniform<'a, I, R: Rng + ?Sized>(
    items: &'a [I],
    weight: impl Fn(&I) -> u32,
    rng: &mut R,
) -> Option<&'a I> {
    items
        .choose_weighted(rng, |item| u64::from(weight(item)))
        .ok()
        .or_else(|| items.choose(rng))
}

impl<T: Generic> Default for Weights<T> {
    fn default() -> Self {
        Self::uniform()
    }
}

impl<T: Generic> Clone for Weights<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T: Generic> Copy for Weights<T> {}

impl<T: Generic> PartialEq for Weights<T> {
    fn eq(&self, other: &Self) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl<T: Generic> fmt::Debug for Weights<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries((0..T::CONSTRUCTORS).map(|i| (T::constructor_name(i), self.get(i))))
            .finish()
    }
}
