//! Generators as values.

use std::{fmt, sync::Arc};

use rand::{distr::weighted::WeightedIndex, Rng, RngCore};

use crate::{gn::Context, Error, Generate, Result};

type GenFn<T> = dyn Fn(&mut Context, &mut dyn RngCore) -> T + Send + Sync;

/// A cloneable generator of `T` values.
pub struct Gen<T>(Arc<GenFn<T>>);

impl<T> Clone for Gen<T> {
    fn clone(&self) -> Self {
        Gen(Arc::clone(&self.0))
    }
}

impl<T> fmt::Debug for Gen<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Gen<{}>", std::any::type_name::<T>())
    }
}

impl<T: 'static> Gen<T> {
    pub fn new(f: impl Fn(&mut Context, &mut dyn RngCore) -> T + Send + Sync + 'static) -> Self {
        Gen(Arc::new(f))
    }

    /// The generator of the type's [`Generate`] impl.
    pub fn arbitrary() -> Self
    where
        T: Generate,
    {
        Gen::new(|cx, rng| T::gn(cx, rng))
    }

    pub fn constant(value: T) -> Self
    where
        T: Clone + Send + Sync,
    {
        Gen::new(move |_, _| value.clone())
    }

    pub fn generate<R: Rng + ?Sized>(&self, cx: &mut Context, rng: &mut R) -> T {
        let mut rng = rng;
        (self.0)(cx, &mut rng)
    }

    /// Generate a single value at the given size.
    pub fn sample<R: Rng + ?Sized>(&self, size: u32, rng: &mut R) -> T {
        self.generate(&mut Context::new(size), rng)
    }

    pub fn samples<R: Rng + ?Sized>(&self, size: u32, n: usize, rng: &mut R) -> Vec<T> {
        let mut cx = Context::new(size);
        (0..n).map(|_| self.generate(&mut cx, rng)).collect()
    }

    pub fn map<U: 'static>(self, f: impl Fn(T) -> U + Send + Sync + 'static) -> Gen<U> {
        Gen::new(move |cx, rng| f(self.generate(cx, rng)))
    }

    /// Run at a fixed size.
    pub fn resize(self, size: u32) -> Self {
        Gen::new(move |cx, rng| cx.resized(size, |cx| self.generate(cx, rng)))
    }

    pub fn scale(self, f: impl Fn(u32) -> u32 + Send + Sync + 'static) -> Self {
        Gen::new(move |cx, rng| cx.scaled(&f, |cx| self.generate(cx, rng)))
    }

    /// Build the generator from the current size.
    pub fn sized(f: impl Fn(u32) -> Gen<T> + Send + Sync + 'static) -> Self {
        Gen::new(move |cx, rng| f(cx.size()).generate(cx, rng))
    }

    /// Use `base` once the size has reached zero.
    pub fn with_base_case(self, base: Gen<T>) -> Self {
        Gen::new(move |cx, rng| {
            if cx.size() == 0 {
                base.generate(cx, rng)
            } else {
                self.generate(cx, rng)
            }
        })
    }

    /// Pick one of `choices` with probability proportional to its weight.
    pub fn frequency(choices: Vec<(u32, Gen<T>)>) -> Result<Self> {
        let index = WeightedIndex::new(choices.iter().map(|(w, _)| u64::from(*w))).map_err(|_| {
            Error::ZeroWeights {
                ty: std::any::type_name::<T>(),
            }
        })?;
        Ok(Gen::new(move |cx, rng| {
            let (_, choice) = &choices[rng.sample(&index)];
            choice.generate(cx, rng)
        }))
    }

    /// Pick one of `choices` uniformly.
    pub fn one_of(choices: Vec<Gen<T>>) -> Result<Self> {
        Gen::frequency(choices.into_iter().map(|g| (1, g)).collect())
    }

    /// A list of up to `size` elements, each generated at the full size.
    pub fn list_of(self) -> Gen<Vec<T>> {
        Gen::new(move |cx, rng| {
            let n = rng.random_range(0..=cx.size() as usize);
            (0..n).map(|_| self.generate(cx, rng)).collect()
        })
    }

    /// A list of up to `size` elements sharing the size between them, so the
    /// total size of the list stays proportional to the size.
    pub fn list_of_split(self) -> Gen<Vec<T>> {
        Gen::new(move |cx, rng| {
            let n = rng.random_range(0..=cx.size());
            vector(&self, n, cx, rng)
        })
    }

    /// Exactly `n` elements sharing the size between them.
    pub fn vector_of(self, n: u32) -> Gen<Vec<T>> {
        Gen::new(move |cx, rng| vector(&self, n, cx, rng))
    }
}

fn vector<T: 'static, R: Rng + ?Sized>(
    element: &Gen<T>,
    n: u32,
    cx: &mut Context,
    rng: &mut R,
) -> Vec<T> {
    let share = cx.size().checked_div(n).unwrap_or_default();
    cx.resized(share, |cx| (0..n).map(|_| element.generate(cx, rng)).collect())
}

impl<T: Generate> Default for Gen<T> {
    fn default() -> Self {
        Gen::arbitrary()
    }
}
