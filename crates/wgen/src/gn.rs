mod std_gen;

use rand::Rng;

pub trait Generate: 'static {
    /// Generate a value of this type.
    fn gn<R: Rng + ?Sized>(cx: &mut Context, rng: &mut R) -> Self;
}

impl<T> Generate for Box<T>
where
    T: Generate,
{
    fn gn<R: Rng + ?Sized>(cx: &mut Context, rng: &mut R) -> Self {
        Box::new(T::gn(cx, rng))
    }
}

/// State threaded through generation: the size budget.
///
/// The size bounds the magnitude of numbers and the length of collections,
/// and is what the recursive builders shrink as they descend into a value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Context {
    size: u32,
}

impl Default for Context {
    fn default() -> Self {
        Self { size: 30 }
    }
}

impl Context {
    pub fn new(size: u32) -> Self {
        Context { size }
    }

    pub fn size(&self) -> u32 {
        self.size
    }

    pub fn set_size(&mut self, size: u32) -> &mut Self {
        self.size = size;
        self
    }

    /// Run `f` with the size set to `size`, restoring the current size
    /// afterwards.
    pub fn resized<T>(&mut self, size: u32, f: impl FnOnce(&mut Self) -> T) -> T {
        let saved = std::mem::replace(&mut self.size, size);
        let res = f(self);
        self.size = saved;
        res
    }

    pub fn scaled<T>(
        &mut self,
        scale: impl FnOnce(u32) -> u32,
        f: impl FnOnce(&mut Self) -> T,
    ) -> T {
        let size = scale(self.size);
        self.resized(size, f)
    }

    /// Generate between `min` and `max` values, at most `size` of them unless
    /// `min` says otherwise. The size is divided evenly among the values.
    pub fn many<G: Generate, R: Rng + ?Sized>(
        &mut self,
        min: usize,
        max: usize,
        rng: &mut R,
    ) -> Vec<G> {
        let max = max.min(self.size as usize).max(min);
        let n = rng.random_range(min..=max);
        self.split(n, rng)
    }

    /// Generate exactly `n` values, dividing the size among them.
    pub fn split<G: Generate, R: Rng + ?Sized>(&mut self, n: usize, rng: &mut R) -> Vec<G> {
        let share = if n == 0 {
            self.size
        } else {
            self.size / u32::try_from(n).unwrap_or(u32::MAX)
        };
        self.resized(share, |cx| (0..n).map(|_| G::gn(cx, rng)).collect())
    }
}
