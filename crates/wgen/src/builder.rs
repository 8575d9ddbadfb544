//! Weighted generators built from a type's [`Generic`] structure.
//!
//! Three strategies, each available as a plain function (what derived
//! [`Generate`](crate::Generate) impls call) and as a [`Gen`] value:
//!
//! - [`arbitrary`] / [`generic`]: pick a constructor by weight and generate
//!   its fields with their own generators. Nothing bounds recursion, so this
//!   is only suitable for types that are not recursive or whose weights make
//!   recursion unlikely.
//! - [`arbitrary_rec`] / [`generic_rec`]: as above, but the size is divided
//!   among the fields of the chosen constructor. Once the size is zero only
//!   nullary constructors are picked (uniformly if they all weigh zero), so a
//!   type with one always terminates. Without one, the choice is as above.
//! - [`arbitrary_with_base`] / [`generic_with_base`]: as [`arbitrary_rec`],
//!   switching to the type's [`BaseCase`] witnesses once the size reaches
//!   zero. This always terminates.
//!
//! Fields are generated by their types' own [`Generate`](crate::Generate)
//! impls, so for a recursive type the strategy only applies at every level if
//! the type's `Generate` impl is itself built on it (as `#[derive(Generate)]`
//! does).

use rand::Rng;

use crate::{
    base_case::BaseCase,
    combinator::Gen,
    gn::Context,
    Error, Generic, Result, Weights,
};

pub fn arbitrary<T: Generic, R: Rng + ?Sized>(
    weights: &Weights<T>,
    cx: &mut Context,
    rng: &mut R,
) -> T {
    let constructor = weights.choose(rng);
    T::construct(constructor, cx, rng)
}

pub fn arbitrary_rec<T: Generic, R: Rng + ?Sized>(
    weights: &Weights<T>,
    cx: &mut Context,
    rng: &mut R,
) -> T {
    let constructor = if cx.size() == 0 {
        let nullary: Vec<usize> = (0..T::CONSTRUCTORS).filter(|&c| T::arity(c) == 0).collect();
        weights
            .choose_among(&nullary, rng)
            .unwrap_or_else(|| weights.choose(rng))
    } else {
        weights.choose(rng)
    };
    let arity = T::arity(constructor);
    if arity == 0 {
        return T::construct(constructor, cx, rng);
    }
    cx.scaled(
        |size| shrink(size, arity),
        |cx| T::construct(constructor, cx, rng),
    )
}

/// # Panics
///
/// If `T` has no base case within `depth` and the size is zero. Use
/// [`generic_with_base`] to check this up front.
pub fn arbitrary_with_base<T: Generic + BaseCase, R: Rng + ?Sized>(
    depth: usize,
    weights: &Weights<T>,
    cx: &mut Context,
    rng: &mut R,
) -> T {
    if cx.size() > 0 {
        return arbitrary_rec(weights, cx, rng);
    }
    match T::base_case(depth) {
        Some(cases) => cases.generate(weights.as_slice(), cx, rng),
        None => panic!("{}", Error::NoBaseCase { ty: T::NAME, depth }),
    }
}

/// The size left for each of `arity` fields: one unit goes to the constructor
/// itself, the rest is shared evenly.
pub fn shrink(size: u32, arity: usize) -> u32 {
    let arity = u32::try_from(arity).unwrap_or(u32::MAX).max(1);
    size.saturating_sub(1) / arity
}

pub fn generic<T: Generic>(weights: Weights<T>) -> Gen<T> {
    tracing::debug!(ty = T::NAME, ?weights, "unsized generic generator");
    Gen::new(move |cx, rng| arbitrary(&weights, cx, rng))
}

pub fn generic_uniform<T: Generic>() -> Gen<T> {
    generic(Weights::uniform())
}

pub fn generic_rec<T: Generic>(weights: Weights<T>) -> Gen<T> {
    tracing::debug!(ty = T::NAME, ?weights, "sized generic generator");
    Gen::new(move |cx, rng| arbitrary_rec(&weights, cx, rng))
}

/// Sized generation falling back to the base cases of `T` found within
/// `depth` once the size is exhausted.
pub fn generic_with_base<T: Generic + BaseCase>(depth: usize, weights: Weights<T>) -> Result<Gen<T>> {
    let cases = T::base_case(depth).ok_or(Error::NoBaseCase { ty: T::NAME, depth })?;
    tracing::debug!(
        ty = T::NAME,
        ?weights,
        depth = cases.depth(),
        base_cases = cases.len(),
        "sized generic generator with base case"
    );
    let rec = Gen::new(move |cx, rng| arbitrary_rec(&weights, cx, rng));
    let base = Gen::new(move |cx, rng| cases.generate(weights.as_slice(), cx, rng));
    Ok(rec.with_base_case(base))
}

pub fn generic_uniform_with_base<T: Generic + BaseCase>(depth: usize) -> Result<Gen<T>> {
    generic_with_base(depth, Weights::uniform())
}
