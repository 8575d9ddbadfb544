use rand::Rng;

use crate::{gn::Context, shape::Shape, weights::WeightArray};

/// Structural reflection of a sum-of-products type.
///
/// Implemented by `#[derive(Generic)]`. Constructors are numbered in
/// declaration order; a struct has the single constructor `0`.
pub trait Generic: Sized + 'static {
    /// One weight per constructor, `[u32; N]` for a type with `N`
    /// constructors.
    type Weights: WeightArray;

    const NAME: &'static str;
    const CONSTRUCTORS: usize = <Self::Weights as WeightArray>::LEN;

    fn shape() -> Shape;

    /// The weights given in `#[wgen(..)]`, 1 for constructors without one.
    fn declared_weights() -> Self::Weights {
        WeightArray::uniform()
    }

    /// The number of fields of `constructor`.
    fn arity(constructor: usize) -> usize;

    fn constructor_name(constructor: usize) -> &'static str;

    /// The constructor `self` was built with.
    fn constructor_index(&self) -> usize;

    /// Build `constructor`, generating each of its fields with the field
    /// type's [`Generate`](crate::Generate) impl.
    fn construct<R: Rng + ?Sized>(constructor: usize, cx: &mut Context, rng: &mut R) -> Self;

    /// A one-line rendering of the type, e.g. `Tree = Leaf | Node(Box<Tree>, Box<Tree>)`.
    fn describe() -> String {
        Self::shape().named(Self::NAME).to_string()
    }

    /// Look up a constructor by name, ignoring case.
    fn constructor_by_name(name: &str) -> Option<usize> {
        (0..Self::CONSTRUCTORS).find(|&i| Self::constructor_name(i).eq_ignore_ascii_case(name))
    }
}
