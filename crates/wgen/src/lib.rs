//! Derived weighted random generators for sum-of-products types.
//!
//! `#[derive(Generic)]` reflects a type's constructors and fields into a
//! [`Shape`], `#[derive(BaseCase)]` adds the depth-bounded base-case search,
//! and `#[derive(Generate)]` wires both into a [`Generate`] impl:
//!
//! ```
//! use wgen::{rand::SeedableRng, BaseCase, Depth, Gen, Generate, Generic};
//!
//! #[derive(Debug, Generic, BaseCase, Generate)]
//! #[wgen(weights(1, 3), base_depth = 1)]
//! enum Tree {
//!     Leaf(u8),
//!     Node(Box<Tree>, Box<Tree>),
//! }
//!
//! let mut rng = wgen::rand::rngs::SmallRng::seed_from_u64(7);
//! let tree = Gen::<Tree>::arbitrary().sample(20, &mut rng);
//! assert!(tree.depth() <= 20);
//! assert_eq!(Tree::describe(), "Tree = Leaf(u8) | Node(Box<Tree>, Box<Tree>)");
//! ```
//!
//! Types without a structural description are rejected at compile time:
//!
//! ```compile_fail
//! #[derive(wgen::Generic)]
//! enum Never {}
//! ```

// Derived impls name this crate as `::wgen`.
extern crate self as wgen;

pub mod base_case;
pub mod builder;
pub mod combinator;
pub mod generic;
pub mod gn;
pub mod shape;
pub mod weights;

#[cfg(test)]
mod tests;

pub use base_case::{BaseCase, BaseCases, Depth};
pub use builder::{
    generic, generic_rec, generic_uniform, generic_uniform_with_base, generic_with_base,
};
pub use combinator::Gen;
pub use generic::Generic;
pub use gn::{Context, Generate};
pub use rand;
pub use shape::{Constructor, Field, Shape};
pub use weights::{WeightArray, Weights};
pub use wgen_macro::{BaseCase, Generate, Generic};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error("expected {expected} weights for `{ty}`, one per constructor, found {found}")]
    WeightCount {
        ty: &'static str,
        expected: usize,
        found: usize,
    },
    #[error("all constructor weights for `{ty}` are zero")]
    ZeroWeights { ty: &'static str },
    #[error("`{ty}` has no constructor named `{name}`")]
    UnknownConstructor { ty: &'static str, name: String },
    #[error("`{ty}` has no base case within depth {depth}")]
    NoBaseCase { ty: &'static str, depth: usize },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
