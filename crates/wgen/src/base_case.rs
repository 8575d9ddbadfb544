//! Depth-bounded base-case search.
//!
//! A type's *base cases* within depth `d` are the constructors that can be
//! built without nesting constructors more than `d` levels deep. Nullary
//! constructors are available at every depth; a constructor with fields is
//! available at depth `d >= 1` when every field has a base case within
//! `d - 1`. [`BaseCase::base_case`] searches increasing depths and returns the
//! first non-empty set, i.e. the minimal-depth witnesses.

use std::{
    any::{Any, TypeId},
    rc::Rc,
    sync::Arc,
};

use dashmap::DashMap;
use once_cell::sync::Lazy;
use rand::Rng;

use crate::{combinator::Gen, gn::Context, weights::choose_weighted_or_uniform};

/// Constructor-nesting depth of a value.
///
/// Nullary constructors and primitive values have depth 0, a constructor with
/// fields is one deeper than its deepest field. Containers are transparent.
pub trait Depth {
    fn depth(&self) -> usize {
        0
    }
}

/// The minimal-depth witnesses of a type: one generator per constructor that
/// is available at [`depth`](BaseCases::depth). Never empty.
pub struct BaseCases<T> {
    depth: usize,
    cases: Arc<[(usize, Gen<T>)]>,
}

impl<T> Clone for BaseCases<T> {
    fn clone(&self) -> Self {
        BaseCases {
            depth: self.depth,
            cases: Arc::clone(&self.cases),
        }
    }
}

impl<T: 'static> BaseCases<T> {
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// The constructor indices of the witnesses.
    pub fn constructors(&self) -> Vec<usize> {
        self.cases.iter().map(|(c, _)| *c).collect()
    }

    pub fn witness(&self, constructor: usize) -> Option<&Gen<T>> {
        self.cases
            .iter()
            .find_map(|(c, g)| (*c == constructor).then_some(g))
    }

    pub fn len(&self) -> usize {
        self.cases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cases.is_empty()
    }

    /// Generate a witness, picking its constructor by `weights` (indexed by
    /// constructor), or uniformly if all applicable weights are zero.
    pub fn generate<R: Rng + ?Sized>(&self, weights: &[u32], cx: &mut Context, rng: &mut R) -> T {
        let weight = |(c, _): &(usize, Gen<T>)| weights.get(*c).copied().unwrap_or_default();
        match choose_weighted_or_uniform(&self.cases[..], weight, rng) {
            Some((_, witness)) => witness.generate(cx, rng),
            None => unreachable!("base cases are never empty"),
        }
    }

    /// Generate a witness with a uniformly chosen constructor.
    pub fn generate_uniform<R: Rng + ?Sized>(&self, cx: &mut Context, rng: &mut R) -> T {
        self.generate(&[], cx, rng)
    }
}

pub trait BaseCase: Sized + 'static {
    /// The constructors buildable within `depth`, each with a generator.
    ///
    /// Implementations must only produce values of [`Depth`] at most `depth`.
    fn base_cases_at(depth: usize) -> Vec<(usize, Gen<Self>)>;

    /// The minimal-depth base cases within `max_depth`, or `None` if the type
    /// cannot be built that shallowly.
    fn base_case(max_depth: usize) -> Option<BaseCases<Self>> {
        memo(&WITHIN_DEPTH, max_depth, || {
            (0..=max_depth).find_map(at_depth::<Self>)
        })
    }
}

type Table = DashMap<(TypeId, usize), Arc<dyn Any + Send + Sync>>;

/// Base cases of a type at exactly a depth.
static AT_DEPTH: Lazy<Table> = Lazy::new(Table::default);
/// The result of [`BaseCase::base_case`] per type and bound.
static WITHIN_DEPTH: Lazy<Table> = Lazy::new(Table::default);

fn at_depth<T: BaseCase>(depth: usize) -> Option<BaseCases<T>> {
    memo(&AT_DEPTH, depth, || {
        let cases = T::base_cases_at(depth);
        tracing::trace!(
            ty = std::any::type_name::<T>(),
            depth,
            found = cases.len(),
            "computed base cases"
        );
        (!cases.is_empty()).then(|| BaseCases {
            depth,
            cases: cases.into(),
        })
    })
}

/// Look up `T` at `depth` in `table`, computing and storing it on a miss.
fn memo<T: BaseCase>(
    table: &Table,
    depth: usize,
    compute: impl FnOnce() -> Option<BaseCases<T>>,
) -> Option<BaseCases<T>> {
    let key = (TypeId::of::<T>(), depth);
    let hit = table.get(&key).map(|entry| Arc::clone(entry.value()));
    if let Some(cases) = hit
        .as_deref()
        .and_then(|entry| entry.downcast_ref::<Option<BaseCases<T>>>())
    {
        return cases.clone();
    }

    // No shard is locked here, as computing `T`'s cases looks up its fields.
    let cases = compute();
    table.insert(key, Arc::new(cases.clone()));
    cases
}

/// Primitive values are their own depth-0 witness: their generator at size 0.
macro_rules! leaf {
    ($($t:ty),*) => {$(
        impl Depth for $t {}

        impl BaseCase for $t {
            fn base_cases_at(_depth: usize) -> Vec<(usize, Gen<Self>)> {
                vec![(0, Gen::<$t>::arbitrary().resize(0))]
            }
        }
    )*};
}

leaf!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize, f32, f64, bool, char, (), String);

impl<T: Depth> Depth for Option<T> {
    fn depth(&self) -> usize {
        self.as_ref().map_or(0, Depth::depth)
    }
}

impl<T: 'static> BaseCase for Option<T> {
    fn base_cases_at(_depth: usize) -> Vec<(usize, Gen<Self>)> {
        vec![(0, Gen::new(|_, _| None))]
    }
}

impl<T: Depth> Depth for Vec<T> {
    fn depth(&self) -> usize {
        self.iter().map(Depth::depth).max().unwrap_or_default()
    }
}

impl<T: 'static> BaseCase for Vec<T> {
    fn base_cases_at(_depth: usize) -> Vec<(usize, Gen<Self>)> {
        vec![(0, Gen::new(|_, _| Vec::new()))]
    }
}

macro_rules! pointer {
    ($($p:ident),*) => {$(
        impl<T: Depth + ?Sized> Depth for $p<T> {
            fn depth(&self) -> usize {
                T::depth(self)
            }
        }

        impl<T: BaseCase> BaseCase for $p<T> {
            fn base_cases_at(depth: usize) -> Vec<(usize, Gen<Self>)> {
                T::base_cases_at(depth)
                    .into_iter()
                    .map(|(c, g)| (c, g.map($p::new)))
                    .collect()
            }
        }
    )*};
}

pointer!(Box, Rc, Arc);

impl<A: Depth, B: Depth> Depth for (A, B) {
    fn depth(&self) -> usize {
        self.0.depth().max(self.1.depth())
    }
}

impl<A: BaseCase, B: BaseCase> BaseCase for (A, B) {
    fn base_cases_at(depth: usize) -> Vec<(usize, Gen<Self>)> {
        let (Some(a), Some(b)) = (A::base_case(depth), B::base_case(depth)) else {
            return Vec::new();
        };
        vec![(
            0,
            Gen::new(move |cx, rng| (a.generate_uniform(cx, rng), b.generate_uniform(cx, rng))),
        )]
    }
}

impl<A: Depth, B: Depth, C: Depth> Depth for (A, B, C) {
    fn depth(&self) -> usize {
        self.0.depth().max(self.1.depth()).max(self.2.depth())
    }
}

impl<A: BaseCase, B: BaseCase, C: BaseCase> BaseCase for (A, B, C) {
    fn base_cases_at(depth: usize) -> Vec<(usize, Gen<Self>)> {
        let (Some(a), Some(b), Some(c)) = (
            A::base_case(depth),
            B::base_case(depth),
            C::base_case(depth),
        ) else {
            return Vec::new();
        };
        vec![(
            0,
            Gen::new(move |cx, rng| {
                (
                    a.generate_uniform(cx, rng),
                    b.generate_uniform(cx, rng),
                    c.generate_uniform(cx, rng),
                )
            }),
        )]
    }
}
