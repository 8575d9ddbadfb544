use rand::{rngs::SmallRng, SeedableRng};

use crate::{
    builder, BaseCase, Context, Depth, Error, Gen, Generate, Generic, Shape, Weights,
};

fn rng() -> SmallRng {
    SmallRng::seed_from_u64(0xCEC34)
}

#[derive(Debug, Clone, PartialEq, Generic, BaseCase, Generate)]
#[wgen(krate = "crate", base_depth = 2)]
enum Tree {
    Leaf,
    Node(Box<Tree>, Box<Tree>),
}

#[derive(Debug, Clone, PartialEq, Generic, BaseCase, Generate)]
#[wgen(weights(4, 2, 1, 1), base_depth = 1)]
enum Expr {
    Num(i32),
    Var { name: char },
    Add(Box<Expr>, Box<Expr>),
    Neg(Box<Expr>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Generic, BaseCase, Generate)]
enum Color {
    Red,
    #[wgen(weight = 0)]
    Green,
    #[wgen(weight = 3)]
    Blue,
}

#[derive(Debug, Clone, PartialEq, Generic, BaseCase, Generate)]
struct Point {
    x: i32,
    y: i32,
}

#[derive(Debug, Clone, PartialEq, Generic, BaseCase, Generate)]
#[wgen(sized)]
enum List<T> {
    Nil,
    Cons(T, Box<List<T>>),
}

#[derive(Debug, Clone, PartialEq, Generic, BaseCase, Generate)]
struct Marker;

#[derive(Debug, Clone, PartialEq, Generic, BaseCase, Generate)]
struct Wrapper(Tree);

/// Every constructor needs another `Stream`, so there is no base case.
#[derive(Debug, Generic, BaseCase)]
enum Stream {
    Cons(u8, Box<Stream>),
}

impl Generate for Stream {
    fn gn<R: rand::Rng + ?Sized>(cx: &mut Context, rng: &mut R) -> Self {
        builder::arbitrary_rec(&Weights::uniform(), cx, rng)
    }
}

/// Recursive constructors are three times as likely as the leaf.
#[derive(Debug, Clone, PartialEq, Generic, BaseCase, Generate)]
#[wgen(krate = "crate", sized, weights(1, 3))]
enum Bushy {
    Leaf,
    Node(Box<Bushy>, Box<Bushy>),
}

fn list_len<T>(list: &List<T>) -> usize {
    match list {
        List::Nil => 0,
        List::Cons(_, tail) => 1 + list_len(tail),
    }
}

#[test]
fn describes_shapes() {
    insta::assert_snapshot!(Tree::describe(), @"Tree = Leaf | Node(Box<Tree>, Box<Tree>)");
    insta::assert_snapshot!(Expr::describe(), @"Expr = Num(i32) | Var { name: char } | Add(Box<Expr>, Box<Expr>) | Neg(Box<Expr>)");
    insta::assert_snapshot!(Point::describe(), @"Point { x: i32, y: i32 }");
    insta::assert_snapshot!(List::<u8>::describe(), @"List = Nil | Cons(T, Box<List<T>>)");
}

#[test]
fn derives_for_unit_and_tuple_structs() {
    insta::assert_snapshot!(Marker::describe(), @"Marker");
    insta::assert_snapshot!(Wrapper::describe(), @"Wrapper(Tree)");
    assert_eq!((Marker::CONSTRUCTORS, Marker::arity(0)), (1, 0));
    assert_eq!(Wrapper::constructor_name(0), "Wrapper");

    assert_eq!(Marker::base_case(0).unwrap().depth(), 0);
    assert!(Wrapper::base_case(0).is_none());
    assert_eq!(Wrapper::base_case(1).unwrap().depth(), 1);
    assert_eq!(Wrapper(Tree::Leaf).depth(), 1);

    let mut rng = rng();
    assert_eq!(Gen::<Marker>::arbitrary().sample(5, &mut rng), Marker);
}

#[test]
fn reflects_constructors() {
    assert_eq!(Expr::CONSTRUCTORS, 4);
    assert_eq!(
        (0..4).map(Expr::arity).collect::<Vec<_>>(),
        [1, 1, 2, 1]
    );
    assert_eq!(Expr::constructor_name(2), "Add");
    assert_eq!(Expr::constructor_by_name("neg"), Some(3));
    assert_eq!(Expr::constructor_by_name("Mul"), None);
    assert_eq!(Point::CONSTRUCTORS, 1);
    assert_eq!(Point::arity(0), 2);
    assert_eq!(Point { x: 1, y: 2 }.constructor_index(), 0);
    assert_eq!(Color::Blue.constructor_index(), 2);

    let shape = Expr::shape();
    assert!(matches!(shape, Shape::Sum(ref cs) if cs.len() == 4));
    assert_eq!(shape.leaves(), 5);
}

#[test]
fn weights_have_one_entry_per_constructor() {
    let weights = Weights::<Expr>::new([1, 0, 0, 3]);
    assert_eq!(weights.as_slice(), [1, 0, 0, 3]);
    assert_eq!(weights.total(), 4);
    assert_eq!(Weights::<Tree>::uniform().as_slice(), [1, 1]);
    assert_eq!(Weights::<Expr>::declared().as_slice(), [4, 2, 1, 1]);
    assert_eq!(Weights::<Color>::declared().as_slice(), [1, 0, 3]);
    assert_eq!(Weights::<Point>::declared(), Weights::uniform());

    assert_eq!(
        Weights::<Tree>::from_slice(&[1, 2, 3]),
        Err(Error::WeightCount {
            ty: "Tree",
            expected: 2,
            found: 3
        })
    );
    assert_eq!(
        Weights::<Tree>::try_new([0, 0]),
        Err(Error::ZeroWeights { ty: "Tree" })
    );
    assert_eq!(
        Weights::<Tree>::uniform()
            .with_named("node", 5)
            .map(|w| w.as_slice().to_vec()),
        Ok(vec![1, 5])
    );
    assert_eq!(
        Weights::<Tree>::uniform().with_named("Branch", 5),
        Err(Error::UnknownConstructor {
            ty: "Tree",
            name: "Branch".to_string()
        })
    );
}

#[test]
fn named_weights_apply_together() {
    let weights = Weights::<Color>::declared()
        .with_names([("blue", 0), ("red", 0), ("green", 1)])
        .unwrap();
    assert_eq!(weights.as_slice(), [0, 1, 0]);
    assert_eq!(
        Weights::<Color>::declared().with_names([("red", 0), ("blue", 0)]),
        Err(Error::ZeroWeights { ty: "Color" })
    );
}

#[test]
fn choose_among_restricts_the_candidates() {
    let mut rng = rng();
    let weights = Weights::<Expr>::new([4, 0, 0, 1]);
    assert_eq!(weights.choose_among(&[], &mut rng), None);
    for _ in 0..100 {
        let picked = weights.choose_among(&[1, 3], &mut rng).unwrap();
        assert_eq!(picked, 3);
    }
    // Only zero weights among the candidates: pick uniformly.
    let mut seen = [false; 4];
    for _ in 0..100 {
        seen[weights.choose_among(&[1, 2], &mut rng).unwrap()] = true;
    }
    assert_eq!(seen, [false, true, true, false]);
}

#[test]
#[should_panic(expected = "all constructor weights for `Color` are zero")]
fn all_zero_weights_panic() {
    Weights::<Color>::new([0, 0, 0]);
}

#[test]
fn constructor_frequencies_follow_weights() {
    let mut rng = rng();
    let weights = Weights::<Expr>::new([4, 2, 1, 1]);
    let n = 20_000;
    let mut counts = [0usize; 4];
    for _ in 0..n {
        counts[weights.choose(&mut rng)] += 1;
    }
    for (constructor, &count) in counts.iter().enumerate() {
        let observed = count as f64 / n as f64;
        let expected = weights.ratio(constructor);
        assert!(
            (observed - expected).abs() < 0.02,
            "constructor {constructor}: observed {observed}, expected {expected}"
        );
    }
}

#[test]
fn derived_weights_drive_selection() {
    let mut rng = rng();
    let mut cx = Context::default();
    let n = 12_000;
    let mut counts = [0usize; 3];
    for _ in 0..n {
        counts[Color::gn(&mut cx, &mut rng).constructor_index()] += 1;
    }
    assert_eq!(counts[1], 0, "zero-weight constructor was chosen");
    let blue = counts[2] as f64 / n as f64;
    assert!((blue - 0.75).abs() < 0.02, "blue ratio {blue}");
}

#[test]
fn unsized_generation_reaches_every_positive_constructor() {
    let mut rng = rng();
    let gen = crate::generic(Weights::<Color>::new([1, 1, 1]));
    let seen: std::collections::HashSet<_> = gen.samples(10, 200, &mut rng).into_iter().collect();
    assert_eq!(seen.len(), 3);

    let gen = crate::generic_uniform::<Point>();
    for p in gen.samples(5, 100, &mut rng) {
        assert!((-5..=5).contains(&p.x) && (-5..=5).contains(&p.y));
    }
}

#[test]
fn sized_generation_with_base_case_terminates() {
    let mut rng = rng();
    for size in [0, 1, 2, 5, 10, 50, 200, 1000] {
        for _ in 0..50 {
            let tree = Gen::<Tree>::arbitrary().sample(size, &mut rng);
            assert!(tree.depth() as u32 <= size, "{tree:?} at size {size}");
            let expr = Gen::<Expr>::arbitrary().sample(size, &mut rng);
            assert!(expr.depth() as u32 <= size + 1, "{expr:?} at size {size}");
        }
    }
}

#[test]
fn sized_generation_terminates_for_recursion_heavy_weights() {
    let mut rng = rng();
    for size in [0, 1, 4, 16, 100, 1000] {
        for _ in 0..50 {
            let bushy = Bushy::gn(&mut Context::new(size), &mut rng);
            assert!(bushy.depth() as u32 <= size, "{bushy:?} at size {size}");
        }
    }
    for _ in 0..50 {
        assert_eq!(Gen::<Bushy>::arbitrary().sample(0, &mut rng), Bushy::Leaf);
    }
}

#[test]
fn size_zero_only_yields_base_cases() {
    let mut rng = rng();
    for _ in 0..100 {
        assert_eq!(Gen::<Tree>::arbitrary().sample(0, &mut rng), Tree::Leaf);
        let expr = Gen::<Expr>::arbitrary().sample(0, &mut rng);
        assert!(
            matches!(expr, Expr::Num(0) | Expr::Var { .. }),
            "{expr:?}"
        );
    }
}

#[test]
fn sized_generation_shrinks_the_size() {
    assert_eq!(builder::shrink(10, 2), 4);
    assert_eq!(builder::shrink(10, 1), 9);
    assert_eq!(builder::shrink(10, 0), 9);
    assert_eq!(builder::shrink(0, 3), 0);

    let mut rng = rng();
    for size in [0u8, 3, 10, 40] {
        for _ in 0..50 {
            let list = List::<u8>::gn(&mut Context::new(size.into()), &mut rng);
            let mut elements = Vec::new();
            let mut rest = &list;
            while let List::Cons(head, tail) = rest {
                elements.push(*head);
                rest = tail;
            }
            assert_eq!(elements.len(), list_len(&list));
            // The head of a cons is generated at `shrink(size, 2)` and
            // every level below shrinks further.
            let bound = builder::shrink(size.into(), 2);
            assert!(
                elements.iter().all(|&e| u32::from(e) <= bound),
                "{list:?} at size {size}"
            );
        }
    }
}

#[test_log::test]
fn base_case_search_finds_minimal_depth() {
    let tree = Tree::base_case(5).unwrap();
    assert_eq!(tree.depth(), 0);
    assert_eq!(tree.constructors(), [0]);

    let expr = Expr::base_case(5).unwrap();
    assert_eq!(expr.depth(), 1);
    assert_eq!(expr.constructors(), [0, 1]);
    assert!(Expr::base_case(0).is_none());

    assert_eq!(Point::base_case(3).unwrap().depth(), 1);
    assert_eq!(Color::base_case(0).unwrap().constructors(), [0, 1, 2]);
    assert!(Stream::base_case(10).is_none());
}

#[test_log::test]
fn base_case_witnesses_respect_the_depth_bound() {
    fn check<T: BaseCase + Depth + std::fmt::Debug>(max_depth: usize) {
        let mut rng = rng();
        let Some(cases) = T::base_case(max_depth) else {
            return;
        };
        assert!(cases.depth() <= max_depth);
        for _ in 0..50 {
            let value = cases.generate_uniform(&mut Context::new(0), &mut rng);
            assert!(value.depth() <= cases.depth(), "{value:?}");
        }
    }
    for depth in 0..4 {
        check::<Tree>(depth);
        check::<Expr>(depth);
        check::<Point>(depth);
        check::<List<Tree>>(depth);
        check::<(Expr, Option<Tree>)>(depth);
    }
}

#[test]
fn base_case_at_depth_includes_deeper_constructors() {
    let at_one: Vec<_> = Tree::base_cases_at(1).into_iter().map(|(c, _)| c).collect();
    assert_eq!(at_one, [0, 1]);
    let at_zero: Vec<_> = Expr::base_cases_at(0).into_iter().map(|(c, _)| c).collect();
    assert!(at_zero.is_empty());
}

#[test]
fn missing_base_case_is_reported() {
    let err = crate::generic_uniform_with_base::<Stream>(4).unwrap_err();
    assert_eq!(
        err,
        Error::NoBaseCase {
            ty: "Stream",
            depth: 4
        }
    );
    assert_eq!(err.to_string(), "`Stream` has no base case within depth 4");
}

#[test]
fn generator_with_base_uses_weights_at_size_zero() {
    let mut rng = rng();
    let gen = crate::generic_with_base(3, Weights::<Expr>::new([0, 1, 1, 1])).unwrap();
    for _ in 0..100 {
        let expr = gen.sample(0, &mut rng);
        assert!(matches!(expr, Expr::Var { .. }), "{expr:?}");
    }
    for expr in gen.samples(8, 100, &mut rng) {
        assert!(!matches!(expr, Expr::Num(_)), "{expr:?}");
    }
}

#[test]
fn depth_counts_constructor_nesting() {
    let node = |l, r| Tree::Node(Box::new(l), Box::new(r));
    assert_eq!(Tree::Leaf.depth(), 0);
    assert_eq!(node(Tree::Leaf, Tree::Leaf).depth(), 1);
    assert_eq!(node(node(Tree::Leaf, Tree::Leaf), Tree::Leaf).depth(), 2);
    assert_eq!(Point { x: 3, y: 4 }.depth(), 1);
    assert_eq!(vec![Tree::Leaf, node(Tree::Leaf, Tree::Leaf)].depth(), 1);
    assert_eq!(None::<Tree>.depth(), 0);
}

#[test]
fn combinators() {
    let mut rng = rng();

    let base = Gen::constant(-1i32);
    let gen = Gen::<i32>::arbitrary().with_base_case(base);
    assert_eq!(gen.sample(0, &mut rng), -1);

    let small = Gen::<u32>::arbitrary().resize(3);
    assert!(small.samples(100, 50, &mut rng).into_iter().all(|n| n <= 3));

    let halved = Gen::<u32>::arbitrary().scale(|n| n / 2);
    assert!(halved.samples(10, 50, &mut rng).into_iter().all(|n| n <= 5));

    let sized = Gen::sized(Gen::constant);
    assert_eq!(sized.sample(17, &mut rng), 17);

    let lists = Gen::<u32>::arbitrary().list_of_split();
    for list in lists.samples(12, 50, &mut rng) {
        assert!(list.len() <= 12);
        let limit = 12u32.checked_div(list.len() as u32).unwrap_or_default();
        assert!(list.iter().all(|&n| n <= limit), "{list:?}");
    }

    let full = Gen::<u32>::arbitrary().list_of();
    let lists = full.samples(6, 100, &mut rng);
    assert!(lists.iter().all(|l| l.len() <= 6 && l.iter().all(|&n| n <= 6)));
    assert!(lists.iter().flatten().any(|&n| n > 3), "elements keep the full size");

    let exact = Gen::<u32>::arbitrary().vector_of(4);
    assert!(exact.samples(8, 20, &mut rng).iter().all(|v| v.len() == 4));

    let pick = Gen::frequency(vec![(0, Gen::constant('a')), (1, Gen::constant('b'))]).unwrap();
    assert!(pick.samples(1, 50, &mut rng).into_iter().all(|c| c == 'b'));
    assert!(Gen::<char>::one_of(Vec::new()).is_err());

    let doubled = Gen::constant(21).map(|n: i32| n * 2);
    assert_eq!(doubled.sample(0, &mut rng), 42);
}

#[test]
fn pointer_sized_integers_follow_the_size() {
    let mut rng = rng();
    let values = Gen::<isize>::arbitrary().samples(7, 200, &mut rng);
    assert!(values.iter().all(|v| (-7..=7).contains(v)), "{values:?}");
    assert!(values.iter().any(|&v| v < 0) && values.iter().any(|&v| v > 0));
    assert!(Gen::<usize>::arbitrary().samples(7, 50, &mut rng).iter().all(|&v| v <= 7));
}

#[test]
fn base_cases_are_stable_across_lookups() {
    let first = Expr::base_case(4).unwrap();
    let second = Expr::base_case(4).unwrap();
    assert_eq!(first.constructors(), second.constructors());
    assert_eq!(first.depth(), second.depth());
    assert_eq!(Expr::base_case(1).unwrap().constructors(), first.constructors());
}

#[test]
fn context_splits_size_among_many() {
    let mut rng = rng();
    let mut cx = Context::new(20);
    let values: Vec<u32> = cx.many(2, 10, &mut rng);
    assert!((2..=10).contains(&values.len()));
    let share = 20 / values.len() as u32;
    assert!(values.iter().all(|&v| v <= share));
    assert_eq!(cx.size(), 20);

    let inner = cx.resized(3, |cx| cx.size());
    assert_eq!((inner, cx.size()), (3, 20));
}
