use std::{rc::Rc, sync::Arc};

use rand::Rng;

use super::{Context, Generate};

macro_rules! signed {
    ($($t:ty),*) => {$(
        impl Generate for $t {
            fn gn<R: Rng + ?Sized>(cx: &mut Context, rng: &mut R) -> Self {
                let bound = i128::from(cx.size()).min(<$t>::MAX as i128) as $t;
                rng.random_range(-bound..=bound)
            }
        }
    )*};
}

macro_rules! unsigned {
    ($($t:ty),*) => {$(
        impl Generate for $t {
            fn gn<R: Rng + ?Sized>(cx: &mut Context, rng: &mut R) -> Self {
                let bound = u128::from(cx.size()).min(<$t>::MAX as u128) as $t;
                rng.random_range(0..=bound)
            }
        }
    )*};
}

macro_rules! float {
    ($($t:ty),*) => {$(
        impl Generate for $t {
            fn gn<R: Rng + ?Sized>(cx: &mut Context, rng: &mut R) -> Self {
                if cx.size() == 0 {
                    return 0.0;
                }
                let bound = cx.size() as $t;
                rng.random_range(-bound..=bound)
            }
        }
    )*};
}

signed!(i8, i16, i32, i64);

// `rand` has no uniform sampler for `isize`.
impl Generate for isize {
    fn gn<R: Rng + ?Sized>(cx: &mut Context, rng: &mut R) -> Self {
        isize::try_from(i32::gn(cx, rng)).unwrap_or_default()
    }
}
unsigned!(u8, u16, u32, u64, usize);
float!(f32, f64);

impl Generate for () {
    fn gn<R: Rng + ?Sized>(_cx: &mut Context, _rng: &mut R) -> Self {}
}

impl Generate for bool {
    fn gn<R: Rng + ?Sized>(_cx: &mut Context, rng: &mut R) -> Self {
        rng.random()
    }
}

impl Generate for char {
    fn gn<R: Rng + ?Sized>(_cx: &mut Context, rng: &mut R) -> Self {
        rng.random_range(' '..='~')
    }
}

impl Generate for String {
    fn gn<R: Rng + ?Sized>(cx: &mut Context, rng: &mut R) -> Self {
        let len = rng.random_range(0..=cx.size() as usize);
        (0..len).map(|_| char::gn(cx, rng)).collect()
    }
}

impl<T: Generate> Generate for Option<T> {
    fn gn<R: Rng + ?Sized>(cx: &mut Context, rng: &mut R) -> Self {
        if rng.random_ratio(1, 4) {
            None
        } else {
            Some(T::gn(cx, rng))
        }
    }
}

impl<T: Generate> Generate for Vec<T> {
    fn gn<R: Rng + ?Sized>(cx: &mut Context, rng: &mut R) -> Self {
        cx.many(0, usize::MAX, rng)
    }
}

impl<T: Generate> Generate for Rc<T> {
    fn gn<R: Rng + ?Sized>(cx: &mut Context, rng: &mut R) -> Self {
        Rc::new(T::gn(cx, rng))
    }
}

impl<T: Generate> Generate for Arc<T> {
    fn gn<R: Rng + ?Sized>(cx: &mut Context, rng: &mut R) -> Self {
        Arc::new(T::gn(cx, rng))
    }
}

impl<A: Generate, B: Generate> Generate for (A, B) {
    fn gn<R: Rng + ?Sized>(cx: &mut Context, rng: &mut R) -> Self {
        (A::gn(cx, rng), B::gn(cx, rng))
    }
}

impl<A: Generate, B: Generate, C: Generate> Generate for (A, B, C) {
    fn gn<R: Rng + ?Sized>(cx: &mut Context, rng: &mut R) -> Self {
        (A::gn(cx, rng), B::gn(cx, rng), C::gn(cx, rng))
    }
}
