//! Types the command line can generate.

use std::fmt;

use wgen::{BaseCase, Generate, Generic};

/// A binary tree that branches three times as often as it stops.
#[derive(Debug, Clone, PartialEq, Generic, BaseCase, Generate)]
#[wgen(weights(1, 3), base_depth = 2)]
pub enum Tree {
    Leaf(u8),
    Node(Box<Tree>, Box<Tree>),
}

#[derive(Debug, Clone, PartialEq, Generic, BaseCase, Generate)]
#[wgen(weights(3, 2, 1, 1, 1), base_depth = 2)]
pub enum Expr {
    Num(i64),
    Var(char),
    Add(Box<Expr>, Box<Expr>),
    Mul(Box<Expr>, Box<Expr>),
    Let {
        name: char,
        value: Box<Expr>,
        body: Box<Expr>,
    },
}

/// Unary naturals.
#[derive(Debug, Clone, PartialEq, Generic, BaseCase, Generate)]
#[wgen(weights(1, 4), base_depth = 1)]
pub enum Nat {
    Zero,
    Succ(Box<Nat>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Generic, BaseCase, Generate)]
pub enum Color {
    Red,
    Green,
    Blue,
}

#[derive(Debug, Clone, PartialEq, Generic, BaseCase, Generate)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl fmt::Display for Tree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Tree::Leaf(n) => write!(f, "{n}"),
            Tree::Node(l, r) => write!(f, "({l} {r})"),
        }
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Num(n) if *n < 0 => write!(f, "({n})"),
            Expr::Num(n) => write!(f, "{n}"),
            Expr::Var(v) => write!(f, "{v}"),
            Expr::Add(l, r) => write!(f, "({l} + {r})"),
            Expr::Mul(l, r) => write!(f, "({l} * {r})"),
            Expr::Let { name, value, body } => write!(f, "(let {name} = {value} in {body})"),
        }
    }
}

impl fmt::Display for Nat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value())
    }
}

impl Nat {
    pub fn value(&self) -> usize {
        let mut n = 0;
        let mut nat = self;
        while let Nat::Succ(pred) = nat {
            n += 1;
            nat = pred;
        }
        n
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}
