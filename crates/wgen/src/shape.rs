//! Neutral structural descriptions of types.
//!
//! A [`Shape`] mirrors the constructor structure of a type as seen by
//! `#[derive(Generic)]`: enums become a [`Shape::Sum`] of constructors in
//! declaration order, and every constructor body (or struct) is either
//! [`Shape::Unit`], a single [`Shape::Leaf`] or a [`Shape::Product`] of fields.

use std::fmt;

use itertools::Itertools;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Shape {
    Sum(Vec<Constructor>),
    Product(Vec<Field>),
    Leaf(Field),
    Unit,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Constructor {
    pub name: &'static str,
    pub body: Shape,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    pub name: Option<&'static str>,
    pub ty: &'static str,
}

impl Field {
    pub fn named(name: &'static str, ty: &'static str) -> Self {
        Field {
            name: Some(name),
            ty,
        }
    }
    pub fn unnamed(ty: &'static str) -> Self {
        Field { name: None, ty }
    }
}

impl Shape {
    /// Build the body of a constructor from its fields.
    pub fn body(mut fields: Vec<Field>) -> Shape {
        match fields.len() {
            0 => Shape::Unit,
            1 => Shape::Leaf(fields.remove(0)),
            _ => Shape::Product(fields),
        }
    }

    /// The number of alternative constructors.
    pub fn constructors(&self) -> usize {
        match self {
            Shape::Sum(cs) => cs.len(),
            _ => 1,
        }
    }

    /// The number of fields of constructor `constructor`.
    pub fn arity(&self, constructor: usize) -> Option<usize> {
        match self {
            Shape::Sum(cs) => cs.get(constructor).map(|c| c.body.leaves()),
            body if constructor == 0 => Some(body.leaves()),
            _ => None,
        }
    }

    /// Count the leaves of the whole tree, i.e. all fields of all constructors.
    pub fn leaves(&self) -> usize {
        match self {
            Shape::Sum(cs) => cs.iter().map(|c| c.body.leaves()).sum(),
            Shape::Product(fields) => fields.len(),
            Shape::Leaf(_) => 1,
            Shape::Unit => 0,
        }
    }

    /// Constructor names in declaration order. A struct has a single
    /// constructor carrying the type's own name.
    pub fn constructor_names(&self, type_name: &'static str) -> Vec<&'static str> {
        match self {
            Shape::Sum(cs) => cs.iter().map(|c| c.name).collect(),
            _ => vec![type_name],
        }
    }

    pub fn fields(&self) -> &[Field] {
        match self {
            Shape::Product(fields) => fields,
            Shape::Leaf(field) => std::slice::from_ref(field),
            Shape::Sum(_) | Shape::Unit => &[],
        }
    }

    /// Render this shape as the body of a constructor called `name`.
    pub fn named<'a>(&'a self, name: &'a str) -> impl fmt::Display + 'a {
        Named { name, body: self }
    }
}

struct Named<'a> {
    name: &'a str,
    body: &'a Shape,
}

impl fmt::Display for Named<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let fields = self.body.fields();
        if let Shape::Sum(_) = self.body {
            return write!(f, "{} = {}", self.name, self.body);
        }
        if fields.is_empty() {
            return if self.name.is_empty() {
                write!(f, "()")
            } else {
                write!(f, "{}", self.name)
            };
        }
        if fields.iter().all(|field| field.name.is_some()) {
            if !self.name.is_empty() {
                write!(f, "{} ", self.name)?;
            }
            write!(
                f,
                "{{ {} }}",
                fields
                    .iter()
                    .format_with(", ", |field, f| f(&format_args!(
                        "{}: {}",
                        field.name.unwrap_or_default(),
                        field.ty
                    )))
            )
        } else {
            write!(
                f,
                "{}({})",
                self.name,
                fields.iter().map(|field| field.ty).format(", ")
            )
        }
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Shape::Sum(cs) => write!(
                f,
                "{}",
                cs.iter().map(|c| c.body.named(c.name)).format(" | ")
            ),
            body => write!(f, "{}", body.named("")),
        }
    }
}
