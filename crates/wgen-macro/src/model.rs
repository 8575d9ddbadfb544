use darling::ast::{Data, Style};
use proc_macro2::TokenStream;
use quote::{format_ident, quote};

use crate::attr::{Container, Field};

/// The derive input reduced to what the derives need: a list of
/// constructors, each with its fields.
pub struct Model {
    pub ident: syn::Ident,
    pub generics: syn::Generics,
    pub krate: TokenStream,
    pub is_enum: bool,
    pub ctors: Vec<Ctor>,
    pub strategy: Strategy,
}

pub struct Ctor {
    pub name: String,
    pub path: TokenStream,
    pub style: Style,
    pub fields: Vec<Field>,
    pub weight: u32,
}

pub enum Strategy {
    Unsized,
    Rec,
    WithBase(usize),
}

impl Model {
    pub fn from_container(container: Container) -> darling::Result<Model> {
        let mut errors = darling::Error::accumulator();

        let krate = match &container.krate {
            Some(krate) => errors
                .handle(
                    syn::parse_str::<syn::Path>(krate)
                        .map(|path| quote!(#path))
                        .map_err(|_| darling::Error::custom(format!("invalid crate path `{krate}`"))),
                )
                .unwrap_or_else(|| quote!(::wgen)),
            None => quote!(::wgen),
        };

        let (is_enum, mut ctors) = match container.data {
            Data::Enum(variants) => {
                if variants.is_empty() {
                    errors.push(
                        darling::Error::custom(
                            "cannot derive for an enum without variants, it has no values to generate",
                        )
                        .with_span(&container.ident),
                    );
                }
                let ctors = variants
                    .into_iter()
                    .map(|v| {
                        let ident = &v.ident;
                        Ctor {
                            name: ident.to_string(),
                            path: quote!(Self::#ident),
                            style: v.fields.style,
                            fields: v.fields.fields,
                            weight: v.weight.unwrap_or(1),
                        }
                    })
                    .collect();
                (true, ctors)
            }
            Data::Struct(fields) => (
                false,
                vec![Ctor {
                    name: container.ident.to_string(),
                    path: quote!(Self),
                    style: fields.style,
                    fields: fields.fields,
                    weight: 1,
                }],
            ),
        };

        if let Some(list) = &container.weights {
            if list.weights.len() != ctors.len() {
                errors.push(
                    syn::Error::new(
                        list.span,
                        format!(
                            "expected {} weights, one per constructor, found {}",
                            ctors.len(),
                            list.weights.len()
                        ),
                    )
                    .into(),
                );
            } else {
                for (ctor, &weight) in ctors.iter_mut().zip(&list.weights) {
                    ctor.weight = weight;
                }
            }
        }
        if !ctors.is_empty() && ctors.iter().all(|c| c.weight == 0) {
            errors.push(
                darling::Error::custom("at least one constructor weight must be positive")
                    .with_span(&container.ident),
            );
        }

        let strategy = match (container.base_depth, container.sized) {
            (Some(depth), _) => Strategy::WithBase(depth),
            (None, true) => Strategy::Rec,
            (None, false) => Strategy::Unsized,
        };

        errors.finish_with(Model {
            ident: container.ident,
            generics: container.generics,
            krate,
            is_enum,
            ctors,
            strategy,
        })
    }

    pub fn name(&self) -> String {
        self.ident.to_string()
    }

    /// The generics with `bound` added for every type parameter.
    pub fn bounded(&self, bound: TokenStream) -> syn::Generics {
        let mut generics = self.generics.clone();
        let params: Vec<_> = generics.type_params().map(|p| p.ident.clone()).collect();
        let where_clause = generics.make_where_clause();
        for param in params {
            where_clause
                .predicates
                .push(syn::parse_quote!(#param: #bound));
        }
        generics
    }
}

impl Ctor {
    pub fn binders(&self) -> Vec<syn::Ident> {
        (0..self.fields.len()).map(|i| format_ident!("__f{i}")).collect()
    }

    /// An expression building this constructor from one expression per field.
    pub fn build(&self, exprs: &[TokenStream]) -> TokenStream {
        let path = &self.path;
        match self.style {
            Style::Unit => quote!(#path),
            Style::Tuple => quote!(#path(#(#exprs),*)),
            Style::Struct => {
                let names = self.fields.iter().map(|f| &f.ident);
                quote!(#path { #(#names: #exprs),* })
            }
        }
    }

    /// A pattern matching this constructor whatever its fields.
    pub fn wildcard(&self) -> TokenStream {
        let path = &self.path;
        quote!(#path { .. })
    }

    /// A pattern binding each field to the matching name in `binders`.
    pub fn pattern(&self, binders: &[syn::Ident]) -> TokenStream {
        let path = &self.path;
        if self.fields.is_empty() {
            return self.wildcard();
        }
        match self.style {
            Style::Tuple => quote!(#path(#(#binders),*)),
            _ => {
                let names = self.fields.iter().map(|f| &f.ident);
                quote!(#path { #(#names: #binders),* })
            }
        }
    }
}

/// A readable rendering of a field type, e.g. `Box<Tree>`.
pub fn type_name(ty: &syn::Type) -> String {
    quote!(#ty)
        .to_string()
        .replace(" <", "<")
        .replace("< ", "<")
        .replace(" >", ">")
        .replace(" ,", ",")
        .replace(" ;", ";")
        .replace(" :: ", "::")
        .replace("& ", "&")
}
