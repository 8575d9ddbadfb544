use darling::FromDeriveInput;
use proc_macro2::TokenStream;
use quote::quote;

use crate::{
    attr::Container,
    model::{type_name, Model, Strategy},
};

fn model(input: &syn::DeriveInput) -> Result<Model, TokenStream> {
    Container::from_derive_input(input)
        .and_then(Model::from_container)
        .map_err(|err| err.write_errors())
}

pub fn generic(input: &syn::DeriveInput) -> TokenStream {
    let model = match model(input) {
        Ok(model) => model,
        Err(errors) => return errors,
    };
    let Model {
        ident,
        krate,
        ctors,
        ..
    } = &model;

    let generics = model.bounded(quote!(#krate::Generate));
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();
    let name = model.name();
    let count = ctors.len();
    let weights = ctors.iter().map(|c| c.weight);
    let indices: Vec<_> = (0..count).collect();
    let ctor_names = ctors.iter().map(|c| &c.name);
    let arities = ctors.iter().map(|c| c.fields.len());

    let bodies = ctors.iter().map(|c| {
        let fields = c.fields.iter().map(|f| {
            let ty = type_name(&f.ty);
            match &f.ident {
                Some(field) => {
                    let field = field.to_string();
                    quote!(#krate::Field::named(#field, #ty))
                }
                None => quote!(#krate::Field::unnamed(#ty)),
            }
        });
        quote!(#krate::Shape::body(::std::vec![#(#fields),*]))
    });
    let shape = if model.is_enum {
        let ctor_names = ctors.iter().map(|c| &c.name);
        quote! {
            #krate::Shape::Sum(::std::vec![#(
                #krate::Constructor { name: #ctor_names, body: #bodies }
            ),*])
        }
    } else {
        quote!(#(#bodies)*)
    };

    let constructor_index = if model.is_enum {
        let patterns = ctors.iter().map(|c| c.wildcard());
        quote! {
            match self {
                #(#patterns => #indices,)*
            }
        }
    } else {
        quote!(0)
    };

    let builds = ctors.iter().map(|c| {
        let exprs: Vec<_> = c
            .fields
            .iter()
            .map(|f| {
                let ty = &f.ty;
                quote!(<#ty as #krate::Generate>::gn(cx, rng))
            })
            .collect();
        c.build(&exprs)
    });

    quote! {
        impl #impl_generics #krate::Generic for #ident #ty_generics #where_clause {
            type Weights = [u32; #count];

            const NAME: &'static str = #name;

            fn shape() -> #krate::Shape {
                #shape
            }

            fn declared_weights() -> Self::Weights {
                [#(#weights),*]
            }

            fn arity(constructor: usize) -> usize {
                match constructor {
                    #(#indices => #arities,)*
                    _ => 0,
                }
            }

            fn constructor_name(constructor: usize) -> &'static str {
                match constructor {
                    #(#indices => #ctor_names,)*
                    _ => "",
                }
            }

            fn constructor_index(&self) -> usize {
                #constructor_index
            }

            #[allow(unused_variables)]
            fn construct<R: #krate::rand::Rng + ?Sized>(
                constructor: usize,
                cx: &mut #krate::Context,
                rng: &mut R,
            ) -> Self {
                match constructor {
                    #(#indices => #builds,)*
                    _ => ::std::panic!("`{}` has no constructor {}", #name, constructor),
                }
            }
        }
    }
}

pub fn base_case(input: &syn::DeriveInput) -> TokenStream {
    let model = match model(input) {
        Ok(model) => model,
        Err(errors) => return errors,
    };
    let Model {
        ident,
        krate,
        ctors,
        ..
    } = &model;

    let cases = ctors.iter().enumerate().map(|(index, c)| {
        if c.fields.is_empty() {
            let build = c.build(&[]);
            return quote! {
                cases.push((#index, #krate::Gen::new(|_, _| #build)));
            };
        }
        let binders = c.binders();
        let tys = c.fields.iter().map(|f| &f.ty);
        let exprs: Vec<_> = binders
            .iter()
            .map(|b| quote!(#b.generate_uniform(cx, rng)))
            .collect();
        let build = c.build(&exprs);
        quote! {
            if let ::std::option::Option::Some(inner) = depth.checked_sub(1) {
                if let (#(::std::option::Option::Some(#binders),)*) =
                    (#(<#tys as #krate::BaseCase>::base_case(inner),)*)
                {
                    cases.push((#index, #krate::Gen::new(move |cx, rng| #build)));
                }
            }
        }
    });

    let depths = ctors.iter().map(|c| {
        let binders = c.binders();
        let pattern = c.pattern(&binders);
        if binders.is_empty() {
            quote!(#pattern => 0)
        } else {
            quote!(#pattern => 1 + 0usize #(.max(#krate::Depth::depth(#binders)))*)
        }
    });

    let base_generics = model.bounded(quote!(#krate::BaseCase));
    let (impl_generics, ty_generics, where_clause) = base_generics.split_for_impl();
    let depth_generics = model.bounded(quote!(#krate::Depth));
    let (depth_impl_generics, depth_ty_generics, depth_where_clause) =
        depth_generics.split_for_impl();

    quote! {
        impl #impl_generics #krate::BaseCase for #ident #ty_generics #where_clause {
            #[allow(unused_variables)]
            fn base_cases_at(depth: usize) -> ::std::vec::Vec<(usize, #krate::Gen<Self>)> {
                let mut cases = ::std::vec::Vec::new();
                #(#cases)*
                cases
            }
        }

        impl #depth_impl_generics #krate::Depth for #ident #depth_ty_generics #depth_where_clause {
            fn depth(&self) -> usize {
                match self {
                    #(#depths,)*
                }
            }
        }
    }
}

pub fn generate(input: &syn::DeriveInput) -> TokenStream {
    let model = match model(input) {
        Ok(model) => model,
        Err(errors) => return errors,
    };
    let Model {
        ident,
        krate,
        strategy,
        ..
    } = &model;

    let (bound, body) = match strategy {
        Strategy::Unsized => (
            quote!(#krate::Generate),
            quote!(#krate::builder::arbitrary(&weights, cx, rng)),
        ),
        Strategy::Rec => (
            quote!(#krate::Generate),
            quote!(#krate::builder::arbitrary_rec(&weights, cx, rng)),
        ),
        Strategy::WithBase(depth) => (
            quote!(#krate::Generate + #krate::BaseCase),
            quote!(#krate::builder::arbitrary_with_base(#depth, &weights, cx, rng)),
        ),
    };
    let generics = model.bounded(bound);
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();

    quote! {
        impl #impl_generics #krate::Generate for #ident #ty_generics #where_clause {
            fn gn<R: #krate::rand::Rng + ?Sized>(cx: &mut #krate::Context, rng: &mut R) -> Self {
                let weights = #krate::Weights::<Self>::declared();
                #body
            }
        }
    }
}
