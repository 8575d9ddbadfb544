//! Derives for `wgen`.
//!
//! All three derives read the `#[wgen(..)]` attribute:
//!
//! - on the container: `krate = "path"`, `weights(3, 1, ..)`, `sized`,
//!   `base_depth = n`;
//! - on enum variants: `weight = n`.

mod attr;
mod expand;
mod model;

use syn::parse_macro_input;

/// Reflect the constructors and fields of a struct or enum into
/// `wgen::Generic`.
#[proc_macro_derive(Generic, attributes(wgen))]
pub fn generic_derive(input: proc_macro::TokenStream) -> proc_macro::TokenStream {
    let input = parse_macro_input!(input as syn::DeriveInput);
    expand::generic(&input).into()
}

/// Implement `wgen::BaseCase` and `wgen::Depth`.
#[proc_macro_derive(BaseCase, attributes(wgen))]
pub fn base_case_derive(input: proc_macro::TokenStream) -> proc_macro::TokenStream {
    let input = parse_macro_input!(input as syn::DeriveInput);
    expand::base_case(&input).into()
}

/// Implement `wgen::Generate` on top of the `Generic` impl, using the
/// strategy and weights given in `#[wgen(..)]`.
#[proc_macro_derive(Generate, attributes(wgen))]
pub fn generate_derive(input: proc_macro::TokenStream) -> proc_macro::TokenStream {
    let input = parse_macro_input!(input as syn::DeriveInput);
    expand::generate(&input).into()
}
