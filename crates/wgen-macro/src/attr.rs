use darling::{ast, FromDeriveInput, FromField, FromMeta, FromVariant};

#[derive(Debug, FromDeriveInput)]
#[darling(attributes(wgen), supports(struct_any, enum_any))]
pub struct Container {
    pub ident: syn::Ident,
    pub generics: syn::Generics,
    pub data: ast::Data<Variant, Field>,
    /// Path to the runtime crate, `::wgen` unless given.
    #[darling(default)]
    pub krate: Option<String>,
    #[darling(default)]
    pub weights: Option<WeightList>,
    #[darling(default)]
    pub sized: bool,
    #[darling(default)]
    pub base_depth: Option<usize>,
}

#[derive(Debug, FromVariant)]
#[darling(attributes(wgen))]
pub struct Variant {
    pub ident: syn::Ident,
    pub fields: ast::Fields<Field>,
    #[darling(default)]
    pub weight: Option<u32>,
}

#[derive(Debug, Clone, FromField)]
#[darling(attributes(wgen))]
pub struct Field {
    pub ident: Option<syn::Ident>,
    pub ty: syn::Type,
}

/// `weights(3, 1, 1)`
#[derive(Debug)]
pub struct WeightList {
    pub weights: Vec<u32>,
    pub span: proc_macro2::Span,
}

impl FromMeta for WeightList {
    fn from_list(items: &[ast::NestedMeta]) -> darling::Result<Self> {
        let mut errors = darling::Error::accumulator();
        let mut weights = Vec::with_capacity(items.len());
        for item in items {
            match item {
                ast::NestedMeta::Lit(syn::Lit::Int(int)) => {
                    if let Some(w) = errors.handle(int.base10_parse::<u32>().map_err(Into::into)) {
                        weights.push(w);
                    }
                }
                other => errors.push(
                    darling::Error::custom("expected an integer weight").with_span(other),
                ),
            }
        }
        let span = items
            .first()
            .map_or_else(proc_macro2::Span::call_site, syn::spanned::Spanned::span);
        errors.finish_with(WeightList { weights, span })
    }
}
