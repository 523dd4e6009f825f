use proc_macro::TokenStream;
use quote::quote;

/// Marks a trait as an abstract type and implements `alignkit::AlignOf` for
/// its trait objects: `dyn Trait`, `dyn Trait + Send` and
/// `dyn Trait + Send + Sync`, each for every lifetime bound `'a`.
///
/// The trait itself is emitted unchanged. Traits with associated types are
/// rejected: their trait objects cannot be named without picking the types.
#[proc_macro_attribute]
pub fn abstract_type(attr: TokenStream, item: TokenStream) -> TokenStream {
    if !attr.is_empty() {
        return syn::Error::new(
            proc_macro2::Span::call_site(),
            "#[abstract_type] does not take arguments",
        )
        .to_compile_error()
        .into();
    }
    let input = syn::parse_macro_input!(item as syn::ItemTrait);
    if let Some(ty) = input.items.iter().find_map(|item| match item {
        syn::TraitItem::Type(ty) => Some(ty),
        _ => None,
    }) {
        return syn::Error::new_spanned(
            &ty.ident,
            "#[abstract_type] traits cannot have associated types",
        )
        .to_compile_error()
        .into();
    }
    let name = &input.ident;
    let mut impl_generics = input.generics.clone();
    impl_generics
        .params
        .insert(0, syn::parse_quote!('__alignkit_dyn));
    let (impl_generics, _, _) = impl_generics.split_for_impl();
    let (_, ty_generics, where_clause) = input.generics.split_for_impl();
    let objects = [
        quote!(dyn #name #ty_generics + '__alignkit_dyn),
        quote!(dyn #name #ty_generics + ::core::marker::Send + '__alignkit_dyn),
        quote!(dyn #name #ty_generics + ::core::marker::Send + ::core::marker::Sync + '__alignkit_dyn),
    ];
    let result = quote! {
        #input

        #(
            impl #impl_generics ::alignkit::AlignOf for #objects #where_clause {
                const ALIGNMENT: usize = <::alignkit::AbstractBase as ::alignkit::AlignOf>::ALIGNMENT;
            }
        )*
    };
    result.into()
}
