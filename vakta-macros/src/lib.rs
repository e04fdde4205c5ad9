//! Procedural macros for the Vakta event library.

use proc_macro::TokenStream;
use quote::quote;
use syn::{Data, DeriveInput, Field, Fields, Type, parse_macro_input};

/// Derive macro implementing `vakta::EventSource` for a host struct.
///
/// The embedded event state is located, in order of preference, by a
/// `#[watchable]` attribute on a field, a field named `watchable`, or the
/// single field whose type is `Watchable`.
///
/// ```rust,ignore
/// use vakta::{EventSource, Watchable};
///
/// #[derive(EventSource)]
/// struct Connection {
///     #[watchable]
///     events: Watchable,
///     port: u16,
/// }
/// ```
#[proc_macro_derive(EventSource, attributes(watchable))]
pub fn derive_event_source(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    let name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(named) => &named.named,
            _ => {
                return syn::Error::new_spanned(
                    &input.ident,
                    "EventSource can only be derived for structs with named fields",
                )
                .to_compile_error()
                .into();
            }
        },
        _ => {
            return syn::Error::new_spanned(
                &input.ident,
                "EventSource can only be derived for structs",
            )
            .to_compile_error()
            .into();
        }
    };

    let marked = fields
        .iter()
        .find(|field| field.attrs.iter().any(|attr| attr.path().is_ident("watchable")));
    let by_name = fields
        .iter()
        .find(|field| field.ident.as_ref().is_some_and(|ident| ident == "watchable"));
    let by_type: Vec<&Field> = fields.iter().filter(|field| is_watchable(&field.ty)).collect();

    let field = marked.or(by_name).or(if by_type.len() == 1 {
        Some(by_type[0])
    } else {
        None
    });

    let Some(field) = field else {
        return syn::Error::new_spanned(
            &input.ident,
            "EventSource needs a #[watchable] field, a field named `watchable`, \
             or exactly one field of type `Watchable`",
        )
        .to_compile_error()
        .into();
    };
    let ident = field.ident.as_ref().unwrap();

    let expanded = quote! {
        impl #impl_generics ::vakta::EventSource for #name #ty_generics #where_clause {
            fn watchable(&self) -> &::vakta::Watchable {
                &self.#ident
            }
        }
    };

    TokenStream::from(expanded)
}

fn is_watchable(ty: &Type) -> bool {
    match ty {
        Type::Path(path) => path
            .path
            .segments
            .last()
            .is_some_and(|segment| segment.ident == "Watchable"),
        _ => false,
    }
}
