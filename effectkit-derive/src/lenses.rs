//! Implementation of `#[derive(Lenses)]`.

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::{format_ident, quote};
use syn::{Data, DeriveInput, Field, Fields, Generics, Ident, LitStr, parse_macro_input};

pub fn derive_lenses_impl(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    let name = &input.ident;
    let expanded = match &input.data {
        Data::Struct(data_struct) => generate_struct_lenses(name, &input.generics, &data_struct.fields)
            .unwrap_or_else(syn::Error::into_compile_error),
        Data::Enum(_) => {
            syn::Error::new_spanned(name, "Lenses can only be derived for structs, not enums.").to_compile_error()
        }
        Data::Union(_) => syn::Error::new_spanned(name, "Lenses cannot be derived for unions.").to_compile_error(),
    };

    TokenStream::from(expanded)
}

fn generate_struct_lenses(name: &Ident, generics: &Generics, fields: &Fields) -> syn::Result<TokenStream2> {
    let Fields::Named(named_fields) = fields else {
        return Err(syn::Error::new_spanned(
            name,
            "Lenses can only be derived for structs with named fields.",
        ));
    };

    let lens_methods = named_fields
        .named
        .iter()
        .map(generate_field_lens)
        .collect::<syn::Result<Vec<_>>>()?;

    let (impl_generics, type_generics, where_clause) = generics.split_for_impl();

    Ok(quote! {
        impl #impl_generics #name #type_generics #where_clause {
            #(#lens_methods)*
        }
    })
}

fn generate_field_lens(field: &Field) -> syn::Result<TokenStream2> {
    let Some(field_name) = field.ident.as_ref() else {
        return Err(syn::Error::new_spanned(field, "expected a named field"));
    };
    let field_type = &field.ty;
    let method_name = format_ident!("{}_lens", field_name);
    let path = path_override(field)?.unwrap_or_else(|| LitStr::new(&field_name.to_string(), field_name.span()));
    let doc = format!("A lens focusing on `{field_name}`.");

    Ok(quote! {
        #[doc = #doc]
        #[must_use]
        pub fn #method_name() -> ::effectkit::optics::Lens<Self, #field_type>
        where
            Self: 'static,
            #field_type: ::core::clone::Clone,
        {
            ::effectkit::optics::Lens::named(
                |source: &Self| ::core::clone::Clone::clone(&source.#field_name),
                |mut source: Self, value: #field_type| {
                    source.#field_name = value;
                    source
                },
                #path,
            )
        }
    })
}

/// Reads `#[lens(path = "...")]`.
fn path_override(field: &Field) -> syn::Result<Option<LitStr>> {
    let mut path = None;
    for attribute in field.attrs.iter().filter(|attribute| attribute.path().is_ident("lens")) {
        attribute.parse_nested_meta(|meta| {
            if meta.path.is_ident("path") {
                path = Some(meta.value()?.parse::<LitStr>()?);
                Ok(())
            } else {
                Err(meta.error("unsupported lens attribute; expected `path = \"...\"`"))
            }
        })?;
    }
    Ok(path)
}
