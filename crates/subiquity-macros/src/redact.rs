//! Implementation of `#[derive(Redact)]`.

use proc_macro2::TokenStream;
use quote::quote;
use syn::{DeriveInput, Field, Result};

/// How a single field is rendered in the redacted projection.
enum FieldMode {
    Keep,
    Mask,
    Nested,
}

fn field_mode(field: &Field) -> Result<FieldMode> {
    let mut mode = FieldMode::Keep;
    for attr in field.attrs.iter().filter(|a| a.path().is_ident("redact")) {
        match &attr.meta {
            syn::Meta::Path(_) => mode = FieldMode::Mask,
            syn::Meta::List(_) => {
                attr.parse_nested_meta(|meta| {
                    if meta.path.is_ident("nested") {
                        mode = FieldMode::Nested;
                        Ok(())
                    } else {
                        Err(meta.error("expected `nested`"))
                    }
                })?;
            }
            syn::Meta::NameValue(nv) => {
                return Err(syn::Error::new_spanned(
                    nv,
                    "use `#[redact]` or `#[redact(nested)]`",
                ));
            }
        }
    }
    Ok(mode)
}

pub fn expand(input: DeriveInput) -> Result<TokenStream> {
    let name = &input.ident;

    let fields = match &input.data {
        syn::Data::Struct(data) => match &data.fields {
            syn::Fields::Named(fields) => &fields.named,
            _ => {
                return Err(syn::Error::new_spanned(
                    name,
                    "Redact only supports structs with named fields",
                ));
            }
        },
        _ => {
            return Err(syn::Error::new_spanned(
                name,
                "Redact can only be derived for structs",
            ));
        }
    };

    let mut projections = Vec::with_capacity(fields.len());
    let mut debug_fields = Vec::with_capacity(fields.len());

    for field in fields {
        let Some(field_name) = field.ident.as_ref() else {
            return Err(syn::Error::new_spanned(field, "expected a named field"));
        };
        let field_name_str = field_name.to_string();

        match field_mode(field)? {
            FieldMode::Keep => {
                projections.push(quote! {
                    #field_name: ::core::clone::Clone::clone(&self.#field_name)
                });
                debug_fields.push(quote! {
                    .field(#field_name_str, &self.#field_name)
                });
            }
            FieldMode::Mask => {
                projections.push(quote! {
                    #field_name: ::subiquity_types::redact::Mask::masked(&self.#field_name)
                });
                debug_fields.push(quote! {
                    .field(
                        #field_name_str,
                        &::subiquity_types::redact::Mask::masked(&self.#field_name),
                    )
                });
            }
            FieldMode::Nested => {
                projections.push(quote! {
                    #field_name: ::subiquity_types::redact::Redact::redacted(&self.#field_name)
                });
                // Nested records carry their own masking Debug impl.
                debug_fields.push(quote! {
                    .field(#field_name_str, &self.#field_name)
                });
            }
        }
    }

    let name_str = name.to_string();

    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    Ok(quote! {
        impl #impl_generics ::subiquity_types::redact::Redact for #name #ty_generics #where_clause {
            fn redacted(&self) -> Self {
                Self {
                    #(#projections,)*
                }
            }
        }

        impl #impl_generics ::std::fmt::Debug for #name #ty_generics #where_clause {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                f.debug_struct(#name_str)
                    #(#debug_fields)*
                    .finish()
            }
        }
    })
}
