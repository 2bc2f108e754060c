use proc_macro::TokenStream;
use quote::quote;
use syn::{Data, DeriveInput, Fields, LitStr};

pub fn derive_storage_entity(input: TokenStream) -> TokenStream {
    let input = syn::parse_macro_input!(input as DeriveInput);
    match expand(&input) {
        Ok(expanded) => expanded.into(),
        Err(error) => error.to_compile_error().into(),
    }
}

fn expand(input: &DeriveInput) -> syn::Result<proc_macro2::TokenStream> {
    let name = &input.ident;

    // Extract #[entity(name = "...")] from struct-level attributes
    let entity_name = extract_entity_name(input)?;

    // Extract the field marked with #[entity(key)] or default to "id"
    let key_field = extract_key_field(input)?;

    // Lossless keys only: a u64 key is a compile error, not a silent wrap.
    Ok(quote! {
        impl mate_stores::StorageEntity for #name {
            const ENTITY_NAME: &'static str = #entity_name;

            fn primary_key(&self) -> i64 {
                i64::from(self.#key_field)
            }
        }
    })
}

fn extract_entity_name(input: &DeriveInput) -> syn::Result<String> {
    for attr in &input.attrs {
        if !attr.path().is_ident("entity") {
            continue;
        }

        let mut entity_name = None;
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("name") {
                let value: LitStr = meta.value()?.parse()?;
                entity_name = Some(value.value());
                Ok(())
            } else {
                Err(meta.error("unsupported entity attribute, expected `name = \"...\"`"))
            }
        })?;

        if let Some(n) = entity_name {
            return Ok(n);
        }
    }

    // Default: struct name without the "Storage" prefix
    let name = input.ident.to_string();
    Ok(match name.strip_prefix("Storage") {
        Some(rest) if !rest.is_empty() => rest.to_string(),
        _ => name,
    })
}

fn extract_key_field(input: &DeriveInput) -> syn::Result<syn::Ident> {
    if let Data::Struct(data_struct) = &input.data {
        if let Fields::Named(fields) = &data_struct.fields {
            for field in &fields.named {
                for attr in &field.attrs {
                    if attr.path().is_ident("entity") {
                        let mut is_key = false;
                        attr.parse_nested_meta(|meta| {
                            if meta.path.is_ident("key") {
                                is_key = true;
                                Ok(())
                            } else {
                                Err(meta.error("unsupported entity attribute, expected `key`"))
                            }
                        })?;
                        if is_key {
                            if let Some(ident) = &field.ident {
                                return Ok(ident.clone());
                            }
                        }
                    }
                }
            }

            // Default: look for a field named "id"
            for field in &fields.named {
                if let Some(ident) = &field.ident {
                    if ident == "id" {
                        return Ok(ident.clone());
                    }
                }
            }
        }
    }

    Err(syn::Error::new_spanned(
        &input.ident,
        "StorageEntity derive: no field marked with #[entity(key)] and no field named `id`",
    ))
}
