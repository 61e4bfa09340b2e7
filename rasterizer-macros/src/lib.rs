use proc_macro2::TokenStream;
use quote::quote;
use syn::{
    parse_macro_input, punctuated::Punctuated, token::Comma, Data, DataStruct, DeriveInput, Error,
    Field, Fields, FieldsNamed, Result,
};

/// Derives `Interpolate` field by field. The trait has to be in scope where
/// the derive is used, which `use rasterizer::Interpolate` already does.
#[proc_macro_derive(Interpolate)]
pub fn derive(input: proc_macro::TokenStream) -> proc_macro::TokenStream {
    let derive = parse_macro_input!(input as DeriveInput);

    match generate_impl(&derive) {
        Ok(tokens) => tokens,
        Err(e) => e.to_compile_error(),
    }
    .into()
}

fn named_fields(derive: &DeriveInput) -> Result<&Punctuated<Field, Comma>> {
    match &derive.data {
        Data::Struct(DataStruct {
            fields: Fields::Named(FieldsNamed { named, .. }),
            ..
        }) => Ok(named),
        _ => Err(Error::new_spanned(
            &derive.ident,
            "Interpolate can only be derived for structs with named fields",
        )),
    }
}

fn generate_field_interpolation(field: &Field) -> Result<TokenStream> {
    let name = field
        .ident
        .as_ref()
        .ok_or_else(|| Error::new_spanned(field, "field must have a name"))?;
    let ty = &field.ty;
    Ok(quote! {
        #name: <#ty as Interpolate>::interpolate(&v0.#name, &v1.#name, &v2.#name, r0, r1, r2)
    })
}

fn generate_impl(derive: &DeriveInput) -> Result<TokenStream> {
    let struct_name = &derive.ident;
    let (impl_generics, ty_generics, where_clause) = derive.generics.split_for_impl();

    let field_assignments = named_fields(derive)?
        .iter()
        .map(generate_field_interpolation)
        .collect::<Result<Vec<_>>>()?;

    Ok(quote! {
        impl #impl_generics Interpolate for #struct_name #ty_generics #where_clause {
            fn interpolate(v0: &Self, v1: &Self, v2: &Self, r0: f32, r1: f32, r2: f32) -> Self {
                Self {
                    #(#field_assignments),*
                }
            }
        }
    })
}
