mod decode_field;
mod decode_record;
mod record_trait;

use decode_field::decode_field;
use decode_record::decode_record;
use proc_macro::TokenStream;
use record_trait::record_trait;
use syn::{Data, DeriveInput, Fields, parse_macro_input};

/// Implements `rowmap::Record` for a struct with named fields.
///
/// Field attributes:
/// - `#[sql("column,id,readonly,table:name")]` column name and parameters, `-` as the column
///   excludes the field.
/// - `#[table("name")]` table name override.
/// - `#[readonly]` never updated.
/// - `#[embed]` the field is a record whose fields are flattened into this one.
///
/// Type attributes `#[hooks]` and `#[override_scan]` declare that the type implements
/// `rowmap::Hooks` or `rowmap::OverrideScan` itself.
#[proc_macro_derive(
    Record,
    attributes(sql, table, readonly, embed, hooks, override_scan)
)]
pub fn derive_record(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    derive(&input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}

fn derive(input: &DeriveInput) -> syn::Result<proc_macro2::TokenStream> {
    let Data::Struct(data) = &input.data else {
        return Err(syn::Error::new_spanned(
            &input.ident,
            "Record can only be derived for structs with named fields",
        ));
    };
    let Fields::Named(named) = &data.fields else {
        return Err(syn::Error::new_spanned(
            &input.ident,
            "Record can only be derived for structs with named fields",
        ));
    };
    let record = decode_record(input)?;
    let fields = named
        .named
        .iter()
        .map(decode_field)
        .collect::<syn::Result<Vec<_>>>()?;
    Ok(record_trait(input, &record, &fields))
}
