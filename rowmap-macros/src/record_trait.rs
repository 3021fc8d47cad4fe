use crate::{decode_field::FieldMetadata, decode_record::RecordMetadata};
use proc_macro2::TokenStream;
use quote::quote;
use syn::DeriveInput;

fn quote_option(value: &Option<String>) -> TokenStream {
    match value {
        None => quote!(None),
        Some(v) => quote!(Some(#v)),
    }
}

pub(crate) fn record_trait(
    input: &DeriveInput,
    record: &RecordMetadata,
    fields: &[FieldMetadata],
) -> TokenStream {
    let name = &input.ident;
    let name_str = name.to_string();
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();
    let override_scan = record.override_scan;
    let specs = fields.iter().map(|f| {
        let field_name = &f.name;
        let sql = quote_option(&f.sql);
        let table = quote_option(&f.table);
        let readonly = f.readonly;
        let ty = &f.ty;
        let embedded = if f.embed {
            quote!(Some(<#ty as ::rowmap::Record>::field_specs))
        } else {
            quote!(None)
        };
        quote! {
            ::rowmap::FieldSpec {
                name: #field_name,
                sql: #sql,
                table: #table,
                readonly: #readonly,
                embedded: #embedded,
            }
        }
    });
    let accessible = fields.iter().enumerate().filter(|(_, f)| !f.excluded());
    let get_arms = accessible.clone().map(|(i, f)| {
        let ident = &f.ident;
        if f.embed {
            quote!([#i, rest @ ..] => ::rowmap::Record::get(&self.#ident, rest),)
        } else {
            quote! {
                [#i] => Ok(::rowmap::AsValue::as_value(::std::clone::Clone::clone(&self.#ident))),
            }
        }
    });
    let set_arms = accessible.map(|(i, f)| {
        let ident = &f.ident;
        if f.embed {
            quote!([#i, rest @ ..] => ::rowmap::Record::set(&mut self.#ident, rest, value),)
        } else {
            quote! {
                [#i] => {
                    self.#ident = ::rowmap::AsValue::try_from_value(value)?;
                    Ok(())
                }
            }
        }
    });
    let hooks = (!record.hooks).then(|| {
        quote!(impl #impl_generics ::rowmap::Hooks for #name #ty_generics #where_clause {})
    });
    let scan = (!record.override_scan).then(|| {
        quote!(impl #impl_generics ::rowmap::OverrideScan for #name #ty_generics #where_clause {})
    });
    quote! {
        impl #impl_generics ::rowmap::Record for #name #ty_generics #where_clause {
            const NAME: &'static str = #name_str;
            const OVERRIDE_SCAN: bool = #override_scan;

            fn field_specs() -> ::std::vec::Vec<::rowmap::FieldSpec> {
                ::std::vec![#(#specs),*]
            }

            fn get(&self, path: &[usize]) -> ::rowmap::Result<::rowmap::Value> {
                match path {
                    #(#get_arms)*
                    _ => Err(::rowmap::MappingError::InputShape(::std::format!(
                        "`{}` has no readable field at {:?}",
                        #name_str,
                        path
                    ))
                    .into()),
                }
            }

            #[allow(unused_variables)]
            fn set(&mut self, path: &[usize], value: ::rowmap::Value) -> ::rowmap::Result<()> {
                match path {
                    #(#set_arms)*
                    _ => Err(::rowmap::MappingError::InputShape(::std::format!(
                        "`{}` has no writable field at {:?}",
                        #name_str,
                        path
                    ))
                    .into()),
                }
            }
        }
        #hooks
        #scan
    }
}
