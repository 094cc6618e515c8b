mod decode_column;
mod decode_table;

use decode_column::{ColumnKind, decode_column};
use decode_table::decode_table;
use proc_macro::TokenStream;
use quote::quote;
use syn::{Fields, ItemStruct, parse_macro_input};

/// Implements `rowkit::Entity`.
///
/// - `#[table]` or `#[table(name = "People")]` on the struct declares the table.
/// - `#[column]`, `#[column(name = "..")]` mark a persisted field.
/// - `#[column(entity_ref)]` marks a relationship, declared but never persisted.
/// - `#[id]` or `#[id(name = "..")]` marks the persisted identifier.
///
/// Fields without attributes are transient. Every field must implement `Default`, persisted
/// fields must implement `AsValue` and `Clone`. `time` types have no default value, declare
/// date, time and timestamp columns as `Option<..>`.
#[proc_macro_derive(Entity, attributes(table, column, id))]
pub fn derive_entity(input: TokenStream) -> TokenStream {
    let item: ItemStruct = parse_macro_input!(input as ItemStruct);
    let Fields::Named(..) = &item.fields else {
        panic!("Entity can be derived only for structs with named fields");
    };
    let name = &item.ident;
    let (impl_generics, ty_generics, where_clause) = item.generics.split_for_impl();
    let table = decode_table(&item);
    let type_name = &table.type_name;
    let table_name = &table.name;
    let declared = table.declared;
    let columns = item.fields.iter().map(decode_column).collect::<Vec<_>>();
    let all_fields = columns.iter().map(|c| &c.ident);
    let declared_columns = columns
        .iter()
        .filter(|c| !matches!(c.kind, ColumnKind::Transient))
        .collect::<Vec<_>>();
    let columns_len = declared_columns.len();
    let column_defs = declared_columns.iter().map(|c| {
        let property = c.ident.to_string();
        let column_name = &c.name;
        let identifier = c.identifier;
        let entity_ref = matches!(c.kind, ColumnKind::EntityRef);
        quote! {
            ::rowkit::ColumnDef {
                property: #property,
                name: #column_name,
                identifier: #identifier,
                entity_ref: #entity_ref,
            }
        }
    });
    let persisted = declared_columns
        .iter()
        .filter(|c| matches!(c.kind, ColumnKind::Persisted))
        .collect::<Vec<_>>();
    let assign = persisted.iter().map(|c| {
        let field = &c.ident;
        let property = field.to_string();
        let ty = &c.ty;
        quote! {
            #property => {
                self.#field = <#ty as ::rowkit::AsValue>::try_from_value(value)?;
                Ok(())
            }
        }
    });
    let property = persisted.iter().map(|c| {
        let field = &c.ident;
        let property = field.to_string();
        quote! {
            #property => Some(::rowkit::AsValue::as_value(::std::clone::Clone::clone(&self.#field)))
        }
    });
    quote! {
        impl #impl_generics ::rowkit::Entity for #name #ty_generics #where_clause {
            fn table_def() -> &'static ::rowkit::TableDef {
                static TABLE_DEF: ::rowkit::TableDef = ::rowkit::TableDef {
                    type_name: #type_name,
                    name: #table_name,
                    declared: #declared,
                };
                &TABLE_DEF
            }

            fn column_defs() -> &'static [::rowkit::ColumnDef] {
                static COLUMN_DEFS: [::rowkit::ColumnDef; #columns_len] = [#(#column_defs),*];
                &COLUMN_DEFS
            }

            fn instantiate() -> Self {
                Self {
                    #(#all_fields: ::std::default::Default::default()),*
                }
            }

            fn assign(&mut self, property: &str, value: ::rowkit::Value) -> ::rowkit::Result<()> {
                match property {
                    #(#assign)*
                    _ => Err(::rowkit::ErrorKind::mapping(::std::format!(
                        "`{}` has no persisted property `{}`",
                        #type_name,
                        property
                    ))),
                }
            }

            fn property(&self, property: &str) -> Option<::rowkit::Value> {
                match property {
                    #(#property,)*
                    _ => None,
                }
            }
        }
    }
    .into()
}
