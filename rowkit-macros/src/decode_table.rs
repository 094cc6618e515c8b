use quote::ToTokens;
use syn::{ItemStruct, LitStr, Meta, parse::ParseBuffer};

pub(crate) struct TableMetadata {
    pub(crate) type_name: String,
    pub(crate) name: String,
    pub(crate) declared: bool,
}

pub fn decode_table(item: &ItemStruct) -> TableMetadata {
    let type_name = item.ident.to_string();
    let mut result = TableMetadata {
        name: type_name.clone(),
        type_name,
        declared: false,
    };
    for attr in &item.attrs {
        let meta = &attr.meta;
        if !meta.path().is_ident("table") {
            continue;
        }
        if result.declared {
            panic!("Attribute `table` can appear just once on `{}`", result.type_name);
        }
        result.declared = true;
        match meta {
            Meta::Path(..) => {}
            Meta::List(list) => {
                let _ = list.parse_nested_meta(|arg| {
                    if arg.path.is_ident("name") {
                        let Ok(value) = arg.value().and_then(ParseBuffer::parse::<LitStr>) else {
                            panic!(
                                "Error while parsing `name`, use it like: `#[table(name = \"People\")]`"
                            );
                        };
                        result.name = value.value();
                    } else {
                        panic!(
                            "Unknown attribute `{}` inside table macro",
                            arg.path.to_token_stream().to_string()
                        );
                    }
                    Ok(())
                });
            }
            Meta::NameValue(..) => {
                panic!("Error while parsing `table`, use it like: `#[table]` or `#[table(name = \"People\")]`")
            }
        }
    }
    result
}
