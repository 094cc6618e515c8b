use quote::ToTokens;
use syn::{Field, Ident, LitStr, Meta, Type, parse::ParseBuffer};

#[derive(Debug)]
pub(crate) enum ColumnKind {
    /// No attribute, the field is neither read nor written.
    Transient,
    Persisted,
    EntityRef,
}

pub(crate) struct ColumnMetadata {
    pub(crate) ident: Ident,
    pub(crate) ty: Type,
    pub(crate) name: String,
    pub(crate) kind: ColumnKind,
    pub(crate) identifier: bool,
}

fn decode_name(meta: &Meta, attribute: &str, mut on_flag: impl FnMut(&str)) -> Option<String> {
    let mut name = None;
    match meta {
        Meta::Path(..) => {}
        Meta::List(list) => {
            let _ = list.parse_nested_meta(|arg| {
                if arg.path.is_ident("name") {
                    let Ok(value) = arg.value().and_then(ParseBuffer::parse::<LitStr>) else {
                        panic!(
                            "Error while parsing `name`, use it like: `#[{attribute}(name = \"my_column\")]`"
                        );
                    };
                    let value = value.value();
                    if value.trim().is_empty() {
                        panic!("The `name` of `{attribute}` cannot be empty");
                    }
                    name = Some(value);
                } else if let Some(flag) = arg.path.get_ident() {
                    on_flag(&flag.to_string());
                } else {
                    panic!(
                        "Unknown attribute `{}` inside {attribute} macro",
                        arg.path.to_token_stream().to_string()
                    );
                }
                Ok(())
            });
        }
        Meta::NameValue(..) => {
            panic!("Error while parsing `{attribute}`, use it like: `#[{attribute}(name = \"my_column\")]`")
        }
    }
    name
}

pub fn decode_column(field: &Field) -> ColumnMetadata {
    let ident = field
        .ident
        .clone()
        .expect("Field is expected to have a name");
    let mut metadata = ColumnMetadata {
        name: ident.to_string(),
        ident,
        ty: field.ty.clone(),
        kind: ColumnKind::Transient,
        identifier: false,
    };
    for attr in &field.attrs {
        let meta = &attr.meta;
        if meta.path().is_ident("column") {
            let mut entity_ref = false;
            let name = decode_name(meta, "column", |flag| {
                if flag == "entity_ref" {
                    entity_ref = true;
                } else {
                    panic!("Unknown attribute `{flag}` inside column macro");
                }
            });
            if let Some(name) = name {
                metadata.name = name;
            }
            metadata.kind = if entity_ref {
                ColumnKind::EntityRef
            } else {
                ColumnKind::Persisted
            };
        } else if meta.path().is_ident("id") {
            let name = decode_name(meta, "id", |flag| {
                if flag == "entity_ref" {
                    panic!("An identifier cannot be an entity reference, remove `entity_ref`");
                } else {
                    panic!("Unknown attribute `{flag}` inside id macro");
                }
            });
            if let Some(name) = name {
                metadata.name = name;
            }
            metadata.identifier = true;
            if matches!(metadata.kind, ColumnKind::Transient) {
                metadata.kind = ColumnKind::Persisted;
            }
        }
    }
    if metadata.identifier && matches!(metadata.kind, ColumnKind::EntityRef) {
        panic!(
            "Field `{}` cannot be both an identifier and an entity reference",
            metadata.ident
        );
    }
    metadata
}
