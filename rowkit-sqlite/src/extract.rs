use rusqlite::types::ValueRef;
use rowkit_core::Value;

/// Storage class of the cell decides the variant, declared column types are not consulted.
pub(crate) fn extract_value(value: ValueRef<'_>) -> Value {
    match value {
        ValueRef::Null => Value::Null,
        ValueRef::Integer(v) => Value::Int64(Some(v)),
        ValueRef::Real(v) => Value::Float64(Some(v)),
        ValueRef::Text(v) => match std::str::from_utf8(v) {
            Ok(v) => Value::Varchar(Some(v.into())),
            // Text that is not UTF-8 keeps its bytes
            Err(..) => Value::Blob(Some(v.into())),
        },
        ValueRef::Blob(v) => Value::Blob(Some(v.into())),
    }
}
