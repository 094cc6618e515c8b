/// Column declaration produced by `#[derive(Entity)]` for a single field.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnDef {
    /// Rust field name.
    pub property: &'static str,
    /// Column name: the declared override or the field name.
    pub name: &'static str,
    /// Marked with `#[id]`.
    pub identifier: bool,
    /// Marked with `#[column(entity_ref)]`: declared but never persisted.
    pub entity_ref: bool,
}

/// Table declaration produced by `#[derive(Entity)]`.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableDef {
    /// Rust type name.
    pub type_name: &'static str,
    /// Table name: the declared override or the type name.
    pub name: &'static str,
    /// The type carries the `#[table]` attribute.
    pub declared: bool,
}
