use crate::{ColumnDef, Result, TableDef, Value};

/// A type mapped to a table.
///
/// Implemented by `#[derive(Entity)]`, the generated code exposes the declarations and gives
/// name based access to the fields so the mapper and the repository can work without knowing
/// the concrete type.
///
/// # Example
/// ```ignore
/// #[derive(Entity, Default)]
/// #[table(name = "People")]
/// struct Person {
///     #[id]
///     id: i32,
///     #[column]
///     name: Option<String>,
///     // Transient, never read nor written
///     selected: bool,
/// }
/// ```
pub trait Entity: Sized + Send + 'static {
    fn table_def() -> &'static TableDef;

    /// Declared columns in field order, entity references included.
    fn column_defs() -> &'static [ColumnDef];

    /// A fresh instance with every field at its default value.
    fn instantiate() -> Self;

    /// Convert `value` and store it in the field named `property`.
    fn assign(&mut self, property: &str, value: Value) -> Result<()>;

    /// Current value of the field named `property`, `None` if there is no such column.
    fn property(&self, property: &str) -> Option<Value>;
}
