use crate::{Entity, EntityMetadata, ErrorKind, Result, RowLabeled};
use anyhow::Context;

/// Build one `E` from a result row.
///
/// Every persisted column of `metadata` must be present in the row (exact name first, then
/// ASCII case insensitive). Null values leave the property at its default.
pub fn map_row<E: Entity>(mut row: RowLabeled, metadata: &EntityMetadata) -> Result<E> {
    let mut entity = E::instantiate();
    for column in &metadata.columns {
        let index = row.find_index(column.column_name).ok_or_else(|| {
            ErrorKind::mapping(format!(
                "Column `{}` of `{}` does not exist in the result row (columns: {:?})",
                column.column_name, metadata.type_name, row.labels,
            ))
        })?;
        let value = row.take(index);
        if value.is_null() {
            continue;
        }
        entity
            .assign(column.property_name, value)
            .context(ErrorKind::Mapping(
                format!(
                    "Cannot assign column `{}` to `{}::{}`",
                    column.column_name, metadata.type_name, column.property_name
                )
                .into(),
            ))?;
    }
    Ok(entity)
}
