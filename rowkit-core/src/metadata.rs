use crate::{ColumnDef, Entity, ErrorKind, Result};

/// Resolved mapping of one entity property.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnSpec {
    pub property_name: &'static str,
    /// Declared override or the property name.
    pub column_name: &'static str,
    pub is_entity_reference: bool,
    pub is_identifier: bool,
}

impl From<&ColumnDef> for ColumnSpec {
    fn from(value: &ColumnDef) -> Self {
        Self {
            property_name: value.property,
            column_name: value.name,
            is_entity_reference: value.entity_ref,
            is_identifier: value.identifier,
        }
    }
}

/// Table, column and identifier facts of an entity type.
///
/// Derived from the declarations only, so it can be computed once and shared (see
/// [`Registry`](crate::Registry)).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityMetadata {
    pub type_name: &'static str,
    pub table_name: &'static str,
    /// Persisted columns in declaration order, entity references excluded.
    pub columns: Vec<ColumnSpec>,
    pub id_column: Option<ColumnSpec>,
}

impl EntityMetadata {
    pub fn resolve<E: Entity>() -> Result<Self> {
        let type_name = E::table_def().type_name;
        let table_name = resolve_table::<E>()?;
        let columns = resolve_columns::<E>();
        let id_column = resolve_id_column::<E>();
        let result = Self {
            type_name,
            table_name,
            columns,
            id_column,
        };
        log::trace!("Resolved metadata of `{type_name}`: {result:?}");
        Ok(result)
    }

    /// The identifier column, required by every identifier dependent operation.
    pub fn id_column(&self) -> Result<&ColumnSpec> {
        self.id_column
            .as_ref()
            .ok_or(ErrorKind::MissingIdentifier(self.type_name))
            .map_err(Into::into)
    }

    /// Column names in declaration order.
    pub fn column_names(&self) -> impl ExactSizeIterator<Item = &'static str> + '_ {
        self.columns.iter().map(|v| v.column_name)
    }
}

/// Table name of `E`.
///
/// Fails with a mapping error when the type is not declared as a table or the name is empty.
pub fn resolve_table<E: Entity>() -> Result<&'static str> {
    let table = E::table_def();
    if !table.declared {
        return Err(ErrorKind::mapping(format!(
            "Type `{}` is not declared as a table",
            table.type_name
        )));
    }
    let name = table.name;
    if name.trim().is_empty() {
        return Err(ErrorKind::mapping(format!(
            "Type `{}` declares an empty table name",
            table.type_name
        )));
    }
    Ok(name)
}

/// Persisted columns of `E` in declaration order, entity references excluded.
pub fn resolve_columns<E: Entity>() -> Vec<ColumnSpec> {
    E::column_defs()
        .iter()
        .filter(|v| !v.entity_ref)
        .map(Into::into)
        .collect()
}

/// The identifier column of `E`, the first one wins when several are declared.
pub fn resolve_id_column<E: Entity>() -> Option<ColumnSpec> {
    let mut identifiers = E::column_defs()
        .iter()
        .filter(|v| v.identifier && !v.entity_ref);
    let result = identifiers.next().map(ColumnSpec::from);
    if let Some(id) = &result {
        let others = identifiers.map(|v| v.name).collect::<Vec<_>>();
        if !others.is_empty() {
            log::warn!(
                "Type `{}` declares multiple identifiers, `{}` is used and {:?} are ignored",
                E::table_def().type_name,
                id.column_name,
                others,
            );
        }
    }
    result
}

