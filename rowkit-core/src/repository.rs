use crate::{
    Connection, DataSource, Driver, Entity, EntityMetadata, ErrorKind, Executor, Registry, Result,
    RowLabeled, RowsAffected, Statement, Value, ensure_query, map_row,
    stream::TryStreamExt,
    truncate_long,
    writer::TimestampPolicy,
};
use anyhow::Context;
use std::{future::Future, pin::pin, sync::Arc};

/// Generic CRUD over the entities of one data source.
///
/// Every call opens its own connection through the driver, runs exactly one statement and
/// closes the connection before returning, on the error paths too. Metadata and identifier
/// checks happen before the connection is opened, so a misdeclared entity never reaches the
/// backend.
///
/// ```ignore
/// let repository = Repository::new(SqliteDriver::new(), DataSource::parse("sqlite", ":memory:")?);
/// repository.save(&person).await?;
/// let found: Option<Person> = repository.get_by_id(person.id).await?;
/// ```
pub struct Repository<D: Driver> {
    driver: D,
    data_source: DataSource,
    registry: Arc<Registry>,
    timestamps: TimestampPolicy,
}

impl<D: Driver> Repository<D> {
    pub fn new(driver: D, data_source: DataSource) -> Self {
        Self {
            driver,
            data_source,
            registry: Default::default(),
            timestamps: Default::default(),
        }
    }

    /// Share a registry, possibly populated at startup, with other repositories.
    pub fn with_registry(mut self, registry: Arc<Registry>) -> Self {
        self.registry = registry;
        self
    }

    pub fn timestamp_policy(mut self, policy: TimestampPolicy) -> Self {
        self.timestamps = policy;
        self
    }

    pub fn driver(&self) -> &D {
        &self.driver
    }

    pub fn data_source(&self) -> &DataSource {
        &self.data_source
    }

    pub fn registry(&self) -> &Arc<Registry> {
        &self.registry
    }

    /// A statement builder in the dialect of this data source.
    pub fn statement(&self) -> Statement<'static> {
        Statement::with_writer(self.data_source.sql_writer()).timestamps(self.timestamps)
    }

    /// The entity whose identifier equals `id`, `None` when there is no such row.
    pub fn get_by_id<E: Entity>(
        &self,
        id: impl Into<Value>,
    ) -> impl Future<Output = Result<Option<E>>> + Send {
        let id = id.into();
        let prepared = self.metadata::<E>().and_then(|metadata| {
            let id_column = metadata.id_column()?;
            let sql = self
                .statement()
                .from(metadata.table_name)
                .query()
                .filter(id_column.column_name)
                .equal_identifier(id)
                .render()?;
            Ok((metadata, sql))
        });
        async move {
            let (metadata, sql) = prepared?;
            Ok(self.fetch_entities::<E>(sql, &metadata, Some(1)).await?.pop())
        }
    }

    /// Every entity of the table, in the order the backend returns them.
    pub fn get_all<E: Entity>(&self) -> impl Future<Output = Result<Vec<E>>> + Send {
        self.get_all_ordered::<E>("")
    }

    /// Every entity of the table, `order` (for example `ORDER BY Name`) is appended verbatim.
    pub fn get_all_ordered<E: Entity>(
        &self,
        order: &str,
    ) -> impl Future<Output = Result<Vec<E>>> + Send {
        let prepared = self.metadata::<E>().and_then(|metadata| {
            let sql = self
                .statement()
                .from(metadata.table_name)
                .query()
                .order(order)
                .render()?;
            Ok((metadata, sql))
        });
        async move {
            let (metadata, sql) = prepared?;
            self.fetch_entities::<E>(sql, &metadata, None).await
        }
    }

    /// Entities matching `criteria`, a raw predicate written after `WHERE`.
    pub fn get_by_criteria<E: Entity>(
        &self,
        criteria: &str,
    ) -> impl Future<Output = Result<Vec<E>>> + Send {
        let prepared = self.metadata::<E>().and_then(|metadata| {
            if criteria.trim().is_empty() {
                return Err(ErrorKind::argument("The criteria text is empty"));
            }
            let sql = self
                .statement()
                .from(metadata.table_name)
                .query()
                .filter(criteria)
                .render()?;
            Ok((metadata, sql))
        });
        async move {
            let (metadata, sql) = prepared?;
            self.fetch_entities::<E>(sql, &metadata, None).await
        }
    }

    /// Run `sql` verbatim and map every returned row.
    pub fn get_by_query<E: Entity>(
        &self,
        sql: impl Into<String>,
    ) -> impl Future<Output = Result<Vec<E>>> + Send {
        let sql = sql.into();
        let prepared = ensure_query(&sql).and_then(|_| self.metadata::<E>());
        async move {
            let metadata = prepared?;
            self.fetch_entities::<E>(sql, &metadata, None).await
        }
    }

    /// Insert the persisted columns of `entity`.
    pub fn save<E: Entity>(&self, entity: &E) -> impl Future<Output = Result<RowsAffected>> + Send {
        let prepared = self.metadata::<E>().and_then(|metadata| {
            let values = persisted_values(entity, &metadata)?;
            self.statement()
                .select(metadata.column_names())
                .from(metadata.table_name)
                .insert(values)
                .render()
                .with_context(|| format!("While saving `{}`", metadata.type_name))
        });
        async move { self.execute_statement(prepared?).await }
    }

    /// Write every persisted column of `entity` to the row matching its identifier.
    pub fn update<E: Entity>(
        &self,
        entity: &E,
    ) -> impl Future<Output = Result<RowsAffected>> + Send {
        let prepared = self.metadata::<E>().and_then(|metadata| {
            let id_column = metadata.id_column()?;
            let id = entity.property(id_column.property_name).ok_or_else(|| {
                ErrorKind::mapping(format!(
                    "`{}` does not expose its identifier `{}`",
                    metadata.type_name, id_column.property_name
                ))
            })?;
            let values = persisted_values(entity, &metadata)?;
            self.statement()
                .select(metadata.column_names())
                .from(metadata.table_name)
                .update(values)
                .filter(id_column.column_name)
                .equal_identifier(id)
                .render()
                .with_context(|| format!("While updating `{}`", metadata.type_name))
        });
        async move { self.execute_statement(prepared?).await }
    }

    /// Delete the row whose identifier equals `id`.
    pub fn delete<E: Entity>(
        &self,
        id: impl Into<Value>,
    ) -> impl Future<Output = Result<RowsAffected>> + Send {
        let id = id.into();
        let prepared = self.metadata::<E>().and_then(|metadata| {
            let id_column = metadata.id_column()?;
            self.statement()
                .from(metadata.table_name)
                .delete()
                .filter(id_column.column_name)
                .equal_identifier(id)
                .render()
        });
        async move { self.execute_statement(prepared?).await }
    }

    /// Run a statement that returns no rows (DDL, INSERT, ...).
    pub fn execute(
        &self,
        sql: impl Into<String>,
    ) -> impl Future<Output = Result<RowsAffected>> + Send {
        let sql = sql.into();
        async move {
            ensure_query(&sql)?;
            self.execute_statement(sql).await
        }
    }

    /// First value of the first row returned by `sql`.
    pub fn execute_scalar(
        &self,
        sql: impl Into<String>,
    ) -> impl Future<Output = Result<Option<Value>>> + Send {
        let sql = sql.into();
        async move {
            ensure_query(&sql)?;
            log::debug!("{}", truncate_long!(sql));
            let mut connection = self.open().await?;
            let result = connection.scalar(sql.clone()).await;
            self.release(connection, result)
                .await
                .with_context(|| format!("While executing `{}`", truncate_long!(sql)))
        }
    }

    /// Rows returned by `sql`, unmapped.
    pub fn fetch_rows(
        &self,
        sql: impl Into<String>,
    ) -> impl Future<Output = Result<Vec<RowLabeled>>> + Send {
        let sql = sql.into();
        async move {
            ensure_query(&sql)?;
            log::debug!("{}", truncate_long!(sql));
            let mut connection = self.open().await?;
            let result: Result<Vec<RowLabeled>> = connection.fetch(sql.clone()).try_collect().await;
            self.release(connection, result)
                .await
                .with_context(|| format!("While executing `{}`", truncate_long!(sql)))
        }
    }

    fn metadata<E: Entity>(&self) -> Result<Arc<EntityMetadata>> {
        self.registry.metadata::<E>()
    }

    async fn open(&self) -> Result<D::Connection> {
        self.driver
            .connect(&self.data_source)
            .await
            .with_context(|| {
                format!(
                    "While connecting to {} through the {} driver",
                    self.data_source.provider(),
                    D::NAME
                )
            })
    }

    /// Close `connection` and combine its outcome with the outcome of the statement.
    async fn release<T>(&self, connection: D::Connection, result: Result<T>) -> Result<T> {
        let closed = connection.close().await;
        match (result, closed) {
            (Ok(v), Ok(())) => Ok(v),
            (Ok(_), Err(e)) => Err(e.context("While closing the connection")),
            (Err(e), Ok(())) => Err(e),
            (Err(e), Err(closing)) => {
                log::error!("Failed to close the connection: {closing:#}");
                Err(e)
            }
        }
    }

    async fn execute_statement(&self, sql: String) -> Result<RowsAffected> {
        log::debug!("{}", truncate_long!(sql));
        let mut connection = self.open().await?;
        let result = connection.execute(sql.clone()).await;
        self.release(connection, result)
            .await
            .with_context(|| format!("While executing `{}`", truncate_long!(sql)))
    }

    async fn fetch_entities<E: Entity>(
        &self,
        sql: String,
        metadata: &EntityMetadata,
        limit: Option<usize>,
    ) -> Result<Vec<E>> {
        log::debug!("{}", truncate_long!(sql));
        let mut connection = self.open().await?;
        let result = async {
            let mut stream = pin!(connection.fetch(sql.clone()));
            let mut entities = Vec::new();
            while let Some(row) = stream.try_next().await? {
                entities.push(map_row::<E>(row, metadata)?);
                if limit.is_some_and(|limit| entities.len() >= limit) {
                    break;
                }
            }
            Ok(entities)
        }
        .await;
        self.release(connection, result)
            .await
            .with_context(|| format!("While executing `{}`", truncate_long!(sql)))
    }
}

/// Current values of the persisted columns of `entity`, in column order.
fn persisted_values<E: Entity>(entity: &E, metadata: &EntityMetadata) -> Result<Vec<Value>> {
    metadata
        .columns
        .iter()
        .map(|column| {
            entity.property(column.property_name).ok_or_else(|| {
                ErrorKind::mapping(format!(
                    "`{}` does not expose the property `{}`",
                    metadata.type_name, column.property_name
                ))
            })
        })
        .collect()
}
