use crate::{SqliteDriver, extract::extract_value};
use rowkit_core::{
    Connection, DataSource, Driver, Error, ErrorKind, Executor, ProviderKind, QueryResult, Result,
    Row, RowLabeled, RowNames, RowsAffected, send_value, stream::Stream, truncate_long,
};
use rusqlite::OpenFlags;
use std::{
    future::Future,
    sync::{Arc, Mutex, PoisonError},
};
use tokio::task::{JoinHandle, spawn_blocking};

/// One SQLite database handle.
///
/// Statements run on the blocking thread pool, rows are handed back through a channel as they
/// are stepped. Each running statement holds a reference to the handle until it is done stepping.
pub struct SqliteConnection {
    pub(crate) connection: Arc<Mutex<rusqlite::Connection>>,
    pub(crate) tasks: Vec<JoinHandle<()>>,
}

/// Path or URI to open, from a connection string like `sqlite://data.db?mode=rwc`.
fn location(connection_string: &str) -> String {
    let location = connection_string.trim();
    let location = location.strip_prefix("sqlite://").unwrap_or(location);
    if location.contains('?') && !location.starts_with("file:") {
        format!("file:{location}")
    } else {
        location.to_owned()
    }
}

fn backend_error(error: rusqlite::Error, query: &str) -> Error {
    Error::new(error).context(ErrorKind::Connection(
        format!("SQLite failed to execute `{}`", truncate_long!(query)).into(),
    ))
}

/// Step `query` to completion sending every outcome through `tx`, stops early when the
/// receiver is gone.
fn execute(
    connection: &rusqlite::Connection,
    query: &str,
    tx: &flume::Sender<Result<QueryResult>>,
) -> rusqlite::Result<()> {
    let mut statement = connection.prepare(query)?;
    let count = statement.column_count();
    if count == 0 {
        let rows_affected = statement.execute([])?;
        send_value!(
            tx,
            Ok(QueryResult::Affected(RowsAffected {
                rows_affected: rows_affected as u64,
                last_affected_id: Some(connection.last_insert_rowid()),
            }))
        );
        return Ok(());
    }
    let labels: RowNames = statement
        .column_names()
        .into_iter()
        .map(String::from)
        .collect();
    let mut rows = statement.query([])?;
    while let Some(row) = rows.next()? {
        let values = (0..count)
            .map(|i| row.get_ref(i).map(extract_value))
            .collect::<rusqlite::Result<Row>>()?;
        if tx
            .send(Ok(QueryResult::Row(RowLabeled::new(labels.clone(), values))))
            .is_err()
        {
            log::trace!("Result stream dropped, stop stepping `{}`", truncate_long!(query));
            break;
        }
    }
    Ok(())
}

impl SqliteConnection {
    /// Wait for every statement to stop stepping.
    ///
    /// A statement whose stream was dropped stops at its next row.
    pub(crate) async fn finish(&mut self) -> Result<()> {
        for task in self.tasks.drain(..) {
            task.await.map_err(|e| {
                Error::new(e).context(ErrorKind::Connection(
                    "A SQLite statement did not complete".into(),
                ))
            })?;
        }
        Ok(())
    }
}

impl Executor for SqliteConnection {
    type Driver = SqliteDriver;

    fn run(&mut self, query: String) -> impl Stream<Item = Result<QueryResult>> + Send {
        let (tx, rx) = flume::unbounded::<Result<QueryResult>>();
        let connection = self.connection.clone();
        self.tasks.retain(|task| !task.is_finished());
        self.tasks.push(spawn_blocking(move || {
            let connection = connection.lock().unwrap_or_else(PoisonError::into_inner);
            if let Err(e) = execute(&connection, &query, &tx) {
                let error = backend_error(e, &query);
                log::error!("{:#}", error);
                send_value!(tx, Err(error));
            }
        }));
        rx.into_stream()
    }
}

impl Connection for SqliteConnection {
    fn connect(data_source: &DataSource) -> impl Future<Output = Result<Self>> + Send {
        let provider = data_source.provider();
        let location = location(data_source.connection_string());
        async move {
            if provider != ProviderKind::Sqlite {
                return Err(ErrorKind::connection(format!(
                    "The {} driver cannot open a {} data source",
                    SqliteDriver::NAME,
                    provider
                )));
            }
            if location.is_empty() {
                return Err(ErrorKind::argument("The SQLite connection string is empty"));
            }
            let flags = OpenFlags::SQLITE_OPEN_READ_WRITE
                | OpenFlags::SQLITE_OPEN_CREATE
                | OpenFlags::SQLITE_OPEN_URI
                | OpenFlags::SQLITE_OPEN_NO_MUTEX;
            let opened = {
                let location = location.clone();
                spawn_blocking(move || rusqlite::Connection::open_with_flags(location, flags))
                    .await?
            };
            let connection = opened.map_err(|e| {
                let error = Error::new(e).context(ErrorKind::Connection(
                    format!("Cannot open the SQLite database `{location}`").into(),
                ));
                log::error!("{:#}", error);
                error
            })?;
            log::debug!("Opened the SQLite database `{location}`");
            Ok(Self {
                connection: Arc::new(Mutex::new(connection)),
                tasks: Vec::new(),
            })
        }
    }

    fn close(mut self) -> impl Future<Output = Result<()>> + Send {
        async move {
            self.finish().await?;
            let connection = Arc::try_unwrap(self.connection)
                .map_err(|_| {
                    ErrorKind::connection("Cannot close the SQLite database, the handle is shared")
                })?
                .into_inner()
                .unwrap_or_else(PoisonError::into_inner);
            spawn_blocking(move || connection.close())
                .await?
                .map_err(|(_, e)| {
                    let error = Error::new(e).context(ErrorKind::Connection(
                        "Cannot close the SQLite database".into(),
                    ));
                    log::error!("{:#}", error);
                    error
                })
        }
    }
}
