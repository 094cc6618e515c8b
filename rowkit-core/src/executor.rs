use crate::{
    Driver, ErrorKind, QueryResult, Result, RowLabeled, RowsAffected, Value,
    stream::{Stream, StreamExt, TryStreamExt},
};
use std::{future::Future, pin::pin};

/// Runs SQL text on a backend.
pub trait Executor: Send + Sized {
    type Driver: Driver;

    /// General method to send any query and return any result type (either row or count).
    fn run(&mut self, query: String) -> impl Stream<Item = Result<QueryResult>> + Send;

    /// Execute the query and return the rows.
    fn fetch(&mut self, query: String) -> impl Stream<Item = Result<RowLabeled>> + Send {
        self.run(query).filter_map(|v| async move {
            match v {
                Ok(QueryResult::Row(v)) => Some(Ok(v)),
                Err(e) => Some(Err(e)),
                _ => None,
            }
        })
    }

    /// Execute the query and return the total number of rows affected.
    fn execute(&mut self, query: String) -> impl Future<Output = Result<RowsAffected>> + Send {
        self.run(query)
            .filter_map(|v| async move {
                match v {
                    Ok(QueryResult::Affected(v)) => Some(Ok(v)),
                    Err(e) => Some(Err(e)),
                    _ => None,
                }
            })
            .try_collect()
    }

    /// Execute the query and return the first value of the first row.
    fn scalar(&mut self, query: String) -> impl Future<Output = Result<Option<Value>>> + Send {
        let stream = self.fetch(query);
        async move {
            let mut stream = pin!(stream);
            Ok(stream
                .try_next()
                .await?
                .and_then(|row| row.values.into_vec().into_iter().next()))
        }
    }
}

/// Reject empty SQL text before it reaches a backend.
pub fn ensure_query(query: &str) -> Result<()> {
    if query.trim().is_empty() {
        return Err(ErrorKind::argument("The SQL text is empty"));
    }
    Ok(())
}
