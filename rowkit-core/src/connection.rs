use crate::{DataSource, Executor, Result};
use std::future::Future;

/// One live session with a backend, used for a single repository call.
pub trait Connection: Executor {
    /// Open a connection described by `data_source`.
    fn connect(data_source: &DataSource) -> impl Future<Output = Result<Self>> + Send;

    /// Release the connection, reporting the errors the backend raises on close.
    fn close(self) -> impl Future<Output = Result<()>> + Send {
        async move {
            drop(self);
            Ok(())
        }
    }
}
