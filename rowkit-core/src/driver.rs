use crate::{Connection, DataSource, Result};
use std::future::Future;

/// Entry point of a backend: opens its connections.
pub trait Driver: Send + Sync {
    type Connection: Connection<Driver = Self>;

    /// Human readable backend name, used in logs.
    const NAME: &'static str;

    fn connect(
        &self,
        data_source: &DataSource,
    ) -> impl Future<Output = Result<Self::Connection>> + Send {
        Self::Connection::connect(data_source)
    }
}
