mod as_value;
mod column;
mod connection;
mod data_source;
mod driver;
mod entity;
mod error;
mod executor;
mod mapper;
mod metadata;
mod query;
mod registry;
mod repository;
mod statement;
mod util;
mod value;
pub mod writer;

pub use ::anyhow::Context;
pub use as_value::*;
pub use column::*;
pub use connection::*;
pub use data_source::*;
pub use driver::*;
pub use entity::*;
pub use error::*;
pub use executor::*;
pub use mapper::*;
pub use metadata::*;
pub use query::*;
pub use registry::*;
pub use repository::*;
pub use statement::*;
pub use util::*;
pub use value::*;
pub use writer::{GenericSqlWriter, OleDbSqlWriter, SqlWriter, TimestampPolicy};
pub mod stream {
    pub use ::futures::stream::*;
}
pub use ::futures::future;

pub type Result<T> = anyhow::Result<T>;
pub type Error = anyhow::Error;
