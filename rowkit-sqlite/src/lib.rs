mod connection;
mod driver;
mod extract;

pub use connection::*;
pub use driver::*;
