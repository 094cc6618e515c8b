//! Rowkit: declare entities with `#[derive(Entity)]`, get generated SQL and typed CRUD through a
//! [`Repository`] over any backend implementing [`Driver`].
pub use rowkit_core::*;
pub use rowkit_macros::Entity;
