mod customers;
mod missing_id;
mod nullability;
mod orders;
mod timestamps;

use crate::{
    customers::customers, missing_id::missing_id, nullability::nullability, orders::orders,
    timestamps::timestamps,
};
use log::LevelFilter;
use rowkit::{Driver, Repository};
use std::env;

pub fn init_logs() {
    let mut logger = env_logger::builder();
    logger
        .is_test(true)
        .format_file(true)
        .format_line_number(true);
    if env::var("RUST_LOG").is_err() {
        logger.filter_level(LevelFilter::Warn);
    }
    let _ = logger.try_init();
}

/// Run the whole suite against `repository`, which must point to an empty, persistent database.
pub async fn execute_tests<D: Driver>(repository: &Repository<D>) {
    customers(repository).await;
    orders(repository).await;
    nullability(repository).await;
    timestamps(repository).await;
    missing_id(repository).await;
}

/// Drop and create a table, one statement per call.
pub(crate) async fn recreate_table<D: Driver>(
    repository: &Repository<D>,
    table: &str,
    definition: &str,
) {
    repository
        .execute(format!("DROP TABLE IF EXISTS {table}"))
        .await
        .unwrap_or_else(|e| panic!("Failed to drop the {table} table: {e:#}"));
    repository
        .execute(format!("CREATE TABLE {table} ({definition})"))
        .await
        .unwrap_or_else(|e| panic!("Failed to create the {table} table: {e:#}"));
}

/// Number of rows in `table`.
pub(crate) async fn count<D: Driver>(repository: &Repository<D>, table: &str) -> i64 {
    let value = repository
        .execute_scalar(format!("SELECT COUNT(*) FROM {table}"))
        .await
        .expect("Failed to count the rows")
        .expect("The count query returned no row");
    <i64 as rowkit::AsValue>::try_from_value(value).expect("The count is not an integer")
}

#[macro_export]
macro_rules! silent_logs {
    ($($code:tt)+) => {{
        let level = log::max_level();
        log::set_max_level(log::LevelFilter::Off);
        $($code)+
        log::set_max_level(level);
    }};
}
