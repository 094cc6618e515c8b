mod resource {
    pub mod entities;
    pub mod recording;
}

#[cfg(test)]
mod tests {
    use crate::resource::{
        entities::{Note, Order, Person},
        recording::{RecordingDriver, row},
    };
    use rowkit::{
        DataSource, ErrorKind, ProviderKind, QueryResult, Registry, Repository, RowsAffected,
        TimestampPolicy, Value,
    };
    use rust_decimal::Decimal;
    use std::{str::FromStr, sync::Arc};
    use time::macros::datetime;
    use uuid::Uuid;

    fn recorded(provider: ProviderKind) -> (RecordingDriver, Repository<RecordingDriver>) {
        let driver = RecordingDriver::new();
        let repository = Repository::new(driver.clone(), DataSource::new(provider, "Server=.;"))
            .timestamp_policy(TimestampPolicy::Supplied);
        (driver, repository)
    }

    fn ann() -> Person {
        Person {
            id: 1,
            name: Some("Ann".into()),
            age: 30,
            active: true,
            ..Default::default()
        }
    }

    fn person_row(id: i64, name: &str, age: i64) -> QueryResult {
        row(
            &["Id", "Name", "Age", "Active"],
            vec![
                Value::Int64(Some(id)),
                Value::Varchar(Some(name.into())),
                Value::Int64(Some(age)),
                Value::Varchar(Some("true".into())),
            ],
        )
    }

    #[tokio::test]
    async fn save_update_delete() {
        let (driver, repository) = recorded(ProviderKind::SqlServer);
        let mut person = ann();
        let affected = repository.save(&person).await.unwrap();
        assert_eq!(affected.rows_affected, 1);
        person.age = 31;
        person.name = None;
        repository.update(&person).await.unwrap();
        repository.delete::<Person>(person.id).await.unwrap();
        assert_eq!(
            driver.statements(),
            [
                "INSERT INTO People (Id,Name,Age,Active) VALUES (1,'Ann',30,'true')",
                "UPDATE People SET Id=1,Name=NULL,Age=31,Active='true' WHERE Id = 1",
                "DELETE FROM People WHERE Id = 1",
            ]
        );
        assert_eq!(driver.opened(), 3);
        assert_eq!(driver.closed(), 3);
    }

    #[tokio::test]
    async fn reads() {
        let (driver, repository) = recorded(ProviderKind::MySql);
        driver.respond([person_row(1, "Ann", 30)]);
        let found = repository.get_by_id::<Person>(1).await.unwrap();
        assert_eq!(found, Some(ann()));

        driver.respond(Vec::<QueryResult>::new());
        let missing = repository.get_by_id::<Person>(2).await.unwrap();
        assert_eq!(missing, None);

        driver.respond([person_row(2, "Bob", 40), person_row(1, "Ann", 30)]);
        let all = repository
            .get_all_ordered::<Person>("ORDER BY Name DESC")
            .await
            .unwrap();
        assert_eq!(
            all.iter().map(|v| v.id).collect::<Vec<_>>(),
            [2, 1]
        );

        driver.respond([person_row(2, "Bob", 40)]);
        let adults = repository
            .get_by_criteria::<Person>("Age > 35")
            .await
            .unwrap();
        assert_eq!(adults.len(), 1);
        assert_eq!(adults[0].name.as_deref(), Some("Bob"));

        driver.respond([person_row(1, "Ann", 30)]);
        let queried = repository
            .get_by_query::<Person>("SELECT * FROM People WHERE Name LIKE 'A%'")
            .await
            .unwrap();
        assert_eq!(queried, [ann()]);

        repository.get_all::<Person>().await.unwrap();
        assert_eq!(
            driver.statements(),
            [
                "SELECT * FROM People WHERE Id = 1",
                "SELECT * FROM People WHERE Id = 2",
                "SELECT * FROM People ORDER BY Name DESC",
                "SELECT * FROM People WHERE Age > 35",
                "SELECT * FROM People WHERE Name LIKE 'A%'",
                "SELECT * FROM People",
            ]
        );
        assert_eq!(driver.opened(), 6);
        assert_eq!(driver.closed(), 6);
    }

    #[tokio::test]
    async fn get_by_id_takes_the_first_row() {
        let (driver, repository) = recorded(ProviderKind::Sqlite);
        driver.respond([person_row(1, "Ann", 30), person_row(1, "Duplicate", 99)]);
        let found = repository.get_by_id::<Person>(1).await.unwrap().unwrap();
        assert_eq!(found.name.as_deref(), Some("Ann"));
    }

    #[tokio::test]
    async fn uuid_identifier_dialect() {
        let id = Uuid::parse_str("67e55044-10b1-426f-9247-bb680e5fe0c8").unwrap();
        let order = Order {
            id,
            customer: 1,
            total: Decimal::from_str("9.99").unwrap(),
            placed_at: Some(datetime!(2023-03-04 05:06:07)),
        };

        let (driver, repository) = recorded(ProviderKind::OleDb);
        driver.respond([row(
            &["OrderId", "Customer", "Total", "PlacedAt"],
            vec![
                Value::Varchar(Some(format!("{{{id}}}"))),
                Value::Int32(Some(1)),
                Value::Varchar(Some("9.99".into())),
                Value::Varchar(Some("2023-03-04 05:06:07".into())),
            ],
        )]);
        let found = repository.get_by_id::<Order>(id).await.unwrap();
        assert_eq!(found, Some(order.clone()));
        repository.delete::<Order>(id).await.unwrap();
        assert_eq!(
            driver.statements(),
            [
                "SELECT * FROM Orders WHERE OrderId = '{67e55044-10b1-426f-9247-bb680e5fe0c8}'",
                "DELETE FROM Orders WHERE OrderId = '{67e55044-10b1-426f-9247-bb680e5fe0c8}'",
            ]
        );

        let (driver, repository) = recorded(ProviderKind::SqlServer);
        repository.update(&order).await.unwrap();
        assert_eq!(
            driver.statements(),
            [concat!(
                "UPDATE Orders SET OrderId='67e55044-10b1-426f-9247-bb680e5fe0c8',Customer=1,",
                "Total=9.99,PlacedAt='2023-03-04 05:06:07' ",
                "WHERE OrderId = '67e55044-10b1-426f-9247-bb680e5fe0c8'"
            )]
        );
    }

    #[tokio::test]
    async fn current_timestamp_policy() {
        let driver = RecordingDriver::new();
        let repository = Repository::new(
            driver.clone(),
            DataSource::new(ProviderKind::Sqlite, ":memory:"),
        );
        let order = Order {
            placed_at: Some(datetime!(1999-01-02 03:04:05)),
            ..Default::default()
        };
        repository.save(&order).await.unwrap();
        let statements = driver.statements();
        assert!(statements[0].starts_with("INSERT INTO Orders (OrderId,Customer,Total,PlacedAt)"));
        assert!(!statements[0].contains("1999-01-02"));
    }

    #[tokio::test]
    async fn missing_identifier_never_executes() {
        let (driver, repository) = recorded(ProviderKind::SqlServer);
        let note = Note {
            title: "Hello".into(),
            body: None,
        };
        let error = repository.get_by_id::<Note>(1).await.unwrap_err();
        assert!(ErrorKind::is_missing_identifier(&error));
        let error = repository.update(&note).await.unwrap_err();
        assert!(ErrorKind::is_missing_identifier(&error));
        let error = repository.delete::<Note>(1).await.unwrap_err();
        assert!(ErrorKind::is_missing_identifier(&error));
        assert!(driver.statements().is_empty());
        assert_eq!(driver.opened(), 0);

        repository.save(&note).await.unwrap();
        assert_eq!(
            driver.statements(),
            ["INSERT INTO Note (title,body) VALUES ('Hello',NULL)"]
        );
    }

    #[tokio::test]
    async fn failures_release_the_connection() {
        let (driver, repository) = recorded(ProviderKind::SqlServer);
        driver.respond([row(&["Id", "Name"], vec![Value::Int32(Some(1)), Value::Null])]);
        let error = repository.get_all::<Person>().await.unwrap_err();
        assert!(ErrorKind::is_mapping(&error));
        assert!(format!("{error:#}").contains("SELECT * FROM People"));
        assert_eq!(driver.opened(), 1);
        assert_eq!(driver.closed(), 1);

        let error = repository.execute("   ").await.unwrap_err();
        assert!(ErrorKind::is_argument(&error));
        let error = repository.get_by_query::<Person>("").await.unwrap_err();
        assert!(ErrorKind::is_argument(&error));
        let error = repository.get_by_criteria::<Person>(" ").await.unwrap_err();
        assert!(ErrorKind::is_argument(&error));
        assert_eq!(driver.opened(), 1);
    }

    #[tokio::test]
    async fn raw_helpers() {
        let (driver, repository) = recorded(ProviderKind::Sqlite);
        driver.respond([QueryResult::Affected(RowsAffected {
            rows_affected: 0,
            last_affected_id: None,
        })]);
        repository
            .execute("CREATE TABLE People (Id INTEGER)")
            .await
            .unwrap();
        driver.respond([row(&["count"], vec![Value::Int64(Some(3))])]);
        let count = repository
            .execute_scalar("SELECT COUNT(*) AS count FROM People")
            .await
            .unwrap();
        assert_eq!(count, Some(Value::Int64(Some(3))));
        driver.respond([row(&["Id"], vec![Value::Int64(Some(1))])]);
        let rows = repository.fetch_rows("SELECT Id FROM People").await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].get_column("Id"), Some(&Value::Int64(Some(1))));
        assert_eq!(rows[0].get_column("ID"), None);
        assert_eq!(rows[0].find_column("ID"), Some(&Value::Int64(Some(1))));
        assert_eq!(rows[0].find_index("id"), Some(0));
        assert_eq!(driver.closed(), 3);
    }

    #[tokio::test]
    async fn shared_registry() {
        let registry = Arc::new(Registry::new());
        registry.register::<Person>().unwrap();
        let driver = RecordingDriver::new();
        let repository = Repository::new(driver, DataSource::new(ProviderKind::MySql, ""))
            .with_registry(registry.clone());
        assert!(Arc::ptr_eq(repository.registry(), &registry));
        repository.save(&ann()).await.unwrap();
        assert!(!registry.contains::<Order>());
        repository.delete::<Order>(Uuid::nil()).await.unwrap();
        assert!(registry.contains::<Order>());
    }
}
