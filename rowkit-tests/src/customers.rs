use crate::{count, recreate_table, silent_logs};
use rowkit::{Driver, Entity, ErrorKind, Repository, Value};
use rust_decimal::Decimal;
use std::str::FromStr;

#[derive(Entity, Default, Debug, Clone, PartialEq)]
#[table(name = "Customers")]
struct Customer {
    #[id(name = "CustomerId")]
    id: i64,
    #[column(name = "FullName")]
    name: String,
    #[column]
    email: Option<String>,
    #[column(name = "Age")]
    age: i16,
    #[column(name = "Active")]
    active: bool,
    #[column(name = "Balance")]
    balance: Decimal,
    display: Option<String>,
}

fn customer(id: i64, name: &str, age: i16, active: bool, balance: &str) -> Customer {
    Customer {
        id,
        name: name.into(),
        email: Some(format!("{}@example.com", name.to_lowercase().replace(' ', "."))),
        age,
        active,
        balance: Decimal::from_str(balance).expect("Invalid decimal"),
        display: None,
    }
}

pub async fn customers<D: Driver>(repository: &Repository<D>) {
    // Setup
    recreate_table(
        repository,
        "Customers",
        "CustomerId INTEGER PRIMARY KEY, FullName TEXT NOT NULL, email TEXT, Age INTEGER, Active TEXT, Balance TEXT",
    )
    .await;
    assert_eq!(count(repository, "Customers").await, 0);

    // Save
    let ann = customer(1, "Ann Lee", 34, true, "120.50");
    let bob = customer(2, "Bob O'Hara", 27, false, "-3.25");
    let cid = customer(3, "Cid", 45, true, "0");
    for entity in [&ann, &bob, &cid] {
        let affected = repository
            .save(entity)
            .await
            .expect("Failed to save a customer");
        assert_eq!(affected.rows_affected, 1);
    }
    assert_eq!(count(repository, "Customers").await, 3);

    // Find by identifier
    let found = repository
        .get_by_id::<Customer>(2)
        .await
        .expect("Failed to query customer 2")
        .expect("Failed to find customer 2");
    assert_eq!(found, bob);
    assert_eq!(found.name, "Bob O'Hara");
    let missing = repository
        .get_by_id::<Customer>(99)
        .await
        .expect("Failed to query customer 99");
    assert_eq!(missing, None);

    // All, ordered, by criteria, by query
    let mut all = repository
        .get_all::<Customer>()
        .await
        .expect("Failed to query all the customers");
    all.sort_by_key(|v| v.id);
    assert_eq!(all, [ann.clone(), bob.clone(), cid.clone()]);
    let ordered = repository
        .get_all_ordered::<Customer>("ORDER BY Age DESC")
        .await
        .expect("Failed to query the customers ordered by age");
    assert_eq!(
        ordered.iter().map(|v| v.id).collect::<Vec<_>>(),
        [3, 1, 2]
    );
    let mut adults = repository
        .get_by_criteria::<Customer>("Age >= 30")
        .await
        .expect("Failed to query the customers by age");
    adults.sort_by_key(|v| v.id);
    assert_eq!(adults, [ann.clone(), cid.clone()]);
    let active = repository
        .get_by_query::<Customer>(
            "SELECT * FROM Customers WHERE Active = 'true' ORDER BY CustomerId",
        )
        .await
        .expect("Failed to run the active customers query");
    assert_eq!(active, [ann.clone(), cid.clone()]);

    // Update
    let mut bob = bob;
    bob.age = 28;
    bob.email = None;
    bob.balance = Decimal::from_str("10.75").unwrap();
    let affected = repository
        .update(&bob)
        .await
        .expect("Failed to update customer 2");
    assert_eq!(affected.rows_affected, 1);
    let found = repository
        .get_by_id::<Customer>(2)
        .await
        .expect("Failed to query customer 2")
        .expect("Failed to find customer 2");
    assert_eq!(found, bob);
    let ghost = customer(42, "Nobody", 1, false, "0");
    let affected = repository
        .update(&ghost)
        .await
        .expect("Failed to update a customer that does not exist");
    assert_eq!(affected.rows_affected, 0);

    // Delete
    let affected = repository
        .delete::<Customer>(1)
        .await
        .expect("Failed to delete customer 1");
    assert_eq!(affected.rows_affected, 1);
    assert_eq!(
        repository
            .get_by_id::<Customer>(1)
            .await
            .expect("Failed to query customer 1"),
        None
    );
    assert_eq!(count(repository, "Customers").await, 2);

    // Raw rows and scalars
    let rows = repository
        .fetch_rows("SELECT CustomerId, FullName FROM Customers ORDER BY CustomerId")
        .await
        .expect("Failed to fetch the customer rows");
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].names(), ["CustomerId", "FullName"]);
    assert_eq!(
        rows[1].get_column("FullName"),
        Some(&Value::Varchar(Some("Cid".into())))
    );
    assert_eq!(rows[1].find_column("fullname"), rows[1].get_column("FullName"));
    let name = repository
        .execute_scalar("SELECT FullName FROM Customers WHERE CustomerId = 2")
        .await
        .expect("Failed to run the scalar query");
    assert_eq!(name, Some(Value::Varchar(Some("Bob O'Hara".into()))));

    // Rejected before reaching the database
    silent_logs! {
        let error = repository
            .get_by_criteria::<Customer>("  ")
            .await
            .expect_err("Empty criteria must be rejected");
        assert!(ErrorKind::is_argument(&error));
        let error = repository
            .get_by_query::<Customer>("")
            .await
            .expect_err("Empty query must be rejected");
        assert!(ErrorKind::is_argument(&error));
        let error = repository
            .get_by_query::<Customer>("SELECT CustomerId, FullName FROM Customers")
            .await
            .expect_err("Rows without every column must not map");
        assert!(ErrorKind::is_mapping(&error));
        assert!(format!("{error:#}").contains("email"));
    }
}
