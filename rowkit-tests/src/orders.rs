use crate::{count, recreate_table};
use rowkit::{Driver, Entity, EntityMetadata, Repository};
use rust_decimal::Decimal;
use std::str::FromStr;
use time::macros::datetime;
use uuid::Uuid;

#[derive(Entity, Default, Debug, Clone, PartialEq)]
#[table(name = "OrderLines")]
struct OrderLine {
    #[id(name = "LineId")]
    id: i32,
    #[column(name = "OrderId")]
    order: Uuid,
    #[column(name = "Product")]
    product: String,
    #[column(name = "Quantity")]
    quantity: u32,
}

#[derive(Entity, Default, Debug, Clone, PartialEq)]
#[table(name = "Orders")]
struct Order {
    #[id(name = "OrderId")]
    id: Uuid,
    #[column(name = "Customer")]
    customer: i64,
    #[column(name = "Total")]
    total: Decimal,
    #[column(name = "PlacedAt")]
    placed_at: Option<time::PrimitiveDateTime>,
    #[column(entity_ref)]
    lines: Vec<OrderLine>,
}

pub async fn orders<D: Driver>(repository: &Repository<D>) {
    // Setup
    recreate_table(
        repository,
        "Orders",
        "OrderId TEXT PRIMARY KEY, Customer INTEGER NOT NULL, Total TEXT, PlacedAt TEXT",
    )
    .await;
    recreate_table(
        repository,
        "OrderLines",
        "LineId INTEGER PRIMARY KEY, OrderId TEXT NOT NULL, Product TEXT, Quantity INTEGER",
    )
    .await;

    // Relationships are declared but never persisted
    let metadata = EntityMetadata::resolve::<Order>().expect("Failed to resolve Order");
    assert_eq!(
        metadata.column_names().collect::<Vec<_>>(),
        ["OrderId", "Customer", "Total", "PlacedAt"]
    );

    let first = Order {
        id: Uuid::new_v4(),
        customer: 7,
        total: Decimal::from_str("99.90").unwrap(),
        placed_at: Some(datetime!(2024-03-01 09:30:00)),
        lines: vec![],
    };
    let second = Order {
        id: Uuid::new_v4(),
        customer: 7,
        total: Decimal::from_str("5").unwrap(),
        placed_at: None,
        lines: vec![],
    };
    let lines = [
        OrderLine {
            id: 1,
            order: first.id,
            product: "Keyboard".into(),
            quantity: 1,
        },
        OrderLine {
            id: 2,
            order: first.id,
            product: "Cable".into(),
            quantity: 3,
        },
    ];
    for order in [&first, &second] {
        repository
            .save(order)
            .await
            .expect("Failed to save an order");
    }
    for line in &lines {
        repository
            .save(line)
            .await
            .expect("Failed to save an order line");
    }
    assert_eq!(count(repository, "Orders").await, 2);
    assert_eq!(count(repository, "OrderLines").await, 2);

    // Identifier is a uuid
    let mut found = repository
        .get_by_id::<Order>(first.id)
        .await
        .expect("Failed to query the first order")
        .expect("Failed to find the first order");
    assert_eq!(found, first);
    assert!(found.lines.is_empty());

    // Relationships are loaded by the caller
    found.lines = repository
        .get_by_criteria::<OrderLine>(&format!("OrderId = '{}' ORDER BY LineId", found.id))
        .await
        .expect("Failed to query the order lines");
    assert_eq!(found.lines, lines);

    let found = repository
        .get_by_id::<Order>(second.id)
        .await
        .expect("Failed to query the second order")
        .expect("Failed to find the second order");
    assert_eq!(found.placed_at, None);
    assert_eq!(found.total, Decimal::from(5));

    // Update and delete by uuid
    let mut second = second;
    second.total = Decimal::from_str("6.5").unwrap();
    repository
        .update(&second)
        .await
        .expect("Failed to update the second order");
    let found = repository
        .get_by_id::<Order>(second.id)
        .await
        .expect("Failed to query the second order")
        .expect("Failed to find the second order");
    assert_eq!(found.total, Decimal::from_str("6.50").unwrap());
    let affected = repository
        .delete::<Order>(first.id)
        .await
        .expect("Failed to delete the first order");
    assert_eq!(affected.rows_affected, 1);
    assert_eq!(
        repository
            .get_all::<Order>()
            .await
            .expect("Failed to query the orders")
            .into_iter()
            .map(|v| v.id)
            .collect::<Vec<_>>(),
        [second.id]
    );
}
