use crate::recreate_table;
use rowkit::{Driver, Entity, Repository};
use time::{
    Date, Time,
    macros::{date, time},
};
use uuid::Uuid;

#[derive(Entity, Default, Debug, Clone, PartialEq)]
#[table(name = "NullableFields")]
struct NullableFields {
    #[id]
    id: i32,
    #[column]
    alpha: Option<i32>,
    #[column]
    bravo: Option<f64>,
    #[column]
    charlie: Option<String>,
    #[column]
    delta: Option<bool>,
    #[column]
    echo: Option<Uuid>,
    #[column]
    foxtrot: Option<Date>,
    #[column]
    golf: Option<Time>,
    #[column]
    hotel: Option<char>,
    #[cfg(not(feature = "disable-blobs"))]
    #[column]
    india: Option<Box<[u8]>>,
}

pub async fn nullability<D: Driver>(repository: &Repository<D>) {
    // Setup
    recreate_table(
        repository,
        "NullableFields",
        "id INTEGER PRIMARY KEY, alpha INTEGER, bravo REAL, charlie TEXT, delta TEXT, echo TEXT, foxtrot TEXT, golf TEXT, hotel TEXT, india BLOB",
    )
    .await;

    // Every value missing
    let empty = NullableFields {
        id: 1,
        ..Default::default()
    };
    repository
        .save(&empty)
        .await
        .expect("Failed to save the empty entity");
    let found = repository
        .get_by_id::<NullableFields>(1)
        .await
        .expect("Failed to query the empty entity")
        .expect("Failed to find the empty entity");
    assert_eq!(found, empty);

    // Every value present
    let full = NullableFields {
        id: 2,
        alpha: Some(-777),
        bravo: Some(0.25),
        charlie: Some("It's here".into()),
        delta: Some(false),
        echo: Some(Uuid::parse_str("5e915574-bb30-4430-98cf-c5854f61fbbd").unwrap()),
        foxtrot: Some(date!(1987 - 10 - 19)),
        golf: Some(time!(12:00:10)),
        hotel: Some('z'),
        #[cfg(not(feature = "disable-blobs"))]
        india: Some([0xCA, 0xFE, 0x00, 0x01].into()),
    };
    repository
        .save(&full)
        .await
        .expect("Failed to save the full entity");
    let found = repository
        .get_by_id::<NullableFields>(2)
        .await
        .expect("Failed to query the full entity")
        .expect("Failed to find the full entity");
    assert_eq!(found, full);

    // Back to nothing
    repository
        .update(&NullableFields {
            id: 2,
            ..Default::default()
        })
        .await
        .expect("Failed to clear the full entity");
    let found = repository
        .get_by_id::<NullableFields>(2)
        .await
        .expect("Failed to query the cleared entity")
        .expect("Failed to find the cleared entity");
    assert_eq!(found.charlie, None);
    assert_eq!(found.echo, None);
    assert_eq!(found.golf, None);
}
