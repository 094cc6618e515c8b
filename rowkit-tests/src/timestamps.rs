use crate::recreate_table;
use rowkit::{Driver, Entity, EntityMetadata, Repository, TimestampPolicy, Value};
use time::{
    Date, Duration, OffsetDateTime, PrimitiveDateTime,
    macros::{date, datetime},
};

#[derive(Entity, Default, Debug, Clone, PartialEq)]
#[table(name = "Events")]
struct Event {
    #[id]
    id: i32,
    #[column(name = "At")]
    at: Option<PrimitiveDateTime>,
    #[column(name = "Day")]
    day: Option<Date>,
}

async fn insert<D: Driver>(repository: &Repository<D>, event: &Event, policy: TimestampPolicy) {
    let metadata = EntityMetadata::resolve::<Event>().expect("Failed to resolve Event");
    let values = metadata
        .columns
        .iter()
        .map(|c| event.property(c.property_name).unwrap_or_default())
        .collect::<Vec<Value>>();
    let sql = repository
        .statement()
        .timestamps(policy)
        .select(metadata.column_names())
        .from(metadata.table_name)
        .insert(values)
        .render()
        .expect("Failed to render the event insert");
    repository
        .execute(sql)
        .await
        .expect("Failed to insert the event");
}

pub async fn timestamps<D: Driver>(repository: &Repository<D>) {
    // Setup
    recreate_table(repository, "Events", "id INTEGER PRIMARY KEY, At TEXT, Day TEXT").await;
    let supplied = datetime!(1999-12-31 23:59:58);
    let day = date!(1999 - 12 - 31);

    // Supplied values are written as they are
    let event = Event {
        id: 1,
        at: Some(supplied),
        day: Some(day),
    };
    insert(repository, &event, TimestampPolicy::Supplied).await;
    let found = repository
        .get_by_id::<Event>(1)
        .await
        .expect("Failed to query event 1")
        .expect("Failed to find event 1");
    assert_eq!(found, event);

    // Current time replaces timestamps, dates are untouched
    let before = OffsetDateTime::now_utc() - Duration::days(1);
    let before = PrimitiveDateTime::new(before.date(), before.time());
    insert(
        repository,
        &Event { id: 2, ..event },
        TimestampPolicy::Current,
    )
    .await;
    let found = repository
        .get_by_id::<Event>(2)
        .await
        .expect("Failed to query event 2")
        .expect("Failed to find event 2");
    let at = found.at.expect("The stamped timestamp is missing");
    assert_ne!(at, supplied);
    assert!(at > before);
    assert_eq!(at.nanosecond(), 0);
    assert_eq!(found.day, Some(day));

    // Stored text matches the supplied literal
    let found = repository
        .get_by_criteria::<Event>("At = '1999-12-31 23:59:58'")
        .await
        .expect("Failed to query the events by time");
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].id, 1);
}
