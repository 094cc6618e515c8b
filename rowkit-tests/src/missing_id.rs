use crate::{count, recreate_table, silent_logs};
use rowkit::{Driver, Entity, ErrorKind, Repository};

/// Persisted without an identifier: reads and inserts work, the rest is refused.
#[derive(Entity, Default, Debug, Clone, PartialEq)]
#[table(name = "Notes")]
struct Note {
    #[column(name = "Title")]
    title: String,
    #[column(name = "Body")]
    body: Option<String>,
}

pub async fn missing_id<D: Driver>(repository: &Repository<D>) {
    // Setup
    recreate_table(repository, "Notes", "Title TEXT, Body TEXT").await;
    let note = Note {
        title: "Groceries".into(),
        body: Some("Milk, eggs".into()),
    };
    repository
        .save(&note)
        .await
        .expect("Failed to save a note");
    let notes = repository
        .get_all::<Note>()
        .await
        .expect("Failed to query the notes");
    assert_eq!(notes, [note.clone()]);

    silent_logs! {
        let error = repository
            .get_by_id::<Note>(1)
            .await
            .expect_err("Notes cannot be found by identifier");
        assert!(ErrorKind::is_missing_identifier(&error));
        let error = repository
            .update(&note)
            .await
            .expect_err("Notes cannot be updated");
        assert!(ErrorKind::is_missing_identifier(&error));
        let error = repository
            .delete::<Note>("Groceries")
            .await
            .expect_err("Notes cannot be deleted");
        assert!(ErrorKind::is_missing_identifier(&error));

        // Backend failures
        let error = repository
            .execute("INSERT INTO NoSuchTable VALUES (1)")
            .await
            .expect_err("Writing to a missing table must fail");
        assert!(ErrorKind::is_connection(&error));
    }
    assert_eq!(count(repository, "Notes").await, 1);
}
