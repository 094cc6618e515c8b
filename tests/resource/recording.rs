use rowkit::{
    Connection, DataSource, Driver, Executor, QueryResult, Result, RowLabeled, RowsAffected,
    Value,
    stream::{self, Stream},
};
use std::{
    collections::VecDeque,
    future::Future,
    sync::{Arc, Mutex},
};

/// What a [`RecordingDriver`] saw, and what it answers next.
#[derive(Default, Debug)]
pub struct Recording {
    pub statements: Vec<String>,
    pub responses: VecDeque<Vec<QueryResult>>,
    pub opened: usize,
    pub closed: usize,
}

/// Backend that records the SQL it receives and replays canned results.
#[derive(Default, Clone)]
pub struct RecordingDriver {
    pub recording: Arc<Mutex<Recording>>,
}

impl RecordingDriver {
    pub fn new() -> Self {
        Default::default()
    }
    /// Results of the next statement, statements without a response affect one row.
    pub fn respond(&self, results: impl IntoIterator<Item = QueryResult>) {
        self.recording
            .lock()
            .unwrap()
            .responses
            .push_back(results.into_iter().collect());
    }
    pub fn statements(&self) -> Vec<String> {
        self.recording.lock().unwrap().statements.clone()
    }
    pub fn opened(&self) -> usize {
        self.recording.lock().unwrap().opened
    }
    pub fn closed(&self) -> usize {
        self.recording.lock().unwrap().closed
    }
}

pub struct RecordingConnection {
    recording: Arc<Mutex<Recording>>,
}

impl Driver for RecordingDriver {
    type Connection = RecordingConnection;
    const NAME: &'static str = "recording";

    fn connect(
        &self,
        _data_source: &DataSource,
    ) -> impl Future<Output = Result<RecordingConnection>> + Send {
        let recording = self.recording.clone();
        async move {
            recording.lock().unwrap().opened += 1;
            Ok(RecordingConnection { recording })
        }
    }
}

impl Executor for RecordingConnection {
    type Driver = RecordingDriver;

    fn run(&mut self, query: String) -> impl Stream<Item = Result<QueryResult>> + Send {
        let mut recording = self.recording.lock().unwrap();
        recording.statements.push(query);
        let results = recording.responses.pop_front().unwrap_or_else(|| {
            vec![QueryResult::Affected(RowsAffected {
                rows_affected: 1,
                last_affected_id: None,
            })]
        });
        stream::iter(results.into_iter().map(Ok))
    }
}

impl Connection for RecordingConnection {
    fn connect(_data_source: &DataSource) -> impl Future<Output = Result<Self>> + Send {
        async {
            Ok(RecordingConnection {
                recording: Default::default(),
            })
        }
    }

    fn close(self) -> impl Future<Output = Result<()>> + Send {
        async move {
            self.recording.lock().unwrap().closed += 1;
            Ok(())
        }
    }
}

pub fn row(labels: &[&str], values: Vec<Value>) -> QueryResult {
    QueryResult::Row(RowLabeled::new(
        labels.iter().map(|v| v.to_string()).collect(),
        values.into(),
    ))
}
