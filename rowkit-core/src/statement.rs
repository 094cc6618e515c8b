use crate::{
    Error, ErrorKind, GenericSqlWriter, Result, SqlWriter, Value,
    writer::{Context, TimestampPolicy},
};

static GENERIC_WRITER: GenericSqlWriter = GenericSqlWriter::new();

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Terminal {
    Select,
    Insert,
    Update,
    Delete,
}

/// Fluent builder producing the text of one SQL statement.
///
/// `select` and `from` record the projection and the table, then exactly one of `query`,
/// `insert`, `update` or `delete` renders the statement. `filter`, `equal` and `order` append to
/// it. The first misuse is remembered and reported by [`Statement::render`].
///
/// Values are written as literals by the dialect [`SqlWriter`]: the text is meant for trusted
/// input only.
///
/// # Example
/// ```rust
/// use rowkit_core::{Statement, Value};
/// let sql = Statement::new()
///     .select(["Id", "Name"])
///     .from("People")
///     .insert([Value::Int32(Some(1)), "Ann".into()])
///     .render()
///     .unwrap();
/// assert_eq!(sql, "INSERT INTO People (Id,Name) VALUES (1,'Ann')");
/// ```
pub struct Statement<'w> {
    writer: &'w dyn SqlWriter,
    context: Context,
    buffer: String,
    table: Option<String>,
    fields: Vec<String>,
    terminal: Option<Terminal>,
    filtered: bool,
    error: Option<Error>,
}

impl Statement<'static> {
    /// Builder using the generic dialect.
    pub fn new() -> Self {
        Statement::with_writer(&GENERIC_WRITER)
    }
}

impl Default for Statement<'static> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'w> Statement<'w> {
    pub fn with_writer(writer: &'w dyn SqlWriter) -> Self {
        Self {
            writer,
            context: Default::default(),
            buffer: String::with_capacity(128),
            table: None,
            fields: Vec::new(),
            terminal: None,
            filtered: false,
            error: None,
        }
    }

    pub fn timestamps(mut self, policy: TimestampPolicy) -> Self {
        self.context.timestamps = policy;
        self
    }

    /// Record the projection, or the column list of an INSERT or UPDATE.
    pub fn select<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fields = fields.into_iter().map(Into::into).collect();
        self
    }

    /// Record the target table.
    pub fn from(mut self, table: impl Into<String>) -> Self {
        self.table = Some(table.into());
        self
    }

    /// Render `SELECT <fields> FROM <table>` (`*` without fields).
    pub fn query(mut self) -> Self {
        if let Some(table) = self.begin(Terminal::Select) {
            self.writer
                .write_select(&mut self.context, &mut self.buffer, &table, &self.fields);
        }
        self
    }

    /// Render `INSERT INTO <table> (<fields>) VALUES (<values>)`, values match fields by position.
    pub fn insert<I>(mut self, values: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Value>,
    {
        let values = values.into_iter().map(Into::into).collect::<Vec<Value>>();
        if let Some(table) = self.begin_assignment(Terminal::Insert, &values) {
            self.writer.write_insert(
                &mut self.context,
                &mut self.buffer,
                &table,
                &self.fields,
                &values,
            );
        }
        self
    }

    /// Render `UPDATE <table> SET <field>=<value>,...`, values match fields by position.
    pub fn update<I>(mut self, values: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Value>,
    {
        let values = values.into_iter().map(Into::into).collect::<Vec<Value>>();
        if let Some(table) = self.begin_assignment(Terminal::Update, &values) {
            self.writer.write_update(
                &mut self.context,
                &mut self.buffer,
                &table,
                &self.fields,
                &values,
            );
        }
        self
    }

    /// Render `DELETE FROM <table>`.
    pub fn delete(mut self) -> Self {
        if let Some(table) = self.begin(Terminal::Delete) {
            self.writer
                .write_delete(&mut self.context, &mut self.buffer, &table);
        }
        self
    }

    /// Append ` WHERE <predicate>`, the predicate is copied verbatim.
    pub fn filter(mut self, predicate: &str) -> Self {
        if self.error.is_some() {
            return self;
        }
        if self.terminal.is_none() {
            self.fail("WHERE clause before the statement");
        } else if self.filtered {
            self.fail("WHERE clause appended twice");
        } else if predicate.trim().is_empty() {
            self.fail("WHERE clause with an empty predicate");
        } else {
            self.filtered = true;
            self.writer
                .write_where(&mut self.context, &mut self.buffer, predicate);
        }
        self
    }

    /// Append ` = <value>` after a WHERE clause.
    pub fn equal(mut self, value: impl Into<Value>) -> Self {
        if self.check_equal() {
            self.writer
                .write_equal(&mut self.context, &mut self.buffer, &value.into());
        }
        self
    }

    /// Append ` = <value>` where the value is an entity identifier, the dialect decides how it
    /// is written.
    pub fn equal_identifier(mut self, value: impl Into<Value>) -> Self {
        if self.check_equal() {
            self.writer
                .write_equal_identifier(&mut self.context, &mut self.buffer, &value.into());
        }
        self
    }

    /// Append ` <clause>` (for example `ORDER BY Name`) after a SELECT.
    pub fn order(mut self, clause: &str) -> Self {
        if self.error.is_some() {
            return self;
        }
        if self.terminal != Some(Terminal::Select) {
            self.fail("Ordering clause appended to a statement that is not a SELECT");
        } else {
            self.writer
                .write_trailing(&mut self.context, &mut self.buffer, clause);
        }
        self
    }

    /// The statement text, or the first error hit while building it.
    pub fn render(self) -> Result<String> {
        if let Some(error) = self.error {
            return Err(error);
        }
        if self.terminal.is_none() {
            return Err(ErrorKind::statement(
                "Nothing to render, call query, insert, update or delete first",
            ));
        }
        Ok(self.buffer)
    }

    fn fail(&mut self, message: &'static str) {
        if self.error.is_none() {
            self.error = Some(ErrorKind::statement(message));
        }
    }

    fn begin(&mut self, terminal: Terminal) -> Option<String> {
        if self.error.is_some() {
            return None;
        }
        if self.terminal.is_some() {
            self.fail("The statement was already rendered");
            return None;
        }
        let Some(table) = self.table.clone().filter(|v| !v.trim().is_empty()) else {
            self.fail("Missing table, call from first");
            return None;
        };
        self.terminal = Some(terminal);
        Some(table)
    }

    fn begin_assignment(&mut self, terminal: Terminal, values: &[Value]) -> Option<String> {
        if self.error.is_some() {
            return None;
        }
        if self.fields.is_empty() {
            self.fail("No fields to assign");
            return None;
        }
        if self.fields.len() != values.len() {
            let message = format!(
                "{} fields but {} values were supplied",
                self.fields.len(),
                values.len()
            );
            self.error = Some(ErrorKind::statement(message));
            return None;
        }
        self.begin(terminal)
    }

    fn check_equal(&mut self) -> bool {
        if self.error.is_some() {
            return false;
        }
        if !self.filtered {
            self.fail("Equality without a WHERE clause");
            return false;
        }
        true
    }
}
