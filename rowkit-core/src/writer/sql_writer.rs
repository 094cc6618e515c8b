use crate::{
    Value, separated_by,
    writer::{Context, Fragment},
};
use std::fmt::Write;
use time::{Date, OffsetDateTime, PrimitiveDateTime, Time};
use uuid::Uuid;

macro_rules! write_integer {
    ($out:ident, $value:expr) => {{
        let mut buffer = itoa::Buffer::new();
        $out.push_str(buffer.format($value));
    }};
}
macro_rules! write_float {
    ($this:ident, $context:ident, $out:ident, $value:expr) => {{
        if $value.is_finite() {
            let mut buffer = ryu::Buffer::new();
            $out.push_str(buffer.format($value));
        } else {
            $this.write_value_non_finite($context, $out, $value.into());
        }
    }};
}

/// Dialect printer converting statements and values into concrete SQL text.
///
/// Every method has a default implementation producing the plain SQL shared by the supported
/// backends, a dialect overrides only what it writes differently.
pub trait SqlWriter: Send + Sync {
    fn as_dyn(&self) -> &dyn SqlWriter;

    /// Copy `value` into `out` replacing every `search` char with `replace`.
    fn write_escaped(
        &self,
        _context: &mut Context,
        out: &mut String,
        value: &str,
        search: char,
        replace: &str,
    ) {
        let mut position = 0;
        for (i, c) in value.char_indices() {
            if c == search {
                out.push_str(&value[position..i]);
                out.push_str(replace);
                position = i + c.len_utf8();
            }
        }
        out.push_str(&value[position..]);
    }

    /// Table and column names are written as declared.
    fn write_identifier(&self, _context: &mut Context, out: &mut String, value: &str) {
        out.push_str(value);
    }

    /// Render a literal.
    fn write_value(&self, context: &mut Context, out: &mut String, value: &Value) {
        match value {
            v if v.is_null() => self.write_value_none(context, out),
            Value::Boolean(Some(v)) => self.write_value_bool(context, out, *v),
            Value::Int8(Some(v)) => write_integer!(out, *v),
            Value::Int16(Some(v)) => write_integer!(out, *v),
            Value::Int32(Some(v)) => write_integer!(out, *v),
            Value::Int64(Some(v)) => write_integer!(out, *v),
            Value::UInt8(Some(v)) => write_integer!(out, *v),
            Value::UInt16(Some(v)) => write_integer!(out, *v),
            Value::UInt32(Some(v)) => write_integer!(out, *v),
            Value::UInt64(Some(v)) => write_integer!(out, *v),
            Value::Float32(Some(v)) => write_float!(self, context, out, *v),
            Value::Float64(Some(v)) => write_float!(self, context, out, *v),
            Value::Decimal(Some(v)) => {
                let _ = write!(out, "{}", v);
            }
            Value::Char(Some(v)) => {
                let mut buf = [0u8; 4];
                self.write_value_string(context, out, v.encode_utf8(&mut buf));
            }
            Value::Varchar(Some(v)) => self.write_value_string(context, out, v),
            Value::Blob(Some(v)) => self.write_value_blob(context, out, v.as_ref()),
            Value::Date(Some(v)) => self.write_value_date(context, out, v, false),
            Value::Time(Some(v)) => self.write_value_time(context, out, v, false),
            Value::Timestamp(Some(v)) => {
                if context.stamps_timestamps() {
                    let now = OffsetDateTime::now_local().unwrap_or_else(|_| {
                        log::trace!("Local offset is unavailable, stamping with UTC");
                        OffsetDateTime::now_utc()
                    });
                    let now = now.replace_nanosecond(0).unwrap_or(now);
                    let now = PrimitiveDateTime::new(now.date(), now.time());
                    self.write_value_timestamp(context, out, &now);
                } else {
                    self.write_value_timestamp(context, out, v);
                }
            }
            Value::Uuid(Some(v)) => self.write_value_uuid(context, out, v),
            _ => {
                log::error!("Unexpected value {value:?} while writing a literal");
                self.write_value_none(context, out);
            }
        }
    }

    /// Render the right hand side of an identifier predicate.
    fn write_value_identifier(&self, context: &mut Context, out: &mut String, value: &Value) {
        self.write_value(context, out, value);
    }

    fn write_value_none(&self, _context: &mut Context, out: &mut String) {
        out.push_str("NULL");
    }

    /// Booleans are written as quoted text.
    fn write_value_bool(&self, context: &mut Context, out: &mut String, value: bool) {
        self.write_value_string(context, out, ["false", "true"][value as usize]);
    }

    /// NaN and infinities have no numeric literal, they are written as text.
    fn write_value_non_finite(&self, context: &mut Context, out: &mut String, value: f64) {
        let text = if value.is_nan() {
            "NaN"
        } else if value.is_sign_negative() {
            "-Infinity"
        } else {
            "Infinity"
        };
        self.write_value_string(context, out, text);
    }

    /// Render and escape a string literal using single quotes.
    fn write_value_string(&self, context: &mut Context, out: &mut String, value: &str) {
        out.push('\'');
        self.write_escaped(context, out, value, '\'', "''");
        out.push('\'');
    }

    /// Render a blob literal as hexadecimal text (`X'0A1B'`).
    fn write_value_blob(&self, _context: &mut Context, out: &mut String, value: &[u8]) {
        out.push_str("X'");
        for b in value {
            let _ = write!(out, "{:02X}", b);
        }
        out.push('\'');
    }

    fn write_value_uuid(&self, _context: &mut Context, out: &mut String, value: &Uuid) {
        let _ = write!(out, "'{}'", value);
    }

    /// Render a date (optionally as part of a timestamp).
    fn write_value_date(
        &self,
        _context: &mut Context,
        out: &mut String,
        value: &Date,
        timestamp: bool,
    ) {
        let b = if timestamp { "" } else { "'" };
        let _ = write!(
            out,
            "{b}{:04}-{:02}-{:02}{b}",
            value.year(),
            value.month() as u8,
            value.day()
        );
    }

    /// Render a time (optionally as part of a timestamp), subseconds only when present.
    fn write_value_time(
        &self,
        _context: &mut Context,
        out: &mut String,
        value: &Time,
        timestamp: bool,
    ) {
        let b = if timestamp { "" } else { "'" };
        let _ = write!(
            out,
            "{b}{:02}:{:02}:{:02}",
            value.hour(),
            value.minute(),
            value.second(),
        );
        let mut subsecond = value.nanosecond();
        if subsecond != 0 {
            let mut width = 9;
            while subsecond % 10 == 0 {
                subsecond /= 10;
                width -= 1;
            }
            let _ = write!(out, ".{:0width$}", subsecond);
        }
        out.push_str(b);
    }

    /// Render a timestamp as `'YYYY-MM-DD HH:MM:SS'`.
    fn write_value_timestamp(
        &self,
        context: &mut Context,
        out: &mut String,
        value: &PrimitiveDateTime,
    ) {
        out.push('\'');
        self.write_value_date(context, out, &value.date(), true);
        out.push(' ');
        self.write_value_time(context, out, &value.time(), true);
        out.push('\'');
    }

    /// `SELECT <fields> FROM <table>`, `*` when there are no fields.
    fn write_select(
        &self,
        context: &mut Context,
        out: &mut String,
        table: &str,
        fields: &[String],
    ) {
        let mut context = context.switch_fragment(Fragment::SqlSelect);
        out.push_str("SELECT ");
        if fields.is_empty() {
            out.push('*');
        } else {
            separated_by(
                out,
                fields,
                |out, v| self.write_identifier(&mut context, out, v),
                ",",
            );
        }
        out.push_str(" FROM ");
        self.write_identifier(&mut context, out, table);
    }

    /// `INSERT INTO <table> (<fields>) VALUES (<values>)`.
    fn write_insert(
        &self,
        context: &mut Context,
        out: &mut String,
        table: &str,
        fields: &[String],
        values: &[Value],
    ) {
        let mut context = context.switch_fragment(Fragment::SqlInsertInto);
        out.push_str("INSERT INTO ");
        self.write_identifier(&mut context, out, table);
        out.push_str(" (");
        separated_by(
            out,
            fields,
            |out, v| self.write_identifier(&mut context, out, v),
            ",",
        );
        out.push_str(") VALUES (");
        let mut context = context.switch_fragment(Fragment::SqlInsertIntoValues);
        separated_by(
            out,
            values,
            |out, v| self.write_value(&mut context, out, v),
            ",",
        );
        out.push(')');
    }

    /// `UPDATE <table> SET <field>=<value>,...`.
    fn write_update(
        &self,
        context: &mut Context,
        out: &mut String,
        table: &str,
        fields: &[String],
        values: &[Value],
    ) {
        let mut context = context.switch_fragment(Fragment::SqlUpdate);
        out.push_str("UPDATE ");
        self.write_identifier(&mut context, out, table);
        out.push_str(" SET ");
        let mut context = context.switch_fragment(Fragment::SqlUpdateSet);
        separated_by(
            out,
            fields.iter().zip(values),
            |out, (field, value)| {
                self.write_identifier(&mut context, out, field);
                out.push('=');
                self.write_value(&mut context, out, value);
            },
            ",",
        );
    }

    /// `DELETE FROM <table>`.
    fn write_delete(&self, context: &mut Context, out: &mut String, table: &str) {
        let mut context = context.switch_fragment(Fragment::SqlDeleteFrom);
        out.push_str("DELETE FROM ");
        self.write_identifier(&mut context, out, table);
    }

    /// ` WHERE <predicate>`, the predicate is written verbatim.
    fn write_where(&self, _context: &mut Context, out: &mut String, predicate: &str) {
        out.push_str(" WHERE ");
        out.push_str(predicate);
    }

    /// ` = <value>`.
    fn write_equal(&self, context: &mut Context, out: &mut String, value: &Value) {
        let mut context = context.switch_fragment(Fragment::SqlWhere);
        out.push_str(" = ");
        self.write_value(&mut context, out, value);
    }

    /// ` = <value>` where the value is an entity identifier.
    fn write_equal_identifier(&self, context: &mut Context, out: &mut String, value: &Value) {
        let mut context = context.switch_fragment(Fragment::SqlWhere);
        out.push_str(" = ");
        self.write_value_identifier(&mut context, out, value);
    }

    /// ` <clause>`, ordering or any trailing text.
    fn write_trailing(&self, _context: &mut Context, out: &mut String, clause: &str) {
        let clause = clause.trim();
        if !clause.is_empty() {
            out.push(' ');
            out.push_str(clause);
        }
    }
}

/// Writer shared by SQL Server, MySQL and SQLite.
#[derive(Default, Debug, Clone, Copy)]
pub struct GenericSqlWriter;

impl GenericSqlWriter {
    pub const fn new() -> Self {
        Self
    }
}

impl SqlWriter for GenericSqlWriter {
    fn as_dyn(&self) -> &dyn SqlWriter {
        self
    }
}

/// OLE DB dialect, compares uuid identifiers in braces (`'{...}'`).
#[derive(Default, Debug, Clone, Copy)]
pub struct OleDbSqlWriter;

impl OleDbSqlWriter {
    pub const fn new() -> Self {
        Self
    }
}

impl SqlWriter for OleDbSqlWriter {
    fn as_dyn(&self) -> &dyn SqlWriter {
        self
    }

    fn write_value_identifier(&self, context: &mut Context, out: &mut String, value: &Value) {
        match value {
            Value::Uuid(Some(v)) => {
                let _ = write!(out, "'{{{}}}'", v);
            }
            _ => self.write_value(context, out, value),
        }
    }
}
