use crate::{Error, Result, Value, truncate_long};
use anyhow::Context;
use rust_decimal::{
    Decimal,
    prelude::{FromPrimitive, ToPrimitive},
};
use std::{any, str::FromStr};
use time::{Date, PrimitiveDateTime, Time, macros::format_description};
use uuid::Uuid;

/// Conversion between native Rust types and the dynamically typed [`Value`].
///
/// `as_value` is used when an entity property is written into a statement, `try_from_value`
/// when a row column is assigned back to a property.
///
/// # Conversion contract
/// - The canonical variant of the type is always accepted.
/// - Other variants are accepted only when the conversion is lossless: integers are range
///   checked, integers become floats only when exactly representable.
/// - Text is accepted for booleans, uuids and temporal types because that is how the SQL
///   writers render them, so backends without native types hand them back as text.
/// - Anything else is an error that names both the value and the target type.
///
/// # Examples
/// ```rust
/// use rowkit_core::{AsValue, Value};
/// let v = 42i32.as_value();
/// assert!(matches!(v, Value::Int32(Some(42))));
/// let n: i32 = AsValue::try_from_value(Value::Int64(Some(42))).unwrap();
/// assert_eq!(n, 42);
/// ```
pub trait AsValue {
    /// Null value of the variant used by this type.
    fn as_empty_value() -> Value;
    /// Convert into the owned [`Value`] representation.
    fn as_value(self) -> Value;
    /// Convert a [`Value`] back into `Self`.
    fn try_from_value(value: Value) -> Result<Self>
    where
        Self: Sized;
}

impl<T: AsValue> From<T> for Value {
    fn from(value: T) -> Self {
        value.as_value()
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Varchar(Some(value.to_owned()))
    }
}

fn cannot_convert<T>(value: &Value) -> Error {
    Error::msg(format!(
        "Cannot convert {value:?} to {}",
        any::type_name::<T>()
    ))
}

fn out_of_range<T>(value: &Value) -> Error {
    Error::msg(format!(
        "Value {value:?} is out of range for {}",
        any::type_name::<T>()
    ))
}

macro_rules! impl_as_value_integer {
    ($source:ty, $destination:path) => {
        impl AsValue for $source {
            fn as_empty_value() -> Value {
                $destination(None)
            }
            fn as_value(self) -> Value {
                $destination(Some(self))
            }
            fn try_from_value(value: Value) -> Result<Self> {
                let converted = match value {
                    Value::Int8(Some(v)) => <$source>::try_from(v).ok(),
                    Value::Int16(Some(v)) => <$source>::try_from(v).ok(),
                    Value::Int32(Some(v)) => <$source>::try_from(v).ok(),
                    Value::Int64(Some(v)) => <$source>::try_from(v).ok(),
                    Value::UInt8(Some(v)) => <$source>::try_from(v).ok(),
                    Value::UInt16(Some(v)) => <$source>::try_from(v).ok(),
                    Value::UInt32(Some(v)) => <$source>::try_from(v).ok(),
                    Value::UInt64(Some(v)) => <$source>::try_from(v).ok(),
                    _ => return Err(cannot_convert::<Self>(&value)),
                };
                converted.ok_or_else(|| out_of_range::<Self>(&value))
            }
        }
    };
}

impl_as_value_integer!(i8, Value::Int8);
impl_as_value_integer!(i16, Value::Int16);
impl_as_value_integer!(i32, Value::Int32);
impl_as_value_integer!(i64, Value::Int64);
impl_as_value_integer!(u8, Value::UInt8);
impl_as_value_integer!(u16, Value::UInt16);
impl_as_value_integer!(u32, Value::UInt32);
impl_as_value_integer!(u64, Value::UInt64);

// Largest integers that floats represent exactly
const F64_EXACT: u64 = 1 << 53;
const F32_EXACT: u64 = 1 << 24;

/// Whether `value` is a single precision float, either exactly or as its shortest decimal text.
///
/// Writers render `f32` as the shortest text that reads back as the same `f32`, backends
/// parse that text as a double, so `0.1f32` comes back as `0.1f64`.
fn narrows_to_f32(value: f64) -> Option<f32> {
    let narrowed = value as f32;
    if value.is_nan() || narrowed as f64 == value {
        return Some(narrowed);
    }
    if !narrowed.is_finite() {
        return None;
    }
    let mut buffer = ryu::Buffer::new();
    (buffer.format_finite(narrowed).parse::<f64>() == Ok(value)).then_some(narrowed)
}

impl AsValue for f64 {
    fn as_empty_value() -> Value {
        Value::Float64(None)
    }
    fn as_value(self) -> Value {
        Value::Float64(Some(self))
    }
    fn try_from_value(value: Value) -> Result<Self> {
        match value {
            Value::Float64(Some(v)) => Ok(v),
            Value::Float32(Some(v)) => Ok(v.into()),
            Value::Int8(Some(v)) => Ok(v.into()),
            Value::Int16(Some(v)) => Ok(v.into()),
            Value::Int32(Some(v)) => Ok(v.into()),
            Value::UInt8(Some(v)) => Ok(v.into()),
            Value::UInt16(Some(v)) => Ok(v.into()),
            Value::UInt32(Some(v)) => Ok(v.into()),
            Value::Int64(Some(v)) if v.unsigned_abs() <= F64_EXACT => Ok(v as f64),
            Value::UInt64(Some(v)) if v <= F64_EXACT => Ok(v as f64),
            Value::Decimal(Some(v)) => v.to_f64().ok_or_else(|| out_of_range::<Self>(&value)),
            Value::Int64(..) | Value::UInt64(..) => Err(out_of_range::<Self>(&value)),
            _ => Err(cannot_convert::<Self>(&value)),
        }
    }
}

impl AsValue for f32 {
    fn as_empty_value() -> Value {
        Value::Float32(None)
    }
    fn as_value(self) -> Value {
        Value::Float32(Some(self))
    }
    fn try_from_value(value: Value) -> Result<Self> {
        match value {
            Value::Float32(Some(v)) => Ok(v),
            Value::Float64(Some(v)) => narrows_to_f32(v).ok_or_else(|| out_of_range::<Self>(&value)),
            Value::Int8(Some(v)) => Ok(v.into()),
            Value::Int16(Some(v)) => Ok(v.into()),
            Value::UInt8(Some(v)) => Ok(v.into()),
            Value::UInt16(Some(v)) => Ok(v.into()),
            Value::Int32(Some(v)) if v.unsigned_abs() as u64 <= F32_EXACT => Ok(v as f32),
            Value::Int64(Some(v)) if v.unsigned_abs() <= F32_EXACT => Ok(v as f32),
            Value::UInt32(Some(v)) if v as u64 <= F32_EXACT => Ok(v as f32),
            Value::UInt64(Some(v)) if v <= F32_EXACT => Ok(v as f32),
            Value::Float64(..)
            | Value::Int32(..)
            | Value::Int64(..)
            | Value::UInt32(..)
            | Value::UInt64(..) => Err(out_of_range::<Self>(&value)),
            _ => Err(cannot_convert::<Self>(&value)),
        }
    }
}

impl AsValue for Decimal {
    fn as_empty_value() -> Value {
        Value::Decimal(None)
    }
    fn as_value(self) -> Value {
        Value::Decimal(Some(self))
    }
    fn try_from_value(value: Value) -> Result<Self> {
        match value {
            Value::Decimal(Some(v)) => Ok(v),
            Value::Int8(Some(v)) => Ok(v.into()),
            Value::Int16(Some(v)) => Ok(v.into()),
            Value::Int32(Some(v)) => Ok(v.into()),
            Value::Int64(Some(v)) => Ok(v.into()),
            Value::UInt8(Some(v)) => Ok(v.into()),
            Value::UInt16(Some(v)) => Ok(v.into()),
            Value::UInt32(Some(v)) => Ok(v.into()),
            Value::UInt64(Some(v)) => Ok(v.into()),
            Value::Float32(Some(v)) => {
                Decimal::from_f32(v).ok_or_else(|| out_of_range::<Self>(&value))
            }
            Value::Float64(Some(v)) => {
                Decimal::from_f64(v).ok_or_else(|| out_of_range::<Self>(&value))
            }
            Value::Varchar(Some(ref v)) => Decimal::from_str(v.trim())
                .with_context(|| format!("Cannot parse `{}` as a decimal", truncate_long!(v))),
            _ => Err(cannot_convert::<Self>(&value)),
        }
    }
}

impl AsValue for bool {
    fn as_empty_value() -> Value {
        Value::Boolean(None)
    }
    fn as_value(self) -> Value {
        Value::Boolean(Some(self))
    }
    fn try_from_value(value: Value) -> Result<Self> {
        match value {
            Value::Boolean(Some(v)) => Ok(v),
            Value::Int8(Some(v)) => Ok(v != 0),
            Value::Int16(Some(v)) => Ok(v != 0),
            Value::Int32(Some(v)) => Ok(v != 0),
            Value::Int64(Some(v)) => Ok(v != 0),
            Value::UInt8(Some(v)) => Ok(v != 0),
            Value::UInt16(Some(v)) => Ok(v != 0),
            Value::UInt32(Some(v)) => Ok(v != 0),
            Value::UInt64(Some(v)) => Ok(v != 0),
            Value::Varchar(Some(ref v)) => {
                let v = v.trim();
                if v.eq_ignore_ascii_case("true") || v == "1" {
                    Ok(true)
                } else if v.eq_ignore_ascii_case("false") || v == "0" {
                    Ok(false)
                } else {
                    Err(cannot_convert::<Self>(&value))
                }
            }
            _ => Err(cannot_convert::<Self>(&value)),
        }
    }
}

impl AsValue for char {
    fn as_empty_value() -> Value {
        Value::Char(None)
    }
    fn as_value(self) -> Value {
        Value::Char(Some(self))
    }
    fn try_from_value(value: Value) -> Result<Self> {
        match value {
            Value::Char(Some(v)) => Ok(v),
            Value::Varchar(Some(ref v)) => {
                let mut chars = v.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Ok(c),
                    _ => Err(cannot_convert::<Self>(&value)),
                }
            }
            _ => Err(cannot_convert::<Self>(&value)),
        }
    }
}

impl AsValue for String {
    fn as_empty_value() -> Value {
        Value::Varchar(None)
    }
    fn as_value(self) -> Value {
        Value::Varchar(Some(self))
    }
    fn try_from_value(value: Value) -> Result<Self> {
        match value {
            Value::Varchar(Some(v)) => Ok(v),
            Value::Char(Some(v)) => Ok(v.into()),
            v => Err(cannot_convert::<Self>(&v)),
        }
    }
}

impl AsValue for Box<[u8]> {
    fn as_empty_value() -> Value {
        Value::Blob(None)
    }
    fn as_value(self) -> Value {
        Value::Blob(Some(self))
    }
    fn try_from_value(value: Value) -> Result<Self> {
        match value {
            Value::Blob(Some(v)) => Ok(v),
            v => Err(cannot_convert::<Self>(&v)),
        }
    }
}

impl AsValue for Uuid {
    fn as_empty_value() -> Value {
        Value::Uuid(None)
    }
    fn as_value(self) -> Value {
        Value::Uuid(Some(self))
    }
    fn try_from_value(value: Value) -> Result<Self> {
        match value {
            Value::Uuid(Some(v)) => Ok(v),
            Value::Varchar(Some(ref v)) => Uuid::parse_str(v.trim())
                .with_context(|| format!("Cannot parse `{}` as a uuid", truncate_long!(v))),
            Value::Blob(Some(ref v)) => {
                Uuid::from_slice(v).with_context(|| format!("Cannot convert {value:?} to a uuid"))
            }
            _ => Err(cannot_convert::<Self>(&value)),
        }
    }
}

impl AsValue for Date {
    fn as_empty_value() -> Value {
        Value::Date(None)
    }
    fn as_value(self) -> Value {
        Value::Date(Some(self))
    }
    fn try_from_value(value: Value) -> Result<Self> {
        match value {
            Value::Date(Some(v)) => Ok(v),
            Value::Varchar(Some(ref v)) => {
                Date::parse(v.trim(), format_description!("[year]-[month]-[day]"))
                    .with_context(|| format!("Cannot parse `{}` as a date", truncate_long!(v)))
            }
            _ => Err(cannot_convert::<Self>(&value)),
        }
    }
}

impl AsValue for Time {
    fn as_empty_value() -> Value {
        Value::Time(None)
    }
    fn as_value(self) -> Value {
        Value::Time(Some(self))
    }
    fn try_from_value(value: Value) -> Result<Self> {
        match value {
            Value::Time(Some(v)) => Ok(v),
            Value::Varchar(Some(ref v)) => {
                let text = v.trim();
                Time::parse(text, format_description!("[hour]:[minute]:[second]"))
                    .or_else(|_| {
                        Time::parse(
                            text,
                            format_description!("[hour]:[minute]:[second].[subsecond]"),
                        )
                    })
                    .with_context(|| format!("Cannot parse `{}` as a time", truncate_long!(v)))
            }
            _ => Err(cannot_convert::<Self>(&value)),
        }
    }
}

impl AsValue for PrimitiveDateTime {
    fn as_empty_value() -> Value {
        Value::Timestamp(None)
    }
    fn as_value(self) -> Value {
        Value::Timestamp(Some(self))
    }
    fn try_from_value(value: Value) -> Result<Self> {
        match value {
            Value::Timestamp(Some(v)) => Ok(v),
            Value::Varchar(Some(ref v)) => {
                let text = v.trim();
                PrimitiveDateTime::parse(
                    text,
                    format_description!("[year]-[month]-[day] [hour]:[minute]:[second]"),
                )
                .or_else(|_| {
                    PrimitiveDateTime::parse(
                        text,
                        format_description!(
                            "[year]-[month]-[day] [hour]:[minute]:[second].[subsecond]"
                        ),
                    )
                })
                .or_else(|_| {
                    PrimitiveDateTime::parse(
                        text,
                        format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]"),
                    )
                })
                .or_else(|_| {
                    PrimitiveDateTime::parse(
                        text,
                        format_description!(
                            "[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond]"
                        ),
                    )
                })
                .with_context(|| format!("Cannot parse `{}` as a timestamp", truncate_long!(v)))
            }
            _ => Err(cannot_convert::<Self>(&value)),
        }
    }
}

impl<T: AsValue> AsValue for Option<T> {
    fn as_empty_value() -> Value {
        T::as_empty_value()
    }
    fn as_value(self) -> Value {
        match self {
            Some(v) => v.as_value(),
            None => T::as_empty_value(),
        }
    }
    fn try_from_value(value: Value) -> Result<Self> {
        if value.is_null() {
            Ok(None)
        } else {
            T::try_from_value(value).map(Some)
        }
    }
}
