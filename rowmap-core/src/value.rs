use rust_decimal::Decimal;
use time::{Date, OffsetDateTime, PrimitiveDateTime, Time};
use uuid::Uuid;

/// Dynamically typed cell, used both for statement arguments and decoded columns.
///
/// Each variant carries an `Option`: `None` is a typed NULL, [`Value::Null`] is an untyped one.
#[derive(Default, Debug, Clone, PartialEq)]
pub enum Value {
    #[default]
    Null,
    Boolean(Option<bool>),
    Int8(Option<i8>),
    Int16(Option<i16>),
    Int32(Option<i32>),
    Int64(Option<i64>),
    UInt8(Option<u8>),
    UInt16(Option<u16>),
    UInt32(Option<u32>),
    UInt64(Option<u64>),
    Float32(Option<f32>),
    Float64(Option<f64>),
    Decimal(Option<Decimal>),
    Varchar(Option<String>),
    Blob(Option<Box<[u8]>>),
    Date(Option<Date>),
    Time(Option<Time>),
    Timestamp(Option<PrimitiveDateTime>),
    TimestampWithTimezone(Option<OffsetDateTime>),
    Uuid(Option<Uuid>),
}

impl Value {
    pub fn is_null(&self) -> bool {
        match self {
            Value::Null => true,
            Value::Boolean(v) => v.is_none(),
            Value::Int8(v) => v.is_none(),
            Value::Int16(v) => v.is_none(),
            Value::Int32(v) => v.is_none(),
            Value::Int64(v) => v.is_none(),
            Value::UInt8(v) => v.is_none(),
            Value::UInt16(v) => v.is_none(),
            Value::UInt32(v) => v.is_none(),
            Value::UInt64(v) => v.is_none(),
            Value::Float32(v) => v.is_none(),
            Value::Float64(v) => v.is_none(),
            Value::Decimal(v) => v.is_none(),
            Value::Varchar(v) => v.is_none(),
            Value::Blob(v) => v.is_none(),
            Value::Date(v) => v.is_none(),
            Value::Time(v) => v.is_none(),
            Value::Timestamp(v) => v.is_none(),
            Value::TimestampWithTimezone(v) => v.is_none(),
            Value::Uuid(v) => v.is_none(),
        }
    }

    /// Whether the value is the zero value of its type: NULL, numeric zero, false, empty text or
    /// blob, nil uuid. Temporal values are never zero.
    pub fn is_zero(&self) -> bool {
        match self {
            v if v.is_null() => true,
            Value::Boolean(Some(v)) => !v,
            Value::Int8(Some(v)) => *v == 0,
            Value::Int16(Some(v)) => *v == 0,
            Value::Int32(Some(v)) => *v == 0,
            Value::Int64(Some(v)) => *v == 0,
            Value::UInt8(Some(v)) => *v == 0,
            Value::UInt16(Some(v)) => *v == 0,
            Value::UInt32(Some(v)) => *v == 0,
            Value::UInt64(Some(v)) => *v == 0,
            Value::Float32(Some(v)) => *v == 0.0,
            Value::Float64(Some(v)) => *v == 0.0,
            Value::Decimal(Some(v)) => v.is_zero(),
            Value::Varchar(Some(v)) => v.is_empty(),
            Value::Blob(Some(v)) => v.is_empty(),
            Value::Uuid(Some(v)) => v.is_nil(),
            _ => false,
        }
    }
}
