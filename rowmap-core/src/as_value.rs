use crate::{Error, Result, Value, truncate_long};
use rust_decimal::{Decimal, prelude::FromPrimitive, prelude::ToPrimitive};
use std::any;
use time::{Date, OffsetDateTime, PrimitiveDateTime, Time};
use uuid::Uuid;

/// Conversion between native Rust field types and the dynamically typed [`Value`].
///
/// Every field of a record must implement it: the derived accessors go through `as_value` when
/// reading a field and through `try_from_value` when a decoded cell is assigned to it.
///
/// # Conversion rules
/// - The canonical variant is always accepted (`Value::Int32` for `i32`).
/// - Integers accept every integer width, range checked, plus booleans and numeric text.
/// - NULL is only accepted by `Option<T>`, the other types report an error.
///
/// # Examples
/// ```rust
/// use rowmap_core::{AsValue, Value};
/// let v = 42i32.as_value();
/// assert_eq!(v, Value::Int32(Some(42)));
/// let n: i64 = AsValue::try_from_value(v).unwrap();
/// assert_eq!(n, 42);
/// ```
pub trait AsValue {
    /// The typed NULL of this type.
    fn as_empty_value() -> Value;
    /// Owned [`Value`] representation of `self`.
    fn as_value(self) -> Value;
    /// Attempt to convert a dynamic [`Value`] into `Self`.
    fn try_from_value(value: Value) -> Result<Self>
    where
        Self: Sized;
}

fn cannot_convert<T>(value: &Value) -> Error {
    Error::msg(format!(
        "Cannot convert {:?} to {}",
        value,
        any::type_name::<T>()
    ))
}

fn integer_of(value: &Value) -> Option<i128> {
    match *value {
        Value::Int8(Some(v)) => Some(v as _),
        Value::Int16(Some(v)) => Some(v as _),
        Value::Int32(Some(v)) => Some(v as _),
        Value::Int64(Some(v)) => Some(v as _),
        Value::UInt8(Some(v)) => Some(v as _),
        Value::UInt16(Some(v)) => Some(v as _),
        Value::UInt32(Some(v)) => Some(v as _),
        Value::UInt64(Some(v)) => Some(v as _),
        Value::Boolean(Some(v)) => Some(v as _),
        _ => None,
    }
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
                if let Some(v) = integer_of(&value) {
                    return <$source>::try_from(v).map_err(|_| {
                        Error::msg(format!(
                            "Value {v} is out of range for {}",
                            any::type_name::<Self>(),
                        ))
                    });
                }
                match value {
                    Value::Varchar(Some(ref v)) => v.trim().parse::<$source>().map_err(|e| {
                        Error::new(e).context(format!(
                            "Cannot parse `{}` as {}",
                            truncate_long!(v),
                            any::type_name::<Self>(),
                        ))
                    }),
                    _ => Err(cannot_convert::<Self>(&value)),
                }
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
            ref v => match integer_of(v) {
                Some(v) => Ok(v != 0),
                None => Err(cannot_convert::<Self>(&value)),
            },
        }
    }
}

macro_rules! impl_as_value_float {
    ($source:ty, $destination:path, $from_decimal:ident) => {
        impl AsValue for $source {
            fn as_empty_value() -> Value {
                $destination(None)
            }
            fn as_value(self) -> Value {
                $destination(Some(self))
            }
            fn try_from_value(value: Value) -> Result<Self> {
                match value {
                    Value::Float32(Some(v)) => Ok(v as _),
                    Value::Float64(Some(v)) => Ok(v as _),
                    Value::Decimal(Some(v)) => v
                        .$from_decimal()
                        .ok_or_else(|| cannot_convert::<Self>(&Value::Decimal(Some(v)))),
                    ref v => match integer_of(v) {
                        Some(v) => Ok(v as _),
                        None => Err(cannot_convert::<Self>(&value)),
                    },
                }
            }
        }
    };
}
impl_as_value_float!(f32, Value::Float32, to_f32);
impl_as_value_float!(f64, Value::Float64, to_f64);

impl AsValue for Decimal {
    fn as_empty_value() -> Value {
        Value::Decimal(None)
    }
    fn as_value(self) -> Value {
        Value::Decimal(Some(self))
    }
    fn try_from_value(value: Value) -> Result<Self> {
        let result = match value {
            Value::Decimal(Some(v)) => Some(v),
            Value::Float32(Some(v)) => Decimal::from_f32(v),
            Value::Float64(Some(v)) => Decimal::from_f64(v),
            Value::Varchar(Some(ref v)) => v.trim().parse().ok(),
            ref v => integer_of(v).and_then(Decimal::from_i128),
        };
        result.ok_or_else(|| cannot_convert::<Self>(&value))
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
            Value::Blob(Some(v)) => String::from_utf8(v.into_vec())
                .map_err(|e| Error::new(e).context("Blob is not valid UTF-8 text")),
            _ => Err(cannot_convert::<Self>(&value)),
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
            Value::Varchar(Some(v)) => Ok(v.into_bytes().into_boxed_slice()),
            _ => Err(cannot_convert::<Self>(&value)),
        }
    }
}

impl AsValue for Vec<u8> {
    fn as_empty_value() -> Value {
        Value::Blob(None)
    }
    fn as_value(self) -> Value {
        Value::Blob(Some(self.into_boxed_slice()))
    }
    fn try_from_value(value: Value) -> Result<Self> {
        <Box<[u8]>>::try_from_value(value).map(Into::into)
    }
}

macro_rules! impl_as_value {
    ($source:ty, $destination:path) => {
        impl AsValue for $source {
            fn as_empty_value() -> Value {
                $destination(None)
            }
            fn as_value(self) -> Value {
                $destination(Some(self))
            }
            fn try_from_value(value: Value) -> Result<Self> {
                match value {
                    $destination(Some(v)) => Ok(v),
                    _ => Err(cannot_convert::<Self>(&value)),
                }
            }
        }
    };
}
impl_as_value!(Date, Value::Date);
impl_as_value!(Time, Value::Time);
impl_as_value!(PrimitiveDateTime, Value::Timestamp);
impl_as_value!(OffsetDateTime, Value::TimestampWithTimezone);

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
            Value::Varchar(Some(ref v)) => Uuid::parse_str(v).map_err(|e| {
                Error::new(e).context(format!("Cannot parse `{}` as Uuid", truncate_long!(v)))
            }),
            Value::Blob(Some(ref v)) => Uuid::from_slice(v).map_err(Error::new),
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
            return Ok(None);
        }
        T::try_from_value(value).map(Some)
    }
}

macro_rules! impl_from_for_value {
    ($($source:ty),+ $(,)?) => {
        $(
            impl From<$source> for Value {
                fn from(value: $source) -> Self {
                    value.as_value()
                }
            }
        )+
    };
}
impl_from_for_value!(
    bool,
    i8,
    i16,
    i32,
    i64,
    u8,
    u16,
    u32,
    u64,
    f32,
    f64,
    Decimal,
    String,
    Box<[u8]>,
    Vec<u8>,
    Date,
    Time,
    PrimitiveDateTime,
    OffsetDateTime,
    Uuid,
);

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Varchar(Some(value.into()))
    }
}

impl<T: AsValue> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.as_value()
    }
}
