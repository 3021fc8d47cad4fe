use crate::{Error, Hook};
use std::fmt::{self, Display, Formatter};

/// Failure kinds raised by the mapping layer.
///
/// They travel inside [`crate::Error`], use `error.downcast_ref::<MappingError>()` to inspect
/// them. Driver failures are wrapped as [`MappingError::Execution`] so the operation that issued
/// the statement is always visible.
#[derive(Debug)]
pub enum MappingError {
    /// The destination or a value did not have the expected shape.
    InputShape(String),
    /// Result columns that could not be matched to any field of the record.
    UnresolvedColumns {
        type_name: &'static str,
        missing: Vec<String>,
    },
    /// The record type has no identity field.
    MissingIdentity { type_name: &'static str },
    /// A single row was requested but the query returned none.
    NoRows { table: String },
    /// The querier reported a failure.
    Execution {
        operation: &'static str,
        source: Error,
    },
    /// A lifecycle hook returned an error.
    Hook { hook: Hook, source: Error },
    /// The record annotations are inconsistent.
    Describe {
        type_name: &'static str,
        message: String,
    },
}

impl MappingError {
    pub fn execution(operation: &'static str, source: Error) -> Self {
        Self::Execution { operation, source }
    }
    pub fn is_no_rows(&self) -> bool {
        matches!(self, Self::NoRows { .. })
    }
}

impl Display for MappingError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::InputShape(message) => write!(f, "Unexpected input shape: {message}"),
            Self::UnresolvedColumns { type_name, missing } => write!(
                f,
                "Columns [{}] do not match any field of {type_name}",
                missing.join(", ")
            ),
            Self::MissingIdentity { type_name } => {
                write!(f, "Record {type_name} does not declare any identity field")
            }
            Self::NoRows { table } => write!(f, "No rows returned from {table}"),
            Self::Execution { operation, .. } => write!(f, "Error while executing {operation}"),
            Self::Hook { hook, .. } => write!(f, "Hook {hook} failed"),
            Self::Describe { type_name, message } => {
                write!(f, "Cannot describe {type_name}: {message}")
            }
        }
    }
}

impl std::error::Error for MappingError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Execution { source, .. } | Self::Hook { source, .. } => Some(&**source),
            _ => None,
        }
    }
}

/// Finds the first [`MappingError`] in the chain of `error`.
pub fn mapping_error(error: &Error) -> Option<&MappingError> {
    error.chain().find_map(|e| e.downcast_ref::<MappingError>())
}
