use crate::{Hooks, OverrideScan, Result, Value};

/// Raw metadata of a declared field, as emitted by `#[derive(Record)]`.
///
/// Nothing here is interpreted yet: the annotation strings are parsed by [`crate::describe`].
#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    /// Declared field name, without any raw identifier prefix.
    pub name: &'static str,
    /// Content of `#[sql("...")]`.
    pub sql: Option<&'static str>,
    /// Content of `#[table("...")]`.
    pub table: Option<&'static str>,
    /// Legacy standalone `#[readonly]` marker.
    pub readonly: bool,
    /// Fields of the embedded record when the field is marked `#[embed]`.
    pub embedded: Option<fn() -> Vec<FieldSpec>>,
}

impl FieldSpec {
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            sql: None,
            table: None,
            readonly: false,
            embedded: None,
        }
    }
}

/// A struct mapped to rows of a table.
///
/// Implemented by `#[derive(Record)]`. Fields are addressed by access path: one index per
/// nesting level, the last one selecting the field inside the innermost embedded record.
pub trait Record: Default + Hooks + OverrideScan + Send + Sync + 'static {
    /// Declared name of the type.
    const NAME: &'static str;
    /// Whether the type customizes decoding through [`OverrideScan`].
    const OVERRIDE_SCAN: bool;

    /// Metadata of the declared fields, in declaration order.
    fn field_specs() -> Vec<FieldSpec>;

    /// Current value of the field at `path`.
    fn get(&self, path: &[usize]) -> Result<Value>;

    /// Assign `value` to the field at `path`.
    fn set(&mut self, path: &[usize], value: Value) -> Result<()>;
}
