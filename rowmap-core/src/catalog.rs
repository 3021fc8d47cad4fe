use crate::{FieldSpec, MappingError, Record, Result, column_name, table_name as default_table_name};
use anyhow::Context;
use std::{
    any::TypeId,
    collections::{HashMap, hash_map::Entry},
    sync::{LazyLock, PoisonError, RwLock},
};

/// Column name that excludes a field from every statement.
pub const EXCLUDED_COLUMN: &str = "-";
/// Declared name of the field used as identity when no field is annotated with `id`.
pub const DEFAULT_IDENTITY: &str = "id";

/// Resolved metadata of a single field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDescriptor {
    /// Declared name.
    pub name: &'static str,
    /// Access path, one index per nesting level.
    pub path: Box<[usize]>,
    /// Column used in statements.
    pub column: String,
    /// Whether `column` comes from an annotation.
    pub explicit_column: bool,
    /// Column derived from the declared name.
    pub default_column: String,
    pub identity: bool,
    pub excluded: bool,
    pub readonly: bool,
    /// Table name override carried by this field.
    pub table: Option<String>,
}

/// Resolved metadata of a record type, computed once and shared for the process lifetime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeDescriptor {
    pub type_name: &'static str,
    pub table: String,
    /// Flattened fields in declaration order.
    pub fields: Vec<FieldDescriptor>,
    /// Indexes into `fields` of the identity fields, in declaration order.
    pub identity: Vec<usize>,
}

static REGISTRY: LazyLock<RwLock<HashMap<TypeId, &'static TypeDescriptor>>> =
    LazyLock::new(Default::default);

/// Describe the record type `T`, computing the descriptor on first use.
///
/// Concurrent first uses may compute the descriptor more than once, only the first one stored is
/// ever returned.
pub fn describe<T: Record>() -> Result<&'static TypeDescriptor> {
    let key = TypeId::of::<T>();
    if let Some(descriptor) = REGISTRY
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .get(&key)
    {
        return Ok(*descriptor);
    }
    let descriptor = TypeDescriptor::new(T::NAME, T::field_specs())
        .with_context(|| format!("While describing the record type `{}`", T::NAME))?;
    let mut registry = REGISTRY.write().unwrap_or_else(PoisonError::into_inner);
    Ok(match registry.entry(key) {
        Entry::Occupied(entry) => {
            log::debug!("Descriptor of `{}` was computed concurrently", T::NAME);
            *entry.get()
        }
        Entry::Vacant(entry) => *entry.insert(Box::leak(Box::new(descriptor))),
    })
}

/// Resolved table name of the record type `T`.
pub fn table_of<T: Record>() -> Result<&'static str> {
    Ok(&describe::<T>()?.table)
}

struct Annotation {
    column: Option<String>,
    identity: bool,
    readonly: bool,
    table: Option<String>,
}

fn parse_annotation(type_name: &'static str, field: &str, sql: &str) -> Result<Annotation> {
    let error = |message: String| MappingError::Describe { type_name, message };
    let mut parts = sql.split(',');
    let column = parts.next().unwrap_or_default().trim();
    let mut result = Annotation {
        column: (!column.is_empty()).then(|| column.to_string()),
        identity: false,
        readonly: false,
        table: None,
    };
    for param in parts.map(str::trim) {
        match param.split_once(':') {
            None if param == "id" => result.identity = true,
            None if param == "readonly" => result.readonly = true,
            Some(("table", name)) => {
                let name = name.trim();
                if name.is_empty() {
                    return Err(error(format!(
                        "field `{field}` declares an empty `table:` parameter"
                    ))
                    .into());
                }
                result.table = Some(name.to_string());
            }
            _ => {
                return Err(error(format!(
                    "field `{field}` declares the unknown parameter `{param}`"
                ))
                .into());
            }
        }
    }
    Ok(result)
}

impl TypeDescriptor {
    /// Interpret the raw field metadata of a type.
    pub fn new(type_name: &'static str, specs: Vec<FieldSpec>) -> Result<Self> {
        let mut fields = Vec::new();
        flatten(type_name, &specs, &mut Vec::new(), false, &mut fields)?;
        let mut columns = HashMap::<&str, &str>::new();
        for field in fields.iter().filter(|f| !f.excluded) {
            if let Some(other) = columns.insert(&field.column, field.name) {
                return Err(MappingError::Describe {
                    type_name,
                    message: format!(
                        "fields `{other}` and `{}` both map to the column `{}`",
                        field.name, field.column
                    ),
                }
                .into());
            }
        }
        let mut identity: Vec<usize> = fields
            .iter()
            .enumerate()
            .filter(|(_, f)| f.identity)
            .map(|(i, _)| i)
            .collect();
        if identity.is_empty() {
            if let Some(i) = fields
                .iter()
                .position(|f| f.name == DEFAULT_IDENTITY && !f.excluded)
            {
                fields[i].identity = true;
                identity.push(i);
            }
        }
        let table = fields
            .iter()
            .find_map(|f| f.table.clone())
            .unwrap_or_else(|| default_table_name(type_name));
        Ok(Self {
            type_name,
            table,
            fields,
            identity,
        })
    }

    pub fn identity_fields(&self) -> impl Iterator<Item = &FieldDescriptor> {
        self.identity.iter().map(|i| &self.fields[*i])
    }

    /// Fields taking part in statements.
    pub fn included_fields(&self) -> impl Iterator<Item = &FieldDescriptor> {
        self.fields.iter().filter(|f| !f.excluded)
    }

    /// Fields that an update is allowed to change.
    pub fn updatable_fields(&self) -> impl Iterator<Item = &FieldDescriptor> {
        self.included_fields().filter(|f| !f.readonly)
    }

    /// The identity fields, or an error naming the type when there are none.
    pub fn require_identity(&self) -> Result<Vec<&FieldDescriptor>> {
        if self.identity.is_empty() {
            return Err(MappingError::MissingIdentity {
                type_name: self.type_name,
            }
            .into());
        }
        Ok(self.identity_fields().collect())
    }

    /// The sole identity field when it is the implicit `id` one, whose value the store generates.
    pub fn default_identity(&self) -> Option<&FieldDescriptor> {
        match self.identity.as_slice() {
            [i] if self.fields[*i].name == DEFAULT_IDENTITY => Some(&self.fields[*i]),
            _ => None,
        }
    }

    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.name == name)
    }
}

fn flatten(
    type_name: &'static str,
    specs: &[FieldSpec],
    prefix: &mut Vec<usize>,
    excluded: bool,
    out: &mut Vec<FieldDescriptor>,
) -> Result<()> {
    for (i, spec) in specs.iter().enumerate() {
        prefix.push(i);
        let annotation = match spec.sql {
            Some(sql) => parse_annotation(type_name, spec.name, sql)?,
            None => Annotation {
                column: None,
                identity: false,
                readonly: false,
                table: None,
            },
        };
        let field_excluded =
            excluded || annotation.column.as_deref() == Some(EXCLUDED_COLUMN);
        if spec.table.is_some_and(|t| t.trim().is_empty()) {
            return Err(MappingError::Describe {
                type_name,
                message: format!("field `{}` declares an empty `#[table]` name", spec.name),
            }
            .into());
        }
        // The field level attribute wins over the parameter.
        let table = spec
            .table
            .map(ToString::to_string)
            .or(annotation.table.clone());
        if let Some(embedded) = spec.embedded {
            if (annotation.column.is_some() && !field_excluded) || annotation.identity {
                return Err(MappingError::Describe {
                    type_name,
                    message: format!(
                        "embedded field `{}` can only be excluded, it has no column",
                        spec.name
                    ),
                }
                .into());
            }
            let start = out.len();
            flatten(type_name, &embedded(), prefix, field_excluded, out)?;
            if let (Some(table), Some(first)) = (table, out.get_mut(start)) {
                first.table = Some(table);
            }
        } else {
            let default_column = column_name(spec.name);
            out.push(FieldDescriptor {
                name: spec.name,
                path: prefix.clone().into_boxed_slice(),
                explicit_column: annotation.column.is_some(),
                column: annotation.column.unwrap_or_else(|| default_column.clone()),
                default_column,
                identity: annotation.identity && !field_excluded,
                excluded: field_excluded,
                readonly: annotation.readonly || spec.readonly,
                table,
            });
        }
        prefix.pop();
    }
    Ok(())
}
