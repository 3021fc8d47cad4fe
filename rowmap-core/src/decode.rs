use crate::{
    Cursor, FieldDescriptor, MappingError, Record, Result, Row, TypeDescriptor, Value, describe,
};
use anyhow::Context;
use std::mem;

/// Custom destination of a decoded column.
pub trait Scanner {
    fn scan(&mut self, value: Value) -> Result<()>;
}

impl<F: FnMut(Value) -> Result<()>> Scanner for F {
    fn scan(&mut self, value: Value) -> Result<()> {
        self(value)
    }
}

/// Per-row customization of the decoding.
///
/// When a type is marked `#[override_scan]` the decoder calls `override_scan` once per row,
/// before assigning any field, with the declared field names of the result columns. Filling a
/// slot with a [`Scanner`] routes the value of that column to it, empty slots are assigned to
/// their field as usual.
pub trait OverrideScan {
    fn override_scan<'a>(
        &'a mut self,
        _names: &[&'static str],
        _slots: &mut [Option<Box<dyn Scanner + 'a>>],
    ) -> Result<()> {
        Ok(())
    }
}

/// Match every result column to a field of the record.
///
/// First match wins: the explicit column annotation, then the declared field name, then the
/// default column name. Excluded fields never match. Unmatched columns are all reported together.
pub fn resolve_columns<'d>(
    descriptor: &'d TypeDescriptor,
    columns: &[String],
) -> Result<Vec<&'d FieldDescriptor>> {
    let mut result = Vec::with_capacity(columns.len());
    let mut missing = Vec::new();
    for column in columns {
        let found = descriptor
            .included_fields()
            .find(|f| f.explicit_column && f.column == *column)
            .or_else(|| {
                descriptor
                    .included_fields()
                    .find(|f| f.name == column.as_str())
            })
            .or_else(|| {
                descriptor
                    .included_fields()
                    .find(|f| f.default_column == *column)
            });
        match found {
            Some(field) => result.push(field),
            None => missing.push(column.clone()),
        }
    }
    if !missing.is_empty() {
        return Err(MappingError::UnresolvedColumns {
            type_name: descriptor.type_name,
            missing,
        }
        .into());
    }
    Ok(result)
}

/// Decode every row of `cursor` into records appended to `out`, in arrival order.
///
/// On failure the records completed so far stay in `out`.
pub async fn scan_rows<T: Record, C: Cursor>(cursor: &mut C, out: &mut Vec<T>) -> Result<()> {
    let descriptor = describe::<T>()?;
    let columns = cursor.columns().to_vec();
    let fields = resolve_columns(descriptor, &columns)?;
    let names: Vec<&'static str> = fields.iter().map(|f| f.name).collect();
    while let Some(row) = cursor
        .next()
        .await
        .map_err(|e| MappingError::execution("next row", e))?
    {
        let record = scan_row::<T>(&fields, &names, row)
            .map_err(|e| MappingError::execution("scan", e))
            .with_context(|| format!("While decoding a row into `{}`", T::NAME))?;
        out.push(record);
    }
    Ok(())
}

fn scan_row<T: Record>(
    fields: &[&FieldDescriptor],
    names: &[&'static str],
    row: Row,
) -> Result<T> {
    if row.len() != fields.len() {
        return Err(MappingError::InputShape(format!(
            "row has {} values but the query returned {} columns",
            row.len(),
            fields.len()
        ))
        .into());
    }
    let mut values = row.into_vec();
    let mut record = T::default();
    let mut handled = vec![false; values.len()];
    if T::OVERRIDE_SCAN {
        let mut slots: Vec<Option<Box<dyn Scanner + '_>>> =
            (0..values.len()).map(|_| None).collect();
        record.override_scan(names, &mut slots)?;
        for (i, slot) in slots.iter_mut().enumerate() {
            if let Some(scanner) = slot {
                scanner
                    .scan(mem::take(&mut values[i]))
                    .with_context(|| format!("Custom scanner of `{}` failed", names[i]))?;
                handled[i] = true;
            }
        }
    }
    for (i, field) in fields.iter().enumerate() {
        if !handled[i] {
            record
                .set(&field.path, mem::take(&mut values[i]))
                .with_context(|| {
                    format!(
                        "Cannot assign the column `{}` to `{}`",
                        field.column, field.name
                    )
                })?;
        }
    }
    Ok(record)
}
