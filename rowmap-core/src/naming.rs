use convert_case::{Case, Casing};

/// Default column name of a field: its declared name in lower snake case.
pub fn column_name(name: &str) -> String {
    name.to_case(Case::Snake)
}

/// Default table name of a record type: snake case plus the plural suffix `s`.
pub fn table_name(type_name: &str) -> String {
    let mut result = type_name.to_case(Case::Snake);
    result.push('s');
    result
}
