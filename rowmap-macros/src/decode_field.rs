use syn::{Field, Ident, LitStr, Type, ext::IdentExt, spanned::Spanned};

pub(crate) struct FieldMetadata {
    pub(crate) ident: Ident,
    pub(crate) ty: Type,
    /// Declared name without the raw identifier prefix.
    pub(crate) name: String,
    pub(crate) sql: Option<String>,
    pub(crate) table: Option<String>,
    pub(crate) readonly: bool,
    pub(crate) embed: bool,
}

impl FieldMetadata {
    /// Whether the column part of the `sql` annotation is `-`.
    pub(crate) fn excluded(&self) -> bool {
        self.sql
            .as_deref()
            .and_then(|v| v.split(',').next())
            .is_some_and(|v| v.trim() == "-")
    }
}

fn string_argument(attr: &syn::Attribute, usage: &str) -> syn::Result<String> {
    attr.meta
        .require_list()
        .and_then(|v| v.parse_args::<LitStr>())
        .map(|v| v.value())
        .map_err(|e| syn::Error::new(e.span(), format!("Error while parsing, use it like {usage}")))
}

fn flag(attr: &syn::Attribute, usage: &str) -> syn::Result<()> {
    attr.meta
        .require_path_only()
        .map(|_| ())
        .map_err(|e| syn::Error::new(e.span(), format!("Error while parsing, use it like {usage}")))
}

pub(crate) fn decode_field(field: &Field) -> syn::Result<FieldMetadata> {
    let Some(ident) = field.ident.clone() else {
        return Err(syn::Error::new(
            field.span(),
            "Record can only be derived for structs with named fields",
        ));
    };
    let mut metadata = FieldMetadata {
        name: ident.unraw().to_string(),
        ident,
        ty: field.ty.clone(),
        sql: None,
        table: None,
        readonly: false,
        embed: false,
    };
    for attr in &field.attrs {
        let path = attr.meta.path();
        if path.is_ident("sql") {
            metadata.sql = Some(string_argument(attr, "`#[sql(\"column,id,readonly\")]`")?);
        } else if path.is_ident("table") {
            metadata.table = Some(string_argument(attr, "`#[table(\"my_table\")]`")?);
        } else if path.is_ident("readonly") {
            flag(attr, "`#[readonly]`")?;
            metadata.readonly = true;
        } else if path.is_ident("embed") {
            flag(attr, "`#[embed]`")?;
            metadata.embed = true;
        }
    }
    Ok(metadata)
}
