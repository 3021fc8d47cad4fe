use syn::DeriveInput;

/// Capabilities the type implements itself instead of receiving the empty default.
#[derive(Default)]
pub(crate) struct RecordMetadata {
    pub(crate) hooks: bool,
    pub(crate) override_scan: bool,
}

pub(crate) fn decode_record(input: &DeriveInput) -> syn::Result<RecordMetadata> {
    let mut metadata = RecordMetadata::default();
    for attr in &input.attrs {
        if attr.meta.path().is_ident("hooks") {
            attr.meta.require_path_only()?;
            metadata.hooks = true;
        } else if attr.meta.path().is_ident("override_scan") {
            attr.meta.require_path_only()?;
            metadata.override_scan = true;
        }
    }
    Ok(metadata)
}
