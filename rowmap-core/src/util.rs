pub fn separated_by<T, F>(
    out: &mut String,
    values: impl IntoIterator<Item = T>,
    mut f: F,
    separator: &str,
) where
    F: FnMut(&mut String, T),
{
    let mut len = out.len();
    for v in values {
        if out.len() > len {
            out.push_str(separator);
        }
        len = out.len();
        f(out, v);
    }
}

#[macro_export]
macro_rules! possibly_parenthesized {
    ($buff:ident, $cond:expr, $v:expr) => {
        if $cond {
            $buff.push('(');
            $v;
            $buff.push(')');
        } else {
            $v;
        }
    };
}

/// Formats a possibly long query text, cut at 497 bytes.
#[macro_export]
macro_rules! truncate_long {
    ($query:expr) => {
        format_args!(
            "{}{}",
            &$query[..$crate::floor_char_boundary(&$query, 497)].trim_end(),
            if $query.len() > 497 { "..." } else { "" },
        )
    };
}

/// Largest char boundary of `value` not greater than `index`.
pub fn floor_char_boundary(value: &str, index: usize) -> usize {
    if index >= value.len() {
        return value.len();
    }
    (0..=index)
        .rev()
        .find(|i| value.is_char_boundary(*i))
        .unwrap_or(0)
}
