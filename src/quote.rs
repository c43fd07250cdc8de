//! Double-quote shell quoting.
//!
//! Inside a double-quoted POSIX shell word only `\`, `"`, `` ` `` and `$` keep a
//! special meaning. Escaping exactly those four and wrapping the result in
//! double quotes makes any string a single literal argument, and the result can
//! still be spliced into larger double-quoted command templates.

/// Characters that must be backslash-escaped inside double quotes.
pub const DOUBLE_QUOTE_SPECIALS: [char; 4] = ['\\', '"', '`', '$'];

/// Quotes `raw` so the shell reads it back as exactly `raw`.
pub fn quote(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len() + 2);
    out.push('"');
    for c in raw.chars() {
        if DOUBLE_QUOTE_SPECIALS.contains(&c) {
            out.push('\\');
        }
        out.push(c);
    }
    out.push('"');
    out
}

/// Quotes every item and joins them with single spaces.
pub fn quote_all<I, S>(items: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    items
        .into_iter()
        .map(|item| quote(item.as_ref()))
        .collect::<Vec<_>>()
        .join(" ")
}
