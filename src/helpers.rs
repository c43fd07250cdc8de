//! Shared constants and small string helpers for listing and command handling.

/// Timestamp layout of the date, time and offset columns of a listing line.
pub const LISTING_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f %z";

/// Layout used when rendering a listing line (fixed nine-digit fraction).
pub const LISTING_RENDER_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.9f %z";

/// Default flags for the detailed listing command: almost-all long format with
/// full timestamps, which yields the eight column layout `parse_line` expects.
pub const LISTING_FLAGS: &str = "-A -l --full-time";

/// Number of whitespace separated columns that precede the name.
pub const FIXED_COLUMNS: usize = 8;

/// Joins a caller supplied directory and a listed name with exactly one `/`.
pub fn join_absolute(directory: &str, name: &str) -> String {
    let directory = directory.trim_end_matches('/');
    format!("{directory}/{name}")
}

/// Returns true for listing output that carries no file record (blank lines and
/// the `total N` block summary).
pub fn is_listing_noise(line: &str) -> bool {
    let trimmed = line.trim();
    trimmed.is_empty()
        || trimmed
            .strip_prefix("total")
            .is_some_and(|rest| rest.is_empty() || rest.starts_with(' '))
}

/// Human readable size rendering.
pub fn print_size(bytes: u64) -> String {
    const SUFFIXES: [&str; 5] = ["B", "K", "M", "G", "T"];
    let mut value = bytes as f64;
    let mut idx = 0usize;

    while value >= 1024.0 && idx < SUFFIXES.len() - 1 {
        value /= 1024.0;
        idx += 1;
    }

    if idx == 0 {
        format!("{:.0} {}", value, SUFFIXES[idx])
    } else {
        format!("{:.1} {}", value, SUFFIXES[idx])
    }
}
