//! Parser for detailed directory listing lines.
//!
//! Expected layout, columns separated by runs of spaces:
//!
//! ```text
//! <perms> <links> <owner> <group> <size> <date> <time.fraction> <offset> <name>
//! ```
//!
//! The name is everything after the eighth column and one separating space, so
//! names with embedded or repeated spaces survive unchanged. Nothing here escapes
//! or unescapes; the parser only segments.

use chrono::{DateTime, TimeZone, Utc};

use crate::errors::ParseError;
use crate::helpers::{join_absolute, FIXED_COLUMNS, LISTING_RENDER_FORMAT, LISTING_TIME_FORMAT};
use crate::models::{FileMetadata, FileType};

/// Separator between a symbolic link name and its target.
pub const LINK_SEPARATOR: &str = " -> ";

const SETUID: u32 = 0o4000;
const SETGID: u32 = 0o2000;
const STICKY: u32 = 0o1000;

/// Parses one listing line. `directory` is the directory that was listed; it is
/// used verbatim to build the absolute path.
pub fn parse_line(line: &str, directory: &str) -> Result<FileMetadata, ParseError> {
    let (columns, name) = split_columns(line, FIXED_COLUMNS)?;
    let perms = columns[0];
    let file_type = parse_file_type(perms);

    // Device nodes print `major, minor` where other files print a size.
    let (columns, name) = if matches!(file_type, FileType::BlockDevice | FileType::CharacterDevice)
        && columns[4].ends_with(',')
    {
        split_columns(line, FIXED_COLUMNS + 1)?
    } else {
        (columns, name)
    };
    let (owner, group) = (columns[2], columns[3]);
    let tail = &columns[columns.len() - 3..];

    let file_size = if columns.len() > FIXED_COLUMNS {
        0
    } else {
        parse_size(columns[4])?
    };
    let file_mode = parse_mode(perms)?;
    let file_mod_time = parse_timestamp(tail[0], tail[1], tail[2])?;

    let (file_path, link_target) = match (file_type, name.split_once(LINK_SEPARATOR)) {
        (FileType::SymbolicLink, Some((path, target))) => (path, Some(target.to_string())),
        _ => (name, None),
    };

    Ok(FileMetadata {
        absolute_path: join_absolute(directory, file_path),
        file_path: file_path.to_string(),
        owner: owner.to_string(),
        group: group.to_string(),
        file_size,
        file_mod_time,
        file_mode,
        file_type,
        link_target,
    })
}

/// Splits off `count` space separated columns and returns them with the
/// remainder of the line, which starts after exactly one separating space.
pub fn split_columns(line: &str, count: usize) -> Result<(Vec<&str>, &str), ParseError> {
    let mut columns = Vec::with_capacity(count);
    let mut rest = line;
    for _ in 0..count {
        rest = rest.trim_start_matches(' ');
        let end = rest
            .find(' ')
            .ok_or_else(|| ParseError::malformed(line))?;
        columns.push(&rest[..end]);
        rest = &rest[end..];
    }
    let name = &rest[1..];
    if name.is_empty() {
        return Err(ParseError::malformed(line));
    }
    Ok((columns, name))
}

/// Decodes the type character of a permission string.
pub fn parse_file_type(perms: &str) -> FileType {
    perms
        .chars()
        .next()
        .map(FileType::from_type_char)
        .unwrap_or(FileType::Unknown)
}

/// Decodes the nine permission characters after the type character into mode
/// bits. Characters after the tenth (ACL or security context markers) are
/// ignored.
pub fn parse_mode(perms: &str) -> Result<u32, ParseError> {
    let bits: Vec<char> = perms.chars().skip(1).take(9).collect();
    if bits.len() != 9 {
        return Err(ParseError::malformed(format!("permission string {perms:?}")));
    }

    let mut mode = 0u32;
    for (idx, c) in bits.into_iter().enumerate() {
        let class = idx / 3;
        let shift = (2 - class) * 3;
        let special = match class {
            0 => SETUID,
            1 => SETGID,
            _ => STICKY,
        };
        // `s` marks setuid/setgid, `t` the sticky bit; upper case means the
        // execute bit underneath is clear.
        let special_char = if class == 2 { 't' } else { 's' };
        let value = match (idx % 3, c) {
            (_, '-') => 0,
            (0, 'r') => 0o4 << shift,
            (1, 'w') => 0o2 << shift,
            (2, 'x') => 0o1 << shift,
            (2, c) if c == special_char => (0o1 << shift) | special,
            (2, c) if c == special_char.to_ascii_uppercase() => special,
            _ => return Err(ParseError::malformed(format!("permission string {perms:?}"))),
        };
        mode |= value;
    }
    Ok(mode)
}

/// Parses the size column. Only plain decimal digits are accepted.
pub fn parse_size(field: &str) -> Result<u64, ParseError> {
    if field.is_empty() || !field.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ParseError::InvalidSize(field.to_string()));
    }
    field
        .parse()
        .map_err(|_| ParseError::InvalidSize(field.to_string()))
}

/// Parses the date, time and UTC offset columns into an instant, rounded down
/// to whole milliseconds. Independent of the host locale and time zone.
pub fn parse_timestamp(date: &str, time: &str, offset: &str) -> Result<DateTime<Utc>, ParseError> {
    let text = format!("{date} {time} {offset}");
    let parsed = DateTime::parse_from_str(&text, LISTING_TIME_FORMAT)
        .map_err(|_| ParseError::InvalidTimestamp(text.clone()))?;
    Utc.timestamp_millis_opt(parsed.timestamp_millis())
        .single()
        .ok_or(ParseError::InvalidTimestamp(text))
}

/// Renders the nine permission characters for `mode`.
pub fn mode_string(mode: u32) -> String {
    let mut out = String::with_capacity(9);
    for class in 0..3 {
        let shift = (2 - class) * 3;
        let triplet = (mode >> shift) & 0o7;
        let special = match class {
            0 => mode & SETUID != 0,
            1 => mode & SETGID != 0,
            _ => mode & STICKY != 0,
        };
        out.push(if triplet & 0o4 != 0 { 'r' } else { '-' });
        out.push(if triplet & 0o2 != 0 { 'w' } else { '-' });
        let exec = triplet & 0o1 != 0;
        let marker = if class == 2 { 't' } else { 's' };
        out.push(match (special, exec) {
            (true, true) => marker,
            (true, false) => marker.to_ascii_uppercase(),
            (false, true) => 'x',
            (false, false) => '-',
        });
    }
    out
}

/// Renders a record back into a listing line that [`parse_line`] accepts. The
/// link count column is always `1` and the time is printed in UTC.
pub fn render_line(meta: &FileMetadata) -> String {
    let mut line = format!(
        "{}{} 1 {} {} {} {} {}",
        meta.file_type().as_char(),
        mode_string(meta.file_mode()),
        meta.owner(),
        meta.group(),
        meta.file_size(),
        meta.file_mod_time().format(LISTING_RENDER_FORMAT),
        meta.file_path(),
    );
    if let Some(target) = meta.link_target() {
        line.push_str(LINK_SEPARATOR);
        line.push_str(target);
    }
    line
}
