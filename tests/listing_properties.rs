mod common;

use chrono::{FixedOffset, TimeZone, Utc};
use proptest::prelude::*;
use rootshell_core::listing::mode_string;
use rootshell_core::{parse_line, render_line, FileType, ParseError};

use common::{AURORA_LINE, FDROID_DIR, SPACES_LINE, SPECIAL_LINE};

const PREFIX: &str =
    "-rw------- 1 user0_a247 group0_a247 15951095 2021-01-19 01:03:29.000000000 +0100 ";

fn non_link_type() -> impl Strategy<Value = char> {
    prop::sample::select(vec!['-', 'd', 'b', 'c', 'p', 's'])
}

fn special_name() -> impl Strategy<Value = String> {
    let alphabet: Vec<char> = "|#$%^&*[](){}'\"\\`:;?<~>,.aZ9 _-".chars().collect();
    prop::collection::vec(prop::sample::select(alphabet), 1..32)
        .prop_map(|chars| chars.into_iter().collect())
}

#[test]
fn fixture_scenarios() {
    let meta = parse_line(AURORA_LINE, FDROID_DIR).unwrap();
    assert_eq!(meta.file_path(), "Aurora Store-3.2.8.apk");
    assert_eq!(
        meta.absolute_path(),
        "/data/data/org.fdroid.fdroid/files/Aurora Store-3.2.8.apk"
    );
    assert_eq!(meta.file_size(), 15951095);
    assert_eq!(meta.file_type(), FileType::RegularFile);

    let meta = parse_line(SPACES_LINE, FDROID_DIR).unwrap();
    assert_eq!(meta.file_mod_time().timestamp_millis(), 1611014609000);
    assert_eq!(meta.file_mode(), 0b110_000_000);
    assert_eq!(meta.owner(), "user0_a247");
    assert_eq!(meta.group(), "group0_a247");

    let meta = parse_line(SPECIAL_LINE, FDROID_DIR).unwrap();
    assert_eq!(meta.file_path(), "My|#$%^&*[](){}'\"`:;?<~>,.file");
    assert_eq!(
        meta.absolute_path(),
        "/data/data/org.fdroid.fdroid/files/My|#$%^&*[](){}'\"`:;?<~>,.file"
    );
}

#[test]
fn identical_timestamp_text_gives_identical_instants() {
    let a = parse_line(AURORA_LINE, FDROID_DIR).unwrap();
    let b = parse_line(SPACES_LINE, "/elsewhere").unwrap();
    assert_eq!(a.file_mod_time(), b.file_mod_time());
}

proptest! {
    #[test]
    fn generated_lines_parse_and_round_trip(
        type_char in non_link_type(),
        mode in 0u32..0o10000,
        owner in "[a-z][a-z0-9_]{0,11}",
        group in "[a-z][a-z0-9_]{0,11}",
        size in any::<u64>(),
        secs in 0i64..4_102_444_800,
        nanos in 0u32..1_000_000_000,
        offset_minutes in -720i32..=840,
        name in "[^\n]{1,40}",
    ) {
        let offset = FixedOffset::east_opt(offset_minutes * 60).unwrap();
        let instant = Utc.timestamp_opt(secs, nanos).unwrap();
        let line = format!(
            "{type_char}{} 1 {owner} {group} {size} {} {name}",
            mode_string(mode),
            instant.with_timezone(&offset).format("%Y-%m-%d %H:%M:%S%.9f %z"),
        );

        let meta = parse_line(&line, "/data/x").unwrap();
        prop_assert_eq!(meta.file_type(), FileType::from_type_char(type_char));
        prop_assert_eq!(meta.file_mode(), mode);
        prop_assert_eq!(meta.owner(), owner.as_str());
        prop_assert_eq!(meta.group(), group.as_str());
        prop_assert_eq!(meta.file_size(), size);
        prop_assert_eq!(meta.file_path(), name.as_str());
        prop_assert_eq!(meta.absolute_path(), format!("/data/x/{name}"));
        prop_assert_eq!(
            meta.file_mod_time().timestamp_millis(),
            secs * 1000 + i64::from(nanos / 1_000_000)
        );

        let reparsed = parse_line(&render_line(&meta), "/data/x").unwrap();
        prop_assert_eq!(reparsed, meta);
    }

    #[test]
    fn embedded_space_runs_are_preserved(
        head in "[a-z0-9.]{1,8}",
        spaces in 1usize..8,
        tail in "[a-z0-9.]{1,8}",
    ) {
        let name = format!("{head}{}{tail}", " ".repeat(spaces));
        let meta = parse_line(&format!("{PREFIX}{name}"), FDROID_DIR).unwrap();
        prop_assert_eq!(meta.file_path(), name.as_str());
        prop_assert_eq!(meta.absolute_path(), format!("{FDROID_DIR}/{name}"));
    }

    #[test]
    fn special_characters_are_preserved(name in special_name()) {
        let meta = parse_line(&format!("{PREFIX}{name}"), FDROID_DIR).unwrap();
        prop_assert_eq!(meta.file_path().as_bytes(), name.as_bytes());
        prop_assert_eq!(meta.absolute_path(), format!("{FDROID_DIR}/{name}"));
    }

    #[test]
    fn symlink_arrow_is_split(
        link in "[a-zA-Z0-9 ._]{1,16}",
        target in "[a-zA-Z0-9 ._/]{1,24}",
    ) {
        let line = format!(
            "lrwxrwxrwx 1 root root 7 2020-08-13 23:28:00.000000000 +0000 {link} -> {target}"
        );
        let meta = parse_line(&line, "/d").unwrap();
        prop_assert_eq!(meta.file_type(), FileType::SymbolicLink);
        prop_assert_eq!(meta.file_path(), link.as_str());
        prop_assert_eq!(meta.link_target(), Some(target.as_str()));
    }

    #[test]
    fn short_lines_are_malformed(columns in 0usize..8) {
        let line = AURORA_LINE
            .split(' ')
            .take(columns)
            .collect::<Vec<_>>()
            .join(" ");
        prop_assert!(matches!(parse_line(&line, FDROID_DIR), Err(ParseError::MalformedLine(_))));
    }
}
