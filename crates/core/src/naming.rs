//! Collision-free names for new folders and copies
//!
//! Both schemes pick the smallest positive number missing from the numeric
//! suffixes already present among the siblings. Suffix 1 is the bare name:
//! `untitled folder`, `untitled folder 2`, ... and `photo copy.png`,
//! `photo copy 2.png`, ...
//!
//! Matching is literal and case-sensitive, so stems containing characters
//! such as `(`, `+` or `*` are compared exactly as written.

use unicode_normalization::UnicodeNormalization;

/// Base name for newly created folders
pub const NEW_FOLDER_NAME: &str = "untitled folder";

/// Marker inserted between a copy's stem and its number
const COPY_MARKER: &str = " copy";

/// Name for a new folder among `existing` sibling names
pub fn resolve_new_folder_name<I, S>(existing: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let numbers = existing
        .into_iter()
        .filter_map(|name| folder_number(name.as_ref()))
        .collect();

    match smallest_missing(numbers) {
        1 => NEW_FOLDER_NAME.to_string(),
        n => format!("{} {}", NEW_FOLDER_NAME, n),
    }
}

/// Name for a copy of `stem` + `extension` among `existing` sibling names
///
/// The unmodified source name is reused when nothing in `existing` already
/// has it. Otherwise any `copy`/`copy N` suffix is stripped from the stem
/// first, so copying `photo copy.png` continues the `photo copy N.png`
/// sequence instead of nesting markers.
pub fn resolve_copy_name<I, S>(stem: &str, extension: &str, existing: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let existing: Vec<S> = existing.into_iter().collect();

    let source_name: String = format!("{}{}", stem, extension).nfc().collect();
    if !existing.iter().any(|name| name.as_ref() == source_name.as_str()) {
        return source_name;
    }

    let stem: String = strip_copy_suffix(stem).nfc().collect();
    let numbers = existing
        .iter()
        .filter_map(|name| copy_number(name.as_ref(), &stem, extension))
        .collect();

    match smallest_missing(numbers) {
        1 => format!("{}{}{}", stem, COPY_MARKER, extension),
        n => format!("{}{} {}{}", stem, COPY_MARKER, n, extension),
    }
}

/// Copy name for a source file name, splitting off its extension
pub fn copy_name_for<I, S>(file_name: &str, existing: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let (stem, extension) = split_extension(file_name);
    resolve_copy_name(stem, extension, existing)
}

/// Split `file_name` into stem and extension (extension keeps its dot)
///
/// A leading dot does not start an extension: `.bashrc` has none.
pub fn split_extension(file_name: &str) -> (&str, &str) {
    match file_name.rfind('.') {
        Some(i) if i > 0 => file_name.split_at(i),
        _ => (file_name, ""),
    }
}

/// Smallest positive integer not present in `numbers`
///
/// Numbers below the running expectation (zero, duplicates) are skipped;
/// the walk stops at the first gap.
fn smallest_missing(mut numbers: Vec<u64>) -> u64 {
    numbers.sort_unstable();
    numbers.dedup();

    let mut expected = 1;
    for n in numbers {
        if n == expected {
            expected += 1;
        } else if n > expected {
            break;
        }
    }
    expected
}

fn folder_number(name: &str) -> Option<u64> {
    let rest = name.strip_prefix(NEW_FOLDER_NAME)?;
    if rest.is_empty() {
        return Some(1);
    }
    parse_suffix(rest)
}

fn copy_number(name: &str, stem: &str, extension: &str) -> Option<u64> {
    let rest = name
        .strip_prefix(stem)?
        .strip_prefix(COPY_MARKER)?
        .strip_suffix(extension)?;
    if rest.is_empty() {
        return Some(1);
    }
    parse_suffix(rest)
}

/// Parse `" N"` into `N`
fn parse_suffix(rest: &str) -> Option<u64> {
    let digits = rest.strip_prefix(' ')?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

/// Remove a trailing ` copy` or ` copy N` from `stem`
fn strip_copy_suffix(stem: &str) -> &str {
    if let Some(base) = stem.strip_suffix(COPY_MARKER) {
        return base;
    }
    if let Some((head, tail)) = stem.rsplit_once(' ') {
        if !tail.is_empty() && tail.bytes().all(|b| b.is_ascii_digit()) {
            if let Some(base) = head.strip_suffix(COPY_MARKER) {
                return base;
            }
        }
    }
    stem
}
