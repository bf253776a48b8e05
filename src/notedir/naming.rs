//! # Filename Policy
//!
//! Pure functions that decide what a note's file is called. No I/O.
//!
//! - New notes get a **provisional** name: `tmp-<unix millis><ext>`. The shape is
//!   fixed so the manager can recognize a still-provisional note from its name
//!   alone (e.g. one left behind by an interrupted session).
//! - On first content-bearing save a note is renamed after its first line:
//!   `<first line, ≤15 chars, sanitized> <YYYY.MM.DD><ext>`.
//!
//! Derived names are not de-duplicated: two notes created on the same day with
//! the same first line map to the same file and the later save wins.

use chrono::{DateTime, NaiveDate, Utc};

pub const PROVISIONAL_PREFIX: &str = "tmp-";

/// Maximum number of characters of the first line kept in a derived name.
pub const MAX_STEM_CHARS: usize = 15;

const ILLEGAL_CHARS: &[char] = &['\\', '/', ':', '*', '?', '"', '<', '>', '|'];

/// Normalizes an extension to start with a dot.
pub fn normalize_ext(ext: &str) -> String {
    if ext.starts_with('.') {
        ext.to_string()
    } else {
        format!(".{}", ext)
    }
}

pub fn provisional_identifier(now: DateTime<Utc>, ext: &str) -> String {
    format!("{}{}{}", PROVISIONAL_PREFIX, now.timestamp_millis(), ext)
}

/// True for names produced by [`provisional_identifier`] with the same extension.
pub fn is_provisional_identifier(identifier: &str, ext: &str) -> bool {
    identifier
        .strip_prefix(PROVISIONAL_PREFIX)
        .and_then(|rest| rest.strip_suffix(ext))
        .is_some_and(|millis| !millis.is_empty() && millis.chars().all(|c| c.is_ascii_digit()))
}

/// Derives the permanent name for a note from its content.
///
/// Returns `None` when the first line has nothing usable left after trimming,
/// truncation and stripping; the caller keeps the provisional name in that case.
pub fn derive_final_identifier(content: &str, date: NaiveDate, ext: &str) -> Option<String> {
    let stem = sanitize_stem(content.lines().next().unwrap_or(""));
    if stem.is_empty() {
        return None;
    }
    Some(format!("{} {}{}", stem, date.format("%Y.%m.%d"), ext))
}

fn sanitize_stem(first_line: &str) -> String {
    let truncated: String = first_line.trim().chars().take(MAX_STEM_CHARS).collect();
    let stripped: String = truncated
        .chars()
        .filter(|c| !ILLEGAL_CHARS.contains(c) && !c.is_control())
        .collect();
    // A leading dot would hide the file from directory listings.
    stripped
        .trim_start_matches(|c: char| c == '.' || c.is_whitespace())
        .trim_end()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn jan5() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 5).unwrap()
    }

    #[test]
    fn derives_name_from_first_line_and_date() {
        let id = derive_final_identifier("Groceries\nmilk\neggs", jan5(), ".txt");
        assert_eq!(id.as_deref(), Some("Groceries 2024.01.05.txt"));
    }

    #[test]
    fn strips_illegal_characters() {
        let id = derive_final_identifier("A/B:C", jan5(), ".txt").unwrap();
        assert_eq!(id, "ABC 2024.01.05.txt");

        let id = derive_final_identifier(r#"x\y*z?"<w>|"#, jan5(), ".txt").unwrap();
        assert_eq!(id, "xyzw 2024.01.05.txt");
    }

    #[test]
    fn truncates_to_fifteen_characters() {
        let id = derive_final_identifier("  abcdefghijklmnopqrstuvwxyz", jan5(), ".txt").unwrap();
        assert_eq!(id, "abcdefghijklmno 2024.01.05.txt");
    }

    #[test]
    fn truncation_counts_characters_not_bytes() {
        let id = derive_final_identifier("ééééééééééééééééééé", jan5(), ".md").unwrap();
        assert_eq!(id, format!("{} 2024.01.05.md", "é".repeat(15)));
    }

    #[test]
    fn truncation_happens_before_stripping() {
        // 15 chars of "/" leave nothing behind even though letters follow.
        let content = format!("{}tail", "/".repeat(15));
        assert_eq!(derive_final_identifier(&content, jan5(), ".txt"), None);
    }

    #[test]
    fn no_rename_for_blank_first_line() {
        assert_eq!(derive_final_identifier("", jan5(), ".txt"), None);
        assert_eq!(derive_final_identifier("   \nbody", jan5(), ".txt"), None);
        assert_eq!(derive_final_identifier("/:*?", jan5(), ".txt"), None);
    }

    #[test]
    fn trailing_space_after_truncation_is_dropped() {
        let id = derive_final_identifier("Meeting notes for Q3", jan5(), ".txt").unwrap();
        assert_eq!(id, "Meeting notes f 2024.01.05.txt");

        let id = derive_final_identifier("Fourteen chars x", jan5(), ".txt").unwrap();
        assert_eq!(id, "Fourteen chars 2024.01.05.txt");
    }

    #[test]
    fn leading_dots_are_dropped() {
        let id = derive_final_identifier(".env secrets\nbody", jan5(), ".txt").unwrap();
        assert_eq!(id, "env secrets 2024.01.05.txt");

        let id = derive_final_identifier(". . hidden", jan5(), ".txt").unwrap();
        assert_eq!(id, "hidden 2024.01.05.txt");

        assert_eq!(derive_final_identifier("...", jan5(), ".txt"), None);
        assert_eq!(derive_final_identifier(".", jan5(), ".txt"), None);
    }

    #[test]
    fn provisional_names_are_recognizable() {
        let now = Utc.with_ymd_and_hms(2024, 1, 5, 9, 30, 0).unwrap();
        let id = provisional_identifier(now, ".txt");
        assert_eq!(id, format!("tmp-{}.txt", now.timestamp_millis()));
        assert!(is_provisional_identifier(&id, ".txt"));
        assert!(!is_provisional_identifier(&id, ".md"));
    }

    #[test]
    fn derived_names_are_never_provisional() {
        let id = derive_final_identifier("tmp-12345", jan5(), ".txt").unwrap();
        assert!(!is_provisional_identifier(&id, ".txt"));
        assert!(!is_provisional_identifier("tmp-.txt", ".txt"));
        assert!(!is_provisional_identifier("notes.txt", ".txt"));
    }

    #[test]
    fn normalizes_extension() {
        assert_eq!(normalize_ext("md"), ".md");
        assert_eq!(normalize_ext(".txt"), ".txt");
    }
}
