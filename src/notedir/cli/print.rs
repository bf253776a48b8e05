use chrono::{DateTime, Utc};
use colored::Colorize;
use notedir::model::Note;
use timeago::Formatter;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

const LINE_WIDTH: usize = 100;
const TIME_WIDTH: usize = 16;
const NAME_WIDTH: usize = 32;

pub(crate) fn print_success(message: &str) {
    println!("{}", message.green());
}

pub(crate) fn print_info(message: &str) {
    println!("{}", message.dimmed());
}

pub(crate) fn print_note(note: &Note) {
    println!("{}", note.title().bold());
    println!("--------------------------------");
    println!("{}", note.content);
}

pub(crate) fn print_notes(notes: &[Note]) {
    if notes.is_empty() {
        println!("No notes found.");
        return;
    }

    for note in notes {
        println!("{}", format_row(note, Utc::now()));
    }
}

fn format_row(note: &Note, now: DateTime<Utc>) -> String {
    let name = pad_to_width(&truncate_to_width(note.title(), NAME_WIDTH), NAME_WIDTH);

    let available = LINE_WIDTH.saturating_sub(NAME_WIDTH + TIME_WIDTH + 2);
    let preview = truncate_to_width(&note.preview(available), available);
    let preview = pad_to_width(&preview, available);

    let time_ago = format_time_ago(note.last_modified, now);
    format!("{} {} {}", name, preview.dimmed(), time_ago.dimmed())
}

fn pad_to_width(s: &str, width: usize) -> String {
    let padding = width.saturating_sub(s.width());
    format!("{}{}", s, " ".repeat(padding))
}

fn truncate_to_width(s: &str, max_width: usize) -> String {
    if s.width() <= max_width {
        return s.to_string();
    }

    let mut result = String::new();
    let mut current_width = 0;

    for c in s.chars() {
        let char_width = c.width().unwrap_or(0);
        if current_width + char_width > max_width.saturating_sub(1) {
            result.push('…');
            return result;
        }
        result.push(c);
        current_width += char_width;
    }

    result
}

fn format_time_ago(timestamp: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let duration = now.signed_duration_since(timestamp);
    let time_str = Formatter::new().convert(duration.to_std().unwrap_or_default());
    format!("{:>width$}", time_str, width = TIME_WIDTH)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncates_long_names_with_ellipsis() {
        let out = truncate_to_width("abcdefghij", 5);
        assert_eq!(out, "abcd…");
        assert_eq!(out.width(), 5);
        assert_eq!(truncate_to_width("abc", 5), "abc");
    }

    #[test]
    fn pads_to_display_width() {
        assert_eq!(pad_to_width("ab", 4), "ab  ");
        assert_eq!(pad_to_width("abcdef", 4), "abcdef");
    }

    #[test]
    fn time_column_is_right_aligned() {
        let now = Utc::now();
        let out = format_time_ago(now - chrono::Duration::minutes(3), now);
        assert_eq!(out.width(), TIME_WIDTH);
        assert!(out.trim_start().starts_with("3 minutes"));
    }
}
