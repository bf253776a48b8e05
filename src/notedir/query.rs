//! Display projection of the collection: newest first, optionally filtered.

use crate::model::Note;

/// Sorts by `last_modified` descending and keeps notes whose identifier or
/// content contains `filter`, case-insensitively. A blank filter keeps all.
pub fn view<'a, I>(notes: I, filter: &str) -> Vec<Note>
where
    I: IntoIterator<Item = &'a Note>,
{
    let term = filter.trim().to_lowercase();

    let mut listed: Vec<Note> = notes
        .into_iter()
        .filter(|note| term.is_empty() || matches(note, &term))
        .cloned()
        .collect();

    listed.sort_unstable_by(|a, b| b.last_modified.cmp(&a.last_modified));
    listed
}

fn matches(note: &Note, term_lower: &str) -> bool {
    note.identifier.to_lowercase().contains(term_lower)
        || note.content.to_lowercase().contains(term_lower)
}
