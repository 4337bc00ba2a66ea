use std::cmp::Ordering;

use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

use crate::models::file_entry::FileEntry;
use crate::models::view::{SortKey, ViewSettings};

pub const RECENT_LIMIT: usize = 4;

fn matches_search(entry: &FileEntry, needle: &str) -> bool {
    needle.is_empty() || entry.name.to_lowercase().contains(needle)
}

/// Base letters only: decomposed, accents stripped, lower-cased.
fn primary_key(name: &str) -> String {
    name.nfd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
        .collect()
}

/// Collation order: base letters, then accents, then case. Raw text only
/// breaks ties between names that collate equal.
fn compare_names(a: &str, b: &str) -> Ordering {
    primary_key(a)
        .cmp(&primary_key(b))
        .then_with(|| {
            a.nfd()
                .flat_map(char::to_lowercase)
                .cmp(b.nfd().flat_map(char::to_lowercase))
        })
        .then_with(|| a.cmp(b))
}

fn sort_entries(entries: &mut [FileEntry], sort_key: SortKey) {
    match sort_key {
        SortKey::ByName => entries.sort_by(|a, b| compare_names(&a.name, &b.name)),
        SortKey::ByRecency => entries.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
    }
}

/// Filtered and sorted copy of `entries` for display.
pub fn project(entries: &[FileEntry], settings: &ViewSettings) -> Vec<FileEntry> {
    let needle = settings.search_text.to_lowercase();
    let mut visible: Vec<FileEntry> = entries
        .iter()
        .filter(|entry| matches_search(entry, &needle))
        .cloned()
        .collect();
    sort_entries(&mut visible, settings.sort_key);
    visible
}

/// Most recent matches, independent of the chosen sort key.
pub fn recent(entries: &[FileEntry], settings: &ViewSettings) -> Vec<FileEntry> {
    let by_recency = ViewSettings {
        search_text: settings.search_text.clone(),
        sort_key: SortKey::ByRecency,
    };
    let mut latest = project(entries, &by_recency);
    latest.truncate(RECENT_LIMIT);
    latest
}

/// `report.pdf` -> `PDF`. A name without a dot is returned whole, upper-cased.
pub fn file_type_label(name: &str) -> String {
    name.rsplit('.').next().unwrap_or(name).to_uppercase()
}

pub fn delete_confirmation_prompt(name: &str) -> String {
    format!("Are you sure you want to delete \"{name}\"?\nThis action cannot be undone.")
}
