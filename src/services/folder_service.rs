use tracing::{debug, warn};

use crate::error::AppError;
use crate::models::file_entry::{EntryId, FileEntry};
use crate::services::listing_service::RefreshOutcome;
use crate::state::AppState;

/// Replaces the sidebar folder index with every folder the user owns.
pub async fn refresh_folders(state: &AppState) -> Result<RefreshOutcome, AppError> {
    let sequence = state.next_refresh_sequence();
    let folders = state
        .remote()
        .list_all_folders()
        .await
        .map_err(AppError::capture)?;
    Ok(apply_folders(state, sequence, folders))
}

pub fn apply_folders(state: &AppState, sequence: u64, folders: Vec<FileEntry>) -> RefreshOutcome {
    let mut index = state.lock_folders();
    if sequence < index.applied_sequence {
        debug!(sequence, applied = index.applied_sequence, "discarding out-of-order folder index");
        return RefreshOutcome::Discarded;
    }

    let total = folders.len();
    let folders: Vec<FileEntry> = folders.into_iter().filter(|f| f.is_folder).collect();
    if folders.len() != total {
        warn!(dropped = total - folders.len(), "folder index response contained files");
    }

    let count = folders.len();
    index.folders = folders;
    index.applied_sequence = sequence;
    debug!(count, "folder index applied");
    RefreshOutcome::Applied(count)
}

pub fn find_folder(state: &AppState, id: &EntryId) -> Option<FileEntry> {
    state
        .lock_folders()
        .folders
        .iter()
        .find(|folder| &folder.id == id)
        .cloned()
}
