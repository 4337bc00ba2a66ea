use tracing::debug;

use crate::error::AppError;
use crate::models::file_entry::{EntryId, FileEntry};
use crate::models::navigation::{NavigationState, HOME_NAME};
use crate::state::AppState;

/// Points the view at `folder_id`, updating id and name together.
/// Returns the new navigation version.
pub fn navigate_to(state: &AppState, folder_id: Option<EntryId>, folder_name: &str) -> u64 {
    set_navigation(
        state,
        NavigationState {
            folder_id,
            folder_name: folder_name.to_string(),
        },
    )
}

fn set_navigation(state: &AppState, next: NavigationState) -> u64 {
    let mut nav = state.lock_navigation();
    nav.state = next;
    nav.version += 1;
    debug!(
        folder = ?nav.state.folder_id,
        name = %nav.state.folder_name,
        version = nav.version,
        "navigated"
    );
    nav.version
}

pub fn navigate_home(state: &AppState) -> u64 {
    navigate_to(state, None, HOME_NAME)
}

pub fn navigate_to_folder(state: &AppState, folder: &FileEntry) -> Result<u64, AppError> {
    if !folder.is_folder {
        return Err(AppError::General(format!(
            "not a folder: {}",
            folder.name
        )));
    }
    Ok(set_navigation(state, NavigationState::folder(folder)))
}
