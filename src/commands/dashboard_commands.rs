use serde::Serialize;

use crate::error::AppError;
use crate::models::file_entry::{EntryId, FileEntry};
use crate::models::navigation::NavigationState;
use crate::models::view::{SortKey, ViewSettings};
use crate::services::folder_service::refresh_folders;
use crate::services::listing_service::{refresh_listing, RefreshOutcome};
use crate::services::navigation_service::{navigate_home, navigate_to};
use crate::services::view_service::{project, recent};
use crate::state::AppState;

/// Everything the dashboard renders, derived fresh on every call.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSnapshot {
    pub navigation: NavigationState,
    pub folders: Vec<FileEntry>,
    pub entries: Vec<FileEntry>,
    pub recent: Vec<FileEntry>,
    pub settings: ViewSettings,
    pub loaded: bool,
}

pub fn snapshot(state: &AppState) -> DashboardSnapshot {
    let settings = state.view_settings();
    let listing = state.current_entries();
    DashboardSnapshot {
        navigation: state.navigation(),
        folders: state.folders(),
        entries: project(&listing, &settings),
        recent: recent(&listing, &settings),
        loaded: state.is_listing_loaded(),
        settings,
    }
}

pub async fn open_folder(
    state: &AppState,
    folder_id: EntryId,
    folder_name: &str,
) -> Result<RefreshOutcome, AppError> {
    navigate_to(state, Some(folder_id), folder_name);
    sync_current_folder(state).await
}

pub async fn go_home(state: &AppState) -> Result<RefreshOutcome, AppError> {
    navigate_home(state);
    sync_current_folder(state).await
}

pub async fn reload(state: &AppState) -> Result<RefreshOutcome, AppError> {
    sync_current_folder(state).await
}

async fn sync_current_folder(state: &AppState) -> Result<RefreshOutcome, AppError> {
    let (listing, folders) = tokio::join!(refresh_listing(state), refresh_folders(state));
    let outcome = listing?;
    folders?;
    Ok(outcome)
}

pub fn set_search_text(state: &AppState, text: &str) {
    state.lock_view().search_text = text.to_string();
}

pub fn set_sort_key(state: &AppState, sort_key: SortKey) {
    state.lock_view().sort_key = sort_key;
}
