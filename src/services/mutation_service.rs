use std::path::Path;

use tracing::{debug, info, info_span, Instrument};
use uuid::Uuid;

use crate::download_path::{claim_destination, partial_path};
use crate::error::AppError;
use crate::models::file_entry::{EntryId, FileEntry, UploadFile};
use crate::models::operation::{OperationReport, OperationType, Outcome};
use crate::safety::{validate_download_dir, validate_file_name};
use crate::services::folder_service::refresh_folders;
use crate::services::listing_service::refresh_listing;
use crate::state::AppState;

/// Folder an operation was issued against, and the navigation it belonged to.
struct Target {
    navigation_version: u64,
    folder_id: Option<EntryId>,
}

fn current_target(state: &AppState) -> Target {
    let nav = state.lock_navigation();
    Target {
        navigation_version: nav.version,
        folder_id: nav.state.folder_id.clone(),
    }
}

fn entered_name(input: Option<&str>) -> Option<&str> {
    input.map(str::trim).filter(|name| !name.is_empty())
}

/// Re-lists the current folder unless the user has navigated away since
/// `target` was taken; that navigation already refreshed the new folder.
async fn follow_up_listing(state: &AppState, target: &Target) -> Result<(), AppError> {
    if state.navigation_version() != target.navigation_version {
        debug!(folder = ?target.folder_id, "navigation moved on; skipping follow-up listing");
        return Ok(());
    }
    refresh_listing(state).await?;
    Ok(())
}

fn listed_entry(state: &AppState, id: &EntryId) -> Option<FileEntry> {
    state.current_entries().into_iter().find(|entry| &entry.id == id)
}

pub async fn upload(
    state: &AppState,
    file: Option<UploadFile>,
) -> Result<Outcome<OperationReport>, AppError> {
    let Some(file) = file.filter(|f| !f.is_empty()) else {
        debug!("upload skipped: no file selected");
        return Ok(Outcome::Skipped);
    };

    let operation_id = Uuid::new_v4();
    let span = info_span!("upload", %operation_id, file = %file.file_name);
    upload_file(state, &file, &operation_id)
        .instrument(span)
        .await
        .map(Outcome::Done)
}

async fn upload_file(
    state: &AppState,
    file: &UploadFile,
    operation_id: &Uuid,
) -> Result<OperationReport, AppError> {
    let target = current_target(state);
    let entry = state
        .remote()
        .create_entry(file, target.folder_id.as_ref())
        .await
        .map_err(AppError::capture)?;
    info!(entry_id = %entry.id, folder = ?target.folder_id, "uploaded");

    follow_up_listing(state, &target).await?;
    Ok(OperationReport::new(operation_id, OperationType::Upload).with_entry(entry))
}

pub async fn create_folder(
    state: &AppState,
    name: Option<&str>,
) -> Result<Outcome<OperationReport>, AppError> {
    let Some(name) = entered_name(name) else {
        debug!("create folder skipped: no name entered");
        return Ok(Outcome::Skipped);
    };

    let operation_id = Uuid::new_v4();
    let span = info_span!("create_folder", %operation_id, folder_name = name);
    create_folder_entry(state, name, &operation_id)
        .instrument(span)
        .await
        .map(Outcome::Done)
}

async fn create_folder_entry(
    state: &AppState,
    name: &str,
    operation_id: &Uuid,
) -> Result<OperationReport, AppError> {
    let target = current_target(state);
    let entry = state
        .remote()
        .create_folder_entry(name, target.folder_id.as_ref())
        .await
        .map_err(AppError::capture)?;
    info!(entry_id = %entry.id, folder = ?target.folder_id, "folder created");

    refresh_folders(state).await?;
    follow_up_listing(state, &target).await?;
    Ok(OperationReport::new(operation_id, OperationType::CreateFolder).with_entry(entry))
}

pub async fn rename(
    state: &AppState,
    id: &EntryId,
    new_name: Option<&str>,
) -> Result<Outcome<OperationReport>, AppError> {
    let Some(new_name) = entered_name(new_name) else {
        debug!(entry_id = %id, "rename skipped: no name entered");
        return Ok(Outcome::Skipped);
    };

    let operation_id = Uuid::new_v4();
    let span = info_span!("rename", %operation_id, entry_id = %id, new_name);
    rename_entry(state, id, new_name, &operation_id)
        .instrument(span)
        .await
        .map(Outcome::Done)
}

async fn rename_entry(
    state: &AppState,
    id: &EntryId,
    new_name: &str,
    operation_id: &Uuid,
) -> Result<OperationReport, AppError> {
    let target = current_target(state);
    let entry = state
        .remote()
        .rename_entry(id, new_name)
        .await
        .map_err(AppError::capture)?;
    info!("renamed");

    follow_up_listing(state, &target).await?;
    if entry.is_folder {
        refresh_folders(state).await?;
    }
    Ok(OperationReport::new(operation_id, OperationType::Rename).with_entry(entry))
}

pub async fn remove(
    state: &AppState,
    id: &EntryId,
    confirmed: bool,
) -> Result<Outcome<OperationReport>, AppError> {
    if !confirmed {
        debug!(entry_id = %id, "delete skipped: not confirmed");
        return Ok(Outcome::Skipped);
    }

    let operation_id = Uuid::new_v4();
    let span = info_span!("delete", %operation_id, entry_id = %id);
    delete_entry(state, id, &operation_id)
        .instrument(span)
        .await
        .map(Outcome::Done)
}

async fn delete_entry(
    state: &AppState,
    id: &EntryId,
    operation_id: &Uuid,
) -> Result<OperationReport, AppError> {
    let target = current_target(state);
    let listed = listed_entry(state, id);
    state
        .remote()
        .delete_entry(id)
        .await
        .map_err(AppError::capture)?;
    info!("deleted");

    follow_up_listing(state, &target).await?;
    if listed.as_ref().is_some_and(|entry| entry.is_folder) {
        refresh_folders(state).await?;
    }
    let report = OperationReport::new(operation_id, OperationType::Delete);
    Ok(match listed {
        Some(entry) => report.with_entry(entry),
        None => report,
    })
}

/// Fetches a file's bytes and saves them under `dir`. Nothing is left
/// behind in `dir` when the fetch or the write fails.
pub async fn download(
    state: &AppState,
    entry: &FileEntry,
    dir: &Path,
) -> Result<Outcome<OperationReport>, AppError> {
    let Some(url) = entry.download_url() else {
        debug!(entry_id = %entry.id, "download skipped: entry has no content");
        return Ok(Outcome::Skipped);
    };
    validate_file_name(&entry.name)?;
    validate_download_dir(dir)?;

    let operation_id = Uuid::new_v4();
    let span = info_span!("download", %operation_id, entry_id = %entry.id);
    download_entry(state, entry, url, dir, &operation_id)
        .instrument(span)
        .await
        .map(Outcome::Done)
}

async fn download_entry(
    state: &AppState,
    entry: &FileEntry,
    url: &str,
    dir: &Path,
    operation_id: &Uuid,
) -> Result<OperationReport, AppError> {
    let bytes = state
        .remote()
        .fetch_bytes(url)
        .await
        .map_err(AppError::capture)?;

    let destination = save_bytes(dir, &entry.name, &bytes, operation_id)
        .await
        .map_err(AppError::capture)?;
    info!(path = %destination.display(), size = bytes.len(), "downloaded");

    Ok(OperationReport::new(operation_id, OperationType::Download)
        .with_entry(entry.clone())
        .with_saved_to(destination.to_string_lossy()))
}

async fn save_bytes(
    dir: &Path,
    name: &str,
    bytes: &[u8],
    operation_id: &Uuid,
) -> Result<std::path::PathBuf, AppError> {
    tokio::fs::create_dir_all(dir).await?;
    let partial = partial_path(dir, operation_id);

    let written = async {
        tokio::fs::write(&partial, bytes).await?;
        let destination = claim_destination(dir, name).await?;
        // Replaces only the empty placeholder claimed above.
        if let Err(e) = tokio::fs::rename(&partial, &destination).await {
            let _ = tokio::fs::remove_file(&destination).await;
            return Err(e);
        }
        Ok::<_, std::io::Error>(destination)
    }
    .await;

    match written {
        Ok(destination) => Ok(destination),
        Err(e) => {
            let _ = tokio::fs::remove_file(&partial).await;
            Err(e.into())
        }
    }
}
