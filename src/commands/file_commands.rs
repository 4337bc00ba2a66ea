use std::path::Path;

use serde::Serialize;

use crate::error::AppError;
use crate::models::file_entry::{EntryId, FileEntry, UploadFile};
use crate::models::operation::{Notification, OperationReport, OperationType, Outcome};
use crate::services::mutation_service;
use crate::state::AppState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CommandStatus {
    Skipped,
    Succeeded,
    Failed,
}

/// What the UI needs after an operation: one status and at most one toast.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CommandResult {
    pub status: CommandStatus,
    pub report: Option<OperationReport>,
    pub notification: Option<Notification>,
}

fn entry_name(report: &OperationReport) -> &str {
    report.entry.as_ref().map(|e| e.name.as_str()).unwrap_or_default()
}

fn failure_message(operation: OperationType, err: &AppError) -> String {
    match operation {
        OperationType::Download => "Download failed".to_string(),
        _ => format!("{} failed: {err}", operation.label()),
    }
}

fn finish<F>(
    operation: OperationType,
    result: Result<Outcome<OperationReport>, AppError>,
    success_message: F,
) -> CommandResult
where
    F: FnOnce(&OperationReport) -> String,
{
    match result {
        Ok(Outcome::Skipped) => CommandResult {
            status: CommandStatus::Skipped,
            report: None,
            notification: None,
        },
        Ok(Outcome::Done(report)) => CommandResult {
            status: CommandStatus::Succeeded,
            notification: Some(Notification::success(success_message(&report))),
            report: Some(report),
        },
        Err(err) => CommandResult {
            status: CommandStatus::Failed,
            report: None,
            notification: Some(Notification::error(failure_message(operation, &err))),
        },
    }
}

pub async fn upload_file(state: &AppState, file: Option<UploadFile>) -> CommandResult {
    let folder_name = state.navigation().folder_name;
    let result = mutation_service::upload(state, file).await;
    finish(OperationType::Upload, result, |_| {
        format!("Uploaded to {folder_name}")
    })
}

pub async fn create_folder(state: &AppState, name: Option<&str>) -> CommandResult {
    let result = mutation_service::create_folder(state, name).await;
    finish(OperationType::CreateFolder, result, |report| {
        format!("Folder \"{}\" created", entry_name(report))
    })
}

pub async fn rename_entry(state: &AppState, id: &EntryId, new_name: Option<&str>) -> CommandResult {
    let result = mutation_service::rename(state, id, new_name).await;
    finish(OperationType::Rename, result, |report| {
        format!("Renamed to \"{}\"", entry_name(report))
    })
}

pub async fn delete_entry(state: &AppState, id: &EntryId, confirmed: bool) -> CommandResult {
    let result = mutation_service::remove(state, id, confirmed).await;
    finish(OperationType::Delete, result, |_| {
        "Deleted successfully".to_string()
    })
}

pub async fn download_file(state: &AppState, entry: &FileEntry, dir: &Path) -> CommandResult {
    let result = mutation_service::download(state, entry, dir).await;
    finish(OperationType::Download, result, |report| {
        format!("Downloaded \"{}\"", entry_name(report))
    })
}
