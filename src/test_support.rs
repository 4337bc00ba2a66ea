//! In-memory drive used by unit tests.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Duration, TimeZone, Utc};
use tokio::sync::Notify;

use crate::data::remote::{RemoteFileService, RemoteFuture};
use crate::error::AppError;
use crate::models::file_entry::{EntryId, FileEntry, UploadFile};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    ListFolder(Option<EntryId>),
    ListAllFolders,
    CreateEntry(String, Option<EntryId>),
    CreateFolder(String, Option<EntryId>),
    Rename(EntryId, String),
    Delete(EntryId),
    FetchBytes(String),
}

pub fn at(minutes: i64) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap() + Duration::minutes(minutes)
}

pub fn file(id: &str, name: &str, parent: Option<&str>, minutes: i64) -> FileEntry {
    FileEntry {
        id: EntryId::new(id),
        name: name.to_string(),
        is_folder: false,
        parent_id: parent.map(EntryId::new),
        created_at: at(minutes),
        content_url: Some(format!("https://cdn.test/{id}")),
    }
}

pub fn folder(id: &str, name: &str, parent: Option<&str>, minutes: i64) -> FileEntry {
    FileEntry {
        id: EntryId::new(id),
        name: name.to_string(),
        is_folder: true,
        parent_id: parent.map(EntryId::new),
        created_at: at(minutes),
        content_url: None,
    }
}

#[derive(Default)]
pub struct FakeRemote {
    entries: Mutex<Vec<FileEntry>>,
    calls: Mutex<Vec<Call>>,
    failing: Mutex<HashSet<&'static str>>,
    listing_gates: Mutex<HashMap<Option<EntryId>, Arc<Notify>>>,
    mutation_gate: Mutex<Option<Arc<Notify>>>,
    blobs: Mutex<HashMap<String, Vec<u8>>>,
    next_id: AtomicU64,
}

impl FakeRemote {
    pub fn with_entries(entries: Vec<FileEntry>) -> Self {
        let remote = Self::default();
        *remote.entries.lock().unwrap() = entries;
        remote
    }

    pub fn set_blob(&self, url: &str, bytes: &[u8]) {
        self.blobs
            .lock()
            .unwrap()
            .insert(url.to_string(), bytes.to_vec());
    }

    pub fn fail(&self, method: &'static str) {
        self.failing.lock().unwrap().insert(method);
    }

    pub fn recover(&self, method: &'static str) {
        self.failing.lock().unwrap().remove(method);
    }

    /// Holds the next listing of `parent` until the returned gate is notified.
    pub fn hold_listing(&self, parent: Option<&str>) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        self.listing_gates
            .lock()
            .unwrap()
            .insert(parent.map(EntryId::new), gate.clone());
        gate
    }

    /// Holds the next create/rename/delete call until the gate is notified.
    pub fn hold_next_mutation(&self) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        *self.mutation_gate.lock().unwrap() = Some(gate.clone());
        gate
    }

    async fn pass_mutation_gate(&self) {
        let gate = self.mutation_gate.lock().unwrap().take();
        if let Some(gate) = gate {
            gate.notified().await;
        }
    }

    /// Changes server state without going through the client.
    pub fn insert_remotely(&self, entry: FileEntry) {
        self.entries.lock().unwrap().push(entry);
    }

    pub fn remove_remotely(&self, id: &str) {
        self.entries
            .lock()
            .unwrap()
            .retain(|entry| entry.id.as_str() != id);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count(&self, predicate: impl Fn(&Call) -> bool) -> usize {
        self.calls.lock().unwrap().iter().filter(|c| predicate(c)).count()
    }

    pub fn clear_calls(&self) {
        self.calls.lock().unwrap().clear();
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }

    fn check(&self, method: &'static str) -> Result<(), AppError> {
        if self.failing.lock().unwrap().contains(method) {
            return Err(AppError::Remote {
                status: 500,
                message: format!("{method} failed"),
            });
        }
        Ok(())
    }

    fn new_id(&self) -> EntryId {
        EntryId::new(format!("new-{}", self.next_id.fetch_add(1, Ordering::Relaxed) + 1))
    }
}

impl RemoteFileService for FakeRemote {
    fn list_folder_contents<'a>(
        &'a self,
        parent_id: Option<&'a EntryId>,
    ) -> RemoteFuture<'a, Vec<FileEntry>> {
        Box::pin(async move {
            self.record(Call::ListFolder(parent_id.cloned()));
            let gate = self.listing_gates.lock().unwrap().remove(&parent_id.cloned());
            if let Some(gate) = gate {
                gate.notified().await;
            }
            self.check("list_folder_contents")?;
            Ok(self
                .entries
                .lock()
                .unwrap()
                .iter()
                .filter(|entry| entry.is_in_folder(parent_id))
                .cloned()
                .collect())
        })
    }

    fn list_all_folders<'a>(&'a self) -> RemoteFuture<'a, Vec<FileEntry>> {
        Box::pin(async move {
            self.record(Call::ListAllFolders);
            self.check("list_all_folders")?;
            Ok(self
                .entries
                .lock()
                .unwrap()
                .iter()
                .filter(|entry| entry.is_folder)
                .cloned()
                .collect())
        })
    }

    fn create_entry<'a>(
        &'a self,
        file: &'a UploadFile,
        parent_id: Option<&'a EntryId>,
    ) -> RemoteFuture<'a, FileEntry> {
        Box::pin(async move {
            self.record(Call::CreateEntry(file.file_name.clone(), parent_id.cloned()));
            self.pass_mutation_gate().await;
            self.check("create_entry")?;
            let id = self.new_id();
            let entry = FileEntry {
                content_url: Some(format!("https://cdn.test/{id}")),
                id,
                name: file.file_name.clone(),
                is_folder: false,
                parent_id: parent_id.cloned(),
                created_at: at(1_000),
            };
            self.entries.lock().unwrap().push(entry.clone());
            Ok(entry)
        })
    }

    fn create_folder_entry<'a>(
        &'a self,
        name: &'a str,
        parent_id: Option<&'a EntryId>,
    ) -> RemoteFuture<'a, FileEntry> {
        Box::pin(async move {
            self.record(Call::CreateFolder(name.to_string(), parent_id.cloned()));
            self.pass_mutation_gate().await;
            self.check("create_folder_entry")?;
            let entry = FileEntry {
                id: self.new_id(),
                name: name.to_string(),
                is_folder: true,
                parent_id: parent_id.cloned(),
                created_at: at(1_000),
                content_url: None,
            };
            self.entries.lock().unwrap().push(entry.clone());
            Ok(entry)
        })
    }

    fn rename_entry<'a>(
        &'a self,
        id: &'a EntryId,
        new_name: &'a str,
    ) -> RemoteFuture<'a, FileEntry> {
        Box::pin(async move {
            self.record(Call::Rename(id.clone(), new_name.to_string()));
            self.pass_mutation_gate().await;
            self.check("rename_entry")?;
            let mut entries = self.entries.lock().unwrap();
            let entry = entries
                .iter_mut()
                .find(|entry| &entry.id == id)
                .ok_or_else(|| AppError::Remote {
                    status: 404,
                    message: "not found".to_string(),
                })?;
            entry.name = new_name.to_string();
            Ok(entry.clone())
        })
    }

    fn delete_entry<'a>(&'a self, id: &'a EntryId) -> RemoteFuture<'a, ()> {
        Box::pin(async move {
            self.record(Call::Delete(id.clone()));
            self.pass_mutation_gate().await;
            self.check("delete_entry")?;
            self.entries
                .lock()
                .unwrap()
                .retain(|entry| &entry.id != id && entry.parent_id.as_ref() != Some(id));
            Ok(())
        })
    }

    fn fetch_bytes<'a>(&'a self, content_url: &'a str) -> RemoteFuture<'a, Vec<u8>> {
        Box::pin(async move {
            self.record(Call::FetchBytes(content_url.to_string()));
            self.check("fetch_bytes")?;
            self.blobs
                .lock()
                .unwrap()
                .get(content_url)
                .cloned()
                .ok_or_else(|| AppError::Remote {
                    status: 404,
                    message: "no such blob".to_string(),
                })
        })
    }
}
