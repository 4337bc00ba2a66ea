//! Contract for the remote file service the client core talks to.

use std::{future::Future, pin::Pin};

use crate::error::AppError;
use crate::models::file_entry::{EntryId, FileEntry, UploadFile};

/// Object-safe boxed future returned by [`RemoteFileService`] methods.
pub type RemoteFuture<'a, T> =
    Pin<Box<dyn Future<Output = Result<T, AppError>> + Send + 'a>>;

/// Remote file store. Filtering by parent happens service-side.
/// Shared across tasks through [`AppState`](crate::state::AppState).
pub trait RemoteFileService: Send + Sync {
    /// Lists every entry whose parent is `parent_id` (`None` = root).
    fn list_folder_contents<'a>(
        &'a self,
        parent_id: Option<&'a EntryId>,
    ) -> RemoteFuture<'a, Vec<FileEntry>>;

    /// Lists every folder the user owns, regardless of nesting.
    fn list_all_folders<'a>(&'a self) -> RemoteFuture<'a, Vec<FileEntry>>;

    fn create_entry<'a>(
        &'a self,
        file: &'a UploadFile,
        parent_id: Option<&'a EntryId>,
    ) -> RemoteFuture<'a, FileEntry>;

    fn create_folder_entry<'a>(
        &'a self,
        name: &'a str,
        parent_id: Option<&'a EntryId>,
    ) -> RemoteFuture<'a, FileEntry>;

    fn rename_entry<'a>(&'a self, id: &'a EntryId, new_name: &'a str)
        -> RemoteFuture<'a, FileEntry>;

    fn delete_entry<'a>(&'a self, id: &'a EntryId) -> RemoteFuture<'a, ()>;

    /// Fetches the raw bytes behind a file's content locator.
    fn fetch_bytes<'a>(&'a self, content_url: &'a str) -> RemoteFuture<'a, Vec<u8>>;
}
