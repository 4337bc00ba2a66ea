use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use crate::data::remote::RemoteFileService;
use crate::models::file_entry::{EntryId, FileEntry};
use crate::models::navigation::NavigationState;
use crate::models::view::ViewSettings;

/// Navigation state plus the version bumped on every change.
#[derive(Debug, Clone, Default)]
pub struct NavigationSlot {
    pub state: NavigationState,
    pub version: u64,
}

#[derive(Debug, Clone, Default)]
pub struct ListingCache {
    pub folder_id: Option<EntryId>,
    pub entries: Vec<FileEntry>,
    pub applied_sequence: u64,
    pub loaded: bool,
}

#[derive(Debug, Clone, Default)]
pub struct FolderIndex {
    pub folders: Vec<FileEntry>,
    pub applied_sequence: u64,
}

pub struct AppState {
    remote: Arc<dyn RemoteFileService>,
    navigation: Mutex<NavigationSlot>,
    listing: Mutex<ListingCache>,
    folders: Mutex<FolderIndex>,
    view: Mutex<ViewSettings>,
    refresh_sequence: AtomicU64,
}

fn recover<T>(result: std::sync::LockResult<MutexGuard<'_, T>>) -> MutexGuard<'_, T> {
    result.unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl AppState {
    pub fn new(remote: Arc<dyn RemoteFileService>) -> Self {
        Self {
            remote,
            navigation: Mutex::new(NavigationSlot::default()),
            listing: Mutex::new(ListingCache::default()),
            folders: Mutex::new(FolderIndex::default()),
            view: Mutex::new(ViewSettings::default()),
            refresh_sequence: AtomicU64::new(0),
        }
    }

    pub fn remote(&self) -> &dyn RemoteFileService {
        self.remote.as_ref()
    }

    pub(crate) fn lock_navigation(&self) -> MutexGuard<'_, NavigationSlot> {
        recover(self.navigation.lock())
    }

    pub(crate) fn lock_listing(&self) -> MutexGuard<'_, ListingCache> {
        recover(self.listing.lock())
    }

    pub(crate) fn lock_folders(&self) -> MutexGuard<'_, FolderIndex> {
        recover(self.folders.lock())
    }

    pub(crate) fn lock_view(&self) -> MutexGuard<'_, ViewSettings> {
        recover(self.view.lock())
    }

    pub fn navigation(&self) -> NavigationState {
        self.lock_navigation().state.clone()
    }

    pub fn navigation_version(&self) -> u64 {
        self.lock_navigation().version
    }

    pub fn next_refresh_sequence(&self) -> u64 {
        self.refresh_sequence.fetch_add(1, Ordering::Relaxed) + 1
    }

    /// Entries of the current folder. Empty while the folder's first
    /// listing is still loading, never another folder's entries.
    pub fn current_entries(&self) -> Vec<FileEntry> {
        let nav = self.lock_navigation();
        let listing = self.lock_listing();
        if listing.loaded && listing.folder_id == nav.state.folder_id {
            listing.entries.clone()
        } else {
            Vec::new()
        }
    }

    pub fn is_listing_loaded(&self) -> bool {
        let nav = self.lock_navigation();
        let listing = self.lock_listing();
        listing.loaded && listing.folder_id == nav.state.folder_id
    }

    pub fn folders(&self) -> Vec<FileEntry> {
        self.lock_folders().folders.clone()
    }

    pub fn view_settings(&self) -> ViewSettings {
        self.lock_view().clone()
    }
}
