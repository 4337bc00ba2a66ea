use serde::{Deserialize, Serialize};

use crate::models::file_entry::{EntryId, FileEntry};

pub const HOME_NAME: &str = "Home";

/// Where the user currently is. `folder_id == None` is the root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NavigationState {
    pub folder_id: Option<EntryId>,
    pub folder_name: String,
}

impl NavigationState {
    pub fn home() -> Self {
        Self {
            folder_id: None,
            folder_name: HOME_NAME.to_string(),
        }
    }

    pub fn folder(folder: &FileEntry) -> Self {
        Self {
            folder_id: Some(folder.id.clone()),
            folder_name: folder.name.clone(),
        }
    }

    pub fn is_home(&self) -> bool {
        self.folder_id.is_none()
    }
}

impl Default for NavigationState {
    fn default() -> Self {
        Self::home()
    }
}
