use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Opaque identifier assigned by the remote service.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntryId(String);

impl EntryId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for EntryId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileEntry {
    #[serde(rename = "_id")]
    pub id: EntryId,
    pub name: String,
    #[serde(rename = "isFolder", default)]
    pub is_folder: bool,
    #[serde(rename = "parentId", default)]
    pub parent_id: Option<EntryId>,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "url", default, skip_serializing_if = "Option::is_none")]
    pub content_url: Option<String>,
}

impl FileEntry {
    pub fn is_in_folder(&self, folder_id: Option<&EntryId>) -> bool {
        self.parent_id.as_ref() == folder_id
    }

    /// Content locator for files; folders never carry one.
    pub fn download_url(&self) -> Option<&str> {
        if self.is_folder {
            return None;
        }
        self.content_url.as_deref().filter(|url| !url.is_empty())
    }
}

/// A file picked or dropped by the user, ready to be sent to the service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadFile {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl UploadFile {
    pub fn new(file_name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            file_name: file_name.into(),
            bytes: bytes.into(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}
