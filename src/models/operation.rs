use serde::{Deserialize, Serialize};

use crate::models::file_entry::FileEntry;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OperationType {
    Upload,
    CreateFolder,
    Rename,
    Delete,
    Download,
}

impl OperationType {
    pub fn label(self) -> &'static str {
        match self {
            Self::Upload => "Upload",
            Self::CreateFolder => "Create folder",
            Self::Rename => "Rename",
            Self::Delete => "Delete",
            Self::Download => "Download",
        }
    }
}

impl std::fmt::Display for OperationType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Upload => write!(f, "upload"),
            Self::CreateFolder => write!(f, "create_folder"),
            Self::Rename => write!(f, "rename"),
            Self::Delete => write!(f, "delete"),
            Self::Download => write!(f, "download"),
        }
    }
}

impl std::str::FromStr for OperationType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "upload" => Ok(Self::Upload),
            "create_folder" => Ok(Self::CreateFolder),
            "rename" => Ok(Self::Rename),
            "delete" => Ok(Self::Delete),
            "download" => Ok(Self::Download),
            _ => Err(format!("unknown operation type: {s}")),
        }
    }
}

/// Result of an operation whose inputs may have been cancelled by the user.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", content = "report", rename_all = "snake_case")]
pub enum Outcome<T> {
    /// Cancelled or empty input; nothing was sent to the service.
    Skipped,
    Done(T),
}

impl<T> Outcome<T> {
    pub fn is_skipped(&self) -> bool {
        matches!(self, Self::Skipped)
    }

    pub fn done(self) -> Option<T> {
        match self {
            Self::Skipped => None,
            Self::Done(value) => Some(value),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OperationReport {
    pub operation_id: String,
    pub operation_type: OperationType,
    pub entry: Option<FileEntry>,
    pub saved_to: Option<String>,
    pub completed_at: String,
}

impl OperationReport {
    pub fn new(operation_id: &uuid::Uuid, operation_type: OperationType) -> Self {
        Self {
            operation_id: operation_id.to_string(),
            operation_type,
            entry: None,
            saved_to: None,
            completed_at: chrono::Utc::now().to_rfc3339(),
        }
    }

    pub fn with_entry(mut self, entry: FileEntry) -> Self {
        self.entry = Some(entry);
        self
    }

    pub fn with_saved_to(mut self, path: impl Into<String>) -> Self {
        self.saved_to = Some(path.into());
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationLevel {
    Success,
    Error,
}

/// Toast-ready message for the UI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub level: NotificationLevel,
    pub message: String,
}

impl Notification {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Error,
            message: message.into(),
        }
    }
}
