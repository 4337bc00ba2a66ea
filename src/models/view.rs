use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortKey {
    ByName,
    #[default]
    ByRecency,
}

impl std::fmt::Display for SortKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ByName => write!(f, "by-name"),
            Self::ByRecency => write!(f, "by-recency"),
        }
    }
}

impl std::str::FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "by-name" | "name" => Ok(Self::ByName),
            "by-recency" | "recent" => Ok(Self::ByRecency),
            _ => Err(format!("unknown sort key: {s}")),
        }
    }
}

/// UI-local projection settings; never persisted or sent to the service.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewSettings {
    pub search_text: String,
    pub sort_key: SortKey,
}
