//! Actions an execution request can carry out on a resource.

use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Kind of work performed on behalf of a user request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExecutionRequestAction {
    Import,
    Upload,
    Create,
    Copy,
    Delete,
    Permissions,
    Update,
    Ingest,
    Harvest,
    #[serde(other)]
    Unknown,
}

impl ExecutionRequestAction {
    pub const ALL: [Self; 10] = [
        Self::Import,
        Self::Upload,
        Self::Create,
        Self::Copy,
        Self::Delete,
        Self::Permissions,
        Self::Update,
        Self::Ingest,
        Self::Harvest,
        Self::Unknown,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Import => "import",
            Self::Upload => "upload",
            Self::Create => "create",
            Self::Copy => "copy",
            Self::Delete => "delete",
            Self::Permissions => "permissions",
            Self::Update => "update",
            Self::Ingest => "ingest",
            Self::Harvest => "harvest",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for ExecutionRequestAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unrecognised labels map to [`ExecutionRequestAction::Unknown`].
impl FromStr for ExecutionRequestAction {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::ALL
            .into_iter()
            .find(|action| action.as_str() == s)
            .unwrap_or(Self::Unknown))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_parse_every_label_back() {
        for action in ExecutionRequestAction::ALL {
            assert_eq!(action.as_str().parse(), Ok(action));
        }
    }

    #[test]
    fn should_map_unrecognised_label_to_unknown() {
        assert_eq!("bogus".parse(), Ok(ExecutionRequestAction::Unknown));
    }

    #[test]
    fn should_serialize_as_lowercase_label() {
        let json = serde_json::to_string(&ExecutionRequestAction::Permissions).unwrap();
        assert_eq!(json, "\"permissions\"");
        let parsed: ExecutionRequestAction = serde_json::from_str("\"reticulate\"").unwrap();
        assert_eq!(parsed, ExecutionRequestAction::Unknown);
    }
}
