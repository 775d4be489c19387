use serde::{Deserialize, Serialize};

use crate::domain::ResultsSnapshot;

/// Acknowledgment body returned by `POST /vote/{option}`.
///
/// Backends are not required to send one, so every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteReceipt {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub current_votes: Option<ResultsSnapshot>,
}

impl VoteReceipt {
    /// Returns `None` for empty or non-object bodies instead of failing the vote.
    pub fn parse_lenient(body: &[u8]) -> Option<Self> {
        if body.iter().all(u8::is_ascii_whitespace) {
            return None;
        }
        serde_json::from_slice(body).ok()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiBanner {
    pub message: String,
}
