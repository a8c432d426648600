//! What to do when some chunks fail to embed

use serde::{Deserialize, Serialize};

/// Policy for per-chunk embedding failures within one upload
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmbeddingFailurePolicy {
    /// Any failed chunk fails the upload before anything is stored
    #[default]
    Abort,
    /// Store the chunks that embedded and report the rest with their error
    ///
    /// A document with no embedded chunk still fails.
    SkipFailed,
}
