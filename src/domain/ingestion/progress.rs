//! Progress notifications for streaming ingestion

use serde::{Deserialize, Serialize};

/// Non-terminal ingestion stage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProgressStage {
    Uploading,
    Scanning,
    Saving,
}

/// One notification in a progress stream
///
/// A stream ends with exactly one `Done` or `Error` and nothing follows it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "progress", rename_all = "snake_case")]
pub enum ProgressEvent {
    Uploading,
    Scanning,
    Saving,
    Done { file_id: String, storage_url: String },
    Error { message: String },
}

impl ProgressEvent {
    pub fn stage(stage: ProgressStage) -> Self {
        match stage {
            ProgressStage::Uploading => Self::Uploading,
            ProgressStage::Scanning => Self::Scanning,
            ProgressStage::Saving => Self::Saving,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::Error {
            message: message.into(),
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done { .. } | Self::Error { .. })
    }

    /// Status tag as sent on the wire
    pub fn tag(&self) -> &'static str {
        match self {
            Self::Uploading => "uploading",
            Self::Scanning => "scanning",
            Self::Saving => "saving",
            Self::Done { .. } => "done",
            Self::Error { .. } => "error",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_stage_event_wire_format() {
        let json = serde_json::to_value(ProgressEvent::Scanning).unwrap();
        assert_eq!(json, json!({ "progress": "scanning" }));
    }

    #[test]
    fn test_done_event_wire_format() {
        let event = ProgressEvent::Done {
            file_id: "f-1".to_string(),
            storage_url: "https://bucket/f-1".to_string(),
        };

        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(
            json,
            json!({ "progress": "done", "file_id": "f-1", "storage_url": "https://bucket/f-1" })
        );
        assert!(event.is_terminal());
    }

    #[test]
    fn test_error_event_wire_format() {
        let json = serde_json::to_value(ProgressEvent::error("Virus scan failed")).unwrap();
        assert_eq!(json, json!({ "progress": "error", "message": "Virus scan failed" }));
    }

    #[test]
    fn test_tags() {
        assert_eq!(ProgressEvent::stage(ProgressStage::Saving).tag(), "saving");
        assert!(!ProgressEvent::Uploading.is_terminal());
    }
}
