//! Submission of a finished record to a remote record store.

use std::fmt::Debug;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SubmitError {
    #[error("Invalid submission payload: {0}")]
    InvalidPayload(String),

    #[error("Submission rejected: {0}")]
    Rejected(String),

    #[error("Submission transport failed: {0}")]
    Transport(String),
}

/// A binary part of a multipart submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionFile {
    pub field: String,
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// Textual fields plus attached images, in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubmissionPayload {
    pub fields: Vec<(String, String)>,
    pub files: Vec<SubmissionFile>,
}

impl SubmissionPayload {
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn file(&self, field: &str) -> Option<&SubmissionFile> {
        self.files.iter().find(|f| f.field == field)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubmissionReceipt {
    /// Identifier assigned by the remote side, when it returns one.
    pub reference: Option<String>,
}

pub trait RecordSubmitter: Send + Sync + Debug {
    fn submit(&self, payload: &SubmissionPayload) -> Result<SubmissionReceipt, SubmitError>;

    fn name(&self) -> &'static str;
}
