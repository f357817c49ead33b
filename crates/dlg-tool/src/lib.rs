mod case;
mod runner;
mod source;

pub use case::{ExpectedEvent, TestAction, TestCase, TESTCASE_SCHEMA_V1};
pub use runner::{assert_case, run_case, RunReport};
pub use source::{discover_case_dirs, read_dialogue_source, read_test_case, CASE_FILE_NAME};

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DlgToolError {
    #[error("Failed to read file {path}: {source}")]
    ReadFile {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to parse testcase {path}: {source}")]
    ParseCase {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("Invalid testcase schema version \"{found}\", expected \"{expected}\".")]
    InvalidSchemaVersion { expected: String, found: String },
    #[error("No dialogue.json under {path}.")]
    SourceMissing { path: PathBuf },
    #[error("Engine error: {0}")]
    Engine(#[from] dlg_core::DialogueError),
    #[error("Expected event count {expected}, actual {actual}. observed={observed}")]
    EventCountMismatch {
        expected: usize,
        actual: usize,
        observed: String,
    },
    #[error("Event mismatch at index {index}. expected={expected} actual={actual}")]
    EventMismatch {
        index: usize,
        expected: String,
        actual: String,
    },
    #[error("Variable \"{name}\" mismatch. expected={expected} actual={actual}")]
    VariableMismatch {
        name: String,
        expected: String,
        actual: String,
    },
    #[error("Diagnostics mismatch. expected={expected:?} actual={actual:?}")]
    DiagnosticMismatch {
        expected: Vec<String>,
        actual: Vec<String>,
    },
    #[error("Failed to serialize event for diff: {0}")]
    EventSerialize(serde_json::Error),
}
