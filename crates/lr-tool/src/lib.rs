mod case;
mod runner;
mod source;

pub use case::{ExpectedError, TestCase, TESTCASE_SCHEMA_V1};
pub use runner::{assert_case, build_run_options, run_case};
pub use source::{read_chunk, read_test_case};

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum LrToolError {
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
    #[error("Expected success={expected}, actual success={actual}. errors={errors}")]
    SuccessMismatch {
        expected: bool,
        actual: bool,
        errors: String,
    },
    #[error("Output mismatch. expected={expected} actual={actual}")]
    OutputMismatch { expected: String, actual: String },
    #[error("Expected error count {expected}, actual {actual}. observed={observed}")]
    ErrorCountMismatch {
        expected: usize,
        actual: usize,
        observed: String,
    },
    #[error("Error mismatch at index {index}. expected={expected} actual={actual}")]
    ErrorMismatch {
        index: usize,
        expected: String,
        actual: String,
    },
    #[error("Failed to serialize value for diff: {0}")]
    Serialize(serde_json::Error),
}
