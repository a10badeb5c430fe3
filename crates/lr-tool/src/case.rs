use serde::{Deserialize, Serialize};

pub const TESTCASE_SCHEMA_V1: &str = "lr-tool-case.v1";

/// Scenario description stored as `testcase.json` next to its scripts.
/// Script paths are relative to the testcase directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestCase {
    pub schema_version: String,
    #[serde(default = "default_target")]
    pub target: String,
    #[serde(default)]
    pub bootstrap: Option<String>,
    #[serde(default)]
    pub preloads: Vec<String>,
    #[serde(default)]
    pub services: Option<Vec<String>>,
    #[serde(default = "default_expect_success")]
    pub expect_success: bool,
    #[serde(default)]
    pub expected_output: Vec<String>,
    #[serde(default)]
    pub expected_errors: Vec<ExpectedError>,
}

fn default_target() -> String {
    "main.luau".to_string()
}

fn default_expect_success() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpectedError {
    pub chunk_name: String,
    #[serde(default)]
    pub line: Option<usize>,
    #[serde(default)]
    pub message_contains: String,
}

impl ExpectedError {
    pub fn matches(&self, diagnostic: &lr_core::Diagnostic) -> bool {
        diagnostic.chunk_name == self.chunk_name
            && self.line.map_or(true, |line| diagnostic.line == Some(line))
            && diagnostic.message.contains(&self.message_contains)
    }
}
