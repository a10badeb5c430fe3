use serde::{Deserialize, Serialize};

/// Identity attached to diagnostics raised while installing the stand-in environment.
pub const ENVIRONMENT_CHUNK_NAME: &str = "<stub-environment>";

/// Identity attached to diagnostics raised by the runner itself rather than by a chunk.
pub const HOST_CHUNK_NAME: &str = "<host>";

/// A named unit of source text compiled and executed as one step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Chunk {
    pub code: String,
    pub chunk_name: String,
}

impl Chunk {
    pub fn new(chunk_name: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            chunk_name: chunk_name.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Diagnostic {
    pub message: String,
    pub chunk_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub column: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stack: Option<String>,
    pub severity: Severity,
}

impl Diagnostic {
    pub fn error(chunk_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            chunk_name: chunk_name.into(),
            line: None,
            column: None,
            stack: None,
            severity: Severity::Error,
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

/// Inputs for one invocation of the runner.
///
/// `services` overrides the stubbed host-service names; `None` selects the
/// builder's default list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunOptions {
    pub target: Chunk,
    #[serde(default)]
    pub bootstrap: Option<Chunk>,
    #[serde(default)]
    pub preloads: Vec<Chunk>,
    #[serde(default)]
    pub services: Option<Vec<String>>,
}

impl RunOptions {
    pub fn new(target: Chunk) -> Self {
        Self {
            target,
            bootstrap: None,
            preloads: Vec::new(),
            services: None,
        }
    }

    pub fn with_bootstrap(mut self, bootstrap: Chunk) -> Self {
        self.bootstrap = Some(bootstrap);
        self
    }

    pub fn with_preloads(mut self, preloads: Vec<Chunk>) -> Self {
        self.preloads = preloads;
        self
    }

    pub fn with_services(mut self, services: Vec<String>) -> Self {
        self.services = Some(services);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunResult {
    pub success: bool,
    pub duration_ms: u64,
    pub errors: Vec<Diagnostic>,
    pub output: Vec<String>,
}

impl RunResult {
    /// Builds a result whose `success` flag is derived from the diagnostics.
    pub fn new(duration_ms: u64, errors: Vec<Diagnostic>, output: Vec<String>) -> Self {
        Self {
            success: !errors.iter().any(Diagnostic::is_error),
            duration_ms,
            errors,
            output,
        }
    }

    pub fn first_error(&self) -> Option<&Diagnostic> {
        self.errors.iter().find(|diagnostic| diagnostic.is_error())
    }
}
