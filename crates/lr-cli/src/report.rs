use lr_core::{RunResult, RunnerError};
use serde::Serialize;

use crate::map_cli_report_json;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CheckEntry {
    pub(crate) chunk_name: String,
    pub(crate) result: RunResult,
}

pub(crate) fn exit_code(success: bool) -> i32 {
    if success {
        0
    } else {
        1
    }
}

pub(crate) fn render_result(result: &RunResult) -> Vec<String> {
    let mut lines = vec![
        format!("RESULT:{}", status(result.success)),
        format!("DURATION_MS:{}", result.duration_ms),
    ];
    lines.extend(result.output.iter().map(|line| {
        format!(
            "OUTPUT_JSON:{}",
            serde_json::to_string(line).expect("string json")
        )
    }));
    lines.extend(result.errors.iter().map(|diagnostic| {
        format!(
            "ERROR_JSON:{}",
            serde_json::to_string(diagnostic).expect("diagnostic json")
        )
    }));
    lines
}

pub(crate) fn render_check(entries: &[CheckEntry]) -> Vec<String> {
    let mut lines = Vec::new();
    let mut failed = 0usize;
    for entry in entries {
        if !entry.result.success {
            failed += 1;
        }
        lines.push(format!(
            "CHECK:{}:{}",
            entry.chunk_name,
            status(entry.result.success)
        ));
        lines.extend(entry.result.errors.iter().map(|diagnostic| {
            format!(
                "ERROR_JSON:{}",
                serde_json::to_string(diagnostic).expect("diagnostic json")
            )
        }));
    }
    lines.push(format!("CHECKED:{} FAILED:{}", entries.len(), failed));
    lines.push(format!("RESULT:{}", status(failed == 0)));
    lines
}

pub(crate) fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String, RunnerError> {
    serde_json::to_string_pretty(value).map_err(map_cli_report_json)
}

fn status(success: bool) -> &'static str {
    if success {
        "OK"
    } else {
        "ERROR"
    }
}
