use lr_core::RunnerError;
use std::fmt::Display;

fn map_error(code: &'static str, error: impl Display) -> RunnerError {
    RunnerError::new(code, error.to_string())
}

pub(crate) fn emit_error(error: RunnerError) -> i32 {
    println!("RESULT:ERROR");
    println!("ERROR_CODE:{}", error.code);
    println!(
        "ERROR_MSG_JSON:{}",
        serde_json::to_string(&error.message).expect("string json")
    );
    1
}

pub(crate) fn map_cli_source_path(error: std::io::Error) -> RunnerError {
    map_error("CLI_SOURCE_PATH", error)
}

pub(crate) fn map_cli_source_scan(error: std::path::StripPrefixError) -> RunnerError {
    map_error("CLI_SOURCE_SCAN", error)
}

pub(crate) fn map_cli_source_walk(error: walkdir::Error) -> RunnerError {
    map_error("CLI_SOURCE_WALK", error)
}

pub(crate) fn map_cli_source_read(error: std::io::Error) -> RunnerError {
    map_error("CLI_SOURCE_READ", error)
}

pub(crate) fn map_cli_report_json(error: serde_json::Error) -> RunnerError {
    map_error("CLI_REPORT_JSON", error)
}
