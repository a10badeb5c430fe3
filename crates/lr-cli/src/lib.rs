use std::ffi::OsString;

use clap::Parser;
use lr_core::RunnerError;
use lr_prelude::DEFAULT_SERVICES;

mod cli_args;
mod error_map;
mod report;
mod source_loader;

pub(crate) use cli_args::{CheckArgs, Cli, Mode, RunArgs, StageArgs};
pub(crate) use error_map::{
    emit_error, map_cli_report_json, map_cli_source_path, map_cli_source_read,
    map_cli_source_scan, map_cli_source_walk,
};
pub(crate) use report::{exit_code, render_check, render_result, to_json, CheckEntry};
pub(crate) use source_loader::{
    discover_scripts, load_shared_stages, read_chunk, resolve_file, resolve_scripts_dir,
};

pub fn run_cli_from_args<I, T>(args: I) -> i32
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let cli = match Cli::try_parse_from(args) {
        Ok(cli) => cli,
        Err(error) => {
            let _ = error.print();
            return error.exit_code();
        }
    };
    match run(cli) {
        Ok(code) => code,
        Err(error) => emit_error(error),
    }
}

fn run(cli: Cli) -> Result<i32, RunnerError> {
    match cli.command {
        Mode::Run(args) => run_file(args),
        Mode::Check(args) => run_check(args),
        Mode::Services => {
            for service in DEFAULT_SERVICES {
                println!("{service}");
            }
            Ok(0)
        }
    }
}

fn run_file(args: RunArgs) -> Result<i32, RunnerError> {
    let shared = load_shared_stages(&args.stages)?;
    let path = resolve_file(&args.file)?;
    let target = read_chunk(&path, &args.file)?;

    let result = lr_runtime::run(&shared.options_for(target));
    tracing::info!(
        file = %args.file,
        success = result.success,
        duration_ms = result.duration_ms,
        "run complete"
    );

    if args.stages.json {
        println!("{}", to_json(&result)?);
    } else {
        for line in render_result(&result) {
            println!("{line}");
        }
    }
    Ok(exit_code(result.success))
}

fn run_check(args: CheckArgs) -> Result<i32, RunnerError> {
    let shared = load_shared_stages(&args.stages)?;
    let scripts_dir = resolve_scripts_dir(&args.scripts_dir)?;

    let mut entries = Vec::new();
    for (chunk_name, path) in discover_scripts(&scripts_dir)? {
        let canonical = path.canonicalize().map_err(map_cli_source_path)?;
        if shared.contains(&canonical) {
            tracing::debug!(chunk = %chunk_name, "skipping shared stage file");
            continue;
        }
        let target = read_chunk(&path, &chunk_name)?;
        let result = lr_runtime::run(&shared.options_for(target));
        tracing::info!(chunk = %chunk_name, success = result.success, "checked");
        entries.push(CheckEntry { chunk_name, result });
    }

    let success = entries.iter().all(|entry| entry.result.success);
    if args.stages.json {
        println!("{}", to_json(&entries)?);
    } else {
        for line in render_check(&entries) {
            println!("{line}");
        }
    }
    Ok(exit_code(success))
}
