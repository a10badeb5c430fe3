use std::any::Any;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::time::Instant;

use lr_core::{Chunk, Diagnostic, RunOptions, RunResult, ENVIRONMENT_CHUNK_NAME, HOST_CHUNK_NAME};
use lr_prelude::{build_environment_source, default_services};

use crate::{install_output_bridge, translate, Interpreter, LuauInterpreter, Transcript};

const TRUNCATION_MARKER: &str = "...";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stage {
    Environment,
    Bootstrap,
    Preload(usize),
    Target,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Environment => f.write_str("environment"),
            Self::Bootstrap => f.write_str("bootstrap"),
            Self::Preload(index) => write!(f, "preload[{index}]"),
            Self::Target => f.write_str("target"),
        }
    }
}

/// Runs `options` in a fresh Luau state.
pub fn run(options: &RunOptions) -> RunResult {
    run_with::<LuauInterpreter>(options)
}

/// Runs `options` in a fresh `I`. Never fails: every problem is reported as a
/// diagnostic in the returned result, alongside whatever output was captured.
pub fn run_with<I: Interpreter>(options: &RunOptions) -> RunResult {
    let span = tracing::debug_span!("run", chunk = %options.target.chunk_name);
    let _entered = span.enter();

    let started = Instant::now();
    let transcript = Transcript::default();
    let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
        run_pipeline::<I>(options, &transcript)
    }));

    let errors = match outcome {
        Ok(Ok(())) => Vec::new(),
        Ok(Err(errors)) => errors,
        Err(payload) => {
            let message = panic_message(payload.as_ref());
            tracing::warn!(%message, "runner panicked");
            vec![Diagnostic::error(
                HOST_CHUNK_NAME,
                format!("Runner failure: {message}"),
            )]
        }
    };

    let duration_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
    let result = RunResult::new(duration_ms, errors, transcript.lines());
    tracing::debug!(
        success = result.success,
        duration_ms,
        errors = result.errors.len(),
        output = result.output.len(),
        "run finished"
    );
    result
}

/// Identity a chunk is compiled under. The `@` marker makes the interpreter
/// print the bare name in its error positions.
pub fn chunk_identity(chunk_name: &str) -> String {
    format!("@{chunk_name}")
}

// The interpreter is owned by this frame and closed on every return path.
fn run_pipeline<I: Interpreter>(
    options: &RunOptions,
    transcript: &Transcript,
) -> Result<(), Vec<Diagnostic>> {
    let interpreter =
        I::create().map_err(|raw| host_failure("Failed to create interpreter", &raw))?;
    install_output_bridge(&interpreter, transcript)
        .map_err(|raw| host_failure("Failed to install output hooks", &raw))?;

    let defaults;
    let services = match &options.services {
        Some(services) => services.as_slice(),
        None => {
            defaults = default_services();
            defaults.as_slice()
        }
    };
    let environment = Chunk::new(ENVIRONMENT_CHUNK_NAME, build_environment_source(services));
    let known = known_chunk_names(options);
    run_stage(&interpreter, Stage::Environment, &environment, &known)
        .map_err(environment_failure)?;

    if let Some(bootstrap) = &options.bootstrap {
        run_stage(&interpreter, Stage::Bootstrap, bootstrap, &known)?;
    }

    for (index, preload) in options.preloads.iter().enumerate() {
        run_stage(&interpreter, Stage::Preload(index), preload, &known)?;
    }

    run_stage(&interpreter, Stage::Target, &options.target, &known)
}

/// Every chunk name a diagnostic from this run may refer to.
fn known_chunk_names(options: &RunOptions) -> Vec<&str> {
    let mut names = vec![options.target.chunk_name.as_str()];
    names.extend(options.preloads.iter().map(|chunk| chunk.chunk_name.as_str()));
    names.extend(options.bootstrap.iter().map(|chunk| chunk.chunk_name.as_str()));
    names
}

fn run_stage<I: Interpreter>(
    interpreter: &I,
    stage: Stage,
    chunk: &Chunk,
    known: &[&str],
) -> Result<(), Vec<Diagnostic>> {
    tracing::debug!(%stage, chunk = %chunk.chunk_name, "running chunk");
    let identity = chunk_identity(&chunk.chunk_name);
    let unit = interpreter
        .compile(&chunk.code, &identity)
        .map_err(|raw| stage_failure(stage, chunk, known, "compile", &raw))?;
    interpreter
        .execute(unit)
        .map_err(|raw| stage_failure(stage, chunk, known, "execute", &raw))
}

fn stage_failure(
    stage: Stage,
    chunk: &Chunk,
    known: &[&str],
    phase: &str,
    raw: &str,
) -> Vec<Diagnostic> {
    let mut diagnostics = translate(raw, &chunk.chunk_name);
    for diagnostic in &mut diagnostics {
        restore_truncated_identity(diagnostic, &chunk.chunk_name, known);
    }
    tracing::debug!(
        %stage,
        chunk = %chunk.chunk_name,
        phase,
        count = diagnostics.len(),
        "chunk failed"
    );
    diagnostics
}

/// The interpreter shortens long chunk identities to `...<tail>` in its error
/// text. Maps such a name back to the full chunk name it was cut from,
/// preferring the chunk that was running.
fn restore_truncated_identity(diagnostic: &mut Diagnostic, current: &str, known: &[&str]) {
    let name = diagnostic.chunk_name.as_str();
    if name == current || known.contains(&name) {
        return;
    }
    let Some(tail) = name.strip_prefix(TRUNCATION_MARKER) else {
        return;
    };
    let full = std::iter::once(current)
        .chain(known.iter().copied())
        .find(|candidate| candidate.len() > tail.len() && candidate.ends_with(tail));
    if let Some(full) = full {
        diagnostic.chunk_name = full.to_string();
    }
}

fn environment_failure(diagnostics: Vec<Diagnostic>) -> Vec<Diagnostic> {
    let mut wrapped = diagnostics.into_iter().next().unwrap_or_else(|| {
        Diagnostic::error(ENVIRONMENT_CHUNK_NAME, crate::UNKNOWN_ERROR_MESSAGE)
    });
    wrapped.message = format!("Failed to install stub environment: {}", wrapped.message);
    wrapped.chunk_name = ENVIRONMENT_CHUNK_NAME.to_string();
    vec![wrapped]
}

fn host_failure(context: &str, raw: &str) -> Vec<Diagnostic> {
    tracing::warn!(context, error = raw, "host failure");
    vec![Diagnostic::error(HOST_CHUNK_NAME, format!("{context}: {raw}"))]
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}
