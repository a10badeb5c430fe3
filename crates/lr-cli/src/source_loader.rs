use std::fs;
use std::path::{Path, PathBuf};

use lr_core::{Chunk, RunOptions, RunnerError};
use walkdir::WalkDir;

use crate::{
    map_cli_source_path, map_cli_source_read, map_cli_source_scan, map_cli_source_walk,
    StageArgs,
};

const SCRIPT_EXTENSIONS: &[&str] = &["luau", "lua"];

/// Bootstrap and preload chunks shared by every target of one invocation.
#[derive(Debug, Clone)]
pub(crate) struct SharedStages {
    pub(crate) bootstrap: Option<Chunk>,
    pub(crate) preloads: Vec<Chunk>,
    pub(crate) services: Option<Vec<String>>,
    pub(crate) paths: Vec<PathBuf>,
}

impl SharedStages {
    pub(crate) fn options_for(&self, target: Chunk) -> RunOptions {
        RunOptions {
            target,
            bootstrap: self.bootstrap.clone(),
            preloads: self.preloads.clone(),
            services: self.services.clone(),
        }
    }

    pub(crate) fn contains(&self, path: &Path) -> bool {
        self.paths.iter().any(|shared| shared == path)
    }
}

pub(crate) fn load_shared_stages(stages: &StageArgs) -> Result<SharedStages, RunnerError> {
    let mut paths = Vec::new();

    let bootstrap = match &stages.bootstrap {
        Some(raw) => {
            let path = resolve_file(raw)?;
            let chunk = read_chunk(&path, raw)?;
            paths.push(path);
            Some(chunk)
        }
        None => None,
    };

    let mut preloads = Vec::with_capacity(stages.preloads.len());
    for raw in &stages.preloads {
        let path = resolve_file(raw)?;
        preloads.push(read_chunk(&path, raw)?);
        paths.push(path);
    }

    let services = (!stages.services.is_empty()).then(|| stages.services.clone());

    Ok(SharedStages {
        bootstrap,
        preloads,
        services,
        paths,
    })
}

pub(crate) fn read_chunk(path: &Path, chunk_name: &str) -> Result<Chunk, RunnerError> {
    let code = fs::read_to_string(path).map_err(map_cli_source_read)?;
    Ok(Chunk::new(chunk_name, code))
}

/// Absolute, canonical path of an existing file.
pub(crate) fn resolve_file(raw: &str) -> Result<PathBuf, RunnerError> {
    let absolute = absolutize(raw)?;
    if !absolute.exists() {
        return Err(RunnerError::new(
            "CLI_SOURCE_NOT_FOUND",
            format!("script does not exist: {}", absolute.display()),
        ));
    }
    if !absolute.is_file() {
        return Err(RunnerError::new(
            "CLI_SOURCE_NOT_FILE",
            format!("script is not a file: {}", absolute.display()),
        ));
    }
    absolute.canonicalize().map_err(map_cli_source_path)
}

pub(crate) fn resolve_scripts_dir(scripts_dir: &str) -> Result<PathBuf, RunnerError> {
    let absolute = absolutize(scripts_dir)?;

    if !absolute.exists() {
        return Err(RunnerError::new(
            "CLI_SOURCE_NOT_FOUND",
            format!("scripts-dir does not exist: {}", absolute.display()),
        ));
    }

    if !absolute.is_dir() {
        return Err(RunnerError::new(
            "CLI_SOURCE_NOT_DIR",
            format!("scripts-dir is not a directory: {}", absolute.display()),
        ));
    }

    absolute.canonicalize().map_err(map_cli_source_path)
}

/// Script files under `scripts_dir` keyed by their `/`-separated relative path, sorted.
pub(crate) fn discover_scripts(scripts_dir: &Path) -> Result<Vec<(String, PathBuf)>, RunnerError> {
    let mut scripts = Vec::new();

    for entry in WalkDir::new(scripts_dir).follow_links(false) {
        let entry = entry.map_err(map_cli_source_walk)?;
        if !entry.file_type().is_file() || !is_script(entry.path()) {
            continue;
        }

        let relative = entry
            .path()
            .strip_prefix(scripts_dir)
            .map_err(map_cli_source_scan)?
            .to_string_lossy()
            .replace('\\', "/");
        scripts.push((relative, entry.path().to_path_buf()));
    }

    if scripts.is_empty() {
        return Err(RunnerError::new(
            "CLI_SOURCE_EMPTY",
            format!("No .luau/.lua files under {}.", scripts_dir.display()),
        ));
    }

    scripts.sort_by(|left, right| left.0.cmp(&right.0));
    Ok(scripts)
}

fn is_script(path: &Path) -> bool {
    path.extension()
        .and_then(|extension| extension.to_str())
        .is_some_and(|extension| SCRIPT_EXTENSIONS.contains(&extension))
}

fn absolutize(raw: &str) -> Result<PathBuf, RunnerError> {
    let path = PathBuf::from(raw);
    if path.is_absolute() {
        Ok(path)
    } else {
        Ok(std::env::current_dir()
            .map_err(map_cli_source_path)?
            .join(path))
    }
}
