use clap::{Args, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "luau-runner")]
#[command(about = "Run engine-flavoured Luau scripts against a stub environment")]
pub(crate) struct Cli {
    #[command(subcommand)]
    pub(crate) command: Mode,
}

#[derive(Debug, Subcommand)]
pub(crate) enum Mode {
    /// Run a single file as the target chunk.
    Run(RunArgs),
    /// Run every script under a directory, each in its own interpreter.
    Check(CheckArgs),
    /// Print the default stubbed host-service names.
    Services,
}

#[derive(Debug, Args)]
pub(crate) struct StageArgs {
    #[arg(long = "bootstrap")]
    pub(crate) bootstrap: Option<String>,
    #[arg(long = "preload")]
    pub(crate) preloads: Vec<String>,
    #[arg(long = "service")]
    pub(crate) services: Vec<String>,
    #[arg(long = "json")]
    pub(crate) json: bool,
}

#[derive(Debug, Args)]
pub(crate) struct RunArgs {
    #[arg(long = "file")]
    pub(crate) file: String,
    #[command(flatten)]
    pub(crate) stages: StageArgs,
}

#[derive(Debug, Args)]
pub(crate) struct CheckArgs {
    #[arg(long = "scripts-dir")]
    pub(crate) scripts_dir: String,
    #[command(flatten)]
    pub(crate) stages: StageArgs,
}
