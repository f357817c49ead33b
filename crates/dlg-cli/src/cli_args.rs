use clap::{Args, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "dlg-cli")]
#[command(about = "Branching dialogue player")]
pub(crate) struct Cli {
    /// trace, debug, info, warn or error. Logs go to stderr.
    #[arg(long = "log-level", global = true, default_value = "warn")]
    pub(crate) log_level: String,
    #[command(subcommand)]
    pub(crate) command: Mode,
}

#[derive(Debug, Subcommand)]
pub(crate) enum Mode {
    /// Plays a dialogue on stdin/stdout.
    Play(PlayArgs),
    /// Plays a dialogue in a full-screen terminal UI.
    Tui(PlayArgs),
    /// Validates a dialogue file without playing it.
    Check(CheckArgs),
}

#[derive(Debug, Args)]
pub(crate) struct PlayArgs {
    #[arg(long = "dialogue")]
    pub(crate) dialogue: String,
    #[arg(long = "start")]
    pub(crate) start: Option<String>,
}

#[derive(Debug, Args)]
pub(crate) struct CheckArgs {
    #[arg(long = "dialogue")]
    pub(crate) dialogue: String,
}
