use std::ffi::OsString;

use clap::Parser;
use dlg_core::DialogueError;

mod check;
mod cli_args;
mod error_map;
mod line_mode;
mod logging;
mod models;
mod session;
mod source_loader;
mod tui;
mod tui_actions;
mod tui_render;
mod tui_state;

pub(crate) use check::run_check;
pub(crate) use cli_args::{CheckArgs, Cli, Mode, PlayArgs};
pub(crate) use error_map::{emit_error, map_cli_log_level, map_cli_source_path, map_tui_io};
pub(crate) use line_mode::run_line_mode;
pub(crate) use logging::init_logging;
pub(crate) use dlg_api::DIALOGUE_FILE_NAME;
pub(crate) use models::{format_dialogue_line, LineCommandAction, LoadedDialogue};
pub(crate) use session::PlaySession;
pub(crate) use source_loader::load_dialogue;

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

fn run(cli: Cli) -> Result<i32, DialogueError> {
    init_logging(&cli.log_level)?;
    match cli.command {
        Mode::Play(args) => run_play(args),
        Mode::Tui(args) => run_tui(args),
        Mode::Check(args) => run_check(args),
    }
}

fn open_session(args: PlayArgs) -> Result<PlaySession, DialogueError> {
    let dialogue = load_dialogue(&args.dialogue)?;
    tracing::info!(path = %dialogue.path.display(), "opening dialogue");
    PlaySession::open(dialogue, args.start)
}

fn run_play(args: PlayArgs) -> Result<i32, DialogueError> {
    let mut session = open_session(args)?;
    run_line_mode(&mut session)
}

fn run_tui(args: PlayArgs) -> Result<i32, DialogueError> {
    let mut session = open_session(args)?;
    tui::run_tui_mode(&mut session)
}
