use std::io::{self, BufRead, Write};

use dlg_core::{DialogueError, PresentationEvent, RunPhase};
use dlg_runtime::{Diagnostic, DialogueCommand};

use crate::{format_dialogue_line, map_tui_io, LineCommandAction, PlaySession};

pub(crate) const LINE_HELP: &str =
    "commands: <enter> advance | <n> choose | :start <id> | :end | :vars | :restart | :help | :quit";

pub(crate) fn run_line_mode(session: &mut PlaySession) -> Result<i32, DialogueError> {
    let stdin = io::stdin();
    let mut reader = stdin.lock();
    let mut writer = io::stdout();
    run_line_mode_with_io(session, &mut reader, &mut writer)
}

pub(crate) fn run_line_mode_with_io(
    session: &mut PlaySession,
    reader: &mut dyn BufRead,
    writer: &mut dyn Write,
) -> Result<i32, DialogueError> {
    writeln!(writer, "Dialogue: {}", session.dialogue.title).map_err(map_tui_io)?;
    writeln!(writer, "{}", LINE_HELP).map_err(map_tui_io)?;

    loop {
        write_events(session.drain_events(), writer)?;
        write_diagnostics(session.take_diagnostics(), writer)?;
        if !session.engine.is_active() {
            return Ok(0);
        }

        let Some(raw) = prompt_input_from("> ", reader, writer)? else {
            return Ok(0);
        };
        let raw = raw.trim();
        match handle_line_command(raw, session, writer)? {
            LineCommandAction::Continue => continue,
            LineCommandAction::Quit => return Ok(0),
            LineCommandAction::NotHandled => {}
        }

        let Some(command) = parse_play_input(raw) else {
            writeln!(writer, "unrecognized input: {} (:help)", raw).map_err(map_tui_io)?;
            continue;
        };
        if !session.dispatch(command.clone()) {
            writeln!(writer, "{}", rejected_hint(session, &command)).map_err(map_tui_io)?;
        }
    }
}

/// Empty input advances, a number picks a choice.
pub(crate) fn parse_play_input(raw: &str) -> Option<DialogueCommand> {
    if raw.is_empty() {
        return Some(DialogueCommand::Advance);
    }
    raw.parse::<usize>().ok().map(DialogueCommand::Choose)
}

pub(crate) fn handle_line_command(
    raw: &str,
    session: &mut PlaySession,
    writer: &mut dyn Write,
) -> Result<LineCommandAction, DialogueError> {
    if let Some(id) = raw.strip_prefix(":start ") {
        session.dispatch(DialogueCommand::Start(id.trim().to_string()));
        return Ok(LineCommandAction::Continue);
    }

    match raw {
        ":help" => {
            writeln!(writer, "{}", LINE_HELP).map_err(map_tui_io)?;
            Ok(LineCommandAction::Continue)
        }
        ":end" => {
            session.dispatch(DialogueCommand::End);
            Ok(LineCommandAction::Continue)
        }
        ":vars" => {
            if session.engine.variables().is_empty() {
                writeln!(writer, "(no variables)").map_err(map_tui_io)?;
            }
            for (name, value) in session.engine.variables().iter() {
                let rendered =
                    serde_json::to_string(value).unwrap_or_else(|_| value.type_name().to_string());
                writeln!(writer, "{} = {}", name, rendered).map_err(map_tui_io)?;
            }
            Ok(LineCommandAction::Continue)
        }
        ":restart" => {
            session.restart()?;
            writeln!(writer, "restarted").map_err(map_tui_io)?;
            Ok(LineCommandAction::Continue)
        }
        ":quit" => {
            writeln!(writer, "bye").map_err(map_tui_io)?;
            Ok(LineCommandAction::Quit)
        }
        _ => Ok(LineCommandAction::NotHandled),
    }
}

fn rejected_hint(session: &PlaySession, command: &DialogueCommand) -> String {
    let count = session.engine.pending_choices().len();
    match command {
        DialogueCommand::Advance if session.engine.phase() == RunPhase::AwaitingChoice => {
            format!("pick a choice between 0 and {}", count.saturating_sub(1))
        }
        DialogueCommand::Choose(index) if count == 0 => {
            format!("no choice {} here, press enter to continue", index)
        }
        DialogueCommand::Choose(index) => format!("no choice {} (0-{})", index, count - 1),
        _ => "nothing to do".to_string(),
    }
}

pub(crate) fn write_events(
    events: Vec<PresentationEvent>,
    writer: &mut dyn Write,
) -> Result<(), DialogueError> {
    for event in events {
        match event {
            PresentationEvent::Line { speaker, text } => {
                writeln!(writer).map_err(map_tui_io)?;
                writeln!(writer, "{}", format_dialogue_line(&speaker, &text))
                    .map_err(map_tui_io)?;
            }
            PresentationEvent::Choices { items } => {
                for item in &items {
                    writeln!(writer, "  [{}] {}", item.index, item.text).map_err(map_tui_io)?;
                }
            }
            PresentationEvent::ChoicesCleared => {}
            PresentationEvent::Hidden => {
                writeln!(writer).map_err(map_tui_io)?;
                writeln!(writer, "[END]").map_err(map_tui_io)?;
            }
        }
    }
    Ok(())
}

fn write_diagnostics(
    diagnostics: Vec<Diagnostic>,
    writer: &mut dyn Write,
) -> Result<(), DialogueError> {
    for diagnostic in diagnostics {
        writeln!(writer, "! {}: {}", diagnostic.code, diagnostic.message).map_err(map_tui_io)?;
    }
    Ok(())
}

/// Reads one line. `None` at end of input.
pub(crate) fn prompt_input_from(
    prefix: &str,
    reader: &mut dyn BufRead,
    writer: &mut dyn Write,
) -> Result<Option<String>, DialogueError> {
    write!(writer, "{}", prefix).map_err(map_tui_io)?;
    writer.flush().map_err(map_tui_io)?;
    let mut input = String::new();
    let read = reader.read_line(&mut input).map_err(map_tui_io)?;
    if read == 0 {
        return Ok(None);
    }
    Ok(Some(input.trim_end_matches(&['\r', '\n'][..]).to_string()))
}
