use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use dlg_core::DialogueError;
use dlg_runtime::DialogueCommand;

use crate::tui_state::TuiUiState;
use crate::PlaySession;

/// Applies one key press. Returns `true` when the UI should close.
pub(crate) fn handle_key(
    key: KeyEvent,
    session: &mut PlaySession,
    ui: &mut TuiUiState,
) -> Result<bool, DialogueError> {
    if key.code == KeyCode::Esc || matches!(key.code, KeyCode::Char('q')) {
        return Ok(true);
    }
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return Ok(true);
    }

    match key.code {
        KeyCode::Char('h') => {
            ui.help_visible = !ui.help_visible;
        }
        KeyCode::Char('r') => {
            session.restart()?;
            ui.reset();
            sync_session(session, ui);
            ui.status = "restarted".to_string();
        }
        KeyCode::Char('e') => {
            if session.dispatch(DialogueCommand::End) {
                ui.status = "ended".to_string();
            }
            sync_session(session, ui);
        }
        KeyCode::Up | KeyCode::Down => {
            if ui.typing_in_progress() {
                ui.status = "text streaming...".to_string();
            } else if ui.choices.is_empty() {
                ui.status = "no pending choice".to_string();
            } else if key.code == KeyCode::Up {
                ui.select_previous();
            } else {
                ui.select_next();
            }
        }
        KeyCode::Enter | KeyCode::Char(' ') => {
            if ui.typing_in_progress() {
                ui.finish_typing();
                return Ok(false);
            }
            if ui.ended {
                ui.status = "conversation ended, r restart, q quit".to_string();
                return Ok(false);
            }
            let command = match ui.selected_choice() {
                Some(index) => DialogueCommand::Choose(index),
                None => DialogueCommand::Advance,
            };
            if let DialogueCommand::Choose(index) = command {
                ui.status = format!("chose {}", index);
            }
            session.dispatch(command);
            sync_session(session, ui);
        }
        _ => {}
    }

    Ok(false)
}

pub(crate) fn sync_session(session: &mut PlaySession, ui: &mut TuiUiState) {
    ui.apply_events(session.drain_events());
    ui.apply_diagnostics(session.take_diagnostics());
}
