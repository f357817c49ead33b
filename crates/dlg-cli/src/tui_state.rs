use dlg_core::{ChoiceItem, PresentationEvent};
use dlg_runtime::Diagnostic;

use crate::format_dialogue_line;

pub(crate) const CHOICE_VIEWPORT_ROWS: usize = 5;

#[derive(Debug, Default)]
pub(crate) struct TuiUiState {
    pub(crate) rendered_lines: Vec<String>,
    pub(crate) pending_lines: Vec<String>,
    pub(crate) typing_line: Option<String>,
    pub(crate) typing_chars: usize,
    pub(crate) choices: Vec<ChoiceItem>,
    pub(crate) selected_choice_index: usize,
    pub(crate) choice_scroll_offset: usize,
    pub(crate) ended: bool,
    pub(crate) help_visible: bool,
    pub(crate) status: String,
}

impl TuiUiState {
    pub(crate) fn typing_in_progress(&self) -> bool {
        self.typing_line.is_some() || !self.pending_lines.is_empty()
    }

    pub(crate) fn apply_events(&mut self, events: Vec<PresentationEvent>) {
        for event in events {
            match event {
                PresentationEvent::Line { speaker, text } => {
                    if !self.rendered_lines.is_empty() || self.typing_in_progress() {
                        self.pending_lines.push(String::new());
                    }
                    self.pending_lines
                        .push(format_dialogue_line(&speaker, &text));
                    self.ended = false;
                }
                PresentationEvent::Choices { items } => {
                    self.choices = items;
                    self.selected_choice_index = 0;
                    self.choice_scroll_offset = 0;
                }
                PresentationEvent::ChoicesCleared => {
                    self.choices.clear();
                    self.selected_choice_index = 0;
                    self.choice_scroll_offset = 0;
                }
                PresentationEvent::Hidden => {
                    self.choices.clear();
                    self.ended = true;
                }
            }
        }
    }

    pub(crate) fn apply_diagnostics(&mut self, diagnostics: Vec<Diagnostic>) {
        if let Some(last) = diagnostics.last() {
            self.status = format!("{}: {}", last.code, last.message);
        }
    }

    /// Clears the transcript for a fresh run.
    pub(crate) fn reset(&mut self) {
        *self = Self {
            help_visible: self.help_visible,
            ..Self::default()
        };
    }

    pub(crate) fn advance_typewriter(&mut self) -> bool {
        let Some(line) = self.typing_line.as_ref() else {
            if self.pending_lines.is_empty() {
                return false;
            }
            let next_line = self.pending_lines.remove(0);
            if next_line.is_empty() {
                self.rendered_lines.push(next_line);
                return true;
            }
            self.typing_line = Some(next_line);
            self.typing_chars = 1;
            return true;
        };

        if self.typing_chars >= line.chars().count() {
            self.rendered_lines.push(line.clone());
            self.typing_line = None;
            self.typing_chars = 0;
            return true;
        }
        self.typing_chars += 1;
        true
    }

    pub(crate) fn finish_typing(&mut self) {
        if let Some(line) = self.typing_line.take() {
            self.rendered_lines.push(line);
        }
        self.rendered_lines.append(&mut self.pending_lines);
        self.typing_chars = 0;
    }

    pub(crate) fn select_previous(&mut self) {
        self.selected_choice_index = self.selected_choice_index.saturating_sub(1);
        if self.selected_choice_index < self.choice_scroll_offset {
            self.choice_scroll_offset = self.selected_choice_index;
        }
    }

    pub(crate) fn select_next(&mut self) {
        let last = self.choices.len().saturating_sub(1);
        self.selected_choice_index = (self.selected_choice_index + 1).min(last);
        if self.choices.len() > CHOICE_VIEWPORT_ROWS
            && self.selected_choice_index >= self.choice_scroll_offset + CHOICE_VIEWPORT_ROWS
        {
            self.choice_scroll_offset = self.selected_choice_index - CHOICE_VIEWPORT_ROWS + 1;
        }
    }

    pub(crate) fn selected_choice(&self) -> Option<usize> {
        self.choices
            .get(self.selected_choice_index)
            .map(|item| item.index)
    }
}
