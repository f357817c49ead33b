#![cfg(not(coverage))]

use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Paragraph, Wrap};
use ratatui::Frame;

use crate::tui_state::{TuiUiState, CHOICE_VIEWPORT_ROWS};
use crate::LoadedDialogue;

const ELLIPSIS: &str = "…";

pub(crate) fn render_tui(frame: &mut Frame<'_>, ui: &TuiUiState, dialogue: &LoadedDialogue) {
    let terminal_width = frame.area().width as usize;
    let terminal_rows = frame.area().height as usize;

    let typing_in_progress = ui.typing_in_progress();
    let mut lines = ui.rendered_lines.clone();
    if let Some(typing) = &ui.typing_line {
        lines.push(typing.chars().take(ui.typing_chars).collect::<String>());
    }

    let content_width = (terminal_width.saturating_sub(2)).max(16);
    let wrapped_text_rows = lines
        .iter()
        .flat_map(|line| wrap_line_to_width(line, content_width))
        .collect::<Vec<_>>();

    let choice_display_enabled = !typing_in_progress && !ui.choices.is_empty();
    let choice_header_text = if choice_display_enabled {
        truncate_to_width("choices (up/down + enter):", content_width)
    } else {
        String::new()
    };

    let mut reserved_rows = 3usize + 1usize + CHOICE_VIEWPORT_ROWS + 1usize + 1usize;
    if ui.ended {
        reserved_rows += 1;
    }
    if ui.help_visible {
        reserved_rows += 1;
    }
    if !choice_header_text.is_empty() {
        reserved_rows += 1;
    }
    let visible_text_rows = terminal_rows.saturating_sub(reserved_rows).max(1);
    let clipped_text_rows = if wrapped_text_rows.len() <= visible_text_rows {
        wrapped_text_rows
    } else {
        wrapped_text_rows[wrapped_text_rows.len() - visible_text_rows..].to_vec()
    };

    let choice_text_width = content_width.saturating_sub(6).max(8);
    let visible_choice_rows = (0..CHOICE_VIEWPORT_ROWS)
        .map(|row_index| {
            if !choice_display_enabled {
                return (" ".to_string(), false);
            }
            let absolute_index = ui.choice_scroll_offset + row_index;
            let Some(choice) = ui.choices.get(absolute_index) else {
                return (" ".to_string(), false);
            };
            (
                truncate_to_width(
                    format!("[{}] {}", choice.index, choice.text).as_str(),
                    choice_text_width,
                ),
                absolute_index == ui.selected_choice_index,
            )
        })
        .collect::<Vec<_>>();

    let choice_window_text = if choice_display_enabled && ui.choices.len() > CHOICE_VIEWPORT_ROWS
    {
        truncate_to_width(
            format!(
                "window {}-{} / {}",
                ui.choice_scroll_offset + 1,
                (ui.choice_scroll_offset + CHOICE_VIEWPORT_ROWS).min(ui.choices.len()),
                ui.choices.len()
            )
            .as_str(),
            content_width,
        )
    } else {
        " ".to_string()
    };

    let header_text = truncate_to_width(
        format!("dialogue | {}", dialogue.title).as_str(),
        content_width,
    );
    let path_text = truncate_to_width(
        format!("file: {}", dialogue.path.display()).as_str(),
        content_width,
    );
    let status_text = truncate_to_width(format!("status: {}", ui.status).as_str(), content_width);
    let divider_line = "─".repeat(content_width);
    let key_text = truncate_to_width(
        "keys: enter/space advance or choose | up/down move | e end | r restart | h help | q quit",
        content_width,
    );
    let help_text = truncate_to_width(
        "enter while text is streaming shows the whole line. choices appear once the line is done.",
        content_width,
    );

    let mut lines_out: Vec<Line<'_>> = Vec::new();
    lines_out.push(Line::from(header_text));
    lines_out.push(Line::from(Span::styled(
        path_text,
        Style::default().fg(Color::Gray),
    )));
    lines_out.push(Line::from(Span::styled(
        status_text,
        Style::default().fg(Color::Gray),
    )));
    for row in clipped_text_rows {
        lines_out.push(Line::from(row));
    }
    lines_out.push(Line::from(Span::styled(
        divider_line,
        Style::default().fg(Color::Gray),
    )));
    if !choice_header_text.is_empty() {
        lines_out.push(Line::from(Span::styled(
            choice_header_text,
            Style::default().fg(Color::Cyan),
        )));
    }
    for (text, selected) in visible_choice_rows {
        let prefix = if selected { "> " } else { "  " };
        let style = if selected {
            Style::default().fg(Color::Green)
        } else {
            Style::default()
        };
        lines_out.push(Line::from(Span::styled(
            format!("{}{}", prefix, text),
            style,
        )));
    }
    lines_out.push(Line::from(Span::styled(
        choice_window_text,
        Style::default().fg(Color::Gray),
    )));
    if ui.ended {
        lines_out.push(Line::from(Span::styled(
            "[end]".to_string(),
            Style::default().fg(Color::Green),
        )));
    }
    lines_out.push(Line::from(Span::styled(
        key_text,
        Style::default().fg(Color::Yellow),
    )));
    if ui.help_visible {
        lines_out.push(Line::from(Span::styled(
            help_text,
            Style::default().fg(Color::Magenta),
        )));
    }

    let paragraph = Paragraph::new(lines_out).wrap(Wrap { trim: false });
    frame.render_widget(paragraph, frame.area());
}

fn truncate_to_width(value: &str, width: usize) -> String {
    if width == 0 {
        return String::new();
    }
    let chars = value.chars().collect::<Vec<_>>();
    if chars.len() <= width {
        return value.to_string();
    }
    if width == 1 {
        return ELLIPSIS.to_string();
    }
    let mut out = chars.into_iter().take(width - 1).collect::<String>();
    out.push_str(ELLIPSIS);
    out
}

fn wrap_line_to_width(value: &str, width: usize) -> Vec<String> {
    let chars = value.chars().collect::<Vec<_>>();
    if width == 0 || chars.is_empty() {
        return vec![String::new()];
    }
    chars
        .chunks(width)
        .map(|chunk| chunk.iter().collect())
        .collect()
}
