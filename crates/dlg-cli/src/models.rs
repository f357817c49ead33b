use std::path::PathBuf;

#[derive(Debug, Clone)]
pub(crate) struct LoadedDialogue {
    pub(crate) path: PathBuf,
    pub(crate) title: String,
    pub(crate) source: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LineCommandAction {
    Continue,
    Quit,
    NotHandled,
}

pub(crate) fn format_dialogue_line(speaker: &str, text: &str) -> String {
    if speaker.is_empty() {
        text.to_string()
    } else {
        format!("{}: {}", speaker, text)
    }
}
