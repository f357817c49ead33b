use std::path::PathBuf;

use dlg_api::read_document_file;
use dlg_core::DialogueError;

use crate::{map_cli_source_path, LoadedDialogue, DIALOGUE_FILE_NAME};

pub(crate) fn load_dialogue(dialogue: &str) -> Result<LoadedDialogue, DialogueError> {
    let path = resolve_dialogue_path(dialogue)?;
    let source = read_document_file(&path)?;
    let title = make_dialogue_title(&path);
    Ok(LoadedDialogue {
        path,
        title,
        source,
    })
}

/// Accepts a document file or a directory holding `dialogue.json`.
pub(crate) fn resolve_dialogue_path(dialogue: &str) -> Result<PathBuf, DialogueError> {
    let path = PathBuf::from(dialogue);
    let absolute = if path.is_absolute() {
        path
    } else {
        std::env::current_dir()
            .map_err(map_cli_source_path)?
            .join(path)
    };

    if !absolute.exists() {
        return Err(DialogueError::new(
            "CLI_SOURCE_NOT_FOUND",
            format!("dialogue does not exist: {}", absolute.display()),
        ));
    }

    if absolute.is_dir() {
        let file = absolute.join(DIALOGUE_FILE_NAME);
        if !file.is_file() {
            return Err(DialogueError::new(
                "CLI_SOURCE_NOT_FILE",
                format!(
                    "directory has no {}: {}",
                    DIALOGUE_FILE_NAME,
                    absolute.display()
                ),
            ));
        }
        return Ok(file);
    }

    Ok(absolute)
}

pub(crate) fn make_dialogue_title(path: &std::path::Path) -> String {
    let named = if path.file_name().and_then(|name| name.to_str()) == Some(DIALOGUE_FILE_NAME) {
        path.parent().and_then(|parent| parent.file_name())
    } else {
        path.file_stem()
    };
    named
        .and_then(|name| name.to_str())
        .unwrap_or("dialogue")
        .to_string()
}
