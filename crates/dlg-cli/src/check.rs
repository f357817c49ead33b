use dlg_api::{compile_document, validate_document};
use dlg_core::{DialogueError, ParsedDocument};
use dlg_runtime::ConversationRegistry;

use crate::{load_dialogue, CheckArgs};

/// Exit code when the document parses but has authoring warnings.
pub(crate) const CHECK_WARNINGS_EXIT_CODE: i32 = 2;

pub(crate) fn run_check(args: CheckArgs) -> Result<i32, DialogueError> {
    let dialogue = load_dialogue(&args.dialogue)?;
    let document = compile_document(&dialogue.source)?;
    let (lines, clean) = render_check_report(&document);
    for line in lines {
        println!("{}", line);
    }
    Ok(if clean { 0 } else { CHECK_WARNINGS_EXIT_CODE })
}

pub(crate) fn render_check_report(document: &ParsedDocument) -> (Vec<String>, bool) {
    let registry = ConversationRegistry::from_document(document);
    let diagnostics = validate_document(document);

    let mut lines = vec![
        "RESULT:OK".to_string(),
        format!("CONVERSATIONS:{}", registry.len()),
    ];
    for conversation in registry.iter() {
        lines.push(format!(
            "CONVERSATION:{}|{}",
            conversation.id(),
            conversation.len()
        ));
    }
    lines.push(format!("VARIABLES:{}", document.variables.len()));
    for diagnostic in &diagnostics {
        lines.push(format!(
            "DIAGNOSTIC:{}|{}",
            diagnostic.code,
            serde_json::to_string(&diagnostic.message).unwrap_or_else(|_| "\"\"".to_string())
        ));
    }
    let clean = diagnostics.is_empty();
    lines.push(if clean { "STATUS:CLEAN" } else { "STATUS:WARN" }.to_string());
    (lines, clean)
}
