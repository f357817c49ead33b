use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::Path;

use dlg_core::{normalize_id, DialogueError, ParsedDocument};
use dlg_parser::parse_document;
use dlg_runtime::{
    ConversationRegistry, Diagnostic, DiagnosticKind, DialogueEngine, DialogueEngineOptions,
};

pub const DEFAULT_ENTRY_CONVERSATION: &str = "main";
/// Document file looked up when a directory is given instead of a file.
pub const DIALOGUE_FILE_NAME: &str = "dialogue.json";

pub struct CreateEngineOptions {
    pub document_json: String,
    pub entry_conversation: Option<String>,
    pub engine: DialogueEngineOptions,
}

pub fn compile_document(source: &str) -> Result<ParsedDocument, DialogueError> {
    parse_document(source)
}

pub fn read_document_file(path: &Path) -> Result<String, DialogueError> {
    fs::read_to_string(path).map_err(|error| {
        DialogueError::new(
            "API_DOCUMENT_READ",
            format!("Failed to read {}: {}", path.display(), error),
        )
    })
}

/// Builds an engine for the document and starts the entry conversation.
pub fn create_engine_from_json(
    options: CreateEngineOptions,
) -> Result<DialogueEngine, DialogueError> {
    let document = compile_document(&options.document_json)?;
    let registry = ConversationRegistry::from_document(&document);
    let entry = resolve_entry_conversation(&registry, options.entry_conversation)?;
    tracing::debug!(entry = %entry.trim(), "resolved entry conversation");

    let mut engine = DialogueEngine::with_document(options.engine, document);
    if !engine.start(&entry) {
        let reason = engine
            .take_diagnostics()
            .pop()
            .map(|diagnostic| diagnostic.to_error())
            .unwrap_or_else(|| {
                DialogueError::new("API_START_FAILED", format!("Could not start '{}'.", entry))
            });
        return Err(reason);
    }
    Ok(engine)
}

pub fn resolve_entry_conversation(
    registry: &ConversationRegistry,
    explicit: Option<String>,
) -> Result<String, DialogueError> {
    if let Some(entry) = explicit {
        if !registry.contains(&entry) {
            return Err(DialogueError::new(
                "API_ENTRY_NOT_FOUND",
                format!(
                    "Entry conversation \"{}\" is not defined. Known: {}",
                    entry.trim(),
                    registry.known_ids().join(", ")
                ),
            ));
        }
        return Ok(entry);
    }

    if registry.contains(DEFAULT_ENTRY_CONVERSATION) {
        return Ok(DEFAULT_ENTRY_CONVERSATION.to_string());
    }

    Err(DialogueError::new(
        "API_ENTRY_MAIN_NOT_FOUND",
        "Expected a conversation named \"main\" as default entry.",
    ))
}

/// Static authoring checks: dangling `goto` targets and entry jumps that loop
/// forever without showing a line.
pub fn validate_document(document: &ParsedDocument) -> Vec<Diagnostic> {
    let registry = ConversationRegistry::from_document(document);
    let known_ids = registry.known_ids();
    let mut diagnostics = Vec::new();

    for conversation in registry.iter() {
        for (index, node) in conversation.nodes().iter().enumerate() {
            if let Some(target) = node.jump_target() {
                if !registry.contains(target) {
                    diagnostics.push(Diagnostic::conversation_not_found(
                        "CHECK_JUMP_TARGET_NOT_FOUND",
                        &format!("{}[{}] goto", conversation.id(), index),
                        target,
                        &known_ids,
                    ));
                }
            }
            for choice in &node.choices {
                if !registry.contains(&choice.target) {
                    diagnostics.push(Diagnostic::conversation_not_found(
                        "CHECK_CHOICE_TARGET_NOT_FOUND",
                        &format!("{}[{}] choice goto", conversation.id(), index),
                        &choice.target,
                        &known_ids,
                    ));
                }
            }
        }
    }

    diagnostics.extend(find_entry_jump_cycles(&registry));
    diagnostics
}

fn find_entry_jump_cycles(registry: &ConversationRegistry) -> Vec<Diagnostic> {
    // A conversation whose first node jumps is left before anything renders.
    let entry_jumps = registry
        .iter()
        .filter_map(|conversation| {
            let target = conversation.node(0)?.jump_target()?;
            let next = registry.lookup(target)?;
            Some((normalize_id(conversation.id()), next))
        })
        .collect::<BTreeMap<_, _>>();

    let mut reported = BTreeSet::new();
    let mut diagnostics = Vec::new();
    for start in entry_jumps.keys() {
        let mut path = vec![start.clone()];
        let mut current = start.clone();
        while let Some(next) = entry_jumps.get(&current) {
            let next_key = normalize_id(next.id());
            if let Some(position) = path.iter().position(|key| key == &next_key) {
                let mut cycle = path[position..].to_vec();
                cycle.sort();
                if reported.insert(cycle.clone()) {
                    diagnostics.push(Diagnostic {
                        kind: DiagnosticKind::JumpLimitExceeded,
                        code: "CHECK_JUMP_CYCLE".to_string(),
                        message: format!(
                            "goto cycle never shows a line: {} -> {}",
                            path[position..].join(" -> "),
                            next_key
                        ),
                    });
                }
                break;
            }
            path.push(next_key.clone());
            current = next_key;
        }
    }
    diagnostics
}
