use dlg_api::{create_engine_from_json, CreateEngineOptions};
use dlg_core::{DialogueError, PresentationEvent};
use dlg_runtime::{Diagnostic, DialogueCommand, DialogueEngine, DialogueEngineOptions, EventBuffer};

use crate::LoadedDialogue;

/// A running engine wired to an event buffer the front ends drain after
/// every command.
pub(crate) struct PlaySession {
    pub(crate) dialogue: LoadedDialogue,
    pub(crate) entry: Option<String>,
    pub(crate) engine: DialogueEngine,
    events: EventBuffer,
}

impl PlaySession {
    pub(crate) fn open(
        dialogue: LoadedDialogue,
        entry: Option<String>,
    ) -> Result<Self, DialogueError> {
        let events = EventBuffer::new();
        let engine = create_session_engine(&dialogue, entry.clone(), &events)?;
        Ok(Self {
            dialogue,
            entry,
            engine,
            events,
        })
    }

    /// Rebuilds the engine from the same document, dropping variable changes.
    pub(crate) fn restart(&mut self) -> Result<(), DialogueError> {
        self.events.drain();
        self.engine = create_session_engine(&self.dialogue, self.entry.clone(), &self.events)?;
        Ok(())
    }

    pub(crate) fn dispatch(&mut self, command: DialogueCommand) -> bool {
        self.engine.dispatch(command)
    }

    pub(crate) fn drain_events(&self) -> Vec<PresentationEvent> {
        self.events.drain()
    }

    pub(crate) fn take_diagnostics(&mut self) -> Vec<Diagnostic> {
        self.engine.take_diagnostics()
    }
}

fn create_session_engine(
    dialogue: &LoadedDialogue,
    entry: Option<String>,
    events: &EventBuffer,
) -> Result<DialogueEngine, DialogueError> {
    create_engine_from_json(CreateEngineOptions {
        document_json: dialogue.source.clone(),
        entry_conversation: entry,
        engine: DialogueEngineOptions {
            presentation: Some(Box::new(events.clone())),
            ..DialogueEngineOptions::default()
        },
    })
}
