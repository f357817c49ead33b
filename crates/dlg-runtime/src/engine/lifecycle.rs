use dlg_core::{ChoiceItem, DialogueError, DialogueView, ParsedDocument, RunPhase};
use dlg_parser::parse_document;

use super::{ActiveStartPolicy, DialogueEngine, DialogueEngineOptions, ReloadPolicy, RunState};
use crate::{
    ConversationRegistry, Diagnostic, DialogueListener, Diagnostics, NullPresentation,
    PresentationAdapter, VariableStore,
};

impl DialogueEngine {
    pub fn new(options: DialogueEngineOptions) -> Self {
        Self {
            registry: ConversationRegistry::new(),
            variables: VariableStore::new(),
            presentation: options
                .presentation
                .unwrap_or_else(|| Box::new(NullPresentation)),
            listeners: Vec::new(),
            diagnostics: Diagnostics::default(),
            active_start_policy: options.active_start_policy,
            reload_policy: options.reload_policy,
            max_jump_hops: options.max_jump_hops,
            run: RunState::default(),
        }
    }

    pub fn with_document(options: DialogueEngineOptions, document: ParsedDocument) -> Self {
        let mut engine = Self::new(options);
        engine.load_parsed(document);
        engine
    }

    /// Parses and installs a document. Any running conversation is ended first.
    pub fn load_document(&mut self, source: &str) -> Result<(), DialogueError> {
        self.end_if_active();
        match parse_document(source) {
            Ok(document) => {
                self.install(document);
                Ok(())
            }
            Err(error) => {
                self.diagnostics.report(Diagnostic::document(&error));
                if self.reload_policy == ReloadPolicy::ClearOnError {
                    self.registry.clear();
                    self.variables.clear();
                }
                Err(error)
            }
        }
    }

    pub fn load_parsed(&mut self, document: ParsedDocument) {
        self.end_if_active();
        self.install(document);
    }

    fn install(&mut self, document: ParsedDocument) {
        self.registry.replace_all(&document);
        self.variables = VariableStore::from_bindings(document.variables);
        tracing::info!(
            conversations = self.registry.len(),
            variables = self.variables.len(),
            "loaded dialogue document"
        );
    }

    fn end_if_active(&mut self) {
        if self.run.active {
            self.end();
        }
    }

    /// Begins `conversation_id` and shows its first line. Returns `false` when
    /// nothing was started.
    pub fn start(&mut self, conversation_id: &str) -> bool {
        let Some(conversation) = self.registry.lookup(conversation_id) else {
            let diagnostic = Diagnostic::conversation_not_found(
                "ENGINE_CONVERSATION_NOT_FOUND",
                "Dialogue",
                conversation_id.trim(),
                &self.registry.known_ids(),
            );
            self.diagnostics.report(diagnostic);
            return false;
        };

        if self.run.active {
            let active_id = self.current_conversation_id().unwrap_or_default().to_string();
            match self.active_start_policy {
                ActiveStartPolicy::Reject => {
                    self.diagnostics
                        .report(Diagnostic::already_active(&active_id, conversation.id()));
                    return false;
                }
                ActiveStartPolicy::Replace => {
                    tracing::warn!(
                        active = %active_id,
                        requested = %conversation.id(),
                        "replacing running conversation"
                    );
                }
            }
        }

        self.run = RunState {
            active: true,
            conversation: Some(conversation),
            cursor: None,
            pending: Vec::new(),
        };
        self.advance();
        true
    }

    /// Stops the run, hides the dialogue and notifies listeners. Safe to repeat.
    pub fn end(&mut self) {
        self.run = RunState::default();
        self.presentation.hide();
        for listener in &mut self.listeners {
            listener.on_ended();
        }
    }

    pub fn subscribe(&mut self, listener: Box<dyn DialogueListener>) {
        self.listeners.push(listener);
    }

    pub fn set_presentation(&mut self, presentation: Box<dyn PresentationAdapter>) {
        self.presentation = presentation;
    }

    pub fn is_active(&self) -> bool {
        self.run.active
    }

    pub fn phase(&self) -> RunPhase {
        if !self.run.active {
            RunPhase::Idle
        } else if self.run.pending.is_empty() {
            RunPhase::Displaying
        } else {
            RunPhase::AwaitingChoice
        }
    }

    pub fn current_conversation_id(&self) -> Option<&str> {
        self.run
            .conversation
            .as_ref()
            .map(|conversation| conversation.id())
    }

    /// Index of the node last entered in the current conversation.
    pub fn cursor(&self) -> Option<usize> {
        self.run.cursor
    }

    pub fn pending_choices(&self) -> Vec<ChoiceItem> {
        self.run
            .pending
            .iter()
            .enumerate()
            .map(|(index, choice)| ChoiceItem {
                index,
                text: choice.text.clone(),
            })
            .collect()
    }

    /// Speaker and text of the node under the cursor while a run is active.
    pub fn current_line(&self) -> Option<(&str, &str)> {
        if !self.run.active {
            return None;
        }
        let conversation = self.run.conversation.as_ref()?;
        let node = conversation.node(self.run.cursor?)?;
        Some((node.speaker.as_str(), node.text.as_str()))
    }

    pub fn view(&self) -> Option<DialogueView> {
        let (speaker, text) = self.current_line()?;
        Some(DialogueView {
            conversation_id: self.current_conversation_id()?.to_string(),
            cursor: self.run.cursor?,
            speaker: speaker.to_string(),
            text: text.to_string(),
            choices: self.pending_choices(),
        })
    }

    pub fn variables(&self) -> &VariableStore {
        &self.variables
    }

    pub fn registry(&self) -> &ConversationRegistry {
        &self.registry
    }

    /// Diagnostics since the last drain, oldest first. Embedding hosts should
    /// call `take_diagnostics` after each command; the buffer keeps only the
    /// newest `MAX_BUFFERED_DIAGNOSTICS` entries otherwise.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        self.diagnostics.entries()
    }

    pub fn dropped_diagnostics(&self) -> usize {
        self.diagnostics.dropped()
    }

    pub fn take_diagnostics(&mut self) -> Vec<Diagnostic> {
        self.diagnostics.take()
    }
}
