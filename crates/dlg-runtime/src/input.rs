use dlg_core::RunPhase;

use crate::DialogueEngine;

/// Discrete player or host intents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DialogueCommand {
    Advance,
    Choose(usize),
    Start(String),
    End,
}

impl DialogueEngine {
    /// Routes a command into the engine. Returns `false` when the command had
    /// nothing to act on, so a host can let the input fall through.
    pub fn dispatch(&mut self, command: DialogueCommand) -> bool {
        match command {
            DialogueCommand::Advance => {
                if self.phase() != RunPhase::Displaying {
                    return false;
                }
                self.advance();
                true
            }
            DialogueCommand::Choose(index) => {
                if index >= self.pending_choices().len() {
                    return false;
                }
                self.choose(index);
                true
            }
            DialogueCommand::Start(conversation_id) => self.start(&conversation_id),
            DialogueCommand::End => {
                let was_active = self.is_active();
                self.end();
                was_active
            }
        }
    }
}
