use super::DialogueEngine;
use crate::Diagnostic;

impl DialogueEngine {
    /// Resolves a pending choice. Out-of-range indices are ignored.
    pub fn choose(&mut self, index: usize) {
        tracing::debug!(index, "choose");
        let Some(choice) = self.run.pending.get(index) else {
            return;
        };
        let target = choice.target.clone();

        let Some(next) = self.registry.lookup(&target) else {
            let diagnostic = Diagnostic::conversation_not_found(
                "ENGINE_CHOICE_TARGET_NOT_FOUND",
                "choice goto",
                &target,
                &self.registry.known_ids(),
            );
            self.diagnostics.report(diagnostic);
            // Stay on the current line but release the dead choice set.
            self.run.pending.clear();
            self.presentation.clear_choices();
            self.notify_updated();
            return;
        };

        tracing::debug!(target = %next.id(), "choice resolved");
        self.run.conversation = Some(next);
        self.run.cursor = None;
        self.run.pending.clear();
        self.presentation.clear_choices();
        self.advance();
    }
}
