use dlg_core::DialogueNode;

use super::{DialogueEngine, PendingChoice};
use crate::Diagnostic;

impl DialogueEngine {
    /// Moves to the next node and shows it. Does nothing while inactive or
    /// while a choice is waiting to be resolved.
    pub fn advance(&mut self) {
        if !self.run.active || !self.run.pending.is_empty() {
            return;
        }

        let mut hops = 0usize;
        loop {
            let Some(conversation) = self.run.conversation.clone() else {
                self.end();
                return;
            };

            let cursor = self.run.cursor.map_or(0, |cursor| cursor + 1);
            self.run.cursor = Some(cursor);
            let Some(node) = conversation.node(cursor) else {
                self.end();
                return;
            };

            for (name, value) in &node.assignments {
                self.variables.set(name.as_str(), value.clone());
            }

            let Some(target) = node.jump_target() else {
                self.render_node(node);
                return;
            };

            let Some(next) = self.registry.lookup(target) else {
                let diagnostic = Diagnostic::conversation_not_found(
                    "ENGINE_JUMP_TARGET_NOT_FOUND",
                    "goto",
                    target,
                    &self.registry.known_ids(),
                );
                self.diagnostics.report(diagnostic);
                self.end();
                return;
            };

            if hops >= self.max_jump_hops {
                self.diagnostics
                    .report(Diagnostic::jump_limit(next.id(), self.max_jump_hops));
                self.end();
                return;
            }
            hops += 1;

            self.run.conversation = Some(next);
            self.run.cursor = None;
        }
    }

    fn render_node(&mut self, node: &DialogueNode) {
        self.presentation.render_line(&node.speaker, &node.text);
        self.presentation.clear_choices();
        self.run.pending = node
            .choices
            .iter()
            .map(|choice| PendingChoice {
                text: choice.text.clone(),
                target: choice.target.clone(),
            })
            .collect();

        if node.is_decision_point() {
            let items = self.pending_choices();
            tracing::debug!(count = items.len(), "presenting choices");
            self.presentation.render_choices(&items);
        }

        self.notify_updated();
    }

    pub(super) fn notify_updated(&mut self) {
        let Some(view) = self.view() else {
            return;
        };
        for listener in &mut self.listeners {
            listener.on_updated(&view);
        }
    }
}
