use serde::{Deserialize, Serialize};

use crate::value::DlValue;

/// Canonical form used for every conversation id comparison.
pub fn normalize_id(id: &str) -> String {
    id.trim().to_lowercase()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Choice {
    pub text: String,
    pub target: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DialogueNode {
    pub speaker: String,
    pub text: String,
    pub choices: Vec<Choice>,
    /// Applied in order when the node is entered; later entries win.
    pub assignments: Vec<(String, DlValue)>,
    pub jump: Option<String>,
}

impl DialogueNode {
    pub fn line(speaker: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            speaker: speaker.into(),
            text: text.into(),
            ..Self::default()
        }
    }

    pub fn jump_target(&self) -> Option<&str> {
        self.jump.as_deref().filter(|target| !target.is_empty())
    }

    pub fn is_decision_point(&self) -> bool {
        !self.choices.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationDef {
    pub id: String,
    pub nodes: Vec<DialogueNode>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParsedDocument {
    pub variables: Vec<(String, DlValue)>,
    pub conversations: Vec<ConversationDef>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChoiceItem {
    pub index: usize,
    pub text: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RunPhase {
    Idle,
    Displaying,
    AwaitingChoice,
}

/// What a presentation layer was asked to do, in call order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum PresentationEvent {
    Line { speaker: String, text: String },
    Choices { items: Vec<ChoiceItem> },
    ChoicesCleared,
    Hidden,
}

/// Renderable snapshot handed to listeners after each update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DialogueView {
    pub conversation_id: String,
    pub cursor: usize,
    pub speaker: String,
    pub text: String,
    pub choices: Vec<ChoiceItem>,
}
