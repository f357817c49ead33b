use std::collections::BTreeMap;
use std::sync::Arc;

use dlg_core::{normalize_id, DialogueNode, ParsedDocument};

#[derive(Debug, Clone, PartialEq)]
pub struct Conversation {
    id: String,
    nodes: Vec<DialogueNode>,
}

impl Conversation {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn nodes(&self) -> &[DialogueNode] {
        &self.nodes
    }

    pub fn node(&self, index: usize) -> Option<&DialogueNode> {
        self.nodes.get(index)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

/// Conversations keyed by their normalized id.
#[derive(Debug, Clone, Default)]
pub struct ConversationRegistry {
    conversations: BTreeMap<String, Arc<Conversation>>,
}

impl ConversationRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_document(document: &ParsedDocument) -> Self {
        let mut registry = Self::new();
        for conversation in &document.conversations {
            registry.register(&conversation.id, conversation.nodes.clone());
        }
        registry
    }

    /// Stores `nodes` under `id`, replacing any conversation that normalizes the same way.
    pub fn register(&mut self, id: &str, nodes: Vec<DialogueNode>) -> Option<Arc<Conversation>> {
        let conversation = Arc::new(Conversation {
            id: id.trim().to_string(),
            nodes,
        });
        self.conversations.insert(normalize_id(id), conversation)
    }

    pub fn lookup(&self, id: &str) -> Option<Arc<Conversation>> {
        let key = normalize_id(id);
        if key.is_empty() {
            return None;
        }
        self.conversations.get(&key).cloned()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.lookup(id).is_some()
    }

    pub fn known_ids(&self) -> Vec<String> {
        self.conversations
            .values()
            .map(|conversation| conversation.id.clone())
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<Conversation>> {
        self.conversations.values()
    }

    pub fn len(&self) -> usize {
        self.conversations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.conversations.is_empty()
    }

    /// Drops every conversation and registers the document's instead.
    pub fn replace_all(&mut self, document: &ParsedDocument) {
        *self = Self::from_document(document);
    }

    pub fn clear(&mut self) {
        self.conversations.clear();
    }
}
