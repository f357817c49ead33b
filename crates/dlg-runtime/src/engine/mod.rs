use std::sync::Arc;

use crate::{
    Conversation, ConversationRegistry, DialogueListener, Diagnostics, PresentationAdapter,
    VariableStore,
};

mod boundary;
mod lifecycle;
mod step;

#[cfg(test)]
mod tests;

pub const DEFAULT_MAX_JUMP_HOPS: usize = 64;

/// What `start` does when a conversation is already running.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ActiveStartPolicy {
    #[default]
    Replace,
    Reject,
}

/// What happens to loaded conversations and variables when a reload fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ReloadPolicy {
    #[default]
    KeepOnError,
    ClearOnError,
}

pub struct DialogueEngineOptions {
    pub presentation: Option<Box<dyn PresentationAdapter>>,
    pub active_start_policy: ActiveStartPolicy,
    pub reload_policy: ReloadPolicy,
    /// Upper bound on consecutive `goto` hops taken by one advance.
    pub max_jump_hops: usize,
}

impl Default for DialogueEngineOptions {
    fn default() -> Self {
        Self {
            presentation: None,
            active_start_policy: ActiveStartPolicy::default(),
            reload_policy: ReloadPolicy::default(),
            max_jump_hops: DEFAULT_MAX_JUMP_HOPS,
        }
    }
}

#[derive(Debug, Clone)]
struct PendingChoice {
    text: String,
    target: String,
}

#[derive(Debug, Clone, Default)]
struct RunState {
    active: bool,
    conversation: Option<Arc<Conversation>>,
    cursor: Option<usize>,
    pending: Vec<PendingChoice>,
}

pub struct DialogueEngine {
    registry: ConversationRegistry,
    variables: VariableStore,
    presentation: Box<dyn PresentationAdapter>,
    listeners: Vec<Box<dyn DialogueListener>>,
    diagnostics: Diagnostics,
    active_start_policy: ActiveStartPolicy,
    reload_policy: ReloadPolicy,
    max_jump_hops: usize,

    run: RunState,
}
