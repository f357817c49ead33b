mod diagnostics;
mod engine;
mod input;
mod presentation;
mod registry;
mod variables;

pub use diagnostics::{Diagnostic, DiagnosticKind, Diagnostics, MAX_BUFFERED_DIAGNOSTICS};
pub use engine::{
    ActiveStartPolicy, DialogueEngine, DialogueEngineOptions, ReloadPolicy, DEFAULT_MAX_JUMP_HOPS,
};
pub use input::DialogueCommand;
pub use presentation::{
    DialogueListener, EventBuffer, Notification, NotificationLog, NullPresentation,
    PresentationAdapter,
};
pub use registry::{Conversation, ConversationRegistry};
pub use variables::VariableStore;
