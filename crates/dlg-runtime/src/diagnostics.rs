use dlg_core::DialogueError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosticKind {
    DocumentError,
    ConversationNotFound,
    JumpLimitExceeded,
    AlreadyActive,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub code: String,
    pub message: String,
}

impl Diagnostic {
    pub fn document(error: &DialogueError) -> Self {
        Self {
            kind: DiagnosticKind::DocumentError,
            code: error.code.clone(),
            message: error.message.clone(),
        }
    }

    /// `context` names what was being resolved: "Dialogue", "goto" or "choice goto".
    pub fn conversation_not_found(
        code: &str,
        context: &str,
        id: &str,
        known_ids: &[String],
    ) -> Self {
        Self {
            kind: DiagnosticKind::ConversationNotFound,
            code: code.to_string(),
            message: format!(
                "{} '{}' not found. Known: {}",
                context,
                id,
                known_ids.join(", ")
            ),
        }
    }

    pub fn jump_limit(conversation_id: &str, max_jump_hops: usize) -> Self {
        Self {
            kind: DiagnosticKind::JumpLimitExceeded,
            code: "ENGINE_JUMP_LIMIT".to_string(),
            message: format!(
                "goto chain through '{}' exceeded {} hops without reaching a line.",
                conversation_id, max_jump_hops
            ),
        }
    }

    pub fn already_active(active_id: &str, requested_id: &str) -> Self {
        Self {
            kind: DiagnosticKind::AlreadyActive,
            code: "ENGINE_ALREADY_ACTIVE".to_string(),
            message: format!(
                "Cannot start '{}' while '{}' is running.",
                requested_id, active_id
            ),
        }
    }

    pub fn to_error(&self) -> DialogueError {
        DialogueError::new(self.code.clone(), self.message.clone())
    }
}

/// Entries kept between drains before the oldest are discarded.
pub const MAX_BUFFERED_DIAGNOSTICS: usize = 256;

/// Buffered diagnostics; every report is also logged.
///
/// Hosts should drain with `take` after each command. A host that never does
/// keeps only the newest `limit` entries and an overflow count.
#[derive(Debug, Clone)]
pub struct Diagnostics {
    entries: Vec<Diagnostic>,
    limit: usize,
    dropped: usize,
}

impl Default for Diagnostics {
    fn default() -> Self {
        Self::with_limit(MAX_BUFFERED_DIAGNOSTICS)
    }
}

impl Diagnostics {
    pub fn with_limit(limit: usize) -> Self {
        Self {
            entries: Vec::new(),
            limit: limit.max(1),
            dropped: 0,
        }
    }

    pub fn report(&mut self, diagnostic: Diagnostic) {
        match diagnostic.kind {
            DiagnosticKind::AlreadyActive => {
                tracing::warn!(code = %diagnostic.code, "{}", diagnostic.message)
            }
            _ => tracing::error!(code = %diagnostic.code, "{}", diagnostic.message),
        }
        if self.entries.len() == self.limit {
            self.entries.remove(0);
            self.dropped += 1;
        }
        self.entries.push(diagnostic);
    }

    /// Entries discarded since the last `take` because the buffer was full.
    pub fn dropped(&self) -> usize {
        self.dropped
    }

    pub fn entries(&self) -> &[Diagnostic] {
        &self.entries
    }

    pub fn take(&mut self) -> Vec<Diagnostic> {
        self.dropped = 0;
        std::mem::take(&mut self.entries)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
