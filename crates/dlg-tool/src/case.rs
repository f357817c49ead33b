use std::collections::BTreeMap;

use dlg_core::DlValue;
use dlg_runtime::DialogueCommand;
use serde::{Deserialize, Serialize};

pub const TESTCASE_SCHEMA_V1: &str = "dlg-tool-case.v1";

/// A scripted run: commands fed to the engine after it starts, and the
/// transcript they must produce.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestCase {
    pub schema_version: String,
    /// Entry conversation; `main` when omitted.
    #[serde(default)]
    pub start: Option<String>,
    #[serde(default)]
    pub actions: Vec<TestAction>,
    #[serde(default)]
    pub expected_events: Vec<ExpectedEvent>,
    #[serde(default)]
    pub expected_variables: BTreeMap<String, DlValue>,
    /// Diagnostic codes in report order. Not checked when omitted.
    #[serde(default)]
    pub expected_diagnostics: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum TestAction {
    Advance,
    Choose { index: usize },
    Start { id: String },
    End,
}

impl TestAction {
    pub fn to_command(&self) -> DialogueCommand {
        match self {
            Self::Advance => DialogueCommand::Advance,
            Self::Choose { index } => DialogueCommand::Choose(*index),
            Self::Start { id } => DialogueCommand::Start(id.clone()),
            Self::End => DialogueCommand::End,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ExpectedEvent {
    Line {
        #[serde(default)]
        speaker: String,
        text: String,
    },
    Choices {
        choices: Vec<String>,
    },
    End,
}
