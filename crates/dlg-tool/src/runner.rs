use std::collections::BTreeMap;
use std::path::Path;

use dlg_api::{create_engine_from_json, CreateEngineOptions};
use dlg_core::{DlValue, PresentationEvent};
use dlg_runtime::{DialogueEngineOptions, EventBuffer};

use crate::source::{read_dialogue_source, read_test_case};
use crate::{DlgToolError, ExpectedEvent, TestCase};

#[derive(Debug, Clone, PartialEq)]
pub struct RunReport {
    pub observed_events: Vec<ExpectedEvent>,
    pub variables: BTreeMap<String, DlValue>,
    pub diagnostics: Vec<String>,
    /// Actions the engine did not act on (for example `advance` while choices wait).
    pub ignored_actions: usize,
}

pub fn run_case(example_dir: &Path, case: &TestCase) -> Result<RunReport, DlgToolError> {
    let document_json = read_dialogue_source(example_dir)?;
    let events = EventBuffer::new();
    let mut engine = create_engine_from_json(CreateEngineOptions {
        document_json,
        entry_conversation: case.start.clone(),
        engine: DialogueEngineOptions {
            presentation: Some(Box::new(events.clone())),
            ..DialogueEngineOptions::default()
        },
    })?;

    let mut ignored_actions = 0usize;
    for action in &case.actions {
        if !engine.dispatch(action.to_command()) {
            ignored_actions += 1;
        }
    }

    let observed_events = events
        .drain()
        .into_iter()
        .filter_map(observe_event)
        .collect();
    let variables = engine
        .variables()
        .iter()
        .map(|(name, value)| (name.to_string(), value.clone()))
        .collect();
    let diagnostics = engine
        .take_diagnostics()
        .into_iter()
        .map(|diagnostic| diagnostic.code)
        .collect();

    Ok(RunReport {
        observed_events,
        variables,
        diagnostics,
        ignored_actions,
    })
}

fn observe_event(event: PresentationEvent) -> Option<ExpectedEvent> {
    match event {
        PresentationEvent::Line { speaker, text } => Some(ExpectedEvent::Line { speaker, text }),
        PresentationEvent::Choices { items } => Some(ExpectedEvent::Choices {
            choices: items.into_iter().map(|item| item.text).collect(),
        }),
        PresentationEvent::ChoicesCleared => None,
        PresentationEvent::Hidden => Some(ExpectedEvent::End),
    }
}

pub fn assert_case(example_dir: &Path, case_path: &Path) -> Result<(), DlgToolError> {
    let case = read_test_case(case_path)?;
    let report = run_case(example_dir, &case)?;

    if report.observed_events.len() != case.expected_events.len() {
        let observed = serde_json::to_string_pretty(&report.observed_events)
            .map_err(DlgToolError::EventSerialize)?;
        return Err(DlgToolError::EventCountMismatch {
            expected: case.expected_events.len(),
            actual: report.observed_events.len(),
            observed,
        });
    }

    for (index, (expected, actual)) in case
        .expected_events
        .iter()
        .zip(report.observed_events.iter())
        .enumerate()
    {
        if expected != actual {
            let expected = serde_json::to_string(expected).map_err(DlgToolError::EventSerialize)?;
            let actual = serde_json::to_string(actual).map_err(DlgToolError::EventSerialize)?;
            return Err(DlgToolError::EventMismatch {
                index,
                expected,
                actual,
            });
        }
    }

    for (name, expected) in &case.expected_variables {
        let actual = report.variables.get(name);
        if actual != Some(expected) {
            return Err(DlgToolError::VariableMismatch {
                name: name.clone(),
                expected: render_value(Some(expected)),
                actual: render_value(actual),
            });
        }
    }

    if let Some(expected) = &case.expected_diagnostics {
        if expected != &report.diagnostics {
            return Err(DlgToolError::DiagnosticMismatch {
                expected: expected.clone(),
                actual: report.diagnostics,
            });
        }
    }

    Ok(())
}

fn render_value(value: Option<&DlValue>) -> String {
    value
        .and_then(|value| serde_json::to_string(value).ok())
        .unwrap_or_else(|| "<unset>".to_string())
}
