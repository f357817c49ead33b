use dlg_core::{ChoiceItem, DlValue, PresentationEvent, RunPhase};

use super::*;
use crate::{
    DiagnosticKind, DialogueCommand, EventBuffer, Notification, NotificationLog,
    MAX_BUFFERED_DIAGNOSTICS,
};

struct Harness {
    engine: DialogueEngine,
    events: EventBuffer,
    log: NotificationLog,
}

fn harness_with(source: &str, mut options: DialogueEngineOptions) -> Harness {
    let events = EventBuffer::new();
    let log = NotificationLog::new();
    options.presentation = Some(Box::new(events.clone()));
    let mut engine = DialogueEngine::new(options);
    engine.subscribe(Box::new(log.clone()));
    engine.load_document(source).expect("document should load");
    Harness {
        engine,
        events,
        log,
    }
}

fn harness(source: &str) -> Harness {
    harness_with(source, DialogueEngineOptions::default())
}

fn line(speaker: &str, text: &str) -> PresentationEvent {
    PresentationEvent::Line {
        speaker: speaker.to_string(),
        text: text.to_string(),
    }
}

fn lines(events: &[PresentationEvent]) -> Vec<String> {
    events
        .iter()
        .filter_map(|event| match event {
            PresentationEvent::Line { text, .. } => Some(text.clone()),
            _ => None,
        })
        .collect()
}

const BRANCHING: &str = r#"{
  "variables": { "met": false, "gold": 5 },
  "conversations": {
    "Intro ": [
      { "speaker": "Ann", "text": "Hello." },
      {
        "speaker": "Ann",
        "text": "Where to?",
        "choices": [
          { "text": "Shop", "goto": "shop" },
          { "text": "Leave", "goto": "BYE" }
        ]
      },
      { "speaker": "Ann", "text": "never shown" }
    ],
    "shop": [
      { "speaker": "Bo", "text": "Welcome to the shop.", "set": { "met": true } },
      { "speaker": "Bo", "text": "Come again." }
    ],
    "bye": [ { "speaker": "Ann", "text": "Goodbye." } ]
  }
}"#;

#[test]
fn start_matches_ids_case_insensitively_and_trimmed() {
    let mut h = harness(BRANCHING);
    assert!(h.engine.start("intro"));
    assert!(h.engine.is_active());
    assert_eq!(h.engine.current_conversation_id(), Some("Intro"));
    assert_eq!(h.engine.cursor(), Some(0));
    assert_eq!(h.engine.current_line(), Some(("Ann", "Hello.")));
    assert_eq!(
        h.events.drain(),
        vec![line("Ann", "Hello."), PresentationEvent::ChoicesCleared]
    );
    assert_eq!(h.log.updated_count(), 1);

    let mut h = harness(BRANCHING);
    assert!(h.engine.start("  INTRO\t"));
    assert_eq!(h.engine.phase(), RunPhase::Displaying);
}

#[test]
fn start_with_unknown_id_reports_and_stays_idle() {
    let mut h = harness(BRANCHING);
    assert!(!h.engine.start("outro"));
    assert!(!h.engine.is_active());
    assert_eq!(h.engine.phase(), RunPhase::Idle);
    assert!(h.events.is_empty());
    assert!(h.log.entries().is_empty());

    let diagnostics = h.engine.take_diagnostics();
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].kind, DiagnosticKind::ConversationNotFound);
    assert_eq!(diagnostics[0].code, "ENGINE_CONVERSATION_NOT_FOUND");
    assert_eq!(
        diagnostics[0].message,
        "Dialogue 'outro' not found. Known: bye, Intro, shop"
    );

    assert!(!h.engine.start("   "));
    assert_eq!(h.engine.take_diagnostics().len(), 1);
}

#[test]
fn advance_is_noop_while_choices_are_pending() {
    let mut h = harness(BRANCHING);
    h.engine.start("intro");
    h.engine.advance();
    assert_eq!(h.engine.phase(), RunPhase::AwaitingChoice);
    assert_eq!(
        h.engine.pending_choices(),
        vec![
            ChoiceItem {
                index: 0,
                text: "Shop".to_string()
            },
            ChoiceItem {
                index: 1,
                text: "Leave".to_string()
            }
        ]
    );
    h.events.drain();
    let updates = h.log.updated_count();

    for _ in 0..3 {
        h.engine.advance();
    }
    assert_eq!(h.engine.cursor(), Some(1));
    assert_eq!(h.engine.pending_choices().len(), 2);
    assert!(h.events.is_empty());
    assert_eq!(h.log.updated_count(), updates);
    assert!(!h.engine.dispatch(DialogueCommand::Advance));
}

#[test]
fn choices_are_presented_after_clearing_previous_ones() {
    let mut h = harness(BRANCHING);
    h.engine.start("intro");
    h.events.drain();
    h.engine.advance();
    assert_eq!(
        h.events.drain(),
        vec![
            line("Ann", "Where to?"),
            PresentationEvent::ChoicesCleared,
            PresentationEvent::Choices {
                items: h.engine.pending_choices()
            },
        ]
    );
    let Some(Notification::Updated(view)) = h.log.entries().last().cloned() else {
        panic!("last notification should be an update");
    };
    assert_eq!(view.conversation_id, "Intro");
    assert_eq!(view.cursor, 1);
    assert_eq!(view.choices.len(), 2);
}

#[test]
fn choosing_routes_to_each_target() {
    let mut h = harness(BRANCHING);
    h.engine.start("intro");
    h.engine.advance();
    h.events.drain();
    h.engine.choose(0);
    assert_eq!(h.engine.current_conversation_id(), Some("shop"));
    assert_eq!(h.engine.cursor(), Some(0));
    assert_eq!(h.engine.phase(), RunPhase::Displaying);
    assert_eq!(
        h.events.drain(),
        vec![
            PresentationEvent::ChoicesCleared,
            line("Bo", "Welcome to the shop."),
            PresentationEvent::ChoicesCleared,
        ]
    );
    assert!(h.engine.variables().get_bool("met", false));

    let mut h = harness(BRANCHING);
    h.engine.start("intro");
    h.engine.advance();
    assert!(h.engine.dispatch(DialogueCommand::Choose(1)));
    assert_eq!(h.engine.current_conversation_id(), Some("bye"));
    assert_eq!(h.engine.current_line(), Some(("Ann", "Goodbye.")));
    assert!(!h.engine.variables().get_bool("met", false));
}

#[test]
fn running_past_the_last_node_ends_the_conversation() {
    let mut h = harness(BRANCHING);
    h.engine.start("bye");
    h.events.drain();
    h.engine.advance();
    assert!(!h.engine.is_active());
    assert_eq!(h.engine.current_line(), None);
    assert_eq!(h.events.drain(), vec![PresentationEvent::Hidden]);
    assert_eq!(h.log.ended_count(), 1);
}

#[test]
fn out_of_range_choice_changes_nothing() {
    let mut h = harness(BRANCHING);
    h.engine.start("intro");
    h.engine.advance();
    h.events.drain();
    let variables = h.engine.variables().clone();
    let notifications = h.log.entries().len();

    h.engine.choose(2);
    h.engine.choose(usize::MAX);
    assert!(!h.engine.dispatch(DialogueCommand::Choose(5)));

    assert_eq!(h.engine.current_conversation_id(), Some("Intro"));
    assert_eq!(h.engine.cursor(), Some(1));
    assert_eq!(h.engine.pending_choices().len(), 2);
    assert_eq!(h.engine.variables(), &variables);
    assert!(h.events.is_empty());
    assert_eq!(h.log.entries().len(), notifications);
    assert!(h.engine.diagnostics().is_empty());
}

#[test]
fn choose_without_pending_choices_is_ignored() {
    let mut h = harness(BRANCHING);
    h.engine.choose(0);
    assert!(!h.engine.is_active());

    h.engine.start("intro");
    h.events.drain();
    h.engine.choose(0);
    assert_eq!(h.engine.cursor(), Some(0));
    assert!(h.events.is_empty());
}

#[test]
fn missing_choice_target_clears_choices_and_stays_on_node() {
    let mut h = harness(
        r#"{ "conversations": {
            "a": [ { "speaker": "Ann", "text": "Pick", "choices": [
                { "text": "Broken", "goto": "nowhere" },
                { "text": "Fine", "goto": "b" } ] } ],
            "b": [ { "text": "ok" } ] } }"#,
    );
    h.engine.start("a");
    h.events.drain();
    let updates = h.log.updated_count();

    h.engine.choose(0);
    assert!(h.engine.is_active());
    assert_eq!(h.engine.current_conversation_id(), Some("a"));
    assert_eq!(h.engine.cursor(), Some(0));
    assert!(h.engine.pending_choices().is_empty());
    assert_eq!(h.engine.phase(), RunPhase::Displaying);
    assert_eq!(h.events.drain(), vec![PresentationEvent::ChoicesCleared]);
    assert_eq!(h.log.updated_count(), updates + 1);
    assert_eq!(h.log.ended_count(), 0);

    let diagnostics = h.engine.take_diagnostics();
    assert_eq!(diagnostics[0].code, "ENGINE_CHOICE_TARGET_NOT_FOUND");
    assert!(diagnostics[0].message.starts_with("choice goto 'nowhere' not found."));

    // The line stays put; advancing moves past it.
    h.engine.advance();
    assert!(!h.engine.is_active());
}

#[test]
fn missing_jump_target_ends_the_conversation() {
    let mut h = harness(
        r#"{ "conversations": {
            "a": [ { "text": "first" }, { "goto": "ghost" }, { "text": "unreached" } ] } }"#,
    );
    h.engine.start("a");
    h.engine.advance();
    assert!(!h.engine.is_active());
    assert_eq!(h.log.ended_count(), 1);
    assert_eq!(lines(&h.events.drain()), vec!["first"]);
    assert_eq!(
        h.engine.take_diagnostics()[0].code,
        "ENGINE_JUMP_TARGET_NOT_FOUND"
    );
}

#[test]
fn jump_chain_renders_one_line_and_applies_assignments_in_order() {
    let mut h = harness(
        r#"{
  "variables": { "step": 0 },
  "conversations": {
    "start": [ { "set": { "step": 1, "trail": "a" }, "goto": "hop1" } ],
    "hop1":  [ { "set": { "step": 2, "trail": "b" }, "goto": "HOP2" } ],
    "hop2":  [ { "set": { "trail": "c", "seen": true }, "goto": "end",
                 "choices": [ { "text": "ignored", "goto": "start" } ] } ],
    "end":   [ { "speaker": "Ann", "text": "Arrived." } ]
  }
}"#,
    );
    assert!(h.engine.start("start"));
    let events = h.events.drain();
    assert_eq!(lines(&events), vec!["Arrived."]);
    assert_eq!(h.log.updated_count(), 1);
    assert_eq!(h.engine.current_conversation_id(), Some("end"));
    assert_eq!(h.engine.cursor(), Some(0));
    assert!(h.engine.pending_choices().is_empty());

    let variables = h.engine.variables();
    assert_eq!(variables.get_int("step", 0), 2);
    assert_eq!(variables.get_string("trail", ""), "c");
    assert!(variables.get_bool("seen", false));
}

#[test]
fn later_assignment_wins_within_a_node() {
    let mut engine = DialogueEngine::new(DialogueEngineOptions::default());
    engine.load_parsed(dlg_core::ParsedDocument {
        variables: Vec::new(),
        conversations: vec![dlg_core::ConversationDef {
            id: "a".to_string(),
            nodes: vec![dlg_core::DialogueNode {
                assignments: vec![
                    ("mood".to_string(), DlValue::from("calm")),
                    ("mood".to_string(), DlValue::from("angry")),
                ],
                ..dlg_core::DialogueNode::line("Ann", "Hm.")
            }],
        }],
    });
    engine.start("a");
    assert_eq!(engine.variables().get_string("mood", ""), "angry");
}

#[test]
fn cyclic_jump_chain_hits_the_hop_limit() {
    let mut h = harness_with(
        r#"{ "conversations": {
            "ping": [ { "goto": "pong" } ],
            "pong": [ { "set": { "bounces": 1 }, "goto": "ping" } ] } }"#,
        DialogueEngineOptions {
            max_jump_hops: 8,
            ..DialogueEngineOptions::default()
        },
    );
    h.engine.start("ping");
    assert!(!h.engine.is_active());
    assert_eq!(h.events.drain(), vec![PresentationEvent::Hidden]);
    let diagnostics = h.engine.take_diagnostics();
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].kind, DiagnosticKind::JumpLimitExceeded);
    assert!(h.engine.variables().contains("bounces"));
}

#[test]
fn jump_chain_within_the_limit_succeeds() {
    let mut h = harness_with(
        r#"{ "conversations": {
            "a": [ { "goto": "b" } ],
            "b": [ { "goto": "c" } ],
            "c": [ { "text": "done" } ] } }"#,
        DialogueEngineOptions {
            max_jump_hops: 2,
            ..DialogueEngineOptions::default()
        },
    );
    h.engine.start("a");
    assert_eq!(h.engine.current_line(), Some(("", "done")));
}

#[test]
fn end_is_idempotent() {
    let mut h = harness(BRANCHING);
    h.engine.start("intro");
    h.engine.advance();
    h.events.drain();

    h.engine.end();
    assert!(!h.engine.is_active());
    assert!(h.engine.pending_choices().is_empty());
    assert_eq!(h.engine.current_conversation_id(), None);
    let first = h.events.drain();

    h.engine.end();
    assert!(!h.engine.is_active());
    assert_eq!(h.events.drain(), first);
    assert_eq!(h.log.ended_count(), 2);
    assert!(h.engine.diagnostics().is_empty());

    h.engine.choose(0);
    h.engine.advance();
    assert!(!h.engine.is_active());
}

#[test]
fn variables_persist_across_runs() {
    let mut h = harness(BRANCHING);
    h.engine.start("shop");
    h.engine.end();
    assert!(h.engine.variables().get_bool("met", false));
    h.engine.start("intro");
    assert!(h.engine.variables().get_bool("met", false));
    assert_eq!(h.engine.variables().get_int("gold", 0), 5);
}

#[test]
fn empty_conversation_ends_immediately() {
    let mut h = harness(r#"{ "conversations": { "silent": [] } }"#);
    assert!(h.engine.start("silent"));
    assert!(!h.engine.is_active());
    assert_eq!(h.events.drain(), vec![PresentationEvent::Hidden]);
    assert_eq!(h.log.entries(), vec![Notification::Ended]);
}

#[test]
fn start_while_active_replaces_by_default() {
    let mut h = harness(BRANCHING);
    h.engine.start("intro");
    h.engine.advance();
    assert!(h.engine.start("bye"));
    assert_eq!(h.engine.current_conversation_id(), Some("bye"));
    assert!(h.engine.pending_choices().is_empty());
    assert!(h.engine.diagnostics().is_empty());
}

#[test]
fn start_while_active_can_be_rejected() {
    let mut h = harness_with(
        BRANCHING,
        DialogueEngineOptions {
            active_start_policy: ActiveStartPolicy::Reject,
            ..DialogueEngineOptions::default()
        },
    );
    h.engine.start("intro");
    assert!(!h.engine.dispatch(DialogueCommand::Start("bye".to_string())));
    assert_eq!(h.engine.current_conversation_id(), Some("Intro"));
    assert_eq!(
        h.engine.take_diagnostics()[0].kind,
        DiagnosticKind::AlreadyActive
    );
}

#[test]
fn dispatch_reports_whether_commands_were_consumed() {
    let mut h = harness(BRANCHING);
    assert!(!h.engine.dispatch(DialogueCommand::Advance));
    assert!(!h.engine.dispatch(DialogueCommand::End));
    assert!(h.engine.dispatch(DialogueCommand::Start("intro".to_string())));
    assert!(h.engine.dispatch(DialogueCommand::Advance));
    assert!(h.engine.dispatch(DialogueCommand::Choose(0)));
    assert!(h.engine.dispatch(DialogueCommand::End));
    assert_eq!(h.engine.phase(), RunPhase::Idle);
}

#[test]
fn reload_replaces_conversations_and_variables() {
    let mut h = harness(BRANCHING);
    h.engine.start("shop");
    h.engine
        .load_document(
            r#"{ "variables": { "gold": 1 }, "conversations": { "fresh": [ { "text": "new" } ] } }"#,
        )
        .expect("reload should pass");
    assert!(!h.engine.is_active());
    assert_eq!(h.log.ended_count(), 1);
    assert_eq!(h.engine.registry().known_ids(), vec!["fresh"]);
    assert_eq!(h.engine.variables().get_int("gold", 0), 1);
    assert!(!h.engine.variables().contains("met"));
}

#[test]
fn failed_reload_keeps_previous_document_by_default() {
    let mut h = harness(BRANCHING);
    let error = h
        .engine
        .load_document(r#"{ "variables": {} }"#)
        .expect_err("missing conversations should fail");
    assert_eq!(error.code, "DOC_CONVERSATIONS_MISSING");
    assert_eq!(h.engine.registry().len(), 3);
    assert_eq!(
        h.engine.take_diagnostics()[0].kind,
        DiagnosticKind::DocumentError
    );
    assert!(h.engine.start("intro"));
}

#[test]
fn failed_reload_can_clear_previous_document() {
    let mut h = harness_with(
        BRANCHING,
        DialogueEngineOptions {
            reload_policy: ReloadPolicy::ClearOnError,
            ..DialogueEngineOptions::default()
        },
    );
    assert!(h.engine.load_document("not json").is_err());
    assert!(h.engine.registry().is_empty());
    assert!(h.engine.variables().is_empty());
    assert!(!h.engine.start("intro"));
}

#[test]
fn undrained_diagnostics_stay_bounded() {
    let mut h = harness(BRANCHING);
    for attempt in 0..MAX_BUFFERED_DIAGNOSTICS + 10 {
        assert!(!h.engine.start(&format!("missing-{}", attempt)));
    }
    let diagnostics = h.engine.diagnostics();
    assert_eq!(diagnostics.len(), MAX_BUFFERED_DIAGNOSTICS);
    assert!(diagnostics[0].message.contains("'missing-10'"));
    assert_eq!(h.engine.dropped_diagnostics(), 10);

    h.engine.take_diagnostics();
    assert_eq!(h.engine.dropped_diagnostics(), 0);
}
