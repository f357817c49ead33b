use std::collections::BTreeMap;

use dlg_core::{
    normalize_id, Choice, ConversationDef, DialogueError, DialogueNode, DlValue, ParsedDocument,
};
use serde_json::{Map, Value};

pub fn parse_document(source: &str) -> Result<ParsedDocument, DialogueError> {
    let root: Value = serde_json::from_str(source)
        .map_err(|error| DialogueError::new("DOC_JSON_INVALID", error.to_string()))?;

    let Value::Object(root) = root else {
        return Err(DialogueError::new(
            "DOC_ROOT_INVALID",
            "Dialogue document root must be a JSON object.",
        ));
    };

    let variables = match root.get("variables") {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Object(entries)) => parse_scalar_map(entries, "variables")?,
        Some(other) => {
            return Err(DialogueError::new(
                "DOC_VARIABLES_INVALID",
                format!("\"variables\" must be an object, found {}.", json_kind(other)),
            ))
        }
    };

    let conversations = match root.get("conversations") {
        None | Some(Value::Null) => {
            return Err(DialogueError::new(
                "DOC_CONVERSATIONS_MISSING",
                "Dialogue document has no \"conversations\" section.",
            ))
        }
        Some(Value::Object(entries)) => parse_conversations(entries)?,
        Some(other) => {
            return Err(DialogueError::new(
                "DOC_CONVERSATIONS_MISSING",
                format!(
                    "\"conversations\" must be an object, found {}.",
                    json_kind(other)
                ),
            ))
        }
    };

    Ok(ParsedDocument {
        variables,
        conversations,
    })
}

fn parse_conversations(
    entries: &Map<String, Value>,
) -> Result<Vec<ConversationDef>, DialogueError> {
    let mut seen: BTreeMap<String, String> = BTreeMap::new();
    let mut conversations = Vec::with_capacity(entries.len());

    for (raw_id, raw_nodes) in entries {
        let id = raw_id.trim().to_string();
        let Value::Array(raw_nodes) = raw_nodes else {
            return Err(DialogueError::new(
                "DOC_NODE_INVALID",
                format!(
                    "Conversation \"{}\" must be a list of nodes, found {}.",
                    id,
                    json_kind(raw_nodes)
                ),
            ));
        };

        let mut nodes = Vec::with_capacity(raw_nodes.len());
        for (index, raw_node) in raw_nodes.iter().enumerate() {
            let path = format!("conversations.{}[{}]", id, index);
            nodes.push(parse_node(raw_node, &path)?);
        }

        if let Some(previous) = seen.insert(normalize_id(&id), id.clone()) {
            tracing::warn!(
                previous = %previous,
                id = %id,
                "conversation id collides after normalization; later definition wins"
            );
        }
        conversations.push(ConversationDef { id, nodes });
    }

    Ok(conversations)
}

fn parse_node(raw: &Value, path: &str) -> Result<DialogueNode, DialogueError> {
    let Value::Object(fields) = raw else {
        return Err(DialogueError::new(
            "DOC_NODE_INVALID",
            format!("{} must be an object, found {}.", path, json_kind(raw)),
        ));
    };

    let speaker = optional_string(fields, "speaker", path)?.unwrap_or_default();
    let text = optional_string(fields, "text", path)?.unwrap_or_default();

    let choices = match fields.get("choices") {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(raw_choices)) => {
            let mut choices = Vec::with_capacity(raw_choices.len());
            for (index, raw_choice) in raw_choices.iter().enumerate() {
                let choice_path = format!("{}.choices[{}]", path, index);
                choices.push(parse_choice(raw_choice, &choice_path)?);
            }
            choices
        }
        Some(other) => {
            return Err(DialogueError::new(
                "DOC_NODE_INVALID",
                format!("{}.choices must be a list, found {}.", path, json_kind(other)),
            ))
        }
    };

    let assignments = match fields.get("set") {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Object(entries)) => parse_scalar_map(entries, &format!("{}.set", path))?,
        Some(other) => {
            return Err(DialogueError::new(
                "DOC_NODE_INVALID",
                format!("{}.set must be an object, found {}.", path, json_kind(other)),
            ))
        }
    };

    let jump = optional_string(fields, "goto", path)?.map(|target| target.trim().to_string());

    Ok(DialogueNode {
        speaker,
        text,
        choices,
        assignments,
        jump,
    })
}

fn parse_choice(raw: &Value, path: &str) -> Result<Choice, DialogueError> {
    let Value::Object(fields) = raw else {
        return Err(DialogueError::new(
            "DOC_NODE_INVALID",
            format!("{} must be an object, found {}.", path, json_kind(raw)),
        ));
    };

    let text = optional_string(fields, "text", path)?.ok_or_else(|| {
        DialogueError::new(
            "DOC_CHOICE_TEXT_MISSING",
            format!("{} has no \"text\".", path),
        )
    })?;
    let target = optional_string(fields, "goto", path)?.ok_or_else(|| {
        DialogueError::new(
            "DOC_CHOICE_TARGET_MISSING",
            format!("{} (\"{}\") has no \"goto\" target.", path, text),
        )
    })?;

    Ok(Choice {
        text,
        target: target.trim().to_string(),
    })
}

fn parse_scalar_map(
    entries: &Map<String, Value>,
    path: &str,
) -> Result<Vec<(String, DlValue)>, DialogueError> {
    entries
        .iter()
        .map(|(name, raw)| {
            let value = scalar_from_json(raw).ok_or_else(|| {
                DialogueError::new(
                    "DOC_VALUE_UNSUPPORTED",
                    format!(
                        "{}.{} must be a boolean, number or string, found {}.",
                        path,
                        name,
                        json_kind(raw)
                    ),
                )
            })?;
            Ok((name.clone(), value))
        })
        .collect()
}

fn scalar_from_json(raw: &Value) -> Option<DlValue> {
    match raw {
        Value::Bool(value) => Some(DlValue::Bool(*value)),
        Value::Number(value) => value
            .as_i64()
            .map(DlValue::Int)
            .or_else(|| value.as_f64().map(DlValue::Number)),
        Value::String(value) => Some(DlValue::String(value.clone())),
        _ => None,
    }
}

/// Missing and `null` both read as absent.
fn optional_string(
    fields: &Map<String, Value>,
    key: &str,
    path: &str,
) -> Result<Option<String>, DialogueError> {
    match fields.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(value)) => Ok(Some(value.clone())),
        Some(other) => Err(DialogueError::new(
            "DOC_NODE_INVALID",
            format!("{}.{} must be a string, found {}.", path, key, json_kind(other)),
        )),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod document_tests {
    use super::*;

    #[test]
    fn parses_variables_and_conversations() {
        let document = parse_document(
            r#"{
  "variables": { "met_ann": false, "gold": 5, "title": "traveller" },
  "conversations": {
    "intro": [
      { "speaker": "Ann", "text": "Hello there." },
      {
        "speaker": "Ann",
        "text": "Need anything?",
        "choices": [
          { "text": "Shop", "goto": " Shop " },
          { "text": "Bye", "goto": "bye" }
        ]
      }
    ],
    "shop": [ { "set": { "met_ann": true }, "goto": "intro" } ],
    "bye": [ { "text": "Later." } ]
  }
}"#,
        )
        .expect("document should parse");

        assert_eq!(
            document.variables,
            vec![
                ("met_ann".to_string(), DlValue::Bool(false)),
                ("gold".to_string(), DlValue::Int(5)),
                ("title".to_string(), DlValue::String("traveller".to_string())),
            ]
        );
        let ids = document
            .conversations
            .iter()
            .map(|conversation| conversation.id.as_str())
            .collect::<Vec<_>>();
        assert_eq!(ids, vec!["intro", "shop", "bye"]);

        let intro = &document.conversations[0];
        assert_eq!(intro.nodes.len(), 2);
        assert_eq!(intro.nodes[1].choices[0].target, "Shop");
        assert_eq!(intro.nodes[1].choices[1].text, "Bye");

        let shop = &document.conversations[1].nodes[0];
        assert_eq!(shop.jump.as_deref(), Some("intro"));
        assert_eq!(
            shop.assignments,
            vec![("met_ann".to_string(), DlValue::Bool(true))]
        );
        assert_eq!(shop.speaker, "");
        assert_eq!(shop.text, "");
    }

    #[test]
    fn integers_keep_exact_value_and_floats_stay_floats() {
        let document = parse_document(
            r#"{ "variables": { "id": 9007199254740993, "ratio": 0.25, "huge": 18446744073709551615 },
                 "conversations": {} }"#,
        )
        .expect("document should parse");
        assert_eq!(
            document.variables,
            vec![
                ("id".to_string(), DlValue::Int(9_007_199_254_740_993)),
                ("ratio".to_string(), DlValue::Number(0.25)),
                ("huge".to_string(), DlValue::Number(18_446_744_073_709_551_615.0)),
            ]
        );
        assert!(matches!(document.variables[0].1, DlValue::Int(_)));
        assert_eq!(document.variables[2].1.as_int(), None);
    }

    #[test]
    fn missing_variables_section_is_empty() {
        let document =
            parse_document(r#"{ "conversations": { "a": [] } }"#).expect("document should parse");
        assert!(document.variables.is_empty());
        assert_eq!(document.conversations[0].nodes.len(), 0);
    }

    #[test]
    fn null_fields_read_as_absent() {
        let document = parse_document(
            r#"{ "conversations": { "a": [ { "speaker": null, "text": null, "goto": null, "choices": null, "set": null } ] } }"#,
        )
        .expect("document should parse");
        assert_eq!(document.conversations[0].nodes[0], DialogueNode::default());
    }

    #[test]
    fn set_entries_keep_document_order() {
        let document = parse_document(
            r#"{ "conversations": { "a": [ { "set": { "zeta": 1, "alpha": 2, "mid": "x" } } ] } }"#,
        )
        .expect("document should parse");
        let names = document.conversations[0].nodes[0]
            .assignments
            .iter()
            .map(|(name, _)| name.as_str())
            .collect::<Vec<_>>();
        assert_eq!(names, vec!["zeta", "alpha", "mid"]);
    }

    #[test]
    fn conversation_ids_are_trimmed() {
        let document = parse_document(r#"{ "conversations": { "  Intro ": [] } }"#)
            .expect("document should parse");
        assert_eq!(document.conversations[0].id, "Intro");
    }

    #[test]
    fn rejects_missing_conversations() {
        let error = parse_document(r#"{ "variables": {} }"#).expect_err("should fail");
        assert_eq!(error.code, "DOC_CONVERSATIONS_MISSING");

        let error = parse_document(r#"{ "conversations": [] }"#).expect_err("should fail");
        assert_eq!(error.code, "DOC_CONVERSATIONS_MISSING");
    }

    #[test]
    fn rejects_choice_without_target() {
        let error = parse_document(
            r#"{ "conversations": { "a": [ { "choices": [ { "text": "Go" } ] } ] } }"#,
        )
        .expect_err("should fail");
        assert_eq!(error.code, "DOC_CHOICE_TARGET_MISSING");
        assert!(error.message.contains("conversations.a[0].choices[0]"));
    }

    #[test]
    fn rejects_choice_without_text() {
        let error = parse_document(
            r#"{ "conversations": { "a": [ { "choices": [ { "goto": "b" } ] } ] } }"#,
        )
        .expect_err("should fail");
        assert_eq!(error.code, "DOC_CHOICE_TEXT_MISSING");
    }

    #[test]
    fn rejects_unsupported_scalar_shapes() {
        let error = parse_document(r#"{ "variables": { "bag": [] }, "conversations": {} }"#)
            .expect_err("should fail");
        assert_eq!(error.code, "DOC_VALUE_UNSUPPORTED");
        assert!(error.message.contains("variables.bag"));

        let error =
            parse_document(r#"{ "conversations": { "a": [ { "set": { "x": null } } ] } }"#)
                .expect_err("should fail");
        assert_eq!(error.code, "DOC_VALUE_UNSUPPORTED");
        assert!(error.message.contains("conversations.a[0].set.x"));
    }

    #[test]
    fn rejects_malformed_structure() {
        assert_eq!(
            parse_document("{").expect_err("should fail").code,
            "DOC_JSON_INVALID"
        );
        assert_eq!(
            parse_document("[]").expect_err("should fail").code,
            "DOC_ROOT_INVALID"
        );
        assert_eq!(
            parse_document(r#"{ "variables": 3, "conversations": {} }"#)
                .expect_err("should fail")
                .code,
            "DOC_VARIABLES_INVALID"
        );
        assert_eq!(
            parse_document(r#"{ "conversations": { "a": {} } }"#)
                .expect_err("should fail")
                .code,
            "DOC_NODE_INVALID"
        );
        assert_eq!(
            parse_document(r#"{ "conversations": { "a": [ { "speaker": 1 } ] } }"#)
                .expect_err("should fail")
                .code,
            "DOC_NODE_INVALID"
        );
        assert_eq!(
            parse_document(r#"{ "conversations": { "a": [ "hi" ] } }"#)
                .expect_err("should fail")
                .code,
            "DOC_NODE_INVALID"
        );
    }
}
