use reactor_types::{TransformKind, TransformRule};
use serde_json::json;

#[test]
fn deserializes_function_rule_with_parameters() {
    let rule: TransformRule = serde_json::from_value(json!({
        "type": "function",
        "propertyPath": "a.b",
        "parameters": ["event", "target"]
    }))
    .unwrap();
    assert_eq!(rule.kind, TransformKind::Function);
    assert_eq!(rule.property_path, "a.b");
    assert_eq!(
        rule.parameters,
        Some(vec!["event".to_string(), "target".to_string()])
    );
}

#[test]
fn unknown_kind_keeps_tag() {
    let rule: TransformRule =
        serde_json::from_value(json!({"type": "remoteFile", "propertyPath": "x"})).unwrap();
    assert_eq!(rule.kind, TransformKind::Unknown("remoteFile".into()));
    assert_eq!(rule.kind.to_string(), "remoteFile");
}

#[test]
fn kind_serializes_to_wire_tag() {
    let rule = TransformRule::new("source", TransformKind::CustomCode);
    let value = serde_json::to_value(&rule).unwrap();
    assert_eq!(value, json!({"propertyPath": "source", "type": "customCode"}));
}

#[test]
fn file_name_uses_property_path() {
    let rule = TransformRule::new("libraryCode.source", TransformKind::File);
    assert_eq!(rule.file_name(), "settings.libraryCode.source.js");
}

#[test]
fn with_parameters_builder() {
    let rule = TransformRule::new("fn", TransformKind::Function).with_parameters(["x"]);
    assert_eq!(rule.parameters.as_deref(), Some(&["x".to_string()][..]));
}
