use super::*;

#[derive(Debug, Serialize)]
struct Payload {
    value: u32,
}

#[test]
fn envelope_ok_reflects_errors_empty() {
    let env = MachineEnvelope::new("plan", Payload { value: 1 }, vec![], vec![]);
    let json = serde_json::to_value(&env).expect("serialize");
    assert_eq!(json["version"], "v1");
    assert_eq!(json["command"], "plan");
    assert_eq!(json["ok"], true);
    assert_eq!(json["data"]["value"], 1);

    let env = MachineEnvelope::new("check", Payload { value: 2 }, vec![], vec!["err".to_string()]);
    assert!(!env.ok);
}

#[test]
fn table_format_renders_nothing() {
    let env = MachineEnvelope::new("archs", Payload { value: 3 }, vec![], vec![]);
    assert!(env.render(OutputFormat::Table).unwrap().is_none());
}

#[test]
fn json_and_yaml_carry_core_fields() {
    let env = MachineEnvelope::new(
        "resolve",
        Payload { value: 4 },
        vec!["warn".to_string()],
        vec![],
    );

    let json = env.render(OutputFormat::Json).unwrap().unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert!(parsed.get("meta").and_then(|m| m.get("generated_at")).is_some());
    assert_eq!(parsed["warnings"][0], "warn");

    let yaml = env.render(OutputFormat::Yaml).unwrap().unwrap();
    assert!(yaml.contains("command: resolve"));
    assert!(yaml.contains("value: 4"));
}

#[test]
fn only_table_is_human() {
    assert!(!OutputFormat::Table.is_machine());
    assert!(OutputFormat::Json.is_machine());
    assert!(OutputFormat::Yaml.is_machine());
}
