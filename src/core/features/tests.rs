use super::*;
use crate::core::oracle::ExtensionTable;
use serde_json::json;

fn oracle(entries: &[(Backend, &[Capability])]) -> ExtensionTable {
    let mut table = ExtensionTable::empty();
    for (backend, caps) in entries {
        table.set(*backend, caps);
    }
    table
}

fn flags(configs: &[Configuration], name: &str) -> Vec<(Backend, bool)> {
    configs
        .iter()
        .map(|c| (c.backend, c.options[name].as_bool().unwrap()))
        .collect()
}

#[test]
fn builtin_declares_dynamic_index() {
    let table = FeatureTable::builtin();
    let toggle = &table.toggles()[0];
    assert_eq!(toggle.name, "dynamic_index");
    assert_eq!(toggle.variants[0].value, true);
    assert_eq!(toggle.variants[0].requires, vec![Capability::DynamicIndex]);
    assert!(toggle.variants[1].requires.is_empty());
}

#[test]
fn full_cross_product_is_backend_major() {
    let oracle = oracle(&[
        (Backend::X64, &[Capability::DynamicIndex]),
        (Backend::Cuda, &[Capability::DynamicIndex]),
    ]);
    let configs = FeatureTable::builtin().expand(
        &[Backend::X64, Backend::Cuda],
        &OptionMap::new(),
        &oracle,
    );

    assert_eq!(
        flags(&configs, "dynamic_index"),
        vec![
            (Backend::X64, true),
            (Backend::X64, false),
            (Backend::Cuda, true),
            (Backend::Cuda, false),
        ]
    );
}

#[test]
fn unsupported_variant_is_dropped() {
    let oracle = oracle(&[(Backend::Cuda, &[Capability::DynamicIndex])]);
    let configs = FeatureTable::builtin().expand(
        &[Backend::Opengl, Backend::Cuda],
        &OptionMap::new(),
        &oracle,
    );

    assert_eq!(
        flags(&configs, "dynamic_index"),
        vec![
            (Backend::Opengl, false),
            (Backend::Cuda, true),
            (Backend::Cuda, false),
        ]
    );
}

#[test]
fn pinned_option_keeps_only_matching_variant() {
    let oracle = ExtensionTable::builtin();
    let mut base = OptionMap::new();
    base.insert("dynamic_index".to_string(), json!(true));

    let configs = FeatureTable::builtin().expand(&[Backend::X64, Backend::Opengl], &base, &oracle);

    assert_eq!(flags(&configs, "dynamic_index"), vec![(Backend::X64, true)]);
}

#[test]
fn non_boolean_pin_rejects_every_variant() {
    let oracle = ExtensionTable::builtin();
    let mut base = OptionMap::new();
    base.insert("dynamic_index".to_string(), json!(1));

    let configs = FeatureTable::builtin().expand(&[Backend::X64], &base, &oracle);
    assert!(configs.is_empty());
}

#[test]
fn base_options_are_carried_into_every_configuration() {
    let oracle = ExtensionTable::builtin();
    let mut base = OptionMap::new();
    base.insert("debug".to_string(), json!(true));
    base.insert("default_fp".to_string(), json!("f64"));

    let configs = FeatureTable::builtin().expand(&[Backend::X64], &base, &oracle);

    assert_eq!(configs.len(), 2);
    for config in &configs {
        assert_eq!(config.options["debug"], json!(true));
        assert_eq!(config.options["default_fp"], json!("f64"));
        assert_eq!(config.options.len(), 3);
    }
}

#[test]
fn multiple_toggles_follow_declaration_then_variant_order() {
    let table = FeatureTable::from_toggles(vec![
        FeatureToggle::new("packed", Vec::new(), Vec::new()),
        FeatureToggle::new("dynamic_index", vec![Capability::DynamicIndex], Vec::new()),
    ])
    .unwrap();
    let oracle = ExtensionTable::builtin();

    let configs = table.expand(&[Backend::X64], &OptionMap::new(), &oracle);
    let pairs: Vec<(bool, bool)> = configs
        .iter()
        .map(|c| {
            (
                c.options["packed"].as_bool().unwrap(),
                c.options["dynamic_index"].as_bool().unwrap(),
            )
        })
        .collect();

    assert_eq!(
        pairs,
        vec![(true, true), (true, false), (false, true), (false, false)]
    );
}

#[test]
fn first_failing_toggle_prunes_the_subtree() {
    let table = FeatureTable::from_toggles(vec![
        FeatureToggle::new("packed", vec![Capability::Quant], vec![Capability::Quant]),
        FeatureToggle::new("dynamic_index", Vec::new(), Vec::new()),
    ])
    .unwrap();
    let oracle = ExtensionTable::builtin();

    assert!(table.expand(&[Backend::Opengl], &OptionMap::new(), &oracle).is_empty());
    assert_eq!(table.expand(&[Backend::X64], &OptionMap::new(), &oracle).len(), 4);
}

#[test]
fn empty_table_yields_one_configuration_per_backend() {
    let oracle = ExtensionTable::builtin();
    let configs = FeatureTable::empty().expand(
        &[Backend::Vulkan, Backend::Cc],
        &OptionMap::new(),
        &oracle,
    );
    assert_eq!(configs.len(), 2);
    assert!(configs.iter().all(|c| c.options.is_empty()));
}

#[test]
fn duplicate_toggle_is_rejected() {
    let result = FeatureTable::from_toggles(vec![
        FeatureToggle::new("packed", Vec::new(), Vec::new()),
        FeatureToggle::new("packed", Vec::new(), Vec::new()),
    ]);
    assert!(matches!(result, Err(MatrixError::ConfigError(_))));
}

#[test]
fn expansion_is_deterministic() {
    let oracle = ExtensionTable::builtin();
    let backends = [Backend::X64, Backend::Metal, Backend::Cc];
    let first = FeatureTable::builtin().expand(&backends, &OptionMap::new(), &oracle);
    let second = FeatureTable::builtin().expand(&backends, &OptionMap::new(), &oracle);
    assert_eq!(first, second);
}
