use crate::core::catalog::BackendCatalog;
use crate::core::features::{FeatureToggle, OptionMap};
use crate::core::selector::TestConstraints;
use crate::core::types::{Backend, Capability};
use crate::error::{MatrixError, Result};
use kdl::{KdlDocument, KdlNode, KdlValue};
use regex::Regex;
use std::sync::LazyLock;

/// Toggle and option names must be plain identifiers; they end up as keyword
/// arguments of the runtime initializer.
static IDENTIFIER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("Invalid regex pattern"));

/// Raw settings as written in `archmatrix.kdl`, names already resolved.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawSettings {
    pub usable: Vec<Backend>,
    pub unusable: Vec<Backend>,
    pub grants: Vec<(Backend, Capability)>,
    pub revokes: Vec<(Backend, Capability)>,
    /// Present only when the file declares at least one `feature`.
    pub features: Option<Vec<FeatureToggle>>,
}

/// A `test` block from a manifest. Backend tokens stay textual so groups can
/// be expanded by the catalog that plans them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TestDeclaration {
    pub name: String,
    pub arch: Vec<String>,
    pub exclude: Vec<String>,
    pub require: Vec<Capability>,
    pub options: OptionMap,
}

impl TestDeclaration {
    /// Resolve backend tokens (names or groups) against `catalog`. Unknown
    /// names are fatal.
    pub fn constraints(&self, catalog: &BackendCatalog) -> Result<TestConstraints> {
        Ok(TestConstraints::new()
            .arch(catalog.resolve_tokens(&self.arch)?)
            .exclude(catalog.resolve_tokens(&self.exclude)?)
            .require(self.require.clone())
            .options(self.options.clone()))
    }
}

fn parse_document(content: &str) -> Result<KdlDocument> {
    content.parse().map_err(|e: kdl::KdlError| {
        let err_msg = e.to_string();
        let hint = if err_msg.contains("unexpected end of file") {
            "\nHint: You might be missing a closing brace '}'."
        } else if err_msg.contains("expected") {
            "\nHint: Booleans are written #true / #false; names must be quoted strings."
        } else {
            ""
        };
        MatrixError::ConfigError(format!("KDL parsing error: {}{}", err_msg, hint))
    })
}

pub fn parse_settings(content: &str) -> Result<RawSettings> {
    let doc = parse_document(content)?;
    let mut settings = RawSettings::default();

    for node in doc.nodes() {
        match node.name().value() {
            "backends" => parse_backends_node(node, &mut settings)?,
            "capability" | "capabilities" => parse_capability_node(node, &mut settings)?,
            "feature" => {
                let toggle = parse_feature_node(node)?;
                settings.features.get_or_insert_with(Vec::new).push(toggle);
            }
            _ => {}
        }
    }

    Ok(settings)
}

/// backends { usable "vulkan"; unusable "cuda" }
fn parse_backends_node(node: &KdlNode, settings: &mut RawSettings) -> Result<()> {
    let Some(children) = node.children() else {
        return Ok(());
    };
    for child in children.nodes() {
        match child.name().value() {
            "usable" => settings.usable.extend(parse_backends(child)?),
            "unusable" => settings.unusable.extend(parse_backends(child)?),
            other => {
                return Err(MatrixError::ConfigError(format!(
                    "Unknown entry '{}' in backends block (expected usable/unusable)",
                    other
                )));
            }
        }
    }
    Ok(())
}

/// capability "opengl" { grant "data64"; revoke "extfunc" }
fn parse_capability_node(node: &KdlNode, settings: &mut RawSettings) -> Result<()> {
    let backend: Backend = first_string(node, "capability")?.parse()?;
    let Some(children) = node.children() else {
        return Ok(());
    };
    for child in children.nodes() {
        let target = match child.name().value() {
            "grant" => &mut settings.grants,
            "revoke" => &mut settings.revokes,
            other => {
                return Err(MatrixError::ConfigError(format!(
                    "Unknown entry '{}' in capability block (expected grant/revoke)",
                    other
                )));
            }
        };
        for capability in parse_capabilities(child)? {
            target.push((backend, capability));
        }
    }
    Ok(())
}

/// feature "dynamic_index" { on "dynamic_index"; off }
fn parse_feature_node(node: &KdlNode) -> Result<FeatureToggle> {
    let name = first_string(node, "feature")?;
    validate_identifier("feature", &name)?;

    let mut on = Vec::new();
    let mut off = Vec::new();
    if let Some(children) = node.children() {
        for child in children.nodes() {
            match child.name().value() {
                "on" => on.extend(parse_capabilities(child)?),
                "off" => off.extend(parse_capabilities(child)?),
                other => {
                    return Err(MatrixError::ConfigError(format!(
                        "Unknown entry '{}' in feature '{}' (expected on/off)",
                        other, name
                    )));
                }
            }
        }
    }

    Ok(FeatureToggle::new(name, on, off))
}

pub fn parse_manifest(content: &str) -> Result<Vec<TestDeclaration>> {
    let doc = parse_document(content)?;
    let mut tests: Vec<TestDeclaration> = Vec::new();

    for node in doc.nodes() {
        if node.name().value() != "test" {
            continue;
        }
        let decl = parse_test_node(node)?;
        if tests.iter().any(|t| t.name == decl.name) {
            return Err(MatrixError::ConfigError(format!(
                "Test '{}' is declared more than once",
                decl.name
            )));
        }
        tests.push(decl);
    }

    Ok(tests)
}

fn parse_test_node(node: &KdlNode) -> Result<TestDeclaration> {
    let mut decl = TestDeclaration {
        name: first_string(node, "test")?,
        ..Default::default()
    };

    let Some(children) = node.children() else {
        return Ok(decl);
    };

    for child in children.nodes() {
        match child.name().value() {
            "arch" => decl.arch.extend(strings(child)?),
            "exclude" => decl.exclude.extend(strings(child)?),
            "require" => decl.require.extend(parse_capabilities(child)?),
            "option" => {
                let (key, value) = parse_option(child)?;
                decl.options.insert(key, value);
            }
            other => {
                return Err(MatrixError::ConfigError(format!(
                    "Unknown entry '{}' in test '{}'",
                    other, decl.name
                )));
            }
        }
    }

    Ok(decl)
}

/// option "debug" #true
fn parse_option(node: &KdlNode) -> Result<(String, serde_json::Value)> {
    let entries = node.entries();
    let [key, value] = entries else {
        return Err(MatrixError::ConfigError(
            "option needs exactly a name and a value: option \"debug\" #true".to_string(),
        ));
    };
    if let Some(property) = entries.iter().find_map(|entry| entry.name()) {
        return Err(MatrixError::ConfigError(format!(
            "option does not take properties (found '{}=')",
            property.value()
        )));
    }
    let key = key
        .value()
        .as_string()
        .ok_or_else(|| MatrixError::ConfigError("option name must be a string".to_string()))?
        .to_string();
    validate_identifier("option", &key)?;
    Ok((key, kdl_to_json(value.value())?))
}

pub(crate) fn kdl_to_json(value: &KdlValue) -> Result<serde_json::Value> {
    Ok(match value {
        KdlValue::String(s) => serde_json::Value::String(s.clone()),
        KdlValue::Bool(b) => serde_json::Value::Bool(*b),
        KdlValue::Null => serde_json::Value::Null,
        KdlValue::Integer(i) => {
            let i = i64::try_from(*i).map_err(|_| {
                MatrixError::InvalidOption(format!("integer {} does not fit in 64 bits", i))
            })?;
            serde_json::Value::from(i)
        }
        KdlValue::Float(f) => serde_json::Number::from_f64(*f)
            .map(serde_json::Value::Number)
            .ok_or_else(|| MatrixError::InvalidOption(format!("{} is not a finite number", f)))?,
    })
}

pub(crate) fn validate_identifier(kind: &str, name: &str) -> Result<()> {
    if IDENTIFIER.is_match(name) {
        Ok(())
    } else {
        Err(MatrixError::ConfigError(format!(
            "Invalid {} name '{}': use letters, digits and underscores",
            kind, name
        )))
    }
}

fn first_string(node: &KdlNode, what: &str) -> Result<String> {
    node.entries()
        .first()
        .and_then(|entry| entry.value().as_string())
        .map(ToString::to_string)
        .ok_or_else(|| MatrixError::ConfigError(format!("{} block needs a name: {} \"name\" {{ }}", what, what)))
}

fn strings(node: &KdlNode) -> Result<Vec<String>> {
    node.entries()
        .iter()
        .map(|entry| {
            if let Some(property) = entry.name() {
                return Err(MatrixError::ConfigError(format!(
                    "'{}' takes plain arguments, not properties (found '{}=')",
                    node.name().value(),
                    property.value()
                )));
            }
            entry.value().as_string().map(ToString::to_string).ok_or_else(|| {
                MatrixError::ConfigError(format!(
                    "'{}' expects string arguments, got {}",
                    node.name().value(),
                    entry.value()
                ))
            })
        })
        .collect()
}

fn parse_backends(node: &KdlNode) -> Result<Vec<Backend>> {
    strings(node)?.iter().map(|name| name.parse()).collect()
}

fn parse_capabilities(node: &KdlNode) -> Result<Vec<Capability>> {
    strings(node)?.iter().map(|name| name.parse()).collect()
}
