use crate::commands::{env_selection, view};
use crate::config::MatrixContext;
use crate::config::kdl::{TestDeclaration, validate_identifier};
use crate::core::env_selector::EnvSelection;
use crate::core::features::OptionMap;
use crate::core::registration::{TestRegistration, register};
use crate::core::types::Capability;
use crate::error::{MatrixError, Result};
use crate::ui as output;
use crate::utils::machine_output::{self, OutputFormat};
use serde_json::Value;

pub struct PlanOptions {
    pub name: String,
    pub arch: Vec<String>,
    pub exclude: Vec<String>,
    pub require: Vec<String>,
    pub options: Vec<String>,
    pub wanted: Option<String>,
}

pub fn run(context: &MatrixContext, options: PlanOptions, format: OutputFormat) -> Result<()> {
    let declaration = TestDeclaration {
        name: options.name,
        arch: options.arch,
        exclude: options.exclude,
        require: options
            .require
            .iter()
            .map(|name| name.parse::<Capability>())
            .collect::<Result<_>>()?,
        options: parse_options(&options.options)?,
    };

    let env = env_selection(context, options.wanted.as_deref())?;
    let registration = plan_declaration(context, &declaration, &env)?;

    if format.is_machine() {
        return machine_output::emit("plan", registration, Vec::new(), Vec::new(), format);
    }

    output::header("Plan");
    view::print_registration(&registration);
    Ok(())
}

/// Resolve one declaration under `env` and turn the selection into a
/// registration descriptor.
pub(crate) fn plan_declaration(
    context: &MatrixContext,
    declaration: &TestDeclaration,
    env: &EnvSelection,
) -> Result<TestRegistration> {
    let constraints = declaration.constraints(context.catalog())?;
    output::verbose(&format!("planning {}", declaration.name));
    let selection = context.selector().select(&constraints, env);
    Ok(register(declaration.name.clone(), selection))
}

/// `KEY=VALUE` pairs; VALUE is read as JSON and falls back to a plain string.
pub(crate) fn parse_options(pairs: &[String]) -> Result<OptionMap> {
    let mut options = OptionMap::new();
    for pair in pairs {
        let Some((key, raw)) = pair.split_once('=') else {
            return Err(MatrixError::InvalidOption(format!(
                "'{}' (expected KEY=VALUE)",
                pair
            )));
        };
        let key = key.trim();
        validate_identifier("option", key)
            .map_err(|_| MatrixError::InvalidOption(format!("'{}' is not a valid option name", key)))?;
        let value = serde_json::from_str::<Value>(raw).unwrap_or_else(|_| Value::String(raw.to_string()));
        options.insert(key.to_string(), value);
    }
    Ok(options)
}
