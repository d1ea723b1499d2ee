use crate::commands::env_selection;
use crate::config::MatrixContext;
use crate::core::catalog::join_backends;
use crate::core::types::Backend;
use crate::error::Result;
use crate::project_identity;
use crate::ui as output;
use crate::utils::machine_output::{self, OutputFormat};
use serde::Serialize;

#[derive(Debug, Serialize)]
struct ResolveReport {
    variable: String,
    value: Option<String>,
    mode: &'static str,
    requested: Vec<Backend>,
    usable: Vec<Backend>,
    allowed: Vec<Backend>,
    settings: Option<String>,
}

pub fn run(context: &MatrixContext, wanted: Option<&str>, format: OutputFormat) -> Result<()> {
    let variable = project_identity::wanted_archs_var();
    let value = match wanted {
        Some(raw) => Some(raw.to_string()),
        None => std::env::var(&variable).ok(),
    };

    let selection = env_selection(context, value.as_deref())?;
    let usable = context.catalog().usable();
    let allowed = selection.resolve(usable);

    let mode = if selection.is_unrestricted() {
        "all"
    } else if selection.is_exclude() {
        "exclude"
    } else {
        "include"
    };

    let report = ResolveReport {
        variable,
        value,
        mode,
        requested: selection.requested().iter().copied().collect(),
        usable: usable.iter().copied().collect(),
        allowed: allowed.iter().copied().collect(),
        settings: context.source().map(|path| path.display().to_string()),
    };

    if format.is_machine() {
        return machine_output::emit("resolve", report, Vec::new(), Vec::new(), format);
    }

    output::header("Wanted archs");
    output::keyval(
        &report.variable,
        report.value.as_deref().unwrap_or("(unset)"),
    );
    output::keyval("mode", report.mode);
    if !report.requested.is_empty() {
        output::keyval("requested", &join_backends(&report.requested));
    }
    output::keyval("usable", &join_backends(&report.usable));
    output::keyval("allowed", &join_backends(&report.allowed));
    if let Some(settings) = &report.settings {
        output::keyval("settings", settings);
    }

    let unusable: Vec<Backend> = report
        .allowed
        .iter()
        .copied()
        .filter(|backend| !usable.contains(backend))
        .collect();
    if !unusable.is_empty() {
        output::warning(&format!(
            "requested but not usable here: {}",
            join_backends(&unusable)
        ));
    }
    Ok(())
}

