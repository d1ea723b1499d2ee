use crate::commands::plan::plan_declaration;
use crate::commands::{env_selection, view};
use crate::config::MatrixContext;
use crate::config::kdl::parse_manifest;
use crate::core::registration::TestRegistration;
use crate::error::{MatrixError, Result};
use crate::ui as output;
use crate::utils::machine_output::{self, OutputFormat};
use rayon::prelude::*;
use serde::Serialize;
use std::fs;
use std::path::Path;

#[derive(Debug, Serialize)]
struct CheckReport {
    manifest: String,
    total: usize,
    skipped: usize,
    cases: usize,
    tests: Vec<TestRegistration>,
}

pub fn run(
    context: &MatrixContext,
    manifest: &Path,
    wanted: Option<&str>,
    strict: bool,
    format: OutputFormat,
) -> Result<()> {
    let content = fs::read_to_string(manifest).map_err(|source| MatrixError::IoError {
        path: manifest.to_path_buf(),
        source,
    })?;
    let declarations = parse_manifest(&content).map_err(|e| match e {
        MatrixError::ConfigError(message) => MatrixError::ParseError {
            file: manifest.display().to_string(),
            message,
        },
        other => other,
    })?;

    let env = env_selection(context, wanted)?;
    // Probe once up front so worker threads only read the cached set.
    context.catalog().usable();

    let tests: Vec<TestRegistration> = declarations
        .par_iter()
        .map(|declaration| plan_declaration(context, declaration, &env))
        .collect::<Result<_>>()?;

    let skipped: Vec<String> = tests
        .iter()
        .filter(|reg| reg.is_skipped())
        .map(|reg| format!("{} would be skipped", reg.name))
        .collect();
    let skipped_count = skipped.len();
    let report = CheckReport {
        manifest: manifest.display().to_string(),
        total: tests.len(),
        skipped: skipped_count,
        cases: tests.iter().map(|reg| reg.cases.len()).sum(),
        tests,
    };

    if format.is_machine() {
        let (warnings, errors) = if strict {
            (Vec::new(), skipped)
        } else {
            (skipped, Vec::new())
        };
        machine_output::emit("check", report, warnings, errors, format)?;
    } else {
        output::header(&format!("Plan for {}", report.manifest));
        for reg in &report.tests {
            view::print_registration(reg);
        }
        output::info(&format!(
            "{} test{}, {} case{}, {} skipped",
            report.total,
            view::plural(report.total),
            report.cases,
            view::plural(report.cases),
            report.skipped
        ));
    }

    if strict && skipped_count > 0 {
        return Err(MatrixError::StrictCheckFailed(skipped_count));
    }
    Ok(())
}
