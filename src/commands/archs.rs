use crate::config::MatrixContext;
use crate::core::oracle::CapabilityOracle;
use crate::core::types::{Backend, Capability};
use crate::error::Result;
use crate::ui as output;
use crate::utils::machine_output::{self, OutputFormat};
use colored::Colorize;
use serde::Serialize;

#[derive(Debug, Serialize)]
struct ArchRow {
    name: Backend,
    usable: bool,
    cpu: bool,
    capabilities: Vec<Capability>,
}

pub fn run(context: &MatrixContext, format: OutputFormat) -> Result<()> {
    let catalog = context.catalog();
    let rows: Vec<ArchRow> = catalog
        .known()
        .iter()
        .map(|&backend| ArchRow {
            name: backend,
            usable: catalog.is_usable(backend),
            cpu: backend.is_cpu(),
            capabilities: Capability::ALL
                .into_iter()
                .filter(|&cap| context.oracle().is_supported(backend, cap))
                .collect(),
        })
        .collect();

    if format.is_machine() {
        return machine_output::emit("archs", rows, Vec::new(), Vec::new(), format);
    }

    output::header("Backends");
    output::keyval(
        "settings",
        &context
            .source()
            .map(|path| path.display().to_string())
            .unwrap_or_else(|| "(builtin)".to_string()),
    );
    for row in &rows {
        let mark = if row.usable {
            "✓".green().bold()
        } else {
            "✗".bright_black()
        };
        let group = if row.cpu { "cpu" } else { "gpu" };
        let capabilities = row
            .capabilities
            .iter()
            .map(|cap| cap.name())
            .collect::<Vec<_>>()
            .join(", ");
        output::indent(
            &format!(
                "{} {:<8} {:<4} {}",
                mark,
                row.name.name(),
                group.dimmed(),
                if capabilities.is_empty() {
                    "-".to_string()
                } else {
                    capabilities
                }
            ),
            1,
        );
    }

    let usable = rows.iter().filter(|row| row.usable).count();
    output::info(&format!("{} of {} backends usable", usable, rows.len()));
    Ok(())
}
