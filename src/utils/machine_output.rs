use crate::error::Result;
use chrono::Utc;
use clap::ValueEnum;
use serde::Serialize;

pub const ENVELOPE_VERSION: &str = "v1";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
    Yaml,
}

impl OutputFormat {
    pub fn is_machine(self) -> bool {
        !matches!(self, OutputFormat::Table)
    }
}

#[derive(Debug, Serialize)]
pub struct MachineEnvelope<T>
where
    T: Serialize,
{
    pub version: String,
    pub command: String,
    pub ok: bool,
    pub data: T,
    pub warnings: Vec<String>,
    pub errors: Vec<String>,
    pub meta: MachineMeta,
}

#[derive(Debug, Serialize)]
pub struct MachineMeta {
    pub generated_at: String,
}

impl<T: Serialize> MachineEnvelope<T> {
    pub fn new(command: &str, data: T, warnings: Vec<String>, errors: Vec<String>) -> Self {
        Self {
            version: ENVELOPE_VERSION.to_string(),
            command: command.to_string(),
            ok: errors.is_empty(),
            data,
            warnings,
            errors,
            meta: MachineMeta {
                generated_at: Utc::now().to_rfc3339(),
            },
        }
    }

    /// `None` for the table format; callers print tables themselves.
    pub fn render(&self, format: OutputFormat) -> Result<Option<String>> {
        Ok(match format {
            OutputFormat::Json => Some(serde_json::to_string_pretty(self)?),
            OutputFormat::Yaml => Some(serde_yml::to_string(self)?),
            OutputFormat::Table => None,
        })
    }
}

pub fn emit<T>(
    command: &str,
    data: T,
    warnings: Vec<String>,
    errors: Vec<String>,
    format: OutputFormat,
) -> Result<()>
where
    T: Serialize,
{
    let envelope = MachineEnvelope::new(command, data, warnings, errors);
    if let Some(out) = envelope.render(format)? {
        println!("{}", out);
    }
    Ok(())
}

#[cfg(test)]
mod tests;
