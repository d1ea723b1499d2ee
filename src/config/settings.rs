//! Settings Module
//!
//! Loads `archmatrix.kdl` and turns it into the immutable catalog, oracle and
//! feature table every selection in the process shares.

use crate::config::kdl::{RawSettings, parse_settings};
use crate::core::catalog::{BackendCatalog, BackendProbe, SystemProbe};
use crate::core::features::FeatureTable;
use crate::core::oracle::ExtensionTable;
use crate::core::selector::Selector;
use crate::error::{MatrixError, Result};
use crate::ui;
use crate::utils::paths;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default)]
pub struct Settings {
    source: Option<PathBuf>,
    raw: RawSettings,
}

impl Settings {
    /// Explicit paths must exist; the default path is optional.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let path = match explicit {
            Some(path) => {
                if !path.exists() {
                    return Err(MatrixError::ConfigNotFound {
                        path: path.to_path_buf(),
                    });
                }
                path.to_path_buf()
            }
            None => match paths::config_file() {
                Ok(path) if path.exists() => path,
                _ => {
                    ui::verbose("no settings file, using builtin tables");
                    return Ok(Self::default());
                }
            },
        };

        let content = fs::read_to_string(&path).map_err(|source| MatrixError::IoError {
            path: path.clone(),
            source,
        })?;
        let raw = parse_settings(&content).map_err(|e| match e {
            MatrixError::ConfigError(message) => MatrixError::ParseError {
                file: path.display().to_string(),
                message,
            },
            other => other,
        })?;
        ui::verbose(&format!("loaded settings from {}", path.display()));

        Ok(Self {
            source: Some(path),
            raw,
        })
    }

    pub fn parse(content: &str) -> Result<Self> {
        Ok(Self {
            source: None,
            raw: parse_settings(content)?,
        })
    }

    pub fn probe(&self) -> SystemProbe {
        SystemProbe::with_overrides(
            self.raw.usable.iter().copied().collect(),
            self.raw.unusable.iter().copied().collect(),
        )
    }

    pub fn oracle(&self) -> ExtensionTable {
        let mut table = ExtensionTable::builtin();
        for (backend, capability) in &self.raw.grants {
            table.grant(*backend, *capability);
        }
        for (backend, capability) in &self.raw.revokes {
            table.revoke(*backend, *capability);
        }
        table
    }

    /// Declared features replace the builtin table entirely.
    pub fn features(&self) -> Result<FeatureTable> {
        match &self.raw.features {
            Some(toggles) => FeatureTable::from_toggles(toggles.clone()),
            None => Ok(FeatureTable::builtin()),
        }
    }

    fn has_probe_overrides(&self) -> bool {
        !self.raw.usable.is_empty() || !self.raw.unusable.is_empty()
    }

    /// Without backend overrides the process-wide system catalog is shared,
    /// so the host is probed at most once per process.
    pub fn into_context(self) -> Result<MatrixContext> {
        let features = self.features()?;
        let oracle = self.oracle();
        let catalog = if self.has_probe_overrides() {
            ContextCatalog::Owned(BackendCatalog::new(Box::new(self.probe())))
        } else {
            ContextCatalog::System
        };
        Ok(MatrixContext {
            catalog,
            oracle,
            features,
            source: self.source,
        })
    }
}

enum ContextCatalog {
    System,
    Owned(BackendCatalog),
}

/// Everything a selection reads, built once per process.
pub struct MatrixContext {
    catalog: ContextCatalog,
    oracle: ExtensionTable,
    features: FeatureTable,
    source: Option<PathBuf>,
}

impl MatrixContext {
    pub fn new(
        probe: Box<dyn BackendProbe>,
        oracle: ExtensionTable,
        features: FeatureTable,
    ) -> Self {
        Self {
            catalog: ContextCatalog::Owned(BackendCatalog::new(probe)),
            oracle,
            features,
            source: None,
        }
    }

    pub fn catalog(&self) -> &BackendCatalog {
        match &self.catalog {
            ContextCatalog::System => BackendCatalog::system(),
            ContextCatalog::Owned(catalog) => catalog,
        }
    }

    pub fn oracle(&self) -> &ExtensionTable {
        &self.oracle
    }

    pub fn features(&self) -> &FeatureTable {
        &self.features
    }

    /// Settings file the context was loaded from, if any.
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    pub fn selector(&self) -> Selector<'_> {
        Selector::new(self.catalog(), &self.oracle, &self.features)
    }
}
