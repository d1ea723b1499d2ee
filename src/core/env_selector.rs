//! Environment-driven backend selection.
//!
//! The value is a comma-separated list of backend names or groups. A leading
//! `^` flips it into exclude mode: every usable backend except the listed
//! ones. Empty tokens are dropped, so an unset or blank value means "no
//! restriction".

use crate::core::catalog::{BackendCatalog, join_backends};
use crate::core::types::Backend;
use crate::error::Result;
use crate::project_identity;
use crate::ui;
use std::collections::BTreeSet;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvSelection {
    requested: BTreeSet<Backend>,
    exclude: bool,
}

impl EnvSelection {
    /// No restriction: resolves to the usable set.
    pub fn unrestricted() -> Self {
        Self::default()
    }

    /// Parse a raw value. Unknown tokens are fatal.
    pub fn parse(raw: Option<&str>, catalog: &BackendCatalog) -> Result<Self> {
        let raw = raw.unwrap_or("");
        let (exclude, body) = match raw.strip_prefix('^') {
            Some(rest) => (true, rest),
            None => (false, raw),
        };

        let mut requested = BTreeSet::new();
        for token in body.split(',').filter(|token| !token.is_empty()) {
            requested.extend(catalog.resolve_token(token)?);
        }

        Ok(Self { requested, exclude })
    }

    /// Read and parse the wanted-archs variable.
    pub fn from_env(catalog: &BackendCatalog) -> Result<Self> {
        let raw = std::env::var(project_identity::wanted_archs_var()).ok();
        Self::parse(raw.as_deref(), catalog)
    }

    pub fn requested(&self) -> &BTreeSet<Backend> {
        &self.requested
    }

    pub fn is_exclude(&self) -> bool {
        self.exclude
    }

    pub fn is_unrestricted(&self) -> bool {
        self.requested.is_empty()
    }

    /// Backends a test may use. Include mode returns the requested set as-is,
    /// without usability filtering; exclude mode subtracts from `usable`, so
    /// excluding a backend this machine cannot run is silently a no-op.
    pub fn resolve(&self, usable: &BTreeSet<Backend>) -> BTreeSet<Backend> {
        let allowed: BTreeSet<Backend> = if self.requested.is_empty() {
            usable.clone()
        } else if self.exclude {
            usable.difference(&self.requested).copied().collect()
        } else {
            self.requested.clone()
        };
        ui::verbose(&format!(
            "env selection ({}{}): {}",
            if self.exclude { "exclude " } else { "include " },
            join_backends(&self.requested),
            join_backends(&allowed)
        ));
        allowed
    }
}

#[cfg(test)]
mod tests;
