//! Configuration selector: the per-test entry point.
//!
//! Combines the caller's arch/exclude/require constraints with the
//! environment selection and the feature table into either an ordered list
//! of parametrized cases or a skip. Name-resolution failures are errors;
//! "nothing can run here" is an ordinary [`Selection::Skip`].

use crate::core::catalog::{BackendCatalog, join_backends};
use crate::core::env_selector::EnvSelection;
use crate::core::features::{Configuration, FeatureTable, OptionMap};
use crate::core::oracle::CapabilityOracle;
use crate::core::types::{Backend, Capability, SingleOrMany};
use crate::error::Result;
use crate::ui;
use serde::Serialize;
use serde_json::Value;
use std::fmt;

/// Per-test declaration: which backends to include and exclude, which
/// capabilities every run needs, and options forwarded to the runtime.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TestConstraints {
    pub arch: Vec<Backend>,
    pub exclude: Vec<Backend>,
    pub require: Vec<Capability>,
    pub options: OptionMap,
}

impl TestConstraints {
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty means every allowed backend.
    pub fn arch(mut self, arch: impl Into<SingleOrMany<Backend>>) -> Self {
        self.arch = arch.into().normalize();
        self
    }

    pub fn exclude(mut self, exclude: impl Into<SingleOrMany<Backend>>) -> Self {
        self.exclude = exclude.into().normalize();
        self
    }

    pub fn require(mut self, require: impl Into<SingleOrMany<Capability>>) -> Self {
        self.require = require.into().normalize();
        self
    }

    pub fn option(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.options.insert(key.into(), value.into());
        self
    }

    pub fn options(mut self, options: OptionMap) -> Self {
        self.options.extend(options);
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// Include/env filtering left no backend at all.
    NoSupportedArchs,
    /// Some backend was eligible but no toggle combination fits it.
    UnsupportedExtensions,
}

impl SkipReason {
    pub const fn message(self) -> &'static str {
        match self {
            SkipReason::NoSupportedArchs => "No supported archs",
            SkipReason::UnsupportedExtensions => "No all required extensions are supported",
        }
    }
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParamCase {
    pub id: String,
    #[serde(flatten)]
    pub config: Configuration,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Selection {
    Skip(SkipReason),
    Run(Vec<ParamCase>),
}

impl Selection {
    pub fn is_skip(&self) -> bool {
        matches!(self, Selection::Skip(_))
    }

    pub fn cases(&self) -> &[ParamCase] {
        match self {
            Selection::Skip(_) => &[],
            Selection::Run(cases) => cases,
        }
    }

    pub fn skip_reason(&self) -> Option<SkipReason> {
        match self {
            Selection::Skip(reason) => Some(*reason),
            Selection::Run(_) => None,
        }
    }
}

/// `arch={name}` for a single case, `arch={name}-{i}` otherwise, with `i`
/// running across the whole list.
pub fn case_ids(configs: &[Configuration]) -> Vec<String> {
    let single = configs.len() == 1;
    configs
        .iter()
        .enumerate()
        .map(|(index, config)| {
            if single {
                format!("arch={}", config.backend)
            } else {
                format!("arch={}-{}", config.backend, index)
            }
        })
        .collect()
}

pub struct Selector<'a> {
    catalog: &'a BackendCatalog,
    oracle: &'a dyn CapabilityOracle,
    features: &'a FeatureTable,
}

impl<'a> Selector<'a> {
    pub fn new(
        catalog: &'a BackendCatalog,
        oracle: &'a dyn CapabilityOracle,
        features: &'a FeatureTable,
    ) -> Self {
        Self {
            catalog,
            oracle,
            features,
        }
    }

    pub fn catalog(&self) -> &'a BackendCatalog {
        self.catalog
    }

    /// Read the wanted-archs variable, then select.
    pub fn select_from_env(&self, constraints: &TestConstraints) -> Result<Selection> {
        let env = EnvSelection::from_env(self.catalog)?;
        Ok(self.select(constraints, &env))
    }

    pub fn select(&self, constraints: &TestConstraints, env: &EnvSelection) -> Selection {
        let allowed = env.resolve(self.catalog.usable());

        let candidates: Vec<Backend> = if constraints.arch.is_empty() {
            allowed.iter().copied().collect()
        } else {
            constraints
                .arch
                .iter()
                .copied()
                .filter(|backend| allowed.contains(backend))
                .collect()
        };
        ui::verbose(&format!("candidates: {}", join_backends(&candidates)));

        if candidates.is_empty() {
            return Selection::Skip(SkipReason::NoSupportedArchs);
        }

        let eligible: Vec<Backend> = candidates
            .into_iter()
            .filter(|backend| !constraints.exclude.contains(backend))
            .filter(|backend| self.oracle.supports_all(*backend, &constraints.require))
            .collect();
        ui::verbose(&format!("eligible: {}", join_backends(&eligible)));

        let configs = self
            .features
            .expand(&eligible, &constraints.options, self.oracle);
        if configs.is_empty() {
            return Selection::Skip(SkipReason::UnsupportedExtensions);
        }

        let cases = case_ids(&configs)
            .into_iter()
            .zip(configs)
            .map(|(id, config)| ParamCase { id, config })
            .collect();
        Selection::Run(cases)
    }
}
