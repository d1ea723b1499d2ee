//! Feature toggles and the backend × toggle cross-product.
//!
//! A [`FeatureTable`] is built once and passed by reference; it is never
//! mutated after construction. Expansion order is backend-major, then toggle
//! declaration order, then variant order, so generated ids are stable.

use crate::core::oracle::CapabilityOracle;
use crate::core::types::{Backend, Capability};
use crate::error::{MatrixError, Result};
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;

/// Options forwarded to the runtime initializer, plus resolved toggle values.
pub type OptionMap = BTreeMap<String, Value>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FeatureVariant {
    pub value: bool,
    pub requires: Vec<Capability>,
}

impl FeatureVariant {
    pub fn new(value: bool, requires: Vec<Capability>) -> Self {
        Self { value, requires }
    }

    /// A variant is usable when the caller has not pinned the toggle to the
    /// other value and the backend has every capability it needs.
    fn admits(&self, backend: Backend, pinned: Option<&Value>, oracle: &dyn CapabilityOracle) -> bool {
        if pinned.is_some_and(|pinned| *pinned != Value::Bool(self.value)) {
            return false;
        }
        oracle.supports_all(backend, &self.requires)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FeatureToggle {
    pub name: String,
    pub variants: [FeatureVariant; 2],
}

impl FeatureToggle {
    /// Toggle whose `true` and `false` states need the given capabilities.
    pub fn new(
        name: impl Into<String>,
        on_requires: Vec<Capability>,
        off_requires: Vec<Capability>,
    ) -> Self {
        Self {
            name: name.into(),
            variants: [
                FeatureVariant::new(true, on_requires),
                FeatureVariant::new(false, off_requires),
            ],
        }
    }
}

/// One concrete run: a backend and the full options map.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Configuration {
    pub backend: Backend,
    pub options: OptionMap,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FeatureTable {
    toggles: Vec<FeatureToggle>,
}

impl FeatureTable {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn builtin() -> Self {
        Self {
            toggles: vec![FeatureToggle::new(
                "dynamic_index",
                vec![Capability::DynamicIndex],
                Vec::new(),
            )],
        }
    }

    pub fn from_toggles(toggles: Vec<FeatureToggle>) -> Result<Self> {
        let mut table = Self::empty();
        for toggle in toggles {
            table.push(toggle)?;
        }
        Ok(table)
    }

    fn push(&mut self, toggle: FeatureToggle) -> Result<()> {
        if self.toggles.iter().any(|t| t.name == toggle.name) {
            return Err(MatrixError::ConfigError(format!(
                "Feature '{}' is declared more than once",
                toggle.name
            )));
        }
        self.toggles.push(toggle);
        Ok(())
    }

    pub fn toggles(&self) -> &[FeatureToggle] {
        &self.toggles
    }

    pub fn is_empty(&self) -> bool {
        self.toggles.is_empty()
    }

    /// Cross-product `backends` with every toggle's variants, dropping any
    /// tuple where a variant conflicts with `base` or needs a capability the
    /// backend lacks. A failing toggle prunes every tuple below it.
    pub fn expand(
        &self,
        backends: &[Backend],
        base: &OptionMap,
        oracle: &dyn CapabilityOracle,
    ) -> Vec<Configuration> {
        let mut out = Vec::new();
        for &backend in backends {
            self.expand_from(0, backend, base.clone(), base, oracle, &mut out);
        }
        out
    }

    fn expand_from(
        &self,
        depth: usize,
        backend: Backend,
        options: OptionMap,
        base: &OptionMap,
        oracle: &dyn CapabilityOracle,
        out: &mut Vec<Configuration>,
    ) {
        let Some(toggle) = self.toggles.get(depth) else {
            out.push(Configuration { backend, options });
            return;
        };

        let pinned = base.get(&toggle.name);
        for variant in &toggle.variants {
            if !variant.admits(backend, pinned, oracle) {
                continue;
            }
            let mut next = options.clone();
            next.insert(toggle.name.clone(), Value::Bool(variant.value));
            self.expand_from(depth + 1, backend, next, base, oracle, out);
        }
    }
}

#[cfg(test)]
mod tests;
