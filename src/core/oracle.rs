//! Capability oracle: which backend supports which extension.

use crate::core::types::{Backend, Capability};
use std::collections::{BTreeMap, BTreeSet};

pub trait CapabilityOracle: Send + Sync {
    fn is_supported(&self, backend: Backend, capability: Capability) -> bool;

    fn supports_all(&self, backend: Backend, capabilities: &[Capability]) -> bool {
        capabilities
            .iter()
            .all(|capability| self.is_supported(backend, *capability))
    }
}

/// Support relation as a per-backend table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtensionTable {
    support: BTreeMap<Backend, BTreeSet<Capability>>,
}

impl ExtensionTable {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Support shipped with the runtime. Drivers may add or remove entries at
    /// run time; settings express that through [`grant`](Self::grant) and
    /// [`revoke`](Self::revoke).
    pub fn builtin() -> Self {
        use Capability::*;

        let cpu = [
            Sparse, Quant, QuantBasic, Data64, Adstack, Assertion, Extfunc, DynamicIndex, Mesh,
        ];

        let mut table = Self::empty();
        table.set(Backend::X64, &cpu);
        table.set(Backend::Arm64, &cpu);
        table.set(
            Backend::Cuda,
            &[
                Sparse, Quant, QuantBasic, Data64, Adstack, Bls, Assertion, DynamicIndex, Mesh,
            ],
        );
        table.set(Backend::Metal, &[Adstack, Assertion, DynamicIndex, Sparse]);
        table.set(Backend::Opengl, &[Extfunc]);
        table.set(Backend::Cc, &[Data64, Extfunc, Adstack]);
        table.set(Backend::Vulkan, &[]);
        table.set(Backend::Dx11, &[]);
        table
    }

    pub fn set(&mut self, backend: Backend, capabilities: &[Capability]) {
        self.support
            .insert(backend, capabilities.iter().copied().collect());
    }

    pub fn grant(&mut self, backend: Backend, capability: Capability) {
        self.support.entry(backend).or_default().insert(capability);
    }

    pub fn revoke(&mut self, backend: Backend, capability: Capability) {
        if let Some(caps) = self.support.get_mut(&backend) {
            caps.remove(&capability);
        }
    }

    pub fn supported(&self, backend: Backend) -> impl Iterator<Item = Capability> + '_ {
        self.support
            .get(&backend)
            .into_iter()
            .flat_map(|caps| caps.iter().copied())
    }
}

impl CapabilityOracle for ExtensionTable {
    fn is_supported(&self, backend: Backend, capability: Capability) -> bool {
        self.support
            .get(&backend)
            .is_some_and(|caps| caps.contains(&capability))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_table_matches_runtime_support() {
        let table = ExtensionTable::builtin();
        assert!(table.is_supported(Backend::Cuda, Capability::Bls));
        assert!(!table.is_supported(Backend::X64, Capability::Bls));
        assert!(table.is_supported(Backend::Metal, Capability::DynamicIndex));
        assert!(!table.is_supported(Backend::Opengl, Capability::DynamicIndex));
        assert!(table.is_supported(Backend::Cc, Capability::Data64));
        assert_eq!(table.supported(Backend::Vulkan).count(), 0);
    }

    #[test]
    fn grant_and_revoke_edit_one_pair() {
        let mut table = ExtensionTable::builtin();
        table.grant(Backend::Opengl, Capability::Data64);
        table.revoke(Backend::Opengl, Capability::Extfunc);

        assert!(table.is_supported(Backend::Opengl, Capability::Data64));
        assert!(!table.is_supported(Backend::Opengl, Capability::Extfunc));
        assert!(table.is_supported(Backend::Cc, Capability::Extfunc));
    }

    #[test]
    fn revoke_on_missing_backend_is_noop() {
        let mut table = ExtensionTable::empty();
        table.revoke(Backend::Cuda, Capability::Sparse);
        assert_eq!(table, ExtensionTable::empty());
    }

    #[test]
    fn supports_all_requires_every_capability() {
        let table = ExtensionTable::builtin();
        assert!(table.supports_all(Backend::Cuda, &[Capability::Sparse, Capability::Bls]));
        assert!(!table.supports_all(Backend::Metal, &[Capability::Sparse, Capability::Bls]));
        assert!(table.supports_all(Backend::Vulkan, &[]));
    }

    #[test]
    fn capability_names_are_case_sensitive() {
        assert_eq!("mesh".parse::<Capability>().unwrap(), Capability::Mesh);
        assert!("Mesh".parse::<Capability>().is_err());
    }
}
