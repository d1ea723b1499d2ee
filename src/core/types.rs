use crate::error::MatrixError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// Execution targets of the numerical runtime.
// Declaration order is the canonical catalog order: every enumerated backend
// set (usable set, env selection, default candidates) iterates in this order.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    X64,
    Arm64,
    Cuda,
    Metal,
    Vulkan,
    Opengl,
    Dx11,
    Cc,
}

impl Backend {
    pub const ALL: [Backend; 8] = [
        Backend::X64,
        Backend::Arm64,
        Backend::Cuda,
        Backend::Metal,
        Backend::Vulkan,
        Backend::Opengl,
        Backend::Dx11,
        Backend::Cc,
    ];

    /// Members of the `gpu` group, in group order.
    pub const GPU: [Backend; 5] = [
        Backend::Cuda,
        Backend::Metal,
        Backend::Opengl,
        Backend::Vulkan,
        Backend::Dx11,
    ];

    /// The CPU backend matching the compile target.
    pub const fn host_cpu() -> Backend {
        if cfg!(target_arch = "aarch64") {
            Backend::Arm64
        } else {
            Backend::X64
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Backend::X64 => "x64",
            Backend::Arm64 => "arm64",
            Backend::Cuda => "cuda",
            Backend::Metal => "metal",
            Backend::Vulkan => "vulkan",
            Backend::Opengl => "opengl",
            Backend::Dx11 => "dx11",
            Backend::Cc => "cc",
        }
    }

    pub const fn is_cpu(self) -> bool {
        matches!(self, Backend::X64 | Backend::Arm64)
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// Exact, case-sensitive name match. Group names (`cpu`, `gpu`) are resolved
// by the catalog, not here.
impl FromStr for Backend {
    type Err = MatrixError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Backend::ALL
            .into_iter()
            .find(|backend| backend.name() == s)
            .ok_or_else(|| MatrixError::UnknownBackend(s.to_string()))
    }
}

// Optional runtime features ("extensions") a backend may or may not support.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    Sparse,
    Quant,
    QuantBasic,
    Data64,
    Adstack,
    Bls,
    Assertion,
    Extfunc,
    DynamicIndex,
    Mesh,
}

impl Capability {
    pub const ALL: [Capability; 10] = [
        Capability::Sparse,
        Capability::Quant,
        Capability::QuantBasic,
        Capability::Data64,
        Capability::Adstack,
        Capability::Bls,
        Capability::Assertion,
        Capability::Extfunc,
        Capability::DynamicIndex,
        Capability::Mesh,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            Capability::Sparse => "sparse",
            Capability::Quant => "quant",
            Capability::QuantBasic => "quant_basic",
            Capability::Data64 => "data64",
            Capability::Adstack => "adstack",
            Capability::Bls => "bls",
            Capability::Assertion => "assertion",
            Capability::Extfunc => "extfunc",
            Capability::DynamicIndex => "dynamic_index",
            Capability::Mesh => "mesh",
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Capability {
    type Err = MatrixError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Capability::ALL
            .into_iter()
            .find(|capability| capability.name() == s)
            .ok_or_else(|| MatrixError::UnknownCapability(s.to_string()))
    }
}

/// Either one value or a list of values, as accepted by `arch`, `exclude`
/// and `require`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SingleOrMany<T> {
    Single(T),
    Many(Vec<T>),
}

impl<T> Default for SingleOrMany<T> {
    fn default() -> Self {
        SingleOrMany::Many(Vec::new())
    }
}

impl<T: PartialEq> SingleOrMany<T> {
    /// Canonical form: first-seen order, duplicates dropped.
    pub fn normalize(self) -> Vec<T> {
        match self {
            SingleOrMany::Single(value) => vec![value],
            SingleOrMany::Many(values) => {
                let mut out: Vec<T> = Vec::with_capacity(values.len());
                for value in values {
                    if !out.contains(&value) {
                        out.push(value);
                    }
                }
                out
            }
        }
    }
}

macro_rules! impl_single_or_many {
    ($($ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for SingleOrMany<$ty> {
                fn from(value: $ty) -> Self {
                    SingleOrMany::Single(value)
                }
            }

            impl From<Vec<$ty>> for SingleOrMany<$ty> {
                fn from(values: Vec<$ty>) -> Self {
                    SingleOrMany::Many(values)
                }
            }

            impl From<&[$ty]> for SingleOrMany<$ty> {
                fn from(values: &[$ty]) -> Self {
                    SingleOrMany::Many(values.to_vec())
                }
            }

            impl<const N: usize> From<[$ty; N]> for SingleOrMany<$ty> {
                fn from(values: [$ty; N]) -> Self {
                    SingleOrMany::Many(values.to_vec())
                }
            }
        )*
    };
}

impl_single_or_many!(Backend, Capability);
