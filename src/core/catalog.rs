//! Backend catalog: the known backends, the machine-usable subset, and name
//! and group lookup.
//!
//! Probing the machine can be slow (driver and tool discovery), so each
//! catalog computes its usable set at most once and keeps it for the life of
//! the process.

use crate::core::types::Backend;
use crate::error::{MatrixError, Result};
use crate::ui;
use std::collections::BTreeSet;
use std::path::Path;
use std::sync::{LazyLock, OnceLock};

/// Answers whether a backend can run on this machine.
pub trait BackendProbe: Send + Sync {
    fn is_usable(&self, backend: Backend) -> bool;
}

/// Probe for the real host: compile target, OS, and driver tooling on `PATH`.
#[derive(Debug, Default, Clone)]
pub struct SystemProbe {
    forced_usable: BTreeSet<Backend>,
    forced_unusable: BTreeSet<Backend>,
}

impl SystemProbe {
    pub fn new() -> Self {
        Self::default()
    }

    /// Settings overrides win over detection; `unusable` wins over `usable`.
    pub fn with_overrides(
        forced_usable: BTreeSet<Backend>,
        forced_unusable: BTreeSet<Backend>,
    ) -> Self {
        Self {
            forced_usable,
            forced_unusable,
        }
    }

    fn detect(&self, backend: Backend) -> bool {
        match backend {
            Backend::X64 => cfg!(target_arch = "x86_64"),
            Backend::Arm64 => cfg!(target_arch = "aarch64"),
            Backend::Cuda => has_binary("nvidia-smi") || Path::new("/dev/nvidiactl").exists(),
            Backend::Metal => cfg!(target_os = "macos"),
            Backend::Vulkan => has_binary("vulkaninfo") || has_env("VK_ICD_FILENAMES"),
            Backend::Opengl => {
                if cfg!(windows) {
                    true
                } else if cfg!(target_os = "macos") {
                    false
                } else {
                    has_env("DISPLAY") || has_env("WAYLAND_DISPLAY")
                }
            }
            // Opt-in only: settings or an explicit include.
            Backend::Dx11 => false,
            Backend::Cc => ["cc", "gcc", "clang"].iter().any(|bin| has_binary(bin)),
        }
    }
}

impl BackendProbe for SystemProbe {
    fn is_usable(&self, backend: Backend) -> bool {
        if self.forced_unusable.contains(&backend) {
            ui::verbose(&format!("probe {}: forced unusable", backend));
            return false;
        }
        if self.forced_usable.contains(&backend) {
            ui::verbose(&format!("probe {}: forced usable", backend));
            return true;
        }
        let usable = self.detect(backend);
        ui::verbose(&format!("probe {}: {}", backend, if usable { "ok" } else { "missing" }));
        usable
    }
}

fn has_binary(name: &str) -> bool {
    which::which(name).is_ok()
}

fn has_env(key: &str) -> bool {
    std::env::var_os(key).is_some_and(|v| !v.is_empty())
}

/// Fixed answer set, for hosts that already know what they run on.
#[derive(Debug, Clone, Default)]
pub struct StaticProbe {
    usable: BTreeSet<Backend>,
}

impl StaticProbe {
    pub fn new(usable: impl IntoIterator<Item = Backend>) -> Self {
        Self {
            usable: usable.into_iter().collect(),
        }
    }
}

impl BackendProbe for StaticProbe {
    fn is_usable(&self, backend: Backend) -> bool {
        self.usable.contains(&backend)
    }
}

pub struct BackendCatalog {
    known: Vec<Backend>,
    probe: Box<dyn BackendProbe>,
    usable: OnceLock<BTreeSet<Backend>>,
}

static SYSTEM: LazyLock<BackendCatalog> =
    LazyLock::new(|| BackendCatalog::new(Box::new(SystemProbe::new())));

impl BackendCatalog {
    /// Catalog over every backend this crate knows about.
    pub fn new(probe: Box<dyn BackendProbe>) -> Self {
        Self::with_known(Backend::ALL.to_vec(), probe)
    }

    pub fn with_known(mut known: Vec<Backend>, probe: Box<dyn BackendProbe>) -> Self {
        known.sort();
        known.dedup();
        Self {
            known,
            probe,
            usable: OnceLock::new(),
        }
    }

    /// Process-wide catalog backed by [`SystemProbe`] without overrides.
    pub fn system() -> &'static BackendCatalog {
        &SYSTEM
    }

    pub fn known(&self) -> &[Backend] {
        &self.known
    }

    /// Known backends the probe accepts. Probed on first call only.
    pub fn usable(&self) -> &BTreeSet<Backend> {
        self.usable.get_or_init(|| {
            let usable: BTreeSet<Backend> = self
                .known
                .iter()
                .copied()
                .filter(|backend| self.probe.is_usable(*backend))
                .collect();
            ui::verbose(&format!("usable backends: {}", join_backends(&usable)));
            usable
        })
    }

    pub fn is_usable(&self, backend: Backend) -> bool {
        self.usable().contains(&backend)
    }

    /// Exact backend name.
    pub fn lookup(&self, name: &str) -> Result<Backend> {
        name.parse()
    }

    /// Symbolic groups: `cpu` is the host CPU backend, `gpu` every GPU-class
    /// backend. Group membership does not depend on usability.
    pub fn lookup_group(&self, name: &str) -> Option<Vec<Backend>> {
        match name {
            "cpu" => Some(vec![Backend::host_cpu()]),
            "gpu" => Some(Backend::GPU.to_vec()),
            _ => None,
        }
    }

    /// A group or backend name, expanded to backends.
    pub fn resolve_token(&self, token: &str) -> Result<Vec<Backend>> {
        if let Some(group) = self.lookup_group(token) {
            return Ok(group);
        }
        self.lookup(token).map(|backend| vec![backend])
    }

    /// Expand many tokens, keeping first-seen order.
    pub fn resolve_tokens<S: AsRef<str>>(&self, tokens: &[S]) -> Result<Vec<Backend>> {
        let mut out = Vec::new();
        for token in tokens {
            let token = token.as_ref();
            if token.is_empty() {
                return Err(MatrixError::UnknownBackend(String::new()));
            }
            for backend in self.resolve_token(token)? {
                if !out.contains(&backend) {
                    out.push(backend);
                }
            }
        }
        Ok(out)
    }
}

pub fn join_backends<'a>(backends: impl IntoIterator<Item = &'a Backend>) -> String {
    let names: Vec<&str> = backends.into_iter().map(|b| b.name()).collect();
    if names.is_empty() {
        "(none)".to_string()
    } else {
        names.join(", ")
    }
}
