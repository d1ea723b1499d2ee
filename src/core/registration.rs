//! Test-registration descriptor.
//!
//! Turns a [`Selection`] into plain data a test runner can consume: either a
//! skip mark with its reason, or a parametrization over `req_arch` and
//! `req_options` with one id per case. The core never talks to a runner
//! directly.

use crate::core::features::OptionMap;
use crate::core::selector::{Selection, SkipReason};
use crate::core::types::Backend;
use serde::Serialize;

pub const PARAM_NAMES: [&str; 2] = ["req_arch", "req_options"];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegisteredCase {
    pub id: String,
    pub req_arch: Backend,
    pub req_options: OptionMap,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TestRegistration {
    pub name: String,
    /// Always set; lets runners tell matrix tests from plain ones.
    pub matrix_test: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skip: Option<SkipReason>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skip_message: Option<String>,
    pub params: Vec<String>,
    pub cases: Vec<RegisteredCase>,
}

impl TestRegistration {
    pub fn is_skipped(&self) -> bool {
        self.skip.is_some()
    }
}

pub fn register(name: impl Into<String>, selection: Selection) -> TestRegistration {
    let name = name.into();
    match selection {
        Selection::Skip(reason) => TestRegistration {
            name,
            matrix_test: true,
            skip: Some(reason),
            skip_message: Some(reason.message().to_string()),
            params: Vec::new(),
            cases: Vec::new(),
        },
        Selection::Run(cases) => TestRegistration {
            name,
            matrix_test: true,
            skip: None,
            skip_message: None,
            params: PARAM_NAMES.iter().map(|p| p.to_string()).collect(),
            cases: cases
                .into_iter()
                .map(|case| RegisteredCase {
                    id: case.id,
                    req_arch: case.config.backend,
                    req_options: case.config.options,
                })
                .collect(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::features::Configuration;
    use crate::core::selector::ParamCase;

    #[test]
    fn skip_registration_carries_reason() {
        let reg = register("test_sparse", Selection::Skip(SkipReason::NoSupportedArchs));
        assert!(reg.matrix_test);
        assert!(reg.is_skipped());
        assert_eq!(reg.skip_message.as_deref(), Some("No supported archs"));
        assert!(reg.params.is_empty());
        assert!(reg.cases.is_empty());
    }

    #[test]
    fn run_registration_keeps_case_order() {
        let selection = Selection::Run(vec![
            ParamCase {
                id: "arch=x64-0".to_string(),
                config: Configuration {
                    backend: Backend::X64,
                    options: OptionMap::new(),
                },
            },
            ParamCase {
                id: "arch=cuda-1".to_string(),
                config: Configuration {
                    backend: Backend::Cuda,
                    options: OptionMap::new(),
                },
            },
        ]);

        let reg = register("test_loops", selection);
        assert!(!reg.is_skipped());
        assert_eq!(reg.params, vec!["req_arch", "req_options"]);
        let ids: Vec<&str> = reg.cases.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["arch=x64-0", "arch=cuda-1"]);
        assert_eq!(reg.cases[1].req_arch, Backend::Cuda);
    }

    #[test]
    fn skip_serializes_reason_and_message() {
        let reg = register(
            "test_bls",
            Selection::Skip(SkipReason::UnsupportedExtensions),
        );
        let json = serde_json::to_value(&reg).expect("serialize");
        assert_eq!(json["skip"], "unsupported_extensions");
        assert_eq!(json["skip_message"], "No all required extensions are supported");
        assert_eq!(json["matrix_test"], true);
    }
}
