//! Selection core: backends, capabilities, environment narrowing, the feature
//! cross-product, and the per-test selector.

pub mod catalog;
pub mod env_selector;
pub mod features;
pub mod oracle;
pub mod registration;
pub mod selector;
pub mod tolerance;
pub mod types;

pub use catalog::{BackendCatalog, BackendProbe, StaticProbe, SystemProbe};
pub use env_selector::EnvSelection;
pub use features::{Configuration, FeatureTable, FeatureToggle, FeatureVariant, OptionMap};
pub use oracle::{CapabilityOracle, ExtensionTable};
pub use registration::{TestRegistration, register};
pub use selector::{ParamCase, Selection, Selector, SkipReason, TestConstraints};
pub use types::{Backend, Capability, SingleOrMany};
