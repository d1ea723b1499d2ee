pub mod archs;
pub mod check;
pub mod completions;
pub mod plan;
pub mod resolve;

mod view;

use crate::config::MatrixContext;
use crate::core::env_selector::EnvSelection;
use crate::error::Result;

/// `--wanted` overrides the environment variable; otherwise read it.
pub(crate) fn env_selection(context: &MatrixContext, wanted: Option<&str>) -> Result<EnvSelection> {
    match wanted {
        Some(raw) => EnvSelection::parse(Some(raw), context.catalog()),
        None => EnvSelection::from_env(context.catalog()),
    }
}
