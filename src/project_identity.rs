//! Central project identity contract.
//!
//! Single source of truth for names that leak into paths and environment keys.

pub const BINARY_NAME: &str = "archmatrix";
pub const CONFIG_DIR_NAME: &str = "archmatrix";
pub const ENV_PREFIX: &str = "ARCHMATRIX";
pub const CONFIG_FILE_BASENAME: &str = "archmatrix.kdl";

/// Suffix of the variable narrowing the backends a test run may use.
pub const WANTED_ARCHS_SUFFIX: &str = "WANTED_ARCHS";

pub fn env_key(suffix: &str) -> String {
    format!("{}_{}", ENV_PREFIX, suffix)
}

pub fn wanted_archs_var() -> String {
    env_key(WANTED_ARCHS_SUFFIX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wanted_archs_var_uses_prefix() {
        assert_eq!(wanted_archs_var(), "ARCHMATRIX_WANTED_ARCHS");
    }
}
