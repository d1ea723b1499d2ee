use crate::error::{MatrixError, Result};
use crate::project_identity::{CONFIG_DIR_NAME, CONFIG_FILE_BASENAME, ENV_PREFIX};
use directories::{ProjectDirs, UserDirs};
use std::path::{Path, PathBuf};

pub fn expand_home(path: &Path) -> Result<PathBuf> {
    let path_str = path.to_string_lossy();

    if !path_str.starts_with('~') {
        return Ok(path.to_path_buf());
    }

    let user_dirs = UserDirs::new()
        .ok_or_else(|| MatrixError::ConfigError("Could not determine user home directory".to_string()))?;
    let home = user_dirs.home_dir();

    if path_str == "~" {
        return Ok(home.to_path_buf());
    }

    let stripped = path_str
        .strip_prefix("~/")
        .ok_or_else(|| MatrixError::ConfigError(format!("Invalid path format: {}", path_str)))?;

    Ok(home.join(stripped))
}

pub fn config_dir() -> Result<PathBuf> {
    let proj = ProjectDirs::from("com", ENV_PREFIX.to_lowercase().as_str(), CONFIG_DIR_NAME)
        .ok_or_else(|| MatrixError::ConfigError("Could not determine config directory".to_string()))?;
    Ok(proj.config_dir().to_path_buf())
}

pub fn config_file() -> Result<PathBuf> {
    Ok(config_dir()?.join(CONFIG_FILE_BASENAME))
}

#[cfg(test)]
mod tests;
