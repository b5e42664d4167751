//! Resolves which definition to load when none is given explicitly.
//!
//! Resolution order: explicit argument (unless it is the `CURRENT` sentinel),
//! then the `OPENAPI_DEFINITION` environment variable, then an upward
//! directory search for a `.openapiconfig` file between the working directory
//! and the home directory.

use crate::error::{Error, Result};
use log::debug;
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Fixed file name looked up by the upward config search.
pub const CONFIG_FILENAME: &str = ".openapiconfig";

/// Environment variable carrying a default definition reference.
pub const DEFINITION_ENV_VAR: &str = "OPENAPI_DEFINITION";

/// Reserved argument value meaning "use ambient resolution".
pub const AMBIENT_SENTINEL: &str = "CURRENT";

#[derive(Debug, Deserialize)]
struct ConfigFile {
    definition: Option<String>,
}

/// Resolves the definition reference, or `None` if no channel yields one.
///
/// Callers must treat `None` as "no definition available" and fail the
/// invocation. A config file that exists but cannot be used is an error, not
/// a silent miss.
pub fn resolve_definition(arg: Option<&str>) -> Result<Option<String>> {
    if let Some(arg) = arg {
        // An empty argument counts as absent; references are never empty.
        if !arg.is_empty() && arg != AMBIENT_SENTINEL {
            return Ok(Some(arg.to_string()));
        }
    }

    if let Ok(value) = env::var(DEFINITION_ENV_VAR) {
        if !value.is_empty() {
            debug!("Definition taken from ${}", DEFINITION_ENV_VAR);
            return Ok(Some(value));
        }
    }

    if let (Ok(cwd), Some(home)) = (env::current_dir(), home::home_dir()) {
        if let Some(config) = find_config_file(&cwd, &home) {
            debug!("Definition taken from {}", config.display());
            return Ok(Some(read_config_definition(&config)?));
        }
    }

    Ok(None)
}

/// Walks from `start` toward the filesystem root looking for
/// [`CONFIG_FILENAME`], stopping once the directory path is shorter than the
/// `home` path so the search never escapes above the home directory.
pub fn find_config_file(start: &Path, home: &Path) -> Option<PathBuf> {
    let mut dir = start.to_path_buf();
    while dir.as_os_str().len() >= home.as_os_str().len() {
        let candidate = dir.join(CONFIG_FILENAME);
        if candidate.is_file() {
            return Some(candidate);
        }
        if !dir.pop() {
            break;
        }
    }
    None
}

/// Reads the `definition` key out of a config file.
fn read_config_definition(path: &Path) -> Result<String> {
    let raw = fs::read_to_string(path).map_err(|e| Error::ConfigParse {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    let config: ConfigFile = serde_yaml::from_str(&raw).map_err(|e| Error::ConfigParse {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    config.definition.ok_or_else(|| Error::ConfigParse {
        path: path.to_path_buf(),
        message: "missing `definition` key".to_string(),
    })
}
