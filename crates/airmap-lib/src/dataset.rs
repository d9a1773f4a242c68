//! Locating map data and the saved-state file on disk.

use std::env;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use tracing::debug;

use crate::error::{Error, Result};
use crate::snapshot::RouteMode;

/// Environment variable overriding the saved-state location.
pub const STATE_FILE_ENV: &str = "AIRMAP_STATE_FILE";

/// Environment variable naming a hand-authored map to load by default.
pub const MAP_FILE_ENV: &str = "AIRMAP_MAP_FILE";

/// Filename of the saved state inside the platform data directory.
const STATE_FILENAME: &str = "saved_state.json";

/// A map file together with how its routes should be read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapSource {
    pub path: PathBuf,
    pub mode: RouteMode,
}

/// Resolve the default saved-state location using platform-specific project
/// directories.
pub fn default_state_path() -> Result<PathBuf> {
    let dirs = ProjectDirs::from("com", "airmap", "airmap").ok_or(Error::ProjectDirsUnavailable)?;
    Ok(dirs.data_dir().join(STATE_FILENAME))
}

/// Resolve where the map state is saved.
///
/// Resolution order:
/// 1. Explicit `explicit` argument when provided.
/// 2. `AIRMAP_STATE_FILE` environment variable.
/// 3. `saved_state.json` in the platform data directory.
pub fn resolve_state_path(explicit: Option<&Path>) -> Result<PathBuf> {
    state_path_from(explicit, env::var_os(STATE_FILE_ENV))
}

/// Resolve which map file to load.
///
/// Resolution order:
/// 1. Explicit `explicit` argument, read symmetrically unless `directed`.
/// 2. The saved state at `state_path` when it exists, read as directed.
/// 3. `AIRMAP_MAP_FILE` environment variable, read symmetrically.
///
/// Fails with [`Error::MapNotFound`] when none of these apply.
pub fn resolve_map_source(
    explicit: Option<&Path>,
    directed: bool,
    state_path: &Path,
) -> Result<MapSource> {
    map_source_from(explicit, directed, state_path, env::var_os(MAP_FILE_ENV))
}

fn state_path_from(explicit: Option<&Path>, env_value: Option<OsString>) -> Result<PathBuf> {
    if let Some(path) = explicit {
        return Ok(path.to_path_buf());
    }
    if let Some(path) = env_value.filter(|value| !value.is_empty()) {
        debug!(path = ?path, "using state file from {}", STATE_FILE_ENV);
        return Ok(PathBuf::from(path));
    }
    default_state_path()
}

fn map_source_from(
    explicit: Option<&Path>,
    directed: bool,
    state_path: &Path,
    env_value: Option<OsString>,
) -> Result<MapSource> {
    if let Some(path) = explicit {
        let mode = if directed {
            RouteMode::Directed
        } else {
            RouteMode::Symmetric
        };
        return Ok(MapSource {
            path: path.to_path_buf(),
            mode,
        });
    }
    if state_path.is_file() {
        debug!(path = %state_path.display(), "resuming from saved state");
        return Ok(MapSource {
            path: state_path.to_path_buf(),
            mode: RouteMode::Directed,
        });
    }
    if let Some(path) = env_value.filter(|value| !value.is_empty()) {
        debug!(path = ?path, "using map from {}", MAP_FILE_ENV);
        return Ok(MapSource {
            path: PathBuf::from(path),
            mode: RouteMode::Symmetric,
        });
    }
    Err(Error::MapNotFound)
}
