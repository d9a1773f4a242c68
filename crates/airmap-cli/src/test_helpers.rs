// Test utilities used across `airmap-cli` unit tests.
// Kept under `#[cfg(test)]` so it is not part of the public crate API.
use std::path::PathBuf;

use airmap_lib::{AirMap, RouteMode};

use crate::commands::CommandContext;
use crate::output::OutputFormat;

/// Path to the shared fixture directory.
pub fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../docs/fixtures")
}

/// The three-city sample map (Santiago, Mexico City, Lima).
pub fn sample_map() -> AirMap {
    AirMap::load(&fixtures_dir().join("test_data.json"), RouteMode::Symmetric)
        .expect("load fixture test_data.json")
}

/// Text output with a state path that tests never write to.
pub fn context() -> CommandContext {
    CommandContext {
        format: OutputFormat::Text,
        state_path: std::env::temp_dir().join("airmap-cli-unit-tests-unused.json"),
        load_mode: RouteMode::Symmetric,
    }
}
