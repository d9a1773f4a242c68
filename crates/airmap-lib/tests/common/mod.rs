//! Common test utilities and fixture helpers.
//!
//! This module provides shared test infrastructure for integration tests,
//! including fixture paths and temporary copies of the sample map.

use std::fs;
use std::path::PathBuf;

use airmap_lib::{AirMap, Metro, RouteMode};
use serde_json::json;
use tempfile::TempDir;

/// Path to fixtures directory used by tests.
#[allow(dead_code)]
pub fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../docs/fixtures")
}

/// Path to the three-city sample map (Santiago, Mexico City, Lima).
pub fn test_data_path() -> PathBuf {
    fixtures_dir().join("test_data.json")
}

/// Path to the extension map adding Bogota.
#[allow(dead_code)]
pub fn extra_data_path() -> PathBuf {
    fixtures_dir().join("extra_data.json")
}

/// Load the sample map with symmetric routes.
#[allow(dead_code)]
pub fn sample_map() -> AirMap {
    AirMap::load(&test_data_path(), RouteMode::Symmetric).expect("load fixture test_data.json")
}

/// A valid metro record with every required field.
#[allow(dead_code)]
pub fn metro(code: &str, name: &str, population: u64) -> Metro {
    Metro::from_value(json!({
        "code": code,
        "name": name,
        "country": "XX",
        "continent": "Testland",
        "timezone": 0,
        "coordinates": {"N": 1, "E": 1},
        "population": population,
        "region": 1
    }))
    .expect("valid metro")
}

/// Temporary directory holding a writable copy of the sample map.
#[allow(dead_code)]
pub struct MapTestEnv {
    _temp_dir: TempDir,
    pub map_path: PathBuf,
    pub state_path: PathBuf,
}

#[allow(dead_code)]
impl MapTestEnv {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("create temp dir");
        let map_path = temp_dir.path().join("map.json");
        let state_path = temp_dir.path().join("state").join("saved_state.json");
        fs::copy(test_data_path(), &map_path).expect("copy fixture map");
        Self {
            _temp_dir: temp_dir,
            map_path,
            state_path,
        }
    }
}
