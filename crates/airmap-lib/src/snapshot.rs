//! JSON map snapshots: bulk load, incremental load, and export.
//!
//! A snapshot is the unit persisted to disk:
//!
//! ```json
//! {
//!   "data sources": ["https://example.com/metros"],
//!   "metros": [{"code": "LIM", "name": "Lima", "...": "..."}],
//!   "routes": [{"ports": ["LIM", "SCL"], "distance": 2453}]
//! }
//! ```
//!
//! Hand-authored maps list each route once and are loaded with
//! [`RouteMode::Symmetric`]; exported snapshots list every directed edge and
//! are loaded with [`RouteMode::Directed`].

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::graph::{Graph, GraphReader, GraphWriter};
use crate::metro::Metro;

/// How route records are turned into graph edges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RouteMode {
    /// Each record creates edges in both directions.
    #[default]
    Symmetric,
    /// Each record creates a single `ports[0] -> ports[1]` edge.
    Directed,
}

/// A flight between two city codes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteRecord {
    pub ports: [String; 2],
    pub distance: f64,
}

/// Full map contents: metros, routes, and where the data came from.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct MapSnapshot {
    #[serde(rename = "data sources")]
    pub data_sources: Vec<String>,
    pub metros: Vec<Metro>,
    pub routes: Vec<RouteRecord>,
}

#[derive(Deserialize)]
struct RawSnapshot {
    #[serde(rename = "data sources", default)]
    data_sources: Vec<String>,
    metros: Vec<Value>,
    #[serde(default)]
    routes: Vec<RouteRecord>,
}

/// Outcome of merging a snapshot into an existing graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct MergeReport {
    pub metros_added: usize,
    pub metros_skipped: usize,
    pub routes_applied: usize,
}

impl MapSnapshot {
    /// Parse a snapshot from JSON text.
    pub fn from_json_str(raw: &str) -> Result<Self> {
        let parsed: RawSnapshot = serde_json::from_str(raw)
            .map_err(|err| Error::malformed(format!("invalid map data: {err}")))?;

        let metros = parsed
            .metros
            .into_iter()
            .enumerate()
            .map(|(position, value)| -> Result<Metro> {
                let metro = Metro::from_value(value).map_err(|err| match err {
                    Error::MalformedInput { message } => {
                        Error::malformed(format!("metro #{}: {message}", position + 1))
                    }
                    other => other,
                })?;
                if metro.code.trim().is_empty() {
                    return Err(Error::malformed(format!(
                        "metro #{}: city code must not be empty",
                        position + 1
                    )));
                }
                Ok(metro)
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            data_sources: parsed.data_sources,
            metros,
            routes: parsed.routes,
        })
    }

    /// Read and parse a snapshot file.
    pub fn from_path(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)?;
        let snapshot = Self::from_json_str(&raw)?;
        debug!(
            path = %path.display(),
            metros = snapshot.metros.len(),
            routes = snapshot.routes.len(),
            "parsed map snapshot"
        );
        Ok(snapshot)
    }

    /// Capture the current graph as a snapshot with one route per directed
    /// edge. Each metro is written under the code of the node holding it.
    pub fn from_graph(graph: &Graph<Metro>, data_sources: &[String]) -> Self {
        Self {
            data_sources: data_sources.to_vec(),
            metros: graph
                .nodes()
                .iter()
                .map(|node| Metro {
                    code: node.code().to_string(),
                    ..node.data().clone()
                })
                .collect(),
            routes: graph
                .edges()
                .map(|edge| RouteRecord {
                    ports: [edge.source.to_string(), edge.target.to_string()],
                    distance: edge.distance,
                })
                .collect(),
        }
    }

    /// Serialize to pretty-printed JSON.
    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Write the snapshot to `path`, replacing any existing file.
    pub fn write_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, self.to_json_string()?)?;
        info!(path = %path.display(), metros = self.metros.len(), "saved map snapshot");
        Ok(())
    }

    /// Build a fresh graph from this snapshot.
    ///
    /// Fails on duplicate codes, routes naming unknown cities, or invalid
    /// distances.
    pub fn build_graph(&self, mode: RouteMode) -> Result<Graph<Metro>> {
        let mut graph = Graph::new();
        for metro in &self.metros {
            graph.add_node(metro.code.clone(), metro.clone())?;
        }
        for route in &self.routes {
            apply_route(&mut graph, route, mode)?;
        }
        debug!(
            metros = graph.len(),
            edges = graph.edge_count(),
            ?mode,
            "built graph from snapshot"
        );
        Ok(graph)
    }

    /// Merge this snapshot into an existing graph.
    ///
    /// Metros whose code already exists keep their current data; routes are
    /// added or overwritten. The graph is only modified if every route applies.
    pub fn merge_into(&self, graph: &mut Graph<Metro>, mode: RouteMode) -> Result<MergeReport> {
        let mut staged = graph.clone();
        let mut report = MergeReport::default();

        for metro in &self.metros {
            if staged.contains(&metro.code) {
                warn!(code = %metro.code, "city already present; keeping existing data");
                report.metros_skipped += 1;
                continue;
            }
            staged.add_node(metro.code.clone(), metro.clone())?;
            report.metros_added += 1;
        }
        for route in &self.routes {
            apply_route(&mut staged, route, mode)?;
            report.routes_applied += 1;
        }

        *graph = staged;
        Ok(report)
    }
}

fn apply_route(graph: &mut Graph<Metro>, route: &RouteRecord, mode: RouteMode) -> Result<()> {
    let [src, dst] = &route.ports;
    match mode {
        RouteMode::Symmetric => graph.add_symmetric_edge(src, dst, route.distance),
        RouteMode::Directed => graph.add_edge(src, dst, route.distance),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::NO_CONNECTION;

    const SAMPLE: &str = r#"{
        "data sources": ["unit test"],
        "metros": [
            {"code": "SCL", "name": "Santiago", "country": "CL", "continent": "South America",
             "timezone": -4, "coordinates": {"S": 33, "W": 71}, "population": 6000000, "region": 1},
            {"code": "LIM", "name": "Lima", "country": "PE", "continent": "South America",
             "timezone": -5, "coordinates": {"S": 12, "W": 77}, "population": 9050000, "region": 1}
        ],
        "routes": [{"ports": ["SCL", "LIM"], "distance": 2453}]
    }"#;

    #[test]
    fn symmetric_and_directed_modes_differ() {
        let snapshot = MapSnapshot::from_json_str(SAMPLE).unwrap();
        assert_eq!(snapshot.data_sources, vec!["unit test".to_string()]);

        let symmetric = snapshot.build_graph(RouteMode::Symmetric).unwrap();
        assert_eq!(symmetric.distance_between("LIM", "SCL"), 2453.0);
        assert_eq!(symmetric.distance_between("SCL", "LIM"), 2453.0);

        let directed = snapshot.build_graph(RouteMode::Directed).unwrap();
        assert_eq!(directed.distance_between("SCL", "LIM"), 2453.0);
        assert_eq!(directed.distance_between("LIM", "SCL"), NO_CONNECTION);
    }

    #[test]
    fn missing_metro_field_reports_position() {
        let raw = r#"{"metros": [{"code": "BBB"}], "routes": []}"#;
        let err = MapSnapshot::from_json_str(raw).unwrap_err();
        assert!(
            matches!(err, Error::MalformedInput { ref message } if message == "metro #1: missing field: name"),
            "unexpected error: {err}"
        );
    }

    #[test]
    fn missing_metros_list_is_malformed() {
        assert!(matches!(
            MapSnapshot::from_json_str(r#"{"routes": []}"#),
            Err(Error::MalformedInput { .. })
        ));
        assert!(matches!(
            MapSnapshot::from_json_str("not json"),
            Err(Error::MalformedInput { .. })
        ));
    }

    #[test]
    fn route_to_unknown_city_fails_load() {
        let mut snapshot = MapSnapshot::from_json_str(SAMPLE).unwrap();
        snapshot.routes.push(RouteRecord {
            ports: ["SCL".to_string(), "XXX".to_string()],
            distance: 10.0,
        });
        assert!(matches!(
            snapshot.build_graph(RouteMode::Symmetric),
            Err(Error::NotFound { ref code, .. }) if code == "XXX"
        ));
    }

    #[test]
    fn duplicate_codes_fail_fresh_load() {
        let mut snapshot = MapSnapshot::from_json_str(SAMPLE).unwrap();
        let copy = snapshot.metros[0].clone();
        snapshot.metros.push(copy);
        assert!(matches!(
            snapshot.build_graph(RouteMode::Symmetric),
            Err(Error::DuplicateNode { .. })
        ));
    }

    #[test]
    fn failed_merge_leaves_graph_untouched() {
        let snapshot = MapSnapshot::from_json_str(SAMPLE).unwrap();
        let mut graph = snapshot.build_graph(RouteMode::Symmetric).unwrap();

        let mut extra = snapshot.clone();
        extra.metros[0].code = "BOG".to_string();
        extra.routes = vec![
            RouteRecord {
                ports: ["BOG".to_string(), "LIM".to_string()],
                distance: 1879.0,
            },
            RouteRecord {
                ports: ["BOG".to_string(), "NOPE".to_string()],
                distance: 1.0,
            },
        ];

        assert!(extra.merge_into(&mut graph, RouteMode::Symmetric).is_err());
        assert!(!graph.contains("BOG"));
        assert_eq!(graph.edge_count(), 2);
    }

    #[test]
    fn export_lists_every_directed_edge() {
        let snapshot = MapSnapshot::from_json_str(SAMPLE).unwrap();
        let graph = snapshot.build_graph(RouteMode::Symmetric).unwrap();
        let exported = MapSnapshot::from_graph(&graph, &snapshot.data_sources);

        assert_eq!(exported.metros, snapshot.metros);
        assert_eq!(exported.routes.len(), 2);
        assert_eq!(exported.routes[0].ports, ["SCL".to_string(), "LIM".to_string()]);
        assert_eq!(exported.routes[1].ports, ["LIM".to_string(), "SCL".to_string()]);
    }

    #[test]
    fn export_files_metros_under_node_codes() {
        let snapshot = MapSnapshot::from_json_str(SAMPLE).unwrap();
        let mut graph = snapshot.build_graph(RouteMode::Symmetric).unwrap();
        let mut relabelled = snapshot.metros[1].clone();
        relabelled.code = "XXX".to_string();
        graph.set_node_data("LIM", relabelled).unwrap();

        let exported = MapSnapshot::from_graph(&graph, &snapshot.data_sources);
        assert_eq!(exported.metros[1].code, "LIM");

        let reloaded = exported.build_graph(RouteMode::Directed).unwrap();
        assert_eq!(reloaded.distance_between("LIM", "SCL"), 2453.0);
        assert!(!reloaded.contains("XXX"));
    }
}
