//! Flight-network model: a graph of metros plus route economics and map
//! statistics.

use std::collections::BTreeMap;
use std::path::Path;

use serde::Serialize;
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::flight::{calculate_leg_fares, FlightConfig};
use crate::graph::{Edge, Graph, GraphReader, GraphWriter};
use crate::metro::Metro;
use crate::snapshot::{MapSnapshot, MergeReport, RouteMode};
use crate::visualize::visualizer_url;

/// Number of hubs reported when the caller does not ask for a specific count.
pub const DEFAULT_HUB_COUNT: usize = 10;

/// One flight leg of a priced route.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LegInfo {
    pub from: String,
    pub to: String,
    pub distance: f64,
    pub cost: f64,
    pub flight_hours: f64,
    /// Layover spent at `from` before this leg; zero for the first leg.
    pub layover_hours: f64,
}

/// Aggregate distance, price, and duration of a route.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouteInfo {
    pub distance: f64,
    pub cost: f64,
    pub time_hours: f64,
    pub legs: Vec<LegInfo>,
}

/// Shortest route between two cities with its economics.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShortestRoute {
    pub path: Vec<String>,
    pub info: RouteInfo,
}

/// A single directed flight, named by its endpoints.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Flight {
    pub source: String,
    pub source_name: String,
    pub destination: String,
    pub destination_name: String,
    pub distance: f64,
}

/// A city together with its population.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CityPopulation {
    pub code: String,
    pub name: String,
    pub population: u64,
}

/// A city ranked by number of outbound flights.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Hub {
    pub code: String,
    pub name: String,
    pub connections: usize,
}

/// A continent and the names of the cities on it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Continent {
    pub name: String,
    pub cities: Vec<String>,
}

/// A direct destination reachable from a city.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Destination {
    pub code: String,
    pub name: String,
    pub distance: f64,
}

/// Everything known about a single city.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CityInfo {
    pub metro: Metro,
    pub destinations: Vec<Destination>,
}

/// The flight map: a graph of metros, its provenance, and the economics used
/// to price routes.
#[derive(Debug, Clone, Default)]
pub struct AirMap {
    graph: Graph<Metro>,
    data_sources: Vec<String>,
    config: FlightConfig,
}

impl AirMap {
    /// Wrap an existing graph.
    pub fn new(graph: Graph<Metro>) -> Self {
        Self {
            graph,
            ..Self::default()
        }
    }

    /// Build a map from a snapshot, interpreting its routes with `mode`.
    pub fn from_snapshot(snapshot: &MapSnapshot, mode: RouteMode) -> Result<Self> {
        Ok(Self {
            graph: snapshot.build_graph(mode)?,
            data_sources: snapshot.data_sources.clone(),
            config: FlightConfig::default(),
        })
    }

    /// Load a map from a JSON snapshot file.
    pub fn load(path: &Path, mode: RouteMode) -> Result<Self> {
        let snapshot = MapSnapshot::from_path(path)?;
        let map = Self::from_snapshot(&snapshot, mode)?;
        info!(
            path = %path.display(),
            cities = map.graph.len(),
            flights = map.graph.edge_count(),
            "loaded flight map"
        );
        Ok(map)
    }

    /// Replace the route-economics configuration.
    pub fn with_config(mut self, config: FlightConfig) -> Result<Self> {
        config.validate()?;
        self.config = config;
        Ok(self)
    }

    pub fn config(&self) -> &FlightConfig {
        &self.config
    }

    /// Read-only view of the underlying graph.
    pub fn graph(&self) -> &Graph<Metro> {
        &self.graph
    }

    pub fn data_sources(&self) -> &[String] {
        &self.data_sources
    }

    /// Merge another snapshot into this map without resetting existing data.
    pub fn merge_snapshot(
        &mut self,
        snapshot: &MapSnapshot,
        mode: RouteMode,
    ) -> Result<MergeReport> {
        let report = snapshot.merge_into(&mut self.graph, mode)?;
        for source in &snapshot.data_sources {
            if !self.data_sources.contains(source) {
                self.data_sources.push(source.clone());
            }
        }
        debug!(?report, "merged snapshot into map");
        Ok(report)
    }

    /// Merge a snapshot file into this map.
    pub fn merge_file(&mut self, path: &Path, mode: RouteMode) -> Result<MergeReport> {
        let snapshot = MapSnapshot::from_path(path)?;
        self.merge_snapshot(&snapshot, mode)
    }

    /// Export the map with one route per directed flight.
    pub fn to_snapshot(&self) -> MapSnapshot {
        MapSnapshot::from_graph(&self.graph, &self.data_sources)
    }

    /// Write the map to `path`; reload it with [`RouteMode::Directed`].
    pub fn save(&self, path: &Path) -> Result<()> {
        self.to_snapshot().write_to(path)
    }

    // ---------------------------------------------------------------------
    // Cities and flights
    // ---------------------------------------------------------------------

    /// All cities in insertion order.
    pub fn city_list(&self) -> Vec<&Metro> {
        self.graph.nodes().iter().map(|node| node.data()).collect()
    }

    /// Look up a city by code.
    pub fn city(&self, code: &str) -> Result<&Metro> {
        self.graph
            .node(code)
            .map(|node| node.data())
            .ok_or_else(|| self.graph.not_found(code))
    }

    /// A city's data plus its direct destinations.
    pub fn city_info(&self, code: &str) -> Result<CityInfo> {
        let metro = self.city(code)?.clone();
        let destinations = self
            .graph
            .children(code)?
            .into_iter()
            .map(|child| Destination {
                code: child.code().to_string(),
                name: child.data().name.clone(),
                distance: self.graph.distance_between(code, child.code()),
            })
            .collect();
        Ok(CityInfo {
            metro,
            destinations,
        })
    }

    /// Add a city; its code must be new.
    pub fn add_city(&mut self, metro: Metro) -> Result<()> {
        if metro.code.trim().is_empty() {
            return Err(Error::malformed("city code must not be empty"));
        }
        let code = metro.code.clone();
        self.graph.add_node(code.clone(), metro)?;
        debug!(%code, "added city");
        Ok(())
    }

    /// Remove a city and every flight to or from it.
    pub fn remove_city(&mut self, code: &str) -> Result<Metro> {
        let metro = self.graph.remove_node(code)?;
        debug!(code, "removed city");
        Ok(metro)
    }

    /// Update one field of a city from user-supplied text.
    pub fn edit_city(&mut self, code: &str, field: &str, value: &str) -> Result<()> {
        let metro = self.graph.node_data_mut(code)?;
        metro.set_field(field, value)?;
        debug!(code, field, "edited city");
        Ok(())
    }

    /// Add (or overwrite) a one-way flight.
    pub fn add_route(&mut self, src: &str, dst: &str, distance: f64) -> Result<()> {
        self.graph.add_edge(src, dst, distance)
    }

    /// Add (or overwrite) a flight and its return. Nothing changes unless
    /// both directions are valid.
    pub fn add_route_both(&mut self, src: &str, dst: &str, distance: f64) -> Result<()> {
        self.graph.add_symmetric_edge(src, dst, distance)
    }

    /// Remove a one-way flight.
    pub fn remove_route(&mut self, src: &str, dst: &str) -> Result<()> {
        self.graph.remove_edge(src, dst)
    }

    // ---------------------------------------------------------------------
    // Route economics
    // ---------------------------------------------------------------------

    /// Distance, price, and duration of a route given as city codes.
    pub fn route_info<S: AsRef<str>>(&self, path: &[S]) -> Result<RouteInfo> {
        if path.is_empty() || !self.graph.is_valid_path(path) {
            return Err(Error::InvalidRoute {
                path: path.iter().map(|code| code.as_ref().to_string()).collect(),
            });
        }

        let leg_distances: Vec<f64> = path
            .windows(2)
            .map(|leg| self.graph.distance_between(leg[0].as_ref(), leg[1].as_ref()))
            .collect();
        let fares = calculate_leg_fares(&leg_distances, &self.config.fare)?;

        let mut legs = Vec::with_capacity(leg_distances.len());
        for (index, window) in path.windows(2).enumerate() {
            let from = window[0].as_ref();
            let layover_hours = if index > 0 {
                self.config.layover.layover_hours(self.graph.out_degree(from)?)
            } else {
                0.0
            };
            legs.push(LegInfo {
                from: from.to_string(),
                to: window[1].as_ref().to_string(),
                distance: leg_distances[index],
                cost: fares[index],
                flight_hours: self.config.profile.leg_hours(leg_distances[index]),
                layover_hours,
            });
        }

        Ok(RouteInfo {
            distance: self.graph.path_length(path),
            cost: legs.iter().map(|leg| leg.cost).sum(),
            time_hours: legs
                .iter()
                .map(|leg| leg.flight_hours + leg.layover_hours)
                .sum(),
            legs,
        })
    }

    /// Cheapest-distance route between two cities, with its economics.
    pub fn shortest_path(&self, src: &str, dst: &str) -> Result<ShortestRoute> {
        for code in [src, dst] {
            if !self.graph.contains(code) {
                return Err(self.graph.not_found(code));
            }
        }
        let path = self
            .graph
            .shortest_path(src, dst)
            .ok_or_else(|| Error::NoPathFound {
                start: src.to_string(),
                goal: dst.to_string(),
            })?;
        let info = self.route_info(path.as_slice())?;
        Ok(ShortestRoute { path, info })
    }

    // ---------------------------------------------------------------------
    // Statistics
    // ---------------------------------------------------------------------

    /// Longest single flight; the first one found wins ties.
    pub fn longest_flight(&self) -> Option<Flight> {
        self.extreme_flight(|candidate, best| candidate > best)
    }

    /// Shortest single flight; the first one found wins ties.
    pub fn shortest_flight(&self) -> Option<Flight> {
        self.extreme_flight(|candidate, best| candidate < best)
    }

    /// Mean distance over every directed flight.
    pub fn average_flight(&self) -> Option<f64> {
        let (total, count) = self
            .graph
            .edges()
            .fold((0.0, 0usize), |(total, count), edge| {
                (total + edge.distance, count + 1)
            });
        (count > 0).then(|| total / count as f64)
    }

    /// Most populous city; the first one found wins ties.
    pub fn biggest_city(&self) -> Option<CityPopulation> {
        self.extreme_city(|candidate, best| candidate > best)
    }

    /// Least populous city; the first one found wins ties.
    pub fn smallest_city(&self) -> Option<CityPopulation> {
        self.extreme_city(|candidate, best| candidate < best)
    }

    /// Mean population over every city.
    pub fn average_population(&self) -> Option<f64> {
        if self.graph.is_empty() {
            return None;
        }
        let total: f64 = self
            .graph
            .nodes()
            .iter()
            .map(|node| node.data().population as f64)
            .sum();
        Some(total / self.graph.len() as f64)
    }

    /// Up to `count` cities with the most outbound flights, ties ordered by
    /// name then code.
    pub fn hubs(&self, count: usize) -> Vec<Hub> {
        let mut hubs: Vec<Hub> = self
            .graph
            .nodes()
            .iter()
            .map(|node| Hub {
                code: node.code().to_string(),
                name: node.data().name.clone(),
                connections: self.graph.out_degree(node.code()).unwrap_or_default(),
            })
            .collect();
        hubs.sort_by(|a, b| {
            b.connections
                .cmp(&a.connections)
                .then_with(|| a.name.cmp(&b.name))
                .then_with(|| a.code.cmp(&b.code))
        });
        hubs.truncate(count);
        hubs
    }

    /// Continents sorted by name, each listing its cities in insertion order.
    pub fn continents(&self) -> Vec<Continent> {
        let mut grouped: BTreeMap<&str, Vec<String>> = BTreeMap::new();
        for node in self.graph.nodes() {
            grouped
                .entry(node.data().continent.as_str())
                .or_default()
                .push(node.data().name.clone());
        }
        grouped
            .into_iter()
            .map(|(name, cities)| Continent {
                name: name.to_string(),
                cities,
            })
            .collect()
    }

    /// Great Circle Mapper URL plotting every flight on the map.
    pub fn visualizer_url(&self) -> String {
        visualizer_url(&self.graph)
    }

    fn extreme_flight(&self, better: impl Fn(f64, f64) -> bool) -> Option<Flight> {
        let mut best: Option<Edge<'_>> = None;
        for edge in self.graph.edges() {
            if best.map_or(true, |current| better(edge.distance, current.distance)) {
                best = Some(edge);
            }
        }
        best.map(|edge| Flight {
            source: edge.source.to_string(),
            source_name: self.name_of(edge.source),
            destination: edge.target.to_string(),
            destination_name: self.name_of(edge.target),
            distance: edge.distance,
        })
    }

    fn extreme_city(&self, better: impl Fn(u64, u64) -> bool) -> Option<CityPopulation> {
        let mut best: Option<&Metro> = None;
        for node in self.graph.nodes() {
            let metro = node.data();
            if best.map_or(true, |current| better(metro.population, current.population)) {
                best = Some(metro);
            }
        }
        best.map(|metro| CityPopulation {
            code: metro.code.clone(),
            name: metro.name.clone(),
            population: metro.population,
        })
    }

    fn name_of(&self, code: &str) -> String {
        self.graph
            .node(code)
            .map(|node| node.data().name.clone())
            .unwrap_or_default()
    }
}
