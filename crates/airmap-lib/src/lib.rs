//! AirMap library entry points.
//!
//! This crate models an airline's flight network as a directed, weighted
//! graph of cities, finds shortest routes with Dijkstra's algorithm, and
//! prices and times multi-leg itineraries. It also loads and saves map
//! snapshots in JSON and locates map data on disk. Higher-level consumers
//! (the CLI) should only depend on the items exported here instead of
//! reimplementing behavior.

pub mod airmap;
pub mod dataset;
pub mod error;
pub mod flight;
pub mod graph;
pub mod metro;
pub mod path;
pub mod snapshot;
pub mod visualize;

pub use airmap::{
    AirMap, CityInfo, CityPopulation, Continent, Destination, Flight, Hub, LegInfo, RouteInfo,
    ShortestRoute, DEFAULT_HUB_COUNT,
};
pub use dataset::{
    default_state_path, resolve_map_source, resolve_state_path, MapSource, MAP_FILE_ENV,
    STATE_FILE_ENV,
};
pub use error::{Error, Result};
pub use flight::{FareConfig, FlightConfig, FlightProfile, LayoverPolicy};
pub use graph::{Edge, Graph, GraphReader, GraphWriter, Node, NO_CONNECTION};
pub use metro::{Coordinates, FieldValue, Metro};
pub use path::find_route_dijkstra;
pub use snapshot::{MapSnapshot, MergeReport, RouteMode, RouteRecord};
pub use visualize::visualizer_url;
