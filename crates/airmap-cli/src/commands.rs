//! Map subcommands shared by the one-shot CLI and the interactive shell.
//!
//! `main.rs` and [`crate::shell`] parse arguments into [`MapCommand`] and
//! hand them to [`execute`], which runs the query or edit against an
//! [`AirMap`] and returns the text to print.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Args, Subcommand};
use serde_json::Value;

use airmap_lib::{AirMap, Metro, RouteMode, DEFAULT_HUB_COUNT};

use crate::output::{self, OutputFormat};

/// Queries and edits that operate on a loaded map.
#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum MapCommand {
    /// List every city by name and code.
    ListCities,
    /// Show everything known about a city, or a single field of it.
    Show {
        /// City code, e.g. LIM.
        code: String,
        /// Only print this field.
        field: Option<String>,
    },
    /// Longest single flight on the map.
    LongestFlight,
    /// Shortest single flight on the map.
    ShortestFlight,
    /// Average distance over every flight.
    AverageFlight,
    /// City with the largest population.
    BiggestCity,
    /// City with the smallest population.
    SmallestCity,
    /// Average population over every city.
    AveragePopulation,
    /// Continents and the cities on each.
    Continents,
    /// Cities with the most outbound flights.
    Hubs {
        /// How many hubs to list.
        #[arg(long, default_value_t = DEFAULT_HUB_COUNT)]
        count: usize,
    },
    /// Print a Great Circle Mapper URL showing every flight.
    Visualize,
    /// Add a city from a JSON object of its fields.
    AddCity {
        /// Code of the new city.
        code: String,
        /// JSON object with name, country, continent, timezone, coordinates,
        /// population, and region.
        json: String,
    },
    /// Remove a city and every flight to or from it.
    RemoveCity {
        code: String,
    },
    /// Change one field of a city.
    EditCity {
        code: String,
        field: String,
        value: String,
    },
    /// Add or overwrite a one-way flight.
    AddRoute(AddRouteArgs),
    /// Remove a one-way flight.
    RemoveRoute {
        source: String,
        destination: String,
        /// Also remove the return flight.
        #[arg(long)]
        both: bool,
    },
    /// Distance, cost, and time of a route through the given cities.
    RouteInfo {
        /// City codes in travel order.
        #[arg(required = true, num_args = 2..)]
        cities: Vec<String>,
    },
    /// Shortest route between two cities.
    ShortestPath {
        source: String,
        destination: String,
    },
    /// Merge another map file into the current map.
    Load {
        file: PathBuf,
    },
    /// Save the map; defaults to the saved-state file.
    Save {
        file: Option<PathBuf>,
    },
}

/// Arguments for `add-route`.
#[derive(Args, Debug, Clone, PartialEq)]
pub struct AddRouteArgs {
    pub source: String,
    pub destination: String,
    /// Distance in kilometres.
    pub distance: f64,
    /// Also add the return flight.
    #[arg(long)]
    pub both: bool,
}

impl MapCommand {
    /// Whether the command changes the map.
    pub fn is_mutating(&self) -> bool {
        matches!(
            self,
            MapCommand::AddCity { .. }
                | MapCommand::RemoveCity { .. }
                | MapCommand::EditCity { .. }
                | MapCommand::AddRoute(_)
                | MapCommand::RemoveRoute { .. }
                | MapCommand::Load { .. }
        )
    }
}

/// Settings a command needs beyond the map itself.
#[derive(Debug, Clone)]
pub struct CommandContext {
    pub format: OutputFormat,
    /// Where `save` writes when no file is given.
    pub state_path: PathBuf,
    /// How `load` interprets route records.
    pub load_mode: RouteMode,
}

/// Run a command against `map` and return the text to print.
pub fn execute(map: &mut AirMap, command: &MapCommand, ctx: &CommandContext) -> Result<String> {
    let format = ctx.format;
    match command {
        MapCommand::ListCities => output::render_city_list(&map.city_list(), format),
        MapCommand::Show { code, field: None } => {
            output::render_city_info(&map.city_info(code)?, format)
        }
        MapCommand::Show {
            code,
            field: Some(field),
        } => {
            let value = city_field(map, code, field)?;
            output::render_field(code, field, &value, format)
        }
        MapCommand::LongestFlight => {
            output::render_flight("Longest flight", map.longest_flight().as_ref(), format)
        }
        MapCommand::ShortestFlight => {
            output::render_flight("Shortest flight", map.shortest_flight().as_ref(), format)
        }
        MapCommand::AverageFlight => output::render_average(
            "Average flight distance",
            map.average_flight(),
            " km",
            format,
        ),
        MapCommand::BiggestCity => {
            output::render_city_population("Biggest city", map.biggest_city().as_ref(), format)
        }
        MapCommand::SmallestCity => {
            output::render_city_population("Smallest city", map.smallest_city().as_ref(), format)
        }
        MapCommand::AveragePopulation => output::render_average(
            "Average population",
            map.average_population(),
            "",
            format,
        ),
        MapCommand::Continents => output::render_continents(&map.continents(), format),
        MapCommand::Hubs { count } => output::render_hubs(&map.hubs(*count), format),
        MapCommand::Visualize => match format {
            OutputFormat::Json => output::to_json(&serde_json::json!({"url": map.visualizer_url()})),
            OutputFormat::Text => Ok(format!("{}\n", map.visualizer_url())),
        },
        MapCommand::AddCity { code, json } => {
            let metro = parse_city(code, json)?;
            let name = metro.name.clone();
            map.add_city(metro)?;
            output::render_message(&format!("Added {name} ({code})."), format)
        }
        MapCommand::RemoveCity { code } => {
            let metro = map.remove_city(code)?;
            output::render_message(&format!("Removed {} ({code}).", metro.name), format)
        }
        MapCommand::EditCity { code, field, value } => {
            map.edit_city(code, field, value)?;
            output::render_message(&format!("Updated {field} of {code}."), format)
        }
        MapCommand::AddRoute(args) => {
            add_route(map, args)?;
            let arrow = if args.both { "<->" } else { "->" };
            output::render_message(
                &format!(
                    "Added flight {} {arrow} {} ({} km).",
                    args.source, args.destination, args.distance
                ),
                format,
            )
        }
        MapCommand::RemoveRoute {
            source,
            destination,
            both,
        } => {
            map.remove_route(source, destination)?;
            if *both {
                map.remove_route(destination, source)?;
            }
            let arrow = if *both { "<->" } else { "->" };
            output::render_message(
                &format!("Removed flight {source} {arrow} {destination}."),
                format,
            )
        }
        MapCommand::RouteInfo { cities } => {
            let info = map.route_info(cities.as_slice())?;
            output::render_route(cities, &info, format)
        }
        MapCommand::ShortestPath {
            source,
            destination,
        } => {
            let route = map.shortest_path(source, destination)?;
            output::render_route(&route.path, &route.info, format)
        }
        MapCommand::Load { file } => {
            let report = map
                .merge_file(file, ctx.load_mode)
                .with_context(|| format!("failed to load {}", file.display()))?;
            output::render_merge(&file.display().to_string(), &report, format)
        }
        MapCommand::Save { file } => {
            let path: &Path = file.as_deref().unwrap_or(&ctx.state_path);
            map.save(path)
                .with_context(|| format!("failed to save map to {}", path.display()))?;
            output::render_message(&format!("Saved map to {}.", path.display()), format)
        }
    }
}

/// Build a metro from the `add-city` arguments. The code argument fills in
/// a missing `code` key and must agree with one that is present.
fn parse_city(code: &str, raw: &str) -> Result<Metro> {
    let mut value: Value = serde_json::from_str(raw)
        .with_context(|| format!("city data for {code} is not valid JSON"))?;
    let Some(object) = value.as_object_mut() else {
        bail!("city data for {code} must be a JSON object");
    };
    match object.get("code") {
        Some(Value::String(existing)) if existing != code => {
            bail!("city data names code {existing} but the command names {code}")
        }
        Some(Value::String(_)) => {}
        Some(_) => bail!("city code must be a string"),
        None => {
            object.insert("code".to_string(), Value::from(code));
        }
    }
    Ok(Metro::from_value(value)?)
}

/// Read one field of a city. `destinations` lists its direct flights.
fn city_field(map: &AirMap, code: &str, field: &str) -> Result<Value> {
    if field == "destinations" {
        let info = map.city_info(code)?;
        return Ok(serde_json::to_value(info.destinations)?);
    }
    match map.city(code)?.field(field) {
        Some(value) => Ok(value),
        None => bail!("city {code} has no field '{field}'"),
    }
}

fn add_route(map: &mut AirMap, args: &AddRouteArgs) -> Result<()> {
    if args.both {
        map.add_route_both(&args.source, &args.destination, args.distance)?;
    } else {
        map.add_route(&args.source, &args.destination, args.distance)?;
    }
    Ok(())
}
