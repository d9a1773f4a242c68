//! Output formatting for map queries.
//!
//! Every renderer returns the full text to print so the one-shot CLI and the
//! interactive shell share the same presentation.

use airmap_lib::{
    CityInfo, CityPopulation, Continent, Error, Flight, Hub, MergeReport, Metro, RouteInfo,
};
use anyhow::Result;
use clap::ValueEnum;
use serde::Serialize;
use serde_json::json;

/// How command results are printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text.
    #[default]
    Text,
    /// Pretty-printed JSON.
    Json,
}

/// Serialize a value as pretty JSON followed by a newline.
pub fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    Ok(format!("{}\n", serde_json::to_string_pretty(value)?))
}

/// Insert thousands separators into an integer (`23400000` -> `23,400,000`).
pub fn format_with_separators(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Format an hour count as `11h 49m`.
pub fn format_hours(hours: f64) -> String {
    let total_minutes = (hours * 60.0).round() as u64;
    format!("{}h {:02}m", total_minutes / 60, total_minutes % 60)
}

pub fn render_city_list(cities: &[&Metro], format: OutputFormat) -> Result<String> {
    if format == OutputFormat::Json {
        let rows: Vec<_> = cities
            .iter()
            .map(|metro| json!({"code": metro.code, "name": metro.name}))
            .collect();
        return to_json(&rows);
    }
    if cities.is_empty() {
        return Ok("No cities on the map.\n".to_string());
    }
    Ok(cities
        .iter()
        .map(|metro| format!("{} ({})\n", metro.name, metro.code))
        .collect())
}

pub fn render_city_info(info: &CityInfo, format: OutputFormat) -> Result<String> {
    if format == OutputFormat::Json {
        return to_json(info);
    }
    let metro = &info.metro;
    let mut out = format!("{} ({})\n", metro.name, metro.code);
    out.push_str(&format!("  Country:     {}\n", metro.country));
    out.push_str(&format!("  Continent:   {}\n", metro.continent));
    out.push_str(&format!("  Timezone:    UTC{:+}\n", metro.timezone));
    out.push_str(&format!("  Coordinates: {}\n", metro.coordinates));
    out.push_str(&format!(
        "  Population:  {}\n",
        format_with_separators(metro.population)
    ));
    out.push_str(&format!("  Region:      {}\n", metro.region));
    for (key, value) in &metro.extra {
        out.push_str(&format!("  {key}: {}\n", render_value(value)));
    }
    if info.destinations.is_empty() {
        out.push_str("  No direct flights.\n");
    } else {
        out.push_str("  Direct flights:\n");
        for destination in &info.destinations {
            out.push_str(&format!(
                "    {} ({}) {:.0} km\n",
                destination.name, destination.code, destination.distance
            ));
        }
    }
    Ok(out)
}

/// Render a single field of a city.
pub fn render_field(
    code: &str,
    field: &str,
    value: &serde_json::Value,
    format: OutputFormat,
) -> Result<String> {
    match format {
        OutputFormat::Json => to_json(&json!({"code": code, "field": field, "value": value})),
        OutputFormat::Text => Ok(format!("{}\n", render_value(value))),
    }
}

fn render_value(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

pub fn render_flight(label: &str, flight: Option<&Flight>, format: OutputFormat) -> Result<String> {
    if format == OutputFormat::Json {
        return to_json(&flight);
    }
    Ok(match flight {
        Some(flight) => format!(
            "{label}: {} ({}) -> {} ({}), {:.0} km\n",
            flight.source_name,
            flight.source,
            flight.destination_name,
            flight.destination,
            flight.distance
        ),
        None => "No flights on the map.\n".to_string(),
    })
}

pub fn render_city_population(
    label: &str,
    city: Option<&CityPopulation>,
    format: OutputFormat,
) -> Result<String> {
    if format == OutputFormat::Json {
        return to_json(&city);
    }
    Ok(match city {
        Some(city) => format!(
            "{label}: {} ({}), population {}\n",
            city.name,
            city.code,
            format_with_separators(city.population)
        ),
        None => "No cities on the map.\n".to_string(),
    })
}

/// Render an average; `unit` is appended in text mode.
pub fn render_average(
    label: &str,
    value: Option<f64>,
    unit: &str,
    format: OutputFormat,
) -> Result<String> {
    if format == OutputFormat::Json {
        return to_json(&value);
    }
    Ok(match value {
        Some(value) => format!("{label}: {value:.2}{unit}\n"),
        None => "Nothing to average on an empty map.\n".to_string(),
    })
}

pub fn render_hubs(hubs: &[Hub], format: OutputFormat) -> Result<String> {
    if format == OutputFormat::Json {
        return to_json(hubs);
    }
    if hubs.is_empty() {
        return Ok("No cities on the map.\n".to_string());
    }
    Ok(hubs
        .iter()
        .map(|hub| {
            let noun = if hub.connections == 1 { "flight" } else { "flights" };
            format!("{} ({}): {} {noun}\n", hub.name, hub.code, hub.connections)
        })
        .collect())
}

pub fn render_continents(continents: &[Continent], format: OutputFormat) -> Result<String> {
    if format == OutputFormat::Json {
        return to_json(continents);
    }
    if continents.is_empty() {
        return Ok("No cities on the map.\n".to_string());
    }
    Ok(continents
        .iter()
        .map(|continent| format!("{}: {}\n", continent.name, continent.cities.join(", ")))
        .collect())
}

pub fn render_route(path: &[String], info: &RouteInfo, format: OutputFormat) -> Result<String> {
    if format == OutputFormat::Json {
        return to_json(&json!({"path": path, "info": info}));
    }
    let mut out = format!("Route: {}\n", path.join(" -> "));
    for leg in &info.legs {
        if leg.layover_hours > 0.0 {
            out.push_str(&format!(
                "  layover at {} {}\n",
                leg.from,
                format_hours(leg.layover_hours)
            ));
        }
        out.push_str(&format!(
            "  {} -> {}  {:.0} km  ${:.2}  {}\n",
            leg.from,
            leg.to,
            leg.distance,
            leg.cost,
            format_hours(leg.flight_hours)
        ));
    }
    out.push_str(&format!("Total distance: {:.0} km\n", info.distance));
    out.push_str(&format!("Total cost: ${:.2}\n", info.cost));
    out.push_str(&format!(
        "Total time: {:.2} h ({})\n",
        info.time_hours,
        format_hours(info.time_hours)
    ));
    Ok(out)
}

pub fn render_merge(path: &str, report: &MergeReport, format: OutputFormat) -> Result<String> {
    if format == OutputFormat::Json {
        return to_json(report);
    }
    Ok(format!(
        "Loaded {path}: {} cities added, {} already present, {} routes applied.\n",
        report.metros_added, report.metros_skipped, report.routes_applied
    ))
}

/// Render a plain confirmation message.
pub fn render_message(message: &str, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => to_json(&json!({"message": message})),
        OutputFormat::Text => Ok(format!("{message}\n")),
    }
}

/// User-facing description of a library error.
pub fn describe_error(error: &Error) -> String {
    match error {
        Error::NotFound { .. } => {
            let detail = error.to_string();
            let mut chars = detail.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => detail,
            }
        }
        Error::DuplicateNode { code } => {
            format!("City {code} already exists; use edit-city to change it.")
        }
        Error::InvalidRoute { path } if path.is_empty() => {
            "A route needs at least one city.".to_string()
        }
        Error::InvalidRoute { path } => format!(
            "Invalid route {}: every city must exist and each leg must be a direct flight.",
            path.join(" -> ")
        ),
        Error::NoPathFound { start, goal } => format!("No route from {start} to {goal}."),
        Error::MalformedInput { message } => format!("Malformed input: {message}."),
        Error::InvalidDistance { distance } => {
            format!("Invalid distance {distance}: distances must be non-negative numbers.")
        }
        Error::MapNotFound => {
            "No map loaded: pass --map FILE or set AIRMAP_MAP_FILE.".to_string()
        }
        Error::ProjectDirsUnavailable => {
            "Could not determine a data directory; pass --state-file.".to_string()
        }
        Error::Io(err) => format!("File error: {err}."),
        Error::Json(err) => format!("Could not encode map data: {err}."),
    }
}

/// Describe an application error, preferring the library description over
/// the raw chain once a library error is found.
pub fn describe_failure(error: &anyhow::Error) -> String {
    let mut parts = Vec::new();
    for cause in error.chain() {
        if let Some(lib_error) = cause.downcast_ref::<Error>() {
            parts.push(describe_error(lib_error));
            break;
        }
        parts.push(cause.to_string());
    }
    parts.join(": ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Context;

    #[test]
    fn separators_group_thousands() {
        assert_eq!(format_with_separators(0), "0");
        assert_eq!(format_with_separators(999), "999");
        assert_eq!(format_with_separators(1_000), "1,000");
        assert_eq!(format_with_separators(23_400_000), "23,400,000");
    }

    #[test]
    fn hours_render_as_hours_and_minutes() {
        assert_eq!(format_hours(0.0), "0h 00m");
        assert_eq!(format_hours(1.5), "1h 30m");
        assert_eq!(format_hours(11.812), "11h 49m");
    }

    #[test]
    fn every_error_kind_has_a_description() {
        let errors = vec![
            Error::NotFound {
                code: "LIN".to_string(),
                suggestions: vec!["LIM".to_string()],
            },
            Error::DuplicateNode {
                code: "LIM".to_string(),
            },
            Error::InvalidRoute {
                path: vec!["MEX".to_string(), "SCL".to_string()],
            },
            Error::InvalidRoute { path: Vec::new() },
            Error::NoPathFound {
                start: "MEX".to_string(),
                goal: "ZZZ".to_string(),
            },
            Error::MalformedInput {
                message: "missing field: name".to_string(),
            },
            Error::InvalidDistance { distance: -1.0 },
            Error::MapNotFound,
            Error::ProjectDirsUnavailable,
            Error::Io(std::io::Error::new(std::io::ErrorKind::NotFound, "gone")),
        ];
        for error in &errors {
            assert!(!describe_error(error).is_empty());
        }
        assert_eq!(
            describe_error(&errors[0]),
            "Unknown city code: LIN. Did you mean 'LIM'?"
        );
        assert_eq!(
            describe_error(&errors[2]),
            "Invalid route MEX -> SCL: every city must exist and each leg must be a direct flight."
        );
    }

    #[test]
    fn failure_keeps_context_and_stops_at_library_error() {
        let result: std::result::Result<(), Error> = Err(Error::MapNotFound);
        let error = result.context("failed to open map").unwrap_err();
        assert_eq!(
            describe_failure(&error),
            "failed to open map: No map loaded: pass --map FILE or set AIRMAP_MAP_FILE."
        );
    }

    #[test]
    fn hubs_pluralize_flights() {
        let hubs = vec![
            Hub {
                code: "LIM".to_string(),
                name: "Lima".to_string(),
                connections: 2,
            },
            Hub {
                code: "SCL".to_string(),
                name: "Santiago".to_string(),
                connections: 1,
            },
        ];
        assert_eq!(
            render_hubs(&hubs, OutputFormat::Text).unwrap(),
            "Lima (LIM): 2 flights\nSantiago (SCL): 1 flight\n"
        );
    }
}
