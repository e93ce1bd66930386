use self::output::Output;
use self::request::{check_location, LocationRequest};
use rayon::prelude::*;
use std::io::{BufRead, Write};
use std::path::Path;

pub mod area;
pub mod config;
pub mod error;
pub mod geo;
mod geojson;
pub mod index;
pub mod logger;
pub mod output;
pub mod request;

pub use self::area::ServiceArea;
pub use self::config::GeofenceConfig;
pub use self::error::{GeofenceError, Result};
pub use self::geo::{is_within_service_area, BoundingBox, GeoPoint, Polygon};
pub use self::index::AreaIndex;
pub use self::request::{ensure_within_service_area, ValidationResult};

#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct BatchSummary {
    pub total: usize,
    pub inside: usize,
    pub rejected: usize,
}

/// Loads the service areas from a TOML file, or the built-in Makola area when
/// no file is given.
pub fn load_config(path: Option<&Path>) -> Result<GeofenceConfig> {
    match path {
        Some(path) => GeofenceConfig::from_file(path),
        None => Ok(GeofenceConfig::default()),
    }
}

fn check_line(area: &ServiceArea, line_number: usize, line: &str) -> ValidationResult {
    let result = serde_json::from_str::<LocationRequest>(line)
        .map_err(GeofenceError::from)
        .and_then(|request| check_location(area, &request));
    match result {
        Ok(result) => result,
        Err(e) => {
            tracing::warn!(line = line_number as u64, "rejected request: {}", e);
            ValidationResult::rejected()
        }
    }
}

/// Validates a stream of JSON-lines location requests against `area` and
/// writes one result per non-empty input line, in input order.
///
/// Lines that cannot be turned into a finite coordinate pair produce
/// `{"valid":false}` without echoed coordinates.
///
/// # Example
///
/// ```
/// use civic_geofence::{process, ServiceArea};
///
/// let input = "{\"latitude\": 6.9745, \"longitude\": 79.95}\n{\"lat\": 6.9, \"lng\": 79.9}\n";
/// let mut output = Vec::new();
/// let summary = process(input.as_bytes(), &mut output, &ServiceArea::makola()).unwrap();
/// assert_eq!(summary.total, 2);
/// assert_eq!(summary.inside, 1);
/// ```
pub fn process(
    reader: impl BufRead,
    writer: &mut dyn Write,
    area: &ServiceArea,
) -> Result<BatchSummary> {
    let lines: Vec<String> = reader.lines().collect::<std::io::Result<_>>()?;

    let results: Vec<ValidationResult> = lines
        .par_iter()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(idx, line)| check_line(area, idx + 1, line))
        .collect();

    results.write_json_lines(writer)?;

    let summary = BatchSummary {
        total: results.len(),
        inside: results.iter().filter(|result| result.valid).count(),
        rejected: results
            .iter()
            .filter(|result| result.point().is_none())
            .count(),
    };
    tracing::info!(
        area = area.name(),
        total = summary.total as u64,
        inside = summary.inside as u64,
        rejected = summary.rejected as u64,
        "processed batch"
    );
    Ok(summary)
}
