use super::area::ServiceArea;
use super::error::{GeofenceError, Result};
use super::geo::{BoundingBox, GeoPoint, Polygon};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

/// Service areas as read from a TOML file, one `[[area]]` table each.
///
/// ```
/// use civic_geofence::config::GeofenceConfig;
///
/// let config = GeofenceConfig::from_toml_str(r#"
///     [[area]]
///     name = "square"
///     vertices = [
///         { lat = 0.0, lng = 0.0 },
///         { lat = 0.0, lng = 1.0 },
///         { lat = 1.0, lng = 1.0 },
///         { lat = 1.0, lng = 0.0 },
///     ]
///     [area.bounds]
///     north = 1.0
///     south = 0.0
///     east = 1.0
///     west = 0.0
/// "#).unwrap();
/// assert_eq!(config.service_areas().len(), 1);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeofenceConfig {
    #[serde(rename = "area", default)]
    pub areas: Vec<AreaConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AreaConfig {
    pub name: String,
    pub vertices: Vec<GeoPoint>,
    pub bounds: BoundingBox,
}

impl GeofenceConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        tracing::debug!("loading service areas from {}", path.as_ref().display());
        Self::from_toml_str(&content)
    }

    /// Parses and validates; box/polygon divergence is only logged.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: GeofenceConfig = toml::from_str(content)?;
        config.validate()?;
        config.report_inconsistencies();
        Ok(config)
    }

    pub fn service_areas(&self) -> Vec<ServiceArea> {
        self.areas.iter().map(ServiceArea::from).collect()
    }

    pub fn area(&self, name: &str) -> Result<ServiceArea> {
        self.areas
            .iter()
            .find(|area| area.name == name)
            .map(ServiceArea::from)
            .ok_or_else(|| GeofenceError::UnknownArea { name: name.into() })
    }

    fn report_inconsistencies(&self) {
        for area in self.service_areas() {
            for (idx, vertex) in area.vertices_outside_bounds() {
                tracing::warn!(
                    area = area.name(),
                    vertex = idx as u64,
                    latitude = vertex.latitude,
                    longitude = vertex.longitude,
                    "polygon vertex lies outside the bounding box, fix the configuration"
                );
            }
        }
    }
}

impl Default for GeofenceConfig {
    fn default() -> Self {
        GeofenceConfig {
            areas: vec![(&ServiceArea::makola()).into()],
        }
    }
}

impl From<&AreaConfig> for ServiceArea {
    fn from(config: &AreaConfig) -> Self {
        let polygon = Polygon::new(config.vertices.clone());
        ServiceArea::new(&config.name, config.bounds, polygon)
    }
}

impl From<&ServiceArea> for AreaConfig {
    fn from(area: &ServiceArea) -> Self {
        AreaConfig {
            name: area.name().into(),
            vertices: area.polygon().vertices().to_vec(),
            bounds: *area.bounds(),
        }
    }
}

fn validate_finite(field: &str, value: f64) -> Result<()> {
    if !value.is_finite() {
        return Err(GeofenceError::InvalidConfigValue {
            field: field.into(),
            reason: format!("{} is not a finite number", value),
        });
    }
    Ok(())
}

fn validate_ordered(field: &str, low: f64, high: f64) -> Result<()> {
    if low >= high {
        return Err(GeofenceError::InvalidConfigValue {
            field: field.into(),
            reason: format!("{} must be less than {}", low, high),
        });
    }
    Ok(())
}

impl Validate for AreaConfig {
    fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(GeofenceError::InvalidConfigValue {
                field: "area.name".into(),
                reason: "name cannot be empty".into(),
            });
        }

        let prefix = format!("area[{}]", self.name);
        let BoundingBox {
            north,
            south,
            east,
            west,
        } = self.bounds;
        validate_finite(&format!("{}.bounds.north", prefix), north)?;
        validate_finite(&format!("{}.bounds.south", prefix), south)?;
        validate_finite(&format!("{}.bounds.east", prefix), east)?;
        validate_finite(&format!("{}.bounds.west", prefix), west)?;
        validate_ordered(&format!("{}.bounds.south", prefix), south, north)?;
        validate_ordered(&format!("{}.bounds.west", prefix), west, east)?;

        for (idx, vertex) in self.vertices.iter().enumerate() {
            if !vertex.is_finite() {
                return Err(GeofenceError::InvalidConfigValue {
                    field: format!("{}.vertices[{}]", prefix, idx),
                    reason: "coordinates must be finite numbers".into(),
                });
            }
        }

        let mut distinct: Vec<&GeoPoint> = vec![];
        for vertex in self.vertices.iter() {
            if !distinct.contains(&vertex) {
                distinct.push(vertex);
            }
        }
        if distinct.len() < 3 {
            return Err(GeofenceError::InvalidConfigValue {
                field: format!("{}.vertices", prefix),
                reason: format!(
                    "a polygon needs at least 3 distinct vertices, got {}",
                    distinct.len()
                ),
            });
        }

        Ok(())
    }
}

impl Validate for GeofenceConfig {
    fn validate(&self) -> Result<()> {
        if self.areas.is_empty() {
            return Err(GeofenceError::InvalidConfigValue {
                field: "area".into(),
                reason: "at least one service area is required".into(),
            });
        }

        let mut names = HashSet::new();
        for area in self.areas.iter() {
            area.validate()?;
            if !names.insert(area.name.as_str()) {
                return Err(GeofenceError::InvalidConfigValue {
                    field: format!("area[{}].name", area.name),
                    reason: "duplicate service area name".into(),
                });
            }
        }
        Ok(())
    }
}
