use super::area::ServiceArea;
use super::error::{GeofenceError, Result};
use super::geo::GeoPoint;
use serde::{Deserialize, Serialize};

/// A coordinate as a client sent it: a JSON number or a numeric string.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(untagged)]
pub enum RawCoordinate {
    Number(f64),
    Text(String),
}

impl RawCoordinate {
    fn parse(&self, field: &str) -> Result<f64> {
        let value = match self {
            RawCoordinate::Number(value) => *value,
            RawCoordinate::Text(text) => {
                text.trim()
                    .parse::<f64>()
                    .map_err(|_| GeofenceError::InvalidCoordinate {
                        field: field.into(),
                        value: text.clone(),
                    })?
            }
        };
        if !value.is_finite() {
            return Err(GeofenceError::NonFiniteCoordinate {
                field: field.into(),
                value,
            });
        }
        Ok(value)
    }
}

impl From<f64> for RawCoordinate {
    fn from(value: f64) -> Self {
        RawCoordinate::Number(value)
    }
}

impl From<&str> for RawCoordinate {
    fn from(text: &str) -> Self {
        RawCoordinate::Text(text.into())
    }
}

/// Unvalidated coordinates from an issue submission or a map selection.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct LocationRequest {
    #[serde(alias = "lat")]
    pub latitude: Option<RawCoordinate>,
    #[serde(alias = "lng", alias = "lon")]
    pub longitude: Option<RawCoordinate>,
}

impl LocationRequest {
    pub fn new(latitude: impl Into<RawCoordinate>, longitude: impl Into<RawCoordinate>) -> Self {
        LocationRequest {
            latitude: Some(latitude.into()),
            longitude: Some(longitude.into()),
        }
    }

    /// Rejects missing, non-numeric and non-finite values. Range checks are
    /// left to the configured service area.
    pub fn to_point(&self) -> Result<GeoPoint> {
        let latitude = required("latitude", &self.latitude)?.parse("latitude")?;
        let longitude = required("longitude", &self.longitude)?.parse("longitude")?;
        Ok(GeoPoint::new(latitude, longitude))
    }
}

fn required<'a>(field: &str, value: &'a Option<RawCoordinate>) -> Result<&'a RawCoordinate> {
    value
        .as_ref()
        .ok_or_else(|| GeofenceError::MissingCoordinate {
            field: field.into(),
        })
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct ValidationResult {
    pub valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
}

impl ValidationResult {
    pub fn new(valid: bool, point: &GeoPoint) -> Self {
        ValidationResult {
            valid,
            latitude: Some(point.latitude),
            longitude: Some(point.longitude),
        }
    }

    pub fn rejected() -> Self {
        ValidationResult {
            valid: false,
            latitude: None,
            longitude: None,
        }
    }

    pub fn point(&self) -> Option<GeoPoint> {
        Some(GeoPoint::new(self.latitude?, self.longitude?))
    }
}

/// Request/response check behind the map location picker.
pub fn check_location(area: &ServiceArea, request: &LocationRequest) -> Result<ValidationResult> {
    let point = request.to_point()?;
    let valid = area.is_within(&point);
    tracing::debug!(
        area = area.name(),
        latitude = point.latitude,
        longitude = point.longitude,
        valid,
        "checked location"
    );
    Ok(ValidationResult::new(valid, &point))
}

/// Gate in front of issue creation.
pub fn ensure_within_service_area(area: &ServiceArea, point: GeoPoint) -> Result<GeoPoint> {
    if area.is_within(&point) {
        return Ok(point);
    }
    tracing::info!(
        area = area.name(),
        latitude = point.latitude,
        longitude = point.longitude,
        "rejected location outside service area"
    );
    Err(GeofenceError::OutsideServiceArea {
        latitude: point.latitude,
        longitude: point.longitude,
    })
}
