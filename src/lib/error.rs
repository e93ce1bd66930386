use thiserror::Error;

#[derive(Error, Debug)]
pub enum GeofenceError {
    #[error("Location is outside the service area ({latitude}, {longitude})")]
    OutsideServiceArea { latitude: f64, longitude: f64 },

    #[error("Missing coordinate: {field}")]
    MissingCoordinate { field: String },

    #[error("Invalid coordinate for {field}: '{value}' is not a number")]
    InvalidCoordinate { field: String, value: String },

    #[error("Invalid coordinate for {field}: {value} is not finite")]
    NonFiniteCoordinate { field: String, value: f64 },

    #[error("Invalid configuration value for '{field}': {reason}")]
    InvalidConfigValue { field: String, reason: String },

    #[error("Unknown service area: {name}")]
    UnknownArea { name: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),
}

impl GeofenceError {
    /// Whether the error stems from the request rather than from the
    /// configuration or the environment.
    pub fn is_invalid_request(&self) -> bool {
        matches!(
            self,
            GeofenceError::MissingCoordinate { .. }
                | GeofenceError::InvalidCoordinate { .. }
                | GeofenceError::NonFiniteCoordinate { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, GeofenceError>;
