use std::fmt;
use thiserror::Error;

/// 外部服務識別
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Service {
    IssPosition,
    Geocoding,
}

impl fmt::Display for Service {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Service::IssPosition => write!(f, "ISS position service"),
            Service::Geocoding => write!(f, "Geocoding service"),
        }
    }
}

#[derive(Error, Debug)]
pub enum TrackerError {
    #[error("Location is not configured: {message}")]
    ConfigurationError { message: String },

    #[error("Invalid coordinates: latitude={latitude}, longitude={longitude}")]
    InvalidCoordinateError { latitude: f64, longitude: f64 },

    #[error("Postal code not found: \"{postal_code}\".")]
    NotFoundError { postal_code: String },

    #[error("{service} request failed: {message}")]
    UpstreamError { service: Service, message: String },

    #[error("Invalid value for '{field}': '{value}' ({reason})")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Configuration parse error: {message}")]
    ConfigParseError { message: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("HTTP client error: {0}")]
    HttpClientError(#[from] reqwest::Error),
}

impl TrackerError {
    pub fn upstream(service: Service, message: impl fmt::Display) -> Self {
        TrackerError::UpstreamError {
            service,
            message: message.to_string(),
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        TrackerError::ConfigurationError {
            message: message.into(),
        }
    }

    /// 給使用者看的訊息，直接放進 ErrorSignal
    pub fn user_friendly_message(&self) -> String {
        match self {
            TrackerError::ConfigurationError { .. } => {
                "Please configure your location in settings.".to_string()
            }
            TrackerError::InvalidCoordinateError { .. } => {
                "Invalid coordinates. Please check your latitude and longitude.".to_string()
            }
            TrackerError::UpstreamError {
                service: Service::IssPosition,
                ..
            } => "Failed to get ISS data".to_string(),
            TrackerError::UpstreamError {
                service: Service::Geocoding,
                ..
            } => "Failed to look up your postal code".to_string(),
            other => other.to_string(),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            TrackerError::ConfigurationError { .. } => {
                "Set latitude/longitude or postal_code under [observer], or pass --latitude/--longitude or --postal-code"
            }
            TrackerError::InvalidCoordinateError { .. } => {
                "Latitude must be within [-90, 90] and longitude within [-180, 180]"
            }
            TrackerError::NotFoundError { .. } => {
                "Check the postal code and the configured country code"
            }
            TrackerError::UpstreamError { .. } => {
                "The service may be temporarily unavailable; the next cycle will retry"
            }
            TrackerError::InvalidConfigValueError { .. } | TrackerError::ConfigParseError { .. } => {
                "Fix the configuration file or command line flags and restart"
            }
            TrackerError::IoError(_) => "Check that the file exists and is readable",
            TrackerError::SerializationError(_) => "Report this as a bug",
            TrackerError::HttpClientError(_) => "Check the TLS and proxy environment",
        }
    }
}

pub type Result<T> = std::result::Result<T, TrackerError>;
