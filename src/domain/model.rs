use crate::utils::error::{Result, TrackerError};
use crate::utils::validation::validate_coordinate;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// 經過驗證的經緯度（度）。只能透過 [`Coordinate::new`] 建立。
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Coordinate {
    latitude: f64,
    longitude: f64,
}

impl Coordinate {
    pub fn new(latitude: f64, longitude: f64) -> Result<Self> {
        validate_coordinate(latitude, longitude)?;
        Ok(Self {
            latitude,
            longitude,
        })
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    /// Great-circle distance in kilometres.
    pub fn distance_to(&self, other: &Coordinate) -> f64 {
        crate::core::geo::haversine_distance_km(
            self.latitude,
            self.longitude,
            other.latitude,
            other.longitude,
        )
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.4}, {:.4})", self.latitude, self.longitude)
    }
}

/// 使用者的原始位置設定，對應設定檔的 `[observer]` 區段
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ObserverSettings {
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub postal_code: Option<String>,
}

impl ObserverSettings {
    pub fn from_coordinates(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude: Some(latitude),
            longitude: Some(longitude),
            postal_code: None,
        }
    }

    pub fn from_postal_code(postal_code: impl Into<String>) -> Self {
        Self {
            latitude: None,
            longitude: None,
            postal_code: Some(postal_code.into()),
        }
    }

    /// 收斂成唯一的一種形式；座標優先於郵遞區號
    pub fn observer_config(&self) -> Result<ObserverConfig> {
        let postal_code = self
            .postal_code
            .as_deref()
            .map(str::trim)
            .filter(|code| !code.is_empty());

        match (self.latitude, self.longitude, postal_code) {
            (Some(latitude), Some(longitude), code) => {
                if code.is_some() {
                    tracing::warn!("Both coordinates and postal code configured, using coordinates");
                }
                Ok(ObserverConfig::Coordinates {
                    latitude,
                    longitude,
                })
            }
            (_, _, Some(code)) => Ok(ObserverConfig::PostalCode(code.to_string())),
            (Some(_), None, None) | (None, Some(_), None) => Err(TrackerError::configuration(
                "both latitude and longitude are required",
            )),
            (None, None, None) => Err(TrackerError::configuration(
                "no coordinates or postal code configured",
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ObserverConfig {
    Coordinates { latitude: f64, longitude: f64 },
    PostalCode(String),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IssPosition {
    pub coordinate: Coordinate,
    pub timestamp: Option<DateTime<Utc>>,
}

/// 地理編碼服務回傳的候選結果（尚未驗證）
#[derive(Debug, Clone, PartialEq)]
pub struct GeoCandidate {
    pub latitude: f64,
    pub longitude: f64,
    pub name: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Effect {
    Solid,
    Blink,
    Breathe,
    SetColor,
}

impl fmt::Display for Effect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Effect::Solid => "SOLID",
            Effect::Blink => "BLINK",
            Effect::Breathe => "BREATHE",
            Effect::SetColor => "SET_COLOR",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SignalDescriptor {
    pub name: String,
    pub color: String,
    pub effect: Effect,
    pub message: String,
}

pub const ERROR_SIGNAL_NAME: &str = "ISS Tracker Error";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ErrorSignal {
    pub name: String,
    pub errors: Vec<String>,
}

impl ErrorSignal {
    pub fn new(errors: Vec<String>) -> Self {
        Self {
            name: ERROR_SIGNAL_NAME.to_string(),
            errors,
        }
    }
}

impl From<&TrackerError> for ErrorSignal {
    fn from(error: &TrackerError) -> Self {
        let mut errors = vec![error.user_friendly_message()];
        if let TrackerError::UpstreamError { message, .. } = error {
            errors.push(message.clone());
        }
        ErrorSignal::new(errors)
    }
}

/// 一次輪詢的結果：正常訊號或錯誤訊號
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CycleOutcome {
    Signal(SignalDescriptor),
    Error(ErrorSignal),
}

impl CycleOutcome {
    pub fn is_error(&self) -> bool {
        matches!(self, CycleOutcome::Error(_))
    }

    pub fn signal(&self) -> Option<&SignalDescriptor> {
        match self {
            CycleOutcome::Signal(signal) => Some(signal),
            CycleOutcome::Error(_) => None,
        }
    }

    pub fn error(&self) -> Option<&ErrorSignal> {
        match self {
            CycleOutcome::Signal(_) => None,
            CycleOutcome::Error(error) => Some(error),
        }
    }
}
