use crate::domain::model::{CycleOutcome, GeoCandidate, IssPosition, ObserverSettings};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::time::Duration;

/// 衛星目前位置的來源
#[async_trait]
pub trait PositionSource: Send + Sync {
    async fn current_position(&self) -> Result<IssPosition>;
}

/// 郵遞區號 -> 候選座標
#[async_trait]
pub trait Geocoder: Send + Sync {
    async fn lookup(&self, postal_code: &str) -> Result<Vec<GeoCandidate>>;
}

/// The single entry point a scheduler drives once per tick.
#[async_trait]
pub trait Cycle: Send + Sync {
    async fn run_cycle(&self) -> CycleOutcome;
}

/// 訊號輸出端（主機負責實際呈現）
pub trait SignalSink: Send + Sync {
    fn emit(&self, outcome: &CycleOutcome) -> Result<()>;
}

pub trait ConfigProvider: Send + Sync {
    fn observer_settings(&self) -> &ObserverSettings;
    fn iss_endpoint(&self) -> &str;
    fn geocoding_endpoint(&self) -> &str;
    fn country_code(&self) -> &str;
    fn request_timeout(&self) -> Duration;
    fn polling_interval(&self) -> Duration;
}
