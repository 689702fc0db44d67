pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use adapters::{
    console::{ConsoleSink, OutputFormat},
    geocoding::GeocodingClient,
    iss_locator::IssLocator,
};
pub use config::TrackerConfig;
pub use self::core::{cycle::TrackerCycle, scheduler::PollingScheduler};
pub use utils::error::{Result, TrackerError};
