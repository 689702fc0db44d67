use crate::adapters::console::OutputFormat;
use crate::config::toml_config::TrackerConfig;
use crate::utils::error::Result;
use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "iss-tracker")]
#[command(about = "Polls the ISS position and signals how close it is to you")]
#[command(version, allow_negative_numbers = true)]
pub struct CliConfig {
    /// Path to TOML configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Observer latitude in degrees
    #[arg(long)]
    pub latitude: Option<f64>,

    /// Observer longitude in degrees
    #[arg(long)]
    pub longitude: Option<f64>,

    /// Postal code to geocode instead of explicit coordinates
    #[arg(long)]
    pub postal_code: Option<String>,

    /// Country the postal code belongs to (ISO 3166-1 alpha-2)
    #[arg(long)]
    pub country_code: Option<String>,

    /// Seconds between polls
    #[arg(long)]
    pub interval: Option<u64>,

    #[arg(long)]
    pub iss_endpoint: Option<String>,

    #[arg(long)]
    pub geocoding_endpoint: Option<String>,

    /// Run a single cycle, print the details and exit
    #[arg(long)]
    pub once: bool,

    /// Stop after this many cycles
    #[arg(long)]
    pub cycles: Option<u64>,

    #[arg(long, value_enum, default_value = "text")]
    pub output: OutputFormat,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long)]
    pub json_logs: bool,
}

impl CliConfig {
    /// 載入設定檔（若有）並套用命令列覆蓋
    pub fn load(&self) -> Result<TrackerConfig> {
        let mut config = match &self.config {
            Some(path) => {
                tracing::info!("📁 Loading configuration from: {}", path.display());
                TrackerConfig::from_file(path)?
            }
            None => TrackerConfig::default(),
        };
        self.apply_overrides(&mut config);
        Ok(config)
    }

    pub fn apply_overrides(&self, config: &mut TrackerConfig) {
        if self.latitude.is_some() || self.longitude.is_some() {
            config.observer.latitude = self.latitude.or(config.observer.latitude);
            config.observer.longitude = self.longitude.or(config.observer.longitude);
            config.observer.postal_code = None;
        }
        if let Some(postal_code) = &self.postal_code {
            config.observer.postal_code = Some(postal_code.clone());
            config.observer.latitude = None;
            config.observer.longitude = None;
        }
        if let Some(country_code) = &self.country_code {
            config.services.country_code = country_code.clone();
        }
        if let Some(interval) = self.interval {
            config.polling.interval_seconds = interval;
        }
        if let Some(endpoint) = &self.iss_endpoint {
            config.services.iss_endpoint = endpoint.clone();
        }
        if let Some(endpoint) = &self.geocoding_endpoint {
            config.services.geocoding_endpoint = endpoint.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::ObserverSettings;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_negative_coordinates() {
        let cli = CliConfig::try_parse_from([
            "iss-tracker",
            "--latitude",
            "-33.8688",
            "--longitude",
            "151.2093",
            "--interval",
            "10",
        ])
        .unwrap();

        let config = cli.load().unwrap();
        assert_eq!(
            config.observer,
            ObserverSettings::from_coordinates(-33.8688, 151.2093)
        );
        assert_eq!(config.polling.interval_seconds, 10);
        assert_eq!(cli.output, OutputFormat::Text);
    }

    #[test]
    fn test_postal_code_flag_replaces_file_coordinates() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file
            .write_all(b"[observer]\nlatitude = 1.0\nlongitude = 2.0\n\n[polling]\ninterval_seconds = 45\n")
            .unwrap();
        let path = temp_file.path().to_str().unwrap().to_string();

        let cli = CliConfig::try_parse_from([
            "iss-tracker",
            "--config",
            path.as_str(),
            "--postal-code",
            "78701",
            "--output",
            "json",
        ])
        .unwrap();

        let config = cli.load().unwrap();
        assert_eq!(config.observer, ObserverSettings::from_postal_code("78701"));
        assert_eq!(config.polling.interval_seconds, 45);
        assert_eq!(cli.output, OutputFormat::Json);
    }

    #[test]
    fn test_coordinate_flags_clear_file_postal_code() {
        let mut config = TrackerConfig::default();
        config.observer = ObserverSettings::from_postal_code("78701");

        let cli =
            CliConfig::try_parse_from(["iss-tracker", "--latitude", "0", "--longitude", "0"])
                .unwrap();
        cli.apply_overrides(&mut config);

        assert_eq!(config.observer, ObserverSettings::from_coordinates(0.0, 0.0));
    }
}
