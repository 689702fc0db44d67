use crate::adapters::geocoding::{DEFAULT_COUNTRY_CODE, DEFAULT_GEOCODING_ENDPOINT};
use crate::adapters::iss_locator::DEFAULT_ISS_ENDPOINT;
use crate::domain::model::ObserverSettings;
use crate::domain::ports::ConfigProvider;
use crate::utils::error::{Result, TrackerError};
use crate::utils::validation::{self, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrackerConfig {
    #[serde(default)]
    pub observer: ObserverSettings,
    #[serde(default)]
    pub services: ServicesConfig,
    #[serde(default)]
    pub polling: PollingConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServicesConfig {
    pub iss_endpoint: String,
    pub geocoding_endpoint: String,
    pub country_code: String,
    pub timeout_seconds: u64,
}

impl Default for ServicesConfig {
    fn default() -> Self {
        Self {
            iss_endpoint: DEFAULT_ISS_ENDPOINT.to_string(),
            geocoding_endpoint: DEFAULT_GEOCODING_ENDPOINT.to_string(),
            country_code: DEFAULT_COUNTRY_CODE.to_string(),
            timeout_seconds: 10,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PollingConfig {
    pub interval_seconds: u64,
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            interval_seconds: 30,
        }
    }
}

impl TrackerConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| TrackerError::ConfigParseError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${ISS_POSTAL_CODE})，找不到的保留原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| TrackerError::ConfigParseError {
            message: e.to_string(),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    /// 驗證配置的合理性。未設定位置不算錯誤，交給每次 cycle 回報
    pub fn validate_config(&self) -> Result<()> {
        validation::validate_url("services.iss_endpoint", &self.services.iss_endpoint)?;
        validation::validate_url(
            "services.geocoding_endpoint",
            &self.services.geocoding_endpoint,
        )?;
        validation::validate_country_code("services.country_code", &self.services.country_code)?;
        validation::validate_positive_number(
            "services.timeout_seconds",
            self.services.timeout_seconds,
            1,
        )?;
        validation::validate_positive_number(
            "polling.interval_seconds",
            self.polling.interval_seconds,
            1,
        )?;
        Ok(())
    }

    pub fn has_observer_location(&self) -> bool {
        self.observer.observer_config().is_ok()
    }
}

impl ConfigProvider for TrackerConfig {
    fn observer_settings(&self) -> &ObserverSettings {
        &self.observer
    }

    fn iss_endpoint(&self) -> &str {
        &self.services.iss_endpoint
    }

    fn geocoding_endpoint(&self) -> &str {
        &self.services.geocoding_endpoint
    }

    fn country_code(&self) -> &str {
        &self.services.country_code
    }

    fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.services.timeout_seconds)
    }

    fn polling_interval(&self) -> Duration {
        Duration::from_secs(self.polling.interval_seconds)
    }
}

impl Validate for TrackerConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
