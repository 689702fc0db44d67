use crate::domain::model::CycleOutcome;
use crate::domain::ports::SignalSink;
use crate::utils::error::Result;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// 把訊號印到 stdout
#[derive(Debug, Clone, Default)]
pub struct ConsoleSink {
    format: OutputFormat,
}

impl ConsoleSink {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    pub fn render(&self, outcome: &CycleOutcome) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string(outcome)?),
            OutputFormat::Text => Ok(match outcome {
                CycleOutcome::Signal(signal) => format!(
                    "[{} {}] {}: {}",
                    signal.effect, signal.color, signal.name, signal.message
                ),
                CycleOutcome::Error(error) => {
                    format!("[ERROR] {}: {}", error.name, error.errors.join("; "))
                }
            }),
        }
    }
}

impl SignalSink for ConsoleSink {
    fn emit(&self, outcome: &CycleOutcome) -> Result<()> {
        println!("{}", self.render(outcome)?);
        Ok(())
    }
}
