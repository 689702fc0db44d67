// Adapters layer: concrete implementations of the domain ports (http services, console output).

pub mod console;
pub mod geocoding;
pub mod iss_locator;

use crate::utils::error::Result;
use reqwest::Client;
use std::time::Duration;

pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

pub(crate) fn build_http_client(timeout: Duration) -> Result<Client> {
    let client = Client::builder()
        .timeout(timeout)
        .user_agent(concat!("iss-tracker/", env!("CARGO_PKG_VERSION")))
        .build()?;
    Ok(client)
}
