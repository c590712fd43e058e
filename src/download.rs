//! Retrieves the raw TEXT:LIST report page for a station from the sounding archive.

use std::time::Duration;

use log::debug;
use reqwest::{Client, Request};

use crate::{
    error::{Result, SoundingError},
    window::ObservationWindow,
};

pub const DEFAULT_ENDPOINT: &str = "http://weather.uwyo.edu/cgi-bin/sounding";

#[derive(Debug, Clone)]
pub struct FetchConfig {
    pub endpoint: String,
    pub timeout: Duration,
}

impl Default for FetchConfig {
    fn default() -> Self {
        FetchConfig {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            timeout: Duration::from_secs(30),
        }
    }
}

/// Anything that can hand back the report page for one station and window.
pub trait ReportSource {
    async fn fetch(&self, station: &str, window: &ObservationWindow) -> Result<String>;
}

pub struct HttpReportSource {
    client: Client,
    config: FetchConfig,
}

impl HttpReportSource {
    pub fn new(config: FetchConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(SoundingError::HttpClient)?;

        Ok(HttpReportSource { client, config })
    }

    fn request(&self, station: &str, window: &ObservationWindow) -> reqwest::Result<Request> {
        self.client
            .get(&self.config.endpoint)
            .query(&query_params(station, window))
            .build()
    }
}

impl ReportSource for HttpReportSource {
    async fn fetch(&self, station: &str, window: &ObservationWindow) -> Result<String> {
        let request = self
            .request(station, window)
            .map_err(|e| SoundingError::NetworkRequest(self.config.endpoint.clone(), e))?;
        let url = request.url().to_string();
        debug!("Requesting {}", url);

        let response = self
            .client
            .execute(request)
            .await
            .map_err(|e| SoundingError::NetworkRequest(url.clone(), e))?;

        if !response.status().is_success() {
            return Err(SoundingError::HttpStatus {
                url,
                status: response.status(),
            });
        }

        response
            .text()
            .await
            .map_err(|e| SoundingError::NetworkRequest(url, e))
    }
}

fn query_params<'a>(
    station: &'a str,
    window: &'a ObservationWindow,
) -> [(&'static str, &'a str); 6] {
    [
        ("TYPE", "TEXT:LIST"),
        ("YEAR", window.year.as_str()),
        ("MONTH", window.month.as_str()),
        ("FROM", window.day_hour.as_str()),
        ("TO", window.day_hour.as_str()),
        ("STNM", station),
    ]
}

// -- Tests -------------------------------------------------------------------
