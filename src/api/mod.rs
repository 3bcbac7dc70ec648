//! # Transit and Weather API Wrappers
//!
//! The controller consumes two remote services through small synchronous
//! traits. The concrete clients ([`tfl::TflClient`], [`openweather::OpenWeatherClient`])
//! use an async `reqwest` client and block on a shared tokio runtime handle, so
//! every call stalls the caller until the response arrives.
//!
//! ## Error Handling
//!
//! - **Non-success HTTP status**: reported as [`ApiError::Status`] (or as a
//!   [`Probe::Status`] from `test_connection`) so screens can render the code
//! - **Transport failures**: [`ApiError::Http`], propagated up to the recovery loop
//! - **Unexpected payloads**: [`ApiError::Decode`]

pub mod openweather;
pub mod tfl;

use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::fmt;
use std::time::Duration;
use thiserror::Error;
use tokio::runtime::Handle;

/// Per-request timeout for both services.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// Errors raised by the API wrappers.
#[derive(Error, Debug)]
pub enum ApiError {
    /// HTTP request failed (network, TLS, or protocol error)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Server answered with a non-success status
    #[error("HTTP status {0}")]
    Status(u16),

    /// Response body did not have the expected shape
    #[error("unexpected response: {0}")]
    Decode(String),
}

/// Result of a connectivity probe.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Probe {
    Ok,
    /// Reachable, but answered with this HTTP status
    Status(u16),
}

impl fmt::Display for Probe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Probe::Ok => write!(f, "OK"),
            Probe::Status(code) => write!(f, "{}", code),
        }
    }
}

/// One arrival exactly as the transit API reports it.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawArrival {
    /// Full platform name, e.g. `"Westbound - Platform 1"`
    pub platform_name: String,
    pub time_to_station: u32,
    pub towards: String,
}

/// Current conditions returned by the weather service.
#[derive(Clone, Debug, PartialEq)]
pub struct WeatherReport {
    pub description: String,
    pub temperature_celsius: f64,
}

/// Transit service wrapper (per-line primitives; merging lives in [`crate::transit`]).
pub trait TransitApi {
    fn test_connection(&mut self) -> Result<Probe, ApiError>;

    /// Raw status description of one line, e.g. `"Good Service"`.
    fn fetch_status(&mut self, line: &str) -> Result<String, ApiError>;

    /// Unfiltered, unsorted arrivals of one line at one station.
    fn fetch_arrivals(&mut self, line: &str, station_id: &str)
        -> Result<Vec<RawArrival>, ApiError>;
}

/// Weather service wrapper.
pub trait WeatherApi {
    fn test_connection(&mut self) -> Result<Probe, ApiError>;

    fn fetch(&mut self) -> Result<WeatherReport, ApiError>;
}

/// Blocking facade over an async `reqwest` client.
#[derive(Clone)]
pub(crate) struct BlockingHttp {
    client: Client,
    runtime: Handle,
}

impl BlockingHttp {
    pub(crate) fn new(runtime: Handle) -> Result<Self, ApiError> {
        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self { client, runtime })
    }

    /// GET `url` and report only whether it answered 200.
    pub(crate) fn probe(&self, url: &str) -> Result<Probe, ApiError> {
        self.runtime.block_on(async {
            let response = self.client.get(url).send().await?;
            let status = response.status();
            Ok::<_, ApiError>(if status == reqwest::StatusCode::OK {
                Probe::Ok
            } else {
                Probe::Status(status.as_u16())
            })
        })
    }

    /// GET `url` and deserialize the JSON body.
    pub(crate) fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, ApiError> {
        self.runtime.block_on(async {
            let response = self.client.get(url).send().await?;
            let status = response.status();
            if !status.is_success() {
                return Err(ApiError::Status(status.as_u16()));
            }
            let body = response.bytes().await?;
            serde_json::from_slice::<T>(&body).map_err(|e| ApiError::Decode(e.to_string()))
        })
    }
}
