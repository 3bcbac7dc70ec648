//! TfL Unified API client.
//!
//! Endpoints used:
//! - `GET /Line/Meta/Modes` as a connectivity probe
//! - `GET /Line/{line}/Status` for the status description
//! - `GET /Line/{line}/Arrivals/{station}?direction=all` for predictions
//!
//! Every request carries the `app_key` query parameter.

use super::{ApiError, BlockingHttp, Probe, RawArrival, TransitApi};
use serde::Deserialize;
use tokio::runtime::Handle;

pub const DEFAULT_BASE_URL: &str = "https://api.tfl.gov.uk";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LineStatusEntry {
    #[serde(default)]
    line_statuses: Vec<StatusDetail>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StatusDetail {
    status_severity_description: String,
}

pub struct TflClient {
    http: BlockingHttp,
    base_url: String,
    app_key: String,
}

impl TflClient {
    pub fn new(runtime: Handle, base_url: &str, app_key: &str) -> Result<Self, ApiError> {
        Ok(Self {
            http: BlockingHttp::new(runtime)?,
            base_url: base_url.trim_end_matches('/').to_string(),
            app_key: app_key.to_string(),
        })
    }

    fn modes_url(&self) -> String {
        format!("{}/Line/Meta/Modes?app_key={}", self.base_url, self.app_key)
    }

    fn status_url(&self, line: &str) -> String {
        format!("{}/Line/{}/Status?app_key={}", self.base_url, line, self.app_key)
    }

    fn arrivals_url(&self, line: &str, station_id: &str) -> String {
        format!(
            "{}/Line/{}/Arrivals/{}?direction=all&app_key={}",
            self.base_url, line, station_id, self.app_key
        )
    }
}

impl TransitApi for TflClient {
    fn test_connection(&mut self) -> Result<Probe, ApiError> {
        self.http.probe(&self.modes_url())
    }

    fn fetch_status(&mut self, line: &str) -> Result<String, ApiError> {
        let entries: Vec<LineStatusEntry> = self.http.get_json(&self.status_url(line))?;
        first_status(entries).ok_or_else(|| ApiError::Decode(format!("no status for {}", line)))
    }

    fn fetch_arrivals(
        &mut self,
        line: &str,
        station_id: &str,
    ) -> Result<Vec<RawArrival>, ApiError> {
        self.http.get_json(&self.arrivals_url(line, station_id))
    }
}

fn first_status(entries: Vec<LineStatusEntry>) -> Option<String> {
    entries
        .into_iter()
        .next()?
        .line_statuses
        .into_iter()
        .next()
        .map(|detail| detail.status_severity_description)
}
