//! OpenWeather current-conditions client (`/data/2.5/weather`, metric units).

use super::{ApiError, BlockingHttp, Probe, WeatherApi, WeatherReport};
use serde::Deserialize;
use tokio::runtime::Handle;

pub const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org";

/// Description shown when the payload has no usable condition text.
pub const MISSING_DESCRIPTION: &str = "Error";

#[derive(Debug, Default, Deserialize)]
struct CurrentWeather {
    #[serde(default)]
    weather: Vec<Condition>,
    main: Option<MainBlock>,
}

#[derive(Debug, Deserialize)]
struct Condition {
    description: String,
}

#[derive(Debug, Deserialize)]
struct MainBlock {
    temp: Option<f64>,
}

impl From<CurrentWeather> for WeatherReport {
    fn from(current: CurrentWeather) -> Self {
        WeatherReport {
            description: current
                .weather
                .into_iter()
                .next()
                .map(|c| c.description)
                .unwrap_or_else(|| MISSING_DESCRIPTION.to_string()),
            temperature_celsius: current.main.and_then(|m| m.temp).unwrap_or(f64::NAN),
        }
    }
}

pub struct OpenWeatherClient {
    http: BlockingHttp,
    url: String,
}

impl OpenWeatherClient {
    pub fn new(
        runtime: Handle,
        base_url: &str,
        api_key: &str,
        lat: f64,
        lon: f64,
    ) -> Result<Self, ApiError> {
        let url = format!(
            "{}/data/2.5/weather?lat={}&lon={}&appid={}&units=metric",
            base_url.trim_end_matches('/'),
            lat,
            lon,
            api_key
        );
        Ok(Self {
            http: BlockingHttp::new(runtime)?,
            url,
        })
    }
}

impl WeatherApi for OpenWeatherClient {
    fn test_connection(&mut self) -> Result<Probe, ApiError> {
        self.http.probe(&self.url)
    }

    fn fetch(&mut self) -> Result<WeatherReport, ApiError> {
        let current: CurrentWeather = self.http.get_json(&self.url)?;
        Ok(current.into())
    }
}
