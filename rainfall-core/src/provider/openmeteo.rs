use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::Client;
use serde::Deserialize;
use std::collections::HashMap;

use crate::{
    config::{DEFAULT_FORECAST_URL, DEFAULT_GEOCODING_URL},
    error::{RainError, truncate_body},
    model::{DailyObservation, Location},
    schema::WeatherParam,
};

use super::{Geocoder, WeatherSource};

#[derive(Debug, Clone)]
pub struct OpenMeteoGeocoder {
    http: Client,
    url: String,
}

impl OpenMeteoGeocoder {
    pub fn new() -> Self {
        Self::with_client(Client::new(), DEFAULT_GEOCODING_URL)
    }

    pub fn with_client(http: Client, url: &str) -> Self {
        Self { http, url: url.to_string() }
    }
}

impl Default for OpenMeteoGeocoder {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone)]
pub struct OpenMeteoWeather {
    http: Client,
    url: String,
}

impl OpenMeteoWeather {
    pub fn new() -> Self {
        Self::with_client(Client::new(), DEFAULT_FORECAST_URL)
    }

    pub fn with_client(http: Client, url: &str) -> Self {
        Self { http, url: url.to_string() }
    }
}

impl Default for OpenMeteoWeather {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Deserialize)]
struct GeoResponse {
    #[serde(default)]
    results: Option<Vec<GeoResult>>,
}

#[derive(Debug, Deserialize)]
struct GeoResult {
    name: String,
    latitude: f64,
    longitude: f64,
    #[serde(default)]
    country: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ForecastResponse {
    daily: Option<DailySeries>,
}

#[derive(Debug, Deserialize)]
struct DailySeries {
    time: Vec<String>,
    #[serde(flatten)]
    series: HashMap<String, Vec<Option<f64>>>,
}

async fn read_body(
    res: reqwest::Response,
    endpoint: &'static str,
) -> Result<String, RainError> {
    let status = res.status();
    let body = res.text().await?;

    if !status.is_success() {
        return Err(RainError::Upstream {
            endpoint,
            status: status.as_u16(),
            body: truncate_body(&body),
        });
    }

    Ok(body)
}

#[async_trait]
impl Geocoder for OpenMeteoGeocoder {
    async fn locate(&self, name: &str) -> Result<Location, RainError> {
        tracing::debug!(url = %self.url, name, "Geocoding city");

        let res = self
            .http
            .get(&self.url)
            .query(&[("name", name), ("count", "1"), ("language", "en"), ("format", "json")])
            .send()
            .await?;

        let body = read_body(res, "geocoding").await?;
        let parsed: GeoResponse = serde_json::from_str(&body)
            .map_err(|source| RainError::Decode { what: "geocoding", source })?;

        let first = parsed
            .results
            .and_then(|results| results.into_iter().next())
            .ok_or_else(|| RainError::CityNotFound(name.to_string()))?;

        let location = Location {
            name: first.name,
            country: first.country,
            latitude: first.latitude,
            longitude: first.longitude,
        };

        tracing::info!(
            "Resolved {name} to {} ({:.4}, {:.4})",
            location.display_name(),
            location.latitude,
            location.longitude
        );
        Ok(location)
    }
}

#[async_trait]
impl WeatherSource for OpenMeteoWeather {
    async fn daily(
        &self,
        location: &Location,
        date: NaiveDate,
        params: &[WeatherParam],
    ) -> Result<DailyObservation, RainError> {
        let daily = params.iter().map(WeatherParam::as_str).collect::<Vec<_>>().join(",");
        let day = date.format("%Y-%m-%d").to_string();

        tracing::debug!(url = %self.url, %date, daily = %daily, "Requesting daily weather");

        let res = self
            .http
            .get(&self.url)
            .query(&[
                ("latitude", location.latitude.to_string()),
                ("longitude", location.longitude.to_string()),
                ("daily", daily),
                ("timezone", "auto".to_string()),
                ("start_date", day.clone()),
                ("end_date", day.clone()),
            ])
            .send()
            .await?;

        let body = read_body(res, "forecast").await?;
        let parsed: ForecastResponse = serde_json::from_str(&body)
            .map_err(|source| RainError::Decode { what: "forecast", source })?;

        let values = match parsed.daily {
            Some(series) => match series.time.iter().position(|t| *t == day) {
                Some(idx) => params
                    .iter()
                    .map(|p| series.series.get(p.as_str()).and_then(|s| s.get(idx).copied().flatten()))
                    .collect(),
                None => {
                    tracing::debug!(%date, "Forecast response does not cover the date");
                    vec![None; params.len()]
                }
            },
            None => vec![None; params.len()],
        };

        Ok(DailyObservation { date, values })
    }
}
