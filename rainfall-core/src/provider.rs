use async_trait::async_trait;
use chrono::NaiveDate;
use std::fmt::Debug;

use crate::{
    Config,
    error::RainError,
    model::{DailyObservation, Location},
    provider::openmeteo::{OpenMeteoGeocoder, OpenMeteoWeather},
    schema::WeatherParam,
};

pub mod openmeteo;

/// Resolves a place name to coordinates.
#[async_trait]
pub trait Geocoder: Send + Sync + Debug {
    /// First match for `name`, or [`RainError::CityNotFound`].
    async fn locate(&self, name: &str) -> Result<Location, RainError>;
}

/// Daily weather values for a location.
#[async_trait]
pub trait WeatherSource: Send + Sync + Debug {
    /// Values for `date`, one per entry of `params`. Values the upstream
    /// does not have are `None`.
    async fn daily(
        &self,
        location: &Location,
        date: NaiveDate,
        params: &[WeatherParam],
    ) -> Result<DailyObservation, RainError>;
}

/// Construct the Open-Meteo geocoder and weather source from config.
pub fn providers_from_config(
    config: &Config,
) -> Result<(Box<dyn Geocoder>, Box<dyn WeatherSource>), RainError> {
    let client = reqwest::Client::builder()
        .timeout(config.request_timeout())
        .user_agent(concat!("rainfall/", env!("CARGO_PKG_VERSION")))
        .build()?;

    let geocoder = OpenMeteoGeocoder::with_client(client.clone(), &config.geocoding_url);
    let weather = OpenMeteoWeather::with_client(client, &config.forecast_url);

    Ok((Box::new(geocoder), Box::new(weather)))
}
