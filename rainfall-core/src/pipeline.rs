use chrono::NaiveDate;
use std::sync::Arc;

use crate::{
    Config,
    classifier::RainModel,
    error::RainError,
    features::FeatureVector,
    fetcher::{FetchPlan, fetch_with_fallback},
    model::{PredictionReport, PredictionRequest},
    provider::{Geocoder, WeatherSource, providers_from_config},
};

/// Geocode, fetch, classify. One request at a time, strictly in that order.
#[derive(Debug)]
pub struct RainPipeline {
    config: Config,
    geocoder: Box<dyn Geocoder>,
    weather: Box<dyn WeatherSource>,
    model: Arc<RainModel>,
}

impl RainPipeline {
    pub fn new(
        config: Config,
        geocoder: Box<dyn Geocoder>,
        weather: Box<dyn WeatherSource>,
        model: Arc<RainModel>,
    ) -> Self {
        Self { config, geocoder, weather, model }
    }

    /// Pipeline backed by the Open-Meteo services named in `config`.
    pub fn from_config(config: Config, model: Arc<RainModel>) -> Result<Self, RainError> {
        let (geocoder, weather) = providers_from_config(&config)?;
        Ok(Self::new(config, geocoder, weather, model))
    }

    pub fn model(&self) -> &RainModel {
        &self.model
    }

    pub async fn run(
        &self,
        request: &PredictionRequest,
        today: NaiveDate,
    ) -> Result<PredictionReport, RainError> {
        let city = self.config.city_or_default(&request.city).to_string();

        // Checked before any network call.
        let plan = FetchPlan::for_request(request.date, today, &self.config)?;

        let location = self.geocoder.locate(&city).await?;
        let weather = fetch_with_fallback(self.weather.as_ref(), &location, &plan).await;

        let features = FeatureVector::assemble(&weather.values, &self.model.feature_names)?;
        let prediction = self.model.predict(&features)?;

        tracing::info!(city = %city, prediction = prediction.label(), "Prediction complete");

        Ok(PredictionReport {
            city,
            location,
            requested_date: request.date,
            weather,
            features,
            prediction,
        })
    }
}
