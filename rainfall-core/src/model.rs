use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{features::FeatureVector, schema::WeatherParam};

#[derive(Debug, Clone)]
pub struct PredictionRequest {
    pub city: String,
    pub date: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub name: String,
    pub country: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
}

impl Location {
    pub fn display_name(&self) -> String {
        match &self.country {
            Some(country) if !country.is_empty() => format!("{}, {}", self.name, country),
            _ => self.name.clone(),
        }
    }
}

/// Raw daily values for one date, aligned with the requested parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct DailyObservation {
    pub date: NaiveDate,
    pub values: Vec<Option<f64>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DataSource {
    Live { date: NaiveDate },
    Fallback { reason: String },
}

impl DataSource {
    pub fn is_fallback(&self) -> bool {
        matches!(self, DataSource::Fallback { .. })
    }
}

/// Weather values selected for prediction, one per [`WeatherParam::all`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherReport {
    pub values: Vec<f64>,
    pub source: DataSource,
}

impl WeatherReport {
    pub fn fallback(reason: impl Into<String>) -> Self {
        Self {
            values: WeatherParam::fallback_vector(),
            source: DataSource::Fallback { reason: reason.into() },
        }
    }

    pub fn rows(&self) -> impl Iterator<Item = (WeatherParam, f64)> + '_ {
        WeatherParam::all().iter().copied().zip(self.values.iter().copied())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Prediction {
    Rain,
    NoRain,
}

impl Prediction {
    pub fn from_class(class: u8) -> Self {
        if class == 1 { Prediction::Rain } else { Prediction::NoRain }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Prediction::Rain => "Rainfall",
            Prediction::NoRain => "No Rainfall",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            Prediction::Rain => "🌧️",
            Prediction::NoRain => "☀️",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PredictionReport {
    pub city: String,
    pub location: Location,
    pub requested_date: Option<NaiveDate>,
    pub weather: WeatherReport,
    pub features: FeatureVector,
    pub prediction: Prediction,
}

impl PredictionReport {
    /// Date the prediction refers to: the requested one, or the date the
    /// live values were taken from.
    pub fn effective_date(&self) -> Option<NaiveDate> {
        self.requested_date.or(match &self.weather.source {
            DataSource::Live { date } => Some(*date),
            DataSource::Fallback { .. } => None,
        })
    }
}
