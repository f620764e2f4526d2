//! Core library for the `rainfall` predictor.
//!
//! This crate defines:
//! - Configuration handling
//! - Geocoding and weather sources (Open-Meteo) behind traits
//! - The date fallback used when weather data is incomplete
//! - Feature assembly and the pre-trained rain classifier
//!
//! It is used by `rainfall-cli`, but can also be reused by other binaries or services.

pub mod classifier;
pub mod config;
pub mod error;
pub mod features;
pub mod fetcher;
pub mod model;
pub mod pipeline;
pub mod provider;
pub mod schema;

pub use classifier::{Classifier, RainModel};
pub use config::Config;
pub use error::RainError;
pub use features::FeatureVector;
pub use fetcher::{FetchPlan, fetch_with_fallback};
pub use model::{
    DailyObservation, DataSource, Location, Prediction, PredictionReport, PredictionRequest,
    WeatherReport,
};
pub use pipeline::RainPipeline;
pub use provider::{Geocoder, WeatherSource};
pub use schema::WeatherParam;
