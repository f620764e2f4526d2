//! Assembly of the classifier input from weather values.
//!
//! Values are matched to the model's feature list by position. Positions past
//! the weather parameters are padded with zeros.

use serde::Serialize;

use crate::{error::RainError, schema::WeatherParam};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureVector {
    names: Vec<String>,
    values: Vec<f64>,
    /// Number of leading positions carrying weather values.
    live: usize,
}

impl FeatureVector {
    /// Lay `values` (in [`WeatherParam::all`] order) over `feature_names`,
    /// zero-padding the tail.
    pub fn assemble(values: &[f64], feature_names: &[String]) -> Result<Self, RainError> {
        if values.len() > feature_names.len() {
            return Err(RainError::SchemaMismatch(format!(
                "{} weather values but the model only has {} features",
                values.len(),
                feature_names.len()
            )));
        }

        let mut padded = values.to_vec();
        padded.resize(feature_names.len(), 0.0);

        Ok(Self {
            names: feature_names.to_vec(),
            values: padded,
            live: values.len(),
        })
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn live_len(&self) -> usize {
        self.live
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> + '_ {
        self.names.iter().map(String::as_str).zip(self.values.iter().copied())
    }

    /// Verify the vector fits a model trained on `expected` features.
    ///
    /// Length and names must match exactly, and every position carrying a
    /// weather value must be a feature that parameter is known under.
    pub fn check_schema(&self, expected: &[String]) -> Result<(), RainError> {
        if self.values.len() != expected.len() {
            return Err(RainError::SchemaMismatch(format!(
                "expected {} features, got {}",
                expected.len(),
                self.values.len()
            )));
        }

        if let Some(pos) = self.names.iter().zip(expected).position(|(a, b)| a != b) {
            return Err(RainError::SchemaMismatch(format!(
                "feature #{pos} is '{}' but the model expects '{}'",
                self.names[pos], expected[pos]
            )));
        }

        for (pos, param) in WeatherParam::all().iter().take(self.live).enumerate() {
            let name = &expected[pos];
            if !param.matches_feature(name) {
                return Err(RainError::SchemaMismatch(format!(
                    "feature #{pos} '{name}' cannot be fed from weather parameter '{param}' \
                     (accepted names: {})",
                    param.aliases().join(", ")
                )));
            }
        }

        Ok(())
    }
}
