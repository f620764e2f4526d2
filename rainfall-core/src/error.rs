//! Errors produced while answering a prediction request.

use chrono::NaiveDate;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RainError {
    #[error("City not found: {0}")]
    CityNotFound(String),

    #[error("No forecast available for {date} (allowed range: {earliest} .. {latest})")]
    NoForecast {
        date: NaiveDate,
        earliest: NaiveDate,
        latest: NaiveDate,
    },

    #[error("Upstream request to {endpoint} failed with status {status}: {body}")]
    Upstream {
        endpoint: &'static str,
        status: u16,
        body: String,
    },

    #[error("Network error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Failed to decode {what}: {source}")]
    Decode {
        what: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to read model file '{}'", .path.display())]
    ModelIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid model artifact: {0}")]
    InvalidModel(String),

    #[error("Feature vector does not match the model schema: {0}")]
    SchemaMismatch(String),
}

impl RainError {
    /// Expected domain failures that are shown to the user as a short message
    /// rather than a diagnostic dump.
    pub fn is_user_facing(&self) -> bool {
        matches!(self, Self::CityNotFound(_) | Self::NoForecast { .. })
    }

    pub fn user_message(&self) -> String {
        match self {
            Self::CityNotFound(city) => format!("City not found: {city}."),
            Self::NoForecast { date, .. } => format!("No forecast available for {date}."),
            Self::Upstream { endpoint, status, .. } => {
                format!("The {endpoint} service answered with status {status}.")
            }
            Self::Http(_) => "Network error. Check your connection.".to_string(),
            Self::Decode { what, .. } => format!("Unexpected {what} response."),
            Self::ModelIo { path, .. } => format!("Could not read model file {}.", path.display()),
            Self::InvalidModel(msg) => format!("The model file is invalid: {msg}"),
            Self::SchemaMismatch(msg) => format!("The model does not accept this input: {msg}"),
        }
    }
}

pub(crate) fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn domain_failures_are_user_facing() {
        assert!(RainError::CityNotFound("Testville".into()).is_user_facing());

        let day = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap();
        let err = RainError::NoForecast { date: day, earliest: day, latest: day };
        assert!(err.is_user_facing());
        assert!(err.user_message().contains("2026-01-01"));

        assert!(!RainError::SchemaMismatch("x".into()).is_user_facing());
        assert!(!RainError::InvalidModel("x".into()).is_user_facing());
    }

    #[test]
    fn city_not_found_message_names_the_city() {
        let err = RainError::CityNotFound("Testville".into());
        assert!(err.user_message().contains("Testville"));
        assert!(err.to_string().contains("City not found"));
    }

    #[test]
    fn truncate_body_keeps_short_bodies() {
        assert_eq!(truncate_body("oops"), "oops");

        let long = "x".repeat(500);
        let cut = truncate_body(&long);
        assert!(cut.ends_with("..."));
        assert_eq!(cut.len(), 203);
    }
}
