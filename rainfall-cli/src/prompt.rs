//! Interactive terminal form.

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use inquire::{Confirm, DateSelect, Text};
use rainfall_core::{Config, PredictionRequest};
use std::path::PathBuf;

/// Ask for a city and, optionally, a date. A blank city means the default.
pub fn prediction_form(config: &Config, date: Option<NaiveDate>) -> Result<PredictionRequest> {
    println!("🌦️ Will It Rain On My Parade?");
    println!("Enter a city and date to predict rainfall using live weather data.\n");

    let city = Text::new("🌍 City name:")
        .with_default(&config.default_city)
        .prompt()
        .context("City prompt was cancelled")?;

    let date = match date {
        Some(date) => Some(date),
        None => {
            let pick = Confirm::new("📅 Pick a date? (otherwise recent days are used)")
                .with_default(false)
                .prompt()
                .context("Date prompt was cancelled")?;

            if pick {
                let today = Local::now().date_naive();
                let date = DateSelect::new("📅 Date:")
                    .with_starting_date(today)
                    .prompt()
                    .context("Date prompt was cancelled")?;
                Some(date)
            } else {
                None
            }
        }
    };

    Ok(PredictionRequest { city, date })
}

pub fn configure(mut config: Config) -> Result<Config> {
    let city = Text::new("Default city:")
        .with_default(&config.default_city)
        .prompt()
        .context("Configuration was cancelled")?;
    config.default_city = config.city_or_default(&city).to_string();

    let current = config.resolve_model_path(None)?;
    let model = Text::new("Model file:")
        .with_default(&current.display().to_string())
        .prompt()
        .context("Configuration was cancelled")?;
    let model = model.trim();
    if !model.is_empty() {
        config.model_path = Some(PathBuf::from(model));
    }

    config.validate()?;
    Ok(config)
}
