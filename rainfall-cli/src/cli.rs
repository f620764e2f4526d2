use anyhow::Context;
use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use rainfall_core::{Config, PredictionRequest, RainModel, RainPipeline};
use std::{path::PathBuf, sync::Arc};

use crate::{prompt, render};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "rainfall", version, about = "Will it rain on my parade?")]
pub struct Cli {
    /// Log what the predictor is doing (overridden by RUST_LOG).
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Predict whether it will rain in a city.
    Predict {
        /// City name; prompts for city and date when absent.
        city: Option<String>,

        /// Date to predict for (YYYY-MM-DD). Without it, recent days are used.
        #[arg(long, value_parser = parse_date)]
        date: Option<NaiveDate>,

        /// Model artifact to load instead of the configured one.
        #[arg(long)]
        model: Option<PathBuf>,

        /// Print the full report as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Interactively set the default city and model path.
    Configure,

    /// Show the features the model expects and where their values come from.
    Model {
        #[arg(long)]
        model: Option<PathBuf>,
    },
}

fn parse_date(s: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map_err(|e| format!("expected a date like 2026-10-18: {e}"))
}

fn load_model(config: &Config, override_path: Option<&PathBuf>) -> anyhow::Result<Arc<RainModel>> {
    let path = config.resolve_model_path(override_path.map(PathBuf::as_path))?;
    tracing::debug!(path = %path.display(), "Loading rain model");
    let model = RainModel::load(&path).with_context(|| {
        format!(
            "Could not load the rain model from {}.\n\
             Hint: pass --model <file> or run `rainfall configure`.",
            path.display()
        )
    })?;
    Ok(Arc::new(model))
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        let config = Config::load()?;

        match self.command {
            Command::Predict { city, date, model, json } => {
                // The model is loaded once, before the form is shown.
                let model = load_model(&config, model.as_ref())?;

                let request = match city {
                    Some(city) => PredictionRequest { city, date },
                    None => prompt::prediction_form(&config, date)?,
                };

                let pipeline = RainPipeline::from_config(config, model)?;
                let today = Local::now().date_naive();
                let report = pipeline.run(&request, today).await?;

                if json {
                    println!("{}", serde_json::to_string_pretty(&report)?);
                } else {
                    render::print_report(&report);
                }
            }
            Command::Configure => {
                let updated = prompt::configure(config)?;
                updated.save()?;
                let path = Config::config_file_path()?;
                tracing::info!(path = %path.display(), "Configuration saved");
                println!("Saved configuration to {}", path.display());
            }
            Command::Model { model } => {
                let model = load_model(&config, model.as_ref())?;
                render::print_model(&model);
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_predict_with_date() {
        let cli = Cli::try_parse_from(["rainfall", "predict", "Pune", "--date", "2026-10-20"])
            .expect("valid args");

        match cli.command {
            Command::Predict { city, date, json, .. } => {
                assert_eq!(city.as_deref(), Some("Pune"));
                assert_eq!(date, NaiveDate::from_ymd_opt(2026, 10, 20));
                assert!(!json);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn rejects_malformed_date() {
        let err = Cli::try_parse_from(["rainfall", "predict", "Pune", "--date", "20/10/2026"])
            .unwrap_err();
        assert!(err.to_string().contains("expected a date"));
    }

    #[test]
    fn verbose_is_global() {
        let cli = Cli::try_parse_from(["rainfall", "model", "-v"]).expect("valid args");
        assert!(cli.verbose);
    }
}
