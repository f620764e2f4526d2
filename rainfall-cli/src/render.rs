use rainfall_core::{DataSource, PredictionReport, RainError, RainModel, WeatherParam};

pub fn print_report(report: &PredictionReport) {
    let when = match report.effective_date() {
        Some(date) => date.to_string(),
        None => "recent days".to_string(),
    };

    println!(
        "Prediction for {} on {}: {} {}",
        report.location.display_name(),
        when,
        report.prediction.icon(),
        report.prediction.label()
    );

    if let DataSource::Fallback { reason } = &report.weather.source {
        println!("⚠️ Using default weather values ({reason}).");
    }

    println!();
    for line in weather_table(report) {
        println!("{line}");
    }
}

fn weather_table(report: &PredictionReport) -> Vec<String> {
    let source = match &report.weather.source {
        DataSource::Live { date } => format!("live, {date}"),
        DataSource::Fallback { .. } => "default".to_string(),
    };

    let mut lines = vec![format!("{:<22} {:>10}  {:<6} {}", "Parameter", "Value", "Unit", "Source")];
    lines.extend(report.weather.rows().map(|(param, value)| {
        format!("{:<22} {:>10.1}  {:<6} {}", param.label(), value, param.unit(), source)
    }));
    lines
}

pub fn print_model(model: &RainModel) {
    println!("{} ({})", model.display_name(), model.classifier.kind());
    println!("{} features:", model.feature_count());

    for line in model_rows(model) {
        println!("{line}");
    }
}

/// One line per model feature naming the weather parameter that feeds it.
fn model_rows(model: &RainModel) -> Vec<String> {
    model
        .feature_names
        .iter()
        .enumerate()
        .map(|(pos, name)| {
            let expected = WeatherParam::all().get(pos);
            let fed_by = match (expected, WeatherParam::try_from(name.as_str())) {
                (Some(param), Ok(found)) if found == *param => param.as_str().to_string(),
                (Some(param), Ok(found)) => {
                    format!("MISMATCH: '{name}' is {found}, position expects {param}")
                }
                (Some(param), Err(_)) => {
                    format!("MISMATCH: expected one of {}", param.aliases().join(", "))
                }
                (None, _) => "zero padding".to_string(),
            };
            format!("  {pos:>2}. {name:<20} <- {fed_by}")
        })
        .collect()
}

/// Domain failures get a short message; anything else gets the full chain.
pub fn print_error(err: &anyhow::Error) {
    match err.downcast_ref::<RainError>() {
        Some(rain) if rain.is_user_facing() => eprintln!("❌ {}", rain.user_message()),
        _ => {
            eprintln!("⚠️ Something went wrong. Please try again.");
            eprintln!("{err:?}");
        }
    }
}
