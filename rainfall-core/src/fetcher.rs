//! Weather retrieval with date fallback.
//!
//! Candidate dates are tried in order and the first one with a complete set
//! of parameters wins. When every candidate fails, the fixed fallback values
//! are used instead and the report says so.

use chrono::{Days, NaiveDate};

use crate::{
    Config,
    error::RainError,
    model::{DataSource, Location, WeatherReport},
    provider::WeatherSource,
    schema::{WeatherParam, is_present},
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchPlan {
    candidates: Vec<NaiveDate>,
}

impl FetchPlan {
    /// A requested date is tried alone; without one, the configured offsets
    /// before `today` are tried in order.
    pub fn for_request(
        requested: Option<NaiveDate>,
        today: NaiveDate,
        config: &Config,
    ) -> Result<Self, RainError> {
        match requested {
            Some(date) => {
                // Out of chrono's range means unbounded on that side.
                let earliest = today
                    .checked_sub_days(Days::new(u64::from(config.past_days_limit)))
                    .unwrap_or(NaiveDate::MIN);
                let latest = today
                    .checked_add_days(Days::new(u64::from(config.forecast_days_limit)))
                    .unwrap_or(NaiveDate::MAX);
                if date < earliest || date > latest {
                    return Err(RainError::NoForecast { date, earliest, latest });
                }
                Ok(Self { candidates: vec![date] })
            }
            None => Ok(Self::days_before(today, &config.fallback_offsets_days)),
        }
    }

    pub fn days_before(today: NaiveDate, offsets: &[u32]) -> Self {
        let candidates = offsets
            .iter()
            .filter_map(|d| today.checked_sub_days(Days::new(u64::from(*d))))
            .collect();
        Self { candidates }
    }

    pub fn candidates(&self) -> &[NaiveDate] {
        &self.candidates
    }
}

/// Try each candidate date in order. Never fails: exhaustion yields the
/// fallback report.
pub async fn fetch_with_fallback(
    source: &dyn WeatherSource,
    location: &Location,
    plan: &FetchPlan,
) -> WeatherReport {
    let params = WeatherParam::all();

    for &date in plan.candidates() {
        match source.daily(location, date, params).await {
            Ok(obs) => match complete_values(&obs.values, params.len()) {
                Some(values) => {
                    tracing::info!(%date, "Using live weather values");
                    return WeatherReport { values, source: DataSource::Live { date } };
                }
                None => {
                    let missing = missing_params(&obs.values);
                    tracing::debug!(%date, ?missing, "Incomplete weather data, trying next date");
                }
            },
            Err(err) => {
                tracing::debug!(%date, error = %err, "Weather request failed, trying next date");
            }
        }
    }

    let tried = plan
        .candidates()
        .iter()
        .map(NaiveDate::to_string)
        .collect::<Vec<_>>()
        .join(", ");
    let reason = format!("no complete weather data for {tried}");
    tracing::warn!("{reason}; using fallback values");
    WeatherReport::fallback(reason)
}

fn complete_values(values: &[Option<f64>], expected: usize) -> Option<Vec<f64>> {
    if values.len() != expected || !values.iter().all(|v| is_present(*v)) {
        return None;
    }
    values.iter().copied().collect()
}

fn missing_params(values: &[Option<f64>]) -> Vec<&'static str> {
    WeatherParam::all()
        .iter()
        .enumerate()
        .filter(|(i, _)| !is_present(values.get(*i).copied().flatten()))
        .map(|(_, p)| p.as_str())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn no_date_tries_two_three_four_days_back() {
        let plan = FetchPlan::for_request(None, day(2026, 3, 10), &Config::default()).unwrap();
        assert_eq!(plan.candidates(), &[day(2026, 3, 8), day(2026, 3, 7), day(2026, 3, 6)]);
    }

    #[test]
    fn requested_date_is_the_only_candidate() {
        let plan =
            FetchPlan::for_request(Some(day(2026, 3, 12)), day(2026, 3, 10), &Config::default())
                .unwrap();
        assert_eq!(plan.candidates(), &[day(2026, 3, 12)]);
    }

    #[test]
    fn date_beyond_forecast_window_is_rejected() {
        let err =
            FetchPlan::for_request(Some(day(2026, 6, 1)), day(2026, 3, 10), &Config::default())
                .unwrap_err();
        assert!(matches!(err, RainError::NoForecast { .. }));
        assert!(err.is_user_facing());
    }

    #[test]
    fn huge_window_limits_do_not_overflow() {
        let cfg = Config {
            past_days_limit: u32::MAX,
            forecast_days_limit: u32::MAX,
            ..Config::default()
        };
        let today = day(2026, 3, 10);

        let plan = FetchPlan::for_request(Some(today), today, &cfg).unwrap();
        assert_eq!(plan.candidates(), &[today]);

        let plan = FetchPlan::for_request(Some(day(1990, 1, 1)), today, &cfg).unwrap();
        assert_eq!(plan.candidates(), &[day(1990, 1, 1)]);
    }

    #[test]
    fn complete_values_requires_every_param() {
        assert_eq!(complete_values(&[Some(1.0), Some(2.0)], 2), Some(vec![1.0, 2.0]));
        assert_eq!(complete_values(&[Some(1.0), None], 2), None);
        assert_eq!(complete_values(&[Some(1.0), Some(-999.0)], 2), None);
        assert_eq!(complete_values(&[Some(1.0)], 2), None);
    }

    #[test]
    fn missing_params_names_the_gaps() {
        let mut values = vec![Some(1.0); WeatherParam::all().len()];
        values[3] = None;
        assert_eq!(missing_params(&values), vec!["cloud_cover_mean"]);
    }
}
