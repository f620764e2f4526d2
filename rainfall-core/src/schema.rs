use std::{convert::TryFrom, fmt};

/// Upstream fill value for a measurement that is not available.
pub const MISSING_SENTINEL: f64 = -999.0;

/// Daily weather parameters fed to the classifier, in feature order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WeatherParam {
    Pressure,
    DewPoint,
    Humidity,
    CloudCover,
    Radiation,
    WindDirection,
    WindSpeed,
}

impl WeatherParam {
    /// Parameter order of the live part of the feature vector.
    pub const fn all() -> &'static [WeatherParam] {
        &[
            WeatherParam::Pressure,
            WeatherParam::DewPoint,
            WeatherParam::Humidity,
            WeatherParam::CloudCover,
            WeatherParam::Radiation,
            WeatherParam::WindDirection,
            WeatherParam::WindSpeed,
        ]
    }

    /// Name of the daily series in the Open-Meteo API.
    pub fn as_str(&self) -> &'static str {
        match self {
            WeatherParam::Pressure => "pressure_msl_mean",
            WeatherParam::DewPoint => "dew_point_2m_min",
            WeatherParam::Humidity => "relative_humidity_2m_max",
            WeatherParam::CloudCover => "cloud_cover_mean",
            WeatherParam::Radiation => "shortwave_radiation_sum",
            WeatherParam::WindDirection => "wind_direction_10m_dominant",
            WeatherParam::WindSpeed => "wind_speed_10m_max",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            WeatherParam::Pressure => "Pressure",
            WeatherParam::DewPoint => "Dew point (min)",
            WeatherParam::Humidity => "Humidity (max)",
            WeatherParam::CloudCover => "Cloud cover",
            WeatherParam::Radiation => "Shortwave radiation",
            WeatherParam::WindDirection => "Wind direction",
            WeatherParam::WindSpeed => "Wind speed (max)",
        }
    }

    pub fn unit(&self) -> &'static str {
        match self {
            WeatherParam::Pressure => "hPa",
            WeatherParam::DewPoint => "°C",
            WeatherParam::Humidity => "%",
            WeatherParam::CloudCover => "%",
            WeatherParam::Radiation => "MJ/m²",
            WeatherParam::WindDirection => "°",
            WeatherParam::WindSpeed => "km/h",
        }
    }

    /// Value used when no candidate date produced a complete record.
    pub fn fallback(&self) -> f64 {
        match self {
            WeatherParam::Pressure => 1013.0,
            WeatherParam::DewPoint => 20.0,
            WeatherParam::Humidity => 80.0,
            WeatherParam::CloudCover => 50.0,
            WeatherParam::Radiation => 15.0,
            WeatherParam::WindDirection => 180.0,
            WeatherParam::WindSpeed => 15.0,
        }
    }

    /// Model feature names this parameter may be trained under.
    pub fn aliases(&self) -> &'static [&'static str] {
        match self {
            WeatherParam::Pressure => &["pressure", "pressure_msl", "pressure_msl_mean"],
            WeatherParam::DewPoint => &["dewpoint", "dew_point", "dewpoint_2m_min", "dew_point_2m_min"],
            WeatherParam::Humidity => &["humidity", "relative_humidity_2m_max"],
            WeatherParam::CloudCover => &["cloud", "cloudcover", "cloud_cover", "cloud_cover_mean"],
            WeatherParam::Radiation => &["sunshine", "radiation", "shortwave_radiation_sum"],
            WeatherParam::WindDirection => {
                &["winddirection", "wind_direction", "winddirection_10m_dominant", "wind_direction_10m_dominant"]
            }
            WeatherParam::WindSpeed => {
                &["windspeed", "wind_speed", "windspeed_10m_max", "wind_speed_10m_max"]
            }
        }
    }

    pub fn matches_feature(&self, feature_name: &str) -> bool {
        let name = feature_name.trim();
        self.aliases().iter().any(|alias| alias.eq_ignore_ascii_case(name))
    }

    /// Fallback values for every parameter, in feature order.
    pub fn fallback_vector() -> Vec<f64> {
        Self::all().iter().map(WeatherParam::fallback).collect()
    }
}

impl fmt::Display for WeatherParam {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for WeatherParam {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        WeatherParam::all()
            .iter()
            .copied()
            .find(|p| p.as_str() == value || p.matches_feature(value))
            .ok_or_else(|| anyhow::anyhow!("Unknown weather parameter '{value}'."))
    }
}

/// A reading counts as present unless it is absent, NaN or the fill value.
pub fn is_present(value: Option<f64>) -> bool {
    match value {
        Some(v) => !v.is_nan() && v != MISSING_SENTINEL,
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn param_as_str_roundtrip() {
        for p in WeatherParam::all() {
            let parsed = WeatherParam::try_from(p.as_str()).expect("roundtrip should succeed");
            assert_eq!(*p, parsed);
        }
    }

    #[test]
    fn unknown_param_error() {
        let err = WeatherParam::try_from("snowfall_sum").unwrap_err();
        assert!(err.to_string().contains("Unknown weather parameter"));
    }

    #[test]
    fn aliases_match_case_insensitively() {
        assert!(WeatherParam::Pressure.matches_feature("Pressure"));
        assert!(WeatherParam::Radiation.matches_feature(" sunshine "));
        assert!(!WeatherParam::Humidity.matches_feature("cloud"));
    }

    #[test]
    fn fallback_vector_follows_param_order() {
        let v = WeatherParam::fallback_vector();
        assert_eq!(v.len(), WeatherParam::all().len());
        assert_eq!(v[0], 1013.0);
        assert_eq!(v[6], 15.0);
    }

    #[test]
    fn sentinel_and_null_are_missing() {
        assert!(is_present(Some(0.0)));
        assert!(!is_present(None));
        assert!(!is_present(Some(MISSING_SENTINEL)));
        assert!(!is_present(Some(f64::NAN)));
    }
}
