//! The demo model shipped in `models/` must load and accept the live schema.

use rainfall_core::{FeatureVector, Prediction, RainModel, WeatherParam};
use std::path::Path;

fn demo_model() -> RainModel {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("../models/rainfall_model.json");
    RainModel::load(&path).expect("demo model should load")
}

#[test]
fn demo_model_accepts_fallback_vector() {
    let model = demo_model();
    let v = FeatureVector::assemble(&WeatherParam::fallback_vector(), &model.feature_names).unwrap();

    assert_eq!(v.len(), model.feature_count());
    assert_eq!(model.predict(&v).unwrap(), Prediction::Rain);
}

#[test]
fn demo_model_predicts_dry_day() {
    let model = demo_model();
    let dry = [1015.0, 5.0, 40.0, 10.0, 25.0, 90.0, 10.0];
    let v = FeatureVector::assemble(&dry, &model.feature_names).unwrap();

    assert_eq!(model.predict(&v).unwrap(), Prediction::NoRain);
}

#[test]
fn model_loads_from_temp_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("model.json");
    std::fs::write(
        &path,
        r#"{ "feature_names": ["pressure"],
             "classifier": { "kind": "random_forest", "trees": [ { "nodes": [ { "class": 1 } ] } ] } }"#,
    )
    .unwrap();

    let model = RainModel::load(&path).unwrap();
    let v = FeatureVector::assemble(&[1000.0], &model.feature_names).unwrap();
    assert_eq!(model.predict(&v).unwrap(), Prediction::Rain);
    assert_eq!(model.display_name(), "unnamed model");
}
