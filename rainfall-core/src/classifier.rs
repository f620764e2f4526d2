//! Pre-trained rain classifier loaded from a JSON artifact.
//!
//! The artifact carries the ordered feature names the classifier was trained
//! on next to the classifier itself:
//!
//! ```json
//! {
//!   "name": "rainfall-logreg",
//!   "feature_names": ["pressure", "dewpoint", "humidity"],
//!   "classifier": {
//!     "kind": "logistic",
//!     "coefficients": [-0.02, 0.1, 0.05],
//!     "intercept": 12.0
//!   }
//! }
//! ```
//!
//! Random forests use `"kind": "random_forest"` with `trees`, each a flat
//! array of split nodes (`feature`, `threshold`, `left`, `right`) and leaves
//! (`class`, 0 or 1). Node 0 is the root.

use serde::{Deserialize, Serialize};
use std::{collections::HashSet, fs, path::Path};

use crate::{error::RainError, features::FeatureVector, model::Prediction};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RainModel {
    #[serde(default)]
    pub name: Option<String>,
    pub feature_names: Vec<String>,
    pub classifier: Classifier,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Classifier {
    Logistic {
        coefficients: Vec<f64>,
        intercept: f64,
        #[serde(default = "default_threshold")]
        threshold: f64,
    },
    RandomForest {
        trees: Vec<DecisionTree>,
    },
}

fn default_threshold() -> f64 {
    0.5
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecisionTree {
    pub nodes: Vec<TreeNode>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TreeNode {
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    Leaf {
        class: u8,
    },
}

impl Classifier {
    pub fn kind(&self) -> &'static str {
        match self {
            Classifier::Logistic { .. } => "logistic",
            Classifier::RandomForest { .. } => "random_forest",
        }
    }

    fn classify(&self, x: &[f64]) -> u8 {
        match self {
            Classifier::Logistic { coefficients, intercept, threshold } => {
                let z = intercept + coefficients.iter().zip(x).map(|(w, v)| w * v).sum::<f64>();
                let p = 1.0 / (1.0 + (-z).exp());
                u8::from(p >= *threshold)
            }
            Classifier::RandomForest { trees } => {
                let rain_votes = trees.iter().filter(|t| t.classify(x) == 1).count();
                // Ties resolve to "no rain".
                u8::from(rain_votes * 2 > trees.len())
            }
        }
    }

    fn validate(&self, n_features: usize) -> Result<(), RainError> {
        match self {
            Classifier::Logistic { coefficients, intercept, threshold } => {
                if coefficients.len() != n_features {
                    return Err(RainError::InvalidModel(format!(
                        "logistic model has {} coefficients for {} features",
                        coefficients.len(),
                        n_features
                    )));
                }
                if !intercept.is_finite() || coefficients.iter().any(|c| !c.is_finite()) {
                    return Err(RainError::InvalidModel(
                        "logistic model contains non-finite weights".to_string(),
                    ));
                }
                if !(0.0..=1.0).contains(threshold) {
                    return Err(RainError::InvalidModel(format!(
                        "decision threshold {threshold} is outside 0..=1"
                    )));
                }
                Ok(())
            }
            Classifier::RandomForest { trees } => {
                if trees.is_empty() {
                    return Err(RainError::InvalidModel("random forest has no trees".to_string()));
                }
                for (i, tree) in trees.iter().enumerate() {
                    tree.validate(n_features)
                        .map_err(|msg| RainError::InvalidModel(format!("tree #{i}: {msg}")))?;
                }
                Ok(())
            }
        }
    }
}

impl DecisionTree {
    fn classify(&self, x: &[f64]) -> u8 {
        let mut idx = 0;
        loop {
            match &self.nodes[idx] {
                TreeNode::Leaf { class } => return *class,
                TreeNode::Split { feature, threshold, left, right } => {
                    idx = if x[*feature] <= *threshold { *left } else { *right };
                }
            }
        }
    }

    /// Checks indices and that every path from the root ends in a leaf, so
    /// that `classify` can index without bounds failures or cycles.
    fn validate(&self, n_features: usize) -> Result<(), String> {
        if self.nodes.is_empty() {
            return Err("tree has no nodes".to_string());
        }

        let mut seen = HashSet::new();
        let mut stack = vec![0usize];
        while let Some(idx) = stack.pop() {
            if !seen.insert(idx) {
                return Err(format!("node {idx} is reachable more than once"));
            }
            match self.nodes.get(idx) {
                None => return Err(format!("child index {idx} out of range")),
                Some(TreeNode::Leaf { class }) if *class > 1 => {
                    return Err(format!("leaf {idx} has class {class}, expected 0 or 1"));
                }
                Some(TreeNode::Leaf { .. }) => {}
                Some(TreeNode::Split { feature, threshold, left, right }) => {
                    if *feature >= n_features {
                        return Err(format!("node {idx} splits on unknown feature {feature}"));
                    }
                    if threshold.is_nan() {
                        return Err(format!("node {idx} has a NaN threshold"));
                    }
                    stack.push(*left);
                    stack.push(*right);
                }
            }
        }
        Ok(())
    }
}

impl RainModel {
    /// Read and validate a model artifact. Called once at startup.
    pub fn load(path: &Path) -> Result<Self, RainError> {
        let contents = fs::read_to_string(path).map_err(|source| RainError::ModelIo {
            path: path.to_path_buf(),
            source,
        })?;

        let model = Self::from_json(&contents)?;
        tracing::info!(
            path = %path.display(),
            kind = model.classifier.kind(),
            features = model.feature_names.len(),
            "Loaded rain model"
        );
        Ok(model)
    }

    pub fn from_json(json: &str) -> Result<Self, RainError> {
        let model: RainModel = serde_json::from_str(json)
            .map_err(|source| RainError::Decode { what: "model artifact", source })?;
        model.validate()?;
        Ok(model)
    }

    pub fn validate(&self) -> Result<(), RainError> {
        if self.feature_names.is_empty() {
            return Err(RainError::InvalidModel("feature list is empty".to_string()));
        }

        let mut seen = HashSet::new();
        if let Some(dup) = self.feature_names.iter().find(|n| !seen.insert(n.as_str())) {
            return Err(RainError::InvalidModel(format!("duplicate feature name '{dup}'")));
        }

        self.classifier.validate(self.feature_names.len())
    }

    pub fn feature_count(&self) -> usize {
        self.feature_names.len()
    }

    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("unnamed model")
    }

    /// Run the classifier once on a schema-checked vector.
    pub fn predict(&self, features: &FeatureVector) -> Result<Prediction, RainError> {
        features.check_schema(&self.feature_names)?;

        if let Some((name, _)) = features.iter().find(|(_, v)| !v.is_finite()) {
            return Err(RainError::SchemaMismatch(format!("feature '{name}' is not a finite number")));
        }

        let class = self.classifier.classify(features.values());
        Ok(Prediction::from_class(class))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::WeatherParam;

    const FEATURES: &str = r#"["pressure", "dewpoint", "humidity", "cloud", "sunshine",
        "winddirection", "windspeed", "maxtemp"]"#;

    fn logistic_model() -> RainModel {
        RainModel::from_json(&format!(
            r#"{{
                "name": "test-logreg",
                "feature_names": {FEATURES},
                "classifier": {{
                    "kind": "logistic",
                    "coefficients": [0.0, 0.0, 0.1, 0.05, 0.0, 0.0, 0.0, 0.0],
                    "intercept": -10.0
                }}
            }}"#
        ))
        .expect("valid model")
    }

    fn forest_model() -> RainModel {
        // Each tree votes rain when humidity (feature 2) is above its threshold.
        RainModel::from_json(&format!(
            r#"{{
                "feature_names": {FEATURES},
                "classifier": {{
                    "kind": "random_forest",
                    "trees": [
                        {{ "nodes": [
                            {{ "feature": 2, "threshold": 70.0, "left": 1, "right": 2 }},
                            {{ "class": 0 }},
                            {{ "class": 1 }}
                        ] }},
                        {{ "nodes": [
                            {{ "feature": 2, "threshold": 85.0, "left": 1, "right": 2 }},
                            {{ "class": 0 }},
                            {{ "class": 1 }}
                        ] }},
                        {{ "nodes": [
                            {{ "feature": 3, "threshold": 60.0, "left": 1, "right": 2 }},
                            {{ "class": 0 }},
                            {{ "class": 1 }}
                        ] }}
                    ]
                }}
            }}"#
        ))
        .expect("valid model")
    }

    fn vector(model: &RainModel, humidity: f64, cloud: f64) -> FeatureVector {
        let mut values = WeatherParam::fallback_vector();
        values[2] = humidity;
        values[3] = cloud;
        FeatureVector::assemble(&values, &model.feature_names).unwrap()
    }

    #[test]
    fn logistic_predicts_rain_for_humid_cloudy_day() {
        let model = logistic_model();
        assert_eq!(model.predict(&vector(&model, 95.0, 90.0)).unwrap(), Prediction::Rain);
        assert_eq!(model.predict(&vector(&model, 30.0, 10.0)).unwrap(), Prediction::NoRain);
    }

    #[test]
    fn prediction_is_deterministic() {
        let model = forest_model();
        let v = vector(&model, 90.0, 20.0);
        let first = model.predict(&v).unwrap();
        for _ in 0..10 {
            assert_eq!(model.predict(&v).unwrap(), first);
        }
    }

    #[test]
    fn forest_uses_majority_vote() {
        let model = forest_model();
        // 2 of 3 trees vote rain.
        assert_eq!(model.predict(&vector(&model, 90.0, 20.0)).unwrap(), Prediction::Rain);
        // 1 of 3 trees votes rain.
        assert_eq!(model.predict(&vector(&model, 75.0, 20.0)).unwrap(), Prediction::NoRain);
    }

    #[test]
    fn rejects_coefficient_count_mismatch() {
        let err = RainModel::from_json(
            r#"{ "feature_names": ["pressure", "dewpoint"],
                 "classifier": { "kind": "logistic", "coefficients": [1.0], "intercept": 0.0 } }"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("1 coefficients for 2 features"));
    }

    #[test]
    fn rejects_tree_with_bad_feature_index() {
        let err = RainModel::from_json(
            r#"{ "feature_names": ["pressure"],
                 "classifier": { "kind": "random_forest", "trees": [ { "nodes": [
                    { "feature": 4, "threshold": 1.0, "left": 1, "right": 2 },
                    { "class": 0 }, { "class": 1 } ] } ] } }"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("unknown feature 4"), "{err}");
    }

    #[test]
    fn rejects_cyclic_tree() {
        let err = RainModel::from_json(
            r#"{ "feature_names": ["pressure"],
                 "classifier": { "kind": "random_forest", "trees": [ { "nodes": [
                    { "feature": 0, "threshold": 1.0, "left": 0, "right": 1 },
                    { "class": 1 } ] } ] } }"#,
        )
        .unwrap_err();
        assert!(matches!(err, RainError::InvalidModel(_)));
    }

    #[test]
    fn rejects_duplicate_feature_names() {
        let err = RainModel::from_json(
            r#"{ "feature_names": ["pressure", "pressure"],
                 "classifier": { "kind": "logistic", "coefficients": [1.0, 1.0], "intercept": 0.0 } }"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("duplicate feature name"));
    }

    #[test]
    fn predict_fails_fast_on_schema_mismatch() {
        let model = logistic_model();
        let other = vec!["pressure".to_string(), "dewpoint".to_string()];
        let v = FeatureVector::assemble(&[1000.0, 10.0], &other).unwrap();

        let err = model.predict(&v).unwrap_err();
        assert!(matches!(err, RainError::SchemaMismatch(_)));
    }

    #[test]
    fn load_reports_missing_file() {
        let err = RainModel::load(Path::new("/definitely/not/here.json")).unwrap_err();
        assert!(matches!(err, RainError::ModelIo { .. }));
    }
}
