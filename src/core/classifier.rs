use crate::models::{FeatureVector, Level};
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

const FEATURE_COUNT: usize = 4;
const CLASS_COUNT: usize = 3;

/// Errors raised while loading a classifier artifact
#[derive(Debug, Error)]
pub enum ClassifierError {
    #[error("Failed to read model artifact: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to decode model artifact: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Invalid model artifact: {0}")]
    InvalidModel(String),
}

/// Difficulty classifier over repository features
///
/// Implementations must be pure: identical inputs give identical levels and
/// no shared state is mutated, so one instance serves all requests.
pub trait Classifier: Send + Sync {
    fn predict(&self, features: FeatureVector) -> Level;

    /// Held-out accuracy recorded for the model
    fn accuracy(&self) -> f64;
}

/// Serialized form of the pretrained model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelArtifact {
    pub classes: Vec<Level>,
    pub coefficients: Vec<Vec<f64>>,
    pub intercepts: Vec<f64>,
    #[serde(default)]
    pub accuracy: f64,
}

/// Multinomial logistic regression loaded from a JSON artifact
#[derive(Debug, Clone)]
pub struct LogisticClassifier {
    classes: [Level; CLASS_COUNT],
    coefficients: [[f64; FEATURE_COUNT]; CLASS_COUNT],
    intercepts: [f64; CLASS_COUNT],
    accuracy: f64,
}

impl LogisticClassifier {
    /// Load the model from disk
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ClassifierError> {
        let bytes = std::fs::read(path.as_ref())?;
        let artifact: ModelArtifact = serde_json::from_slice(&bytes)?;
        let classifier = Self::from_artifact(artifact)?;

        tracing::info!(
            "Loaded difficulty model from {} (accuracy: {:.2})",
            path.as_ref().display(),
            classifier.accuracy
        );

        Ok(classifier)
    }

    /// Build the model from an already decoded artifact, checking its shape
    pub fn from_artifact(artifact: ModelArtifact) -> Result<Self, ClassifierError> {
        let classes: [Level; CLASS_COUNT] = artifact.classes.try_into().map_err(|c: Vec<Level>| {
            ClassifierError::InvalidModel(format!("expected {} classes, found {}", CLASS_COUNT, c.len()))
        })?;

        if classes[0] == classes[1] || classes[1] == classes[2] || classes[0] == classes[2] {
            return Err(ClassifierError::InvalidModel("duplicate class labels".to_string()));
        }

        if artifact.coefficients.len() != CLASS_COUNT {
            return Err(ClassifierError::InvalidModel(format!(
                "expected {} coefficient rows, found {}",
                CLASS_COUNT,
                artifact.coefficients.len()
            )));
        }

        let mut coefficients = [[0.0; FEATURE_COUNT]; CLASS_COUNT];
        for (row, weights) in artifact.coefficients.iter().enumerate() {
            if weights.len() != FEATURE_COUNT {
                return Err(ClassifierError::InvalidModel(format!(
                    "coefficient row {} has {} weights, expected {}",
                    row,
                    weights.len(),
                    FEATURE_COUNT
                )));
            }
            coefficients[row].copy_from_slice(weights);
        }

        let intercepts: [f64; CLASS_COUNT] = artifact.intercepts.try_into().map_err(|i: Vec<f64>| {
            ClassifierError::InvalidModel(format!("expected {} intercepts, found {}", CLASS_COUNT, i.len()))
        })?;

        if !(0.0..=1.0).contains(&artifact.accuracy) {
            return Err(ClassifierError::InvalidModel(format!(
                "accuracy {} outside [0, 1]",
                artifact.accuracy
            )));
        }

        Ok(Self {
            classes,
            coefficients,
            intercepts,
            accuracy: artifact.accuracy,
        })
    }

    /// Linear decision score per class
    fn decision_scores(&self, features: &FeatureVector) -> [f64; CLASS_COUNT] {
        let x = features.as_array();
        let mut scores = self.intercepts;
        for (score, weights) in scores.iter_mut().zip(self.coefficients.iter()) {
            *score += weights.iter().zip(x.iter()).map(|(w, v)| w * v).sum::<f64>();
        }
        scores
    }
}

impl Classifier for LogisticClassifier {
    fn predict(&self, features: FeatureVector) -> Level {
        let scores = self.decision_scores(&features);

        // Ties go to the lower class index
        let mut best = 0;
        for k in 1..CLASS_COUNT {
            if scores[k] > scores[best] {
                best = k;
            }
        }

        self.classes[best]
    }

    fn accuracy(&self) -> f64 {
        self.accuracy
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shipped_artifact() -> ModelArtifact {
        serde_json::from_str(include_str!("../../models/difficulty_model.json"))
            .expect("shipped artifact must decode")
    }

    fn features(stars: u64, issues: u64, desc: u64, tags: u64) -> FeatureVector {
        FeatureVector {
            stars,
            open_issues: issues,
            description_length: desc,
            tag_count: tags,
        }
    }

    #[test]
    fn test_shipped_model_reproduces_training_labels() {
        let model = LogisticClassifier::from_artifact(shipped_artifact()).unwrap();

        assert_eq!(model.predict(features(120, 10, 200, 3)), Level::Intermediate);
        assert_eq!(model.predict(features(50, 2, 150, 2)), Level::Easy);
        assert_eq!(model.predict(features(900, 100, 400, 5)), Level::Advanced);
        assert_eq!(model.predict(features(20, 1, 80, 1)), Level::Easy);
        assert_eq!(model.predict(features(500, 40, 350, 4)), Level::Advanced);
        assert_eq!(model.predict(features(10, 1, 50, 1)), Level::Easy);
        assert_eq!(model.accuracy(), 0.75);
    }

    #[test]
    fn test_prediction_is_deterministic() {
        let model = LogisticClassifier::from_artifact(shipped_artifact()).unwrap();
        let x = features(300, 12, 90, 2);
        let first = model.predict(x);
        for _ in 0..10 {
            assert_eq!(model.predict(x), first);
        }
    }

    #[test]
    fn test_rejects_wrong_shape() {
        let mut artifact = shipped_artifact();
        artifact.coefficients[1].pop();
        assert!(matches!(
            LogisticClassifier::from_artifact(artifact),
            Err(ClassifierError::InvalidModel(_))
        ));

        let mut artifact = shipped_artifact();
        artifact.intercepts.push(0.0);
        assert!(LogisticClassifier::from_artifact(artifact).is_err());

        let mut artifact = shipped_artifact();
        artifact.classes = vec![Level::Easy, Level::Easy, Level::Advanced];
        assert!(LogisticClassifier::from_artifact(artifact).is_err());
    }

    #[test]
    fn test_load_missing_file_fails() {
        let result = LogisticClassifier::load("does/not/exist.json");
        assert!(matches!(result, Err(ClassifierError::Io(_))));
    }
}
