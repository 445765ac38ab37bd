//! Projection model v3.4.4 — a calibrated linear model over a fixed
//! 16-dim feature vector.
//!
//! Weights ship baked into the crate; a JSON weights file at the configured
//! path overrides them, which is how recalibrated versions roll out without
//! a redeploy (`ProjectionEngine::reload_weights`).

use fantasy_core::error::{FantasyError, FantasyResult};
use ndarray::{Array1, Array2};
use serde::Deserialize;
use std::path::Path;
use tracing::{info, warn};

/// Feature vector width. The layout is documented on
/// `ProjectionEngine::build_features`.
pub const FEATURE_DIM: usize = 16;

/// Version of the baked-in calibration.
const BUILTIN_VERSION: &str = "3.4.4";

/// On-disk weights file format.
#[derive(Debug, Deserialize)]
struct WeightsFile {
    version: String,
    weights: Vec<f32>,
    bias: f32,
}

/// A loaded projection model ready for inference.
pub struct ProjectionModel {
    weights: Array1<f32>,
    bias: f32,
    version: String,
}

impl ProjectionModel {
    /// Load a model from the given path, falling back to the baked-in
    /// v3.4.4 calibration when no weights file is present.
    pub fn load(weights_path: &str) -> FantasyResult<Self> {
        let path = Path::new(weights_path);

        if !path.exists() {
            warn!(
                path = weights_path,
                "Weights file not found, using baked-in calibration"
            );
            return Ok(Self::builtin());
        }

        let raw = std::fs::read_to_string(path)?;
        let file: WeightsFile = serde_json::from_str(&raw)
            .map_err(|e| FantasyError::WeightsLoad(format!("{weights_path}: {e}")))?;

        if file.weights.len() != FEATURE_DIM {
            return Err(FantasyError::WeightsLoad(format!(
                "expected {} weights, got {}",
                FEATURE_DIM,
                file.weights.len()
            )));
        }

        info!(path = weights_path, version = %file.version, "Projection weights loaded");

        Ok(Self {
            weights: Array1::from_vec(file.weights),
            bias: file.bias,
            version: file.version,
        })
    }

    /// The baked-in v3.4.4 calibration.
    ///
    /// Form weights sum to 1.0 so a perfectly flat history projects to its
    /// own average under neutral context; the context weights cancel against
    /// the bias at difficulty 0.5, venue 1.0, 7-day break.
    fn builtin() -> Self {
        let mut weights = vec![0.0f32; FEATURE_DIM];
        weights[0] = 0.45; // last-3 average
        weights[1] = 0.25; // last-5 average
        weights[2] = 0.20; // season average
        weights[3] = 0.10; // last score
        weights[4] = 0.30; // form delta (last-3 minus season)
        weights[5] = -0.05; // score volatility
        weights[6] = 0.0; // fit
        weights[7] = -6.0; // named to test
        weights[8] = -12.0; // omitted last week
        weights[9] = -14.0; // opponent difficulty
        weights[10] = 9.0; // venue factor
        weights[11] = 1.5; // days break / 7

        Self {
            weights: Array1::from_vec(weights),
            bias: -3.5,
            version: BUILTIN_VERSION.to_string(),
        }
    }

    /// Score a single feature vector.
    pub fn infer(&self, features: &Array1<f32>) -> f32 {
        self.weights.dot(features) + self.bias
    }

    /// Score a batch of feature vectors, one row each.
    pub fn infer_batch(&self, features: &Array2<f32>) -> Vec<f32> {
        features
            .dot(&self.weights)
            .iter()
            .map(|s| s + self.bias)
            .collect()
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn input_dim(&self) -> usize {
        FEATURE_DIM
    }
}
