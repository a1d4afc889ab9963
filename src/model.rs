//! Stroke classifier collaborator.
//!
//! The rest of the crate only sees [`RiskModel`]: give it a [`FeatureRow`],
//! get back class probabilities with the positive class at index 1. The
//! shipped implementation is a standardized logistic regression read from a
//! JSON artifact once at startup.

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info};

use crate::features::{FeatureRow, FeatureValue};

/// Index of the positive class in the probability pair
pub const POSITIVE_CLASS: usize = 1;

pub trait RiskModel: Send + Sync {
    /// Class probabilities for one row, `[negative, positive]`
    fn predict_proba(&self, row: &FeatureRow) -> Result<[f64; 2]>;

    fn name(&self) -> &str;
}

/// Shared read-only model handle, created once at startup
pub type SharedModel = Arc<dyn RiskModel>;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NumericTerm {
    pub column: String,
    #[serde(default)]
    pub mean: f64,
    #[serde(default = "default_scale")]
    pub scale: f64,
    pub weight: f64,
}

fn default_scale() -> f64 {
    1.0
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoricalTerm {
    pub column: String,
    /// One-hot weight per category; categories not listed contribute nothing
    pub weights: HashMap<String, f64>,
}

/// Logistic regression over standardized numeric and one-hot categorical columns
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogisticModel {
    #[serde(default = "default_model_name")]
    pub name: String,
    pub intercept: f64,
    #[serde(default)]
    pub numeric: Vec<NumericTerm>,
    #[serde(default)]
    pub categorical: Vec<CategoricalTerm>,
}

fn default_model_name() -> String {
    "logistic".to_string()
}

impl LogisticModel {
    pub fn from_json(content: &str) -> Result<Self> {
        let model: LogisticModel =
            serde_json::from_str(content).context("Failed to parse model artifact")?;
        model.validate()?;
        Ok(model)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read model artifact {}", path.display()))?;
        let model = Self::from_json(&content)
            .with_context(|| format!("Invalid model artifact {}", path.display()))?;
        info!(
            "Loaded model '{}' ({} numeric, {} categorical terms)",
            model.name,
            model.numeric.len(),
            model.categorical.len()
        );
        Ok(model)
    }

    pub fn validate(&self) -> Result<()> {
        if !self.intercept.is_finite() {
            bail!("intercept must be finite");
        }
        for term in &self.numeric {
            if term.scale == 0.0 || !term.scale.is_finite() {
                bail!("numeric column '{}' has invalid scale {}", term.column, term.scale);
            }
            if !term.mean.is_finite() || !term.weight.is_finite() {
                bail!("numeric column '{}' has non-finite parameters", term.column);
            }
        }
        for term in &self.categorical {
            if let Some((category, _)) = term.weights.iter().find(|(_, w)| !w.is_finite()) {
                bail!(
                    "categorical column '{}' has non-finite weight for '{}'",
                    term.column,
                    category
                );
            }
        }
        Ok(())
    }

    /// Linear score before the sigmoid
    fn logit(&self, row: &FeatureRow) -> Result<f64> {
        let mut z = self.intercept;

        for term in &self.numeric {
            match row.get(&term.column) {
                Some(FeatureValue::Number(x)) => {
                    z += term.weight * (x - term.mean) / term.scale;
                }
                Some(FeatureValue::Category(c)) => {
                    bail!("column '{}' expected a number, got '{}'", term.column, c)
                }
                None => bail!("row is missing column '{}'", term.column),
            }
        }

        for term in &self.categorical {
            match row.get(&term.column) {
                Some(FeatureValue::Category(c)) => {
                    z += term.weights.get(c).copied().unwrap_or(0.0);
                }
                Some(FeatureValue::Number(x)) => {
                    bail!("column '{}' expected a category, got {}", term.column, x)
                }
                None => bail!("row is missing column '{}'", term.column),
            }
        }

        Ok(z)
    }
}

impl RiskModel for LogisticModel {
    fn predict_proba(&self, row: &FeatureRow) -> Result<[f64; 2]> {
        let z = self.logit(row)?;
        let p = sigmoid(z);
        debug!(logit = z, probability = p, "logistic score");
        Ok([1.0 - p, p])
    }

    fn name(&self) -> &str {
        &self.name
    }
}

fn sigmoid(z: f64) -> f64 {
    if z >= 0.0 {
        1.0 / (1.0 + (-z).exp())
    } else {
        let e = z.exp();
        e / (1.0 + e)
    }
}

/// Load the artifact at `path` into a shared handle
pub fn load_shared(path: impl AsRef<Path>) -> Result<SharedModel> {
    Ok(Arc::new(LogisticModel::load(path)?))
}
