pub mod advice;
pub mod config;
pub mod deserializers;
pub mod error;
pub mod features;
pub mod form;
pub mod http;
pub mod locale;
pub mod model;
pub mod report;
pub mod risk;

use anyhow::Context;

use crate::config::Config;
use crate::error::{Result, StrokeRiskError};
use crate::risk::RiskEvaluator;

/// Load the model artifact named in `config` and wrap it in an evaluator.
///
/// Called once at startup; the returned evaluator shares the model read-only.
pub fn build_evaluator(config: &Config) -> Result<RiskEvaluator> {
    let model = model::load_shared(&config.system.model_path)
        .with_context(|| {
            format!(
                "Failed to load model from {}",
                config.system.model_path.display()
            )
        })
        .map_err(|e| StrokeRiskError::Model {
            message: format!("{e:#}"),
        })?;
    Ok(RiskEvaluator::new(model))
}
