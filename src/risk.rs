//! Risk evaluation: model probability to percentage to tier

use serde::Serialize;
use thiserror::Error;
use tracing::debug;

use crate::features::FeatureRecord;
use crate::locale::Locale;
use crate::model::{POSITIVE_CLASS, SharedModel};

/// Percentage at which Moderate starts
pub const MODERATE_THRESHOLD: f64 = 20.0;
/// Percentage at which High starts
pub const HIGH_THRESHOLD: f64 = 50.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskTier {
    Low,
    Moderate,
    High,
}

impl RiskTier {
    /// Half-open buckets: `[0, 20)`, `[20, 50)`, `[50, 100]`
    pub fn from_percentage(percentage: f64) -> Self {
        if percentage < MODERATE_THRESHOLD {
            RiskTier::Low
        } else if percentage < HIGH_THRESHOLD {
            RiskTier::Moderate
        } else {
            RiskTier::High
        }
    }

    /// CSS color of the heading
    pub fn color(&self) -> &'static str {
        match self {
            RiskTier::Low => "green",
            RiskTier::Moderate => "orange",
            RiskTier::High => "red",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            RiskTier::Low => "🟢",
            RiskTier::Moderate => "🟠",
            RiskTier::High => "🔴",
        }
    }

    pub fn label(&self, locale: Locale) -> &'static str {
        match self {
            RiskTier::Low => locale.pick("Faible", "Low"),
            RiskTier::Moderate => locale.pick("Modéré", "Moderate"),
            RiskTier::High => locale.pick("Élevé", "High"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RiskAssessment {
    /// Positive-class probability scaled to 0..=100
    pub percentage: f64,
    pub tier: RiskTier,
}

impl RiskAssessment {
    pub fn from_probability(probability: f64) -> Result<Self, PredictionError> {
        if !probability.is_finite() || !(0.0..=1.0).contains(&probability) {
            return Err(PredictionError::InvalidProbability(probability));
        }
        let percentage = probability * 100.0;
        Ok(Self {
            percentage,
            tier: RiskTier::from_percentage(percentage),
        })
    }
}

/// Anything that stops a submission from producing a risk figure.
///
/// The user only ever sees [`PredictionError::user_message`]; the variant and
/// its detail go to the log.
#[derive(Debug, Error)]
pub enum PredictionError {
    #[error("invalid input: {0}")]
    InvalidInput(#[from] crate::features::FeatureError),

    #[error("model invocation failed: {0:#}")]
    Model(anyhow::Error),

    #[error("model returned out-of-range probability {0}")]
    InvalidProbability(f64),
}

impl PredictionError {
    pub fn user_message(locale: Locale) -> &'static str {
        locale.pick(
            "Une erreur est survenue lors de la prédiction. Veuillez vérifier vos entrées et réessayer.",
            "An error occurred during prediction. Please check your inputs and try again.",
        )
    }
}

/// Wraps the shared model; cheap to clone
#[derive(Clone)]
pub struct RiskEvaluator {
    model: SharedModel,
}

impl RiskEvaluator {
    pub fn new(model: SharedModel) -> Self {
        Self { model }
    }

    pub fn model_name(&self) -> &str {
        self.model.name()
    }

    pub fn evaluate(&self, record: &FeatureRecord) -> Result<RiskAssessment, PredictionError> {
        let row = record.to_row();
        let probabilities = self
            .model
            .predict_proba(&row)
            .map_err(PredictionError::Model)?;
        let assessment = RiskAssessment::from_probability(probabilities[POSITIVE_CLASS])?;
        debug!(
            percentage = assessment.percentage,
            tier = ?assessment.tier,
            "risk evaluated"
        );
        Ok(assessment)
    }
}
