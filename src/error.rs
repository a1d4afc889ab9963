//! Domain-specific error types for stroke-risk

use thiserror::Error;

/// Main error type for the stroke-risk service
#[derive(Error, Debug)]
pub enum StrokeRiskError {
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Model error: {message}")]
    Model { message: String },

    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Prediction error: {message}")]
    Prediction { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl From<toml::de::Error> for StrokeRiskError {
    fn from(err: toml::de::Error) -> Self {
        StrokeRiskError::Config {
            message: err.to_string(),
        }
    }
}

impl From<crate::features::FeatureError> for StrokeRiskError {
    fn from(err: crate::features::FeatureError) -> Self {
        StrokeRiskError::Validation {
            message: err.to_string(),
        }
    }
}

impl From<crate::risk::PredictionError> for StrokeRiskError {
    fn from(err: crate::risk::PredictionError) -> Self {
        match err {
            crate::risk::PredictionError::InvalidInput(e) => e.into(),
            other => StrokeRiskError::Prediction {
                message: other.to_string(),
            },
        }
    }
}

/// Result type alias for stroke-risk operations
pub type Result<T> = std::result::Result<T, StrokeRiskError>;
