use thiserror::Error;
use tonic::metadata::errors::InvalidMetadataValue;

use crate::instance::Instance;

pub const CLASS_NAMES: [&str; 3] = ["setosa", "versicolor", "virginica"];

/// Class-membership scores returned for one instance. No invariant is
/// placed on their sum.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Prediction {
    pub scores: [f64; 3],
}

impl Prediction {
    pub fn new(setosa: f64, versicolor: f64, virginica: f64) -> Self {
        Self {
            scores: [setosa, versicolor, virginica],
        }
    }
}

#[derive(Error, Debug)]
pub enum PredictError {
    #[error("transport error: {0}")]
    Transport(#[from] tonic::transport::Error),

    #[error("invalid service url: {0}")]
    InvalidUri(#[from] tonic::codegen::http::uri::InvalidUri),

    #[error("invalid request metadata: {0}")]
    InvalidMetadata(#[from] InvalidMetadataValue),

    #[error("prediction call failed: {0}")]
    Status(#[from] tonic::Status),

    #[error("expected {expected} predictions, received {actual}")]
    CountMismatch { expected: usize, actual: usize },

    #[error("malformed prediction #{index}: {reason}")]
    MalformedPrediction { index: usize, reason: String },

    #[error("failed to load native root certificates: {0}")]
    Certificates(String),
}

/// A remote capability that scores instances against a deployed model.
///
/// Implementations are shared by reference across every in-flight request,
/// so `predict` takes `&self`.
#[tonic::async_trait]
pub trait PredictionService {
    /// Submits `instances` to the endpoint at `endpoint` and returns one
    /// prediction per instance, in submission order.
    async fn predict(
        &self,
        endpoint: &str,
        instances: &[Instance],
    ) -> Result<Vec<Prediction>, PredictError>;
}
