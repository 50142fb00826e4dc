use thiserror::Error;

/// Failures the classification core can produce.
///
/// `Configuration` and `Transport` are systemic and halt the batch.
/// `MalformedResponse` is row-local: [`Classifier`](crate::classifier::Classifier)
/// turns it into the sentinel result and moves on.
#[derive(Debug, Error)]
pub enum ClassifyError {
    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("model endpoint error: {0}")]
    Transport(String),

    #[error("malformed model response: {0}")]
    MalformedResponse(String),

    #[error("prompt template error: {0}")]
    Template(String),
}

impl From<reqwest::Error> for ClassifyError {
    fn from(err: reqwest::Error) -> Self {
        ClassifyError::Transport(err.to_string())
    }
}
