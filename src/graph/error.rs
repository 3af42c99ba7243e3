use thiserror::Error;

#[derive(Debug, Error)]
pub enum GraphError {
    #[error("graph record {index} is malformed: {reason}")]
    MalformedInput { index: usize, reason: &'static str },
    #[error("graph input is not a JSON array of records")]
    Json(#[from] serde_json::Error),
}
