use thiserror::Error;

#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("malformed schema document: {0}")]
    Json(#[from] serde_json::Error),
    #[error("end_group called with no open group")]
    UnbalancedGroup,
    #[error("a grid needs between 2 and 4 column headers, got {0}")]
    HeaderCount(usize),
}
