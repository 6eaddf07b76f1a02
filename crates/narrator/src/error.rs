use thiserror::Error;

#[derive(Error, Debug)]
pub enum NarratorError {
    #[error("Narrative generation call failed: {0}")]
    Generation(#[from] api_client::error::ApiError),
}
