use thiserror::Error;

use crate::storage::StoreError;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("select a form type before submitting")]
    NoCategorySelected,
    #[error("no record {index} in {category}")]
    RecordNotFound { category: String, index: usize },
    #[error("failed to persist records")]
    Storage(#[from] StoreError),
}
