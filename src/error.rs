use std::io;

use thiserror::Error;

use crate::allow::AllowError;

#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("invalid `{field}`: {source}")]
    InvalidConfig { field: String, source: AllowError },

    #[error("invalid option: {0}")]
    InvalidOption(String),

    #[error("no header labels found at depth {depth}")]
    EmptyHeader { depth: usize },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV read error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl ConvertError {
    pub(crate) fn invalid_config(field: impl Into<String>) -> impl FnOnce(AllowError) -> Self {
        let field = field.into();
        move |source| Self::InvalidConfig { field, source }
    }
}
