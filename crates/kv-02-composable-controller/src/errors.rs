//! Aggregator construction errors.

use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ComposeError {
    /// Two children report the same name.
    #[error("Duplicate controller name: {0}")]
    DuplicateName(String),

    #[error("Controller name cannot be empty")]
    EmptyName,
}
