//! Error types for page-rank estimation.

use thiserror::Error;

/// Result type alias using [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// Empty corpus, or two pages sharing a name.
    #[error("invalid graph: {0}")]
    InvalidGraph(String),

    /// Damping factor, sample count, threshold or page out of range.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("no convergence after {iterations} iterations")]
    NotConverged { iterations: usize },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Regex error: {0}")]
    Regex(#[from] regex::Error),
}

pub(crate) fn check_damping(damping: f64) -> Result<()> {
    if (0.0..=1.0).contains(&damping) {
        Ok(())
    } else {
        Err(Error::InvalidParameter(format!("damping={damping}")))
    }
}
