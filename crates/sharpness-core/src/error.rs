//! Error types for analysis operations

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("Engine unavailable: {0}")]
    EngineUnavailable(String),

    #[error("Engine error: {0}")]
    Engine(String),

    #[error("Invalid FEN: {0}")]
    InvalidFen(String),
}
