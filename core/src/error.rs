use thiserror::Error;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid proficiency level {level} for {context}: levels are 1-5")]
    InvalidLevel { context: String, level: i64 },

    #[error("Invalid interest rank {rank}: ranks are 1-based")]
    InvalidRank { rank: i64 },

    #[error("Invalid value {value} for {field}: must be within 0-100")]
    InvalidPercentage { field: &'static str, value: f64 },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type EngineResult<T> = Result<T, EngineError>;
