use thiserror::Error;

/// Failures a collection run can hit.
///
/// Everything except [`CollectorError::Write`] aborts the run; write failures
/// are reported through [`crate::WriteOutcome::Failed`] instead.
#[derive(Debug, Error)]
pub enum CollectorError {
    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("failed to set up InfluxDB client: {0}")]
    Connection(String),

    #[error("command execution failed: {0}")]
    Command(String),

    #[error("error parsing node data: {0}")]
    Parse(String),

    #[error("failed to write to InfluxDB: {0}")]
    Write(String),
}

impl CollectorError {
    /// Process exit status for this failure.
    pub fn exit_code(&self) -> u8 {
        match self {
            CollectorError::Write(_) => 0,
            _ => 1,
        }
    }
}

impl From<serde_json::Error> for CollectorError {
    fn from(e: serde_json::Error) -> Self {
        CollectorError::Parse(e.to_string())
    }
}
