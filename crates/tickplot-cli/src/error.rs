use thiserror::Error;
use tickplot_core::ChartError;

/// CLI-level error categories mapped to exit codes.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Chart(#[from] ChartError),

    #[error("invalid listen address '{value}': {source}")]
    ListenAddr {
        value: String,
        source: std::net::AddrParseError,
    },

    #[error(transparent)]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CliError {
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::ListenAddr { .. } => 2,
            Self::Chart(error) if error.is_validation() => 2,
            Self::Chart(ChartError::Io(_)) => 10,
            Self::Chart(_) => 3,
            Self::Serialization(_) => 4,
            Self::Io(_) => 10,
        }
    }
}
