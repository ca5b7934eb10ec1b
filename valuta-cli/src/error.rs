use thiserror::Error;
use valuta::ValutaError;

/// CLI-level error categories mapped to exit codes.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("invalid configuration: {0}")]
    Config(String),

    #[error(transparent)]
    Run(#[from] ValutaError),
}

impl CliError {
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::Config(_) | Self::Run(ValutaError::InvalidArg(_)) => 2,
            Self::Run(ValutaError::NoData { .. }) => 3,
            Self::Run(ValutaError::Fetch { .. } | ValutaError::Parse { .. }) => 4,
            Self::Run(ValutaError::Cancelled | ValutaError::DeadlineExceeded { .. }) => 5,
            Self::Run(ValutaError::Task(_) | ValutaError::Report(_)) => 1,
        }
    }
}
