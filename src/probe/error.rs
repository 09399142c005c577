use thiserror::Error;

/// Exit code for device open/configure failures
pub const EXIT_DEVICE_FAILURE: i32 = 1;

/// Exit code for rejected command-line configuration
pub const EXIT_CONFIG_FAILURE: i32 = 2;

#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("Failed to open serial device {path}: {source}")]
    Open {
        path: String,
        #[source]
        source: serialport::Error,
    },

    #[error("Failed to configure serial device ({setting}): {source}")]
    Configure {
        setting: &'static str,
        #[source]
        source: serialport::Error,
    },

    #[error("Failed to send frame: {0}")]
    Send(#[source] std::io::Error),

    #[error("Short write: sent {written} of {expected} bytes")]
    ShortWrite { expected: usize, written: usize },

    #[error("Failed to read reply: {0}")]
    Receive(#[source] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Output error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Measurement error: {0}")]
    Measurement(String),
}

impl ProbeError {
    /// Errors that abort one probe cycle but leave the loop running
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            ProbeError::Send(_) | ProbeError::ShortWrite { .. } | ProbeError::Receive(_)
        )
    }

    /// Process exit code for errors that end the program
    pub fn exit_code(&self) -> i32 {
        match self {
            ProbeError::Config(_) => EXIT_CONFIG_FAILURE,
            _ => EXIT_DEVICE_FAILURE,
        }
    }
}

pub type Result<T> = std::result::Result<T, ProbeError>;
