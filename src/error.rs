use crate::scpi_connection::TransportError;
use std::time::Duration;

/// A response that could not be turned into the expected value.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProtocolError {
    #[error("Unknown {kind} token '{token}'")]
    UnknownToken { kind: &'static str, token: String },

    #[error("Expected a number but got '{value}'")]
    InvalidNumber { value: String },
}

#[derive(Debug, thiserror::Error)]
pub enum ScpiError {
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    #[error("Protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    #[error("Timed out after {waited:?} waiting for {operation}")]
    Timeout {
        operation: &'static str,
        waited: Duration,
    },

    #[error("Waveform sample {index} is {value}, expected a value within [0, 1]")]
    SampleOutOfRange { index: usize, value: f64 },
}

pub(crate) fn parse_number<T: std::str::FromStr>(response: &str) -> Result<T, ProtocolError> {
    let trimmed = response.trim();
    trimmed.parse().map_err(|_| ProtocolError::InvalidNumber {
        value: trimmed.to_string(),
    })
}
