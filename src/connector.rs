use crate::byte_link::{SerialLink, TcpAddress, TcpLink, DEFAULT_SCPI_PORT};
use crate::controller::ScpiController;
use crate::error::ScpiError;
use std::time::Duration;

/// Opens controllers over the links this crate ships.
pub struct ScpiConnector;

impl ScpiConnector {
    /// Connect to the SCPI server at `host`, on port 5000 unless told otherwise.
    pub fn connect(
        host: &str,
        port: Option<u16>,
        timeout: Option<Duration>,
    ) -> Result<ScpiController, ScpiError> {
        let address = TcpAddress::new(host, port.unwrap_or(DEFAULT_SCPI_PORT));
        log::debug!("Connecting to SCPI server at {}:{}", address.host, address.port);
        ScpiController::open(TcpLink::new(address, timeout))
    }

    pub fn connect_serial(
        path: &str,
        baud_rate: u32,
        timeout: Duration,
    ) -> Result<ScpiController, ScpiError> {
        log::debug!("Connecting to SCPI console on {}", path);
        ScpiController::open(SerialLink::new(path, baud_rate, timeout))
    }
}
