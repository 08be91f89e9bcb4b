use crate::analog::Analog;
use crate::byte_link::ByteLink;
use crate::digital::Digital;
use crate::error::ScpiError;
use crate::generator::Generator;
use crate::oscilloscope::{Oscilloscope, ScopeConfig};
use crate::scpi_connection::ScpiConnection;
use crate::session::ScpiSession;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Exclusive owner of an open [`ScpiConnection`].
///
/// The connection is opened on construction and closed when the controller
/// is dropped (or explicitly through [`ScpiController::close`]). Facades
/// borrow the controller, so any number of them can coexist while the lock
/// keeps each request/response pair intact.
#[derive(Debug)]
pub struct ScpiController {
    connection: Mutex<ScpiConnection>,
    closed: bool,
}

impl ScpiController {
    pub fn open(link: impl ByteLink + 'static) -> Result<Self, ScpiError> {
        let mut connection = ScpiConnection::new(link);
        connection.open()?;
        log::debug!("SCPI connection open");

        Ok(Self {
            connection: Mutex::new(connection),
            closed: false,
        })
    }

    fn connection(&self) -> MutexGuard<'_, ScpiConnection> {
        self.connection.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Send a command that has no response.
    pub fn command(&self, text: &str) -> Result<(), ScpiError> {
        self.connection().write(text)?;
        Ok(())
    }

    /// Send a query and wait for its response line.
    pub fn query(&self, text: &str) -> Result<String, ScpiError> {
        let mut connection = self.connection();
        connection.write(text)?;
        Ok(connection.read()?)
    }

    pub fn digital(&self) -> Digital<'_> {
        Digital::new(self)
    }

    pub fn analog(&self) -> Analog<'_> {
        Analog::new(self)
    }

    pub fn generator(&self) -> Generator<'_> {
        Generator::new(self)
    }

    pub fn oscilloscope(&self) -> Oscilloscope<'_> {
        Oscilloscope::new(self)
    }

    pub fn oscilloscope_with_config(&self, config: ScopeConfig) -> Oscilloscope<'_> {
        Oscilloscope::with_config(self, config)
    }

    pub fn session(&self) -> ScpiSession<'_> {
        ScpiSession::new(self)
    }

    pub fn close(mut self) -> Result<(), ScpiError> {
        self.closed = true;
        log::debug!("Closing SCPI connection");
        self.connection
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner)
            .close()?;
        Ok(())
    }
}

impl Drop for ScpiController {
    fn drop(&mut self) {
        if self.closed {
            return;
        }
        log::debug!("Closing SCPI connection");
        let connection = self
            .connection
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner);
        if let Err(e) = connection.close() {
            log::warn!("Failed to close SCPI connection: {}", e);
        }
    }
}
