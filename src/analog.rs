use crate::controller::ScpiController;
use crate::error::{parse_number, ScpiError};

/// Slow analog inputs (`AIN0`..`AIN3`) and outputs (`AOUT0`..`AOUT3`), in volts.
#[derive(Debug, Clone, Copy)]
pub struct Analog<'a> {
    controller: &'a ScpiController,
}

impl<'a> Analog<'a> {
    pub fn new(controller: &'a ScpiController) -> Self {
        Self { controller }
    }

    pub fn get_analog_input(&self, pin: &str) -> Result<f64, ScpiError> {
        let response = self.controller.query(&format!("ANALOG:PIN? {}", pin))?;
        Ok(parse_number(&response)?)
    }

    pub fn set_analog_output(&self, pin: &str, value: f64) -> Result<(), ScpiError> {
        self.controller
            .command(&format!("ANALOG:PIN {},{}", pin, value))
    }
}
