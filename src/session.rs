use crate::analog::Analog;
use crate::controller::ScpiController;
use crate::digital::Digital;
use crate::error::ScpiError;
use crate::tokens::{Direction, State};

/// Pin-level shortcuts for scripts that only touch the slow I/O.
#[derive(Debug, Clone, Copy)]
pub struct ScpiSession<'a> {
    digital: Digital<'a>,
    analog: Analog<'a>,
}

impl<'a> ScpiSession<'a> {
    pub fn new(controller: &'a ScpiController) -> Self {
        Self {
            digital: controller.digital(),
            analog: controller.analog(),
        }
    }

    pub fn set_digital_direction(&self, pin: &str, direction: Direction) -> Result<(), ScpiError> {
        self.digital.set_direction(pin, direction)
    }

    pub fn set_digital_output_state(&self, pin: &str, state: State) -> Result<(), ScpiError> {
        self.digital.set_state(pin, state)
    }

    pub fn get_digital_state(&self, pin: &str) -> Result<State, ScpiError> {
        self.digital.get_state(pin)
    }

    pub fn get_analog_input(&self, pin: &str) -> Result<f64, ScpiError> {
        self.analog.get_analog_input(pin)
    }

    pub fn set_analog_output(&self, pin: &str, value: f64) -> Result<(), ScpiError> {
        self.analog.set_analog_output(pin, value)
    }
}
