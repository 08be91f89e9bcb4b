use crate::controller::ScpiController;
use crate::error::ScpiError;
use crate::tokens::{Direction, State};

/// Digital I/O pins (`LED0`..`LED7`, `DIO0_P`, `DIO5_N`, ...).
#[derive(Debug, Clone, Copy)]
pub struct Digital<'a> {
    controller: &'a ScpiController,
}

impl<'a> Digital<'a> {
    pub fn new(controller: &'a ScpiController) -> Self {
        Self { controller }
    }

    pub fn set_state(&self, pin: &str, state: State) -> Result<(), ScpiError> {
        self.controller
            .command(&format!("DIG:PIN {},{}", pin, state.as_str()))
    }

    pub fn set_direction(&self, pin: &str, direction: Direction) -> Result<(), ScpiError> {
        self.controller
            .command(&format!("DIG:PIN:DIR {},{}", direction.as_str(), pin))
    }

    pub fn get_state(&self, pin: &str) -> Result<State, ScpiError> {
        let response = self.controller.query(&format!("DIG:PIN? {}", pin))?;
        Ok(response.parse()?)
    }
}
