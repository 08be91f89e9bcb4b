use crate::controller::ScpiController;
use crate::error::ScpiError;
use crate::tokens::Waveform;

/// Two-channel arbitrary waveform generator.
#[derive(Debug, Clone, Copy)]
pub struct Generator<'a> {
    controller: &'a ScpiController,
}

impl<'a> Generator<'a> {
    pub fn new(controller: &'a ScpiController) -> Self {
        Self { controller }
    }

    pub fn reset(&self) -> Result<(), ScpiError> {
        self.controller.command("GEN:RST")
    }

    pub fn set_waveform(&self, channel: u8, waveform: Waveform) -> Result<(), ScpiError> {
        self.controller
            .command(&format!("SOUR{}:FUNC {}", channel, waveform.as_str()))
    }

    pub fn set_frequency(&self, channel: u8, hz: u32) -> Result<(), ScpiError> {
        self.controller
            .command(&format!("SOUR{}:FREQ:FIX {}", channel, hz))
    }

    /// Peak amplitude in volts.
    pub fn set_amplitude(&self, channel: u8, volts: f64) -> Result<(), ScpiError> {
        self.controller
            .command(&format!("SOUR{}:VOLT {}", channel, volts))
    }

    pub fn enable_output(&self, channel: u8) -> Result<(), ScpiError> {
        self.controller
            .command(&format!("OUTPUT{}:STATE ON", channel))
    }

    pub fn disable_output(&self, channel: u8) -> Result<(), ScpiError> {
        self.controller
            .command(&format!("OUTPUT{}:STATE OFF", channel))
    }

    pub fn enable_burst(&self, channel: u8) -> Result<(), ScpiError> {
        self.controller
            .command(&format!("SOUR{}:BURS:STAT ON", channel))
    }

    pub fn disable_burst(&self, channel: u8) -> Result<(), ScpiError> {
        self.controller
            .command(&format!("SOUR{}:BURS:STAT OFF", channel))
    }

    /// Waveform periods emitted per burst.
    pub fn set_burst_count(&self, channel: u8, count: u32) -> Result<(), ScpiError> {
        self.controller
            .command(&format!("SOUR{}:BURS:NCYC {}", channel, count))
    }

    /// Number of bursts emitted per trigger.
    pub fn set_burst_repetitions(&self, channel: u8, repetitions: u32) -> Result<(), ScpiError> {
        self.controller
            .command(&format!("SOUR{}:BURS:NOR {}", channel, repetitions))
    }

    /// Time between the start of consecutive bursts, in microseconds.
    pub fn set_burst_period(&self, channel: u8, period_us: u32) -> Result<(), ScpiError> {
        self.controller
            .command(&format!("SOUR{}:BURS:INT:PER {}", channel, period_us))
    }

    pub fn trigger_immediately(&self, channel: u8) -> Result<(), ScpiError> {
        self.controller
            .command(&format!("SOUR{}:TRIG:IMM", channel))
    }

    /// Upload the shape played by [`Waveform::Arbitrary`].
    ///
    /// Samples are normalized to `[0, 1]` and sent with two decimals, which is
    /// the resolution the instrument parses. Nothing is sent if any sample is
    /// out of range.
    pub fn set_arbitrary_waveform_data(&self, channel: u8, samples: &[f64]) -> Result<(), ScpiError> {
        self.controller.command(&format!(
            "SOUR{}:TRAC:DATA:DATA {}",
            channel,
            format_samples(samples)?
        ))
    }
}

fn format_samples(samples: &[f64]) -> Result<String, ScpiError> {
    let mut text = String::with_capacity(samples.len() * 5);
    for (index, &value) in samples.iter().enumerate() {
        if !(0.0..=1.0).contains(&value) {
            return Err(ScpiError::SampleOutOfRange { index, value });
        }
        if index > 0 {
            text.push(',');
        }
        text.push_str(&format!("{:.2}", value));
    }
    Ok(text)
}
