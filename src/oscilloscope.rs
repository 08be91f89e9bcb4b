use crate::acquisition::{Acquisition, Trigger};
use crate::controller::ScpiController;
use crate::error::{parse_number, ProtocolError, ScpiError};
use crate::tokens::{trigger_event_token, Edge, TriggerSource, TriggerState};
use std::thread;
use std::time::{Duration, Instant};

/// Timing constants of the acquisition engine.
#[derive(Debug, Clone, PartialEq)]
pub struct ScopeConfig {
    /// ADC sample clock before decimation, in Hz.
    pub base_sampling_rate: f64,
    /// Samples held by the acquisition buffer.
    pub buffer_size: u32,
    /// Pause between two status polls.
    pub poll_interval: Duration,
    /// Longest wait for a decimation change to be read back.
    pub decimation_timeout: Duration,
    /// Longest wait for an armed trigger to fire.
    pub trigger_timeout: Duration,
}

impl ScopeConfig {
    pub const BASE_SAMPLING_RATE: f64 = 125_000_000.0;
    pub const BUFFER_SIZE: u32 = 16_384;

    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    pub fn with_decimation_timeout(mut self, timeout: Duration) -> Self {
        self.decimation_timeout = timeout;
        self
    }

    pub fn with_trigger_timeout(mut self, timeout: Duration) -> Self {
        self.trigger_timeout = timeout;
        self
    }

    /// Time for the buffer to refill completely at the given decimation.
    pub fn settle_time(&self, decimation: u32) -> Duration {
        let seconds =
            f64::from(self.buffer_size) / self.base_sampling_rate * f64::from(decimation);
        Duration::try_from_secs_f64(seconds).unwrap_or(Duration::ZERO)
    }
}

impl Default for ScopeConfig {
    fn default() -> Self {
        Self {
            base_sampling_rate: Self::BASE_SAMPLING_RATE,
            buffer_size: Self::BUFFER_SIZE,
            poll_interval: Duration::from_millis(1),
            decimation_timeout: Duration::from_secs(1),
            trigger_timeout: Duration::from_secs(10),
        }
    }
}

/// Two-channel fast acquisition.
///
/// A capture runs `start` → arm (`trigger_immediately` or
/// `set_trigger_event`) → `get_acquisition`. The instrument never confirms
/// arming; the only feedback is the trigger state turning back to
/// [`TriggerState::Disabled`] once the capture is complete.
#[derive(Debug, Clone)]
pub struct Oscilloscope<'a> {
    controller: &'a ScpiController,
    config: ScopeConfig,
}

impl<'a> Oscilloscope<'a> {
    pub fn new(controller: &'a ScpiController) -> Self {
        Self::with_config(controller, ScopeConfig::default())
    }

    pub fn with_config(controller: &'a ScpiController, config: ScopeConfig) -> Self {
        Self { controller, config }
    }

    pub fn config(&self) -> &ScopeConfig {
        &self.config
    }

    /// Start acquiring and wait until the buffer holds data taken at the
    /// current decimation.
    #[tracing::instrument(level = "debug", skip(self))]
    pub fn start(&self) -> Result<(), ScpiError> {
        self.controller.command("ACQ:START")?;
        let decimation = self.get_decimation_factor()?;
        let settle = self.config.settle_time(decimation);
        log::debug!("Acquisition started, settling for {:?} at decimation {}", settle, decimation);
        thread::sleep(settle);
        Ok(())
    }

    pub fn stop(&self) -> Result<(), ScpiError> {
        self.controller.command("ACQ:STOP")
    }

    pub fn reset(&self) -> Result<(), ScpiError> {
        self.controller.command("ACQ:RST")
    }

    /// Set the decimation factor and wait until the instrument reports it back.
    #[tracing::instrument(level = "debug", skip(self))]
    pub fn set_decimation_factor(&self, factor: u32) -> Result<(), ScpiError> {
        self.controller.command(&format!("ACQ:DEC {}", factor))?;
        self.poll_until("decimation factor", self.config.decimation_timeout, || {
            Ok((self.get_decimation_factor()? == factor).then_some(()))
        })?;
        log::debug!("Decimation factor settled at {}", factor);
        Ok(())
    }

    pub fn get_decimation_factor(&self) -> Result<u32, ScpiError> {
        let response = self.controller.query("ACQ:DEC?")?;
        Ok(parse_number(&response)?)
    }

    pub fn enable_averaging(&self) -> Result<(), ScpiError> {
        self.controller.command("ACQ:AVG ON")
    }

    pub fn disable_averaging(&self) -> Result<(), ScpiError> {
        self.controller.command("ACQ:AVG OFF")
    }

    pub fn disable_trigger(&self) -> Result<(), ScpiError> {
        self.controller.command("ACQ:TRIG DISABLED")
    }

    pub fn trigger_immediately(&self) -> Result<(), ScpiError> {
        self.controller.command("ACQ:TRIG NOW")
    }

    pub fn set_trigger_event(&self, source: TriggerSource, edge: Edge) -> Result<(), ScpiError> {
        self.controller
            .command(&format!("ACQ:TRIG {}", trigger_event_token(source, edge)))
    }

    pub fn set_trigger_level(&self, millivolts: i32) -> Result<(), ScpiError> {
        self.controller
            .command(&format!("ACQ:TRIG:LEV {}", millivolts))
    }

    /// Trigger position relative to the buffer centre, in samples.
    pub fn set_trigger_delay(&self, samples: i64) -> Result<(), ScpiError> {
        self.controller
            .command(&format!("ACQ:TRIG:DLY {}", samples))
    }

    pub fn set_trigger_delay_ns(&self, nanoseconds: i64) -> Result<(), ScpiError> {
        self.controller
            .command(&format!("ACQ:TRIG:DLY:NS {}", nanoseconds))
    }

    pub fn get_trigger_state(&self) -> Result<TriggerState, ScpiError> {
        let response = self.controller.query("ACQ:TRIG:STAT?")?;
        Ok(response.parse()?)
    }

    /// Arm the trigger.
    pub fn arm(&self, trigger: Trigger) -> Result<(), ScpiError> {
        match trigger {
            Trigger::Immediate => self.trigger_immediately(),
            Trigger::Event { source, edge } => self.set_trigger_event(source, edge),
        }
    }

    /// Raw voltages currently held for `channel`.
    pub fn get_data(&self, channel: u8) -> Result<Vec<f64>, ScpiError> {
        let response = self
            .controller
            .query(&format!("ACQ:SOUR{}:DATA?", channel))?;
        Ok(parse_data(&response)?)
    }

    /// Wait for the armed trigger to fire, then read the capture of `channel`.
    #[tracing::instrument(level = "debug", skip(self))]
    pub fn get_acquisition(&self, channel: u8) -> Result<Acquisition, ScpiError> {
        self.poll_until("trigger", self.config.trigger_timeout, || {
            Ok((self.get_trigger_state()? == TriggerState::Disabled).then_some(()))
        })?;
        log::debug!("Trigger fired, reading channel {}", channel);

        let voltages = self.get_data(channel)?;
        let decimation = self.get_decimation_factor()?;
        Ok(Acquisition::from_samples(
            voltages,
            self.config.base_sampling_rate,
            decimation,
        ))
    }

    /// Run a whole capture: start, arm, wait, read.
    #[tracing::instrument(level = "debug", skip(self))]
    pub fn acquire(&self, channel: u8, trigger: Trigger) -> Result<Acquisition, ScpiError> {
        self.start()?;
        self.arm(trigger)?;
        self.get_acquisition(channel)
    }

    /// Call `probe` until it yields a value, sleeping `poll_interval` between attempts.
    fn poll_until<T>(
        &self,
        operation: &'static str,
        timeout: Duration,
        mut probe: impl FnMut() -> Result<Option<T>, ScpiError>,
    ) -> Result<T, ScpiError> {
        let started = Instant::now();
        loop {
            if let Some(value) = probe()? {
                return Ok(value);
            }

            let waited = started.elapsed();
            if waited >= timeout {
                log::debug!("Gave up waiting for {} after {:?}", operation, waited);
                return Err(ScpiError::Timeout { operation, waited });
            }
            thread::sleep(self.config.poll_interval);
        }
    }
}

/// Parse a `{v0,v1,...}` sample list.
fn parse_data(response: &str) -> Result<Vec<f64>, ProtocolError> {
    let trimmed = response.trim();
    let trimmed = trimmed.strip_prefix('{').unwrap_or(trimmed);
    let trimmed = trimmed.strip_suffix('}').unwrap_or(trimmed).trim();

    if trimmed.is_empty() {
        return Ok(Vec::new());
    }
    trimmed.split(',').map(parse_number::<f64>).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory_link::MemoryLink;

    fn fast_config() -> ScopeConfig {
        ScopeConfig::default()
            .with_poll_interval(Duration::from_micros(100))
            .with_decimation_timeout(Duration::from_millis(20))
            .with_trigger_timeout(Duration::from_millis(20))
    }

    fn scope_commands(run: impl FnOnce(Oscilloscope<'_>) -> Result<(), ScpiError>) -> Vec<String> {
        let link = MemoryLink::new();
        let controller = ScpiController::open(link.clone()).unwrap();
        run(controller.oscilloscope()).unwrap();
        link.commands()
    }

    #[test]
    fn test_simple_commands() {
        let commands = scope_commands(|s| {
            s.stop()?;
            s.reset()?;
            s.enable_averaging()?;
            s.disable_averaging()?;
            s.disable_trigger()?;
            s.trigger_immediately()
        });
        assert_eq!(
            commands,
            vec![
                "ACQ:STOP",
                "ACQ:RST",
                "ACQ:AVG ON",
                "ACQ:AVG OFF",
                "ACQ:TRIG DISABLED",
                "ACQ:TRIG NOW"
            ]
        );
    }

    #[test]
    fn test_trigger_settings() {
        let commands = scope_commands(|s| {
            s.set_trigger_event(TriggerSource::Ch1, Edge::Positive)?;
            s.set_trigger_event(TriggerSource::External, Edge::Negative)?;
            s.set_trigger_level(100)?;
            s.set_trigger_level(-250)?;
            s.set_trigger_delay(8192)?;
            s.set_trigger_delay_ns(-1500)
        });
        assert_eq!(
            commands,
            vec![
                "ACQ:TRIG CH1_PE",
                "ACQ:TRIG EXT_NE",
                "ACQ:TRIG:LEV 100",
                "ACQ:TRIG:LEV -250",
                "ACQ:TRIG:DLY 8192",
                "ACQ:TRIG:DLY:NS -1500"
            ]
        );
    }

    #[test]
    fn test_arm() {
        let commands = scope_commands(|s| {
            s.arm(Trigger::Immediate)?;
            s.arm(Trigger::on(TriggerSource::Generator, Edge::Negative))
        });
        assert_eq!(commands, vec!["ACQ:TRIG NOW", "ACQ:TRIG AWG_NE"]);
    }

    #[test]
    fn test_get_trigger_state() {
        let link = MemoryLink::new();
        link.push_response("WAIT").push_response("TD").push_response("ARMED");
        let controller = ScpiController::open(link.clone()).unwrap();
        let scope = controller.oscilloscope();

        assert_eq!(scope.get_trigger_state().unwrap(), TriggerState::Waiting);
        assert_eq!(scope.get_trigger_state().unwrap(), TriggerState::Disabled);
        assert!(matches!(
            scope.get_trigger_state(),
            Err(ScpiError::Protocol(ProtocolError::UnknownToken { .. }))
        ));
        assert_eq!(link.commands(), vec!["ACQ:TRIG:STAT?"; 3]);
    }

    #[test]
    fn test_get_data() {
        let link = MemoryLink::new();
        link.push_response("{1.2,3.2,-1.2}");
        let controller = ScpiController::open(link.clone()).unwrap();

        let data = controller.oscilloscope().get_data(1).unwrap();
        assert_eq!(data, vec![1.2, 3.2, -1.2]);
        assert_eq!(link.commands(), vec!["ACQ:SOUR1:DATA?"]);
    }

    #[test]
    fn test_parse_data() {
        assert_eq!(parse_data(" {0.5, -0.25} ").unwrap(), vec![0.5, -0.25]);
        assert_eq!(parse_data("{}").unwrap(), Vec::<f64>::new());
        assert_eq!(parse_data("1,2").unwrap(), vec![1.0, 2.0]);
        assert_eq!(
            parse_data("{1.0,x}"),
            Err(ProtocolError::InvalidNumber {
                value: "x".to_string()
            })
        );
        assert!(parse_data("{1.0,,2.0}").is_err());
    }

    #[test]
    fn test_get_decimation_factor() {
        let link = MemoryLink::new();
        link.push_response("64").push_response("sixty-four");
        let controller = ScpiController::open(link).unwrap();
        let scope = controller.oscilloscope();

        assert_eq!(scope.get_decimation_factor().unwrap(), 64);
        assert!(matches!(
            scope.get_decimation_factor(),
            Err(ScpiError::Protocol(ProtocolError::InvalidNumber { .. }))
        ));
    }

    #[test]
    fn test_set_decimation_factor_waits_for_readback() {
        let link = MemoryLink::new();
        link.push_response("1").push_response("1").push_response("64");
        let controller = ScpiController::open(link.clone()).unwrap();

        controller
            .oscilloscope_with_config(fast_config())
            .set_decimation_factor(64)
            .unwrap();
        assert_eq!(
            link.commands(),
            vec!["ACQ:DEC 64", "ACQ:DEC?", "ACQ:DEC?", "ACQ:DEC?"]
        );
        assert_eq!(link.pending_chunks(), 0);
    }

    #[test]
    fn test_set_decimation_factor_times_out() {
        let link = MemoryLink::new();
        for _ in 0..10_000 {
            link.push_response("1");
        }
        let controller = ScpiController::open(link).unwrap();

        let result = controller
            .oscilloscope_with_config(fast_config())
            .set_decimation_factor(64);
        assert!(matches!(
            result,
            Err(ScpiError::Timeout {
                operation: "decimation factor",
                ..
            })
        ));
    }

    #[test]
    fn test_start_settles_for_buffer_time() {
        let link = MemoryLink::new();
        link.push_response("8");
        let controller = ScpiController::open(link.clone()).unwrap();

        let started = Instant::now();
        controller.oscilloscope().start().unwrap();
        // 16384 / 125 MHz * 8
        assert!(started.elapsed() >= Duration::from_micros(1048));
        assert_eq!(link.commands(), vec!["ACQ:START", "ACQ:DEC?"]);
    }

    #[test]
    fn test_settle_time() {
        let config = ScopeConfig::default();
        let close_to = |actual: Duration, nanos: u64| {
            actual.as_nanos().abs_diff(u128::from(nanos)) <= 1
        };
        assert!(close_to(config.settle_time(1), 131_072));
        assert!(close_to(config.settle_time(65536), 8_589_934_592));
        assert_eq!(config.settle_time(0), Duration::ZERO);
    }

    #[test]
    fn test_get_acquisition() {
        let link = MemoryLink::new();
        link.push_response("WAIT")
            .push_response("TD")
            .push_response("{0.1,0.2}")
            .push_response("64");
        let controller = ScpiController::open(link.clone()).unwrap();

        let acquisition = controller
            .oscilloscope_with_config(fast_config())
            .get_acquisition(1)
            .unwrap();

        assert_eq!(acquisition.voltages, vec![0.1, 0.2]);
        assert_eq!(acquisition.times.len(), 2);
        assert_eq!(acquisition.times[0], 0.0);
        assert!((acquisition.times[1] - 64.0 / 125_000_000.0).abs() < 1e-18);
        assert_eq!(
            link.commands(),
            vec!["ACQ:TRIG:STAT?", "ACQ:TRIG:STAT?", "ACQ:SOUR1:DATA?", "ACQ:DEC?"]
        );
    }

    #[test]
    fn test_get_acquisition_times_out_without_trigger() {
        let link = MemoryLink::new();
        for _ in 0..10_000 {
            link.push_response("WAIT");
        }
        let controller = ScpiController::open(link.clone()).unwrap();

        let result = controller
            .oscilloscope_with_config(fast_config())
            .get_acquisition(2);
        assert!(matches!(
            result,
            Err(ScpiError::Timeout {
                operation: "trigger",
                ..
            })
        ));
        assert!(!link.commands().iter().any(|c| c == "ACQ:SOUR2:DATA?"));
    }

    #[test]
    fn test_get_acquisition_rejects_bad_data() {
        let link = MemoryLink::new();
        link.push_response("TD").push_response("{0.1,oops}");
        let controller = ScpiController::open(link).unwrap();

        let result = controller.oscilloscope().get_acquisition(1);
        assert!(matches!(
            result,
            Err(ScpiError::Protocol(ProtocolError::InvalidNumber { .. }))
        ));
    }

    #[test]
    fn test_acquire() {
        let link = MemoryLink::new();
        link.push_response("1")
            .push_response("TD")
            .push_response("{0.5,0.25,0.125}")
            .push_response("1");
        let controller = ScpiController::open(link.clone()).unwrap();

        let acquisition = controller
            .oscilloscope_with_config(fast_config())
            .acquire(1, Trigger::on(TriggerSource::Ch1, Edge::Positive))
            .unwrap();

        assert_eq!(acquisition.len(), 3);
        assert!((acquisition.times[2] - 2.0 / 125_000_000.0).abs() < 1e-18);
        assert_eq!(
            link.commands(),
            vec![
                "ACQ:START",
                "ACQ:DEC?",
                "ACQ:TRIG CH1_PE",
                "ACQ:TRIG:STAT?",
                "ACQ:SOUR1:DATA?",
                "ACQ:DEC?"
            ]
        );
    }
}
