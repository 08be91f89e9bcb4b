use crate::tokens::{Edge, TriggerSource};
use polars::prelude::*;

pub const TIME_COLUMN_NAME: &str = "time";
pub const VOLTAGE_COLUMN_NAME: &str = "voltage";

/// How the scope is armed before a capture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    /// Fire as soon as the scope is armed.
    Immediate,
    /// Fire on an edge of the given source.
    Event { source: TriggerSource, edge: Edge },
}

impl Trigger {
    pub fn on(source: TriggerSource, edge: Edge) -> Self {
        Self::Event { source, edge }
    }
}

/// One completed capture: sample times in seconds, index-aligned with the
/// voltages read from the channel.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Acquisition {
    pub times: Vec<f64>,
    pub voltages: Vec<f64>,
}

impl Acquisition {
    /// Pair voltages with timestamps `i / base_sampling_rate * decimation`.
    pub fn from_samples(voltages: Vec<f64>, base_sampling_rate: f64, decimation: u32) -> Self {
        let sample_period = f64::from(decimation) / base_sampling_rate;
        let times = (0..voltages.len())
            .map(|i| i as f64 * sample_period)
            .collect();
        Self { times, voltages }
    }

    pub fn len(&self) -> usize {
        self.voltages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.voltages.is_empty()
    }

    /// `(time, voltage)` pairs in capture order.
    pub fn iter(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.times
            .iter()
            .copied()
            .zip(self.voltages.iter().copied())
    }

    pub fn to_dataframe(&self) -> Result<DataFrame, PolarsError> {
        DataFrame::new(vec![
            Series::new(TIME_COLUMN_NAME.into(), self.times.as_slice()).into(),
            Series::new(VOLTAGE_COLUMN_NAME.into(), self.voltages.as_slice()).into(),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_samples_timestamps() {
        let acquisition = Acquisition::from_samples(vec![0.1, 0.2, 0.3], 125_000_000.0, 64);

        assert_eq!(acquisition.len(), 3);
        assert_eq!(acquisition.times[0], 0.0);
        assert!((acquisition.times[1] - 64.0 / 125_000_000.0).abs() < 1e-15);
        assert!((acquisition.times[2] - 128.0 / 125_000_000.0).abs() < 1e-15);
    }

    #[test]
    fn test_iter_pairs() {
        let acquisition = Acquisition::from_samples(vec![1.5, -1.5], 1.0, 2);
        let pairs: Vec<_> = acquisition.iter().collect();
        assert_eq!(pairs, vec![(0.0, 1.5), (2.0, -1.5)]);
    }

    #[test]
    fn test_empty_capture() {
        let acquisition = Acquisition::from_samples(Vec::new(), 125_000_000.0, 1);
        assert!(acquisition.is_empty());
        assert!(acquisition.times.is_empty());
    }

    #[test]
    fn test_to_dataframe() {
        let acquisition = Acquisition::from_samples(vec![0.1, 0.2], 125_000_000.0, 64);
        let df = acquisition.to_dataframe().unwrap();

        assert_eq!(df.height(), 2);
        assert_eq!(df.width(), 2);
        let voltages = df.column(VOLTAGE_COLUMN_NAME).unwrap().f64().unwrap();
        assert_eq!(voltages.get(1), Some(0.2));
        let times = df.column(TIME_COLUMN_NAME).unwrap().f64().unwrap();
        assert_eq!(times.get(0), Some(0.0));
    }

    #[test]
    fn test_trigger_on() {
        assert_eq!(
            Trigger::on(TriggerSource::Ch1, Edge::Positive),
            Trigger::Event {
                source: TriggerSource::Ch1,
                edge: Edge::Positive
            }
        );
    }
}
