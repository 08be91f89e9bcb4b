// Acquisition on a trigger
//
// This example loops the generator output back into the scope and captures
// one buffer, either immediately or on an edge of the chosen source.

use clap::{Parser, ValueEnum};
use redpitaya_rs::{Acquisition, Edge, ScpiConnector, Trigger, TriggerSource, Waveform};
use polars::prelude::{CsvWriter, SerWriter};
use std::time::Duration;

#[derive(Clone, Copy, ValueEnum)]
enum Source {
    Now,
    Ch1,
    Ch2,
    Ext,
    Awg,
}

#[derive(Parser)]
#[command(about = "Capture one scope buffer from a Red Pitaya")]
struct Args {
    /// Hostname or IP address of the board
    host: String,

    /// What fires the trigger
    #[arg(long, value_enum, default_value = "now")]
    source: Source,

    /// Trigger on the falling instead of the rising edge
    #[arg(long)]
    falling: bool,

    /// Trigger level in millivolts
    #[arg(long, default_value_t = 100)]
    level_mv: i32,

    #[arg(long, default_value_t = 64)]
    decimation: u32,

    /// Write the capture as CSV to this file
    #[arg(long)]
    output: Option<std::path::PathBuf>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args = Args::parse();

    println!("Red Pitaya Acquisition Example");
    println!("==============================\n");

    let controller = ScpiConnector::connect(&args.host, None, Some(Duration::from_secs(2)))?;

    let generator = controller.generator();
    generator.reset()?;
    generator.set_waveform(1, Waveform::Triangle)?;
    generator.set_frequency(1, 1000)?;
    generator.set_amplitude(1, 0.8)?;
    generator.enable_output(1)?;
    println!("Generating a 1kHz triangle on output 1");

    let scope = controller.oscilloscope();
    scope.reset()?;
    scope.set_decimation_factor(args.decimation)?;
    scope.set_trigger_level(args.level_mv)?;

    let edge = if args.falling { Edge::Negative } else { Edge::Positive };
    let trigger = match args.source {
        Source::Now => Trigger::Immediate,
        Source::Ch1 => Trigger::on(TriggerSource::Ch1, edge),
        Source::Ch2 => Trigger::on(TriggerSource::Ch2, edge),
        Source::Ext => Trigger::on(TriggerSource::External, edge),
        Source::Awg => Trigger::on(TriggerSource::Generator, edge),
    };

    let capture = scope.acquire(1, trigger)?;
    println!("Captured {} samples", capture.len());
    print_summary(&capture);

    if let Some(path) = args.output {
        let mut df = capture.to_dataframe()?;
        let mut file = std::fs::File::create(&path)?;
        CsvWriter::new(&mut file).finish(&mut df)?;
        println!("Wrote {}", path.display());
    }

    Ok(())
}

// Helper function to print basic statistics about acquired data
fn print_summary(capture: &Acquisition) {
    if capture.is_empty() {
        return;
    }
    let min = capture.voltages.iter().fold(f64::INFINITY, |a, &b| a.min(b));
    let max = capture.voltages.iter().fold(f64::NEG_INFINITY, |a, &b| a.max(b));
    let mean = capture.voltages.iter().sum::<f64>() / capture.len() as f64;
    let span = capture.times.last().copied().unwrap_or_default();

    println!("   Span: {:.6}s", span);
    println!("   Data range: {:.3}V to {:.3}V (mean: {:.3}V)", min, max, mean);
}
