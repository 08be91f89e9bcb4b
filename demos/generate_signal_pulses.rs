// Burst generation
//
// Emits seven one-period bursts of a 1kHz sine, one every 2ms.

use clap::Parser;
use redpitaya_rs::{ScpiConnector, Waveform};

#[derive(Parser)]
#[command(about = "Emit sine bursts from a Red Pitaya")]
struct Args {
    /// Hostname or IP address of the board
    host: String,

    #[arg(long, default_value_t = 1)]
    channel: u8,

    #[arg(long, default_value_t = 7)]
    repetitions: u32,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args = Args::parse();

    let controller = ScpiConnector::connect(&args.host, None, None)?;
    let generator = controller.generator();
    let channel = args.channel;

    generator.reset()?;
    generator.set_waveform(channel, Waveform::Sine)?;
    generator.set_frequency(channel, 1000)?;
    generator.set_amplitude(channel, 0.5)?;

    generator.set_burst_count(channel, 1)?;
    generator.set_burst_repetitions(channel, args.repetitions)?;
    generator.set_burst_period(channel, 2000)?;
    generator.enable_output(channel)?;
    generator.enable_burst(channel)?;
    generator.trigger_immediately(channel)?;

    println!("Triggered {} bursts on output {}", args.repetitions, channel);
    Ok(())
}
