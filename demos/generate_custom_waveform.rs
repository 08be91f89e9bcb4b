// Arbitrary waveform
//
// Uploads a ramp as an arbitrary waveform and plays it continuously.

use clap::Parser;
use redpitaya_rs::{ScpiConnector, Waveform};

#[derive(Parser)]
#[command(about = "Play a custom ramp on a Red Pitaya")]
struct Args {
    /// Hostname or IP address of the board
    host: String,

    /// Samples in the uploaded period
    #[arg(long, default_value_t = 16384)]
    samples: u32,

    #[arg(long, default_value_t = 62_500)]
    frequency: u32,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args = Args::parse();

    let controller = ScpiConnector::connect(&args.host, None, None)?;
    let generator = controller.generator();
    generator.reset()?;

    let ramp: Vec<f64> = (0..args.samples)
        .map(|i| f64::from(i) / f64::from(args.samples))
        .collect();
    generator.set_waveform(1, Waveform::Arbitrary)?;
    generator.set_arbitrary_waveform_data(1, &ramp)?;
    generator.set_frequency(1, args.frequency)?;
    generator.set_amplitude(1, 1.0)?;
    generator.enable_output(1)?;

    println!("Playing a {}-sample ramp at {}Hz", args.samples, args.frequency);
    Ok(())
}
