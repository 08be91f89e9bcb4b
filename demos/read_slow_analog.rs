// Slow analog input
//
// Prints the voltage on an analog input once per period.

use clap::Parser;
use redpitaya_rs::ScpiConnector;
use std::thread;
use std::time::Duration;

#[derive(Parser)]
#[command(about = "Poll a slow analog input on a Red Pitaya")]
struct Args {
    /// Hostname or IP address of the board
    host: String,

    #[arg(long, default_value = "AIN3")]
    pin: String,

    /// Seconds between readings
    #[arg(long, default_value_t = 1.0)]
    period: f64,

    #[arg(long, default_value_t = 60)]
    count: u32,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args = Args::parse();

    let controller = ScpiConnector::connect(&args.host, None, Some(Duration::from_secs(2)))?;
    let session = controller.session();

    for _ in 0..args.count {
        let voltage = session.get_analog_input(&args.pin)?;
        println!("{}: {:.3}V", args.pin, voltage);
        thread::sleep(Duration::from_secs_f64(args.period));
    }
    Ok(())
}
