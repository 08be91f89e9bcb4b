// Blink an LED
//
// This example toggles one of the board LEDs once per second.

use clap::Parser;
use redpitaya_rs::{ScpiConnector, State};
use std::thread;
use std::time::Duration;

#[derive(Parser)]
#[command(about = "Blink an LED on a Red Pitaya")]
struct Args {
    /// Hostname or IP address of the board
    host: String,

    /// LED to blink
    #[arg(long, default_value = "LED0")]
    led: String,

    /// Number of on/off cycles
    #[arg(long, default_value_t = 10)]
    cycles: u32,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args = Args::parse();

    let controller = ScpiConnector::connect(&args.host, None, Some(Duration::from_secs(2)))?;
    let digital = controller.digital();

    for _ in 0..args.cycles {
        digital.set_state(&args.led, State::High)?;
        thread::sleep(Duration::from_millis(500));
        digital.set_state(&args.led, State::Low)?;
        thread::sleep(Duration::from_millis(500));
    }

    println!("Blinked {} {} times", args.led, args.cycles);
    Ok(())
}
