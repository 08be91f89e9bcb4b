//! # Red Pitaya RS
//!
//! A Rust library for driving the signal generator and oscilloscope of a
//! Red Pitaya board through its SCPI server.
//!
//! Commands and responses are CRLF-terminated text lines exchanged over a
//! byte stream. The library frames those lines, keeps every query paired with
//! its response, and wraps the four instrument subsystems in typed facades.
//!
//! ## Features
//!
//! - **Pluggable transport**: any [`ByteLink`] works; TCP, serial and an
//!   in-memory link for tests are included
//! - **Typed facades**: digital I/O, slow analog I/O, waveform generator and
//!   oscilloscope
//! - **Bounded acquisition**: decimation and trigger polling give up with a
//!   timeout instead of hanging on stuck hardware
//! - **DataFrame output**: captures convert to `polars` frames
//!
//! ## Examples
//!
//! ### Generate a signal and capture it
//!
//! ```rust,no_run
//! use redpitaya_rs::{ScpiConnector, Trigger, Waveform};
//!
//! let controller = ScpiConnector::connect("rp-f0060c.local", None, None)?;
//!
//! let generator = controller.generator();
//! generator.reset()?;
//! generator.set_waveform(1, Waveform::Triangle)?;
//! generator.set_frequency(1, 1000)?;
//! generator.set_amplitude(1, 0.8)?;
//! generator.enable_output(1)?;
//!
//! let scope = controller.oscilloscope();
//! scope.reset()?;
//! scope.set_decimation_factor(64)?;
//! let capture = scope.acquire(1, Trigger::Immediate)?;
//! println!("Captured {} samples", capture.len());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ### Testing without hardware
//!
//! ```rust
//! use redpitaya_rs::{MemoryLink, ScpiController, State};
//!
//! let link = MemoryLink::new();
//! link.push_response("1");
//!
//! let controller = ScpiController::open(link.clone())?;
//! assert_eq!(controller.digital().get_state("LED2")?, State::High);
//! assert_eq!(link.commands(), vec!["DIG:PIN? LED2"]);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod acquisition;
pub mod analog;
pub mod byte_link;
pub mod connector;
pub mod controller;
pub mod digital;
pub mod error;
pub mod generator;
pub mod memory_link;
pub mod oscilloscope;
pub mod scpi_connection;
pub mod session;
pub mod tokens;

// Re-export the main types for convenience
pub use acquisition::{Acquisition, Trigger};

pub use byte_link::{ByteLink, LinkError, SerialLink, TcpAddress, TcpLink, DEFAULT_SCPI_PORT};

pub use memory_link::MemoryLink;

pub use scpi_connection::{ScpiConnection, TransportError};

pub use controller::ScpiController;

pub use connector::ScpiConnector;

pub use error::{ProtocolError, ScpiError};

pub use tokens::{Direction, Edge, State, TriggerSource, TriggerState, Waveform};

pub use analog::Analog;
pub use digital::Digital;
pub use generator::Generator;
pub use oscilloscope::{Oscilloscope, ScopeConfig};
pub use session::ScpiSession;
