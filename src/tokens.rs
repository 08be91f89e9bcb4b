//! Domain values and the exact protocol token each one is sent as.
//!
//! Every enum is generated from a single variant/token table, so encoding and
//! decoding cannot drift apart.

use crate::error::ProtocolError;
use std::fmt;
use std::str::FromStr;

macro_rules! protocol_enum {
    (
        $(#[$meta:meta])*
        $name:ident {
            $( $(#[$variant_meta:meta])* $variant:ident => $token:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $( $(#[$variant_meta])* $variant ),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $( $name::$variant => $token ),+
                }
            }

            pub fn from_token(token: &str) -> Result<Self, ProtocolError> {
                match token {
                    $( $token => Ok($name::$variant), )+
                    other => Err(ProtocolError::UnknownToken {
                        kind: stringify!($name),
                        token: other.to_string(),
                    }),
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = ProtocolError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::from_token(s.trim())
            }
        }
    };
}

protocol_enum! {
    /// Logical level of a digital pin.
    State {
        Low => "0",
        High => "1",
    }
}

protocol_enum! {
    Direction {
        Input => "IN",
        Output => "OUT",
    }
}

protocol_enum! {
    /// Generator output shape.
    Waveform {
        Sine => "SINE",
        Square => "SQUARE",
        Triangle => "TRIANGLE",
        RampUp => "SAWU",
        RampDown => "SAWD",
        Pwm => "PWM",
        /// Shape previously uploaded with `Generator::set_arbitrary_waveform_data`.
        Arbitrary => "ARBITRARY",
    }
}

protocol_enum! {
    TriggerSource {
        Ch1 => "CH1",
        Ch2 => "CH2",
        External => "EXT",
        /// Internal trigger of the signal generator.
        Generator => "AWG",
    }
}

protocol_enum! {
    Edge {
        Positive => "PE",
        Negative => "NE",
    }
}

protocol_enum! {
    /// Trigger status as reported by the scope.
    ///
    /// `Disabled` means no trigger is pending any more: after arming, it is
    /// the signal that the trigger fired and the buffer holds the capture.
    TriggerState {
        Disabled => "TD",
        Waiting => "WAIT",
    }
}

impl From<bool> for State {
    fn from(high: bool) -> Self {
        if high {
            Self::High
        } else {
            Self::Low
        }
    }
}

/// Combined token for an edge trigger, e.g. `CH1_PE`.
pub fn trigger_event_token(source: TriggerSource, edge: Edge) -> String {
    format!("{source}_{edge}")
}
