//! Single-pulse and continuous strobe outputs.

#![expect(clippy::little_endian_bytes, reason = "wire format is little-endian")]

use super::Command;
use crate::message::MessageType;

/// Timing parameter of a strobe output, in microseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrobeTiming {
    /// Delay before the single pulse.
    SingleDelay(u32),
    /// Width of the single pulse.
    SingleWidth(u32),
    /// Period of the continuous strobe.
    ContinuousPeriod(u32),
}

/// Set one strobe timing parameter.
#[derive(Debug, Clone, Copy)]
pub struct SetStrobeTiming {
    /// Parameter and value.
    pub timing: StrobeTiming,
}

impl Command for SetStrobeTiming {
    fn message_type(&self) -> MessageType {
        match self.timing {
            StrobeTiming::SingleDelay(_) => MessageType::SetSingleStrobeDelay,
            StrobeTiming::SingleWidth(_) => MessageType::SetSingleStrobeWidth,
            StrobeTiming::ContinuousPeriod(_) => MessageType::SetContinuousStrobePeriod,
        }
    }

    fn payload(&self) -> Vec<u8> {
        let (StrobeTiming::SingleDelay(micros)
        | StrobeTiming::SingleWidth(micros)
        | StrobeTiming::ContinuousPeriod(micros)) = self.timing;
        micros.to_le_bytes().to_vec()
    }
}

/// Strobe output selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrobeOutput {
    /// One pulse per acquisition.
    Single,
    /// Free-running pulse train.
    Continuous,
}

/// Enable or disable a strobe output.
#[derive(Debug, Clone, Copy)]
pub struct SetStrobeEnable {
    /// Output to change.
    pub output: StrobeOutput,
    /// Desired state.
    pub enable: bool,
}

impl Command for SetStrobeEnable {
    fn message_type(&self) -> MessageType {
        match self.output {
            StrobeOutput::Single => MessageType::SetSingleStrobeEnable,
            StrobeOutput::Continuous => MessageType::SetContinuousStrobeEnable,
        }
    }

    fn payload(&self) -> Vec<u8> { vec![u8::from(self.enable)] }
}
