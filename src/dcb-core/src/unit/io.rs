// SPDX-FileCopyrightText: 2025 Stanislaw Grams <stanislawgrams@gmail.com>
//
// SPDX-License-Identifier: BSD-2-Clause

//! Flat digital I/O state.
//!
//! The board exposes its own outputs and inputs plus two expansion banks.
//! Every channel has the same length, fixed at construction. There is no
//! behaviour beyond indexed read and write.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::error::{DcbError, DcbResult, UnitKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IoChannel {
    DigitalOutputs,
    DigitalInputs,
    Expansion0Outputs,
    Expansion0Inputs,
    Expansion1Outputs,
    Expansion1Inputs,
}

impl IoChannel {
    pub const ALL: [IoChannel; 6] = [
        IoChannel::DigitalOutputs,
        IoChannel::DigitalInputs,
        IoChannel::Expansion0Outputs,
        IoChannel::Expansion0Inputs,
        IoChannel::Expansion1Outputs,
        IoChannel::Expansion1Inputs,
    ];

    fn slot(self) -> usize {
        match self {
            IoChannel::DigitalOutputs => 0,
            IoChannel::DigitalInputs => 1,
            IoChannel::Expansion0Outputs => 2,
            IoChannel::Expansion0Inputs => 3,
            IoChannel::Expansion1Outputs => 4,
            IoChannel::Expansion1Inputs => 5,
        }
    }
}

impl fmt::Display for IoChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            IoChannel::DigitalOutputs => "digital output",
            IoChannel::DigitalInputs => "digital input",
            IoChannel::Expansion0Outputs => "expansion 0 output",
            IoChannel::Expansion0Inputs => "expansion 0 input",
            IoChannel::Expansion1Outputs => "expansion 1 output",
            IoChannel::Expansion1Inputs => "expansion 1 input",
        };
        f.write_str(name)
    }
}

/// Six equally sized boolean channels, all initially low.
#[derive(Debug)]
pub struct DigitalIoBank {
    io_count: usize,
    channels: [Vec<AtomicBool>; 6],
}

impl DigitalIoBank {
    pub fn new(io_count: usize) -> Self {
        Self {
            io_count,
            channels: std::array::from_fn(|_| {
                (0..io_count).map(|_| AtomicBool::new(false)).collect()
            }),
        }
    }

    /// Length of every channel.
    pub fn io_count(&self) -> usize {
        self.io_count
    }

    pub fn get(&self, channel: IoChannel, index: usize) -> DcbResult<bool> {
        Ok(self.bit(channel, index)?.load(Ordering::SeqCst))
    }

    pub fn set(&self, channel: IoChannel, index: usize, value: bool) -> DcbResult<()> {
        self.bit(channel, index)?.store(value, Ordering::SeqCst);
        Ok(())
    }

    /// Copy of a whole channel.
    pub fn channel(&self, channel: IoChannel) -> Vec<bool> {
        self.channels[channel.slot()]
            .iter()
            .map(|bit| bit.load(Ordering::SeqCst))
            .collect()
    }

    fn bit(&self, channel: IoChannel, index: usize) -> DcbResult<&AtomicBool> {
        self.channels[channel.slot()]
            .get(index)
            .ok_or(DcbError::OutOfRange {
                unit: UnitKind::DigitalIo(channel),
                index,
                count: self.io_count,
            })
    }
}
