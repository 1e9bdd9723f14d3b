// SPDX-FileCopyrightText: 2025 Stanislaw Grams <stanislawgrams@gmail.com>
//
// SPDX-License-Identifier: BSD-2-Clause

use std::fmt;

use thiserror::Error;

use crate::unit::io::IoChannel;

/// Kind of addressable unit on the board, used to label range errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnitKind {
    DigitalIo(IoChannel),
    Dispenser,
    Actuator,
}

impl fmt::Display for UnitKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnitKind::DigitalIo(channel) => write!(f, "{}", channel),
            UnitKind::Dispenser => f.write_str("dispenser"),
            UnitKind::Actuator => f.write_str("actuator"),
        }
    }
}

/// Errors raised while parsing or executing a board command.
///
/// All variants collapse to the same `ERROR` token on the wire; the detail is
/// only for server-side logs.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DcbError {
    #[error("{unit} index {index} out of range (count {count})")]
    OutOfRange {
        unit: UnitKind,
        index: usize,
        count: usize,
    },

    #[error("unknown operation {0:?}")]
    UnknownOperation(String),

    #[error("malformed command: {0}")]
    Malformed(String),
}

pub type DcbResult<T> = Result<T, DcbError>;

impl DcbError {
    pub fn malformed(msg: impl Into<String>) -> Self {
        DcbError::Malformed(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_out_of_range_message_names_unit() {
        let err = DcbError::OutOfRange {
            unit: UnitKind::Actuator,
            index: 7,
            count: 2,
        };
        assert_eq!(err.to_string(), "actuator index 7 out of range (count 2)");

        let err = DcbError::OutOfRange {
            unit: UnitKind::DigitalIo(IoChannel::DigitalOutputs),
            index: 4,
            count: 4,
        };
        assert_eq!(
            err.to_string(),
            "digital output index 4 out of range (count 4)"
        );
    }
}
