// SPDX-FileCopyrightText: 2025 Stanislaw Grams <stanislawgrams@gmail.com>
//
// SPDX-License-Identifier: BSD-2-Clause

use std::fmt;

pub const DELIMITER: char = '\n';

/// Reply to a board request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Response {
    Ok,
    Error,
    DigitalOutput(bool),
    Target { index: usize, target: i64 },
}

impl Response {
    /// Render the reply as a complete wire line, delimiter included.
    pub fn to_line(&self) -> String {
        let mut line = self.to_string();
        line.push(DELIMITER);
        line
    }
}

impl fmt::Display for Response {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Response::Ok => f.write_str("OK"),
            Response::Error => f.write_str("ERROR"),
            Response::DigitalOutput(value) => write!(f, "DOP={}", u8::from(*value)),
            Response::Target { index, target } => write!(f, "MSP:{}={}", index, target),
        }
    }
}
