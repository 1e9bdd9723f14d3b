// SPDX-FileCopyrightText: 2025 Stanislaw Grams <stanislawgrams@gmail.com>
//
// SPDX-License-Identifier: BSD-2-Clause

//! Routes parsed commands to board units.
//!
//! The dispatcher keeps no state of its own; everything durable lives in the
//! units. Every failure, whether a bad line or a bad index, is logged here
//! and answered with the generic `ERROR` token.

use tracing::warn;

use crate::board::Dcb;
use crate::error::DcbResult;
use crate::protocol::{parse_command, Command, Response};
use crate::unit::io::IoChannel;

/// Turn one request line into exactly one response line.
pub async fn dispatch(dcb: &Dcb, line: &str) -> String {
    let response = match parse_command(line) {
        Ok(command) => match execute(dcb, command).await {
            Ok(response) => response,
            Err(e) => {
                warn!(
                    "{}: rejected {:?} for unit {}: {}",
                    dcb.identity(),
                    command,
                    command.index(),
                    e
                );
                Response::Error
            }
        },
        Err(e) => {
            warn!(
                "{}: unparsable command {:?}: {}",
                dcb.identity(),
                line.trim_end(),
                e
            );
            Response::Error
        }
    };
    response.to_line()
}

/// Apply a parsed command to the board.
pub async fn execute(dcb: &Dcb, command: Command) -> DcbResult<Response> {
    match command {
        Command::QueryDigitalOutput { index } => {
            let value = dcb.io().get(IoChannel::DigitalOutputs, index)?;
            Ok(Response::DigitalOutput(value))
        }
        Command::StartPour { index } => {
            dcb.dispensers().get(index)?.reset_pour_timeout();
            Ok(Response::Ok)
        }
        Command::QueryTarget { index } => {
            let target = dcb.actuators().get(index)?.target_position();
            Ok(Response::Target { index, target })
        }
        Command::MoveTo { index, target } => {
            dcb.actuators().get(index)?.start_move(target).await;
            Ok(Response::Ok)
        }
    }
}
