// SPDX-FileCopyrightText: 2025 Stanislaw Grams <stanislawgrams@gmail.com>
//
// SPDX-License-Identifier: BSD-2-Clause

pub mod bank;
pub mod board;
pub mod dispatcher;
pub mod error;
pub mod protocol;
pub mod unit;

pub type DynResult<T> = Result<T, Box<dyn std::error::Error + Send + Sync>>;

pub use bank::{ActuatorBank, DispenserBank, UnitBank};
pub use board::{BoardConfig, Dcb};
pub use error::{DcbError, DcbResult, UnitKind};
pub use protocol::{parse_command, Command, Response};
pub use unit::actuator::{Actuator, ActuatorSnapshot};
pub use unit::dispenser::Dispenser;
pub use unit::io::{DigitalIoBank, IoChannel};
