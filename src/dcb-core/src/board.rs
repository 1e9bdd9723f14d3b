// SPDX-FileCopyrightText: 2025 Stanislaw Grams <stanislawgrams@gmail.com>
//
// SPDX-License-Identifier: BSD-2-Clause

//! Device control board facade.
//!
//! A [`Dcb`] owns every unit bank. Transports only ever call
//! [`Dcb::prompt_command`]; it is safe to share one board between
//! connections behind an `Arc`.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::bank::{ActuatorBank, DispenserBank};
use crate::dispatcher;
use crate::error::UnitKind;
use crate::unit::actuator::{Actuator, DEFAULT_MOVE_TIMEOUT, DEFAULT_POLL_INTERVAL};
use crate::unit::dispenser::{Dispenser, DEFAULT_POUR_TIMEOUT};
use crate::unit::io::DigitalIoBank;

/// Construction-time board layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoardConfig {
    /// Board identity string
    pub identity: String,
    /// Station the board is installed in
    pub station_id: String,
    /// Length of each digital I/O channel
    pub io_count: usize,
    /// Number of dispensers
    pub dispenser_count: usize,
    /// Number of actuators
    pub actuator_count: usize,
    /// Pour timeout for every dispenser, in milliseconds
    pub dispenser_timeout_ms: u64,
    /// Simulated duration of every actuator move, in milliseconds
    pub actuator_timeout_ms: u64,
    /// How often a moving actuator checks for stop/arrival, in milliseconds
    pub motion_poll_ms: u64,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            identity: "DCB-SIM".to_string(),
            station_id: "station-0".to_string(),
            io_count: 16,
            dispenser_count: 8,
            actuator_count: 4,
            dispenser_timeout_ms: DEFAULT_POUR_TIMEOUT.as_millis() as u64,
            actuator_timeout_ms: DEFAULT_MOVE_TIMEOUT.as_millis() as u64,
            motion_poll_ms: DEFAULT_POLL_INTERVAL.as_millis() as u64,
        }
    }
}

impl BoardConfig {
    pub fn validate(&self) -> Result<(), String> {
        if self.identity.trim().is_empty() {
            return Err("[board].identity must not be empty".to_string());
        }
        if self.station_id.trim().is_empty() {
            return Err("[board].station_id must not be empty".to_string());
        }
        if self.io_count == 0 {
            return Err("[board].io_count must be > 0".to_string());
        }
        if self.motion_poll_ms == 0 {
            return Err("[board].motion_poll_ms must be > 0".to_string());
        }
        Ok(())
    }
}

#[derive(Debug)]
pub struct Dcb {
    identity: String,
    station_id: String,
    io: DigitalIoBank,
    dispensers: DispenserBank,
    actuators: ActuatorBank,
}

impl Dcb {
    /// Board with default unit timeouts.
    pub fn new(
        identity: impl Into<String>,
        station_id: impl Into<String>,
        io_count: usize,
        dispenser_count: usize,
        actuator_count: usize,
    ) -> Self {
        Self::from_config(&BoardConfig {
            identity: identity.into(),
            station_id: station_id.into(),
            io_count,
            dispenser_count,
            actuator_count,
            ..BoardConfig::default()
        })
    }

    pub fn from_config(cfg: &BoardConfig) -> Self {
        let pour_timeout = Duration::from_millis(cfg.dispenser_timeout_ms);
        let move_timeout = Duration::from_millis(cfg.actuator_timeout_ms);
        let poll_interval = Duration::from_millis(cfg.motion_poll_ms);

        let dcb = Self {
            identity: cfg.identity.clone(),
            station_id: cfg.station_id.clone(),
            io: DigitalIoBank::new(cfg.io_count),
            dispensers: DispenserBank::from_fn(UnitKind::Dispenser, cfg.dispenser_count, |id| {
                Dispenser::new(id, pour_timeout)
            }),
            actuators: ActuatorBank::from_fn(UnitKind::Actuator, cfg.actuator_count, |id| {
                Actuator::with_poll_interval(id, move_timeout, poll_interval)
            }),
        };
        info!(
            "Board {} at {}: {} I/O, {} dispensers, {} actuators",
            dcb.identity,
            dcb.station_id,
            cfg.io_count,
            cfg.dispenser_count,
            cfg.actuator_count
        );
        dcb
    }

    /// Answer one request line with one response line.
    ///
    /// Never fails: invalid requests are answered with `ERROR\n`.
    pub async fn prompt_command(&self, line: &str) -> String {
        dispatcher::dispatch(self, line).await
    }

    pub fn identity(&self) -> &str {
        &self.identity
    }

    pub fn station_id(&self) -> &str {
        &self.station_id
    }

    pub fn io(&self) -> &DigitalIoBank {
        &self.io
    }

    pub fn dispensers(&self) -> &DispenserBank {
        &self.dispensers
    }

    pub fn actuators(&self) -> &ActuatorBank {
        &self.actuators
    }
}
