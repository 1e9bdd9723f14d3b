// SPDX-FileCopyrightText: 2025 Stanislaw Grams <stanislawgrams@gmail.com>
//
// SPDX-License-Identifier: BSD-2-Clause

//! Fixed-size unit collections addressed by index.

use crate::error::{DcbError, DcbResult, UnitKind};
use crate::unit::actuator::Actuator;
use crate::unit::dispenser::Dispenser;

pub type ActuatorBank = UnitBank<Actuator>;
pub type DispenserBank = UnitBank<Dispenser>;

#[derive(Debug)]
pub struct UnitBank<T> {
    kind: UnitKind,
    units: Vec<T>,
}

impl<T> UnitBank<T> {
    /// Build `count` units, passing each its index as id.
    pub fn from_fn(kind: UnitKind, count: usize, build: impl FnMut(usize) -> T) -> Self {
        Self {
            kind,
            units: (0..count).map(build).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    pub fn get(&self, index: usize) -> DcbResult<&T> {
        self.units.get(index).ok_or(DcbError::OutOfRange {
            unit: self.kind,
            index,
            count: self.units.len(),
        })
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.units.iter()
    }
}
