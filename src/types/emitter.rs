//! Types for emitters and their blinking states

use bon::Builder;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Photophysical state of an emitter in one frame.
///
/// The declaration order is the row/column order of the transition matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmitterState {
    On,
    Off,
    Bleached,
}

impl EmitterState {
    pub const ALL: [EmitterState; 3] = [EmitterState::On, EmitterState::Off, EmitterState::Bleached];

    /// Row/column index in the transition matrix
    pub fn index(self) -> usize {
        match self {
            EmitterState::On => 0,
            EmitterState::Off => 1,
            EmitterState::Bleached => 2,
        }
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Numeric code used in tables: on = 1, off = 0, bleached = -1
    pub fn code(self) -> i8 {
        match self {
            EmitterState::On => 1,
            EmitterState::Off => 0,
            EmitterState::Bleached => -1,
        }
    }

    pub fn is_on(self) -> bool {
        self == EmitterState::On
    }

    pub fn name(self) -> &'static str {
        match self {
            EmitterState::On => "on",
            EmitterState::Off => "off",
            EmitterState::Bleached => "bleached",
        }
    }
}

impl fmt::Display for EmitterState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A point emitter with a fixed position in nanometers.
#[derive(Debug, Clone, Copy, PartialEq, Builder, Serialize, Deserialize)]
pub struct Emitter {
    pub index: usize,
    pub x_nm: f64,
    pub y_nm: f64,
}

/// Emitters together with their state in frame 0
#[derive(Debug, Clone, PartialEq)]
pub struct EmitterPopulation {
    pub emitters: Vec<Emitter>,
    pub initial_states: Vec<EmitterState>,
}

impl EmitterPopulation {
    pub fn len(&self) -> usize {
        self.emitters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.emitters.is_empty()
    }
}
