use crate::error::{ConfigError, SimError};
use serde::{Deserialize, Serialize};
use std::convert::TryFrom;
use std::fmt;

pub const FORWARD_GEARS: usize = 6;

/// -1 is reverse, 0 neutral, 1..=6 the forward gears.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i32", into = "i32")]
pub struct Gear(i8);

impl Gear {
    pub const REVERSE: Gear = Gear(-1);
    pub const NEUTRAL: Gear = Gear(0);
    pub const FIRST: Gear = Gear(1);
    pub const TOP: Gear = Gear(FORWARD_GEARS as i8);

    pub fn new(index: i32) -> Result<Gear, SimError> {
        if (-1..=FORWARD_GEARS as i32).contains(&index) {
            Ok(Gear(index as i8))
        } else {
            Err(SimError::InvariantViolation { gear: index })
        }
    }

    pub fn index(self) -> i32 {
        self.0 as i32
    }

    pub fn is_reverse(self) -> bool {
        self.0 < 0
    }

    pub fn is_neutral(self) -> bool {
        self.0 == 0
    }

    pub fn is_forward(self) -> bool {
        self.0 > 0
    }

    pub fn up(self) -> Option<Gear> {
        if self.is_forward() && self < Gear::TOP {
            Some(Gear(self.0 + 1))
        } else {
            None
        }
    }

    pub fn down(self) -> Option<Gear> {
        if self > Gear::FIRST {
            Some(Gear(self.0 - 1))
        } else {
            None
        }
    }
}

impl Default for Gear {
    fn default() -> Self {
        Gear::FIRST
    }
}

impl TryFrom<i32> for Gear {
    type Error = SimError;

    fn try_from(index: i32) -> Result<Self, Self::Error> {
        Gear::new(index)
    }
}

impl From<Gear> for i32 {
    fn from(gear: Gear) -> Self {
        gear.index()
    }
}

impl fmt::Display for Gear {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            -1 => write!(f, "R"),
            0 => write!(f, "N"),
            n => write!(f, "{}", n),
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GearRatios {
    pub reverse: f32,
    pub forward: [f32; FORWARD_GEARS],
}

impl Default for GearRatios {
    fn default() -> Self {
        GearRatios {
            reverse: 2.9,
            forward: [2.66, 1.78, 1.3, 1.0, 0.74, 0.5],
        }
    }
}

impl GearRatios {
    pub fn ratio(&self, gear: Gear) -> f32 {
        match gear.0 {
            0 => 0.0,
            g if g < 0 => self.reverse,
            g => self.forward[g as usize - 1],
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.reverse > 0.0) {
            return Err(ConfigError::NonPositive("gear_ratios.reverse"));
        }
        if self.forward.iter().any(|r| !(*r > 0.0)) {
            return Err(ConfigError::NonPositive("gear_ratios.forward"));
        }
        Ok(())
    }
}

/// Thresholds of the automatic gearbox, in rpm.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShiftPoints {
    pub up: f32,
    pub down: f32,
}

impl Default for ShiftPoints {
    fn default() -> Self {
        ShiftPoints {
            up: 5000.0,
            down: 1000.0,
        }
    }
}

impl ShiftPoints {
    pub fn next_gear(&self, gear: Gear, rpm: f32) -> Gear {
        if !gear.is_forward() {
            return gear;
        }
        if rpm > self.up {
            gear.up().unwrap_or(gear)
        } else if rpm < self.down {
            gear.down().unwrap_or(gear)
        } else {
            gear
        }
    }
}
