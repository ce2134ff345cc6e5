use crate::config::VehicleConfig;
use crate::state::VehicleState;
use crate::transmission::{Gear, FORWARD_GEARS};
use serde::{Deserialize, Serialize};

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum Steering {
    Keys { left: bool, right: bool },
    /// Pointer position along a viewport of the given width, both in pixels.
    Pointer { x: f32, viewport_width: f32 },
}

impl Default for Steering {
    fn default() -> Self {
        Steering::Keys {
            left: false,
            right: false,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GearSelect {
    None,
    Reverse,
    Neutral,
    Forward(u8),
}

impl Default for GearSelect {
    fn default() -> Self {
        GearSelect::None
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputSnapshot {
    pub throttle: bool,
    pub brake: bool,
    pub ebrake: bool,
    pub steering: Steering,
    pub gear_select: GearSelect,
    pub automatic: bool,
}

impl InputSnapshot {
    pub fn idle() -> InputSnapshot {
        InputSnapshot::default()
    }

    pub fn throttle() -> InputSnapshot {
        InputSnapshot {
            throttle: true,
            ..Default::default()
        }
    }

    pub fn brake() -> InputSnapshot {
        InputSnapshot {
            brake: true,
            ..Default::default()
        }
    }

    pub fn with_steering(mut self, left: bool, right: bool) -> InputSnapshot {
        self.steering = Steering::Keys { left, right };
        self
    }

    pub fn with_gear(mut self, gear_select: GearSelect) -> InputSnapshot {
        self.gear_select = gear_select;
        self
    }
}

fn approach(value: f32, target: f32, step: f32) -> f32 {
    if value < target {
        (value + step).min(target)
    } else {
        (value - step).max(target)
    }
}

pub fn pointer_steering(x: f32, viewport_width: f32, dead_zone: f32, max_steer: f32) -> f32 {
    let left_edge = viewport_width / 2.0 - dead_zone;
    let right_edge = viewport_width / 2.0 + dead_zone;
    if !x.is_finite() || left_edge <= 0.0 {
        return 0.0;
    }

    let angle = if x < left_edge {
        (1.0 - x / left_edge) * max_steer
    } else if x > right_edge {
        -((x - right_edge) / left_edge) * max_steer
    } else {
        0.0
    };
    angle.max(-max_steer).min(max_steer)
}

pub fn selected_gear(select: GearSelect) -> Option<Gear> {
    match select {
        GearSelect::None => None,
        GearSelect::Reverse => Some(Gear::REVERSE),
        GearSelect::Neutral => Some(Gear::NEUTRAL),
        GearSelect::Forward(n) if (1..=FORWARD_GEARS).contains(&(n as usize)) => {
            Gear::new(n as i32).ok()
        }
        GearSelect::Forward(_) => None,
    }
}

pub fn resolve_inputs(config: &VehicleConfig, state: &mut VehicleState, input: &InputSnapshot, dt: f32) {
    let tuning = &config.input;

    if input.throttle {
        state.throttle = (state.throttle + tuning.throttle_rise * dt).min(1.0);
        state.brake = 0.0;
    } else {
        state.throttle = (state.throttle - tuning.throttle_fall * dt).max(0.0);
    }

    if input.brake {
        state.brake = (state.brake + tuning.brake_rise * dt).min(1.0);
        state.throttle = 0.0;
    } else {
        state.brake = (state.brake - tuning.brake_fall * dt).max(0.0);
    }

    state.ebrake = if input.ebrake { 1.0 } else { 0.0 };

    let max = config.max_steer;
    state.steering_angle = match input.steering {
        Steering::Keys { left, right } => match (left, right) {
            (true, false) => (state.steering_angle + tuning.steer_step).min(max),
            (false, true) => (state.steering_angle - tuning.steer_step).max(-max),
            (true, true) => state.steering_angle,
            (false, false) => approach(state.steering_angle, 0.0, tuning.steer_step),
        },
        Steering::Pointer { x, viewport_width } => {
            pointer_steering(x, viewport_width, tuning.pointer_dead_zone, max)
        }
    };
    state.steering_angle = state.steering_angle.max(-max).min(max);

    if let Some(gear) = selected_gear(input.gear_select) {
        state.gear = gear;
    }

    if state.fuel <= 0.0 {
        state.throttle = 0.0;
    }
}
