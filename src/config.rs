use crate::curve::Curve;
use crate::error::ConfigError;
use crate::transmission::{GearRatios, ShiftPoints};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VehicleConfig {
    pub gravity: f32,
    pub mass: f32,
    pub yaw_inertia: f32,

    pub cg_to_front_axle: f32,
    pub cg_to_rear_axle: f32,
    pub half_width: f32,
    pub cg_height: f32,
    pub wheel_radius: f32,
    /// World units per metre of the driven model.
    pub length_unit: f32,

    pub tire_grip: f32,
    pub lock_grip: f32,
    pub corner_stiffness_front: f32,
    pub corner_stiffness_rear: f32,
    pub brake_force: f32,
    pub ebrake_force: f32,
    pub weight_transfer: f32,
    pub lateral_transfer_scale: f32,
    pub max_steer: f32,
    pub drag: f32,
    pub rolling_resistance: f32,

    pub engine_idle: f32,
    pub engine_red: f32,
    pub torque_curve: Curve,
    pub gear_ratios: GearRatios,
    pub differential_ratio: f32,
    pub shift_points: ShiftPoints,

    /// Degrees.
    pub max_body_roll: f32,
    /// Degrees.
    pub max_camber: f32,
    pub suspension: SuspensionConfig,

    /// km/h, only used for display.
    pub max_speed: f32,
    pub max_fuel: f32,
    pub fuel_consumption: f32,

    pub input: InputTuning,
    pub terrain: TerrainConfig,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SuspensionConfig {
    pub rest_front: f32,
    pub rest_rear: f32,
    pub stiffness_front: f32,
    pub stiffness_rear: f32,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputTuning {
    /// Per second.
    pub throttle_rise: f32,
    pub throttle_fall: f32,
    pub brake_rise: f32,
    pub brake_fall: f32,
    /// Radians per tick of key steering.
    pub steer_step: f32,
    /// Pixels either side of the viewport centre.
    pub pointer_dead_zone: f32,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TerrainConfig {
    Flat {
        height: f32,
    },
    Noise {
        seed: u32,
        bumpiness: f32,
        bump_height: f32,
    },
}

impl Default for VehicleConfig {
    fn default() -> Self {
        let brake_force = 12000.0;
        VehicleConfig {
            gravity: 9.81,
            mass: 1200.0,
            yaw_inertia: 1200.0,
            cg_to_front_axle: 1.25,
            cg_to_rear_axle: 1.25,
            half_width: 0.95,
            cg_height: 0.676,
            wheel_radius: 0.358,
            length_unit: 1.0,
            tire_grip: 2.0,
            lock_grip: 0.7,
            corner_stiffness_front: 5.0,
            corner_stiffness_rear: 5.2,
            brake_force,
            ebrake_force: brake_force / 2.5,
            weight_transfer: 0.2,
            lateral_transfer_scale: 0.8,
            max_steer: 0.5,
            drag: 0.4257,
            rolling_resistance: 12.8,
            engine_idle: 1000.0,
            engine_red: 7000.0,
            torque_curve: corvette_torque(),
            gear_ratios: GearRatios::default(),
            differential_ratio: 3.42,
            shift_points: ShiftPoints::default(),
            max_body_roll: 5.0,
            max_camber: 5.0,
            suspension: SuspensionConfig::default(),
            max_speed: 260.0,
            max_fuel: 18.0,
            fuel_consumption: 0.01,
            input: InputTuning::default(),
            terrain: TerrainConfig::default(),
        }
    }
}

impl Default for SuspensionConfig {
    fn default() -> Self {
        SuspensionConfig {
            rest_front: 0.8,
            rest_rear: 0.8,
            stiffness_front: 12500.0,
            stiffness_rear: 12500.0,
        }
    }
}

impl Default for InputTuning {
    fn default() -> Self {
        InputTuning {
            throttle_rise: 1.0,
            throttle_fall: 5.0,
            brake_rise: 10.0,
            brake_fall: 10.0,
            steer_step: 0.02,
            pointer_dead_zone: 50.0,
        }
    }
}

impl Default for TerrainConfig {
    fn default() -> Self {
        TerrainConfig::Noise {
            seed: 42,
            bumpiness: 0.01,
            bump_height: 0.1,
        }
    }
}

/// Torque in N·m over engine rpm.
fn corvette_torque() -> Curve {
    Curve::from_table(&[
        (0.0, 0.0),
        (1000.0, 400.0),
        (2000.0, 433.0),
        (3000.0, 450.0),
        (4000.0, 470.0),
        (4400.0, 475.0),
        (5000.0, 430.0),
        (5500.0, 400.0),
        (6000.0, 350.0),
        (7000.0, 330.0),
    ])
}

fn positive(value: f32, field: &'static str) -> Result<(), ConfigError> {
    if value > 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::NonPositive(field))
    }
}

impl VehicleConfig {
    pub fn wheel_base(&self) -> f32 {
        self.cg_to_front_axle + self.cg_to_rear_axle
    }

    pub fn track_width(&self) -> f32 {
        self.half_width * 2.0
    }

    pub fn weight(&self) -> f32 {
        self.mass * self.gravity
    }

    pub fn from_json_str(json: &str) -> Result<VehicleConfig, ConfigError> {
        let config: VehicleConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load_json<P: AsRef<Path>>(path: P) -> Result<VehicleConfig, ConfigError> {
        let text = fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    pub fn save_json<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        positive(self.gravity, "gravity")?;
        positive(self.mass, "mass")?;
        positive(self.yaw_inertia, "yaw_inertia")?;
        positive(self.cg_to_front_axle, "cg_to_front_axle")?;
        positive(self.cg_to_rear_axle, "cg_to_rear_axle")?;
        positive(self.half_width, "half_width")?;
        positive(self.wheel_radius, "wheel_radius")?;
        positive(self.length_unit, "length_unit")?;
        positive(self.differential_ratio, "differential_ratio")?;
        positive(self.max_steer, "max_steer")?;
        positive(self.max_fuel, "max_fuel")?;
        positive(self.suspension.stiffness_front, "suspension.stiffness_front")?;
        positive(self.suspension.stiffness_rear, "suspension.stiffness_rear")?;
        positive(self.engine_red, "engine_red")?;
        if !(self.engine_idle >= 0.0 && self.engine_idle < self.engine_red) {
            return Err(ConfigError::EngineRange {
                idle: self.engine_idle,
                red: self.engine_red,
            });
        }
        self.gear_ratios.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let c = VehicleConfig::default();
        c.validate().unwrap();
        assert_eq!(c.wheel_base(), 2.5);
        assert_eq!(c.track_width(), 1.9);
        assert_eq!(c.ebrake_force, 4800.0);
        assert_eq!(c.torque_curve.interpolate(4400.0), 475.0);
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let c = VehicleConfig::from_json_str(
            r#"{ "mass": 1500, "gear_ratios": { "reverse": 3.1 }, "terrain": { "kind": "flat", "height": 0.0 } }"#,
        )
        .unwrap();
        assert_eq!(c.mass, 1500.0);
        assert_eq!(c.gear_ratios.reverse, 3.1);
        assert_eq!(c.gear_ratios.forward[0], 2.66);
        assert_eq!(c.terrain, TerrainConfig::Flat { height: 0.0 });
        assert_eq!(c.engine_red, 7000.0);
    }

    #[test]
    fn json_round_trip_of_defaults() {
        let c = VehicleConfig::default();
        let text = serde_json::to_string(&c).unwrap();
        assert_eq!(VehicleConfig::from_json_str(&text).unwrap(), c);
    }

    #[test]
    fn short_torque_curve_is_fatal() {
        let e = VehicleConfig::from_json_str(r#"{ "torque_curve": [[0, 100]] }"#).unwrap_err();
        assert!(matches!(e, ConfigError::Json(_)), "got {:?}", e);
        assert!(e.to_string().contains("at least 2 points"));
    }

    #[test]
    fn validation_catches_bad_geometry() {
        let mut c = VehicleConfig::default();
        c.wheel_radius = 0.0;
        assert!(matches!(c.validate(), Err(ConfigError::NonPositive("wheel_radius"))));

        let mut c = VehicleConfig::default();
        c.engine_idle = 8000.0;
        assert!(matches!(c.validate(), Err(ConfigError::EngineRange { .. })));

        let mut c = VehicleConfig::default();
        c.mass = f32::NAN;
        assert!(c.validate().is_err());
    }
}
