use crate::config::VehicleConfig;
use crate::rig::Rig;
use crate::terrain::Wheel;
use crate::transmission::Gear;
use crate::vector::Vector2;
use serde::{Deserialize, Serialize};

/// Normal load on each wheel in newtons, indexed by `Wheel`.
#[derive(Debug, Copy, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct WheelLoads(pub [f32; 4]);

impl WheelLoads {
    pub fn get(&self, wheel: Wheel) -> f32 {
        self.0[wheel as usize]
    }

    pub fn front_axle(&self) -> f32 {
        self.get(Wheel::FrontLeft) + self.get(Wheel::FrontRight)
    }

    pub fn rear_axle(&self) -> f32 {
        self.get(Wheel::RearLeft) + self.get(Wheel::RearRight)
    }

    pub fn total(&self) -> f32 {
        self.front_axle() + self.rear_axle()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VehicleState {
    /// Scene X/Z plane.
    pub position: Vector2,
    pub yaw: f32,
    pub yaw_rate: f32,

    pub velocity: Vector2,
    pub local_velocity: Vector2,
    pub acceleration: Vector2,
    pub local_acceleration: Vector2,

    pub sideslip_angle: f32,
    pub slip_angle_front: f32,
    pub slip_angle_rear: f32,
    pub cornering_force: f32,

    pub loads: WheelLoads,
    /// Degrees.
    pub body_roll: f32,
    /// Degrees.
    pub camber: f32,

    pub rpm: f32,
    pub gear: Gear,
    pub throttle: f32,
    pub brake: f32,
    pub ebrake: f32,
    pub steering_angle: f32,

    pub fuel: f32,
    pub distance_km: f32,
    /// km/h, signed along the body axis.
    pub speed: f32,
    /// mph
    pub imperial_speed: f32,

    pub rig: Rig,
}

impl VehicleState {
    pub fn new(config: &VehicleConfig) -> VehicleState {
        VehicleState {
            position: Vector2::ZERO,
            yaw: 0.0,
            yaw_rate: 0.0,
            velocity: Vector2::ZERO,
            local_velocity: Vector2::ZERO,
            acceleration: Vector2::ZERO,
            local_acceleration: Vector2::ZERO,
            sideslip_angle: 0.0,
            slip_angle_front: 0.0,
            slip_angle_rear: 0.0,
            cornering_force: 0.0,
            loads: WheelLoads::default(),
            body_roll: 0.0,
            camber: 0.0,
            rpm: config.engine_idle,
            gear: Gear::FIRST,
            throttle: 0.0,
            brake: 0.0,
            ebrake: 0.0,
            steering_angle: 0.0,
            fuel: config.max_fuel,
            distance_km: 0.0,
            speed: 0.0,
            imperial_speed: 0.0,
            rig: Rig::default(),
        }
    }

    pub fn reset_motion(&mut self) {
        self.position = Vector2::ZERO;
        self.yaw = 0.0;
        self.yaw_rate = 0.0;
        self.velocity = Vector2::ZERO;
        self.local_velocity = Vector2::ZERO;
        self.acceleration = Vector2::ZERO;
        self.local_acceleration = Vector2::ZERO;
        self.speed = 0.0;
        self.imperial_speed = 0.0;
    }

    pub fn abs_velocity(&self) -> f32 {
        self.velocity.length()
    }

    pub fn is_finite(&self) -> bool {
        self.position.is_finite()
            && self.yaw.is_finite()
            && self.yaw_rate.is_finite()
            && self.velocity.is_finite()
            && self.local_velocity.is_finite()
            && self.acceleration.is_finite()
            && self.local_acceleration.is_finite()
            && self.rpm.is_finite()
            && self.speed.is_finite()
            && self.imperial_speed.is_finite()
            && self.loads.0.iter().all(|l| l.is_finite())
            && self.rig.is_finite()
    }
}
