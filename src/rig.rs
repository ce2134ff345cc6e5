use crate::config::VehicleConfig;
use crate::state::WheelLoads;
use crate::terrain::{ContactHeights, Wheel};
use crate::vector::{Planar, Vector2};
use serde::{Deserialize, Serialize};
use std::f32::consts::PI;

pub const STEERING_WHEEL_RATIO: f32 = 6.0;

/// Body frame (x forward, y left) to the scene's X/Z ground plane.
pub fn to_scene(v: Vector2) -> Vector2 {
    Vector2::new(-v.y, -v.x)
}

pub fn wheel_offset(config: &VehicleConfig, wheel: Wheel) -> Vector2 {
    let x = if wheel.is_front() {
        config.cg_to_front_axle
    } else {
        -config.cg_to_rear_axle
    };
    let y = if wheel.is_left() {
        config.half_width
    } else {
        -config.half_width
    };
    Vector2::new(x, y)
}

pub fn wheel_contacts(config: &VehicleConfig, position: Vector2, yaw: f32) -> [Vector2; 4] {
    let mut contacts = [Vector2::ZERO; 4];
    for wheel in Wheel::ALL.iter() {
        let offset = wheel_offset(config, *wheel).rotated(yaw);
        contacts[*wheel as usize] = position + to_scene(offset) * config.length_unit;
    }
    contacts
}

#[derive(Debug, Copy, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SuspensionPose {
    pub spring_compression: [f32; 4],
    pub corner_heights: [f32; 4],
    pub ride_height: f32,
    /// Nose up is positive.
    pub pitch: f32,
    /// Left side up is positive.
    pub roll: f32,
}

impl SuspensionPose {
    pub fn fit(config: &VehicleConfig, ground: &ContactHeights, loads: &WheelLoads) -> SuspensionPose {
        let s = &config.suspension;
        let mut pose = SuspensionPose::default();

        for wheel in Wheel::ALL.iter() {
            let (rest, stiffness) = if wheel.is_front() {
                (s.rest_front, s.stiffness_front)
            } else {
                (s.rest_rear, s.stiffness_rear)
            };
            let i = *wheel as usize;
            pose.spring_compression[i] = loads.get(*wheel) / stiffness;
            pose.corner_heights[i] = ground.get(*wheel) + rest - pose.spring_compression[i];
        }

        let c = |w: Wheel| pose.corner_heights[w as usize];
        let front = (c(Wheel::FrontLeft) + c(Wheel::FrontRight)) / 2.0;
        let rear = (c(Wheel::RearLeft) + c(Wheel::RearRight)) / 2.0;
        let left = (c(Wheel::FrontLeft) + c(Wheel::RearLeft)) / 2.0;
        let right = (c(Wheel::FrontRight) + c(Wheel::RearRight)) / 2.0;

        pose.ride_height = (front + rear) / 2.0;
        pose.pitch = (front - rear).atan2(config.wheel_base());
        pose.roll = (left - right).atan2(config.track_width());
        pose
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Rig {
    /// Signed km/h per metre of wheel radius, the rate the wheel meshes turn at.
    pub wheel_spin_rate: f32,
    /// Accumulated roll of each wheel, kept within one turn.
    pub wheel_rotation: [f32; 4],
    pub steering_linkage: f32,
    pub steering_wheel: f32,
    /// Wheel centre heights above the scene origin.
    pub wheel_heights: [f32; 4],
    pub suspension: SuspensionPose,
}

impl Rig {
    pub fn update(
        &mut self,
        config: &VehicleConfig,
        speed: f32,
        steering_angle: f32,
        ground: &ContactHeights,
        suspension: SuspensionPose,
        dt: f32,
    ) {
        self.wheel_spin_rate = speed / config.wheel_radius;
        let delta = self.wheel_spin_rate * dt;
        for rotation in self.wheel_rotation.iter_mut() {
            *rotation = (*rotation + delta).rem_euclid(2.0 * PI);
        }
        for (height, ground) in self.wheel_heights.iter_mut().zip(ground.0.iter()) {
            *height = ground + config.wheel_radius;
        }

        self.steering_linkage = steering_angle;
        self.steering_wheel = -steering_angle * STEERING_WHEEL_RATIO;
        self.suspension = suspension;
    }

    pub fn is_finite(&self) -> bool {
        self.wheel_spin_rate.is_finite()
            && self.wheel_rotation.iter().all(|r| r.is_finite())
            && self.wheel_heights.iter().all(|h| h.is_finite())
            && self.suspension.ride_height.is_finite()
            && self.suspension.pitch.is_finite()
            && self.suspension.roll.is_finite()
    }
}
