use crate::config::VehicleConfig;
use crate::input::{resolve_inputs, InputSnapshot};
use crate::rig::{self, SuspensionPose};
use crate::state::VehicleState;
use crate::terrain::{ContactHeights, HeightField};
use crate::vector::{wrap_angle, Planar, Vector2};
use crate::weight_transfer::WeightTransfer;
use std::f32::consts::PI;
use tracing::debug;

/// m/s, divided by the gear ratio.
pub const STOP_SPEED: f32 = 0.01;
pub const BRAKE_HOLD_SPEED: f32 = 1.0;

const MS_TO_KMH: f32 = 3.6;
const KMH_TO_MPH: f32 = 0.621371;

// 0 for 0 and NaN, unlike f32::signum
pub fn sign(x: f32) -> f32 {
    if x > 0.0 {
        1.0
    } else if x < 0.0 {
        -1.0
    } else {
        0.0
    }
}

fn clamp(x: f32, lo: f32, hi: f32) -> f32 {
    x.max(lo).min(hi)
}

fn finite_or_zero(x: f32, recovered: &mut u32) -> f32 {
    if x.is_finite() {
        x
    } else {
        *recovered += 1;
        0.0
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Default)]
pub struct StepReport {
    pub front_cornering: f32,
    pub rear_cornering: f32,
    pub drive_force: f32,
    pub traction: Vector2,
    pub net_force: Vector2,
    pub angular_torque: f32,
    pub shifted: bool,
    pub stopped: bool,
    /// Intermediates that came out NaN or infinite and were replaced by 0.
    pub recovered: u32,
}

pub fn engine_rpm(config: &VehicleConfig, state: &VehicleState) -> f32 {
    let ratio = config.gear_ratios.ratio(state.gear);
    let along_gear = if state.gear.is_reverse() {
        -state.local_velocity.x
    } else {
        state.local_velocity.x
    };
    along_gear * 60.0 * ratio * config.differential_ratio / (2.0 * PI * config.wheel_radius)
}

// In reverse the drive force pushes backward and the brake opposes the motion.
pub fn step(
    config: &VehicleConfig,
    state: &mut VehicleState,
    input: &InputSnapshot,
    terrain: &dyn HeightField,
    dt: f32,
) -> StepReport {
    let mut report = StepReport::default();

    resolve_inputs(config, state, input, dt);

    state.local_velocity = state.velocity.rotated(-state.yaw);

    let contacts = rig::wheel_contacts(config, state.position, state.yaw);
    let ground = ContactHeights::sample(terrain, &contacts);
    let ground = if ground.is_finite() {
        ground
    } else {
        report.recovered += 1;
        ContactHeights::default()
    };

    let wt = WeightTransfer::compute(config, state.local_acceleration, &ground);
    state.loads = wt.loads;
    state.body_roll = wt.body_roll;
    state.camber = wt.camber;
    let front_load = wt.loads.front_axle();
    let rear_load = wt.loads.rear_axle();

    let v = state.local_velocity;
    let yaw_speed_front = config.cg_to_front_axle * state.yaw_rate;
    let yaw_speed_rear = -config.cg_to_rear_axle * state.yaw_rate;

    state.sideslip_angle = wrap_angle(state.yaw - state.velocity.direction());
    state.slip_angle_front =
        (v.y + yaw_speed_front).atan2(v.x.abs()) - sign(v.x) * state.steering_angle;
    state.slip_angle_rear = (v.y + yaw_speed_rear).atan2(v.x.abs());

    let grip_front = config.tire_grip;
    let grip_rear = config.tire_grip * (1.0 - state.ebrake * (1.0 - config.lock_grip));

    let friction_front = clamp(
        -config.corner_stiffness_front * state.slip_angle_front,
        -grip_front,
        grip_front,
    ) * front_load;
    let friction_rear = clamp(
        -config.corner_stiffness_rear * state.slip_angle_rear,
        -grip_rear,
        grip_rear,
    ) * rear_load;
    report.front_cornering = friction_front;
    report.rear_cornering = friction_rear;

    let mut rpm = engine_rpm(config, state);
    if state.gear.is_neutral() {
        rpm = config.engine_idle + state.throttle * config.engine_red;
    }
    if rpm > config.engine_red {
        state.throttle = 0.0;
    }
    if input.automatic {
        let next = config.shift_points.next_gear(state.gear, rpm);
        if next != state.gear {
            debug!(from = %state.gear, to = %next, rpm, "automatic shift");
            state.gear = next;
            report.shifted = true;
        }
    }
    state.rpm = clamp(
        finite_or_zero(rpm, &mut report.recovered),
        config.engine_idle,
        config.engine_red,
    );

    let ratio = config.gear_ratios.ratio(state.gear);
    let max_torque = config.torque_curve.interpolate(state.rpm).max(0.0);
    let engine_torque = state.throttle * max_torque;
    let drive_torque = engine_torque * ratio * config.differential_ratio;
    report.drive_force = (drive_torque / config.wheel_radius).min(rear_load);

    let brake = (state.brake * config.brake_force + state.ebrake * config.ebrake_force)
        .min(config.brake_force);
    let drive_direction = if state.gear.is_reverse() { -1.0 } else { 1.0 };
    report.traction = Vector2::new(
        drive_direction * state.throttle * report.drive_force - brake * sign(v.x),
        0.0,
    );

    let drag = Vector2::new(v.x * v.x.abs(), v.y * v.y.abs()) * -config.drag;
    let rolling = v * -config.rolling_resistance;
    state.cornering_force = state.steering_angle.cos() * friction_front + friction_rear;

    let mut net = report.traction + drag + rolling;
    net.y += state.cornering_force;
    report.net_force = net;

    state.local_acceleration = Vector2::new(
        finite_or_zero(net.x / config.mass, &mut report.recovered),
        finite_or_zero(net.y / config.mass, &mut report.recovered),
    );
    state.acceleration = state.local_acceleration.rotated(state.yaw);
    state.velocity += state.acceleration * dt;

    let mut angular_torque = (friction_front + report.traction.y) * config.cg_to_front_axle
        - friction_rear * config.cg_to_rear_axle;

    let abs_velocity = state.velocity.length();
    let stop_ratio = if ratio > 0.0 { ratio } else { 1.0 };
    if abs_velocity < STOP_SPEED / stop_ratio
        || (abs_velocity < BRAKE_HOLD_SPEED && state.brake >= 1.0)
    {
        state.velocity = Vector2::ZERO;
        angular_torque = 0.0;
        state.yaw_rate = 0.0;
        state.cornering_force = 0.0;
        report.stopped = true;
    }
    report.angular_torque = angular_torque;

    state.yaw_rate += angular_torque / config.yaw_inertia * dt;
    state.yaw += state.yaw_rate * dt;

    state.position += rig::to_scene(state.velocity) * (dt * config.length_unit);

    state.local_velocity = state.velocity.rotated(-state.yaw);
    state.speed = state.local_velocity.x * MS_TO_KMH;
    state.imperial_speed = state.speed * KMH_TO_MPH;
    state.distance_km += state.local_velocity.x.abs() * dt / 1000.0;

    let burn = config.fuel_consumption * state.throttle * state.rpm / config.engine_red * dt;
    state.fuel = (state.fuel - burn).max(0.0);

    let pose = SuspensionPose::fit(config, &ground, &state.loads);
    state
        .rig
        .update(config, state.speed, state.steering_angle, &ground, pose, dt);

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::terrain::FlatGround;
    use crate::transmission::Gear;

    fn setup() -> (VehicleConfig, VehicleState) {
        let config = VehicleConfig::default();
        let state = VehicleState::new(&config);
        (config, state)
    }

    #[test]
    fn sign_of_zero_is_zero() {
        assert_eq!(sign(0.0), 0.0);
        assert_eq!(sign(-0.0), 0.0);
        assert_eq!(sign(f32::NAN), 0.0);
        assert_eq!(sign(-3.0), -1.0);
    }

    #[test]
    fn rpm_follows_wheel_speed() {
        let (config, mut state) = setup();
        state.local_velocity = Vector2::new(10.0, 0.0);
        let expected = 10.0 * 60.0 * 2.66 * 3.42 / (2.0 * PI * 0.358);
        assert!((engine_rpm(&config, &state) - expected).abs() < 0.5);

        state.gear = Gear::REVERSE;
        state.local_velocity = Vector2::new(-10.0, 0.0);
        assert!(engine_rpm(&config, &state) > 0.0);
    }

    #[test]
    fn neutral_revs_with_throttle() {
        let (config, mut state) = setup();
        state.gear = Gear::NEUTRAL;
        state.throttle = 0.5;
        let input = InputSnapshot::throttle();
        step(&config, &mut state, &input, &FlatGround(0.0), 0.0001);
        assert!(state.rpm > 4000.0 && state.rpm <= config.engine_red);
        assert_eq!(state.velocity, Vector2::ZERO);
    }

    #[test]
    fn over_revving_cuts_the_throttle() {
        let (config, mut state) = setup();
        state.velocity = Vector2::new(40.0, 0.0);
        state.throttle = 1.0;
        step(&config, &mut state, &InputSnapshot::throttle(), &FlatGround(0.0), 0.01);
        assert_eq!(state.throttle, 0.0);
        assert_eq!(state.rpm, config.engine_red);
    }

    #[test]
    fn automatic_gearbox_upshifts_at_high_rpm() {
        let (config, mut state) = setup();
        state.velocity = Vector2::new(22.0, 0.0);
        let input = InputSnapshot {
            automatic: true,
            ..InputSnapshot::throttle()
        };
        let report = step(&config, &mut state, &input, &FlatGround(0.0), 0.01);
        assert!(report.shifted);
        assert_eq!(state.gear.index(), 2);
    }

    #[test]
    fn braking_opposes_motion_in_reverse_too() {
        let (config, mut state) = setup();
        state.gear = Gear::REVERSE;
        state.velocity = Vector2::new(5.0, 0.0);
        let report = step(&config, &mut state, &InputSnapshot::brake(), &FlatGround(0.0), 0.01);
        assert!(report.traction.x < 0.0);
        assert!(state.velocity.x < 5.0);
    }

    #[test]
    fn reverse_drives_backward() {
        let (config, mut state) = setup();
        state.gear = Gear::REVERSE;
        state.throttle = 1.0;
        let report = step(&config, &mut state, &InputSnapshot::throttle(), &FlatGround(0.0), 0.05);
        assert!(report.traction.x < 0.0);
        assert!(state.local_velocity.x < 0.0);
    }

    #[test]
    fn drive_force_is_capped_by_rear_load() {
        let (config, mut state) = setup();
        state.throttle = 1.0;
        state.velocity = Vector2::new(8.0, 0.0);
        let report = step(&config, &mut state, &InputSnapshot::throttle(), &FlatGround(0.0), 0.01);
        assert!(report.drive_force <= state.loads.rear_axle() + 1e-3);
        assert!(report.drive_force > 0.0);
    }

    #[test]
    fn burns_fuel_under_throttle() {
        let (config, mut state) = setup();
        state.velocity = Vector2::new(10.0, 0.0);
        state.throttle = 1.0;
        for _ in 0..60 {
            step(&config, &mut state, &InputSnapshot::throttle(), &FlatGround(0.0), 1.0 / 60.0);
        }
        assert!(state.fuel < config.max_fuel);
        assert!(state.distance_km > 0.0);
    }

    #[test]
    fn ebrake_reduces_rear_grip() {
        let (config, mut state) = setup();
        state.velocity = Vector2::new(15.0, 8.0);
        let mut pulled = state.clone();

        let free = step(&config, &mut state, &InputSnapshot::idle(), &FlatGround(0.0), 0.01);
        let input = InputSnapshot {
            ebrake: true,
            ..Default::default()
        };
        let locked = step(&config, &mut pulled, &input, &FlatGround(0.0), 0.01);
        assert!(locked.rear_cornering.abs() < free.rear_cornering.abs());
    }

    #[test]
    fn sideslip_stays_within_one_turn() {
        let (config, mut state) = setup();
        state.yaw = 14.0 * PI + 0.3;
        state.velocity = Vector2::new(10.0, 0.0).rotated(state.yaw);
        step(&config, &mut state, &InputSnapshot::idle(), &FlatGround(0.0), 0.001);
        assert!(state.sideslip_angle.abs() < 1e-2, "sideslip {}", state.sideslip_angle);

        state.yaw = -9.0 * PI;
        state.velocity = Vector2::new(0.0, 10.0);
        step(&config, &mut state, &InputSnapshot::idle(), &FlatGround(0.0), 0.001);
        assert!(state.sideslip_angle > -PI && state.sideslip_angle <= PI);
    }

    #[test]
    fn wheels_spin_with_the_speedometer() {
        let (config, mut state) = setup();
        state.velocity = Vector2::new(-10.0, 0.0);
        step(&config, &mut state, &InputSnapshot::idle(), &FlatGround(0.0), 0.001);
        assert!(state.speed < -30.0);
        assert!((state.rig.wheel_spin_rate - state.speed / config.wheel_radius).abs() < 1e-3);
    }
}
