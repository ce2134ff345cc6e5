use crate::config::VehicleConfig;
use crate::state::VehicleState;
use crate::transmission::Gear;
use crate::vector::Vector2;
use serde::{Deserialize, Serialize};

#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dashboard {
    pub rpm: f32,
    /// km/h
    pub speed: f32,
    /// mph
    pub imperial_speed: f32,
    pub fuel: f32,
    pub max_fuel: f32,
    pub max_speed: f32,
    pub engine_red: f32,
    pub gear: Gear,
    pub steering_angle: f32,
    pub steering_wheel: f32,
    pub position: Vector2,
    pub yaw: f32,
    pub wheel_rotation: [f32; 4],
    pub distance_km: f32,
}

impl Dashboard {
    pub fn new(config: &VehicleConfig, state: &VehicleState) -> Dashboard {
        Dashboard {
            rpm: state.rpm,
            speed: state.speed,
            imperial_speed: state.imperial_speed,
            fuel: state.fuel,
            max_fuel: config.max_fuel,
            max_speed: config.max_speed,
            engine_red: config.engine_red,
            gear: state.gear,
            steering_angle: state.steering_angle,
            steering_wheel: state.rig.steering_wheel,
            position: state.position,
            yaw: state.yaw,
            wheel_rotation: state.rig.wheel_rotation,
            distance_km: state.distance_km,
        }
    }

    /// Needle position of the rev counter in 0..=1, idle at 0.
    pub fn rpm_gauge(&self, engine_idle: f32) -> f32 {
        gauge(self.rpm - engine_idle, self.engine_red - engine_idle)
    }

    pub fn speed_gauge(&self) -> f32 {
        gauge(self.speed.abs(), self.max_speed)
    }

    pub fn fuel_gauge(&self) -> f32 {
        gauge(self.fuel, self.max_fuel)
    }
}

fn gauge(value: f32, full_scale: f32) -> f32 {
    let f = value / full_scale;
    if f.is_finite() {
        f.max(0.0).min(1.0)
    } else {
        0.0
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct AudioCue {
    /// Playback speed, 1 is the recorded pitch.
    pub rate: f32,
    pub volume: f32,
}

impl AudioCue {
    /// `volume_setting` is the user's master volume in 0..=1.
    pub fn from_engine(rpm: f32, throttle: f32, volume_setting: f32) -> AudioCue {
        let rate = rpm / 1000.0 * 2.0 + 1.0;
        let rate = if rate.is_finite() { rate } else { 1.0 };
        let volume = (throttle + 0.3) * volume_setting;
        let volume = if volume.is_finite() {
            volume.max(0.0).min(1.0)
        } else {
            0.0
        };
        AudioCue { rate, volume }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn engine_pitch_follows_rpm() {
        let cue = AudioCue::from_engine(3000.0, 1.0, 0.5);
        assert_eq!(cue.rate, 7.0);
        assert!((cue.volume - 0.65).abs() < 1e-6);

        assert_eq!(AudioCue::from_engine(f32::NAN, 0.0, 1.0).rate, 1.0);
        assert_eq!(AudioCue::from_engine(1000.0, 1.0, 3.0).volume, 1.0);
        assert_eq!(AudioCue::from_engine(1000.0, 0.0, 0.0).volume, 0.0);
    }

    #[test]
    fn gauges_stay_on_the_dial() {
        let config = VehicleConfig::default();
        let mut state = VehicleState::new(&config);
        state.rpm = 4000.0;
        state.speed = -30.0;
        state.fuel = 9.0;
        let d = Dashboard::new(&config, &state);
        assert!((d.rpm_gauge(config.engine_idle) - 0.5).abs() < 1e-6);
        assert!((d.speed_gauge() - 30.0 / 260.0).abs() < 1e-6);
        assert_eq!(d.fuel_gauge(), 0.5);
        assert_eq!(gauge(1.0, 0.0), 0.0);
    }

    #[test]
    fn dashboard_serializes() {
        let config = VehicleConfig::default();
        let state = VehicleState::new(&config);
        let json = serde_json::to_value(Dashboard::new(&config, &state)).unwrap();
        assert_eq!(json["gear"], 1);
        assert_eq!(json["max_fuel"], 18.0);
    }
}
