use crate::config::VehicleConfig;
use crate::error::SimError;
use crate::input::InputSnapshot;
use crate::physics::{self, StepReport};
use crate::state::VehicleState;
use crate::telemetry::{AudioCue, Dashboard};
use crate::terrain::Terrain;
use tracing::{debug, warn};

#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct Diagnostics {
    pub ticks: u64,
    /// Ticks dropped because of a bad `dt` or a non-finite result.
    pub rejected_ticks: u64,
    /// Intermediate values replaced by 0 inside committed ticks.
    pub recovered_values: u64,
    pub gear_shifts: u64,
}

pub struct Vehicle {
    config: VehicleConfig,
    state: VehicleState,
    terrain: Terrain,
    diagnostics: Diagnostics,
}

impl Vehicle {
    pub fn new(config: VehicleConfig) -> Result<Vehicle, SimError> {
        config.validate()?;
        let state = VehicleState::new(&config);
        let terrain = Terrain::from_config(&config.terrain);
        Ok(Vehicle {
            config,
            state,
            terrain,
            diagnostics: Diagnostics::default(),
        })
    }

    pub fn config(&self) -> &VehicleConfig {
        &self.config
    }

    pub fn state(&self) -> &VehicleState {
        &self.state
    }

    pub fn diagnostics(&self) -> Diagnostics {
        self.diagnostics
    }

    /// `None` if the tick was dropped; the state is then unchanged.
    pub fn update(&mut self, input: &InputSnapshot, dt: f32) -> Option<StepReport> {
        self.diagnostics.ticks += 1;
        if !(dt.is_finite() && dt > 0.0) {
            self.diagnostics.rejected_ticks += 1;
            warn!(dt, "rejected tick with invalid time step");
            return None;
        }

        let mut next = self.state.clone();
        let report = physics::step(&self.config, &mut next, input, &self.terrain, dt);
        if !next.is_finite() {
            self.diagnostics.rejected_ticks += 1;
            warn!(
                dt,
                rejected = self.diagnostics.rejected_ticks,
                "dropped tick with non-finite result"
            );
            return None;
        }

        self.diagnostics.recovered_values += report.recovered as u64;
        if report.shifted {
            self.diagnostics.gear_shifts += 1;
        }
        self.state = next;
        Some(report)
    }

    pub fn dashboard(&self) -> Dashboard {
        Dashboard::new(&self.config, &self.state)
    }

    pub fn audio_cue(&self, volume_setting: f32) -> AudioCue {
        AudioCue::from_engine(self.state.rpm, self.state.throttle, volume_setting)
    }

    pub fn reset(&mut self) {
        self.state.reset_motion();
        self.state.throttle = 0.0;
        self.state.brake = 0.0;
        self.state.steering_angle = 0.0;
    }

    pub fn reload_config(&mut self, config: VehicleConfig) -> Result<(), SimError> {
        config.validate()?;
        if config.terrain != self.config.terrain {
            self.terrain = Terrain::from_config(&config.terrain);
        }

        let s = &mut self.state;
        s.steering_angle = s.steering_angle.max(-config.max_steer).min(config.max_steer);
        s.fuel = s.fuel.min(config.max_fuel);
        s.rpm = s.rpm.max(config.engine_idle).min(config.engine_red);

        debug!(mass = config.mass, "reloaded vehicle config");
        self.config = config;
        Ok(())
    }
}
