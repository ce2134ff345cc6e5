pub mod config;
pub mod curve;
pub mod error;
pub mod input;
pub mod physics;
pub mod playback;
pub mod random_driver;
pub mod rig;
#[cfg(feature = "audio")]
pub mod sounds;
pub mod state;
pub mod telemetry;
pub mod terrain;
pub mod timer;
pub mod transmission;
pub mod utilities;
pub mod vector;
pub mod vehicle;
pub mod weight_transfer;

pub use config::VehicleConfig;
pub use curve::Curve;
pub use error::{ConfigError, SimError};
pub use input::{GearSelect, InputSnapshot, Steering};
pub use state::VehicleState;
pub use telemetry::{AudioCue, Dashboard};
pub use transmission::Gear;
pub use vector::Vector2;
pub use vehicle::{Diagnostics, Vehicle};
