use anyhow::{bail, Context, Result};
use carsim::playback::{InputRecorder, InputRecording};
use carsim::random_driver::RandomDriver;
use carsim::timer::SpeedTimer;
use carsim::utilities::ConfigWatcher;
use carsim::{InputSnapshot, Vehicle, VehicleConfig};
use clap::Parser;
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "carsim", version, about = "Drive the car model without a window")]
struct Opts {
    /// Vehicle config (.json); defaults to the built-in car
    #[arg(long)]
    config: Option<PathBuf>,

    /// Replay a recorded input file instead of the random driver
    #[arg(long)]
    replay: Option<PathBuf>,

    /// Save the driven inputs to this file
    #[arg(long)]
    record: Option<PathBuf>,

    /// Seed of the random driver
    #[arg(long, default_value_t = 1)]
    seed: u64,

    /// Number of ticks to run (random driver only)
    #[arg(long, default_value_t = 3600)]
    ticks: usize,

    /// Seconds per tick
    #[arg(long, default_value_t = 1.0 / 60.0)]
    dt: f32,

    /// Reload the config file when it changes
    #[arg(long)]
    watch: bool,

    /// Print the dashboard as a JSON line every second of simulated time
    #[arg(long)]
    json: bool,

    /// Engine sample to play
    #[cfg(feature = "audio")]
    #[arg(long)]
    sound: Option<PathBuf>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let opt = Opts::parse();
    if !(opt.dt.is_finite() && opt.dt > 0.0) {
        bail!("--dt must be a positive number of seconds, got {}", opt.dt);
    }

    let config = match &opt.config {
        Some(path) => VehicleConfig::load_json(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => VehicleConfig::default(),
    };
    let mut car = Vehicle::new(config)?;

    let watcher = match (&opt.config, opt.watch) {
        (Some(path), true) => Some(ConfigWatcher::new(path)?),
        (None, true) => bail!("--watch needs --config"),
        _ => None,
    };

    let replay = match &opt.replay {
        Some(path) => Some(
            InputRecording::load_json(path).with_context(|| format!("loading {}", path.display()))?,
        ),
        None => None,
    };

    let dt = match &replay {
        Some(recording) if recording.dt > 0.0 => recording.dt,
        _ => opt.dt,
    };

    #[cfg(feature = "audio")]
    let engine = opt
        .sound
        .clone()
        .map(|path| carsim::sounds::EngineSound::new(path));

    let mut recorder = opt.record.as_ref().map(|_| InputRecorder::new(dt));
    let mut timer = SpeedTimer::default();
    let mut driver = RandomDriver::new(opt.seed);
    let inputs: Box<dyn Iterator<Item = InputSnapshot>> = match &replay {
        Some(recording) => Box::new(recording.playback()),
        None => Box::new(std::iter::repeat(InputSnapshot::idle()).take(opt.ticks)),
    };

    let report_every = (1.0 / dt).round().max(1.0) as usize;
    let mut tick = 0;
    for scripted in inputs {
        if let Some(watcher) = &watcher {
            match watcher.poll() {
                Some(Ok(config)) => car.reload_config(config)?,
                Some(Err(e)) => warn!(path = %watcher.path().display(), "ignoring broken config: {}", e),
                None => {}
            }
        }

        let input = match &replay {
            Some(_) => scripted,
            None => driver.next_input(car.state().speed, dt),
        };
        if let Some(recorder) = &mut recorder {
            recorder.record(&input);
        }

        car.update(&input, dt);
        let state = car.state();
        timer.update(state.speed, state.imperial_speed, dt);

        #[cfg(feature = "audio")]
        if let Some(engine) = &engine {
            engine.update(car.audio_cue(1.0));
        }

        tick += 1;
        if opt.json && tick % report_every == 0 {
            println!("{}", serde_json::to_string(&car.dashboard())?);
        }
    }

    let d = car.dashboard();
    let diagnostics = car.diagnostics();
    info!(
        ticks = diagnostics.ticks,
        rejected = diagnostics.rejected_ticks,
        recovered = diagnostics.recovered_values,
        shifts = diagnostics.gear_shifts,
        distance_km = d.distance_km,
        fuel = d.fuel,
        "finished"
    );

    if let (Some(path), Some(recorder)) = (&opt.record, recorder) {
        recorder
            .finish()
            .save_json(path)
            .with_context(|| format!("saving {}", path.display()))?;
        info!(path = %path.display(), "saved input recording");
    }

    Ok(())
}
