use crate::config::VehicleConfig;
use crate::error::{ConfigError, SimError};
use notify::{DebouncedEvent, RecommendedWatcher, RecursiveMode, Watcher};
use std::path::{Path, PathBuf};
use std::sync::mpsc::{channel, Receiver};
use std::time::Duration;

pub fn watch(paths: Vec<&Path>) -> notify::Result<(RecommendedWatcher, Receiver<DebouncedEvent>)> {
    let (tx, rx) = channel();
    let mut watcher: RecommendedWatcher = Watcher::new(tx, Duration::from_secs_f32(0.2))?;

    for p in paths.into_iter() {
        watcher.watch(p, RecursiveMode::NonRecursive)?;
    }

    Ok((watcher, rx))
}

pub struct ConfigWatcher {
    path: PathBuf,
    _watcher: RecommendedWatcher,
    events: Receiver<DebouncedEvent>,
}

impl ConfigWatcher {
    pub fn new<P: AsRef<Path>>(path: P) -> Result<ConfigWatcher, SimError> {
        let path = path.as_ref().to_path_buf();
        let (watcher, events) = watch(vec![path.as_path()])?;
        Ok(ConfigWatcher {
            path,
            _watcher: watcher,
            events,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Non-blocking.
    pub fn poll(&self) -> Option<Result<VehicleConfig, ConfigError>> {
        let mut changed = false;
        while let Ok(event) = self.events.try_recv() {
            if let DebouncedEvent::Write(_) | DebouncedEvent::Create(_) = event {
                changed = true;
            }
        }
        if changed {
            Some(VehicleConfig::load_json(&self.path))
        } else {
            None
        }
    }
}
