use crate::error::SimError;
use crate::input::{GearSelect, InputSnapshot};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputRun {
    pub input: InputSnapshot,
    pub ticks: usize,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct InputRecording {
    /// Time step the run was recorded with, seconds.
    pub dt: f32,
    pub runs: Vec<InputRun>,
}

impl InputRecording {
    pub fn ticks(&self) -> usize {
        self.runs.iter().map(|r| r.ticks).sum()
    }

    pub fn load_json<P: AsRef<Path>>(path: P) -> Result<InputRecording, SimError> {
        let text = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }

    pub fn save_json<P: AsRef<Path>>(&self, path: P) -> Result<(), SimError> {
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    pub fn playback(&self) -> Playback<'_> {
        Playback {
            runs: &self.runs,
            run: 0,
            tick: 0,
        }
    }
}

pub struct InputRecorder {
    recording: InputRecording,
}

impl InputRecorder {
    pub fn new(dt: f32) -> InputRecorder {
        InputRecorder {
            recording: InputRecording { dt, runs: vec![] },
        }
    }

    pub fn record(&mut self, input: &InputSnapshot) {
        match self.recording.runs.last_mut() {
            Some(run) if run.input == *input => run.ticks += 1,
            _ => self.recording.runs.push(InputRun {
                input: *input,
                ticks: 1,
            }),
        }
    }

    pub fn finish(self) -> InputRecording {
        self.recording
    }
}

pub struct Playback<'a> {
    runs: &'a [InputRun],
    run: usize,
    tick: usize,
}

impl<'a> Iterator for Playback<'a> {
    type Item = InputSnapshot;

    fn next(&mut self) -> Option<InputSnapshot> {
        loop {
            let run = self.runs.get(self.run)?;
            if self.tick < run.ticks {
                self.tick += 1;
                return Some(run.input);
            }
            self.run += 1;
            self.tick = 0;
        }
    }
}

/// The same input without its one-shot gear selection.
pub fn release_gear(mut input: InputSnapshot) -> InputSnapshot {
    input.gear_select = GearSelect::None;
    input
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_ticks_share_a_run() {
        let mut recorder = InputRecorder::new(0.01);
        for _ in 0..30 {
            recorder.record(&InputSnapshot::throttle());
        }
        recorder.record(&InputSnapshot::brake());
        recorder.record(&InputSnapshot::brake());
        recorder.record(&InputSnapshot::throttle());

        let recording = recorder.finish();
        assert_eq!(recording.runs.len(), 3);
        assert_eq!(recording.runs[0].ticks, 30);
        assert_eq!(recording.ticks(), 33);
    }

    #[test]
    fn playback_reproduces_the_input_stream() {
        let inputs: Vec<InputSnapshot> = (0..50)
            .map(|i| match i % 7 {
                0 | 1 | 2 => InputSnapshot::throttle().with_steering(true, false),
                3 => InputSnapshot::brake(),
                _ => InputSnapshot::idle(),
            })
            .collect();

        let mut recorder = InputRecorder::new(1.0 / 60.0);
        inputs.iter().for_each(|i| recorder.record(i));
        let recording = recorder.finish();

        let text = serde_json::to_string(&recording).unwrap();
        let back: InputRecording = serde_json::from_str(&text).unwrap();
        let replayed: Vec<InputSnapshot> = back.playback().collect();
        assert_eq!(replayed, inputs);
    }

    #[test]
    fn empty_recording_plays_nothing() {
        assert_eq!(InputRecording::default().playback().count(), 0);
    }

    #[test]
    fn release_gear_keeps_the_rest() {
        let input = InputSnapshot::throttle().with_gear(GearSelect::Forward(2));
        let released = release_gear(input);
        assert_eq!(released.gear_select, GearSelect::None);
        assert!(released.throttle);
    }
}
