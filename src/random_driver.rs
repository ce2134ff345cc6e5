use crate::input::{GearSelect, InputSnapshot, Steering};
use crate::playback::release_gear;
use crate::transmission::FORWARD_GEARS;
use rand::{Rng, SeedableRng};
use rand_distr::StandardNormal;
use rand_xorshift::XorShiftRng;

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct DriverMood {
    pub throttle: f64,
    pub brake: f64,
    pub ebrake: f64,
    pub steer: f64,
    pub pointer: f64,
    pub gear_change: f64,
}

impl Default for DriverMood {
    fn default() -> Self {
        DriverMood {
            throttle: 0.6,
            brake: 0.15,
            ebrake: 0.05,
            steer: 0.5,
            pointer: 0.1,
            gear_change: 0.1,
        }
    }
}

pub struct RandomDriver {
    rng: XorShiftRng,
    mood: DriverMood,
    /// km/h above which the throttle is never pressed.
    pub speed_limit: f32,
    current: InputSnapshot,
    hold: f32,
}

impl RandomDriver {
    pub fn new(seed: u64) -> RandomDriver {
        RandomDriver::with_mood(seed, DriverMood::default())
    }

    pub fn with_mood(seed: u64, mood: DriverMood) -> RandomDriver {
        RandomDriver {
            rng: XorShiftRng::seed_from_u64(seed),
            mood,
            speed_limit: 170.0,
            current: InputSnapshot::idle(),
            hold: 0.0,
        }
    }

    /// `speed` in km/h.
    pub fn next_input(&mut self, speed: f32, dt: f32) -> InputSnapshot {
        self.hold -= dt;
        if self.hold > 0.0 {
            self.current = release_gear(self.current);
        } else {
            self.current = self.pick();
            let n: f32 = self.rng.sample(StandardNormal);
            self.hold = (1.0 + n * 0.3).max(0.05);
        }

        let mut input = self.current;
        if speed > self.speed_limit {
            input.throttle = false;
        }
        input
    }

    fn pick(&mut self) -> InputSnapshot {
        let m = self.mood;
        let rng = &mut self.rng;

        let steering = if rng.gen_bool(m.pointer) {
            Steering::Pointer {
                x: rng.gen_range(0.0..1280.0),
                viewport_width: 1280.0,
            }
        } else if rng.gen_bool(m.steer) {
            let left = rng.gen_bool(0.5);
            Steering::Keys { left, right: !left }
        } else {
            Steering::default()
        };

        let gear_select = if rng.gen_bool(m.gear_change) {
            match rng.gen_range(-1..=FORWARD_GEARS as i32) {
                -1 => GearSelect::Reverse,
                0 => GearSelect::Neutral,
                n => GearSelect::Forward(n as u8),
            }
        } else {
            GearSelect::None
        };

        InputSnapshot {
            throttle: rng.gen_bool(m.throttle),
            brake: rng.gen_bool(m.brake),
            ebrake: rng.gen_bool(m.ebrake),
            steering,
            gear_select,
            automatic: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drive(seed: u64, ticks: usize) -> Vec<InputSnapshot> {
        let mut driver = RandomDriver::new(seed);
        (0..ticks).map(|_| driver.next_input(50.0, 0.05)).collect()
    }

    #[test]
    fn same_seed_same_inputs() {
        assert_eq!(drive(7, 500), drive(7, 500));
        assert_ne!(drive(7, 500), drive(8, 500));
    }

    #[test]
    fn intents_are_held_for_a_while() {
        let inputs = drive(3, 400);
        let changes = inputs.windows(2).filter(|w| w[0] != w[1]).count();
        assert!(changes > 5 && changes < 200, "{} changes", changes);
    }

    #[test]
    fn gear_picks_are_one_shot() {
        let inputs = drive(11, 2000);
        for w in inputs.windows(2) {
            if w[0].gear_select != GearSelect::None {
                assert!(w[1].gear_select == GearSelect::None || w[0] != w[1]);
            }
        }
        assert!(inputs.iter().any(|i| i.gear_select != GearSelect::None));
    }

    #[test]
    fn never_floors_it_past_the_limit() {
        let mut driver = RandomDriver::new(5);
        driver.speed_limit = 100.0;
        assert!((0..1000).all(|_| !driver.next_input(120.0, 0.05).throttle));
    }
}
