use crate::config::VehicleConfig;
use crate::physics::sign;
use crate::state::WheelLoads;
use crate::terrain::{ContactHeights, Wheel};
use crate::vector::Vector2;

#[derive(Debug, Copy, Clone, PartialEq, Default)]
pub struct WeightTransfer {
    pub loads: WheelLoads,
    pub longitudinal: f32,
    pub lateral: f32,
    /// Degrees.
    pub body_roll: f32,
    /// Degrees.
    pub camber: f32,
    pub terrain_pitch: f32,
    pub terrain_roll: f32,
}

// Highest wheel of pair `a` over the lowest wheel of pair `b`.
fn pair_differential(a: [f32; 2], b: [f32; 2]) -> f32 {
    let (a_min, a_max) = (a[0].min(a[1]), a[0].max(a[1]));
    let (b_min, b_max) = (b[0].min(b[1]), b[0].max(b[1]));
    (a_max - b_min).max(a_min - b_max)
}

fn tilt_transfer(differential: f32, span: f32, cg_height: f32, weight: f32) -> f32 {
    let angle = (differential.abs() / span).min(1.0).asin();
    sign(differential) * cg_height * angle.sin() / span * weight
}

impl WeightTransfer {
    pub fn compute(
        config: &VehicleConfig,
        local_acceleration: Vector2,
        ground: &ContactHeights,
    ) -> WeightTransfer {
        let weight = config.weight();
        let wheel_base = config.wheel_base();
        let track_width = config.track_width();
        let h = config.cg_height;
        let mut wt = WeightTransfer::default();

        // The axle nearer the centre of gravity carries more of the weight.
        let mut front = config.cg_to_rear_axle / wheel_base * weight;
        let mut rear = config.cg_to_front_axle / wheel_base * weight;

        wt.longitudinal =
            h / wheel_base * config.mass * local_acceleration.x * config.weight_transfer;
        front -= wt.longitudinal;
        rear += wt.longitudinal;

        let lateral_g = local_acceleration.y / config.gravity;
        let lat_front = lateral_g * front * h / track_width * config.lateral_transfer_scale;
        let lat_rear = lateral_g * rear * h / track_width * config.lateral_transfer_scale;
        wt.lateral = lat_front + lat_rear;

        let mut fl = front / 2.0 - lat_front;
        let mut fr = front / 2.0 + lat_front;
        let mut rl = rear / 2.0 - lat_rear;
        let mut rr = rear / 2.0 + lat_rear;

        let lateral_sign = sign(local_acceleration.y);
        wt.body_roll = lateral_sign * (wt.lateral.abs() / weight) * config.max_body_roll;
        wt.camber = (wt.longitudinal / weight).abs() * config.max_camber;

        let roll_transfer =
            lateral_sign * h * wt.body_roll.abs().to_radians().sin() / track_width * weight;
        fl += roll_transfer / 2.0;
        rl += roll_transfer / 2.0;
        fr -= roll_transfer / 2.0;
        rr -= roll_transfer / 2.0;

        let g = |w: Wheel| ground.get(w);
        let dx = pair_differential(
            [g(Wheel::RearLeft), g(Wheel::RearRight)],
            [g(Wheel::FrontLeft), g(Wheel::FrontRight)],
        );
        let dz = pair_differential(
            [g(Wheel::FrontRight), g(Wheel::RearRight)],
            [g(Wheel::FrontLeft), g(Wheel::RearLeft)],
        );
        wt.terrain_pitch = tilt_transfer(dx, wheel_base, h, weight);
        wt.terrain_roll = tilt_transfer(dz, track_width, h, weight);

        fl += wt.terrain_pitch / 2.0 + wt.terrain_roll / 2.0;
        fr += wt.terrain_pitch / 2.0 - wt.terrain_roll / 2.0;
        rl += -wt.terrain_pitch / 2.0 + wt.terrain_roll / 2.0;
        rr += -wt.terrain_pitch / 2.0 - wt.terrain_roll / 2.0;

        wt.loads = WheelLoads([fl.max(0.0), fr.max(0.0), rl.max(0.0), rr.max(0.0)]);
        wt
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn level() -> ContactHeights {
        ContactHeights([0.0; 4])
    }

    #[test]
    fn static_split_follows_cg_position() {
        let mut config = VehicleConfig::default();
        config.cg_to_front_axle = 1.0;
        config.cg_to_rear_axle = 1.5;
        let wt = WeightTransfer::compute(&config, Vector2::ZERO, &level());
        let w = config.weight();
        assert!((wt.loads.front_axle() - 0.6 * w).abs() < 1e-2);
        assert!((wt.loads.rear_axle() - 0.4 * w).abs() < 1e-2);
        assert_eq!(wt.body_roll, 0.0);
        assert_eq!(wt.camber, 0.0);
    }

    #[test]
    fn forward_acceleration_loads_the_rear() {
        let config = VehicleConfig::default();
        let wt = WeightTransfer::compute(&config, Vector2::new(4.0, 0.0), &level());
        let expected = 0.676 / 2.5 * 1200.0 * 4.0 * 0.2;
        assert!((wt.longitudinal - expected).abs() < 1e-2);
        assert!(wt.loads.rear_axle() > wt.loads.front_axle());
        assert!((wt.loads.rear_axle() - wt.loads.front_axle() - 2.0 * expected).abs() < 1e-1);
        assert!(wt.camber > 0.0);
    }

    #[test]
    fn lateral_acceleration_is_mirror_symmetric() {
        let config = VehicleConfig::default();
        let left = WeightTransfer::compute(&config, Vector2::new(0.0, 5.0), &level());
        let right = WeightTransfer::compute(&config, Vector2::new(0.0, -5.0), &level());
        assert!(left.loads.get(Wheel::FrontRight) > left.loads.get(Wheel::FrontLeft));
        assert_eq!(left.loads.get(Wheel::FrontRight), right.loads.get(Wheel::FrontLeft));
        assert_eq!(left.loads.get(Wheel::RearLeft), right.loads.get(Wheel::RearRight));
        assert_eq!(left.body_roll, -right.body_roll);
        assert!((left.loads.front_axle() - right.loads.front_axle()).abs() < 1e-3);
    }

    #[test]
    fn total_weight_is_conserved() {
        let config = VehicleConfig::default();
        let ground = ContactHeights([0.05, 0.12, 0.0, 0.08]);
        let wt = WeightTransfer::compute(&config, Vector2::new(-3.0, 2.0), &ground);
        assert!(
            (wt.loads.total() - config.weight()).abs() < 0.5,
            "total {} vs weight {}",
            wt.loads.total(),
            config.weight()
        );
    }

    #[test]
    fn front_lower_than_rear_loads_the_front() {
        let config = VehicleConfig::default();
        let ground = ContactHeights([0.0, 0.0, 0.2, 0.2]);
        let wt = WeightTransfer::compute(&config, Vector2::ZERO, &ground);
        let expected = 0.676 * (0.2 / 2.5) / 2.5 * config.weight();
        assert!((wt.terrain_pitch - expected).abs() < 0.5, "pitch {}", wt.terrain_pitch);
        assert!(wt.loads.front_axle() > wt.loads.rear_axle());
    }

    #[test]
    fn diagonal_twist_still_tilts_the_body() {
        let config = VehicleConfig::default();
        // FL, FR, RL, RR: rear-left and front-right raised.
        let ground = ContactHeights([0.0, 0.2, 0.2, 0.0]);
        let wt = WeightTransfer::compute(&config, Vector2::ZERO, &ground);
        assert!((wt.terrain_pitch - 254.6).abs() < 0.5, "pitch {}", wt.terrain_pitch);
        assert!(wt.terrain_roll > 0.0);
        assert!(wt.loads.front_axle() > wt.loads.rear_axle());
        assert!((wt.loads.total() - config.weight()).abs() < 0.5);
    }

    #[test]
    fn wheels_never_pull_the_ground() {
        let config = VehicleConfig::default();
        let wt = WeightTransfer::compute(&config, Vector2::new(0.0, 60.0), &level());
        assert!(wt.loads.0.iter().all(|l| *l >= 0.0));
    }

    #[test]
    fn pair_differential_takes_the_widest_gap() {
        assert!((pair_differential([0.3, 0.1], [0.0, 0.0]) - 0.3).abs() < 1e-6);
        assert!((pair_differential([0.0, 0.0], [0.2, 0.1]) + 0.1).abs() < 1e-6);
        assert_eq!(pair_differential([0.1, 0.1], [0.1, 0.1]), 0.0);
        assert!((pair_differential([0.0, 0.2], [0.2, 0.0]) - 0.2).abs() < 1e-6);
    }
}
