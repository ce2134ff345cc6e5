use crate::config::TerrainConfig;
use crate::vector::Vector2;
use noise::{NoiseFn, OpenSimplex};

pub trait HeightField {
    fn height(&self, x: f32, z: f32) -> f32;
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct FlatGround(pub f32);

impl HeightField for FlatGround {
    fn height(&self, _x: f32, _z: f32) -> f32 {
        self.0
    }
}

/// Rolling bumps from 2D coherent noise, always in `[0, 2 * bump_height]`.
pub struct BumpySampler {
    gen: OpenSimplex,
    bumpiness: f32,
    bump_height: f32,
}

impl BumpySampler {
    pub fn new(seed: u32, bumpiness: f32, bump_height: f32) -> BumpySampler {
        BumpySampler {
            gen: OpenSimplex::new(seed),
            bumpiness,
            bump_height,
        }
    }
}

impl HeightField for BumpySampler {
    fn height(&self, x: f32, z: f32) -> f32 {
        let s = self.bumpiness;
        let n = self.gen.get([(x * s) as f64, (z * s) as f64]) as f32;
        (n.max(-1.0).min(1.0) + 1.0) * self.bump_height
    }
}

pub enum Terrain {
    Flat(FlatGround),
    Bumpy(BumpySampler),
}

impl Terrain {
    pub fn from_config(config: &TerrainConfig) -> Terrain {
        match *config {
            TerrainConfig::Flat { height } => Terrain::Flat(FlatGround(height)),
            TerrainConfig::Noise {
                seed,
                bumpiness,
                bump_height,
            } => Terrain::Bumpy(BumpySampler::new(seed, bumpiness, bump_height)),
        }
    }
}

impl HeightField for Terrain {
    fn height(&self, x: f32, z: f32) -> f32 {
        match self {
            Terrain::Flat(f) => f.height(x, z),
            Terrain::Bumpy(b) => b.height(x, z),
        }
    }
}

/// Wheel order used by every per-wheel array in the crate.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Wheel {
    FrontLeft = 0,
    FrontRight = 1,
    RearLeft = 2,
    RearRight = 3,
}

impl Wheel {
    pub const ALL: [Wheel; 4] = [
        Wheel::FrontLeft,
        Wheel::FrontRight,
        Wheel::RearLeft,
        Wheel::RearRight,
    ];

    pub fn is_front(self) -> bool {
        matches!(self, Wheel::FrontLeft | Wheel::FrontRight)
    }

    pub fn is_left(self) -> bool {
        matches!(self, Wheel::FrontLeft | Wheel::RearLeft)
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Default)]
pub struct ContactHeights(pub [f32; 4]);

impl ContactHeights {
    pub fn sample(field: &dyn HeightField, contacts: &[Vector2; 4]) -> ContactHeights {
        let mut h = [0.0; 4];
        for (i, p) in contacts.iter().enumerate() {
            h[i] = field.height(p.x, p.y);
        }
        ContactHeights(h)
    }

    pub fn get(&self, wheel: Wheel) -> f32 {
        self.0[wheel as usize]
    }

    pub fn max(&self) -> f32 {
        self.0.iter().copied().fold(f32::MIN, f32::max)
    }

    pub fn is_finite(&self) -> bool {
        self.0.iter().all(|h| h.is_finite())
    }
}
