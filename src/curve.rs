use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::convert::TryFrom;
use std::ops::Range;

/// Points are expected in ascending `x`; this is not checked.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<[f32; 2]>", into = "Vec<[f32; 2]>")]
pub struct Curve {
    xs: Vec<f32>,
    ys: Vec<f32>,
}

impl Curve {
    pub fn new(points: Vec<(f32, f32)>) -> Result<Curve, ConfigError> {
        if points.len() < 2 {
            return Err(ConfigError::InsufficientPoints(points.len()));
        }
        let (xs, ys) = points.into_iter().unzip();
        Ok(Curve { xs, ys })
    }

    /// Built-in tables only; they always carry at least two points.
    pub(crate) fn from_table(points: &[(f32, f32)]) -> Curve {
        debug_assert!(points.len() >= 2);
        Curve {
            xs: points.iter().map(|p| p.0).collect(),
            ys: points.iter().map(|p| p.1).collect(),
        }
    }

    pub fn interpolate(&self, x: f32) -> f32 {
        let n = self.xs.len();
        let i = if x < self.xs[0] {
            0
        } else if x > self.xs[n - 1] {
            n - 2
        } else {
            let mut i = 0;
            while i + 2 < n && x > self.xs[i + 1] {
                i += 1;
            }
            i
        };

        let (x0, x1) = (self.xs[i], self.xs[i + 1]);
        let (y0, y1) = (self.ys[i], self.ys[i + 1]);
        let width = x1 - x0;
        if width == 0.0 {
            return y0;
        }

        let t = (x - x0) / width;
        (1.0 - t) * y0 + t * y1
    }

    pub fn points(&self) -> impl Iterator<Item = (f32, f32)> + '_ {
        self.xs.iter().copied().zip(self.ys.iter().copied())
    }

    pub fn support(&self) -> Range<f32> {
        self.xs[0]..self.xs[self.xs.len() - 1]
    }
}

impl TryFrom<Vec<[f32; 2]>> for Curve {
    type Error = ConfigError;

    fn try_from(points: Vec<[f32; 2]>) -> Result<Self, Self::Error> {
        Curve::new(points.into_iter().map(|[x, y]| (x, y)).collect())
    }
}

impl From<Curve> for Vec<[f32; 2]> {
    fn from(curve: Curve) -> Self {
        curve.points().map(|(x, y)| [x, y]).collect()
    }
}
