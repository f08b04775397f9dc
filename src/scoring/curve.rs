//! Gradient segment curve shapes
//!
//! Every segment of a gradient program moves each reagent's composition
//! from `y0` to `yT` along one of eleven shapes. With `τ = (t - t_i) / Δt`:
//!
//! ```text
//! pre-step      y = yT                        (jump at the segment start)
//! post-step     y = y0                        (jump at the segment end)
//! linear        y = y0 + (yT - y0)·τ
//! convex  (n)   y = yT - (yT - y0)·(1 - τ)^n  n = 2, 3, 4, 6
//! concave (n)   y = y0 + (yT - y0)·τ^n        n = 2, 3, 4, 6
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Sample count for midpoint quadrature of step shapes
pub const QUADRATURE_SAMPLES: usize = 1000;

/// Interpolation shape between two consecutive gradient time points
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", try_from = "String")]
pub enum CurveShape {
    PreStep,
    WeakConvex,
    MediumConvex,
    StrongConvex,
    UltraConvex,
    #[default]
    Linear,
    WeakConcave,
    MediumConcave,
    StrongConcave,
    UltraConcave,
    PostStep,
}

impl CurveShape {
    pub const ALL: [CurveShape; 11] = [
        CurveShape::PreStep,
        CurveShape::WeakConvex,
        CurveShape::MediumConvex,
        CurveShape::StrongConvex,
        CurveShape::UltraConvex,
        CurveShape::Linear,
        CurveShape::WeakConcave,
        CurveShape::MediumConcave,
        CurveShape::StrongConcave,
        CurveShape::UltraConcave,
        CurveShape::PostStep,
    ];

    pub fn name(self) -> &'static str {
        match self {
            CurveShape::PreStep => "pre-step",
            CurveShape::WeakConvex => "weak-convex",
            CurveShape::MediumConvex => "medium-convex",
            CurveShape::StrongConvex => "strong-convex",
            CurveShape::UltraConvex => "ultra-convex",
            CurveShape::Linear => "linear",
            CurveShape::WeakConcave => "weak-concave",
            CurveShape::MediumConcave => "medium-concave",
            CurveShape::StrongConcave => "strong-concave",
            CurveShape::UltraConcave => "ultra-concave",
            CurveShape::PostStep => "post-step",
        }
    }

    /// Polynomial exponent, `None` for the step shapes
    pub fn exponent(self) -> Option<i32> {
        match self {
            CurveShape::Linear => Some(1),
            CurveShape::WeakConvex | CurveShape::WeakConcave => Some(2),
            CurveShape::MediumConvex | CurveShape::MediumConcave => Some(3),
            CurveShape::StrongConvex | CurveShape::StrongConcave => Some(4),
            CurveShape::UltraConvex | CurveShape::UltraConcave => Some(6),
            CurveShape::PreStep | CurveShape::PostStep => None,
        }
    }

    pub fn is_step(self) -> bool {
        self.exponent().is_none()
    }

    fn is_convex(self) -> bool {
        matches!(
            self,
            CurveShape::WeakConvex
                | CurveShape::MediumConvex
                | CurveShape::StrongConvex
                | CurveShape::UltraConvex
        )
    }

    /// Composition at fractional position `tau` ∈ [0,1] of the segment
    pub fn value_at(self, y0: f64, yt: f64, tau: f64) -> f64 {
        let tau = tau.clamp(0.0, 1.0);
        match self {
            CurveShape::PreStep => {
                if tau <= 0.0 {
                    y0
                } else {
                    yt
                }
            }
            CurveShape::PostStep => {
                if tau >= 1.0 {
                    yt
                } else {
                    y0
                }
            }
            shape => {
                // Non-step shapes always carry an exponent
                let n = shape.exponent().unwrap_or(1);
                if shape.is_convex() {
                    yt - (yt - y0) * (1.0 - tau).powi(n)
                } else {
                    y0 + (yt - y0) * tau.powi(n)
                }
            }
        }
    }

    /// ∫ y(t) dt over a segment of `duration` minutes, in %·min.
    ///
    /// Polynomial shapes integrate in closed form. Step shapes are sampled
    /// at interior midpoints, so the jump itself contributes nothing.
    pub fn integrate(self, y0: f64, yt: f64, duration: f64) -> f64 {
        if duration <= 0.0 {
            return 0.0;
        }
        match self.exponent() {
            None => midpoint_quadrature(self, y0, yt, duration, QUADRATURE_SAMPLES),
            Some(n) => {
                let tail = (yt - y0) / f64::from(n + 1);
                if self.is_convex() {
                    duration * (yt - tail)
                } else {
                    duration * (y0 + tail)
                }
            }
        }
    }
}

/// Midpoint Riemann sum of a shape over a segment
pub fn midpoint_quadrature(
    shape: CurveShape,
    y0: f64,
    yt: f64,
    duration: f64,
    samples: usize,
) -> f64 {
    if duration <= 0.0 || samples == 0 {
        return 0.0;
    }
    let n = samples as f64;
    let h = duration / n;
    (0..samples)
        .map(|i| shape.value_at(y0, yt, (i as f64 + 0.5) / n))
        .sum::<f64>()
        * h
}

impl fmt::Display for CurveShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for CurveShape {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace(['_', ' '], "-");
        CurveShape::ALL
            .iter()
            .copied()
            .find(|shape| shape.name() == normalized)
            .ok_or_else(|| {
                format!(
                    "Unknown curve shape '{}'. Valid shapes: {}",
                    s,
                    CurveShape::ALL
                        .iter()
                        .map(|c| c.name())
                        .collect::<Vec<_>>()
                        .join(", ")
                )
            })
    }
}

impl TryFrom<String> for CurveShape {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}
