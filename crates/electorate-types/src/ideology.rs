//! Four-axis ideology position used by blocs, parties, policies and events.
//!
//! Every constructor clamps each component into `[-1, 1]`; the clamp is an
//! invariant of the type rather than a validation step, so arithmetic on
//! vectors can never leave the compass.

use std::ops::{Add, Mul, Sub};

use serde::{Deserialize, Deserializer, Serialize};
use ts_rs::TS;

use crate::math::{clamp_range, clamp_unit, lerp};

/// Largest possible Euclidean distance between two vectors (`sqrt(4 * 2^2)`).
pub const MAX_DISTANCE: f64 = 4.0;

// ---------------------------------------------------------------------------
// CompassAxis
// ---------------------------------------------------------------------------

/// One of the four ideology axes.
///
/// Declaration order is the tie-break priority used when picking a tile's
/// dominant local issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub enum CompassAxis {
    /// Left (-1) to right (+1) economics.
    #[default]
    Economic,
    /// Traditional (-1) to progressive (+1) social values.
    Societal,
    /// Libertarian (-1) to authoritarian (+1).
    Authority,
    /// Isolationist (-1) to internationalist (+1).
    Diplomatic,
}

impl CompassAxis {
    /// All axes in priority order.
    pub const ALL: [Self; 4] = [
        Self::Economic,
        Self::Societal,
        Self::Authority,
        Self::Diplomatic,
    ];
}

// ---------------------------------------------------------------------------
// IdeologyVector
// ---------------------------------------------------------------------------

/// An immutable point on the four-axis political compass.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct IdeologyVector {
    /// Economic axis in `[-1, 1]`.
    economic: f64,
    /// Societal axis in `[-1, 1]`.
    societal: f64,
    /// Authority axis in `[-1, 1]`.
    authority: f64,
    /// Diplomatic axis in `[-1, 1]`.
    diplomatic: f64,
}

impl IdeologyVector {
    /// The compass origin.
    pub const ZERO: Self = Self {
        economic: 0.0,
        societal: 0.0,
        authority: 0.0,
        diplomatic: 0.0,
    };

    /// Create a vector, clamping every component into `[-1, 1]`.
    pub fn new(economic: f64, societal: f64, authority: f64, diplomatic: f64) -> Self {
        Self {
            economic: clamp_axis(economic),
            societal: clamp_axis(societal),
            authority: clamp_axis(authority),
            diplomatic: clamp_axis(diplomatic),
        }
    }

    /// Economic component.
    pub const fn economic(&self) -> f64 {
        self.economic
    }

    /// Societal component.
    pub const fn societal(&self) -> f64 {
        self.societal
    }

    /// Authority component.
    pub const fn authority(&self) -> f64 {
        self.authority
    }

    /// Diplomatic component.
    pub const fn diplomatic(&self) -> f64 {
        self.diplomatic
    }

    /// Component for the given axis.
    pub const fn axis(&self, axis: CompassAxis) -> f64 {
        match axis {
            CompassAxis::Economic => self.economic,
            CompassAxis::Societal => self.societal,
            CompassAxis::Authority => self.authority,
            CompassAxis::Diplomatic => self.diplomatic,
        }
    }

    /// Euclidean distance to `other`, in `[0, MAX_DISTANCE]`.
    pub fn distance_to(&self, other: &Self) -> f64 {
        let de = self.economic - other.economic;
        let ds = self.societal - other.societal;
        let da = self.authority - other.authority;
        let dd = self.diplomatic - other.diplomatic;
        (de * de + ds * ds + da * da + dd * dd).sqrt()
    }

    /// Distance to `other` scaled into `[0, 1]`.
    pub fn normalized_distance_to(&self, other: &Self) -> f64 {
        self.distance_to(other) / MAX_DISTANCE
    }

    /// Per-axis linear blend toward `target`; `t` is clamped into `[0, 1]`.
    #[must_use]
    pub fn blend_toward(&self, target: &Self, t: f64) -> Self {
        let t = clamp_unit(t);
        Self::new(
            lerp(self.economic, target.economic, t),
            lerp(self.societal, target.societal, t),
            lerp(self.authority, target.authority, t),
            lerp(self.diplomatic, target.diplomatic, t),
        )
    }
}

impl Add for IdeologyVector {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(
            self.economic + rhs.economic,
            self.societal + rhs.societal,
            self.authority + rhs.authority,
            self.diplomatic + rhs.diplomatic,
        )
    }
}

impl Sub for IdeologyVector {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::new(
            self.economic - rhs.economic,
            self.societal - rhs.societal,
            self.authority - rhs.authority,
            self.diplomatic - rhs.diplomatic,
        )
    }
}

impl Mul<f64> for IdeologyVector {
    type Output = Self;

    fn mul(self, scalar: f64) -> Self {
        Self::new(
            self.economic * scalar,
            self.societal * scalar,
            self.authority * scalar,
            self.diplomatic * scalar,
        )
    }
}

/// Wire shape accepted on ingestion; missing components default to zero.
#[derive(Deserialize)]
struct RawIdeology {
    #[serde(default)]
    economic: f64,
    #[serde(default)]
    societal: f64,
    #[serde(default)]
    authority: f64,
    #[serde(default)]
    diplomatic: f64,
}

impl<'de> Deserialize<'de> for IdeologyVector {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = RawIdeology::deserialize(deserializer)?;
        Ok(Self::new(raw.economic, raw.societal, raw.authority, raw.diplomatic))
    }
}

fn clamp_axis(value: f64) -> f64 {
    if value.is_nan() {
        return 0.0;
    }
    clamp_range(value, -1.0, 1.0)
}
