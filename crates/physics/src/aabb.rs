//! Axis-aligned bounding boxes used for entity and block collision.

use glam::DVec3;
use thiserror::Error;

/// Direction components at or below this magnitude count as "not moving" on that axis.
const DIRECTION_EPSILON: f64 = 1e-9;

/// Axis-aligned bounding box stored as centre + half extents.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    center: DVec3,
    half_extents: DVec3,
}

/// Which axes a geometric query is allowed to consider.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Axes {
    /// Consider the X axis.
    pub x: bool,
    /// Consider the Y axis.
    pub y: bool,
    /// Consider the Z axis.
    pub z: bool,
}

impl Axes {
    /// All three axes.
    pub const ALL: Axes = Axes {
        x: true,
        y: true,
        z: true,
    };

    /// The horizontal plane only.
    pub const XZ: Axes = Axes {
        x: true,
        y: false,
        z: true,
    };

    fn includes(self, axis: usize) -> bool {
        match axis {
            0 => self.x,
            1 => self.y,
            _ => self.z,
        }
    }
}

/// Half extents that cannot describe a box.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum InvalidHalfExtents {
    /// A component is NaN or infinite.
    #[error("half extents must be finite (got {0})")]
    NotFinite(DVec3),
    /// A component is below zero.
    #[error("half extents must not be negative (got {0})")]
    Negative(DVec3),
}

/// Accept `half_extents` only if every component is finite and >= 0.
pub fn checked_half_extents(half_extents: DVec3) -> Result<DVec3, InvalidHalfExtents> {
    if !half_extents.is_finite() {
        return Err(InvalidHalfExtents::NotFinite(half_extents));
    }
    if half_extents.cmplt(DVec3::ZERO).any() {
        return Err(InvalidHalfExtents::Negative(half_extents));
    }
    Ok(half_extents)
}

impl Aabb {
    /// Create a box from its centre and half extents (each half extent must be >= 0).
    pub fn new(center: DVec3, half_extents: DVec3) -> Self {
        debug_assert!(
            half_extents.cmpge(DVec3::ZERO).all(),
            "negative half extents: {half_extents:?}"
        );
        Self {
            center,
            half_extents,
        }
    }

    /// Create a box spanning `min..=max`.
    pub fn from_min_max(min: DVec3, max: DVec3) -> Self {
        Self::new((min + max) * 0.5, (max - min) * 0.5)
    }

    /// Centre of the box.
    pub fn center(&self) -> DVec3 {
        self.center
    }

    /// Half extents of the box.
    pub fn half_extents(&self) -> DVec3 {
        self.half_extents
    }

    /// Minimum corner.
    pub fn min(&self) -> DVec3 {
        self.center - self.half_extents
    }

    /// Maximum corner.
    pub fn max(&self) -> DVec3 {
        self.center + self.half_extents
    }

    /// The same box moved by `offset`.
    pub fn translated(&self, offset: DVec3) -> Self {
        Self::new(self.center + offset, self.half_extents)
    }

    /// Closed-interval intersection test on all three axes.
    pub fn overlaps(&self, other: &Aabb) -> bool {
        let (a_min, a_max) = (self.min(), self.max());
        let (b_min, b_max) = (other.min(), other.max());
        a_min.x <= b_max.x
            && a_max.x >= b_min.x
            && a_min.y <= b_max.y
            && a_max.y >= b_min.y
            && a_min.z <= b_max.z
            && a_max.z >= b_min.z
    }

    /// Closed point-in-box test.
    pub fn contains(&self, point: DVec3) -> bool {
        let (min, max) = (self.min(), self.max());
        point.cmpge(min).all() && point.cmple(max).all()
    }

    /// Closest point on (or in) the box to `point`: each coordinate clamped to the box extent.
    pub fn closest_point_to(&self, point: DVec3) -> DVec3 {
        point.clamp(self.min(), self.max())
    }

    /// Outward unit normal of the face a body first touches when it travels from `origin`
    /// along `direction`.
    ///
    /// The body is a box with `body_half_extents` centred on `origin`. Only the axes in
    /// `axes` are considered. Each considered axis with motion gets an entry time (gap
    /// between the leading body face and the facing box face, divided by speed on that
    /// axis); the face hit first is on the axis entered last. Ties go to the lower axis
    /// (X before Y before Z).
    ///
    /// With no usable motion the normal comes from [`Aabb::resting_contact_normal`].
    pub fn first_hit_plane(
        &self,
        direction: DVec3,
        origin: DVec3,
        body_half_extents: DVec3,
        axes: Axes,
    ) -> DVec3 {
        let reach = self.half_extents + body_half_extents;
        let mut hit: Option<(usize, f64)> = None;

        for axis in 0..3 {
            if !axes.includes(axis) {
                continue;
            }
            let d = direction[axis];
            if d.abs() <= DIRECTION_EPSILON {
                continue;
            }
            let gap = if d > 0.0 {
                (self.center[axis] - reach[axis]) - origin[axis]
            } else {
                origin[axis] - (self.center[axis] + reach[axis])
            };
            let entry = gap / d.abs();
            if hit.map_or(true, |(_, best)| entry > best) {
                hit = Some((axis, entry));
            }
        }

        match hit {
            Some((axis, _)) => axis_normal(axis, -direction[axis].signum()),
            None => self.resting_contact_normal(origin, body_half_extents, axes),
        }
    }

    /// Normal used when there is no direction of travel to reason about.
    ///
    /// Picks the allowed axis on which the body overlaps the box the most, where
    /// the overlap on an axis is the combined extent minus the centre distance.
    /// Ties go to the lower axis; the sign points from the box towards the body
    /// (positive when the centres coincide). With no axes allowed the answer is `+Y`.
    pub fn resting_contact_normal(
        &self,
        origin: DVec3,
        body_half_extents: DVec3,
        axes: Axes,
    ) -> DVec3 {
        let reach = self.half_extents + body_half_extents;
        let offset = origin - self.center;
        let mut best: Option<(usize, f64)> = None;

        for axis in 0..3 {
            if !axes.includes(axis) {
                continue;
            }
            let overlap = reach[axis] - offset[axis].abs();
            if best.map_or(true, |(_, b)| overlap > b) {
                best = Some((axis, overlap));
            }
        }

        match best {
            Some((axis, _)) => {
                let sign = if offset[axis] < 0.0 { -1.0 } else { 1.0 };
                axis_normal(axis, sign)
            }
            None => DVec3::Y,
        }
    }
}

fn axis_normal(axis: usize, sign: f64) -> DVec3 {
    let mut normal = DVec3::ZERO;
    normal[axis] = sign;
    normal
}
