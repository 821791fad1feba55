//! Radial hit-testing.
//!
//! Angles handled here use the conventional polar orientation: zero points
//! right, angles grow counter-clockwise, and the vertical screen axis is
//! flipped so that "up" on screen is `PI / 2`. Everything is normalized into
//! `[0, TAU)`.

use std::f64::consts::{PI, TAU};
use std::num::NonZeroUsize;
use std::ops::{Add, Sub};

/// Number of wedges the raw angular sector is rotated back by, which puts
/// entry 0 at the 12 o'clock wedge of an eight entry ring.
pub const INDEX_ROTATION: usize = 2;

/// Angle pointing straight up on screen.
pub const TWELVE_OCLOCK: f64 = PI / 2.0;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn length(self) -> f64 {
        self.x.hypot(self.y)
    }

    pub fn distance(self, other: Point) -> f64 {
        (self - other).length()
    }
}

impl Add for Point {
    type Output = Point;

    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

/// Folds any angle into `[0, TAU)`.
pub fn normalize_angle(angle: f64) -> f64 {
    let a = angle.rem_euclid(TAU);
    // rem_euclid can round up to exactly TAU for tiny negative inputs
    if a >= TAU { 0.0 } else { a }
}

/// Angle of `point` around `center`, with screen y pointing down.
pub fn polar_angle(point: Point, center: Point) -> f64 {
    let d = point - center;
    normalize_angle((-d.y).atan2(d.x))
}

/// Raw angular sector (before rotation) that `angle` falls into.
fn sector_at(angle: f64, count: usize) -> usize {
    let sector = (count as f64 * normalize_angle(angle) / TAU).floor() as usize;
    sector.min(count - 1)
}

/// Wedge index for an angle, for a ring of `entry_count` wedges.
pub fn wedge_at_angle(angle: f64, entry_count: NonZeroUsize) -> usize {
    let n = entry_count.get();
    (sector_at(angle, n) + n - INDEX_ROTATION % n) % n
}

/// Maps a point to the wedge under it, or `None` inside the dead zone.
pub fn select_wedge(
    point: Point,
    center: Point,
    inner_radius: f64,
    entry_count: NonZeroUsize,
) -> Option<usize> {
    if point.distance(center) < inner_radius {
        return None;
    }
    Some(wedge_at_angle(polar_angle(point, center), entry_count))
}

/// Square menu area with a dead-zone disc and an outer ring radius.
///
/// The outer radius only matters for drawing: dragging past the ring keeps
/// the wedge selected.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RingGeometry {
    pub size: f64,
    pub inner_radius: f64,
    pub outer_radius: f64,
}

impl Default for RingGeometry {
    fn default() -> Self {
        Self {
            size: 300.0,
            inner_radius: 50.0,
            outer_radius: 150.0,
        }
    }
}

impl RingGeometry {
    pub fn center(&self) -> Point {
        Point::new(self.size / 2.0, self.size / 2.0)
    }

    /// Translates an absolute pointer position into menu-local coordinates,
    /// given the point the menu was opened at.
    pub fn to_local(&self, pointer: Point, anchor: Point) -> Point {
        pointer - anchor + self.center()
    }

    pub fn select(&self, local: Point, entry_count: NonZeroUsize) -> Option<usize> {
        select_wedge(local, self.center(), self.inner_radius, entry_count)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WedgeGeometry {
    pub index: usize,
    pub start_angle: f64,
    pub end_angle: f64,
}

impl WedgeGeometry {
    /// Lays out `entry_count` equal wedges so that each one covers exactly
    /// the angles [`wedge_at_angle`] maps to its index.
    pub fn layout(entry_count: usize) -> Vec<Self> {
        if entry_count == 0 {
            return Vec::new();
        }
        let step = TAU / entry_count as f64;

        (0..entry_count)
            .map(|index| {
                let sector = (index + INDEX_ROTATION) % entry_count;
                let start_angle = sector as f64 * step;
                Self {
                    index,
                    start_angle,
                    end_angle: start_angle + step,
                }
            })
            .collect()
    }

    pub fn sweep(&self) -> f64 {
        self.end_angle - self.start_angle
    }

    pub fn mid_angle(&self) -> f64 {
        normalize_angle(self.start_angle + self.sweep() / 2.0)
    }

    pub fn contains(&self, angle: f64) -> bool {
        let a = normalize_angle(angle);
        a >= self.start_angle && a < self.end_angle
    }

    /// Start and end of the wedge in screen space (y down), in the order a
    /// clockwise arc such as cairo's `arc` expects.
    pub fn screen_arc(&self) -> (f64, f64) {
        (-self.end_angle, -self.start_angle)
    }

    /// Point at `radius` from `center` in the middle of the wedge, in screen
    /// coordinates.
    pub fn anchor_point(&self, center: Point, radius: f64) -> Point {
        let mid = self.mid_angle();
        Point::new(center.x + radius * mid.cos(), center.y - radius * mid.sin())
    }
}
