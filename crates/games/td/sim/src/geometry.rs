use crate::config::{default_route, PlacementRules};
use crate::errors::{ConfigError, PlacementError};
use serde::{Deserialize, Serialize};
use std::ops::{Add, AddAssign, Mul, Sub};

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    pub fn length(self) -> f32 {
        self.x.hypot(self.y)
    }

    pub fn dot(self, other: Self) -> f32 {
        self.x * other.x + self.y * other.y
    }

    /// Heading in radians, 0 pointing along +x.
    pub fn angle(self) -> f32 {
        self.y.atan2(self.x)
    }
}

impl Add for Vec2 {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl AddAssign for Vec2 {
    fn add_assign(&mut self, rhs: Self) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl Sub for Vec2 {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f32> for Vec2 {
    type Output = Self;
    fn mul(self, rhs: f32) -> Self {
        Self::new(self.x * rhs, self.y * rhs)
    }
}

/// Unit vector along `(dx, dy)`. A zero-length input yields `(0, 0)`.
pub fn normalize(dx: f32, dy: f32) -> Vec2 {
    let len = dx.hypot(dy);
    let len = if len == 0.0 { 1.0 } else { len };
    Vec2::new(dx / len, dy / len)
}

pub fn distance(a: Vec2, b: Vec2) -> f32 {
    (a - b).length()
}

/// Shortest distance from `p` to the closed segment `a`-`b`.
pub fn point_to_segment_distance(p: Vec2, a: Vec2, b: Vec2) -> f32 {
    let ab = b - a;
    let len_sq = ab.dot(ab);
    if len_sq == 0.0 {
        return distance(p, a);
    }
    let t = ((p - a).dot(ab) / len_sq).clamp(0.0, 1.0);
    distance(p, a + ab * t)
}

/// Check `point` against the path corridor and every existing tower.
///
/// The path is tested first, so a spot that violates both reports
/// [`PlacementError::Path`].
pub fn validate_placement<I>(
    point: Vec2,
    towers: I,
    path: &[Vec2],
    rules: &PlacementRules,
) -> Result<(), PlacementError>
where
    I: IntoIterator<Item = Vec2>,
{
    if !point.is_finite() {
        return Err(PlacementError::NonFinite);
    }

    let near_path = path
        .windows(2)
        .any(|seg| point_to_segment_distance(point, seg[0], seg[1]) < rules.path_threshold);
    if near_path {
        return Err(PlacementError::Path);
    }

    if towers
        .into_iter()
        .any(|center| distance(point, center) < rules.tower_threshold)
    {
        return Err(PlacementError::Tower);
    }

    Ok(())
}

/// The waypoint route enemies follow. Always holds at least two points.
#[derive(Clone, Debug, PartialEq)]
pub struct Path {
    points: Vec<Vec2>,
}

impl Default for Path {
    fn default() -> Self {
        Self {
            points: default_route(),
        }
    }
}

impl Path {
    pub fn new(points: Vec<Vec2>) -> Result<Self, ConfigError> {
        if points.len() < 2 {
            return Err(ConfigError::PathTooShort { len: points.len() });
        }
        Ok(Self { points })
    }

    pub fn start(&self) -> Vec2 {
        self.points[0]
    }

    pub fn waypoint(&self, index: usize) -> Option<Vec2> {
        self.points.get(index).copied()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn points(&self) -> &[Vec2] {
        &self.points
    }

    pub fn total_length(&self) -> f32 {
        self.points
            .windows(2)
            .map(|seg| distance(seg[0], seg[1]))
            .sum()
    }
}
