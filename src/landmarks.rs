//! Hand landmark sets as delivered by the tracking collaborator.
//!
//! A hand is always 21 normalized points in a fixed order. Coordinates are in
//! image space: x grows to the right, y grows downward, both in `[0, 1]`.

use crate::error::LandmarkError;
use glam::{Vec2, Vec3};

/// Number of points in a hand landmark set.
pub const LANDMARK_COUNT: usize = 21;

pub const WRIST: usize = 0;
pub const THUMB_CMC: usize = 1;
pub const THUMB_MCP: usize = 2;
pub const THUMB_IP: usize = 3;
pub const THUMB_TIP: usize = 4;
pub const INDEX_MCP: usize = 5;
pub const INDEX_PIP: usize = 6;
pub const INDEX_DIP: usize = 7;
pub const INDEX_TIP: usize = 8;
pub const MIDDLE_MCP: usize = 9;
pub const MIDDLE_PIP: usize = 10;
pub const MIDDLE_DIP: usize = 11;
pub const MIDDLE_TIP: usize = 12;
pub const RING_MCP: usize = 13;
pub const RING_PIP: usize = 14;
pub const RING_DIP: usize = 15;
pub const RING_TIP: usize = 16;
pub const PINKY_MCP: usize = 17;
pub const PINKY_PIP: usize = 18;
pub const PINKY_DIP: usize = 19;
pub const PINKY_TIP: usize = 20;

/// A single normalized landmark.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Landmark {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Landmark {
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Image-plane position, ignoring depth.
    #[inline]
    pub fn xy(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    #[inline]
    pub fn to_vec3(&self) -> Vec3 {
        Vec3::new(self.x, self.y, self.z)
    }

    fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

impl From<[f32; 3]> for Landmark {
    fn from([x, y, z]: [f32; 3]) -> Self {
        Self { x, y, z }
    }
}

/// One hand's landmark set.
///
/// Only constructible with exactly [`LANDMARK_COUNT`] finite points, so the
/// classifier can index by the named constants without bounds worries.
#[derive(Debug, Clone, PartialEq)]
pub struct HandLandmarks {
    points: [Landmark; LANDMARK_COUNT],
}

impl HandLandmarks {
    /// Build from a fixed-size array.
    pub fn new(points: [Landmark; LANDMARK_COUNT]) -> Result<Self, LandmarkError> {
        if let Some(index) = points.iter().position(|p| !p.is_finite()) {
            return Err(LandmarkError::NonFinite { index });
        }
        Ok(Self { points })
    }

    /// Build from a slice, rejecting anything that isn't a full hand.
    pub fn from_slice(points: &[Landmark]) -> Result<Self, LandmarkError> {
        let points: [Landmark; LANDMARK_COUNT] =
            points.try_into().map_err(|_| LandmarkError::WrongLength {
                expected: LANDMARK_COUNT,
                actual: points.len(),
            })?;
        Self::new(points)
    }

    #[inline]
    pub fn get(&self, index: usize) -> Option<&Landmark> {
        self.points.get(index)
    }

    #[inline]
    pub fn points(&self) -> &[Landmark; LANDMARK_COUNT] {
        &self.points
    }

    #[inline]
    pub fn wrist(&self) -> Landmark {
        self.points[WRIST]
    }
}

impl std::ops::Index<usize> for HandLandmarks {
    type Output = Landmark;

    fn index(&self, index: usize) -> &Landmark {
        &self.points[index]
    }
}

impl TryFrom<Vec<[f32; 3]>> for HandLandmarks {
    type Error = LandmarkError;

    fn try_from(raw: Vec<[f32; 3]>) -> Result<Self, Self::Error> {
        let points: Vec<Landmark> = raw.into_iter().map(Landmark::from).collect();
        Self::from_slice(&points)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_frame_rejected() {
        let points = vec![Landmark::default(); 17];
        let err = HandLandmarks::from_slice(&points).unwrap_err();
        assert_eq!(
            err,
            LandmarkError::WrongLength {
                expected: 21,
                actual: 17
            }
        );
    }

    #[test]
    fn test_nan_rejected() {
        let mut points = [Landmark::default(); LANDMARK_COUNT];
        points[THUMB_TIP].y = f32::NAN;
        assert_eq!(
            HandLandmarks::new(points).unwrap_err(),
            LandmarkError::NonFinite { index: THUMB_TIP }
        );
    }

    #[test]
    fn test_full_frame_accepted() {
        let raw: Vec<[f32; 3]> = (0..21).map(|i| [i as f32 / 21.0, 0.5, 0.0]).collect();
        let hand = HandLandmarks::try_from(raw).unwrap();
        assert_eq!(hand[INDEX_TIP].x, 8.0 / 21.0);
        assert!(hand.get(LANDMARK_COUNT).is_none());
    }
}
