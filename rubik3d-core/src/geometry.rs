//! Face identifiers and the fixed per-face geometry of a unit cubie
use std::fmt;
use std::str::FromStr;

use crate::color::StickerColor;
use crate::vector::{Vector3, VectorExt};

/// One of the six cube faces.
///
/// The same identifiers name both the physical faces of the puzzle and the
/// camera-relative view directions that are mapped onto them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Face {
    F,
    B,
    L,
    R,
    U,
    D,
}

impl Face {
    pub const ALL: [Face; 6] = [Face::F, Face::B, Face::L, Face::R, Face::U, Face::D];

    /// Position of this face in [`Face::ALL`]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Outward unit normal, which is also the axis of a quarter turn
    pub fn normal(self) -> Vector3<f32> {
        match self {
            Face::F => Vector3::new(0.0, 0.0, -1.0),
            Face::B => Vector3::new(0.0, 0.0, 1.0),
            Face::L => Vector3::new(-1.0, 0.0, 0.0),
            Face::R => Vector3::new(1.0, 0.0, 0.0),
            Face::U => Vector3::new(0.0, 1.0, 0.0),
            Face::D => Vector3::new(0.0, -1.0, 0.0),
        }
    }

    pub fn opposite(self) -> Face {
        match self {
            Face::F => Face::B,
            Face::B => Face::F,
            Face::L => Face::R,
            Face::R => Face::L,
            Face::U => Face::D,
            Face::D => Face::U,
        }
    }

    /// Sticker colour of this face on a solved cube
    pub fn home_color(self) -> StickerColor {
        match self {
            Face::F => StickerColor::Red,
            Face::B => StickerColor::Orange,
            Face::L => StickerColor::Blue,
            Face::R => StickerColor::Green,
            Face::U => StickerColor::White,
            Face::D => StickerColor::Yellow,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Face::F => "Front",
            Face::B => "Back",
            Face::L => "Left",
            Face::R => "Right",
            Face::U => "Up",
            Face::D => "Down",
        }
    }

    /// Whether a cubie centred at `position` lies in this face's layer
    pub fn contains(self, position: &Vector3<f32>) -> bool {
        (position.dot(&self.normal()) - 1.0).abs() < FACE_MEMBERSHIP_TOLERANCE
    }

    /// Corners of this face of a unit cubie centred at the origin.
    ///
    /// The winding is chosen so that `(c1 - c0) x (c2 - c0)` is the outward
    /// normal.
    pub fn unit_corners(self) -> [Vector3<f32>; 4] {
        // (u, v) span the face with u x v = normal
        let (u, v) = match self {
            Face::F => (Vector3::y(), Vector3::x()),
            Face::B => (Vector3::x(), Vector3::y()),
            Face::L => (Vector3::z(), Vector3::y()),
            Face::R => (Vector3::y(), Vector3::z()),
            Face::U => (Vector3::z(), Vector3::x()),
            Face::D => (Vector3::x(), Vector3::z()),
        };
        let n = self.normal();
        [
            (n - u - v) * 0.5,
            (n + u - v) * 0.5,
            (n + u + v) * 0.5,
            (n - u + v) * 0.5,
        ]
    }
}

/// Distance from `±1` within which a coordinate counts as on a face
pub const FACE_MEMBERSHIP_TOLERANCE: f32 = 0.1;

/// Unit normal of a polygon from its first three corners
pub fn polygon_normal(corners: &[Vector3<f32>]) -> Vector3<f32> {
    if corners.len() < 3 {
        return Vector3::zeros();
    }
    let edge1 = corners[1] - corners[0];
    let edge2 = corners[2] - corners[0];
    edge1.cross(&edge2).normalized_or_zero()
}

/// Mean of a set of points
pub fn centroid(points: &[Vector3<f32>]) -> Vector3<f32> {
    if points.is_empty() {
        return Vector3::zeros();
    }
    points.iter().sum::<Vector3<f32>>() / points.len() as f32
}

impl fmt::Display for Face {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let c = match self {
            Face::F => "F",
            Face::B => "B",
            Face::L => "L",
            Face::R => "R",
            Face::U => "U",
            Face::D => "D",
        };
        f.write_str(c)
    }
}

/// Error returned when a string is not one of `F B L R U D`
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown face identifier {0:?}")]
pub struct ParseFaceError(pub String);

impl TryFrom<char> for Face {
    type Error = ParseFaceError;

    fn try_from(c: char) -> Result<Self, Self::Error> {
        match c.to_ascii_uppercase() {
            'F' => Ok(Face::F),
            'B' => Ok(Face::B),
            'L' => Ok(Face::L),
            'R' => Ok(Face::R),
            'U' => Ok(Face::U),
            'D' => Ok(Face::D),
            _ => Err(ParseFaceError(c.to_string())),
        }
    }
}

impl FromStr for Face {
    type Err = ParseFaceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.trim().chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Face::try_from(c).map_err(|_| ParseFaceError(s.to_string())),
            _ => Err(ParseFaceError(s.to_string())),
        }
    }
}
