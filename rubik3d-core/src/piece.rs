//! A single cubie: where it started, where it is now, and which way it faces
use std::fmt;

use crate::color::StickerColor;
use crate::geometry::Face;
use crate::quaternion::{Quaternion, QuaternionExt};
use crate::vector::{Vector3, VectorExt};

/// Minimum alignment for a rotated face normal to count as matching a sticker
const STICKER_MATCH_THRESHOLD: f32 = 0.9;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PieceType {
    Corner,
    Edge,
    Center,
}

impl PieceType {
    /// Classify a grid cell by how many of its coordinates are non-zero
    pub fn from_home(home: &Vector3<f32>) -> PieceType {
        match home.iter().filter(|c| c.abs() > 0.5).count() {
            3 => PieceType::Corner,
            2 => PieceType::Edge,
            _ => PieceType::Center,
        }
    }

    /// Number of stickers a piece of this type carries
    pub fn sticker_count(self) -> usize {
        match self {
            PieceType::Corner => 3,
            PieceType::Edge => 2,
            PieceType::Center => 1,
        }
    }
}

/// One physical cubie.
///
/// `home` and `kind` never change. The sticker table is fixed at
/// construction and keyed by the face the sticker was on in the solved cube;
/// turning the piece changes which cube face each sticker currently shows on,
/// never the table itself.
#[derive(Debug, Clone)]
pub struct CubePiece {
    home: Vector3<f32>,
    kind: PieceType,
    position: Vector3<f32>,
    rotation: Quaternion<f32>,
    stickers: [Option<StickerColor>; 6],
}

impl CubePiece {
    /// Create a piece at grid cell `home` (each coordinate in `{-1, 0, 1}`).
    ///
    /// Returns `None` for the hidden core cell `(0, 0, 0)`.
    pub fn new(home: Vector3<f32>) -> Option<Self> {
        (home.norm() > 0.5).then(|| Self::solved_at(home))
    }

    pub(crate) fn solved_at(home: Vector3<f32>) -> Self {
        let mut stickers = [None; 6];
        for face in Face::ALL {
            if face.contains(&home) {
                stickers[face.index()] = Some(face.home_color());
            }
        }
        Self {
            home,
            kind: PieceType::from_home(&home),
            position: home,
            rotation: Quaternion::identity(),
            stickers,
        }
    }

    pub fn home(&self) -> Vector3<f32> {
        self.home
    }

    pub fn kind(&self) -> PieceType {
        self.kind
    }

    pub fn position(&self) -> Vector3<f32> {
        self.position
    }

    pub fn rotation(&self) -> Quaternion<f32> {
        self.rotation
    }

    /// Sticker that was on `face` in the solved cube, ignoring any turns
    pub fn home_sticker(&self, face: Face) -> Option<StickerColor> {
        self.stickers[face.index()]
    }

    /// Rotate the piece about an axis through the cube centre
    pub fn rotate(&mut self, axis: &Vector3<f32>, angle: f32) {
        let q = Quaternion::from_axis_angle(axis, angle);
        self.position = q.rotate_vector(&self.position);
        self.rotation = q.then_after(&self.rotation);
    }

    /// Corners of the piece's own `local_face`, carried along by its
    /// accumulated rotation. Relative to the piece centre.
    pub fn face_corners(&self, local_face: Face) -> [Vector3<f32>; 4] {
        local_face
            .unit_corners()
            .map(|corner| self.rotation.rotate_vector(&corner))
    }

    /// The piece's own face that currently points toward cube face `face`
    pub fn local_face_toward(&self, face: Face) -> Face {
        let direction = self.rotation.conjugate().rotate_vector(&face.normal());
        let mut best = face;
        let mut best_dot = f32::NEG_INFINITY;
        for candidate in Face::ALL {
            let dot = direction.dot(&candidate.normal());
            if dot > best_dot {
                best_dot = dot;
                best = candidate;
            }
        }
        best
    }

    /// Corners of whichever of the piece's faces now points toward `face`
    pub fn facelet_corners(&self, face: Face) -> [Vector3<f32>; 4] {
        self.face_corners(self.local_face_toward(face))
    }

    /// Colour of the sticker now showing on cube face `face`, if any.
    ///
    /// The face normal is taken back into the piece's solved frame and
    /// matched against the normals of its home stickers.
    pub fn current_face_color(&self, face: Face) -> Option<StickerColor> {
        let direction = self.rotation.conjugate().rotate_vector(&face.normal());

        let mut best: Option<(f32, StickerColor)> = None;
        for home_face in Face::ALL {
            let Some(color) = self.stickers[home_face.index()] else {
                continue;
            };
            let dot = direction.dot(&home_face.normal());
            if best.map_or(true, |(best_dot, _)| dot > best_dot) {
                best = Some((dot, color));
            }
        }

        best.filter(|(dot, _)| *dot > STICKER_MATCH_THRESHOLD)
            .map(|(_, color)| color)
    }

    /// Back to the solved position and orientation
    pub fn reset(&mut self) {
        self.position = self.home;
        self.rotation = Quaternion::identity();
    }

    /// Whether the piece sits at `home` with (up to sign) identity rotation
    pub fn is_home(&self, epsilon: f32) -> bool {
        self.position.approx_eq_eps(&self.home, epsilon)
            && (self.rotation.w.abs() - 1.0).abs() < epsilon
    }
}

impl fmt::Display for CubePiece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:?}({:.2}, {:.2}, {:.2})",
            self.kind, self.position.x, self.position.y, self.position.z
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    fn piece(x: f32, y: f32, z: f32) -> CubePiece {
        CubePiece::new(Vector3::new(x, y, z)).expect("not the core cell")
    }

    fn stickers_on(p: &CubePiece) -> usize {
        Face::ALL.iter().filter(|f| p.home_sticker(**f).is_some()).count()
    }

    #[test]
    fn test_sticker_counts() {
        let corner = piece(1.0, 1.0, -1.0);
        assert_eq!(corner.kind(), PieceType::Corner);
        assert_eq!(stickers_on(&corner), corner.kind().sticker_count());
        assert_eq!(stickers_on(&corner), 3);
        assert_eq!(corner.home_sticker(Face::R), Some(StickerColor::Green));
        assert_eq!(corner.home_sticker(Face::U), Some(StickerColor::White));
        assert_eq!(corner.home_sticker(Face::F), Some(StickerColor::Red));

        let edge = piece(0.0, -1.0, 1.0);
        assert_eq!(edge.kind(), PieceType::Edge);
        assert_eq!(stickers_on(&edge), edge.kind().sticker_count());
        assert_eq!(stickers_on(&edge), 2);

        let center = piece(0.0, 0.0, 1.0);
        assert_eq!(center.kind(), PieceType::Center);
        assert_eq!(center.home_sticker(Face::B), Some(StickerColor::Orange));
        assert_eq!(stickers_on(&center), center.kind().sticker_count());
        assert_eq!(stickers_on(&center), 1);

        assert!(CubePiece::new(Vector3::zeros()).is_none());
    }

    #[test]
    fn test_unturned_colors_match_home() {
        let corner = piece(-1.0, -1.0, -1.0);
        for face in Face::ALL {
            assert_eq!(corner.current_face_color(face), corner.home_sticker(face));
        }
    }

    #[test]
    fn test_colors_travel_with_piece() {
        // Quarter turn of R: the R/U/F corner's front sticker moves to the top.
        let mut corner = piece(1.0, 1.0, -1.0);
        corner.rotate(&Face::R.normal(), FRAC_PI_2);

        assert!(corner.position().approx_eq_eps(&Vector3::new(1.0, 1.0, 1.0), 1e-5));
        assert_eq!(corner.current_face_color(Face::R), Some(StickerColor::Green));
        assert_eq!(corner.current_face_color(Face::U), Some(StickerColor::Red));
        assert_eq!(corner.current_face_color(Face::B), Some(StickerColor::White));
        assert_eq!(corner.current_face_color(Face::F), None);
        assert_eq!(corner.current_face_color(Face::D), None);
    }

    #[test]
    fn test_facelet_corners_face_the_requested_direction() {
        let mut corner = piece(1.0, 1.0, -1.0);
        corner.rotate(&Face::R.normal(), FRAC_PI_2);
        for face in Face::ALL {
            let corners = corner.facelet_corners(face);
            let normal = crate::geometry::polygon_normal(&corners);
            assert!(normal.approx_eq_eps(&face.normal(), 1e-5));
        }
    }

    #[test]
    fn test_four_turns_restore_piece() {
        let mut edge = piece(0.0, 1.0, -1.0);
        for _ in 0..4 {
            edge.rotate(&Face::U.normal(), FRAC_PI_2);
        }
        assert!(edge.is_home(1e-3));
        for face in Face::ALL {
            assert_eq!(edge.current_face_color(face), edge.home_sticker(face));
        }
    }

    #[test]
    fn test_reset() {
        let mut corner = piece(1.0, -1.0, 1.0);
        corner.rotate(&Vector3::x(), FRAC_PI_2);
        corner.rotate(&Vector3::y(), -FRAC_PI_2);
        assert!(!corner.is_home(1e-3));
        corner.reset();
        assert_eq!(corner.position(), corner.home());
        assert_eq!(corner.rotation(), Quaternion::identity());
    }
}
