//! Pinhole camera projection onto a character grid
use crate::vector::Vector3;

/// A projected point in character cells, with its distance from the camera
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenPoint {
    pub x: i32,
    pub y: i32,
    pub depth: f32,
}

/// Camera configuration for the terminal view.
///
/// The camera looks down +Z; screen X follows world X and screen Y is flipped
/// so world +Y points up. Character cells are roughly twice as tall as they
/// are wide, which `aspect_ratio` compensates for.
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    pub position: Vector3<f32>,
    pub focal_length: f32,
    pub aspect_ratio: f32,
}

impl Camera {
    pub fn new(position: Vector3<f32>, focal_length: f32, aspect_ratio: f32) -> Self {
        Self {
            position,
            focal_length,
            aspect_ratio,
        }
    }

    /// Project a world-space point to screen cells.
    ///
    /// Returns `None` when the point is at or behind the camera plane.
    pub fn project_point(
        &self,
        point: &Vector3<f32>,
        scale: f32,
        width: u16,
        height: u16,
    ) -> Option<ScreenPoint> {
        let relative = point - self.position;

        if relative.z <= 0.0 {
            return None;
        }

        let screen_x = relative.x * self.focal_length / relative.z;
        let screen_y = -relative.y * self.focal_length / relative.z;

        Some(ScreenPoint {
            x: (screen_x * scale + width as f32 / 2.0) as i32,
            y: (screen_y * scale / self.aspect_ratio + height as f32 / 2.0) as i32,
            depth: relative.norm(),
        })
    }

    /// Distance from the camera to a world-space point
    pub fn distance_to(&self, point: &Vector3<f32>) -> f32 {
        (point - self.position).norm()
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(Vector3::zeros(), 8.0, 2.0)
    }
}
