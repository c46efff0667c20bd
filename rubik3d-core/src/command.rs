//! Discrete commands a host can send to the cube
use std::fmt;

use crate::geometry::Face;

/// A quarter turn requested in camera-relative terms
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Move {
    /// View direction; resolved to a physical face when the move is applied
    pub view: Face,
    pub clockwise: bool,
}

impl Move {
    pub fn new(view: Face, clockwise: bool) -> Self {
        Self { view, clockwise }
    }

    /// The same face turned the other way
    pub fn inverse(self) -> Self {
        Self::new(self.view, !self.clockwise)
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.clockwise {
            write!(f, "{}", self.view)
        } else {
            write!(f, "{}'", self.view)
        }
    }
}

/// Everything the host loop can ask the cube to do
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    /// Drag the camera; deltas are scaled by the configured sensitivity
    RotateCamera { dx: f32, dy: f32 },
    Zoom(f32),
    Turn(Move),
    Reset,
    Scramble(usize),
}
