//! rubik3d core library - cube state, rotation engine and rendering pipeline
//!
//! This crate models a 3x3x3 twisty puzzle with quaternion-tracked pieces and
//! renders it as shaded, depth-sorted polygons for a character grid. It has no
//! terminal dependencies: hosts feed it commands and frame times and supply a
//! [`Surface`] to draw on.

pub mod color;
pub mod command;
pub mod config;
pub mod cube;
pub mod geometry;
pub mod piece;
pub mod projection;
pub mod quaternion;
pub mod raster;
pub mod render;
pub mod vector;

// Re-export commonly used types
pub use color::{Palette, Rgb, StickerColor};
pub use command::{Command, Move};
pub use config::{Config, ConfigError};
pub use cube::{CubeModel, Turn, TurnState};
pub use geometry::Face;
pub use piece::{CubePiece, PieceType};
pub use projection::{Camera, ScreenPoint};
pub use raster::{ColorPair, Surface};
pub use render::{FacePolygon, Renderer};
