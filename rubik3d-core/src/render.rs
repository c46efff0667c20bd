//! Turns the cube model into depth-sorted, shaded screen polygons
use std::cmp::Reverse;
use std::collections::HashMap;

use float_ord::FloatOrd;
use log::trace;

use crate::color::{Palette, StickerColor};
use crate::config::{LightingConfig, RenderConfig};
use crate::cube::{CubeModel, PIECE_COUNT};
use crate::geometry::{centroid, polygon_normal, Face};
use crate::projection::Camera;
use crate::quaternion::QuaternionExt;
use crate::raster::{fill_polygon, ColorPair, Surface};
use crate::vector::{Vector3, VectorExt};

/// Directional light with an ambient floor
#[derive(Debug, Clone, PartialEq)]
pub struct Lighting {
    direction: Vector3<f32>,
    ambient: f32,
    diffuse: f32,
    min_brightness: f32,
    max_brightness: f32,
    highlight_threshold: f32,
    highlight_bonus: f32,
}

impl Lighting {
    /// Brightness factor for a face with world-space unit normal `normal`
    pub fn brightness(&self, normal: &Vector3<f32>) -> f32 {
        let dot = normal.dot(&self.direction);
        let mut brightness = self.ambient + dot.max(0.0) * self.diffuse;
        if dot > self.highlight_threshold {
            brightness = (brightness + self.highlight_bonus).min(self.max_brightness);
        }
        brightness.clamp(self.min_brightness, self.max_brightness)
    }
}

impl From<&LightingConfig> for Lighting {
    fn from(config: &LightingConfig) -> Self {
        Self {
            direction: Vector3::from(config.direction).normalized_or_zero(),
            ambient: config.ambient,
            diffuse: config.diffuse,
            min_brightness: config.min_brightness,
            max_brightness: config.max_brightness,
            highlight_threshold: config.highlight_threshold,
            highlight_bonus: config.highlight_bonus,
        }
    }
}

impl Default for Lighting {
    fn default() -> Self {
        Self::from(&LightingConfig::default())
    }
}

/// Allocates display pairs for 256-colour indices, first come first served.
///
/// Allocations persist across frames so each colour is registered with the
/// surface exactly once.
#[derive(Debug, Clone)]
pub struct ColorRegistry {
    pairs: HashMap<u8, ColorPair>,
    capacity: u16,
}

impl ColorRegistry {
    pub fn new(capacity: u16) -> Self {
        Self {
            pairs: HashMap::new(),
            capacity,
        }
    }

    /// Pair for `color_index`, allocating one (and calling `on_new`) if needed.
    ///
    /// Returns `None` once every pair is taken.
    pub fn pair_for(
        &mut self,
        color_index: u8,
        on_new: &mut impl FnMut(ColorPair, u8),
    ) -> Option<ColorPair> {
        if let Some(&pair) = self.pairs.get(&color_index) {
            return Some(pair);
        }
        if self.pairs.len() >= self.capacity as usize {
            return None;
        }
        let pair = self.pairs.len() as ColorPair + 1;
        self.pairs.insert(color_index, pair);
        trace!("Registered colour pair {pair} for 256-colour index {color_index}");
        on_new(pair, color_index);
        Some(pair)
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

/// One visible facelet, ready to be filled
#[derive(Debug, Clone, PartialEq)]
pub struct FacePolygon {
    pub points: Vec<(i32, i32)>,
    pub color: StickerColor,
    pub color_index: u8,
    pub pair: ColorPair,
    /// Distance from the camera to the facelet centre
    pub depth: f32,
}

impl FacePolygon {
    pub fn glyph(&self) -> char {
        self.color.glyph()
    }
}

/// Projects, culls, shades and depth-sorts the cube's facelets
#[derive(Debug, Clone)]
pub struct Renderer {
    camera: Camera,
    cube_position: Vector3<f32>,
    lighting: Lighting,
    palette: Palette,
    registry: ColorRegistry,
}

impl Renderer {
    pub fn new() -> Self {
        Self::with_config(&RenderConfig::default())
    }

    pub fn with_config(config: &RenderConfig) -> Self {
        Self {
            camera: Camera::new(
                Vector3::from(config.camera_position),
                config.focal_length,
                config.aspect_ratio,
            ),
            cube_position: Vector3::from(config.cube_position),
            lighting: Lighting::from(&config.lighting),
            palette: config.palette.clone(),
            registry: ColorRegistry::new(config.max_color_pairs),
        }
    }

    pub fn registry(&self) -> &ColorRegistry {
        &self.registry
    }

    /// Compute the visible facelets, farthest first.
    ///
    /// `on_new_pair` is called for every colour pair allocated during this
    /// frame, before any polygon using it is returned.
    pub fn render(
        &mut self,
        cube: &CubeModel,
        width: u16,
        height: u16,
        mut on_new_pair: impl FnMut(ColorPair, u8),
    ) -> Vec<FacePolygon> {
        let orientation = cube.orientation();
        let mut polygons = Vec::new();

        for index in 0..PIECE_COUNT {
            let piece = &cube.pieces()[index];
            for face in Face::ALL {
                let Some(color) = piece.current_face_color(face) else {
                    continue;
                };

                let corners = cube.display_face_corners(index, face);
                let to_world = |p: &Vector3<f32>| orientation.rotate_vector(p) + self.cube_position;
                let world_center = to_world(&centroid(&corners));
                let normal = orientation.rotate_vector(&polygon_normal(&corners));

                let to_camera = self.camera.position - world_center;
                if normal.dot(&to_camera) <= 0.0 {
                    continue;
                }

                // Skipped facelets must not take a colour pair
                let points: Option<Vec<(i32, i32)>> = corners
                    .iter()
                    .map(|corner| {
                        self.camera
                            .project_point(&to_world(corner), cube.scale(), width, height)
                            .map(|p| (p.x, p.y))
                    })
                    .collect();
                let Some(points) = points else {
                    continue;
                };

                let brightness = self.lighting.brightness(&normal);
                let color_index = self
                    .palette
                    .rgb(color)
                    .apply_brightness(brightness)
                    .to_256_color();
                let Some(pair) = self.registry.pair_for(color_index, &mut on_new_pair) else {
                    trace!("No colour pair left for index {color_index}; skipping facelet");
                    continue;
                };

                polygons.push(FacePolygon {
                    points,
                    color,
                    color_index,
                    pair,
                    depth: self.camera.distance_to(&world_center),
                });
            }
        }

        // Painter's algorithm: farthest first so nearer facelets overdraw
        polygons.sort_by_key(|p| Reverse(FloatOrd(p.depth)));
        polygons
    }

    /// Render the cube and fill every visible facelet onto `surface`
    pub fn draw<S: Surface + ?Sized>(&mut self, cube: &CubeModel, surface: &mut S) -> usize {
        let (width, height) = surface.size();
        let polygons = self.render(cube, width, height, |pair, color_index| {
            surface.init_palette_entry(pair, color_index);
        });
        for polygon in &polygons {
            fill_polygon(surface, &polygon.points, polygon.pair, polygon.glyph());
        }
        polygons.len()
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raster::tests::GridSurface;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::time::{Duration, Instant};

    #[test]
    fn test_brightness_bounds() {
        let lighting = Lighting::default();
        let toward = Vector3::new(0.3_f32, 0.5, -0.8).normalized_or_zero();
        assert!((lighting.brightness(&toward) - 1.2).abs() < 1e-6);
        assert!((lighting.brightness(&-toward) - 0.7).abs() < 1e-6);
        let b = lighting.brightness(&Vector3::y());
        assert!(b > 0.7 && b < 1.2);
    }

    #[test]
    fn test_registry_reuses_and_limits() {
        let mut registry = ColorRegistry::new(2);
        assert!(registry.is_empty());
        let mut seen = Vec::new();
        let mut record = |pair: ColorPair, index: u8| seen.push((pair, index));
        assert_eq!(registry.pair_for(100, &mut record), Some(1));
        assert_eq!(registry.pair_for(100, &mut record), Some(1));
        assert_eq!(registry.pair_for(200, &mut record), Some(2));
        assert_eq!(registry.pair_for(201, &mut record), None);
        assert_eq!(seen, vec![(1, 100), (2, 200)]);
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_solved_front_view_shows_three_faces_at_most() {
        let cube = CubeModel::new();
        let mut renderer = Renderer::new();
        let polygons = renderer.render(&cube, 160, 60, |_, _| {});

        // Straight on, only the 9 front facelets face the camera;
        // side faces are perpendicular to the line of sight at best.
        assert!(!polygons.is_empty());
        assert!(polygons.iter().all(|p| p.points.len() == 4));
        let front = polygons
            .iter()
            .filter(|p| p.color == StickerColor::Red)
            .count();
        assert_eq!(front, 9);
    }

    #[test]
    fn test_depth_sorted_far_to_near() {
        let mut cube = CubeModel::new();
        cube.rotate_camera(40.0, 30.0);
        let mut renderer = Renderer::new();
        let polygons = renderer.render(&cube, 160, 60, |_, _| {});
        assert!(polygons.len() > 9);
        assert!(polygons.windows(2).all(|w| w[0].depth >= w[1].depth));
        // An oblique view shows three faces' worth of stickers
        let colors: std::collections::HashSet<_> = polygons.iter().map(|p| p.color).collect();
        assert_eq!(colors.len(), 3);
    }

    #[test]
    fn test_palette_entries_registered_once_across_frames() {
        let mut cube = CubeModel::new();
        cube.rotate_camera(25.0, -35.0);
        let mut renderer = Renderer::new();
        let mut grid = GridSurface::new(160, 60);

        // GridSurface panics on a duplicate registration
        let drawn = renderer.draw(&cube, &mut grid);
        renderer.draw(&cube, &mut grid);
        assert!(drawn > 0);
        assert!(grid.filled() > 0);
        assert_eq!(grid.palette.len(), renderer.registry().len());
    }

    #[test]
    fn test_full_registry_skips_polygons() {
        let cube = CubeModel::new();
        let config = RenderConfig {
            max_color_pairs: 0,
            ..RenderConfig::default()
        };
        let mut renderer = Renderer::with_config(&config);
        let mut grid = GridSurface::new(160, 60);
        assert_eq!(renderer.draw(&cube, &mut grid), 0);
        assert_eq!(grid.filled(), 0);
    }

    #[test]
    fn test_cube_behind_camera_is_not_drawn() {
        let cube = CubeModel::new();
        let config = RenderConfig {
            cube_position: [0.0, 0.0, -10.0],
            ..RenderConfig::default()
        };
        let mut renderer = Renderer::with_config(&config);
        assert!(renderer.render(&cube, 160, 60, |_, _| {}).is_empty());
    }

    #[test]
    fn test_facelets_behind_camera_allocate_no_pairs() {
        // Off to the side and straddling the camera plane: the whole front
        // face and part of the left and bottom faces lie behind the camera
        let cube = CubeModel::new();
        let config = RenderConfig {
            cube_position: [3.0, 0.0, 0.5],
            ..RenderConfig::default()
        };
        let mut renderer = Renderer::with_config(&config);
        let mut registered = Vec::new();
        let polygons = renderer.render(&cube, 160, 60, |pair, _| registered.push(pair));

        assert!(!polygons.is_empty());
        assert!(polygons.iter().all(|p| p.color != StickerColor::Red));
        let used: std::collections::HashSet<_> = polygons.iter().map(|p| p.pair).collect();
        assert_eq!(registered.len(), used.len());
        assert!(registered.iter().all(|pair| used.contains(pair)));
    }

    #[test]
    fn test_frame_mid_turn_and_after_scramble() {
        let mut cube = CubeModel::new();
        cube.scramble_with(15, &mut StdRng::seed_from_u64(3));
        cube.rotate_camera(-30.0, 20.0);
        let start = Instant::now();
        cube.turn(Face::U, true, start);
        cube.tick(start + Duration::from_millis(100));

        let mut renderer = Renderer::new();
        let mut grid = GridSurface::new(120, 50);
        assert!(renderer.draw(&cube, &mut grid) > 0);
        assert!(grid.filled() > 0);
    }

    #[test]
    fn test_front_center_is_drawn_in_the_middle() {
        let cube = CubeModel::new();
        let mut renderer = Renderer::new();
        let mut grid = GridSurface::new(160, 60);
        renderer.draw(&cube, &mut grid);
        let (_, glyph) = grid.cell(80, 30).expect("centre cell is covered");
        assert_eq!(glyph, StickerColor::Red.glyph());
    }
}
