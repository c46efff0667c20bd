//! The 26-piece puzzle: orientation, view mapping and the turn state machine
use std::f32::consts::FRAC_PI_2;
use std::time::Instant;

use log::{debug, info};
use rand::Rng;

use crate::command::{Command, Move};
use crate::config::CubeConfig;
use crate::geometry::Face;
use crate::piece::CubePiece;
use crate::quaternion::{Quaternion, QuaternionExt};
use crate::vector::{Vector3, VectorExt};

pub const PIECE_COUNT: usize = 26;

/// Angle of a single face turn
pub const QUARTER_TURN: f32 = FRAC_PI_2;

/// A view direction only takes over a new face if they are at least this aligned
const VIEW_MAPPING_THRESHOLD: f32 = 0.5;

/// Tolerance for comparing piece positions against the solved grid
const SOLVED_EPSILON: f32 = 1e-3;

/// A face turn in progress.
///
/// The affected pieces keep their persisted position and rotation until the
/// turn completes; in the meantime only their displayed pose is interpolated.
#[derive(Debug, Clone, PartialEq)]
pub struct Turn {
    pub face: Face,
    pub axis: Vector3<f32>,
    pub clockwise: bool,
    pub progress: f32,
    pub started_at: Instant,
    /// Indices into [`CubeModel::pieces`]
    pub pieces: Vec<usize>,
}

impl Turn {
    fn full_angle(&self) -> f32 {
        signed_quarter_turn(self.clockwise)
    }

    /// Rotation covering the fraction of the turn done so far
    pub fn partial_rotation(&self) -> Quaternion<f32> {
        Quaternion::from_axis_angle(&self.axis, self.full_angle() * self.progress)
    }

    pub fn moves_piece(&self, index: usize) -> bool {
        self.pieces.contains(&index)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub enum TurnState {
    #[default]
    Idle,
    Turning(Turn),
}

/// Positive angles about a face's outward axis read as clockwise on screen,
/// because the projection flips the Y axis.
fn signed_quarter_turn(clockwise: bool) -> f32 {
    if clockwise {
        QUARTER_TURN
    } else {
        -QUARTER_TURN
    }
}

/// Piece at grid cell `index` in x-major order, skipping the hidden core
fn solved_piece(index: usize) -> CubePiece {
    let cell = if index < 13 { index } else { index + 1 };
    let coord = |n: usize| n as f32 - 1.0;
    CubePiece::solved_at(Vector3::new(
        coord(cell / 9),
        coord(cell / 3 % 3),
        coord(cell % 3),
    ))
}

const IDENTITY_MAPPING: [Face; 6] = Face::ALL;

/// The whole puzzle and its viewing state.
///
/// Not internally synchronized: a host that shares it between threads must
/// serialize every call, rendering included.
#[derive(Debug, Clone)]
pub struct CubeModel {
    pieces: [CubePiece; PIECE_COUNT],
    orientation: Quaternion<f32>,
    /// Physical face currently shown in each view direction, indexed by `Face::index`
    view_mapping: [Face; 6],
    scale: f32,
    state: TurnState,
    config: CubeConfig,
}

impl CubeModel {
    pub fn new() -> Self {
        Self::with_config(CubeConfig::default())
    }

    pub fn with_config(config: CubeConfig) -> Self {
        info!("Creating solved cube with {PIECE_COUNT} pieces");
        Self {
            pieces: std::array::from_fn(solved_piece),
            orientation: Quaternion::identity(),
            view_mapping: IDENTITY_MAPPING,
            scale: config.initial_scale,
            state: TurnState::Idle,
            config,
        }
    }

    pub fn pieces(&self) -> &[CubePiece] {
        &self.pieces
    }

    /// Rotation of the whole cube in world space
    pub fn orientation(&self) -> Quaternion<f32> {
        self.orientation
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    pub fn config(&self) -> &CubeConfig {
        &self.config
    }

    pub fn state(&self) -> &TurnState {
        &self.state
    }

    pub fn is_animating(&self) -> bool {
        matches!(self.state, TurnState::Turning(_))
    }

    pub fn animation_progress(&self) -> Option<f32> {
        match &self.state {
            TurnState::Turning(turn) => Some(turn.progress),
            TurnState::Idle => None,
        }
    }

    /// Physical face currently shown in view direction `view`
    pub fn face_for_view(&self, view: Face) -> Face {
        self.view_mapping[view.index()]
    }

    pub fn view_mapping(&self) -> [(Face, Face); 6] {
        Face::ALL.map(|view| (view, self.face_for_view(view)))
    }

    /// Indices of the pieces whose current position lies on `face`
    pub fn pieces_on_face(&self, face: Face) -> Vec<usize> {
        self.pieces
            .iter()
            .enumerate()
            .filter(|(_, piece)| face.contains(&piece.position()))
            .map(|(i, _)| i)
            .collect()
    }

    /// Whether every sticker is back where it started
    pub fn is_solved(&self) -> bool {
        !self.is_animating()
            && self.pieces.iter().all(|piece| {
                piece.position().approx_eq_eps(&piece.home(), SOLVED_EPSILON)
                    && Face::ALL
                        .iter()
                        .all(|&face| piece.current_face_color(face) == piece.home_sticker(face))
            })
    }

    /// Drag the camera. `dx` spins about world Y and `dy` about world X.
    pub fn rotate_camera(&mut self, dx: f32, dy: f32) {
        let sensitivity = self.config.camera_sensitivity;
        if dx != 0.0 {
            let spin = Quaternion::from_axis_angle(&Vector3::y(), -dx * sensitivity);
            self.orientation = spin.then_after(&self.orientation);
        }
        if dy != 0.0 {
            let tilt = Quaternion::from_axis_angle(&Vector3::x(), -dy * sensitivity);
            self.orientation = tilt.then_after(&self.orientation);
        }
        self.update_view_mapping();
    }

    pub fn zoom(&mut self, delta: f32) {
        self.scale = (self.scale + delta * self.config.zoom_step)
            .clamp(self.config.min_scale, self.config.max_scale);
    }

    /// Recompute which physical face each view direction shows.
    ///
    /// An entry only changes when some face is aligned with the view direction
    /// by more than [`VIEW_MAPPING_THRESHOLD`]; otherwise the old entry stays.
    fn update_view_mapping(&mut self) {
        let inverse = self.orientation.conjugate();
        for view in Face::ALL {
            let direction = inverse.rotate_vector(&view.normal());

            let mut best = None;
            let mut best_dot = -1.0;
            for face in Face::ALL {
                let dot = direction.dot(&face.normal());
                if dot > best_dot {
                    best_dot = dot;
                    best = Some(face);
                }
            }

            match best {
                Some(face) if best_dot > VIEW_MAPPING_THRESHOLD => {
                    self.view_mapping[view.index()] = face;
                }
                _ => {}
            }
        }
    }

    /// Start an animated quarter turn of whatever face `view` currently shows.
    ///
    /// A turn already in flight is completed first.
    pub fn turn(&mut self, view: Face, clockwise: bool, now: Instant) {
        self.finish_turn();

        let face = self.face_for_view(view);
        let pieces = self.pieces_on_face(face);
        debug!(
            "Turning {face} ({}) via view {view}: {} pieces",
            if clockwise { "cw" } else { "ccw" },
            pieces.len()
        );

        self.state = TurnState::Turning(Turn {
            face,
            axis: face.normal(),
            clockwise,
            progress: 0.0,
            started_at: now,
            pieces,
        });
    }

    /// [`CubeModel::turn`] with a textual view direction. Unknown names are ignored.
    pub fn turn_named(&mut self, view: &str, clockwise: bool, now: Instant) {
        match view.parse::<Face>() {
            Ok(view) => self.turn(view, clockwise, now),
            Err(err) => debug!("Ignoring turn: {err}"),
        }
    }

    /// Apply a quarter turn without animation
    pub fn turn_immediate(&mut self, view: Face, clockwise: bool) {
        self.finish_turn();
        let face = self.face_for_view(view);
        let angle = signed_quarter_turn(clockwise);
        for index in self.pieces_on_face(face) {
            self.pieces[index].rotate(&face.normal(), angle);
        }
    }

    /// Advance the running animation to time `now`
    pub fn tick(&mut self, now: Instant) {
        let duration = self.config.animation_duration().as_secs_f32();
        let done = match &mut self.state {
            TurnState::Idle => return,
            TurnState::Turning(turn) => {
                let elapsed = now.saturating_duration_since(turn.started_at).as_secs_f32();
                turn.progress = (elapsed / duration).clamp(0.0, 1.0);
                turn.progress >= 1.0
            }
        };
        if done {
            self.finish_turn();
        }
    }

    /// Commit the running turn, if any, to the affected pieces
    pub fn finish_turn(&mut self) {
        if let TurnState::Turning(turn) = std::mem::take(&mut self.state) {
            let angle = turn.full_angle();
            for &index in &turn.pieces {
                self.pieces[index].rotate(&turn.axis, angle);
            }
            debug!("Completed turn of {}", turn.face);
        }
    }

    /// Position of a piece as it should be drawn this frame
    pub fn display_position(&self, index: usize) -> Vector3<f32> {
        let position = self.pieces[index].position();
        match &self.state {
            TurnState::Turning(turn) if turn.moves_piece(index) => {
                turn.partial_rotation().rotate_vector(&position)
            }
            _ => position,
        }
    }

    /// Corners, in cube space, of the facelet of piece `index` facing `face`
    pub fn display_face_corners(&self, index: usize, face: Face) -> [Vector3<f32>; 4] {
        let piece = &self.pieces[index];
        let mut corners = piece.facelet_corners(face);

        if let TurnState::Turning(turn) = &self.state {
            if turn.moves_piece(index) {
                let partial = turn.partial_rotation();
                corners = corners.map(|corner| partial.rotate_vector(&corner));
            }
        }

        let center = self.display_position(index);
        corners.map(|corner| corner + center)
    }

    /// Back to the solved cube, seen straight on
    pub fn reset(&mut self) {
        for piece in &mut self.pieces {
            piece.reset();
        }
        self.orientation = Quaternion::identity();
        self.scale = self.config.initial_scale;
        self.state = TurnState::Idle;
        self.view_mapping = IDENTITY_MAPPING;
        debug!("Cube reset");
    }

    /// Apply `moves` random quarter turns drawn from the thread RNG
    pub fn scramble(&mut self, moves: usize) -> Vec<Move> {
        self.scramble_with(moves, &mut rand::rng())
    }

    /// Apply `moves` random unanimated quarter turns and return them in order
    pub fn scramble_with<R: Rng + ?Sized>(&mut self, moves: usize, rng: &mut R) -> Vec<Move> {
        self.finish_turn();

        let sequence: Vec<Move> = (0..moves)
            .map(|_| {
                let view = Face::ALL[rng.random_range(0..Face::ALL.len())];
                Move::new(view, rng.random_bool(0.5))
            })
            .collect();

        for m in &sequence {
            self.turn_immediate(m.view, m.clockwise);
        }

        debug!(
            "Scrambled with {} moves: {}",
            sequence.len(),
            sequence.iter().map(Move::to_string).collect::<Vec<_>>().join(" ")
        );
        sequence
    }

    /// Dispatch a host command
    pub fn apply(&mut self, command: Command, now: Instant) {
        match command {
            Command::RotateCamera { dx, dy } => self.rotate_camera(dx, dy),
            Command::Zoom(delta) => self.zoom(delta),
            Command::Turn(m) => self.turn(m.view, m.clockwise, now),
            Command::Reset => self.reset(),
            Command::Scramble(moves) => {
                self.scramble(moves);
            }
        }
    }
}

impl Default for CubeModel {
    fn default() -> Self {
        Self::new()
    }
}
