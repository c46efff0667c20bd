//! Keyboard and mouse events translated into cube commands
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};

use rubik3d_core::{Command, Face, Move};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Action {
    Quit,
    Cube(Command),
}

/// Map a key press to an action; `None` for keys without a binding
pub fn action_for_key(key: KeyEvent, camera_step: f32, scramble_moves: usize) -> Option<Action> {
    if key.kind == KeyEventKind::Release {
        return None;
    }
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Some(Action::Quit);
    }

    let rotate = |dx, dy| Some(Action::Cube(Command::RotateCamera { dx, dy }));
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('Q') => Some(Action::Quit),
        KeyCode::Up => rotate(0.0, -camera_step),
        KeyCode::Down => rotate(0.0, camera_step),
        KeyCode::Left => rotate(-camera_step, 0.0),
        KeyCode::Right => rotate(camera_step, 0.0),
        KeyCode::Char('+') | KeyCode::Char('=') => Some(Action::Cube(Command::Zoom(1.0))),
        KeyCode::Char('-') | KeyCode::Char('_') => Some(Action::Cube(Command::Zoom(-1.0))),
        KeyCode::Char('c') | KeyCode::Char('C') => Some(Action::Cube(Command::Reset)),
        KeyCode::Char('x') | KeyCode::Char('X') => {
            Some(Action::Cube(Command::Scramble(scramble_moves)))
        }
        KeyCode::Char(ch) => {
            let view = Face::try_from(ch).ok()?;
            let clockwise = ch.is_ascii_lowercase();
            Some(Action::Cube(Command::Turn(Move::new(view, clockwise))))
        }
        _ => None,
    }
}

/// Tracks a left-button drag and turns its motion into camera rotation
#[derive(Debug, Default)]
pub struct DragTracker {
    last: Option<(u16, u16)>,
}

impl DragTracker {
    /// Returns a camera rotation for drag motion, scaled by `step` per cell
    pub fn handle(&mut self, event: MouseEvent, step: f32) -> Option<Command> {
        let here = (event.column, event.row);
        match event.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                self.last = Some(here);
                None
            }
            MouseEventKind::Drag(MouseButton::Left) => {
                let (last_x, last_y) = self.last.replace(here)?;
                let dx = (here.0 as f32 - last_x as f32) * step;
                let dy = (here.1 as f32 - last_y as f32) * step;
                (dx != 0.0 || dy != 0.0).then_some(Command::RotateCamera { dx, dy })
            }
            MouseEventKind::Up(MouseButton::Left) => {
                self.last = None;
                None
            }
            _ => None,
        }
    }

    pub fn is_dragging(&self) -> bool {
        self.last.is_some()
    }
}
