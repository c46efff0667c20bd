//! Help box, title and footer drawn over the cube each frame
use rubik3d_core::{CubeModel, Face};

use crate::canvas::{CellStyle, TerminalCanvas};

pub const TITLE: &str = "3x3 Rubik's Cube";
pub const FOOTER: &str = "Press ESC to exit | C to reset | X to scramble";

const CONTROLS: &[&str] = &[
    "Controls:",
    "  Arrow Keys - Rotate cube",
    "  Mouse drag - Rotate cube",
    "  +/-        - Zoom in/out",
    "  C          - Reset cube",
    "  X          - Scramble cube",
    "  ESC        - Exit",
    "",
    "Rotate faces (based on current view):",
    "  f - Front clockwise  F - Front counter",
    "  b - Back clockwise   B - Back counter",
    "  l - Left clockwise   L - Left counter",
    "  r - Right clockwise  R - Right counter",
    "  u - Up clockwise     U - Up counter",
    "  d - Down clockwise   D - Down counter",
    "",
    "Current view mapping:",
];

/// Row of the help box's top border
const BOX_TOP: u16 = 2;

/// "Front(F) -> Red face", padded so the arrows line up
pub fn view_mapping_line(view: Face, physical: Face) -> String {
    let label = format!("{}({})", view.name(), view);
    format!("  {label:<8} -> {} face", physical.home_color().name())
}

/// Every line of the help box, top to bottom
pub fn help_lines(cube: &CubeModel, fps: f32) -> Vec<String> {
    let mut lines: Vec<String> = CONTROLS.iter().map(|line| line.to_string()).collect();
    lines.extend(
        cube.view_mapping()
            .iter()
            .map(|&(view, physical)| view_mapping_line(view, physical)),
    );
    lines.push(String::new());
    lines.push(format!("Scale: {}", cube.scale() as i32));
    lines.push(match cube.animation_progress() {
        Some(progress) => format!("Animation: Active ({:.0}%)", progress * 100.0),
        None => "Animation: None".to_string(),
    });
    lines.push(format!("FPS: {fps:.1}"));
    lines
}

pub fn resize_message(min_width: u16, min_height: u16) -> String {
    format!("Please resize terminal to at least {min_width}x{min_height}")
}

/// Draw the title, the boxed help text (when it fits) and the footer
pub fn draw_overlay(canvas: &mut TerminalCanvas, cube: &CubeModel, fps: f32) {
    let (width, height) = (canvas.width(), canvas.height());
    canvas.put_centered(0, TITLE, CellStyle::Normal);

    let lines = help_lines(cube, fps);
    let box_width = lines.iter().map(|l| l.chars().count()).max().unwrap_or(0) as u16 + 4;
    let box_height = lines.len() as u16 + 2;
    if let Some(box_x) = width.checked_sub(box_width + 2).filter(|&x| x > 0) {
        if BOX_TOP + box_height < height {
            draw_box(canvas, box_x, BOX_TOP, box_width, box_height);
            for (row, line) in lines.iter().enumerate() {
                canvas.put_str(box_x + 2, BOX_TOP + 1 + row as u16, line, CellStyle::Normal);
            }
        }
    }

    if let Some(last) = height.checked_sub(1) {
        canvas.put_centered(last, FOOTER, CellStyle::Reverse);
    }
}

fn draw_box(canvas: &mut TerminalCanvas, x: u16, y: u16, width: u16, height: u16) {
    let inner = "-".repeat(width as usize - 2);
    let edge = format!("+{inner}+");
    let blank = format!("|{}|", " ".repeat(width as usize - 2));
    canvas.put_str(x, y, &edge, CellStyle::Normal);
    for row in y + 1..y + height - 1 {
        canvas.put_str(x, row, &blank, CellStyle::Normal);
    }
    canvas.put_str(x, y + height - 1, &edge, CellStyle::Normal);
}

/// Replace the frame with a centred request for a bigger terminal
pub fn draw_resize_message(canvas: &mut TerminalCanvas, min_width: u16, min_height: u16) {
    canvas.clear();
    let message = resize_message(min_width, min_height);
    let row = canvas.height() / 2;
    let len = message.chars().count() as u16;
    let x = canvas.width().saturating_sub(len) / 2;
    canvas.put_str(x, row, &message, CellStyle::Normal);
}
