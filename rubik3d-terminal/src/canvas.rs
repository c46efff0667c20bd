//! Character cell buffer that the cube renderer fills and crossterm flushes
use crossterm::{
    cursor::MoveTo,
    style::{Attribute, Color, Colors, Print, ResetColor, SetAttribute, SetColors},
    QueueableCommand,
};
use std::collections::HashMap;
use std::io::Write;

use rubik3d_core::{ColorPair, Surface};

/// How a cell's pair is drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellStyle {
    /// Foreground from the cell's colour pair (terminal default for pair 0)
    Normal,
    /// Terminal default colours, reversed
    Reverse,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    pub glyph: char,
    pub pair: ColorPair,
    pub style: CellStyle,
}

impl Cell {
    pub const BLANK: Cell = Cell {
        glyph: ' ',
        pair: 0,
        style: CellStyle::Normal,
    };
}

/// A width by height grid of cells plus the colour pairs registered so far.
///
/// Pairs survive [`TerminalCanvas::resize`] and [`TerminalCanvas::clear`]
/// because the renderer only announces each pair once.
pub struct TerminalCanvas {
    width: u16,
    height: u16,
    cells: Vec<Cell>,
    pairs: HashMap<ColorPair, u8>,
}

impl TerminalCanvas {
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            width,
            height,
            cells: vec![Cell::BLANK; width as usize * height as usize],
            pairs: HashMap::new(),
        }
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn height(&self) -> u16 {
        self.height
    }

    pub fn clear(&mut self) {
        self.cells.fill(Cell::BLANK);
    }

    pub fn resize(&mut self, width: u16, height: u16) {
        self.width = width;
        self.height = height;
        self.cells = vec![Cell::BLANK; width as usize * height as usize];
    }

    pub fn cell(&self, x: u16, y: u16) -> Option<Cell> {
        (x < self.width && y < self.height).then(|| self.cells[self.index(x, y)])
    }

    fn index(&self, x: u16, y: u16) -> usize {
        y as usize * self.width as usize + x as usize
    }

    /// 256-colour index registered for `pair`
    pub fn pair_color(&self, pair: ColorPair) -> Option<u8> {
        self.pairs.get(&pair).copied()
    }

    /// Write text starting at `(x, y)`, cut off at the right edge
    pub fn put_str(&mut self, x: u16, y: u16, text: &str, style: CellStyle) {
        if y >= self.height {
            return;
        }
        for (offset, glyph) in text.chars().enumerate() {
            let cx = x as usize + offset;
            if cx >= self.width as usize {
                break;
            }
            let index = self.index(cx as u16, y);
            self.cells[index] = Cell {
                glyph,
                pair: 0,
                style,
            };
        }
    }

    /// Write text horizontally centred on row `y`, if it fits
    pub fn put_centered(&mut self, y: u16, text: &str, style: CellStyle) {
        let len = text.chars().count();
        if len <= self.width as usize {
            let x = (self.width as usize - len) / 2;
            self.put_str(x as u16, y, text, style);
        }
    }

    fn colors_for(&self, cell: &Cell) -> Option<Colors> {
        match cell.style {
            CellStyle::Reverse => None,
            CellStyle::Normal => self
                .pair_color(cell.pair)
                .map(|index| Colors::new(Color::AnsiValue(index), Color::Black)),
        }
    }

    /// Queue the whole buffer onto `writer`, one row at a time
    pub fn draw<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        let mut current: Option<(Option<Colors>, CellStyle)> = None;

        for y in 0..self.height {
            writer.queue(MoveTo(0, y))?;
            for x in 0..self.width {
                let cell = &self.cells[self.index(x, y)];
                let look = (self.colors_for(cell), cell.style);

                if current != Some(look) {
                    writer.queue(SetAttribute(Attribute::Reset))?;
                    writer.queue(ResetColor)?;
                    if let Some(colors) = look.0 {
                        writer.queue(SetColors(colors))?;
                    }
                    if cell.style == CellStyle::Reverse {
                        writer.queue(SetAttribute(Attribute::Reverse))?;
                    }
                    current = Some(look);
                }

                writer.queue(Print(cell.glyph))?;
            }
        }
        writer.queue(SetAttribute(Attribute::Reset))?;
        writer.queue(ResetColor)?;
        Ok(())
    }
}

impl Surface for TerminalCanvas {
    fn size(&self) -> (u16, u16) {
        (self.width, self.height)
    }

    fn init_palette_entry(&mut self, pair: ColorPair, color_index: u8) {
        self.pairs.insert(pair, color_index);
    }

    fn fill_span(&mut self, y: u16, x_start: u16, x_end: u16, pair: ColorPair, glyph: char) {
        if y >= self.height {
            return;
        }
        let x_end = x_end.min(self.width.saturating_sub(1));
        for x in x_start..=x_end {
            let index = self.index(x, y);
            self.cells[index] = Cell {
                glyph,
                pair,
                style: CellStyle::Normal,
            };
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fill_span_and_palette() {
        let mut canvas = TerminalCanvas::new(10, 3);
        canvas.init_palette_entry(1, 196);
        canvas.fill_span(1, 2, 4, 1, 'R');
        assert_eq!(
            canvas.cell(3, 1),
            Some(Cell {
                glyph: 'R',
                pair: 1,
                style: CellStyle::Normal
            })
        );
        assert_eq!(canvas.cell(5, 1), Some(Cell::BLANK));
        assert_eq!(canvas.pair_color(1), Some(196));
        assert_eq!(canvas.cell(10, 0), None);
    }

    #[test]
    fn test_put_str_truncates() {
        let mut canvas = TerminalCanvas::new(5, 2);
        canvas.put_str(3, 0, "hello", CellStyle::Normal);
        assert_eq!(canvas.cell(3, 0).map(|c| c.glyph), Some('h'));
        assert_eq!(canvas.cell(4, 0).map(|c| c.glyph), Some('e'));
        canvas.put_str(0, 7, "ignored", CellStyle::Normal);
        canvas.put_centered(1, "abc", CellStyle::Reverse);
        assert_eq!(canvas.cell(1, 1).map(|c| c.glyph), Some('a'));
        assert_eq!(canvas.cell(1, 1).map(|c| c.style), Some(CellStyle::Reverse));
    }

    #[test]
    fn test_resize_keeps_palette() {
        let mut canvas = TerminalCanvas::new(4, 4);
        canvas.init_palette_entry(2, 46);
        canvas.fill_span(0, 0, 3, 2, 'G');
        canvas.resize(8, 2);
        assert_eq!(canvas.size(), (8, 2));
        assert_eq!(canvas.cell(0, 0), Some(Cell::BLANK));
        assert_eq!(canvas.pair_color(2), Some(46));
    }

    #[test]
    fn test_draw_emits_every_glyph() {
        let mut canvas = TerminalCanvas::new(3, 2);
        canvas.init_palette_entry(1, 21);
        canvas.fill_span(0, 0, 2, 1, 'B');
        canvas.put_str(0, 1, "ok", CellStyle::Reverse);

        let mut out = Vec::new();
        canvas.draw(&mut out).expect("writing to a Vec cannot fail");
        let text = String::from_utf8(out).expect("utf8 output");
        assert!(text.contains("BBB"));
        assert!(text.contains("ok"));
        // 256-colour foreground escape for index 21
        assert!(text.contains("38;5;21"));
    }
}
