// Copyright (c) 2026 rezky_nightky

use crate::cell::Cell;

/// Off-screen copy of the terminal. Coordinates are 0-based `(x, y)`;
/// writes outside the frame are dropped.
#[derive(Clone, Debug)]
pub struct Frame {
    pub width: u16,
    pub height: u16,
    pub cells: Vec<Cell>,
}

impl Frame {
    pub fn new(width: u16, height: u16) -> Self {
        let len = width as usize * height as usize;
        Self {
            width,
            height,
            cells: vec![Cell::BLANK; len],
        }
    }

    pub fn clear(&mut self) {
        self.cells.fill(Cell::BLANK);
    }

    pub fn index(&self, x: u16, y: u16) -> Option<usize> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(y as usize * self.width as usize + x as usize)
    }

    pub fn get(&self, x: u16, y: u16) -> Option<&Cell> {
        self.index(x, y).map(|i| &self.cells[i])
    }

    pub fn set(&mut self, x: u16, y: u16, cell: Cell) {
        if let Some(i) = self.index(x, y) {
            self.cells[i] = cell;
        }
    }

    /// Writes `text` left to right starting at `(x, y)`, clipping at the
    /// right edge.
    pub fn put_str(&mut self, x: u16, y: u16, text: &str, template: Cell) {
        for (i, ch) in text.chars().enumerate() {
            let Some(cx) = x.checked_add(i as u16) else {
                break;
            };
            if cx >= self.width {
                break;
            }
            self.set(cx, y, Cell { ch, ..template });
        }
    }

    #[allow(dead_code)]
    pub fn row_text(&self, y: u16) -> String {
        (0..self.width)
            .filter_map(|x| self.get(x, y).map(|c| c.ch))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clear_makes_cells_blank() {
        let mut f = Frame::new(2, 2);
        f.set(0, 0, Cell { ch: 'x', ..Cell::BLANK });
        assert_eq!(f.get(0, 0).unwrap().ch, 'x');
        f.clear();
        assert_eq!(f.get(0, 0).unwrap().ch, ' ');
    }

    #[test]
    fn writes_outside_are_clipped() {
        let mut f = Frame::new(4, 2);
        f.set(9, 9, Cell { ch: 'x', ..Cell::BLANK });
        f.put_str(2, 1, "hello", Cell::BLANK);
        assert_eq!(f.row_text(1), "  he");
        assert!(f.cells.iter().all(|c| c.ch != 'x'));
    }
}
