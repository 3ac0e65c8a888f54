/// ASCII downsampler that shows a pixel canvas as terminal characters
use crossterm::{
    style::{Color, Print, ResetColor, SetForegroundColor},
    QueueableCommand,
};
use std::io::Write;
use stlview_core::Canvas;

/// Ramp indexed by how many lit pixels fall in a cell (none to many)
const LUMINOSITY_RAMP: &[char] = &[' ', '.', ':', '-', '=', '+', '*', '#', '%', '@'];

/// Terminal-sized character grid filled from a [`Canvas`]
pub struct AsciiRenderer {
    width: usize,
    height: usize,
    char_buffer: Vec<char>,
}

impl AsciiRenderer {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            char_buffer: vec![' '; width * height],
        }
    }

    pub fn resize(&mut self, width: usize, height: usize) {
        self.width = width;
        self.height = height;
        self.char_buffer = vec![' '; width * height];
    }

    pub fn clear(&mut self) {
        self.char_buffer.fill(' ');
    }

    /// Character at cell `(col, row)`
    pub fn cell(&self, col: usize, row: usize) -> char {
        self.char_buffer[row * self.width + col]
    }

    /// Map every lit canvas pixel to the cell that covers it
    pub fn rasterize(&mut self, canvas: &Canvas) {
        self.clear();
        if self.width == 0 || self.height == 0 {
            return;
        }

        let cell_w = (canvas.width() as usize).div_ceil(self.width).max(1);
        let cell_h = (canvas.height() as usize).div_ceil(self.height).max(1);
        let mut counts = vec![0usize; self.width * self.height];

        for y in 0..canvas.height() {
            for x in 0..canvas.width() {
                if canvas.is_set(x, y) {
                    let col = (x as usize / cell_w).min(self.width - 1);
                    let row = (y as usize / cell_h).min(self.height - 1);
                    counts[row * self.width + col] += 1;
                }
            }
        }

        for (slot, count) in self.char_buffer.iter_mut().zip(counts) {
            *slot = LUMINOSITY_RAMP[count.min(LUMINOSITY_RAMP.len() - 1)];
        }
    }

    pub fn draw<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        for y in 0..self.height {
            for x in 0..self.width {
                let c = self.cell(x, y);

                // Color based on character intensity
                let color = match c {
                    ' ' | '.' | ':' => Color::DarkGrey,
                    '-' | '=' => Color::Grey,
                    '+' | '*' => Color::White,
                    '#' | '%' | '@' => Color::Cyan,
                    _ => Color::White,
                };

                writer.queue(SetForegroundColor(color))?;
                writer.queue(Print(c))?;
            }
            if y + 1 < self.height {
                writer.queue(Print("\r\n"))?;
            }
        }
        writer.queue(ResetColor)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stlview_core::PixelPoint;

    #[test]
    fn test_downsample_marks_cells() {
        let mut canvas = Canvas::new(40, 20, [0, 0, 0], [255, 255, 255]);
        // Canvas center is (20, 10)
        canvas.present(&[PixelPoint::new(-20, -10), PixelPoint::new(19, 9)]);

        let mut renderer = AsciiRenderer::new(4, 2);
        renderer.rasterize(&canvas);
        assert_eq!(renderer.cell(0, 0), '.');
        assert_eq!(renderer.cell(3, 1), '.');
        assert_eq!(renderer.cell(1, 0), ' ');
    }

    #[test]
    fn test_dense_cells_saturate() {
        let mut canvas = Canvas::new(10, 10, [0, 0, 0], [255, 255, 255]);
        let points: Vec<_> = (-5..5).map(|x| PixelPoint::new(x, 0)).collect();
        canvas.present(&points);

        let mut renderer = AsciiRenderer::new(1, 1);
        renderer.rasterize(&canvas);
        assert_eq!(renderer.cell(0, 0), '@');
    }

    #[test]
    fn test_draw_writes_every_cell() {
        let renderer = AsciiRenderer::new(3, 2);
        let mut out = Vec::new();
        renderer.draw(&mut out).unwrap();
        let text = String::from_utf8_lossy(&out);
        assert_eq!(text.matches(' ').count(), 6);
    }
}
