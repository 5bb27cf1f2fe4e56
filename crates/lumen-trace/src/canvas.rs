//! Pixel buffer filled by a render.

use lumen_math::Color;

/// Row-major grid of colors.
#[derive(Debug, Clone, PartialEq)]
pub struct Canvas {
    width: usize,
    height: usize,
    pixels: Vec<Color>,
}

impl Canvas {
    /// Black canvas of the given size.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            pixels: vec![Color::BLACK; width * height],
        }
    }

    /// Width in pixels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Height in pixels.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Color at `(x, y)`, with `y` growing downward.
    ///
    /// # Panics
    ///
    /// Panics if the coordinates are outside the canvas.
    pub fn pixel_at(&self, x: usize, y: usize) -> Color {
        self.pixels[self.index(x, y)]
    }

    /// Overwrite the color at `(x, y)`.
    ///
    /// # Panics
    ///
    /// Panics if the coordinates are outside the canvas.
    pub fn write_pixel(&mut self, x: usize, y: usize, color: Color) {
        let i = self.index(x, y);
        self.pixels[i] = color;
    }

    /// All pixels, row by row.
    pub fn pixels(&self) -> &[Color] {
        &self.pixels
    }

    /// Mutable pixels, row by row; split with `chunks_mut(width)` for
    /// disjoint per-row writes.
    pub fn pixels_mut(&mut self) -> &mut [Color] {
        &mut self.pixels
    }

    /// Rows as mutable slices.
    pub fn rows_mut(&mut self) -> impl Iterator<Item = &mut [Color]> {
        self.pixels.chunks_mut(self.width.max(1))
    }

    fn index(&self, x: usize, y: usize) -> usize {
        assert!(
            x < self.width && y < self.height,
            "pixel ({x}, {y}) outside {}x{} canvas",
            self.width,
            self.height
        );
        y * self.width + x
    }
}
