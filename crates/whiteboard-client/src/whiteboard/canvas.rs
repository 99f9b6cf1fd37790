//! Drawing surface

use whiteboard_core::Color;

/// Side length of a rendered dot in pixels
const DOT_SIZE: i64 = 5;

/// Sink for rendered dots
pub trait DrawingSurface {
    /// Paint a dot of `color` centered on `(x, y)`
    fn render(&mut self, color: Color, x: f64, y: f64);

    /// Reset the whole surface to the background
    fn clear(&mut self);
}

/// Trivial in-memory RGB raster with a white background
#[derive(Debug, Clone)]
pub struct RasterCanvas {
    width: u32,
    height: u32,
    pixels: Vec<Color>,
}

impl RasterCanvas {
    pub const BACKGROUND: Color = Color::WHITE;

    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![Self::BACKGROUND; width as usize * height as usize],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Color at `(x, y)`, `None` outside the canvas
    pub fn pixel(&self, x: u32, y: u32) -> Option<Color> {
        (x < self.width && y < self.height).then(|| self.pixels[self.index(x, y)])
    }

    /// Number of pixels differing from the background
    pub fn painted_pixels(&self) -> usize {
        self.pixels.iter().filter(|p| **p != Self::BACKGROUND).count()
    }

    fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }
}

impl DrawingSurface for RasterCanvas {
    fn render(&mut self, color: Color, x: f64, y: f64) {
        if !x.is_finite() || !y.is_finite() {
            return;
        }

        let half = DOT_SIZE / 2;
        let (width, height) = (i64::from(self.width), i64::from(self.height));
        // Far off-canvas centers collapse to just outside the edge
        let (cx, cy) = (clamp_center(x, width), clamp_center(y, height));

        for py in (cy - half).max(0)..=(cy + half).min(height - 1) {
            for px in (cx - half).max(0)..=(cx + half).min(width - 1) {
                let index = self.index(px as u32, py as u32);
                self.pixels[index] = color;
            }
        }
    }

    fn clear(&mut self) {
        self.pixels.fill(Self::BACKGROUND);
    }
}

fn clamp_center(coordinate: f64, extent: i64) -> i64 {
    coordinate.round().clamp(-DOT_SIZE as f64, (extent + DOT_SIZE) as f64) as i64
}
