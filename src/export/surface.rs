//! Off-screen raster surface the export is composed on

use crate::data_uri;
use crate::error::{Error, Result};
use crate::export::layout::Square;
use image::{ImageFormat, RgbaImage};
use resvg::tiny_skia::{Color, ColorU8, Paint, Pixmap, PixmapPaint, Rect, Transform};
use resvg::usvg;
use std::io::Cursor;

/// MIME type the vector graphic is embedded with
pub const SVG_MIME: &str = "image/svg+xml";

/// Parse an embedded SVG into a vector tree ready for rasterization.
pub fn decode_svg(uri: &str) -> Result<usvg::Tree> {
    let (mime, bytes) = data_uri::decode(uri)?;
    if mime != SVG_MIME {
        return Err(Error::Svg(format!("expected {SVG_MIME}, got {mime}")));
    }
    usvg::Tree::from_data(&bytes, &usvg::Options::default())
        .map_err(|e| Error::Svg(format!("Failed to parse SVG: {e}")))
}

/// Square RGBA drawing surface, allocated fresh for every export
pub struct Surface {
    pixmap: Pixmap,
}

impl Surface {
    /// Allocate an `edge x edge` transparent surface.
    ///
    /// Returns `None` when no surface of that size can exist (zero or
    /// overflowing dimensions).
    pub fn allocate(edge: u32) -> Option<Self> {
        Pixmap::new(edge, edge).map(|pixmap| Self { pixmap })
    }

    /// Edge length in pixels
    pub fn edge(&self) -> u32 {
        self.pixmap.width()
    }

    /// Paint every pixel opaque white.
    pub fn fill_white(&mut self) {
        self.pixmap.fill(Color::WHITE);
    }

    /// Draw a vector tree scaled to cover the whole surface.
    pub fn draw_vector(&mut self, tree: &usvg::Tree) {
        let size = tree.size();
        let edge = self.edge() as f32;
        let transform = Transform::from_scale(edge / size.width(), edge / size.height());
        resvg::render(tree, transform, &mut self.pixmap.as_mut());
    }

    /// Fill a square with opaque white, clipped to the surface.
    pub fn fill_square_white(&mut self, square: Square) {
        // Clip in integer space; tiny-skia's non-AA fill widens rects with a
        // negative origin by a pixel.
        let edge = i64::from(self.edge());
        let left = i64::from(square.x).clamp(0, edge);
        let top = i64::from(square.y).clamp(0, edge);
        let right = (i64::from(square.x) + i64::from(square.edge)).clamp(0, edge);
        let bottom = (i64::from(square.y) + i64::from(square.edge)).clamp(0, edge);
        let Some(rect) = Rect::from_ltrb(left as f32, top as f32, right as f32, bottom as f32)
        else {
            return;
        };
        let mut paint = Paint::default();
        paint.set_color(Color::WHITE);
        paint.anti_alias = false;
        self.pixmap
            .fill_rect(rect, &paint, Transform::identity(), None);
    }

    /// Alpha-blend an image with its top-left corner at `(x, y)`.
    pub fn draw_image(&mut self, image: &RgbaImage, x: i32, y: i32) -> Result<()> {
        let mut layer = Pixmap::new(image.width(), image.height())
            .ok_or_else(|| Error::Image("image has no drawable area".to_string()))?;
        for (dst, src) in layer.pixels_mut().iter_mut().zip(image.pixels()) {
            let [r, g, b, a] = src.0;
            *dst = ColorU8::from_rgba(r, g, b, a).premultiply();
        }
        self.pixmap.draw_pixmap(
            x,
            y,
            layer.as_ref(),
            &PixmapPaint::default(),
            Transform::identity(),
            None,
        );
        Ok(())
    }

    /// Straight-alpha copy of the surface
    pub fn to_rgba(&self) -> RgbaImage {
        let mut out = RgbaImage::new(self.pixmap.width(), self.pixmap.height());
        for (dst, src) in out.pixels_mut().zip(self.pixmap.pixels()) {
            let c = src.demultiply();
            dst.0 = [c.red(), c.green(), c.blue(), c.alpha()];
        }
        out
    }

    /// Encode the surface as PNG.
    pub fn encode_png(&self) -> Result<Vec<u8>> {
        let mut out = Cursor::new(Vec::new());
        self.to_rgba().write_to(&mut out, ImageFormat::Png)?;
        Ok(out.into_inner())
    }
}

impl std::fmt::Debug for Surface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Surface").field("edge", &self.edge()).finish()
    }
}
