use ab_glyph::{point, Font, FontVec, Glyph, PxScale, ScaleFont};
use sot_cache::Atom;
use std::collections::HashMap;
use std::sync::Arc;
use tiny_skia::{Color, Pixmap, PremultipliedColorU8};

/// Rasterized label pixmaps keyed by text and pixel size.
pub struct TextCache {
    font: FontVec,
    color: Color,
    map: HashMap<(Atom, u32), Arc<Pixmap>>,
}

impl TextCache {
    pub fn new(font: FontVec, color: Color) -> Self {
        Self {
            font,
            color,
            map: HashMap::new(),
        }
    }

    pub fn get_or_render(&mut self, atom: Atom, size_px: f32) -> Option<Arc<Pixmap>> {
        let key = (atom, size_px.round() as u32);
        if let Some(p) = self.map.get(&key) {
            return Some(Arc::clone(p));
        }
        let pm = Arc::new(render_text_pixmap(&key.0, size_px, &self.font, self.color)?);
        self.map.insert(key, Arc::clone(&pm));
        Some(pm)
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Rough advance of one average glyph, for line wrapping.
    pub fn em_width(&self, size_px: f32) -> f32 {
        let sf = self.font.as_scaled(PxScale::from(size_px));
        sf.h_advance(self.font.glyph_id('n'))
    }
}

/// Lays `text` out on one baseline and rasterizes it into a tight,
/// transparent premultiplied pixmap. `None` for text with no visible glyphs.
pub fn render_text_pixmap<F: Font>(
    text: &str,
    font_size: f32,
    font: &F,
    color: Color,
) -> Option<Pixmap> {
    let scale = PxScale::from(font_size);
    let sf = font.as_scaled(scale);

    let mut pen_x = 0.0f32;
    let mut glyphs = Vec::<Glyph>::new();
    for ch in text.chars() {
        let id = font.glyph_id(ch);
        if let Some(prev) = glyphs.last() {
            pen_x += sf.kern(prev.id, id);
        }
        glyphs.push(Glyph {
            id,
            scale,
            position: point(pen_x, sf.ascent()),
        });
        pen_x += sf.h_advance(id);
    }

    let outlines: Vec<_> = glyphs
        .into_iter()
        .filter_map(|g| font.outline_glyph(g))
        .collect();
    if outlines.is_empty() {
        return None;
    }

    let (mut min_x, mut min_y) = (f32::INFINITY, f32::INFINITY);
    let (mut max_x, mut max_y) = (f32::NEG_INFINITY, f32::NEG_INFINITY);
    for out in &outlines {
        let b = out.px_bounds();
        min_x = min_x.min(b.min.x);
        min_y = min_y.min(b.min.y);
        max_x = max_x.max(b.max.x);
        max_y = max_y.max(b.max.y);
    }

    let w = (max_x.ceil() - min_x.floor()).max(1.0) as u32;
    let h = (max_y.ceil() - min_y.floor()).max(1.0) as u32;
    let mut pm = Pixmap::new(w, h)?;
    let stride = w as usize;
    let dst = pm.pixels_mut();

    let cu = [
        (color.red() * 255.0) as u8,
        (color.green() * 255.0) as u8,
        (color.blue() * 255.0) as u8,
        (color.alpha() * 255.0) as u8,
    ];

    for out in &outlines {
        let b = out.px_bounds();
        out.draw(|x, y, cov| {
            if cov <= f32::EPSILON {
                return;
            }
            let ix = (x as f32 + b.min.x - min_x).floor() as i32;
            let iy = (y as f32 + b.min.y - min_y).floor() as i32;
            if ix < 0 || iy < 0 || ix >= w as i32 || iy >= h as i32 {
                return;
            }
            let i = iy as usize * stride + ix as usize;

            let a_lin = (cov * cu[3] as f32 / 255.0).clamp(0.0, 1.0);
            let sa = (a_lin * 255.0) as u8;
            let src = [
                (cu[0] as f32 * a_lin) as u8,
                (cu[1] as f32 * a_lin) as u8,
                (cu[2] as f32 * a_lin) as u8,
            ];

            // premultiplied source-over
            let bg = dst[i];
            let inv = 1.0 - (sa as f32 / 255.0);
            let blended = PremultipliedColorU8::from_rgba(
                src[0].saturating_add((bg.red() as f32 * inv) as u8),
                src[1].saturating_add((bg.green() as f32 * inv) as u8),
                src[2].saturating_add((bg.blue() as f32 * inv) as u8),
                sa.saturating_add((bg.alpha() as f32 * inv) as u8),
            );
            if let Some(px) = blended {
                dst[i] = px;
            }
        });
    }

    Some(pm)
}

/// Greedy word wrap at `max_chars` per line.
pub fn wrap(text: &str, max_chars: usize) -> Vec<String> {
    let max_chars = max_chars.max(1);
    let mut lines = Vec::new();
    let mut line = String::new();
    for word in text.split_whitespace() {
        let needed = if line.is_empty() {
            word.chars().count()
        } else {
            line.chars().count() + 1 + word.chars().count()
        };
        if needed > max_chars && !line.is_empty() {
            lines.push(std::mem::take(&mut line));
        }
        if !line.is_empty() {
            line.push(' ');
        }
        line.push_str(word);
    }
    if !line.is_empty() {
        lines.push(line);
    }
    lines
}
