//! Glyph outlines to tiny-skia paths.

use folio_scene::TextRun;
use tiny_skia::{Path, PathBuilder};
use ttf_parser::{Face, OutlineBuilder};

/// Advance used for characters the face has no glyph for, in ems.
const MISSING_ADVANCE_EM: f32 = 0.55;

/// Collects a glyph outline in scene coordinates. Font units are y-up, the
/// scene is y-down, so the vertical scale is negated.
struct GlyphPathBuilder {
    builder: PathBuilder,
    origin_x: f32,
    origin_y: f32,
    scale: f32,
}

impl GlyphPathBuilder {
    fn new(origin_x: f32, origin_y: f32, scale: f32) -> Self {
        Self {
            builder: PathBuilder::new(),
            origin_x,
            origin_y,
            scale,
        }
    }

    fn point(&self, x: f32, y: f32) -> (f32, f32) {
        (self.origin_x + x * self.scale, self.origin_y - y * self.scale)
    }

    fn finish(self) -> Option<Path> {
        self.builder.finish()
    }
}

impl OutlineBuilder for GlyphPathBuilder {
    fn move_to(&mut self, x: f32, y: f32) {
        let (x, y) = self.point(x, y);
        self.builder.move_to(x, y);
    }

    fn line_to(&mut self, x: f32, y: f32) {
        let (x, y) = self.point(x, y);
        self.builder.line_to(x, y);
    }

    fn quad_to(&mut self, x1: f32, y1: f32, x: f32, y: f32) {
        let (x1, y1) = self.point(x1, y1);
        let (x, y) = self.point(x, y);
        self.builder.quad_to(x1, y1, x, y);
    }

    fn curve_to(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, x: f32, y: f32) {
        let (x1, y1) = self.point(x1, y1);
        let (x2, y2) = self.point(x2, y2);
        let (x, y) = self.point(x, y);
        self.builder.cubic_to(x1, y1, x2, y2, x, y);
    }

    fn close(&mut self) {
        self.builder.close();
    }
}

/// One path per visible glyph of `run`, laid out by horizontal advance.
///
/// Returns `None` when the run has no font or the font cannot be parsed.
pub(crate) fn outline_run(run: &TextRun) -> Option<Vec<Path>> {
    let font = run.font.as_ref()?;
    let face = match Face::parse(&font.data, font.index) {
        Ok(face) => face,
        Err(e) => {
            log::warn!("Cannot parse font for text '{}': {}", run.text, e);
            return None;
        }
    };
    let scale = run.size / face.units_per_em().max(1) as f32;

    let mut paths = Vec::new();
    let mut pen_x = run.origin.x;
    for ch in run.text.chars() {
        let Some(gid) = face.glyph_index(ch) else {
            pen_x += run.size * MISSING_ADVANCE_EM;
            continue;
        };
        let mut builder = GlyphPathBuilder::new(pen_x, run.origin.y, scale);
        if face.outline_glyph(gid, &mut builder).is_some()
            && let Some(path) = builder.finish()
        {
            paths.push(path);
        }
        pen_x += face
            .glyph_hor_advance(gid)
            .map(|adv| adv as f32 * scale)
            .unwrap_or(run.size * MISSING_ADVANCE_EM);
    }
    Some(paths)
}
