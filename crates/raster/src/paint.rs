use folio_scene::{DecodedImage, GradientStop, StrokeStyle};
use folio_types::{Color, Rect};
use tiny_skia::{
    LineCap, LinearGradient, Paint, Path, PathBuilder, Pixmap, Point, SpreadMode, Stroke,
    StrokeDash, Transform,
};

/// Cubic control-point distance for a quarter circle.
const KAPPA: f32 = 0.552_284_8;
const DASH_ON: f32 = 4.0;
const DASH_OFF: f32 = 3.0;

pub(crate) fn to_sk_color(color: Color) -> tiny_skia::Color {
    let alpha = (color.a.clamp(0.0, 1.0) * 255.0).round() as u8;
    tiny_skia::Color::from_rgba8(color.r, color.g, color.b, alpha)
}

pub(crate) fn fill_paint(color: Color) -> Paint<'static> {
    let mut paint = Paint::default();
    paint.set_color(to_sk_color(color));
    paint.anti_alias = true;
    paint
}

pub(crate) fn gradient_paint(rect: &Rect, stops: &[GradientStop]) -> Option<Paint<'static>> {
    let stops: Vec<tiny_skia::GradientStop> = stops
        .iter()
        .map(|s| tiny_skia::GradientStop::new(s.offset.clamp(0.0, 1.0), to_sk_color(s.color)))
        .collect();
    let shader = LinearGradient::new(
        Point::from_xy(rect.x, rect.y),
        Point::from_xy(rect.right(), rect.y),
        stops,
        SpreadMode::Pad,
        Transform::identity(),
    )?;
    let mut paint = Paint::default();
    paint.shader = shader;
    paint.anti_alias = true;
    Some(paint)
}

pub(crate) fn build_stroke(style: &StrokeStyle) -> Stroke {
    let mut stroke = Stroke {
        width: style.width.max(0.0),
        ..Stroke::default()
    };
    if style.dashed {
        stroke.line_cap = LineCap::Butt;
        stroke.dash = StrokeDash::new(vec![DASH_ON, DASH_OFF], 0.0);
    }
    stroke
}

/// A rectangle path, with rounded corners when `radius > 0`.
pub(crate) fn rect_path(rect: &Rect, radius: f32) -> Option<Path> {
    if rect.is_empty() {
        return None;
    }
    let r = radius.max(0.0).min(rect.width / 2.0).min(rect.height / 2.0);
    if r <= 0.0 {
        let sk = tiny_skia::Rect::from_xywh(rect.x, rect.y, rect.width, rect.height)?;
        return Some(PathBuilder::from_rect(sk));
    }

    let (left, top, right, bottom) = (rect.x, rect.y, rect.right(), rect.bottom());
    let k = r * KAPPA;
    let mut pb = PathBuilder::new();
    pb.move_to(left + r, top);
    pb.line_to(right - r, top);
    pb.cubic_to(right - r + k, top, right, top + r - k, right, top + r);
    pb.line_to(right, bottom - r);
    pb.cubic_to(right, bottom - r + k, right - r + k, bottom, right - r, bottom);
    pb.line_to(left + r, bottom);
    pb.cubic_to(left + r - k, bottom, left, bottom - r + k, left, bottom - r);
    pb.line_to(left, top + r);
    pb.cubic_to(left, top + r - k, left + r - k, top, left + r, top);
    pb.close();
    pb.finish()
}

pub(crate) fn line_path(from: (f32, f32), to: (f32, f32)) -> Option<Path> {
    let mut pb = PathBuilder::new();
    pb.move_to(from.0, from.1);
    pb.line_to(to.0, to.1);
    pb.finish()
}

/// Copies a straight-alpha image into a premultiplied pixmap.
pub(crate) fn image_pixmap(image: &DecodedImage) -> Option<Pixmap> {
    let mut pixmap = Pixmap::new(image.width(), image.height())?;
    let dst = pixmap.data_mut();
    for (src_px, dst_px) in image.rgba().chunks_exact(4).zip(dst.chunks_exact_mut(4)) {
        let a = src_px[3];
        dst_px[0] = premul_u8(src_px[0], a);
        dst_px[1] = premul_u8(src_px[1], a);
        dst_px[2] = premul_u8(src_px[2], a);
        dst_px[3] = a;
    }
    Some(pixmap)
}

fn premul_u8(channel: u8, alpha: u8) -> u8 {
    let prod = (channel as u16) * (alpha as u16) + 127;
    ((prod + (prod >> 8)) >> 8) as u8
}
