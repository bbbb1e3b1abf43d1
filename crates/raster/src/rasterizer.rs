use crate::glyph::outline_run;
use crate::paint::{
    build_stroke, fill_paint, gradient_paint, image_pixmap, line_path, rect_path, to_sk_color,
};
use folio_scene::{Group, ImageContent, ImageNode, Scene, SceneNode, TextRun};
use folio_traits::{RasterError, RasterOptions, RasterResult, Rasterizer};
use folio_types::{Color, Rect};
use tiny_skia::{FillRule, FilterQuality, Pixmap, PixmapPaint, Transform};

/// Largest surface the rasterizer will allocate, in device pixels.
pub const DEFAULT_MAX_PIXELS: u64 = 64 * 1024 * 1024;

const BROKEN_FILL: Color = Color::hex(0xF3F4F6);
const BROKEN_FRAME: Color = Color::hex(0x9CA3AF);

#[derive(Debug, Clone)]
pub struct SkiaRasterizer {
    max_pixels: u64,
}

impl Default for SkiaRasterizer {
    fn default() -> Self {
        Self::new()
    }
}

impl SkiaRasterizer {
    pub fn new() -> Self {
        Self {
            max_pixels: DEFAULT_MAX_PIXELS,
        }
    }

    pub fn with_max_pixels(mut self, max_pixels: u64) -> Self {
        self.max_pixels = max_pixels;
        self
    }

    fn surface_size(&self, scene: &Scene, scale: f32) -> Result<(u32, u32), RasterError> {
        let empty = RasterError::EmptyScene {
            width: scene.width,
            height: scene.height,
        };
        if !(scene.width.is_finite() && scene.height.is_finite())
            || scene.width <= 0.0
            || scene.height <= 0.0
        {
            return Err(empty);
        }
        let width = (scene.width * scale).ceil();
        let height = (scene.height * scale).ceil();
        if width < 1.0 || height < 1.0 || width > u32::MAX as f32 || height > u32::MAX as f32 {
            return Err(empty);
        }
        let (width, height) = (width as u32, height as u32);
        if width as u64 * height as u64 > self.max_pixels {
            return Err(RasterError::SurfaceAllocation { width, height });
        }
        Ok((width, height))
    }
}

impl Rasterizer for SkiaRasterizer {
    fn rasterize(
        &self,
        scene: &Scene,
        options: &RasterOptions,
    ) -> Result<RasterResult, RasterError> {
        if !options.scale.is_finite() || options.scale <= 0.0 {
            return Err(RasterError::Backend(format!(
                "invalid scale factor {}",
                options.scale
            )));
        }
        if !options.allow_cross_origin {
            check_cross_origin(scene)?;
        }

        let (width, height) = self.surface_size(scene, options.scale)?;
        let mut pixmap =
            Pixmap::new(width, height).ok_or(RasterError::SurfaceAllocation { width, height })?;
        pixmap.fill(to_sk_color(options.background));

        let base = Transform::from_scale(options.scale, options.scale);
        draw_nodes(&mut pixmap, &scene.nodes, base);

        log::debug!(
            "Rasterized {:.0}x{:.0} scene to {}x{} px at scale {}",
            scene.width,
            scene.height,
            width,
            height,
            options.scale
        );

        let data = pixmap
            .pixels()
            .iter()
            .flat_map(|px| {
                let c = px.demultiply();
                [c.red(), c.green(), c.blue(), c.alpha()]
            })
            .collect();
        RasterResult::new(width, height, data)
    }

    fn name(&self) -> &'static str {
        "tiny-skia"
    }
}

/// Only loaded images can taint the surface; broken placeholders carry no
/// remote pixels.
fn check_cross_origin(scene: &Scene) -> Result<(), RasterError> {
    match scene
        .images()
        .into_iter()
        .find(|image| image.cross_origin && matches!(image.content, ImageContent::Decoded(_)))
    {
        Some(image) => Err(RasterError::CrossOriginDenied(format!(
            "image at ({:.0}, {:.0})",
            image.rect.x, image.rect.y
        ))),
        None => Ok(()),
    }
}

fn draw_nodes(pixmap: &mut Pixmap, nodes: &[SceneNode], ts: Transform) {
    for node in nodes {
        match node {
            SceneNode::Rect {
                rect,
                fill,
                stroke,
                radius,
            } => {
                let Some(path) = rect_path(rect, *radius) else {
                    continue;
                };
                if let Some(color) = fill {
                    pixmap.fill_path(&path, &fill_paint(*color), FillRule::Winding, ts, None);
                }
                if let Some(style) = stroke {
                    pixmap.stroke_path(&path, &fill_paint(style.color), &build_stroke(style), ts, None);
                }
            }
            SceneNode::Gradient { rect, stops } => {
                if let (Some(path), Some(paint)) = (rect_path(rect, 0.0), gradient_paint(rect, stops)) {
                    pixmap.fill_path(&path, &paint, FillRule::Winding, ts, None);
                }
            }
            SceneNode::Line { from, to, stroke } => {
                if let Some(path) = line_path((from.x, from.y), (to.x, to.y)) {
                    pixmap.stroke_path(&path, &fill_paint(stroke.color), &build_stroke(stroke), ts, None);
                }
            }
            SceneNode::Text(run) => draw_text(pixmap, run, ts),
            SceneNode::Image(image) => draw_image(pixmap, image, ts),
            SceneNode::Group(group) => draw_group(pixmap, group, ts),
        }
    }
}

fn draw_text(pixmap: &mut Pixmap, run: &TextRun, ts: Transform) {
    let Some(paths) = outline_run(run) else {
        log::debug!("No font for text '{}'; skipped", run.text);
        return;
    };
    let paint = fill_paint(run.color);
    for path in &paths {
        pixmap.fill_path(path, &paint, FillRule::Winding, ts, None);
    }
}

fn draw_image(pixmap: &mut Pixmap, node: &ImageNode, ts: Transform) {
    let rect = &node.rect;
    match &node.content {
        ImageContent::Decoded(image) => {
            let Some(source) = image_pixmap(image) else {
                return;
            };
            let sx = rect.width / image.width() as f32;
            let sy = rect.height / image.height() as f32;
            let image_ts = ts.pre_concat(Transform::from_row(sx, 0.0, 0.0, sy, rect.x, rect.y));
            let paint = PixmapPaint {
                quality: FilterQuality::Bilinear,
                ..PixmapPaint::default()
            };
            pixmap.draw_pixmap(0, 0, source.as_ref(), &paint, image_ts, None);
        }
        ImageContent::Broken => draw_broken(pixmap, rect, ts),
    }
}

fn draw_broken(pixmap: &mut Pixmap, rect: &Rect, ts: Transform) {
    let Some(path) = rect_path(rect, 0.0) else {
        return;
    };
    pixmap.fill_path(&path, &fill_paint(BROKEN_FILL), FillRule::Winding, ts, None);
    let frame = folio_scene::StrokeStyle::solid(BROKEN_FRAME, 1.0);
    pixmap.stroke_path(&path, &fill_paint(BROKEN_FRAME), &build_stroke(&frame), ts, None);
}

fn draw_group(pixmap: &mut Pixmap, group: &Group, ts: Transform) {
    let group_ts = if group.rotation != 0.0 {
        ts.pre_concat(Transform::from_rotate_at(
            group.rotation,
            group.pivot.x,
            group.pivot.y,
        ))
    } else {
        ts
    };

    let opacity = group.opacity.clamp(0.0, 1.0);
    if opacity >= 1.0 {
        draw_nodes(pixmap, &group.children, group_ts);
        return;
    }
    if opacity <= 0.0 {
        return;
    }

    // Children are flattened into a layer first so overlapping shapes share
    // one opacity instead of compounding.
    let Some(mut layer) = Pixmap::new(pixmap.width(), pixmap.height()) else {
        log::warn!("Could not allocate group layer; drawing without opacity");
        draw_nodes(pixmap, &group.children, group_ts);
        return;
    };
    draw_nodes(&mut layer, &group.children, group_ts);
    let paint = PixmapPaint {
        opacity,
        ..PixmapPaint::default()
    };
    pixmap.draw_pixmap(0, 0, layer.as_ref(), &paint, Transform::identity(), None);
}
