use crate::asset::DecodedImage;
use folio_types::{Color, Point, Rect};
use std::fmt;
use std::sync::Arc;

/// Raw font program plus the face index inside it.
#[derive(Clone)]
pub struct FontFace {
    pub data: Arc<Vec<u8>>,
    pub index: u32,
}

impl fmt::Debug for FontFace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FontFace")
            .field("data_len", &self.data.len())
            .field("index", &self.index)
            .finish()
    }
}

impl PartialEq for FontFace {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.data, &other.data) && self.index == other.index
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrokeStyle {
    pub color: Color,
    pub width: f32,
    pub dashed: bool,
}

impl StrokeStyle {
    pub fn solid(color: Color, width: f32) -> Self {
        Self {
            color,
            width,
            dashed: false,
        }
    }

    pub fn dashed(color: Color, width: f32) -> Self {
        Self {
            color,
            width,
            dashed: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GradientStop {
    pub offset: f32,
    pub color: Color,
}

/// A single line of shaped-by-advance text. `origin` is the left end of the
/// baseline.
#[derive(Debug, Clone, PartialEq)]
pub struct TextRun {
    pub origin: Point,
    pub text: String,
    pub size: f32,
    pub color: Color,
    pub font: Option<FontFace>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ImageContent {
    Decoded(Arc<DecodedImage>),
    /// The image failed to load; drawn as a placeholder frame.
    Broken,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ImageNode {
    pub rect: Rect,
    pub content: ImageContent,
    pub cross_origin: bool,
}

/// Children drawn with a shared rotation (degrees, about `pivot`) and opacity.
#[derive(Debug, Clone, PartialEq)]
pub struct Group {
    pub rotation: f32,
    pub pivot: Point,
    pub opacity: f32,
    pub children: Vec<SceneNode>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SceneNode {
    Rect {
        rect: Rect,
        fill: Option<Color>,
        stroke: Option<StrokeStyle>,
        radius: f32,
    },
    /// Horizontal linear gradient filling `rect`.
    Gradient {
        rect: Rect,
        stops: Vec<GradientStop>,
    },
    Line {
        from: Point,
        to: Point,
        stroke: StrokeStyle,
    },
    Text(TextRun),
    Image(ImageNode),
    Group(Group),
}

/// A fully laid-out page-like document at a fixed logical width.
///
/// Coordinates are logical pixels with a top-left origin. `height` is the
/// natural content height, independent of any viewport.
#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    pub width: f32,
    pub height: f32,
    pub nodes: Vec<SceneNode>,
}

impl Scene {
    pub fn new(width: f32) -> Self {
        Self {
            width,
            height: 0.0,
            nodes: Vec::new(),
        }
    }

    pub fn push(&mut self, node: SceneNode) {
        self.nodes.push(node);
    }

    /// Every text run in paint order, descending into groups.
    pub fn text_runs(&self) -> Vec<&TextRun> {
        fn collect<'a>(nodes: &'a [SceneNode], out: &mut Vec<&'a TextRun>) {
            for node in nodes {
                match node {
                    SceneNode::Text(run) => out.push(run),
                    SceneNode::Group(group) => collect(&group.children, out),
                    _ => {}
                }
            }
        }
        let mut out = Vec::new();
        collect(&self.nodes, &mut out);
        out
    }

    pub fn contains_text(&self, needle: &str) -> bool {
        self.text_runs().iter().any(|run| run.text.contains(needle))
    }

    pub fn images(&self) -> Vec<&ImageNode> {
        fn collect<'a>(nodes: &'a [SceneNode], out: &mut Vec<&'a ImageNode>) {
            for node in nodes {
                match node {
                    SceneNode::Image(image) => out.push(image),
                    SceneNode::Group(group) => collect(&group.children, out),
                    _ => {}
                }
            }
        }
        let mut out = Vec::new();
        collect(&self.nodes, &mut out);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(text: &str) -> SceneNode {
        SceneNode::Text(TextRun {
            origin: Point::new(0.0, 10.0),
            text: text.to_string(),
            size: 12.0,
            color: Color::BLACK,
            font: None,
        })
    }

    #[test]
    fn text_runs_descend_into_groups() {
        let mut scene = Scene::new(794.0);
        scene.push(run("INVOICE"));
        scene.push(SceneNode::Group(Group {
            rotation: -15.0,
            pivot: Point::new(100.0, 100.0),
            opacity: 0.85,
            children: vec![run("PAID")],
        }));

        let texts: Vec<&str> = scene.text_runs().iter().map(|r| r.text.as_str()).collect();
        assert_eq!(texts, vec!["INVOICE", "PAID"]);
        assert!(scene.contains_text("PAI"));
        assert!(scene.images().is_empty());
    }
}
