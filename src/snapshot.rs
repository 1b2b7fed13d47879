//! Rasterized stand-ins for live nodes.
//!
//! When a node cannot stay in the tree for the length of a transition, the
//! orchestrator can freeze its current look into a bitmap and animate a proxy
//! node instead. Rendering happens synchronously on the CPU into a
//! `tiny_skia` surface sized to the node's bounds; the surface is released
//! before returning.
//!
//! The snapshot is taken in the node's own coordinate space: the node's
//! position and transform are not applied, its descendants' are. Hidden
//! descendants are not drawn, and opacity multiplies down the subtree.

use std::path::Path;
use std::sync::Arc;

use image::{Rgba, RgbaImage};
use resvg::tiny_skia::{self, ColorU8, FilterQuality, Paint, Pixmap, PixmapPaint};
use thiserror::Error;

use crate::geometry::{Rect, Size};
use crate::transform::Transform;
use crate::tree::{Node, NodeContent, NodeFlags, NodeId, NodeKind, Tree};

#[derive(Error, Debug)]
pub enum SnapshotError {
    #[error("node {0:?} is not in the tree")]
    NodeNotFound(NodeId),
    #[error("cannot allocate a {width}x{height} snapshot surface")]
    SurfaceAllocation { width: f32, height: f32 },
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),
}

pub type Result<T> = std::result::Result<T, SnapshotError>;

/// Options for [`render_snapshot`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SnapshotConfig {
    /// Physical pixels per logical pixel
    pub scale: f32,
    /// Largest surface edge, in physical pixels, that will be allocated
    pub max_dimension: u32,
}

impl SnapshotConfig {
    pub fn scale(mut self, scale: f32) -> Self {
        self.scale = scale;
        self
    }

    pub fn max_dimension(mut self, max_dimension: u32) -> Self {
        self.max_dimension = max_dimension;
        self
    }
}

impl Default for SnapshotConfig {
    fn default() -> Self {
        Self {
            scale: 1.0,
            max_dimension: 8192,
        }
    }
}

/// A frozen rendering of a node.
#[derive(Debug, Clone)]
pub struct Snapshot {
    /// Bounds of the captured node, in its local logical coordinates
    pub bounds: Rect,
    /// Straight-alpha pixels, `bounds` times the capture scale
    pub image: RgbaImage,
}

impl Snapshot {
    /// Write the bitmap as a PNG (useful when debugging transitions).
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        self.image.save(path.as_ref())?;
        Ok(())
    }
}

/// Render `id` and its visible descendants into a bitmap.
pub fn render_snapshot(tree: &Tree, id: NodeId, config: &SnapshotConfig) -> Result<Snapshot> {
    let node = tree.node(id).ok_or(SnapshotError::NodeNotFound(id))?;
    let mut pixmap = allocate_surface(node.size, config)?;

    if node.flags.contains(NodeFlags::OPAQUE) {
        pixmap.fill(tiny_skia::Color::BLACK);
    }

    let base = Transform::scale(config.scale);
    draw_subtree(tree, id, base, &mut pixmap);

    log::debug!(
        "Captured {:?} into a {}x{} snapshot",
        id,
        pixmap.width(),
        pixmap.height()
    );
    Ok(Snapshot {
        bounds: node.bounds(),
        image: pixmap_to_image(&pixmap),
    })
}

/// Capture `id` and insert a detached proxy node showing the capture.
///
/// The proxy is a plain node with the captured node's bounds as its frame,
/// holding a single image child. Placing it is up to the caller. On error the
/// tree is left untouched and the live node should be used instead.
pub fn snapshot_node(tree: &mut Tree, id: NodeId, config: &SnapshotConfig) -> Result<NodeId> {
    let snapshot = render_snapshot(tree, id, config)?;
    let frame = snapshot.bounds;

    let proxy = tree.insert(Node::plain().with_frame(frame));
    let image = tree.insert(
        Node::new(NodeKind::Image)
            .with_frame(frame)
            .with_content(NodeContent::Bitmap(Arc::new(snapshot.image))),
    );
    tree.add_child(proxy, image);
    Ok(proxy)
}

fn allocate_surface(size: Size, config: &SnapshotConfig) -> Result<Pixmap> {
    let failed = || SnapshotError::SurfaceAllocation {
        width: size.width,
        height: size.height,
    };

    let edge = |logical: f32| -> Option<u32> {
        let physical = (logical * config.scale).ceil();
        if !physical.is_finite() || physical < 1.0 || physical > config.max_dimension as f32 {
            return None;
        }
        Some(physical as u32)
    };

    let width = edge(size.width).ok_or_else(failed)?;
    let height = edge(size.height).ok_or_else(failed)?;
    Pixmap::new(width, height).ok_or_else(failed)
}

/// Paint `root` and its visible descendants in pre-order, so parents land
/// under their children and later siblings over earlier ones.
fn draw_subtree(tree: &Tree, root: NodeId, transform: Transform, pixmap: &mut Pixmap) {
    // (node, transform to surface space, opacity inherited from ancestors)
    let mut stack = vec![(root, transform, 1.0f32)];
    while let Some((id, transform, inherited_opacity)) = stack.pop() {
        let Some(node) = tree.node(id) else {
            continue;
        };
        let opacity = inherited_opacity * sanitize_opacity(node.opacity);
        if opacity <= 0.0 {
            continue;
        }

        draw_content(node, transform, opacity, pixmap);

        for &child_id in tree.children(id).iter().rev() {
            let Some(child) = tree.node(child_id) else {
                continue;
            };
            if child.is_hidden() {
                continue;
            }
            let child_transform = transform.then(&child.local_transform());
            stack.push((child_id, child_transform, opacity));
        }
    }
}

fn sanitize_opacity(opacity: f32) -> f32 {
    if opacity.is_nan() {
        0.0
    } else {
        opacity.clamp(0.0, 1.0)
    }
}

fn draw_content(node: &Node, transform: Transform, opacity: f32, pixmap: &mut Pixmap) {
    if node.size.is_empty() || !transform.is_finite() {
        return;
    }
    let skia_transform = to_skia(&transform);

    match &node.content {
        NodeContent::None => {}
        NodeContent::Fill(color) => {
            let Some(rect) = tiny_skia::Rect::from_xywh(0.0, 0.0, node.size.width, node.size.height)
            else {
                return;
            };
            let [r, g, b, a] = color.to_rgba8();
            let mut paint = Paint::default();
            paint.set_color_rgba8(r, g, b, (a as f32 * opacity).round() as u8);
            paint.anti_alias = true;
            pixmap.fill_rect(rect, &paint, skia_transform, None);
        }
        NodeContent::Svg(bytes) => draw_svg(bytes, node.size, skia_transform, opacity, pixmap),
        NodeContent::Bitmap(image) => {
            let Some(source) = image_to_pixmap(image) else {
                return;
            };
            let paint = PixmapPaint {
                opacity,
                quality: FilterQuality::Bilinear,
                ..PixmapPaint::default()
            };
            let fit = skia_transform.pre_scale(
                node.size.width / source.width() as f32,
                node.size.height / source.height() as f32,
            );
            pixmap.draw_pixmap(0, 0, source.as_ref(), &paint, fit, None);
        }
    }
}

fn draw_svg(
    bytes: &[u8],
    size: Size,
    transform: tiny_skia::Transform,
    opacity: f32,
    pixmap: &mut Pixmap,
) {
    let svg = match resvg::usvg::Tree::from_data(bytes, &resvg::usvg::Options::default()) {
        Ok(svg) => svg,
        Err(err) => {
            log::warn!("Skipping unparsable SVG content in snapshot: {}", err);
            return;
        }
    };
    let svg_size = svg.size();
    let fit = transform.pre_scale(
        size.width / svg_size.width(),
        size.height / svg_size.height(),
    );

    if opacity >= 1.0 {
        resvg::render(&svg, fit, &mut pixmap.as_mut());
        return;
    }

    // Group opacity: render alone, then composite once.
    let Some(mut layer) = Pixmap::new(pixmap.width(), pixmap.height()) else {
        return;
    };
    resvg::render(&svg, fit, &mut layer.as_mut());
    let paint = PixmapPaint {
        opacity,
        ..PixmapPaint::default()
    };
    pixmap.draw_pixmap(0, 0, layer.as_ref(), &paint, tiny_skia::Transform::identity(), None);
}

/// Row-major column-vector matrix to tiny-skia's `(sx, ky, kx, sy, tx, ty)`.
fn to_skia(transform: &Transform) -> tiny_skia::Transform {
    tiny_skia::Transform::from_row(
        transform.a(),
        transform.c(),
        transform.b(),
        transform.d(),
        transform.tx(),
        transform.ty(),
    )
}

fn image_to_pixmap(image: &RgbaImage) -> Option<Pixmap> {
    let mut pixmap = Pixmap::new(image.width(), image.height())?;
    for (dst, src) in pixmap.pixels_mut().iter_mut().zip(image.pixels()) {
        let [r, g, b, a] = src.0;
        *dst = ColorU8::from_rgba(r, g, b, a).premultiply();
    }
    Some(pixmap)
}

fn pixmap_to_image(pixmap: &Pixmap) -> RgbaImage {
    let width = pixmap.width();
    let pixels = pixmap.pixels();
    RgbaImage::from_fn(width, pixmap.height(), |x, y| {
        let color = pixels[(y * width + x) as usize].demultiply();
        Rgba([color.red(), color.green(), color.blue(), color.alpha()])
    })
}
