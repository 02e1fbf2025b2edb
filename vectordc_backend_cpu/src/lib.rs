// Copyright 2026 the Vectordc Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Vello CPU–backed implementation of the vectordc backend.
//!
//! This crate implements [`VectorBackend`] on top of the sparse-strips
//! [`vello_cpu::RenderContext`]. It stands in for a windowing server: drawables
//! are registered with [`CpuBackend::insert_drawable`] and hold premultiplied
//! RGBA pixels that persist across contexts.
//!
//! Each draw is rasterized on its own, in device space, through the current
//! clip stack, and the result is composited into the innermost layer. Strokes
//! are outlined with [`kurbo::stroke`] in the user space current at the time
//! of the draw, so stroke widths and dashes follow the transform. Layers are
//! separate pixel buffers; popping one multiplies it by its mask and opacity
//! before compositing into the parent.
//!
//! Source-over and luminosity compositing are implemented. Other blend modes
//! fall back to source-over with a warning.

#![deny(unsafe_code)]

use std::sync::Arc;

use hashbrown::HashMap;
use kurbo::{Affine, BezPath, PathEl, Rect, Shape, Stroke, StrokeOpts};
use peniko::{BlendMode, Color, Compose, Extend, ImageQuality, ImageSampler, Mix};
use vectordc_backend::{
    BackendError, Cap, ContextId, Dashes, DrawOp, DrawableId, FillRule, Join, LayerOp, MaskRef,
    PathBuilder, PathOp, ResourceBackend, Source, StateOp, SurfaceDesc, SurfaceFormat, SurfaceId,
    SurfacePattern, VectorBackend,
};
use vello_cpu::kurbo::{Affine as CpuAffine, BezPath as CpuBezPath, Point as CpuPoint};
use vello_cpu::{Image as CpuImage, ImageSource, Pixmap, RenderContext, RenderMode, RenderSettings};

/// Settings for [`CpuBackend`].
#[derive(Copy, Clone, Debug)]
pub struct CpuBackendSettings {
    /// Flattening tolerance for stroke outlines, in device pixels.
    pub tolerance: f64,
    /// Rendering mode passed to `vello_cpu`.
    pub render_mode: RenderMode,
}

impl Default for CpuBackendSettings {
    fn default() -> Self {
        Self {
            tolerance: 0.1,
            render_mode: RenderMode::OptimizeSpeed,
        }
    }
}

#[derive(Clone, Debug)]
struct GState {
    transform: Affine,
    source: Source,
    /// User-to-device transform current when the source was set.
    source_transform: Affine,
    line_width: f64,
    cap: Cap,
    join: Join,
    dash: Option<(Dashes, f64)>,
    fill_rule: FillRule,
    blend: BlendMode,
    /// Device-space clip paths, intersected.
    clips: Vec<(BezPath, FillRule)>,
}

impl Default for GState {
    fn default() -> Self {
        Self {
            transform: Affine::IDENTITY,
            source: Source::Solid(Color::BLACK),
            source_transform: Affine::IDENTITY,
            line_width: 1.0,
            cap: Cap::Butt,
            join: Join::Miter,
            dash: None,
            fill_rule: FillRule::NonZero,
            blend: BlendMode::default(),
            clips: Vec::new(),
        }
    }
}

struct Layer {
    pixmap: Pixmap,
    op: LayerOp,
    /// Transform current when the layer was pushed; places the mask.
    transform: Affine,
}

struct ActiveContext {
    id: ContextId,
    drawable: DrawableId,
    width: u16,
    height: u16,
    /// `layers[0]` is the target; further entries are pushed groups.
    layers: Vec<Layer>,
    state: GState,
    saved: Vec<GState>,
    path: PathBuilder,
}

enum CpuSurface {
    Client(Arc<Pixmap>),
    Drawable(DrawableId),
}

#[derive(Clone)]
enum CpuPaint {
    Solid(Color),
    Image {
        image: CpuImage,
        /// Surface pixel space to device space.
        transform: Affine,
    },
}

/// CPU-backed implementation of the vector backend using `vello_cpu`.
pub struct CpuBackend {
    settings: CpuBackendSettings,
    drawables: HashMap<DrawableId, Pixmap>,
    surfaces: Vec<Option<CpuSurface>>,
    context: Option<ActiveContext>,
    next_context: u32,
    /// Reused between draws when the canvas size is unchanged.
    scratch: Option<RenderContext>,
}

impl core::fmt::Debug for CpuBackend {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("CpuBackend")
            .field("settings", &self.settings)
            .field("drawables", &self.drawables.len())
            .field("surfaces", &self.live_surfaces())
            .field("active", &self.context.as_ref().map(|c| c.id))
            .finish_non_exhaustive()
    }
}

impl Default for CpuBackend {
    fn default() -> Self {
        Self::new(CpuBackendSettings::default())
    }
}

impl CpuBackend {
    /// Create a backend with no drawables.
    pub fn new(settings: CpuBackendSettings) -> Self {
        Self {
            settings,
            drawables: HashMap::new(),
            surfaces: Vec::new(),
            context: None,
            next_context: 0,
            scratch: None,
        }
    }

    /// Register a transparent drawable of the given size, replacing any
    /// drawable with the same id.
    pub fn insert_drawable(&mut self, id: DrawableId, width: u16, height: u16) {
        self.drawables.insert(id, Pixmap::new(width, height));
    }

    /// Remove a drawable and its pixels.
    pub fn remove_drawable(&mut self, id: DrawableId) -> bool {
        self.drawables.remove(&id).is_some()
    }

    /// Premultiplied RGBA pixels of a drawable, as of the last context flush.
    pub fn drawable_pixmap(&self, id: DrawableId) -> Option<&Pixmap> {
        self.drawables.get(&id)
    }

    /// One pixel of a drawable with straight alpha.
    pub fn drawable_pixel(&self, id: DrawableId, x: u16, y: u16) -> Option<Color> {
        let pixmap = self.drawables.get(&id)?;
        pixel_at(pixmap, i32::from(x), i32::from(y))
    }

    /// Number of surfaces that have been created and not destroyed.
    pub fn live_surfaces(&self) -> usize {
        self.surfaces.iter().filter(|s| s.is_some()).count()
    }

    fn push_surface(&mut self, surface: CpuSurface) -> SurfaceId {
        let id = u32::try_from(self.surfaces.len())
            .expect("CpuBackend: too many surfaces for u32 SurfaceId");
        self.surfaces.push(Some(surface));
        SurfaceId(id)
    }

    /// Pixels of a surface for sampling. Drawable surfaces are snapshotted.
    fn surface_pixmap(&self, id: SurfaceId) -> Option<Arc<Pixmap>> {
        match self.surfaces.get(id.0 as usize)?.as_ref()? {
            CpuSurface::Client(pixmap) => Some(Arc::clone(pixmap)),
            CpuSurface::Drawable(drawable) => {
                if let Some(ctx) = &self.context
                    && ctx.drawable == *drawable
                {
                    return ctx.layers.first().map(|l| Arc::new(l.pixmap.clone()));
                }
                self.drawables.get(drawable).map(|p| Arc::new(p.clone()))
            }
        }
    }

    fn paint_for(&self, state: &GState) -> Option<CpuPaint> {
        match state.source {
            Source::Solid(color) => Some(CpuPaint::Solid(color)),
            Source::Surface(SurfacePattern {
                surface,
                transform,
                extend,
            }) => {
                let Some(pixmap) = self.surface_pixmap(surface) else {
                    log::warn!("source surface {surface:?} is not live; skipping draw");
                    return None;
                };
                Some(CpuPaint::Image {
                    image: image_paint(pixmap, extend),
                    transform: state.source_transform * transform,
                })
            }
        }
    }

    fn mask_coverage(&mut self, mask: MaskRef, transform: Affine) -> Option<Vec<u8>> {
        let ctx = self.context.as_ref()?;
        let (width, height) = (ctx.width, ctx.height);
        let Some(pixmap) = self.surface_pixmap(mask.surface) else {
            log::warn!("mask surface {:?} is not live", mask.surface);
            return None;
        };
        let placement = transform * Affine::translate(mask.origin.to_vec2());
        let bounds = Rect::new(
            0.0,
            0.0,
            f64::from(pixmap.width()),
            f64::from(pixmap.height()),
        );
        let mut area = bounds.to_path(0.1);
        area.apply_affine(placement);
        let paint = CpuPaint::Image {
            image: image_paint(pixmap, Extend::Pad),
            transform: placement,
        };
        let rendered = rasterize(
            &mut self.scratch,
            &self.settings,
            width,
            height,
            &[],
            &paint,
            &area,
            FillRule::NonZero,
        );
        Some(
            rendered
                .data_as_u8_slice()
                .chunks_exact(4)
                .map(|px| px[3])
                .collect(),
        )
    }

    /// Rasterize `path` with the current source and clip and composite it into
    /// the innermost layer, optionally through per-pixel coverage.
    fn fill_device(&mut self, path: &BezPath, rule: FillRule, coverage: Option<&[u8]>) {
        let Some(ctx) = self.context.as_ref() else {
            return;
        };
        if ctx.width == 0 || ctx.height == 0 {
            return;
        }
        let Some(paint) = self.paint_for(&ctx.state) else {
            return;
        };
        let (width, height) = (ctx.width, ctx.height);
        let clips = ctx.state.clips.clone();
        let blend = ctx.state.blend;
        let mut rendered = rasterize(
            &mut self.scratch,
            &self.settings,
            width,
            height,
            &clips,
            &paint,
            path,
            rule,
        );
        if let Some(coverage) = coverage {
            scale_by_coverage(rendered.data_as_u8_slice_mut(), coverage, 1.0);
        }
        if let Some(ctx) = self.context.as_mut()
            && let Some(top) = ctx.layers.last_mut()
        {
            composite(
                top.pixmap.data_as_u8_slice_mut(),
                rendered.data_as_u8_slice(),
                blend,
            );
        }
    }

    fn push_layer(&mut self, op: LayerOp) {
        let Some(ctx) = self.context.as_mut() else {
            return;
        };
        ctx.saved.push(ctx.state.clone());
        let pixmap = Pixmap::new(ctx.width, ctx.height);
        let transform = ctx.state.transform;
        ctx.layers.push(Layer {
            pixmap,
            op,
            transform,
        });
    }

    fn pop_layer(&mut self) {
        let Some(ctx) = self.context.as_mut() else {
            return;
        };
        if ctx.layers.len() < 2 {
            log::warn!("PopLayer without a matching PushLayer");
            return;
        }
        let Some(mut layer) = ctx.layers.pop() else {
            return;
        };
        if let Some(saved) = ctx.saved.pop() {
            ctx.state = saved;
        }
        let opacity = layer.op.opacity.unwrap_or(1.0).clamp(0.0, 1.0);
        let coverage = match layer.op.mask {
            Some(mask) => {
                let transform = layer.transform;
                self.mask_coverage(mask, transform)
            }
            None => None,
        };
        match &coverage {
            Some(coverage) => {
                scale_by_coverage(layer.pixmap.data_as_u8_slice_mut(), coverage, opacity);
            }
            None if opacity < 1.0 => {
                scale_by_opacity(layer.pixmap.data_as_u8_slice_mut(), opacity);
            }
            None => {}
        }
        let blend = layer.op.blend.unwrap_or_default();
        if let Some(ctx) = self.context.as_mut()
            && let Some(parent) = ctx.layers.last_mut()
        {
            composite(
                parent.pixmap.data_as_u8_slice_mut(),
                layer.pixmap.data_as_u8_slice(),
                blend,
            );
        }
    }
}

impl ResourceBackend for CpuBackend {
    fn create_surface(
        &mut self,
        desc: SurfaceDesc,
        data: &[u8],
    ) -> Result<SurfaceId, BackendError> {
        let expected = desc.byte_len();
        if data.len() != expected || desc.stride < desc.format.stride_for_width(desc.width) {
            return Err(BackendError::DataSize {
                expected,
                actual: data.len(),
            });
        }
        let too_large = || BackendError::TooLarge {
            width: desc.width,
            height: desc.height,
        };
        let width = u16::try_from(desc.width).map_err(|_| too_large())?;
        let height = u16::try_from(desc.height).map_err(|_| too_large())?;
        let mut pixmap = Pixmap::new(width, height);
        decode_surface(&desc, data, pixmap.data_as_u8_slice_mut());
        Ok(self.push_surface(CpuSurface::Client(Arc::new(pixmap))))
    }

    fn create_drawable_surface(
        &mut self,
        drawable: DrawableId,
        _width: u32,
        _height: u32,
    ) -> Result<SurfaceId, BackendError> {
        if !self.drawables.contains_key(&drawable) {
            return Err(BackendError::UnknownDrawable(drawable));
        }
        Ok(self.push_surface(CpuSurface::Drawable(drawable)))
    }

    fn destroy_surface(&mut self, id: SurfaceId) {
        if let Some(slot) = self.surfaces.get_mut(id.0 as usize) {
            *slot = None;
        }
    }
}

impl VectorBackend for CpuBackend {
    fn create_context(&mut self, target: SurfaceId) -> Result<ContextId, BackendError> {
        if self.context.is_some() {
            return Err(BackendError::ContextBusy);
        }
        let Some(Some(CpuSurface::Drawable(drawable))) = self.surfaces.get(target.0 as usize)
        else {
            return Err(BackendError::UnknownSurface(target));
        };
        let drawable = *drawable;
        let pixmap = self
            .drawables
            .get(&drawable)
            .cloned()
            .ok_or(BackendError::UnknownDrawable(drawable))?;
        let id = ContextId(self.next_context);
        self.next_context = self
            .next_context
            .checked_add(1)
            .expect("CpuBackend: too many contexts for u32 ContextId");
        log::debug!(
            "context {id:?} on drawable {drawable:?} ({}x{})",
            pixmap.width(),
            pixmap.height()
        );
        self.context = Some(ActiveContext {
            id,
            drawable,
            width: pixmap.width(),
            height: pixmap.height(),
            layers: vec![Layer {
                pixmap,
                op: LayerOp::default(),
                transform: Affine::IDENTITY,
            }],
            state: GState::default(),
            saved: Vec::new(),
            path: PathBuilder::new(),
        });
        Ok(id)
    }

    fn destroy_context(&mut self, id: ContextId) {
        if self.context.as_ref().map(|c| c.id) != Some(id) {
            return;
        }
        while self.context.as_ref().is_some_and(|c| c.layers.len() > 1) {
            log::warn!("context {id:?} destroyed with an open layer");
            self.pop_layer();
        }
        if let Some(mut ctx) = self.context.take()
            && let Some(target) = ctx.layers.pop()
        {
            log::debug!("context {id:?} flushed to drawable {:?}", ctx.drawable);
            self.drawables.insert(ctx.drawable, target.pixmap);
        }
    }

    fn path(&mut self, op: PathOp) {
        if let Some(ctx) = self.context.as_mut() {
            let transform = ctx.state.transform;
            ctx.path.apply(&op, transform);
        }
    }

    fn state(&mut self, op: StateOp) {
        log::trace!("state {op:?}");
        match op {
            StateOp::PushLayer(layer) => {
                self.push_layer(layer);
                return;
            }
            StateOp::PopLayer => {
                self.pop_layer();
                return;
            }
            _ => {}
        }
        let Some(ctx) = self.context.as_mut() else {
            log::warn!("state op without an active context");
            return;
        };
        let state = &mut ctx.state;
        match op {
            StateOp::Save => ctx.saved.push(state.clone()),
            StateOp::Restore => match ctx.saved.pop() {
                Some(saved) => *state = saved,
                None => log::warn!("Restore without a matching Save"),
            },
            StateOp::Transform(transform) => state.transform *= transform,
            StateOp::SetSource(source) => {
                state.source = source;
                state.source_transform = state.transform;
            }
            StateOp::SetLineWidth(width) => state.line_width = width,
            StateOp::SetLineCap(cap) => state.cap = cap,
            StateOp::SetLineJoin(join) => state.join = join,
            StateOp::SetDash { pattern, offset } => {
                state.dash = (!pattern.is_empty()).then_some((pattern, offset));
            }
            StateOp::SetFillRule(rule) => state.fill_rule = rule,
            StateOp::SetBlendMode(mode) => state.blend = mode,
            StateOp::Clip => {
                let clip = ctx.path.take();
                state.clips.push((clip, state.fill_rule));
            }
            StateOp::ResetClip => state.clips.clear(),
            StateOp::PushLayer(_) | StateOp::PopLayer => {}
        }
    }

    fn draw(&mut self, op: DrawOp) {
        log::trace!("draw {op:?}");
        let Some(ctx) = self.context.as_ref() else {
            log::warn!("draw op without an active context");
            return;
        };
        let tolerance = self.settings.tolerance;
        match op {
            DrawOp::Fill { preserve } => {
                let path = ctx.path.path().clone();
                let rule = ctx.state.fill_rule;
                self.fill_device(&path, rule, None);
                if !preserve {
                    self.clear_path();
                }
            }
            DrawOp::Stroke { preserve } => {
                if let Some(outline) = stroke_outline(&ctx.state, ctx.path.path(), tolerance) {
                    self.fill_device(&outline, FillRule::NonZero, None);
                }
                if !preserve {
                    self.clear_path();
                }
            }
            DrawOp::Paint => {
                let area = canvas_rect(ctx);
                self.fill_device(&area, FillRule::NonZero, None);
            }
            DrawOp::Mask(mask) => {
                let area = canvas_rect(ctx);
                let transform = ctx.state.transform;
                if let Some(coverage) = self.mask_coverage(mask, transform) {
                    self.fill_device(&area, FillRule::NonZero, Some(&coverage));
                }
            }
        }
    }

    fn transform(&self) -> Affine {
        self.context
            .as_ref()
            .map_or(Affine::IDENTITY, |c| c.state.transform)
    }

    fn read_pixel(&mut self, x: i32, y: i32) -> Option<Color> {
        let ctx = self.context.as_ref()?;
        pixel_at(&ctx.layers.first()?.pixmap, x, y)
    }
}

impl CpuBackend {
    fn clear_path(&mut self) {
        if let Some(ctx) = self.context.as_mut() {
            ctx.path.clear();
        }
    }
}

fn canvas_rect(ctx: &ActiveContext) -> BezPath {
    Rect::new(0.0, 0.0, f64::from(ctx.width), f64::from(ctx.height)).to_path(0.1)
}

fn image_paint(pixmap: Arc<Pixmap>, extend: Extend) -> CpuImage {
    CpuImage {
        image: ImageSource::Pixmap(pixmap),
        sampler: ImageSampler {
            x_extend: extend,
            y_extend: extend,
            quality: ImageQuality::Low,
            ..ImageSampler::default()
        },
    }
}

/// Outline the device-space `path` with the stroke parameters of `state`,
/// interpreted in the user space of `state`.
fn stroke_outline(state: &GState, path: &BezPath, tolerance: f64) -> Option<BezPath> {
    let det = state.transform.determinant();
    if det == 0.0 || !det.is_finite() || path.elements().is_empty() {
        return None;
    }
    let mut user = path.clone();
    user.apply_affine(state.transform.inverse());
    let mut style = Stroke::new(state.line_width)
        .with_caps(state.cap)
        .with_join(state.join);
    if let Some((pattern, offset)) = &state.dash {
        style = style.with_dashes(*offset, pattern.iter().copied());
    }
    let user_tolerance = tolerance / det.abs().sqrt();
    let mut outline = kurbo::stroke(user.iter(), &style, &StrokeOpts::default(), user_tolerance);
    outline.apply_affine(state.transform);
    Some(outline)
}

fn affine_to_cpu(xf: Affine) -> CpuAffine {
    CpuAffine::new(xf.as_coeffs())
}

fn bezpath_to_cpu(path: &BezPath) -> CpuBezPath {
    let cpu = |p: kurbo::Point| CpuPoint::new(p.x, p.y);
    let mut out = CpuBezPath::new();
    for el in path.elements() {
        match *el {
            PathEl::MoveTo(p) => out.move_to(cpu(p)),
            PathEl::LineTo(p) => out.line_to(cpu(p)),
            PathEl::QuadTo(p1, p2) => out.quad_to(cpu(p1), cpu(p2)),
            PathEl::CurveTo(p1, p2, p3) => out.curve_to(cpu(p1), cpu(p2), cpu(p3)),
            PathEl::ClosePath => out.close_path(),
        }
    }
    out
}

/// Rasterize one device-space path through `clips` into a fresh pixmap.
fn rasterize(
    scratch: &mut Option<RenderContext>,
    settings: &CpuBackendSettings,
    width: u16,
    height: u16,
    clips: &[(BezPath, FillRule)],
    paint: &CpuPaint,
    path: &BezPath,
    rule: FillRule,
) -> Pixmap {
    let mut ctx = match scratch.take() {
        Some(ctx) if ctx.width() == width && ctx.height() == height => ctx,
        _ => RenderContext::new_with(
            width,
            height,
            RenderSettings {
                render_mode: settings.render_mode,
                ..RenderSettings::default()
            },
        ),
    };
    ctx.reset();
    ctx.set_transform(CpuAffine::IDENTITY);
    for (clip, clip_rule) in clips {
        ctx.set_fill_rule(*clip_rule);
        ctx.push_clip_layer(&bezpath_to_cpu(clip));
    }
    match paint {
        CpuPaint::Solid(color) => {
            ctx.set_paint_transform(CpuAffine::IDENTITY);
            ctx.set_paint(*color);
        }
        CpuPaint::Image { image, transform } => {
            ctx.set_paint_transform(affine_to_cpu(*transform));
            ctx.set_paint(image.clone());
        }
    }
    ctx.set_fill_rule(rule);
    ctx.fill_path(&bezpath_to_cpu(path));
    for _ in clips {
        ctx.pop_layer();
    }
    ctx.flush();
    let mut out = Pixmap::new(width, height);
    ctx.render_to_pixmap(&mut out);
    *scratch = Some(ctx);
    out
}

/// Convert client surface bytes into premultiplied RGBA.
fn decode_surface(desc: &SurfaceDesc, data: &[u8], out: &mut [u8]) {
    let width = desc.width as usize;
    for (y, row) in data.chunks_exact(desc.stride.max(1)).enumerate() {
        let out_row = &mut out[y * width * 4..(y + 1) * width * 4];
        for (x, px) in out_row.chunks_exact_mut(4).enumerate() {
            let rgba = match desc.format {
                SurfaceFormat::A1 => {
                    let on = row[x >> 3] & (1 << (x & 7)) != 0;
                    [0, 0, 0, if on { 255 } else { 0 }]
                }
                SurfaceFormat::A8 => [0, 0, 0, row[x]],
                SurfaceFormat::Argb32 => {
                    let i = x * 4;
                    let [b, g, r, a] = [row[i], row[i + 1], row[i + 2], row[i + 3]];
                    [r, g, b, a]
                }
            };
            px.copy_from_slice(&rgba);
        }
    }
}

fn pixel_at(pixmap: &Pixmap, x: i32, y: i32) -> Option<Color> {
    let x = usize::try_from(x).ok()?;
    let y = usize::try_from(y).ok()?;
    let (width, height) = (usize::from(pixmap.width()), usize::from(pixmap.height()));
    if x >= width || y >= height {
        return None;
    }
    let i = (y * width + x) * 4;
    let px = pixmap.data_as_u8_slice().get(i..i + 4)?;
    let [r, g, b] = unpremultiply([px[0], px[1], px[2]], px[3]);
    Some(Color::from_rgba8(r, g, b, px[3]))
}

fn unpremultiply(rgb: [u8; 3], a: u8) -> [u8; 3] {
    if a == 0 {
        return [0; 3];
    }
    let a = u32::from(a);
    rgb.map(|c| {
        let v = (u32::from(c) * 255 + a / 2) / a;
        u8::try_from(v.min(255)).unwrap_or(u8::MAX)
    })
}

fn mul_div255(x: u8, y: u8) -> u8 {
    let t = u32::from(x) * u32::from(y) + 128;
    u8::try_from((t + (t >> 8)) >> 8).unwrap_or(u8::MAX)
}

fn scale_by_coverage(pixels: &mut [u8], coverage: &[u8], opacity: f32) {
    let op = unit_to_u8(opacity);
    for (px, &c) in pixels.chunks_exact_mut(4).zip(coverage) {
        let k = mul_div255(c, op);
        for v in px.iter_mut() {
            *v = mul_div255(*v, k);
        }
    }
}

fn scale_by_opacity(pixels: &mut [u8], opacity: f32) {
    let op = unit_to_u8(opacity);
    for v in pixels.iter_mut() {
        *v = mul_div255(*v, op);
    }
}

fn unit_to_u8(v: f32) -> u8 {
    #[expect(
        clippy::cast_possible_truncation,
        reason = "value is clamped to 0..=255 before the cast"
    )]
    let out = (v.clamp(0.0, 1.0) * 255.0).round() as u8;
    out
}

/// Composite premultiplied `src` into premultiplied `dst`.
fn composite(dst: &mut [u8], src: &[u8], blend: BlendMode) {
    if blend.compose != Compose::SrcOver {
        log::warn!("compose mode {:?} is not supported; using source-over", blend.compose);
    }
    match blend.mix {
        Mix::Luminosity => luminosity_in_place(dst, src),
        Mix::Normal => over_in_place(dst, src),
        other => {
            log::warn!("blend mode {other:?} is not supported; using source-over");
            over_in_place(dst, src);
        }
    }
}

fn over_in_place(dst: &mut [u8], src: &[u8]) {
    for (d, s) in dst.chunks_exact_mut(4).zip(src.chunks_exact(4)) {
        let sa = s[3];
        if sa == 0 {
            continue;
        }
        let inv = 255 - sa;
        for c in 0..4 {
            d[c] = s[c].saturating_add(mul_div255(d[c], inv));
        }
    }
}

fn lum(c: [f32; 3]) -> f32 {
    0.3 * c[0] + 0.59 * c[1] + 0.11 * c[2]
}

fn clip_color(c: [f32; 3]) -> [f32; 3] {
    let l = lum(c);
    let n = c[0].min(c[1]).min(c[2]);
    let x = c[0].max(c[1]).max(c[2]);
    let mut out = c;
    if n < 0.0 && l - n > f32::EPSILON {
        out = out.map(|v| l + (v - l) * l / (l - n));
    }
    if x > 1.0 && x - l > f32::EPSILON {
        out = out.map(|v| l + (v - l) * (1.0 - l) / (x - l));
    }
    out
}

fn set_lum(c: [f32; 3], l: f32) -> [f32; 3] {
    let d = l - lum(c);
    clip_color(c.map(|v| v + d))
}

/// Non-separable luminosity: the hue and saturation of the backdrop with the
/// luminance of the source.
fn luminosity_in_place(dst: &mut [u8], src: &[u8]) {
    let unit = |v: u8| f32::from(v) / 255.0;
    for (d, s) in dst.chunks_exact_mut(4).zip(src.chunks_exact(4)) {
        let sa = unit(s[3]);
        if sa == 0.0 {
            continue;
        }
        let da = unit(d[3]);
        let sp = [unit(s[0]), unit(s[1]), unit(s[2])];
        let dp = [unit(d[0]), unit(d[1]), unit(d[2])];
        let cs = sp.map(|v| v / sa);
        let cb = if da > 0.0 { dp.map(|v| v / da) } else { [0.0; 3] };
        let mixed = set_lum(cb, lum(cs));
        for c in 0..3 {
            let v = sp[c] * (1.0 - da) + dp[c] * (1.0 - sa) + sa * da * mixed[c];
            d[c] = unit_to_u8(v);
        }
        d[3] = unit_to_u8(sa + da - sa * da);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn a1_surfaces_decode_lsb_first() {
        let desc = SurfaceDesc::new(9, 1, SurfaceFormat::A1);
        let mut out = vec![0_u8; 9 * 4];
        decode_surface(&desc, &[0b0000_0101, 0b0000_0001, 0, 0], &mut out);
        let alphas: Vec<u8> = out.chunks_exact(4).map(|px| px[3]).collect();
        assert_eq!(alphas, [255, 0, 255, 0, 0, 0, 0, 0, 255]);
    }

    #[test]
    fn argb32_surfaces_decode_little_endian() {
        let desc = SurfaceDesc::new(1, 1, SurfaceFormat::Argb32);
        let word: u32 = 0x80_40_20_10;
        let mut out = [0_u8; 4];
        decode_surface(&desc, &word.to_le_bytes(), &mut out);
        assert_eq!(out, [0x40, 0x20, 0x10, 0x80]);
    }

    #[test]
    fn over_of_opaque_source_replaces() {
        let mut dst = [10, 20, 30, 255];
        over_in_place(&mut dst, &[200, 0, 0, 255]);
        assert_eq!(dst, [200, 0, 0, 255]);
    }

    #[test]
    fn over_of_transparent_source_keeps_backdrop() {
        let mut dst = [10, 20, 30, 255];
        over_in_place(&mut dst, &[0, 0, 0, 0]);
        assert_eq!(dst, [10, 20, 30, 255]);
    }

    #[test]
    fn luminosity_keeps_gray_backdrop_hue() {
        // A gray backdrop takes the luminance of the source and stays gray.
        let mut dst = [128, 128, 128, 255];
        luminosity_in_place(&mut dst, &[255, 255, 255, 255]);
        assert_eq!(dst, [255, 255, 255, 255]);

        let mut dst = [128, 128, 128, 255];
        luminosity_in_place(&mut dst, &[0, 0, 0, 255]);
        assert_eq!(dst, [0, 0, 0, 255]);
    }

    #[test]
    fn unpremultiply_rounds() {
        assert_eq!(unpremultiply([64, 0, 128], 128), [128, 0, 255]);
        assert_eq!(unpremultiply([5, 5, 5], 0), [0, 0, 0]);
    }

    #[test]
    fn coverage_scales_all_channels() {
        let mut px = [255, 255, 255, 255, 255, 0, 0, 255];
        scale_by_coverage(&mut px, &[255, 0], 1.0);
        assert_eq!(px, [255, 255, 255, 255, 0, 0, 0, 0]);
    }
}
