// Copyright 2026 the Vectordc Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The device context and its paint resolver.

mod image;
mod path;
mod text;

use core::fmt;

use log::{trace, warn};
use vectordc_backend::{
    Affine, Dashes, DrawOp, Extend, LayerOp, PathOp, Point as UserPoint, Rect, Source, StateOp,
    SurfaceId, SurfacePattern, TextEngine, Vec2, VectorBackend,
};

use crate::convert::{PixelView, bitmap_to_a1, bitmap_to_argb32};
use crate::dash::DashPattern;
use crate::device::FULL_CIRCLE;
use crate::drawable::ensure_bits;
use crate::paint::{PaintPass, PassDash, PassSource, plan};
use crate::session::Session;
use crate::state::{DrawState, Resolved, ResolvedSource, Stipple, StippleKey, TileRef};
use crate::stipple::{PATTERN_SIZE, pattern_bits};
use crate::{
    CapStyle, ClientBitmap, ClientImage, Color, DcConfig, DcError, DeviceContext, Drawable,
    FillRule, FillStyle, FontDescriptor, Function, IconMode, JoinStyle, LineStyle, Point,
    Rectangle, Segment, StipplePattern, mapping,
};

/// A point in user space from pixel coordinates.
#[inline]
fn user(x: i32, y: i32) -> UserPoint {
    UserPoint::new(f64::from(x), f64::from(y))
}

/// A rectangle in user space from a pixel box.
#[inline]
fn user_rect(x: i32, y: i32, w: i32, h: i32) -> Rect {
    Rect::from_origin_size(user(x, y), (f64::from(w), f64::from(h)))
}

/// An integer-pixel device context drawing through a [`VectorBackend`].
///
/// The context borrows the backend for its whole life. Drawing happens
/// between [`VectorDc::begin`] and [`VectorDc::end`]; dropping the context
/// ends any open session.
///
/// Pen and brush state is recorded as set and pushed to the backend lazily,
/// only when a paint needs it and only if it differs from what the backend
/// was last given.
pub struct VectorDc<'a, B: VectorBackend> {
    backend: &'a mut B,
    text: Option<&'a dyn TextEngine>,
    config: DcConfig,
    session: Option<Session>,
    state: DrawState,
    resolved: Resolved,
}

impl<B: VectorBackend> fmt::Debug for VectorDc<'_, B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VectorDc")
            .field("config", &self.config)
            .field("session", &self.session)
            .field("state", &self.state)
            .field("resolved", &self.resolved)
            .finish_non_exhaustive()
    }
}

impl<B: VectorBackend> Drop for VectorDc<'_, B> {
    fn drop(&mut self) {
        self.end();
    }
}

impl<'a, B: VectorBackend> VectorDc<'a, B> {
    /// A context with the default configuration and no text support.
    pub fn new(backend: &'a mut B) -> Self {
        Self::with_config(backend, DcConfig::default())
    }

    /// A context with an explicit configuration.
    pub fn with_config(backend: &'a mut B, config: DcConfig) -> Self {
        Self {
            backend,
            text: None,
            config,
            session: None,
            state: DrawState::default(),
            resolved: Resolved::default(),
        }
    }

    /// Attach a text engine. Sessions begun afterwards can draw text.
    pub fn with_text_engine(mut self, engine: &'a dyn TextEngine) -> Self {
        self.text = Some(engine);
        self
    }

    /// The configuration.
    pub fn config(&self) -> &DcConfig {
        &self.config
    }

    /// The backend.
    pub fn backend(&self) -> &B {
        self.backend
    }

    /// The backend, for direct use.
    ///
    /// Backend state is assumed unknown afterwards and is pushed again on
    /// the next paint.
    pub fn backend_mut(&mut self) -> &mut B {
        self.resolved.invalidate();
        self.backend
    }

    /// Whether a painting session is open.
    pub fn is_bound(&self) -> bool {
        self.session.is_some()
    }

    /// Open a painting session on `drawable`.
    ///
    /// An open session is ended first. The dash pattern, fill rule and
    /// sharpening are reset from the configuration.
    pub fn begin(&mut self, drawable: &dyn Drawable) -> Result<(), DcError> {
        self.end();
        let session = Session::open(&mut *self.backend, drawable, self.text)?;
        self.session = Some(session);
        self.resolved.invalidate();
        self.state.sharpen = self.config.sharpen;
        self.state.dashes = DashPattern::new(0, &self.config.default_dashes).unwrap_or_default();
        self.state.fill_rule = self.config.fill_rule;
        self.backend.state(StateOp::SetFillRule(mapping::fill_rule(self.state.fill_rule)));
        self.backend.state(StateOp::SetLineCap(mapping::cap(self.state.cap)));
        self.backend.state(StateOp::SetLineJoin(mapping::join(self.state.join)));
        Ok(())
    }

    /// Open a painting session clipped to a rectangle.
    pub fn begin_with_clip(
        &mut self,
        drawable: &dyn Drawable,
        clip: Rectangle,
    ) -> Result<(), DcError> {
        self.begin(drawable)?;
        self.set_clip_rectangle(clip.x.into(), clip.y.into(), clip.w.into(), clip.h.into())
    }

    /// Close the session, releasing every backend resource it created.
    ///
    /// The drawing state returns to its defaults. Does nothing when no
    /// session is open.
    pub fn end(&mut self) {
        if let Some(session) = self.session.take() {
            session.close(&mut *self.backend);
            self.state = DrawState::default();
            self.resolved.invalidate();
        }
    }

    /// The foreground color.
    pub fn foreground(&self) -> Color {
        self.state.foreground
    }

    /// The background color.
    pub fn background(&self) -> Color {
        self.state.background
    }

    /// The line width.
    pub fn line_width(&self) -> u32 {
        self.state.line_width
    }

    /// The line cap style.
    pub fn line_cap(&self) -> CapStyle {
        self.state.cap
    }

    /// The line join style.
    pub fn line_join(&self) -> JoinStyle {
        self.state.join
    }

    /// The line style.
    pub fn line_style(&self) -> LineStyle {
        self.state.line_style
    }

    /// The dash pattern.
    pub fn dashes(&self) -> &DashPattern {
        &self.state.dashes
    }

    /// The fill style.
    pub fn fill_style(&self) -> FillStyle {
        self.state.fill_style
    }

    /// The fill rule.
    pub fn fill_rule(&self) -> FillRule {
        self.state.fill_rule
    }

    /// The raster function.
    pub fn function(&self) -> Function {
        self.state.function
    }

    /// Whether thin strokes are sharpened.
    pub fn line_sharpen(&self) -> bool {
        self.state.sharpen
    }

    /// The selected font.
    pub fn font(&self) -> Option<&FontDescriptor> {
        self.session
            .as_ref()
            .and_then(|s| s.font.as_ref())
            .map(|(font, _)| font)
    }

    /// Push the backend state. Pair with [`VectorDc::restore`].
    pub fn save(&mut self) -> Result<(), DcError> {
        self.session()?;
        self.backend.save();
        Ok(())
    }

    /// Pop the backend state pushed by [`VectorDc::save`].
    pub fn restore(&mut self) -> Result<(), DcError> {
        self.session()?;
        self.backend.restore();
        self.resolved.invalidate();
        Ok(())
    }

    /// Translate subsequent drawing.
    pub fn translate(&mut self, dx: f64, dy: f64) -> Result<(), DcError> {
        self.transform(Affine::translate((dx, dy)))
    }

    /// Scale subsequent drawing.
    pub fn scale(&mut self, sx: f64, sy: f64) -> Result<(), DcError> {
        self.transform(Affine::scale_non_uniform(sx, sy))
    }

    /// Rotate subsequent drawing by `radians`.
    pub fn rotate(&mut self, radians: f64) -> Result<(), DcError> {
        self.transform(Affine::rotate(radians))
    }

    /// Concatenate a transform onto the current one.
    pub fn transform(&mut self, transform: Affine) -> Result<(), DcError> {
        self.session()?;
        self.backend.state(StateOp::Transform(transform));
        Ok(())
    }

    fn session(&self) -> Result<&Session, DcError> {
        self.session.as_ref().ok_or(DcError::SessionNotBound)
    }

    fn session_mut(&mut self) -> Result<&mut Session, DcError> {
        self.session.as_mut().ok_or(DcError::SessionNotBound)
    }

    /// Shift by half a pixel so that a `width`-wide stroke on integer
    /// coordinates covers whole pixels, or undo that shift.
    ///
    /// Only odd and hairline widths are shifted, and only while user and
    /// device units coincide.
    pub(crate) fn sharp_offset(&mut self, on: bool, width: u32) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        if on {
            if session.sharp_offset || !self.state.sharpen {
                return;
            }
            if width % 2 == 1 || width == 0 {
                let unit = self.backend.device_to_user_distance(Vec2::new(1.0, 1.0));
                if unit == Vec2::new(1.0, 1.0) {
                    self.backend.translate(Vec2::new(0.5, 0.5));
                    session.sharp_offset = true;
                }
            }
        } else if session.sharp_offset {
            self.backend.translate(Vec2::new(-0.5, -0.5));
            session.sharp_offset = false;
        }
    }

    fn set_solid(&mut self, color: Color) {
        let wanted = ResolvedSource::Solid(color);
        if self.resolved.source.as_ref() == Some(&wanted) {
            trace!("source unchanged");
            return;
        }
        self.backend.set_source_color(color.into());
        self.resolved.source = Some(wanted);
    }

    /// Make the backend source match the fill style. `alternate` selects
    /// the background for solid fills.
    pub(crate) fn resolve_source(&mut self, alternate: bool) -> Result<(), DcError> {
        let solid = if alternate {
            self.state.background
        } else {
            self.state.foreground
        };
        match self.state.fill_style {
            FillStyle::Solid => self.set_solid(solid),
            FillStyle::Tiled => match self.state.tile {
                Some(tile) => self.set_tile_source(tile)?,
                None => {
                    warn!("tiled fill without a tile, painting solid");
                    self.set_solid(solid);
                }
            },
            style @ (FillStyle::Stippled | FillStyle::OpaqueStippled) => {
                match self.state.stipple.clone() {
                    Some(stipple) => {
                        let key = StippleKey {
                            stipple,
                            foreground: self.state.foreground,
                            background: (style == FillStyle::OpaqueStippled)
                                .then_some(self.state.background),
                        };
                        self.set_stipple_source(key)?;
                    }
                    None => {
                        warn!("stippled fill without a stipple, painting solid");
                        self.set_solid(solid);
                    }
                }
            }
        }
        Ok(())
    }

    fn set_tile_source(&mut self, tile: TileRef) -> Result<(), DcError> {
        let origin = self.state.pattern_origin;
        let wanted = ResolvedSource::Tile {
            drawable: tile.drawable,
            origin,
        };
        if self.resolved.source.as_ref() == Some(&wanted) {
            trace!("tile source unchanged");
            return Ok(());
        }
        let session = self
            .session
            .as_mut()
            .ok_or(DcError::SessionNotBound)?;
        let surface =
            session.tile_surface(&mut *self.backend, tile.drawable, tile.width, tile.height)?;
        self.set_repeating(surface, origin);
        self.resolved.source = Some(wanted);
        Ok(())
    }

    fn set_stipple_source(&mut self, key: StippleKey) -> Result<(), DcError> {
        let origin = self.state.pattern_origin;
        let wanted = ResolvedSource::Stipple {
            key: key.clone(),
            origin,
        };
        if self.resolved.source.as_ref() == Some(&wanted) {
            trace!("stipple source unchanged");
            return Ok(());
        }
        let session = self
            .session
            .as_mut()
            .ok_or(DcError::SessionNotBound)?;
        let surface = session.stipple_surface(&mut *self.backend, &key, || {
            let background = key.background.unwrap_or(Color::TRANSPARENT);
            match &key.stipple {
                Stipple::Bitmap {
                    width,
                    height,
                    bits,
                    ..
                } => bitmap_to_argb32(
                    PixelView::bitmap(*width, *height, bits),
                    key.foreground,
                    background,
                ),
                Stipple::Pattern(pattern) => {
                    let rows = pattern_bits(*pattern);
                    bitmap_to_argb32(
                        PixelView::bitmap(PATTERN_SIZE, PATTERN_SIZE, &rows),
                        key.foreground,
                        background,
                    )
                }
            }
        })?;
        self.set_repeating(surface, origin);
        self.resolved.source = Some(wanted);
        Ok(())
    }

    fn set_repeating(&mut self, surface: SurfaceId, (x, y): (i32, i32)) {
        let pattern = SurfacePattern::at(surface, user(x, y)).with_extend(Extend::Repeat);
        self.backend.state(StateOp::SetSource(Source::Surface(pattern)));
    }

    fn resolve_line_width(&mut self) {
        let width = self.state.line_width;
        if width == 0 {
            // Hairlines depend on the transform, so they are never cached.
            let unit = self.backend.device_to_user_distance(Vec2::new(1.0, 1.0));
            self.backend.state(StateOp::SetLineWidth(unit.x.abs().max(unit.y.abs())));
            self.resolved.line_width = None;
        } else if self.resolved.line_width != Some(width) {
            self.backend.state(StateOp::SetLineWidth(f64::from(width)));
            self.resolved.line_width = Some(width);
        }
    }

    fn resolve_dash(&mut self, dash: PassDash) {
        let wanted = match dash {
            PassDash::Solid => None,
            PassDash::Primary => Some(self.state.dashes.dashes()),
            PassDash::Permuted => Some(self.state.dashes.permuted_dashes()),
        };
        if self.resolved.dash.as_ref() == Some(&wanted) {
            return;
        }
        let (pattern, offset) = wanted.clone().unwrap_or_default();
        self.backend.state(StateOp::SetDash { pattern, offset });
        self.resolved.dash = Some(wanted);
    }

    fn resolve_pass_source(&mut self, source: PassSource) -> Result<(), DcError> {
        match source {
            PassSource::Primary => self.resolve_source(false),
            PassSource::Alternate => self.resolve_source(true),
            PassSource::Background => {
                self.set_solid(self.state.background);
                Ok(())
            }
        }
    }

    fn run_pass(&mut self, pass: PaintPass) -> Result<(), DcError> {
        match pass {
            PaintPass::Fill { source, preserve } => {
                self.resolve_pass_source(source)?;
                self.backend.draw(DrawOp::Fill { preserve });
            }
            PaintPass::Stroke {
                source,
                dash,
                preserve,
                isolated,
            } => {
                self.resolve_line_width();
                if isolated {
                    self.backend.save();
                    self.resolve_dash(dash);
                    let result = self.resolve_pass_source(source);
                    if result.is_ok() {
                        self.backend.draw(DrawOp::Stroke { preserve });
                    }
                    self.backend.restore();
                    self.resolved.invalidate();
                    result?;
                } else {
                    self.resolve_dash(dash);
                    self.resolve_pass_source(source)?;
                    self.backend.draw(DrawOp::Stroke { preserve });
                }
            }
        }
        Ok(())
    }

    /// Fill and/or stroke the current path, through the clip mask if one
    /// is set.
    pub(crate) fn paint(
        &mut self,
        stroke: bool,
        fill: bool,
        preserve: bool,
    ) -> Result<(), DcError> {
        let mask = self.session()?.mask_ref();
        if let Some(mask) = mask {
            self.backend.state(StateOp::PushLayer(LayerOp::masked(mask)));
        }
        let mut result = Ok(());
        for pass in plan(stroke, fill, preserve, self.state.line_style) {
            result = self.run_pass(pass);
            if result.is_err() {
                break;
            }
        }
        if mask.is_some() {
            self.backend.state(StateOp::PopLayer);
            self.resolved.invalidate();
        }
        result
    }

    fn stroke(&mut self) -> Result<(), DcError> {
        self.paint(true, false, false)
    }

    fn fill(&mut self) -> Result<(), DcError> {
        self.paint(false, true, false)
    }

    /// Draw an outline of `width` with a fixed color, outside the pen state.
    ///
    /// `sharpen` is the whole-pixel width to sharpen for, if any.
    fn stroke_frame(
        &mut self,
        rect: Rect,
        width: f64,
        color: peniko::Color,
        sharpen: Option<u32>,
    ) {
        self.backend.save();
        self.backend.state(StateOp::SetLineWidth(width));
        self.backend.state(StateOp::SetDash {
            pattern: Dashes::new(),
            offset: 0.0,
        });
        if let Some(whole) = sharpen {
            self.sharp_offset(true, whole);
        }
        self.backend.path(PathOp::Rectangle(rect));
        self.backend.set_source_color(color);
        self.backend.draw(DrawOp::Stroke { preserve: false });
        self.sharp_offset(false, 0);
        self.backend.restore();
        self.resolved.invalidate();
    }
}

impl<B: VectorBackend> DeviceContext for VectorDc<'_, B> {
    fn read_pixel(&mut self, x: i32, y: i32) -> Result<Color, DcError> {
        self.session()?;
        let device = self.backend.user_to_device(user(x, y));
        #[expect(
            clippy::cast_possible_truncation,
            reason = "device coordinates are floored to whole pixels"
        )]
        let (dx, dy) = (device.x.floor() as i32, device.y.floor() as i32);
        self.backend
            .read_pixel(dx, dy)
            .map(Color::from)
            .ok_or(DcError::ReadbackUnsupported)
    }

    fn draw_point(&mut self, x: i32, y: i32) -> Result<(), DcError> {
        self.session()?;
        let unit = self.backend.device_to_user_distance(Vec2::new(1.0, 1.0));
        let center = user(x, y);
        let rect = Rect::from_center_size(center, (unit.x, unit.y));
        self.backend.path(PathOp::Rectangle(rect));
        self.fill()
    }

    fn draw_line(&mut self, x1: i32, y1: i32, x2: i32, y2: i32) -> Result<(), DcError> {
        self.session()?;
        self.sharp_offset(true, self.state.line_width);
        self.backend.path(PathOp::MoveTo(user(x1, y1)));
        self.backend.path(PathOp::LineTo(user(x2, y2)));
        self.sharp_offset(false, 0);
        self.stroke()
    }

    fn draw_lines(&mut self, points: &[Point]) -> Result<(), DcError> {
        self.session()?;
        if points.len() < 2 {
            return Ok(());
        }
        self.path_lines(points, true);
        self.stroke()
    }

    fn draw_lines_rel(&mut self, points: &[Point]) -> Result<(), DcError> {
        self.session()?;
        if points.len() < 2 {
            return Ok(());
        }
        self.path_lines_rel(points, true);
        self.stroke()
    }

    fn draw_line_segments(&mut self, segments: &[Segment]) -> Result<(), DcError> {
        self.session()?;
        if segments.is_empty() {
            return Ok(());
        }
        self.sharp_offset(true, self.state.line_width);
        for s in segments {
            self.backend.path(PathOp::MoveTo(user(s.x1.into(), s.y1.into())));
            self.backend.path(PathOp::LineTo(user(s.x2.into(), s.y2.into())));
        }
        self.sharp_offset(false, 0);
        self.stroke()
    }

    fn draw_rectangle(&mut self, x: i32, y: i32, w: i32, h: i32) -> Result<(), DcError> {
        self.session()?;
        self.sharp_offset(true, self.state.line_width);
        self.backend.path(PathOp::Rectangle(user_rect(x, y, w, h)));
        self.sharp_offset(false, 0);
        self.stroke()
    }

    fn draw_rectangles(&mut self, rectangles: &[Rectangle]) -> Result<(), DcError> {
        self.session()?;
        if rectangles.is_empty() {
            return Ok(());
        }
        self.sharp_offset(true, self.state.line_width);
        for r in rectangles {
            self.backend.path(PathOp::Rectangle(user_rect(
                r.x.into(),
                r.y.into(),
                r.w.into(),
                r.h.into(),
            )));
        }
        self.sharp_offset(false, 0);
        self.stroke()
    }

    fn draw_round_rectangle(
        &mut self,
        x: i32,
        y: i32,
        w: i32,
        h: i32,
        ew: i32,
        eh: i32,
    ) -> Result<(), DcError> {
        self.session()?;
        self.path_round_rectangle(x, y, w, h, ew, eh);
        self.stroke()
    }

    fn draw_arc(
        &mut self,
        x: i32,
        y: i32,
        w: i32,
        h: i32,
        ang1: i32,
        ang2: i32,
    ) -> Result<(), DcError> {
        self.session()?;
        self.path_arc(x, y, w, h, ang1, ang2, false, true);
        self.stroke()
    }

    fn fill_rectangle(&mut self, x: i32, y: i32, w: i32, h: i32) -> Result<(), DcError> {
        self.session()?;
        self.backend.path(PathOp::Rectangle(user_rect(x, y, w, h)));
        self.fill()
    }

    fn fill_round_rectangle(
        &mut self,
        x: i32,
        y: i32,
        w: i32,
        h: i32,
        ew: i32,
        eh: i32,
    ) -> Result<(), DcError> {
        self.session()?;
        self.path_round_rectangle(x, y, w, h, ew, eh);
        self.fill()
    }

    fn fill_chord(
        &mut self,
        x: i32,
        y: i32,
        w: i32,
        h: i32,
        ang1: i32,
        ang2: i32,
    ) -> Result<(), DcError> {
        self.session()?;
        self.path_arc(x, y, w, h, ang1, ang2, false, false);
        self.fill()
    }

    fn fill_arc(
        &mut self,
        x: i32,
        y: i32,
        w: i32,
        h: i32,
        ang1: i32,
        ang2: i32,
    ) -> Result<(), DcError> {
        self.session()?;
        self.path_arc(x, y, w, h, ang1, ang2, true, false);
        self.fill()
    }

    fn fill_ellipse(&mut self, x: i32, y: i32, w: i32, h: i32) -> Result<(), DcError> {
        self.fill_chord(x, y, w, h, 0, FULL_CIRCLE)
    }

    fn fill_complex_polygon(&mut self, points: &[Point]) -> Result<(), DcError> {
        self.session()?;
        if points.len() < 2 {
            return Ok(());
        }
        if !self.path_lines(points, false) {
            self.backend.path(PathOp::ClosePath);
        }
        self.fill()
    }

    fn fill_complex_polygon_rel(&mut self, points: &[Point]) -> Result<(), DcError> {
        self.session()?;
        if points.len() < 2 {
            return Ok(());
        }
        if !self.path_lines_rel(points, false) {
            self.backend.path(PathOp::ClosePath);
        }
        self.fill()
    }

    fn draw_hash_box(&mut self, x: i32, y: i32, w: i32, h: i32, b: i32) -> Result<(), DcError> {
        self.session()?;
        let sharpen = u32::try_from(b).ok();
        let b = f64::from(b);
        let rect = Rect::from_origin_size(
            (f64::from(x) + b / 2.0, f64::from(y) + b / 2.0),
            (f64::from(w) - b, f64::from(h) - b),
        );
        self.stroke_frame(rect, b, self.config.hash_color, sharpen);
        Ok(())
    }

    fn draw_focus_rectangle(&mut self, x: i32, y: i32, w: i32, h: i32) -> Result<(), DcError> {
        self.session()?;
        let width = self.config.focus_width;
        let rect = Rect::from_origin_size(
            (f64::from(x) + width / 2.0, f64::from(y) + width / 2.0),
            (f64::from(w) - width, f64::from(h) - width),
        );
        self.stroke_frame(rect, width, self.config.focus_color, None);
        Ok(())
    }

    fn draw_area(
        &mut self,
        source: &dyn Drawable,
        sx: i32,
        sy: i32,
        sw: i32,
        sh: i32,
        dx: i32,
        dy: i32,
    ) -> Result<(), DcError> {
        self.session()?;
        self.copy_area(source, user_rect(sx, sy, sw, sh), user(dx, dy))
    }

    fn draw_area_stretched(
        &mut self,
        source: &dyn Drawable,
        sx: i32,
        sy: i32,
        sw: i32,
        sh: i32,
        dx: i32,
        dy: i32,
        dw: i32,
        dh: i32,
    ) -> Result<(), DcError> {
        self.session()?;
        self.copy_area_stretched(source, user_rect(sx, sy, sw, sh), user_rect(dx, dy, dw, dh))
    }

    fn draw_bitmap(
        &mut self,
        bitmap: &mut dyn ClientBitmap,
        dx: i32,
        dy: i32,
    ) -> Result<(), DcError> {
        self.session()?;
        self.paint_bitmap(bitmap, user(dx, dy))
    }

    fn draw_icon_mode(
        &mut self,
        icon: &mut dyn ClientImage,
        dx: i32,
        dy: i32,
        mode: IconMode,
    ) -> Result<(), DcError> {
        self.session()?;
        self.paint_icon(icon, user(dx, dy), mode)
    }

    fn draw_text(&mut self, x: i32, y: i32, text: &str) -> Result<(), DcError> {
        self.paint_text(x, y, text, false)
    }

    fn draw_image_text(&mut self, x: i32, y: i32, text: &str) -> Result<(), DcError> {
        self.paint_text(x, y, text, true)
    }

    fn set_foreground(&mut self, color: Color) -> Result<(), DcError> {
        self.state.foreground = color;
        Ok(())
    }

    fn set_background(&mut self, color: Color) -> Result<(), DcError> {
        self.state.background = color;
        Ok(())
    }

    fn set_dashes(&mut self, offset: u32, pattern: &[u8]) -> Result<(), DcError> {
        match DashPattern::new(offset, pattern) {
            Some(dashes) => self.state.dashes = dashes,
            None => warn!("ignoring dash pattern {pattern:?} with no length"),
        }
        Ok(())
    }

    fn set_line_width(&mut self, width: u32) -> Result<(), DcError> {
        self.state.line_width = width;
        Ok(())
    }

    fn set_line_cap(&mut self, cap: CapStyle) -> Result<(), DcError> {
        self.session()?;
        self.backend.state(StateOp::SetLineCap(mapping::cap(cap)));
        self.state.cap = cap;
        Ok(())
    }

    fn set_line_join(&mut self, join: JoinStyle) -> Result<(), DcError> {
        self.session()?;
        self.backend.state(StateOp::SetLineJoin(mapping::join(join)));
        self.state.join = join;
        Ok(())
    }

    fn set_line_style(&mut self, style: LineStyle) -> Result<(), DcError> {
        self.state.line_style = style;
        Ok(())
    }

    fn set_fill_style(&mut self, style: FillStyle) -> Result<(), DcError> {
        if style != self.state.fill_style {
            self.resolved.source = None;
        }
        self.state.fill_style = style;
        Ok(())
    }

    fn set_fill_rule(&mut self, rule: FillRule) -> Result<(), DcError> {
        self.session()?;
        self.backend.state(StateOp::SetFillRule(mapping::fill_rule(rule)));
        self.state.fill_rule = rule;
        Ok(())
    }

    fn set_function(&mut self, function: Function) -> Result<(), DcError> {
        if function != Function::Copy {
            trace!("raster function {function:?} is recorded but not rendered");
        }
        self.state.function = function;
        Ok(())
    }

    fn set_tile(&mut self, tile: &dyn Drawable, dx: i32, dy: i32) -> Result<(), DcError> {
        self.state.tile = Some(TileRef {
            drawable: tile.id().ok_or(DcError::InvalidDrawable)?,
            width: tile.width(),
            height: tile.height(),
        });
        self.state.pattern_origin = (dx, dy);
        Ok(())
    }

    fn clear_tile(&mut self) -> Result<(), DcError> {
        self.state.tile = None;
        Ok(())
    }

    fn set_stipple_bitmap(
        &mut self,
        bitmap: &mut dyn ClientBitmap,
        dx: i32,
        dy: i32,
    ) -> Result<(), DcError> {
        let key = bitmap.id().ok_or(DcError::InvalidDrawable)?;
        if !ensure_bits(bitmap) {
            return Err(DcError::UnsupportedSource);
        }
        let bits = bitmap.bits().ok_or(DcError::UnsupportedSource)?.to_vec();
        self.state.stipple = Some(Stipple::Bitmap {
            key,
            width: bitmap.width(),
            height: bitmap.height(),
            bits,
        });
        self.state.pattern_origin = (dx, dy);
        Ok(())
    }

    fn set_stipple_pattern(
        &mut self,
        pattern: StipplePattern,
        dx: i32,
        dy: i32,
    ) -> Result<(), DcError> {
        self.state.stipple = Some(Stipple::Pattern(pattern.clamped()));
        self.state.pattern_origin = (dx, dy);
        Ok(())
    }

    fn set_clip_region(&mut self, region: &[Rectangle]) -> Result<(), DcError> {
        self.session()?;
        warn!(
            "clip regions are not supported, ignoring {} rectangles",
            region.len()
        );
        Ok(())
    }

    fn set_clip_rectangle(&mut self, x: i32, y: i32, w: i32, h: i32) -> Result<(), DcError> {
        self.session()?;
        self.backend.path(PathOp::Rectangle(user_rect(x, y, w, h)));
        self.backend.state(StateOp::Clip);
        Ok(())
    }

    fn clear_clip_rectangle(&mut self) -> Result<(), DcError> {
        self.session()?;
        self.backend.state(StateOp::ResetClip);
        Ok(())
    }

    fn set_clip_mask(
        &mut self,
        bitmap: &mut dyn ClientBitmap,
        dx: i32,
        dy: i32,
    ) -> Result<(), DcError> {
        self.session()?;
        let key = bitmap.id().ok_or(DcError::InvalidDrawable)?;
        let session = self
            .session
            .as_mut()
            .ok_or(DcError::SessionNotBound)?;
        session.set_clip_mask(&mut *self.backend, key, user(dx, dy), || {
            if !ensure_bits(bitmap) {
                return None;
            }
            let view = PixelView::bitmap(bitmap.width(), bitmap.height(), bitmap.bits()?);
            Some(bitmap_to_a1(view))
        })
    }

    fn clear_clip_mask(&mut self) -> Result<(), DcError> {
        let session = self
            .session
            .as_mut()
            .ok_or(DcError::SessionNotBound)?;
        session.clear_clip_mask(&mut *self.backend);
        Ok(())
    }

    fn set_font(&mut self, font: &FontDescriptor) -> Result<(), DcError> {
        let session = self.session_mut()?;
        let unchanged = session.font.as_ref().is_some_and(|(f, _)| f == font);
        if !unchanged {
            session.font = Some((font.clone(), mapping::font_description(font)));
        }
        Ok(())
    }

    fn clip_children(&mut self, _yes: bool) -> Result<(), DcError> {
        Ok(())
    }

    fn set_line_sharpen(&mut self, on: bool) -> Result<(), DcError> {
        self.state.sharpen = on;
        Ok(())
    }
}
