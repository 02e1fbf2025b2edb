// Copyright 2026 the Vectordc Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Vectordc Text: a small outline text engine.
//!
//! [`OutlineTextEngine`] implements [`TextEngine`] over fonts registered with
//! explicit attributes. It does **not** shape: glyphs come from the font's
//! character map and are advanced by their horizontal metrics, one line per
//! `'\n'`-separated segment. That is enough for labels, menu entries and
//! similar single-script text.
//!
//! Layouts resolve a [`FontDescription`] against the registered faces by
//! family name (case-insensitively), then by the closest style and weight.
//! When no face carries the requested family, the closest face overall is
//! used. Sizes are converted from points to pixels at the engine's resolution.
//!
//! Glyph outlines are emitted as [`PathOp`]s in the backend's current user
//! space and filled with the non-zero rule.

use std::sync::Arc;

use peniko::{Blob, FontData};
use skrifa::instance::{LocationRef, Size};
use skrifa::metrics::GlyphMetrics;
use skrifa::outline::OutlinePen;
use skrifa::{FontRef, GlyphId, MetadataProvider};
use vectordc_backend::{
    BackendError, DrawOp, FillRule, FontDescription, FontStyle, PathOp, Point, Rect, StateOp,
    TextEngine, TextLayout, Vec2, VectorBackend,
};

/// Resolution used when none is given: 96 pixels per inch.
pub const DEFAULT_DPI: f64 = 96.0;

/// A registered font face.
#[derive(Clone, Debug)]
struct Face {
    family: String,
    weight: u16,
    style: FontStyle,
    font: FontData,
}

/// Text engine over a set of registered outline fonts.
#[derive(Clone, Debug)]
pub struct OutlineTextEngine {
    faces: Arc<Vec<Face>>,
    dpi: f64,
}

impl Default for OutlineTextEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl OutlineTextEngine {
    /// Create an engine with no faces at [`DEFAULT_DPI`].
    pub fn new() -> Self {
        Self::with_dpi(DEFAULT_DPI)
    }

    /// Create an engine with no faces at the given resolution.
    pub fn with_dpi(dpi: f64) -> Self {
        Self {
            faces: Arc::new(Vec::new()),
            dpi,
        }
    }

    /// Resolution used to convert points to pixels.
    pub fn dpi(&self) -> f64 {
        self.dpi
    }

    /// Number of registered faces.
    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    /// Register face `index` of a font file under the given attributes.
    ///
    /// Layouts created before this call keep the faces they were created with.
    pub fn add_face(
        &mut self,
        family: &str,
        weight: u16,
        style: FontStyle,
        data: impl Into<Blob<u8>>,
        index: u32,
    ) -> Result<(), BackendError> {
        let font = FontData::new(data.into(), index);
        if FontRef::from_index(font.data.as_ref(), index).is_err() {
            return Err(BackendError::InvalidFont);
        }
        log::debug!("registered face {family:?} weight {weight} {style:?}");
        Arc::make_mut(&mut self.faces).push(Face {
            family: family.to_owned(),
            weight,
            style,
            font,
        });
        Ok(())
    }
}

impl TextEngine for OutlineTextEngine {
    fn create_layout(&self) -> Box<dyn TextLayout> {
        Box::new(OutlineLayout {
            faces: Arc::clone(&self.faces),
            dpi: self.dpi,
            text: String::new(),
            font: None,
            lines: Vec::new(),
        })
    }
}

fn style_distance(want: FontStyle, have: FontStyle) -> u32 {
    match (want, have) {
        (a, b) if a == b => 0,
        (FontStyle::Italic, FontStyle::Oblique) | (FontStyle::Oblique, FontStyle::Italic) => 500,
        _ => 1000,
    }
}

/// Index of the face closest to `desc`, preferring faces of the requested family.
fn best_match(faces: &[Face], desc: &FontDescription) -> Option<usize> {
    let score = |face: &Face| {
        style_distance(desc.style, face.style) + u32::from(face.weight.abs_diff(desc.weight))
    };
    let closest = |family_only: bool| {
        faces
            .iter()
            .enumerate()
            .filter(|(_, f)| !family_only || f.family.eq_ignore_ascii_case(&desc.family))
            .min_by_key(|(_, f)| score(f))
            .map(|(i, _)| i)
    };
    closest(true).or_else(|| {
        let fallback = closest(false);
        if fallback.is_some() {
            log::debug!("no face for family {:?}; using closest face", desc.family);
        }
        fallback
    })
}

#[derive(Copy, Clone, Debug)]
struct ResolvedFont {
    face: usize,
    px: f32,
    ascent: f64,
    line_height: f64,
}

#[derive(Clone, Debug, Default)]
struct Line {
    glyphs: Vec<(GlyphId, f64)>,
    width: f64,
}

#[derive(Debug)]
struct OutlineLayout {
    faces: Arc<Vec<Face>>,
    dpi: f64,
    text: String,
    font: Option<ResolvedFont>,
    lines: Vec<Line>,
}

impl OutlineLayout {
    fn font_ref(&self, face: usize) -> Option<FontRef<'_>> {
        let face = self.faces.get(face)?;
        FontRef::from_index(face.font.data.as_ref(), face.font.index).ok()
    }

    fn relayout(&mut self) {
        self.lines.clear();
        let Some(resolved) = self.font else {
            return;
        };
        let Some(font) = self.font_ref(resolved.face) else {
            return;
        };
        let charmap = font.charmap();
        let metrics = GlyphMetrics::new(&font, Size::new(resolved.px), LocationRef::default());
        let mut lines = Vec::new();
        for segment in self.text.split('\n') {
            let mut line = Line::default();
            for ch in segment.chars() {
                let gid = charmap.map(ch).unwrap_or(GlyphId::NOTDEF);
                line.glyphs.push((gid, line.width));
                line.width += f64::from(metrics.advance_width(gid).unwrap_or(0.0));
            }
            lines.push(line);
        }
        self.lines = lines;
    }
}

impl TextLayout for OutlineLayout {
    fn set_text(&mut self, text: &str) {
        if self.text != text {
            text.clone_into(&mut self.text);
            self.relayout();
        }
    }

    fn set_font_description(&mut self, desc: &FontDescription) -> Result<(), BackendError> {
        let face = best_match(&self.faces, desc)
            .ok_or_else(|| BackendError::NoMatchingFace(desc.family.clone()))?;
        let font = self.font_ref(face).ok_or(BackendError::InvalidFont)?;
        #[expect(
            clippy::cast_possible_truncation,
            reason = "font sizes are far inside the f32 range"
        )]
        let px = (desc.size_points() * self.dpi / 72.0) as f32;
        let metrics = font.metrics(Size::new(px), LocationRef::default());
        let ascent = f64::from(metrics.ascent);
        let line_height = ascent - f64::from(metrics.descent) + f64::from(metrics.leading);
        self.font = Some(ResolvedFont {
            face,
            px,
            ascent,
            line_height,
        });
        self.relayout();
        Ok(())
    }

    fn baseline(&self) -> f64 {
        self.font.map_or(0.0, |f| f.ascent)
    }

    fn logical_extents(&self) -> Rect {
        let Some(font) = self.font else {
            return Rect::ZERO;
        };
        let width = self.lines.iter().map(|l| l.width).fold(0.0, f64::max);
        let count = u32::try_from(self.lines.len()).unwrap_or(u32::MAX);
        Rect::new(0.0, 0.0, width, f64::from(count) * font.line_height)
    }

    fn show(&self, backend: &mut dyn VectorBackend, origin: Point) -> Result<(), BackendError> {
        let Some(resolved) = self.font else {
            return Ok(());
        };
        let font = self.font_ref(resolved.face).ok_or(BackendError::InvalidFont)?;
        let outlines = font.outline_glyphs();
        let size = Size::new(resolved.px);
        backend.state(StateOp::Save);
        backend.state(StateOp::SetFillRule(FillRule::NonZero));
        backend.path(PathOp::NewPath);
        let mut baseline = origin.y + resolved.ascent;
        for line in &self.lines {
            for &(gid, x) in &line.glyphs {
                let Some(outline) = outlines.get(gid) else {
                    continue;
                };
                let mut pen = GlyphPen::new(&mut *backend, Vec2::new(origin.x + x, baseline));
                if let Err(err) = outline.draw((size, LocationRef::default()), &mut pen) {
                    log::warn!("glyph {gid:?} could not be drawn: {err}");
                }
            }
            baseline += resolved.line_height;
        }
        backend.draw(DrawOp::Fill { preserve: false });
        backend.state(StateOp::Restore);
        Ok(())
    }
}

/// Emits a glyph outline as path ops, flipping font y-up into user y-down.
struct GlyphPen<'a> {
    backend: &'a mut dyn VectorBackend,
    origin: Vec2,
    current: Point,
}

impl<'a> GlyphPen<'a> {
    fn new(backend: &'a mut dyn VectorBackend, origin: Vec2) -> Self {
        Self {
            backend,
            origin,
            current: origin.to_point(),
        }
    }

    fn map(&self, x: f32, y: f32) -> Point {
        Point::new(self.origin.x + f64::from(x), self.origin.y - f64::from(y))
    }
}

impl OutlinePen for GlyphPen<'_> {
    fn move_to(&mut self, x: f32, y: f32) {
        self.current = self.map(x, y);
        self.backend.path(PathOp::MoveTo(self.current));
    }

    fn line_to(&mut self, x: f32, y: f32) {
        self.current = self.map(x, y);
        self.backend.path(PathOp::LineTo(self.current));
    }

    fn quad_to(&mut self, cx0: f32, cy0: f32, x: f32, y: f32) {
        let q = self.map(cx0, cy0);
        let end = self.map(x, y);
        let c1 = self.current + (q - self.current) * (2.0 / 3.0);
        let c2 = end + (q - end) * (2.0 / 3.0);
        self.backend.path(PathOp::CurveTo(c1, c2, end));
        self.current = end;
    }

    fn curve_to(&mut self, cx0: f32, cy0: f32, cx1: f32, cy1: f32, x: f32, y: f32) {
        let end = self.map(x, y);
        self.backend.path(PathOp::CurveTo(self.map(cx0, cy0), self.map(cx1, cy1), end));
        self.current = end;
    }

    fn close(&mut self) {
        self.backend.path(PathOp::ClosePath);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vectordc_backend_ref::{Event, RefBackend};

    fn face(family: &str, weight: u16, style: FontStyle) -> Face {
        Face {
            family: family.to_owned(),
            weight,
            style,
            font: FontData::new(Blob::from(Vec::new()), 0),
        }
    }

    fn desc(family: &str, weight: u16, style: FontStyle) -> FontDescription {
        FontDescription {
            family: family.to_owned(),
            weight,
            style,
            ..FontDescription::default()
        }
    }

    #[test]
    fn family_match_beats_closer_weight() {
        let faces = [
            face("Serif", 400, FontStyle::Normal),
            face("Sans", 700, FontStyle::Normal),
        ];
        assert_eq!(
            best_match(&faces, &desc("sans", 400, FontStyle::Normal)),
            Some(1)
        );
    }

    #[test]
    fn closest_weight_and_style_within_family() {
        let faces = [
            face("Sans", 400, FontStyle::Normal),
            face("Sans", 700, FontStyle::Normal),
            face("Sans", 400, FontStyle::Italic),
        ];
        assert_eq!(
            best_match(&faces, &desc("Sans", 600, FontStyle::Normal)),
            Some(1)
        );
        assert_eq!(
            best_match(&faces, &desc("Sans", 400, FontStyle::Oblique)),
            Some(2)
        );
    }

    #[test]
    fn unknown_family_falls_back_to_closest_face() {
        let faces = [
            face("Serif", 400, FontStyle::Italic),
            face("Sans", 400, FontStyle::Normal),
        ];
        assert_eq!(
            best_match(&faces, &desc("Fantasy", 400, FontStyle::Normal)),
            Some(1)
        );
        assert_eq!(best_match(&[], &desc("Sans", 400, FontStyle::Normal)), None);
    }

    #[test]
    fn invalid_font_data_is_rejected() {
        let mut engine = OutlineTextEngine::new();
        assert_eq!(
            engine.add_face("Sans", 400, FontStyle::Normal, b"not a font".to_vec(), 0),
            Err(BackendError::InvalidFont)
        );
        assert_eq!(engine.face_count(), 0);
    }

    #[test]
    fn empty_engine_has_no_matching_face() {
        let engine = OutlineTextEngine::new();
        let mut layout = engine.create_layout();
        assert_eq!(
            layout.set_font_description(&desc("Sans", 400, FontStyle::Normal)),
            Err(BackendError::NoMatchingFace("Sans".to_owned()))
        );
        layout.set_text("hello");
        assert_eq!(layout.logical_extents(), Rect::ZERO);
        assert_eq!(layout.baseline(), 0.0);
    }

    #[test]
    fn layout_without_font_draws_nothing() {
        let engine = OutlineTextEngine::new();
        let mut layout = engine.create_layout();
        layout.set_text("hello");
        let mut backend = RefBackend::new();
        layout
            .show(&mut backend, Point::ZERO)
            .expect("showing without a font is a no-op");
        assert!(backend.events().is_empty());
    }

    #[test]
    fn pen_flips_y_and_converts_quadratics() {
        let mut backend = RefBackend::new();
        {
            let mut pen = GlyphPen::new(&mut backend, Vec2::new(10.0, 20.0));
            pen.move_to(0.0, 0.0);
            pen.quad_to(3.0, 3.0, 6.0, 0.0);
            pen.line_to(6.0, 5.0);
            pen.close();
        }
        let ops: Vec<PathOp> = backend
            .events()
            .iter()
            .filter_map(|e| match e {
                Event::Path(op) => Some(*op),
                _ => None,
            })
            .collect();
        assert_eq!(ops[0], PathOp::MoveTo(Point::new(10.0, 20.0)));
        assert_eq!(
            ops[1],
            PathOp::CurveTo(
                Point::new(12.0, 18.0),
                Point::new(14.0, 18.0),
                Point::new(16.0, 20.0)
            )
        );
        assert_eq!(ops[2], PathOp::LineTo(Point::new(16.0, 15.0)));
        assert_eq!(ops[3], PathOp::ClosePath);
    }
}
