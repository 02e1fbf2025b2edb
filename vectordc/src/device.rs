// Copyright 2026 the Vectordc Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use crate::{
    Arc, CapStyle, ClientBitmap, ClientImage, Color, DcError, Drawable, FillRule, FillStyle,
    FontDescriptor, Function, IconMode, JoinStyle, LineStyle, Point, Rectangle, Segment,
    StipplePattern,
};

/// A full circle in 1/64 degree.
pub const FULL_CIRCLE: i32 = 360 * 64;

/// The integer-pixel drawing interface.
///
/// Coordinates are pixels, angles are 1/64 degree. Every drawing operation
/// fails with [`DcError::SessionNotBound`] outside a painting session.
/// Pen and brush setters only record state and work at any time, except
/// those that talk to the backend directly.
///
/// Batch operations have default implementations in terms of the single
/// ones.
pub trait DeviceContext {
    /// Read back the color of one pixel.
    fn read_pixel(&mut self, x: i32, y: i32) -> Result<Color, DcError>;

    /// Draw a single pixel.
    fn draw_point(&mut self, x: i32, y: i32) -> Result<(), DcError>;

    /// Draw several pixels.
    fn draw_points(&mut self, points: &[Point]) -> Result<(), DcError> {
        for p in points {
            self.draw_point(p.x.into(), p.y.into())?;
        }
        Ok(())
    }

    /// Draw pixels given as offsets from the previous point.
    ///
    /// Coordinates accumulate with 16-bit wrap-around.
    fn draw_points_rel(&mut self, points: &[Point]) -> Result<(), DcError> {
        let (mut x, mut y) = (0_i16, 0_i16);
        for p in points {
            x = x.wrapping_add(p.x);
            y = y.wrapping_add(p.y);
            self.draw_point(x.into(), y.into())?;
        }
        Ok(())
    }

    /// Stroke a line.
    fn draw_line(&mut self, x1: i32, y1: i32, x2: i32, y2: i32) -> Result<(), DcError>;

    /// Stroke a connected polyline. It is closed if its ends coincide.
    fn draw_lines(&mut self, points: &[Point]) -> Result<(), DcError>;

    /// Stroke a polyline given as offsets from the previous point.
    fn draw_lines_rel(&mut self, points: &[Point]) -> Result<(), DcError>;

    /// Stroke disjoint segments as one path.
    fn draw_line_segments(&mut self, segments: &[Segment]) -> Result<(), DcError>;

    /// Stroke a rectangle outline.
    fn draw_rectangle(&mut self, x: i32, y: i32, w: i32, h: i32) -> Result<(), DcError>;

    /// Stroke several rectangle outlines as one path.
    fn draw_rectangles(&mut self, rectangles: &[Rectangle]) -> Result<(), DcError>;

    /// Stroke a rounded rectangle whose corners span `ew` by `eh`.
    fn draw_round_rectangle(
        &mut self,
        x: i32,
        y: i32,
        w: i32,
        h: i32,
        ew: i32,
        eh: i32,
    ) -> Result<(), DcError>;

    /// Stroke an elliptical arc inscribed in a box.
    fn draw_arc(
        &mut self,
        x: i32,
        y: i32,
        w: i32,
        h: i32,
        ang1: i32,
        ang2: i32,
    ) -> Result<(), DcError>;

    /// Stroke several arcs.
    fn draw_arcs(&mut self, arcs: &[Arc]) -> Result<(), DcError> {
        for a in arcs {
            self.draw_arc(
                a.x.into(),
                a.y.into(),
                a.w.into(),
                a.h.into(),
                a.a.into(),
                a.b.into(),
            )?;
        }
        Ok(())
    }

    /// Stroke an ellipse inscribed in a box.
    fn draw_ellipse(&mut self, x: i32, y: i32, w: i32, h: i32) -> Result<(), DcError> {
        self.draw_arc(x, y, w, h, 0, FULL_CIRCLE)
    }

    /// Fill a rectangle.
    fn fill_rectangle(&mut self, x: i32, y: i32, w: i32, h: i32) -> Result<(), DcError>;

    /// Fill several rectangles, one at a time.
    fn fill_rectangles(&mut self, rectangles: &[Rectangle]) -> Result<(), DcError> {
        for r in rectangles {
            self.fill_rectangle(r.x.into(), r.y.into(), r.w.into(), r.h.into())?;
        }
        Ok(())
    }

    /// Fill a rounded rectangle.
    fn fill_round_rectangle(
        &mut self,
        x: i32,
        y: i32,
        w: i32,
        h: i32,
        ew: i32,
        eh: i32,
    ) -> Result<(), DcError>;

    /// Fill the region between an arc and its chord.
    fn fill_chord(
        &mut self,
        x: i32,
        y: i32,
        w: i32,
        h: i32,
        ang1: i32,
        ang2: i32,
    ) -> Result<(), DcError>;

    /// Fill several chords.
    fn fill_chords(&mut self, chords: &[Arc]) -> Result<(), DcError> {
        for a in chords {
            self.fill_chord(
                a.x.into(),
                a.y.into(),
                a.w.into(),
                a.h.into(),
                a.a.into(),
                a.b.into(),
            )?;
        }
        Ok(())
    }

    /// Fill a pie slice.
    fn fill_arc(
        &mut self,
        x: i32,
        y: i32,
        w: i32,
        h: i32,
        ang1: i32,
        ang2: i32,
    ) -> Result<(), DcError>;

    /// Fill several pie slices.
    fn fill_arcs(&mut self, arcs: &[Arc]) -> Result<(), DcError> {
        for a in arcs {
            self.fill_arc(
                a.x.into(),
                a.y.into(),
                a.w.into(),
                a.h.into(),
                a.a.into(),
                a.b.into(),
            )?;
        }
        Ok(())
    }

    /// Fill an ellipse inscribed in a box.
    fn fill_ellipse(&mut self, x: i32, y: i32, w: i32, h: i32) -> Result<(), DcError>;

    /// Fill a convex polygon.
    fn fill_polygon(&mut self, points: &[Point]) -> Result<(), DcError> {
        self.fill_complex_polygon(points)
    }

    /// Fill a concave polygon.
    fn fill_concave_polygon(&mut self, points: &[Point]) -> Result<(), DcError> {
        self.fill_complex_polygon(points)
    }

    /// Fill a possibly self-intersecting polygon under the current fill rule.
    fn fill_complex_polygon(&mut self, points: &[Point]) -> Result<(), DcError>;

    /// Fill a convex polygon given by relative offsets.
    fn fill_polygon_rel(&mut self, points: &[Point]) -> Result<(), DcError> {
        self.fill_complex_polygon_rel(points)
    }

    /// Fill a concave polygon given by relative offsets.
    fn fill_concave_polygon_rel(&mut self, points: &[Point]) -> Result<(), DcError> {
        self.fill_complex_polygon_rel(points)
    }

    /// Fill a complex polygon given by relative offsets.
    fn fill_complex_polygon_rel(&mut self, points: &[Point]) -> Result<(), DcError>;

    /// Stroke a translucent black frame of width `b` inside a box.
    fn draw_hash_box(&mut self, x: i32, y: i32, w: i32, h: i32, b: i32) -> Result<(), DcError>;

    /// Stroke the keyboard focus frame inside a box.
    fn draw_focus_rectangle(&mut self, x: i32, y: i32, w: i32, h: i32) -> Result<(), DcError>;

    /// Copy a `sw` by `sh` area at (`sx`, `sy`) of `source` to (`dx`, `dy`).
    fn draw_area(
        &mut self,
        source: &dyn Drawable,
        sx: i32,
        sy: i32,
        sw: i32,
        sh: i32,
        dx: i32,
        dy: i32,
    ) -> Result<(), DcError>;

    /// Copy an area of `source`, scaling it to `dw` by `dh`.
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
    ) -> Result<(), DcError>;

    /// Copy a whole image to (`dx`, `dy`).
    fn draw_image(&mut self, image: &dyn Drawable, dx: i32, dy: i32) -> Result<(), DcError> {
        let w = i32::try_from(image.width()).unwrap_or(i32::MAX);
        let h = i32::try_from(image.height()).unwrap_or(i32::MAX);
        self.draw_area(image, 0, 0, w, h, dx, dy)
    }

    /// Draw a bitmap, set bits in the foreground and clear bits in the
    /// background color.
    fn draw_bitmap(&mut self, bitmap: &mut dyn ClientBitmap, dx: i32, dy: i32)
    -> Result<(), DcError>;

    /// Draw an icon through its transparency mask.
    fn draw_icon(&mut self, icon: &mut dyn ClientImage, dx: i32, dy: i32) -> Result<(), DcError> {
        self.draw_icon_mode(icon, dx, dy, IconMode::Normal)
    }

    /// Draw an icon tinted as selected.
    fn draw_icon_shaded(
        &mut self,
        icon: &mut dyn ClientImage,
        dx: i32,
        dy: i32,
    ) -> Result<(), DcError> {
        self.draw_icon_mode(icon, dx, dy, IconMode::Shaded)
    }

    /// Draw an icon flattened as disabled.
    fn draw_icon_sunken(
        &mut self,
        icon: &mut dyn ClientImage,
        dx: i32,
        dy: i32,
    ) -> Result<(), DcError> {
        self.draw_icon_mode(icon, dx, dy, IconMode::Sunken)
    }

    /// Draw an icon in the given mode.
    fn draw_icon_mode(
        &mut self,
        icon: &mut dyn ClientImage,
        dx: i32,
        dy: i32,
        mode: IconMode,
    ) -> Result<(), DcError>;

    /// Draw text with its baseline starting at (`x`, `y`).
    fn draw_text(&mut self, x: i32, y: i32, text: &str) -> Result<(), DcError>;

    /// Draw text over its logical extents filled with the background color.
    fn draw_image_text(&mut self, x: i32, y: i32, text: &str) -> Result<(), DcError>;

    /// Set the foreground color.
    fn set_foreground(&mut self, color: Color) -> Result<(), DcError>;

    /// Set the background color.
    fn set_background(&mut self, color: Color) -> Result<(), DcError>;

    /// Set the dash lengths and the offset into them.
    ///
    /// A pattern whose lengths add up to zero is ignored.
    fn set_dashes(&mut self, offset: u32, pattern: &[u8]) -> Result<(), DcError>;

    /// Set the line width; zero means one device pixel.
    fn set_line_width(&mut self, width: u32) -> Result<(), DcError>;

    /// Set the line cap style.
    fn set_line_cap(&mut self, cap: CapStyle) -> Result<(), DcError>;

    /// Set the line join style.
    fn set_line_join(&mut self, join: JoinStyle) -> Result<(), DcError>;

    /// Set the line style.
    fn set_line_style(&mut self, style: LineStyle) -> Result<(), DcError>;

    /// Set the fill style.
    fn set_fill_style(&mut self, style: FillStyle) -> Result<(), DcError>;

    /// Set the fill rule.
    fn set_fill_rule(&mut self, rule: FillRule) -> Result<(), DcError>;

    /// Set the raster function. Only [`Function::Copy`] is rendered.
    fn set_function(&mut self, function: Function) -> Result<(), DcError>;

    /// Set the tile image, anchored at (`dx`, `dy`).
    fn set_tile(&mut self, tile: &dyn Drawable, dx: i32, dy: i32) -> Result<(), DcError>;

    /// Forget the tile image.
    fn clear_tile(&mut self) -> Result<(), DcError>;

    /// Use a bitmap as the stipple, anchored at (`dx`, `dy`).
    fn set_stipple_bitmap(
        &mut self,
        bitmap: &mut dyn ClientBitmap,
        dx: i32,
        dy: i32,
    ) -> Result<(), DcError>;

    /// Use a built-in pattern as the stipple, anchored at (`dx`, `dy`).
    fn set_stipple_pattern(
        &mut self,
        pattern: StipplePattern,
        dx: i32,
        dy: i32,
    ) -> Result<(), DcError>;

    /// Clip to a region. Not supported; logs a warning and does nothing.
    fn set_clip_region(&mut self, region: &[Rectangle]) -> Result<(), DcError>;

    /// Intersect the clip with a rectangle.
    fn set_clip_rectangle(&mut self, x: i32, y: i32, w: i32, h: i32) -> Result<(), DcError>;

    /// Remove rectangular clipping.
    fn clear_clip_rectangle(&mut self) -> Result<(), DcError>;

    /// Clip subsequent drawing through a bitmap anchored at (`dx`, `dy`).
    fn set_clip_mask(
        &mut self,
        bitmap: &mut dyn ClientBitmap,
        dx: i32,
        dy: i32,
    ) -> Result<(), DcError>;

    /// Remove the clip mask.
    fn clear_clip_mask(&mut self) -> Result<(), DcError>;

    /// Select the font for text drawing.
    fn set_font(&mut self, font: &FontDescriptor) -> Result<(), DcError>;

    /// Whether drawing into a window covers its children. Has no effect.
    fn clip_children(&mut self, yes: bool) -> Result<(), DcError>;

    /// Enable or disable half-pixel sharpening of thin strokes.
    fn set_line_sharpen(&mut self, on: bool) -> Result<(), DcError>;
}
