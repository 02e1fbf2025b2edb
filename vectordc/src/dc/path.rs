// Copyright 2026 the Vectordc Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Path construction from integer geometry.

use vectordc_backend::{Affine, ArcDirection, PathOp, Point as UserPoint, StateOp, VectorBackend};

use super::{VectorDc, user};
use crate::Point;
use crate::device::FULL_CIRCLE;

/// 1/64 degree angle to radians, measured clockwise on a y-down surface.
fn radians(angle: i32) -> f64 {
    (f64::from(angle) / -64.0).to_radians()
}

impl<B: VectorBackend> VectorDc<'_, B> {
    /// Add a polyline. If the first and last points coincide the sub-path is
    /// closed instead of drawing the final segment, and `true` is returned.
    ///
    /// Fewer than two points add nothing.
    pub(crate) fn path_lines(&mut self, points: &[Point], for_stroke: bool) -> bool {
        let [first, .., last] = points else {
            return false;
        };
        let closed = first == last;
        let end = if closed { points.len() - 1 } else { points.len() };
        self.sharp_offset(for_stroke, self.state.line_width);
        self.backend.path(PathOp::MoveTo(user(first.x.into(), first.y.into())));
        for p in &points[1..end] {
            self.backend.path(PathOp::LineTo(user(p.x.into(), p.y.into())));
        }
        if closed {
            self.backend.path(PathOp::ClosePath);
        }
        self.sharp_offset(false, 0);
        closed
    }

    /// Add a polyline given as offsets from the previous point.
    ///
    /// Coordinates accumulate with 16-bit wrap-around. Returns `true` if the
    /// accumulated end returns to the start, in which case the sub-path is
    /// closed.
    pub(crate) fn path_lines_rel(&mut self, points: &[Point], for_stroke: bool) -> bool {
        let [first, middle @ .., last] = points else {
            return false;
        };
        let (mut x, mut y) = (first.x, first.y);
        self.sharp_offset(for_stroke, self.state.line_width);
        self.backend.path(PathOp::MoveTo(user(x.into(), y.into())));
        for p in middle {
            x = x.wrapping_add(p.x);
            y = y.wrapping_add(p.y);
            self.backend.path(PathOp::LineTo(user(x.into(), y.into())));
        }
        x = x.wrapping_add(last.x);
        y = y.wrapping_add(last.y);
        let closed = (x, y) == (first.x, first.y);
        if closed {
            self.backend.path(PathOp::ClosePath);
        } else {
            self.backend.path(PathOp::LineTo(user(x.into(), y.into())));
        }
        self.sharp_offset(false, 0);
        closed
    }

    /// Add a rounded rectangle as a closed sub-path of four lines and four
    /// cubic corners.
    ///
    /// Corners wider or taller than half the box are reduced to half of it.
    pub(crate) fn path_round_rectangle(
        &mut self,
        x: i32,
        y: i32,
        w: i32,
        h: i32,
        mut ew: i32,
        mut eh: i32,
    ) {
        if ew.saturating_add(ew) > w {
            ew = w >> 1;
        }
        if eh.saturating_add(eh) > h {
            eh = h >> 1;
        }
        let f = self.config.round_rect_pointiness;
        let (x, y, w, h) = (f64::from(x), f64::from(y), f64::from(w), f64::from(h));
        let (ew, eh) = (f64::from(ew), f64::from(eh));

        let x0 = x;
        let x1 = x + ew * (1.0 - f);
        let x2 = x + ew;
        let x3 = x + w - ew;
        let x4 = x3 + ew * f;
        let x5 = x + w;
        let y0 = y;
        let y1 = y + eh * (1.0 - f);
        let y2 = y + eh;
        let y3 = y + h - eh;
        let y4 = y3 + eh * f;
        let y5 = y + h;

        let p = UserPoint::new;
        let ops = [
            PathOp::MoveTo(p(x3, y0)),
            PathOp::CurveTo(p(x4, y0), p(x5, y1), p(x5, y2)),
            PathOp::LineTo(p(x5, y3)),
            PathOp::CurveTo(p(x5, y4), p(x4, y5), p(x3, y5)),
            PathOp::LineTo(p(x2, y5)),
            PathOp::CurveTo(p(x1, y5), p(x0, y4), p(x0, y3)),
            PathOp::LineTo(p(x0, y2)),
            PathOp::CurveTo(p(x0, y1), p(x1, y0), p(x2, y0)),
            PathOp::ClosePath,
        ];
        for op in ops {
            self.backend.path(op);
        }
    }

    /// Add an elliptical arc inscribed in a box.
    ///
    /// The sweep is clamped to one full turn in either direction; a full turn
    /// closes the sub-path. With `pie` a partial arc is joined to the
    /// center.
    pub(crate) fn path_arc(
        &mut self,
        x: i32,
        y: i32,
        w: i32,
        h: i32,
        ang1: i32,
        ang2: i32,
        pie: bool,
        for_stroke: bool,
    ) {
        let ang2 = ang2.clamp(-FULL_CIRCLE, FULL_CIRCLE);
        if for_stroke {
            self.sharp_offset(true, self.state.line_width);
        }
        let (w, h) = (f64::from(w), f64::from(h));
        self.backend.save();
        self.backend.state(StateOp::Transform(
            Affine::translate((f64::from(x) + w / 2.0, f64::from(y) + h / 2.0))
                * Affine::scale_non_uniform(w / 2.0, h / 2.0),
        ));
        self.backend.path(PathOp::NewSubPath);
        self.backend.path(PathOp::Arc {
            center: UserPoint::ORIGIN,
            radius: 1.0,
            start: radians(ang1),
            end: radians(ang1.saturating_add(ang2)),
            direction: if ang2 < 0 {
                ArcDirection::Positive
            } else {
                ArcDirection::Negative
            },
        });
        if ang2.abs() == FULL_CIRCLE {
            self.backend.path(PathOp::ClosePath);
        } else if pie {
            self.backend.path(PathOp::LineTo(UserPoint::ORIGIN));
        }
        self.backend.restore();
        self.resolved.invalidate();
        if for_stroke {
            self.sharp_offset(false, 0);
        }
    }
}
