// Copyright 2026 the Vectordc Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use core::f64::consts::TAU;

use kurbo::{Affine, Arc, BezPath, PathEl, Point, Vec2};

use crate::{ArcDirection, PathOp};

/// Tolerance, in device pixels, for approximating arcs with cubics.
const ARC_TOLERANCE: f64 = 0.01;

/// [`ARC_TOLERANCE`] in the user units of `ctm`.
fn user_tolerance(ctm: Affine) -> f64 {
    let [a, b, c, d, _, _] = ctm.as_coeffs();
    let scale = a.hypot(b).max(c.hypot(d));
    if scale > 0.0 && scale.is_finite() {
        ARC_TOLERANCE / scale
    } else {
        ARC_TOLERANCE
    }
}

/// Normalized sweep from `start` to `end` in the given direction.
///
/// A positive-direction sweep is never negative and a negative-direction sweep
/// is never positive; an end angle "behind" the start wraps by whole turns.
pub fn arc_sweep(start: f64, end: f64, direction: ArcDirection) -> f64 {
    let sweep = end - start;
    match direction {
        ArcDirection::Positive if sweep < 0.0 => sweep.rem_euclid(TAU),
        ArcDirection::Negative if sweep > 0.0 => -((-sweep).rem_euclid(TAU)),
        _ => sweep,
    }
}

/// Device-space current path.
///
/// Applies [`PathOp`]s under a caller-supplied user-to-device transform, so the
/// path is fixed at the moment each segment is added. Backends keep one of
/// these per context.
#[derive(Clone, Debug, Default)]
pub struct PathBuilder {
    path: BezPath,
    current: Option<Point>,
    subpath_start: Option<Point>,
    /// The last element was a close; the next segment needs an explicit move.
    after_close: bool,
}

impl PathBuilder {
    /// Create an empty path.
    pub fn new() -> Self {
        Self::default()
    }

    /// The accumulated device-space path.
    pub fn path(&self) -> &BezPath {
        &self.path
    }

    /// Current point in device space, if any.
    pub fn current_point(&self) -> Option<Point> {
        self.current
    }

    /// Returns true if no segments have been added.
    pub fn is_empty(&self) -> bool {
        self.path.elements().is_empty()
    }

    /// Discard the path and the current point.
    pub fn clear(&mut self) {
        self.path.truncate(0);
        self.current = None;
        self.subpath_start = None;
        self.after_close = false;
    }

    /// Take the path out, leaving the builder empty.
    pub fn take(&mut self) -> BezPath {
        let path = core::mem::take(&mut self.path);
        self.clear();
        path
    }

    /// Apply a path operation under `ctm`.
    pub fn apply(&mut self, op: &PathOp, ctm: Affine) {
        match *op {
            PathOp::NewPath => self.clear(),
            PathOp::NewSubPath => {
                self.current = None;
            }
            PathOp::MoveTo(p) => self.move_to(ctm * p),
            PathOp::LineTo(p) => self.line_to(ctm * p),
            PathOp::CurveTo(p1, p2, p3) => {
                if self.current.is_none() {
                    self.move_to(ctm * p1);
                }
                self.ensure_open();
                let end = ctm * p3;
                self.path.curve_to(ctm * p1, ctm * p2, end);
                self.current = Some(end);
            }
            PathOp::Arc {
                center,
                radius,
                start,
                end,
                direction,
            } => self.arc(ctm, center, radius, start, end, direction),
            PathOp::Rectangle(rect) => {
                self.move_to(ctm * Point::new(rect.x0, rect.y0));
                self.line_to(ctm * Point::new(rect.x1, rect.y0));
                self.line_to(ctm * Point::new(rect.x1, rect.y1));
                self.line_to(ctm * Point::new(rect.x0, rect.y1));
                self.close();
            }
            PathOp::ClosePath => self.close(),
        }
    }

    fn move_to(&mut self, p: Point) {
        // Consecutive moves collapse into one.
        if matches!(self.path.elements().last(), Some(PathEl::MoveTo(_))) {
            self.path.pop();
        }
        self.path.move_to(p);
        self.current = Some(p);
        self.subpath_start = Some(p);
        self.after_close = false;
    }

    fn line_to(&mut self, p: Point) {
        if self.current.is_none() {
            self.move_to(p);
            return;
        }
        self.ensure_open();
        self.path.line_to(p);
        self.current = Some(p);
    }

    fn close(&mut self) {
        if self.current.is_none() || self.after_close {
            return;
        }
        self.path.close_path();
        self.current = self.subpath_start;
        self.after_close = true;
    }

    /// After a close, segments continue from the sub-path start.
    fn ensure_open(&mut self) {
        if self.after_close {
            if let Some(start) = self.subpath_start {
                self.path.move_to(start);
            }
            self.after_close = false;
        }
    }

    fn arc(
        &mut self,
        ctm: Affine,
        center: Point,
        radius: f64,
        start: f64,
        end: f64,
        direction: ArcDirection,
    ) {
        let sweep = arc_sweep(start, end, direction);
        let first = center + Vec2::from_angle(start) * radius;
        if self.current.is_some() {
            self.line_to(ctm * first);
        } else {
            self.move_to(ctm * first);
        }
        if sweep == 0.0 || radius <= 0.0 {
            return;
        }
        self.ensure_open();
        let arc = Arc::new(center, Vec2::new(radius, radius), start, sweep, 0.0);
        for el in arc.append_iter(user_tolerance(ctm)) {
            if let PathEl::CurveTo(p1, p2, p3) = el {
                let end = ctm * p3;
                self.path.curve_to(ctm * p1, ctm * p2, end);
                self.current = Some(end);
            }
        }
    }
}
