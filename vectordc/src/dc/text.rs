// Copyright 2026 the Vectordc Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use vectordc_backend::{
    Affine, DrawOp, LayerOp, PathOp, Point as UserPoint, StateOp, TextLayout, Vec2,
    VectorBackend,
};

use super::VectorDc;
use crate::DcError;

impl<B: VectorBackend> VectorDc<'_, B> {
    /// Lay out `text` in the current font and draw it with its baseline
    /// starting at (`x`, `y`), rotated by the font angle.
    pub(crate) fn paint_text(
        &mut self,
        x: i32,
        y: i32,
        text: &str,
        fill_background: bool,
    ) -> Result<(), DcError> {
        let session = self.session_mut()?;
        let Some((font, desc)) = &session.font else {
            return Err(DcError::NoFont);
        };
        let (angle, desc) = (font.angle, desc.clone());
        let mut layout = session.layout.take().ok_or(DcError::NoTextEngine)?;
        layout.set_text(text);
        let result = match layout.set_font_description(&desc) {
            Ok(()) => self.show_layout(&*layout, x, y, angle, fill_background),
            Err(err) => Err(err.into()),
        };
        if let Some(session) = self.session.as_mut() {
            session.layout = Some(layout);
        }
        result
    }

    fn show_layout(
        &mut self,
        layout: &dyn TextLayout,
        x: i32,
        y: i32,
        angle: i32,
        fill_background: bool,
    ) -> Result<(), DcError> {
        let mask = self.session()?.mask_ref();
        if let Some(mask) = mask {
            self.backend.state(StateOp::PushLayer(LayerOp::masked(mask)));
        }
        self.backend.save();
        self.backend.translate(Vec2::new(f64::from(x), f64::from(y)));
        if angle != 0 {
            self.backend.state(StateOp::Transform(Affine::rotate(
                (f64::from(angle) / -64.0).to_radians(),
            )));
        }
        let top = -layout.baseline();
        if fill_background {
            let extents = layout.logical_extents() + Vec2::new(0.0, top);
            self.backend.save();
            self.backend.path(PathOp::Rectangle(extents));
            self.backend.set_source_color(self.state.background.into());
            self.backend.draw(DrawOp::Fill { preserve: false });
            self.backend.restore();
        }
        let result = match self.resolve_source(false) {
            Ok(()) => layout
                .show(&mut *self.backend, UserPoint::new(0.0, top))
                .map_err(DcError::from),
            Err(err) => Err(err),
        };
        self.backend.restore();
        if mask.is_some() {
            self.backend.state(StateOp::PopLayer);
        }
        self.resolved.invalidate();
        result
    }
}
