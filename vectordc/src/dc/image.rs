// Copyright 2026 the Vectordc Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pixel copies: areas, bitmaps and icons.

use vectordc_backend::{
    Affine, BlendMode, DrawOp, MaskRef, PathOp, Point as UserPoint, Rect, Source, StateOp,
    SurfaceId, SurfacePattern, VectorBackend,
};

use super::VectorDc;
use crate::convert::{PixelView, bitmap_to_argb32, icon_mask};
use crate::drawable::ensure_bits;
use crate::icon::{IconSource, passes};
use crate::{ClientBitmap, ClientImage, DcError, Drawable, IconMode};

impl<B: VectorBackend> VectorDc<'_, B> {
    /// Fill `area` with a surface, then release the surface.
    fn fill_with_surface(&mut self, surface: SurfaceId, pattern: SurfacePattern, area: Rect) {
        self.backend.save();
        self.backend.state(StateOp::SetSource(Source::Surface(pattern)));
        self.backend.path(PathOp::Rectangle(area));
        self.backend.draw(DrawOp::Fill { preserve: false });
        self.backend.restore();
        self.resolved.invalidate();
        self.backend.destroy_surface(surface);
    }

    /// Copy `area` of `source` so that its corner lands on `dest`.
    pub(crate) fn copy_area(
        &mut self,
        source: &dyn Drawable,
        area: Rect,
        dest: UserPoint,
    ) -> Result<(), DcError> {
        let id = source.id().ok_or(DcError::InvalidDrawable)?;
        let surface =
            self.backend.create_drawable_surface(id, source.width(), source.height())?;
        let pattern = SurfacePattern::at(surface, dest - area.origin().to_vec2());
        let target = Rect::from_origin_size(dest, area.size());
        self.fill_with_surface(surface, pattern, target);
        Ok(())
    }

    /// Copy `area` of `source` scaled onto `dest`.
    ///
    /// Empty source or destination areas draw nothing.
    pub(crate) fn copy_area_stretched(
        &mut self,
        source: &dyn Drawable,
        area: Rect,
        dest: Rect,
    ) -> Result<(), DcError> {
        let id = source.id().ok_or(DcError::InvalidDrawable)?;
        if area.width() == 0.0
            || area.height() == 0.0
            || dest.width() == 0.0
            || dest.height() == 0.0
        {
            return Ok(());
        }
        let surface =
            self.backend.create_drawable_surface(id, source.width(), source.height())?;
        let mut pattern = SurfacePattern::at(surface, UserPoint::ORIGIN);
        pattern.transform = Affine::translate(dest.origin().to_vec2())
            * Affine::scale_non_uniform(dest.width() / area.width(), dest.height() / area.height())
            * Affine::translate(-area.origin().to_vec2());
        self.fill_with_surface(surface, pattern, dest);
        Ok(())
    }

    /// Draw a bitmap in the foreground and background colors.
    pub(crate) fn paint_bitmap(
        &mut self,
        bitmap: &mut dyn ClientBitmap,
        dest: UserPoint,
    ) -> Result<(), DcError> {
        bitmap.id().ok_or(DcError::InvalidDrawable)?;
        if !ensure_bits(bitmap) {
            return Err(DcError::UnsupportedSource);
        }
        let bits = bitmap.bits().ok_or(DcError::UnsupportedSource)?;
        let (width, height) = (bitmap.width(), bitmap.height());
        let data = bitmap_to_argb32(
            PixelView::bitmap(width, height, bits),
            self.state.foreground,
            self.state.background,
        );
        let surface = data.upload(&mut *self.backend)?;
        let area = Rect::from_origin_size(dest, (f64::from(width), f64::from(height)));
        self.fill_with_surface(surface, SurfacePattern::at(surface, dest), area);
        Ok(())
    }

    /// Draw an icon through its mask, or as a plain rectangle when it has
    /// none.
    pub(crate) fn paint_icon(
        &mut self,
        icon: &mut dyn ClientImage,
        dest: UserPoint,
        mode: IconMode,
    ) -> Result<(), DcError> {
        let id = icon.id().ok_or(DcError::InvalidDrawable)?;
        let (width, height) = (icon.width(), icon.height());
        let mask = match icon_mask(icon) {
            Some(data) => Some(data.upload(&mut *self.backend)?),
            None => None,
        };
        let image = match self.backend.create_drawable_surface(id, width, height) {
            Ok(image) => image,
            Err(err) => {
                if let Some(mask) = mask {
                    self.backend.destroy_surface(mask);
                }
                return Err(err.into());
            }
        };
        let area = Rect::from_origin_size(dest, (f64::from(width), f64::from(height)));

        self.backend.save();
        let mut blend = BlendMode::default();
        for pass in passes(mode, &self.config) {
            let source = match pass.source {
                IconSource::Icon => Source::Surface(SurfacePattern::at(image, dest)),
                IconSource::Solid(color) => Source::Solid(color),
            };
            self.backend.state(StateOp::SetSource(source));
            if pass.blend != blend {
                self.backend.state(StateOp::SetBlendMode(pass.blend));
                blend = pass.blend;
            }
            match mask {
                Some(surface) => self.backend.draw(DrawOp::Mask(MaskRef {
                    surface,
                    origin: dest,
                })),
                None => {
                    self.backend.path(PathOp::Rectangle(area));
                    self.backend.draw(DrawOp::Fill { preserve: false });
                }
            }
        }
        self.backend.restore();
        self.resolved.invalidate();

        self.backend.destroy_surface(image);
        if let Some(mask) = mask {
            self.backend.destroy_surface(mask);
        }
        Ok(())
    }
}
