// Copyright 2026 the Vectordc Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use log::{debug, trace};
use vectordc_backend::{
    ContextId, DrawableId, FontDescription, MaskRef, Point, SurfaceId, TextEngine, TextLayout,
    VectorBackend,
};

use crate::convert::SurfaceData;
use crate::state::StippleKey;
use crate::{DcError, Drawable, FontDescriptor};

/// A backend surface remembered under the identity of what it was built from.
#[derive(Clone, Debug)]
pub(crate) struct CachedSurface<K> {
    pub(crate) key: K,
    pub(crate) surface: SurfaceId,
}

/// The clip mask: a one-bit surface composited at a fixed user-space origin.
#[derive(Copy, Clone, Debug)]
pub(crate) struct ClipMask {
    pub(crate) key: DrawableId,
    pub(crate) surface: SurfaceId,
    pub(crate) origin: Point,
}

/// Backend resources of one painting session.
///
/// Every handle here was created after [`Session::open`] and is released by
/// [`Session::close`].
#[derive(Debug)]
pub(crate) struct Session {
    pub(crate) drawable: DrawableId,
    pub(crate) target: SurfaceId,
    pub(crate) context: ContextId,
    pub(crate) tile: Option<CachedSurface<DrawableId>>,
    pub(crate) stipple: Option<CachedSurface<StippleKey>>,
    pub(crate) clip_mask: Option<ClipMask>,
    pub(crate) font: Option<(FontDescriptor, FontDescription)>,
    pub(crate) layout: Option<Box<dyn TextLayout>>,
    /// A half-pixel translation is in effect for the path being built.
    pub(crate) sharp_offset: bool,
}

impl Session {
    /// Wrap `drawable` in a surface and create a context drawing into it.
    pub(crate) fn open<B: VectorBackend + ?Sized>(
        backend: &mut B,
        drawable: &dyn Drawable,
        text: Option<&dyn TextEngine>,
    ) -> Result<Self, DcError> {
        let id = drawable.id().ok_or(DcError::InvalidDrawable)?;
        let target = backend.create_drawable_surface(id, drawable.width(), drawable.height())?;
        let context = match backend.create_context(target) {
            Ok(context) => context,
            Err(err) => {
                backend.destroy_surface(target);
                return Err(err.into());
            }
        };
        debug!(
            "begin session on {id:?} ({}x{}) as {context:?}",
            drawable.width(),
            drawable.height()
        );
        Ok(Self {
            drawable: id,
            target,
            context,
            tile: None,
            stipple: None,
            clip_mask: None,
            font: None,
            layout: text.map(TextEngine::create_layout),
            sharp_offset: false,
        })
    }

    /// Release everything: the context, the target, then the cached surfaces,
    /// the font description and the layout.
    pub(crate) fn close<B: VectorBackend + ?Sized>(self, backend: &mut B) {
        backend.destroy_context(self.context);
        trace!("released context {:?}", self.context);
        backend.destroy_surface(self.target);
        trace!("released target surface {:?}", self.target);
        if let Some(tile) = self.tile {
            backend.destroy_surface(tile.surface);
            trace!("released tile surface {:?}", tile.surface);
        }
        if let Some(stipple) = self.stipple {
            backend.destroy_surface(stipple.surface);
            trace!("released stipple surface {:?}", stipple.surface);
        }
        if let Some(mask) = self.clip_mask {
            backend.destroy_surface(mask.surface);
            trace!("released clip mask surface {:?}", mask.surface);
        }
        if self.font.is_some() {
            trace!("released font description");
        }
        if self.layout.is_some() {
            trace!("released text layout");
        }
        debug!("end session on {:?}", self.drawable);
    }

    /// Server surface of a tile, recreated only when the tile changes.
    pub(crate) fn tile_surface<B: VectorBackend + ?Sized>(
        &mut self,
        backend: &mut B,
        drawable: DrawableId,
        width: u32,
        height: u32,
    ) -> Result<SurfaceId, DcError> {
        if let Some(cached) = &self.tile {
            if cached.key == drawable {
                trace!("tile surface cache hit for {drawable:?}");
                return Ok(cached.surface);
            }
        }
        if let Some(old) = self.tile.take() {
            backend.destroy_surface(old.surface);
        }
        let surface = backend.create_drawable_surface(drawable, width, height)?;
        self.tile = Some(CachedSurface {
            key: drawable,
            surface,
        });
        Ok(surface)
    }

    /// Stipple surface for `key`, built by `make` only when the key changes.
    pub(crate) fn stipple_surface<B: VectorBackend + ?Sized>(
        &mut self,
        backend: &mut B,
        key: &StippleKey,
        make: impl FnOnce() -> SurfaceData,
    ) -> Result<SurfaceId, DcError> {
        if let Some(cached) = &self.stipple {
            if cached.key == *key {
                trace!("stipple surface cache hit");
                return Ok(cached.surface);
            }
        }
        if let Some(old) = self.stipple.take() {
            backend.destroy_surface(old.surface);
        }
        let surface = make().upload(backend)?;
        self.stipple = Some(CachedSurface {
            key: key.clone(),
            surface,
        });
        Ok(surface)
    }

    /// Install a clip mask. The surface is rebuilt by `make` only when the
    /// mask bitmap changes; otherwise only the origin moves.
    pub(crate) fn set_clip_mask<B: VectorBackend + ?Sized>(
        &mut self,
        backend: &mut B,
        key: DrawableId,
        origin: Point,
        make: impl FnOnce() -> Option<SurfaceData>,
    ) -> Result<(), DcError> {
        if let Some(mask) = &mut self.clip_mask {
            if mask.key == key {
                mask.origin = origin;
                return Ok(());
            }
        }
        self.clear_clip_mask(backend);
        let data = make().ok_or(DcError::UnsupportedSource)?;
        let surface = data.upload(backend)?;
        self.clip_mask = Some(ClipMask {
            key,
            surface,
            origin,
        });
        Ok(())
    }

    /// Remove the clip mask and release its surface.
    pub(crate) fn clear_clip_mask<B: VectorBackend + ?Sized>(&mut self, backend: &mut B) {
        if let Some(mask) = self.clip_mask.take() {
            backend.destroy_surface(mask.surface);
            trace!("released clip mask surface {:?}", mask.surface);
        }
    }

    /// The clip mask as a backend mask reference.
    pub(crate) fn mask_ref(&self) -> Option<MaskRef> {
        self.clip_mask.map(|mask| MaskRef {
            surface: mask.surface,
            origin: mask.origin,
        })
    }
}
