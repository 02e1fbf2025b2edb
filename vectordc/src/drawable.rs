// Copyright 2026 the Vectordc Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Interfaces to the objects that own pixels.
//!
//! Windows, images, bitmaps and icons live outside the device context. It
//! needs their server-side identity and size to wrap them in backend
//! surfaces, and for images and bitmaps it needs their client-side pixels,
//! fetching them back from the server when they were not retained.

use vectordc_backend::DrawableId;

use crate::Color;

/// Anything that can be drawn into or sampled from on the server side.
pub trait Drawable {
    /// Server-side identity, or `None` before the drawable is realized.
    fn id(&self) -> Option<DrawableId>;

    /// Width in pixels.
    fn width(&self) -> u32;

    /// Height in pixels.
    fn height(&self) -> u32;
}

bitflags::bitflags! {
    /// How an image treats its client pixels and their alpha.
    #[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
    pub struct ImageOptions: u32 {
        /// Client pixels are retained after upload to the server.
        const KEEP = 1 << 0;
        /// The image owns its client buffer.
        const OWNED = 1 << 1;
        /// Every pixel is opaque; no mask is needed.
        const OPAQUE = 1 << 2;
        /// Pixels equal to the transparent color are see-through.
        const ALPHA_COLOR = 1 << 3;
        /// The transparent color is guessed from the corners.
        const ALPHA_GUESS = 1 << 4;
    }
}

/// An image or icon with a client-side color buffer.
pub trait ClientImage: Drawable {
    /// Row-major pixels, `width * height` long, if present on the client.
    fn pixels(&self) -> Option<&[Color]>;

    /// Fetch the pixels back from the server. Returns `true` if the client
    /// buffer is present afterwards.
    fn restore(&mut self) -> bool;

    /// Alpha handling options.
    fn options(&self) -> ImageOptions;

    /// The color keyed out under [`ImageOptions::ALPHA_COLOR`] or
    /// [`ImageOptions::ALPHA_GUESS`].
    fn transparent_color(&self) -> Color {
        Color::TRANSPARENT
    }
}

/// A one-bit-deep bitmap with a client-side bit buffer.
pub trait ClientBitmap: Drawable {
    /// Packed bits, `(width + 7) / 8` bytes per row, least significant bit
    /// first, if present on the client.
    fn bits(&self) -> Option<&[u8]>;

    /// Fetch the bits back from the server. Returns `true` if the client
    /// buffer is present afterwards.
    fn restore(&mut self) -> bool;
}

/// Make sure an image's client pixels are present.
pub(crate) fn ensure_pixels(image: &mut dyn ClientImage) -> bool {
    image.pixels().is_some() || image.restore()
}

/// Make sure a bitmap's client bits are present.
pub(crate) fn ensure_bits(bitmap: &mut dyn ClientBitmap) -> bool {
    bitmap.bits().is_some() || bitmap.restore()
}

/// A drawable known only by identity and size, such as a window.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Window {
    /// Server-side identity.
    pub id: Option<DrawableId>,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Window {
    /// A realized window.
    pub fn new(id: DrawableId, width: u32, height: u32) -> Self {
        Self {
            id: Some(id),
            width,
            height,
        }
    }
}

impl Drawable for Window {
    fn id(&self) -> Option<DrawableId> {
        self.id
    }

    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }
}

/// An in-memory [`ClientImage`].
///
/// `server` stands in for the pixels held by the server; [`ClientImage::restore`]
/// copies them into the client buffer.
#[derive(Clone, Debug, Default)]
pub struct MemoryImage {
    /// Server-side identity.
    pub id: Option<DrawableId>,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Client pixels.
    pub pixels: Option<Vec<Color>>,
    /// Pixels that a restore fetches back.
    pub server: Option<Vec<Color>>,
    /// Alpha handling options.
    pub options: ImageOptions,
    /// Keyed-out color.
    pub transparent: Color,
    /// Number of restores performed.
    pub restores: u32,
}

impl MemoryImage {
    /// A realized image whose client buffer holds `pixels`.
    pub fn new(id: DrawableId, width: u32, height: u32, pixels: Vec<Color>) -> Self {
        Self {
            id: Some(id),
            width,
            height,
            pixels: Some(pixels),
            ..Self::default()
        }
    }

    /// Return a copy with different options.
    #[must_use]
    pub fn with_options(mut self, options: ImageOptions) -> Self {
        self.options = options;
        self
    }

    /// Return a copy with a keyed-out color.
    #[must_use]
    pub fn with_transparent(mut self, transparent: Color) -> Self {
        self.transparent = transparent;
        self
    }
}

impl Drawable for MemoryImage {
    fn id(&self) -> Option<DrawableId> {
        self.id
    }

    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }
}

impl ClientImage for MemoryImage {
    fn pixels(&self) -> Option<&[Color]> {
        self.pixels.as_deref()
    }

    fn restore(&mut self) -> bool {
        self.restores += 1;
        if self.pixels.is_none() {
            self.pixels = self.server.clone();
        }
        self.pixels.is_some()
    }

    fn options(&self) -> ImageOptions {
        self.options
    }

    fn transparent_color(&self) -> Color {
        self.transparent
    }
}

/// An in-memory [`ClientBitmap`].
#[derive(Clone, Debug, Default)]
pub struct MemoryBitmap {
    /// Server-side identity.
    pub id: Option<DrawableId>,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Client bits.
    pub bits: Option<Vec<u8>>,
    /// Bits that a restore fetches back.
    pub server: Option<Vec<u8>>,
}

impl MemoryBitmap {
    /// A realized bitmap whose client buffer holds `bits`.
    pub fn new(id: DrawableId, width: u32, height: u32, bits: Vec<u8>) -> Self {
        Self {
            id: Some(id),
            width,
            height,
            bits: Some(bits),
            server: None,
        }
    }

    /// A realized bitmap with every bit set.
    pub fn filled(id: DrawableId, width: u32, height: u32) -> Self {
        let stride = width.div_ceil(8) as usize;
        Self::new(id, width, height, vec![0xff; stride * height as usize])
    }
}

impl Drawable for MemoryBitmap {
    fn id(&self) -> Option<DrawableId> {
        self.id
    }

    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }
}

impl ClientBitmap for MemoryBitmap {
    fn bits(&self) -> Option<&[u8]> {
        self.bits.as_deref()
    }

    fn restore(&mut self) -> bool {
        if self.bits.is_none() {
            self.bits = self.server.clone();
        }
        self.bits.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ensure_pixels_restores_once() {
        let mut image = MemoryImage {
            id: Some(DrawableId(1)),
            width: 1,
            height: 1,
            server: Some(vec![Color::WHITE]),
            ..MemoryImage::default()
        };
        assert!(ensure_pixels(&mut image));
        assert!(ensure_pixels(&mut image));
        assert_eq!(image.restores, 1);
        assert_eq!(image.pixels(), Some(&[Color::WHITE][..]));
    }

    #[test]
    fn ensure_bits_fails_without_server_copy() {
        let mut bitmap = MemoryBitmap {
            id: Some(DrawableId(1)),
            width: 8,
            height: 1,
            ..MemoryBitmap::default()
        };
        assert!(!ensure_bits(&mut bitmap));
    }

    #[test]
    fn filled_bitmap_rows_round_up() {
        let bitmap = MemoryBitmap::filled(DrawableId(2), 9, 3);
        assert_eq!(bitmap.bits().map(<[u8]>::len), Some(6));
    }
}
