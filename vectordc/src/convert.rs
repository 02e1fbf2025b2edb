// Copyright 2026 the Vectordc Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Client pixel buffers to backend surface formats.
//!
//! Client bitmaps pack `(width + 7) / 8` bytes per row, least significant
//! bit first. Client images hold one straight-alpha [`Color`] per pixel.
//! Backend surfaces pad rows to four bytes and store ARGB32 premultiplied,
//! little-endian.

use vectordc_backend::{BackendError, ResourceBackend, SurfaceDesc, SurfaceFormat, SurfaceId};

use crate::drawable::ensure_pixels;
use crate::{ClientImage, Color, DcError, ImageOptions};

/// A read-only view of a client pixel buffer.
///
/// Reads past the end of `data` yield zero, so a short buffer converts to a
/// partially transparent surface instead of failing.
#[derive(Copy, Clone, Debug)]
pub struct PixelView<'a, T> {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Elements per row.
    pub stride: usize,
    /// Row-major elements.
    pub data: &'a [T],
}

impl<'a> PixelView<'a, u8> {
    /// View a packed one-bit bitmap.
    pub fn bitmap(width: u32, height: u32, data: &'a [u8]) -> Self {
        Self {
            width,
            height,
            stride: width.div_ceil(8) as usize,
            data,
        }
    }

    /// Whether the bit at (`x`, `y`) is set.
    #[inline]
    pub fn bit(&self, x: u32, y: u32) -> bool {
        let byte = y as usize * self.stride + (x >> 3) as usize;
        self.data.get(byte).is_some_and(|b| (b >> (x & 7)) & 1 != 0)
    }
}

impl<'a> PixelView<'a, Color> {
    /// View a color image.
    pub fn image(width: u32, height: u32, data: &'a [Color]) -> Self {
        Self {
            width,
            height,
            stride: width as usize,
            data,
        }
    }

    /// The pixel at (`x`, `y`).
    #[inline]
    pub fn pixel(&self, x: u32, y: u32) -> Color {
        self.data
            .get(y as usize * self.stride + x as usize)
            .copied()
            .unwrap_or_default()
    }
}

/// Pixels laid out for [`ResourceBackend::create_surface`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SurfaceData {
    /// Layout of `data`.
    pub desc: SurfaceDesc,
    /// Surface bytes.
    pub data: Vec<u8>,
}

impl SurfaceData {
    /// A zeroed surface.
    pub fn zeroed(width: u32, height: u32, format: SurfaceFormat) -> Self {
        let desc = SurfaceDesc::new(width, height, format);
        Self {
            data: vec![0; desc.byte_len()],
            desc,
        }
    }

    /// Create a backend surface holding these pixels.
    pub fn upload<B: ResourceBackend + ?Sized>(
        &self,
        backend: &mut B,
    ) -> Result<SurfaceId, BackendError> {
        backend.create_surface(self.desc, &self.data)
    }

    fn set_bit(&mut self, x: u32, y: u32) {
        let i = y as usize * self.desc.stride + (x >> 3) as usize;
        if let Some(byte) = self.data.get_mut(i) {
            *byte |= 1 << (x & 7);
        }
    }

    fn put_u8(&mut self, x: u32, y: u32, v: u8) {
        let i = y as usize * self.desc.stride + x as usize;
        if let Some(byte) = self.data.get_mut(i) {
            *byte = v;
        }
    }

    fn put_u32(&mut self, x: u32, y: u32, v: u32) {
        let i = y as usize * self.desc.stride + 4 * x as usize;
        if let Some(px) = self.data.get_mut(i..i + 4) {
            px.copy_from_slice(&v.to_le_bytes());
        }
    }

    fn fill_from(mut self, mut f: impl FnMut(&mut Self, u32, u32)) -> Self {
        for y in 0..self.desc.height {
            for x in 0..self.desc.width {
                f(&mut self, x, y);
            }
        }
        self
    }
}

/// One-bit alpha surface with the bitmap's set bits opaque.
pub fn bitmap_to_a1(view: PixelView<'_, u8>) -> SurfaceData {
    let mut out = SurfaceData::zeroed(view.width, view.height, SurfaceFormat::A1);
    let row = view.stride.min(out.desc.stride);
    for y in 0..view.height as usize {
        let src = view.data.get(y * view.stride..).unwrap_or_default();
        let src = &src[..row.min(src.len())];
        let dst = y * out.desc.stride;
        out.data[dst..dst + src.len()].copy_from_slice(src);
    }
    out
}

/// ARGB32 surface with set bits in `fg` and clear bits in `bg`.
pub fn bitmap_to_argb32(view: PixelView<'_, u8>, fg: Color, bg: Color) -> SurfaceData {
    let (fg, bg) = (fg.to_premultiplied_argb32(), bg.to_premultiplied_argb32());
    SurfaceData::zeroed(view.width, view.height, SurfaceFormat::Argb32).fill_from(|out, x, y| {
        out.put_u32(x, y, if view.bit(x, y) { fg } else { bg });
    })
}

/// ARGB32 surface from an image, premultiplying each pixel.
///
/// Pixels equal to `transparent`, when given, become transparent black.
pub fn image_to_argb32(view: PixelView<'_, Color>, transparent: Option<Color>) -> SurfaceData {
    SurfaceData::zeroed(view.width, view.height, SurfaceFormat::Argb32).fill_from(|out, x, y| {
        let c = view.pixel(x, y);
        if Some(c) != transparent {
            out.put_u32(x, y, c.to_premultiplied_argb32());
        }
    })
}

/// One-bit mask set wherever the image differs from `transparent`.
pub fn image_to_a1_keyed(view: PixelView<'_, Color>, transparent: Color) -> SurfaceData {
    SurfaceData::zeroed(view.width, view.height, SurfaceFormat::A1).fill_from(|out, x, y| {
        if view.pixel(x, y) != transparent {
            out.set_bit(x, y);
        }
    })
}

/// One-bit mask set where alpha is at least `alpha_threshold` and the
/// NTSC luma is at least `luma_threshold`.
pub fn image_to_a1_threshold(
    view: PixelView<'_, Color>,
    alpha_threshold: u8,
    luma_threshold: f64,
) -> SurfaceData {
    SurfaceData::zeroed(view.width, view.height, SurfaceFormat::A1).fill_from(|out, x, y| {
        let c = view.pixel(x, y);
        if c.a >= alpha_threshold && c.luma() >= luma_threshold {
            out.set_bit(x, y);
        }
    })
}

/// Eight-bit mask from the image's alpha channel.
pub fn image_to_a8(view: PixelView<'_, Color>) -> SurfaceData {
    SurfaceData::zeroed(view.width, view.height, SurfaceFormat::A8).fill_from(|out, x, y| {
        out.put_u8(x, y, view.pixel(x, y).a);
    })
}

/// ARGB32 surface from an image's client pixels, fetching them back from
/// the server first if they were released.
///
/// Pixels equal to `transparent`, when given, become transparent black.
/// Fails with [`DcError::UnsupportedSource`] when no pixels can be had.
pub fn client_image_to_argb32(
    image: &mut dyn ClientImage,
    transparent: Option<Color>,
) -> Result<SurfaceData, DcError> {
    let view = client_view(image)?;
    Ok(image_to_argb32(view, transparent))
}

/// One-bit mask from an image's client pixels, as [`image_to_a1_threshold`],
/// fetching them back from the server first if they were released.
pub fn client_image_to_a1_threshold(
    image: &mut dyn ClientImage,
    alpha_threshold: u8,
    luma_threshold: f64,
) -> Result<SurfaceData, DcError> {
    let view = client_view(image)?;
    Ok(image_to_a1_threshold(view, alpha_threshold, luma_threshold))
}

fn client_view(image: &mut dyn ClientImage) -> Result<PixelView<'_, Color>, DcError> {
    if !ensure_pixels(image) {
        return Err(DcError::UnsupportedSource);
    }
    let (width, height) = (image.width(), image.height());
    let pixels = image.pixels().ok_or(DcError::UnsupportedSource)?;
    Ok(PixelView::image(width, height, pixels))
}

/// Derive the alpha mask of an icon.
///
/// - Opaque images need no mask.
/// - Color-keyed images give a one-bit mask of the non-transparent pixels.
/// - Otherwise the alpha channel is used as an eight-bit mask.
///
/// An image whose client pixels are gone and which is not color-keyed may
/// only have an opaque server copy left, so it is treated as opaque rather
/// than fetched. If fetching the pixels fails the result is also `None`.
pub fn icon_mask(image: &mut dyn ClientImage) -> Option<SurfaceData> {
    let options = image.options();
    let keyed = options.intersects(ImageOptions::ALPHA_COLOR | ImageOptions::ALPHA_GUESS);
    if options.contains(ImageOptions::OPAQUE) || !(image.pixels().is_some() || keyed) {
        return None;
    }
    if !ensure_pixels(image) {
        return None;
    }
    let view = PixelView::image(image.width(), image.height(), image.pixels()?);
    Some(if keyed {
        image_to_a1_keyed(view, image.transparent_color())
    } else {
        image_to_a8(view)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MemoryImage;
    use vectordc_backend::DrawableId;

    #[test]
    fn a1_rows_are_restrided() {
        // 10 pixels wide: 2 bytes per client row, 4 per surface row.
        let bits = [0b0000_0101, 0b10, 0xff, 0x01];
        let out = bitmap_to_a1(PixelView::bitmap(10, 2, &bits));
        assert_eq!(out.desc.stride, 4);
        assert_eq!(out.data, [0b0000_0101, 0b10, 0, 0, 0xff, 0x01, 0, 0]);
    }

    #[test]
    fn a1_tolerates_short_buffers() {
        let out = bitmap_to_a1(PixelView::bitmap(8, 3, &[0xaa]));
        assert_eq!(out.data, [0xaa, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0]);
    }

    #[test]
    fn bitmap_bits_are_lsb_first() {
        let view = PixelView::bitmap(9, 1, &[0b0000_0010, 0b1]);
        assert!(!view.bit(0, 0));
        assert!(view.bit(1, 0));
        assert!(view.bit(8, 0));
        assert!(!view.bit(9, 0));
    }

    #[test]
    fn bitmap_to_argb32_uses_fg_and_bg() {
        let out = bitmap_to_argb32(
            PixelView::bitmap(2, 1, &[0b01]),
            Color::rgb(255, 0, 0),
            Color::rgba(0, 0, 255, 128),
        );
        assert_eq!(out.data[0..4], 0xff_ff_00_00_u32.to_le_bytes());
        assert_eq!(out.data[4..8], 0x80_00_00_80_u32.to_le_bytes());
    }

    #[test]
    fn keyed_pixels_become_transparent_black() {
        let key = Color::rgb(255, 0, 255);
        let pixels = [key, Color::rgb(1, 2, 3)];
        let out = image_to_argb32(PixelView::image(2, 1, &pixels), Some(key));
        assert_eq!(out.data[0..4], [0, 0, 0, 0]);
        assert_eq!(out.data[4..8], [3, 2, 1, 255]);

        let plain = image_to_argb32(PixelView::image(2, 1, &pixels), None);
        assert_eq!(plain.data[0..4], [255, 0, 255, 255]);
    }

    #[test]
    fn keyed_mask_and_alpha_mask() {
        let key = Color::WHITE;
        let pixels = [key, Color::BLACK, Color::rgba(9, 9, 9, 77), key];
        let a1 = image_to_a1_keyed(PixelView::image(4, 1, &pixels), key);
        assert_eq!(a1.data[0], 0b0110);
        let a8 = image_to_a8(PixelView::image(4, 1, &pixels));
        assert_eq!(a8.data[0..4], [255, 255, 77, 255]);
    }

    #[test]
    fn threshold_mask_needs_alpha_and_luma() {
        let pixels = [
            Color::WHITE,
            Color::BLACK,
            Color::rgba(255, 255, 255, 10),
            Color::rgb(0, 255, 0),
        ];
        let out = image_to_a1_threshold(PixelView::image(4, 1, &pixels), 128, 100.0);
        // Green luma is 150.45.
        assert_eq!(out.data[0], 0b1001);
    }

    #[test]
    fn opaque_icon_has_no_mask() {
        let mut icon = MemoryImage::new(DrawableId(1), 1, 1, vec![Color::WHITE])
            .with_options(ImageOptions::OPAQUE | ImageOptions::ALPHA_COLOR);
        assert_eq!(icon_mask(&mut icon), None);
    }

    #[test]
    fn alpha_icon_without_client_pixels_is_treated_as_opaque() {
        let mut icon = MemoryImage {
            id: Some(DrawableId(1)),
            width: 1,
            height: 1,
            server: Some(vec![Color::rgba(0, 0, 0, 10)]),
            ..MemoryImage::default()
        };
        assert_eq!(icon_mask(&mut icon), None);
        assert_eq!(icon.restores, 0);
    }

    #[test]
    fn keyed_icon_restores_pixels_for_its_mask() {
        let mut icon = MemoryImage {
            id: Some(DrawableId(1)),
            width: 2,
            height: 1,
            server: Some(vec![Color::BLACK, Color::WHITE]),
            options: ImageOptions::ALPHA_GUESS,
            transparent: Color::WHITE,
            ..MemoryImage::default()
        };
        let mask = icon_mask(&mut icon).expect("keyed icon has a mask");
        assert_eq!(mask.desc.format, SurfaceFormat::A1);
        assert_eq!(mask.data[0], 0b01);
        assert_eq!(icon.restores, 1);
    }

    #[test]
    fn keyed_icon_without_any_pixels_has_no_mask() {
        let mut icon = MemoryImage {
            id: Some(DrawableId(1)),
            width: 2,
            height: 1,
            options: ImageOptions::ALPHA_COLOR,
            ..MemoryImage::default()
        };
        assert_eq!(icon_mask(&mut icon), None);
    }

    #[test]
    fn alpha_icon_with_client_pixels_gives_a8() {
        let mut icon = MemoryImage::new(DrawableId(1), 1, 1, vec![Color::rgba(0, 0, 0, 200)]);
        let mask = icon_mask(&mut icon).expect("alpha icon has a mask");
        assert_eq!(mask.desc.format, SurfaceFormat::A8);
        assert_eq!(mask.data[0], 200);
    }

    fn released_image(server: Option<Vec<Color>>) -> MemoryImage {
        MemoryImage {
            id: Some(DrawableId(1)),
            width: 2,
            height: 1,
            server,
            ..MemoryImage::default()
        }
    }

    #[test]
    fn client_conversion_fetches_released_pixels() {
        let key = Color::rgb(0, 255, 0);
        let mut image = released_image(Some(vec![key, Color::rgb(1, 2, 3)]));
        let out = client_image_to_argb32(&mut image, Some(key)).expect("restorable");
        assert_eq!(image.restores, 1);
        assert_eq!(out.desc.format, SurfaceFormat::Argb32);
        assert_eq!(out.data[0..4], [0, 0, 0, 0]);
        assert_eq!(out.data[4..8], [3, 2, 1, 255]);

        let again = client_image_to_argb32(&mut image, None).expect("client pixels kept");
        assert_eq!(image.restores, 1, "present pixels are not fetched again");
        assert_eq!(again.data[0..4], [0, 255, 0, 255]);
    }

    #[test]
    fn client_threshold_mask_fetches_released_pixels() {
        let mut image = released_image(Some(vec![Color::WHITE, Color::BLACK]));
        let out = client_image_to_a1_threshold(&mut image, 128, 100.0).expect("restorable");
        assert_eq!(image.restores, 1);
        assert_eq!(out.data[0], 0b01);
    }

    #[test]
    fn client_conversion_without_any_pixels_is_unsupported() {
        let mut image = released_image(None);
        assert!(matches!(
            client_image_to_argb32(&mut image, None),
            Err(DcError::UnsupportedSource)
        ));
        assert!(matches!(
            client_image_to_a1_threshold(&mut image, 0, 0.0),
            Err(DcError::UnsupportedSource)
        ));
    }
}
