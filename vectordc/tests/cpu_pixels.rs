// Copyright 2026 the Vectordc Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pixel checks of device context drawing rasterized by the CPU backend.

use vectordc::{
    Color, DeviceContext, ImageOptions, LineStyle, MemoryBitmap, MemoryImage, VectorDc, Window,
};
use vectordc_backend::DrawableId;
use vectordc_backend_cpu::CpuBackend;

const TARGET: DrawableId = DrawableId(1);
const ICON: DrawableId = DrawableId(2);
const LARGE: DrawableId = DrawableId(3);
const WHITE: [u8; 4] = [255, 255, 255, 255];
const RED: [u8; 4] = [255, 0, 0, 255];

fn window(id: DrawableId) -> Window {
    if id == LARGE {
        Window::new(id, 100, 100)
    } else {
        Window::new(id, 16, 16)
    }
}

fn backend() -> CpuBackend {
    let mut backend = CpuBackend::default();
    backend.insert_drawable(TARGET, 16, 16);
    backend.insert_drawable(ICON, 16, 16);
    backend.insert_drawable(LARGE, 100, 100);
    backend
}

/// Run `draw` in a session on `id` that starts from a white background.
fn draw_on(
    backend: &mut CpuBackend,
    id: DrawableId,
    draw: impl FnOnce(&mut VectorDc<'_, CpuBackend>),
) {
    let mut dc = VectorDc::new(backend);
    dc.begin(&window(id)).unwrap();
    dc.set_foreground(Color::WHITE).unwrap();
    dc.fill_rectangle(0, 0, 100, 100).unwrap();
    dc.set_foreground(Color::BLACK).unwrap();
    draw(&mut dc);
    dc.end();
}

fn rgba(backend: &CpuBackend, x: u16, y: u16) -> [u8; 4] {
    rgba_of(backend, TARGET, x, y)
}

fn rgba_of(backend: &CpuBackend, id: DrawableId, x: u16, y: u16) -> [u8; 4] {
    let c = backend
        .drawable_pixel(id, x, y)
        .expect("pixel in bounds")
        .to_rgba8();
    [c.r, c.g, c.b, c.a]
}

#[track_caller]
fn assert_near(actual: [u8; 4], expected: [u8; 4]) {
    let close = actual
        .iter()
        .zip(expected)
        .all(|(a, e)| a.abs_diff(e) <= 2);
    assert!(close, "expected about {expected:?}, got {actual:?}");
}

#[test]
fn filled_rectangle_covers_its_pixels() {
    let mut backend = backend();
    draw_on(&mut backend, TARGET, |dc| {
        dc.set_foreground(Color::rgb(255, 0, 0)).unwrap();
        dc.fill_rectangle(2, 3, 4, 5).unwrap();
    });
    assert_near(rgba(&backend, 2, 3), RED);
    assert_near(rgba(&backend, 5, 7), RED);
    assert_near(rgba(&backend, 6, 7), WHITE);
    assert_near(rgba(&backend, 5, 8), WHITE);
    assert_near(rgba(&backend, 1, 3), WHITE);
}

#[test]
fn hairline_covers_one_row() {
    let mut backend = backend();
    draw_on(&mut backend, TARGET, |dc| {
        dc.draw_line(0, 5, 15, 5).unwrap();
    });
    assert_near(rgba(&backend, 7, 5), [0, 0, 0, 255]);
    assert_near(rgba(&backend, 7, 4), WHITE);
    assert_near(rgba(&backend, 7, 6), WHITE);
}

#[test]
fn read_pixel_sees_earlier_drawing() {
    let mut backend = backend();
    draw_on(&mut backend, TARGET, |dc| {
        dc.set_foreground(Color::rgb(0, 0, 255)).unwrap();
        dc.fill_rectangle(4, 4, 4, 4).unwrap();
        assert_eq!(dc.read_pixel(5, 5).unwrap(), Color::rgb(0, 0, 255));
        assert_eq!(dc.read_pixel(0, 0).unwrap(), Color::WHITE);
    });
}

#[test]
fn clip_mask_limits_fills() {
    let mut backend = backend();
    draw_on(&mut backend, TARGET, |dc| {
        let mut mask = MemoryBitmap::new(DrawableId(9), 8, 1, vec![0b0000_1111]);
        dc.set_clip_mask(&mut mask, 0, 2).unwrap();
        dc.set_foreground(Color::rgb(255, 0, 0)).unwrap();
        dc.fill_rectangle(0, 0, 8, 4).unwrap();
    });
    assert_near(rgba(&backend, 0, 2), RED);
    assert_near(rgba(&backend, 3, 2), RED);
    assert_near(rgba(&backend, 4, 2), WHITE);
    assert_near(rgba(&backend, 0, 1), WHITE);
    assert_near(rgba(&backend, 0, 3), WHITE);
    assert_eq!(backend.live_surfaces(), 0, "session surfaces are released");
}

#[test]
fn keyed_icon_leaves_transparent_pixels() {
    let mut backend = backend();
    draw_on(&mut backend, ICON, |dc| {
        dc.set_foreground(Color::rgb(255, 0, 0)).unwrap();
        dc.fill_rectangle(0, 0, 2, 1).unwrap();
    });
    draw_on(&mut backend, TARGET, |dc| {
        let mut icon = MemoryImage::new(
            ICON,
            2,
            1,
            vec![Color::rgb(0, 255, 0), Color::rgb(255, 0, 0)],
        )
        .with_options(ImageOptions::ALPHA_COLOR)
        .with_transparent(Color::rgb(0, 255, 0));
        dc.draw_icon(&mut icon, 6, 6).unwrap();
    });
    assert_near(rgba(&backend, 6, 6), WHITE);
    assert_near(rgba(&backend, 7, 6), RED);
    assert_near(rgba(&backend, 8, 6), WHITE);
}

#[test]
fn outline_then_fill_leaves_no_gap_or_leftover_state() {
    const BLACK: [u8; 4] = [0, 0, 0, 255];
    let mut backend = backend();
    draw_on(&mut backend, LARGE, |dc| {
        dc.set_background(Color::WHITE).unwrap();
        dc.set_line_width(3).unwrap();
        dc.draw_rectangle(10, 10, 50, 30).unwrap();
        dc.fill_rectangle(10, 10, 50, 30).unwrap();
    });
    for (x, y) in [(10, 10), (11, 11), (35, 25), (59, 39), (9, 25), (61, 25)] {
        assert_near(rgba_of(&backend, LARGE, x, y), BLACK);
    }
    assert_near(rgba_of(&backend, LARGE, 7, 25), WHITE);
    assert_near(rgba_of(&backend, LARGE, 63, 25), WHITE);

    draw_on(&mut backend, LARGE, |dc| {
        dc.draw_line(0, 90, 99, 90).unwrap();
    });
    assert_near(rgba_of(&backend, LARGE, 10, 10), WHITE);
    for x in 1..12 {
        assert_near(rgba_of(&backend, LARGE, x, 90), BLACK);
    }
}

#[test]
fn clip_mask_confines_fills_until_cleared() {
    let mut backend = backend();
    draw_on(&mut backend, LARGE, |dc| {
        let mut mask = MemoryBitmap::filled(DrawableId(9), 20, 20);
        dc.set_clip_mask(&mut mask, 5, 5).unwrap();
        dc.set_foreground(Color::rgb(255, 0, 0)).unwrap();
        dc.fill_rectangle(0, 0, 100, 100).unwrap();
    });
    assert_near(rgba_of(&backend, LARGE, 5, 5), RED);
    assert_near(rgba_of(&backend, LARGE, 24, 24), RED);
    assert_near(rgba_of(&backend, LARGE, 4, 5), WHITE);
    assert_near(rgba_of(&backend, LARGE, 25, 24), WHITE);
    assert_near(rgba_of(&backend, LARGE, 24, 25), WHITE);
    assert_near(rgba_of(&backend, LARGE, 80, 80), WHITE);

    draw_on(&mut backend, LARGE, |dc| {
        let mut mask = MemoryBitmap::filled(DrawableId(9), 20, 20);
        dc.set_clip_mask(&mut mask, 5, 5).unwrap();
        dc.clear_clip_mask().unwrap();
        dc.set_foreground(Color::rgb(255, 0, 0)).unwrap();
        dc.fill_rectangle(0, 0, 100, 100).unwrap();
    });
    assert_near(rgba_of(&backend, LARGE, 80, 80), RED);
    assert_near(rgba_of(&backend, LARGE, 0, 0), RED);
}

#[test]
fn dashes_and_clip_rectangle_end_with_the_session() {
    let mut backend = backend();
    {
        let mut dc = VectorDc::new(&mut backend);
        dc.begin(&window(LARGE)).unwrap();
        dc.set_line_style(LineStyle::OnOffDash).unwrap();
        dc.set_dashes(0, &[2, 2]).unwrap();
        dc.set_clip_rectangle(0, 0, 10, 10).unwrap();
        dc.draw_line(0, 5, 99, 5).unwrap();
        dc.end();

        dc.begin(&window(LARGE)).unwrap();
        dc.set_foreground(Color::WHITE).unwrap();
        dc.fill_rectangle(0, 0, 100, 100).unwrap();
        dc.set_foreground(Color::rgb(255, 0, 0)).unwrap();
        dc.draw_line(0, 50, 99, 50).unwrap();
        dc.end();
    }
    for x in 1..99 {
        assert_near(rgba_of(&backend, LARGE, x, 50), RED);
    }
    assert_near(rgba_of(&backend, LARGE, 50, 49), WHITE);
    assert_near(rgba_of(&backend, LARGE, 50, 51), WHITE);
}

#[test]
fn clip_mask_left_set_ends_with_the_session() {
    let mut backend = backend();
    {
        let mut dc = VectorDc::new(&mut backend);
        dc.begin(&window(LARGE)).unwrap();
        let mut mask = MemoryBitmap::filled(DrawableId(9), 20, 20);
        dc.set_clip_mask(&mut mask, 5, 5).unwrap();
        dc.end();
        assert_eq!(dc.backend().live_surfaces(), 0, "the mask surface is released");

        dc.begin(&window(LARGE)).unwrap();
        dc.set_foreground(Color::rgb(255, 0, 0)).unwrap();
        dc.fill_rectangle(0, 0, 100, 100).unwrap();
        dc.end();
    }
    for (x, y) in [(0, 0), (10, 10), (80, 80), (99, 99)] {
        assert_near(rgba_of(&backend, LARGE, x, y), RED);
    }
}
