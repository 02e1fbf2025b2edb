// Copyright 2026 the Vectordc Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Text drawing through a recording layout.

use std::cell::RefCell;
use std::rc::Rc;

use kurbo::Shape;
use vectordc::{Color, DcError, DeviceContext, FontDescriptor, Slant, VectorDc, Window};
use vectordc_backend::{
    Affine, BackendError, DrawOp, DrawableId, FontDescription, FontStyle, PathOp, Point, Rect,
    Source, StateOp, TextEngine, TextLayout, VectorBackend,
};
use vectordc_backend_ref::{Event, RefBackend};

#[derive(Debug, Default)]
struct Calls {
    texts: Vec<String>,
    fonts: Vec<FontDescription>,
    layouts: usize,
}

/// Engine whose layouts are 30 by 10 with a baseline at 8 and draw one
/// 5 by 5 square per string.
#[derive(Debug, Default)]
struct BoxEngine {
    calls: Rc<RefCell<Calls>>,
}

#[derive(Debug)]
struct BoxLayout {
    calls: Rc<RefCell<Calls>>,
}

impl TextEngine for BoxEngine {
    fn create_layout(&self) -> Box<dyn TextLayout> {
        self.calls.borrow_mut().layouts += 1;
        Box::new(BoxLayout {
            calls: Rc::clone(&self.calls),
        })
    }
}

impl TextLayout for BoxLayout {
    fn set_text(&mut self, text: &str) {
        self.calls.borrow_mut().texts.push(text.to_owned());
    }

    fn set_font_description(&mut self, desc: &FontDescription) -> Result<(), BackendError> {
        self.calls.borrow_mut().fonts.push(desc.clone());
        Ok(())
    }

    fn baseline(&self) -> f64 {
        8.0
    }

    fn logical_extents(&self) -> Rect {
        Rect::new(0.0, 0.0, 30.0, 10.0)
    }

    fn show(&self, backend: &mut dyn VectorBackend, origin: Point) -> Result<(), BackendError> {
        backend.path(PathOp::Rectangle(Rect::from_origin_size(origin, (5.0, 5.0))));
        backend.draw(DrawOp::Fill { preserve: false });
        Ok(())
    }
}

fn window() -> Window {
    Window::new(DrawableId(1), 100, 100)
}

fn font() -> FontDescriptor {
    FontDescriptor::new("Sans", 120)
}

#[test]
fn image_text_fills_extents_below_the_baseline() {
    let engine = BoxEngine::default();
    let mut backend = RefBackend::new();
    let mut dc = VectorDc::new(&mut backend).with_text_engine(&engine);
    dc.begin(&window()).unwrap();
    dc.set_foreground(Color::rgb(255, 0, 0)).unwrap();
    dc.set_background(Color::rgb(0, 0, 255)).unwrap();
    dc.set_font(&font()).unwrap();
    dc.backend_mut().clear_events();

    dc.draw_image_text(10, 20, "label").unwrap();

    let draws: Vec<_> = dc
        .backend()
        .draws()
        .map(|(op, path, state)| (*op, path.bounding_box(), state.source))
        .collect();
    assert_eq!(
        draws,
        [
            (
                DrawOp::Fill { preserve: false },
                Rect::new(10.0, 12.0, 40.0, 22.0),
                Source::Solid(Color::rgb(0, 0, 255).into()),
            ),
            (
                DrawOp::Fill { preserve: false },
                Rect::new(10.0, 12.0, 15.0, 17.0),
                Source::Solid(Color::rgb(255, 0, 0).into()),
            ),
        ]
    );
    assert_eq!(
        dc.backend().current_state().transform,
        Affine::IDENTITY,
        "text leaves no transform behind"
    );

    let calls = engine.calls.borrow();
    assert_eq!(calls.texts, ["label"]);
    assert_eq!(calls.fonts.len(), 1);
    assert_eq!(calls.fonts[0].family, "Sans");
    assert_eq!(calls.fonts[0].size, 12 * FontDescription::SCALE);
    assert_eq!(calls.fonts[0].weight, 400);
}

#[test]
fn plain_text_draws_only_glyphs() {
    let engine = BoxEngine::default();
    let mut backend = RefBackend::new();
    let mut dc = VectorDc::new(&mut backend).with_text_engine(&engine);
    dc.begin(&window()).unwrap();
    dc.set_font(&FontDescriptor {
        slant: Slant::Italic,
        ..font()
    })
    .unwrap();
    dc.backend_mut().clear_events();

    dc.draw_text(0, 8, "a").unwrap();
    dc.draw_text(0, 8, "b").unwrap();

    assert_eq!(dc.backend().draws().count(), 2);
    let calls = engine.calls.borrow();
    assert_eq!(calls.layouts, 1, "one layout serves the whole session");
    assert_eq!(calls.texts, ["a", "b"]);
    assert_eq!(calls.fonts[0].style, FontStyle::Italic);
}

#[test]
fn rotated_fonts_rotate_the_baseline() {
    let engine = BoxEngine::default();
    let mut backend = RefBackend::new();
    let mut dc = VectorDc::new(&mut backend).with_text_engine(&engine);
    dc.begin(&window()).unwrap();
    dc.set_font(&FontDescriptor {
        angle: 90 * 64,
        ..font()
    })
    .unwrap();
    dc.backend_mut().clear_events();

    dc.draw_text(50, 50, "up").unwrap();

    let rotations = dc
        .backend()
        .events()
        .iter()
        .filter(|e| matches!(e, Event::State { op: StateOp::Transform(_), .. }))
        .count();
    assert_eq!(rotations, 2, "a translation, then a rotation");
    let (_, path, _) = dc.backend().draws().next().expect("glyph fill");
    let bounds = path.bounding_box();
    // Top-left (0, -8) rotated a quarter turn counter-clockwise on a y-down
    // surface lands at (-8, 0) relative to the anchor.
    assert!((bounds.x0 - 42.0).abs() < 1e-9, "{bounds:?}");
    assert!((bounds.y1 - 50.0).abs() < 1e-9, "{bounds:?}");
}

#[test]
fn text_needs_a_font_and_an_engine() {
    let engine = BoxEngine::default();
    let mut backend = RefBackend::new();
    {
        let mut dc = VectorDc::new(&mut backend).with_text_engine(&engine);
        dc.begin(&window()).unwrap();
        assert!(matches!(dc.draw_text(0, 0, "x"), Err(DcError::NoFont)));
    }
    let mut dc = VectorDc::new(&mut backend);
    assert!(matches!(dc.set_font(&font()), Err(DcError::SessionNotBound)));
    dc.begin(&window()).unwrap();
    dc.set_font(&font()).unwrap();
    assert!(matches!(dc.draw_text(0, 0, "x"), Err(DcError::NoTextEngine)));
    assert_eq!(dc.backend().draws().count(), 0);
}

#[test]
fn layouts_start_without_a_pending_path() {
    let engine = BoxEngine::default();
    let mut backend = RefBackend::new();
    let mut dc = VectorDc::new(&mut backend).with_text_engine(&engine);
    dc.begin(&window()).unwrap();
    dc.set_font(&font()).unwrap();
    dc.backend_mut().clear_events();

    dc.draw_image_text(10, 20, "a").unwrap();
    dc.draw_line(0, 0, 5, 5).unwrap();
    dc.draw_text(30, 20, "b").unwrap();

    let mut pending = false;
    let mut glyphs = 0;
    for event in dc.backend().events() {
        match event {
            Event::Path(PathOp::Rectangle(r)) if r.width() == 5.0 => {
                assert!(!pending, "a path was pending when the layout started");
                glyphs += 1;
                pending = true;
            }
            Event::Path(PathOp::NewPath) | Event::Draw { .. } => pending = false,
            Event::Path(_) => pending = true,
            _ => {}
        }
    }
    assert_eq!(glyphs, 2);
}
