// Copyright 2026 the Vectordc Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Vectordc Reference Backend.
//!
//! This crate provides a small, stateful implementation of [`VectorBackend`]
//! and [`ResourceBackend`] for **op recording and state tracing**.
//!
//! It is intentionally *not* a reference renderer:
//! - It does **not** rasterize to pixels.
//! - It does **not** establish golden rendering behavior across backends.
//! - It is intended primarily for tests and debugging that want to assert on
//!   emitted ops, the device-space path each draw consumed, and the graphics
//!   state at the time each op was applied.

use vectordc_backend::{
    Affine, BackendError, BezPath, BlendMode, Cap, Color, ContextId, Dashes, DrawOp, DrawableId,
    FillRule, Join, LayerOp, PathBuilder, PathOp, ResourceBackend, Source, StateOp, SurfaceDesc,
    SurfaceId, VectorBackend,
};

/// Snapshot of the current graphics state inside the backend.
#[derive(Clone, Debug, PartialEq)]
pub struct StateSnapshot {
    /// Current transform.
    pub transform: Affine,
    /// Current source.
    pub source: Source,
    /// Stroke width in user units.
    pub line_width: f64,
    /// Stroke cap.
    pub cap: Cap,
    /// Stroke join.
    pub join: Join,
    /// Dash pattern and offset; `None` for solid strokes.
    pub dash: Option<(Dashes, f64)>,
    /// Fill rule used for filling and clipping paths.
    pub fill_rule: FillRule,
    /// Blend mode of subsequent draws.
    pub blend: BlendMode,
    /// Number of clip operations intersected into the current clip.
    pub clip_depth: u32,
    /// Number of active layers on the layer stack.
    pub layer_stack_depth: u32,
    /// The most recently pushed layer op, if any.
    pub layer_top: Option<LayerOp>,
}

impl Default for StateSnapshot {
    fn default() -> Self {
        Self {
            transform: Affine::IDENTITY,
            source: Source::Solid(Color::BLACK),
            line_width: 1.0,
            cap: Cap::Butt,
            join: Join::Miter,
            dash: None,
            fill_rule: FillRule::NonZero,
            blend: BlendMode::default(),
            clip_depth: 0,
            layer_stack_depth: 0,
            layer_top: None,
        }
    }
}

/// Resource lifetime event.
#[derive(Clone, Debug, PartialEq)]
pub enum ResourceEvent {
    /// A surface was created from client data.
    CreateSurface {
        /// New surface.
        id: SurfaceId,
        /// Descriptor of the client data.
        desc: SurfaceDesc,
    },
    /// A surface was bound to a drawable.
    CreateDrawableSurface {
        /// New surface.
        id: SurfaceId,
        /// Drawable backing the surface.
        drawable: DrawableId,
    },
    /// A surface was destroyed.
    DestroySurface(SurfaceId),
    /// A context was created.
    CreateContext {
        /// New context.
        id: ContextId,
        /// Target surface.
        target: SurfaceId,
    },
    /// A context was destroyed.
    DestroyContext(ContextId),
}

/// Event recorded by the reference backend.
#[derive(Clone, Debug)]
pub enum Event {
    /// Resource creation or destruction.
    Resource(ResourceEvent),
    /// Path operation, applied under the transform current at the time.
    Path(PathOp),
    /// State operation and the resulting state snapshot.
    State {
        /// State operation that was applied.
        op: StateOp,
        /// Snapshot after applying the state operation.
        state: StateSnapshot,
    },
    /// Draw operation, the device-space path it consumed and the state used.
    Draw {
        /// Draw operation that was applied.
        op: DrawOp,
        /// Current path in device space at the time of drawing.
        path: BezPath,
        /// Snapshot at the time of drawing.
        state: StateSnapshot,
    },
}

#[derive(Clone, Debug)]
enum SurfaceRecord {
    Client { desc: SurfaceDesc, data: Vec<u8> },
    Drawable { drawable: DrawableId },
}

/// Simple recording implementation of the vector backend.
///
/// This backend:
/// - Stores surface records in a vector keyed by their IDs,
/// - Tracks the current graphics state with a save/restore stack,
/// - Builds the current path in device space,
/// - Records [`Event`]s as resources, paths, states and draws are applied.
#[derive(Default, Debug)]
pub struct RefBackend {
    surfaces: Vec<Option<SurfaceRecord>>,
    context: Option<ContextId>,
    next_context: u32,

    /// Log of events in the order they were applied.
    events: Vec<Event>,
    /// Current graphics state.
    state: StateSnapshot,
    saved: Vec<StateSnapshot>,
    layer_stack: Vec<LayerOp>,
    path: PathBuilder,
}

impl RefBackend {
    /// Create an empty backend.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a slice of recorded events.
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// Clears all recorded events but keeps resources and state.
    pub fn clear_events(&mut self) {
        self.events.clear();
    }

    /// Current graphics state.
    pub fn current_state(&self) -> &StateSnapshot {
        &self.state
    }

    /// Current path in device space.
    pub fn current_path(&self) -> &BezPath {
        self.path.path()
    }

    /// The active context, if any.
    pub fn active_context(&self) -> Option<ContextId> {
        self.context
    }

    /// Number of surfaces that have been created and not destroyed.
    pub fn live_surfaces(&self) -> usize {
        self.surfaces.iter().filter(|s| s.is_some()).count()
    }

    /// Returns true if `id` names a live surface.
    pub fn is_live(&self, id: SurfaceId) -> bool {
        matches!(self.surfaces.get(id.0 as usize), Some(Some(_)))
    }

    /// Descriptor and bytes of a live client surface.
    pub fn surface_data(&self, id: SurfaceId) -> Option<(SurfaceDesc, &[u8])> {
        match self.surfaces.get(id.0 as usize)? {
            Some(SurfaceRecord::Client { desc, data }) => Some((*desc, data.as_slice())),
            _ => None,
        }
    }

    /// Drawable backing a live drawable surface.
    pub fn surface_drawable(&self, id: SurfaceId) -> Option<DrawableId> {
        match self.surfaces.get(id.0 as usize)? {
            Some(SurfaceRecord::Drawable { drawable }) => Some(*drawable),
            _ => None,
        }
    }

    /// Recorded draw events, in order.
    pub fn draws(&self) -> impl Iterator<Item = (&DrawOp, &BezPath, &StateSnapshot)> + '_ {
        self.events.iter().filter_map(|e| match e {
            Event::Draw { op, path, state } => Some((op, path, state)),
            _ => None,
        })
    }

    fn push_surface(&mut self, record: SurfaceRecord) -> SurfaceId {
        let id = u32::try_from(self.surfaces.len())
            .expect("RefBackend: too many surfaces for u32 SurfaceId");
        self.surfaces.push(Some(record));
        SurfaceId(id)
    }

    fn save(&mut self) {
        self.saved.push(self.state.clone());
    }

    fn restore(&mut self) {
        if let Some(saved) = self.saved.pop() {
            let layer_stack_depth = self.state.layer_stack_depth;
            let layer_top = self.state.layer_top;
            self.state = saved;
            self.state.layer_stack_depth = layer_stack_depth;
            self.state.layer_top = layer_top;
        }
    }

    fn sync_layers(&mut self) {
        self.state.layer_stack_depth = u32::try_from(self.layer_stack.len())
            .expect("RefBackend: too many layer stack entries for u32");
        self.state.layer_top = self.layer_stack.last().copied();
    }
}

impl ResourceBackend for RefBackend {
    fn create_surface(
        &mut self,
        desc: SurfaceDesc,
        data: &[u8],
    ) -> Result<SurfaceId, BackendError> {
        if data.len() != desc.byte_len() || desc.stride < desc.format.stride_for_width(desc.width)
        {
            return Err(BackendError::DataSize {
                expected: desc.byte_len(),
                actual: data.len(),
            });
        }
        let id = self.push_surface(SurfaceRecord::Client {
            desc,
            data: data.to_vec(),
        });
        self.events
            .push(Event::Resource(ResourceEvent::CreateSurface { id, desc }));
        Ok(id)
    }

    fn create_drawable_surface(
        &mut self,
        drawable: DrawableId,
        _width: u32,
        _height: u32,
    ) -> Result<SurfaceId, BackendError> {
        let id = self.push_surface(SurfaceRecord::Drawable { drawable });
        self.events
            .push(Event::Resource(ResourceEvent::CreateDrawableSurface {
                id,
                drawable,
            }));
        Ok(id)
    }

    fn destroy_surface(&mut self, id: SurfaceId) {
        if let Some(slot) = self.surfaces.get_mut(id.0 as usize) {
            if slot.take().is_some() {
                self.events
                    .push(Event::Resource(ResourceEvent::DestroySurface(id)));
            }
        }
    }
}

impl VectorBackend for RefBackend {
    fn create_context(&mut self, target: SurfaceId) -> Result<ContextId, BackendError> {
        if self.context.is_some() {
            return Err(BackendError::ContextBusy);
        }
        if !self.is_live(target) {
            return Err(BackendError::UnknownSurface(target));
        }
        let id = ContextId(self.next_context);
        self.next_context = self
            .next_context
            .checked_add(1)
            .expect("RefBackend: too many contexts for u32 ContextId");
        self.context = Some(id);
        self.state = StateSnapshot::default();
        self.saved.clear();
        self.layer_stack.clear();
        self.path.clear();
        self.events
            .push(Event::Resource(ResourceEvent::CreateContext { id, target }));
        Ok(id)
    }

    fn destroy_context(&mut self, id: ContextId) {
        if self.context == Some(id) {
            self.context = None;
            self.path.clear();
            self.events
                .push(Event::Resource(ResourceEvent::DestroyContext(id)));
        }
    }

    fn path(&mut self, op: PathOp) {
        self.path.apply(&op, self.state.transform);
        self.events.push(Event::Path(op));
    }

    fn state(&mut self, op: StateOp) {
        match &op {
            StateOp::Save => self.save(),
            StateOp::Restore => self.restore(),
            StateOp::Transform(tx) => self.state.transform *= *tx,
            StateOp::SetSource(source) => self.state.source = *source,
            StateOp::SetLineWidth(width) => self.state.line_width = *width,
            StateOp::SetLineCap(cap) => self.state.cap = *cap,
            StateOp::SetLineJoin(join) => self.state.join = *join,
            StateOp::SetDash { pattern, offset } => {
                self.state.dash = if pattern.is_empty() {
                    None
                } else {
                    Some((pattern.clone(), *offset))
                };
            }
            StateOp::SetFillRule(rule) => self.state.fill_rule = *rule,
            StateOp::SetBlendMode(mode) => self.state.blend = *mode,
            StateOp::Clip => {
                self.state.clip_depth += 1;
                self.path.clear();
            }
            StateOp::ResetClip => self.state.clip_depth = 0,
            StateOp::PushLayer(layer) => {
                self.save();
                self.layer_stack.push(*layer);
                self.sync_layers();
            }
            StateOp::PopLayer => {
                self.layer_stack.pop();
                self.sync_layers();
                self.restore();
            }
        }

        self.events.push(Event::State {
            op,
            state: self.state.clone(),
        });
    }

    fn draw(&mut self, op: DrawOp) {
        let path = self.path.path().clone();
        let preserve = match op {
            DrawOp::Fill { preserve } | DrawOp::Stroke { preserve } => preserve,
            DrawOp::Paint | DrawOp::Mask(_) => true,
        };
        if !preserve {
            self.path.clear();
        }
        self.events.push(Event::Draw {
            op,
            path,
            state: self.state.clone(),
        });
    }

    fn transform(&self) -> Affine {
        self.state.transform
    }
}
